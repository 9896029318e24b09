//! Run configuration and process metadata.
//!
//! There is no configuration file: everything arrives as CLI flags and is
//! captured here in plain immutable values, constructed once in `main` and
//! passed explicitly to whoever needs them. The pipeline never reads
//! ambient global state.

use std::time::Duration;

/// Display-only process metadata (banner, version line).
///
/// Built once at startup from compile-time package data; the core pipeline
/// never sees it.
#[derive(Debug, Clone)]
pub struct AppInfo {
    pub name: &'static str,
    pub version: &'static str,
    pub description: &'static str,
    pub authors: &'static str,
}

impl AppInfo {
    pub fn from_build() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            description: env!("CARGO_PKG_DESCRIPTION"),
            authors: env!("CARGO_PKG_AUTHORS"),
        }
    }
}

/// Tunables for one pipeline run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Maximum number of parallel workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub jobs: Option<usize>,
    /// Overall deadline; once elapsed, no new resize task is dispatched.
    pub deadline: Option<Duration>,
}

/// Resolve the effective worker count from options.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)` (user can constrain down, not up)
pub fn effective_threads(options: &RunOptions) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    options.jobs.map(|n| n.min(cores).max(1)).unwrap_or(cores)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_uses_all_cores() {
        let cores = std::thread::available_parallelism().unwrap().get();
        assert_eq!(effective_threads(&RunOptions::default()), cores);
    }

    #[test]
    fn jobs_clamp_down_not_up() {
        let cores = std::thread::available_parallelism().unwrap().get();
        let opts = RunOptions {
            jobs: Some(cores + 100),
            ..Default::default()
        };
        assert_eq!(effective_threads(&opts), cores);

        let opts = RunOptions {
            jobs: Some(1),
            ..Default::default()
        };
        assert_eq!(effective_threads(&opts), 1);
    }

    #[test]
    fn zero_jobs_still_yields_a_worker() {
        let opts = RunOptions {
            jobs: Some(0),
            ..Default::default()
        };
        assert_eq!(effective_threads(&opts), 1);
    }

    #[test]
    fn app_info_reflects_package() {
        let info = AppInfo::from_build();
        assert_eq!(info.name, "reframe");
        assert!(!info.version.is_empty());
    }
}
