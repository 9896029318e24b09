//! Pipeline orchestration: one run from directory listing to summary.
//!
//! The orchestrator owns the run's control flow and nothing else — pixels
//! belong to [`crate::imaging`], names to [`crate::naming`], directories to
//! [`crate::layout`]:
//!
//! 1. Enumerate sources (fatal on failure; nothing is created on disk).
//! 2. Prepare the destination roots (fatal on failure).
//! 3. Decode each source once, classify it, plan its variants.
//! 4. Encode every (source, variant) pair across the rayon pool, all
//!    variants borrowing the one decoded image.
//! 5. Fold each source's outcomes into a [`FileResult`]; a source succeeds
//!    when at least one of its variants was written.
//!
//! Per-task failures are recorded and never abort the run; only the
//! enumeration and layout steps can. The returned [`RunSummary`] lists
//! results in enumeration order regardless of completion order.
//!
//! Progress is reported through an optional channel of [`RunEvent`]s; the
//! pipeline never blocks on or reads anything back from the consumer.

use crate::catalog::{self, CatalogError, SourceEntry};
use crate::imaging::{EncodeParams, ImageBackend};
use crate::layout::{LayoutError, RunLayout};
use crate::naming;
use crate::plan::{self, Orientation, Profile, SizeVariant, VariantKind};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RunError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

/// Everything that identifies one run.
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub source_dir: PathBuf,
    pub dest_base: PathBuf,
    pub folder_name: String,
    pub profile: Profile,
}

/// Cooperative cancellation: a programmatic flag plus an optional deadline.
///
/// Once triggered, no new resize task is dispatched; in-flight tasks finish
/// normally. Atomic output writes guarantee a cancelled run never leaves a
/// partial file at an output path.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(timeout: Duration) -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
            deadline: Instant::now().checked_add(timeout),
        }
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_triggered(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Outcome of one variant task.
#[derive(Debug, Clone, PartialEq)]
pub enum VariantStatus {
    Encoded,
    Failed(String),
    Skipped(String),
}

/// One recorded per-variant failure, attached to its source's result.
#[derive(Debug, Clone, Serialize)]
pub struct VariantError {
    pub variant: String,
    pub message: String,
}

/// Aggregated outcome for one enumerated source.
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub filename: String,
    /// `None` when the source failed to decode.
    pub dimensions: Option<(u32, u32)>,
    pub orientation: Option<Orientation>,
    pub succeeded: bool,
    pub variant_errors: Vec<VariantError>,
}

/// Final report for a run, in source enumeration order.
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub total_sources: usize,
    pub results: Vec<FileResult>,
    pub output_roots: Vec<PathBuf>,
}

impl RunSummary {
    pub fn succeeded_count(&self) -> usize {
        self.results.iter().filter(|r| r.succeeded).count()
    }

    pub fn failed_count(&self) -> usize {
        self.total_sources - self.succeeded_count()
    }
}

/// Progress event for the status sink.
#[derive(Debug, Clone)]
pub enum RunEvent {
    CatalogRead {
        total: usize,
    },
    SourceFinished {
        index: usize,
        filename: String,
        dimensions: Option<(u32, u32)>,
        orientation: Option<Orientation>,
        variants: Vec<(String, VariantStatus)>,
    },
}

/// Per-source working state folded into a [`FileResult`] and a progress event.
struct SourceOutcome {
    dimensions: Option<(u32, u32)>,
    orientation: Option<Orientation>,
    variants: Vec<(String, VariantStatus)>,
}

impl SourceOutcome {
    fn into_file_result(self, filename: &str) -> FileResult {
        let succeeded = self
            .variants
            .iter()
            .any(|(_, status)| *status == VariantStatus::Encoded);
        let variant_errors = self
            .variants
            .iter()
            .filter_map(|(label, status)| match status {
                VariantStatus::Encoded => None,
                VariantStatus::Failed(message) | VariantStatus::Skipped(message) => {
                    Some(VariantError {
                        variant: label.clone(),
                        message: message.clone(),
                    })
                }
            })
            .collect();
        FileResult {
            filename: filename.to_string(),
            dimensions: self.dimensions,
            orientation: self.orientation,
            succeeded,
            variant_errors,
        }
    }
}

/// Execute one full run.
pub fn run(
    backend: &impl ImageBackend,
    request: &RunRequest,
    cancel: &CancelToken,
    progress: Option<Sender<RunEvent>>,
) -> Result<RunSummary, RunError> {
    let sources = catalog::read_sources(&request.source_dir)?;
    if let Some(tx) = &progress {
        let _ = tx.send(RunEvent::CatalogRead {
            total: sources.len(),
        });
    }
    log::info!(
        "processing {} sources from {}",
        sources.len(),
        request.source_dir.display()
    );

    let layout = RunLayout::prepare(request.profile, &request.dest_base, &request.folder_name)?;
    let duplicate_stem = mark_duplicate_stems(&sources);

    let results: Vec<FileResult> = sources
        .par_iter()
        .enumerate()
        .map_with(progress, |progress, (index, entry)| {
            let outcome = process_source(
                backend,
                &layout,
                request.profile,
                entry,
                index,
                duplicate_stem[index],
                cancel,
            );
            if let Some(tx) = progress {
                let _ = tx.send(RunEvent::SourceFinished {
                    index,
                    filename: entry.filename.clone(),
                    dimensions: outcome.dimensions,
                    orientation: outcome.orientation,
                    variants: outcome.variants.clone(),
                });
            }
            outcome.into_file_result(&entry.filename)
        })
        .collect();

    Ok(RunSummary {
        total_sources: results.len(),
        results,
        output_roots: layout.roots(),
    })
}

/// For each source, whether an earlier source shares its filename stem.
///
/// Stem-named outputs (flat sized files, website re-encodes) would collide
/// for such sources; the later one is skipped per variant instead of
/// silently overwriting the earlier one's files.
fn mark_duplicate_stems(sources: &[SourceEntry]) -> Vec<bool> {
    let mut seen = HashSet::new();
    sources
        .iter()
        .map(|entry| !seen.insert(naming::stem(&entry.filename)))
        .collect()
}

fn process_source(
    backend: &impl ImageBackend,
    layout: &RunLayout,
    profile: Profile,
    entry: &SourceEntry,
    index: usize,
    duplicate_stem: bool,
    cancel: &CancelToken,
) -> SourceOutcome {
    if cancel.is_triggered() {
        return SourceOutcome {
            dimensions: None,
            orientation: None,
            variants: vec![(
                "all".to_string(),
                VariantStatus::Skipped("run cancelled".to_string()),
            )],
        };
    }

    let image = match backend.decode(&entry.bytes) {
        Ok(image) => image,
        Err(e) => {
            log::debug!("decode failed for {}: {e}", entry.filename);
            return SourceOutcome {
                dimensions: None,
                orientation: None,
                variants: vec![("decode".to_string(), VariantStatus::Failed(e.to_string()))],
            };
        }
    };

    let dimensions = (image.width(), image.height());
    let orientation = plan::classify(dimensions.0, dimensions.1);
    let variants = plan::plan_variants(profile, orientation);

    // Nested mode: the per-index folder must exist before any of this
    // source's variants can write into it.
    if profile.nested() {
        if let Err(e) = layout.ensure_source_dir(index) {
            let message = e.to_string();
            return SourceOutcome {
                dimensions: Some(dimensions),
                orientation: Some(orientation),
                variants: variants
                    .iter()
                    .map(|v| (v.label(), VariantStatus::Failed(message.clone())))
                    .collect(),
            };
        }
    }

    let encode_one = |variant: &SizeVariant| -> VariantStatus {
        let uses_stem = match variant.kind {
            VariantKind::Full => true,
            VariantKind::Sized(_) => !profile.nested(),
            VariantKind::Reel => false,
        };
        if duplicate_stem && uses_stem {
            return VariantStatus::Skipped(format!(
                "duplicate output path: an earlier source is also named \"{}\"",
                naming::stem(&entry.filename)
            ));
        }
        if cancel.is_triggered() {
            return VariantStatus::Skipped("run cancelled".to_string());
        }

        let rel = naming::variant_rel_path(
            &variant.kind,
            variant.format,
            &entry.filename,
            index,
            profile.nested(),
        );
        let output = layout.root(naming::variant_root(&variant.kind)).join(rel);
        let params = EncodeParams {
            output,
            fit: variant.fit,
            format: variant.format,
            quality: variant.quality,
        };
        match backend.encode(&image, &params) {
            Ok(()) => VariantStatus::Encoded,
            Err(e) => VariantStatus::Failed(e.to_string()),
        }
    };

    let statuses: Vec<(String, VariantStatus)> = variants
        .par_iter()
        .map(|variant| (variant.label(), encode_one(variant)))
        .collect();

    SourceOutcome {
        dimensions: Some(dimensions),
        orientation: Some(orientation),
        variants: statuses,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use std::fs;
    use std::sync::mpsc;
    use tempfile::TempDir;

    const MULTI_FLAT: Profile = Profile::MultiSize { nested: false };
    const MULTI_NESTED: Profile = Profile::MultiSize { nested: true };

    fn request(tmp: &TempDir, profile: Profile) -> RunRequest {
        RunRequest {
            source_dir: tmp.path().join("images"),
            dest_base: tmp.path().join("out"),
            folder_name: "trip".to_string(),
            profile,
        }
    }

    fn write_mock_source(tmp: &TempDir, name: &str, width: u32, height: u32) {
        let dir = tmp.path().join("images");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(name), MockBackend::source_bytes(width, height)).unwrap();
    }

    fn encode_outputs(backend: &MockBackend) -> Vec<String> {
        backend
            .get_operations()
            .into_iter()
            .filter_map(|op| match op {
                RecordedOp::Encode { output, .. } => Some(output),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn multi_size_flat_encodes_four_variants_per_source() {
        let tmp = TempDir::new().unwrap();
        write_mock_source(&tmp, "a.jpg", 4000, 3000);
        write_mock_source(&tmp, "b.jpg", 3000, 4000);
        fs::create_dir_all(tmp.path().join("out")).unwrap();

        let backend = MockBackend::new();
        let summary = run(&backend, &request(&tmp, MULTI_FLAT), &CancelToken::new(), None).unwrap();

        assert_eq!(summary.total_sources, 2);
        assert_eq!(summary.succeeded_count(), 2);
        assert!(summary.results.iter().all(|r| r.variant_errors.is_empty()));

        let outputs = encode_outputs(&backend);
        assert_eq!(outputs.len(), 8);
        assert!(outputs.iter().any(|o| o.ends_with("2048x1365-a.webp")));
        assert!(outputs.iter().any(|o| o.ends_with("600x400-b.webp")));
    }

    #[test]
    fn results_preserve_enumeration_order() {
        let tmp = TempDir::new().unwrap();
        for name in ["c.jpg", "a.jpg", "b.jpg"] {
            write_mock_source(&tmp, name, 100, 50);
        }

        let backend = MockBackend::new();
        let summary = run(&backend, &request(&tmp, MULTI_FLAT), &CancelToken::new(), None).unwrap();

        let names: Vec<&str> = summary
            .results
            .iter()
            .map(|r| r.filename.as_str())
            .collect();
        assert_eq!(names, ["a.jpg", "b.jpg", "c.jpg"]);
    }

    #[test]
    fn portrait_source_gets_swapped_crop_boxes() {
        let tmp = TempDir::new().unwrap();
        write_mock_source(&tmp, "b.jpg", 3000, 4000);

        let backend = MockBackend::new();
        let summary = run(&backend, &request(&tmp, MULTI_FLAT), &CancelToken::new(), None).unwrap();
        assert_eq!(summary.results[0].orientation, Some(Orientation::Portrait));

        let swapped = backend.get_operations().into_iter().any(|op| {
            matches!(
                op,
                RecordedOp::Encode {
                    fit: crate::imaging::FitMode::Cover {
                        width: 1365,
                        height: 2048
                    },
                    ..
                }
            )
        });
        assert!(swapped, "expected a 1365x2048 crop box for the portrait source");
    }

    #[test]
    fn partial_variant_failure_still_succeeds() {
        let tmp = TempDir::new().unwrap();
        write_mock_source(&tmp, "a.jpg", 4000, 3000);

        let backend = MockBackend::failing_outputs("600x400");
        let summary = run(&backend, &request(&tmp, MULTI_FLAT), &CancelToken::new(), None).unwrap();

        let result = &summary.results[0];
        assert!(result.succeeded);
        assert_eq!(result.variant_errors.len(), 1);
        assert_eq!(result.variant_errors[0].variant, "600x400");
        assert_eq!(encode_outputs(&backend).len(), 3);
    }

    #[test]
    fn undecodable_source_is_recorded_and_siblings_continue() {
        let tmp = TempDir::new().unwrap();
        write_mock_source(&tmp, "a.jpg", 4000, 3000);
        let dir = tmp.path().join("images");
        fs::write(dir.join("broken.jpg"), b"not an image").unwrap();

        let backend = MockBackend::new();
        let summary = run(&backend, &request(&tmp, MULTI_FLAT), &CancelToken::new(), None).unwrap();

        assert_eq!(summary.total_sources, 2);
        let good = &summary.results[0];
        let broken = &summary.results[1];
        assert!(good.succeeded);
        assert!(!broken.succeeded);
        assert_eq!(broken.dimensions, None);
        assert_eq!(broken.orientation, None);
        assert_eq!(broken.variant_errors.len(), 1);
        assert_eq!(broken.variant_errors[0].variant, "decode");
    }

    #[test]
    fn duplicate_stems_skip_flat_outputs() {
        let tmp = TempDir::new().unwrap();
        write_mock_source(&tmp, "a.jpg", 4000, 3000);
        write_mock_source(&tmp, "a.png", 2000, 1000);

        let backend = MockBackend::new();
        let summary = run(&backend, &request(&tmp, MULTI_FLAT), &CancelToken::new(), None).unwrap();

        // "a.jpg" sorts before "a.png" and claims the stem
        let first = &summary.results[0];
        let second = &summary.results[1];
        assert!(first.succeeded);
        assert!(!second.succeeded);
        assert_eq!(second.variant_errors.len(), 4);
        assert!(second.variant_errors[0].message.contains("duplicate output path"));
        assert_eq!(encode_outputs(&backend).len(), 4);
    }

    #[test]
    fn duplicate_stems_are_fine_in_nested_mode() {
        let tmp = TempDir::new().unwrap();
        write_mock_source(&tmp, "a.jpg", 4000, 3000);
        write_mock_source(&tmp, "a.png", 2000, 1000);

        let backend = MockBackend::new();
        let summary =
            run(&backend, &request(&tmp, MULTI_NESTED), &CancelToken::new(), None).unwrap();

        assert_eq!(summary.succeeded_count(), 2);
        let outputs = encode_outputs(&backend);
        assert_eq!(outputs.len(), 8);
        // Index-keyed folders keep the two sources apart
        assert!(outputs.iter().any(|o| o.contains("/1/")));
        assert!(outputs.iter().any(|o| o.contains("/2/")));
    }

    #[test]
    fn nested_mode_creates_index_folders() {
        let tmp = TempDir::new().unwrap();
        write_mock_source(&tmp, "a.jpg", 4000, 3000);

        let backend = MockBackend::new();
        run(&backend, &request(&tmp, MULTI_NESTED), &CancelToken::new(), None).unwrap();

        assert!(tmp.path().join("out").join("trip").join("1").is_dir());
    }

    #[test]
    fn full_plus_reel_writes_to_both_roots() {
        let tmp = TempDir::new().unwrap();
        write_mock_source(&tmp, "dawn.jpg", 4000, 3000);
        write_mock_source(&tmp, "dusk.jpg", 3000, 4000);

        let backend = MockBackend::new();
        let summary = run(
            &backend,
            &request(&tmp, Profile::FullPlusReel),
            &CancelToken::new(),
            None,
        )
        .unwrap();

        assert_eq!(summary.succeeded_count(), 2);
        assert_eq!(
            summary.output_roots,
            vec![
                tmp.path().join("out").join("trip-website"),
                tmp.path().join("out").join("trip-reel"),
            ]
        );

        let outputs = encode_outputs(&backend);
        assert_eq!(outputs.len(), 4);
        assert!(outputs.iter().any(|o| o.ends_with("trip-website/dawn.webp")));
        assert!(outputs.iter().any(|o| o.ends_with("trip-website/dusk.webp")));
        assert!(outputs.iter().any(|o| o.ends_with("trip-reel/1.jpg")));
        assert!(outputs.iter().any(|o| o.ends_with("trip-reel/2.jpg")));
    }

    #[test]
    fn missing_source_directory_fails_fast_without_creating_output() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("out")).unwrap();

        let backend = MockBackend::new();
        let result = run(&backend, &request(&tmp, MULTI_FLAT), &CancelToken::new(), None);

        assert!(matches!(
            result,
            Err(RunError::Catalog(CatalogError::DirectoryAccess { .. }))
        ));
        let leftovers: Vec<_> = fs::read_dir(tmp.path().join("out")).unwrap().collect();
        assert!(leftovers.is_empty(), "no output roots may be created");
    }

    #[test]
    fn triggered_token_skips_all_work() {
        let tmp = TempDir::new().unwrap();
        write_mock_source(&tmp, "a.jpg", 4000, 3000);

        let backend = MockBackend::new();
        let cancel = CancelToken::new();
        cancel.cancel();
        let summary = run(&backend, &request(&tmp, MULTI_FLAT), &cancel, None).unwrap();

        assert_eq!(summary.succeeded_count(), 0);
        assert!(encode_outputs(&backend).is_empty());
        let result = &summary.results[0];
        assert_eq!(result.variant_errors.len(), 1);
        assert!(result.variant_errors[0].message.contains("cancelled"));
    }

    #[test]
    fn elapsed_deadline_behaves_like_cancellation() {
        let tmp = TempDir::new().unwrap();
        write_mock_source(&tmp, "a.jpg", 4000, 3000);

        let backend = MockBackend::new();
        let cancel = CancelToken::with_deadline(Duration::ZERO);
        let summary = run(&backend, &request(&tmp, MULTI_FLAT), &cancel, None).unwrap();

        assert_eq!(summary.succeeded_count(), 0);
        assert!(encode_outputs(&backend).is_empty());
    }

    #[test]
    fn progress_events_cover_every_source() {
        let tmp = TempDir::new().unwrap();
        write_mock_source(&tmp, "a.jpg", 4000, 3000);
        write_mock_source(&tmp, "b.jpg", 3000, 4000);

        let backend = MockBackend::new();
        let (tx, rx) = mpsc::channel();
        run(&backend, &request(&tmp, MULTI_FLAT), &CancelToken::new(), Some(tx)).unwrap();

        let events: Vec<RunEvent> = rx.iter().collect();
        assert!(matches!(events[0], RunEvent::CatalogRead { total: 2 }));
        let mut finished: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                RunEvent::SourceFinished { index, .. } => Some(*index),
                _ => None,
            })
            .collect();
        finished.sort();
        assert_eq!(finished, [0, 1]);
    }
}
