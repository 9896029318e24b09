//! CLI output formatting.
//!
//! The pipeline reports progress as [`RunEvent`]s over a channel and returns
//! a [`RunSummary`]; everything user-visible is rendered here. Each piece
//! has a `format_*` function (returns `Vec<String>`) for testability and a
//! `print_*` wrapper that writes to stdout. Format functions are pure — no
//! I/O, no side effects.
//!
//! # Output format
//!
//! ```text
//! reframe 0.3.0 — Batch photo resizer producing web and reel derivative sets
//!
//! Found 2 files
//!     001 a.jpg (4000x3000, landscape)
//!         2048x1365: encoded
//!         1024x683: encoded
//!         768x512: encoded
//!         600x400: encoded
//!
//! Summary
//!     001 a.jpg  4000x3000  landscape  ok
//!     002 b.jpg  3000x4000  portrait   partial — 600x400: encode failed: ...
//! Processed 2 sources: 2 succeeded, 0 failed
//! Output: ./summer-trip
//! ```

use crate::config::AppInfo;
use crate::pipeline::{FileResult, RunEvent, RunSummary, VariantStatus};

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn format_dimensions(dimensions: Option<(u32, u32)>) -> String {
    match dimensions {
        Some((w, h)) => format!("{w}x{h}"),
        None => "-".to_string(),
    }
}

// ============================================================================
// Banner
// ============================================================================

/// Format the startup banner from display-only process metadata.
pub fn format_banner(info: &AppInfo) -> Vec<String> {
    let mut lines = vec![format!(
        "{} {} — {}",
        info.name, info.version, info.description
    )];
    if !info.authors.is_empty() {
        lines.push(format!("by {}", info.authors));
    }
    lines
}

pub fn print_banner(info: &AppInfo) {
    for line in format_banner(info) {
        println!("{}", line);
    }
    println!();
}

// ============================================================================
// Progress events
// ============================================================================

fn status_text(status: &VariantStatus) -> String {
    match status {
        VariantStatus::Encoded => "encoded".to_string(),
        VariantStatus::Failed(message) => format!("failed: {message}"),
        VariantStatus::Skipped(message) => format!("skipped: {message}"),
    }
}

/// Format a single progress event as display lines.
///
/// Each source leads with its positional index and filename; per-variant
/// outcomes follow as indented context lines.
pub fn format_run_event(event: &RunEvent) -> Vec<String> {
    match event {
        RunEvent::CatalogRead { total } => {
            vec![format!("Found {} files", total)]
        }
        RunEvent::SourceFinished {
            index,
            filename,
            dimensions,
            orientation,
            variants,
        } => {
            let header = match (dimensions, orientation) {
                (Some((w, h)), Some(o)) => {
                    format!("    {} {} ({}x{}, {})", format_index(index + 1), filename, w, h, o)
                }
                _ => format!("    {} {}", format_index(index + 1), filename),
            };
            let mut lines = vec![header];
            for (label, status) in variants {
                lines.push(format!("        {}: {}", label, status_text(status)));
            }
            lines
        }
    }
}

pub fn print_run_event(event: &RunEvent) {
    for line in format_run_event(event) {
        println!("{}", line);
    }
}

// ============================================================================
// Summary
// ============================================================================

fn summary_outcome(result: &FileResult) -> String {
    let errors = || {
        result
            .variant_errors
            .iter()
            .map(|e| format!("{}: {}", e.variant, e.message))
            .collect::<Vec<_>>()
            .join("; ")
    };
    if result.succeeded && result.variant_errors.is_empty() {
        "ok".to_string()
    } else if result.succeeded {
        format!("partial — {}", errors())
    } else {
        format!("failed — {}", errors())
    }
}

/// Format the final per-source report.
pub fn format_summary(summary: &RunSummary) -> Vec<String> {
    let mut lines = vec!["Summary".to_string()];

    for (i, result) in summary.results.iter().enumerate() {
        let orientation = result
            .orientation
            .map(|o| o.to_string())
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!(
            "    {} {}  {}  {}  {}",
            format_index(i + 1),
            result.filename,
            format_dimensions(result.dimensions),
            orientation,
            summary_outcome(result),
        ));
    }

    lines.push(format!(
        "Processed {} sources: {} succeeded, {} failed",
        summary.total_sources,
        summary.succeeded_count(),
        summary.failed_count(),
    ));
    for root in &summary.output_roots {
        lines.push(format!("Output: {}", root.display()));
    }
    lines
}

pub fn print_summary(summary: &RunSummary) {
    println!();
    for line in format_summary(summary) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
