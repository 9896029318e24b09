//! # Reframe
//!
//! Batch photo resizer producing web and reel derivative sets. Point it at
//! a folder of photographs and it fills one or more output folders with
//! resized, re-encoded derivatives in a deterministic layout.
//!
//! # Architecture: One Pipeline, Two Profiles
//!
//! A run is a single pass over the source folder:
//!
//! ```text
//! catalog    images/     →  Vec<SourceEntry>     (list + read, all-or-nothing)
//! plan       pixels      →  Vec<SizeVariant>     (orientation → variant set)
//! encode     (src, var)  →  one file each        (bounded rayon fan-out)
//! summary    outcomes    →  RunSummary           (enumeration order)
//! ```
//!
//! The two profiles — multi-size (`sizes`) and full+reel (`web`) — differ
//! only in planner policy and output naming; everything else is shared. The
//! profile is selected once at startup and threaded through explicitly.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`catalog`] | Source directory enumeration and file reads |
//! | [`plan`] | Orientation classification and variant planning (pure) |
//! | [`naming`] | Slugified folder names + the derivative file naming scheme (pure) |
//! | [`imaging`] | Decode, cover-crop, and WebP/JPEG encode behind the [`imaging::ImageBackend`] trait |
//! | [`layout`] | Output directory tree: idempotent, concurrency-safe creation |
//! | [`pipeline`] | Orchestration: fan-out, partial-failure aggregation, cancellation |
//! | [`output`] | CLI rendering of progress events and the final summary |
//! | [`config`] | Process metadata and run tunables (no config file) |
//!
//! # Design Decisions
//!
//! ## Decode Once, Encode Many
//!
//! Every source is decoded exactly once; all of its variant tasks borrow
//! the same read-only [`image::DynamicImage`]. Decoding is the single most
//! expensive per-source step and the variants differ only in crop box and
//! encoder, so re-decoding per variant would multiply the cost by four for
//! nothing.
//!
//! ## Bounded Fan-Out
//!
//! All (source, variant) pairs run on one rayon pool sized to the CPU core
//! count (`--jobs` can constrain it down). Work beyond the pool size queues
//! instead of launching, so a thousand-photo folder cannot exhaust file
//! handles or memory bandwidth by starting everything at once.
//!
//! ## Partial Failure Is Data, Not Control Flow
//!
//! A failed decode or encode is recorded on that source's [`pipeline::FileResult`]
//! and the run continues; a source counts as succeeded when at least one of
//! its variants was written. Only two things abort a run: the source
//! directory cannot be enumerated, or an output root cannot be created.
//!
//! ## Atomic Output Writes
//!
//! Encoders write to a temp file next to the target and rename it into
//! place. Interrupted or cancelled runs leave either a complete derivative
//! or nothing at an output path, never a truncated file.
//!
//! ## Pure-Rust Imaging
//!
//! Decoding and resizing use the `image` crate; lossy WebP goes through
//! `libwebp` via the `webp` crate (the `image` crate's WebP encoder is
//! lossless-only). No ImageMagick, no external processes — the binary is
//! fully self-contained.

pub mod catalog;
pub mod config;
pub mod imaging;
pub mod layout;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod plan;

#[cfg(test)]
pub(crate) mod test_helpers;
