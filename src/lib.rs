//! # barcode-rename
//!
//! Rename scanned image files to the barcode printed in them.
//!
//! ## Why this crate?
//!
//! Warehouse and archive workflows photograph labelled items in bulk and end
//! up with thousands of `IMG_0412.jpg` files. Each picture already carries its
//! identity as a barcode; this crate reads it and renames the file to it.
//! Existing files are never overwritten and one unreadable image never stops
//! the rest of the batch. A file whose name already equals its barcode is left
//! alone on a re-run; a file that got a `_N` suffix does not count as named and
//! is resolved again (see [`pipeline::resolve`]).
//!
//! ## Pipeline Overview
//!
//! ```text
//! image file
//!  │
//!  ├─ 1. Input    read bytes, split directory / stem / extension
//!  ├─ 2. Decode   every barcode in the image (rxing, spawn_blocking)
//!  ├─ 3. Filter   tag each candidate with the length policy (10–12 chars)
//!  ├─ 4. Resolve  first valid candidate → free target path (`_1`, `_2`, …)
//!  ├─ 5. Rename   move with bounded retry on "file busy"
//!  └─ 6. Report   per-file outcome + log lines + batch summary
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use barcode_rename::{process_batch, RenameConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RenameConfig::default();
//!     let report = process_batch(&["scans/IMG_0001.jpg", "scans/IMG_0002.jpg"], &config).await?;
//!     for line in &report.log {
//!         println!("{line}");
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `barcode-rename` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `rxing` | on      | Built-in [`RxingDecoder`]; without it set [`RenameConfig::decoder`] |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{banner, process_batch, process_batch_sync, process_folder, NO_IMAGES_MESSAGE};
pub use config::{LengthPolicy, NamePolicy, RenameConfig, RenameConfigBuilder};
pub use error::{FileError, RenameError};
pub use output::{BatchReport, BatchStats, FileReport, Outcome};
pub use pipeline::decode::{BarcodeDecoder, DecodeError, DecodedCandidate};
#[cfg(feature = "rxing")]
pub use pipeline::decode::RxingDecoder;
pub use pipeline::filter::ValidatedCandidate;
pub use pipeline::input::{is_supported_image, scan_folder};
pub use pipeline::resolve::RenamePlan;
pub use progress::{BatchProgressCallback, NoopProgressCallback, ProgressCallback};
