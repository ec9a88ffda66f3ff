//! Error types for the barcode-rename library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`RenameError`]: **Fatal**: the batch cannot start at all (no decoder
//!   available, invalid configuration, folder not readable). Returned as
//!   `Err(RenameError)` from the top-level `process_*` functions.
//!
//! * [`FileError`]: **Non-fatal**: a single file failed (unreadable, rename
//!   refused, pathological collisions) but every other file in the batch is
//!   still processed. Surfaced as [`crate::output::Outcome::Error`] inside the
//!   file's [`crate::output::FileReport`].

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the barcode-rename library.
///
/// Per-file failures use [`FileError`] and never abort a batch.
#[derive(Debug, Error)]
pub enum RenameError {
    /// No decoder was supplied and the built-in one is compiled out.
    #[error("No barcode decoder configured.\nEnable the `rxing` feature or set RenameConfig::decoder.")]
    DecoderNotConfigured,

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The folder handed to `process_folder` could not be listed.
    #[error("Failed to read folder '{path}': {source}")]
    FolderReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A non-fatal error for a single file.
///
/// The display string is what ends up in `Outcome::Error { message }` and in
/// the log line for the file.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum FileError {
    /// The image bytes could not be read.
    #[error("failed to read '{path}': {detail}")]
    ReadFailed { path: PathBuf, detail: String },

    /// The move to the target path failed.
    #[error("failed to rename '{from}' to '{to}' after {attempts} attempt(s): {detail}")]
    RenameFailed {
        from: PathBuf,
        to: PathBuf,
        attempts: u32,
        detail: String,
    },

    /// Every disambiguation suffix up to the cap is taken.
    #[error("no free file name for '{target}' after {attempts} attempts")]
    IterationCapExceeded { target: String, attempts: u32 },

    /// The decoded text cannot be used as a file name under the active policy.
    #[error("barcode '{name}' is not a safe file name")]
    UnsafeName { name: String },

    /// A file appeared at the resolved target between resolution and rename.
    #[error("target '{path}' appeared before rename")]
    TargetAppeared { path: PathBuf },
}
