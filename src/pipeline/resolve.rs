//! Name resolution: selected barcode → target path that is free on disk.
//!
//! ## Collisions
//!
//! When `target.ext` already exists the resolver tries `target_1.ext`,
//! `target_2.ext`, … and takes the first free one, up to
//! `max_collision_attempts` suffixes. Existence is checked against the real
//! file system at resolution time only; another process may still create the
//! same path before the rename. [`crate::pipeline::rename::move_file`]
//! re-checks right before moving and the batch re-resolves once if needed.
//!
//! ## Suffixed names
//!
//! Only an exact (case-insensitive) match of the stem with the barcode is
//! "already named". A file called `target_1.ext` is therefore resolved again
//! on the next run and moves to the next free suffix.

use crate::config::{is_unsafe_char, NamePolicy, RenameConfig};
use crate::error::FileError;
use crate::pipeline::filter::{select, ValidatedCandidate};
use crate::pipeline::input::ImageFile;
use std::path::{Path, PathBuf};
use tracing::debug;

/// What to do with one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenamePlan {
    /// The file is already named after its barcode.
    NoOp,
    /// Move the file to this path.
    Rename(PathBuf),
    /// Nothing to rename to.
    Skip(SkipReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoBarcode,
    NoValidBarcode,
}

/// Work out the rename plan for `file` from its validated candidates.
pub async fn resolve_plan(
    candidates: &[ValidatedCandidate],
    file: &ImageFile,
    config: &RenameConfig,
) -> Result<RenamePlan, FileError> {
    if candidates.is_empty() {
        return Ok(RenamePlan::Skip(SkipReason::NoBarcode));
    }
    let Some(selected) = select(candidates) else {
        return Ok(RenamePlan::Skip(SkipReason::NoValidBarcode));
    };

    let target = apply_name_policy(&selected.text, config.name_policy)?;
    if same_name(&file.stem, &target) {
        return Ok(RenamePlan::NoOp);
    }

    let path = find_free_path(file, &target, config.max_collision_attempts).await?;
    debug!("{} → {}", file.path.display(), path.display());
    Ok(RenamePlan::Rename(path))
}

/// Case-insensitive comparison of two base names.
pub fn same_name(current: &str, target: &str) -> bool {
    current == target || current.to_lowercase() == target.to_lowercase()
}

/// Turn decoded text into a base name according to `policy`.
pub fn apply_name_policy(text: &str, policy: NamePolicy) -> Result<String, FileError> {
    let unsafe_name = || FileError::UnsafeName {
        name: text.to_string(),
    };

    match policy {
        NamePolicy::Verbatim => Ok(text.to_string()),
        NamePolicy::Reject => {
            if is_safe_name(text) {
                Ok(text.to_string())
            } else {
                Err(unsafe_name())
            }
        }
        NamePolicy::Replace(replacement) => {
            let replaced: String = text
                .chars()
                .map(|c| if is_unsafe_char(c) { replacement } else { c })
                .collect();
            let trimmed = replaced.trim_end_matches(['.', ' ']);
            if is_safe_name(trimmed) {
                Ok(trimmed.to_string())
            } else {
                Err(unsafe_name())
            }
        }
    }
}

/// A name that stays inside its directory on every common platform.
fn is_safe_name(name: &str) -> bool {
    !name.is_empty()
        && name != "."
        && name != ".."
        && !name.ends_with('.')
        && !name.ends_with(' ')
        && !name.chars().any(is_unsafe_char)
}

/// First of `target`, `target_1`, `target_2`, … that does not exist next to `file`.
async fn find_free_path(
    file: &ImageFile,
    target: &str,
    max_attempts: u32,
) -> Result<PathBuf, FileError> {
    let first = file.sibling(target);
    if !exists(&first).await {
        return Ok(first);
    }

    for n in 1..=max_attempts {
        let candidate = file.sibling(&format!("{target}_{n}"));
        if !exists(&candidate).await {
            debug!("{} taken, using suffix _{}", first.display(), n);
            return Ok(candidate);
        }
    }

    Err(FileError::IterationCapExceeded {
        target: target.to_string(),
        attempts: max_attempts,
    })
}

/// Existence check that treats "cannot tell" as taken.
pub(crate) async fn exists(path: &Path) -> bool {
    tokio::fs::try_exists(path).await.unwrap_or(true)
}
