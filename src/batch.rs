//! Batch entry points: run the pipeline over a list of files or a folder.
//!
//! Files are processed one after another in input order. A failure on one
//! file becomes that file's [`Outcome::Error`] and the batch moves on; only
//! setup problems (no decoder, unreadable folder) are returned as `Err`.

use crate::config::RenameConfig;
use crate::error::{FileError, RenameError};
use crate::output::{BatchReport, BatchStats, FileReport, Outcome};
use crate::pipeline::decode::{self, BarcodeDecoder};
use crate::pipeline::filter::{self, ValidatedCandidate};
use crate::pipeline::input::{self, display_name, ImageFile};
use crate::pipeline::rename;
use crate::pipeline::resolve::{self, RenamePlan, SkipReason};
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Log line emitted when a folder holds no supported images.
pub const NO_IMAGES_MESSAGE: &str = "No image files found in the selected folder";

/// Rename every file in `files` after the barcode it contains.
///
/// # Returns
/// `Ok(BatchReport)` with one [`FileReport`] per input, in input order, even
/// if every single file failed.
///
/// # Errors
/// Only [`RenameError::DecoderNotConfigured`] when no decoder is set and the
/// `rxing` feature is disabled.
pub async fn process_batch<P: AsRef<Path>>(
    files: &[P],
    config: &RenameConfig,
) -> Result<BatchReport, RenameError> {
    let start = Instant::now();
    let decoder = resolve_decoder(config)?;
    let total = files.len();
    info!("Starting batch of {} file(s), policy {}", total, config.length_policy);

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_start(total);
    }

    let mut log = Vec::new();
    let mut reports = Vec::with_capacity(total);

    for (index, path) in files.iter().enumerate() {
        let path: &Path = path.as_ref();
        if let Some(ref cb) = config.progress_callback {
            cb.on_file_start(index, total, path);
        }

        let report = process_file(path, &decoder, config, &mut log).await;
        log.push(String::new());

        if let Some(ref cb) = config.progress_callback {
            cb.on_file_complete(index, total, &report);
        }
        reports.push(report);
    }

    let mut stats = BatchStats::from_reports(&reports);
    stats.duration_ms = start.elapsed().as_millis() as u64;
    log.extend(summary_lines(&stats, config));

    info!(
        "Batch complete: {} renamed, {} skipped, {} errors in {}ms",
        stats.renamed,
        stats.skipped(),
        stats.errors,
        stats.duration_ms
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_batch_complete(&stats);
    }

    Ok(BatchReport {
        files: reports,
        log,
        stats,
    })
}

/// Process every supported image directly inside `dir`.
///
/// A folder without images yields a report holding only
/// [`NO_IMAGES_MESSAGE`] and no summary.
pub async fn process_folder(
    dir: impl AsRef<Path>,
    config: &RenameConfig,
) -> Result<BatchReport, RenameError> {
    let dir = dir.as_ref();
    let files = input::scan_folder(dir).await?;
    if files.is_empty() {
        info!("No images in {}", dir.display());
        return Ok(BatchReport {
            log: vec![NO_IMAGES_MESSAGE.to_string()],
            ..Default::default()
        });
    }
    process_batch(&files, config).await
}

/// Synchronous wrapper around [`process_batch`].
///
/// Creates a temporary tokio runtime internally.
pub fn process_batch_sync<P: AsRef<Path>>(
    files: &[P],
    config: &RenameConfig,
) -> Result<BatchReport, RenameError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| RenameError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(process_batch(files, config))
}

/// Lines shown before the first batch: greeting plus the active policy.
pub fn banner(config: &RenameConfig) -> Vec<String> {
    vec![
        "Welcome to Barcode Rename".to_string(),
        "Pass image files to rename them individually, or a folder to process all images in it"
            .to_string(),
        policy_line(config),
        String::new(),
    ]
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Use the configured decoder, or fall back to the built-in one.
fn resolve_decoder(config: &RenameConfig) -> Result<Arc<dyn BarcodeDecoder>, RenameError> {
    if let Some(ref decoder) = config.decoder {
        return Ok(Arc::clone(decoder));
    }

    #[cfg(feature = "rxing")]
    {
        Ok(Arc::new(decode::RxingDecoder))
    }

    #[cfg(not(feature = "rxing"))]
    {
        Err(RenameError::DecoderNotConfigured)
    }
}

/// Drive one file through read → decode → filter → resolve → rename.
async fn process_file(
    path: &Path,
    decoder: &Arc<dyn BarcodeDecoder>,
    config: &RenameConfig,
    log: &mut Vec<String>,
) -> FileReport {
    let name = display_name(path);
    debug!("Processing {}", path.display());

    let file = match ImageFile::read(path).await {
        Ok(f) => f,
        Err(e) => return failed(path, Vec::new(), e, config, log),
    };

    let decoded = decode::decode_candidates(decoder, Arc::clone(&file.bytes)).await;
    if decoded.is_empty() {
        return finished(path, Vec::new(), Outcome::SkippedNoBarcode, config, log);
    }

    log.push(format!("Found {} barcodes in: {name}", decoded.len()));
    let candidates = filter::filter_candidates(decoded, &config.length_policy);
    log.extend(candidates.iter().map(ValidatedCandidate::log_line));

    match rename_to_barcode(&candidates, &file, config).await {
        Ok(outcome) => finished(path, candidates, outcome, config, log),
        Err(e) => failed(path, candidates, e, config, log),
    }
}

/// Resolve and perform the rename.
async fn rename_to_barcode(
    candidates: &[ValidatedCandidate],
    file: &ImageFile,
    config: &RenameConfig,
) -> Result<Outcome, FileError> {
    rename_to_barcode_with(candidates, file, config, |from, to| {
        tokio::fs::rename(from, to)
    })
    .await
}

/// [`rename_to_barcode`] with the primitive rename supplied by the caller.
///
/// Re-resolves once if the target was taken between resolution and the move.
async fn rename_to_barcode_with<F, Fut>(
    candidates: &[ValidatedCandidate],
    file: &ImageFile,
    config: &RenameConfig,
    mut move_fn: F,
) -> Result<Outcome, FileError>
where
    F: FnMut(PathBuf, PathBuf) -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    let mut reresolved = false;
    loop {
        let target = match resolve::resolve_plan(candidates, file, config).await? {
            RenamePlan::NoOp => return Ok(Outcome::SkippedAlreadyNamed),
            RenamePlan::Skip(SkipReason::NoBarcode) => return Ok(Outcome::SkippedNoBarcode),
            RenamePlan::Skip(SkipReason::NoValidBarcode) => {
                return Ok(Outcome::SkippedNoValidBarcode)
            }
            RenamePlan::Rename(target) => target,
        };

        match rename::move_file_with(&file.path, &target, config, &mut move_fn).await {
            Ok(_) => {
                return Ok(Outcome::Renamed {
                    from: file.path.clone(),
                    to: target,
                })
            }
            Err(FileError::TargetAppeared { path }) if !reresolved => {
                debug!("{} was taken before rename, resolving again", path.display());
                reresolved = true;
            }
            Err(e) => return Err(e),
        }
    }
}

/// Record a per-file failure.
fn failed(
    path: &Path,
    candidates: Vec<ValidatedCandidate>,
    error: FileError,
    config: &RenameConfig,
    log: &mut Vec<String>,
) -> FileReport {
    let message = error.to_string();
    warn!("{}: {}", path.display(), message);
    finished(path, candidates, Outcome::Error { message }, config, log)
}

/// Log the terminal outcome of a file and wrap it in its report.
fn finished(
    path: &Path,
    candidates: Vec<ValidatedCandidate>,
    outcome: Outcome,
    config: &RenameConfig,
    log: &mut Vec<String>,
) -> FileReport {
    log.push(outcome_line(&display_name(path), &outcome, config));
    FileReport {
        path: path.to_path_buf(),
        candidates,
        outcome,
    }
}

fn outcome_line(name: &str, outcome: &Outcome, config: &RenameConfig) -> String {
    match outcome {
        Outcome::Renamed { from, to } => format!(
            "Renamed: {} -> {}",
            display_name(from),
            display_name(to)
        ),
        Outcome::SkippedNoBarcode => format!("No barcode found in: {name}"),
        Outcome::SkippedNoValidBarcode => format!(
            "Skipped: No barcode meets length requirement ({})",
            config.length_policy
        ),
        Outcome::SkippedAlreadyNamed => format!("Skipped: File already has correct name - {name}"),
        Outcome::Error { message } => format!("Error processing {name}: {message}"),
    }
}

fn policy_line(config: &RenameConfig) -> String {
    format!("Barcode length requirement: {}", config.length_policy)
}

fn summary_lines(stats: &BatchStats, config: &RenameConfig) -> Vec<String> {
    vec![
        String::new(),
        format!(
            "Process completed at: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        ),
        format!(
            "Renamed: {}, Skipped: {}, Errors: {} (of {} files)",
            stats.renamed,
            stats.skipped(),
            stats.errors,
            stats.total
        ),
        policy_line(config),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LengthPolicy;
    use crate::pipeline::decode::DecodedCandidate;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn valid(text: &str) -> Vec<ValidatedCandidate> {
        let decoded = vec![DecodedCandidate {
            index: 0,
            text: text.to_string(),
        }];
        filter::filter_candidates(decoded, &LengthPolicy::default())
    }

    fn image_in(dir: &Path, name: &str) -> ImageFile {
        let path = dir.join(name);
        std::fs::write(&path, b"img").unwrap();
        ImageFile::from_parts(&path, b"img".to_vec())
    }

    /// Rename that finds `to` occupied by someone else on its first `taken` calls.
    fn contested(
        taken: u32,
        calls: &AtomicU32,
    ) -> impl FnMut(PathBuf, PathBuf) -> std::future::Ready<io::Result<()>> + '_ {
        move |from, to| {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            std::future::ready(if n < taken {
                std::fs::write(&to, b"intruder")
                    .and_then(|_| Err(io::Error::from(io::ErrorKind::AlreadyExists)))
            } else {
                std::fs::rename(from, to)
            })
        }
    }

    #[tokio::test]
    async fn target_taken_before_move_is_resolved_again() {
        let dir = tempfile::tempdir().unwrap();
        let file = image_in(dir.path(), "photo.jpg");
        let calls = AtomicU32::new(0);

        let outcome = rename_to_barcode_with(
            &valid("1234567890"),
            &file,
            &RenameConfig::default(),
            contested(1, &calls),
        )
        .await
        .unwrap();

        assert_eq!(
            outcome,
            Outcome::Renamed {
                from: file.path.clone(),
                to: dir.path().join("1234567890_1.jpg"),
            }
        );
        assert_eq!(
            std::fs::read(dir.path().join("1234567890.jpg")).unwrap(),
            b"intruder"
        );
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn target_taken_twice_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = image_in(dir.path(), "photo.jpg");
        let calls = AtomicU32::new(0);

        let err = rename_to_barcode_with(
            &valid("1234567890"),
            &file,
            &RenameConfig::default(),
            contested(u32::MAX, &calls),
        )
        .await
        .unwrap_err();

        assert_eq!(
            err,
            FileError::TargetAppeared {
                path: dir.path().join("1234567890_1.jpg"),
            }
        );
        assert!(file.path.exists());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn every_outcome_has_a_log_line() {
        let config = RenameConfig::default();
        let line = |o: Outcome| outcome_line("a.jpg", &o, &config);
        assert_eq!(
            line(Outcome::Renamed {
                from: "/s/a.jpg".into(),
                to: "/s/1234567890.jpg".into(),
            }),
            "Renamed: a.jpg -> 1234567890.jpg"
        );
        assert_eq!(line(Outcome::SkippedNoBarcode), "No barcode found in: a.jpg");
        assert_eq!(
            line(Outcome::SkippedNoValidBarcode),
            "Skipped: No barcode meets length requirement (10-12 characters)"
        );
        assert_eq!(
            line(Outcome::SkippedAlreadyNamed),
            "Skipped: File already has correct name - a.jpg"
        );
        assert_eq!(
            line(Outcome::Error {
                message: "boom".into(),
            }),
            "Error processing a.jpg: boom"
        );
    }

    #[test]
    fn banner_restates_policy() {
        let config = RenameConfig::builder()
            .length_policy(LengthPolicy::new(8, 13))
            .build()
            .unwrap();
        let lines = banner(&config);
        assert_eq!(lines[0], "Welcome to Barcode Rename");
        assert_eq!(lines[2], "Barcode length requirement: 8-13 characters");
    }

    #[test]
    fn summary_counts() {
        let stats = BatchStats {
            total: 5,
            renamed: 2,
            skipped_no_barcode: 1,
            skipped_already_named: 1,
            errors: 1,
            ..Default::default()
        };
        let lines = summary_lines(&stats, &RenameConfig::default());
        assert_eq!(lines[0], "");
        assert!(lines[1].starts_with("Process completed at: "));
        assert_eq!(lines[2], "Renamed: 2, Skipped: 2, Errors: 1 (of 5 files)");
        assert_eq!(lines[3], "Barcode length requirement: 10-12 characters");
    }

    #[cfg(not(feature = "rxing"))]
    #[tokio::test]
    async fn missing_decoder_is_fatal() {
        let files: [&Path; 0] = [];
        let err = process_batch(&files, &RenameConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RenameError::DecoderNotConfigured));
    }
}
