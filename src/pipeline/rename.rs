//! The move itself, with a bounded retry on transient "file busy" errors.
//!
//! ## Retry Strategy
//!
//! Right after an image has been read, some platforms (Windows with
//! antivirus or thumbnail indexers in particular) briefly refuse to move the
//! file. Instead of sleeping before every rename, the move is attempted
//! immediately and retried with exponential backoff
//! (`retry_backoff_ms * 2^(attempt-1)`) only when the error looks like a sharing
//! violation. With the default 100 ms base and 3 retries the worst case is
//! 100 ms → 200 ms → 400 ms.

use crate::config::RenameConfig;
use crate::error::FileError;
use crate::pipeline::resolve::exists;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use tokio::time::{sleep, Duration};
use tracing::{debug, warn};

/// Move `from` to `to` without ever replacing an existing file.
///
/// Returns the number of retries used. `FileError::TargetAppeared` means the
/// destination was taken after it was resolved; the caller should resolve
/// again rather than retry.
pub async fn move_file(from: &Path, to: &Path, config: &RenameConfig) -> Result<u32, FileError> {
    move_file_with(from, to, config, |from, to| tokio::fs::rename(from, to)).await
}

/// [`move_file`] with the primitive rename supplied by the caller.
pub(crate) async fn move_file_with<F, Fut>(
    from: &Path,
    to: &Path,
    config: &RenameConfig,
    mut rename: F,
) -> Result<u32, FileError>
where
    F: FnMut(PathBuf, PathBuf) -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    if config.settle_delay_ms > 0 {
        sleep(Duration::from_millis(config.settle_delay_ms)).await;
    }

    let mut attempt: u32 = 0;
    loop {
        if attempt > 0 {
            let backoff = backoff_ms(config.retry_backoff_ms, attempt);
            warn!(
                "{}: retry {}/{} after {}ms",
                from.display(),
                attempt,
                config.max_retries,
                backoff
            );
            sleep(Duration::from_millis(backoff)).await;
        }

        // std/tokio rename silently replaces an existing destination on Unix.
        if exists(to).await {
            return Err(FileError::TargetAppeared {
                path: to.to_path_buf(),
            });
        }

        match rename(from.to_path_buf(), to.to_path_buf()).await {
            Ok(()) => {
                debug!("Moved {} → {}", from.display(), to.display());
                return Ok(attempt);
            }
            // Windows refuses to replace an existing destination.
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                return Err(FileError::TargetAppeared {
                    path: to.to_path_buf(),
                });
            }
            Err(e) if is_transient(&e) && attempt < config.max_retries => {
                warn!("{}: attempt {} failed: {}", from.display(), attempt + 1, e);
                attempt += 1;
            }
            Err(e) => {
                return Err(FileError::RenameFailed {
                    from: from.to_path_buf(),
                    to: to.to_path_buf(),
                    attempts: attempt + 1,
                    detail: e.to_string(),
                });
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based), saturating instead of
/// overflowing for large retry counts.
fn backoff_ms(base_ms: u64, attempt: u32) -> u64 {
    base_ms.saturating_mul(2u64.saturating_pow(attempt.saturating_sub(1)))
}

/// Errors that usually clear up once another process lets go of the file.
fn is_transient(e: &io::Error) -> bool {
    if matches!(
        e.kind(),
        io::ErrorKind::ResourceBusy | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    ) {
        return true;
    }
    // ERROR_SHARING_VIOLATION / ERROR_LOCK_VIOLATION
    cfg!(windows) && matches!(e.raw_os_error(), Some(32) | Some(33))
}
