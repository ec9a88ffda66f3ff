//! Progress-callback trait for per-file batch events.
//!
//! Inject an [`Arc<dyn BatchProgressCallback>`] via
//! [`crate::config::RenameConfigBuilder::progress_callback`] to receive events
//! as the batch processes each file. The CLI uses it to drive a progress bar;
//! a GUI shell can forward the same events to its own widgets.
//!
//! # Example
//!
//! ```rust
//! use barcode_rename::{BatchProgressCallback, FileReport, RenameConfig};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     done: AtomicUsize,
//! }
//!
//! impl BatchProgressCallback for CountingCallback {
//!     fn on_file_complete(&self, index: usize, total: usize, _report: &FileReport) {
//!         self.done.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{}/{}", index + 1, total);
//!     }
//! }
//!
//! let config = RenameConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { done: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::{BatchStats, FileReport};
use std::path::Path;
use std::sync::Arc;

/// Called by the batch processor as it works through the file list.
///
/// Files are processed sequentially, so events arrive in input order. All
/// methods have default no-op implementations so callers only override what
/// they care about.
pub trait BatchProgressCallback: Send + Sync {
    /// Called once before the first file is read.
    fn on_batch_start(&self, total_files: usize) {
        let _ = total_files;
    }

    /// Called before a file is read.
    ///
    /// # Arguments
    /// * `index`: 0-indexed position in the batch
    /// * `total`: number of files in the batch
    /// * `path` : the file about to be processed
    fn on_file_start(&self, index: usize, total: usize, path: &Path) {
        let _ = (index, total, path);
    }

    /// Called once the file has reached a terminal outcome.
    fn on_file_complete(&self, index: usize, total: usize, report: &FileReport) {
        let _ = (index, total, report);
    }

    /// Called once after every file has been attempted.
    fn on_batch_complete(&self, stats: &BatchStats) {
        let _ = stats;
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl BatchProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::RenameConfig`].
pub type ProgressCallback = Arc<dyn BatchProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::Outcome;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct TrackingCallback {
        starts: AtomicUsize,
        completes: AtomicUsize,
        total: AtomicUsize,
        renamed: AtomicUsize,
    }

    impl BatchProgressCallback for TrackingCallback {
        fn on_batch_start(&self, total_files: usize) {
            self.total.store(total_files, Ordering::SeqCst);
        }

        fn on_file_start(&self, _index: usize, _total: usize, _path: &Path) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_file_complete(&self, _index: usize, _total: usize, _report: &FileReport) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_batch_complete(&self, stats: &BatchStats) {
            self.renamed.store(stats.renamed, Ordering::SeqCst);
        }
    }

    fn report(outcome: Outcome) -> FileReport {
        FileReport {
            path: PathBuf::from("scan.jpg"),
            candidates: Vec::new(),
            outcome,
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_batch_start(2);
        cb.on_file_start(0, 2, Path::new("a.jpg"));
        cb.on_file_complete(0, 2, &report(Outcome::SkippedNoBarcode));
        cb.on_batch_complete(&BatchStats::default());
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_batch_start(2);
        tracker.on_file_start(0, 2, Path::new("a.jpg"));
        tracker.on_file_complete(0, 2, &report(Outcome::SkippedAlreadyNamed));
        tracker.on_file_start(1, 2, Path::new("b.jpg"));
        tracker.on_file_complete(
            1,
            2,
            &report(Outcome::Error {
                message: "boom".into(),
            }),
        );
        tracker.on_batch_complete(&BatchStats {
            total: 2,
            renamed: 1,
            ..Default::default()
        });

        assert_eq!(tracker.total.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.renamed.load(Ordering::SeqCst), 1);
    }
}
