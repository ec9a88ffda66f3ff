//! Result types produced by a batch run.
//!
//! Everything here is plain data with serde derives so the CLI can emit the
//! whole [`BatchReport`] as JSON and tests can assert on outcomes directly
//! instead of parsing log lines.

use crate::pipeline::filter::ValidatedCandidate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Terminal classification of one input file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Outcome {
    /// The file was moved to a name derived from its barcode.
    Renamed { from: PathBuf, to: PathBuf },
    /// The decoder found nothing in the image.
    SkippedNoBarcode,
    /// Barcodes were found but none satisfies the length policy.
    SkippedNoValidBarcode,
    /// The file already carries the selected barcode as its name.
    SkippedAlreadyNamed,
    /// Reading, resolving or renaming failed.
    Error { message: String },
}

impl Outcome {
    pub fn is_renamed(&self) -> bool {
        matches!(self, Outcome::Renamed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(
            self,
            Outcome::SkippedNoBarcode
                | Outcome::SkippedNoValidBarcode
                | Outcome::SkippedAlreadyNamed
        )
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error { .. })
    }
}

/// Outcome of one file plus every candidate that was decoded from it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    /// Path as supplied by the caller.
    pub path: PathBuf,
    /// All decoded candidates in decode order, valid or not.
    pub candidates: Vec<ValidatedCandidate>,
    pub outcome: Outcome,
}

/// Counters for a finished batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchStats {
    pub total: usize,
    pub renamed: usize,
    pub skipped_no_barcode: usize,
    pub skipped_no_valid_barcode: usize,
    pub skipped_already_named: usize,
    pub errors: usize,
    pub duration_ms: u64,
}

impl BatchStats {
    /// Tally the outcomes of `reports`.
    pub fn from_reports(reports: &[FileReport]) -> Self {
        let mut stats = BatchStats {
            total: reports.len(),
            ..Default::default()
        };
        for r in reports {
            match r.outcome {
                Outcome::Renamed { .. } => stats.renamed += 1,
                Outcome::SkippedNoBarcode => stats.skipped_no_barcode += 1,
                Outcome::SkippedNoValidBarcode => stats.skipped_no_valid_barcode += 1,
                Outcome::SkippedAlreadyNamed => stats.skipped_already_named += 1,
                Outcome::Error { .. } => stats.errors += 1,
            }
        }
        stats
    }

    /// All skip reasons combined.
    pub fn skipped(&self) -> usize {
        self.skipped_no_barcode + self.skipped_no_valid_barcode + self.skipped_already_named
    }
}

/// Everything a batch run produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    /// One report per input file, in input order.
    pub files: Vec<FileReport>,
    /// Human-readable log, ending with the summary block.
    pub log: Vec<String>,
    pub stats: BatchStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(outcome: Outcome) -> FileReport {
        FileReport {
            path: PathBuf::from("x.png"),
            candidates: Vec::new(),
            outcome,
        }
    }

    #[test]
    fn stats_tally_every_variant() {
        let reports = vec![
            report(Outcome::Renamed {
                from: "a.png".into(),
                to: "1234567890.png".into(),
            }),
            report(Outcome::SkippedNoBarcode),
            report(Outcome::SkippedNoValidBarcode),
            report(Outcome::SkippedAlreadyNamed),
            report(Outcome::SkippedAlreadyNamed),
            report(Outcome::Error {
                message: "denied".into(),
            }),
        ];
        let stats = BatchStats::from_reports(&reports);
        assert_eq!(stats.total, 6);
        assert_eq!(stats.renamed, 1);
        assert_eq!(stats.skipped(), 4);
        assert_eq!(stats.skipped_already_named, 2);
        assert_eq!(stats.errors, 1);
    }

    #[test]
    fn outcome_serialises_with_kind_tag() {
        let json = serde_json::to_string(&Outcome::SkippedNoBarcode).unwrap();
        assert_eq!(json, r#"{"kind":"skipped_no_barcode"}"#);

        let json = serde_json::to_value(Outcome::Error {
            message: "x".into(),
        })
        .unwrap();
        assert_eq!(json["kind"], "error");
        assert_eq!(json["message"], "x");
    }
}
