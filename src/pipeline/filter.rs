//! Length filtering and candidate selection.

use crate::config::LengthPolicy;
use crate::pipeline::decode::DecodedCandidate;
use serde::{Deserialize, Serialize};

/// A decoded candidate tagged with the length-policy verdict.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedCandidate {
    pub index: usize,
    pub text: String,
    /// Character count of `text`.
    pub length: usize,
    pub is_valid: bool,
}

impl ValidatedCandidate {
    /// Log line for this candidate, e.g. `  - 1234567890 (Length: 10) [VALID]`.
    pub fn log_line(&self) -> String {
        format!(
            "  - {} (Length: {}) {}",
            self.text,
            self.length,
            if self.is_valid { "[VALID]" } else { "[INVALID]" }
        )
    }
}

/// Tag every candidate with `policy`, keeping order and duplicates.
pub fn filter_candidates(
    candidates: Vec<DecodedCandidate>,
    policy: &LengthPolicy,
) -> Vec<ValidatedCandidate> {
    candidates
        .into_iter()
        .map(|c| ValidatedCandidate {
            index: c.index,
            length: c.text.chars().count(),
            is_valid: policy.accepts(&c.text),
            text: c.text,
        })
        .collect()
}

/// The first valid candidate in decode order.
pub fn select(candidates: &[ValidatedCandidate]) -> Option<&ValidatedCandidate> {
    candidates.iter().find(|c| c.is_valid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(texts: &[&str]) -> Vec<DecodedCandidate> {
        texts
            .iter()
            .enumerate()
            .map(|(index, t)| DecodedCandidate {
                index,
                text: t.to_string(),
            })
            .collect()
    }

    #[test]
    fn validity_follows_bounds_and_order() {
        let out = filter_candidates(
            decoded(&["ABC", "1234567890", "XY"]),
            &LengthPolicy::default(),
        );
        let flags: Vec<bool> = out.iter().map(|c| c.is_valid).collect();
        assert_eq!(flags, vec![false, true, false]);
        assert_eq!(select(&out).unwrap().text, "1234567890");
    }

    #[test]
    fn duplicates_pass_through() {
        let out = filter_candidates(
            decoded(&["1234567890", "1234567890"]),
            &LengthPolicy::default(),
        );
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|c| c.is_valid));
        assert_eq!(select(&out).unwrap().index, 0);
    }

    #[test]
    fn first_valid_wins_regardless_of_content() {
        let policy = LengthPolicy::default();
        let a = filter_candidates(decoded(&["ZZZZZZZZZZ", "AAAAAAAAAA"]), &policy);
        assert_eq!(select(&a).unwrap().text, "ZZZZZZZZZZ");

        // Moving invalid candidates around the first valid one changes nothing.
        let b = filter_candidates(
            decoded(&["x", "ZZZZZZZZZZ", "y", "AAAAAAAAAA", "z"]),
            &policy,
        );
        assert_eq!(select(&b).unwrap().text, "ZZZZZZZZZZ");
    }

    #[test]
    fn none_valid_selects_nothing() {
        let out = filter_candidates(decoded(&["short", "waytoolongbarcode"]), &LengthPolicy::default());
        assert_eq!(out.len(), 2);
        assert!(select(&out).is_none());
    }

    #[test]
    fn log_line_format() {
        let out = filter_candidates(decoded(&["ABC"]), &LengthPolicy::default());
        assert_eq!(out[0].log_line(), "  - ABC (Length: 3) [INVALID]");
    }
}
