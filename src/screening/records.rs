//! Screening result records.
//!
//! [`MatchRecord`] is the engine's only output type; export collaborators
//! (CSV, spreadsheets, dashboards) render it however they like.

use serde::{Deserialize, Serialize};

/// Matched-name sentinel emitted in best-match mode when a query matched
/// nothing (best score 0, or no references at all).
pub const NO_MATCH: &str = "No match";

/// Outcome of comparing one query against one reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Original query string, unmodified
    pub query_name: String,

    /// Original text of the best-matching reference alias, or [`NO_MATCH`]
    pub matched_name: String,

    /// Blended similarity score in [0, 100], two-decimal precision
    pub score: f64,

    /// Whether `score >= threshold` for the run's configuration
    pub flagged: bool,
}

impl MatchRecord {
    /// True when this record carries the [`NO_MATCH`] sentinel
    pub fn is_no_match(&self) -> bool {
        self.matched_name == NO_MATCH
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_detectable() {
        let record = MatchRecord {
            query_name: "Nobody".to_string(),
            matched_name: NO_MATCH.to_string(),
            score: 0.0,
            flagged: false,
        };
        assert!(record.is_no_match());
    }

    #[test]
    fn records_serialize_for_export() {
        let record = MatchRecord {
            query_name: "John Smith".to_string(),
            matched_name: "Jon Smyth".to_string(),
            score: 96.67,
            flagged: true,
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"query_name\":\"John Smith\""));
        assert!(json.contains("\"flagged\":true"));

        let back: MatchRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
