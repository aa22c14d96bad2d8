//! Persisted report documents.
//!
//! A report is the audit artifact for one analysis or comparison: it
//! preserves every feature's success/failure record verbatim. Any lossy
//! rendering (top-N labels, truncated text) belongs to the presentation
//! layer, never here. Construction lives in the analysis crate's report
//! builder.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ComparisonResult, Feature, FeatureOutcome};

/// What kind of operation produced the report.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ReportKind {
    Analysis,
    Comparison,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportMetadata {
    pub timestamp: DateTime<Utc>,
    /// Human-readable description of where the image came from.
    pub source: String,
    pub kind: ReportKind,
}

/// Immutable, serializable record of one completed operation.
///
/// Built once from a settled fan-out (or a single comparison call), never
/// mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Report {
    pub metadata: ReportMetadata,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<BTreeMap<Feature, FeatureOutcome>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparison: Option<ComparisonResult>,
}

impl Report {
    pub fn results(&self) -> Option<&BTreeMap<Feature, FeatureOutcome>> {
        self.results.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::FaceMatch;

    #[test]
    fn analysis_report_round_trips_without_loss() {
        let mut results = BTreeMap::new();
        results.insert(
            Feature::Labels,
            FeatureOutcome::Success {
                data: serde_json::json!({"Labels": [{"Name": "Dog", "Confidence": 97.2}]}),
            },
        );
        results.insert(
            Feature::Faces,
            FeatureOutcome::Failure {
                error: "ProvisionedThroughputExceededException".into(),
            },
        );
        let report = Report {
            metadata: ReportMetadata {
                timestamp: Utc::now(),
                source: "https://example.com/dog.jpg".into(),
                kind: ReportKind::Analysis,
            },
            results: Some(results),
            comparison: None,
        };

        let json = serde_json::to_string(&report).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed, report);
        let results = parsed.results().unwrap();
        assert!(results[&Feature::Labels].is_success());
        assert!(!results[&Feature::Faces].is_success());
        assert!(parsed.comparison.is_none());

        // Feature keys serialize as their names.
        let value = serde_json::to_value(&report).unwrap();
        assert!(value["results"].get("labels").is_some());
        assert!(value["results"].get("text").is_none());
    }

    #[test]
    fn comparison_report_round_trips() {
        let result = ComparisonResult {
            matched: vec![FaceMatch { similarity: 99.1 }],
            unmatched_count: 2,
        };
        let report = Report {
            metadata: ReportMetadata {
                timestamp: Utc::now(),
                source: "uploaded file".into(),
                kind: ReportKind::Comparison,
            },
            results: None,
            comparison: Some(result.clone()),
        };

        let json = serde_json::to_string(&report).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();

        assert_eq!(parsed.metadata.kind, ReportKind::Comparison);
        assert_eq!(parsed.comparison.unwrap(), result);
        assert!(parsed.results.is_none());
    }
}
