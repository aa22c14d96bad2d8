//! Report builder.
//!
//! Pure construction of the persisted audit document. No I/O happens
//! here; the media crate owns persistence.

use std::collections::BTreeMap;

use chrono::Utc;

use snapsight_core::{
    ComparisonResult, Feature, FeatureOutcome, Report, ReportKind, ReportMetadata,
};

/// Wrap a settled analysis fan-out verbatim, with metadata.
pub fn build_analysis_report(
    results: BTreeMap<Feature, FeatureOutcome>,
    source: impl Into<String>,
) -> Report {
    Report {
        metadata: ReportMetadata {
            timestamp: Utc::now(),
            source: source.into(),
            kind: ReportKind::Analysis,
        },
        results: Some(results),
        comparison: None,
    }
}

/// Wrap a completed comparison verbatim, with metadata.
pub fn build_comparison_report(result: ComparisonResult, source: impl Into<String>) -> Report {
    Report {
        metadata: ReportMetadata {
            timestamp: Utc::now(),
            source: source.into(),
            kind: ReportKind::Comparison,
        },
        results: None,
        comparison: Some(result),
    }
}

/// Stable filename stem for a persisted report; the store appends a unique
/// suffix per request.
pub fn report_filename_hint(report: &Report) -> &'static str {
    match report.metadata.kind {
        ReportKind::Analysis => "analysis",
        ReportKind::Comparison => "comparison",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapsight_core::FaceMatch;

    #[test]
    fn analysis_report_preserves_every_record() {
        let mut results = BTreeMap::new();
        results.insert(
            Feature::Moderation,
            FeatureOutcome::Success {
                data: serde_json::json!({"ModerationLabels": []}),
            },
        );
        results.insert(
            Feature::Celebrities,
            FeatureOutcome::Failure {
                error: "throttled".into(),
            },
        );

        let report = build_analysis_report(results.clone(), "https://example.com/x.png");

        assert_eq!(report.metadata.kind, ReportKind::Analysis);
        assert_eq!(report.metadata.source, "https://example.com/x.png");
        assert_eq!(report.results, Some(results));
        assert_eq!(report_filename_hint(&report), "analysis");
    }

    #[test]
    fn comparison_report_carries_the_result() {
        let result = ComparisonResult {
            matched: vec![FaceMatch { similarity: 91.0 }],
            unmatched_count: 0,
        };
        let report = build_comparison_report(result.clone(), "uploaded file");

        assert_eq!(report.metadata.kind, ReportKind::Comparison);
        assert_eq!(report.comparison, Some(result));
        assert_eq!(report_filename_hint(&report), "comparison");
    }
}
