use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// One image payload submitted for analysis or comparison.
///
/// Immutable once constructed; owned by the request that built it and
/// discarded when the request completes.
#[derive(Debug, Clone)]
pub struct ImageInput {
    data: Bytes,
    source: String,
    mime_type: String,
}

impl ImageInput {
    pub fn new(data: Bytes, source: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            data,
            source: source.into(),
            mime_type: mime_type.into(),
        }
    }

    /// Raw image bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Cheaply-clonable handle to the payload, for fan-out tasks.
    pub fn bytes(&self) -> Bytes {
        self.data.clone()
    }

    /// Human-readable source descriptor (URL or upload label).
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// One independently-invokable analysis capability of the vision service.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Labels,
    Text,
    Faces,
    Moderation,
    Celebrities,
}

impl Feature {
    /// The full feature set, in canonical order. The `all` sentinel in
    /// user input expands to this before reaching the orchestrator.
    pub const ALL: [Feature; 5] = [
        Feature::Labels,
        Feature::Text,
        Feature::Faces,
        Feature::Moderation,
        Feature::Celebrities,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Feature::Labels => "labels",
            Feature::Text => "text",
            Feature::Faces => "faces",
            Feature::Moderation => "moderation",
            Feature::Celebrities => "celebrities",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for unknown feature names. Unknown names are rejected eagerly
/// rather than silently ignored.
#[derive(Debug, thiserror::Error)]
#[error("unknown feature \"{0}\" (expected one of: labels, text, faces, moderation, celebrities, all)")]
pub struct ParseFeatureError(pub String);

impl FromStr for Feature {
    type Err = ParseFeatureError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "labels" => Ok(Feature::Labels),
            "text" => Ok(Feature::Text),
            "faces" => Ok(Feature::Faces),
            "moderation" => Ok(Feature::Moderation),
            "celebrities" => Ok(Feature::Celebrities),
            other => Err(ParseFeatureError(other.to_string())),
        }
    }
}

/// The settled outcome of one feature's remote call.
///
/// Every requested feature produces exactly one outcome — success with the
/// remote service's payload kept opaque, or a failure record with the
/// remote-provided message. Never both, never neither.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FeatureOutcome {
    Success { data: serde_json::Value },
    Failure { error: String },
}

impl FeatureOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FeatureOutcome::Success { .. })
    }

    pub fn data(&self) -> Option<&serde_json::Value> {
        match self {
            FeatureOutcome::Success { data } => Some(data),
            FeatureOutcome::Failure { .. } => None,
        }
    }
}

/// One matched face pair from a comparison, with the service's similarity
/// score as a percentage in [0, 100].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FaceMatch {
    pub similarity: f32,
}

/// Result of a single face comparison call. Atomic: either the whole
/// comparison succeeded or the call failed — there is no per-face
/// partial-failure state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ComparisonResult {
    /// Faces in the target that matched the source face at or above the
    /// requested threshold, in the order the service returned them.
    pub matched: Vec<FaceMatch>,
    /// Faces in the target that did not match.
    pub unmatched_count: usize,
}

/// Minimum similarity for two faces to count as a match.
///
/// Stored normalized in [0, 1]; supplied by users as a percentage in
/// [0, 100] and converted back to a percentage for the remote call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SimilarityThreshold(f32);

impl SimilarityThreshold {
    /// Default threshold used when the caller does not supply one.
    pub const DEFAULT: SimilarityThreshold = SimilarityThreshold(0.8);

    /// Build from a normalized fraction in [0, 1].
    pub fn new(fraction: f32) -> Result<Self, String> {
        if !(0.0..=1.0).contains(&fraction) || !fraction.is_finite() {
            return Err(format!("threshold must be in [0, 1], got {fraction}"));
        }
        Ok(Self(fraction))
    }

    /// Build from a user-supplied percentage in [0, 100].
    pub fn from_percent(percent: f32) -> Result<Self, String> {
        if !(0.0..=100.0).contains(&percent) || !percent.is_finite() {
            return Err(format!("threshold must be in [0, 100], got {percent}"));
        }
        Ok(Self(percent / 100.0))
    }

    /// Normalized fraction in [0, 1].
    pub fn as_fraction(&self) -> f32 {
        self.0
    }

    /// Percentage in [0, 100], the form the remote call expects.
    pub fn as_percent(&self) -> f32 {
        self.0 * 100.0
    }
}

impl Default for SimilarityThreshold {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn feature_parses_known_names() {
        assert_eq!("labels".parse::<Feature>().unwrap(), Feature::Labels);
        assert_eq!(" Moderation ".parse::<Feature>().unwrap(), Feature::Moderation);
    }

    #[test]
    fn feature_rejects_unknown_names() {
        let err = "landmarks".parse::<Feature>().unwrap_err();
        assert!(err.to_string().contains("landmarks"));
    }

    #[test]
    fn feature_all_covers_every_variant() {
        assert_eq!(Feature::ALL.len(), 5);
        for f in Feature::ALL {
            assert_eq!(f.name().parse::<Feature>().unwrap(), f);
        }
    }

    #[test]
    fn outcome_serialization_is_tagged() {
        let ok = FeatureOutcome::Success {
            data: serde_json::json!({"Labels": []}),
        };
        let json = serde_json::to_value(&ok).unwrap();
        assert_eq!(json["status"], "success");

        let failed = FeatureOutcome::Failure {
            error: "throttled".into(),
        };
        let json = serde_json::to_value(&failed).unwrap();
        assert_eq!(json["status"], "failure");
        assert_eq!(json["error"], "throttled");
    }

    #[test]
    fn threshold_normalizes_percentages() {
        let t = SimilarityThreshold::from_percent(75.0).unwrap();
        assert!((t.as_fraction() - 0.75).abs() < f32::EPSILON);
        assert!((t.as_percent() - 75.0).abs() < f32::EPSILON);
    }

    #[test]
    fn threshold_rejects_out_of_range() {
        assert!(SimilarityThreshold::from_percent(101.0).is_err());
        assert!(SimilarityThreshold::from_percent(-1.0).is_err());
        assert!(SimilarityThreshold::new(1.5).is_err());
    }

    #[test]
    fn default_threshold_is_eighty_percent() {
        assert!((SimilarityThreshold::default().as_percent() - 80.0).abs() < f32::EPSILON);
    }
}
