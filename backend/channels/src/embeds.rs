//! Embed presentation for analysis and comparison results.
//!
//! This is the only place allowed to be lossy: summaries are bounded to
//! the top 8 labels, 5 text lines, 3 celebrity matches, and the first
//! face's attributes. The attached JSON report carries everything.

use serenity::all::{CreateEmbed, CreateEmbedFooter};

use snapsight_core::{ComparisonResult, Feature, FeatureOutcome, Report, SightError};

pub const ACCENT_COLOR: u32 = 10181046;
pub const ERROR_COLOR: u32 = 15548997;

const MAX_LABELS: usize = 8;
const MAX_TEXT_LINES: usize = 5;
const MAX_CELEBRITIES: usize = 3;
/// Discord caps embed field values at 1024 characters.
const MAX_FIELD_CHARS: usize = 1024;

/// One embed field per requested feature, in feature order.
pub fn analysis_fields(report: &Report) -> Vec<(String, String)> {
    let Some(results) = report.results() else {
        return Vec::new();
    };

    results
        .iter()
        .map(|(feature, outcome)| {
            let value = match outcome {
                FeatureOutcome::Success { data } => summarize_feature(*feature, data),
                FeatureOutcome::Failure { error } => format!("⚠️ {error}"),
            };
            (title_case(feature), clip(&value))
        })
        .collect()
}

fn summarize_feature(feature: Feature, data: &serde_json::Value) -> String {
    match feature {
        Feature::Labels => {
            let lines = scored_names(&data["Labels"], "Name", "Confidence", MAX_LABELS);
            if lines.is_empty() {
                "No labels detected.".into()
            } else {
                lines.join("\n")
            }
        }
        Feature::Text => {
            let lines: Vec<String> = data["TextDetections"]
                .as_array()
                .map(|arr| {
                    arr.iter()
                        .filter(|t| t["Type"].as_str() == Some("LINE"))
                        .filter_map(|t| t["DetectedText"].as_str())
                        .take(MAX_TEXT_LINES)
                        .map(|s| s.to_string())
                        .collect()
                })
                .unwrap_or_default();
            if lines.is_empty() {
                "No text detected.".into()
            } else {
                lines.join("\n")
            }
        }
        Feature::Faces => summarize_first_face(data),
        Feature::Moderation => {
            let lines = scored_names(&data["ModerationLabels"], "Name", "Confidence", usize::MAX);
            if lines.is_empty() {
                "No moderation flags.".into()
            } else {
                lines.join("\n")
            }
        }
        Feature::Celebrities => {
            let lines = scored_names(
                &data["CelebrityFaces"],
                "Name",
                "MatchConfidence",
                MAX_CELEBRITIES,
            );
            if lines.is_empty() {
                "No celebrities recognized.".into()
            } else {
                lines.join("\n")
            }
        }
    }
}

/// Attributes of the first detected face only.
fn summarize_first_face(data: &serde_json::Value) -> String {
    let faces = data["FaceDetails"].as_array();
    let Some(face) = faces.and_then(|arr| arr.first()) else {
        return "No faces detected.".into();
    };

    let mut parts = Vec::new();
    if let (Some(low), Some(high)) = (
        face["AgeRange"]["Low"].as_i64(),
        face["AgeRange"]["High"].as_i64(),
    ) {
        parts.push(format!("Age {low}–{high}"));
    }
    if let Some(gender) = face["Gender"]["Value"].as_str() {
        parts.push(gender.to_string());
    }
    if face["Smile"]["Value"].as_bool() == Some(true) {
        parts.push("smiling".into());
    }
    if let Some(emotion) = top_emotion(face) {
        parts.push(format!("looks {}", emotion.to_lowercase()));
    }

    let total = faces.map(|arr| arr.len()).unwrap_or(0);
    let mut summary = if parts.is_empty() {
        "Face detected.".to_string()
    } else {
        parts.join(", ")
    };
    if total > 1 {
        summary.push_str(&format!(" ({} more face(s) in the report)", total - 1));
    }
    summary
}

fn top_emotion(face: &serde_json::Value) -> Option<String> {
    face["Emotions"]
        .as_array()?
        .iter()
        .max_by(|a, b| {
            let ca = a["Confidence"].as_f64().unwrap_or(0.0);
            let cb = b["Confidence"].as_f64().unwrap_or(0.0);
            ca.total_cmp(&cb)
        })?["Type"]
        .as_str()
        .map(str::to_string)
}

/// `Name (97.2%)` lines from an array of scored entries.
fn scored_names(value: &serde_json::Value, name_key: &str, score_key: &str, limit: usize) -> Vec<String> {
    value
        .as_array()
        .map(|arr| {
            arr.iter()
                .take(limit)
                .filter_map(|item| {
                    let name = item[name_key].as_str()?;
                    Some(match item[score_key].as_f64() {
                        Some(score) => format!("{name} ({score:.1}%)"),
                        None => name.to_string(),
                    })
                })
                .collect()
        })
        .unwrap_or_default()
}

pub fn comparison_description(result: &ComparisonResult) -> String {
    if result.matched.is_empty() {
        return format!(
            "No matching faces. {} face(s) in the target did not match.",
            result.unmatched_count
        );
    }
    let best = result
        .matched
        .iter()
        .map(|m| m.similarity)
        .fold(f32::MIN, f32::max);
    format!(
        "{} matching face(s), best similarity {best:.1}%. {} face(s) did not match.",
        result.matched.len(),
        result.unmatched_count
    )
}

/// Template for surfacing a failed operation to the user. Every failure
/// path still answers the interaction — no silent drops.
pub fn user_message(err: &SightError) -> String {
    // Transient fetch failures are the one class worth a retry prompt.
    if err.is_retryable() {
        return format!("I couldn't fetch the image ({err}). Please try again.");
    }
    match err {
        SightError::NoFaceDetected => {
            "I couldn't find a face in one of those images. Try clearer, front-facing photos."
                .to_string()
        }
        SightError::TooLarge { size, limit } => format!(
            "That image is too large ({size} bytes; the limit is {limit}). Please resize it."
        ),
        SightError::InvalidInput(message) => format!("I can't use that input: {message}"),
        other => format!("Something went wrong: {other}"),
    }
}

pub fn analysis_embed(report: &Report) -> CreateEmbed {
    let mut embed = CreateEmbed::new()
        .title("Image analysis")
        .description(format!("Source: {}", report.metadata.source))
        .colour(ACCENT_COLOR)
        .footer(CreateEmbedFooter::new("SnapSight — full report attached"));
    for (name, value) in analysis_fields(report) {
        embed = embed.field(name, value, false);
    }
    embed
}

pub fn comparison_embed(report: &Report) -> CreateEmbed {
    let description = report
        .comparison
        .as_ref()
        .map(comparison_description)
        .unwrap_or_default();
    CreateEmbed::new()
        .title("Face comparison")
        .description(description)
        .colour(ACCENT_COLOR)
        .footer(CreateEmbedFooter::new("SnapSight — full report attached"))
}

pub fn error_embed(message: &str) -> CreateEmbed {
    CreateEmbed::new()
        .title("Request failed")
        .description(clip(message))
        .colour(ERROR_COLOR)
}

fn title_case(feature: &Feature) -> String {
    let name = feature.name();
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn clip(value: &str) -> String {
    if value.chars().count() <= MAX_FIELD_CHARS {
        return value.to_string();
    }
    let clipped: String = value.chars().take(MAX_FIELD_CHARS - 1).collect();
    format!("{clipped}…")
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapsight_core::FaceMatch;
    use std::collections::BTreeMap;

    fn report_with(feature: Feature, outcome: FeatureOutcome) -> Report {
        let mut results = BTreeMap::new();
        results.insert(feature, outcome);
        snapsight_analysis::build_analysis_report(results, "test")
    }

    fn labels_payload(count: usize) -> serde_json::Value {
        let labels: Vec<_> = (0..count)
            .map(|i| serde_json::json!({"Name": format!("Label{i}"), "Confidence": 90.0}))
            .collect();
        serde_json::json!({ "Labels": labels })
    }

    #[test]
    fn labels_are_capped_at_eight() {
        let report = report_with(
            Feature::Labels,
            FeatureOutcome::Success {
                data: labels_payload(20),
            },
        );
        let fields = analysis_fields(&report);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields[0].0, "Labels");
        assert_eq!(fields[0].1.lines().count(), 8);
        assert!(fields[0].1.contains("Label0 (90.0%)"));
    }

    #[test]
    fn text_lines_are_capped_at_five_and_words_skipped() {
        let detections: Vec<_> = (0..10)
            .flat_map(|i| {
                vec![
                    serde_json::json!({"DetectedText": format!("line {i}"), "Type": "LINE"}),
                    serde_json::json!({"DetectedText": format!("word {i}"), "Type": "WORD"}),
                ]
            })
            .collect();
        let report = report_with(
            Feature::Text,
            FeatureOutcome::Success {
                data: serde_json::json!({ "TextDetections": detections }),
            },
        );
        let value = &analysis_fields(&report)[0].1;
        assert_eq!(value.lines().count(), 5);
        assert!(!value.contains("word"));
    }

    #[test]
    fn celebrities_are_capped_at_three() {
        let celebrities: Vec<_> = (0..6)
            .map(|i| serde_json::json!({"Name": format!("Star{i}"), "MatchConfidence": 88.0}))
            .collect();
        let report = report_with(
            Feature::Celebrities,
            FeatureOutcome::Success {
                data: serde_json::json!({ "CelebrityFaces": celebrities }),
            },
        );
        assert_eq!(analysis_fields(&report)[0].1.lines().count(), 3);
    }

    #[test]
    fn only_the_first_face_is_summarized() {
        let report = report_with(
            Feature::Faces,
            FeatureOutcome::Success {
                data: serde_json::json!({ "FaceDetails": [
                    {
                        "AgeRange": {"Low": 25, "High": 35},
                        "Gender": {"Value": "Female"},
                        "Smile": {"Value": true},
                        "Emotions": [
                            {"Type": "CALM", "Confidence": 60.0},
                            {"Type": "HAPPY", "Confidence": 90.0}
                        ]
                    },
                    { "AgeRange": {"Low": 1, "High": 3} }
                ]}),
            },
        );
        let value = &analysis_fields(&report)[0].1;
        assert!(value.contains("Age 25–35"));
        assert!(value.contains("Female"));
        assert!(value.contains("smiling"));
        assert!(value.contains("looks happy"));
        assert!(value.contains("1 more face"));
    }

    #[test]
    fn failed_features_render_their_error() {
        let report = report_with(
            Feature::Moderation,
            FeatureOutcome::Failure {
                error: "throttled".into(),
            },
        );
        let value = &analysis_fields(&report)[0].1;
        assert!(value.contains("⚠️"));
        assert!(value.contains("throttled"));
    }

    #[test]
    fn comparison_descriptions_cover_both_outcomes() {
        let matched = ComparisonResult {
            matched: vec![FaceMatch { similarity: 91.5 }, FaceMatch { similarity: 99.2 }],
            unmatched_count: 1,
        };
        let text = comparison_description(&matched);
        assert!(text.contains("2 matching face(s)"));
        assert!(text.contains("99.2%"));

        let unmatched = ComparisonResult {
            matched: vec![],
            unmatched_count: 3,
        };
        assert!(comparison_description(&unmatched).contains("No matching faces"));
    }

    #[test]
    fn no_face_error_gets_a_specific_message() {
        let message = user_message(&SightError::NoFaceDetected);
        assert!(message.contains("face"));
        assert!(!message.contains("Something went wrong"));
    }

    #[test]
    fn retryable_errors_invite_a_retry() {
        for err in [
            SightError::DownloadFailed("connection reset".into()),
            SightError::Timeout("fetching https://example.com/a.png".into()),
        ] {
            assert!(err.is_retryable());
            let message = user_message(&err);
            assert!(message.contains("try again"), "{message}");
        }

        let fatal = user_message(&SightError::Config("missing key".into()));
        assert!(!fatal.contains("try again"));
    }

    #[test]
    fn generic_errors_carry_the_raw_text() {
        let message = user_message(&SightError::Remote {
            operation: "detect_labels".into(),
            message: "internal failure".into(),
        });
        assert!(message.contains("internal failure"));
    }

    #[test]
    fn long_field_values_are_clipped() {
        let long = "x".repeat(5000);
        assert!(clip(&long).chars().count() <= MAX_FIELD_CHARS);
    }
}
