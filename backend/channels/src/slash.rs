//! Slash-command definitions and option parsing.
//!
//! Parsing happens here, before any remote work: the `all` sentinel
//! expands to the full feature set and unknown feature names are rejected
//! eagerly with a user-facing message.

use std::collections::BTreeSet;

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption};

use snapsight_core::{Feature, SimilarityThreshold};

/// The command set registered with Discord.
pub fn command_definitions() -> Vec<CreateCommand> {
    vec![
        CreateCommand::new("analyze")
            .description("Analyze an image with the vision service")
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Attachment,
                    "image",
                    "Image to analyze",
                )
                .required(false),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "image_url",
                    "URL of an image to analyze",
                )
                .required(false),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    "features",
                    "Comma-separated: labels, text, faces, moderation, celebrities, all",
                )
                .required(false),
            ),
        CreateCommand::new("compare")
            .description("Compare the face in one image against another")
            .add_option(
                CreateCommandOption::new(CommandOptionType::Attachment, "source", "Source face")
                    .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Attachment,
                    "target",
                    "Image to search for that face",
                )
                .required(true),
            )
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::Number,
                    "threshold",
                    "Minimum similarity percentage (default 80)",
                )
                .required(false),
            ),
    ]
}

/// Parse the `features` option. Absent or blank means everything.
pub fn parse_feature_list(input: Option<&str>) -> Result<BTreeSet<Feature>, String> {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Feature::ALL.into_iter().collect());
    };

    let mut features = BTreeSet::new();
    for token in raw.split(',').map(str::trim).filter(|t| !t.is_empty()) {
        if token.eq_ignore_ascii_case("all") {
            features.extend(Feature::ALL);
            continue;
        }
        let feature = token.parse::<Feature>().map_err(|e| e.to_string())?;
        features.insert(feature);
    }

    if features.is_empty() {
        return Err("no valid features requested".to_string());
    }
    Ok(features)
}

/// Parse the optional `threshold` percentage.
pub fn parse_threshold(input: Option<f64>) -> Result<SimilarityThreshold, String> {
    match input {
        None => Ok(SimilarityThreshold::default()),
        Some(percent) => SimilarityThreshold::from_percent(percent as f32),
    }
}
