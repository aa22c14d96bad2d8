//! Startup validation — fail fast on missing required settings.

use thiserror::Error;

use crate::schema::SnapSightConfig;

#[derive(Debug, Error)]
#[error("invalid configuration: {}", problems.join("; "))]
pub struct ConfigValidationError {
    pub problems: Vec<String>,
}

/// Check that everything required to serve requests is present.
pub fn validate(config: &SnapSightConfig) -> Result<(), ConfigValidationError> {
    let mut problems = Vec::new();

    if config.aws.access_key_id.is_empty() {
        problems.push("aws.access_key_id is required (or set AWS_ACCESS_KEY_ID)".to_string());
    }
    if config.aws.secret_access_key.is_empty() {
        problems.push("aws.secret_access_key is required (or set AWS_SECRET_ACCESS_KEY)".to_string());
    }
    if config.aws.region.is_empty() {
        problems.push("aws.region must not be empty".to_string());
    }
    if config.discord.token.is_empty() {
        problems.push("discord.token is required (or set DISCORD_TOKEN)".to_string());
    }
    if config.discord.app_id == 0 {
        problems.push("discord.app_id is required (or set DISCORD_APP_ID)".to_string());
    }
    if config.media.max_image_bytes == 0 {
        problems.push("media.max_image_bytes must be positive".to_string());
    }
    if config.media.sweep_interval_secs == 0 {
        problems.push("media.sweep_interval_secs must be positive".to_string());
    }

    if problems.is_empty() {
        Ok(())
    } else {
        Err(ConfigValidationError { problems })
    }
}
