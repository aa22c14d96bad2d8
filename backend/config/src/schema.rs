//! Typed configuration schema.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SnapSightConfig {
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub discord: DiscordConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Vision-service credentials and region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default)]
    pub access_key_id: String,
    #[serde(default)]
    pub secret_access_key: String,
    #[serde(default)]
    pub session_token: Option<String>,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: default_region(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            session_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct DiscordConfig {
    #[serde(default)]
    pub token: String,
    /// Discord application ID, required for slash-command registration.
    #[serde(default)]
    pub app_id: u64,
    /// When set, commands register to this guild only (instant updates,
    /// useful for development); otherwise they register globally.
    #[serde(default)]
    pub guild_id: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_temp_dir")]
    pub temp_dir: String,
    #[serde(default = "default_max_image_bytes")]
    pub max_image_bytes: u64,
    /// Temp files older than this are deleted by the sweep.
    #[serde(default = "default_sweep_max_age_secs")]
    pub sweep_max_age_secs: u64,
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            max_image_bytes: default_max_image_bytes(),
            sweep_max_age_secs: default_sweep_max_age_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_dir")]
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            dir: default_log_dir(),
        }
    }
}

fn default_region() -> String {
    "us-east-1".into()
}

fn default_temp_dir() -> String {
    std::env::temp_dir()
        .join("snapsight")
        .to_string_lossy()
        .into_owned()
}

fn default_max_image_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_sweep_max_age_secs() -> u64 {
    30 * 60
}

fn default_sweep_interval_secs() -> u64 {
    5 * 60
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_dir() -> String {
    "logs".into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_yaml_yields_defaults() {
        let config: SnapSightConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.aws.region, "us-east-1");
        assert_eq!(config.media.max_image_bytes, 10 * 1024 * 1024);
        assert_eq!(config.media.sweep_max_age_secs, 1800);
        assert!(config.discord.guild_id.is_none());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: SnapSightConfig = serde_yaml::from_str(
            "aws:\n  region: eu-west-1\ndiscord:\n  token: abc\n  app_id: 42\n",
        )
        .unwrap();
        assert_eq!(config.aws.region, "eu-west-1");
        assert_eq!(config.discord.app_id, 42);
        assert_eq!(config.logging.level, "info");
    }
}
