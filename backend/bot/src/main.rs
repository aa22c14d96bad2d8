//! SnapSight entry point — wires config, logging, the vision client, the
//! temp store and its sweep loop, and the Discord adapter together.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use snapsight_channels::{DiscordAdapter, DiscordSettings};
use snapsight_config::SnapSightConfig;
use snapsight_media::TempStore;
use snapsight_vision::sigv4::Credentials;
use snapsight_vision::{RekognitionClient, RekognitionConfig, VisionBackend};

#[derive(Parser)]
#[command(name = "snapsight")]
#[command(about = "SnapSight — image analysis bot for Discord")]
#[command(version)]
struct Cli {
    /// Path to the YAML config file
    #[arg(short, long, default_value = "snapsight.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Connect to Discord and serve slash commands
    Serve,
    /// Validate the configuration and print a redacted summary
    CheckConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = snapsight_config::load_and_prepare(&cli.config).await?;

    match cli.command {
        Commands::CheckConfig => {
            println!("ok: {}", snapsight_config::redacted_summary(&config));
            Ok(())
        }
        Commands::Serve => serve(config).await,
    }
}

async fn serve(config: SnapSightConfig) -> Result<()> {
    snapsight_logging::init_logger(&config.logging.dir, &config.logging.level);
    info!("SnapSight starting: {}", snapsight_config::redacted_summary(&config));

    let backend: Arc<dyn VisionBackend> = Arc::new(RekognitionClient::new(RekognitionConfig {
        region: config.aws.region.clone(),
        credentials: Credentials {
            access_key_id: config.aws.access_key_id.clone(),
            secret_access_key: config.aws.secret_access_key.clone(),
            session_token: config.aws.session_token.clone(),
        },
    }));

    let store = Arc::new(TempStore::new(&config.media.temp_dir));
    spawn_sweep_loop(
        Arc::clone(&store),
        Duration::from_secs(config.media.sweep_interval_secs),
        Duration::from_secs(config.media.sweep_max_age_secs),
    );

    let adapter = DiscordAdapter::new(
        DiscordSettings {
            token: config.discord.token.clone(),
            app_id: config.discord.app_id,
            guild_id: config.discord.guild_id,
            max_image_bytes: config.media.max_image_bytes,
        },
        backend,
        store,
    );

    adapter.start().await
}

/// Periodically delete temp files older than `max_age`. The sweep is
/// age-based, so it runs safely alongside in-flight writes of newer files.
fn spawn_sweep_loop(store: Arc<TempStore>, interval: Duration, max_age: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            ticker.tick().await;
            match store.sweep(max_age).await {
                Ok(0) => {}
                Ok(removed) => info!(removed, "Swept temp files"),
                Err(e) => error!("Temp sweep failed: {e}"),
            }
        }
    });
}
