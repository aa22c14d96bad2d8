//! Discord adapter.
//!
//! Receives `/analyze` and `/compare` interactions, defers them, runs the
//! analysis core, and edits the deferred response with an embed plus the
//! persisted JSON report attached. Every failure path still answers the
//! interaction.

use std::sync::Arc;

use async_trait::async_trait;
use serenity::all::{
    ApplicationId, Attachment, Client, Command, CommandInteraction, Context, CreateAttachment,
    CreateEmbed, EditInteractionResponse, EventHandler, GatewayIntents, GuildId, Interaction,
    Ready, ResolvedOption, ResolvedValue,
};
use tracing::{error, info};

use snapsight_analysis::{
    build_analysis_report, build_comparison_report, compare_faces, report_filename_hint,
    run_analyses,
};
use snapsight_core::{ImageInput, Report, SightError, SimilarityThreshold};
use snapsight_media::{fetch_image, image_from_upload, TempStore};
use snapsight_vision::VisionBackend;

use crate::embeds;
use crate::slash;

#[derive(Debug, Clone)]
pub struct DiscordSettings {
    pub token: String,
    pub app_id: u64,
    /// When set, commands register to this guild only.
    pub guild_id: Option<u64>,
    pub max_image_bytes: u64,
}

pub struct DiscordAdapter {
    settings: DiscordSettings,
    state: Arc<BotState>,
}

struct BotState {
    backend: Arc<dyn VisionBackend>,
    store: Arc<TempStore>,
    http: reqwest::Client,
    max_image_bytes: u64,
    guild_id: Option<u64>,
}

impl DiscordAdapter {
    pub fn new(
        settings: DiscordSettings,
        backend: Arc<dyn VisionBackend>,
        store: Arc<TempStore>,
    ) -> Self {
        let state = Arc::new(BotState {
            backend,
            store,
            http: reqwest::Client::new(),
            max_image_bytes: settings.max_image_bytes,
            guild_id: settings.guild_id,
        });
        Self { settings, state }
    }

    /// Connect to the gateway and serve interactions until shutdown.
    pub async fn start(&self) -> anyhow::Result<()> {
        info!("Starting Discord adapter");

        let mut client = Client::builder(&self.settings.token, GatewayIntents::empty())
            .application_id(ApplicationId::new(self.settings.app_id))
            .event_handler(Handler {
                state: Arc::clone(&self.state),
            })
            .await?;

        client.start().await?;
        Ok(())
    }
}

struct Handler {
    state: Arc<BotState>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn ready(&self, ctx: Context, ready: Ready) {
        info!("{} is connected", ready.user.name);

        let definitions = slash::command_definitions();
        let registered = match self.state.guild_id {
            Some(guild) => {
                GuildId::new(guild)
                    .set_commands(&ctx.http, definitions)
                    .await
            }
            None => Command::set_global_commands(&ctx.http, definitions).await,
        };
        match registered {
            Ok(commands) => info!(count = commands.len(), "Registered slash commands"),
            Err(e) => error!("Failed to register slash commands: {e}"),
        }
    }

    async fn interaction_create(&self, ctx: Context, interaction: Interaction) {
        let Interaction::Command(command) = interaction else {
            return;
        };

        // Remote calls take longer than the 3-second interaction window.
        if let Err(e) = command.defer(&ctx.http).await {
            error!("Failed to defer interaction: {e}");
            return;
        }

        let result = match command.data.name.as_str() {
            "analyze" => self.state.handle_analyze(&command).await,
            "compare" => self.state.handle_compare(&command).await,
            other => Err(SightError::InvalidInput(format!("unknown command /{other}"))),
        };

        let edit = match result {
            Ok(reply) => reply.into_edit(),
            Err(err) => {
                error!(command = %command.data.name, error = %err, "Command failed");
                EditInteractionResponse::new()
                    .embed(embeds::error_embed(&embeds::user_message(&err)))
            }
        };

        if let Err(e) = command.edit_response(&ctx.http, edit).await {
            error!("Failed to edit interaction response: {e}");
        }
    }
}

/// A successful reply: summary embed plus the full report as a file.
struct CommandReply {
    embed: CreateEmbed,
    report_json: Vec<u8>,
    filename: String,
}

impl CommandReply {
    fn into_edit(self) -> EditInteractionResponse {
        EditInteractionResponse::new()
            .embed(self.embed)
            .new_attachment(CreateAttachment::bytes(self.report_json, self.filename))
    }
}

impl BotState {
    async fn handle_analyze(&self, command: &CommandInteraction) -> Result<CommandReply, SightError> {
        let mut attachment: Option<&Attachment> = None;
        let mut image_url: Option<&str> = None;
        let mut features_raw: Option<&str> = None;
        for option in command.data.options() {
            match option {
                ResolvedOption {
                    name: "image",
                    value: ResolvedValue::Attachment(att),
                    ..
                } => attachment = Some(att),
                ResolvedOption {
                    name: "image_url",
                    value: ResolvedValue::String(s),
                    ..
                } => image_url = Some(s),
                ResolvedOption {
                    name: "features",
                    value: ResolvedValue::String(s),
                    ..
                } => features_raw = Some(s),
                _ => {}
            }
        }

        let features = slash::parse_feature_list(features_raw).map_err(SightError::InvalidInput)?;

        let image = match (attachment, image_url) {
            (Some(att), _) => self.attachment_image(att).await?,
            (None, Some(url)) => fetch_image(&self.http, url, self.max_image_bytes).await?,
            (None, None) => {
                return Err(SightError::InvalidInput(
                    "provide either an image attachment or an image_url".into(),
                ))
            }
        };

        let results = run_analyses(Arc::clone(&self.backend), &image, &features).await?;
        let report = build_analysis_report(results, image.source());
        let (json, filename) = self.persist(&report).await?;

        Ok(CommandReply {
            embed: embeds::analysis_embed(&report),
            report_json: json,
            filename,
        })
    }

    async fn handle_compare(&self, command: &CommandInteraction) -> Result<CommandReply, SightError> {
        let mut source: Option<&Attachment> = None;
        let mut target: Option<&Attachment> = None;
        let mut threshold_raw: Option<f64> = None;
        for option in command.data.options() {
            match option {
                ResolvedOption {
                    name: "source",
                    value: ResolvedValue::Attachment(att),
                    ..
                } => source = Some(att),
                ResolvedOption {
                    name: "target",
                    value: ResolvedValue::Attachment(att),
                    ..
                } => target = Some(att),
                ResolvedOption {
                    name: "threshold",
                    value: ResolvedValue::Number(n),
                    ..
                } => threshold_raw = Some(n),
                _ => {}
            }
        }

        let (Some(source), Some(target)) = (source, target) else {
            return Err(SightError::InvalidInput(
                "both source and target images are required".into(),
            ));
        };
        let threshold: SimilarityThreshold =
            slash::parse_threshold(threshold_raw).map_err(SightError::InvalidInput)?;

        let source_image = self.attachment_image(source).await?;
        let target_image = self.attachment_image(target).await?;

        let result =
            compare_faces(self.backend.as_ref(), &source_image, &target_image, threshold).await?;
        let report = build_comparison_report(
            result,
            format!("{} vs {}", source_image.source(), target_image.source()),
        );
        let (json, filename) = self.persist(&report).await?;

        Ok(CommandReply {
            embed: embeds::comparison_embed(&report),
            report_json: json,
            filename,
        })
    }

    /// Download a Discord attachment through the same validation path as
    /// URL submissions, relabelled as an upload.
    async fn attachment_image(&self, attachment: &Attachment) -> Result<ImageInput, SightError> {
        if u64::from(attachment.size) > self.max_image_bytes {
            return Err(SightError::TooLarge {
                size: u64::from(attachment.size),
                limit: self.max_image_bytes,
            });
        }
        let fetched = fetch_image(&self.http, &attachment.url, self.max_image_bytes).await?;
        // Re-validate as an upload so the source label and MIME fallback
        // come from the attachment itself, not the CDN URL.
        image_from_upload(
            fetched.bytes(),
            &attachment.filename,
            attachment.content_type.as_deref().or(Some(fetched.mime_type())),
            self.max_image_bytes,
        )
    }

    /// Write the report to the temp store and return the bytes for the
    /// chat attachment plus the stored file name.
    async fn persist(&self, report: &Report) -> Result<(Vec<u8>, String), SightError> {
        let path = self
            .store
            .persist_report(report, report_filename_hint(report))
            .await
            .map_err(SightError::Other)?;
        let json = serde_json::to_vec_pretty(report)
            .map_err(|e| SightError::Other(anyhow::anyhow!("serializing report: {e}")))?;
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "report.json".to_string());
        Ok((json, filename))
    }
}
