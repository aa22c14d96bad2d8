//! `snapsight-channels` — the Discord surface.
//!
//! Translates slash-command interactions into analysis/comparison calls
//! and renders the results as embeds with the full JSON report attached.
//! All lossy presentation (top-N truncation) lives here; the persisted
//! report keeps everything.

pub mod discord;
pub mod embeds;
pub mod slash;

pub use discord::{DiscordAdapter, DiscordSettings};
