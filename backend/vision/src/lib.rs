//! `snapsight-vision` — client for the remote vision service.
//!
//! Everything computationally interesting happens on the remote side; this
//! crate only speaks the service's JSON protocol. The [`VisionBackend`]
//! trait is the seam the rest of the system depends on, so tests can
//! substitute a fake backend for the real signed HTTP client.

pub mod classify;
pub mod rekognition;
pub mod sigv4;

pub use classify::VisionError;
pub use rekognition::{RekognitionClient, RekognitionConfig};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Raw outcome of a face comparison as the service reports it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct FaceComparison {
    /// Similarity percentages for target faces matching the source face.
    pub matches: Vec<f32>,
    /// Count of target faces below the threshold.
    pub unmatched: usize,
}

/// The remote vision service's capability set.
///
/// Success payloads for the five detection calls are kept opaque
/// (`serde_json::Value`): their shape is defined and versioned by the
/// remote service, and this codebase never interprets them beyond
/// presentation.
#[async_trait]
pub trait VisionBackend: Send + Sync {
    async fn detect_labels(&self, image: &[u8]) -> Result<serde_json::Value, VisionError>;
    async fn detect_text(&self, image: &[u8]) -> Result<serde_json::Value, VisionError>;
    async fn detect_faces(&self, image: &[u8]) -> Result<serde_json::Value, VisionError>;
    async fn detect_moderation_labels(
        &self,
        image: &[u8],
    ) -> Result<serde_json::Value, VisionError>;
    async fn recognize_celebrities(&self, image: &[u8]) -> Result<serde_json::Value, VisionError>;

    /// Compare the largest face in `source` against every face in
    /// `target`. `threshold_percent` is in [0, 100].
    async fn compare_faces(
        &self,
        source: &[u8],
        target: &[u8],
        threshold_percent: f32,
    ) -> Result<FaceComparison, VisionError>;
}
