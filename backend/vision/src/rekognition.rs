//! Signed HTTP client for the Rekognition-style vision endpoint.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::Utc;
use reqwest::Client;
use tracing::debug;

use crate::classify::{classify_remote_error, VisionError};
use crate::sigv4::{sign_request, Credentials};
use crate::{FaceComparison, VisionBackend};

const SERVICE: &str = "rekognition";

#[derive(Debug, Clone)]
pub struct RekognitionConfig {
    pub region: String,
    pub credentials: Credentials,
}

/// A constructed, injectable client handle — never a process-wide global.
pub struct RekognitionClient {
    config: RekognitionConfig,
    http: Client,
}

impl RekognitionClient {
    pub fn new(config: RekognitionConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn host(&self) -> String {
        format!("{SERVICE}.{}.amazonaws.com", self.config.region)
    }

    /// Issue one signed JSON call and classify any failure.
    async fn call(
        &self,
        operation: &str,
        body: serde_json::Value,
    ) -> Result<serde_json::Value, VisionError> {
        let host = self.host();
        let target = format!("RekognitionService.{operation}");
        let payload = serde_json::to_vec(&body)
            .map_err(|e| VisionError::Transport(format!("body serialization: {e}")))?;

        let signed = sign_request(
            &self.config.credentials,
            &self.config.region,
            SERVICE,
            &host,
            &target,
            &payload,
            Utc::now(),
        );

        debug!(operation, host = %host, bytes = payload.len(), "Calling vision service");

        let mut request = self
            .http
            .post(format!("https://{host}/"))
            .header("Content-Type", "application/x-amz-json-1.1")
            .header("X-Amz-Target", &target)
            .header("X-Amz-Date", &signed.amz_date)
            .header("Authorization", &signed.authorization)
            .body(payload);
        if let Some(token) = &signed.security_token {
            request = request.header("X-Amz-Security-Token", token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(classify_remote_error(operation, status.as_u16(), &text));
        }

        serde_json::from_str(&text)
            .map_err(|e| VisionError::Transport(format!("malformed response JSON: {e}")))
    }

    fn image_body(image: &[u8]) -> serde_json::Value {
        serde_json::json!({ "Image": { "Bytes": STANDARD.encode(image) } })
    }
}

#[async_trait]
impl VisionBackend for RekognitionClient {
    async fn detect_labels(&self, image: &[u8]) -> Result<serde_json::Value, VisionError> {
        let mut body = Self::image_body(image);
        body["MaxLabels"] = serde_json::json!(50);
        self.call("DetectLabels", body).await
    }

    async fn detect_text(&self, image: &[u8]) -> Result<serde_json::Value, VisionError> {
        self.call("DetectText", Self::image_body(image)).await
    }

    async fn detect_faces(&self, image: &[u8]) -> Result<serde_json::Value, VisionError> {
        let mut body = Self::image_body(image);
        body["Attributes"] = serde_json::json!(["ALL"]);
        self.call("DetectFaces", body).await
    }

    async fn detect_moderation_labels(
        &self,
        image: &[u8],
    ) -> Result<serde_json::Value, VisionError> {
        self.call("DetectModerationLabels", Self::image_body(image))
            .await
    }

    async fn recognize_celebrities(&self, image: &[u8]) -> Result<serde_json::Value, VisionError> {
        self.call("RecognizeCelebrities", Self::image_body(image))
            .await
    }

    async fn compare_faces(
        &self,
        source: &[u8],
        target: &[u8],
        threshold_percent: f32,
    ) -> Result<FaceComparison, VisionError> {
        let body = serde_json::json!({
            "SourceImage": { "Bytes": STANDARD.encode(source) },
            "TargetImage": { "Bytes": STANDARD.encode(target) },
            "SimilarityThreshold": threshold_percent,
        });
        let response = self.call("CompareFaces", body).await?;
        Ok(parse_comparison(&response))
    }
}

/// Extract the match/unmatch shape from a `CompareFaces` response.
fn parse_comparison(response: &serde_json::Value) -> FaceComparison {
    let matches = response["FaceMatches"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|m| m["Similarity"].as_f64())
                .map(|s| s as f32)
                .collect()
        })
        .unwrap_or_default();
    let unmatched = response["UnmatchedFaces"]
        .as_array()
        .map(|arr| arr.len())
        .unwrap_or(0);
    FaceComparison { matches, unmatched }
}
