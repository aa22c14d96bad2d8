use thiserror::Error;

/// Top-level error type for the SnapSight runtime.
///
/// Per-feature failures during a multi-feature analysis are never
/// represented here — they are captured inline as
/// [`FeatureOutcome::Failure`](crate::types::FeatureOutcome) entries in the
/// aggregate, so a degraded analysis still reports success overall.
#[derive(Debug, Error)]
pub enum SightError {
    /// Required credentials or settings are missing; fatal, surfaced before
    /// any remote work is attempted.
    #[error("configuration error: {0}")]
    Config(String),

    /// Malformed URL, wrong content type, missing image, empty feature set.
    /// Surfaced to the caller before any remote call is made.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Transient acquisition failure fetching the image.
    #[error("download failed: {0}")]
    DownloadFailed(String),

    /// The image source did not respond in time.
    #[error("timed out: {0}")]
    Timeout(String),

    /// The image exceeds the configured size ceiling.
    #[error("image too large: {size} bytes (limit {limit})")]
    TooLarge { size: u64, limit: u64 },

    /// The comparison found no detectable face in one of the images.
    /// Distinguished from generic remote errors so the caller can present
    /// a specific message.
    #[error("no face detected in one of the supplied images")]
    NoFaceDetected,

    /// Any other remote vision-service failure, carrying the
    /// remote-provided message.
    #[error("vision service error ({operation}): {message}")]
    Remote { operation: String, message: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl SightError {
    /// Whether the caller may reasonably retry the same request.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::DownloadFailed(_) | Self::Timeout(_))
    }
}
