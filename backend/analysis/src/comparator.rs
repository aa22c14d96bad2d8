//! Face comparator.
//!
//! Unlike the multi-feature analysis, a comparison is one atomic remote
//! call: either a full [`ComparisonResult`] comes back or the whole call
//! fails. There is no per-sub-check isolation to do here.

use tracing::debug;

use snapsight_core::{ComparisonResult, FaceMatch, ImageInput, SightError, SimilarityThreshold};
use snapsight_vision::{VisionBackend, VisionError};

/// Compare the face in `source` against every face in `target`.
///
/// The threshold is held normalized in [0, 1] and passed to the remote
/// call as a percentage. A missing face in either image surfaces as
/// [`SightError::NoFaceDetected`] so the caller can present a specific
/// message instead of a raw service error.
pub async fn compare_faces(
    backend: &dyn VisionBackend,
    source: &ImageInput,
    target: &ImageInput,
    threshold: SimilarityThreshold,
) -> Result<ComparisonResult, SightError> {
    debug!(
        source = source.source(),
        target = target.source(),
        threshold_percent = threshold.as_percent(),
        "Comparing faces"
    );

    let comparison = backend
        .compare_faces(source.data(), target.data(), threshold.as_percent())
        .await
        .map_err(|err| match err {
            VisionError::NoFaceDetected => SightError::NoFaceDetected,
            VisionError::Credentials(message) => SightError::Config(message),
            other => SightError::Remote {
                operation: "compare_faces".into(),
                message: other.to_string(),
            },
        })?;

    Ok(ComparisonResult {
        matched: comparison
            .matches
            .into_iter()
            .map(|similarity| FaceMatch { similarity })
            .collect(),
        unmatched_count: comparison.unmatched,
    })
}
