//! Multi-feature analysis orchestrator.
//!
//! Fans one image out to one remote call per requested feature, all
//! concurrent, and joins the full set. A feature's failure is converted
//! into data (a [`FeatureOutcome::Failure`] record) at the task boundary
//! and never aborts its siblings; the orchestrator itself only errors on
//! misuse (an empty feature set).

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use bytes::Bytes;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use snapsight_core::{Feature, FeatureOutcome, ImageInput, SightError};
use snapsight_vision::VisionBackend;

/// Run every requested feature against the image and collect one outcome
/// per feature.
///
/// Callers expand the `all` sentinel before reaching this point; the set
/// must be non-empty and contains no duplicates by construction. The
/// result is available only once every dispatched task has settled —
/// full-join semantics, never first-completed.
pub async fn run_analyses(
    backend: Arc<dyn VisionBackend>,
    image: &ImageInput,
    features: &BTreeSet<Feature>,
) -> Result<BTreeMap<Feature, FeatureOutcome>, SightError> {
    if features.is_empty() {
        return Err(SightError::InvalidInput(
            "at least one analysis feature must be requested".into(),
        ));
    }

    debug!(
        source = image.source(),
        count = features.len(),
        "Dispatching analysis fan-out"
    );

    let mut tasks: JoinSet<(Feature, FeatureOutcome)> = JoinSet::new();
    for &feature in features {
        let backend = Arc::clone(&backend);
        let data = image.bytes();
        tasks.spawn(async move { (feature, run_one(backend.as_ref(), feature, &data).await) });
    }

    let mut results = BTreeMap::new();
    let mut aborted = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((feature, outcome)) => {
                if !outcome.is_success() {
                    warn!(%feature, "Feature analysis failed");
                }
                results.insert(feature, outcome);
            }
            // A panicked task cannot name its feature, so it is collected
            // here and backfilled below — siblings are unaffected either
            // way.
            Err(join_err) => {
                warn!(error = %join_err, "Analysis task aborted");
                aborted.push(join_err.to_string());
            }
        }
    }

    // Every requested feature gets exactly one outcome, even when its
    // task died before reporting one.
    if results.len() < features.len() {
        let detail = aborted.join("; ");
        for &feature in features {
            results.entry(feature).or_insert_with(|| FeatureOutcome::Failure {
                error: format!("analysis task aborted: {detail}"),
            });
        }
    }

    Ok(results)
}

async fn run_one(backend: &dyn VisionBackend, feature: Feature, image: &Bytes) -> FeatureOutcome {
    let result = match feature {
        Feature::Labels => backend.detect_labels(image).await,
        Feature::Text => backend.detect_text(image).await,
        Feature::Faces => backend.detect_faces(image).await,
        Feature::Moderation => backend.detect_moderation_labels(image).await,
        Feature::Celebrities => backend.recognize_celebrities(image).await,
    };

    match result {
        Ok(data) => FeatureOutcome::Success { data },
        Err(err) => FeatureOutcome::Failure {
            error: err.to_string(),
        },
    }
}
