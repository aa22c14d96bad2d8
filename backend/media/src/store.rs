//! Shared temp directory for per-request artifacts.
//!
//! Every file carries a random identifier suffix so concurrent requests
//! never collide. Cleanup is age-based, not request-scoped: the sweep
//! deletes anything older than the threshold and is safe to run while
//! newer files are being written.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{debug, info, warn};
use uuid::Uuid;

use snapsight_core::{ImageInput, Report};

pub struct TempStore {
    dir: PathBuf,
}

impl TempStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.dir)
            .await
            .with_context(|| format!("creating temp dir {}", self.dir.display()))
    }

    fn unique_path(&self, hint: &str, extension: &str) -> PathBuf {
        self.dir
            .join(format!("{hint}-{}.{extension}", Uuid::new_v4()))
    }

    /// Serialize a report to pretty JSON under a unique name and return
    /// the durable path for later attachment.
    pub async fn persist_report(&self, report: &Report, hint: &str) -> Result<PathBuf> {
        self.ensure_dir().await?;
        let path = self.unique_path(hint, "json");
        let body = serde_json::to_vec_pretty(report).context("serializing report")?;
        fs::write(&path, body)
            .await
            .with_context(|| format!("writing report {}", path.display()))?;
        debug!(path = %path.display(), "Persisted report");
        Ok(path)
    }

    /// Keep a temp copy of a submitted image (for re-attachment in
    /// replies). Uses the MIME type to pick an extension.
    pub async fn save_image(&self, image: &ImageInput, hint: &str) -> Result<PathBuf> {
        self.ensure_dir().await?;
        let extension = match image.mime_type() {
            "image/png" => "png",
            "image/gif" => "gif",
            "image/webp" => "webp",
            "image/bmp" => "bmp",
            _ => "jpg",
        };
        let path = self.unique_path(hint, extension);
        fs::write(&path, image.data())
            .await
            .with_context(|| format!("writing image {}", path.display()))?;
        Ok(path)
    }

    /// Delete files older than `max_age`. Returns the number removed.
    ///
    /// Entries that disappear or fail to stat mid-sweep are skipped; a
    /// concurrent writer's fresh files are younger than any sane
    /// threshold and untouched.
    pub async fn sweep(&self, max_age: Duration) -> Result<usize> {
        if !self.dir.exists() {
            return Ok(0);
        }

        let mut removed = 0;
        let mut entries = fs::read_dir(&self.dir)
            .await
            .with_context(|| format!("listing temp dir {}", self.dir.display()))?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let Ok(metadata) = entry.metadata().await else {
                continue;
            };
            if !metadata.is_file() {
                continue;
            }
            let age = metadata
                .modified()
                .ok()
                .and_then(|m| m.elapsed().ok())
                .unwrap_or(Duration::ZERO);
            if age < max_age {
                continue;
            }
            match fs::remove_file(&path).await {
                Ok(()) => {
                    debug!(path = %path.display(), "Swept stale temp file");
                    removed += 1;
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to sweep temp file"),
            }
        }

        if removed > 0 {
            info!(removed, dir = %self.dir.display(), "Temp sweep complete");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use chrono::Utc;
    use snapsight_core::{ReportKind, ReportMetadata};

    fn scratch_store() -> TempStore {
        TempStore::new(std::env::temp_dir().join(format!("snapsight-test-{}", Uuid::new_v4())))
    }

    fn sample_report() -> Report {
        Report {
            metadata: ReportMetadata {
                timestamp: Utc::now(),
                source: "test".into(),
                kind: ReportKind::Analysis,
            },
            results: Some(Default::default()),
            comparison: None,
        }
    }

    #[tokio::test]
    async fn persisted_reports_get_unique_names() {
        let store = scratch_store();
        let a = store.persist_report(&sample_report(), "analysis").await.unwrap();
        let b = store.persist_report(&sample_report(), "analysis").await.unwrap();
        assert_ne!(a, b);
        assert!(a.file_name().unwrap().to_str().unwrap().starts_with("analysis-"));
        assert_eq!(a.extension().and_then(|e| e.to_str()), Some("json"));

        let raw = fs::read_to_string(&a).await.unwrap();
        let parsed: Report = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.metadata.kind, ReportKind::Analysis);

        fs::remove_dir_all(store.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn sweep_spares_fresh_files_and_removes_old_ones() {
        let store = scratch_store();
        let path = store.persist_report(&sample_report(), "analysis").await.unwrap();

        // A file written just now survives a one-hour threshold.
        let removed = store.sweep(Duration::from_secs(3600)).await.unwrap();
        assert_eq!(removed, 0);
        assert!(path.exists());

        // A zero threshold makes every settled file stale.
        let removed = store.sweep(Duration::ZERO).await.unwrap();
        assert_eq!(removed, 1);
        assert!(!path.exists());

        fs::remove_dir_all(store.dir()).await.unwrap();
    }

    #[tokio::test]
    async fn sweep_on_missing_dir_is_a_no_op() {
        let store = scratch_store();
        assert_eq!(store.sweep(Duration::ZERO).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn saved_images_use_mime_extension() {
        let store = scratch_store();
        let image = ImageInput::new(Bytes::from_static(b"\x89PNG"), "test", "image/png");
        let path = store.save_image(&image, "compare-source").await.unwrap();
        assert_eq!(path.extension().and_then(|e| e.to_str()), Some("png"));

        fs::remove_dir_all(store.dir()).await.unwrap();
    }
}
