//! `snapsight-media` — image acquisition and temp-file persistence.
//!
//! Validates and downloads user-submitted images (URL or chat upload)
//! into [`ImageInput`] payloads, and owns the shared temp directory where
//! per-request reports and images are written under unique names and
//! swept by age.

pub mod fetch;
pub mod mime_detect;
pub mod store;

pub use fetch::{fetch_image, image_from_upload, DEFAULT_MAX_IMAGE_BYTES};
pub use mime_detect::{image_mime_from_extension, is_supported_image};
pub use store::TempStore;
