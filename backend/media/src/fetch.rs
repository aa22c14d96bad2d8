//! Image acquisition — URL download and upload validation.

use reqwest::{Client, Url};
use tracing::{debug, warn};

use snapsight_core::{ImageInput, SightError};

use crate::mime_detect::{image_mime_from_extension, is_supported_image};

/// Reference size ceiling for submitted images.
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

/// Download an image from a URL, enforcing scheme, content type, and the
/// size ceiling. All validation failures surface before or instead of a
/// usable payload; nothing is written to disk here.
pub async fn fetch_image(
    client: &Client,
    url: &str,
    max_bytes: u64,
) -> Result<ImageInput, SightError> {
    let parsed = Url::parse(url)
        .map_err(|e| SightError::InvalidInput(format!("malformed URL \"{url}\": {e}")))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(SightError::InvalidInput(format!(
            "unsupported URL scheme \"{}\"",
            parsed.scheme()
        )));
    }

    debug!(%url, "Downloading image");

    let response = client.get(parsed).send().await.map_err(|e| {
        if e.is_timeout() {
            SightError::Timeout(format!("fetching {url}"))
        } else {
            SightError::DownloadFailed(e.to_string())
        }
    })?;

    if !response.status().is_success() {
        return Err(SightError::DownloadFailed(format!(
            "{url} returned HTTP {}",
            response.status()
        )));
    }

    let content_type = response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.split(';').next().unwrap_or(v).trim().to_string())
        .unwrap_or_default();
    if !is_supported_image(&content_type) {
        return Err(SightError::InvalidInput(format!(
            "URL did not return an image (content type \"{content_type}\")"
        )));
    }

    // Reject on the declared length first, without reading any body.
    if let Some(length) = response.content_length() {
        if length > max_bytes {
            return Err(SightError::TooLarge {
                size: length,
                limit: max_bytes,
            });
        }
    }

    // Servers that omit or lie about Content-Length still cannot make us
    // buffer past the ceiling: the stream is abandoned on the first chunk
    // that crosses it.
    let mut response = response;
    let mut data: Vec<u8> = Vec::new();
    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|e| SightError::DownloadFailed(e.to_string()))?
    {
        let size = data.len() as u64 + chunk.len() as u64;
        if size > max_bytes {
            warn!(%url, size, "Download exceeds ceiling, aborting");
            return Err(SightError::TooLarge {
                size,
                limit: max_bytes,
            });
        }
        data.extend_from_slice(&chunk);
    }
    if data.is_empty() {
        return Err(SightError::InvalidInput(format!("{url} returned an empty body")));
    }

    Ok(ImageInput::new(
        bytes::Bytes::from(data),
        url.to_string(),
        content_type,
    ))
}

/// Validate a chat-upload attachment into an [`ImageInput`].
///
/// `content_type` is the platform-reported type when available; otherwise
/// the file extension decides.
pub fn image_from_upload(
    data: bytes::Bytes,
    filename: &str,
    content_type: Option<&str>,
    max_bytes: u64,
) -> Result<ImageInput, SightError> {
    if data.is_empty() {
        return Err(SightError::InvalidInput(format!(
            "uploaded file \"{filename}\" is empty"
        )));
    }
    if data.len() as u64 > max_bytes {
        return Err(SightError::TooLarge {
            size: data.len() as u64,
            limit: max_bytes,
        });
    }

    let mime = content_type
        .map(|t| t.split(';').next().unwrap_or(t).trim().to_string())
        .or_else(|| image_mime_from_extension(filename).map(str::to_string))
        .unwrap_or_default();
    if !is_supported_image(&mime) {
        return Err(SightError::InvalidInput(format!(
            "uploaded file \"{filename}\" is not an image"
        )));
    }

    Ok(ImageInput::new(
        data,
        format!("uploaded file \"{filename}\""),
        mime,
    ))
}
