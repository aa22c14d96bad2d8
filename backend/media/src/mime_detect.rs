//! MIME type detection for submitted images.

/// Detect an image MIME type from a file name's extension.
pub fn image_mime_from_extension(filename: &str) -> Option<&'static str> {
    let ext = filename.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// Whether a MIME type names an image format the vision service accepts.
pub fn is_supported_image(mime: &str) -> bool {
    mime.starts_with("image/")
}
