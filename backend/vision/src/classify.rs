//! Boundary classification of remote vision-service errors.
//!
//! The service reports failures as JSON bodies with a `__type` code and a
//! `message`. Classification into a closed error enum happens here, once,
//! so internal logic never branches on raw error codes.

use thiserror::Error;

/// Closed error taxonomy for the remote vision service.
#[derive(Debug, Error)]
pub enum VisionError {
    /// Credentials missing or rejected by the service.
    #[error("vision credentials error: {0}")]
    Credentials(String),

    /// The comparison could not find a face in one of the images.
    #[error("no face detected")]
    NoFaceDetected,

    /// The payload was not a usable image (wrong format, corrupt, too big
    /// for the service).
    #[error("invalid image: {0}")]
    InvalidImage(String),

    /// The service asked us to slow down.
    #[error("throttled by vision service: {0}")]
    Throttled(String),

    /// Any other remote-classified failure, kept with its code and message.
    #[error("vision service error {code}: {message}")]
    Remote { code: String, message: String },

    /// Network-level failure before a remote classification was available.
    #[error("vision transport error: {0}")]
    Transport(String),
}

impl From<reqwest::Error> for VisionError {
    fn from(err: reqwest::Error) -> Self {
        VisionError::Transport(err.to_string())
    }
}

/// Classify a non-success response body for the given operation.
///
/// `CompareFaces` reports a missing face as `InvalidParameterException`,
/// which callers need to distinguish for user messaging; every other
/// operation keeps that code generic.
pub fn classify_remote_error(operation: &str, status: u16, body: &str) -> VisionError {
    let parsed: serde_json::Value = serde_json::from_str(body).unwrap_or_default();
    let code = parsed["__type"]
        .as_str()
        .map(|t| t.rsplit('#').next().unwrap_or(t).to_string())
        .unwrap_or_else(|| format!("HTTP{status}"));
    let message = parsed["message"]
        .as_str()
        .or_else(|| parsed["Message"].as_str())
        .unwrap_or(body)
        .to_string();

    match code.as_str() {
        "UnrecognizedClientException" | "InvalidSignatureException"
        | "MissingAuthenticationTokenException" | "AccessDeniedException" => {
            VisionError::Credentials(message)
        }
        "InvalidParameterException" if operation == "CompareFaces" => VisionError::NoFaceDetected,
        "InvalidImageFormatException" | "ImageTooLargeException" => {
            VisionError::InvalidImage(message)
        }
        "ProvisionedThroughputExceededException" | "ThrottlingException"
        | "LimitExceededException" => VisionError::Throttled(message),
        _ => VisionError::Remote { code, message },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compare_faces_missing_face_is_no_face_detected() {
        let body = r#"{"__type":"InvalidParameterException","message":"There are no faces in the image."}"#;
        let err = classify_remote_error("CompareFaces", 400, body);
        assert!(matches!(err, VisionError::NoFaceDetected));
    }

    #[test]
    fn invalid_parameter_elsewhere_stays_generic() {
        let body = r#"{"__type":"InvalidParameterException","message":"bad"}"#;
        let err = classify_remote_error("DetectLabels", 400, body);
        assert!(matches!(err, VisionError::Remote { ref code, .. } if code == "InvalidParameterException"));
    }

    #[test]
    fn strips_namespace_prefix_from_type() {
        let body = r#"{"__type":"com.amazonaws.rekognition#ThrottlingException","message":"slow down"}"#;
        let err = classify_remote_error("DetectText", 400, body);
        assert!(matches!(err, VisionError::Throttled(_)));
    }

    #[test]
    fn auth_codes_map_to_credentials() {
        let body = r#"{"__type":"UnrecognizedClientException","message":"The security token included in the request is invalid."}"#;
        let err = classify_remote_error("DetectFaces", 400, body);
        assert!(matches!(err, VisionError::Credentials(_)));
    }

    #[test]
    fn unparseable_body_falls_back_to_http_status() {
        let err = classify_remote_error("DetectLabels", 503, "<html>gateway</html>");
        match err {
            VisionError::Remote { code, message } => {
                assert_eq!(code, "HTTP503");
                assert!(message.contains("gateway"));
            }
            other => panic!("unexpected classification: {other:?}"),
        }
    }
}
