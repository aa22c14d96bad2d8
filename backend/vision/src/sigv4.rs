//! AWS Signature Version 4 request signing.
//!
//! The vision endpoint authenticates requests with an HMAC-SHA256 chain
//! over a canonical form of the request. Only the subset needed for
//! `POST /` JSON-body calls is implemented.

use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};

type HmacSha256 = Hmac<Sha256>;

/// Static credentials for signing.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

/// Headers produced by signing one request.
#[derive(Debug)]
pub struct SignedHeaders {
    pub authorization: String,
    pub amz_date: String,
    pub security_token: Option<String>,
}

fn hmac(key: &[u8], data: &[u8]) -> Vec<u8> {
    // HMAC-SHA256 accepts keys of any length.
    let mut mac = HmacSha256::new_from_slice(key).expect("hmac accepts any key length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Derive the per-day signing key: successive HMACs over date, region,
/// service, and the terminator string.
pub fn derive_signing_key(secret: &str, date: &str, region: &str, service: &str) -> Vec<u8> {
    let k_date = hmac(format!("AWS4{secret}").as_bytes(), date.as_bytes());
    let k_region = hmac(&k_date, region.as_bytes());
    let k_service = hmac(&k_region, service.as_bytes());
    hmac(&k_service, b"aws4_request")
}

/// Sign a `POST /` request with an `application/x-amz-json-1.1` body.
///
/// `target` is the `X-Amz-Target` operation header; `host` the regional
/// endpoint host. Returns the headers the caller must attach.
pub fn sign_request(
    creds: &Credentials,
    region: &str,
    service: &str,
    host: &str,
    target: &str,
    body: &[u8],
    now: DateTime<Utc>,
) -> SignedHeaders {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();

    // Canonical headers must be sorted by lowercase name.
    let mut header_pairs: Vec<(String, String)> = vec![
        ("content-type".into(), "application/x-amz-json-1.1".into()),
        ("host".into(), host.into()),
        ("x-amz-date".into(), amz_date.clone()),
        ("x-amz-target".into(), target.into()),
    ];
    if let Some(token) = &creds.session_token {
        header_pairs.push(("x-amz-security-token".into(), token.clone()));
    }
    header_pairs.sort();

    let canonical_headers: String = header_pairs
        .iter()
        .map(|(k, v)| format!("{k}:{v}\n"))
        .collect();
    let signed_header_names = header_pairs
        .iter()
        .map(|(k, _)| k.as_str())
        .collect::<Vec<_>>()
        .join(";");

    let canonical_request = format!(
        "POST\n/\n\n{canonical_headers}\n{signed_header_names}\n{}",
        sha256_hex(body)
    );

    let scope = format!("{date}/{region}/{service}/aws4_request");
    let string_to_sign = format!(
        "AWS4-HMAC-SHA256\n{amz_date}\n{scope}\n{}",
        sha256_hex(canonical_request.as_bytes())
    );

    let signing_key = derive_signing_key(&creds.secret_access_key, &date, region, service);
    let signature = hex::encode(hmac(&signing_key, string_to_sign.as_bytes()));

    let authorization = format!(
        "AWS4-HMAC-SHA256 Credential={}/{scope}, SignedHeaders={signed_header_names}, Signature={signature}",
        creds.access_key_id
    );

    SignedHeaders {
        authorization,
        amz_date,
        security_token: creds.session_token.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    // Key-derivation example from the AWS signing documentation.
    #[test]
    fn derives_published_example_key() {
        let key = derive_signing_key(
            "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            "20120215",
            "us-east-1",
            "iam",
        );
        assert_eq!(
            hex::encode(key),
            "f4780e2d9f65fa895f9c67b32ce1baf0b0d8a43505a000a1a9e090d414db404d"
        );
    }

    #[test]
    fn empty_body_hashes_to_known_digest() {
        assert_eq!(
            sha256_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn signature_headers_carry_scope_and_signed_names() {
        let creds = Credentials {
            access_key_id: "AKIDEXAMPLE".into(),
            secret_access_key: "secret".into(),
            session_token: None,
        };
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let signed = sign_request(
            &creds,
            "us-east-1",
            "rekognition",
            "rekognition.us-east-1.amazonaws.com",
            "RekognitionService.DetectLabels",
            br#"{"Image":{"Bytes":""}}"#,
            now,
        );

        assert_eq!(signed.amz_date, "20260102T030405Z");
        assert!(signed
            .authorization
            .contains("Credential=AKIDEXAMPLE/20260102/us-east-1/rekognition/aws4_request"));
        assert!(signed
            .authorization
            .contains("SignedHeaders=content-type;host;x-amz-date;x-amz-target"));
        assert!(signed.security_token.is_none());
    }

    #[test]
    fn session_token_joins_signed_headers() {
        let creds = Credentials {
            access_key_id: "AKIDEXAMPLE".into(),
            secret_access_key: "secret".into(),
            session_token: Some("tok".into()),
        };
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap();
        let signed = sign_request(
            &creds,
            "us-east-1",
            "rekognition",
            "rekognition.us-east-1.amazonaws.com",
            "RekognitionService.DetectLabels",
            b"{}",
            now,
        );
        assert!(signed.authorization.contains("x-amz-security-token"));
        assert_eq!(signed.security_token.as_deref(), Some("tok"));
    }
}
