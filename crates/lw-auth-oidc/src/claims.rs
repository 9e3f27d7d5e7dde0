//! ID Token Claims
//!
//! Decoding of the id_token payload segment. The token signature is verified
//! upstream by the provider exchange; here only the claims are extracted.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Claims carried in the middle segment of an id_token.
///
/// Only the claims the plugin acts on are modeled; everything else is
/// retained in `extra` so the full payload survives into the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdTokenClaims {
    /// Subject (unique user ID at the IDP)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,
    /// Email
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Hosted domain (organizational domain, emitted by some providers)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hd: Option<String>,
    /// Display name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// All remaining claims, preserved verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Error, Debug)]
pub enum IdTokenError {
    #[error("expected 3 token segments, found {0}")]
    SegmentCount(usize),

    #[error("invalid base64url in payload segment: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("invalid JSON in payload segment: {0}")]
    Json(#[from] serde_json::Error),
}

/// Decode the payload segment of a dot-separated id_token into claims.
///
/// Only the middle segment is decoded; header and signature are left alone.
pub fn decode_payload(id_token: &str) -> Result<IdTokenClaims, IdTokenError> {
    let segments: Vec<&str> = id_token.split('.').collect();
    if segments.len() != 3 {
        return Err(IdTokenError::SegmentCount(segments.len()));
    }

    // Tolerate padded encoders
    let payload = segments[1].trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD.decode(payload)?;

    Ok(serde_json::from_slice(&bytes)?)
}

/// Return the part of an email address after the final `@`.
///
/// A string without `@` is returned unchanged; email format is validated
/// upstream by the OAuth provider, so this path should be unreachable.
pub fn extract_domain(email: &str) -> &str {
    match email.rfind('@') {
        Some(idx) => &email[idx + 1..],
        None => email,
    }
}
