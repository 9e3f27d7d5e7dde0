//! Plugin Error Types

use thiserror::Error;

/// User-facing error code signalled when the token exchange response cannot
/// be turned into an identity. Every malformed-input cause collapses to this
/// one code; the server-side logs carry the actual cause.
pub const ERR_INVALID_RESPONSE: &str =
    "Unable to fetch user information from your OIDC provider. \
     Please check the provider configuration and try again.";

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("login pipeline has not produced an identity")]
    MissingIdentity,

    #[error("missing required claim: {0}")]
    MissingClaim(&'static str),

    #[error("configuration error: {message}")]
    Configuration { message: String },
}

impl ProviderError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
