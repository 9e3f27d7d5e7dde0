//! OIDC Single Sign-On Provider Plugin
//!
//! Lets organizations on the platform authenticate their members against an
//! external OpenID Connect identity provider. The plugin contributes login
//! pipeline steps to the host auth flow and an admin-facing configuration
//! view; it performs no network I/O and owns no persistence of its own.
//!
//! The host runs the OAuth authorization-code exchange, binds the token
//! response into a [`LoginState`], and then drives the steps returned by
//! [`OidcProvider::auth_pipeline`]. After the pipeline completes, the host
//! calls [`OidcProvider::build_identity`] to obtain the platform identity
//! record for session creation.

pub mod claims;
pub mod configure;
pub mod error;
pub mod fetch_user;
pub mod pipeline;
pub mod provider;
pub mod settings;

// Logging bootstrap for plugin hosts
pub use lw_common::logging;

// Re-export main types
pub use claims::{extract_domain, IdTokenClaims};
pub use configure::{AuthProviderConfig, ConfigureContext, OidcConfigureView, RenderedPage};
pub use error::{ProviderError, ERR_INVALID_RESPONSE};
pub use fetch_user::FetchUser;
pub use pipeline::{
    AuthStep, LoginPipeline, LoginRequest, LoginState, PipelineOutcome, Signal, TokenResponse,
};
pub use provider::{Identity, OidcProvider};
pub use settings::OidcSettings;
