//! OIDC Provider
//!
//! The object the host platform registers under the "oidc" provider key.
//! Contributes the login pipeline steps, the admin configure view, and the
//! mapping from a completed login state to a platform identity record.

use serde::Serialize;

use crate::configure::OidcConfigureView;
use crate::error::{ProviderError, Result};
use crate::fetch_user::FetchUser;
use crate::pipeline::{LoginPipeline, LoginState};
use crate::settings::OidcSettings;

/// Current provider generation. Generations before the version marker derive
/// the org domain from the email address instead of the `hd` claim.
const CURRENT_VERSION: u32 = 2;

/// Identity record handed to the host for session creation.
#[derive(Debug, Clone, Serialize)]
pub struct Identity {
    /// Stable user id at the IDP (the `sub` claim)
    pub id: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Organizational domain, if one was established during login
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

/// OIDC single sign-on provider.
pub struct OidcProvider {
    settings: OidcSettings,
    version: Option<u32>,
}

impl OidcProvider {
    /// Create a provider at the current generation.
    pub fn new(settings: OidcSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            version: Some(CURRENT_VERSION),
        })
    }

    /// Create a provider for a legacy configuration (no version marker);
    /// the org domain is derived from the email address.
    pub fn legacy(settings: OidcSettings) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            version: None,
        })
    }

    /// Display name of the identity provider.
    pub fn name(&self) -> &str {
        self.settings.issuer.as_deref().unwrap_or("OIDC")
    }

    pub fn settings(&self) -> &OidcSettings {
        &self.settings
    }

    /// The login steps this plugin contributes to the host auth flow. The
    /// host prepends its own redirect and code-exchange steps.
    pub fn auth_pipeline(&self) -> LoginPipeline {
        LoginPipeline::new(vec![Box::new(FetchUser::new(
            self.settings.allowed_domains(),
            self.version,
        ))])
    }

    /// The admin settings view for this provider.
    pub fn configure_view(&self) -> OidcConfigureView {
        OidcConfigureView::new(self.settings.issuer.clone())
    }

    /// Map a completed login state to the platform identity record.
    pub fn build_identity(&self, state: &LoginState) -> Result<Identity> {
        let user = state.user.as_ref().ok_or(ProviderError::MissingIdentity)?;

        let id = user
            .sub
            .clone()
            .ok_or(ProviderError::MissingClaim("sub"))?;
        let email = user
            .email
            .clone()
            .ok_or(ProviderError::MissingClaim("email"))?;

        Ok(Identity {
            id,
            email,
            name: user.name.clone(),
            domain: state.domain.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claims::IdTokenClaims;

    fn settings() -> OidcSettings {
        OidcSettings::default()
            .with_issuer("Acme ID")
            .with_client("client-1", "secret")
    }

    fn claims(sub: Option<&str>, email: Option<&str>) -> IdTokenClaims {
        IdTokenClaims {
            sub: sub.map(String::from),
            email: email.map(String::from),
            hd: None,
            name: Some("Alice".to_string()),
            extra: serde_json::Map::new(),
        }
    }

    #[test]
    fn test_provider_requires_client_id() {
        assert!(OidcProvider::new(OidcSettings::default()).is_err());
        assert!(OidcProvider::new(settings()).is_ok());
    }

    #[test]
    fn test_auth_pipeline_has_fetch_user_step() {
        let provider = OidcProvider::new(settings()).unwrap();
        assert_eq!(provider.auth_pipeline().len(), 1);
    }

    #[test]
    fn test_build_identity_from_completed_state() {
        let provider = OidcProvider::new(settings()).unwrap();
        let mut state = LoginState::new();
        state.user = Some(claims(Some("u1"), Some("alice@corp.com")));
        state.domain = Some("corp.com".to_string());

        let identity = provider.build_identity(&state).unwrap();
        assert_eq!(identity.id, "u1");
        assert_eq!(identity.email, "alice@corp.com");
        assert_eq!(identity.name.as_deref(), Some("Alice"));
        assert_eq!(identity.domain.as_deref(), Some("corp.com"));
    }

    #[test]
    fn test_build_identity_without_login_fails() {
        let provider = OidcProvider::new(settings()).unwrap();
        let state = LoginState::new();
        assert!(matches!(
            provider.build_identity(&state),
            Err(ProviderError::MissingIdentity)
        ));
    }

    #[test]
    fn test_build_identity_requires_sub() {
        let provider = OidcProvider::new(settings()).unwrap();
        let mut state = LoginState::new();
        state.user = Some(claims(None, Some("alice@corp.com")));
        assert!(matches!(
            provider.build_identity(&state),
            Err(ProviderError::MissingClaim("sub"))
        ));
    }

    #[test]
    fn test_provider_name_falls_back() {
        let provider =
            OidcProvider::new(OidcSettings::default().with_client("c", "s")).unwrap();
        assert_eq!(provider.name(), "OIDC");
    }
}
