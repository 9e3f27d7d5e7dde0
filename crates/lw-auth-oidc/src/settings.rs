//! Provider Settings
//!
//! Deployment-level OIDC settings, loaded from the environment the same way
//! the platform loads the rest of its configuration. Organization-level
//! overrides live in the persisted provider config (see `configure`).

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::{ProviderError, Result};

const DEFAULT_SCOPE: &str = "openid email profile";

/// OIDC deployment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OidcSettings {
    /// Display name of the identity provider, shown on the settings page
    pub issuer: Option<String>,
    /// Single permitted domain (legacy deployments)
    pub domain: Option<String>,
    /// Permitted domains
    pub domains: Vec<String>,
    /// OAuth client credentials, used by the host's code exchange
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    /// Scopes requested from the provider
    pub scope: String,
}

impl Default for OidcSettings {
    fn default() -> Self {
        Self {
            issuer: None,
            domain: None,
            domains: vec![],
            client_id: None,
            client_secret: None,
            scope: DEFAULT_SCOPE.to_string(),
        }
    }
}

impl OidcSettings {
    /// Load settings from the environment.
    ///
    /// Recognized variables: `OIDC_ISSUER`, `OIDC_DOMAIN`, `OIDC_DOMAINS`
    /// (comma-separated), `OIDC_CLIENT_ID`, `OIDC_CLIENT_SECRET`,
    /// `OIDC_SCOPE`.
    pub fn from_env() -> Self {
        let mut settings = Self::default();

        if let Ok(val) = env::var("OIDC_ISSUER") {
            settings.issuer = Some(val);
        }
        if let Ok(val) = env::var("OIDC_DOMAIN") {
            settings.domain = Some(val.trim().to_lowercase());
        }
        if let Ok(val) = env::var("OIDC_DOMAINS") {
            settings.domains = val
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Ok(val) = env::var("OIDC_CLIENT_ID") {
            settings.client_id = Some(val);
        }
        if let Ok(val) = env::var("OIDC_CLIENT_SECRET") {
            settings.client_secret = Some(val);
        }
        if let Ok(val) = env::var("OIDC_SCOPE") {
            settings.scope = val;
        }

        settings
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn with_domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into().trim().to_lowercase());
        self
    }

    pub fn with_domains(mut self, domains: Vec<String>) -> Self {
        self.domains = domains
            .into_iter()
            .map(|d| d.trim().to_lowercase())
            .collect();
        self
    }

    pub fn with_client(
        mut self,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        self.client_id = Some(client_id.into());
        self.client_secret = Some(client_secret.into());
        self
    }

    /// All permitted domains: the legacy single `domain` merged with
    /// `domains`, without duplicates.
    pub fn allowed_domains(&self) -> Vec<String> {
        let mut all: Vec<String> = Vec::new();
        if let Some(ref d) = self.domain {
            if !d.is_empty() {
                all.push(d.clone());
            }
        }
        for d in &self.domains {
            if !all.contains(d) {
                all.push(d.clone());
            }
        }
        all
    }

    /// Validate that the settings are usable for a login flow.
    pub fn validate(&self) -> Result<()> {
        if self.client_id.as_deref().unwrap_or("").is_empty() {
            return Err(ProviderError::configuration("OIDC client ID is required"));
        }
        Ok(())
    }
}
