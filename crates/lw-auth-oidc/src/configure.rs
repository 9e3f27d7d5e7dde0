//! Admin Configure View
//!
//! Renders the provider settings page shown to organization admins: the
//! provider display name and the list of permitted email domains. Reads the
//! host-persisted provider config and never fails; a missing or malformed
//! config renders as an empty domain list.

use serde::Serialize;
use serde_json::Value;

use crate::pipeline::LoginRequest;

/// Template rendered by the host for the settings page.
pub const CONFIGURE_TEMPLATE: &str = "oidc/configure.html";

/// Host-persisted auth provider row, as handed to the view.
#[derive(Debug, Clone)]
pub struct AuthProviderConfig {
    /// Provider key, e.g. "oidc"
    pub provider: String,
    /// Free-form persisted settings mapping
    pub config: Value,
}

/// Organization whose settings page is being rendered.
#[derive(Debug, Clone)]
pub struct Organization {
    pub slug: String,
    pub name: String,
}

/// Template context for the settings page.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ConfigureContext {
    pub provider_name: String,
    pub domains: Vec<String>,
}

/// A page handed back to the host renderer.
#[derive(Debug, Clone)]
pub struct RenderedPage {
    pub template: &'static str,
    pub context: ConfigureContext,
}

/// Settings view for the OIDC provider.
pub struct OidcConfigureView {
    issuer: Option<String>,
}

impl OidcConfigureView {
    pub fn new(issuer: Option<String>) -> Self {
        Self { issuer }
    }

    pub fn dispatch(
        &self,
        _request: &LoginRequest,
        _organization: &Organization,
        auth_provider: &AuthProviderConfig,
    ) -> RenderedPage {
        RenderedPage {
            template: CONFIGURE_TEMPLATE,
            context: ConfigureContext {
                provider_name: self.issuer.clone().unwrap_or_default(),
                domains: allowed_domains(&auth_provider.config),
            },
        }
    }
}

/// Permitted domains from a persisted config mapping.
///
/// A non-empty single `domain` entry predates the `domains` list and wins
/// when present.
fn allowed_domains(config: &Value) -> Vec<String> {
    if let Some(domain) = config.get("domain").and_then(Value::as_str) {
        if !domain.is_empty() {
            return vec![domain.to_string()];
        }
    }

    config
        .get("domains")
        .and_then(Value::as_array)
        .map(|list| {
            list.iter()
                .filter_map(Value::as_str)
                .map(String::from)
                .collect()
        })
        .unwrap_or_default()
}
