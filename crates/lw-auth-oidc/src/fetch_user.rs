//! FetchUser Login Step
//!
//! Turns the token exchange response bound by the preceding step into a
//! decoded user payload and an organizational domain. All malformed-input
//! causes collapse to the single [`ERR_INVALID_RESPONSE`] code so callers
//! cannot probe why a token was rejected; the logs carry the real cause.

use tracing::error;

use crate::claims::{self, IdTokenError};
use crate::error::ERR_INVALID_RESPONSE;
use crate::pipeline::{AuthStep, LoginRequest, LoginState, Signal};

/// Login step that extracts the user from the id_token.
pub struct FetchUser {
    /// Domains permitted by the provider configuration. Enforcement happens
    /// in the host's access-control step, downstream of this one.
    #[allow(dead_code)]
    domains: Vec<String>,
    /// Provider generation marker. `None` means a legacy configuration where
    /// the org domain is derived from the email address instead of the `hd`
    /// claim.
    version: Option<u32>,
}

impl FetchUser {
    pub fn new(domains: Vec<String>, version: Option<u32>) -> Self {
        Self { domains, version }
    }
}

impl AuthStep for FetchUser {
    fn dispatch(&self, request: &LoginRequest, state: &mut LoginState) -> Signal {
        let id_token = match state.data.as_ref().and_then(|d| d.id_token.clone()) {
            Some(t) => t,
            None => {
                error!(
                    attempt_id = %request.attempt_id,
                    data = ?state.data,
                    "Missing id_token in OAuth response"
                );
                return state.error(ERR_INVALID_RESPONSE);
            }
        };

        let claims = match claims::decode_payload(&id_token) {
            Ok(c) => c,
            Err(err @ IdTokenError::Json(_)) => {
                error!(attempt_id = %request.attempt_id, error = %err, "Unable to parse id_token payload");
                return state.error(ERR_INVALID_RESPONSE);
            }
            Err(err) => {
                error!(attempt_id = %request.attempt_id, error = %err, "Unable to decode id_token");
                return state.error(ERR_INVALID_RESPONSE);
            }
        };

        let email = match claims.email.as_deref() {
            Some(e) if !e.is_empty() => e,
            _ => {
                error!(
                    attempt_id = %request.attempt_id,
                    id_token = %id_token,
                    "Missing email in id_token payload"
                );
                return state.error(ERR_INVALID_RESPONSE);
            }
        };

        // Legacy configurations predate the hd claim and derive the org
        // domain from the email address.
        let domain = match self.version {
            None => Some(claims::extract_domain(email).to_string()),
            Some(_) => claims.hd.clone(),
        };

        state.domain = domain;
        state.user = Some(claims);

        state.next_step()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::TokenResponse;
    use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};

    fn make_id_token(payload: &str) -> String {
        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"RS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload),
            URL_SAFE_NO_PAD.encode("sig"),
        )
    }

    fn state_with_id_token(payload: &str) -> LoginState {
        LoginState::new().with_data(TokenResponse {
            id_token: Some(make_id_token(payload)),
            access_token: Some("at".to_string()),
            ..Default::default()
        })
    }

    fn request() -> LoginRequest {
        LoginRequest::new("attempt-1")
    }

    #[test]
    fn test_missing_id_token_signals_error() {
        let step = FetchUser::new(vec![], Some(2));
        let mut state = LoginState::new().with_data(TokenResponse {
            access_token: Some("at".to_string()),
            ..Default::default()
        });

        let signal = step.dispatch(&request(), &mut state);

        assert_eq!(signal, Signal::Error(ERR_INVALID_RESPONSE));
        assert!(state.domain.is_none());
        assert!(state.user.is_none());
    }

    #[test]
    fn test_missing_data_signals_error() {
        let step = FetchUser::new(vec![], Some(2));
        let mut state = LoginState::new();

        let signal = step.dispatch(&request(), &mut state);

        assert_eq!(signal, Signal::Error(ERR_INVALID_RESPONSE));
        assert!(state.user.is_none());
    }

    #[test]
    fn test_malformed_token_signals_error() {
        let step = FetchUser::new(vec![], Some(2));

        for bad in ["not-a-jwt", "a.b", "a.%%%.c", "a.b.c.d"] {
            let mut state = LoginState::new().with_data(TokenResponse {
                id_token: Some(bad.to_string()),
                ..Default::default()
            });
            let signal = step.dispatch(&request(), &mut state);
            assert_eq!(signal, Signal::Error(ERR_INVALID_RESPONSE), "token: {bad}");
            assert!(state.user.is_none());
        }
    }

    #[test]
    fn test_non_json_payload_signals_error() {
        let step = FetchUser::new(vec![], Some(2));
        let mut state = state_with_id_token("plainly not json");

        let signal = step.dispatch(&request(), &mut state);

        assert_eq!(signal, Signal::Error(ERR_INVALID_RESPONSE));
        assert!(state.user.is_none());
    }

    #[test]
    fn test_missing_or_empty_email_signals_error() {
        let step = FetchUser::new(vec![], Some(2));

        for payload in [r#"{"sub":"u1"}"#, r#"{"sub":"u1","email":""}"#] {
            let mut state = state_with_id_token(payload);
            let signal = step.dispatch(&request(), &mut state);
            assert_eq!(signal, Signal::Error(ERR_INVALID_RESPONSE));
            assert!(state.user.is_none());
        }
    }

    #[test]
    fn test_legacy_mode_derives_domain_from_email() {
        let step = FetchUser::new(vec!["example.com".to_string()], None);
        let mut state = state_with_id_token(r#"{"email":"alice@example.com"}"#);

        let signal = step.dispatch(&request(), &mut state);

        assert_eq!(signal, Signal::Proceed);
        assert_eq!(state.domain.as_deref(), Some("example.com"));
        assert_eq!(
            state.user.as_ref().unwrap().email.as_deref(),
            Some("alice@example.com")
        );
    }

    #[test]
    fn test_versioned_mode_uses_hd_claim() {
        let step = FetchUser::new(vec![], Some(2));
        let mut state = state_with_id_token(r#"{"email":"a@b.com","hd":"corp.com"}"#);

        let signal = step.dispatch(&request(), &mut state);

        assert_eq!(signal, Signal::Proceed);
        assert_eq!(state.domain.as_deref(), Some("corp.com"));
    }

    #[test]
    fn test_versioned_mode_without_hd_proceeds_with_no_domain() {
        let step = FetchUser::new(vec![], Some(2));
        let mut state = state_with_id_token(r#"{"email":"a@b.com"}"#);

        let signal = step.dispatch(&request(), &mut state);

        assert_eq!(signal, Signal::Proceed);
        assert!(state.domain.is_none());
        assert!(state.user.is_some());
    }

    #[test]
    fn test_full_payload_is_preserved_on_state() {
        let step = FetchUser::new(vec![], Some(2));
        let mut state =
            state_with_id_token(r#"{"email":"a@b.com","sub":"u1","locale":"de-DE"}"#);

        step.dispatch(&request(), &mut state);

        let user = state.user.as_ref().unwrap();
        assert_eq!(user.sub.as_deref(), Some("u1"));
        assert_eq!(
            user.extra.get("locale").and_then(|v| v.as_str()),
            Some("de-DE")
        );
    }
}
