//! Login Pipeline Seam
//!
//! The host auth flow drives a sequence of [`AuthStep`]s for each login
//! attempt. Steps read and write the attempt-scoped [`LoginState`] and signal
//! either "proceed to the next step" or "abort with a user-facing error code".
//!
//! State is a typed struct rather than a string-keyed bag so a misspelled or
//! wrongly-typed field is a compile error, not a runtime surprise.

use crate::claims::IdTokenClaims;
use serde::Deserialize;

/// Per-attempt request context, carried for logging.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    pub attempt_id: String,
    pub remote_addr: Option<String>,
}

impl LoginRequest {
    pub fn new(attempt_id: impl Into<String>) -> Self {
        Self {
            attempt_id: attempt_id.into(),
            remote_addr: None,
        }
    }

    pub fn with_remote_addr(mut self, addr: impl Into<String>) -> Self {
        self.remote_addr = Some(addr.into());
        self
    }
}

/// OAuth token exchange response, as bound into the login state by the host
/// after the code exchange.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TokenResponse {
    pub id_token: Option<String>,
    pub access_token: Option<String>,
    pub refresh_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    /// Provider-specific extras, preserved verbatim
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// What a step tells the host to do next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    /// Continue with the next step
    Proceed,
    /// Abort the attempt and show the given error code to the user
    Error(&'static str),
}

/// State scoped to one login attempt. Created and destroyed by the host.
#[derive(Debug, Default)]
pub struct LoginState {
    /// Token exchange response from the preceding step
    pub data: Option<TokenResponse>,
    /// Organizational domain of the authenticated account, once extracted.
    /// `None` after a successful run means the account has no org domain.
    pub domain: Option<String>,
    /// Full decoded id_token payload, once extracted
    pub user: Option<IdTokenClaims>,
}

impl LoginState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(mut self, data: TokenResponse) -> Self {
        self.data = Some(data);
        self
    }

    /// Signal an aborted attempt with a user-facing error code.
    pub fn error(&self, code: &'static str) -> Signal {
        Signal::Error(code)
    }

    /// Signal that the attempt should proceed to the next step.
    pub fn next_step(&self) -> Signal {
        Signal::Proceed
    }
}

/// One step in the login flow.
pub trait AuthStep: Send + Sync {
    fn dispatch(&self, request: &LoginRequest, state: &mut LoginState) -> Signal;
}

/// Result of running a full pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Every step proceeded
    Complete,
    /// A step aborted with this error code
    Error(&'static str),
}

/// Ordered sequence of login steps. Stops at the first error signal.
pub struct LoginPipeline {
    steps: Vec<Box<dyn AuthStep>>,
}

impl LoginPipeline {
    pub fn new(steps: Vec<Box<dyn AuthStep>>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn run(&self, request: &LoginRequest, state: &mut LoginState) -> PipelineOutcome {
        for step in &self.steps {
            match step.dispatch(request, state) {
                Signal::Proceed => continue,
                Signal::Error(code) => return PipelineOutcome::Error(code),
            }
        }
        PipelineOutcome::Complete
    }
}
