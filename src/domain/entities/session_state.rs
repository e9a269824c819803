use chrono::{DateTime, Utc};
use serde::Serialize;

use super::verification::VerificationResult;

/// Which credential form the unauthenticated screen shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthMode {
    #[default]
    Login,
    Signup,
}

impl AuthMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuthMode::Login => "login",
            AuthMode::Signup => "signup",
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Signup,
            AuthMode::Signup => AuthMode::Login,
        }
    }
}

impl std::fmt::Display for AuthMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The page-level state. Exactly one variant is active at a time.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum SessionState {
    Unauthenticated {
        mode: AuthMode,
        pending_error: Option<String>,
    },
    AuthenticatedIdle,
    VerificationPending {
        submitted_at: DateTime<Utc>,
    },
    VerificationError {
        message: String,
    },
    VerificationComplete {
        result: VerificationResult,
    },
}

impl SessionState {
    pub fn login() -> Self {
        SessionState::Unauthenticated {
            mode: AuthMode::Login,
            pending_error: None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        !matches!(self, SessionState::Unauthenticated { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, SessionState::VerificationPending { .. })
    }

    pub fn name(&self) -> &'static str {
        match self {
            SessionState::Unauthenticated { .. } => "unauthenticated",
            SessionState::AuthenticatedIdle => "authenticated_idle",
            SessionState::VerificationPending { .. } => "verification_pending",
            SessionState::VerificationError { .. } => "verification_error",
            SessionState::VerificationComplete { .. } => "verification_complete",
        }
    }
}

/// Read-only copy of the session for renderers. Never carries the token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionView {
    pub state: SessionState,
    pub subject: Option<String>,
    pub role: Option<String>,
    pub epoch: u64,
}

impl SessionView {
    /// Whether the upload surface should accept a new document.
    pub fn can_submit(&self) -> bool {
        matches!(self.state, SessionState::AuthenticatedIdle)
    }
}
