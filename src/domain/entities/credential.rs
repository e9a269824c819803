use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

/// Role assigned when the backend omits one.
pub const DEFAULT_ROLE: &str = "USER";

/// The authenticated identity held by a client session.
///
/// All three fields are always present; a partial credential is not
/// representable and is treated as "no session" by every store.
#[derive(Debug, Clone)]
pub struct Credential {
    pub token: SecretString,
    pub subject: String,
    pub role: String,
}

impl Credential {
    pub fn new(token: impl Into<String>, subject: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            token: SecretString::from(token.into()),
            subject: subject.into(),
            role: role.into(),
        }
    }

    /// Assemble a credential from individually stored values.
    /// Returns `None` unless every value is present and non-empty.
    pub fn from_parts(
        token: Option<String>,
        subject: Option<String>,
        role: Option<String>,
    ) -> Option<Self> {
        match (token, subject, role) {
            (Some(token), Some(subject), Some(role))
                if !token.is_empty() && !subject.is_empty() && !role.is_empty() =>
            {
                Some(Self::new(token, subject, role))
            }
            _ => None,
        }
    }

    /// Value for the `Authorization` header.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token.expose_secret())
    }

    /// Same token, claims refreshed from a revalidation response.
    /// Missing claims keep the currently stored values.
    pub fn with_claims(&self, subject: Option<String>, role: Option<String>) -> Self {
        Self {
            token: self.token.clone(),
            subject: subject
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| self.subject.clone()),
            role: role.filter(|r| !r.is_empty()).unwrap_or_else(|| self.role.clone()),
        }
    }

    /// Whether two credentials carry the same token and claims.
    pub fn same_as(&self, other: &Credential) -> bool {
        self.token.expose_secret() == other.token.expose_secret()
            && self.subject == other.subject
            && self.role == other.role
    }
}

/// Response of `GET /api/auth/validate`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenValidation {
    #[serde(default)]
    pub valid: bool,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
}

impl TokenValidation {
    /// The fail-closed answer used for network errors and non-2xx responses.
    pub fn rejected() -> Self {
        Self::default()
    }
}
