use async_trait::async_trait;
use secrecy::SecretString;

use crate::app_error::AppResult;
use crate::entities::credential::{Credential, TokenValidation};

/// Login, signup and token revalidation against the backend.
///
/// Implementations never touch the token store; the orchestrator decides what
/// to persist.
#[async_trait]
pub trait AuthGateway: Send + Sync {
    /// Fails with `AuthenticationFailed` on a non-2xx status or a response
    /// missing `token`/`username`. Role defaults to `USER`.
    async fn login(&self, username: &str, password: &SecretString) -> AppResult<Credential>;

    async fn signup(&self, username: &str, password: &SecretString) -> AppResult<Credential>;

    /// Never errors: network failures and non-2xx responses resolve to
    /// `TokenValidation::rejected()`.
    async fn validate_token(&self, credential: &Credential) -> TokenValidation;
}
