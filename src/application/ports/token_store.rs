use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use crate::app_error::AppResult;
use crate::entities::credential::Credential;

/// Fixed storage keys for the three credential values.
pub const TOKEN_KEY: &str = "ai_verifier_token";
pub const USERNAME_KEY: &str = "ai_verifier_username";
pub const ROLE_KEY: &str = "ai_verifier_role";

/// Durable, process-wide storage of the current credential.
///
/// Implementations write the three values as a group: a `read` never observes
/// a half-written credential, and any missing value reads as "no session".
pub trait TokenStore: Send + Sync {
    fn save(&self, credential: &Credential) -> AppResult<()>;

    fn read(&self) -> Option<Credential>;

    fn clear(&self) -> AppResult<()>;

    /// `Authorization: Bearer <token>` when a credential is stored, else an empty map.
    fn auth_header(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(credential) = self.read() {
            if let Ok(value) = HeaderValue::from_str(&credential.bearer()) {
                headers.insert(AUTHORIZATION, value);
            }
        }
        headers
    }
}
