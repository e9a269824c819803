use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};
use url::Url;

use super::{error_body, normalize_base};
use crate::app_error::{AppError, AppResult};
use crate::application::ports::AuthGateway;
use crate::entities::credential::{Credential, DEFAULT_ROLE, TokenValidation};

#[derive(Clone)]
pub struct HttpAuthGateway {
    client: Client,
    base_url: String,
}

impl HttpAuthGateway {
    pub fn new(client: Client, base_url: &Url) -> Self {
        Self {
            client,
            base_url: normalize_base(base_url),
        }
    }

    async fn post_credentials(
        &self,
        path: &str,
        username: &str,
        password: &SecretString,
        failure: &str,
    ) -> AppResult<Credential> {
        let body = CredentialsReq {
            username,
            password: password.expose_secret(),
        };

        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "authentication request failed");
                AppError::AuthenticationFailed(failure.to_string())
            })?;

        let status = response.status();
        let raw = response.bytes().await.unwrap_or_default();

        if !status.is_success() {
            debug!(%status, "authentication rejected");
            let message = error_body::parse_message(&raw)
                .ok()
                .flatten()
                .unwrap_or_else(|| failure.to_string());
            return Err(AppError::AuthenticationFailed(message));
        }

        let parsed: AuthResponse = serde_json::from_slice(&raw)
            .map_err(|_| AppError::AuthenticationFailed(failure.to_string()))?;

        match (non_empty(parsed.token), non_empty(parsed.username)) {
            (Some(token), Some(username)) => Ok(Credential::new(
                token,
                username,
                non_empty(parsed.role).unwrap_or_else(|| DEFAULT_ROLE.to_string()),
            )),
            _ => Err(AppError::AuthenticationFailed(failure.to_string())),
        }
    }
}

#[derive(Serialize)]
struct CredentialsReq<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct AuthResponse {
    #[serde(default)]
    token: Option<String>,
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    role: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[async_trait]
impl AuthGateway for HttpAuthGateway {
    #[instrument(skip(self, password))]
    async fn login(&self, username: &str, password: &SecretString) -> AppResult<Credential> {
        self.post_credentials("/api/auth/login", username, password, "Login failed")
            .await
    }

    #[instrument(skip(self, password))]
    async fn signup(&self, username: &str, password: &SecretString) -> AppResult<Credential> {
        self.post_credentials("/api/auth/signup", username, password, "Signup failed")
            .await
    }

    #[instrument(skip(self, credential), fields(subject = %credential.subject))]
    async fn validate_token(&self, credential: &Credential) -> TokenValidation {
        let response = match self
            .client
            .get(format!("{}/api/auth/validate", self.base_url))
            .header(reqwest::header::AUTHORIZATION, credential.bearer())
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "token validation request failed");
                return TokenValidation::rejected();
            }
        };

        if !response.status().is_success() {
            debug!(status = %response.status(), "token validation returned non-success");
            return TokenValidation::rejected();
        }

        response.json::<TokenValidation>().await.unwrap_or_else(|e| {
            warn!(error = %e, "token validation response was unreadable");
            TokenValidation::rejected()
        })
    }
}
