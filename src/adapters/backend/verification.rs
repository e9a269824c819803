use std::sync::Arc;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use tracing::{debug, instrument};
use url::Url;

use super::{error_body, normalize_base};
use crate::app_error::{AppError, AppResult};
use crate::application::ports::{TokenStore, VerificationGateway};
use crate::entities::document::DocumentFile;
use crate::entities::verification::VerificationResult;

const FALLBACK_MESSAGE: &str = "Verification failed";

/// Posts documents to `/api/verify` as multipart field `file`.
#[derive(Clone)]
pub struct HttpVerificationClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl HttpVerificationClient {
    pub fn new(client: Client, base_url: &Url, store: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            base_url: normalize_base(base_url),
            store,
        }
    }
}

#[async_trait]
impl VerificationGateway for HttpVerificationClient {
    #[instrument(skip(self, file), fields(file_name = %file.file_name))]
    async fn verify(&self, file: DocumentFile) -> AppResult<VerificationResult> {
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str(file.kind.mime_type())
            .map_err(|e| AppError::Internal(e.to_string()))?;
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/api/verify", self.base_url))
            .headers(self.store.auth_header())
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::VerificationFailed("Verification timed out".to_string())
                } else {
                    AppError::VerificationFailed(format!("{}: {}", FALLBACK_MESSAGE, e))
                }
            })?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            debug!(%status, "verification rejected the credential");
            return Err(AppError::TokenInvalid);
        }

        if !status.is_success() {
            debug!(%status, "verification returned non-success");
            return Err(AppError::VerificationFailed(
                error_body::failure_message(response, FALLBACK_MESSAGE).await,
            ));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::VerificationFailed(format!("{}: {}", FALLBACK_MESSAGE, e)))?;

        serde_json::from_slice::<VerificationResult>(&body)
            .map_err(|e| AppError::ProtocolError(e.to_string()))
    }
}
