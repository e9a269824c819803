use std::sync::Arc;

use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};
use url::Url;

use super::normalize_base;
use crate::app_error::{AppError, AppResult};
use crate::application::ports::TokenStore;
use crate::entities::verification::HealthStatus;

pub const DEFAULT_HISTORY_LIMIT: u32 = 50;

/// Read-only endpoints of the backend. Nothing here touches session state.
#[derive(Clone)]
pub struct BackendInsightsClient {
    client: Client,
    base_url: String,
    store: Arc<dyn TokenStore>,
}

impl BackendInsightsClient {
    pub fn new(client: Client, base_url: &Url, store: Arc<dyn TokenStore>) -> Self {
        Self {
            client,
            base_url: normalize_base(base_url),
            store,
        }
    }

    #[instrument(skip(self))]
    pub async fn health(&self) -> AppResult<HealthStatus> {
        self.fetch("Health check", self.get("/api/health")).await
    }

    #[instrument(skip(self))]
    pub async fn recent_verifications(&self, limit: Option<u32>) -> AppResult<Vec<Value>> {
        let limit = limit.unwrap_or(DEFAULT_HISTORY_LIMIT);
        self.fetch(
            "Fetching verifications",
            self.get("/api/verifications").query(&[("limit", limit)]),
        )
        .await
    }

    #[instrument(skip(self))]
    pub async fn stats(&self) -> AppResult<Value> {
        self.fetch("Fetching stats", self.get("/api/stats")).await
    }

    fn get(&self, path: &str) -> RequestBuilder {
        self.client
            .get(format!("{}{}", self.base_url, path))
            .headers(self.store.auth_header())
    }

    async fn fetch<T: DeserializeOwned>(&self, what: &str, request: RequestBuilder) -> AppResult<T> {
        let response = request
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("{} failed: {}", what, e)))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%status, what, "insights request returned non-success");
            return Err(AppError::Internal(format!(
                "{} failed with status {}",
                what,
                status.as_u16()
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| AppError::ProtocolError(e.to_string()))
    }
}
