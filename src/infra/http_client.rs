//! HTTP client factory with consistent timeout configuration.
//!
//! Backend adapters take a `reqwest::Client` built here rather than
//! constructing one themselves.

use reqwest::Client;
use std::time::Duration;

/// TCP handshake + TLS.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client with the shared connect timeout and a caller-chosen total timeout.
/// Uploads get their own, longer one since the backend runs OCR before answering.
pub fn build_client(request_timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
        .timeout(request_timeout)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_request_timeout_applies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_millis(500)))
            .mount(&server)
            .await;

        let err = build_client(Duration::from_millis(50))
            .unwrap()
            .get(server.uri())
            .send()
            .await
            .unwrap_err();
        assert!(err.is_timeout());
    }
}
