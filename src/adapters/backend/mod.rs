//! reqwest adapters for the document-analysis backend.

pub mod auth;
mod error_body;
pub mod insights;
pub mod verification;

pub use auth::HttpAuthGateway;
pub use insights::BackendInsightsClient;
pub use verification::HttpVerificationClient;

use url::Url;

/// Base URL without trailing slashes, ready for `/api/...` paths.
pub(crate) fn normalize_base(base_url: &Url) -> String {
    base_url.as_str().trim_end_matches('/').to_string()
}
