use async_trait::async_trait;

use crate::app_error::AppResult;
use crate::entities::document::DocumentFile;
use crate::entities::verification::VerificationResult;

/// Submits a document for analysis.
///
/// Errors are already normalised: `VerificationFailed` for backend or
/// transport failures, `ProtocolError` for a 2xx body of the wrong shape and
/// `TokenInvalid` when the backend rejects the credential.
#[async_trait]
pub trait VerificationGateway: Send + Sync {
    async fn verify(&self, file: DocumentFile) -> AppResult<VerificationResult>;
}
