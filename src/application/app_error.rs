use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// Bad credentials or signup conflict. Shown inline next to the form.
    #[error("{0}")]
    AuthenticationFailed(String),

    /// The backend no longer accepts the stored token.
    #[error("Session expired. Please log in again.")]
    TokenInvalid,

    /// Backend-reported failure or transport error while verifying.
    #[error("{0}")]
    VerificationFailed(String),

    /// The backend answered 2xx with a body that does not match the contract.
    #[error("Unexpected response from verification service: {0}")]
    ProtocolError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not authenticated")]
    NotAuthenticated,

    #[error("Token store error: {0}")]
    Storage(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::AuthenticationFailed(_) => ErrorCode::AuthenticationFailed,
            AppError::TokenInvalid => ErrorCode::TokenInvalid,
            AppError::VerificationFailed(_) => ErrorCode::VerificationFailed,
            AppError::ProtocolError(_) => ErrorCode::ProtocolError,
            AppError::InvalidInput(_) => ErrorCode::InvalidInput,
            AppError::NotAuthenticated => ErrorCode::NotAuthenticated,
            AppError::Storage(_) => ErrorCode::StorageError,
            AppError::Config(_) => ErrorCode::ConfigError,
            AppError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Failures the user can recover from with a single action (retry, re-login).
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AppError::Config(_) | AppError::Internal(_))
    }

    /// Process exit status for the CLI: 1 when the user can act on it, 2 otherwise.
    pub fn exit_status(&self) -> u8 {
        if self.is_recoverable() { 1 } else { 2 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorCode {
    AuthenticationFailed,
    TokenInvalid,
    VerificationFailed,
    ProtocolError,
    InvalidInput,
    NotAuthenticated,
    StorageError,
    ConfigError,
    InternalError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::AuthenticationFailed => "AUTHENTICATION_FAILED",
            ErrorCode::TokenInvalid => "TOKEN_INVALID",
            ErrorCode::VerificationFailed => "VERIFICATION_FAILED",
            ErrorCode::ProtocolError => "PROTOCOL_ERROR",
            ErrorCode::InvalidInput => "INVALID_INPUT",
            ErrorCode::NotAuthenticated => "NOT_AUTHENTICATED",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::ConfigError => "CONFIG_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_pass_through_for_user_facing_variants() {
        assert_eq!(
            AppError::VerificationFailed("OCR engine timeout".into()).to_string(),
            "OCR engine timeout"
        );
        assert_eq!(
            AppError::AuthenticationFailed("Login failed".into()).to_string(),
            "Login failed"
        );
    }

    #[test]
    fn test_codes() {
        assert_eq!(AppError::TokenInvalid.code().as_str(), "TOKEN_INVALID");
        assert_eq!(
            AppError::ProtocolError("x".into()).code(),
            ErrorCode::ProtocolError
        );
        assert_eq!(ErrorCode::InternalError.to_string(), "INTERNAL_ERROR");
    }

    #[test]
    fn test_recoverability() {
        assert!(AppError::VerificationFailed("x".into()).is_recoverable());
        assert!(AppError::ProtocolError("x".into()).is_recoverable());
        assert!(AppError::AuthenticationFailed("x".into()).is_recoverable());
        assert!(!AppError::Config("x".into()).is_recoverable());
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(AppError::NotAuthenticated.exit_status(), 1);
        assert_eq!(AppError::InvalidInput("x".into()).exit_status(), 1);
        assert_eq!(AppError::Config("x".into()).exit_status(), 2);
        assert_eq!(AppError::Internal("x".into()).exit_status(), 2);
    }
}
