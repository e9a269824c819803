//! Test data factories.
//!
//! Each factory returns a complete, valid value; the closure overrides fields.

use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

use crate::{
    application::jwt::Claims,
    entities::{
        credential::Credential,
        document::DocumentFile,
        verification::{ExtractedData, VerificationResult},
    },
};

/// Credential for `alice` with opaque token `abc`.
pub fn create_test_credential(overrides: impl FnOnce(&mut Credential)) -> Credential {
    let mut credential = Credential::new("abc", "alice", "USER");
    overrides(&mut credential);
    credential
}

/// The high-risk report used throughout the verification tests.
pub fn create_test_result(overrides: impl FnOnce(&mut VerificationResult)) -> VerificationResult {
    let mut result = VerificationResult {
        risk_level: "High".to_string(),
        risk_score: 92.0,
        explanation: vec!["mismatched fonts".to_string()],
        extracted_data: ExtractedData {
            name: "UNKNOWN".to_string(),
            id_number: "X123".to_string(),
            dob: "1990-01-01".to_string(),
        },
    };
    overrides(&mut result);
    result
}

/// Document of `size` filler bytes. The extension of `name` picks the kind.
pub fn create_test_document(name: &str, size: usize) -> DocumentFile {
    DocumentFile::new(name, vec![0xAB; size]).unwrap()
}

/// HS256 token signed with a throwaway key, carrying `sub` and `exp`.
pub fn create_test_jwt(sub: &str, exp: i64) -> String {
    let claims = Claims {
        sub: Some(sub.to_string()),
        role: Some("USER".to_string()),
        exp: Some(exp),
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(b"test-signing-key"),
    )
    .unwrap()
}
