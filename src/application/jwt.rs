use chrono::{DateTime, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

/// Claims the backend puts in its session tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub exp: Option<i64>,
}

/// Decode claims WITHOUT verifying the signature.
///
/// The client never holds the signing key; this is only used to notice an
/// obviously expired token before asking the backend. Returns `None` for
/// opaque (non-JWT) tokens.
pub fn peek_claims(token: &str) -> Option<Claims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.insecure_disable_signature_validation();
    validation.validate_exp = false;
    validation.validate_aud = false;
    validation.required_spec_claims.clear();

    decode::<Claims>(token, &DecodingKey::from_secret(b"ignored"), &validation)
        .map(|data| data.claims)
        .ok()
}

/// Expiry instant of a JWT, if the token is one and carries `exp`.
pub fn expires_at(token: &str) -> Option<DateTime<Utc>> {
    peek_claims(token)?
        .exp
        .and_then(|exp| DateTime::<Utc>::from_timestamp(exp, 0))
}

/// True only when the token is a JWT whose `exp` lies in the past.
pub fn is_expired(token: &str, now: DateTime<Utc>) -> bool {
    expires_at(token).is_some_and(|exp| exp <= now)
}
