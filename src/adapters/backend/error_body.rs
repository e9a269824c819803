use reqwest::Response;
use serde::Deserialize;

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Human-readable message from a JSON error body.
/// `Err` when the body is not JSON at all.
pub(crate) fn parse_message(body: &[u8]) -> Result<Option<String>, serde_json::Error> {
    let parsed: ErrorBody = serde_json::from_slice(body)?;
    Ok(parsed.message.filter(|m| !m.trim().is_empty()))
}

/// Message for a non-2xx response: the body's `message`, else the status
/// reason phrase when the body is unparsable, else `fallback`.
pub(crate) async fn failure_message(response: Response, fallback: &str) -> String {
    let reason = response.status().canonical_reason();
    let body = response.bytes().await.unwrap_or_default();

    match parse_message(&body) {
        Ok(Some(message)) => message,
        Ok(None) => fallback.to_string(),
        Err(_) => reason.unwrap_or(fallback).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_message() {
        assert_eq!(
            parse_message(br#"{"message":"OCR engine timeout","status":500}"#).unwrap(),
            Some("OCR engine timeout".to_string())
        );
        assert_eq!(parse_message(br#"{"status":500}"#).unwrap(), None);
        assert_eq!(parse_message(br#"{"message":"  "}"#).unwrap(), None);
        assert!(parse_message(b"<html>Bad Gateway</html>").is_err());
        assert!(parse_message(b"").is_err());
    }
}
