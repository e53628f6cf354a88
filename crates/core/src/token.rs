//! Bearer-token expiry inspection.
//!
//! Decodes the payload segment of a JWT-shaped bearer token to read its
//! `exp` claim. No signature verification happens here: the remote API
//! enforces authorization on every call, and this check exists only to
//! pre-empt doomed requests and end the session proactively. A token that
//! cannot be decoded counts as expired (fail-safe).

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use thiserror::Error;

/// Why a token's expiry could not be read.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    /// The token has no payload segment.
    #[error("token is not a dot-separated bearer token")]
    Malformed,
    /// The payload segment is not base64url-encoded JSON.
    #[error("token payload could not be decoded")]
    Payload,
    /// The payload decoded but carries no integer `exp` claim.
    #[error("token payload has no usable exp claim")]
    MissingExpiry,
}

/// Decode the `exp` claim (seconds since epoch) from a token's payload.
///
/// # Errors
///
/// Returns a [`TokenError`] when the token is not a dot-separated compact
/// encoding, the payload is not base64url JSON, or `exp` is absent.
pub fn decode_expiry(token: &str) -> Result<i64, TokenError> {
    let payload = token.split('.').nth(1).ok_or(TokenError::Malformed)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| TokenError::Payload)?;
    let claims: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|_| TokenError::Payload)?;
    claims
        .get("exp")
        .and_then(serde_json::Value::as_i64)
        .ok_or(TokenError::MissingExpiry)
}

/// Whether the token is expired at the given wall-clock instant.
///
/// Undecodable tokens are treated as expired so callers evict them.
#[must_use]
pub fn is_expired_at(token: &str, now_ms: i64) -> bool {
    decode_expiry(token).map_or(true, |exp| exp.saturating_mul(1000) < now_ms)
}

/// Whether the token is expired right now.
#[must_use]
pub fn is_expired(token: &str) -> bool {
    is_expired_at(token, chrono::Utc::now().timestamp_millis())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    /// Build a compact three-segment token carrying the given claims JSON.
    fn token_with_payload(claims: &str) -> String {
        let header = URL_SAFE_NO_PAD.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims);
        format!("{header}.{payload}.unverified")
    }

    fn token_with_exp(exp: i64) -> String {
        token_with_payload(&format!(r#"{{"sub":"EMP-1","exp":{exp}}}"#))
    }

    #[test]
    fn test_decode_expiry() {
        let token = token_with_exp(1_700_000_000);
        assert_eq!(decode_expiry(&token), Ok(1_700_000_000));
    }

    #[test]
    fn test_past_exp_is_expired() {
        let token = token_with_exp(1_000);
        assert!(is_expired_at(&token, 2_000 * 1000));
    }

    #[test]
    fn test_future_exp_is_not_expired() {
        let token = token_with_exp(2_000);
        assert!(!is_expired_at(&token, 1_000 * 1000));
    }

    #[test]
    fn test_exp_boundary() {
        // `exp * 1000 < now` - a token expiring exactly now is still valid.
        let token = token_with_exp(1_000);
        assert!(!is_expired_at(&token, 1_000 * 1000));
        assert!(is_expired_at(&token, 1_000 * 1000 + 1));
    }

    #[test]
    fn test_undecodable_token_is_expired() {
        assert!(is_expired_at("not-a-token", 0));
        assert!(is_expired_at("two.segments!!", 0));
        assert!(is_expired_at("", 0));
    }

    #[test]
    fn test_missing_payload_segment() {
        assert_eq!(decode_expiry("singlesegment"), Err(TokenError::Malformed));
    }

    #[test]
    fn test_payload_not_base64() {
        assert_eq!(decode_expiry("a.%%%.c"), Err(TokenError::Payload));
    }

    #[test]
    fn test_payload_not_json() {
        let garbage = URL_SAFE_NO_PAD.encode("plain text");
        assert_eq!(
            decode_expiry(&format!("a.{garbage}.c")),
            Err(TokenError::Payload)
        );
    }

    #[test]
    fn test_missing_exp_claim() {
        let token = token_with_payload(r#"{"sub":"EMP-1"}"#);
        assert_eq!(decode_expiry(&token), Err(TokenError::MissingExpiry));
        assert!(is_expired_at(&token, 0));
    }
}
