//! JWT inspection without signature verification
//!
//! The client only needs to know whether a token is worth sending. The
//! server remains the authority on validity, so nothing here checks
//! signatures.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Access token plus optional refresh token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Decoded JWT payload; only `exp` is interpreted
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Claims {
    pub exp: i64,
    #[serde(default)]
    pub sub: Option<serde_json::Value>,
}

impl Claims {
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// Decode the payload segment of a JWT
///
/// Returns `None` for anything that is not three dot-separated segments
/// with a base64url JSON payload carrying a numeric `exp`.
#[must_use]
pub fn decode_claims(token: &str) -> Option<Claims> {
    let segments: Vec<&str> = token.trim().split('.').collect();
    if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
        return None;
    }

    let payload = URL_SAFE_NO_PAD
        .decode(segments[1].trim_end_matches('='))
        .ok()?;
    let value: serde_json::Value = serde_json::from_slice(&payload).ok()?;

    // `exp` may be serialized as a float by some issuers
    let exp = match value.get("exp")? {
        serde_json::Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64))?,
        _ => return None,
    };

    Some(Claims {
        exp,
        sub: value.get("sub").cloned(),
    })
}

/// Whether `token` is well formed and not yet expired at `now`
#[must_use]
pub fn is_token_valid_at(token: &str, now: DateTime<Utc>) -> bool {
    decode_claims(token).is_some_and(|claims| claims.exp > now.timestamp())
}

/// Whether `token` is well formed and not yet expired
#[must_use]
pub fn is_token_valid(token: &str) -> bool {
    is_token_valid_at(token, Utc::now())
}

#[cfg(test)]
pub(crate) fn make_token(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"1","exp":{exp}}}"#));
    format!("{header}.{payload}.signature")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_and_malformed_tokens_are_invalid() {
        assert!(!is_token_valid(""));
        assert!(!is_token_valid("abc"));
        assert!(!is_token_valid("a.b"));
        assert!(!is_token_valid("a.b.c.d"));
        assert!(!is_token_valid("header.!!!not-base64!!!.sig"));
    }

    #[test]
    fn test_payload_without_exp_is_invalid() {
        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"1"}"#);
        assert!(!is_token_valid(&format!("h.{payload}.s")));

        let payload = URL_SAFE_NO_PAD.encode(br#"{"exp":"tomorrow"}"#);
        assert!(!is_token_valid(&format!("h.{payload}.s")));
    }

    #[test]
    fn test_expiry_comparison() {
        let now = Utc::now().timestamp();
        assert!(is_token_valid(&make_token(now + 3600)));
        assert!(!is_token_valid(&make_token(now - 1)));
    }

    #[test]
    fn test_padded_payload_is_accepted() {
        let now = Utc::now().timestamp();
        let token = make_token(now + 60);
        let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
        parts[1].push_str("==");
        assert!(is_token_valid(&parts.join(".")));
    }

    #[test]
    fn test_claims_expose_expiry() {
        let claims = decode_claims(&make_token(1_700_000_000)).unwrap();
        assert_eq!(claims.expires_at().unwrap().timestamp(), 1_700_000_000);
    }
}
