//! Shared fixtures for session integration tests.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;

/// Builds an unsigned JWT-shaped token carrying `email` and `exp`.
#[allow(dead_code)]
pub fn token(email: &str, exp_seconds: i64) -> String {
    raw_token(&format!(r#"{{"email":"{email}","exp":{exp_seconds}}}"#))
}

/// Builds an unsigned JWT-shaped token around an arbitrary payload.
#[allow(dead_code)]
pub fn raw_token(payload: &str) -> String {
    format!(
        "{}.{}.signature",
        URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#),
        URL_SAFE_NO_PAD.encode(payload.as_bytes())
    )
}
