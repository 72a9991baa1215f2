#![warn(missing_docs)]
//! # cloud-risk-session
//!
//! ## Purpose
//! Owns the client session lifecycle and navigation gating for `cloud-risk`.
//!
//! ## Responsibilities
//! - Decode identity and expiry claims from the bearer token.
//! - Persist the single `token` slot through an injectable [`TokenStore`].
//! - Tear the session down when a token is undecodable or expired.
//! - Gate navigation between anonymous and authenticated views.
//!
//! ## Data flow
//! Login view receives a token -> [`SessionContext::set_token`] persists it
//! and observes it -> [`SessionState`] drives [`route::guard`] decisions and the
//! bearer header of authenticated API calls.
//!
//! ## Ownership and lifetimes
//! The context owns its token copy; the store is shared behind `Arc` so the API
//! layer can read the persisted slot at call time.
//!
//! ## Error model
//! Storage I/O failures surface as [`SessionError::Storage`]. Decode failures
//! are never surfaced to callers of [`SessionContext`]: they force logout.
//!
//! ## Security and privacy notes
//! Token values are never logged. Claims are decoded without signature
//! verification; the backend remains the authority on token validity.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use cloud_risk_session::{MemoryTokenStore, SessionContext};
//!
//! let session = SessionContext::restore(Arc::new(MemoryTokenStore::default()), 0).unwrap();
//! assert!(!session.is_authenticated());
//! ```

pub mod route;
mod store;

use std::sync::Arc;

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

pub use route::{Route, RouteDecision, guard};
pub use store::{FileTokenStore, MemoryTokenStore, TokenStore};

/// Key of the persisted token slot.
pub const TOKEN_SLOT_KEY: &str = "token";

/// Claims carried in the token payload segment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TokenClaims {
    /// Account email of the signed-in user.
    pub email: String,
    /// Expiry in Unix epoch seconds.
    pub exp: i64,
}

impl TokenClaims {
    /// Absolute expiry in epoch milliseconds.
    pub fn expires_at_ms(&self) -> i64 {
        self.exp.saturating_mul(1000)
    }

    /// Returns `true` once `now_ms` reaches the expiry instant.
    pub fn is_expired(&self, now_ms: u64) -> bool {
        self.expires_at_ms() <= i64::try_from(now_ms).unwrap_or(i64::MAX)
    }
}

/// Decodes the payload segment of a JWT-shaped token.
///
/// The signature is not checked.
///
/// # Errors
/// Returns [`SessionError::Decode`] when the token has no payload segment, the
/// segment is not base64url, or the JSON lacks `email`/`exp`.
pub fn decode_claims(token: &str) -> Result<TokenClaims, SessionError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| SessionError::Decode("token has no payload segment".to_string()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|error| SessionError::Decode(format!("payload is not base64url: {error}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|error| SessionError::Decode(format!("payload claims are invalid: {error}")))
}

/// Signed-in identity derived from a valid token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Account email.
    pub email: String,
    /// Absolute expiry in epoch milliseconds.
    pub expires_at_ms: i64,
}

/// Observable session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// No token is held.
    Anonymous,
    /// A decodable, unexpired token is held.
    Authenticated(Identity),
}

/// Why a session was torn down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeardownReason {
    /// Explicit logout.
    Logout,
    /// Token expiry reached.
    Expired,
    /// Token payload could not be decoded.
    Undecodable,
}

/// Session context constructed once at the application root.
///
/// Holds at most one token. Every token change is observed exactly once:
/// an undecodable or expired token logs the session out immediately.
#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn TokenStore>,
    token: Option<String>,
    state: SessionState,
}

impl std::fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionContext")
            .field("has_token", &self.token.is_some())
            .field("state", &self.state)
            .finish()
    }
}

impl SessionContext {
    /// Loads the persisted token and observes it.
    ///
    /// # Errors
    /// Returns [`SessionError::Storage`] when the slot cannot be read or a
    /// teardown cannot clear it.
    pub fn restore(store: Arc<dyn TokenStore>, now_ms: u64) -> Result<Self, SessionError> {
        let token = store.load()?;
        let mut context = Self {
            store,
            token,
            state: SessionState::Anonymous,
        };
        context.observe(now_ms)?;
        Ok(context)
    }

    /// Replaces the held token and persists it.
    ///
    /// A `None` or blank value clears the persisted slot.
    ///
    /// # Errors
    /// Returns [`SessionError::Storage`] on slot write failure.
    pub fn set_token(&mut self, token: Option<String>, now_ms: u64) -> Result<(), SessionError> {
        let token = token.filter(|value| !value.trim().is_empty());
        match &token {
            Some(value) => self.store.save(value)?,
            None => self.store.clear()?,
        }
        self.token = token;
        self.observe(now_ms)
    }

    /// Clears token, identity, and persisted slot. Idempotent.
    ///
    /// # Errors
    /// Returns [`SessionError::Storage`] when the slot cannot be cleared; the
    /// in-memory session is cleared regardless.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        self.teardown(TeardownReason::Logout)
    }

    /// Current session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Held token, if any.
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Signed-in email, if any.
    pub fn email(&self) -> Option<&str> {
        match &self.state {
            SessionState::Authenticated(identity) => Some(&identity.email),
            SessionState::Anonymous => None,
        }
    }

    /// Returns `true` while a token is held.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Reads the bearer token from the persisted slot at call time.
    ///
    /// # Errors
    /// Returns [`SessionError::Storage`] when the slot cannot be read.
    pub fn bearer(&self) -> Result<Option<String>, SessionError> {
        self.store.load()
    }

    fn observe(&mut self, now_ms: u64) -> Result<(), SessionError> {
        let Some(token) = &self.token else {
            self.state = SessionState::Anonymous;
            return Ok(());
        };

        match decode_claims(token) {
            Ok(claims) if claims.is_expired(now_ms) => self.teardown(TeardownReason::Expired),
            Ok(claims) => {
                debug!(expires_at_ms = claims.expires_at_ms(), "session token accepted");
                self.state = SessionState::Authenticated(Identity {
                    expires_at_ms: claims.expires_at_ms(),
                    email: claims.email,
                });
                Ok(())
            }
            Err(error) => {
                debug!(%error, "session token rejected");
                self.teardown(TeardownReason::Undecodable)
            }
        }
    }

    fn teardown(&mut self, reason: TeardownReason) -> Result<(), SessionError> {
        let had_token = self.token.take().is_some();
        self.state = SessionState::Anonymous;
        if had_token {
            info!(?reason, "session torn down");
        }
        self.store.clear()
    }
}

/// Errors produced by session storage.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Token slot could not be read or written.
    #[error("token storage failure: {0}")]
    Storage(String),
    /// Token payload could not be decoded.
    #[error("token decode failure: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    //! Unit tests for claim decoding and session transitions.

    use super::*;

    fn token_for(payload: &str) -> String {
        format!(
            "{}.{}.sig",
            URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#),
            URL_SAFE_NO_PAD.encode(payload.as_bytes())
        )
    }

    #[test]
    fn decodes_email_and_expiry() {
        let claims = decode_claims(&token_for(r#"{"email":"a@b.com","exp":10}"#))
            .expect("claims should decode");
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.expires_at_ms(), 10_000);
    }

    #[test]
    fn rejects_tokens_without_required_claims() {
        assert!(decode_claims(&token_for(r#"{"email":"a@b.com"}"#)).is_err());
        assert!(decode_claims(&token_for(r#"{"exp":10}"#)).is_err());
        assert!(decode_claims(&token_for("not json")).is_err());
        assert!(decode_claims("opaque").is_err());
    }

    #[test]
    fn expiry_boundary_is_inclusive() {
        let claims = TokenClaims {
            email: "a@b.com".to_string(),
            exp: 5,
        };
        assert!(!claims.is_expired(4_999));
        assert!(claims.is_expired(5_000));
    }

    #[test]
    fn blank_token_clears_session() {
        let store = Arc::new(MemoryTokenStore::default());
        let mut session = SessionContext::restore(store.clone(), 0).expect("restore");
        session
            .set_token(Some(token_for(r#"{"email":"a@b.com","exp":10}"#)), 0)
            .expect("set token");
        assert!(session.is_authenticated());

        session.set_token(Some("  ".to_string()), 0).expect("clear");
        assert!(!session.is_authenticated());
        assert_eq!(store.load().expect("load"), None);
    }
}
