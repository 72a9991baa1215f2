//! Integration tests for expiry-driven session teardown.

mod common;

use std::sync::Arc;

use cloud_risk_session::{MemoryTokenStore, SessionContext, SessionState, TokenStore};

const NOW_MS: u64 = 1_700_000_000_000;

#[test]
fn session_expiry_tests_expired_token_logs_out_authenticated_session() {
    let store = Arc::new(MemoryTokenStore::default());
    let mut session = SessionContext::restore(store.clone(), NOW_MS).expect("restore");

    session
        .set_token(Some(common::token("a@b.com", 1_800_000_000)), NOW_MS)
        .expect("valid token");
    assert_eq!(session.email(), Some("a@b.com"));

    session
        .set_token(Some(common::token("a@b.com", 1_600_000_000)), NOW_MS)
        .expect("expired token");
    assert_eq!(session.state(), &SessionState::Anonymous);
    assert_eq!(session.email(), None);
    assert!(!session.is_authenticated());
    assert_eq!(store.load().expect("load"), None);
}

#[test]
fn session_expiry_tests_token_expiring_exactly_now_is_rejected() {
    let store = Arc::new(MemoryTokenStore::default());
    let mut session = SessionContext::restore(store, NOW_MS).expect("restore");

    session
        .set_token(Some(common::token("a@b.com", (NOW_MS / 1000) as i64)), NOW_MS)
        .expect("boundary token");
    assert!(!session.is_authenticated());
}

#[test]
fn session_expiry_tests_restore_tears_down_stale_persisted_token() {
    let store = Arc::new(MemoryTokenStore::with_token(common::token("a@b.com", 1)));
    let session = SessionContext::restore(store.clone(), NOW_MS).expect("restore");

    assert!(!session.is_authenticated());
    assert_eq!(store.load().expect("load"), None);
}
