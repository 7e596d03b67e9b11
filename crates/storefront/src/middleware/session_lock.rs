//! Per-session serialization of state-changing requests.
//!
//! A cart write is load, reduce, insert, and then a save performed by the
//! session layer once the handler has returned. Requests that may change the
//! cart therefore hold a lock for their session across the whole inner
//! stack, so each one sees the cart saved by the previous one.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use moka::future::Cache;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tower_sessions::cookie::Cookie;

use super::session::SESSION_COOKIE_NAME;

/// Upper bound on tracked sessions.
const MAX_LOCKS: u64 = 100_000;

/// Locks unused for this long are dropped.
const LOCK_IDLE_SECS: u64 = 300;

/// Registry of per-session locks, keyed by session cookie value.
#[derive(Clone)]
pub struct SessionLocks {
    locks: Cache<String, Arc<Mutex<()>>>,
}

impl SessionLocks {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        let locks = Cache::builder()
            .max_capacity(MAX_LOCKS)
            .time_to_idle(Duration::from_secs(LOCK_IDLE_SECS))
            .build();
        Self { locks }
    }

    /// Wait for exclusive access to the session identified by `session_key`.
    pub async fn lock(&self, session_key: &str) -> OwnedMutexGuard<()> {
        let lock = self
            .locks
            .get_with_by_ref(session_key, async { Arc::new(Mutex::new(())) })
            .await;
        lock.lock_owned().await
    }
}

impl Default for SessionLocks {
    fn default() -> Self {
        Self::new()
    }
}

/// Value of the session cookie, if the request carries one.
fn session_cookie(request: &Request) -> Option<String> {
    request
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
}

/// Middleware that serializes unsafe-method requests per session.
///
/// Requests without a session cookie start a fresh session and cannot race
/// with anything, so they pass straight through, as do GET/HEAD requests.
pub async fn session_lock_middleware(
    State(locks): State<SessionLocks>,
    request: Request,
    next: Next,
) -> Response {
    if request.method().is_safe() {
        return next.run(request).await;
    }
    let Some(session_key) = session_cookie(&request) else {
        return next.run(request).await;
    };

    let _guard = locks.lock(&session_key).await;
    next.run(request).await
}
