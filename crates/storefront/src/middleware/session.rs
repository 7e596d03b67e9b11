//! Session middleware configuration.
//!
//! Sessions live in memory only: a visitor's cart disappears when the
//! session expires or the process restarts. The `moka` store evicts expired
//! records, and caps the number of live sessions.

use tower_sessions::{Expiry, SessionManagerLayer};
use tower_sessions_moka_store::MokaStore;

use crate::config::StorefrontConfig;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "fs_session";

/// Session expiry after inactivity, in seconds (24 hours).
const SESSION_EXPIRY_SECONDS: i64 = 24 * 60 * 60;

/// Maximum number of sessions held at once.
const MAX_SESSIONS: u64 = 100_000;

/// Create an empty in-memory session store.
#[must_use]
pub fn create_session_store() -> MokaStore {
    MokaStore::new(Some(MAX_SESSIONS))
}

/// Create the session layer backed by a fresh in-memory store.
#[must_use]
pub fn create_session_layer(config: &StorefrontConfig) -> SessionManagerLayer<MokaStore> {
    SessionManagerLayer::new(create_session_store())
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_secure())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use tower_sessions::cookie::time::{Duration, OffsetDateTime};
    use tower_sessions::session::{Id, Record};
    use tower_sessions::session_store::SessionStore;

    use super::*;

    fn record(expires_in: Duration) -> Record {
        let mut data = HashMap::new();
        data.insert("cart".to_string(), serde_json::json!([]));
        Record {
            id: Id::default(),
            data,
            expiry_date: OffsetDateTime::now_utc() + expires_in,
        }
    }

    #[tokio::test]
    async fn test_live_session_is_kept() {
        let store = create_session_store();
        let mut live = record(Duration::hours(1));

        store.create(&mut live).await.unwrap();

        let loaded = store.load(&live.id).await.unwrap().unwrap();
        assert_eq!(loaded.id, live.id);
        assert_eq!(loaded.data, live.data);
    }

    #[tokio::test]
    async fn test_expired_session_is_evicted() {
        let store = create_session_store();
        let mut expired = record(Duration::seconds(-1));

        store.create(&mut expired).await.unwrap();

        assert!(store.load(&expired.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_deleted_session_is_gone() {
        let store = create_session_store();
        let mut live = record(Duration::hours(1));
        store.create(&mut live).await.unwrap();

        store.delete(&live.id).await.unwrap();

        assert!(store.load(&live.id).await.unwrap().is_none());
    }
}
