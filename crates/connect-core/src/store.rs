//! # Authorization Token Store
//!
//! Maps a session id to the provider-issued authorization token, with a
//! fixed time-to-live. Entries are ephemeral: losing the store only forces
//! the user back through authorization, so the backing is a cache, not a
//! database. Callers cannot tell "never stored" from "expired" and must
//! treat both as re-authorization required.

use crate::account::AuthToken;
use crate::error::ConnectResult;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// Storage contract for authorization tokens, keyed by session id.
///
/// Implementations are constructed once at startup and injected into the
/// handlers that need them; there is no process-global instance.
#[async_trait]
pub trait AuthTokenStore: Send + Sync {
    /// Associate an authorization token with a session id (last write wins)
    async fn put(&self, auth_token: AuthToken, session_id: Uuid) -> ConnectResult<()>;

    /// Fetch the live token for a session id.
    ///
    /// Returns `None` both when never set and when expired.
    async fn get(&self, session_id: Uuid) -> ConnectResult<Option<AuthToken>>;
}

/// Type alias for a shared token store (dynamic dispatch)
pub type BoxedAuthTokenStore = Arc<dyn AuthTokenStore>;

#[derive(Clone)]
struct StoredToken {
    token: AuthToken,
    expires_at: i64,
}

/// In-process token store with lazy expiry.
///
/// Expired entries are dropped on read rather than swept; the demo workload
/// (one entry per connected browser) never accumulates enough garbage to
/// need a background sweeper.
#[derive(Clone)]
pub struct MemoryAuthTokenStore {
    entries: Arc<RwLock<HashMap<Uuid, StoredToken>>>,
    ttl: Duration,
}

impl MemoryAuthTokenStore {
    /// Create a store whose entries live for `ttl` after each write
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    fn put_at(&self, auth_token: AuthToken, session_id: Uuid, now: i64) {
        let mut entries = self.entries.write().expect("store lock poisoned");

        // Last write wins for the token as well as the session id: a token
        // re-authorized under a new session must not stay live under the old one.
        entries.retain(|_, stored| stored.token != auth_token);
        entries.insert(
            session_id,
            StoredToken {
                token: auth_token,
                expires_at: now + self.ttl.num_seconds(),
            },
        );
    }

    fn get_at(&self, session_id: Uuid, now: i64) -> Option<AuthToken> {
        let expired = {
            let entries = self.entries.read().expect("store lock poisoned");
            match entries.get(&session_id) {
                Some(stored) if now < stored.expires_at => return Some(stored.token.clone()),
                Some(_) => true,
                None => false,
            }
        };

        if expired {
            self.entries
                .write()
                .expect("store lock poisoned")
                .remove(&session_id);
        }

        None
    }
}

#[async_trait]
impl AuthTokenStore for MemoryAuthTokenStore {
    async fn put(&self, auth_token: AuthToken, session_id: Uuid) -> ConnectResult<()> {
        self.put_at(auth_token, session_id, Utc::now().timestamp());
        Ok(())
    }

    async fn get(&self, session_id: Uuid) -> ConnectResult<Option<AuthToken>> {
        Ok(self.get_at(session_id, Utc::now().timestamp()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryAuthTokenStore {
        MemoryAuthTokenStore::new(Duration::minutes(30))
    }

    #[tokio::test]
    async fn test_put_then_get_returns_token() {
        let store = store();
        let session_id = Uuid::new_v4();

        store
            .put(AuthToken::new("tok123"), session_id)
            .await
            .unwrap();

        let token = store.get(session_id).await.unwrap();
        assert_eq!(token, Some(AuthToken::new("tok123")));
    }

    #[tokio::test]
    async fn test_get_unknown_session_is_absent() {
        assert_eq!(store().get(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_last_write_wins_for_session_id() {
        let store = store();
        let session_id = Uuid::new_v4();

        store.put(AuthToken::new("old"), session_id).await.unwrap();
        store.put(AuthToken::new("new"), session_id).await.unwrap();

        assert_eq!(
            store.get(session_id).await.unwrap(),
            Some(AuthToken::new("new"))
        );
    }

    #[tokio::test]
    async fn test_reauthorized_token_drops_old_session() {
        let store = store();
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        store.put(AuthToken::new("tok"), first).await.unwrap();
        store.put(AuthToken::new("tok"), second).await.unwrap();

        assert_eq!(store.get(first).await.unwrap(), None);
        assert_eq!(
            store.get(second).await.unwrap(),
            Some(AuthToken::new("tok"))
        );
    }

    #[test]
    fn test_entry_expires_after_ttl() {
        let store = store();
        let session_id = Uuid::new_v4();
        let now = 1_700_000_000;
        let ttl = Duration::minutes(30).num_seconds();

        store.put_at(AuthToken::new("tok"), session_id, now);

        assert_eq!(
            store.get_at(session_id, now + ttl - 1),
            Some(AuthToken::new("tok"))
        );
        assert_eq!(store.get_at(session_id, now + ttl), None);

        // Expired entry stays gone even if the clock were re-read earlier
        assert_eq!(store.get_at(session_id, now), None);
    }
}
