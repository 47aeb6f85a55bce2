//! Per-visitor state storage.
//!
//! The gate treats persistence as an opaque string-valued key-value
//! capability with a max-age, not a specific technology. `RedisStore` is
//! the production backend; `MemoryStore` backs the test suite.

use redis::AsyncCommands;
use redis::aio::ConnectionManager;

use wicket_common::WicketError;

/// Opaque keyed state with per-key expiry.
///
/// Read-your-writes consistency per visitor is assumed; atomicity per key
/// is the backend's responsibility.
pub trait StateStore: Send + Sync {
    /// Fetch a value, or None if absent/expired
    async fn get(&self, key: &str) -> Result<Option<String>, WicketError>;

    /// Store a value with an expiry in seconds (overwrites, refreshes TTL)
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), WicketError>;

    /// Delete a value (no-op if absent)
    async fn delete(&self, key: &str) -> Result<(), WicketError>;
}

/// Redis-backed store using an auto-reconnecting connection manager.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
}

impl RedisStore {
    pub async fn connect(url: &str) -> Result<Self, WicketError> {
        let client = redis::Client::open(url)
            .map_err(|e| WicketError::Store(format!("failed to create Redis client: {e}")))?;

        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| WicketError::Store(format!("failed to connect to Redis: {e}")))?;

        Ok(Self { conn })
    }

    /// Liveness probe for the readiness endpoint
    pub async fn ping(&self) -> bool {
        let mut conn = self.conn.clone();
        let result: Result<String, _> = redis::cmd("PING").query_async(&mut conn).await;
        result.is_ok()
    }
}

impl StateStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, WicketError> {
        let mut conn = self.conn.clone();
        conn.get(key)
            .await
            .map_err(|e| WicketError::Store(e.to_string()))
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), WicketError> {
        let mut conn = self.conn.clone();
        conn.set_ex::<_, _, ()>(key, value, ttl_secs)
            .await
            .map_err(|e| WicketError::Store(e.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<(), WicketError> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| WicketError::Store(e.to_string()))
    }
}

/// In-process store with lazy expiry, for tests.
#[cfg(test)]
pub mod memory {
    use super::StateStore;
    use std::collections::HashMap;
    use std::time::{Duration, Instant};
    use tokio::sync::RwLock;
    use wicket_common::WicketError;

    #[derive(Default)]
    pub struct MemoryStore {
        entries: RwLock<HashMap<String, (String, Instant)>>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl StateStore for MemoryStore {
        async fn get(&self, key: &str) -> Result<Option<String>, WicketError> {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some((value, expires_at)) if Instant::now() < *expires_at => {
                    Ok(Some(value.clone()))
                }
                _ => Ok(None),
            }
        }

        async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> Result<(), WicketError> {
            let expires_at = Instant::now() + Duration::from_secs(ttl_secs);
            self.entries
                .write()
                .await
                .insert(key.to_string(), (value.to_string(), expires_at));
            Ok(())
        }

        async fn delete(&self, key: &str) -> Result<(), WicketError> {
            self.entries.write().await.remove(key);
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn test_set_get_delete() {
            let store = MemoryStore::new();
            assert_eq!(store.get("k").await.unwrap(), None);

            store.set_ex("k", "v", 60).await.unwrap();
            assert_eq!(store.get("k").await.unwrap(), Some("v".to_string()));

            store.set_ex("k", "v2", 60).await.unwrap();
            assert_eq!(store.get("k").await.unwrap(), Some("v2".to_string()));

            store.delete("k").await.unwrap();
            assert_eq!(store.get("k").await.unwrap(), None);
        }

        #[tokio::test]
        async fn test_zero_ttl_expires_immediately() {
            let store = MemoryStore::new();
            store.set_ex("k", "v", 0).await.unwrap();
            assert_eq!(store.get("k").await.unwrap(), None);
        }
    }
}
