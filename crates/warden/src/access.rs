//! Access flags: which gates a visitor has already passed.
//!
//! Flags are additive only; nothing revokes a grant before its TTL runs
//! out. Repeat grants refresh the 30-day window rather than stacking.

use serde::{Deserialize, Serialize};

use wicket_common::WicketError;
use wicket_common::constants::store_keys::ACCESS_PREFIX;

use crate::store::StateStore;

/// Stored grant record
#[derive(Debug, Serialize, Deserialize)]
struct AccessGrant {
    /// Unix second timestamp of the (latest) grant
    granted_at: i64,
}

/// Access flag service
pub struct AccessFlags {
    /// Grant validity in seconds
    ttl_secs: u64,
}

impl AccessFlags {
    pub fn new(ttl_secs: u64) -> Self {
        Self { ttl_secs }
    }

    fn key(visitor: &str, slug: &str) -> String {
        format!("{ACCESS_PREFIX}{visitor}:{slug}")
    }

    /// Mark the gate as passed. Idempotent; refreshes the expiry.
    pub async fn grant<S: StateStore>(
        &self,
        store: &S,
        visitor: &str,
        slug: &str,
    ) -> Result<(), WicketError> {
        let grant = AccessGrant {
            granted_at: chrono::Utc::now().timestamp(),
        };
        let raw = serde_json::to_string(&grant)
            .map_err(|e| WicketError::Internal(e.to_string()))?;

        store
            .set_ex(&Self::key(visitor, slug), &raw, self.ttl_secs)
            .await?;

        tracing::info!(visitor = %visitor, slug = %slug, "Access granted");
        Ok(())
    }

    /// Check whether the visitor has passed this gate.
    pub async fn is_granted<S: StateStore>(
        &self,
        store: &S,
        visitor: &str,
        slug: &str,
    ) -> Result<bool, WicketError> {
        Ok(store.get(&Self::key(visitor, slug)).await?.is_some())
    }
}
