//! Failure counting and lockout per (visitor, slug).
//!
//! State machine: Open (attempts < threshold) → Locked (locked_until set)
//! → implicitly Open again once the lock passes. Attempts are never reset
//! on lock expiry, only on a successful validation, so one more failure
//! after expiry re-locks immediately. The record's TTL (= lock duration)
//! bounds how long the stale count survives.

use wicket_common::RateLimitRecord;
use wicket_common::WicketError;
use wicket_common::constants::store_keys::RATELIMIT_PREFIX;

use crate::store::StateStore;

/// Rate limiting service
pub struct RateLimiter {
    /// Failures before the lock engages
    max_attempts: u32,
    /// Lock duration in seconds
    lock_duration_secs: u64,
}

impl RateLimiter {
    pub fn new(max_attempts: u32, lock_duration_secs: u64) -> Self {
        Self {
            max_attempts,
            lock_duration_secs,
        }
    }

    fn key(visitor: &str, slug: &str) -> String {
        format!("{RATELIMIT_PREFIX}{visitor}:{slug}")
    }

    /// Load the current record, defaulting to a fresh one. A corrupt
    /// stored record reads as fresh rather than failing the request.
    async fn load<S: StateStore>(
        &self,
        store: &S,
        visitor: &str,
        slug: &str,
    ) -> Result<RateLimitRecord, WicketError> {
        let record = match store.get(&Self::key(visitor, slug)).await? {
            Some(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            None => RateLimitRecord::default(),
        };
        Ok(record)
    }

    /// Remaining lock time in whole seconds; 0 when the gate is open.
    pub async fn check_lock<S: StateStore>(
        &self,
        store: &S,
        visitor: &str,
        slug: &str,
    ) -> Result<u64, WicketError> {
        let record = self.load(store, visitor, slug).await?;
        Ok(record.remaining_lock_secs())
    }

    /// Record a failed attempt; engages the lock at the threshold.
    pub async fn record_failure<S: StateStore>(
        &self,
        store: &S,
        visitor: &str,
        slug: &str,
    ) -> Result<RateLimitRecord, WicketError> {
        let mut record = self.load(store, visitor, slug).await?;

        record.attempts += 1;
        if record.attempts >= self.max_attempts {
            let until =
                chrono::Utc::now().timestamp_millis() + (self.lock_duration_secs as i64) * 1000;
            record.locked_until = Some(until);
            tracing::warn!(
                visitor = %visitor,
                slug = %slug,
                attempts = record.attempts,
                "Visitor locked out after repeated failures"
            );
        }

        let raw = serde_json::to_string(&record)
            .map_err(|e| WicketError::Internal(e.to_string()))?;
        store
            .set_ex(&Self::key(visitor, slug), &raw, self.lock_duration_secs)
            .await?;

        Ok(record)
    }

    /// Clear the record entirely (successful validation).
    pub async fn reset<S: StateStore>(
        &self,
        store: &S,
        visitor: &str,
        slug: &str,
    ) -> Result<(), WicketError> {
        store.delete(&Self::key(visitor, slug)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    fn limiter() -> RateLimiter {
        RateLimiter::new(5, 900)
    }

    async fn attempts(store: &MemoryStore, visitor: &str, slug: &str) -> u32 {
        let raw = store
            .get(&RateLimiter::key(visitor, slug))
            .await
            .unwrap()
            .expect("record should exist");
        let record: RateLimitRecord = serde_json::from_str(&raw).unwrap();
        record.attempts
    }

    #[tokio::test]
    async fn test_open_until_threshold() {
        let store = MemoryStore::new();
        let limiter = limiter();

        for i in 1..5 {
            limiter.record_failure(&store, "v1", "demo").await.unwrap();
            assert_eq!(attempts(&store, "v1", "demo").await, i);
            assert_eq!(limiter.check_lock(&store, "v1", "demo").await.unwrap(), 0);
        }

        limiter.record_failure(&store, "v1", "demo").await.unwrap();
        let remaining = limiter.check_lock(&store, "v1", "demo").await.unwrap();
        assert!(remaining > 0 && remaining <= 900, "remaining={remaining}");
    }

    #[tokio::test]
    async fn test_reset_deletes_record() {
        let store = MemoryStore::new();
        let limiter = limiter();

        for _ in 0..5 {
            limiter.record_failure(&store, "v1", "demo").await.unwrap();
        }
        limiter.reset(&store, "v1", "demo").await.unwrap();

        assert_eq!(limiter.check_lock(&store, "v1", "demo").await.unwrap(), 0);
        assert!(
            store
                .get(&RateLimiter::key("v1", "demo"))
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_visitors_and_slugs_are_independent() {
        let store = MemoryStore::new();
        let limiter = limiter();

        for _ in 0..5 {
            limiter.record_failure(&store, "v1", "demo").await.unwrap();
        }

        assert!(limiter.check_lock(&store, "v1", "demo").await.unwrap() > 0);
        assert_eq!(limiter.check_lock(&store, "v2", "demo").await.unwrap(), 0);
        assert_eq!(limiter.check_lock(&store, "v1", "other").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_attempts_survive_lock_expiry() {
        let store = MemoryStore::new();
        let limiter = limiter();

        // Seed a record whose lock has already expired but whose attempt
        // count is still at the threshold.
        let stale = RateLimitRecord {
            attempts: 5,
            locked_until: Some(chrono::Utc::now().timestamp_millis() - 1),
        };
        store
            .set_ex(
                &RateLimiter::key("v1", "demo"),
                &serde_json::to_string(&stale).unwrap(),
                900,
            )
            .await
            .unwrap();

        // Lock reads as open again...
        assert_eq!(limiter.check_lock(&store, "v1", "demo").await.unwrap(), 0);

        // ...but a single further failure re-locks immediately.
        limiter.record_failure(&store, "v1", "demo").await.unwrap();
        assert!(limiter.check_lock(&store, "v1", "demo").await.unwrap() > 0);
        assert_eq!(attempts(&store, "v1", "demo").await, 6);
    }

    #[tokio::test]
    async fn test_corrupt_record_reads_as_fresh() {
        let store = MemoryStore::new();
        let limiter = limiter();

        store
            .set_ex(&RateLimiter::key("v1", "demo"), "not json", 900)
            .await
            .unwrap();

        assert_eq!(limiter.check_lock(&store, "v1", "demo").await.unwrap(), 0);
        limiter.record_failure(&store, "v1", "demo").await.unwrap();
        assert_eq!(attempts(&store, "v1", "demo").await, 1);
    }
}
