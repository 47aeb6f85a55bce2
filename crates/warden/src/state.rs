//! Application state and shared resources.

use anyhow::{Context, Result};
use std::sync::Arc;

use wicket_common::SecretCodec;

use crate::access::AccessFlags;
use crate::catalog::QuestionCatalog;
use crate::config::AppConfig;
use crate::limiter::RateLimiter;
use crate::store::RedisStore;
use crate::validator::AnswerValidator;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: AppConfig,

    /// Per-visitor state backend (auto-reconnecting)
    pub store: RedisStore,

    /// Immutable question catalog
    pub catalog: Arc<QuestionCatalog>,

    /// Validation service
    pub validator: Arc<AnswerValidator>,
}

impl AppState {
    /// Create new application state, connecting to Redis and loading the
    /// question catalog.
    pub async fn new(config: AppConfig) -> Result<Self> {
        let store = RedisStore::connect(&config.redis_url)
            .await
            .context("Failed to connect to Redis")?;

        let catalog = Arc::new(
            QuestionCatalog::load(&config.catalog_path).context("Failed to load catalog")?,
        );
        if catalog.is_empty() {
            tracing::warn!("Question catalog is empty; every validation will fail");
        }

        let key_hex = config
            .encryption_key
            .as_deref()
            .context("Encryption key missing")?;
        let codec = Arc::new(SecretCodec::from_hex(key_hex).context("Invalid encryption key")?);

        let limiter = RateLimiter::new(
            config.rate_limit.max_failed_attempts,
            config.rate_limit.lock_duration_secs,
        );
        let access = AccessFlags::new(config.access.ttl_secs);

        let validator = Arc::new(AnswerValidator::new(
            catalog.clone(),
            codec,
            limiter,
            access,
        ));

        Ok(Self {
            config,
            store,
            catalog,
            validator,
        })
    }
}
