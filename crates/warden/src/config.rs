//! Configuration management for Warden.

use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::path::Path;

use wicket_common::constants::{
    ACCESS_TTL_SECS, DEFAULT_CATALOG_PATH, DEFAULT_LISTEN_ADDR, DEFAULT_REDIS_URL,
    ENCRYPTION_KEY_ENV, LOCK_DURATION_SECS, MAX_FAILED_ATTEMPTS,
};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Question catalog file path
    #[serde(default = "default_catalog_path")]
    pub catalog_path: String,

    /// 64-hex-char encryption key. Normally supplied via the
    /// WICKET_ENCRYPTION_KEY environment variable rather than the file.
    #[serde(default)]
    pub encryption_key: Option<String>,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    /// Access flag configuration
    #[serde(default)]
    pub access: AccessConfig,
}

/// Rate limiting configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RateLimitConfig {
    /// Failed attempts before lockout
    #[serde(default = "default_max_failures")]
    pub max_failed_attempts: u32,

    /// Lockout duration in seconds
    #[serde(default = "default_lock_duration")]
    pub lock_duration_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_failed_attempts: default_max_failures(),
            lock_duration_secs: default_lock_duration(),
        }
    }
}

/// Access flag configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AccessConfig {
    /// Access flag validity in seconds
    #[serde(default = "default_access_ttl")]
    pub ttl_secs: u64,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_access_ttl(),
        }
    }
}

// Default value functions
fn default_redis_url() -> String { DEFAULT_REDIS_URL.to_string() }
fn default_listen_addr() -> String { DEFAULT_LISTEN_ADDR.to_string() }
fn default_catalog_path() -> String { DEFAULT_CATALOG_PATH.to_string() }
fn default_max_failures() -> u32 { MAX_FAILED_ATTEMPTS }
fn default_lock_duration() -> u64 { LOCK_DURATION_SECS }
fn default_access_ttl() -> u64 { ACCESS_TTL_SECS }

impl AppConfig {
    /// Load configuration from file, with environment and CLI overrides
    pub fn load(config_path: &str, args: &super::Args) -> Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let settings = config::Config::builder()
                .add_source(config::File::with_name(config_path))
                .build()
                .context("Failed to load config file")?;

            settings
                .try_deserialize()
                .context("Failed to parse config")?
        } else {
            // Use defaults if config file doesn't exist
            tracing::warn!("Config file not found, using defaults");
            Self::default()
        };

        // The key never lives in the config file in production; the
        // environment wins when both are set.
        if let Ok(key) = std::env::var(ENCRYPTION_KEY_ENV) {
            config.encryption_key = Some(key);
        }
        if config.encryption_key.is_none() {
            bail!("{ENCRYPTION_KEY_ENV} is not set and no encryption_key in config");
        }

        // Apply CLI overrides
        if let Some(ref redis_url) = args.redis_url {
            config.redis_url = redis_url.clone();
        }
        if let Some(ref listen) = args.listen {
            config.listen_addr = listen.clone();
        }
        if let Some(ref catalog) = args.catalog {
            config.catalog_path = catalog.clone();
        }

        Ok(config)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            redis_url: default_redis_url(),
            listen_addr: default_listen_addr(),
            catalog_path: default_catalog_path(),
            encryption_key: None,
            rate_limit: RateLimitConfig::default(),
            access: AccessConfig::default(),
        }
    }
}
