//! Shared constants for Wicket components.

/// Default Redis connection URL
pub const DEFAULT_REDIS_URL: &str = "redis://127.0.0.1:6379";

/// Default Warden HTTP listen address
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8787";

/// Default question catalog path
pub const DEFAULT_CATALOG_PATH: &str = "config/catalog.toml";

/// Maximum failed validation attempts before lockout
pub const MAX_FAILED_ATTEMPTS: u32 = 5;

/// Lockout duration in seconds (15 minutes)
pub const LOCK_DURATION_SECS: u64 = 900;

/// Access flag validity in seconds (30 days)
pub const ACCESS_TTL_SECS: u64 = 30 * 24 * 60 * 60;

/// Environment variable holding the 64-hex-char encryption key
pub const ENCRYPTION_KEY_ENV: &str = "WICKET_ENCRYPTION_KEY";

/// Store key prefixes
pub mod store_keys {
    /// Rate limit record: ratelimit:{visitor}:{slug}
    pub const RATELIMIT_PREFIX: &str = "ratelimit:";

    /// Access flag: access:{visitor}:{slug}
    pub const ACCESS_PREFIX: &str = "access:";
}

/// HTTP header names
pub mod headers {
    /// Visitor ID header (set by the fronting proxy)
    pub const X_VISITOR_ID: &str = "X-Visitor-Id";
}
