//! # Wicket Common
//!
//! Shared types, traits, and utilities used across Wicket components.
//!
//! ## Modules
//! - `types` - Core data structures (Question, RateLimitRecord, etc.)
//! - `error` - Common error types
//! - `constants` - Shared configuration constants
//! - `crypto` - The answer codec (AES-256-CBC `iv:cipher` tokens)

pub mod constants;
pub mod crypto;
pub mod error;
pub mod types;

pub use crypto::SecretCodec;
pub use error::WicketError;
pub use types::*;
