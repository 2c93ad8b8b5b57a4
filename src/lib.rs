//! Ahscrub: an item data scrubber for the FFXIAH auction house
//!
//! This crate implements a three-stage scrub pipeline against the FFXIAH
//! marketplace site: category-URL discovery from the browse index, item-id
//! extraction from category listing tables, and concurrent per-item detail
//! fetches with resumable on-disk caching of the intermediate id set and the
//! final dataset.

pub mod cache;
pub mod config;
pub mod scrub;
pub mod site;

use thiserror::Error;

/// Main error type for ahscrub operations
#[derive(Debug, Error)]
pub enum ScrubError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Cache error: {0}")]
    Cache(#[from] cache::CacheError),

    #[error("Fetch error: {0}")]
    Fetch(#[from] scrub::FetchError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Stale data cache at {path}: refusing to fetch over an existing artifact")]
    StaleDataCache { path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Result type alias for ahscrub operations
pub type Result<T> = std::result::Result<T, ScrubError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use scrub::{FieldValue, ItemDataset, ItemId, ItemRecord, ScrubOptions, Scrubber};
pub use site::{CategoryUrl, SitePatterns};
