//! Configuration module for ahscrub
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Every value has a working default, so a missing or empty config
//! file yields a configuration pointed at the live site.
//!
//! # Example
//!
//! ```no_run
//! use ahscrub::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("ahscrub.toml")).unwrap();
//! println!("Scrubbing {}", config.site.origin);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, ScrubConfig, SiteConfig};

// Re-export parser functions
pub use parser::load_config;

// Re-export validation
pub use validation::validate;
