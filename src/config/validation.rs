//! Configuration validation
//!
//! Checks that a parsed configuration is internally consistent before any
//! component is built from it.

use crate::config::types::Config;
use crate::ConfigError;
use url::Url;

/// Validates a configuration, returning the first problem found
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_site(config)?;
    validate_http(config)?;
    validate_scrub(config)?;
    Ok(())
}

fn validate_site(config: &Config) -> Result<(), ConfigError> {
    let origin = &config.site.origin;

    let parsed = Url::parse(origin).map_err(|e| {
        ConfigError::Validation(format!("site.origin is not a valid URL: {e}"))
    })?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::Validation(format!(
            "site.origin must be an http(s) URL, got {origin}"
        )));
    }

    if origin.ends_with('/') {
        return Err(ConfigError::Validation(
            "site.origin must not end with a slash".to_string(),
        ));
    }

    if !config.site.browse_path.starts_with('/') {
        return Err(ConfigError::Validation(format!(
            "site.browse-path must start with a slash, got {}",
            config.site.browse_path
        )));
    }

    if config.site.title_suffix.is_empty() {
        return Err(ConfigError::Validation(
            "site.title-suffix must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_http(config: &Config) -> Result<(), ConfigError> {
    if config.http.timeout_seconds == 0 {
        return Err(ConfigError::Validation(
            "http.timeout-seconds must be greater than zero".to_string(),
        ));
    }

    if config.http.user_agent.is_empty() {
        return Err(ConfigError::Validation(
            "http.user-agent must not be empty".to_string(),
        ));
    }

    Ok(())
}

fn validate_scrub(config: &Config) -> Result<(), ConfigError> {
    if config.scrub.workers == 0 {
        return Err(ConfigError::Validation(
            "scrub.workers must be at least 1".to_string(),
        ));
    }

    if config.scrub.cache_dir.is_empty() {
        return Err(ConfigError::Validation(
            "scrub.cache-dir must not be empty".to_string(),
        ));
    }

    Ok(())
}
