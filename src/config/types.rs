use serde::Deserialize;

/// Main configuration structure for ahscrub
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub http: HttpConfig,
    pub scrub: ScrubConfig,
}

/// Source site configuration
///
/// These values describe the fixed topology of the scraped site. The
/// category ceiling is a domain constant: browse categories at or above it
/// are non-item sections of the site and are never scrubbed.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site origin, scheme plus host, no trailing slash
    pub origin: String,

    /// Path of the browse index page
    #[serde(rename = "browse-path")]
    pub browse_path: String,

    /// Category ids at or above this value are skipped
    #[serde(rename = "category-ceiling")]
    pub category_ceiling: u32,

    /// Suffix the site appends to item page titles
    #[serde(rename = "title-suffix")]
    pub title_suffix: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: "https://www.ffxiah.com".to_string(),
            browse_path: "/browse".to_string(),
            category_ceiling: 240,
            title_suffix: "FFXIAH.com".to_string(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// User agent string sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Total request timeout in seconds
    #[serde(rename = "timeout-seconds")]
    pub timeout_seconds: u64,

    /// Connection timeout in seconds
    #[serde(rename = "connect-timeout-seconds")]
    pub connect_timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("ahscrub/{}", env!("CARGO_PKG_VERSION")),
            timeout_seconds: 30,
            connect_timeout_seconds: 10,
        }
    }
}

/// Scrub pipeline configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScrubConfig {
    /// Directory holding the two cache artifacts
    #[serde(rename = "cache-dir")]
    pub cache_dir: String,

    /// Default worker count for the item-data fan-out
    pub workers: usize,
}

impl Default for ScrubConfig {
    fn default() -> Self {
        Self {
            cache_dir: ".".to_string(),
            workers: 4,
        }
    }
}
