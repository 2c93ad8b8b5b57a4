//! Site URL shapes for ahscrub
//!
//! The scraped site has a fixed topology with exactly two page shapes we
//! care about: browse-category listing pages (`/browse/{id}`) and item
//! detail pages (`/item/{id}`). This module owns the compiled patterns for
//! those shapes plus the title-suffix pattern used for item names, and the
//! natural-sort ordering applied to discovered category URLs.

use crate::config::SiteConfig;
use crate::ConfigError;
use regex::Regex;

/// Compiled URL and title patterns for the source site
///
/// Built once from the site configuration and passed by reference to the
/// components that need them; never global state.
#[derive(Debug, Clone)]
pub struct SitePatterns {
    /// Matches a browse-category href and captures the numeric category id
    pub category: Regex,

    /// Matches an item href and captures the numeric item id
    pub item: Regex,

    /// Matches an item page title and captures the name ahead of the suffix
    pub title: Regex,

    /// Matches runs of digits, used for the natural URL sort
    pub digits: Regex,
}

impl SitePatterns {
    /// Compiles the pattern set for the given site configuration
    pub fn new(site: &SiteConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            category: Regex::new(r"^/browse/(\d+)(?:/.*)?$")?,
            item: Regex::new(r"^/item/(\d+)")?,
            title: Regex::new(&format!(
                r"^(.*?)\s*-\s*{}$",
                regex::escape(&site.title_suffix)
            ))?,
            digits: Regex::new(r"\d+")?,
        })
    }
}

/// An absolute browse-category URL with its embedded numeric id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryUrl {
    url: String,
    category_id: u32,
}

impl CategoryUrl {
    /// Builds a category URL from a site-relative href
    ///
    /// Returns `None` if the href does not have the browse-category shape.
    /// A digit group too large for a `u32` also yields `None`; callers log
    /// and skip those.
    pub fn from_href(href: &str, origin: &str, patterns: &SitePatterns) -> Option<Self> {
        let captures = patterns.category.captures(href)?;
        let category_id = captures.get(1)?.as_str().parse::<u32>().ok()?;
        Some(Self {
            url: format!("{origin}{href}"),
            category_id,
        })
    }

    /// Parses an absolute category URL, as supplied on the command line
    pub fn parse(url: &str, origin: &str, patterns: &SitePatterns) -> Option<Self> {
        let href = url.strip_prefix(origin)?;
        Self::from_href(href, origin, patterns)
    }

    /// The absolute URL of the category listing page
    pub fn as_str(&self) -> &str {
        &self.url
    }

    /// The numeric category id embedded in the URL
    pub fn category_id(&self) -> u32 {
        self.category_id
    }

    /// Sort key: every digit run in the URL, in order
    ///
    /// The resulting ordering is numeric rather than lexicographic, so
    /// `/browse/9` sorts ahead of `/browse/10`. Purely cosmetic; the id
    /// union downstream does not depend on it.
    pub fn sort_key(&self, patterns: &SitePatterns) -> Vec<u64> {
        patterns
            .digits
            .find_iter(&self.url)
            .filter_map(|m| m.as_str().parse::<u64>().ok())
            .collect()
    }
}

/// Builds the canonical detail URL for an item id
pub fn item_url(origin: &str, itemid: u32) -> String {
    format!("{origin}/item/{itemid}")
}

/// Builds the absolute browse-index URL
pub fn browse_url(site: &SiteConfig) -> String {
    format!("{}{}", site.origin, site.browse_path)
}
