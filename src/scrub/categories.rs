//! Category-URL discovery from the site's browse index
//!
//! The browse index lists every auction-house section as an anchor whose
//! href embeds a numeric category id. Ids below the configured ceiling are
//! item categories; everything at or above it is a non-item section of the
//! site and is skipped.

use crate::config::SiteConfig;
use crate::scrub::fetcher::fetch_page;
use crate::site::{browse_url, CategoryUrl, SitePatterns};
use crate::ScrubError;
use reqwest::Client;
use scraper::{Html, Selector};

/// Fetches the browse index and returns the ordered category URLs
///
/// A failure to fetch or parse the index envelope is fatal: without the
/// index there is nothing to scrub. Individual malformed hrefs inside the
/// index are logged and skipped.
pub async fn discover_category_urls(
    client: &Client,
    site: &SiteConfig,
    patterns: &SitePatterns,
) -> Result<Vec<CategoryUrl>, ScrubError> {
    tracing::debug!("getting category urls");

    let url = browse_url(site);
    let body = fetch_page(client, &url).await?;

    Ok(parse_browse_index(&body, site, patterns))
}

/// Parses browse-index markup into an ordered list of category URLs
///
/// For every anchor with an `href`, the href is matched against the
/// browse-category shape; matches with an id strictly below the category
/// ceiling are kept. Digit groups that fail to parse are logged and
/// skipped, never fatal. The final list is sorted ascending by the numeric
/// tokens of each URL; this ordering is cosmetic (log readability) and
/// nothing downstream depends on it.
pub fn parse_browse_index(
    html: &str,
    site: &SiteConfig,
    patterns: &SitePatterns,
) -> Vec<CategoryUrl> {
    let document = Html::parse_document(html);
    let Ok(anchor_selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    let mut urls = Vec::new();
    for element in document.select(&anchor_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        if patterns.category.captures(href).is_none() {
            tracing::debug!("ignoring {href}");
            continue;
        }

        match CategoryUrl::from_href(href, &site.origin, patterns) {
            Some(category) if category.category_id() < site.category_ceiling => {
                tracing::debug!("category {href}");
                urls.push(category);
            }
            Some(_) => {
                tracing::debug!("skipping {href}");
            }
            None => {
                // matched the shape but the digit group would not parse
                tracing::error!("failed to extract category id from {href}");
            }
        }
    }

    urls.sort_by_cached_key(|category| category.sort_key(patterns));
    urls
}
