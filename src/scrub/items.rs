//! Item-id extraction from category listing tables
//!
//! Each category page carries a single listing table (marked by the site's
//! `stdlist` class) whose rows link to item detail pages. Extraction is
//! tolerant at both levels: a malformed page yields an empty set, a
//! malformed row is skipped, and neither aborts the run. The caller unions
//! sets across categories, so one bad category contributes nothing.

use crate::scrub::fetcher::fetch_page;
use crate::scrub::ItemId;
use crate::site::{CategoryUrl, SitePatterns};
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;

/// Fetches one category page and extracts its item ids
///
/// A fetch failure is a page-level extraction failure: logged, and an
/// empty set is returned.
pub async fn extract_item_ids(
    client: &Client,
    category: &CategoryUrl,
    patterns: &SitePatterns,
) -> HashSet<ItemId> {
    let url = category.as_str();
    let body = match fetch_page(client, url).await {
        Ok(body) => body,
        Err(e) => {
            tracing::error!("failed to fetch category page {url}: {e}");
            return HashSet::new();
        }
    };

    parse_listing_page(&body, url, patterns)
}

/// Parses category-page markup into a set of item ids
///
/// A missing listing table, missing body, or zero rows are non-fatal: each
/// is logged and yields an empty set. Per row, the first anchor's href must
/// match the item shape; rows that fail are logged with their index and
/// source URL and skipped. An empty final set is logged as a failure but
/// still returned as an empty set.
pub fn parse_listing_page(
    html: &str,
    source_url: &str,
    patterns: &SitePatterns,
) -> HashSet<ItemId> {
    let document = Html::parse_document(html);

    let (Ok(table_selector), Ok(tbody_selector), Ok(row_selector), Ok(anchor_selector)) = (
        Selector::parse("table.stdlist"),
        Selector::parse("tbody"),
        Selector::parse("tr"),
        Selector::parse("a"),
    ) else {
        return HashSet::new();
    };

    let Some(table) = document.select(&table_selector).next() else {
        tracing::error!("failed to parse <table> in {source_url}");
        return HashSet::new();
    };

    let Some(tbody) = table.select(&tbody_selector).next() else {
        tracing::error!("failed to parse <tbody> in {source_url}");
        return HashSet::new();
    };

    let rows: Vec<_> = tbody.select(&row_selector).collect();
    if rows.is_empty() {
        tracing::error!("failed to parse <tr> in {source_url}");
        return HashSet::new();
    }

    let mut items = HashSet::new();
    for (index, row) in rows.iter().enumerate() {
        let href = row
            .select(&anchor_selector)
            .next()
            .and_then(|anchor| anchor.value().attr("href"));

        let Some(href) = href else {
            tracing::error!("failed to extract href: row {index} of {source_url}");
            continue;
        };

        let itemid = patterns
            .item
            .captures(href)
            .and_then(|captures| captures.get(1))
            .and_then(|group| group.as_str().parse::<ItemId>().ok());

        match itemid {
            Some(itemid) => {
                items.insert(itemid);
            }
            None => {
                tracing::error!(
                    "failed to extract itemid from {href}: row {index} of {source_url}"
                );
            }
        }
    }

    if items.is_empty() {
        tracing::error!("could not find any itemids in {source_url}");
    }

    items
}
