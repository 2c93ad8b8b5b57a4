//! Scrub module for the three-stage item pipeline
//!
//! This module contains the core scrub logic, including:
//! - HTTP fetching of browse, category, and item pages
//! - Category-URL discovery from the browse index
//! - Item-id extraction from category listing tables
//! - Per-item detail-page parsing into records
//! - Overall pipeline orchestration with caching and fan-out

mod categories;
mod fetcher;
mod items;
mod pipeline;
mod record;

pub use categories::{discover_category_urls, parse_browse_index};
pub use fetcher::{build_http_client, fetch_page, FetchError};
pub use items::{extract_item_ids, parse_listing_page};
pub use pipeline::{ScrubOptions, Scrubber};
pub use record::{
    fetch_item_record, parse_item_page, FieldFailure, FieldValue, ItemRecord,
};

use std::collections::BTreeMap;

/// A unique, non-negative item identifier
pub type ItemId = u32;

/// The complete scrub result: one record per processed item id
pub type ItemDataset = BTreeMap<ItemId, ItemRecord>;

use crate::config::Config;
use crate::ScrubError;

/// Runs a complete scrub operation with the given options
///
/// This is the main entry point for a one-shot scrub. It will:
/// 1. Build the HTTP client and cache store from the configuration
/// 2. Resolve the item-id set (cache, explicit ids, or discovery)
/// 3. Fan out item-data fetches across the configured workers
/// 4. Persist the artifacts and return the dataset
///
/// # Arguments
///
/// * `config` - The scrub configuration
/// * `options` - Per-call options (force, workers, explicit urls/ids)
///
/// # Returns
///
/// * `Ok(ItemDataset)` - The complete dataset
/// * `Err(ScrubError)` - Discovery, cache, or conflict failure
pub async fn run_scrub(config: Config, options: ScrubOptions) -> Result<ItemDataset, ScrubError> {
    let scrubber = Scrubber::new(config)?;
    scrubber.scrub(options).await
}
