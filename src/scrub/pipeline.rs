//! Scrub pipeline orchestration
//!
//! The pipeline sequences discovery, extraction, and fetching, enforces the
//! cache/force policy, and fans item-data fetches out across a bounded pool
//! of workers. The id set is fully resolved before any data fetch starts,
//! and the dataset is fully resolved before it is persisted or returned;
//! cache artifacts are written exactly once per stage per run.

use crate::cache::{CacheSlot, CacheStore};
use crate::config::Config;
use crate::scrub::categories::discover_category_urls;
use crate::scrub::fetcher::build_http_client;
use crate::scrub::items::extract_item_ids;
use crate::scrub::record::fetch_item_record;
use crate::scrub::{ItemDataset, ItemId};
use crate::site::{CategoryUrl, SitePatterns};
use crate::ScrubError;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::collections::HashSet;
use std::path::Path;

/// Per-call options for [`Scrubber::scrub`]
#[derive(Debug, Clone, Default)]
pub struct ScrubOptions {
    /// Ignore existing cache artifacts and redownload everything
    pub force: bool,

    /// Worker count for the item-data fan-out; values above 1 fetch
    /// concurrently, anything else fetches sequentially
    pub workers: usize,

    /// Explicit category URLs, skipping browse-index discovery
    pub urls: Option<Vec<CategoryUrl>>,

    /// Explicit item ids, skipping discovery entirely
    pub ids: Option<HashSet<ItemId>>,
}

/// Orchestrates the three-stage scrub pipeline
pub struct Scrubber {
    config: Config,
    patterns: SitePatterns,
    client: Client,
    cache: CacheStore,
}

impl Scrubber {
    /// Creates a scrubber from a validated configuration
    pub fn new(config: Config) -> Result<Self, ScrubError> {
        crate::config::validate(&config)?;
        let patterns = SitePatterns::new(&config.site)?;
        let client = build_http_client(&config.http)?;
        let cache = CacheStore::new(Path::new(&config.scrub.cache_dir));

        Ok(Self {
            config,
            patterns,
            client,
            cache,
        })
    }

    /// The cache store backing this scrubber
    pub fn cache(&self) -> &CacheStore {
        &self.cache
    }

    /// Runs the scrub state machine and returns the complete dataset
    ///
    /// Decision points, evaluated once per call:
    /// - `force`: resolve ids (argument, or discovery persisted to cache),
    ///   redownload all data, overwrite both artifacts.
    /// - data cache present: load and return it; supplied ids and a
    ///   leftover id cache are warned about and ignored. No network
    ///   activity occurs.
    /// - otherwise: ids come from the argument, the id cache, or fresh
    ///   discovery (persisted); then data is fetched and persisted.
    ///
    /// The one fatal conflict: a data-cache artifact appearing between the
    /// initial check and the fetch step. The pipeline refuses to resolve
    /// that silently and returns [`ScrubError::StaleDataCache`].
    pub async fn scrub(&self, options: ScrubOptions) -> Result<ItemDataset, ScrubError> {
        let ScrubOptions {
            force,
            workers,
            urls,
            ids,
        } = options;

        if force {
            tracing::debug!("forcing redownload of data");

            let ids = match ids {
                Some(ids) => {
                    tracing::debug!("using passed ids");
                    if urls.is_some() {
                        tracing::warn!("passed urls ignored");
                    }
                    ids
                }
                None => self.discover_ids(urls).await?,
            };

            let data = self.fetch_all(&ids, workers).await;
            self.cache.save_data(&data)?;

            tracing::debug!("# ids = {}", ids.len());
            tracing::debug!("# data = {}", data.len());
            return Ok(data);
        }

        // data exists already
        if self.cache.exists(CacheSlot::Data) {
            let data = self.cache.load_data()?;

            if ids.is_some() {
                tracing::warn!("passed ids ignored");
            }
            if self.cache.exists(CacheSlot::Ids) {
                tracing::warn!(
                    "{} ignored",
                    self.cache.path(CacheSlot::Ids).display()
                );
            }

            tracing::debug!("# data = {}", data.len());
            return Ok(data);
        }

        let ids = match ids {
            Some(ids) => {
                tracing::debug!("using passed ids");
                if urls.is_some() {
                    tracing::warn!("passed urls ignored");
                }
                ids
            }
            None => {
                if self.cache.exists(CacheSlot::Ids) {
                    self.cache.load_ids()?
                } else {
                    self.discover_ids(urls).await?
                }
            }
        };

        let data = self.fetch_fresh(&ids, workers).await?;

        tracing::debug!("# ids = {}", ids.len());
        tracing::debug!("# data = {}", data.len());
        Ok(data)
    }

    /// Discovers the item-id set from category URLs and persists it
    ///
    /// URLs come from the argument when given, otherwise from browse-index
    /// discovery. Per-category sets are unioned; duplicates across
    /// categories merge silently.
    async fn discover_ids(
        &self,
        urls: Option<Vec<CategoryUrl>>,
    ) -> Result<HashSet<ItemId>, ScrubError> {
        let urls = match urls {
            Some(urls) => urls,
            None => {
                discover_category_urls(&self.client, &self.config.site, &self.patterns).await?
            }
        };
        tracing::debug!("# urls = {}", urls.len());

        tracing::info!("getting itemids");
        let mut ids = HashSet::new();
        for (index, url) in urls.iter().enumerate() {
            tracing::info!("category {:02}/{:02}", index + 1, urls.len());
            ids.extend(extract_item_ids(&self.client, url, &self.patterns).await);
        }

        self.cache.save_ids(&ids)?;
        Ok(ids)
    }

    /// Fetches fresh data after guarding against a stale data artifact
    ///
    /// The guard is defensive: the caller already found the data cache
    /// absent, so the artifact can only exist here if something else wrote
    /// it mid-run. That state is not silently resolvable.
    async fn fetch_fresh(
        &self,
        ids: &HashSet<ItemId>,
        workers: usize,
    ) -> Result<ItemDataset, ScrubError> {
        if self.cache.exists(CacheSlot::Data) {
            return Err(ScrubError::StaleDataCache {
                path: self.cache.path(CacheSlot::Data).display().to_string(),
            });
        }

        let data = self.fetch_all(ids, workers).await;
        self.cache.save_data(&data)?;
        Ok(data)
    }

    /// Fetches a record for every id, keyed by each record's own item id
    ///
    /// With more than one worker the fetches run through a bounded
    /// concurrent stream; each worker slot processes one id to completion
    /// before taking the next, and result reordering is tolerated because
    /// records key themselves. Every dispatched fetch completes, so the
    /// dataset is always exactly as large as the id set.
    async fn fetch_all(&self, ids: &HashSet<ItemId>, workers: usize) -> ItemDataset {
        tracing::info!("getting data");
        tracing::info!("workers = {workers}");

        if workers > 1 {
            let fetches = ids.iter().map(|&itemid| {
                fetch_item_record(&self.client, itemid, &self.config.site, &self.patterns)
            });

            stream::iter(fetches)
                .buffer_unordered(workers)
                .map(|record| (record.item_id(), record))
                .collect()
                .await
        } else {
            let mut data = ItemDataset::new();
            for &itemid in ids {
                let record =
                    fetch_item_record(&self.client, itemid, &self.config.site, &self.patterns)
                        .await;
                data.insert(record.item_id(), record);
            }
            data
        }
    }
}
