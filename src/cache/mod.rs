//! On-disk cache for scrub artifacts
//!
//! Two fixed-name artifacts live in the cache directory: the item-id set and
//! the item-data map. Each is a whole-value JSON snapshot, written once per
//! pipeline stage and read back at the start of a later run to short-circuit
//! discovery or fetching. There is no partial or streaming persistence; an
//! artifact is either fully present or absent.

use crate::scrub::{ItemDataset, ItemId};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name of the item-id-set artifact
const IDS_FILE: &str = "scrub_item_ids.json";

/// File name of the item-data-map artifact
const DATA_FILE: &str = "scrub_item_data.json";

/// Errors that can occur during cache operations
///
/// All of these are fatal to the containing scrub run; the pipeline never
/// degrades around a broken cache.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache artifact not found: {0}")]
    NotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// The two named cache slots
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheSlot {
    /// The item-id set produced by the discovery stage
    Ids,
    /// The item dataset produced by the fetch stage
    Data,
}

/// Persists and restores the two scrub artifacts
///
/// The pipeline guarantees single-writer-at-a-time per slot: writes happen
/// once at stage boundaries, before any concurrent fan-out begins, so no
/// locking is needed here.
#[derive(Debug, Clone)]
pub struct CacheStore {
    ids_path: PathBuf,
    data_path: PathBuf,
}

impl CacheStore {
    /// Creates a cache store rooted at the given directory
    pub fn new(dir: &Path) -> Self {
        Self {
            ids_path: dir.join(IDS_FILE),
            data_path: dir.join(DATA_FILE),
        }
    }

    /// Returns the on-disk path of a slot
    pub fn path(&self, slot: CacheSlot) -> &Path {
        match slot {
            CacheSlot::Ids => &self.ids_path,
            CacheSlot::Data => &self.data_path,
        }
    }

    /// Checks whether a slot's artifact is present without loading it
    pub fn exists(&self, slot: CacheSlot) -> bool {
        self.path(slot).exists()
    }

    /// Loads the item-id set
    ///
    /// Fails with [`CacheError::NotFound`] if the artifact is absent;
    /// callers are expected to check [`exists`](Self::exists) first.
    pub fn load_ids(&self) -> CacheResult<HashSet<ItemId>> {
        let path = &self.ids_path;
        if !path.exists() {
            return Err(CacheError::NotFound(path.clone()));
        }

        tracing::debug!("load {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Loads the item dataset
    pub fn load_data(&self) -> CacheResult<ItemDataset> {
        let path = &self.data_path;
        if !path.exists() {
            return Err(CacheError::NotFound(path.clone()));
        }

        tracing::debug!("load {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Saves the item-id set, overwriting any existing artifact
    pub fn save_ids(&self, ids: &HashSet<ItemId>) -> CacheResult<()> {
        tracing::debug!("save {}", self.ids_path.display());
        let content = serde_json::to_string(ids)?;
        std::fs::write(&self.ids_path, content)?;
        Ok(())
    }

    /// Saves the item dataset, overwriting any existing artifact
    pub fn save_data(&self, data: &ItemDataset) -> CacheResult<()> {
        tracing::debug!("save {}", self.data_path.display());
        let content = serde_json::to_string(data)?;
        std::fs::write(&self.data_path, content)?;
        Ok(())
    }
}
