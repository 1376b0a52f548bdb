//! Per-module tag cache with a 24-hour freshness window.
//!
//! Two tiers: an in-memory TTL cache and a JSON disk cache. Freshness
//! is checked explicitly at read time; an expired disk entry is treated
//! as absent and evicted, so callers never see stale tags. The store is
//! an explicit `{get, put}` interface rather than ambient global state.

use crate::config::CacheConfig;
use crate::error::{RelmanError, Result};
use chrono::{DateTime, Utc};
use mini_moka::sync::Cache;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

/// A cached tag set for one module identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedTags {
    pub tags: Vec<String>,
    /// RFC 3339 fetch timestamp.
    pub fetched_at: String,
}

/// Cache for module version tags.
pub struct TagCache {
    /// In-memory cache with TTL.
    memory: Cache<String, CachedTags>,
    /// Path to the disk cache directory.
    cache_dir: PathBuf,
    /// Freshness window for disk entries.
    ttl: Duration,
}

impl TagCache {
    /// Create a new tag cache rooted at `cache_dir`.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self::with_ttl(cache_dir, CacheConfig::TAG_TTL)
    }

    /// Create a new tag cache with a custom freshness window.
    pub fn with_ttl(cache_dir: PathBuf, ttl: Duration) -> Self {
        Self {
            memory: Cache::builder()
                .time_to_live(ttl)
                .max_capacity(CacheConfig::TAG_MEMORY_CAPACITY)
                .build(),
            cache_dir,
            ttl,
        }
    }

    /// Get the cached tags for `identifier`, if present and fresh.
    ///
    /// Checks memory first, then disk. An expired disk entry is evicted
    /// and reported as absent.
    pub fn get(&self, identifier: &str) -> Option<CachedTags> {
        let key = self.key(identifier);

        if let Some(entry) = self.memory.get(&key) {
            debug!("Tag cache hit (memory) for {}", identifier);
            return Some(entry);
        }

        let entry = self.read_disk(identifier)?;
        if !self.is_fresh(&entry) {
            debug!("Tag cache entry expired for {}, evicting", identifier);
            self.evict_disk(identifier);
            return None;
        }

        debug!("Tag cache hit (disk) for {}", identifier);
        self.memory.insert(key, entry.clone());
        Some(entry)
    }

    /// Store a freshly fetched tag set for `identifier` in both tiers.
    ///
    /// Disk write failures are logged, not surfaced; the memory tier
    /// still holds the entry for this session.
    pub fn put(&self, identifier: &str, tags: Vec<String>) {
        let entry = CachedTags {
            tags,
            fetched_at: Utc::now().to_rfc3339(),
        };
        self.memory.insert(self.key(identifier), entry.clone());
        if let Err(e) = self.write_disk(identifier, &entry) {
            warn!("Failed to write tag cache for {}: {}", identifier, e);
        }
    }

    /// Drop any cached entry for `identifier` from both tiers.
    pub fn invalidate(&self, identifier: &str) {
        self.memory.invalidate(&self.key(identifier));
        self.evict_disk(identifier);
    }

    /// Whether an entry is within the freshness window.
    pub fn is_fresh(&self, entry: &CachedTags) -> bool {
        match DateTime::parse_from_rfc3339(&entry.fetched_at) {
            Ok(fetched_at) => {
                let age = Utc::now().signed_duration_since(fetched_at);
                age.num_seconds() >= 0 && (age.num_seconds() as u64) < self.ttl.as_secs()
            }
            Err(_) => false,
        }
    }

    // Internal methods

    fn key(&self, identifier: &str) -> String {
        format!("{}{}", CacheConfig::TAG_KEY_PREFIX, identifier)
    }

    fn disk_path(&self, identifier: &str) -> PathBuf {
        // Sanitize identifier for use as a filename
        let safe = identifier.replace(['/', '\\'], "-");
        self.cache_dir
            .join(format!("{}{}.json", CacheConfig::TAG_KEY_PREFIX, safe))
    }

    fn read_disk(&self, identifier: &str) -> Option<CachedTags> {
        let path = self.disk_path(identifier);
        if !path.exists() {
            return None;
        }
        match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!("Failed to parse tag cache {}: {}", path.display(), e);
                    None
                }
            },
            Err(e) => {
                warn!("Failed to read tag cache {}: {}", path.display(), e);
                None
            }
        }
    }

    fn write_disk(&self, identifier: &str, entry: &CachedTags) -> Result<()> {
        let path = self.disk_path(identifier);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| RelmanError::Io {
                message: format!("Failed to create cache directory: {}", e),
                source: Some(e),
            })?;
        }
        let contents = serde_json::to_string_pretty(entry)?;
        std::fs::write(&path, contents).map_err(|e| RelmanError::Io {
            message: format!("Failed to write tag cache: {}", e),
            source: Some(e),
        })?;
        Ok(())
    }

    fn evict_disk(&self, identifier: &str) {
        let path = self.disk_path(identifier);
        if path.exists() {
            let _ = std::fs::remove_file(&path);
        }
    }
}
