//! Tag fetching: cache-first single-module lookups and the sequential
//! bulk refresh sweep.

use crate::session::{apply_tag_outcome, EditorSession};
use relman_core::cache::TagCache;
use relman_core::config::NetworkConfig;
use relman_core::network::TagClient;
use relman_core::{naming, RelmanError, Result};
use std::sync::atomic::Ordering;
use tracing::{debug, info, warn};

/// Cache-backed tag lookup for module identifiers.
///
/// Composes the tag client with the 24-hour cache; the repository path
/// is derived from the identifier by convention (with overrides).
pub struct TagService {
    client: TagClient,
    cache: TagCache,
}

impl TagService {
    pub fn new(client: TagClient, cache: TagCache) -> Self {
        Self { client, cache }
    }

    /// Get the known version tags for a module.
    ///
    /// Serves from the cache when a fresh entry exists (unless
    /// `force_refresh`), otherwise fetches from the network and stores
    /// the result.
    pub async fn get_tags(&self, identifier: &str, force_refresh: bool) -> Result<Vec<String>> {
        if !force_refresh {
            if let Some(entry) = self.cache.get(identifier) {
                debug!("Serving tags for {} from cache", identifier);
                return Ok(entry.tags);
            }
        }

        let repo = naming::repo_path_for(identifier);
        let tags = self.client.fetch_tags(&repo).await?;
        self.cache.put(identifier, tags.clone());
        Ok(tags)
    }
}

impl EditorSession {
    /// Fetch tags for one module and attach them to its view-record.
    ///
    /// The record's loading flag is set for the duration of the fetch.
    /// A fetch failure clears the record's tags and is logged; it is
    /// not surfaced as a session error. If the module moved or vanished
    /// while the fetch was outstanding, the result is discarded.
    pub async fn fetch_tags_for(&self, identifier: &str) -> Result<()> {
        let service = self
            .tag_service
            .as_ref()
            .ok_or_else(|| RelmanError::Config {
                message: "No tag collaborator configured".to_string(),
            })?
            .clone();

        let kind = {
            let mut state = self.state.write().await;
            let Some(record) = state
                .records
                .iter_mut()
                .find(|r| r.identifier == identifier)
            else {
                return Err(RelmanError::lookup(format!(
                    "Module {identifier} not found"
                )));
            };
            record.loading = true;
            record.kind
        };

        let outcome = service.get_tags(identifier, false).await;
        apply_tag_outcome(&self.state, identifier, kind, outcome).await;
        Ok(())
    }

    /// Refresh tags for every projected module, strictly sequentially.
    ///
    /// An inter-request delay keeps the sweep polite with the upstream
    /// rate limit. Progress is observable via [`refresh_progress`].
    /// A failure for one module records "no tags available" for it and
    /// the sweep continues.
    ///
    /// [`refresh_progress`]: EditorSession::refresh_progress
    pub async fn refresh_all_tags(&self) -> Result<()> {
        let service = self
            .tag_service
            .as_ref()
            .ok_or_else(|| RelmanError::Config {
                message: "No tag collaborator configured".to_string(),
            })?
            .clone();

        let targets: Vec<(String, relman_core::SourceKind)> = {
            let state = self.state.read().await;
            state
                .records
                .iter()
                .map(|r| (r.identifier.clone(), r.kind))
                .collect()
        };

        self.refresh_total.store(targets.len(), Ordering::SeqCst);
        self.refresh_done.store(0, Ordering::SeqCst);
        info!("Refreshing tags for {} modules", targets.len());

        for (index, (identifier, kind)) in targets.iter().enumerate() {
            if index > 0 {
                tokio::time::sleep(NetworkConfig::REFRESH_REQUEST_DELAY).await;
            }

            let outcome = service.get_tags(identifier, true).await;
            if let Err(ref e) = outcome {
                warn!("No tags available for {}: {}", identifier, e);
            }
            apply_tag_outcome(&self.state, identifier, *kind, outcome).await;
            self.refresh_done.fetch_add(1, Ordering::SeqCst);
        }

        Ok(())
    }

    /// Bulk refresh progress as (completed, total).
    pub fn refresh_progress(&self) -> (usize, usize) {
        (
            self.refresh_done.load(Ordering::SeqCst),
            self.refresh_total.load(Ordering::SeqCst),
        )
    }
}
