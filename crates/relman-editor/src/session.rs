//! Interactive editor session over a deployment manifest.
//!
//! The session owns two manifests (the originally loaded one and the
//! current edited one) plus the projected view-records. There is one
//! logical writer; every mutation works on a clone of the current
//! manifest, atomically replaces the stored reference, and rebuilds the
//! records. Records carry per-module tag state across rebuilds so an
//! edit does not wipe fetched tags.

use crate::clipboard::ClipboardSink;
use crate::refresh::TagService;
use relman_core::manifest::validate::{self, InvalidField};
use relman_core::manifest::{codec, project, reconcile, serialize};
use relman_core::network::PullClient;
use relman_core::{compute_diff, DiffEntry, Manifest, RelmanError, Result, SourceKind, ViewRecord};
use std::sync::atomic::AtomicUsize;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

pub(crate) struct SessionState {
    pub(crate) original: Manifest,
    pub(crate) current: Manifest,
    pub(crate) records: Vec<ViewRecord>,
    pub(crate) sort_enabled: bool,
}

/// Main editor session coordinating manifest edits and collaborators.
pub struct EditorSession {
    pub(crate) state: Arc<RwLock<SessionState>>,
    pub(crate) tag_service: Option<Arc<TagService>>,
    pub(crate) pull_client: Option<Arc<PullClient>>,
    pub(crate) refresh_done: Arc<AtomicUsize>,
    pub(crate) refresh_total: Arc<AtomicUsize>,
}

impl EditorSession {
    /// Create a session from raw manifest JSON.
    pub fn load(text: &str) -> Result<Self> {
        let manifest = serialize::parse_manifest(text)?;
        let records = project::project_modules(&manifest);
        Ok(Self {
            state: Arc::new(RwLock::new(SessionState {
                original: manifest.clone(),
                current: manifest,
                records,
                sort_enabled: true,
            })),
            tag_service: None,
            pull_client: None,
            refresh_done: Arc::new(AtomicUsize::new(0)),
            refresh_total: Arc::new(AtomicUsize::new(0)),
        })
    }

    /// Attach a tag collaborator (cache-backed fetching).
    pub fn with_tag_service(mut self, service: Arc<TagService>) -> Self {
        self.tag_service = Some(service);
        self
    }

    /// Attach a pull-request metadata collaborator.
    pub fn with_pull_client(mut self, client: Arc<PullClient>) -> Self {
        self.pull_client = Some(client);
        self
    }

    /// Replace the loaded manifest with freshly pasted JSON.
    ///
    /// On a parse failure the prior session state is untouched.
    pub async fn replace(&self, text: &str) -> Result<()> {
        let manifest = serialize::parse_manifest(text)?;
        let mut state = self.state.write().await;
        state.original = manifest.clone();
        state.current = manifest;
        // Manifest reference changed: rebuild in full, dropping tag state.
        state.records = project::project_modules(&state.current);
        info!("Loaded manifest with {} modules", state.records.len());
        Ok(())
    }

    /// Snapshot of the projected records, in manifest order.
    pub async fn records(&self) -> Vec<ViewRecord> {
        self.state.read().await.records.clone()
    }

    /// Snapshot of the records sorted by identifier, for display.
    pub async fn sorted_records(&self) -> Vec<ViewRecord> {
        project::sorted_records(&self.state.read().await.records)
    }

    /// Apply one display-value edit to a module.
    ///
    /// `display_value` is what the user typed: a bare version for
    /// release-feed modules, the filename suffix for blob modules (the
    /// composite stored form is composed here).
    pub async fn edit_value(
        &self,
        identifier: &str,
        kind: SourceKind,
        display_value: &str,
    ) -> Result<()> {
        let stored = match kind {
            SourceKind::BlobStorage => codec::compose_storage_value(identifier, display_value),
            SourceKind::ReleaseFeed => display_value.to_string(),
        };
        let mut state = self.state.write().await;
        state.current = project::reproject_edit(&state.current, identifier, kind, &stored);
        rebuild_records(&mut state);
        Ok(())
    }

    /// Edit a scalar platform field.
    pub async fn edit_platform_field(&self, field: PlatformField, value: &str) -> Result<()> {
        let mut state = self.state.write().await;
        let mut next = state.current.clone();
        match field {
            PlatformField::PlatformVersion => next.platform_version = value.to_string(),
            PlatformField::PlatformImage => next.platform_image = value.to_string(),
            PlatformField::ManifestVersion => next.manifest_version = value.to_string(),
        }
        state.current = next;
        Ok(())
    }

    /// Remove a module from its source.
    pub async fn remove_module(&self, identifier: &str, kind: SourceKind) -> Result<()> {
        let mut state = self.state.write().await;
        state.current =
            project::reproject_edit(&state.current, identifier, kind, project::DELETE_SENTINEL);
        rebuild_records(&mut state);
        Ok(())
    }

    /// Move a module between source kinds.
    ///
    /// The move itself is synchronous and visible immediately; when the
    /// destination is a release feed and a tag collaborator is attached,
    /// available tags are fetched in the background as best-effort
    /// enrichment. A completion that arrives after the module moved
    /// again or vanished is discarded.
    pub async fn move_module(
        &self,
        identifier: &str,
        from: SourceKind,
        to: SourceKind,
    ) -> Result<()> {
        let enrich = to == SourceKind::ReleaseFeed && self.tag_service.is_some();
        {
            let mut state = self.state.write().await;
            state.current = reconcile::move_module(&state.current, identifier, from, to);
            rebuild_records(&mut state);
            if enrich {
                if let Some(record) = state
                    .records
                    .iter_mut()
                    .find(|r| r.identifier == identifier && r.kind == to)
                {
                    record.loading = true;
                }
            }
        }

        if enrich {
            if let Some(service) = &self.tag_service {
                let service = service.clone();
                let state = self.state.clone();
                let identifier = identifier.to_string();
                tokio::spawn(async move {
                    let outcome = service.get_tags(&identifier, false).await;
                    apply_tag_outcome(&state, &identifier, to, outcome).await;
                });
            }
        }

        Ok(())
    }

    /// The change list from the originally loaded manifest.
    pub async fn diff(&self) -> Vec<DiffEntry> {
        let state = self.state.read().await;
        compute_diff(&state.original, &state.current)
    }

    /// Canonical JSON text of the current manifest.
    pub async fn serialized(&self) -> Result<String> {
        let state = self.state.read().await;
        serialize::to_canonical_json(&state.current, state.sort_enabled)
    }

    /// Aggregate validity signal across all displayed fields.
    pub async fn has_invalid_inputs(&self) -> bool {
        validate::has_invalid_inputs(&self.state.read().await.current)
    }

    /// The first invalid field in display order, if any.
    pub async fn first_invalid_field(&self) -> Option<InvalidField> {
        validate::first_invalid_field(&self.state.read().await.current)
    }

    /// Enable or disable deterministic sorting of the serialized output.
    pub async fn set_sort_enabled(&self, enabled: bool) {
        self.state.write().await.sort_enabled = enabled;
    }

    pub async fn sort_enabled(&self) -> bool {
        self.state.read().await.sort_enabled
    }

    /// Write the canonical JSON to a clipboard collaborator.
    ///
    /// Clipboard failures are logged, never surfaced as blocking errors.
    pub async fn copy_to_clipboard(&self, sink: &dyn ClipboardSink) -> Result<()> {
        let text = self.serialized().await?;
        if let Err(e) = sink.write_text(&text) {
            warn!("Clipboard write failed: {}", e);
        }
        Ok(())
    }

    pub(crate) fn require_pull_client(&self) -> Result<&Arc<PullClient>> {
        self.pull_client.as_ref().ok_or_else(|| RelmanError::Config {
            message: "No pull-request collaborator configured".to_string(),
        })
    }
}

/// Scalar platform fields exposed to the edit form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformField {
    PlatformVersion,
    PlatformImage,
    ManifestVersion,
}

/// Rebuild the record projection from the current manifest, carrying
/// per-module tag state over so typing does not discard fetched tags.
pub(crate) fn rebuild_records(state: &mut SessionState) {
    let previous = std::mem::take(&mut state.records);
    let mut records = project::project_modules(&state.current);
    for record in &mut records {
        if let Some(prior) = previous.iter().find(|r| r.identifier == record.identifier) {
            record.tags = prior.tags.clone();
            record.loading = prior.loading;
        }
    }
    state.records = records;
}

/// Apply a completed tag fetch to the session, discarding the result if
/// the module no longer exists under the expected kind.
pub(crate) async fn apply_tag_outcome(
    state: &Arc<RwLock<SessionState>>,
    identifier: &str,
    kind: SourceKind,
    outcome: Result<Vec<String>>,
) {
    let mut state = state.write().await;
    let Some(record) = state
        .records
        .iter_mut()
        .find(|r| r.identifier == identifier && r.kind == kind)
    else {
        // Module was moved or removed while the fetch was in flight.
        return;
    };
    record.loading = false;
    match outcome {
        Ok(tags) => record.tags = Some(tags),
        Err(e) => {
            warn!("Tag fetch failed for {}: {}", identifier, e);
            record.tags = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_session() -> EditorSession {
        let text = r#"{
            "PlatformVersion": "3.1.0",
            "PlatformImage": "registry.example.io/platform/runtime",
            "ManifestVersion": "1.4",
            "ModuleSources": ["primary"],
            "Sources": [
                { "Kind": "BlobStorage", "Container": "modules",
                  "Endpoint": "https://blobs.example.net",
                  "Modules": ["Alpha_1.2.3.zip"] },
                { "Kind": "ReleaseFeed",
                  "Feeds": ["https://feeds.example.net/v4"],
                  "Modules": [ { "Name": "Gamma", "Version": "0.9.1" } ] }
            ]
        }"#;
        EditorSession::load(text).unwrap()
    }

    #[tokio::test]
    async fn test_tag_outcome_attaches_to_present_record() {
        let session = test_session();
        apply_tag_outcome(
            &session.state,
            "Gamma",
            SourceKind::ReleaseFeed,
            Ok(vec!["1.0.0".to_string()]),
        )
        .await;

        let records = session.records().await;
        let record = records.iter().find(|r| r.identifier == "Gamma").unwrap();
        assert_eq!(record.tags, Some(vec!["1.0.0".to_string()]));
        assert!(!record.loading);
    }

    #[tokio::test]
    async fn test_tag_outcome_for_removed_module_is_discarded() {
        let session = test_session();
        session
            .remove_module("Gamma", SourceKind::ReleaseFeed)
            .await
            .unwrap();
        let before = session.records().await;

        apply_tag_outcome(
            &session.state,
            "Gamma",
            SourceKind::ReleaseFeed,
            Ok(vec!["1.0.0".to_string()]),
        )
        .await;

        // A completion for a vanished module leaves the records untouched.
        assert_eq!(session.records().await, before);
    }

    #[tokio::test]
    async fn test_tag_outcome_after_cross_kind_move_is_discarded() {
        let session = test_session();
        session
            .move_module("Gamma", SourceKind::ReleaseFeed, SourceKind::BlobStorage)
            .await
            .unwrap();

        // Completion keyed to the old kind no longer finds the record.
        apply_tag_outcome(
            &session.state,
            "Gamma",
            SourceKind::ReleaseFeed,
            Ok(vec!["1.0.0".to_string()]),
        )
        .await;

        let records = session.records().await;
        let record = records.iter().find(|r| r.identifier == "Gamma").unwrap();
        assert_eq!(record.kind, SourceKind::BlobStorage);
        assert_eq!(record.tags, None);
    }

    #[tokio::test]
    async fn test_tag_outcome_failure_clears_tags_and_loading() {
        let session = test_session();
        apply_tag_outcome(
            &session.state,
            "Gamma",
            SourceKind::ReleaseFeed,
            Ok(vec!["1.0.0".to_string()]),
        )
        .await;
        apply_tag_outcome(
            &session.state,
            "Gamma",
            SourceKind::ReleaseFeed,
            Err(RelmanError::Fetch { status: 500 }),
        )
        .await;

        let records = session.records().await;
        let record = records.iter().find(|r| r.identifier == "Gamma").unwrap();
        assert_eq!(record.tags, None);
        assert!(!record.loading);
    }
}
