//! Pull-request artifact import.
//!
//! Given free text containing a pull-request URL, fetches the PR body,
//! extracts the embedded artifact link, and applies it to the matching
//! module: moving the module into blob storage first when it currently
//! lives under the release feed, then setting the parsed filename
//! suffix. Unknown modules are an error; this path never creates one.

use crate::session::EditorSession;
use relman_core::manifest::reconcile;
use relman_core::{RelmanError, Result, SourceKind};
use tracing::info;

impl EditorSession {
    /// Import an artifact from a pull-request URL found in `text`.
    ///
    /// Errors:
    /// - [`RelmanError::Lookup`] when the text holds no recognizable
    ///   pull-request URL, the body holds no artifact link, or the
    ///   referenced module is not in the current manifest.
    /// - [`RelmanError::Fetch`] when the metadata collaborator answers
    ///   with a non-success status.
    pub async fn import_pull_request(&self, text: &str) -> Result<()> {
        let pull = reconcile::parse_pull_request_url(text).ok_or_else(|| {
            RelmanError::lookup("Input does not contain a pull request URL".to_string())
        })?;

        let client = self.require_pull_client()?.clone();
        let body = client.fetch_pull_body(&pull.repo, pull.number).await?;

        let asset = reconcile::find_asset_in_body(&body).ok_or_else(|| {
            RelmanError::lookup(format!(
                "No artifact link found in {}#{}",
                pull.repo, pull.number
            ))
        })?;

        let current_kind = {
            let state = self.state.read().await;
            state
                .records
                .iter()
                .find(|r| r.identifier == asset.identifier)
                .map(|r| r.kind)
        };

        let Some(current_kind) = current_kind else {
            return Err(RelmanError::lookup(format!(
                "Module {} is not part of the current manifest",
                asset.identifier
            )));
        };

        // The destination record must exist before its value is set, so
        // the move completes before the edit.
        if current_kind == SourceKind::ReleaseFeed {
            self.move_module(
                &asset.identifier,
                SourceKind::ReleaseFeed,
                SourceKind::BlobStorage,
            )
            .await?;
        }

        self.edit_value(&asset.identifier, SourceKind::BlobStorage, &asset.filename)
            .await?;

        info!(
            "Imported artifact {} for module {} from {}#{}",
            asset.filename, asset.identifier, pull.repo, pull.number
        );
        Ok(())
    }
}
