//! Cross-source moves and pull-request artifact extraction.
//!
//! Moving a module between source kinds is a sentinel-delete followed by
//! an empty-value insert: the two kinds store incompatible value shapes
//! (bare version vs. prefixed filename), so the destination gets a
//! correctly shaped empty record rather than a copy of the prior value.

use crate::manifest::model::{Manifest, SourceKind};
use crate::manifest::project::{reproject_edit, DELETE_SENTINEL};
use regex::Regex;
use std::sync::LazyLock;

static PULL_REQUEST_URL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"github\.com/([\w.-]+)/([\w.-]+)/pull/(\d+)").unwrap());

// Tolerates \r\n bodies: neither character class admits line breaks, so
// a match never spans lines regardless of ending style.
static ASSET_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"packages/([A-Za-z0-9.-]+)_(\d+\.\d+\.\d+(?:-[\w.-]+)?\.zip)").unwrap()
});

/// A pull request located from free text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    /// `owner/name` repository path.
    pub repo: String,
    pub number: u64,
}

/// An artifact reference embedded in a pull-request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    pub identifier: String,
    /// The artifact filename suffix, i.e. the blob display value.
    pub filename: String,
}

/// Move a module between source kinds.
///
/// Deletes under `from` via the sentinel, then inserts an empty-valued,
/// kind-shaped record under `to` (release feed gets `Version: ""`, blob
/// storage gets the `"<identifier>_"` placeholder). The order matters:
/// the destination record must exist before any follow-up value edit.
pub fn move_module(
    manifest: &Manifest,
    identifier: &str,
    from: SourceKind,
    to: SourceKind,
) -> Manifest {
    let removed = reproject_edit(manifest, identifier, from, DELETE_SENTINEL);
    reproject_edit(&removed, identifier, to, "")
}

/// Extract a repository and pull-request number from free text.
///
/// Recognizes the `github.com/<owner>/<repo>/pull/<number>` shape
/// anywhere in the input.
pub fn parse_pull_request_url(text: &str) -> Option<PullRequestRef> {
    let captures = PULL_REQUEST_URL.captures(text)?;
    let number = captures[3].parse().ok()?;
    Some(PullRequestRef {
        repo: format!("{}/{}", &captures[1], &captures[2]),
        number,
    })
}

/// Find an embedded artifact URL of the shape
/// `.../packages/<identifier>_<version[-suffix]>.zip` in a PR body.
pub fn find_asset_in_body(body: &str) -> Option<AssetRef> {
    let captures = ASSET_URL.captures(body)?;
    Some(AssetRef {
        identifier: captures[1].to_string(),
        filename: captures[2].to_string(),
    })
}
