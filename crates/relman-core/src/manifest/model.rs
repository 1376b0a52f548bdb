//! Deployment-manifest data model.
//!
//! The manifest is the single persisted source of truth for the editor.
//! All edits flow through it; the flattened [`ViewRecord`] list is an
//! ephemeral projection rebuilt whenever the manifest is replaced.
//!
//! Top-level JSON key order is the struct field order below (platform
//! fields first, then the module-source name list, then the source
//! declarations), which the canonical serializer relies on.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The canonical deployment configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(rename = "PlatformVersion")]
    pub platform_version: String,
    #[serde(rename = "PlatformImage")]
    pub platform_image: String,
    #[serde(rename = "ManifestVersion")]
    pub manifest_version: String,
    /// Flat list of module-source names used for dependency resolution
    /// elsewhere; the editor only ever compares its first element.
    #[serde(rename = "ModuleSources")]
    pub module_sources: Vec<String>,
    #[serde(rename = "Sources")]
    pub sources: Vec<SourceDecl>,
}

/// One module-storage declaration within a manifest.
///
/// A well-formed manifest carries exactly one declaration per kind; the
/// editor assumes this when locating "the" source of a kind but does not
/// enforce it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "Kind")]
pub enum SourceDecl {
    /// Blob-storage source: modules are stored as composite
    /// `"<identifier>_<artifact-filename>"` strings.
    BlobStorage {
        #[serde(rename = "Container")]
        container: String,
        #[serde(rename = "Endpoint")]
        endpoint: String,
        #[serde(rename = "Modules")]
        modules: Vec<String>,
    },
    /// Release-feed source: modules are name/version pairs resolved
    /// against upstream feeds.
    ReleaseFeed {
        #[serde(rename = "Feeds")]
        feeds: Vec<String>,
        #[serde(rename = "Modules")]
        modules: Vec<FeedModule>,
    },
}

impl SourceDecl {
    /// The kind tag of this declaration.
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceDecl::BlobStorage { .. } => SourceKind::BlobStorage,
            SourceDecl::ReleaseFeed { .. } => SourceKind::ReleaseFeed,
        }
    }
}

/// A module entry under a release-feed source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedModule {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Version")]
    pub version: String,
}

/// The two supported module-storage kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    BlobStorage,
    ReleaseFeed,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::BlobStorage => write!(f, "BlobStorage"),
            SourceKind::ReleaseFeed => write!(f, "ReleaseFeed"),
        }
    }
}

/// Ephemeral, flattened representation of a module record for editing.
///
/// Rebuilt in full whenever the manifest reference changes; never
/// persisted. `value` is the display value: the bare version for
/// release-feed modules, the suffix after the identifier prefix for
/// blob-storage modules.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewRecord {
    pub identifier: String,
    pub value: String,
    pub kind: SourceKind,
    /// Known-available version tags, when fetched.
    pub tags: Option<Vec<String>>,
    /// True while a tag fetch for this record is outstanding.
    pub loading: bool,
}

impl ViewRecord {
    /// Create a record with no cached tags and no fetch outstanding.
    pub fn new(identifier: impl Into<String>, value: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            identifier: identifier.into(),
            value: value.into(),
            kind,
            tags: None,
            loading: false,
        }
    }
}
