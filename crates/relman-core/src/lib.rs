//! Relman Core - Headless library for deployment-manifest editing.
//!
//! This crate implements the bidirectional mapping between the canonical
//! JSON deployment manifest and the editor's flat view-model, plus the
//! reconciliation rules that keep the two consistent as modules move
//! between source kinds, versions are edited, or release metadata is
//! imported. It also provides the external collaborators: the GitHub
//! tag and pull-request clients and the 24-hour tag cache.
//!
//! For the interactive session layer (load/edit/move/import/refresh
//! orchestration), see the `relman-editor` crate.
//!
//! # Example
//!
//! ```rust
//! use relman_core::manifest::{self, SourceKind};
//!
//! let text = r#"{
//!   "PlatformVersion": "3.1.0",
//!   "PlatformImage": "registry.example.io/platform/runtime",
//!   "ManifestVersion": "1.4",
//!   "ModuleSources": ["primary"],
//!   "Sources": [
//!     { "Kind": "ReleaseFeed", "Feeds": [],
//!       "Modules": [ { "Name": "Foo", "Version": "1.2.3" } ] }
//!   ]
//! }"#;
//!
//! let loaded = manifest::parse_manifest(text).unwrap();
//! let edited = manifest::reproject_edit(&loaded, "Foo", SourceKind::ReleaseFeed, "1.2.4");
//! let json = manifest::to_canonical_json(&edited, true).unwrap();
//! assert!(json.contains(r#""Version": "1.2.4""#));
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod manifest;
pub mod naming;
pub mod network;

// Re-export commonly used types
pub use cache::{CachedTags, TagCache};
pub use error::{RelmanError, Result};
pub use manifest::{
    compute_diff, parse_manifest, project_modules, reproject_edit, to_canonical_json, DiffEntry,
    FeedModule, Manifest, SourceDecl, SourceKind, ViewRecord, DELETE_SENTINEL,
};
pub use network::{PullClient, TagClient};
