//! Manifest handling: data model, codec, validation, projection,
//! reconciliation, diffing, and canonical serialization.
//!
//! Submodules:
//! - `model`: serde data model (manifest, sources, modules, view-records)
//! - `codec`: identifier/value mapping between stored and display forms
//! - `validate`: format predicates and the aggregate validity signal
//! - `project`: manifest -> view-record projection and edit reprojection
//! - `reconcile`: cross-source moves and pull-request artifact parsing
//! - `diff`: human-readable change list between two manifests
//! - `serialize`: parsing and deterministic JSON rendering

pub mod codec;
pub mod diff;
pub mod model;
pub mod project;
pub mod reconcile;
pub mod serialize;
pub mod validate;

pub use diff::{compute_diff, DiffEntry};
pub use model::{FeedModule, Manifest, SourceDecl, SourceKind, ViewRecord};
pub use project::{project_modules, reproject_edit, sorted_records, DELETE_SENTINEL};
pub use reconcile::{find_asset_in_body, move_module, parse_pull_request_url, AssetRef, PullRequestRef};
pub use serialize::{parse_manifest, to_canonical_json};
