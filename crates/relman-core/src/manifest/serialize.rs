//! Manifest parsing and deterministic JSON rendering.
//!
//! Output always uses the fixed top-level key order of the data model
//! and 2-space pretty printing. With sorting enabled, a deep copy is
//! reordered deterministically before rendering; with sorting disabled,
//! structure and ordering are emitted exactly as stored.

use crate::error::{RelmanError, Result};
use crate::manifest::codec;
use crate::manifest::model::{Manifest, SourceDecl};

/// Parse raw JSON text into a manifest.
///
/// A parse failure surfaces [`RelmanError::Parse`] and implies no state
/// change on the caller's side.
pub fn parse_manifest(text: &str) -> Result<Manifest> {
    serde_json::from_str(text).map_err(|e| RelmanError::Parse {
        message: e.to_string(),
        source: Some(e),
    })
}

/// Render the manifest as canonical pretty-printed JSON.
///
/// With `sort_enabled`, source declarations are ordered by kind name,
/// modules by derived identifier (blob modules by the identifier before
/// the first `_`, not the raw composite string), and the module-source
/// and feed lists lexicographically. Without it, nothing is reordered
/// and nothing is deduplicated.
pub fn to_canonical_json(manifest: &Manifest, sort_enabled: bool) -> Result<String> {
    let rendered = if sort_enabled {
        serde_json::to_string_pretty(&sorted_copy(manifest))?
    } else {
        serde_json::to_string_pretty(manifest)?
    };
    Ok(rendered)
}

/// Deep copy with deterministic ordering applied.
fn sorted_copy(manifest: &Manifest) -> Manifest {
    let mut sorted = manifest.clone();

    sorted.module_sources.sort();
    sorted
        .sources
        .sort_by_key(|source| source.kind().to_string());

    for source in &mut sorted.sources {
        match source {
            SourceDecl::BlobStorage { modules, .. } => {
                modules.sort_by(|a, b| {
                    let a_key = codec::blob_identifier(a).unwrap_or(a);
                    let b_key = codec::blob_identifier(b).unwrap_or(b);
                    a_key.cmp(b_key).then_with(|| a.cmp(b))
                });
            }
            SourceDecl::ReleaseFeed { feeds, modules } => {
                feeds.sort();
                modules.sort_by(|a, b| a.name.cmp(&b.name));
            }
        }
    }

    sorted
}
