//! View-model projection and edit reprojection.
//!
//! `project_modules` flattens the manifest into view-records;
//! `reproject_edit` writes a single edit back into a cloned manifest.
//! Edits are never applied to shared state in place: every mutation
//! works on a full clone and the caller atomically replaces its stored
//! reference with the returned manifest.

use crate::manifest::codec::{self, ModuleRecord};
use crate::manifest::model::{FeedModule, Manifest, SourceDecl, SourceKind, ViewRecord};

/// Reserved value signaling "remove this module" to [`reproject_edit`].
pub const DELETE_SENTINEL: &str = "__delete__";

/// Flatten every module record in the manifest into view-records.
///
/// Records whose identifier cannot be derived are skipped. Output order
/// is manifest insertion order.
pub fn project_modules(manifest: &Manifest) -> Vec<ViewRecord> {
    let mut records = Vec::new();
    for source in &manifest.sources {
        match source {
            SourceDecl::BlobStorage { modules, .. } => {
                for value in modules {
                    let record = ModuleRecord::Blob(value);
                    if let Some(identifier) = record.identifier() {
                        records.push(ViewRecord::new(
                            identifier,
                            record.display_value(),
                            SourceKind::BlobStorage,
                        ));
                    }
                }
            }
            SourceDecl::ReleaseFeed { modules, .. } => {
                for module in modules {
                    let record = ModuleRecord::Feed(module);
                    if let Some(identifier) = record.identifier() {
                        records.push(ViewRecord::new(
                            identifier,
                            record.display_value(),
                            SourceKind::ReleaseFeed,
                        ));
                    }
                }
            }
        }
    }
    records
}

/// Sorted copy of the records, by identifier (lexicographic).
///
/// Display-only projection; storage order is never mutated.
pub fn sorted_records(records: &[ViewRecord]) -> Vec<ViewRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| a.identifier.cmp(&b.identifier));
    sorted
}

/// Write one edit back into a cloned manifest and return the clone.
///
/// `new_value` is the raw stored value: the version for release-feed
/// records, the full composite string for blob records (callers compose
/// via the codec before calling). Three cases:
/// - the delete sentinel removes the record,
/// - no matching record appends a kind-shaped record,
/// - a matching record gets its value updated in place.
///
/// An absent source declaration for `kind` is a no-op returning the
/// clone unchanged.
pub fn reproject_edit(
    manifest: &Manifest,
    identifier: &str,
    kind: SourceKind,
    new_value: &str,
) -> Manifest {
    let mut next = manifest.clone();
    let Some(source) = next.sources.iter_mut().find(|s| s.kind() == kind) else {
        return next;
    };

    match source {
        SourceDecl::BlobStorage { modules, .. } => {
            let position = modules.iter().position(|value| {
                // Exact identifier-before-first-`_` match, or prefix
                // match on `"<identifier>_"`. The prefix match can
                // mismatch when one identifier prefixes another
                // ("Foo" vs "FooBar"); kept as the established lookup.
                codec::blob_identifier(value) == Some(identifier)
                    || value.starts_with(&codec::compose_storage_value(identifier, ""))
            });
            if new_value == DELETE_SENTINEL {
                if let Some(position) = position {
                    modules.remove(position);
                }
            } else {
                let stored = if new_value.is_empty() {
                    codec::compose_storage_value(identifier, "")
                } else {
                    new_value.to_string()
                };
                match position {
                    Some(position) => modules[position] = stored,
                    None => modules.push(stored),
                }
            }
        }
        SourceDecl::ReleaseFeed { modules, .. } => {
            let position = modules.iter().position(|module| module.name == identifier);
            if new_value == DELETE_SENTINEL {
                if let Some(position) = position {
                    modules.remove(position);
                }
            } else {
                match position {
                    Some(position) => modules[position].version = new_value.to_string(),
                    None => modules.push(FeedModule {
                        name: identifier.to_string(),
                        version: new_value.to_string(),
                    }),
                }
            }
        }
    }

    next
}
