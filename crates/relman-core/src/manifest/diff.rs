//! Human-readable change list between the originally loaded manifest
//! and the current edited manifest.

use crate::manifest::model::{Manifest, SourceKind};
use crate::manifest::project::project_modules;
use std::collections::HashSet;
use std::fmt;

/// One reported difference between two manifests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffEntry {
    /// A scalar platform field changed.
    FieldChanged {
        field: &'static str,
        old: String,
        new: String,
    },
    /// A module exists in the current manifest but not the original.
    ModuleAdded {
        identifier: String,
        kind: SourceKind,
        value: String,
    },
    /// A module from the original is gone from the current manifest.
    ModuleRemoved {
        identifier: String,
        kind: SourceKind,
    },
    /// A module changed owning source kind.
    ModuleMoved {
        identifier: String,
        from: SourceKind,
        to: SourceKind,
        old_value: String,
        new_value: String,
    },
    /// A module kept its kind but its display value changed.
    ModuleValueChanged {
        identifier: String,
        kind: SourceKind,
        old: String,
        new: String,
    },
}

impl fmt::Display for DiffEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffEntry::FieldChanged { field, old, new } => {
                write!(f, "{field}: \"{old}\" -> \"{new}\"")
            }
            DiffEntry::ModuleAdded {
                identifier,
                kind,
                value,
            } => write!(f, "{identifier}: added to {kind} (\"{value}\")"),
            DiffEntry::ModuleRemoved { identifier, kind } => {
                write!(f, "{identifier}: removed from {kind}")
            }
            DiffEntry::ModuleMoved {
                identifier,
                from,
                to,
                old_value,
                new_value,
            } => write!(
                f,
                "{identifier}: moved from {from} (\"{old_value}\") to {to} (\"{new_value}\")"
            ),
            DiffEntry::ModuleValueChanged {
                identifier,
                kind,
                old,
                new,
            } => write!(f, "{identifier} ({kind}): \"{old}\" -> \"{new}\""),
        }
    }
}

/// Compute the ordered change list from `original` to `current`.
///
/// Platform fields come first, then the module-sources list, then module
/// changes in current-manifest order, then removals in original order.
/// Modules are matched by identifier anywhere in the original regardless
/// of source kind, which is how cross-source moves are detected. Entries
/// preserve first-seen order and no module+field is reported twice.
pub fn compute_diff(original: &Manifest, current: &Manifest) -> Vec<DiffEntry> {
    let mut entries = Vec::new();

    let scalar_fields = [
        (
            "PlatformVersion",
            &original.platform_version,
            &current.platform_version,
        ),
        (
            "PlatformImage",
            &original.platform_image,
            &current.platform_image,
        ),
        (
            "ManifestVersion",
            &original.manifest_version,
            &current.manifest_version,
        ),
    ];
    for (field, old, new) in scalar_fields {
        if old != new {
            entries.push(DiffEntry::FieldChanged {
                field,
                old: old.clone(),
                new: new.clone(),
            });
        }
    }

    // Only the first module-sources entry is compared. This mirrors the
    // established reporter; later entries are ignored.
    let old_first = original.module_sources.first();
    let new_first = current.module_sources.first();
    if old_first != new_first {
        entries.push(DiffEntry::FieldChanged {
            field: "ModuleSources",
            old: old_first.cloned().unwrap_or_default(),
            new: new_first.cloned().unwrap_or_default(),
        });
    }

    let original_records = project_modules(original);
    let current_records = project_modules(current);

    let mut seen: HashSet<String> = HashSet::new();
    for record in &current_records {
        if !seen.insert(record.identifier.clone()) {
            continue;
        }
        match original_records
            .iter()
            .find(|r| r.identifier == record.identifier)
        {
            None => entries.push(DiffEntry::ModuleAdded {
                identifier: record.identifier.clone(),
                kind: record.kind,
                value: record.value.clone(),
            }),
            Some(prior) if prior.kind != record.kind => entries.push(DiffEntry::ModuleMoved {
                identifier: record.identifier.clone(),
                from: prior.kind,
                to: record.kind,
                old_value: prior.value.clone(),
                new_value: record.value.clone(),
            }),
            Some(prior) if prior.value != record.value => {
                entries.push(DiffEntry::ModuleValueChanged {
                    identifier: record.identifier.clone(),
                    kind: record.kind,
                    old: prior.value.clone(),
                    new: record.value.clone(),
                });
            }
            Some(_) => {}
        }
    }

    for record in &original_records {
        if !seen.contains(&record.identifier) {
            entries.push(DiffEntry::ModuleRemoved {
                identifier: record.identifier.clone(),
                kind: record.kind,
            });
            seen.insert(record.identifier.clone());
        }
    }

    entries
}
