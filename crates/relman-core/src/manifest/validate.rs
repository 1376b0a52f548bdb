//! Format predicates for manifest fields.
//!
//! A field is invalid when it is empty after trimming, or nonempty but
//! fails its kind-specific predicate. Validation failures are never
//! errors; they are continuously computed boolean signals the editor
//! uses for non-blocking visual indication.

use crate::manifest::model::{Manifest, SourceDecl, SourceKind};
use crate::manifest::{codec, project};
use regex::Regex;
use std::sync::LazyLock;

static SEMANTIC_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").unwrap());

static MANIFEST_VERSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\d+$").unwrap());

static IMAGE_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.-]+\.\w+/[\w.-]+(/[\w.-]+)?$").unwrap());

static ARTIFACT_FILENAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+(-[\w.-]+)?\.zip$").unwrap());

/// `major.minor.patch` version shape.
pub fn is_semantic_version(s: &str) -> bool {
    SEMANTIC_VERSION.is_match(s.trim())
}

/// `major.minor` manifest schema version shape.
pub fn is_manifest_version(s: &str) -> bool {
    MANIFEST_VERSION.is_match(s.trim())
}

/// `domain/org[/repo]` container-image reference shape.
pub fn is_image_reference(s: &str) -> bool {
    IMAGE_REFERENCE.is_match(s.trim())
}

/// `major.minor.patch[-extra].zip` artifact filename shape.
pub fn is_artifact_filename(s: &str) -> bool {
    ARTIFACT_FILENAME.is_match(s.trim())
}

/// True when a field value is empty after trimming or fails its predicate.
pub fn field_invalid(value: &str, predicate: impl Fn(&str) -> bool) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty() || !predicate(trimmed)
}

/// One currently invalid field, for the "jump to first invalid" action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidField {
    PlatformVersion,
    PlatformImage,
    ManifestVersion,
    Module {
        identifier: String,
        kind: SourceKind,
    },
}

/// Aggregate validity signal: OR over all currently displayed fields.
///
/// Platform fields are checked against their own predicates; module
/// display values against the owning kind's predicate (release-feed
/// versions must be semantic versions, blob suffixes artifact
/// filenames). Cheap enough to recompute on every edit.
pub fn has_invalid_inputs(manifest: &Manifest) -> bool {
    first_invalid_field(manifest).is_some()
}

/// The first invalid field in display order, if any.
///
/// Order matches the edit form: platform fields first, then modules in
/// manifest insertion order.
pub fn first_invalid_field(manifest: &Manifest) -> Option<InvalidField> {
    if field_invalid(&manifest.platform_version, is_semantic_version) {
        return Some(InvalidField::PlatformVersion);
    }
    if field_invalid(&manifest.platform_image, is_image_reference) {
        return Some(InvalidField::PlatformImage);
    }
    if field_invalid(&manifest.manifest_version, is_manifest_version) {
        return Some(InvalidField::ManifestVersion);
    }

    for record in project::project_modules(manifest) {
        let invalid = match record.kind {
            SourceKind::ReleaseFeed => field_invalid(&record.value, is_semantic_version),
            SourceKind::BlobStorage => field_invalid(&record.value, is_artifact_filename),
        };
        if invalid {
            return Some(InvalidField::Module {
                identifier: record.identifier,
                kind: record.kind,
            });
        }
    }

    None
}

/// Validate one module display value against its owning kind.
pub fn module_value_invalid(value: &str, kind: SourceKind) -> bool {
    match kind {
        SourceKind::ReleaseFeed => field_invalid(value, is_semantic_version),
        SourceKind::BlobStorage => field_invalid(value, is_artifact_filename),
    }
}

/// Count of invalid module values, used for status display.
pub fn invalid_module_count(manifest: &Manifest) -> usize {
    manifest
        .sources
        .iter()
        .flat_map(|source| match source {
            SourceDecl::BlobStorage { modules, .. } => modules
                .iter()
                .filter(|value| codec::blob_identifier(value).is_some())
                .map(|value| (SourceKind::BlobStorage, codec::blob_suffix(value).to_string()))
                .collect::<Vec<_>>(),
            SourceDecl::ReleaseFeed { modules, .. } => modules
                .iter()
                .filter(|module| !module.name.is_empty())
                .map(|module| (SourceKind::ReleaseFeed, module.version.clone()))
                .collect::<Vec<_>>(),
        })
        .filter(|(kind, value)| module_value_invalid(value, *kind))
        .count()
}
