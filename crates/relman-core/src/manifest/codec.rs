//! Identifier/value codec.
//!
//! Maps a stored module record to its stable identifier and display
//! value, and composes the blob-storage form back from those parts.
//! The blob-storage representation is a single composite string
//! `"<identifier>_<suffix>"`; the identifier is recoverable only by
//! splitting on the first `_`. Identifiers containing `_` themselves
//! are a known limitation of this encoding.

use crate::manifest::model::{FeedModule, SourceKind};

/// Borrowed view of one stored module record, keyed by owning source kind.
#[derive(Debug, Clone, Copy)]
pub enum ModuleRecord<'a> {
    /// Composite `"<identifier>_<suffix>"` string from a blob source.
    Blob(&'a str),
    /// Name/version pair from a release feed.
    Feed(&'a FeedModule),
}

impl ModuleRecord<'_> {
    /// The stable module identifier, or `None` when it cannot be
    /// derived (blob value with no `_`). Callers skip such records.
    pub fn identifier(&self) -> Option<&str> {
        match self {
            ModuleRecord::Blob(value) => blob_identifier(value),
            ModuleRecord::Feed(module) => {
                if module.name.is_empty() {
                    None
                } else {
                    Some(&module.name)
                }
            }
        }
    }

    /// The display value: bare version for feed records, the suffix
    /// after the first `_` for blob records. Empty when absent.
    pub fn display_value(&self) -> &str {
        match self {
            ModuleRecord::Blob(value) => blob_suffix(value),
            ModuleRecord::Feed(module) => &module.version,
        }
    }

    /// The owning source kind.
    pub fn kind(&self) -> SourceKind {
        match self {
            ModuleRecord::Blob(_) => SourceKind::BlobStorage,
            ModuleRecord::Feed(_) => SourceKind::ReleaseFeed,
        }
    }
}

/// Identifier portion of a composite blob value: everything before the
/// first `_`. `None` when the value has no `_` at all.
pub fn blob_identifier(value: &str) -> Option<&str> {
    value.split_once('_').map(|(identifier, _)| identifier)
}

/// Suffix portion of a composite blob value: everything after the
/// first `_`, or empty when absent.
pub fn blob_suffix(value: &str) -> &str {
    value.split_once('_').map(|(_, suffix)| suffix).unwrap_or("")
}

/// Compose the stored blob value from identifier and suffix.
///
/// An empty suffix yields the `"<identifier>_"` placeholder, which
/// signals a freshly moved module whose artifact is not yet filled in.
pub fn compose_storage_value(identifier: &str, suffix: &str) -> String {
    format!("{identifier}_{suffix}")
}
