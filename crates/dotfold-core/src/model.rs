use serde::{Deserialize, Serialize};

/// One importable note, as listed by the page store.
///
/// Immutable once read; the resolver and conflict detector only consume it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    /// Dot-delimited hierarchical identifier, unique per corpus.
    pub name: String,
    /// Human-readable title extracted from the note's metadata.
    pub title: String,
    /// Length of the body excluding front matter. Empty bodies mark
    /// pages that are structurally incapable of holding real content
    /// (tag-like stubs), which callers may exempt from conflicts.
    pub content_length: usize,
}

impl PageRecord {
    pub fn new(name: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            content_length: 0,
        }
    }
}
