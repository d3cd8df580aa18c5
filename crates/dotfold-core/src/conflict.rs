//! Conflict detection over a resolved hierarchy mapping.
//!
//! Pure classification: nothing is mutated and nothing is raised. The
//! caller decides whether to abort, warn, or proceed.

use std::collections::{BTreeMap, HashSet};

use crate::hierarchy::HierarchyMapping;

/// Structured result of a conflict scan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictReport {
    /// New name -> old names that would coalesce into it. Only groups
    /// with more than one non-exempt member are reported.
    pub duplicate_targets: BTreeMap<String, Vec<String>>,
    /// New names that already exist in the target corpus, so importing
    /// would overwrite a pre-existing note.
    pub overwrites: Vec<String>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.duplicate_targets.is_empty() && self.overwrites.is_empty()
    }
}

/// Classify the mapping against the target corpus state.
///
/// `is_exempt` marks old names whose pages are structurally incapable of
/// holding real content (e.g. empty tag-like stubs); exempt members never
/// count toward a duplicate group.
pub fn find_conflicts<F>(
    mapping: &HierarchyMapping,
    existing_names: &HashSet<String>,
    is_exempt: F,
) -> ConflictReport
where
    F: Fn(&str) -> bool,
{
    let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (old_name, new_name) in mapping {
        if is_exempt(old_name) {
            continue;
        }
        groups
            .entry(new_name.clone())
            .or_default()
            .push(old_name.clone());
    }
    let duplicate_targets: BTreeMap<String, Vec<String>> = groups
        .into_iter()
        .filter(|(_, old_names)| old_names.len() > 1)
        .collect();

    let mut overwrites: Vec<String> = mapping
        .values()
        .filter(|new_name| existing_names.contains(*new_name))
        .cloned()
        .collect();
    overwrites.sort();
    overwrites.dedup();

    ConflictReport {
        duplicate_targets,
        overwrites,
    }
}
