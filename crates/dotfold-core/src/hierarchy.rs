//! Hierarchy name resolution: old dot-path names to new folder-style
//! names built from ancestor titles.

use std::collections::BTreeMap;

use crate::config::MigrationConfig;
use crate::dotpath::{self, derive_title, PATH_SEPARATOR};
use crate::model::PageRecord;

/// Old dot-path name -> new folder-style name. Built fresh per run and
/// read-only afterwards; every input page name appears exactly once as a
/// key. The codomain may contain duplicates, which conflict detection
/// catches downstream.
pub type HierarchyMapping = BTreeMap<String, String>;

/// Resolve the new name for every page.
///
/// The binding table maps every dot-path prefix to a title. Precedence is
/// kept auditable with three explicit passes instead of interleaved
/// conditionals:
///
/// 1. exact bindings (a page's full name bound to its own title) always
///    overwrite,
/// 2. synthesized bindings (title heuristic on the prefix's last segment)
///    only fill gaps,
/// 3. name overrides from the config overwrite unconditionally.
///
/// With `flatten_hierarchy` the first two passes are skipped entirely, so
/// only override prefixes contribute ancestor components.
pub fn hierarchy_mapping(pages: &[PageRecord], config: &MigrationConfig) -> HierarchyMapping {
    let mut ordered: Vec<&PageRecord> = pages.iter().collect();
    ordered.sort_by_key(|page| dotpath::depth(&page.name));

    let mut titles: BTreeMap<String, String> = BTreeMap::new();
    if !config.flatten_hierarchy {
        for page in &ordered {
            titles.insert(page.name.clone(), page.title.clone());
        }
        for page in &ordered {
            for prefix in dotpath::prefixes(&page.name) {
                if !titles.contains_key(&prefix) {
                    let title = dotpath::segments(&prefix)
                        .last()
                        .copied()
                        .map(derive_title)
                        .unwrap_or_default();
                    titles.insert(prefix, title);
                }
            }
        }
    }
    for (prefix, title) in &config.name_overrides {
        titles.insert(prefix.clone(), title.clone());
    }

    let separator = PATH_SEPARATOR.to_string();
    let mut mapping = HierarchyMapping::new();
    for page in &ordered {
        let mut components: Vec<&str> = Vec::new();
        let prefixes = dotpath::prefixes(&page.name);
        for prefix in &prefixes[..prefixes.len() - 1] {
            if let Some(title) = titles.get(prefix) {
                components.push(title);
            }
        }
        let leaf = titles
            .get(&page.name)
            .map(String::as_str)
            .unwrap_or(page.title.as_str());
        components.push(leaf);
        mapping.insert(page.name.clone(), components.join(separator.as_str()));
    }
    mapping
}
