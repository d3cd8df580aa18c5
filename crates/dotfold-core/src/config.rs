use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Top-level configuration for a migration run.
///
/// Passed explicitly into every resolver/importer call; nothing is read
/// from ambient state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// If true, ancestor segments contribute nothing to the new name;
    /// only the leaf title is used (overrides still apply).
    #[serde(default)]
    pub flatten_hierarchy: bool,
    /// Dot-path prefix -> title. Highest priority: wins over both exact
    /// page titles and synthesized ones, and over the flatten flag.
    #[serde(default)]
    pub name_overrides: BTreeMap<String, String>,
    /// Record the old dot-path name as an alias in the rewritten
    /// front matter.
    #[serde(default = "default_true")]
    pub alias_old_name: bool,
    /// Prepend the note's `desc` field as a leading paragraph.
    #[serde(default = "default_true")]
    pub include_description: bool,
    /// Proceed even when non-importable pages with real content exist.
    #[serde(default)]
    pub allow_skipped_content: bool,
    /// Append a link to the mapped parent page, since the folder naming
    /// scheme no longer encodes ancestry.
    #[serde(default)]
    pub link_parent: bool,
}

fn default_true() -> bool {
    true
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            flatten_hierarchy: false,
            name_overrides: BTreeMap::new(),
            alias_old_name: true,
            include_description: true,
            allow_skipped_content: false,
            link_parent: false,
        }
    }
}

impl MigrationConfig {
    /// Load config from YAML content
    pub fn from_yaml(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }

    /// Serialize to YAML
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}
