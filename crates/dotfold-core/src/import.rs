//! Import orchestration: plan first, apply second.
//!
//! `plan_import` only reads and computes: the resolved mapping, the
//! conflict report, and the skipped-page list come back as inert data.
//! `apply_import` refuses to write anything while the plan carries
//! conflicts or disallowed skips.

use std::collections::HashSet;
use std::fmt;
use std::io;

use serde_json::Value;

use crate::config::MigrationConfig;
use crate::conflict::{find_conflicts, ConflictReport};
use crate::dotpath;
use crate::frontmatter;
use crate::hierarchy::{hierarchy_mapping, HierarchyMapping};
use crate::model::PageRecord;
use crate::parser::parse_document;
use crate::rewrite::rewrite_links;
use crate::store::PageStore;
use crate::tree::render_to_text;

#[derive(Debug)]
pub enum ImportError {
    /// The resolved mapping is not applicable: duplicate target names or
    /// overwrites of pre-existing pages.
    Conflicts(ConflictReport),
    /// Non-importable pages with real content exist and the config does
    /// not allow skipping them.
    SkippedContent(Vec<String>),
    Io(io::Error),
    Yaml(serde_yaml::Error),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Conflicts(report) => write!(
                f,
                "naming conflicts: {} duplicate target(s), {} overwrite(s)",
                report.duplicate_targets.len(),
                report.overwrites.len()
            ),
            ImportError::SkippedContent(names) => {
                write!(f, "{} page(s) with content would be skipped", names.len())
            }
            ImportError::Io(err) => write!(f, "page store error: {}", err),
            ImportError::Yaml(err) => write!(f, "front matter error: {}", err),
        }
    }
}

impl std::error::Error for ImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ImportError::Io(err) => Some(err),
            ImportError::Yaml(err) => Some(err),
            _ => None,
        }
    }
}

impl From<io::Error> for ImportError {
    fn from(err: io::Error) -> Self {
        ImportError::Io(err)
    }
}

impl From<serde_yaml::Error> for ImportError {
    fn from(err: serde_yaml::Error) -> Self {
        ImportError::Yaml(err)
    }
}

/// One importable page, read and held until apply.
#[derive(Debug, Clone)]
struct SourcePage {
    record: PageRecord,
    frontmatter: Value,
    desc: Option<String>,
    body: String,
}

/// Everything a migration run computes before touching the store.
#[derive(Debug, Clone)]
pub struct ImportPlan {
    pub mapping: HierarchyMapping,
    pub conflicts: ConflictReport,
    /// Pages without the importable header shape but with real content.
    pub skipped: Vec<String>,
    pages: Vec<SourcePage>,
}

impl ImportPlan {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn is_applicable(&self, config: &MigrationConfig) -> bool {
        self.conflicts.is_empty() && (config.allow_skipped_content || self.skipped.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported: usize,
    pub skipped: usize,
}

/// Read the whole store and compute the migration plan.
///
/// `is_exempt` decides which pages never count toward duplicate-target
/// conflicts; the usual choice is pages with an empty body.
pub fn plan_import<F>(
    store: &dyn PageStore,
    config: &MigrationConfig,
    is_exempt: F,
) -> Result<ImportPlan, ImportError>
where
    F: Fn(&PageRecord) -> bool,
{
    let names = store.list_pages()?;
    let existing: HashSet<String> = names.iter().cloned().collect();

    let mut pages = Vec::new();
    let mut skipped = Vec::new();
    for name in &names {
        let text = store.read_page(name)?;
        let doc = parse_document(&text);
        let body = doc.body(&text);
        // the front matter block's end offset sits before the line break
        // that terminates the closing fence
        let body = body.strip_prefix('\n').unwrap_or(body);

        let header = doc.frontmatter.as_ref().and_then(frontmatter::extract);
        match (header, doc.frontmatter) {
            (Some(header), Some(value)) => {
                pages.push(SourcePage {
                    record: PageRecord {
                        name: name.clone(),
                        title: header.title,
                        content_length: body.len(),
                    },
                    frontmatter: value,
                    desc: header.desc,
                    body: body.to_string(),
                });
            }
            _ => {
                if !body.trim().is_empty() {
                    skipped.push(name.clone());
                }
            }
        }
    }

    let records: Vec<PageRecord> = pages.iter().map(|p| p.record.clone()).collect();
    let mapping = hierarchy_mapping(&records, config);

    let exempt_names: HashSet<&str> = records
        .iter()
        .filter(|record| is_exempt(record))
        .map(|record| record.name.as_str())
        .collect();
    let conflicts = find_conflicts(&mapping, &existing, |old| exempt_names.contains(old));

    Ok(ImportPlan {
        mapping,
        conflicts,
        skipped,
        pages,
    })
}

/// Rewrite and write every planned page under its new name.
///
/// Old pages are left in place; cleanup is the caller's decision.
pub fn apply_import(
    store: &mut dyn PageStore,
    plan: &ImportPlan,
    config: &MigrationConfig,
) -> Result<ImportSummary, ImportError> {
    if !plan.conflicts.is_empty() {
        return Err(ImportError::Conflicts(plan.conflicts.clone()));
    }
    if !config.allow_skipped_content && !plan.skipped.is_empty() {
        return Err(ImportError::SkippedContent(plan.skipped.clone()));
    }

    for page in &plan.pages {
        let new_name = match plan.mapping.get(&page.record.name) {
            Some(name) => name,
            None => continue,
        };

        let mut tree = parse_document(&page.body).tree;
        rewrite_links(&mut tree, &plan.mapping);
        let mut body = render_to_text(&tree);

        if config.link_parent {
            if let Some(parent_new) = dotpath::parent(&page.record.name)
                .and_then(|parent| plan.mapping.get(&parent))
            {
                if !body.is_empty() && !body.ends_with('\n') {
                    body.push('\n');
                }
                body.push_str(&format!("\n[[{}]]\n", parent_new));
            }
        }

        let rewritten = frontmatter::rewrite(&page.frontmatter, &page.record.name, config);
        let desc = if config.include_description {
            page.desc.as_deref()
        } else {
            None
        };
        let text = frontmatter::compose(&rewritten, desc, &body)?;
        store.write_page(new_name, &text)?;
    }

    Ok(ImportSummary {
        imported: plan.pages.len(),
        skipped: plan.skipped.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    struct MemoryStore {
        pages: BTreeMap<String, String>,
    }

    impl MemoryStore {
        fn new(pages: &[(&str, &str)]) -> Self {
            Self {
                pages: pages
                    .iter()
                    .map(|(name, text)| (name.to_string(), text.to_string()))
                    .collect(),
            }
        }
    }

    impl PageStore for MemoryStore {
        fn list_pages(&self) -> io::Result<Vec<String>> {
            Ok(self.pages.keys().cloned().collect())
        }

        fn read_page(&self, name: &str) -> io::Result<String> {
            self.pages
                .get(name)
                .cloned()
                .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
        }

        fn write_page(&mut self, name: &str, text: &str) -> io::Result<()> {
            self.pages.insert(name.to_string(), text.to_string());
            Ok(())
        }
    }

    fn source_page(id: &str, title: &str, desc: Option<&str>, body: &str) -> String {
        let mut text = format!("---\nid: {}\ntitle: {}\ncreated: 1\nmodified: 2\n", id, title);
        if let Some(desc) = desc {
            text.push_str(&format!("desc: {}\n", desc));
        }
        text.push_str("---\n");
        text.push_str(body);
        text
    }

    fn exempt_empty(record: &PageRecord) -> bool {
        record.content_length == 0
    }

    #[test]
    fn test_plan_partitions_importable_and_skipped() {
        let store = MemoryStore::new(&[
            ("topic", &source_page("t1", "Topic", None, "Body.\n")),
            ("stray", "Just text without a header.\n"),
            ("empty-stub", ""),
        ]);
        let config = MigrationConfig::default();
        let plan = plan_import(&store, &config, exempt_empty).unwrap();

        assert_eq!(plan.page_count(), 1);
        assert_eq!(plan.skipped, vec!["stray".to_string()]);
        assert_eq!(plan.mapping["topic"], "Topic");
        assert!(!plan.is_applicable(&config));
    }

    #[test]
    fn test_apply_rewrites_links_and_front_matter() {
        let mut store = MemoryStore::new(&[
            (
                "topic",
                &source_page("t1", "Topic", None, "\nSee [[topic.detail]].\n"),
            ),
            (
                "topic.detail",
                &source_page(
                    "t2",
                    "Detail",
                    Some("About details"),
                    "\nBack to [[topic]] and hi @jane.doe!\n",
                ),
            ),
        ]);
        let config = MigrationConfig::default();
        let plan = plan_import(&store, &config, exempt_empty).unwrap();
        assert!(plan.is_applicable(&config));

        let summary = apply_import(&mut store, &plan, &config).unwrap();
        assert_eq!(summary, ImportSummary { imported: 2, skipped: 0 });

        let topic = store.read_page("Topic").unwrap();
        assert!(topic.starts_with("---\n"));
        assert!(topic.contains("aliases:\n- topic\n"));
        assert!(!topic.contains("id:"));
        assert!(topic.contains("See [[Topic/Detail]]."));

        let detail = store.read_page("Topic/Detail").unwrap();
        assert!(detail.contains("aliases:\n- topic.detail\n"));
        assert!(detail.contains("---\nAbout details\n\n"));
        assert!(detail.contains("Back to [[Topic]] and hi [[user.jane.doe]]!"));
    }

    #[test]
    fn test_apply_refuses_duplicate_targets() {
        let mut store = MemoryStore::new(&[
            ("alpha", &source_page("a", "Same", None, "One.\n")),
            ("beta", &source_page("b", "Same", None, "Two.\n")),
        ]);
        let config = MigrationConfig::default();
        let plan = plan_import(&store, &config, exempt_empty).unwrap();
        assert_eq!(plan.conflicts.duplicate_targets["Same"].len(), 2);

        match apply_import(&mut store, &plan, &config) {
            Err(ImportError::Conflicts(report)) => {
                assert!(report.duplicate_targets.contains_key("Same"))
            }
            other => panic!("expected conflict error, got {:?}", other.map(|s| s.imported)),
        }
    }

    #[test]
    fn test_empty_stub_is_exempt_from_duplicates() {
        let store = MemoryStore::new(&[
            ("alpha", &source_page("a", "Same", None, "")),
            ("beta", &source_page("b", "Same", None, "Real content.\n")),
        ]);
        let config = MigrationConfig::default();
        let plan = plan_import(&store, &config, exempt_empty).unwrap();
        assert!(plan.conflicts.is_empty());
    }

    #[test]
    fn test_overwrite_of_existing_page_detected() {
        let store = MemoryStore::new(&[
            ("topic", &source_page("t1", "Topic", None, "Body.\n")),
            ("Topic", ""),
        ]);
        let config = MigrationConfig::default();
        let plan = plan_import(&store, &config, exempt_empty).unwrap();
        assert_eq!(plan.conflicts.overwrites, vec!["Topic".to_string()]);
    }

    #[test]
    fn test_skipped_content_gate() {
        let mut store = MemoryStore::new(&[
            ("topic", &source_page("t1", "Topic", None, "Body.\n")),
            ("stray", "No header, real content.\n"),
        ]);
        let config = MigrationConfig::default();
        let plan = plan_import(&store, &config, exempt_empty).unwrap();

        match apply_import(&mut store, &plan, &config) {
            Err(ImportError::SkippedContent(names)) => {
                assert_eq!(names, vec!["stray".to_string()])
            }
            other => panic!("expected skipped error, got {:?}", other.map(|s| s.imported)),
        }

        let permissive = MigrationConfig {
            allow_skipped_content: true,
            ..Default::default()
        };
        let plan = plan_import(&store, &permissive, exempt_empty).unwrap();
        let summary = apply_import(&mut store, &plan, &permissive).unwrap();
        assert_eq!(summary, ImportSummary { imported: 1, skipped: 1 });
        // skipped pages are never rewritten
        assert_eq!(
            store.read_page("stray").unwrap(),
            "No header, real content.\n"
        );
    }

    #[test]
    fn test_link_parent_appends_parent_link() {
        let mut store = MemoryStore::new(&[
            ("topic", &source_page("t1", "Topic", None, "Root.\n")),
            ("topic.detail", &source_page("t2", "Detail", None, "Leaf.\n")),
        ]);
        let config = MigrationConfig {
            link_parent: true,
            ..Default::default()
        };
        let plan = plan_import(&store, &config, exempt_empty).unwrap();
        apply_import(&mut store, &plan, &config).unwrap();

        let detail = store.read_page("Topic/Detail").unwrap();
        assert!(detail.ends_with("\n[[Topic]]\n"));
        // the root has no parent to link
        let topic = store.read_page("Topic").unwrap();
        assert!(!topic.contains("[["));
    }

    #[test]
    fn test_end_to_end_over_directory_store() {
        use crate::store::DirectoryStore;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join("topic.md"),
            source_page("t1", "Topic", None, "Root.\n"),
        )
        .unwrap();
        std::fs::write(
            temp_dir.path().join("topic.detail.md"),
            source_page("t2", "Detail", None, "See [[topic]].\n"),
        )
        .unwrap();

        let mut store = DirectoryStore::new(temp_dir.path());
        let config = MigrationConfig::default();
        let plan = plan_import(&store, &config, exempt_empty).unwrap();
        assert!(plan.is_applicable(&config));
        apply_import(&mut store, &plan, &config).unwrap();

        let detail = std::fs::read_to_string(temp_dir.path().join("Topic/Detail.md")).unwrap();
        assert!(detail.contains("See [[Topic]]."));
        // source pages stay in place
        assert!(temp_dir.path().join("topic.md").exists());
    }

    #[test]
    fn test_description_flag() {
        let mut store = MemoryStore::new(&[(
            "topic",
            &source_page("t1", "Topic", Some("The blurb"), "Body.\n"),
        )]);
        let config = MigrationConfig {
            include_description: false,
            ..Default::default()
        };
        let plan = plan_import(&store, &config, exempt_empty).unwrap();
        apply_import(&mut store, &plan, &config).unwrap();

        let topic = store.read_page("Topic").unwrap();
        assert!(!topic.contains("The blurb"));
    }
}
