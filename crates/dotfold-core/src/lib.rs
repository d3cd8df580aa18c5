//! Dotfold Core Library
//!
//! Pure logic for migrating a corpus of dot-path-named notes
//! (`topic.detail.sub`) into folder-style, human-titled names
//! (`Topic/Detail/Sub`): hierarchy name resolution, conflict detection,
//! and link rewriting over a generic document syntax tree.
//! No interactive IO; the only filesystem code is the page store.

pub mod config;
pub mod conflict;
pub mod dotpath;
pub mod frontmatter;
pub mod hierarchy;
pub mod import;
pub mod model;
pub mod parser;
pub mod rewrite;
pub mod store;
pub mod tree;

pub use config::MigrationConfig;
pub use conflict::{find_conflicts, ConflictReport};
pub use dotpath::{derive_title, strip_quotes};
pub use hierarchy::{hierarchy_mapping, HierarchyMapping};
pub use import::{apply_import, plan_import, ImportError, ImportPlan, ImportSummary};
pub use model::PageRecord;
pub use parser::{parse_document, parse_fragment, ParsedDocument};
pub use rewrite::{canonicalize_alias_order, normalize_mentions, rewrite_links, rewrite_targets};
pub use store::{DirectoryStore, PageStore};
pub use tree::{render_to_text, replace_matching, ParseNode};
