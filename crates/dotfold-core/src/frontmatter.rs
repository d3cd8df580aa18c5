//! Front matter handling for source pages.
//!
//! Importable pages carry a metadata header of the fixed shape
//! `{id: string, title: string, created: number, modified: number}` with
//! an optional `desc`. The rewritten page drops those keys and records the
//! old name as an alias instead.

use serde_json::{json, Map, Value};

use crate::config::MigrationConfig;
use crate::dotpath::strip_quotes;

const SOURCE_KEYS: [&str; 5] = ["id", "title", "created", "modified", "desc"];

/// Header extracted from an importable page's front matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceHeader {
    pub id: String,
    pub title: String,
    pub desc: Option<String>,
}

/// Downcast loosely-typed front matter into the importable header shape.
/// Any deviation (missing key, wrong type) means the page is not a source
/// note and is not an error.
pub fn extract(frontmatter: &Value) -> Option<SourceHeader> {
    let map = frontmatter.as_object()?;
    let id = map.get("id")?.as_str()?;
    let title = map.get("title")?.as_str()?;
    if !map.get("created")?.is_number() || !map.get("modified")?.is_number() {
        return None;
    }
    let desc = map
        .get("desc")
        .and_then(|v| v.as_str())
        .map(|d| strip_quotes(d).to_string());
    Some(SourceHeader {
        id: id.to_string(),
        title: strip_quotes(title).to_string(),
        desc,
    })
}

/// Produce the rewritten front matter: source keys removed, the old
/// dot-path name recorded under `aliases` when configured. Unknown keys
/// are carried over untouched.
pub fn rewrite(frontmatter: &Value, old_name: &str, config: &MigrationConfig) -> Value {
    let mut map = frontmatter
        .as_object()
        .cloned()
        .unwrap_or_else(Map::new);
    for key in SOURCE_KEYS {
        map.remove(key);
    }
    if config.alias_old_name {
        map.insert("aliases".to_string(), json!([old_name]));
    }
    Value::Object(map)
}

/// Assemble the output page text: fenced YAML front matter, an optional
/// description paragraph, then the body.
pub fn compose(
    frontmatter: &Value,
    desc: Option<&str>,
    body: &str,
) -> Result<String, serde_yaml::Error> {
    let yaml = serde_yaml::to_string(frontmatter)?;
    let mut out = String::from("---\n");
    out.push_str(&yaml);
    out.push_str("---\n");
    if let Some(desc) = desc {
        out.push_str(desc);
        out.push_str("\n\n");
    }
    out.push_str(body);
    Ok(out)
}
