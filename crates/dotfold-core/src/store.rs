use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Abstract interface to the page storage the importer runs against.
///
/// Page names map to relative paths without the `.md` extension; resolved
/// names contain `/` and land in subdirectories.
pub trait PageStore {
    /// Names of all pages currently in the store.
    fn list_pages(&self) -> io::Result<Vec<String>>;

    /// Read the full text of a page.
    fn read_page(&self, name: &str) -> io::Result<String>;

    /// Create or replace a page.
    fn write_page(&mut self, name: &str, text: &str) -> io::Result<()>;
}

/// Standard implementation over a directory tree of markdown files.
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn page_path(&self, name: &str) -> PathBuf {
        self.root.join(format!("{}.md", name))
    }

    fn page_name(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let mut name = rel.to_string_lossy().to_string();
        if std::path::MAIN_SEPARATOR == '\\' {
            name = name.replace('\\', "/");
        }
        Some(name.strip_suffix(".md").unwrap_or(&name).to_string())
    }
}

impl PageStore for DirectoryStore {
    fn list_pages(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in WalkDir::new(&self.root)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if path.is_file() {
                if let Some(ext) = path.extension() {
                    if ext == "md" {
                        if let Some(name) = self.page_name(path) {
                            names.push(name);
                        }
                    }
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn read_page(&self, name: &str) -> io::Result<String> {
        fs::read_to_string(self.page_path(name))
    }

    fn write_page(&mut self, name: &str, text: &str) -> io::Result<()> {
        let path = self.page_path(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_list_and_read_pages() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("topic.md"), "# Topic").unwrap();
        fs::write(temp_dir.path().join("topic.detail.md"), "# Detail").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let store = DirectoryStore::new(temp_dir.path());
        let names = store.list_pages().unwrap();
        assert_eq!(names, vec!["topic", "topic.detail"]);
        assert_eq!(store.read_page("topic").unwrap(), "# Topic");
    }

    #[test]
    fn test_extension_stripped_once() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("notes.md.md"), "# Notes").unwrap();

        let store = DirectoryStore::new(temp_dir.path());
        let names = store.list_pages().unwrap();
        assert_eq!(names, vec!["notes.md"]);
        assert_eq!(store.read_page("notes.md").unwrap(), "# Notes");
    }

    #[test]
    fn test_write_creates_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = DirectoryStore::new(temp_dir.path());
        store.write_page("Topic/Detail/Sub", "content").unwrap();

        assert_eq!(
            fs::read_to_string(temp_dir.path().join("Topic/Detail/Sub.md")).unwrap(),
            "content"
        );
        let names = store.list_pages().unwrap();
        assert_eq!(names, vec!["Topic/Detail/Sub"]);
    }
}
