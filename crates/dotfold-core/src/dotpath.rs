//! Dot-path utilities and the title heuristic.
//!
//! A dot-path is a note identifier composed of segments joined by `.`,
//! encoding hierarchical ancestry (`topic.detail`). Resolved output names
//! use `/` between human-readable components instead.

/// Separator between segments in source note names.
pub const DOT: char = '.';

/// Separator between resolved path components in output names.
pub const PATH_SEPARATOR: char = '/';

/// Split a dot-path into its segments.
pub fn segments(name: &str) -> Vec<&str> {
    name.split(DOT).collect()
}

/// Join segments back into a dot-path.
pub fn join(segments: &[&str]) -> String {
    segments.join(".")
}

/// Number of segments in a dot-path.
pub fn depth(name: &str) -> usize {
    name.split(DOT).count()
}

/// All dot-path prefixes of `name`, shortest first, including `name` itself.
///
/// # Examples
///
/// ```
/// use dotfold_core::dotpath::prefixes;
///
/// assert_eq!(prefixes("a.b.c"), vec!["a", "a.b", "a.b.c"]);
/// assert_eq!(prefixes("a"), vec!["a"]);
/// ```
pub fn prefixes(name: &str) -> Vec<String> {
    let parts = segments(name);
    (1..=parts.len()).map(|n| join(&parts[..n])).collect()
}

/// Parent dot-path: `"a.b.c"` -> `"a.b"`, `"a"` -> `None`.
pub fn parent(name: &str) -> Option<String> {
    let parts = segments(name);
    if parts.len() <= 1 {
        return None;
    }
    Some(join(&parts[..parts.len() - 1]))
}

/// Derive a human title from a raw path segment that has no explicit title.
///
/// Entirely lower-case segments get hyphens replaced with spaces and each
/// word capitalized; segments carrying any custom capitalization are
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use dotfold_core::derive_title;
///
/// assert_eq!(derive_title("awesome-apples"), "Awesome Apples");
/// assert_eq!(derive_title("Custom-Capitalization"), "Custom-Capitalization");
/// assert_eq!(derive_title("tla"), "Tla");
/// ```
pub fn derive_title(segment: &str) -> String {
    if segment != segment.to_lowercase() {
        // preserve custom capitalization
        return segment.to_string();
    }
    segment
        .split('-')
        .map(capitalize_word)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Strip matched quote pairs from both ends, recursively.
///
/// Titles and descriptions in source metadata are sometimes wrapped in
/// straight or curly quotes that must not leak into page names.
///
/// # Examples
///
/// ```
/// use dotfold_core::strip_quotes;
///
/// assert_eq!(strip_quotes("\"'Quoted'\""), "Quoted");
/// assert_eq!(strip_quotes("“Fancy”"), "Fancy");
/// assert_eq!(strip_quotes("plain"), "plain");
/// ```
pub fn strip_quotes(text: &str) -> &str {
    const PAIRS: [(&str, &str); 3] = [("\"", "\""), ("'", "'"), ("“", "”")];
    let mut current = text;
    loop {
        let stripped = PAIRS.iter().find_map(|(open, close)| {
            if current.len() >= open.len() + close.len()
                && current.starts_with(open)
                && current.ends_with(close)
            {
                Some(&current[open.len()..current.len() - close.len()])
            } else {
                None
            }
        });
        match stripped {
            Some(inner) => current = inner,
            None => return current,
        }
    }
}
