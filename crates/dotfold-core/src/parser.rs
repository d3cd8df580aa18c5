//! Markdown to syntax tree, losslessly.
//!
//! pulldown-cmark drives span discovery (wiki links, code regions, YAML
//! front matter); the tree itself is assembled from verbatim source
//! slices keyed by event offsets, so rendering an unmodified tree always
//! reproduces the input exactly.

use pulldown_cmark::{Event, LinkType, MetadataBlockKind, Options, Parser, Tag, TagEnd};
use serde_json::Value;

use crate::tree::ParseNode;

/// Sigil introducing a shorthand mention token.
pub const MENTION_SIGIL: char = '@';

pub struct ParsedDocument {
    /// Front matter parsed as loosely-typed YAML, when present.
    pub frontmatter: Option<Value>,
    /// Byte offset where the body starts (end of the front matter block).
    pub content_offset: usize,
    /// `Document` node covering the whole input.
    pub tree: ParseNode,
}

impl ParsedDocument {
    /// Body text: everything after the front matter block.
    pub fn body<'a>(&self, source: &'a str) -> &'a str {
        &source[self.content_offset..]
    }
}

/// Parse a full page into a lossless tree plus front matter.
pub fn parse_document(text: &str) -> ParsedDocument {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_WIKILINKS);
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);

    let parser = Parser::new_ext(text, options);

    let mut frontmatter = None;
    let mut frontmatter_content = String::new();
    let mut in_frontmatter = false;
    let mut content_offset = 0;

    let mut link_spans: Vec<(usize, usize)> = Vec::new();
    let mut protected_spans: Vec<(usize, usize)> = Vec::new();

    for (event, range) in parser.into_offset_iter() {
        match event {
            Event::Start(Tag::MetadataBlock(MetadataBlockKind::YamlStyle)) => {
                in_frontmatter = true;
            }
            Event::End(TagEnd::MetadataBlock(MetadataBlockKind::YamlStyle)) => {
                in_frontmatter = false;
                if let Ok(value) = serde_yaml::from_str::<Value>(&frontmatter_content) {
                    frontmatter = Some(value);
                }
                content_offset = range.end;
            }

            Event::Start(Tag::Link { link_type, .. })
            | Event::Start(Tag::Image { link_type, .. }) => {
                if matches!(link_type, LinkType::WikiLink { .. }) {
                    // pulldown_cmark might report the range ending before
                    // the last ']'
                    let mut end = range.end;
                    while end < text.len() && text.as_bytes()[end] == b']' {
                        end += 1;
                    }
                    link_spans.push((range.start, end));
                }
            }

            Event::Start(Tag::CodeBlock(_)) => protected_spans.push((range.start, range.end)),
            Event::Code(_) | Event::Html(_) | Event::InlineHtml(_) => {
                protected_spans.push((range.start, range.end));
            }

            Event::Text(cow_str) => {
                if in_frontmatter {
                    frontmatter_content.push_str(cow_str.as_ref());
                }
            }
            _ => {}
        }
    }

    link_spans.sort_unstable();

    let mut children = Vec::new();
    if content_offset > 0 {
        children.push(ParseNode::named(
            "FrontMatter",
            vec![ParseNode::text(&text[..content_offset])],
        ));
    }

    let mut cursor = content_offset;
    for (start, end) in link_spans {
        if start < cursor {
            continue;
        }
        if start > cursor {
            scan_mentions(&text[cursor..start], cursor, &protected_spans, &mut children);
        }
        children.push(wiki_link_node(&text[start..end]));
        cursor = end;
    }
    if cursor < text.len() {
        scan_mentions(&text[cursor..], cursor, &protected_spans, &mut children);
    }

    ParsedDocument {
        frontmatter,
        content_offset,
        tree: ParseNode::named("Document", children),
    }
}

/// Parse a short literal fragment (e.g. `[[user.name]]`) into a tree.
pub fn parse_fragment(text: &str) -> ParseNode {
    parse_document(text).tree
}

/// Build a `WikiLink` node from its verbatim source slice.
///
/// Aliased form has exactly 5 children: open mark, page name, pipe mark,
/// alias name, close mark. Plain form has 3. The open mark keeps any
/// leading `!` of embedded links; slices that do not look like a wiki
/// link at all degrade to a plain text leaf.
fn wiki_link_node(slice: &str) -> ParseNode {
    let open_len = match slice.find("[[") {
        Some(i) => i + 2,
        None => return ParseNode::text(slice),
    };
    let inner_end = match slice[open_len..].find("]]") {
        Some(i) => open_len + i,
        None => return ParseNode::text(slice),
    };
    let inner = &slice[open_len..inner_end];

    let mut children = vec![ParseNode::named(
        "WikiLinkMark",
        vec![ParseNode::text(&slice[..open_len])],
    )];
    match inner.find('|') {
        Some(pipe) => {
            children.push(ParseNode::named(
                "WikiLinkPage",
                vec![ParseNode::text(&inner[..pipe])],
            ));
            children.push(ParseNode::named(
                "WikiLinkMark",
                vec![ParseNode::text("|")],
            ));
            children.push(ParseNode::named(
                "WikiLinkAlias",
                vec![ParseNode::text(&inner[pipe + 1..])],
            ));
        }
        None => {
            children.push(ParseNode::named(
                "WikiLinkPage",
                vec![ParseNode::text(inner)],
            ));
        }
    }
    children.push(ParseNode::named(
        "WikiLinkMark",
        vec![ParseNode::text(&slice[inner_end..])],
    ));
    ParseNode::named("WikiLink", children)
}

/// Characters that terminate a mention handle. Sentence punctuation and
/// quotes next to a mention must never be absorbed into it; dots, hyphens
/// and non-ASCII letters stay part of the handle verbatim.
fn is_handle_char(c: char) -> bool {
    if c.is_whitespace() {
        return false;
    }
    !matches!(
        c,
        ',' | ';'
            | ':'
            | '!'
            | '?'
            | '"'
            | '\''
            | '('
            | ')'
            | '['
            | ']'
            | '{'
            | '}'
            | '<'
            | '>'
            | '|'
            | '`'
            | '\\'
            | '@'
            | '#'
            | '“'
            | '”'
            | '‘'
            | '’'
            | '«'
            | '»'
    )
}

fn is_protected(pos: usize, spans: &[(usize, usize)]) -> bool {
    spans.iter().any(|&(start, end)| pos >= start && pos < end)
}

/// Split a plain text gap into text leaves and `UserMention` nodes.
///
/// A mention starts at a sigil not preceded by an alphanumeric character
/// (so `user@example.com` is never one) and spans the maximal run of
/// handle characters. `base` is the gap's offset in the full source, used
/// to skip sigils inside code regions.
fn scan_mentions(
    gap: &str,
    base: usize,
    protected_spans: &[(usize, usize)],
    out: &mut Vec<ParseNode>,
) {
    let mut plain_start = 0;
    let mut prev: Option<char> = None;
    let mut i = 0;
    while let Some(c) = gap[i..].chars().next() {
        if c == MENTION_SIGIL
            && prev.map_or(true, |p| !p.is_alphanumeric())
            && !is_protected(base + i, protected_spans)
        {
            let rest = &gap[i + c.len_utf8()..];
            let handle_len = rest
                .find(|hc: char| !is_handle_char(hc))
                .unwrap_or(rest.len());
            if handle_len > 0 {
                if plain_start < i {
                    out.push(ParseNode::text(&gap[plain_start..i]));
                }
                let end = i + c.len_utf8() + handle_len;
                out.push(ParseNode::named(
                    "UserMention",
                    vec![ParseNode::text(&gap[i..end])],
                ));
                plain_start = end;
                prev = gap[..end].chars().next_back();
                i = end;
                continue;
            }
        }
        prev = Some(c);
        i += c.len_utf8();
    }
    if plain_start < gap.len() {
        out.push(ParseNode::text(&gap[plain_start..]));
    }
}
