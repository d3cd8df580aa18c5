use serde::{Deserialize, Serialize};

/// A node in the generic document syntax tree.
///
/// Named nodes carry a `kind` tag and an ordered child list; anonymous
/// leaves carry only literal text. The tree is produced by the parser and
/// edited in place by the rewriter passes; rendering concatenates leaf
/// text depth-first, so a freshly parsed tree renders back to its input
/// byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseNode {
    pub kind: Option<String>,
    pub text: Option<String>,
    #[serde(default)]
    pub children: Vec<ParseNode>,
}

impl ParseNode {
    /// Anonymous text leaf.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            kind: None,
            text: Some(text.into()),
            children: Vec::new(),
        }
    }

    /// Named node with ordered children.
    pub fn named(kind: &str, children: Vec<ParseNode>) -> Self {
        Self {
            kind: Some(kind.to_string()),
            text: None,
            children,
        }
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind.as_deref() == Some(kind)
    }

    /// Literal text carried by this node's single anonymous child, if the
    /// node has exactly that shape (the contract for name-bearing nodes
    /// like `WikiLinkPage` and `UserMention`).
    pub fn leaf_text(&self) -> Option<&str> {
        match self.children.as_slice() {
            [only] => only.text.as_deref(),
            _ => None,
        }
    }

    /// Replace the literal text of the single anonymous child. No-op on
    /// any other shape.
    pub fn set_leaf_text(&mut self, text: impl Into<String>) {
        if let [only] = self.children.as_mut_slice() {
            if only.text.is_some() {
                only.text = Some(text.into());
            }
        }
    }
}

/// Render a tree back to source text by concatenating all leaf text.
pub fn render_to_text(node: &ParseNode) -> String {
    let mut out = String::new();
    render_into(node, &mut out);
    out
}

fn render_into(node: &ParseNode, out: &mut String) {
    if let Some(text) = &node.text {
        out.push_str(text);
    }
    for child in &node.children {
        render_into(child, out);
    }
}

/// Walk the tree and replace every node matching `predicate` with the node
/// produced by `transform`. A replaced subtree is not descended into; a
/// `None` from `transform` leaves the node in place and continues the walk.
pub fn replace_matching<P, F>(node: &mut ParseNode, predicate: &P, transform: &F)
where
    P: Fn(&ParseNode) -> bool,
    F: Fn(&ParseNode) -> Option<ParseNode>,
{
    for child in node.children.iter_mut() {
        if predicate(child) {
            if let Some(replacement) = transform(child) {
                *child = replacement;
                continue;
            }
        }
        replace_matching(child, predicate, transform);
    }
}

/// Collect references to every node of the given kind, document order.
pub fn collect_nodes_of_type<'a>(node: &'a ParseNode, kind: &str) -> Vec<&'a ParseNode> {
    let mut out = Vec::new();
    collect_into(node, kind, &mut out);
    out
}

fn collect_into<'a>(node: &'a ParseNode, kind: &str, out: &mut Vec<&'a ParseNode>) {
    if node.is_kind(kind) {
        out.push(node);
    }
    for child in &node.children {
        collect_into(child, kind, out);
    }
}

/// First node of the given kind, document order.
pub fn find_node_of_type<'a>(node: &'a ParseNode, kind: &str) -> Option<&'a ParseNode> {
    if node.is_kind(kind) {
        return Some(node);
    }
    node.children
        .iter()
        .find_map(|child| find_node_of_type(child, kind))
}
