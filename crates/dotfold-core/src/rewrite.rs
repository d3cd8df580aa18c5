//! Link rewriting: three independent, composable tree passes.
//!
//! Each pass is a structural replace-matching walk and is idempotent once
//! its trigger condition is satisfied. Malformed node shapes are treated
//! as "no match" and pass through unchanged; trees come from fallible
//! external parsing and partial corpus data is expected.

use crate::hierarchy::HierarchyMapping;
use crate::parser::{parse_fragment, MENTION_SIGIL};
use crate::tree::{replace_matching, ParseNode};

/// Namespace prefix for normalized mention targets.
pub const MENTION_NAMESPACE: &str = "user.";

/// Replace every `UserMention` leaf with a wiki link targeting
/// `user.<handle>`. The handle is taken verbatim (sigil stripped): embedded
/// hierarchical separators and non-ASCII letters survive untouched.
pub fn normalize_mentions(tree: &mut ParseNode) {
    replace_matching(
        tree,
        &|node| node.is_kind("UserMention"),
        &|node| {
            let handle = node.leaf_text()?.strip_prefix(MENTION_SIGIL)?;
            let fragment = parse_fragment(&format!("[[{}{}]]", MENTION_NAMESPACE, handle));
            fragment
                .children
                .into_iter()
                .find(|child| child.is_kind("WikiLink"))
        },
    );
}

fn is_aliased_link(node: &ParseNode) -> bool {
    node.is_kind("WikiLink")
        && node.children.len() == 5
        && node.children[1].is_kind("WikiLinkPage")
        && node.children[3].is_kind("WikiLinkAlias")
}

/// Swap the text payloads of the page and alias slots of every aliased
/// link, in place. Source links are written alias-first; the canonical
/// form is target-first. Structure, marks, and child count are unchanged,
/// so applying this twice restores the original assignment. Links without
/// the exact 5-child alias shape are left untouched.
pub fn canonicalize_alias_order(tree: &mut ParseNode) {
    replace_matching(tree, &is_aliased_link, &|node| {
        let page_text = node.children[1].leaf_text()?.to_string();
        let alias_text = node.children[3].leaf_text()?.to_string();
        let mut swapped = node.clone();
        swapped.children[1].set_leaf_text(alias_text);
        swapped.children[3].set_leaf_text(page_text);
        Some(swapped)
    });
}

/// Rewrite every link target through the resolved mapping. Targets missing
/// from the mapping are left byte-for-byte unchanged; a dangling link is
/// not an error.
pub fn rewrite_targets(tree: &mut ParseNode, mapping: &HierarchyMapping) {
    replace_matching(
        tree,
        &|node| node.is_kind("WikiLinkPage"),
        &|node| {
            let new_name = mapping.get(node.leaf_text()?)?;
            let mut renamed = node.clone();
            renamed.set_leaf_text(new_name.clone());
            Some(renamed)
        },
    );
}

/// All three passes in the only correct order: mentions first, then alias
/// canonicalization, then target substitution (which must see the final
/// target slot, not the pre-swap one).
pub fn rewrite_links(tree: &mut ParseNode, mapping: &HierarchyMapping) {
    normalize_mentions(tree);
    canonicalize_alias_order(tree);
    rewrite_targets(tree, mapping);
}
