//! Helpers shared by the rule predicates.
//!
//! String checks are case-sensitive; rules lowercase explicitly with
//! [`lower`] where a pattern should ignore case.

use crate::etree::NodeRef;

// === DOM Traversal ===

/// Ancestors of `node` carrying tag `ancestor_tag`, nearest first.
///
/// # Example
///
/// ```rust
/// use article_extractor::dom;
/// use article_extractor::selector::utils;
///
/// let tree = dom::parse(r#"<div><article><div><p id="t">x</p></div></article></div>"#);
/// let p = tree.find(tree.root(), |n| n.element_id() == "t").map(|id| tree.get(id));
/// let divs = p.map(|p| utils::get_node_ancestors(p, "div").len());
/// assert_eq!(divs, Some(2));
/// ```
#[must_use]
pub fn get_node_ancestors<'a>(node: NodeRef<'a>, ancestor_tag: &str) -> Vec<NodeRef<'a>> {
    node.ancestors()
        .filter(|ancestor| ancestor.tag() == ancestor_tag)
        .collect()
}

/// Check whether any ancestor of `node` has tag `ancestor_tag`.
#[must_use]
pub fn has_ancestor(node: NodeRef<'_>, ancestor_tag: &str) -> bool {
    node.ancestors().any(|ancestor| ancestor.tag() == ancestor_tag)
}

// === String Utilities ===

/// Case-sensitive substring check.
#[inline]
#[must_use]
pub fn contains(haystack: &str, needle: &str) -> bool {
    haystack.contains(needle)
}

/// Case-sensitive prefix check.
#[inline]
#[must_use]
pub fn starts_with(s: &str, prefix: &str) -> bool {
    s.starts_with(prefix)
}

/// Lowercase copy.
#[inline]
#[must_use]
pub fn lower(s: &str) -> String {
    s.to_lowercase()
}

// === Element Attribute Helpers ===

/// `id` followed by `class`, for rules that test both at once.
#[inline]
#[must_use]
pub fn id_class(node: NodeRef<'_>) -> String {
    format!("{}{}", node.element_id(), node.class())
}

/// Check whether the node's tag is one of `tags`.
#[inline]
#[must_use]
pub fn is_one_of_tags(node: NodeRef<'_>, tags: &[&str]) -> bool {
    tags.contains(&node.tag())
}
