//! Rule engine
//!
//! A [`Rule`] is a pure predicate over one node. Rules are grouped into
//! ordered [`RuleSet`]s; the order is the precedence. [`RuleSet::query`]
//! tries each rule in turn over the whole subtree and returns the first
//! match of the first rule that matches anything, so an early rule beats a
//! later rule even when the later rule would match an earlier node.

use crate::etree::{NodeId, NodeRef, Tree};

pub mod comments;
pub mod content;
pub mod discard;
pub mod meta;
pub mod precision;

pub mod utils;

/// Named node predicate.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Identifier used in logs and tests.
    pub name: &'static str,
    /// The predicate itself.
    pub matches: fn(NodeRef<'_>) -> bool,
}

impl Rule {
    /// Evaluate the rule on a node.
    #[inline]
    #[must_use]
    pub fn test(&self, node: NodeRef<'_>) -> bool {
        (self.matches)(node)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Rule").field(&self.name).finish()
    }
}

/// Priority-ordered list of rules.
#[derive(Debug, Clone, Copy)]
pub struct RuleSet {
    /// Name of the set, e.g. `"content"`.
    pub name: &'static str,
    /// Rules, most specific first.
    pub rules: &'static [Rule],
}

impl RuleSet {
    /// Number of rules in the set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check whether the set holds no rule.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First node matched by the highest-priority rule that matches anything.
    #[must_use]
    pub fn query(&self, tree: &Tree, root: NodeId) -> Option<NodeId> {
        self.rules.iter().find_map(|rule| query(tree, root, rule))
    }

    /// Every descendant matched by any rule of the set, in document order.
    #[must_use]
    pub fn query_all(&self, tree: &Tree, root: NodeId) -> Vec<NodeId> {
        tree.descendants(root)
            .into_iter()
            .filter(|&id| self.rules.iter().any(|rule| rule.test(tree.get(id))))
            .collect()
    }

    /// Check whether any rule matches `node` itself.
    #[must_use]
    pub fn matches(&self, node: NodeRef<'_>) -> bool {
        self.rules.iter().any(|rule| rule.test(node))
    }
}

/// First descendant of `root` (document order, root excluded) matched by `rule`.
///
/// # Example
///
/// ```rust
/// use article_extractor::dom;
/// use article_extractor::selector::{self, Rule};
///
/// let tree = dom::parse(r#"<div><p class="a">one</p><p class="a">two</p></div>"#);
/// let rule = Rule { name: "a", matches: |n| n.class() == "a" };
///
/// let found = selector::query(&tree, tree.root(), &rule);
/// assert_eq!(found.map(|id| tree.text_content(id)).as_deref(), Some("one"));
/// ```
#[must_use]
pub fn query(tree: &Tree, root: NodeId, rule: &Rule) -> Option<NodeId> {
    tree.find(root, |node| rule.test(node))
}

/// Every descendant of `root` matched by `rule`, in document order.
#[must_use]
pub fn query_all(tree: &Tree, root: NodeId, rule: &Rule) -> Vec<NodeId> {
    tree.find_all(root, |node| rule.test(node))
}
