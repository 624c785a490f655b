//! Element Tree (etree) arena
//!
//! Nodes live in a single `Vec` owned by [`Tree`] and refer to each other by
//! [`NodeId`] index. Parent links are plain indices, so rewriting the tree is
//! index reassignment and never creates ownership cycles.
//!
//! ## Text vs Tail
//!
//! Elements follow the lxml model:
//! - **Text**: text content BEFORE the first child element
//! - **Tail**: text content AFTER the element's closing tag, up to the next sibling
//!
//! ```html
//! <div>
//!   TEXT HERE          <!-- div's "text" -->
//!   <span>inner</span>
//!   TAIL HERE          <!-- span's "tail" -->
//! </div>
//! ```
//!
//! The tail belongs to the position in the parent, not to the element itself:
//! copies never carry it, a detached element cannot hold one, and removing an
//! element drops it unless asked to merge it into the surrounding text.

use std::fmt;

/// Elements that never have content.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta",
    "param", "source", "track", "wbr",
];

/// Check whether a tag is a void element.
#[inline]
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

/// Stable index of a node inside a [`Tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in the arena.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Node {
    tag: String,
    attrs: Vec<(String, String)>,
    text: String,
    tail: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Arena-backed element tree with a single root.
///
/// Elements created with [`Tree::create_element`] or [`Tree::deep_clone`] live
/// in the same arena but stay detached until appended somewhere. Detached
/// nodes are simply unreachable from the root; they are never freed during a
/// call, which keeps every `NodeId` valid for the whole extraction.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Create a tree holding only a root element.
    #[must_use]
    pub fn new(root_tag: &str) -> Self {
        let root = Node {
            tag: root_tag.to_string(),
            ..Node::default()
        };
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// Root element of the tree.
    #[inline]
    #[must_use]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes stored in the arena, detached ones included.
    #[must_use]
    pub fn arena_len(&self) -> usize {
        self.nodes.len()
    }

    /// Borrow a node for read-only inspection.
    #[inline]
    #[must_use]
    pub fn get(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { tree: self, id }
    }

    #[inline]
    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    // === Construction ===

    /// Create a new detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            tag: tag.to_string(),
            ..Node::default()
        });
        id
    }

    /// Create a new element appended as last child of `parent`.
    pub fn sub_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let id = self.create_element(tag);
        self.append(parent, id);
        id
    }

    /// Copy a node and its whole subtree. The copy is detached and has no tail.
    pub fn deep_clone(&mut self, id: NodeId) -> NodeId {
        let mut pairs = Vec::new();
        self.deep_clone_mapped(id, &mut pairs)
    }

    /// Same as [`Tree::deep_clone`], recording every `(original, copy)` pair.
    pub fn deep_clone_mapped(&mut self, id: NodeId, pairs: &mut Vec<(NodeId, NodeId)>) -> NodeId {
        let copy = self.copy_node(id, pairs);
        self.node_mut(copy).tail.clear();
        copy
    }

    fn copy_node(&mut self, id: NodeId, pairs: &mut Vec<(NodeId, NodeId)>) -> NodeId {
        let root = self.push_copy(id, None, pairs);
        let mut pending = vec![(id, root)];
        while let Some((source, copy)) = pending.pop() {
            for child in self.node(source).children.clone() {
                let child_copy = self.push_copy(child, Some(copy), pairs);
                pending.push((child, child_copy));
            }
        }
        root
    }

    fn push_copy(&mut self, id: NodeId, parent: Option<NodeId>, pairs: &mut Vec<(NodeId, NodeId)>) -> NodeId {
        let source = self.node(id);
        let copy = Node {
            tag: source.tag.clone(),
            attrs: source.attrs.clone(),
            text: source.text.clone(),
            tail: source.tail.clone(),
            parent,
            children: Vec::new(),
        };
        let copy_id = NodeId(self.nodes.len());
        self.nodes.push(copy);
        if let Some(parent) = parent {
            self.node_mut(parent).children.push(copy_id);
        }
        pairs.push((id, copy_id));
        copy_id
    }

    /// Copy only the element itself: tag and attributes, no text, no children.
    pub fn shallow_clone(&mut self, id: NodeId) -> NodeId {
        let tag = self.node(id).tag.clone();
        let attrs = self.node(id).attrs.clone();
        let copy = self.create_element(&tag);
        self.node_mut(copy).attrs = attrs;
        copy
    }

    /// Export a subtree as a standalone, compact tree.
    #[must_use]
    pub fn subtree(&self, id: NodeId) -> Tree {
        let mut out = Tree::new(&self.node(id).tag);
        let root = out.root;
        out.node_mut(root).attrs = self.node(id).attrs.clone();
        out.node_mut(root).text = self.node(id).text.clone();
        self.export_children(id, &mut out, root);
        out
    }

    /// Copy a subtree of `other` into this arena. The copy is detached.
    pub fn import(&mut self, other: &Tree, id: NodeId) -> NodeId {
        let source = other.node(id);
        let copy = self.create_element(&source.tag);
        self.node_mut(copy).attrs = source.attrs.clone();
        self.node_mut(copy).text = source.text.clone();
        other.export_children(id, self, copy);
        copy
    }

    fn export_children(&self, from: NodeId, out: &mut Tree, to: NodeId) {
        let mut pending = vec![(from, to)];
        while let Some((source, target)) = pending.pop() {
            for &child in &self.node(source).children {
                let node = self.node(child);
                let copy = out.create_element(&node.tag);
                {
                    let copied = out.node_mut(copy);
                    copied.attrs = node.attrs.clone();
                    copied.text = node.text.clone();
                    copied.tail = node.tail.clone();
                    copied.parent = Some(target);
                }
                out.node_mut(target).children.push(copy);
                pending.push((child, copy));
            }
        }
    }

    // === Node data ===

    /// Tag name.
    #[inline]
    #[must_use]
    pub fn tag(&self, id: NodeId) -> &str {
        &self.node(id).tag
    }

    /// Rename an element.
    pub fn set_tag(&mut self, id: NodeId, tag: &str) {
        tag.clone_into(&mut self.node_mut(id).tag);
    }

    /// Text before the first child element.
    #[inline]
    #[must_use]
    pub fn text(&self, id: NodeId) -> &str {
        &self.node(id).text
    }

    /// Replace the element text. Void elements cannot hold text.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) {
        if is_void_element(&self.node(id).tag) {
            return;
        }
        self.node_mut(id).text = text.into();
    }

    /// Text after the element, before its next sibling.
    #[inline]
    #[must_use]
    pub fn tail(&self, id: NodeId) -> &str {
        &self.node(id).tail
    }

    /// Replace the element tail. Ignored for detached elements.
    pub fn set_tail(&mut self, id: NodeId, tail: impl Into<String>) {
        let Some(parent) = self.node(id).parent else {
            return;
        };
        if is_void_element(&self.node(parent).tag) {
            return;
        }
        self.node_mut(id).tail = tail.into();
    }

    /// Attribute value, if present.
    #[must_use]
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.node(id)
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Check whether an attribute exists.
    #[must_use]
    pub fn has_attr(&self, id: NodeId, name: &str) -> bool {
        self.node(id).attrs.iter().any(|(key, _)| key == name)
    }

    /// Set an attribute, keeping its position if it already exists.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        let attrs = &mut self.node_mut(id).attrs;
        if let Some(slot) = attrs.iter_mut().find(|(key, _)| key == name) {
            value.clone_into(&mut slot.1);
        } else {
            attrs.push((name.to_string(), value.to_string()));
        }
    }

    /// Remove an attribute.
    pub fn remove_attr(&mut self, id: NodeId, name: &str) {
        self.node_mut(id).attrs.retain(|(key, _)| key != name);
    }

    /// Drop every attribute.
    pub fn clear_attrs(&mut self, id: NodeId) {
        self.node_mut(id).attrs.clear();
    }

    /// All attributes in document order.
    #[must_use]
    pub fn attrs(&self, id: NodeId) -> &[(String, String)] {
        &self.node(id).attrs
    }

    /// Keep only the attributes accepted by `keep`.
    pub fn retain_attrs(&mut self, id: NodeId, mut keep: impl FnMut(&str, &str) -> bool) {
        self.node_mut(id).attrs.retain(|(key, value)| keep(key, value));
    }

    // === Navigation ===

    /// Parent element, `None` for the root and detached nodes.
    #[inline]
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// Child elements in document order.
    #[inline]
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    fn position(&self, parent: NodeId, id: NodeId) -> Option<usize> {
        self.node(parent).children.iter().position(|&child| child == id)
    }

    /// Previous sibling element.
    #[must_use]
    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.position(parent, id)?;
        index.checked_sub(1).map(|i| self.node(parent).children[i])
    }

    /// Next sibling element.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let index = self.position(parent, id)?;
        self.node(parent).children.get(index + 1).copied()
    }

    /// Ancestors from nearest to furthest.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// Check whether `ancestor` contains `id`.
    #[must_use]
    pub fn is_descendant_of(&self, id: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(id).any(|a| a == ancestor)
    }

    /// The element and all of its descendants in document order.
    #[must_use]
    pub fn iter(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            stack.extend(self.node(current).children.iter().rev());
        }
        out
    }

    /// Descendants only, in document order.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut all = self.iter(id);
        all.remove(0);
        all
    }

    /// The element and its descendants whose tag is one of `tags`.
    #[must_use]
    pub fn iter_tags(&self, id: NodeId, tags: &[&str]) -> Vec<NodeId> {
        self.iter(id)
            .into_iter()
            .filter(|&n| tags.contains(&self.tag(n)))
            .collect()
    }

    /// Descendants whose tag is one of `tags`.
    #[must_use]
    pub fn descendants_tags(&self, id: NodeId, tags: &[&str]) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| tags.contains(&self.tag(n)))
            .collect()
    }

    /// First descendant (document order) accepted by `pred`.
    #[must_use]
    pub fn find(&self, id: NodeId, pred: impl Fn(NodeRef<'_>) -> bool) -> Option<NodeId> {
        self.descendants(id).into_iter().find(|&n| pred(self.get(n)))
    }

    /// All descendants accepted by `pred`.
    #[must_use]
    pub fn find_all(&self, id: NodeId, pred: impl Fn(NodeRef<'_>) -> bool) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&n| pred(self.get(n)))
            .collect()
    }

    // === Mutation ===

    fn detach(&mut self, id: NodeId) {
        if let Some(parent) = self.node(id).parent {
            self.node_mut(parent).children.retain(|&child| child != id);
            self.node_mut(id).parent = None;
        }
    }

    /// Append `child` as last child of `parent`, moving it with its tail.
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        if parent == child || self.is_descendant_of(parent, child) {
            return;
        }
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        self.node_mut(parent).children.push(child);
    }

    /// Append several elements in order.
    pub fn extend(&mut self, parent: NodeId, children: &[NodeId]) {
        for &child in children {
            self.append(parent, child);
        }
    }

    /// Insert `child` into `parent` at `index`.
    pub fn insert(&mut self, parent: NodeId, index: usize, child: NodeId) {
        if parent == child || self.is_descendant_of(parent, child) {
            return;
        }
        self.detach(child);
        self.node_mut(child).parent = Some(parent);
        let children = &mut self.node_mut(parent).children;
        let index = index.min(children.len());
        children.insert(index, child);
    }

    fn merge_text_at(&mut self, parent: NodeId, index: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        if index > 0 {
            let previous = self.node(parent).children[index - 1];
            self.node_mut(previous).tail.push_str(text);
        } else {
            self.node_mut(parent).text.push_str(text);
        }
    }

    /// Remove an element with its subtree. Its tail is dropped unless
    /// `keep_tail`, in which case it joins the preceding text. Detached
    /// elements are left untouched.
    pub fn remove(&mut self, id: NodeId, keep_tail: bool) {
        let Some(parent) = self.node(id).parent else {
            return;
        };
        let Some(index) = self.position(parent, id) else {
            return;
        };
        let tail = std::mem::take(&mut self.node_mut(id).tail);
        self.node_mut(parent).children.remove(index);
        self.node_mut(id).parent = None;
        if keep_tail {
            self.merge_text_at(parent, index, &tail);
        }
    }

    /// Unwrap an element: its children take its place and its text and tail
    /// flow into the surrounding text.
    pub fn strip(&mut self, id: NodeId) {
        let Some(parent) = self.node(id).parent else {
            return;
        };
        let Some(index) = self.position(parent, id) else {
            return;
        };

        let text = std::mem::take(&mut self.node_mut(id).text);
        let tail = std::mem::take(&mut self.node_mut(id).tail);
        let children = std::mem::take(&mut self.node_mut(id).children);

        self.merge_text_at(parent, index, &text);

        for &child in &children {
            self.node_mut(child).parent = Some(parent);
        }
        self.node_mut(parent)
            .children
            .splice(index..=index, children.iter().copied());
        self.node_mut(id).parent = None;

        match children.last() {
            Some(&last) => self.node_mut(last).tail.push_str(&tail),
            None => self.merge_text_at(parent, index, &tail),
        }
    }

    /// Unwrap every descendant of `root` whose tag is in `tags`.
    pub fn strip_tags(&mut self, root: NodeId, tags: &[&str]) {
        for &tag in tags {
            let matches = self.descendants_tags(root, &[tag]);
            for &node in matches.iter().rev() {
                self.strip(node);
            }
        }
    }

    /// Remove every descendant of `root` whose tag is in `tags`.
    pub fn strip_elements(&mut self, root: NodeId, keep_tail: bool, tags: &[&str]) {
        for &tag in tags {
            let matches = self.descendants_tags(root, &[tag]);
            for &node in matches.iter().rev() {
                self.remove(node, keep_tail);
            }
        }
    }

    // === Text ===

    /// Raw concatenation of all text inside the element, without separators.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut pending = vec![TextStep::Enter(id, 0)];
        while let Some(step) = pending.pop() {
            match step {
                TextStep::Enter(current, _) => {
                    let node = self.node(current);
                    out.push_str(&node.text);
                    for &child in node.children.iter().rev() {
                        pending.push(TextStep::Tail(child, 0));
                        pending.push(TextStep::Enter(child, 0));
                    }
                }
                TextStep::Tail(child, _) => out.push_str(&self.node(child).tail),
            }
        }
        out
    }

    /// Text of the element and its descendants, with `separator` inserted
    /// whenever nesting depth changes between text segments and at every
    /// void element. Nothing is inserted before the first segment, and the
    /// element's own tail is not included.
    #[must_use]
    pub fn iter_text(&self, id: NodeId, separator: &str) -> String {
        let mut walker = TextWalker {
            separator,
            buffer: String::new(),
            last_level: 0,
        };
        let mut pending = vec![TextStep::Enter(id, 0)];
        while let Some(step) = pending.pop() {
            match step {
                TextStep::Enter(current, level) => {
                    let node = self.node(current);
                    if is_void_element(&node.tag) {
                        walker.separate();
                        walker.last_level = level + 1;
                    } else {
                        walker.last_level = level;
                    }
                    walker.segment(&node.text, level + 1);
                    for &child in node.children.iter().rev() {
                        pending.push(TextStep::Tail(child, level + 1));
                        pending.push(TextStep::Enter(child, level + 1));
                    }
                }
                TextStep::Tail(child, level) => walker.segment(&self.node(child).tail, level),
            }
        }
        walker.buffer.trim().to_string()
    }
}

/// Pending work of the text walks: an element to open, or the tail that
/// follows it. Both carry the nesting level.
enum TextStep {
    Enter(NodeId, usize),
    Tail(NodeId, usize),
}

struct TextWalker<'s> {
    separator: &'s str,
    buffer: String,
    last_level: usize,
}

impl TextWalker<'_> {
    fn separate(&mut self) {
        if !self.buffer.is_empty() {
            self.buffer.push_str(self.separator);
        }
    }

    fn segment(&mut self, text: &str, level: usize) {
        if text.is_empty() {
            return;
        }
        if level != self.last_level {
            self.separate();
        }
        self.buffer.push_str(text);
        self.last_level = level;
    }
}

/// Read-only view of one node, used by selector rules.
#[derive(Clone, Copy)]
pub struct NodeRef<'a> {
    tree: &'a Tree,
    id: NodeId,
}

impl<'a> NodeRef<'a> {
    /// Node identifier.
    #[must_use]
    pub fn id(self) -> NodeId {
        self.id
    }

    /// Owning tree.
    #[must_use]
    pub fn tree(self) -> &'a Tree {
        self.tree
    }

    /// Tag name.
    #[must_use]
    pub fn tag(self) -> &'a str {
        self.tree.tag(self.id)
    }

    /// Attribute value, empty when missing.
    #[must_use]
    pub fn attr(self, name: &str) -> &'a str {
        self.tree.attr(self.id, name).unwrap_or_default()
    }

    /// Check whether an attribute exists.
    #[must_use]
    pub fn has_attr(self, name: &str) -> bool {
        self.tree.has_attr(self.id, name)
    }

    /// Value of the `id` attribute.
    #[must_use]
    pub fn element_id(self) -> &'a str {
        self.attr("id")
    }

    /// Value of the `class` attribute.
    #[must_use]
    pub fn class(self) -> &'a str {
        self.attr("class")
    }

    /// Parent node.
    #[must_use]
    pub fn parent(self) -> Option<NodeRef<'a>> {
        self.tree.parent(self.id).map(|id| self.tree.get(id))
    }

    /// Ancestors from nearest to furthest.
    pub fn ancestors(self) -> impl Iterator<Item = NodeRef<'a>> {
        let tree = self.tree;
        tree.ancestors(self.id).map(move |id| tree.get(id))
    }

    /// Number of child elements.
    #[must_use]
    pub fn child_count(self) -> usize {
        self.tree.children(self.id).len()
    }
}

impl fmt::Debug for NodeRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} {}>", self.tag(), self.id)
    }
}
