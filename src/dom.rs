//! Bridge between the `dom_query` HTML parser and the [`etree`](crate::etree) arena.
//!
//! Parsing, CSS-based pruning and readability all run on `dom_query`
//! documents; extraction runs on the arena. This module converts between the
//! two and renders arena subtrees back to HTML.

use dom_query::{Document, NodeRef as DomNode};

use crate::etree::{is_void_element, NodeId, Tree};

/// Parse an HTML string into an arena tree rooted at `<html>`.
#[must_use]
pub fn parse(html: &str) -> Tree {
    parse_pruned(html, None)
}

/// Parse an HTML string, removing every element matched by `prune_selector`
/// before conversion. An invalid selector is ignored.
#[must_use]
pub fn parse_pruned(html: &str, prune_selector: Option<&str>) -> Tree {
    let doc = Document::from(html);
    if let Some(selector) = prune_selector.filter(|s| !s.trim().is_empty()) {
        if let Some(matched) = doc.try_select(selector) {
            matched.remove();
        }
    }
    from_document(&doc)
}

/// Convert a parsed document into an arena tree.
#[must_use]
pub fn from_document(doc: &Document) -> Tree {
    let html = doc.select("html");
    match html.nodes().first() {
        Some(node) => from_node(node),
        None => Tree::new("html"),
    }
}

/// Convert one element and its subtree.
#[must_use]
pub fn from_node(node: &DomNode<'_>) -> Tree {
    let tag = node
        .node_name()
        .map_or_else(|| "html".to_string(), |name| name.to_ascii_lowercase());
    let mut tree = Tree::new(&tag);
    let root = tree.root();
    copy_attrs(node, &mut tree, root);
    copy_children(node, &mut tree, root);
    tree
}

fn copy_attrs(node: &DomNode<'_>, tree: &mut Tree, id: NodeId) {
    for attr in node.attrs() {
        tree.set_attr(id, &attr.name.local.to_ascii_lowercase(), &attr.value);
    }
}

fn copy_children<'a>(node: &DomNode<'a>, tree: &mut Tree, parent: NodeId) {
    let mut pending: Vec<(DomNode<'a>, NodeId)> = vec![(node.clone(), parent)];

    while let Some((current, parent)) = pending.pop() {
        let mut last: Option<NodeId> = None;
        for child in current.children() {
            if child.is_element() {
                let Some(name) = child.node_name() else {
                    continue;
                };
                let id = tree.sub_element(parent, &name.to_ascii_lowercase());
                copy_attrs(&child, tree, id);
                last = Some(id);
                pending.push((child, id));
            } else if child.is_text() {
                let text = child.text();
                match last {
                    Some(previous) => {
                        let tail = format!("{}{}", tree.tail(previous), &*text);
                        tree.set_tail(previous, tail);
                    }
                    None => {
                        let own = format!("{}{}", tree.text(parent), &*text);
                        tree.set_text(parent, own);
                    }
                }
            }
        }
    }
}

/// Render an element and its subtree as HTML. The element's tail is not
/// included.
#[must_use]
pub fn to_html(tree: &Tree, id: NodeId) -> String {
    let mut out = String::new();
    write_nodes(tree, vec![Render::Open(id, false)], &mut out);
    out
}

/// Render only the content of an element.
#[must_use]
pub fn inner_html(tree: &Tree, id: NodeId) -> String {
    let mut out = escape_text(tree.text(id));
    let pending = tree.children(id).iter().rev().map(|&child| Render::Open(child, true)).collect();
    write_nodes(tree, pending, &mut out);
    out
}

/// Rendering steps; the flag tells whether the node's tail follows it.
enum Render {
    Open(NodeId, bool),
    Close(NodeId, bool),
}

fn write_nodes(tree: &Tree, mut pending: Vec<Render>, out: &mut String) {
    while let Some(step) = pending.pop() {
        match step {
            Render::Open(id, with_tail) => {
                let tag = tree.tag(id);
                out.push('<');
                out.push_str(tag);
                for (name, value) in tree.attrs(id) {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(value));
                    out.push('"');
                }
                out.push('>');
                if is_void_element(tag) {
                    if with_tail {
                        out.push_str(&escape_text(tree.tail(id)));
                    }
                    continue;
                }
                out.push_str(&escape_text(tree.text(id)));
                pending.push(Render::Close(id, with_tail));
                pending.extend(tree.children(id).iter().rev().map(|&child| Render::Open(child, true)));
            }
            Render::Close(id, with_tail) => {
                out.push_str("</");
                out.push_str(tree.tag(id));
                out.push('>');
                if with_tail {
                    out.push_str(&escape_text(tree.tail(id)));
                }
            }
        }
    }
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_builds_text_and_tail() {
        let tree = parse("<html><body><p>one <b>two</b> three</p></body></html>");
        let root = tree.root();
        let p = tree.descendants_tags(root, &["p"])[0];
        let b = tree.children(p)[0];
        assert_eq!(tree.text(p), "one ");
        assert_eq!(tree.text(b), "two");
        assert_eq!(tree.tail(b), " three");
    }

    #[test]
    fn test_parse_drops_comments() {
        let tree = parse("<html><body><p>a<!-- hidden -->b</p></body></html>");
        let p = tree.descendants_tags(tree.root(), &["p"])[0];
        assert_eq!(tree.text_content(p), "ab");
    }

    #[test]
    fn test_parse_keeps_attributes() {
        let tree = parse(r#"<html><body><div id="main" class="post">x</div></body></html>"#);
        let div = tree.descendants_tags(tree.root(), &["div"])[0];
        assert_eq!(tree.attr(div, "id"), Some("main"));
        assert_eq!(tree.attr(div, "class"), Some("post"));
    }

    #[test]
    fn test_parse_pruned_removes_selection() {
        let tree = parse_pruned(
            r#"<html><body><div class="ad">buy</div><p>keep</p></body></html>"#,
            Some("div.ad"),
        );
        assert!(tree.descendants_tags(tree.root(), &["div"]).is_empty());
        assert_eq!(tree.iter_text(tree.root(), ""), "keep");
    }

    #[test]
    fn test_parse_pruned_ignores_invalid_selector() {
        let tree = parse_pruned("<html><body><p>keep</p></body></html>", Some("[[["));
        assert_eq!(tree.iter_text(tree.root(), ""), "keep");
    }

    #[test]
    fn test_to_html_escapes_and_skips_void_close() {
        let mut tree = Tree::new("p");
        let root = tree.root();
        tree.set_text(root, "a < b");
        let br = tree.sub_element(root, "br");
        tree.set_tail(br, "c & d");
        let a = tree.sub_element(root, "a");
        tree.set_attr(a, "href", "x\"y");
        tree.set_text(a, "link");
        assert_eq!(
            to_html(&tree, root),
            "<p>a &lt; b<br>c &amp; d<a href=\"x&quot;y\">link</a></p>"
        );
    }

    #[test]
    fn test_deeply_nested_document() {
        let depth = 5000;
        let html = format!(
            "<html><body>{}deep{}</body></html>",
            "<div>".repeat(depth),
            "</div>".repeat(depth)
        );
        let tree = parse(&html);
        let divs = tree.descendants_tags(tree.root(), &["div"]);
        assert_eq!(divs.len(), depth);
        assert_eq!(tree.text_content(tree.root()), "deep");
        assert_eq!(tree.iter_text(tree.root(), " "), "deep");

        let html = to_html(&tree, divs[0]);
        assert!(html.starts_with("<div><div>"));
        assert!(html.contains("deep"));
    }
}
