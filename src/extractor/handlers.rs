//! Element handlers of the content transformer.
//!
//! Each handler takes one element of the candidate subtree and returns the
//! element to append to the output body, or `None` when nothing worth keeping
//! is left. Handlers mark the source nodes they consumed as done so the
//! caller does not visit them twice.

use crate::etree::{NodeId, Tree};
use crate::html_processing::{handle_text_node, process_node};
use crate::utils::{is_image_file, text_chars_test, trim};

use super::state::ExtractionState;
use super::tags::{
    is_in, CELL_TAGS, HEAD_TAGS, HI_TAGS, ITEM_TAGS, LB_TAGS, LIST_TAGS, QUOTE_TAGS, REF_TAGS,
};

/// Check whether the element holds any meaningful text.
#[must_use]
pub fn is_text_element(tree: &Tree, id: NodeId) -> bool {
    text_chars_test(&tree.iter_text(id, ""))
}

/// Append a copy of `processed` (tag, text and tail only) under `parent`.
fn define_new_element(tree: &mut Tree, processed: Option<NodeId>, parent: NodeId) {
    if let Some(processed) = processed {
        let tag = tree.tag(processed).to_string();
        let text = tree.text(processed).to_string();
        let tail = tree.tail(processed).to_string();

        let child = tree.sub_element(parent, &tag);
        tree.set_text(child, text);
        tree.set_tail(child, tail);
    }
}

/// Like [`define_new_element`], also carrying the source element's attributes.
fn add_sub_element(tree: &mut Tree, parent: NodeId, source: NodeId, processed: NodeId) -> NodeId {
    let tag = tree.tag(processed).to_string();
    let text = tree.text(processed).to_string();
    let tail = tree.tail(processed).to_string();
    let attrs = tree.attrs(source).to_vec();

    let child = tree.sub_element(parent, &tag);
    tree.set_text(child, text);
    tree.set_tail(child, tail);
    for (name, value) in attrs {
        tree.set_attr(child, &name, &value);
    }
    child
}

// === Titles and formatting ===

/// Headings. A `<summary>` is kept as bold text since heading levels matter
/// in HTML output.
pub fn handle_titles(tree: &mut Tree, id: NodeId, state: &mut ExtractionState<'_>) -> Option<NodeId> {
    if tree.tag(id) == "summary" {
        tree.set_tag(id, "b");
    }

    let title = if tree.children(id).is_empty() {
        process_node(tree, id, state)?
    } else {
        let title = tree.shallow_clone(id);
        let text = tree.text(id).to_string();
        tree.set_text(title, text);

        for child in tree.children(id).to_vec() {
            if state.is_done(child) {
                continue;
            }
            let cloned = tree.deep_clone(child);
            let processed = handle_text_node(tree, cloned, state, false, false).unwrap_or(cloned);
            tree.append(title, processed);

            let tail = tree.tail(child).to_string();
            tree.set_tail(processed, tail);
            state.mark_done(child);
        }
        title
    };

    is_text_element(tree, title).then_some(title)
}

/// Formatting elements found outside of paragraphs. Orphans are wrapped in
/// a new paragraph.
pub fn handle_formatting(
    tree: &mut Tree,
    id: NodeId,
    state: &mut ExtractionState<'_>,
) -> Option<NodeId> {
    let formatting = process_node(tree, id, state)?;

    let parent = tree.parent(id).or_else(|| tree.previous_sibling(id));
    let has_block_parent = parent.is_some_and(|parent| {
        let tag = tree.tag(parent);
        !state.is_done(parent)
            && (tag == "p"
                || is_in(CELL_TAGS, tag)
                || is_in(HEAD_TAGS, tag)
                || is_in(HI_TAGS, tag)
                || is_in(ITEM_TAGS, tag)
                || is_in(QUOTE_TAGS, tag))
    });

    if has_block_parent {
        return Some(formatting);
    }

    let paragraph = tree.create_element("p");
    tree.append(paragraph, formatting);
    Some(paragraph)
}

// === Lists ===

/// Rewire the descendants of a list item under `new_item`.
fn process_nested_element(
    tree: &mut Tree,
    item: NodeId,
    new_item: NodeId,
    state: &mut ExtractionState<'_>,
) {
    let text = tree.text(item).to_string();
    tree.set_text(new_item, text);

    for sub in tree.descendants(item) {
        if state.is_done(sub) {
            continue;
        }

        if is_in(LIST_TAGS, tree.tag(sub)) {
            if let Some(list) = handle_lists(tree, sub, state) {
                tree.append(new_item, list);
            }
        } else if let Some(processed) = handle_text_node(tree, sub, state, false, false) {
            add_sub_element(tree, new_item, sub, processed);
        }
        state.mark_done(sub);
    }
}

/// Lists, including nested lists and definition lists.
pub fn handle_lists(tree: &mut Tree, id: NodeId, state: &mut ExtractionState<'_>) -> Option<NodeId> {
    let tag = tree.tag(id).to_string();
    let list = tree.create_element(&tag);

    let text = trim(tree.text(id));
    if !text.is_empty() {
        let item = tree.sub_element(list, "li");
        tree.set_text(item, text);
    }

    for item in tree.descendants_tags(id, ITEM_TAGS) {
        if state.is_done(item) {
            continue;
        }

        let item_tag = tree.tag(item).to_string();
        let new_item = tree.create_element(&item_tag);

        if tree.children(item).is_empty() {
            if let Some(processed) = process_node(tree, item, state) {
                let mut text = tree.text(processed).to_string();
                let tail = trim(tree.tail(processed));
                if !tail.is_empty() {
                    text.push(' ');
                    text.push_str(&tail);
                }
                tree.set_text(new_item, text);
            }
        } else {
            process_nested_element(tree, item, new_item, state);

            let item_tail = tree.tail(item).to_string();
            if !item_tail.trim().is_empty() {
                if let Some(&last) = tree.children(new_item).last() {
                    let last_tail = tree.tail(last);
                    let merged = if last_tail.trim().is_empty() {
                        item_tail
                    } else {
                        format!("{last_tail} {item_tail}")
                    };
                    tree.set_tail(last, merged);
                }
            }
        }

        if !tree.text(new_item).is_empty() || !tree.children(new_item).is_empty() {
            tree.append(list, new_item);
        }
        state.mark_done(item);
    }

    state.mark_done(id);
    is_text_element(tree, list).then_some(list)
}

// === Code and quotes ===

/// Check for the structural markers of a code block: a `lang` attribute, a
/// `<code>` tag, a GitHub highlight wrapper or a lone `<code>` child.
#[must_use]
pub fn is_code_block_element(tree: &Tree, id: NodeId) -> bool {
    let node = tree.get(id);
    if !node.attr("lang").is_empty() || node.tag() == "code" {
        return true;
    }

    if node.parent().is_some_and(|parent| parent.class().contains("highlight")) {
        return true;
    }

    tree.children(id).len() == 1 && tree.find(id, |n| n.tag() == "code").is_some()
}

/// Turn an element into a `<code>` block, without attributes.
pub fn handle_code_blocks(tree: &mut Tree, id: NodeId, state: &mut ExtractionState<'_>) -> NodeId {
    let code = tree.deep_clone(id);
    for node in tree.iter(id) {
        state.mark_done(node);
    }

    tree.set_tag(code, "code");
    for node in tree.iter(code) {
        tree.clear_attrs(node);
    }
    code
}

/// Quotes and preformatted blocks.
pub fn handle_quotes(tree: &mut Tree, id: NodeId, state: &mut ExtractionState<'_>) -> Option<NodeId> {
    if is_code_block_element(tree, id) {
        return Some(handle_code_blocks(tree, id, state));
    }

    let tag = tree.tag(id).to_string();
    let quote = tree.create_element(&tag);
    for node in tree.iter(id) {
        let processed = process_node(tree, node, state);
        define_new_element(tree, processed, quote);
        state.mark_done(node);
    }

    if is_text_element(tree, quote) {
        tree.strip_tags(quote, QUOTE_TAGS);
        return Some(quote);
    }
    None
}

// === Everything else ===

/// Elements outside the dedicated handlers. Only potential tags survive, and
/// among them only `<div>` and `<details>` with direct text.
pub fn handle_other_elements(
    tree: &mut Tree,
    id: NodeId,
    state: &mut ExtractionState<'_>,
) -> Option<NodeId> {
    let tag = tree.tag(id).to_string();
    if tag == "div" && tree.get(id).class().contains("w3-code") {
        return Some(handle_code_blocks(tree, id, state));
    }

    if !state.is_potential_tag(&tag) {
        state.debug(format_args!(
            "discarding element: {tag} {:?}",
            tree.text_content(id)
        ));
        return None;
    }

    if tag == "div" || tag == "details" {
        if let Some(processed) = handle_text_node(tree, id, state, false, true) {
            if text_chars_test(tree.text(processed)) {
                tree.clear_attrs(processed);
                if tree.tag(processed) == "div" {
                    tree.set_tag(processed, "p");
                }
                return Some(processed);
            }
        }
    }

    state.debug(format_args!(
        "unexpected element seen: {tag} {:?}",
        tree.text(id)
    ));
    None
}

/// Paragraphs and their inline children.
pub fn handle_paragraphs(
    tree: &mut Tree,
    id: NodeId,
    state: &mut ExtractionState<'_>,
) -> Option<NodeId> {
    tree.clear_attrs(id);
    if tree.children(id).is_empty() {
        return process_node(tree, id, state);
    }

    let mut unwanted = Vec::new();
    let mut processed = Vec::new();
    for child in tree.descendants(id) {
        let done = state.is_done(child);
        let tag = tree.tag(child).to_string();

        if !done && !state.is_potential_tag(&tag) {
            state.debug(format_args!(
                "unexpected in p: {tag} {:?} {:?}",
                tree.text(child),
                tree.tail(child)
            ));
            unwanted.push(child);
            continue;
        }

        if state.options.deduplicate && crate::html_processing::duplicate_test(tree, child, state) {
            unwanted.push(child);
            continue;
        }

        if !done {
            match tag.as_str() {
                "p" => {
                    state.warn(format_args!(
                        "extra p within p: {:?} {:?}",
                        tree.text(child),
                        tree.tail(child)
                    ));
                    let parent_has_text = tree
                        .parent(child)
                        .is_some_and(|parent| !tree.text(parent).is_empty());
                    if parent_has_text && !tree.text(child).is_empty() {
                        let text = format!(" {}", tree.text(child));
                        tree.set_text(child, text);
                    }
                    tree.strip(child);
                }
                "a" => {
                    let href = trim(tree.get(child).attr("href"));
                    let target = trim(tree.get(child).attr("target"));
                    tree.clear_attrs(child);
                    if !href.is_empty() {
                        tree.set_attr(child, "href", &href);
                    }
                    if !target.is_empty() {
                        tree.set_attr(child, "target", &target);
                    }
                }
                _ => {}
            }
        }
        processed.push(child);
    }

    for &child in unwanted.iter().rev() {
        tree.remove(child, false);
    }

    for child in tree.descendants(id).into_iter().rev() {
        if !text_chars_test(tree.text(child)) && !crate::etree::is_void_element(tree.tag(child)) {
            tree.strip(child);
        }
    }

    for br in tree.descendants_tags(id, LB_TAGS).into_iter().rev() {
        if tree.tail(br).is_empty() {
            tree.remove(br, false);
        }
    }

    let paragraph = tree.deep_clone(id);
    for child in processed {
        state.mark_done(child);
    }

    if !tree.children(paragraph).is_empty() || !tree.text(paragraph).is_empty() {
        return Some(paragraph);
    }

    state.debug(format_args!("discarding p-child: {:?}", tree.text_content(paragraph)));
    None
}

/// Tables, flattened into rows of cells. Nested tables end the walk.
pub fn handle_table(tree: &mut Tree, id: NodeId, state: &mut ExtractionState<'_>) -> Option<NodeId> {
    let table = tree.create_element("table");
    let mut row = tree.create_element("tr");

    tree.strip_tags(id, &["thead", "tbody", "tfoot"]);

    for sub in tree.descendants(id) {
        if state.is_done(sub) {
            continue;
        }

        let tag = tree.tag(sub).to_string();
        match tag.as_str() {
            "tr" => {
                if !tree.children(row).is_empty() {
                    tree.append(table, row);
                    row = tree.create_element("tr");
                }
            }
            "td" | "th" => {
                let cell = tree.create_element(&tag);
                if tree.children(sub).is_empty() {
                    if let Some(processed) = process_node(tree, sub, state) {
                        let text = tree.text(processed).to_string();
                        tree.set_text(cell, text);
                    }
                } else {
                    let text = tree.text(sub).to_string();
                    tree.set_text(cell, text);
                    state.mark_done(sub);

                    for child in tree.descendants(sub) {
                        if state.is_done(child) {
                            continue;
                        }
                        let child_tag = tree.tag(child).to_string();
                        let processed = if is_in(CELL_TAGS, &child_tag) || is_in(HI_TAGS, &child_tag)
                        {
                            handle_text_node(tree, child, state, true, false)
                        } else if is_in(LIST_TAGS, &child_tag) && state.options.focus.is_recall() {
                            if let Some(list) = handle_lists(tree, child, state) {
                                let copy = tree.deep_clone(list);
                                tree.append(cell, copy);
                            }
                            None
                        } else {
                            state.with_potential_tags(&["div"], |s| handle_text_elem(tree, child, s))
                        };

                        define_new_element(tree, processed, cell);
                        state.mark_done(child);
                    }
                }

                if !tree.text(cell).is_empty() || !tree.children(cell).is_empty() {
                    tree.append(row, cell);
                }
            }
            "table" => break,
            _ => {}
        }
        state.mark_done(sub);
    }

    if !tree.children(row).is_empty() {
        tree.append(table, row);
    }

    (!tree.children(table).is_empty()).then_some(table)
}

/// Images. The source is taken from `data-src`, `src` or the first
/// `data-src*` attribute naming an image file.
#[must_use]
pub fn handle_image(tree: &mut Tree, id: NodeId) -> Option<NodeId> {
    let node = tree.get(id);
    let src = [node.attr("data-src"), node.attr("src")]
        .into_iter()
        .find(|src| is_image_file(src))
        .or_else(|| {
            tree.attrs(id)
                .iter()
                .find(|(name, value)| name.starts_with("data-src") && is_image_file(value))
                .map(|(_, value)| value.as_str())
        })?;

    let src = match src.strip_prefix("//") {
        Some(rest) => format!("http://{rest}"),
        None => src.to_string(),
    };
    let alt = node.attr("alt").to_string();
    let title = node.attr("title").to_string();
    let tag = node.tag().to_string();

    let image = tree.create_element(&tag);
    tree.set_attr(image, "src", &src);
    if !alt.is_empty() {
        tree.set_attr(image, "alt", &alt);
    }
    if !title.is_empty() {
        tree.set_attr(image, "title", &title);
    }
    Some(image)
}

/// Dispatch one element of the candidate subtree to its handler.
pub fn handle_text_elem(
    tree: &mut Tree,
    id: NodeId,
    state: &mut ExtractionState<'_>,
) -> Option<NodeId> {
    if state.is_done(id) {
        return None;
    }

    let tag = tree.tag(id).to_string();
    if is_in(LIST_TAGS, &tag) {
        return handle_lists(tree, id, state);
    }
    if is_in(QUOTE_TAGS, &tag) || tag == "code" {
        return handle_quotes(tree, id, state);
    }
    if is_in(HEAD_TAGS, &tag) {
        return handle_titles(tree, id, state);
    }
    if tag == "p" {
        return handle_paragraphs(tree, id, state);
    }
    if is_in(LB_TAGS, &tag) {
        if text_chars_test(tree.tail(id)) {
            if let Some(processed) = process_node(tree, id, state) {
                let tail = tree.tail(processed).to_string();
                let paragraph = tree.create_element("p");
                tree.set_text(paragraph, tail);
                return Some(paragraph);
            }
        }
        return handle_other_elements(tree, id, state);
    }
    if is_in(HI_TAGS, &tag) || is_in(REF_TAGS, &tag) || tag == "span" {
        return handle_formatting(tree, id, state);
    }
    if tag == "table" && state.is_potential_tag("table") {
        return handle_table(tree, id, state);
    }
    if tag == "img" && state.is_potential_tag("img") {
        return handle_image(tree, id);
    }

    handle_other_elements(tree, id, state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DedupCache;
    use crate::dom;
    use crate::observer::SilentObserver;
    use crate::options::{Focus, Options};

    fn first(tree: &Tree, tag: &str) -> NodeId {
        match tree.find(tree.root(), |n| n.tag() == tag) {
            Some(id) => id,
            None => panic!("no <{tag}> in fixture"),
        }
    }

    fn run(
        html: &str,
        tag: &str,
        options: &Options,
        handler: fn(&mut Tree, NodeId, &mut ExtractionState<'_>) -> Option<NodeId>,
    ) -> Option<(Tree, NodeId)> {
        let mut tree = dom::parse(html);
        let id = first(&tree, tag);
        let mut cache = DedupCache::new(64);
        let mut state = ExtractionState::for_content(options, &SilentObserver, &mut cache);
        let out = handler(&mut tree, id, &mut state)?;
        Some((tree, out))
    }

    #[test]
    fn test_title_with_children() {
        let Some((tree, title)) = run(
            "<h2>Breaking <em>news</em> today</h2>",
            "h2",
            &Options::default(),
            handle_titles,
        ) else {
            panic!("expected a title");
        };
        assert_eq!(tree.tag(title), "h2");
        assert_eq!(tree.iter_text(title, ""), "Breaking news today");
    }

    #[test]
    fn test_summary_becomes_bold() {
        let Some((tree, title)) = run(
            "<details><summary>More details</summary></details>",
            "summary",
            &Options::default(),
            handle_titles,
        ) else {
            panic!("expected a title");
        };
        assert_eq!(tree.tag(title), "b");
    }

    #[test]
    fn test_empty_title_is_dropped() {
        assert!(run("<h1>   </h1>", "h1", &Options::default(), handle_titles).is_none());
    }

    #[test]
    fn test_orphan_formatting_is_wrapped() {
        let Some((tree, out)) = run(
            "<div><b>Important notice</b></div>",
            "b",
            &Options::default(),
            handle_formatting,
        ) else {
            panic!("expected formatting");
        };
        assert_eq!(tree.tag(out), "p");
        assert_eq!(tree.iter_text(out, ""), "Important notice");
    }

    #[test]
    fn test_formatting_inside_paragraph_is_kept() {
        let Some((tree, out)) = run(
            "<p>Some <i>italic words</i></p>",
            "i",
            &Options::default(),
            handle_formatting,
        ) else {
            panic!("expected formatting");
        };
        assert_eq!(tree.tag(out), "i");
    }

    #[test]
    fn test_nested_list() {
        let Some((tree, list)) = run(
            "<ul><li>First item</li><li>Second <b>bold</b> item<ul><li>Inner item</li></ul></li></ul>",
            "ul",
            &Options::default(),
            handle_lists,
        ) else {
            panic!("expected a list");
        };
        assert_eq!(tree.tag(list), "ul");
        let items: Vec<_> = tree.children(list).to_vec();
        assert_eq!(items.len(), 2);
        assert_eq!(tree.text(items[0]), "First item");
        assert!(tree.descendants_tags(items[1], &["ul"]).len() == 1);
        let text = tree.iter_text(list, " ");
        assert!(text.contains("Inner item"));
        assert!(text.contains("bold"));
    }

    #[test]
    fn test_list_item_tail_is_kept() {
        let Some((tree, list)) = run(
            "<ol><li>Step one</li><li>Step two</li></ol>",
            "ol",
            &Options::default(),
            handle_lists,
        ) else {
            panic!("expected a list");
        };
        assert_eq!(tree.tag(list), "ol");
        assert_eq!(tree.children(list).len(), 2);
    }

    #[test]
    fn test_code_block_detection() {
        let tree = dom::parse(
            r#"<div class="highlight"><pre>let x = 1;</pre></div><pre><code>fn main() {}</code></pre><pre>plain</pre>"#,
        );
        let pres = tree.descendants_tags(tree.root(), &["pre"]);
        assert!(is_code_block_element(&tree, pres[0]));
        assert!(is_code_block_element(&tree, pres[1]));
        assert!(!is_code_block_element(&tree, pres[2]));
    }

    #[test]
    fn test_quote_and_code() {
        let Some((tree, quote)) = run(
            "<blockquote>To be or not to be</blockquote>",
            "blockquote",
            &Options::default(),
            handle_quotes,
        ) else {
            panic!("expected a quote");
        };
        assert_eq!(tree.tag(quote), "blockquote");
        assert_eq!(tree.iter_text(quote, ""), "To be or not to be");

        let Some((tree, code)) = run(
            r#"<pre lang="rust" class="x"><span class="kw">fn</span> main() {}</pre>"#,
            "pre",
            &Options::default(),
            handle_quotes,
        ) else {
            panic!("expected code");
        };
        assert_eq!(tree.tag(code), "code");
        assert!(tree.iter(code).iter().all(|&n| tree.attrs(n).is_empty()));
    }

    #[test]
    fn test_other_elements() {
        let options = Options::default();
        let mut tree = dom::parse(r#"<div class="box">Loose text in a div</div>"#);
        let div = first(&tree, "div");
        let mut cache = DedupCache::new(64);
        let mut state = ExtractionState::for_content(&options, &SilentObserver, &mut cache);
        assert!(handle_other_elements(&mut tree, div, &mut state).is_none());

        state.add_potential_tag("div");
        let Some(out) = handle_other_elements(&mut tree, div, &mut state) else {
            panic!("expected a paragraph");
        };
        assert_eq!(tree.tag(out), "p");
        assert!(tree.attrs(out).is_empty());
    }

    #[test]
    fn test_paragraph_cleanup() {
        let Some((tree, p)) = run(
            r#"<p class="x">Text with <a href=" /link " rel="nofollow">a link</a> and <em>emphasis</em><span>dropped</span><br></p>"#,
            "p",
            &Options::default().with_links(true),
            handle_paragraphs,
        ) else {
            panic!("expected a paragraph");
        };
        assert!(tree.attrs(p).is_empty());
        let Some(a) = tree.find(p, |n| n.tag() == "a") else {
            panic!("link should be kept");
        };
        assert_eq!(tree.attrs(a), &[("href".to_string(), "/link".to_string())]);
        assert!(tree.find(p, |n| n.tag() == "em").is_some());
        assert!(tree.find(p, |n| n.tag() == "span").is_none());
        assert!(tree.find(p, |n| n.tag() == "br").is_none());
        assert_eq!(tree.text_content(p), "Text with a link and emphasis");
    }

    #[test]
    fn test_table() {
        let Some((tree, table)) = run(
            "<table><thead><tr><th>Name</th><th>Age</th></tr></thead>\
             <tbody><tr><td>Alice</td><td><b>30</b></td></tr></tbody></table>",
            "table",
            &Options::default(),
            handle_table,
        ) else {
            panic!("expected a table");
        };
        let rows = tree.children(table).to_vec();
        assert_eq!(rows.len(), 2);
        assert_eq!(tree.children(rows[0]).len(), 2);
        assert_eq!(tree.iter_text(rows[1], " "), "Alice 30");
    }

    #[test]
    fn test_table_list_under_recall() {
        let options = Options::default().with_focus(Focus::FavorRecall);
        let Some((tree, table)) = run(
            "<table><tr><td><ul><li>Alpha</li><li>Beta</li></ul></td></tr></table>",
            "table",
            &options,
            handle_table,
        ) else {
            panic!("expected a table");
        };
        assert_eq!(tree.descendants_tags(table, &["li"]).len(), 2);
    }

    #[test]
    fn test_image_sources() {
        let mut tree = dom::parse(
            r#"<img data-src="//cdn.example.org/a.jpg" src="pixel.gif" alt="A"><img data-src-large="b.png"><img src="script.js">"#,
        );
        let imgs = tree.descendants_tags(tree.root(), &["img"]);

        let Some(a) = handle_image(&mut tree, imgs[0]) else {
            panic!("expected an image");
        };
        assert_eq!(tree.attr(a, "src"), Some("http://cdn.example.org/a.jpg"));
        assert_eq!(tree.attr(a, "alt"), Some("A"));

        let Some(b) = handle_image(&mut tree, imgs[1]) else {
            panic!("expected an image");
        };
        assert_eq!(tree.attr(b, "src"), Some("b.png"));

        assert!(handle_image(&mut tree, imgs[2]).is_none());
    }

    #[test]
    fn test_line_break_with_tail() {
        let Some((tree, p)) = run(
            "<div><br>Text after a break</div>",
            "br",
            &Options::default(),
            handle_text_elem,
        ) else {
            panic!("expected a paragraph");
        };
        assert_eq!(tree.tag(p), "p");
        assert_eq!(tree.text(p), "Text after a break");
    }

    #[test]
    fn test_done_elements_are_skipped() {
        let options = Options::default();
        let mut tree = dom::parse("<p>Already handled</p>");
        let p = first(&tree, "p");
        let mut cache = DedupCache::new(64);
        let mut state = ExtractionState::for_content(&options, &SilentObserver, &mut cache);
        state.mark_done(p);
        assert!(handle_text_elem(&mut tree, p, &mut state).is_none());
    }
}
