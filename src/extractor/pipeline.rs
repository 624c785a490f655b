//! Main content extraction.
//!
//! Candidate containers are tried in the order of the content rules. The
//! first candidate that yields more than one output block wins; when nothing
//! usable is found, loose text elements are recovered from the whole page.

use crate::etree::{NodeId, Tree};
use crate::selector::{self, content::CONTENT};
use crate::utils::{char_len, trim};

use super::handlers::handle_text_elem;
use super::pruning::prune_unwanted_sections;
use super::state::ExtractionState;
use super::tags::{is_in, HEAD_TAGS, LB_TAGS, LIST_TAGS, QUOTE_TAGS, REF_TAGS};

/// Extract the main content below `root`.
///
/// Returns a detached `<body>` element holding the output blocks, and its
/// whitespace-collapsed text.
pub fn extract_content(
    tree: &mut Tree,
    root: NodeId,
    state: &mut ExtractionState<'_>,
) -> (NodeId, String) {
    let backup = tree.deep_clone(root);
    let mut body = tree.create_element("body");
    let min_size = state.options.config.min_extracted_size;

    for rule in CONTENT.rules {
        let Some(candidate) = selector::query(tree, root, rule) else {
            continue;
        };
        state.debug(format_args!("content candidate found by rule {}", rule.name));

        let sub = prune_unwanted_sections(tree, candidate, state);
        if tree.children(sub).is_empty() {
            continue;
        }

        let paragraph_text: String = tree
            .descendants_tags(root, &["p"])
            .into_iter()
            .map(|p| tree.text_content(p))
            .collect();
        let factor = if state.options.focus.is_precision() { 1 } else { 3 };
        if paragraph_text.is_empty() || char_len(&paragraph_text) < min_size * factor {
            state.add_potential_tag("div");
        }

        if !state.is_potential_tag("a") {
            tree.strip_tags(sub, &["a"]);
        }
        if !state.is_potential_tag("span") {
            tree.strip_tags(sub, &["span"]);
        }

        let mut elements = tree.descendants(sub);
        if !elements.is_empty() && elements.iter().all(|&e| tree.tag(e) == "br") {
            elements = vec![sub];
        }

        let processed: Vec<NodeId> = elements
            .into_iter()
            .filter_map(|element| handle_text_elem(tree, element, state))
            .collect();
        tree.extend(body, &processed);

        while let Some(&last) = tree.children(body).last() {
            let tag = tree.tag(last);
            if !is_in(HEAD_TAGS, tag) && !is_in(REF_TAGS, tag) {
                break;
            }
            tree.remove(last, false);
        }

        if tree.children(body).len() > 1 {
            break;
        }
    }

    let mut text = trim(&tree.iter_text(body, " "));
    if tree.children(body).is_empty() || char_len(&text) < min_size {
        let recovered = tree.create_element("body");
        recover_wild_text(tree, backup, recovered, state);
        let recovered_text = trim(&tree.iter_text(recovered, " "));
        if char_len(&recovered_text) > char_len(&text) {
            body = recovered;
            text = recovered_text;
        }
    }

    let done: Vec<NodeId> = tree
        .descendants(body)
        .into_iter()
        .filter(|&id| state.is_done(id))
        .collect();
    for &id in done.iter().rev() {
        tree.remove(id, false);
    }
    tree.strip_tags(body, &["div"]);

    (body, text)
}

/// Look for text elements throughout the whole page, outside of any
/// candidate container, and append them to `body`.
pub fn recover_wild_text(
    tree: &mut Tree,
    doc: NodeId,
    body: NodeId,
    state: &mut ExtractionState<'_>,
) {
    state.observer.info(format_args!("recovering wild text elements"));

    let recall = state.options.focus.is_recall();
    let extra: &[&'static str] = if recall { &["div", "br", "hr"] } else { &[] };

    state.with_potential_tags(extra, |state| {
        let search = prune_unwanted_sections(tree, doc, state);

        if state.is_potential_tag("a") {
            tree.strip_tags(search, &["span"]);
        } else {
            tree.strip_tags(search, &["a", "ref", "span"]);
        }

        let candidates: Vec<NodeId> = tree
            .descendants(search)
            .into_iter()
            .filter(|&id| {
                let node = tree.get(id);
                let tag = node.tag();
                is_in(QUOTE_TAGS, tag)
                    || matches!(tag, "code" | "p" | "table")
                    || (tag == "div" && node.class().contains("w3-code"))
                    || (recall && (tag == "div" || is_in(LB_TAGS, tag) || is_in(LIST_TAGS, tag)))
            })
            .collect();

        let processed: Vec<NodeId> = candidates
            .into_iter()
            .filter_map(|element| handle_text_elem(tree, element, state))
            .collect();
        tree.extend(body, &processed);
    });
}
