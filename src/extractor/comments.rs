//! Comment section extraction.

use crate::etree::{NodeId, Tree};
use crate::html_processing::{handle_text_node, prune_unwanted_nodes};
use crate::selector::{self, comments::COMMENTS, comments::DISCARDED_COMMENTS};

use super::state::ExtractionState;

fn process_comments_node(
    tree: &mut Tree,
    id: NodeId,
    state: &mut ExtractionState<'_>,
) -> Option<NodeId> {
    if !state.is_potential_tag(tree.tag(id)) {
        return None;
    }

    let processed = handle_text_node(tree, id, state, true, false)?;
    tree.clear_attrs(processed);
    Some(processed)
}

/// Extract the comment section below `root`.
///
/// The first comment container that yields any block wins and is removed
/// from the document so the content pass does not pick it up again.
/// Returns `None` and an empty string when no comments were found.
pub fn extract_comments(
    tree: &mut Tree,
    root: NodeId,
    state: &mut ExtractionState<'_>,
) -> (Option<NodeId>, String) {
    let body = tree.create_element("body");

    for rule in COMMENTS.rules {
        let Some(candidate) = selector::query(tree, root, rule) else {
            continue;
        };

        let sub = prune_unwanted_nodes(tree, candidate, &DISCARDED_COMMENTS, false);
        tree.strip_tags(sub, &["a", "span"]);

        let processed: Vec<NodeId> = tree
            .descendants(sub)
            .into_iter()
            .filter_map(|element| process_comments_node(tree, element, state))
            .collect();
        tree.extend(body, &processed);

        if !tree.children(body).is_empty() {
            state.debug(format_args!("comments found by rule {}", rule.name));
            tree.remove(candidate, false);
            break;
        }
    }

    let text = tree.iter_text(body, " ");
    if text.is_empty() {
        return (None, String::new());
    }
    (Some(body), text)
}
