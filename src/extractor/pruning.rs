//! Section pruning.
//!
//! Rule-based and link-density-based removal of boilerplate from a candidate
//! subtree before its elements are handed to the transformer.

use crate::etree::{NodeId, Tree};
use crate::html_processing::{delete_by_link_density, prune_unwanted_nodes};
use crate::link_density::link_density_test_tables;
use crate::selector::discard::{OVERALL_DISCARDED, PAYWALL, TEASER};
use crate::selector::precision::{DISCARDED_IMAGE, PRECISION_DISCARDED};

use super::state::ExtractionState;
use super::tags::{is_in, HEAD_TAGS, LIST_TAGS, QUOTE_TAGS};

/// Prune a candidate subtree and return the pruned, detached copy.
///
/// The overall discard rules fall back to the unpruned copy when they would
/// leave a seventh of the text or less.
pub fn prune_unwanted_sections(tree: &mut Tree, sub: NodeId, state: &ExtractionState<'_>) -> NodeId {
    let options = state.options;

    let mut sub = prune_unwanted_nodes(tree, sub, &OVERALL_DISCARDED, true);

    if !options.include_images {
        sub = prune_unwanted_nodes(tree, sub, &DISCARDED_IMAGE, false);
    }

    if !options.focus.is_recall() {
        sub = prune_unwanted_nodes(tree, sub, &TEASER, false);
        sub = prune_unwanted_nodes(tree, sub, &PAYWALL, false);
        if options.focus.is_precision() {
            sub = prune_unwanted_nodes(tree, sub, &PRECISION_DISCARDED, false);
        }
    }

    for _ in 0..2 {
        delete_by_link_density(tree, sub, options, true, &["div"]);
        delete_by_link_density(tree, sub, options, false, LIST_TAGS);
        delete_by_link_density(tree, sub, options, false, &["p"]);
    }

    if state.is_potential_tag("table") || options.focus.is_precision() {
        for table in tree.iter_tags(sub, &["table"]).into_iter().rev() {
            if link_density_test_tables(tree, table, options) {
                tree.remove(table, false);
            }
        }
    }

    if options.focus.is_precision() {
        while let Some(&last) = tree.children(sub).last() {
            if !is_in(HEAD_TAGS, tree.tag(last)) {
                break;
            }
            tree.remove(last, false);
        }

        delete_by_link_density(tree, sub, options, false, HEAD_TAGS);
        delete_by_link_density(tree, sub, options, false, QUOTE_TAGS);
    }

    sub
}
