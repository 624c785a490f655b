//! Rule sets used by the stricter pruning modes.

use crate::etree::NodeRef;
use crate::selector::discard::BOILERPLATE_BLOCKS;
use crate::selector::utils::{contains, id_class, is_one_of_tags};
use crate::selector::{Rule, RuleSet};

/// Extra sections dropped under `Focus::FavorPrecision`.
pub static PRECISION_DISCARDED: RuleSet = RuleSet {
    name: "precision-discarded",
    rules: &[
        Rule { name: "precision-header", matches: header },
        Rule { name: "precision-bottom-links-borders", matches: bottom_links_borders },
    ],
};

/// Caption blocks, dropped when images are not kept.
pub static DISCARDED_IMAGE: RuleSet = RuleSet {
    name: "discarded-image",
    rules: &[Rule { name: "image-caption", matches: caption }],
};

fn header(n: NodeRef<'_>) -> bool {
    n.tag() == "header"
}

fn bottom_links_borders(n: NodeRef<'_>) -> bool {
    if !is_one_of_tags(n, BOILERPLATE_BLOCKS) {
        return false;
    }
    let both = id_class(n);
    contains(&both, "bottom") || contains(&both, "link") || contains(n.attr("style"), "border")
}

fn caption(n: NodeRef<'_>) -> bool {
    is_one_of_tags(n, BOILERPLATE_BLOCKS)
        && (contains(n.element_id(), "caption") || contains(n.class(), "caption"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    #[test]
    fn test_precision_rules() {
        let tree = dom::parse(
            r#"<header>x</header><div class="bottom-bar">x</div><p style="border: 1px">x</p><p>kept</p>"#,
        );
        let tags: Vec<&str> = PRECISION_DISCARDED
            .query_all(&tree, tree.root())
            .into_iter()
            .map(|id| tree.tag(id))
            .collect();
        assert_eq!(tags, vec!["header", "div", "p"]);
    }

    #[test]
    fn test_caption_rule_ignores_figcaption_tag() {
        let tree = dom::parse(
            r#"<figcaption class="caption">x</figcaption><div class="wp-caption">y</div>"#,
        );
        let found = DISCARDED_IMAGE.query_all(&tree, tree.root());
        assert_eq!(found.len(), 1);
        assert_eq!(tree.tag(found[0]), "div");
    }
}
