//! Metadata rules: DOM fallbacks for title, author, categories and tags.
//!
//! Category and tag rules match `<a href>` elements sitting below a
//! recognizable container; the metadata pass reads the link text and checks
//! the href itself.

use crate::etree::NodeRef;
use crate::selector::utils::{contains, get_node_ancestors, is_one_of_tags, lower, starts_with};
use crate::selector::{Rule, RuleSet};

/// Title elements, most specific first.
pub static META_TITLE: RuleSet = RuleSet {
    name: "meta-title",
    rules: &[
        Rule { name: "title-heading-markers", matches: title_heading_markers },
        Rule { name: "title-exact-class", matches: title_exact_class },
        Rule { name: "title-heading-generic", matches: title_heading_generic },
    ],
};

/// Author elements, most specific first.
pub static META_AUTHOR: RuleSet = RuleSet {
    name: "meta-author",
    rules: &[
        Rule { name: "author-specific", matches: author_specific },
        Rule { name: "author-generic", matches: author_generic },
        Rule { name: "author-any-element", matches: author_any_element },
    ],
};

/// Regions removed before looking for an author.
pub static META_AUTHOR_DISCARD: RuleSet = RuleSet {
    name: "meta-author-discard",
    rules: &[
        Rule { name: "author-noise-regions", matches: author_noise_regions },
        Rule { name: "author-noise-time-figure", matches: time_or_figure },
    ],
};

/// Category links.
pub static META_CATEGORIES: RuleSet = RuleSet {
    name: "meta-categories",
    rules: &[
        Rule { name: "categories-div-meta", matches: categories_div_meta },
        Rule { name: "categories-p-meta", matches: categories_p_meta },
        Rule { name: "categories-footer", matches: categories_footer },
        Rule { name: "categories-item", matches: categories_item },
        Rule { name: "categories-entry-header", matches: categories_entry_header },
        Rule { name: "categories-row-tags", matches: categories_row_tags },
    ],
};

/// Tag links.
pub static META_TAGS: RuleSet = RuleSet {
    name: "meta-tags",
    rules: &[
        Rule { name: "tags-div", matches: tags_div },
        Rule { name: "tags-entry-p", matches: tags_entry_p },
        Rule { name: "tags-div-meta", matches: tags_div_meta },
        Rule { name: "tags-any-container", matches: tags_any_container },
    ],
};

// === Title ===

fn title_heading_markers(n: NodeRef<'_>) -> bool {
    if !matches!(n.tag(), "h1" | "h2") {
        return false;
    }
    let id = n.element_id();
    let class = n.class();

    contains(class, "post-title")
        || contains(class, "entry-title")
        || contains(class, "headline")
        || contains(id, "headline")
        || contains(n.attr("itemprop"), "headline")
        || contains(class, "post__title")
        || contains(class, "article-title")
}

fn title_exact_class(n: NodeRef<'_>) -> bool {
    matches!(n.class(), "entry-title" | "post-title")
}

fn title_heading_generic(n: NodeRef<'_>) -> bool {
    matches!(n.tag(), "h1" | "h2" | "h3")
        && (contains(n.class(), "title") || contains(n.element_id(), "title"))
}

// === Author ===

fn author_specific(n: NodeRef<'_>) -> bool {
    match n.tag() {
        "author" => return true,
        "a" | "address" | "div" | "link" | "p" | "span" | "strong" => {}
        _ => return false,
    }

    let class = n.class();
    let rel = n.attr("rel");
    let test_id = n.attr("data-testid");

    rel == "author"
        || n.element_id() == "author"
        || class == "author"
        || n.attr("itemprop") == "author name"
        || rel == "me"
        || contains(class, "author-name")
        || contains(class, "AuthorName")
        || contains(class, "authorName")
        || contains(class, "author name")
        || test_id == "AuthorCard"
        || test_id == "AuthorURL"
}

fn author_generic(n: NodeRef<'_>) -> bool {
    if !is_one_of_tags(n, &["a", "div", "h3", "h4", "p", "span"]) {
        return false;
    }
    let id = n.element_id();
    let class = n.class();

    contains(class, "author")
        || contains(id, "author")
        || contains(n.attr("itemprop"), "author")
        || class == "byline"
        || contains(class, "channel-name")
        || contains(id, "zuozhe")
        || contains(class, "zuozhe")
        || contains(id, "bianji")
        || contains(class, "bianji")
        || contains(id, "xiaobian")
        || contains(class, "xiaobian")
        || contains(class, "submitted-by")
        || contains(class, "posted-by")
        || class == "username"
        || class == "byl"
        || class == "BBL"
        || contains(class, "journalist-name")
}

fn author_any_element(n: NodeRef<'_>) -> bool {
    let class = n.class();
    let lower_class = lower(class);

    contains(&lower(n.element_id()), "author")
        || contains(&lower_class, "author")
        || contains(class, "screenname")
        || contains(&lower(n.attr("data-component")), "byline")
        || contains(n.attr("itemprop"), "author")
        || contains(class, "writer")
        || contains(&lower_class, "byline")
}

fn author_noise_regions(n: NodeRef<'_>) -> bool {
    if !is_one_of_tags(n, &["a", "div", "section", "span"]) {
        return false;
    }
    let id = n.element_id();
    let class = n.class();

    id == "comments"
        || class == "comments"
        || class == "title"
        || class == "date"
        || contains(id, "commentlist")
        || contains(class, "commentlist")
        || contains(class, "sidebar")
        || contains(class, "is-hidden")
        || contains(class, "quote")
        || contains(id, "comment-list")
        || contains(class, "comment-list")
        || contains(class, "embedly-instagram")
        || contains(id, "ProductReviews")
        || starts_with(id, "comments")
        || contains(n.attr("data-component"), "Figure")
        || contains(class, "article-share")
        || contains(class, "article-support")
        || contains(class, "print")
        || contains(class, "category")
        || contains(class, "meta-date")
        || contains(class, "meta-reviewer")
        || starts_with(class, "comments")
        || starts_with(class, "Comments")
}

fn time_or_figure(n: NodeRef<'_>) -> bool {
    matches!(n.tag(), "time" | "figure")
}

// === Categories and tags ===

fn is_link(n: NodeRef<'_>) -> bool {
    n.tag() == "a" && n.has_attr("href")
}

/// Link below an ancestor with tag `tag` accepted by `accept`.
fn link_below(n: NodeRef<'_>, tag: &str, accept: fn(NodeRef<'_>) -> bool) -> bool {
    is_link(n) && get_node_ancestors(n, tag).into_iter().any(accept)
}

fn categories_div_meta(n: NodeRef<'_>) -> bool {
    link_below(n, "div", |a| {
        let class = a.class();
        [
            "post-info",
            "postinfo",
            "post-meta",
            "postmeta",
            "meta",
            "entry-meta",
            "entry-info",
            "entry-utility",
        ]
        .iter()
        .any(|prefix| starts_with(class, prefix))
            || starts_with(a.element_id(), "postpath")
    })
}

fn categories_p_meta(n: NodeRef<'_>) -> bool {
    link_below(n, "p", |a| {
        let class = a.class();
        starts_with(class, "postmeta")
            || starts_with(class, "entry-categories")
            || class == "postinfo"
            || a.element_id() == "filedunder"
    })
}

fn categories_footer(n: NodeRef<'_>) -> bool {
    link_below(n, "footer", |a| {
        starts_with(a.class(), "entry-meta") || starts_with(a.class(), "entry-footer")
    })
}

fn categories_item(n: NodeRef<'_>) -> bool {
    fn accept(a: NodeRef<'_>) -> bool {
        let class = a.class();
        matches!(class, "post-category" | "postcategory" | "entry-category")
            || contains(class, "cat-links")
    }
    link_below(n, "li", accept) || link_below(n, "span", accept)
}

fn categories_entry_header(n: NodeRef<'_>) -> bool {
    link_below(n, "header", |a| a.class() == "entry-header")
}

fn categories_row_tags(n: NodeRef<'_>) -> bool {
    link_below(n, "div", |a| matches!(a.class(), "row" | "tags"))
}

fn tags_div(n: NodeRef<'_>) -> bool {
    link_below(n, "div", |a| a.class() == "tags")
}

fn tags_entry_p(n: NodeRef<'_>) -> bool {
    link_below(n, "p", |a| starts_with(a.class(), "entry-tags"))
}

fn tags_div_meta(n: NodeRef<'_>) -> bool {
    link_below(n, "div", |a| {
        let class = a.class();
        matches!(class, "row" | "jp-relatedposts" | "entry-utility")
            || starts_with(class, "tag")
            || starts_with(class, "postmeta")
            || starts_with(class, "meta")
    })
}

fn tags_any_container(n: NodeRef<'_>) -> bool {
    is_link(n)
        && n.ancestors().any(|a| {
            let class = a.class();
            class == "entry-meta" || contains(class, "topics") || contains(class, "tags-links")
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    fn first_text(set: &RuleSet, html: &str) -> Option<String> {
        let tree = dom::parse(html);
        set.query(&tree, tree.root()).map(|id| tree.text_content(id))
    }

    #[test]
    fn test_title_rules() {
        let html = r#"<h2 class="x-title">Generic</h2><h1 class="entry-title">Specific</h1>"#;
        assert_eq!(first_text(&META_TITLE, html).as_deref(), Some("Specific"));
        let html = r#"<span class="post-title">Span title</span>"#;
        assert_eq!(first_text(&META_TITLE, html).as_deref(), Some("Span title"));
    }

    #[test]
    fn test_author_rules_priority() {
        let html = r#"<div class="author-box">Box</div><a rel="author" href="/me">Jane Doe</a>"#;
        assert_eq!(first_text(&META_AUTHOR, html).as_deref(), Some("Jane Doe"));
        let html = r#"<em class="Byline">By Jim</em>"#;
        assert_eq!(first_text(&META_AUTHOR, html).as_deref(), Some("By Jim"));
    }

    #[test]
    fn test_author_discard() {
        let tree = dom::parse(
            r#"<div class="sidebar"><div class="author">Jenny Smith</div></div><time>today</time>"#,
        );
        assert_eq!(META_AUTHOR_DISCARD.query_all(&tree, tree.root()).len(), 2);
    }

    #[test]
    fn test_category_links_need_href() {
        let html = r#"<div class="entry-meta"><a>None</a><a href="/category/news">News</a></div>"#;
        assert_eq!(first_text(&META_CATEGORIES, html).as_deref(), Some("News"));
    }

    #[test]
    fn test_tag_links() {
        let html = r#"<section class="post-topics"><a href="/tag/rust">rust</a></section>"#;
        assert_eq!(first_text(&META_TAGS, html).as_deref(), Some("rust"));
    }
}
