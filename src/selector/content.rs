//! Content region rules.
//!
//! Each rule finds a likely main-content container. The first rule is the
//! most specific (explicit article-body markers), the last the broadest
//! (`main` elements and `main*` ids).

use crate::etree::NodeRef;
use crate::selector::utils::{contains, is_one_of_tags, lower, starts_with};
use crate::selector::{Rule, RuleSet};

const BLOCK_CONTAINERS: &[&str] = &["article", "div", "main", "section"];

/// Main content rules, most specific first.
pub static CONTENT: RuleSet = RuleSet {
    name: "content",
    rules: &[
        Rule { name: "content-body-markers", matches: article_body_markers },
        Rule { name: "content-article-tag", matches: article_tag },
        Rule { name: "content-story-markers", matches: story_markers },
        Rule { name: "content-generic-content", matches: generic_content },
        Rule { name: "content-main", matches: main_region },
    ],
};

fn article_body_markers(n: NodeRef<'_>) -> bool {
    if !is_one_of_tags(n, BLOCK_CONTAINERS) {
        return false;
    }

    let id = n.element_id();
    let class = n.class();
    let lower_id = lower(id);
    let lower_class = lower(class);

    class == "post"
        || class == "entry"
        || contains(class, "post-text")
        || contains(class, "post_text")
        || contains(class, "post-body")
        || contains(class, "post-entry")
        || contains(class, "postentry")
        || contains(class, "post-content")
        || contains(class, "post_content")
        || contains(&lower_class, "postcontent")
        || contains(class, "post_inner_wrapper")
        || contains(class, "article-text")
        || contains(&lower_class, "articletext")
        || contains(id, "entry-content")
        || contains(class, "entry-content")
        || contains(id, "article-content")
        || contains(class, "article-content")
        || contains(id, "article__content")
        || contains(class, "article__content")
        || contains(id, "article-body")
        || contains(class, "article-body")
        || contains(id, "article__body")
        || contains(class, "article__body")
        || n.attr("itemprop") == "articleBody"
        || contains(&lower_id, "articlebody")
        || contains(&lower_class, "articlebody")
        || id == "articleContent"
        || contains(class, "ArticleContent")
        || contains(class, "page-content")
        || contains(class, "text-content")
        || contains(id, "body-text")
        || contains(class, "body-text")
        || contains(class, "article__container")
        || contains(id, "art-content")
        || contains(class, "art-content")
}

fn article_tag(n: NodeRef<'_>) -> bool {
    n.tag() == "article"
}

fn story_markers(n: NodeRef<'_>) -> bool {
    if !is_one_of_tags(n, BLOCK_CONTAINERS) {
        return false;
    }

    let id = n.element_id();
    let class = n.class();

    contains(class, "post-bodycopy")
        || contains(class, "storycontent")
        || contains(class, "story-content")
        || class == "postarea"
        || class == "art-postcontent"
        || contains(class, "theme-content")
        || contains(class, "blog-content")
        || contains(class, "section-content")
        || contains(class, "single-content")
        || contains(class, "single-post")
        || contains(class, "main-column")
        || contains(class, "wpb_text_column")
        || starts_with(id, "primary")
        || starts_with(class, "article")
        || class == "text"
        || id == "article"
        || class == "cell"
        || id == "story"
        || class == "story"
        || contains(class, "story-body")
        || contains(id, "story-body")
        || contains(class, "field-body")
        || contains(&lower(class), "fulltext")
        || n.attr("role") == "article"
}

fn generic_content(n: NodeRef<'_>) -> bool {
    if !is_one_of_tags(n, BLOCK_CONTAINERS) {
        return false;
    }

    let id = n.element_id();
    let class = n.class();
    let lower_class = lower(class);

    contains(id, "content-main")
        || contains(class, "content-main")
        || contains(class, "content_main")
        || contains(id, "content-body")
        || contains(class, "content-body")
        || contains(id, "contentBody")
        || contains(class, "content__body")
        || contains(&lower(id), "main-content")
        || contains(&lower_class, "main-content")
        || contains(&lower_class, "page-content")
        || id == "content"
        || class == "content"
}

fn main_region(n: NodeRef<'_>) -> bool {
    match n.tag() {
        "main" => true,
        "article" | "div" | "section" => {
            starts_with(n.class(), "main")
                || starts_with(n.element_id(), "main")
                || starts_with(n.attr("role"), "main")
        }
        _ => false,
    }
}
