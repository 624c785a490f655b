//! Comment section rules.

use crate::etree::NodeRef;
use crate::selector::utils::{contains, is_one_of_tags, lower, starts_with};
use crate::selector::{Rule, RuleSet};

const COMMENT_CONTAINERS: &[&str] = &["div", "ol", "ul", "dl", "section"];

/// Comment section containers, most specific first.
pub static COMMENTS: RuleSet = RuleSet {
    name: "comments",
    rules: &[
        Rule { name: "comments-list", matches: comment_list },
        Rule { name: "comments-prefix", matches: comment_prefix },
        Rule { name: "comments-widgets", matches: comment_widgets },
        Rule { name: "comments-generic", matches: comment_generic },
    ],
};

/// Parts of a comment section that are not comments.
pub static DISCARDED_COMMENTS: RuleSet = RuleSet {
    name: "discarded-comments",
    rules: &[
        Rule { name: "comments-respond-form", matches: respond_form },
        Rule { name: "comments-citations", matches: citation },
        Rule { name: "comments-debris", matches: comment_debris },
    ],
};

/// Comment sections removed from the document when comments are excluded
/// under `Focus::FavorPrecision`.
pub static REMOVED_COMMENTS: RuleSet = RuleSet {
    name: "removed-comments",
    rules: &[Rule { name: "comments-removed", matches: removed_section }],
};

fn comment_list(n: NodeRef<'_>) -> bool {
    if !is_one_of_tags(n, COMMENT_CONTAINERS) {
        return false;
    }
    let id = n.element_id();
    let class = n.class();

    contains(id, "commentlist")
        || contains(class, "commentlist")
        || contains(class, "comment-page")
        || contains(id, "comment-list")
        || contains(class, "comment-list")
        || contains(class, "comments-list")
        || contains(class, "comments-content")
        || contains(class, "post-comments")
}

fn comment_prefix(n: NodeRef<'_>) -> bool {
    if !is_one_of_tags(n, COMMENT_CONTAINERS) {
        return false;
    }
    let id = n.element_id();
    let class = n.class();

    starts_with(id, "comments")
        || starts_with(&lower(class), "comments")
        || starts_with(id, "comment-")
        || starts_with(class, "comment-")
        || contains(class, "article-comments")
}

fn comment_widgets(n: NodeRef<'_>) -> bool {
    if !is_one_of_tags(n, COMMENT_CONTAINERS) {
        return false;
    }
    let id = n.element_id();
    starts_with(id, "comol") || starts_with(id, "disqus_thread") || starts_with(id, "dsq_comments")
}

fn comment_generic(n: NodeRef<'_>) -> bool {
    matches!(n.tag(), "div" | "section")
        && (starts_with(n.element_id(), "social") || contains(n.class(), "comment"))
}

fn respond_form(n: NodeRef<'_>) -> bool {
    matches!(n.tag(), "div" | "section") && starts_with(n.element_id(), "respond")
}

fn citation(n: NodeRef<'_>) -> bool {
    matches!(n.tag(), "cite" | "quote")
}

fn comment_debris(n: NodeRef<'_>) -> bool {
    let id = n.element_id();
    let class = n.class();

    class == "comments-title"
        || contains(class, "comments-title")
        || contains(class, "nocomments")
        || starts_with(id, "reply-")
        || starts_with(class, "reply-")
        || contains(class, "-reply-")
        || contains(class, "message")
        || contains(class, "signin")
        || contains(id, "akismet")
        || contains(class, "akismet")
        || contains(n.attr("style"), "display:none")
}

fn removed_section(n: NodeRef<'_>) -> bool {
    if !is_one_of_tags(n, COMMENT_CONTAINERS) {
        return false;
    }
    let id = n.element_id();
    let class = n.class();

    starts_with(&lower(id), "comment")
        || starts_with(&lower(class), "comment")
        || contains(class, "article-comments")
        || contains(class, "post-comments")
        || starts_with(id, "comol")
        || starts_with(id, "disqus_thread")
        || starts_with(id, "dsq-comments")
}
