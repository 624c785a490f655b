//! Boilerplate rules applied to every content candidate.
//!
//! [`OVERALL_DISCARDED`] covers navigation, sharing widgets, related-post
//! blocks, hidden parts and legal banners. [`TEASER`] and [`PAYWALL`] are
//! narrower sets the pruning pass applies depending on focus.

use crate::etree::NodeRef;
use crate::selector::utils::{contains, id_class, is_one_of_tags, lower, starts_with};
use crate::selector::{Rule, RuleSet};

/// Block-level tags the boilerplate rules look at.
pub(crate) const BOILERPLATE_BLOCKS: &[&str] =
    &["div", "dd", "dt", "li", "ul", "ol", "dl", "p", "section", "span"];

/// Navigation, sharing, related content, hidden nodes and legal notices.
pub static OVERALL_DISCARDED: RuleSet = RuleSet {
    name: "overall-discarded",
    rules: &[
        Rule { name: "discard-navigation-and-widgets", matches: navigation_and_widgets },
        Rule { name: "discard-comment-debris-and-hidden", matches: comment_debris_and_hidden },
        Rule { name: "discard-legal", matches: legal_notices },
    ],
};

/// Teaser blocks, skipped under `Focus::FavorRecall`.
pub static TEASER: RuleSet = RuleSet {
    name: "teaser",
    rules: &[Rule { name: "discard-teaser", matches: teaser }],
};

/// Paywall overlays and obfuscated premium text.
pub static PAYWALL: RuleSet = RuleSet {
    name: "paywall",
    rules: &[Rule { name: "discard-paywall", matches: paywall }],
};

fn navigation_and_widgets(n: NodeRef<'_>) -> bool {
    if !is_one_of_tags(n, BOILERPLATE_BLOCKS) {
        return false;
    }

    let id = n.element_id();
    let class = n.class();
    let both = id_class(n);
    let lower_id = lower(id);

    contains(&lower_id, "footer")
        || contains(&lower(class), "footer")
        || contains(id, "related")
        || contains(class, "elated")
        || contains(&both, "viral")
        || starts_with(&both, "shar")
        || contains(class, "share-")
        || contains(&lower_id, "share")
        || contains(&both, "social")
        || contains(class, "sociable")
        || contains(&both, "syndication")
        || starts_with(id, "jp-")
        || starts_with(id, "dpsp-content")
        || contains(class, "embedded")
        || contains(class, "embed")
        || contains(&both, "newsletter")
        || contains(class, "subnav")
        || contains(&both, "cookie")
        || contains(&both, "tags")
        || contains(class, "tag-list")
        || contains(&both, "sidebar")
        || contains(&both, "banner")
        || contains(class, "bar")
        || contains(class, "meta")
        || contains(id, "menu")
        || contains(class, "menu")
        || contains(&lower_id, "nav")
        || contains(&lower(n.attr("role")), "nav")
        || starts_with(class, "nav")
        || contains(class, "avigation")
        || contains(class, "navbar")
        || contains(class, "navbox")
        || starts_with(class, "post-nav")
        || contains(&both, "breadcrumb")
        || contains(&both, "bread-crumb")
        || contains(&both, "author")
        || contains(&both, "button")
        || contains(&lower(class), "byline")
        || contains(class, "rating")
        || contains(class, "widget")
        || contains(class, "attachment")
        || contains(class, "timestamp")
        || contains(class, "user-info")
        || contains(class, "user-profile")
        || contains(class, "-ad-")
        || contains(class, "-icon")
        || contains(class, "article-infos")
        || contains(class, "nfoline")
        || contains(n.attr("data-component"), "MostPopularStories")
        || contains(class, "outbrain")
        || contains(class, "taboola")
        || contains(class, "criteo")
        || contains(class, "options")
        || contains(class, "expand")
        || contains(class, "consent")
        || contains(class, "modal-content")
        || contains(class, " ad ")
        || contains(class, "permission")
        || contains(class, "next-")
        || contains(class, "-stories")
        || contains(class, "most-popular")
        || contains(class, "mol-factbox")
        || starts_with(class, "ZendeskForm")
        || contains(&both, "message-container")
        || contains(class, "yin")
        || contains(class, "zlylin")
        || contains(class, "xg1")
        || contains(id, "bmdh")
        || contains(class, "slide")
        || contains(class, "viewport")
        || n.has_attr("data-lp-replacement-content")
        || contains(id, "premium")
        || contains(class, "overlay")
        || contains(class, "paid-content")
        || contains(class, "paidcontent")
        || contains(class, "obfuscated")
        || contains(class, "blurred")
}

fn comment_debris_and_hidden(n: NodeRef<'_>) -> bool {
    let id = n.element_id();
    let class = n.class();
    let style = n.attr("style");
    let id_style = format!("{id}{style}");

    class == "comments-title"
        || contains(class, "comments-title")
        || contains(class, "nocomments")
        || starts_with(&id_class(n), "reply-")
        || contains(class, "-reply-")
        || contains(class, "message")
        || contains(id, "reader-comments")
        || contains(id, "akismet")
        || contains(class, "akismet")
        || contains(class, "suggest-links")
        || starts_with(class, "hide-")
        || contains(class, "-hide-")
        || contains(class, "hide-print")
        || contains(&id_style, "hidden")
        || contains(class, " hidden")
        || contains(class, " hide")
        || contains(class, "noprint")
        || contains(style, "display:none")
        || contains(style, "display: none")
        || n.attr("aria-hidden") == "true"
        || contains(class, "notloaded")
}

fn legal_notices(n: NodeRef<'_>) -> bool {
    let tag = n.tag();
    let id = n.element_id();

    if tag == "script" && contains(&lower(n.attr("src")), "cookielaw") {
        return true;
    }
    if tag == "footer" || id == "onetrust-consent-sdk" || starts_with(id, "ot-sdk") {
        return true;
    }

    let both = lower(&id_class(n));
    [
        "cookie", "consent", "privacy", "gdpr", "legal", "optanon", "cmp", "truste", "evidon",
        "onetrust",
    ]
    .iter()
    .any(|keyword| contains(&both, keyword))
}

fn teaser(n: NodeRef<'_>) -> bool {
    is_one_of_tags(n, BOILERPLATE_BLOCKS)
        && (contains(&lower(n.element_id()), "teaser") || contains(&lower(n.class()), "teaser"))
}

fn paywall(n: NodeRef<'_>) -> bool {
    if !matches!(n.tag(), "div" | "p") {
        return false;
    }

    let id = n.element_id();
    let class = n.class();

    contains(id, "paywall")
        || contains(id, "premium")
        || contains(class, "paid-content")
        || contains(class, "paidcontent")
        || contains(class, "obfuscated")
        || contains(class, "blurred")
        || contains(class, "restricted")
        || contains(class, "overlay")
}
