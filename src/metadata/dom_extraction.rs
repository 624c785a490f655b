//! Metadata from the document body.
//!
//! These run after the meta tags and JSON-LD and only for fields that are
//! still empty.

use std::sync::LazyLock;

use regex::Regex;

use crate::etree::{NodeId, Tree};
use crate::html_processing::prune_unwanted_nodes;
use crate::selector::meta::{META_AUTHOR, META_AUTHOR_DISCARD, META_CATEGORIES, META_TAGS, META_TITLE};
use crate::selector::{self, RuleSet};
use crate::url_utils;
use crate::utils::{char_len, trim};

use super::author::normalize_authors;
use super::meta_tags::{head_metas, parse_meta_date};
use super::uniquify_lists;

#[allow(clippy::expect_used)]
static TITLE_SPLIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(.+)?\s+[–•·—|⁄*⋆~‹«<›»>:-]\s+(.+)$").expect("valid regex")
});

#[allow(clippy::expect_used)]
static CATEGORY_HREF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)/categor(?:y|ies)/").expect("valid regex"));

#[allow(clippy::expect_used)]
static TAG_HREF: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)/tags?/").expect("valid regex"));

#[allow(clippy::expect_used)]
static COMMA_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*[,;]\s*").expect("valid regex"));

#[allow(clippy::expect_used)]
static CC_LICENSE_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/(by-nc-nd|by-nc-sa|by-nc|by-nd|by-sa|by|zero)/([1-9]\.[0-9])").expect("valid regex")
});

#[allow(clippy::expect_used)]
static CC_LICENSE_TEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(cc|creative commons) (by-nc-nd|by-nc-sa|by-nc|by-nd|by-sa|by|zero) ?([1-9]\.[0-9])?")
        .expect("valid regex")
});

const TITLE_MAX_LEN: usize = 200;
const AUTHOR_MAX_LEN: usize = 120;

/// The `<title>` text and, when it holds a separator such as `" - "` or
/// `" | "`, the parts before and after it.
#[must_use]
pub fn examine_title_element(tree: &Tree) -> (String, String, String) {
    let title = tree
        .find(tree.root(), |n| n.tag() == "title" && n.parent().is_some_and(|p| p.tag() == "head"))
        .map(|id| trim(&tree.text_content(id)))
        .unwrap_or_default();

    let (first, second) = TITLE_SPLIT
        .captures(&title)
        .map(|caps| {
            let part = |i| caps.get(i).map(|m| m.as_str().trim().to_string()).unwrap_or_default();
            (part(1), part(2))
        })
        .unwrap_or_default();

    (title, first, second)
}

/// First text matched by the rules of `rules` whose length is above two and
/// below `limit` characters.
fn meta_selector_text(tree: &Tree, root: NodeId, rules: &RuleSet, limit: usize) -> Option<String> {
    rules.rules.iter().find_map(|rule| {
        selector::query_all(tree, root, rule).into_iter().find_map(|id| {
            let text = trim(&tree.iter_text(id, " "));
            let len = char_len(&text);
            (len > 2 && len < limit).then_some(text)
        })
    })
}

/// Title from the page body.
///
/// A lone `<h1>`, then the title rules, then the part of `<title>` without
/// a dot, then the first `<h1>` or `<h2>`.
#[must_use]
pub fn extract_dom_title(tree: &Tree) -> Option<String> {
    let root = tree.root();
    let h1s = tree.descendants_tags(root, &["h1"]);
    if let [h1] = h1s.as_slice() {
        let title = trim(&tree.text_content(*h1));
        if !title.is_empty() {
            return Some(title);
        }
    }

    if let Some(title) = meta_selector_text(tree, root, &META_TITLE, TITLE_MAX_LEN) {
        return Some(title);
    }

    let (mut title, first, second) = examine_title_element(tree);
    if !first.is_empty() && !first.contains('.') {
        title = first;
    } else if !second.is_empty() && !second.contains('.') {
        title = second;
    }
    if !title.is_empty() {
        return Some(title);
    }

    h1s.first()
        .copied()
        .or_else(|| tree.descendants_tags(root, &["h2"]).first().copied())
        .map(|id| trim(&tree.text_content(id)))
        .filter(|title| !title.is_empty())
}

/// Author from a byline, searched in a copy of the page without comments,
/// sidebars and other regions that name people who did not write it.
#[must_use]
pub fn extract_dom_author(tree: &Tree) -> Option<String> {
    let mut scratch = tree.subtree(tree.root());
    let root = scratch.root();
    let pruned = prune_unwanted_nodes(&mut scratch, root, &META_AUTHOR_DISCARD, false);

    let text = meta_selector_text(&scratch, pruned, &META_AUTHOR, AUTHOR_MAX_LEN)?;
    let author = normalize_authors("", &text);
    (!author.is_empty()).then_some(author)
}

/// URL from the canonical link, or the `x-default` alternate link.
///
/// Relative links are completed with the scheme and host of the first
/// `og:` or `twitter:` meta whose content is an absolute URL.
#[must_use]
pub fn extract_dom_url(tree: &Tree) -> Option<String> {
    let root = tree.root();
    let link = tree
        .find(root, |n| n.tag() == "link" && n.attr("rel") == "canonical" && n.has_attr("href"))
        .or_else(|| {
            tree.find(root, |n| {
                n.tag() == "link" && n.attr("rel") == "alternate" && n.attr("hreflang") == "x-default"
            })
        })?;

    let mut url = trim(tree.attr(link, "href").unwrap_or_default());
    if url.is_empty() {
        return None;
    }

    if url.starts_with('/') {
        let base = head_metas(tree).into_iter().find_map(|meta| {
            let name = trim(tree.attr(meta, "name").unwrap_or_default());
            let kind = if name.is_empty() {
                trim(tree.attr(meta, "property").unwrap_or_default())
            } else {
                name
            };
            if !kind.starts_with("og:") && !kind.starts_with("twitter:") {
                return None;
            }
            url_utils::base_url(&trim(tree.attr(meta, "content").unwrap_or_default()))
        });
        if let Some(base) = base {
            url = format!("{base}{url}");
        }
    }

    Some(url)
}

/// Site name from the part of `<title>` that contains a dot.
#[must_use]
pub fn extract_dom_sitename(tree: &Tree) -> Option<String> {
    let (_, first, second) = examine_title_element(tree);
    if !first.is_empty() && first.contains('.') {
        Some(first)
    } else if !second.is_empty() && second.contains('.') {
        Some(second)
    } else {
        None
    }
}

/// Text of the links found by the first rule of `rules` that yields any
/// link whose href matches `href`.
fn link_texts(tree: &Tree, rules: &RuleSet, href: &Regex) -> Vec<String> {
    let root = tree.root();
    for rule in rules.rules {
        let texts: Vec<String> = selector::query_all(tree, root, rule)
            .into_iter()
            .filter(|&id| href.is_match(&trim(tree.attr(id, "href").unwrap_or_default())))
            .map(|id| trim(&tree.text_content(id)))
            .filter(|text| !text.is_empty())
            .collect();
        if !texts.is_empty() {
            return texts;
        }
    }
    Vec::new()
}

/// Categories from category links, else from `article:section` and
/// `*subject*` metas.
#[must_use]
pub fn extract_dom_categories(tree: &Tree) -> Vec<String> {
    let mut categories = link_texts(tree, &META_CATEGORIES, &CATEGORY_HREF);

    if categories.is_empty() {
        categories = head_metas(tree)
            .into_iter()
            .filter(|&meta| {
                tree.attr(meta, "property") == Some("article:section")
                    || tree.attr(meta, "name").is_some_and(|name| name.contains("subject"))
            })
            .map(|meta| trim(tree.attr(meta, "content").unwrap_or_default()))
            .filter(|content| !content.is_empty())
            .collect();
    }

    uniquify_lists(&categories)
}

/// Tags from tag links.
#[must_use]
pub fn extract_dom_tags(tree: &Tree) -> Vec<String> {
    uniquify_lists(&link_texts(tree, &META_TAGS, &TAG_HREF))
}

/// Split entries on commas and semicolons and drop the empty pieces.
#[must_use]
pub fn clean_cat_tags(entries: &[String]) -> Vec<String> {
    entries
        .iter()
        .flat_map(|entry| COMMA_SEPARATOR.split(entry))
        .map(trim)
        .filter(|item| !item.is_empty())
        .collect()
}

/// Date from the first `<time datetime>` that parses.
#[must_use]
pub fn extract_dom_date(tree: &Tree) -> Option<chrono::DateTime<chrono::Utc>> {
    tree.find_all(tree.root(), |n| n.tag() == "time" && n.has_attr("datetime"))
        .into_iter()
        .find_map(|id| parse_meta_date(tree.attr(id, "datetime").unwrap_or_default()))
}

/// License from `rel="license"` links, else from Creative Commons links in
/// the footer.
#[must_use]
pub fn extract_license(tree: &Tree) -> Option<String> {
    let root = tree.root();

    let labeled = tree.find_all(root, |n| n.tag() == "a" && n.attr("rel") == "license" && n.has_attr("href"));
    if let Some(license) = labeled.into_iter().find_map(|id| parse_license_element(tree, id, false)) {
        return Some(license);
    }

    tree.find_all(root, |n| {
        n.tag() == "a"
            && n.has_attr("href")
            && n.ancestors().any(|a| {
                a.tag() == "footer"
                    || (a.tag() == "div" && (a.class().contains("footer") || a.element_id().contains("footer")))
            })
    })
    .into_iter()
    .find_map(|id| parse_license_element(tree, id, true))
}

/// Read a license from a link: a Creative Commons href gives `"CC TYPE
/// VERSION"`. Otherwise the link text is taken as is, or, when `strict`,
/// only if it names a Creative Commons license.
fn parse_license_element(tree: &Tree, id: NodeId, strict: bool) -> Option<String> {
    let href = trim(tree.attr(id, "href").unwrap_or_default());
    if let Some(caps) = CC_LICENSE_HREF.captures(&href) {
        return Some(format!("CC {} {}", caps[1].to_uppercase(), &caps[2]));
    }

    let text = trim(tree.text(id));
    if text.is_empty() {
        return None;
    }
    if !strict {
        return Some(text);
    }
    CC_LICENSE_TEXT.find(&text).map(|m| m.as_str().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;

    #[test]
    fn test_single_h1_title() {
        let tree = dom::parse("<html><head><title>Other - Site</title></head><body><h1>Main Heading</h1></body></html>");
        assert_eq!(extract_dom_title(&tree).as_deref(), Some("Main Heading"));
    }

    #[test]
    fn test_title_element_split() {
        let tree = dom::parse(
            "<html><head><title>Big Story Today | example.com</title></head><body><p>x</p></body></html>",
        );
        assert_eq!(extract_dom_title(&tree).as_deref(), Some("Big Story Today"));
        assert_eq!(extract_dom_sitename(&tree).as_deref(), Some("example.com"));

        let (title, first, second) = examine_title_element(&tree);
        assert_eq!(title, "Big Story Today | example.com");
        assert_eq!(first, "Big Story Today");
        assert_eq!(second, "example.com");
    }

    #[test]
    fn test_title_falls_back_to_h2() {
        let tree = dom::parse("<html><body><h2>Second Level</h2></body></html>");
        assert_eq!(extract_dom_title(&tree).as_deref(), Some("Second Level"));
    }

    #[test]
    fn test_author_in_sidebar_ignored() {
        let tree = dom::parse(
            r#"<html><body><div class="sidebar"><div class="author">Jenny Smith</div></div></body></html>"#,
        );
        assert!(extract_dom_author(&tree).is_none());
    }

    #[test]
    fn test_url_completed_from_meta() {
        let tree = dom::parse(
            r#"<html><head>
                <link rel="canonical" href="/news/story">
                <meta property="og:image" content="https://cdn.example.org/a.jpg">
            </head><body></body></html>"#,
        );
        assert_eq!(extract_dom_url(&tree).as_deref(), Some("https://cdn.example.org/news/story"));
    }

    #[test]
    fn test_alternate_url() {
        let tree = dom::parse(
            r#"<html><head><link rel="alternate" hreflang="x-default" href="https://example.com/en"></head><body></body></html>"#,
        );
        assert_eq!(extract_dom_url(&tree).as_deref(), Some("https://example.com/en"));
    }

    #[test]
    fn test_category_fallback_to_meta() {
        let tree = dom::parse(
            r#"<html><head><meta property="article:section" content="Science"></head><body></body></html>"#,
        );
        assert_eq!(extract_dom_categories(&tree), vec!["Science"]);
    }

    #[test]
    fn test_clean_cat_tags() {
        let entries = vec!["a, b;c".to_string(), " ".to_string(), "d".to_string()];
        assert_eq!(clean_cat_tags(&entries), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_time_datetime() {
        let tree = dom::parse(r#"<html><body><time datetime="2023-12-24">Dec 24</time></body></html>"#);
        let Some(date) = extract_dom_date(&tree) else {
            panic!("expected a date");
        };
        assert_eq!(date.to_rfc3339(), "2023-12-24T00:00:00+00:00");
    }

    #[test]
    fn test_license() {
        let tree = dom::parse(
            r#"<html><body><a rel="license" href="https://creativecommons.org/licenses/by-sa/4.0/">License</a></body></html>"#,
        );
        assert_eq!(extract_license(&tree).as_deref(), Some("CC BY-SA 4.0"));

        let tree = dom::parse(
            r#"<html><body><footer><a href="/about">About us</a><a href="/legal">CC BY 4.0</a></footer></body></html>"#,
        );
        assert_eq!(extract_license(&tree).as_deref(), Some("CC BY 4.0"));

        let tree = dom::parse(r#"<html><body><footer><a href="/about">About us</a></footer></body></html>"#);
        assert!(extract_license(&tree).is_none());
    }
}
