//! Fallback extraction.
//!
//! Two safety nets back the main extractor: an external readability pass
//! whose result replaces ours when it is clearly better, and a baseline
//! scraper (JSON-LD article bodies, `<article>`, loose paragraphs) used when
//! everything else came back too short.

use std::collections::HashSet;

use serde_json::Value;

use crate::etree::{NodeId, Tree};
use crate::html_processing::{doc_cleaning, prune_unwanted_nodes};
use crate::options::Options;
use crate::selector::discard::OVERALL_DISCARDED;
use crate::utils::{char_len, trim, unescape_html};

use super::state::ExtractionState;
use super::tags::{is_in, HEAD_TAGS, TAGS_TO_SANITIZE, VALID_TAG_CATALOG};

/// Texts of at least this many characters end the baseline search.
const BASELINE_MIN_TEXT: usize = 100;

// === Baseline ===

/// Search a JSON-LD value depth-first for a non-empty `articleBody` string.
fn find_article_body(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => map.iter().find_map(|(key, value)| match value {
            Value::String(text) if key.eq_ignore_ascii_case("articlebody") => {
                let text = trim(text);
                if text.is_empty() {
                    None
                } else if text.contains("<p>") {
                    let fragment = dom_query::Document::from(text.as_str());
                    Some(trim(&fragment.select("body").text()))
                } else {
                    Some(text)
                }
            }
            Value::Object(_) | Value::Array(_) => find_article_body(value),
            _ => None,
        }),
        Value::Array(items) => items.iter().find_map(find_article_body),
        _ => None,
    }
}

fn json_ld_article_bodies(tree: &Tree, root: NodeId) -> Vec<String> {
    tree.iter(root)
        .into_iter()
        .filter(|&id| {
            tree.tag(id) == "script" && tree.attr(id, "type") == Some("application/ld+json")
        })
        .filter_map(|script| {
            let raw = unescape_html(tree.text_content(script).trim());
            if raw.is_empty() {
                return None;
            }
            let value: Value = serde_json::from_str(&raw).ok()?;
            find_article_body(&value)
        })
        .collect()
}

fn basic_cleaning(tree: &mut Tree, root: NodeId) {
    for id in tree.iter_tags(root, &["aside", "footer", "script", "style"]).into_iter().rev() {
        tree.remove(id, true);
    }
}

/// Baseline extraction: the JSON-LD article body, then the `<article>`
/// element, then unique text paragraphs, then the whole `<body>` text.
///
/// Scripts, styles, asides and footers below `root` are removed in the
/// process, so callers pass a copy. Returns a detached `<body>` of `<p>`
/// elements and its text.
pub fn baseline(tree: &mut Tree, root: NodeId) -> (NodeId, String) {
    let body = tree.create_element("body");
    let mut texts: Vec<String> = Vec::new();

    let push = |tree: &mut Tree, texts: &mut Vec<String>, text: String| {
        let p = tree.sub_element(body, "p");
        tree.set_text(p, text.as_str());
        texts.push(text);
    };

    for article_body in json_ld_article_bodies(tree, root) {
        push(tree, &mut texts, article_body);
    }
    let text = trim(&texts.join(" "));
    if char_len(&text) > BASELINE_MIN_TEXT {
        return (body, text);
    }

    basic_cleaning(tree, root);

    if let Some(article) = tree.find(root, |n| n.tag() == "article") {
        let article_text = trim(&tree.text_content(article));
        if char_len(&article_text) > BASELINE_MIN_TEXT {
            push(tree, &mut texts, article_text);
        }
    }
    if !tree.children(body).is_empty() {
        return (body, trim(&texts.join(" ")));
    }

    let mut seen = HashSet::new();
    for element in tree.iter_tags(root, &["blockquote", "pre", "q", "code", "p"]) {
        let entry = trim(&tree.text_content(element));
        if seen.insert(entry.clone()) {
            push(tree, &mut texts, entry);
        }
    }
    let text = trim(&texts.join(" "));
    if char_len(&text) > BASELINE_MIN_TEXT {
        return (body, text);
    }

    if let Some(page_body) = tree.find(root, |n| n.tag() == "body") {
        let text = trim(&tree.iter_text(page_body, "\n"));
        if char_len(&text) > BASELINE_MIN_TEXT {
            let fresh = tree.create_element("body");
            let p = tree.sub_element(fresh, "p");
            tree.set_text(p, text.as_str());
            return (fresh, text);
        }
    }

    let text = trim(&tree.text_content(root));
    let fresh = tree.create_element("body");
    let p = tree.sub_element(fresh, "p");
    tree.set_text(p, text.as_str());
    (fresh, text)
}

// === External comparison ===

/// Decide whether an external candidate should replace the extracted body.
#[must_use]
pub fn candidate_is_usable(
    tree: &Tree,
    candidate: NodeId,
    extracted: NodeId,
    len_candidate: usize,
    len_extracted: usize,
    options: &Options,
) -> bool {
    let min_size = options.config.min_extracted_size;
    let recall = options.focus.is_recall();

    let usable = if len_candidate == 0 || len_candidate == len_extracted {
        false
    } else if len_extracted == 0 {
        true
    } else if len_extracted > 2 * len_candidate {
        false
    } else if len_candidate > 2 * len_extracted {
        true
    } else {
        let paragraphs = tree.descendants_tags(extracted, &["p"]);
        let tables = tree.descendants_tags(extracted, &["table"]);
        let heads = tree.descendants_tags(extracted, HEAD_TAGS);
        let candidate_headings = tree.descendants_tags(candidate, &["h2", "h3", "h4"]);
        let paragraph_length: usize = paragraphs
            .iter()
            .map(|&p| char_len(&trim(&tree.iter_text(p, " "))))
            .sum();

        (paragraph_length == 0 && len_candidate > min_size * 2)
            || (tables.len() > paragraphs.len() && len_candidate > min_size * 2)
            || (recall
                && heads.is_empty()
                && !candidate_headings.is_empty()
                && len_candidate > len_extracted)
    };

    usable || (len_extracted < min_size && recall)
}

/// Clean up the output of an external extractor (or our own, when it was
/// kept) so only valid output tags remain.
pub fn sanitize_tree(tree: &mut Tree, root: NodeId, options: &Options) {
    doc_cleaning(tree, root, options);

    for id in tree.descendants(root).into_iter().rev() {
        if is_in(TAGS_TO_SANITIZE, tree.tag(id)) {
            tree.remove(id, true);
        }
    }

    if !options.include_links {
        tree.strip_tags(root, &["a"]);
    }
    tree.strip_tags(root, &["span"]);

    let mut invalid: Vec<String> = Vec::new();
    for id in tree.descendants(root) {
        let tag = tree.tag(id);
        if !is_in(VALID_TAG_CATALOG, tag) && !invalid.iter().any(|t| t == tag) {
            invalid.push(tag.to_string());
        }
    }
    if !invalid.is_empty() {
        let tags: Vec<&str> = invalid.iter().map(String::as_str).collect();
        tree.strip_tags(root, &tags);
    }
}

/// Run readability over a copy of the page and import its article body.
#[cfg(feature = "readability")]
fn readability_candidate(tree: &mut Tree, doc: NodeId, options: &Options) -> Option<NodeId> {
    use dom_query::Document;
    use dom_smoothie::Readability;

    let document = Document::from(crate::dom::to_html(tree, doc));
    let url = options.original_url.as_ref().map(url::Url::as_str);
    let mut reader = Readability::with_document(document, url, None).ok()?;
    let article = reader.parse().ok()?;

    let content = Document::from(article.content.to_string());
    let selection = content.select("body");
    let node = selection.nodes().first()?;
    let candidate = crate::dom::from_node(node);
    Some(tree.import(&candidate, candidate.root()))
}

#[cfg(not(feature = "readability"))]
fn readability_candidate(_tree: &mut Tree, _doc: NodeId, _options: &Options) -> Option<NodeId> {
    None
}

/// Compare the extracted body with the external extractors' output and keep
/// the better one, sanitized.
///
/// `original` is an untouched copy of the page.
pub fn compare_external_extraction(
    tree: &mut Tree,
    original: NodeId,
    extracted: NodeId,
    state: &ExtractionState<'_>,
) -> (NodeId, String) {
    let options = state.options;
    let min_size = options.config.min_extracted_size;

    let extracted_text = trim(&tree.iter_text(extracted, " "));
    let mut len_extracted = char_len(&extracted_text);
    if options.focus.is_recall() && len_extracted > min_size * 10 {
        return (extracted, extracted_text);
    }

    let url = options
        .original_url
        .as_ref()
        .map(ToString::to_string)
        .unwrap_or_default();
    state
        .observer
        .info(format_args!("trying external extractor for url {url:?}"));

    let cleaned = if options.focus.is_precision() {
        prune_unwanted_nodes(tree, original, &OVERALL_DISCARDED, false)
    } else {
        tree.deep_clone(original)
    };

    let mut result = extracted;
    if let Some(candidate) = readability_candidate(tree, cleaned, options) {
        let len_candidate = char_len(&trim(&tree.iter_text(candidate, " ")));
        state.observer.info(format_args!(
            "comparison for readability: candidate {len_candidate} vs extracted {len_extracted}"
        ));

        if candidate_is_usable(tree, candidate, result, len_candidate, len_extracted, options) {
            state.debug(format_args!("candidate readability is usable"));
            result = candidate;
            len_extracted = len_candidate;
        }
        if len_extracted >= min_size {
            state.debug(format_args!("candidate readability is used"));
        }
    }

    sanitize_tree(tree, result, options);
    let text = trim(&tree.iter_text(result, " "));
    (result, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;
    use crate::options::Focus;

    const LONG: &str = "This sentence is repeated to build a text that is clearly longer than the baseline threshold of one hundred characters.";

    #[test]
    fn test_baseline_json_ld() {
        let html = format!(
            r#"<html><head><script type="application/ld+json">
            {{"@graph": [{{"@type": "NewsArticle", "articleBody": "{LONG}"}}]}}
            </script></head><body><p>Unrelated.</p></body></html>"#
        );
        let mut tree = dom::parse(&html);
        let root = tree.root();
        let (body, text) = baseline(&mut tree, root);
        assert_eq!(text, LONG);
        assert_eq!(tree.children(body).len(), 1);
    }

    #[test]
    fn test_baseline_json_ld_html_body() {
        let value: Value = serde_json::json!({
            "articleBody": "<p>First part.</p><p>Second part.</p>",
        });
        assert_eq!(
            find_article_body(&value).as_deref(),
            Some("First part.Second part.")
        );
    }

    #[test]
    fn test_baseline_article() {
        let html = format!(
            "<html><body><aside>Aside text</aside><article>{LONG}<footer>Footer</footer></article></body></html>"
        );
        let mut tree = dom::parse(&html);
        let root = tree.root();
        let (_, text) = baseline(&mut tree, root);
        assert_eq!(text, LONG);
    }

    #[test]
    fn test_baseline_paragraphs_are_unique() {
        let html = format!("<html><body><p>{LONG}</p><p>{LONG}</p><q>Short quote</q></body></html>");
        let mut tree = dom::parse(&html);
        let root = tree.root();
        let (body, text) = baseline(&mut tree, root);
        assert_eq!(tree.children(body).len(), 2);
        assert!(text.starts_with(LONG));
        assert!(text.ends_with("Short quote"));
    }

    #[test]
    fn test_baseline_short_page() {
        let mut tree = dom::parse("<html><body><div>Tiny page</div></body></html>");
        let root = tree.root();
        let (body, text) = baseline(&mut tree, root);
        assert_eq!(text, "Tiny page");
        assert_eq!(tree.children(body).len(), 1);
    }

    fn bodies(extracted: &str, candidate: &str) -> (Tree, NodeId, NodeId) {
        let mut tree = Tree::new("html");
        let root = tree.root();
        let a = tree.sub_element(root, "body");
        let b = tree.sub_element(root, "body");
        let p = tree.sub_element(a, "p");
        tree.set_text(p, extracted);
        let h = tree.sub_element(b, "h2");
        tree.set_text(h, "Heading");
        let p = tree.sub_element(b, "p");
        tree.set_text(p, candidate);
        (tree, a, b)
    }

    #[test]
    fn test_candidate_length_rules() {
        let options = Options::default();
        let (tree, extracted, candidate) = bodies("x", "y");

        assert!(!candidate_is_usable(&tree, candidate, extracted, 0, 10, &options));
        assert!(!candidate_is_usable(&tree, candidate, extracted, 10, 10, &options));
        assert!(candidate_is_usable(&tree, candidate, extracted, 10, 0, &options));
        assert!(!candidate_is_usable(&tree, candidate, extracted, 100, 300, &options));
        assert!(candidate_is_usable(&tree, candidate, extracted, 700, 300, &options));
        assert!(!candidate_is_usable(&tree, candidate, extracted, 400, 300, &options));
    }

    #[test]
    fn test_candidate_borderline_recall_headings() {
        let (tree, extracted, candidate) = bodies("x", "y");
        let recall = Options::default().with_focus(Focus::FavorRecall);
        assert!(candidate_is_usable(&tree, candidate, extracted, 400, 300, &recall));
    }

    #[test]
    fn test_candidate_borderline_empty_paragraphs() {
        let mut tree = Tree::new("html");
        let root = tree.root();
        let extracted = tree.sub_element(root, "body");
        let list = tree.sub_element(extracted, "ul");
        tree.set_text(list, "list text only");
        let candidate = tree.sub_element(root, "body");

        let options = Options::default();
        assert!(candidate_is_usable(&tree, candidate, extracted, 600, 400, &options));
    }

    #[test]
    fn test_sanitize_tree() {
        let mut tree = dom::parse(
            r#"<html><body><div id="out"><p>Kept <span>span</span> <a href="/x">link</a></p><button>Click</button><custom-tag>Custom</custom-tag></div></body></html>"#,
        );
        let Some(out) = tree.find(tree.root(), |n| n.element_id() == "out") else {
            panic!("no output div");
        };
        sanitize_tree(&mut tree, out, &Options::default());

        assert!(tree.descendants_tags(out, &["span", "a", "button", "custom-tag"]).is_empty());
        let text = tree.text_content(out);
        assert!(text.contains("Kept span link"));
        assert!(!text.contains("Click"));
        assert!(text.contains("Custom"));
    }

    #[test]
    fn test_recall_bypass_keeps_extraction() {
        let options = Options::default().with_focus(Focus::FavorRecall);
        let observer = crate::observer::SilentObserver;
        let mut cache = crate::cache::DedupCache::new(8);
        let state = ExtractionState::new(&options, &observer, &mut cache);

        let mut tree = dom::parse("<html><body><p>Original</p></body></html>");
        let root = tree.root();
        let extracted = tree.create_element("body");
        let p = tree.sub_element(extracted, "p");
        tree.set_text(p, LONG.repeat(30));

        let (kept, text) = compare_external_extraction(&mut tree, root, extracted, &state);
        assert_eq!(kept, extracted);
        assert_eq!(text, LONG.repeat(30));
    }

    #[cfg(feature = "readability")]
    fn readability_page() -> String {
        let paragraphs: String = (0..6)
            .map(|i| format!("<p>Paragraph {i}. {LONG} {LONG}</p>"))
            .collect();
        format!(
            r#"<html><head><title>Readable</title></head><body>
            <nav><a href="/">Home</a> <a href="/about">About</a></nav>
            <article><h1>Readable</h1>{paragraphs}</article>
            <footer><p>Footer links</p></footer>
            </body></html>"#
        )
    }

    #[cfg(feature = "readability")]
    #[test]
    fn test_readability_candidate_imports_article() {
        let mut tree = dom::parse(&readability_page());
        let root = tree.root();
        let Some(candidate) = readability_candidate(&mut tree, root, &Options::default()) else {
            panic!("expected a readability candidate");
        };
        assert_eq!(tree.parent(candidate), None);
        let text = trim(&tree.iter_text(candidate, " "));
        assert!(text.contains("Paragraph 0."));
        assert!(text.contains("Paragraph 5."));
        assert!(text.contains(LONG));
    }

    #[cfg(feature = "readability")]
    #[test]
    fn test_readability_replaces_empty_extraction() {
        let options = Options::default();
        let observer = crate::observer::SilentObserver;
        let mut cache = crate::cache::DedupCache::new(8);
        let state = ExtractionState::new(&options, &observer, &mut cache);

        let mut tree = dom::parse(&readability_page());
        let root = tree.root();
        let extracted = tree.create_element("body");

        let (kept, text) = compare_external_extraction(&mut tree, root, extracted, &state);
        assert_ne!(kept, extracted);
        assert!(text.contains("Paragraph 3."));
        assert!(text.contains(LONG));
    }
}
