//! HTML Processing and Pruning
//!
//! Functions that clean the document before extraction, probe leaf text
//! nodes during extraction and tidy the output trees afterwards.

use crate::error::{Error, Result};
use crate::etree::{is_void_element, NodeId, Tree};
use crate::extractor::state::ExtractionState;
use crate::extractor::tags::{
    is_in, ALLOWED_ATTRIBUTES, ELEMENTS_WITH_SIZE_ATTR, EMPTY_TAGS_TO_REMOVE, LB_TAGS,
    PRESENTATIONAL_ATTRIBUTES, QUOTE_TAGS, TAGS_TO_CLEAN, TAGS_TO_STRIP,
};
use crate::link_density::link_density_test;
use crate::observer::Observer;
use crate::options::Options;
use crate::patterns::{HIGHLIGHT_JS, HTML_LANG, TEXT_FILTER};
use crate::selector::{self, RuleSet};
use crate::url_utils;
use crate::utils::{char_len, text_chars_test, trim};

// === Document Cleaning ===

/// Clean the document by discarding unwanted elements.
///
/// Removes scripts, forms, navigation and similar subtrees, unwraps
/// presentational wrappers and finally deletes empty blocks.
pub fn doc_cleaning(tree: &mut Tree, root: NodeId, options: &Options) {
    let mut cleaning: Vec<&str> = TAGS_TO_CLEAN.to_vec();
    let mut stripping: Vec<&str> = TAGS_TO_STRIP.to_vec();

    if options.exclude_tables {
        cleaning.extend(["table", "td", "th", "tr"]);
    } else {
        for figure in tree.descendants_tags(root, &["figure"]) {
            if !tree.descendants_tags(figure, &["table"]).is_empty() {
                tree.set_tag(figure, "div");
            }
        }
    }

    if options.include_images {
        cleaning.retain(|tag| !matches!(*tag, "figure" | "picture" | "source"));
        stripping.retain(|tag| *tag != "img");
    }

    tree.strip_elements(root, false, &cleaning);
    tree.strip_tags(root, &stripping);
    prune_html(tree, root);
}

/// Delete empty elements among [`EMPTY_TAGS_TO_REMOVE`], deepest first.
pub fn prune_html(tree: &mut Tree, root: NodeId) {
    for id in tree.descendants(root).into_iter().rev() {
        if is_in(EMPTY_TAGS_TO_REMOVE, tree.tag(id))
            && tree.children(id).is_empty()
            && tree.text(id).is_empty()
        {
            tree.remove(id, true);
        }
    }
}

/// Unwrap links that are not kept and sit outside any list or block
/// container.
pub fn simplify_tags(tree: &mut Tree, root: NodeId, options: &Options) {
    if options.include_links {
        return;
    }

    for link in tree.descendants_tags(root, &["a"]).into_iter().rev() {
        let protected = tree.ancestors(link).any(|a| {
            let tag = tree.tag(a);
            tag == "div" || tag == "ul" || (!options.exclude_tables && tag == "table")
        });
        if !protected {
            tree.strip(link);
        }
    }
}

/// Rewrite links and detect code blocks hiding in quote elements.
///
/// Without `include_links`, links below `div`, `ul`, `ol` (and `table` when
/// tables are kept) survive for link-density pruning and every other link is
/// unwrapped. With `include_links`, links keep only `href` and `target`, the
/// `href` made absolute against `original_url`.
pub fn convert_tags(tree: &mut Tree, root: NodeId, options: &Options) {
    if options.include_links {
        for link in tree.descendants_tags(root, &["a"]) {
            let href = trim(tree.attr(link, "href").unwrap_or_default());
            let target = trim(tree.attr(link, "target").unwrap_or_default());
            tree.clear_attrs(link);

            if !href.is_empty() {
                let href = url_utils::resolve(&href, options.original_url.as_ref());
                tree.set_attr(link, "href", &href);
            }
            if !target.is_empty() {
                tree.set_attr(link, "target", &target);
            }
        }
    } else {
        let mut containers = vec!["div", "ul", "ol"];
        if !options.exclude_tables {
            containers.push("table");
        }
        for link in tree.descendants_tags(root, &["a"]).into_iter().rev() {
            let protected = tree.ancestors(link).any(|a| containers.contains(&tree.tag(a)));
            if !protected {
                tree.strip(link);
            }
        }
    }

    for quote in tree.descendants_tags(root, QUOTE_TAGS) {
        let mut is_code = false;

        if tree.tag(quote) == "pre" {
            let children = tree.children(quote);
            is_code = children.len() == 1 && tree.tag(children[0]) == "span";
        }

        let hljs: Vec<NodeId> = tree.find_all(quote, |n| {
            n.tag() == "span" && HIGHLIGHT_JS.is_match(n.class())
        });
        if !hljs.is_empty() {
            is_code = true;
            for span in hljs {
                tree.clear_attrs(span);
            }
        }

        if is_code {
            tree.set_tag(quote, "code");
        }
    }
}

/// Work on a copy of `root` from which every match of `rules` is removed,
/// rule by rule, last match first. Tails of removed nodes are preserved.
///
/// When `with_backup` is set and the pruning leaves a seventh of the text or
/// less, an untouched copy is returned instead. The returned node is always a
/// detached copy.
pub fn prune_unwanted_nodes(
    tree: &mut Tree,
    root: NodeId,
    rules: &RuleSet,
    with_backup: bool,
) -> NodeId {
    let pruned = tree.deep_clone(root);
    let backup = with_backup.then(|| tree.deep_clone(root));
    let old_len = char_len(&tree.text_content(pruned));

    for rule in rules.rules {
        let matches = selector::query_all(tree, pruned, rule);
        for &node in matches.iter().rev() {
            preserve_tail(tree, node);
            tree.remove(node, false);
        }
    }

    if let Some(backup) = backup {
        let new_len = char_len(&tree.text_content(pruned));
        if new_len <= old_len / 7 {
            return backup;
        }
    }
    pruned
}

/// Move a node's tail to the previous sibling's tail, or to its parent's
/// text when it is the first child, separated by a space.
fn preserve_tail(tree: &mut Tree, node: NodeId) {
    let tail = tree.tail(node).to_string();
    if tail.is_empty() {
        return;
    }

    if let Some(previous) = tree.previous_sibling(node) {
        let joined = join_space(tree.tail(previous), &tail);
        tree.set_tail(previous, joined);
    } else if let Some(parent) = tree.parent(node) {
        let joined = join_space(tree.text(parent), &tail);
        tree.set_text(parent, joined);
    }
    tree.set_tail(node, "");
}

fn join_space(head: &str, rest: &str) -> String {
    if head.is_empty() {
        rest.to_string()
    } else {
        format!("{head} {rest}")
    }
}

// === Leaf Handling ===

/// Check whether a node's text is empty or share/print boilerplate.
///
/// The tail is tested instead of the text when the text is empty.
#[must_use]
pub fn text_filter(tree: &Tree, id: NodeId) -> bool {
    let (text, tail) = (tree.text(id), tree.tail(id));
    let test = if text.is_empty() && !tail.is_empty() { tail } else { text };

    !text_chars_test(test) || test.lines().any(|line| TEXT_FILTER.is_match(line))
}

/// Count the node's text in the dedup cache and report whether it was seen
/// too often.
pub fn duplicate_test(tree: &Tree, id: NodeId, state: &mut ExtractionState<'_>) -> bool {
    let key = trim(&tree.iter_text(id, " "));
    let config = &state.options.config;
    state
        .cache
        .check_duplicate(&key, config.min_duplicate_check_size, config.max_duplicate_count)
}

/// Convert, format and probe a potential text element.
///
/// With `fix_comments`, a line break carrying only a tail becomes a
/// paragraph; otherwise line breaks are returned as they are. Without
/// `preserve_spaces` text and tail are whitespace-collapsed.
pub fn handle_text_node(
    tree: &mut Tree,
    id: NodeId,
    state: &mut ExtractionState<'_>,
    fix_comments: bool,
    preserve_spaces: bool,
) -> Option<NodeId> {
    if state.is_done(id) {
        return None;
    }
    let has_children = !tree.children(id).is_empty();
    if !has_children && tree.text(id).is_empty() && tree.tail(id).is_empty() {
        return None;
    }

    let is_lb = is_in(LB_TAGS, tree.tag(id));
    if !fix_comments && is_lb {
        if !preserve_spaces {
            let tail = trim(tree.tail(id));
            tree.set_tail(id, tail);
        }
        return Some(id);
    }

    if tree.text(id).is_empty() && !has_children {
        if fix_comments && is_lb {
            tree.set_tag(id, "p");
        }
        let tail = tree.tail(id).to_string();
        tree.set_text(id, tail);
        tree.set_tail(id, "");
    }

    if !preserve_spaces {
        let (text, tail) = (trim(tree.text(id)), trim(tree.tail(id)));
        tree.set_text(id, text);
        tree.set_tail(id, tail);
    }

    if tree.text(id).is_empty() && text_filter(tree, id) {
        return None;
    }

    if state.options.deduplicate && duplicate_test(tree, id, state) {
        return None;
    }

    Some(id)
}

/// Light variant of [`handle_text_node`]: trims text and tail, promotes the
/// tail of a non-break element with no text, then filters.
pub fn process_node(tree: &mut Tree, id: NodeId, state: &mut ExtractionState<'_>) -> Option<NodeId> {
    if state.is_done(id) {
        return None;
    }
    if tree.children(id).is_empty() && tree.text(id).is_empty() && tree.tail(id).is_empty() {
        return None;
    }

    let (mut text, mut tail) = (trim(tree.text(id)), trim(tree.tail(id)));
    if !is_in(LB_TAGS, tree.tag(id)) && text.is_empty() && !tail.is_empty() {
        text = std::mem::take(&mut tail);
    }
    tree.set_text(id, text);
    tree.set_tail(id, tail);

    if !tree.text(id).is_empty() || !tree.tail(id).is_empty() {
        if text_filter(tree, id) {
            return None;
        }
        if state.options.deduplicate && duplicate_test(tree, id, state) {
            return None;
        }
    }

    Some(id)
}

// === Link Density ===

/// Remove elements among `tags` (the root included) that are rich in links.
///
/// With `backtracking`, link-bearing elements sharing the same short text
/// are removed as well once the text shows up three times or more.
pub fn delete_by_link_density(
    tree: &mut Tree,
    root: NodeId,
    options: &Options,
    backtracking: bool,
    tags: &[&str],
) {
    let mut to_delete = Vec::new();
    let mut groups: Vec<(String, Vec<NodeId>)> = Vec::new();

    for elem in tree.iter_tags(root, tags) {
        let (links, flagged) = link_density_test(tree, elem, options);
        if flagged {
            to_delete.push(elem);
            continue;
        }

        if backtracking && !links.is_empty() {
            let text = trim(&tree.text_content(elem));
            match groups.iter_mut().find(|(key, _)| *key == text) {
                Some((_, nodes)) => nodes.push(elem),
                None => groups.push((text, vec![elem])),
            }
        }
    }

    if backtracking {
        let threshold = if options.focus.is_precision() { 200 } else { 100 };
        for (text, nodes) in groups {
            let length = char_len(&text);
            if length > 0 && length < threshold && nodes.len() >= 3 {
                to_delete.extend(nodes);
            }
        }
    }

    for &node in to_delete.iter().rev() {
        tree.remove(node, false);
    }
}

// === Output Cleaning ===

/// Tidy an output tree: unwrap empty non-void elements (deepest first) and
/// drop presentational, oversized and unknown attributes.
pub fn post_cleaning(tree: &mut Tree, root: NodeId) {
    for id in tree.descendants(root).into_iter().rev() {
        if tree.children(id).is_empty()
            && !text_chars_test(tree.text(id))
            && !is_void_element(tree.tag(id))
        {
            tree.strip(id);
        }
    }

    for id in tree.iter(root) {
        let sized = is_in(ELEMENTS_WITH_SIZE_ATTR, tree.tag(id));
        tree.retain_attrs(id, |name, _| {
            if is_in(PRESENTATIONAL_ATTRIBUTES, name) {
                return false;
            }
            if matches!(name, "width" | "height") && !sized {
                return false;
            }
            is_in(ALLOWED_ATTRIBUTES, name)
        });
    }
}

// === Language ===

/// Check the declared page language against `target`.
///
/// `meta[http-equiv="content-language"]` is consulted first, then
/// `meta[property="og:locale"]`. When such metas exist, one of their
/// two-letter codes must equal `target`. Pages without them pass.
///
/// # Errors
///
/// Returns [`Error::WrongLanguage`] listing the declared codes on mismatch.
pub fn check_html_language(
    tree: &Tree,
    root: NodeId,
    target: &str,
    observer: &dyn Observer,
) -> Result<()> {
    let sources: [fn(&Tree, NodeId) -> bool; 2] = [
        |t, id| {
            t.tag(id) == "meta"
                && t.attr(id, "http-equiv")
                    .is_some_and(|v| v.eq_ignore_ascii_case("content-language"))
        },
        |t, id| t.tag(id) == "meta" && t.attr(id, "property") == Some("og:locale"),
    ];

    for is_source in sources {
        let metas: Vec<NodeId> = tree
            .iter(root)
            .into_iter()
            .filter(|&id| is_source(tree, id))
            .collect();
        if metas.is_empty() {
            continue;
        }

        let mut declared = Vec::new();
        for meta in metas {
            let content = tree.attr(meta, "content").unwrap_or_default();
            for code in HTML_LANG.find_iter(content) {
                let code = code.as_str().to_lowercase();
                if code == target {
                    return Ok(());
                }
                declared.push(code);
            }
        }

        observer.warn(format_args!("html language detection in meta failed"));
        return Err(Error::WrongLanguage {
            expected: target.to_string(),
            found: declared.join(","),
        });
    }

    observer.debug(format_args!("no html language elements found"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::DedupCache;
    use crate::dom;
    use crate::observer::SilentObserver;
    use crate::selector::discard::OVERALL_DISCARDED;

    fn first(tree: &Tree, tag: &str) -> NodeId {
        match tree.find(tree.root(), |n| n.tag() == tag) {
            Some(id) => id,
            None => panic!("no <{tag}> in fixture"),
        }
    }

    #[test]
    fn test_doc_cleaning_removes_and_unwraps() {
        let mut tree = dom::parse(
            r#"<body><script>x()</script><p>Hello <font>big</font> world</p><nav>menu</nav><div></div></body>"#,
        );
        let root = tree.root();
        doc_cleaning(&mut tree, root, &Options::default());
        let body = first(&tree, "body");
        assert_eq!(dom::inner_html(&tree, body), "<p>Hello big world</p>");
    }

    #[test]
    fn test_doc_cleaning_keeps_table_figures() {
        let mut tree = dom::parse(
            r#"<body><figure><table><tr><td>cell</td></tr></table></figure><figure><img src="a.png"></figure></body>"#,
        );
        let root = tree.root();
        doc_cleaning(&mut tree, root, &Options::default());
        assert_eq!(tree.descendants_tags(root, &["div"]).len(), 1);
        assert!(tree.descendants_tags(root, &["figure"]).is_empty());

        let mut tree = dom::parse(r#"<body><figure><img src="a.png"></figure></body>"#);
        let root = tree.root();
        doc_cleaning(&mut tree, root, &Options::default().with_images(true));
        assert_eq!(tree.descendants_tags(root, &["img"]).len(), 1);
    }

    #[test]
    fn test_simplify_tags_protects_container_links() {
        let mut tree = dom::parse(
            r#"<body><p>Read <a href="/x">this</a>.</p><div><a href="/y">menu</a></div></body>"#,
        );
        let root = tree.root();
        simplify_tags(&mut tree, root, &Options::default());
        let links = tree.descendants_tags(root, &["a"]);
        assert_eq!(links.len(), 1);
        assert_eq!(tree.text(first(&tree, "p")), "Read this.");
    }

    #[test]
    fn test_convert_tags_resolves_links() {
        let mut tree = dom::parse(
            r##"<p><a href="/page" class="x" target="_blank">link</a><a href="#top">top</a></p>"##,
        );
        let root = tree.root();
        let options = match url::Url::parse("https://example.org/news/") {
            Ok(url) => Options::default().with_links(true).with_url(url),
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };
        convert_tags(&mut tree, root, &options);
        let links = tree.descendants_tags(root, &["a"]);
        assert_eq!(tree.attr(links[0], "href"), Some("https://example.org/page"));
        assert_eq!(tree.attr(links[0], "target"), Some("_blank"));
        assert!(!tree.has_attr(links[0], "class"));
        assert_eq!(tree.attr(links[1], "href"), Some("#top"));
    }

    #[test]
    fn test_convert_tags_detects_code() {
        let mut tree = dom::parse(
            r#"<pre><span>let x = 1;</span></pre><blockquote><span class="hljs-keyword">fn</span> main</blockquote><q>plain</q>"#,
        );
        let root = tree.root();
        convert_tags(&mut tree, root, &Options::default());
        assert_eq!(tree.descendants_tags(root, &["code"]).len(), 2);
        assert_eq!(tree.descendants_tags(root, &["q"]).len(), 1);
        let span = tree.descendants_tags(root, &["span"])[1];
        assert!(tree.attrs(span).is_empty());
    }

    #[test]
    fn test_prune_unwanted_nodes_preserves_tail() {
        let mut tree = dom::parse(
            r#"<div><p>First paragraph with enough words.</p><div class="share-box">Share</div> tail text<p>Second.</p></div>"#,
        );
        let div = first(&tree, "div");
        let pruned = prune_unwanted_nodes(&mut tree, div, &OVERALL_DISCARDED, false);
        assert_ne!(pruned, div);
        assert!(tree.descendants_tags(pruned, &["div"]).is_empty());
        let p = tree.children(pruned)[0];
        assert_eq!(tree.tail(p).trim(), "tail text");
        assert!(!tree.descendants_tags(div, &["div"]).is_empty());
    }

    #[test]
    fn test_prune_unwanted_nodes_backup() {
        let mut tree = dom::parse(
            r#"<div><div class="sidebar">A large block of text that makes up nearly the whole candidate.</div>x</div>"#,
        );
        let div = first(&tree, "div");
        let pruned = prune_unwanted_nodes(&mut tree, div, &OVERALL_DISCARDED, true);
        assert_eq!(tree.descendants_tags(pruned, &["div"]).len(), 1);
        let pruned = prune_unwanted_nodes(&mut tree, div, &OVERALL_DISCARDED, false);
        assert!(tree.descendants_tags(pruned, &["div"]).is_empty());
    }

    #[test]
    fn test_text_filter() {
        let tree = dom::parse("<p>Share on Facebook</p><p>  </p><p>Real content here.</p>");
        let ps = tree.descendants_tags(tree.root(), &["p"]);
        assert!(text_filter(&tree, ps[0]));
        assert!(text_filter(&tree, ps[1]));
        assert!(!text_filter(&tree, ps[2]));
    }

    #[test]
    fn test_handle_text_node_promotes_br_tail() {
        let mut tree = dom::parse("<div>Intro<br>  line after break  </div>");
        let br = first(&tree, "br");
        let options = Options::default();
        let mut cache = DedupCache::new(16);
        let mut state = ExtractionState::new(&options, &SilentObserver, &mut cache);

        let kept = handle_text_node(&mut tree, br, &mut state, false, false);
        assert_eq!(kept, Some(br));
        assert_eq!(tree.tail(br), "line after break");

        let fixed = handle_text_node(&mut tree, br, &mut state, true, false);
        assert_eq!(fixed, Some(br));
        assert_eq!(tree.tag(br), "p");
        assert_eq!(tree.text(br), "line after break");
        assert_eq!(tree.tail(br), "");
    }

    #[test]
    fn test_process_node_trims_and_promotes() {
        let mut tree = dom::parse("<div><span></span>  moved tail  </div>");
        let span = first(&tree, "span");
        let options = Options::default();
        let mut cache = DedupCache::new(16);
        let mut state = ExtractionState::new(&options, &SilentObserver, &mut cache);

        assert_eq!(process_node(&mut tree, span, &mut state), Some(span));
        assert_eq!(tree.text(span), "moved tail");
        assert_eq!(tree.tail(span), "");

        state.mark_done(span);
        assert_eq!(process_node(&mut tree, span, &mut state), None);
    }

    #[test]
    fn test_duplicates_rejected_after_max_count() {
        let text = "A sentence long enough to be checked for duplicates by the cache, repeated several times on the page.";
        let html = format!("<div><p>{text}</p><p>{text}</p><p>{text}</p><p>{text}</p></div>");
        let mut tree = dom::parse(&html);
        let options = Options {
            deduplicate: true,
            ..Options::default()
        };
        let mut cache = DedupCache::new(16);
        let mut state = ExtractionState::new(&options, &SilentObserver, &mut cache);

        let kept: Vec<bool> = tree
            .descendants_tags(tree.root(), &["p"])
            .into_iter()
            .map(|p| process_node(&mut tree, p, &mut state).is_some())
            .collect();
        assert_eq!(kept, vec![true, true, true, false]);
    }

    #[test]
    fn test_delete_by_link_density_backtracking() {
        let mut tree = dom::parse(
            r#"<div>
                <p>Intro text that is long enough to stay in the tree without any trouble at all here.</p>
                <div><a href="/1">Further reading list</a> today</div>
                <div><a href="/2">Further reading list</a> today</div>
                <div><a href="/3">Further reading list</a> today</div>
                <p>Closing text.</p>
            </div>"#,
        );
        let outer = first(&tree, "div");
        let options = Options::default();
        delete_by_link_density(&mut tree, outer, &options, true, &["div"]);
        assert_eq!(tree.parent(outer).map(|id| tree.tag(id)), Some("body"));
        assert!(tree.descendants_tags(outer, &["div"]).is_empty());
        assert_eq!(tree.descendants_tags(outer, &["p"]).len(), 2);
    }

    #[test]
    fn test_post_cleaning() {
        let mut tree = dom::parse(
            r#"<div><p class="x" style="color:red" title="t">Text<span> </span></p><p width="2">w</p><br></div>"#,
        );
        let div = first(&tree, "div");
        post_cleaning(&mut tree, div);
        let p = first(&tree, "p");
        assert_eq!(tree.attrs(p), &[("title".to_string(), "t".to_string())]);
        let second = tree.descendants_tags(div, &["p"])[1];
        assert!(tree.attrs(second).is_empty());
        assert!(tree.descendants_tags(div, &["span"]).is_empty());
        assert_eq!(tree.descendants_tags(div, &["br"]).len(), 1);
    }

    #[test]
    fn test_check_html_language() {
        let tree = dom::parse(
            r#"<html><head><meta http-equiv="content-language" content="de-DE"></head><body></body></html>"#,
        );
        let root = tree.root();
        assert!(check_html_language(&tree, root, "de", &SilentObserver).is_ok());
        match check_html_language(&tree, root, "en", &SilentObserver) {
            Err(Error::WrongLanguage { expected, found }) => {
                assert_eq!(expected, "en");
                assert_eq!(found, "de,de");
            }
            other => panic!("expected WrongLanguage, got {other:?}"),
        }

        let tree = dom::parse("<html><body><p>No metas.</p></body></html>");
        assert!(check_html_language(&tree, tree.root(), "en", &SilentObserver).is_ok());
    }
}
