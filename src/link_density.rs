//! Link Density Testing
//!
//! Decides whether a block is rich enough in links to be boilerplate. Short
//! blocks are judged on the share of link text and on how many of their links
//! are short; tables are only judged once they carry enough text.

use crate::etree::{NodeId, Tree};
use crate::options::Options;
use crate::utils::{char_len, trim};

/// Link statistics of one element.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LinkInfo {
    /// Total characters of link text.
    pub link_length: usize,
    /// Links whose text is below the short-link threshold.
    pub short_links: usize,
    /// Links holding any text, in document order.
    pub non_empty_links: Vec<NodeId>,
}

/// Collect heuristics on link text.
///
/// Under `FavorPrecision` a link must be 50 characters long to count as
/// long, otherwise 10.
#[must_use]
pub fn collect_link_info(tree: &Tree, links: &[NodeId], options: &Options) -> LinkInfo {
    let threshold = if options.focus.is_precision() { 50 } else { 10 };

    let mut info = LinkInfo::default();
    for &link in links {
        let length = char_len(&trim(&tree.text_content(link)));
        if length == 0 {
            continue;
        }

        info.link_length += length;
        if length < threshold {
            info.short_links += 1;
        }
        info.non_empty_links.push(link);
    }
    info
}

/// Check whether an element is rich in links.
///
/// Returns the element's non-empty links together with the verdict. The links
/// are only reported when the element is flagged; callers that group
/// link-bearing elements by text use the list when it is not.
#[must_use]
pub fn link_density_test(tree: &Tree, element: NodeId, options: &Options) -> (Vec<NodeId>, bool) {
    let links = tree.descendants_tags(element, &["a"]);
    if links.is_empty() {
        return (Vec::new(), false);
    }

    let is_last = tree.next_sibling(element).is_none();
    let (limit, threshold) = if tree.tag(element) == "p" {
        match (options.focus.is_precision(), is_last) {
            (true, _) => (200, 0.8),
            (false, true) => (60, 0.8),
            (false, false) => (30, 0.8),
        }
    } else if is_last {
        (300, 0.8)
    } else {
        (100, 0.8)
    };

    let text_length = char_len(&trim(&tree.text_content(element)));
    if text_length >= limit {
        return (Vec::new(), false);
    }

    let info = collect_link_info(tree, &links, options);
    let n_links = info.non_empty_links.len();
    if n_links == 0 {
        return (info.non_empty_links, true);
    }

    #[allow(clippy::cast_precision_loss)]
    let flagged = info.link_length as f64 > threshold * text_length as f64
        || (n_links > 1 && info.short_links as f64 / n_links as f64 > 0.8);

    (info.non_empty_links, flagged)
}

/// Check whether a table should be removed because it is rich in links.
///
/// Tables of 250 characters or fewer are never flagged.
#[must_use]
pub fn link_density_test_tables(tree: &Tree, table: NodeId, options: &Options) -> bool {
    let links = tree.descendants_tags(table, &["a"]);
    if links.is_empty() {
        return false;
    }

    let text_length = char_len(&trim(&tree.text_content(table)));
    if text_length <= 250 {
        return false;
    }

    let info = collect_link_info(tree, &links, options);
    if info.non_empty_links.is_empty() {
        return true;
    }

    #[allow(clippy::cast_precision_loss)]
    let (link_length, text_length) = (info.link_length as f64, text_length as f64);
    if text_length <= 1000.0 {
        link_length > text_length * 0.8
    } else {
        link_length > text_length * 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;
    use crate::options::Focus;

    fn first(tree: &Tree, tag: &str) -> NodeId {
        match tree.find(tree.root(), |n| n.tag() == tag) {
            Some(id) => id,
            None => panic!("no <{tag}> in fixture"),
        }
    }

    #[test]
    fn test_link_heavy_list_is_flagged() {
        let tree = dom::parse(
            r#"<ul><li><a href="/a">Home</a></li><li><a href="/b">News</a></li><li><a href="/c">Sport</a></li></ul>"#,
        );
        let ul = first(&tree, "ul");
        let (links, flagged) = link_density_test(&tree, ul, &Options::default());
        assert!(flagged);
        assert_eq!(links.len(), 3);
    }

    #[test]
    fn test_paragraph_with_one_link_is_kept() {
        let tree = dom::parse(
            r#"<p>This is a long paragraph with substantial text content that discusses
            various topics. It contains a <a href="/link">single link</a> but the
            majority of the content is regular text, not links.</p>"#,
        );
        let p = first(&tree, "p");
        let (_, flagged) = link_density_test(&tree, p, &Options::default());
        assert!(!flagged);
    }

    #[test]
    fn test_no_links() {
        let tree = dom::parse("<p>This paragraph has no links at all.</p>");
        let p = first(&tree, "p");
        assert_eq!(link_density_test(&tree, p, &Options::default()), (Vec::new(), false));
    }

    #[test]
    fn test_empty_links_flag_short_block() {
        let tree = dom::parse(r#"<div>Menu <a href="/x"> </a></div>"#);
        let div = first(&tree, "div");
        let (links, flagged) = link_density_test(&tree, div, &Options::default());
        assert!(flagged);
        assert!(links.is_empty());
    }

    #[test]
    fn test_precision_raises_short_link_threshold() {
        let tree = dom::parse(
            r#"<div><a href="/1">A link of medium length here</a> <a href="/2">Another link of medium length</a> and some words around them</div>"#,
        );
        let div = first(&tree, "div");
        let links = tree.descendants_tags(div, &["a"]);

        let info = collect_link_info(&tree, &links, &Options::default());
        assert_eq!(info.short_links, 0);

        let precise = Options {
            focus: Focus::FavorPrecision,
            ..Options::default()
        };
        let info = collect_link_info(&tree, &links, &precise);
        assert_eq!(info.short_links, 2);
    }

    #[test]
    fn test_link_table_is_flagged() {
        let mut rows = String::new();
        for i in 0..8 {
            rows.push_str(&format!(
                r#"<tr><td><a href="/{i}">Navigation Link Category Section {i}</a></td></tr>"#
            ));
        }
        let tree = dom::parse(&format!("<table>{rows}</table>"));
        let table = first(&tree, "table");
        assert!(link_density_test_tables(&tree, table, &Options::default()));
    }

    #[test]
    fn test_data_table_is_kept() {
        let tree = dom::parse(
            r#"<table>
                <tr><th>Name</th><th>Score</th><th>Date</th></tr>
                <tr><td>John Smith</td><td>95</td><td>2024-01-15</td></tr>
                <tr><td>Jane Doe</td><td>87</td><td>2024-01-16</td></tr>
            </table>"#,
        );
        let table = first(&tree, "table");
        assert!(!link_density_test_tables(&tree, table, &Options::default()));
    }
}
