//! Small text helpers shared by the extractor and metadata passes.

use dom_query::Document;

use crate::patterns::IMAGE_EXTENSION;

/// Collapse every whitespace run to a single space and trim both ends.
#[must_use]
pub fn trim(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Check whether a string holds anything besides whitespace.
#[inline]
#[must_use]
pub fn text_chars_test(s: &str) -> bool {
    !s.trim().is_empty()
}

/// Number of characters (not bytes) in `s`.
#[inline]
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Check whether an image source points to an image file.
#[must_use]
pub fn is_image_file(src: &str) -> bool {
    !src.is_empty() && IMAGE_EXTENSION.is_match(src)
}

/// Decode HTML character references, named or numeric, the way the HTML
/// parser decodes them in text. Markup in `s` stays literal text.
#[must_use]
pub fn unescape_html(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let escaped = s.replace('<', "&lt;");
    let doc = Document::from(format!("<div>{escaped}</div>"));
    doc.select("div").text().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_collapses_whitespace() {
        assert_eq!(trim("  a \n\t b   c "), "a b c");
        assert_eq!(trim("   "), "");
    }

    #[test]
    fn test_text_chars_test() {
        assert!(text_chars_test(" x "));
        assert!(!text_chars_test(" \n\t"));
    }

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file("photo.jpeg"));
        assert!(!is_image_file(""));
        assert!(!is_image_file("page.html"));
    }

    #[test]
    fn test_unescape_html() {
        assert_eq!(unescape_html("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(unescape_html("&#72;&#x69;"), "Hi");
        assert_eq!(unescape_html("M&uuml;ller"), "Müller");
        assert_eq!(unescape_html("a & b"), "a & b");
        assert_eq!(unescape_html("&unknown;"), "&unknown;");
    }

    #[test]
    fn test_unescape_html_full_entity_table() {
        assert_eq!(unescape_html("caf&eacute;"), "café");
        assert_eq!(unescape_html("wait&hellip;"), "wait…");
        assert_eq!(unescape_html("it&rsquo;s"), "it’s");
        assert_eq!(unescape_html("it&#8217;s"), "it’s");
        assert_eq!(unescape_html("&amp;lt;"), "&lt;");
        assert_eq!(unescape_html("<b>bold</b> &amp; more"), "<b>bold</b> & more");
    }
}
