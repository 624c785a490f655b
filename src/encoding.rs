//! Byte input decoding.
//!
//! Pages arrive as bytes in whatever charset the server chose. Input that is
//! already valid UTF-8 is used as is; otherwise the byte-order mark or the
//! charset declared in a `<meta>` tag selects an `encoding_rs` decoder.
//! Soft hyphens are removed from the decoded text in every case.

use std::sync::LazyLock;

use encoding_rs::{Encoding, REPLACEMENT, UTF_8};
use regex::Regex;

use crate::error::{Error, Result};

/// Charset declared by `<meta charset=...>` or by the `content` of a
/// `http-equiv="Content-Type"` meta.
#[allow(clippy::expect_used)]
static META_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta\b[^>]*?charset\s*=\s*["']?\s*([a-z0-9_:.\-]+)"#).expect("valid regex")
});

/// How far into the document a charset declaration is searched for.
const SNIFF_LEN: usize = 4096;

const SOFT_HYPHEN: char = '\u{00AD}';

/// Pick the encoding of an HTML byte stream.
///
/// Order: byte-order mark, valid UTF-8, declared meta charset, UTF-8.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(html) {
        return encoding;
    }
    if std::str::from_utf8(html).is_ok() {
        return UTF_8;
    }
    declared_charset(html)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

fn declared_charset(html: &[u8]) -> Option<String> {
    let head = String::from_utf8_lossy(&html[..html.len().min(SNIFF_LEN)]);
    META_CHARSET
        .captures(&head)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Decode HTML bytes into a UTF-8 string without soft hyphens.
///
/// Undecodable sequences become U+FFFD. A declared charset that maps to the
/// WHATWG replacement encoding cannot be decoded at all and is an error.
///
/// # Examples
///
/// ```
/// use article_extractor::encoding::decode_html;
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body>Caf\xE9</body></html>";
/// let text = decode_html(html)?;
/// assert!(text.contains("Café"));
/// # Ok::<(), article_extractor::Error>(())
/// ```
pub fn decode_html(html: &[u8]) -> Result<String> {
    let encoding = detect_encoding(html);
    if encoding == REPLACEMENT {
        return Err(Error::EncodingError(format!(
            "charset {} cannot be decoded",
            declared_charset(html).unwrap_or_default()
        )));
    }

    let (decoded, _, _) = encoding.decode(html);
    Ok(remove_soft_hyphens(&decoded))
}

/// Strip U+00AD from text.
#[must_use]
pub fn remove_soft_hyphens(text: &str) -> String {
    if text.contains(SOFT_HYPHEN) {
        text.chars().filter(|&c| c != SOFT_HYPHEN).collect()
    } else {
        text.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_input_wins_over_declaration() {
        let html = "<html><head><meta charset=\"windows-1252\"></head><body>Café</body></html>";
        assert_eq!(detect_encoding(html.as_bytes()), UTF_8);
    }

    #[test]
    fn declared_latin1_is_decoded() {
        let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body>Caf\xE9</body></html>";
        assert_eq!(detect_encoding(html).name(), "windows-1252");
        match decode_html(html) {
            Ok(text) => assert!(text.contains("Café")),
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        }
    }

    #[test]
    fn content_type_declaration_is_read() {
        let html = b"<meta http-equiv=\"Content-Type\" content=\"text/html; charset=windows-1252\"><p>\x93Hi\x94</p>";
        match decode_html(html) {
            Ok(text) => assert!(text.contains("\u{201C}Hi\u{201D}")),
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        }
    }

    #[test]
    fn bom_selects_encoding() {
        let html = b"\xFF\xFEh\x00i\x00";
        assert_eq!(detect_encoding(html).name(), "UTF-16LE");
    }

    #[test]
    fn invalid_bytes_without_declaration_are_replaced() {
        let html = b"<p>Test \xFF Invalid</p>";
        match decode_html(html) {
            Ok(text) => {
                assert!(text.contains("Test"));
                assert!(text.contains('\u{FFFD}'));
            }
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        }
    }

    #[test]
    fn replacement_charset_is_an_error() {
        let html = b"<meta charset=\"iso-2022-kr\"><p>\xFF</p>";
        assert!(matches!(decode_html(html), Err(Error::EncodingError(_))));
    }

    #[test]
    fn soft_hyphens_are_removed() {
        let html = "<p>extra\u{00AD}ordinary</p>";
        match decode_html(html.as_bytes()) {
            Ok(text) => assert_eq!(text, "<p>extraordinary</p>"),
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        }
    }
}
