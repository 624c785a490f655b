//! Compiled regex patterns shared across the extraction pipeline.
//!
//! All patterns are compiled once on first use through `LazyLock`.
//! Metadata-specific patterns live next to the code that uses them.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

/// Share/print boilerplate lines ("Facebook", "Print", "More on this...").
pub static TEXT_FILTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\W*(Drucken|E-?Mail|Facebook|Flipboard|Google|Instagram|Linkedin|Mail|PDF|Pinterest|Pocket|Print|QQ|Reddit|Twitter|WeChat|WeiBo|Whatsapp|Xing|Mehr zum Thema:?|More on this.{0,8})$",
    )
    .expect("TEXT_FILTER regex")
});

/// Image file reference: a non-space run ending in a known image extension.
pub static IMAGE_EXTENSION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[^\s]+\.(jpe?g|png|gif|bmp|webp|avif)").expect("IMAGE_EXTENSION regex")
});

/// Two-letter language code inside a `lang` or `content-language` value.
pub static HTML_LANG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[a-z]{2}").expect("HTML_LANG regex"));

/// HTML comment or tag, for cleaning meta content.
pub static HTML_TAG_OR_COMMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)(<!--.*?-->|<[^>]*>)").expect("HTML_TAG_OR_COMMENT regex"));

/// Class names used by highlight.js for code spans.
pub static HIGHLIGHT_JS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)hljs").expect("HIGHLIGHT_JS regex"));
