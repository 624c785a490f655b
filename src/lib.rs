//! # article-extractor
//!
//! Heuristic extraction of the main text, the comments and the metadata of
//! noisy HTML pages.
//!
//! A page is parsed into an arena tree ([`etree`]), cleaned of boilerplate,
//! walked element by element into a canonical output tree, compared with a
//! readability-style fallback and finally checked against size, duplicate
//! and language gates.
//!
//! ## Quick Start
//!
//! ```rust
//! use article_extractor::extract;
//!
//! let html = r#"<html><head><title>My Article</title></head><body><article>
//!     <p>The main content of the page, long enough to be kept as a paragraph.</p>
//!     <p>A second paragraph with some more words about the subject at hand.</p>
//! </article></body></html>"#;
//!
//! let result = extract(html)?;
//! assert_eq!(result.metadata.title.as_deref(), Some("My Article"));
//! assert!(result.content_text.contains("main content"));
//! # Ok::<(), article_extractor::Error>(())
//! ```
//!
//! ## Logging
//!
//! The string and byte entry points log through [`TracingObserver`]; install
//! any `tracing` subscriber to see the pipeline decisions. Pass your own
//! [`Observer`] to [`extract_with_observer`] or [`extract_document`] to
//! route or silence them.

mod error;
mod extract;
mod options;
mod result;

/// Bridge between the HTML parser and the arena tree.
pub mod dom;

/// Arena element tree with the text/tail model.
pub mod etree;

/// Bounded FIFO cache for text deduplication.
pub mod cache;

/// Declarative rules for content, comment and boilerplate detection.
pub mod selector;

/// Document cleaning, node filters and output post-processing.
pub mod html_processing;

/// The node transformer: tag families, handlers, content and comment passes.
pub mod extractor;

/// Metadata extraction (meta tags, JSON-LD, page body heuristics).
pub mod metadata;

/// Logging hooks for the pipeline.
pub mod observer;

/// URL validation, resolution and hostname helpers.
pub mod url_utils;

/// Character encoding detection and decoding.
pub mod encoding;

/// Link density tests for boilerplate detection.
pub mod link_density;

/// Shared regular expressions.
pub mod patterns;

/// Text helpers.
pub mod utils;

pub use error::{Error, Result};
pub use etree::Tree;
pub use extract::extract_document;
pub use metadata::extract_metadata;
pub use observer::{Observer, SilentObserver, TracingObserver};
pub use options::{ExtractionConfig, Focus, LanguageDetector, Options};
pub use result::{ExtractResult, Metadata};

/// Extract content from an HTML string with default options.
pub fn extract(html: &str) -> Result<ExtractResult> {
    extract_with_options(html, &Options::default())
}

/// Extract content from an HTML string, logging through `tracing`.
///
/// # Example
///
/// ```rust
/// use article_extractor::{extract_with_options, Focus, Options};
///
/// let html = r#"<html><body><article>
///     <p>The main content of the page, long enough to be kept as a paragraph.</p>
///     <p>Read the <a href="/next">next part</a> of the story for more.</p>
/// </article></body></html>"#;
///
/// let options = Options::default().with_links(true).with_focus(Focus::FavorRecall);
/// let result = extract_with_options(html, &options)?;
/// assert!(result.content_text.contains("next part"));
/// # Ok::<(), article_extractor::Error>(())
/// ```
pub fn extract_with_options(html: &str, options: &Options) -> Result<ExtractResult> {
    extract_with_observer(html, options, &TracingObserver)
}

/// Extract content from an HTML string with a caller-supplied observer.
///
/// `Options::prune_selector` is applied while parsing, so pruned elements
/// are invisible to metadata extraction as well.
pub fn extract_with_observer(
    html: &str,
    options: &Options,
    observer: &dyn Observer,
) -> Result<ExtractResult> {
    if html.trim().is_empty() {
        return Err(Error::ParseError("empty document".to_string()));
    }
    let tree = dom::parse_pruned(html, options.prune_selector.as_deref());
    extract_document(tree, options, observer)
}

/// Extract content from raw HTML bytes with default options.
///
/// The charset is taken from a BOM or the `<meta>` declarations, UTF-8
/// otherwise. Undecodable sequences become U+FFFD.
///
/// # Example
///
/// ```rust
/// use article_extractor::extract_bytes;
///
/// let html = b"<html><head><meta charset=\"ISO-8859-1\"></head><body><article>\
///     <p>Un caf\xE9 au comptoir, puis une longue promenade le long du canal.</p>\
///     </article></body></html>";
/// let result = extract_bytes(html)?;
/// assert!(result.content_text.contains("caf\u{e9}"));
/// # Ok::<(), article_extractor::Error>(())
/// ```
pub fn extract_bytes(html: &[u8]) -> Result<ExtractResult> {
    extract_bytes_with_options(html, &Options::default())
}

/// Extract content from raw HTML bytes with custom options.
pub fn extract_bytes_with_options(html: &[u8], options: &Options) -> Result<ExtractResult> {
    let html = encoding::decode_html(html)?;
    extract_with_options(&html, options)
}
