//! Configuration options for content extraction.
//!
//! `Options` holds the toggles that change what survives extraction;
//! `ExtractionConfig` holds the size thresholds. Both are plain data with
//! public fields and `serde` support, so a configuration can be stored and
//! reloaded.

use serde::{Deserialize, Serialize};
use url::Url;

/// Extraction bias.
///
/// Many pruning rules and the set of tags allowed in the output branch on
/// this value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Focus {
    /// Balanced extraction.
    #[default]
    Default,
    /// Prefer less text, but correct: stricter pruning, smaller tag set.
    FavorPrecision,
    /// Prefer more text even when unsure: looser pruning, broader tag set.
    FavorRecall,
}

impl Focus {
    /// Shorthand for `self == Focus::FavorPrecision`.
    #[inline]
    #[must_use]
    pub fn is_precision(self) -> bool {
        self == Self::FavorPrecision
    }

    /// Shorthand for `self == Focus::FavorRecall`.
    #[inline]
    #[must_use]
    pub fn is_recall(self) -> bool {
        self == Self::FavorRecall
    }
}

/// Size thresholds used by the extraction passes.
///
/// The defaults are good for most pages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Capacity of the deduplication cache.
    ///
    /// Default: `4096`
    pub cache_size: usize,

    /// Texts longer than this many characters are checked for duplicates.
    ///
    /// Default: `100`
    pub min_duplicate_check_size: usize,

    /// A text seen more often than this is a duplicate.
    ///
    /// Default: `2`
    pub max_duplicate_count: usize,

    /// Below this many characters the main pass is considered a failure and
    /// recovery, fallback and baseline passes kick in.
    ///
    /// Default: `250`
    pub min_extracted_size: usize,

    /// Minimum size of extracted comments.
    ///
    /// Default: `1`
    pub min_extracted_comment_size: usize,

    /// Minimum size of the final content text.
    ///
    /// Default: `1`
    pub min_output_size: usize,

    /// Minimum size of the final comments text.
    ///
    /// Default: `1`
    pub min_output_comment_size: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            cache_size: 4096,
            min_duplicate_check_size: 100,
            max_duplicate_count: 2,
            min_extracted_size: 250,
            min_extracted_comment_size: 1,
            min_output_size: 1,
            min_output_comment_size: 1,
        }
    }
}

/// Guess the ISO 639-1 language code of a text.
pub type LanguageDetector = fn(&str) -> Option<String>;

/// Configuration options for content extraction.
///
/// All fields are public. Use `Default::default()` for standard settings or
/// the `with_*` helpers for the common toggles.
///
/// # Example
///
/// ```rust
/// use article_extractor::{Focus, Options};
///
/// let options = Options {
///     include_links: true,
///     focus: Focus::FavorRecall,
///     ..Options::default()
/// };
/// assert!(options.focus.is_recall());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
#[allow(clippy::struct_excessive_bools)]
pub struct Options {
    /// Size thresholds.
    pub config: ExtractionConfig,

    /// URL the page was fetched from. Used to resolve relative links and as
    /// metadata URL of last resort. Filled from the metadata URL when absent.
    ///
    /// Default: `None`
    pub original_url: Option<Url>,

    /// Only accept pages in this language (ISO 639-1 code).
    ///
    /// Default: `None`
    pub target_language: Option<String>,

    /// Skip the comparison against the readability fallback.
    ///
    /// Default: `false`
    pub no_fallback: bool,

    /// Precision/recall bias.
    ///
    /// Default: `Focus::Default`
    pub focus: Focus,

    /// Do not extract the comments section.
    ///
    /// Default: `false`
    pub exclude_comments: bool,

    /// Drop `<table>` content.
    ///
    /// Default: `false`
    pub exclude_tables: bool,

    /// Keep `<img>` elements in the output.
    ///
    /// Default: `false`
    pub include_images: bool,

    /// Keep inline formatting (`<b>`, `<em>`, ...) in the output tree.
    ///
    /// Default: `false`
    pub include_formatting: bool,

    /// Keep `<a href>` elements in the output.
    ///
    /// Default: `false`
    pub include_links: bool,

    /// Remove duplicate text segments and reject duplicate documents.
    ///
    /// Default: `false`
    pub deduplicate: bool,

    /// Reject pages without a title and a URL.
    ///
    /// Default: `false`
    pub has_essential_metadata: bool,

    /// Maximum number of top-level elements in the output body.
    ///
    /// Default: `None`
    pub max_tree_size: Option<usize>,

    /// Pages whose metadata URL is listed here are rejected.
    ///
    /// Default: empty
    pub url_blacklist: Vec<String>,

    /// Author names removed from metadata (case-insensitive).
    ///
    /// Default: empty
    pub blacklisted_authors: Vec<String>,

    /// CSS selector of elements removed before extraction.
    ///
    /// Default: `None`
    pub prune_selector: Option<String>,

    /// Language detector run on the extracted text when `target_language`
    /// is set.
    ///
    /// Default: `None`
    #[serde(skip)]
    pub language_detector: Option<LanguageDetector>,
}

impl Options {
    /// Set the extraction bias.
    #[must_use]
    pub fn with_focus(mut self, focus: Focus) -> Self {
        self.focus = focus;
        self
    }

    /// Keep or drop links.
    #[must_use]
    pub fn with_links(mut self, include: bool) -> Self {
        self.include_links = include;
        self
    }

    /// Keep or drop images.
    #[must_use]
    pub fn with_images(mut self, include: bool) -> Self {
        self.include_images = include;
        self
    }

    /// Keep or drop tables.
    #[must_use]
    pub fn with_tables(mut self, include: bool) -> Self {
        self.exclude_tables = !include;
        self
    }

    /// Extract or skip comments.
    #[must_use]
    pub fn with_comments(mut self, include: bool) -> Self {
        self.exclude_comments = !include;
        self
    }

    /// Set the page URL.
    #[must_use]
    pub fn with_url(mut self, url: Url) -> Self {
        self.original_url = Some(url);
        self
    }

    /// Only accept pages in `language`.
    #[must_use]
    pub fn with_target_language(mut self, language: &str) -> Self {
        self.target_language = Some(language.to_ascii_lowercase());
        self
    }
}
