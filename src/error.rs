//! Error types for article-extractor.
//!
//! Every rejection the extraction pipeline can signal is a variant here.
//! Nothing inside the node transformer fails; errors come from input
//! decoding and from the document-level gates.

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTML parsing failed.
    #[error("HTML parsing failed: {0}")]
    ParseError(String),

    /// Character encoding detection or conversion failed.
    #[error("Encoding detection failed: {0}")]
    EncodingError(String),

    /// The page language does not match `Options::target_language`.
    #[error("wrong language: expected {expected}, found {found}")]
    WrongLanguage {
        /// Requested ISO 639-1 code.
        expected: String,
        /// Declared or detected code, empty when nothing usable was found.
        found: String,
    },

    /// The document URL is listed in `Options::url_blacklist`.
    #[error("blacklisted URL: {0}")]
    BlacklistedUrl(String),

    /// Essential metadata was required but is missing.
    #[error("missing essential metadata: {0}")]
    MissingMetadata(&'static str),

    /// The extracted body is larger than `Options::max_tree_size`.
    #[error("output tree too large: {children} children, max {max}")]
    TreeTooLarge {
        /// Number of top-level children in the extracted body.
        children: usize,
        /// Configured limit.
        max: usize,
    },

    /// No extractable content survived all passes.
    #[error("no extractable content found (text: {text_len} chars, comments: {comments_len} chars)")]
    NoContent {
        /// Characters of content text.
        text_len: usize,
        /// Characters of comments text.
        comments_len: usize,
    },

    /// The whole body was already seen by the deduplication cache.
    #[error("duplicate document")]
    Duplicate,
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
