//! Result types for extraction output.
//!
//! An extraction yields canonical trees for the main content and the
//! comments, their plain text, and the document metadata.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dom;
use crate::etree::Tree;

/// Result of content extraction from an HTML document.
#[derive(Debug, Clone)]
pub struct ExtractResult {
    /// Main content as a canonical tree rooted at `<body>`.
    pub content: Tree,

    /// Main content as plain text.
    pub content_text: String,

    /// Comments section as a canonical tree, if any were found.
    pub comments: Option<Tree>,

    /// Comments section as plain text, empty when none were found.
    pub comments_text: String,

    /// Extracted metadata about the document.
    pub metadata: Metadata,
}

impl ExtractResult {
    /// Main content rendered as HTML, without the `<body>` wrapper.
    #[must_use]
    pub fn content_html(&self) -> String {
        dom::inner_html(&self.content, self.content.root())
    }

    /// Comments rendered as HTML, without the `<body>` wrapper.
    #[must_use]
    pub fn comments_html(&self) -> Option<String> {
        self.comments
            .as_ref()
            .map(|tree| dom::inner_html(tree, tree.root()))
    }
}

/// Metadata extracted from an HTML document.
///
/// Fields stay `None` (or empty for lists) when nothing usable was found.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    /// Page title.
    pub title: Option<String>,

    /// Author names, joined with `"; "`.
    pub author: Option<String>,

    /// Canonical URL of the document.
    pub url: Option<String>,

    /// Host of the canonical URL.
    pub hostname: Option<String>,

    /// Page description.
    pub description: Option<String>,

    /// Site name (e.g., "New York Times").
    pub sitename: Option<String>,

    /// Publication date.
    pub date: Option<DateTime<Utc>>,

    /// Content categories, in order of appearance.
    pub categories: Vec<String>,

    /// Content tags, in order of appearance.
    pub tags: Vec<String>,

    /// License information.
    pub license: Option<String>,

    /// Content language (ISO 639-1), set by the language detector.
    pub language: Option<String>,

    /// Main image URL.
    pub image: Option<String>,

    /// Page type (article, website, ...).
    pub page_type: Option<String>,
}
