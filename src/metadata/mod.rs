//! Metadata extraction.
//!
//! Sources are layered: `<meta>` tags (OpenGraph first), then JSON-LD, then
//! heuristics over the page body for the fields that are still empty. The
//! tree is never modified.
//!
//! - `meta_tags`: OpenGraph and the generic `<meta>` scan
//! - `json_ld`: schema.org script blocks
//! - `dom_extraction`: title, author, URL, site name, categories, tags,
//!   date and license from the body
//! - `author`: author name normalization

pub mod author;
pub mod dom_extraction;
pub mod json_ld;
pub mod meta_tags;

use crate::etree::Tree;
use crate::observer::Observer;
use crate::options::Options;
use crate::result::Metadata;
use crate::url_utils;
use crate::utils::trim;

pub use author::{normalize_authors, remove_blacklisted_authors, validate_metadata_name};
pub use dom_extraction::{
    clean_cat_tags, examine_title_element, extract_dom_author, extract_dom_categories,
    extract_dom_date, extract_dom_sitename, extract_dom_tags, extract_dom_title,
    extract_dom_url, extract_license,
};
pub use json_ld::extract_json_ld;
pub use meta_tags::{examine_meta, extract_open_graph, parse_meta_date};

/// Set `slot` to `value` unless it already holds something.
pub(crate) fn fill(slot: &mut Option<String>, value: String) {
    if slot.is_none() && !value.is_empty() {
        *slot = Some(value);
    }
}

/// Split every entry on its dominant separator (`,` or `;`), strip quotes,
/// and keep the first occurrence of each piece.
#[must_use]
pub fn uniquify_lists(entries: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for entry in entries {
        let separator = if entry.matches(';').count() > entry.matches(',').count() { ';' } else { ',' };
        for piece in entry.split(separator) {
            let piece = trim(piece).replace(['"', '\''], "");
            if !piece.is_empty() && !out.contains(&piece) {
                out.push(piece);
            }
        }
    }
    out
}

fn remove_blacklisted(author: Option<String>, options: &Options) -> Option<String> {
    let author = remove_blacklisted_authors(&author?, &options.blacklisted_authors);
    (!author.is_empty()).then_some(author)
}

/// Extract the metadata of a parsed document.
///
/// # Example
///
/// ```rust
/// use article_extractor::{dom, metadata, Options, SilentObserver};
///
/// let tree = dom::parse(r#"<html><head>
///     <meta property="og:title" content="Open Graph Title">
/// </head><body><h1>Heading</h1></body></html>"#);
///
/// let metadata = metadata::extract_metadata(&tree, &Options::default(), &SilentObserver);
/// assert_eq!(metadata.title.as_deref(), Some("Open Graph Title"));
/// ```
#[must_use]
pub fn extract_metadata(tree: &Tree, options: &Options, observer: &dyn Observer) -> Metadata {
    let mut metadata = examine_meta(tree);
    metadata.author = remove_blacklisted(metadata.author, options);

    metadata = extract_json_ld(tree, metadata, observer);
    metadata.author = remove_blacklisted(metadata.author, options);

    if metadata.title.is_none() {
        metadata.title = extract_dom_title(tree);
    }

    if metadata.author.is_none() {
        metadata.author = remove_blacklisted(extract_dom_author(tree), options);
    }

    if metadata.url.is_none() {
        metadata.url = extract_dom_url(tree);
    }
    let base = options.original_url.as_ref();
    metadata.url = metadata.url.and_then(|url| url_utils::validate(&url, base));
    if metadata.url.is_none() {
        metadata.url = base.map(ToString::to_string);
    }
    metadata.hostname = metadata.url.as_deref().and_then(url_utils::hostname);

    metadata.image = metadata.image.and_then(|image| url_utils::validate(&image, base));

    if metadata.date.is_none() {
        metadata.date = extract_dom_date(tree);
    }

    if metadata.sitename.is_none() {
        metadata.sitename = extract_dom_sitename(tree);
    }
    metadata.sitename = match metadata.sitename.take() {
        Some(sitename) => Some(clean_sitename(&sitename)),
        None => metadata.url.as_deref().and_then(url_utils::sitename_from_url),
    };

    if metadata.categories.is_empty() {
        metadata.categories = extract_dom_categories(tree);
    }
    if !metadata.categories.is_empty() {
        metadata.categories = clean_cat_tags(&metadata.categories);
    }

    if metadata.tags.is_empty() {
        metadata.tags = extract_dom_tags(tree);
    }
    if !metadata.tags.is_empty() {
        metadata.tags = clean_cat_tags(&metadata.tags);
    }

    metadata.license = extract_license(tree);

    observer.debug(format_args!(
        "metadata: title={:?} author={:?} url={:?}",
        metadata.title, metadata.author, metadata.url
    ));
    metadata
}

/// Strip a leading `@` and capitalize names that are not domains.
fn clean_sitename(sitename: &str) -> String {
    let sitename = sitename.trim_start_matches('@');
    let mut chars = sitename.chars();
    match chars.next() {
        Some(first) if !sitename.contains('.') && !first.is_uppercase() => {
            first.to_uppercase().chain(chars).collect()
        }
        _ => sitename.to_string(),
    }
}
