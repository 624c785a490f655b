//! Whole-document extraction.
//!
//! The flow over one parsed page:
//!
//! 1. language gate on the declared page language
//! 2. metadata over the untouched tree, with the URL and essential-metadata
//!    gates
//! 3. cleaning, tag simplification and conversion of a working copy
//! 4. comments first, then the main content, the external fallback
//!    comparison and the baseline rescue
//! 5. size, duplicate and detected-language gates, post-cleaning
//!
//! Every call owns its dedup cache; nothing is shared between documents.

use std::borrow::Cow;

use crate::cache::DedupCache;
use crate::error::{Error, Result};
use crate::etree::{NodeId, Tree};
use crate::extractor::tags::FORMAT_TAG_CATALOG;
use crate::extractor::{
    baseline, compare_external_extraction, extract_comments, extract_content, ExtractionState,
};
use crate::html_processing::{
    check_html_language, convert_tags, doc_cleaning, duplicate_test, post_cleaning,
    prune_unwanted_nodes, simplify_tags,
};
use crate::metadata::extract_metadata;
use crate::observer::Observer;
use crate::options::Options;
use crate::result::{ExtractResult, Metadata};
use crate::selector::comments::REMOVED_COMMENTS;
use crate::url_utils;
use crate::utils::char_len;

/// Extract content, comments and metadata from a parsed page.
///
/// # Errors
///
/// - [`Error::WrongLanguage`] when the declared or detected language is not
///   `Options::target_language`
/// - [`Error::BlacklistedUrl`] when the page URL is in `Options::url_blacklist`
/// - [`Error::MissingMetadata`] when `Options::has_essential_metadata` is set
///   and the title or URL is missing
/// - [`Error::TreeTooLarge`] when the body has more top-level elements than
///   `Options::max_tree_size`, even with formatting unwrapped
/// - [`Error::NoContent`] when neither content nor comments are long enough
/// - [`Error::Duplicate`] when deduplication is on and the body was seen
///   too often
pub fn extract_document(
    mut tree: Tree,
    options: &Options,
    observer: &dyn Observer,
) -> Result<ExtractResult> {
    let root = tree.root();

    if let Some(target) = options.target_language.as_deref() {
        check_html_language(&tree, root, target, observer)?;
    }

    let mut metadata = extract_metadata(&tree, options, observer);
    check_metadata(&metadata, options)?;

    let options = with_original_url(options, &metadata);
    let options: &Options = &options;
    let config = &options.config;

    let mut doc = tree.deep_clone(root);
    let backup_external = tree.deep_clone(root);
    let backup_baseline = tree.deep_clone(root);

    doc_cleaning(&mut tree, doc, options);
    simplify_tags(&mut tree, doc, options);
    convert_tags(&mut tree, doc, options);

    let mut cache = DedupCache::new(config.cache_size);

    let (comments, comments_text) = if options.exclude_comments {
        if options.focus.is_precision() {
            doc = prune_unwanted_nodes(&mut tree, doc, &REMOVED_COMMENTS, false);
        }
        (None, String::new())
    } else {
        let mut state = ExtractionState::new(options, observer, &mut cache);
        extract_comments(&mut tree, doc, &mut state)
    };

    let (mut body, mut text) = {
        let mut state = ExtractionState::for_content(options, observer, &mut cache);
        let (body, text) = extract_content(&mut tree, doc, &mut state);
        if options.no_fallback {
            (body, text)
        } else {
            compare_external_extraction(&mut tree, backup_external, body, &state)
        }
    };

    if char_len(&text) < config.min_extracted_size && !options.focus.is_precision() {
        observer.info(format_args!("using baseline extraction"));
        (body, text) = baseline(&mut tree, backup_baseline);
    }

    if let Some(max) = options.max_tree_size {
        if tree.children(body).len() > max {
            tree.strip_tags(body, FORMAT_TAG_CATALOG);
            let children = tree.children(body).len();
            if children > max {
                return Err(Error::TreeTooLarge { children, max });
            }
        }
    }

    let comments_len = char_len(&comments_text);
    if comments_len < config.min_extracted_comment_size {
        observer.debug(format_args!("not enough comments: {comments_len} chars"));
    }
    let text_len = char_len(&text);
    if text_len < config.min_output_size && comments_len < config.min_output_comment_size {
        return Err(Error::NoContent { text_len, comments_len });
    }

    if options.deduplicate {
        let mut state = ExtractionState::new(options, observer, &mut cache);
        if duplicate_test(&tree, body, &mut state) {
            return Err(Error::Duplicate);
        }
    }

    if let Some(detect) = options.language_detector {
        let sample = if text_len >= comments_len { &text } else { &comments_text };
        let detected = detect(sample);
        if let Some(target) = options.target_language.as_deref() {
            if detected.as_deref() != Some(target) {
                return Err(Error::WrongLanguage {
                    expected: target.to_string(),
                    found: detected.unwrap_or_default(),
                });
            }
        }
        if detected.is_some() {
            metadata.language = detected;
        }
    }

    if !options.include_formatting {
        tree.strip_tags(body, FORMAT_TAG_CATALOG);
        if let Some(comments) = comments {
            tree.strip_tags(comments, FORMAT_TAG_CATALOG);
        }
    }

    post_cleaning(&mut tree, body);
    if let Some(comments) = comments {
        post_cleaning(&mut tree, comments);
    }

    observer.info(format_args!(
        "extracted {text_len} chars of content and {comments_len} chars of comments"
    ));

    Ok(ExtractResult {
        content: tree.subtree(body),
        content_text: text,
        comments: comments.map(|id: NodeId| tree.subtree(id)),
        comments_text,
        metadata,
    })
}

/// Reject blacklisted URLs and, when asked, pages without title or URL.
fn check_metadata(metadata: &Metadata, options: &Options) -> Result<()> {
    if let Some(url) = metadata.url.as_deref() {
        if options.url_blacklist.iter().any(|listed| listed == url) {
            return Err(Error::BlacklistedUrl(url.to_string()));
        }
    }

    if options.has_essential_metadata {
        if metadata.title.is_none() {
            return Err(Error::MissingMetadata("title"));
        }
        if metadata.url.is_none() {
            return Err(Error::MissingMetadata("url"));
        }
    }
    Ok(())
}

/// Options with `original_url` taken from the metadata when the caller did
/// not set one.
fn with_original_url<'a>(options: &'a Options, metadata: &Metadata) -> Cow<'a, Options> {
    if options.original_url.is_some() {
        return Cow::Borrowed(options);
    }
    match metadata.url.as_deref().and_then(url_utils::parse_absolute) {
        Some(url) => Cow::Owned(Options {
            original_url: Some(url),
            ..options.clone()
        }),
        None => Cow::Borrowed(options),
    }
}
