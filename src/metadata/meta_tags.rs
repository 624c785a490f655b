//! `<meta>` tag extraction: OpenGraph first, then the generic scan over
//! `name`, `property` and `itemprop` attributes.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::etree::{NodeId, Tree};
use crate::patterns::HTML_TAG_OR_COMMENT;
use crate::result::Metadata;
use crate::url_utils;
use crate::utils::{trim, unescape_html};

use super::author::{normalize_authors, validate_metadata_name};
use super::{fill, uniquify_lists};

const META_NAME_AUTHOR: &[&str] = &[
    "article:author",
    "atc-metaauthor",
    "author",
    "authors",
    "byl",
    "citation_author",
    "creator",
    "dc.creator",
    "dc.creator.aut",
    "dc:creator",
    "dcterms.creator",
    "dcterms.creator.aut",
    "dcsext.author",
    "parsely-author",
    "rbauthors",
    "sailthru.author",
    "shareaholic:article_author_name",
];

const META_NAME_TITLE: &[&str] = &[
    "citation_title",
    "dc.title",
    "dcterms.title",
    "fb_title",
    "headline",
    "parsely-title",
    "sailthru.title",
    "shareaholic:title",
    "rbtitle",
    "title",
    "twitter:title",
];

const META_NAME_DESCRIPTION: &[&str] = &[
    "dc.description",
    "dc:description",
    "dcterms.abstract",
    "dcterms.description",
    "description",
    "sailthru.description",
    "twitter:description",
];

const META_NAME_PUBLISHER: &[&str] = &[
    "article:publisher",
    "citation_journal_title",
    "copyright",
    "dc.publisher",
    "dc:publisher",
    "dcterms.publisher",
    "publisher",
    "sailthru.publisher",
    "rbpubname",
    "twitter:site",
];

const META_NAME_TAG: &[&str] = &[
    "citation_keywords",
    "dcterms.subject",
    "keywords",
    "parsely-tags",
    "shareaholic:keywords",
    "tags",
];

const META_NAME_IMAGE: &[&str] = &[
    "image",
    "og:image",
    "og:image:url",
    "og:image:secure_url",
    "twitter:image",
    "twitter:image:src",
];

/// Publication date, by `property`, `name` or `itemprop`.
const META_DATE: &[&str] = &[
    "article:published_time",
    "og:article:published_time",
    "article.published",
    "datepublished",
    "date",
    "dc.date",
    "dc.date.issued",
    "dcterms.date",
    "dcterms.created",
    "pubdate",
    "publishdate",
    "publish-date",
    "parsely-pub-date",
    "sailthru.date",
];

/// `<meta>` elements inside `<head>` that carry a `content` attribute.
pub(crate) fn head_metas(tree: &Tree) -> Vec<NodeId> {
    let Some(head) = tree.find(tree.root(), |n| n.tag() == "head") else {
        return Vec::new();
    };
    tree.find_all(head, |n| n.tag() == "meta" && n.has_attr("content"))
}

/// Read OpenGraph `og:*` properties.
#[must_use]
pub fn extract_open_graph(tree: &Tree) -> Metadata {
    let mut metadata = Metadata::default();

    let metas = tree.find_all(tree.root(), |n| {
        n.tag() == "meta" && n.attr("property").starts_with("og:")
    });
    for meta in metas {
        let property = trim(tree.attr(meta, "property").unwrap_or_default());
        let content = trim(&unescape_html(tree.attr(meta, "content").unwrap_or_default()));
        if content.is_empty() {
            continue;
        }

        match property.as_str() {
            "og:site_name" => metadata.sitename = Some(content),
            "og:title" => metadata.title = Some(content),
            "og:description" => metadata.description = Some(content),
            "og:author" | "og:article:author" => {
                let author = normalize_authors("", &content);
                metadata.author = (!author.is_empty()).then_some(author);
            }
            "og:image" | "og:image:url" | "og:image:secure_url" => metadata.image = Some(content),
            "og:url" if url_utils::is_absolute(&content) => metadata.url = Some(content),
            "og:article:tag" => metadata.tags = uniquify_lists(&[content]),
            "og:type" => metadata.page_type = Some(content),
            "og:article:published_time" => {
                if metadata.date.is_none() {
                    metadata.date = parse_meta_date(&content);
                }
            }
            _ => {}
        }
    }

    metadata
}

/// Read metadata from the `<meta>` elements of the document head.
///
/// OpenGraph values come first. When they already cover every field the
/// generic scan is skipped; otherwise it fills the gaps. Author names are
/// accumulated, not replaced.
#[must_use]
pub fn examine_meta(tree: &Tree) -> Metadata {
    let mut metadata = extract_open_graph(tree);
    if metadata.title.is_some()
        && metadata.author.is_some()
        && metadata.url.is_some()
        && metadata.description.is_some()
        && metadata.sitename.is_some()
        && metadata.image.is_some()
        && metadata.page_type.is_some()
    {
        return metadata;
    }

    let mut author = metadata.author.take().unwrap_or_default();
    let mut tags = std::mem::take(&mut metadata.tags);
    let mut fallback_sitename = None;

    for meta in head_metas(tree) {
        let content = tree.attr(meta, "content").unwrap_or_default();
        let content = trim(&unescape_html(&HTML_TAG_OR_COMMENT.replace_all(content, "")));
        if content.is_empty() {
            continue;
        }

        let property = trim(tree.attr(meta, "property").unwrap_or_default());
        if !property.is_empty() {
            if META_DATE.contains(&property.to_lowercase().as_str()) {
                if metadata.date.is_none() {
                    metadata.date = parse_meta_date(&content);
                }
            } else if property.starts_with("og:") {
                // read by extract_open_graph
            } else if property == "article:tag" {
                tags.push(content);
            } else if property == "author" || property == "article:author" {
                author = normalize_authors(&author, &content);
            } else if property == "article:publisher" {
                fill(&mut metadata.sitename, content);
            } else if META_NAME_IMAGE.contains(&property.as_str()) {
                fill(&mut metadata.image, content);
            }
            continue;
        }

        let name = trim(&tree.attr(meta, "name").unwrap_or_default().to_lowercase());
        if !name.is_empty() {
            let name = name.as_str();
            if META_NAME_AUTHOR.contains(&name) {
                author = normalize_authors(&author, &content);
            } else if META_NAME_TITLE.contains(&name) {
                fill(&mut metadata.title, content);
            } else if META_NAME_DESCRIPTION.contains(&name) {
                fill(&mut metadata.description, content);
            } else if META_NAME_PUBLISHER.contains(&name) {
                fill(&mut metadata.sitename, content);
            } else if name == "application-name" || name.contains("twitter:app:name") {
                fallback_sitename = Some(content);
            } else if name == "twitter:url" {
                if metadata.url.is_none() && url_utils::is_absolute(&content) {
                    metadata.url = Some(content);
                }
            } else if META_NAME_TAG.contains(&name) {
                tags.push(content);
            } else if META_NAME_IMAGE.contains(&name) {
                fill(&mut metadata.image, content);
            } else if META_DATE.contains(&name) && metadata.date.is_none() {
                metadata.date = parse_meta_date(&content);
            }
            continue;
        }

        let itemprop = trim(tree.attr(meta, "itemprop").unwrap_or_default());
        match itemprop.as_str() {
            "author" => author = normalize_authors(&author, &content),
            "description" => fill(&mut metadata.description, content),
            "headline" => fill(&mut metadata.title, content),
            "datePublished" if metadata.date.is_none() => metadata.date = parse_meta_date(&content),
            _ => {}
        }
    }

    if metadata.sitename.is_none() {
        metadata.sitename = fallback_sitename;
    }

    let author = validate_metadata_name(&author);
    metadata.author = (!author.is_empty()).then_some(author);
    metadata.categories = uniquify_lists(&metadata.categories);
    metadata.tags = uniquify_lists(&tags);
    metadata
}

/// Parse a publication date: RFC 3339, ISO 8601 without offset, or a bare
/// `YYYY-MM-DD` date (read as midnight UTC).
#[must_use]
pub fn parse_meta_date(date_str: &str) -> Option<DateTime<Utc>> {
    let date_str = date_str.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M:%S%z"] {
        if let Ok(dt) = DateTime::parse_from_str(date_str, format) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, format) {
            return Some(dt.and_utc());
        }
    }

    let date_part = date_str.get(..10).unwrap_or(date_str);
    for format in ["%Y-%m-%d", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(date_part, format) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }

    None
}
