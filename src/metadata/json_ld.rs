//! JSON-LD metadata.
//!
//! Every `application/ld+json` and `application/settings+json` script block
//! is decoded and walked recursively. Objects typed as a person, an
//! organization or website, or an article-like page are collected, ranked
//! by type, and their names, keywords and sections merged into the metadata
//! found so far.

use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::etree::Tree;
use crate::observer::Observer;
use crate::result::Metadata;
use crate::utils::{char_len, trim, unescape_html};

use super::author::{normalize_authors, validate_metadata_name, JSON_SYMBOL};
use super::meta_tags::parse_meta_date;
use super::uniquify_lists;

/// `"name": "..."` inside a string that holds unparsed JSON.
#[allow(clippy::expect_used)]
static NAME_JSON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)"name\\?":\s*\\?"([^"\\]+)"#).expect("valid regex"));

/// A typed schema object and its rank among objects of the same group.
#[derive(Debug, Clone)]
struct Schema<'a> {
    kind: String,
    data: &'a Map<String, Value>,
    importance: u8,
}

#[derive(Debug, Default)]
struct Schemas<'a> {
    persons: Vec<Schema<'a>>,
    organizations: Vec<Schema<'a>>,
    articles: Vec<Schema<'a>>,
}

impl<'a> Schemas<'a> {
    fn collect(&mut self, obj: &'a Map<String, Value>) {
        for kind in schema_types(obj, false) {
            let lower = kind.to_lowercase();

            if lower == "person" {
                self.persons.push(Schema { kind, data: obj, importance: 0 });
                break;
            }

            let is_organization = lower.contains("organization");
            if is_organization || lower == "website" {
                let importance = if is_organization { 2 } else { 1 };
                self.organizations.push(Schema { kind, data: obj, importance });
                break;
            }

            let importance = if lower.contains("article") || lower.contains("posting") || lower == "report" {
                3
            } else if lower == "blog" {
                2
            } else if lower.contains("page") || lower.contains("listing") {
                1
            } else {
                continue;
            };
            self.articles.push(Schema { kind, data: obj, importance });
            break;
        }

        for value in obj.values() {
            match value {
                Value::Object(child) => self.collect(child),
                Value::Array(items) => {
                    for item in items {
                        if let Value::Object(child) = item {
                            self.collect(child);
                        }
                    }
                }
                _ => {}
            }
        }
    }
}

/// Decode the JSON of every schema script block. Blocks that fail to parse
/// are reported and skipped.
fn decode_scripts(tree: &Tree, observer: &dyn Observer) -> Vec<Value> {
    let scripts = tree.find_all(tree.root(), |n| {
        n.tag() == "script"
            && matches!(n.attr("type"), "application/ld+json" | "application/settings+json")
    });

    let mut blocks = Vec::new();
    for script in scripts {
        let text = unescape_html(tree.text_content(script).trim());
        if text.is_empty() {
            continue;
        }
        match serde_json::from_str::<Value>(&text) {
            Ok(value) => blocks.push(value),
            Err(err) => observer.warn(format_args!("error in JSON metadata extraction: {err}")),
        }
    }
    blocks
}

/// Merge JSON-LD metadata into `original`.
///
/// Author, categories and tags found here replace the existing values. The
/// site name replaces the existing one only when it is longer. Title, page
/// type and date only fill gaps.
#[must_use]
pub fn extract_json_ld(tree: &Tree, original: Metadata, observer: &dyn Observer) -> Metadata {
    let blocks = decode_scripts(tree, observer);

    let mut schemas = Schemas::default();
    for block in &blocks {
        match block {
            Value::Object(obj) => schemas.collect(obj),
            Value::Array(items) => {
                for item in items {
                    if let Value::Object(obj) = item {
                        schemas.collect(obj);
                    }
                }
            }
            _ => {}
        }
    }
    schemas.organizations.sort_by(|a, b| b.importance.cmp(&a.importance));
    schemas.articles.sort_by(|a, b| b.importance.cmp(&a.importance));

    let mut author = String::new();
    let mut sitename = String::new();
    let mut title = String::new();
    let mut page_type = String::new();
    let mut date = None;
    let mut categories = Vec::new();
    let mut tags = Vec::new();

    for article in &schemas.articles {
        if author.is_empty() {
            for name in schema_names(article.data.get("author"), &["person"]) {
                author = normalize_authors(&author, &validate_metadata_name(&name));
            }
        }

        if sitename.is_empty() {
            if let Some(name) = schema_names(article.data.get("publisher"), &[]).into_iter().next() {
                sitename = name;
            }
        }

        categories.extend(string_values(article.data, "articleSection"));
        tags.extend(schema_names(article.data.get("keywords"), &[]));

        if title.is_empty() {
            title = single_string_value(article.data, "name");
        }
        if title.is_empty() || title.split_whitespace().count() == 1 {
            let headline = article
                .data
                .keys()
                .filter(|key| key.to_lowercase().contains("headline"))
                .map(|key| single_string_value(article.data, key))
                .find(|value| !value.is_empty() && !value.contains("..."));
            if let Some(headline) = headline {
                title = headline;
            }
        }

        if page_type.is_empty() && !title.is_empty() {
            page_type.clone_from(&article.kind);
        }

        if date.is_none() {
            date = parse_meta_date(&single_string_value(article.data, "datePublished"));
        }
    }

    if author.is_empty() {
        for person in &schemas.persons {
            for name in object_names(person.data, &[]) {
                author = normalize_authors(&author, &validate_metadata_name(&name));
            }
        }
    }

    if sitename.is_empty() {
        let names: Vec<String> = schemas
            .organizations
            .iter()
            .flat_map(|org| object_names(org.data, &[]))
            .map(|name| validate_metadata_name(&name))
            .filter(|name| !name.is_empty())
            .collect();
        sitename = names.join("; ");
    }

    if page_type.is_empty() {
        if let Some(first) = schemas.articles.first() {
            page_type.clone_from(&first.kind);
        }
    }

    let mut metadata = original;
    if metadata.title.is_none() && !title.is_empty() {
        metadata.title = Some(title);
    }
    if metadata.page_type.is_none() && !page_type.is_empty() {
        metadata.page_type = Some(page_type);
    }
    if !author.is_empty() {
        metadata.author = Some(author);
    }

    let categories = uniquify_lists(&categories);
    if !categories.is_empty() {
        metadata.categories = categories;
    }
    let tags = uniquify_lists(&tags);
    if !tags.is_empty() {
        metadata.tags = tags;
    }

    if char_len(&sitename) > metadata.sitename.as_deref().map_or(0, char_len) {
        metadata.sitename = Some(sitename);
    }
    if metadata.date.is_none() {
        metadata.date = date;
    }

    metadata
}

/// Trimmed, non-empty string values under `key`: a single string or the
/// strings of an array.
fn string_values(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::String(value)) => {
            let value = trim(value);
            if value.is_empty() {
                Vec::new()
            } else {
                vec![value]
            }
        }
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .map(trim)
            .filter(|value| !value.is_empty())
            .collect(),
        _ => Vec::new(),
    }
}

fn single_string_value(obj: &Map<String, Value>, key: &str) -> String {
    string_values(obj, key).into_iter().next().unwrap_or_default()
}

/// `@type` of a schema object, a string or an array of strings.
fn schema_types(obj: &Map<String, Value>, to_lower: bool) -> Vec<String> {
    let convert = |s: &str| if to_lower { s.to_lowercase() } else { s.to_string() };
    match obj.get("@type") {
        Some(Value::String(kind)) => vec![convert(kind)],
        Some(Value::Array(kinds)) => kinds.iter().filter_map(Value::as_str).map(convert).collect(),
        _ => Vec::new(),
    }
}

/// Resolve the names held by a schema value.
///
/// Strings are returned as they are (or the `name` field of the unparsed
/// JSON they hold). Objects give their `name`, the composed name of a
/// person, their `legalName` or their `alternateName`. Arrays are flattened.
/// When `expected` is not empty, objects of other types give nothing.
fn schema_names(value: Option<&Value>, expected: &[&str]) -> Vec<String> {
    match value {
        Some(Value::String(raw)) => {
            let mut name = raw.as_str();
            if JSON_SYMBOL.is_match(raw) {
                if let Some(inner) = NAME_JSON.captures(raw).and_then(|caps| caps.get(1)) {
                    name = inner.as_str();
                }
            }
            let name = trim(name);
            if name.is_empty() {
                Vec::new()
            } else {
                vec![name]
            }
        }
        Some(Value::Object(obj)) => object_names(obj, expected),
        Some(Value::Array(items)) => items
            .iter()
            .flat_map(|item| schema_names(Some(item), expected))
            .collect(),
        _ => Vec::new(),
    }
}

fn object_names(obj: &Map<String, Value>, expected: &[&str]) -> Vec<String> {
    let kinds = schema_types(obj, true);
    if !expected.is_empty() && !kinds.iter().any(|kind| expected.contains(&kind.as_str())) {
        return Vec::new();
    }

    let mut names = string_values(obj, "name");
    if names.is_empty() && kinds.iter().any(|kind| kind == "person") {
        let full = trim(&format!(
            "{} {} {}",
            single_string_value(obj, "givenName"),
            single_string_value(obj, "additionalName"),
            single_string_value(obj, "familyName"),
        ));
        if !full.is_empty() {
            names.push(full);
        }
    }
    if names.is_empty() {
        names = string_values(obj, "legalName");
    }
    if names.is_empty() {
        names = string_values(obj, "alternateName");
    }
    if !names.is_empty() {
        return names;
    }

    match obj.get("name") {
        Some(nested @ (Value::Object(_) | Value::Array(_))) => schema_names(Some(nested), expected),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;
    use crate::observer::SilentObserver;

    fn json_ld(html: &str, original: Metadata) -> Metadata {
        extract_json_ld(&dom::parse(html), original, &SilentObserver)
    }

    #[test]
    fn test_article_schema() {
        let html = r#"<html><head><script type="application/ld+json">
            {
                "@context": "https://schema.org",
                "@type": "NewsArticle",
                "headline": "Rust Ships a New Release",
                "author": {"@type": "Person", "name": "Jenny Smith"},
                "publisher": {"@type": "Organization", "name": "Example News"},
                "articleSection": "Technology",
                "keywords": ["rust", "release"],
                "datePublished": "2024-02-01T08:00:00Z"
            }
        </script></head><body></body></html>"#;
        let metadata = json_ld(html, Metadata::default());

        assert_eq!(metadata.title.as_deref(), Some("Rust Ships a New Release"));
        assert_eq!(metadata.author.as_deref(), Some("Jenny Smith"));
        assert_eq!(metadata.sitename.as_deref(), Some("Example News"));
        assert_eq!(metadata.categories, vec!["Technology"]);
        assert_eq!(metadata.tags, vec!["rust", "release"]);
        assert_eq!(metadata.page_type.as_deref(), Some("NewsArticle"));
        assert!(metadata.date.is_some());
    }

    #[test]
    fn test_author_overrides_existing() {
        let html = r#"<html><head><script type="application/ld+json">
            {"@type": "BlogPosting", "author": {"@type": "Person", "givenName": "Jenny", "familyName": "Smith"}}
        </script></head><body></body></html>"#;
        let original = Metadata {
            author: Some("Meta Author".to_string()),
            title: Some("Meta Title".to_string()),
            ..Metadata::default()
        };
        let metadata = json_ld(html, original);
        assert_eq!(metadata.author.as_deref(), Some("Jenny Smith"));
        assert_eq!(metadata.title.as_deref(), Some("Meta Title"));
    }

    #[test]
    fn test_graph_and_sitename_length() {
        let html = r#"<html><head><script type="application/ld+json">
            {"@graph": [
                {"@type": "WebSite", "name": "Example Website Name"},
                {"@type": "Person", "name": "John Smith"}
            ]}
        </script></head><body></body></html>"#;
        let original = Metadata {
            sitename: Some("Example".to_string()),
            ..Metadata::default()
        };
        let metadata = json_ld(html, original);
        assert_eq!(metadata.sitename.as_deref(), Some("Example Website Name"));
        assert_eq!(metadata.author.as_deref(), Some("John Smith"));
    }

    #[test]
    fn test_shorter_sitename_kept() {
        let html = r#"<html><head><script type="application/ld+json">
            {"@type": "Organization", "name": "Ex Co"}
        </script></head><body></body></html>"#;
        let original = Metadata {
            sitename: Some("Example Company Limited".to_string()),
            ..Metadata::default()
        };
        let metadata = json_ld(html, original);
        assert_eq!(metadata.sitename.as_deref(), Some("Example Company Limited"));
    }

    #[test]
    fn test_malformed_block_skipped() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"@type": "Article", "headline": </script>
            <script type="application/ld+json">{"@type": "Article", "headline": "Valid Block Title"}</script>
        </head><body></body></html>"#;
        let metadata = json_ld(html, Metadata::default());
        assert_eq!(metadata.title.as_deref(), Some("Valid Block Title"));
    }

    #[test]
    fn test_headline_with_ellipsis_ignored() {
        let html = r#"<html><head><script type="application/ld+json">
            {"@type": "Article", "headline": "Truncated headline..."}
        </script></head><body></body></html>"#;
        assert!(json_ld(html, Metadata::default()).title.is_none());
    }

    #[test]
    fn test_schema_names() {
        let value: Value = match serde_json::from_str(
            r#"[{"@type": "Person", "name": "Jenny Smith"}, "John Smith", {"@type": "Thing", "alternateName": "Alt Name"}]"#,
        ) {
            Ok(value) => value,
            Err(err) => panic!("expected Ok(_), got Err({err:?})"),
        };
        assert_eq!(
            schema_names(Some(&value), &[]),
            vec!["Jenny Smith", "John Smith", "Alt Name"]
        );
        assert_eq!(schema_names(Some(&value), &["person"]), vec!["Jenny Smith", "John Smith"]);
    }
}
