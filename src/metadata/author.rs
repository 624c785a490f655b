//! Author name cleanup.
//!
//! Raw author strings come from meta tags, JSON-LD and bylines. They carry
//! prefixes ("By"), social handles, e-mail addresses, trailing dates and
//! several names in one string. [`normalize_authors`] turns them into a
//! `"; "`-joined list of title-cased names.

use std::sync::LazyLock;

use regex::Regex;

use crate::utils::{char_len, trim, unescape_html};

#[allow(clippy::expect_used)]
static URL_CHECK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)https?://").expect("valid regex"));

#[allow(clippy::expect_used)]
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}\b").expect("valid regex")
});

#[allow(clippy::expect_used)]
static EMOJI: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\p{Extended_Pictographic}\p{Emoji_Modifier}\x{FE0F}\x{200D}]")
        .expect("valid regex")
});

#[allow(clippy::expect_used)]
static DIGITS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\pN.+?$").expect("valid regex"));

#[allow(clippy::expect_used)]
static SOCIAL_HANDLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"@\S+").expect("valid regex"));

#[allow(clippy::expect_used)]
static SPACE_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[._+]").expect("valid regex"));

#[allow(clippy::expect_used)]
static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

#[allow(clippy::expect_used)]
static SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)/|;|,|\||&|(?:^|[^\pL\pM\pN_])[ua]nd(?:$|[^\pL\pM\pN_])").expect("valid regex")
});

#[allow(clippy::expect_used)]
static NICKNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"["‘({\[’'][^"]+?[‘’"')\]}]"#).expect("valid regex")
});

#[allow(clippy::expect_used)]
static SPECIAL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[^\pL\pM\pN_]+$|[:()?*$#!%/<>{}~¿]").expect("valid regex")
});

#[allow(clippy::expect_used)]
static PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^([a-zäöüß]+(ed|t))? ?(written by|words by|words|by|von|from) ")
        .expect("valid regex")
});

#[allow(clippy::expect_used)]
static PREPOSITION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b\s+(am|on|for|at|in|to|from|of|via|with|—|-|–)\s+(.*)").expect("valid regex")
});

/// Curly braces or a backslash: leftovers of a broken JSON-LD block.
#[allow(clippy::expect_used)]
pub(crate) static JSON_SYMBOL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[{\\}]").expect("valid regex"));

/// Single names longer than this are treated as garbage.
const MAX_SINGLE_TOKEN_LEN: usize = 50;

/// Merge the names found in `input` into the `"; "`-joined list `authors`.
///
/// Inputs that look like a URL or an e-mail address are ignored. Names
/// already present in `authors` are not added twice, and names are
/// title-cased unless they already start uppercase with mixed case.
///
/// # Example
///
/// ```rust
/// use article_extractor::metadata::normalize_authors;
///
/// let authors = normalize_authors("", "By jenny smith and John Smith");
/// assert_eq!(authors, "Jenny Smith; John Smith");
/// assert_eq!(normalize_authors("", &authors), authors);
/// ```
#[must_use]
pub fn normalize_authors(authors: &str, input: &str) -> String {
    if URL_CHECK.is_match(input) || EMAIL.is_match(input) {
        return authors.to_string();
    }

    let mut input = unescape_html(&trim(input));
    input = EMOJI.replace_all(&input, "").into_owned();
    input = DIGITS.replace_all(&input, "").into_owned();
    input = SOCIAL_HANDLE.replace_all(&input, "").into_owned();
    input = SPACE_CHARS.replace_all(&input, " ").into_owned();
    if input.contains("&#") || input.contains("&amp;") {
        input = unescape_html(&input);
    }
    input = HTML_TAG.replace_all(&input, "").into_owned();

    let mut list: Vec<String> = authors
        .split("; ")
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect();

    for part in SEPARATOR.split(&input) {
        let part = NICKNAME.replace_all(part, "");
        let part = SPECIAL_CHARS.replace_all(&part, "");
        let part = PREFIX.replace_all(&part, "");
        let part = PREPOSITION.replace_all(&part, "");
        let mut name = trim(&part);

        let length = char_len(&name);
        if length == 0 || (!name.contains('-') && !name.contains(' ') && length >= MAX_SINGLE_TOKEN_LEN) {
            continue;
        }

        let starts_upper = name.chars().next().is_some_and(char::is_uppercase);
        if !starts_upper || name.to_lowercase() == name {
            name = title_case(&name);
        }

        if !list.contains(&name) {
            list.push(name);
        }
    }

    list.join("; ")
}

/// Uppercase the first letter of every word and lowercase the rest.
#[must_use]
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphanumeric() || c == '\'' || c == '’' {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

/// Return `name` unless it cannot be a person or organization name: a single
/// word, a URL, or a string holding JSON symbols. Rejected names come back
/// empty.
#[must_use]
pub fn validate_metadata_name(name: &str) -> String {
    if name.is_empty() {
        return String::new();
    }
    if !name.contains(' ') || name.starts_with("http") || JSON_SYMBOL.is_match(name) {
        return String::new();
    }
    name.to_string()
}

/// Remove blacklisted names (case-insensitive) from a `"; "`-joined list.
#[must_use]
pub fn remove_blacklisted_authors(current: &str, blacklist: &[String]) -> String {
    if current.is_empty() || blacklist.is_empty() {
        return current.to_string();
    }

    let blacklisted: Vec<String> = blacklist.iter().map(|name| name.to_lowercase()).collect();
    current
        .split(';')
        .map(str::trim)
        .filter(|name| !name.is_empty() && !blacklisted.contains(&name.to_lowercase()))
        .collect::<Vec<_>>()
        .join("; ")
}
