//! URL helpers for metadata and link rewriting.
//!
//! Only `http` and `https` URLs with a host count as absolute.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

/// Host part of an http(s) URL, without a `www.` or `wN.` prefix.
#[allow(clippy::expect_used)]
static SITENAME_FINDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)https?://(?:www\.|w[0-9]+\.)?([^/]+)").expect("valid regex")
});

/// Parse `s` if it is an absolute http(s) URL with a host.
#[must_use]
pub fn parse_absolute(s: &str) -> Option<Url> {
    let url = Url::parse(s.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
        return None;
    }
    Some(url)
}

/// Check whether `s` is an absolute http(s) URL.
#[must_use]
pub fn is_absolute(s: &str) -> bool {
    parse_absolute(s).is_some()
}

/// Resolve `s` against `base`. Fragments, `data:` and `javascript:` URIs and
/// URLs that already have a scheme and host are returned unchanged, as is
/// everything when there is no base.
#[must_use]
pub fn resolve(s: &str, base: Option<&Url>) -> String {
    let Some(base) = base else {
        return s.to_string();
    };
    if s.is_empty() || s.starts_with('#') || s.starts_with("data:") || s.starts_with("javascript:") {
        return s.to_string();
    }
    if Url::parse(s).is_ok_and(|url| url.host_str().is_some()) {
        return s.to_string();
    }
    base.join(s).map_or_else(|_| s.to_string(), |url| url.to_string())
}

/// Return `s` if absolute, else its resolution against `base` if that is
/// absolute, else `None`.
#[must_use]
pub fn validate(s: &str, base: Option<&Url>) -> Option<String> {
    if is_absolute(s) {
        return Some(s.to_string());
    }
    let resolved = resolve(s, base);
    is_absolute(&resolved).then_some(resolved)
}

/// Hostname of an absolute URL.
#[must_use]
pub fn hostname(s: &str) -> Option<String> {
    parse_absolute(s).and_then(|url| url.host_str().map(str::to_string))
}

/// `scheme://host` of an absolute URL.
#[must_use]
pub fn base_url(s: &str) -> Option<String> {
    let url = parse_absolute(s)?;
    url.host_str().map(|host| format!("{}://{}", url.scheme(), host))
}

/// Site name guessed from a URL: its host without `www.`/`wN.`.
#[must_use]
pub fn sitename_from_url(s: &str) -> Option<String> {
    SITENAME_FINDER
        .captures(s)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}
