//! Turning homepage hrefs into absolute article URLs.
//!
//! Homepages mix three link shapes:
//!
//! | Shape | Example | Result |
//! |-------|---------|--------|
//! | Absolute | `https://site.com/news/1` | unchanged |
//! | Root-relative | `/news/1` | `host + link` |
//! | Bare relative | `news/1` | `host + "/" + link` |
//!
//! The checks run in that order and the first match wins.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static WELL_FORMED_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^https?://.+/.+$").expect("valid absolute link pattern"));
static ROOT_PATH: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/.+$").expect("valid root path pattern"));

/// An absolute URL ready for retrieval. Only [`build_link`] creates one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalUrl(String);

impl CanonicalUrl {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Resolve `link` against `host`.
///
/// Never fails: malformed input degrades to plain concatenation.
///
/// # Arguments
///
/// * `host` - The site's configured homepage URL, used verbatim
/// * `link` - A raw `href` taken from the homepage
///
/// # Returns
///
/// The link itself when already absolute, `host + link` for root-relative
/// paths, and `host + "/" + link` otherwise (an empty link yields `host + "/"`).
///
/// # Examples
///
/// ```
/// use news_scraper::links::build_link;
///
/// let host = "https://elmundo.example";
/// assert_eq!(build_link(host, "/a/2").as_str(), "https://elmundo.example/a/2");
/// assert_eq!(build_link(host, "a/3").as_str(), "https://elmundo.example/a/3");
/// ```
pub fn build_link(host: &str, link: &str) -> CanonicalUrl {
    if WELL_FORMED_LINK.is_match(link) {
        CanonicalUrl(link.to_string())
    } else if ROOT_PATH.is_match(link) {
        CanonicalUrl(format!("{host}{link}"))
    } else {
        CanonicalUrl(format!("{host}/{link}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOST: &str = "https://elmundo.example";

    #[test]
    fn test_absolute_link_unchanged() {
        for link in [
            "https://elmundo.example/a/1",
            "http://other.example/section/story.html",
            "https://cdn.example/x?y=1",
        ] {
            assert_eq!(build_link(HOST, link).as_str(), link);
        }
    }

    #[test]
    fn test_root_relative_link() {
        assert_eq!(build_link(HOST, "/a/2").as_str(), "https://elmundo.example/a/2");
        assert_eq!(build_link(HOST, "/x").as_str(), "https://elmundo.example/x");
    }

    #[test]
    fn test_bare_relative_link() {
        assert_eq!(build_link(HOST, "a/3").as_str(), "https://elmundo.example/a/3");
        assert_eq!(
            build_link(HOST, "story.html").as_str(),
            "https://elmundo.example/story.html"
        );
    }

    #[test]
    fn test_empty_link() {
        assert_eq!(build_link(HOST, "").as_str(), "https://elmundo.example/");
    }

    #[test]
    fn test_lone_slash_is_not_root_path() {
        // "/" needs at least one more character to count as root-relative
        assert_eq!(build_link(HOST, "/").as_str(), "https://elmundo.example//");
    }

    #[test]
    fn test_absolute_without_path_falls_through() {
        assert_eq!(
            build_link(HOST, "https://elmundo.example").as_str(),
            "https://elmundo.example/https://elmundo.example"
        );
    }

    #[test]
    fn test_protocol_relative_is_root_path() {
        assert_eq!(
            build_link(HOST, "//cdn.example/a").as_str(),
            "https://elmundo.example//cdn.example/a"
        );
    }

    #[test]
    fn test_host_used_verbatim() {
        assert_eq!(build_link("https://h.example/", "/p").as_str(), "https://h.example//p");
    }
}
