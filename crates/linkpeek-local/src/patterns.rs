//! Named, precompiled patterns shared by the normalizer and classifiers.
//!
//! All patterns are case-insensitive and compiled once per process.

use std::sync::LazyLock;

use regex::Regex;

/// Any markup tag, attributes included.
pub static RAW_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)<[^>]+>").expect("RAW_TAG should compile"));

/// A syntactically plausible URL: optional scheme, dotted host, then URL-safe characters.
pub static RAW_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)((https?|ftp|file)://)?((([-a-z0-9]+\.)|\.)+[-a-z0-9]+)[-a-z0-9+&@#/%?=~_|!:,.;]*",
    )
    .expect("RAW_URL should compile")
});

/// A path or file name ending in a known image extension.
pub static IMAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(.+?)\.(gif|jpg|jpeg|png|bmp|webp|svg|ico|tif|tiff|avif|heic)$")
        .expect("IMAGE should compile")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternRole {
    RawTag,
    RawUrl,
    Image,
}

pub fn pattern(role: PatternRole) -> &'static Regex {
    match role {
        PatternRole::RawTag => &RAW_TAG,
        PatternRole::RawUrl => &RAW_URL,
        PatternRole::Image => &IMAGE,
    }
}

/// True when `re` matches anywhere in `text`.
pub fn test(text: &str, re: &Regex) -> bool {
    re.is_match(text)
}

/// Capture `group` of the first match (group 0 is the whole match).
///
/// Returns `None` when nothing matches or the group did not participate.
pub fn first_match(text: &str, re: &Regex, group: usize) -> Option<String> {
    re.captures(text)
        .and_then(|c| c.get(group))
        .map(|m| m.as_str().to_string())
}

/// Capture `group` of every non-overlapping match, in order.
pub fn all_matches(text: &str, re: &Regex, group: usize) -> Vec<String> {
    re.captures_iter(text)
        .filter_map(|c| c.get(group).map(|m| m.as_str().to_string()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roles_resolve_to_their_patterns() {
        assert!(test("<a href=\"x\">", pattern(PatternRole::RawTag)));
        assert!(test("https://example.com", pattern(PatternRole::RawUrl)));
        assert!(test("cat.png", pattern(PatternRole::Image)));
        assert!(!test("plain words", pattern(PatternRole::RawTag)));
    }

    #[test]
    fn first_match_returns_requested_group() {
        assert_eq!(
            first_match("see /img/cat.PNG now", &IMAGE, 2),
            None,
            "image pattern is anchored at the end of the text"
        );
        assert_eq!(
            first_match("/img/cat.PNG", &IMAGE, 2),
            Some("PNG".to_string())
        );
        assert_eq!(
            first_match("visit example.org today", &RAW_URL, 0),
            Some("example.org".to_string())
        );
        assert_eq!(first_match("nothing here", &RAW_URL, 0), None);
    }

    #[test]
    fn all_matches_collects_in_order() {
        let tags = all_matches("<p>a</p><br/>", &RAW_TAG, 0);
        assert_eq!(tags, vec!["<p>", "</p>", "<br/>"]);
        assert!(all_matches("", &RAW_TAG, 0).is_empty());
    }

    #[test]
    fn patterns_are_case_insensitive() {
        assert!(test("HTTPS://EXAMPLE.COM", &RAW_URL));
        assert!(test("photo.JpEg", &IMAGE));
        assert!(test("<DIV CLASS=x>", &RAW_TAG));
    }
}
