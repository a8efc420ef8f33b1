//! URL and image-likeness checks for candidate strings pulled out of markup.

use crate::patterns::{self, IMAGE, RAW_URL};

/// True when `text` contains a syntactically plausible URL.
pub fn is_valid_url(text: &str) -> bool {
    patterns::test(text, &RAW_URL)
}

/// True when `text` ends in a known image extension (case-insensitive).
pub fn is_image(text: &str) -> bool {
    patterns::test(text, &IMAGE)
}

/// First URL-looking run in free text, trailing sentence punctuation removed.
pub fn first_url(text: &str) -> Option<String> {
    let m = patterns::first_match(text, &RAW_URL, 0)?;
    let m = m.trim_end_matches(['.', ',', ';', ':', '!', '?']);
    if m.is_empty() {
        return None;
    }
    Some(m.to_string())
}

/// Resolve `candidate` to an absolute URL.
///
/// - Absolute URLs are kept as is.
/// - Scheme-relative (`//cdn.example.com/x.png`) takes the base scheme, or `https`.
/// - Bare hosts (`example.com/a`) get `http://` when there is no base.
/// - Anything else is joined onto `base`.
/// - Fragments are dropped.
pub fn resolve_url(candidate: &str, base: Option<&str>) -> Option<String> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }
    let lc = candidate.to_ascii_lowercase();
    if lc.starts_with("javascript:") || lc.starts_with("mailto:") || lc.starts_with("data:") {
        return None;
    }

    let base = base.and_then(|b| url::Url::parse(b.trim()).ok());
    let abs = if let Some(rest) = candidate.strip_prefix("//") {
        let scheme = base.as_ref().map(|b| b.scheme()).unwrap_or("https");
        url::Url::parse(&format!("{scheme}://{rest}")).ok()?
    } else if let Ok(u) = url::Url::parse(candidate) {
        // `Url::parse("example.com:8080")` yields scheme "example.com"; only trust real schemes.
        if u.has_host() || u.scheme() == "file" {
            u
        } else {
            join_or_prefix(candidate, base.as_ref())?
        }
    } else {
        join_or_prefix(candidate, base.as_ref())?
    };

    let mut u = abs;
    u.set_fragment(None);
    Some(u.to_string())
}

fn join_or_prefix(candidate: &str, base: Option<&url::Url>) -> Option<url::Url> {
    match base {
        Some(b) => b.join(candidate).ok(),
        None if is_valid_url(candidate) => url::Url::parse(&format!("http://{candidate}")).ok(),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_classification() {
        assert!(is_valid_url("https://example.com/a?b=1"));
        assert!(is_valid_url("ftp://files.example.org/pub"));
        assert!(is_valid_url("www.example.com"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url(""));
    }

    #[test]
    fn image_classification() {
        assert!(is_image("photo.JPG"));
        assert!(is_image("https://cdn.example.com/a/b/banner.webp"));
        assert!(!is_image("page.html"));
        assert!(!is_image(".png"));
        assert!(!is_image("photo.jpg?w=200"));
        assert!(!is_image(""));
    }

    #[test]
    fn first_url_finds_link_in_prose() {
        assert_eq!(
            first_url("read https://example.com/post-1. thanks"),
            Some("https://example.com/post-1".to_string())
        );
        assert_eq!(first_url("nothing to see"), None);
    }

    #[test]
    fn resolves_relative_and_scheme_relative() {
        let base = Some("https://example.com/blog/post");
        assert_eq!(
            resolve_url("/img/a.png#top", base),
            Some("https://example.com/img/a.png".to_string())
        );
        assert_eq!(
            resolve_url("b.png", base),
            Some("https://example.com/blog/b.png".to_string())
        );
        assert_eq!(
            resolve_url("//cdn.example.net/c.png", None),
            Some("https://cdn.example.net/c.png".to_string())
        );
        assert_eq!(
            resolve_url("example.org/x", None),
            Some("http://example.org/x".to_string())
        );
    }

    #[test]
    fn rejects_unresolvable_candidates() {
        assert_eq!(resolve_url("", Some("https://example.com")), None);
        assert_eq!(resolve_url("mailto:a@example.com", None), None);
        assert_eq!(resolve_url("relative/path", None), None);
    }
}
