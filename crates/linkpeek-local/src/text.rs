//! Whitespace and markup normalization for extracted metadata fields.

use regex::Regex;

use crate::patterns::RAW_TAG;

/// Strip leading/trailing whitespace and newlines.
pub fn trim(text: &str) -> String {
    text.trim().to_string()
}

/// Collapse every internal whitespace run to one space and trim the ends.
pub fn extended_trim(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove every markup tag, leaving the remaining text (and its whitespace) as is.
pub fn strip_tags(text: &str) -> String {
    delete_matches(text, &RAW_TAG)
}

pub fn delete_matches(text: &str, re: &Regex) -> String {
    re.replace_all(text, "").into_owned()
}

/// Replace every literal `search` with `with`.
///
/// If the replacement would leave nothing, the original text is returned instead, so a
/// cleanup step can never blank a field. Use [`replace_all`] when clearing is intended.
pub fn replace(text: &str, search: &str, with: &str) -> String {
    let replaced = replace_all(text, search, with);
    if replaced.is_empty() {
        text.to_string()
    } else {
        replaced
    }
}

/// Replace every literal `search` with `with`, allowing an empty result.
///
/// An empty `search` leaves the text unchanged.
pub fn replace_all(text: &str, search: &str, with: &str) -> String {
    if search.is_empty() {
        return text.to_string();
    }
    text.replace(search, with)
}
