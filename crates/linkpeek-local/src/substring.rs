//! Range-safe substring extraction.
//!
//! Offsets count Unicode scalar values (`char`s), so a range never splits a UTF-8 sequence.
//! Out-of-range input is clamped; nothing here panics or returns an error.

/// How an `end` beyond the text is pulled back in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClampPolicy {
    /// `end = len - 1`. Drops the last character when `end` overshoots.
    #[default]
    Legacy,
    /// `end = len`.
    Length,
}

impl ClampPolicy {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Some(Self::Legacy),
            "length" => Some(Self::Length),
            _ => None,
        }
    }

    fn clamp_end(self, end: usize, len: usize) -> usize {
        if end <= len {
            return end;
        }
        match self {
            Self::Legacy => len.saturating_sub(1),
            Self::Length => len,
        }
    }
}

/// A `(location, length)` range over a text, in chars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRange {
    pub location: usize,
    pub length: usize,
}

impl TextRange {
    pub fn new(location: usize, length: usize) -> Self {
        Self { location, length }
    }

    pub fn end(&self) -> usize {
        self.location.saturating_add(self.length)
    }
}

/// `text[start..end]` in chars, with the default clamp policy.
pub fn substring(text: &str, start: usize, end: usize) -> String {
    substring_with(text, start, end, ClampPolicy::default())
}

/// `text[location..location + length]` in chars, with the default clamp policy.
pub fn substring_range(text: &str, range: TextRange) -> String {
    substring_with(text, range.location, range.end(), ClampPolicy::default())
}

pub fn substring_range_with(text: &str, range: TextRange, policy: ClampPolicy) -> String {
    substring_with(text, range.location, range.end(), policy)
}

pub fn substring_with(text: &str, start: usize, end: usize, policy: ClampPolicy) -> String {
    let len = text.chars().count();
    let end = policy.clamp_end(end, len);
    if start >= end {
        return String::new();
    }
    let lo = byte_offset(text, start);
    let hi = byte_offset(text, end);
    text[lo..hi].to_string()
}

// `char_idx` must be <= the char count.
fn byte_offset(text: &str, char_idx: usize) -> usize {
    text.char_indices()
        .nth(char_idx)
        .map(|(b, _)| b)
        .unwrap_or(text.len())
}
