use serde::{Deserialize, Serialize};

/// Infrastructure errors raised while assembling this layer (registries, executors, settings).
///
/// Normalization and classification never produce these; they degrade to empty strings,
/// `false` or `None` instead.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("invalid type table: {0}")]
    TypeTable(String),
    #[error("executor failed: {0}")]
    Executor(String),
    #[error("not configured: {0}")]
    NotConfigured(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Terminal failure states of the preview pipeline.
///
/// Constructed by the orchestrator at the point of failure; each variant carries an optional
/// context string (usually the offending URL or MIME type) and renders a fixed description.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "context", rename_all = "snake_case")]
pub enum PreviewError {
    #[error("No URL has been found")]
    NoUrlFound(Option<String>),
    #[error("This data is not valid URL")]
    InvalidUrl(Option<String>),
    #[error("This URL cannot be opened")]
    CannotBeOpened(Option<String>),
    #[error("An error occurred when parsing the HTML")]
    ParseError(Option<String>),
    #[error("File is too large to preview")]
    TooLarge(Option<String>),
    #[error("File doesn't have a valid mime type for preview")]
    InvalidMimeType(Option<String>),
}

impl PreviewError {
    pub fn context(&self) -> Option<&str> {
        match self {
            Self::NoUrlFound(c)
            | Self::InvalidUrl(c)
            | Self::CannotBeOpened(c)
            | Self::ParseError(c)
            | Self::TooLarge(c)
            | Self::InvalidMimeType(c) => c.as_deref(),
        }
    }

    /// Stable machine-readable code (matches the serde `kind` tag).
    pub fn code(&self) -> &'static str {
        match self {
            Self::NoUrlFound(_) => "no_url_found",
            Self::InvalidUrl(_) => "invalid_url",
            Self::CannotBeOpened(_) => "cannot_be_opened",
            Self::ParseError(_) => "parse_error",
            Self::TooLarge(_) => "too_large",
            Self::InvalidMimeType(_) => "invalid_mime_type",
        }
    }

    /// The user-facing description (same text as `Display`).
    pub fn description(&self) -> String {
        self.to_string()
    }
}

/// Which kind of tag a type identifier is converted to or from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagClass {
    MimeType,
    FilenameExtension,
}

/// A registry of content-type identifiers (UTI-style, e.g. `public.jpeg`).
///
/// Identifiers convert to and from tags (MIME types, filename extensions) and form a
/// conformance hierarchy (`public.jpeg` conforms to `public.image`).
pub trait TypeRegistry: Send + Sync {
    /// Preferred tag of `class` for `identifier`, if the identifier declares one.
    fn preferred_tag(&self, identifier: &str, class: TagClass) -> Option<String>;
    /// Preferred identifier declaring `tag` of `class`.
    fn identifier_for_tag(&self, tag: &str, class: TagClass) -> Option<String>;
    /// Reflexive, transitive subtype test.
    fn conforms_to(&self, identifier: &str, parent: &str) -> bool;
}

/// A unit of work handed to a [`RenderExecutor`].
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// The designated execution context that HTML rendering must run on.
///
/// Callers on other contexts submit a job and block for its result; callers already on the
/// designated context must run the work inline instead of submitting it to themselves.
pub trait RenderExecutor: Send + Sync {
    /// True when the calling thread is the designated context.
    fn is_current(&self) -> bool;
    /// Queue `job` on the designated context. Does not wait for it to run.
    fn execute(&self, job: Job) -> Result<()>;
}

/// Well-known type identifiers used as conformance families.
pub mod identifiers {
    pub const ITEM: &str = "public.item";
    pub const DATA: &str = "public.data";
    pub const CONTENT: &str = "public.content";
    pub const TEXT: &str = "public.text";
    pub const PLAIN_TEXT: &str = "public.plain-text";
    pub const HTML: &str = "public.html";
    pub const IMAGE: &str = "public.image";
    pub const AUDIOVISUAL_CONTENT: &str = "public.audiovisual-content";
    pub const MOVIE: &str = "public.movie";
    pub const AUDIO: &str = "public.audio";
    pub const PDF: &str = "com.adobe.pdf";
    pub const ARCHIVE: &str = "public.archive";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_error_display_is_fixed_description() {
        let e = PreviewError::InvalidUrl(Some("htp:/nope".to_string()));
        assert_eq!(e.to_string(), "This data is not valid URL");
        assert_eq!(e.context(), Some("htp:/nope"));
        assert_eq!(
            PreviewError::TooLarge(None).to_string(),
            "File is too large to preview"
        );
        assert_eq!(PreviewError::TooLarge(None).context(), None);
    }

    #[test]
    fn preview_error_serializes_with_kind_and_context() {
        let e = PreviewError::NoUrlFound(Some("hello world".to_string()));
        let v = serde_json::to_value(&e).expect("serialize");
        assert_eq!(v["kind"].as_str(), Some(e.code()));
        assert_eq!(v["context"].as_str(), Some("hello world"));

        let back: PreviewError = serde_json::from_value(v).expect("deserialize");
        assert_eq!(back, e);
    }

    #[test]
    fn every_variant_has_distinct_code_and_description() {
        let all = [
            PreviewError::NoUrlFound(None),
            PreviewError::InvalidUrl(None),
            PreviewError::CannotBeOpened(None),
            PreviewError::ParseError(None),
            PreviewError::TooLarge(None),
            PreviewError::InvalidMimeType(None),
        ];
        let codes: std::collections::BTreeSet<_> = all.iter().map(|e| e.code()).collect();
        let descs: std::collections::BTreeSet<_> = all.iter().map(|e| e.description()).collect();
        assert_eq!(codes.len(), all.len());
        assert_eq!(descs.len(), all.len());
    }
}
