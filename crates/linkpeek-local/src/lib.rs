//! In-process text normalization and classification for link previews.
//!
//! Everything here is total: malformed input degrades to an empty string, `false` or `None`,
//! never an error. Deciding whether that is fatal (and which `PreviewError` to raise) is left to
//! the caller.

pub mod classify;
pub mod decode;
pub mod executor;
pub mod mime;
pub mod patterns;
pub mod registry;
pub mod settings;
pub mod substring;
pub mod text;

pub use classify::{first_url, is_image, is_valid_url, resolve_url};
pub use decode::{decode_entities, EntityDecoder};
pub use executor::{InlineExecutor, RenderThread};
pub use mime::TypeClassifier;
pub use registry::{StaticTypeRegistry, TypeDeclaration};
pub use settings::{RenderMode, Settings, Toolkit};
pub use substring::{substring, substring_range, ClampPolicy, TextRange};
pub use text::{extended_trim, replace, replace_all, strip_tags, trim};
