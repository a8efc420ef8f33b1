//! `linkpeek`: normalize and classify the text a link preview scrapes out of a page.
//!
//! The error taxonomy and the registry/executor traits come from `linkpeek-core`; the
//! in-process implementations live under [`local`] and their most used items are lifted to the
//! crate root.
//!
//! ```
//! use linkpeek::{extended_trim, is_image, PreviewError};
//!
//! assert_eq!(extended_trim("  Big \n news "), "Big news");
//! assert!(is_image("https://cdn.example.com/hero.png"));
//! assert_eq!(PreviewError::NoUrlFound(None).code(), "no_url_found");
//! ```

pub use linkpeek_core::*;
pub use linkpeek_local as local;

pub use linkpeek_local::{
    decode_entities, extended_trim, first_url, is_image, is_valid_url, replace, replace_all,
    resolve_url, strip_tags, substring, substring_range, trim, ClampPolicy, EntityDecoder,
    Settings, TextRange, Toolkit, TypeClassifier,
};
