//! MIME type / filename extension classification over a [`TypeRegistry`].

use std::sync::Arc;

use linkpeek_core::{TagClass, TypeRegistry};

use crate::registry::StaticTypeRegistry;

/// Canonical form of an extension: trimmed, lowercased, without dots or a file stem.
///
/// `"JPG"`, `".jpg"` and `"photo.JPG"` all become `"jpg"`.
pub fn normalize_extension(ext: &str) -> Option<String> {
    let ext = ext.trim();
    let ext = ext.rsplit_once('.').map(|(_, tail)| tail).unwrap_or(ext);
    if ext.is_empty() || ext.contains(['/', '\\', ' ']) {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Canonical form of a MIME type: parameters dropped, trimmed, lowercased.
///
/// `"Text/HTML; charset=utf-8"` becomes `"text/html"`.
pub fn normalize_mime_type(mime: &str) -> Option<String> {
    let essence = mime.split(';').next().unwrap_or("").trim();
    let (ty, sub) = essence.split_once('/')?;
    if ty.trim().is_empty() || sub.trim().is_empty() {
        return None;
    }
    Some(essence.to_ascii_lowercase())
}

#[derive(Clone)]
pub struct TypeClassifier {
    registry: Arc<dyn TypeRegistry>,
}

impl std::fmt::Debug for TypeClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeClassifier").finish_non_exhaustive()
    }
}

impl Default for TypeClassifier {
    fn default() -> Self {
        Self::builtin()
    }
}

impl TypeClassifier {
    pub fn new(registry: Arc<dyn TypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn builtin() -> Self {
        Self::new(Arc::new(StaticTypeRegistry::builtin()))
    }

    pub fn identifier_for_extension(&self, ext: &str) -> Option<String> {
        let ext = normalize_extension(ext)?;
        self.registry.identifier_for_tag(&ext, TagClass::FilenameExtension)
    }

    pub fn identifier_for_mime_type(&self, mime: &str) -> Option<String> {
        let mime = normalize_mime_type(mime)?;
        self.registry.identifier_for_tag(&mime, TagClass::MimeType)
    }

    pub fn mime_type_for_identifier(&self, identifier: &str) -> Option<String> {
        self.registry.preferred_tag(identifier.trim(), TagClass::MimeType)
    }

    pub fn extension_for_identifier(&self, identifier: &str) -> Option<String> {
        self.registry.preferred_tag(identifier.trim(), TagClass::FilenameExtension)
    }

    /// Preferred MIME type for a filename extension.
    pub fn mime_type_for_extension(&self, ext: &str) -> Option<String> {
        let id = self.identifier_for_extension(ext)?;
        self.mime_type_for_identifier(&id)
    }

    /// Preferred filename extension for a MIME type.
    pub fn extension_for_mime_type(&self, mime: &str) -> Option<String> {
        let id = self.identifier_for_mime_type(mime)?;
        self.extension_for_identifier(&id)
    }

    /// True when the type identified by `ext` is `family` or one of its subtypes.
    pub fn extension_conforms_to(&self, ext: &str, family: &str) -> bool {
        self.identifier_for_extension(ext)
            .is_some_and(|id| self.registry.conforms_to(&id, family.trim()))
    }

    pub fn mime_type_conforms_to(&self, mime: &str, family: &str) -> bool {
        self.identifier_for_mime_type(mime)
            .is_some_and(|id| self.registry.conforms_to(&id, family.trim()))
    }
}
