//! Table-backed [`TypeRegistry`].
//!
//! Each [`TypeDeclaration`] names an identifier, its parents, and the extensions and MIME types
//! it claims; the first extension/MIME type listed is the preferred one. The built-in table ships
//! as `types.json` and can be extended from JSON text or a file.

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::LazyLock;

use linkpeek_core::{Error, Result, TagClass, TypeRegistry};
use serde::{Deserialize, Serialize};

static BUILTIN: LazyLock<Vec<TypeDeclaration>> = LazyLock::new(|| {
    serde_json::from_str(include_str!("../types.json")).expect("types.json should parse")
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeDeclaration {
    pub identifier: String,
    #[serde(default)]
    pub conforms_to: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub mime_types: Vec<String>,
}

impl TypeDeclaration {
    fn tags(&self, class: TagClass) -> &[String] {
        match class {
            TagClass::MimeType => &self.mime_types,
            TagClass::FilenameExtension => &self.extensions,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StaticTypeRegistry {
    decls: Vec<TypeDeclaration>,
    by_id: HashMap<String, usize>,
    by_ext: HashMap<String, usize>,
    by_mime: HashMap<String, usize>,
}

impl StaticTypeRegistry {
    /// Registry over the built-in table.
    pub fn builtin() -> Self {
        Self::from_declarations(BUILTIN.clone())
    }

    /// The built-in declarations, in table order.
    pub fn builtin_declarations() -> &'static [TypeDeclaration] {
        &BUILTIN
    }

    pub fn from_declarations(decls: Vec<TypeDeclaration>) -> Self {
        let mut out = Self::default();
        out.extend(decls);
        out
    }

    /// Registry over a standalone JSON table (an array of declarations).
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(Self::from_declarations(parse_declarations(json)?))
    }

    /// Add declarations; one with an existing identifier replaces the old one.
    ///
    /// When two declarations claim the same tag, the one declared first keeps it.
    pub fn extend(&mut self, decls: Vec<TypeDeclaration>) {
        for d in decls {
            let key = d.identifier.to_ascii_lowercase();
            match self.by_id.get(&key) {
                Some(&i) => self.decls[i] = d,
                None => {
                    self.by_id.insert(key, self.decls.len());
                    self.decls.push(d);
                }
            }
        }
        self.reindex();
    }

    pub fn extend_from_json(&mut self, json: &str) -> Result<()> {
        let decls = parse_declarations(json)?;
        tracing::debug!(count = decls.len(), "extending type registry");
        self.extend(decls);
        Ok(())
    }

    pub fn extend_from_file(&mut self, path: &Path) -> Result<()> {
        let txt = std::fs::read_to_string(path)
            .map_err(|e| Error::TypeTable(format!("{}: {e}", path.display())))?;
        let decls = parse_declarations(&txt).map_err(|e| match e {
            Error::TypeTable(msg) => Error::TypeTable(format!("{}: {msg}", path.display())),
            other => other,
        })?;
        tracing::debug!(
            path = %path.display(),
            count = decls.len(),
            "extending type registry from file"
        );
        self.extend(decls);
        Ok(())
    }

    pub fn declaration(&self, identifier: &str) -> Option<&TypeDeclaration> {
        self.by_id
            .get(&identifier.to_ascii_lowercase())
            .map(|&i| &self.decls[i])
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    fn reindex(&mut self) {
        self.by_ext.clear();
        self.by_mime.clear();
        for (i, d) in self.decls.iter().enumerate() {
            for e in &d.extensions {
                self.by_ext.entry(e.to_ascii_lowercase()).or_insert(i);
            }
            for m in &d.mime_types {
                self.by_mime.entry(m.to_ascii_lowercase()).or_insert(i);
            }
        }
    }
}

fn parse_declarations(json: &str) -> Result<Vec<TypeDeclaration>> {
    let decls: Vec<TypeDeclaration> =
        serde_json::from_str(json).map_err(|e| Error::TypeTable(e.to_string()))?;
    if let Some(d) = decls.iter().find(|d| d.identifier.trim().is_empty()) {
        return Err(Error::TypeTable(format!(
            "declaration with empty identifier (extensions: {:?})",
            d.extensions
        )));
    }
    Ok(decls)
}

impl TypeRegistry for StaticTypeRegistry {
    fn preferred_tag(&self, identifier: &str, class: TagClass) -> Option<String> {
        self.declaration(identifier)?.tags(class).first().cloned()
    }

    fn identifier_for_tag(&self, tag: &str, class: TagClass) -> Option<String> {
        let index = match class {
            TagClass::MimeType => &self.by_mime,
            TagClass::FilenameExtension => &self.by_ext,
        };
        index
            .get(&tag.to_ascii_lowercase())
            .map(|&i| self.decls[i].identifier.clone())
    }

    fn conforms_to(&self, identifier: &str, parent: &str) -> bool {
        if identifier.eq_ignore_ascii_case(parent) {
            return true;
        }
        let target = parent.to_ascii_lowercase();
        let mut seen = HashSet::new();
        let mut stack = vec![identifier.to_ascii_lowercase()];
        while let Some(id) = stack.pop() {
            if !seen.insert(id.clone()) {
                continue;
            }
            let Some(decl) = self.declaration(&id) else {
                continue;
            };
            for p in &decl.conforms_to {
                let p = p.to_ascii_lowercase();
                if p == target {
                    return true;
                }
                stack.push(p);
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkpeek_core::identifiers;
    use std::io::Write;

    #[test]
    fn builtin_table_loads() {
        let r = StaticTypeRegistry::builtin();
        assert!(!r.is_empty());
        assert_eq!(r.len(), StaticTypeRegistry::builtin_declarations().len());
        assert!(r.declaration(identifiers::IMAGE).is_some());
    }

    #[test]
    fn resolves_tags_both_ways() {
        let r = StaticTypeRegistry::builtin();
        assert_eq!(
            r.identifier_for_tag("JPG", TagClass::FilenameExtension).as_deref(),
            Some("public.jpeg")
        );
        assert_eq!(
            r.preferred_tag("public.jpeg", TagClass::MimeType).as_deref(),
            Some("image/jpeg")
        );
        assert_eq!(
            r.preferred_tag("public.jpeg", TagClass::FilenameExtension).as_deref(),
            Some("jpeg")
        );
        assert_eq!(r.identifier_for_tag("nope", TagClass::FilenameExtension), None);
        assert_eq!(r.preferred_tag(identifiers::IMAGE, TagClass::MimeType), None);
    }

    #[test]
    fn conformance_is_reflexive_and_transitive() {
        let r = StaticTypeRegistry::builtin();
        assert!(r.conforms_to("public.png", "public.png"));
        assert!(r.conforms_to("public.png", identifiers::IMAGE));
        assert!(r.conforms_to("public.png", identifiers::DATA));
        assert!(r.conforms_to("public.png", identifiers::ITEM));
        assert!(r.conforms_to("public.svg-image", identifiers::TEXT));
        assert!(!r.conforms_to("public.html", identifiers::IMAGE));
        assert!(!r.conforms_to("com.example.unknown", identifiers::DATA));
    }

    #[test]
    fn conformance_survives_cycles() {
        let r = StaticTypeRegistry::from_json(
            r#"[
                {"identifier": "a", "conforms_to": ["b"]},
                {"identifier": "b", "conforms_to": ["a"]}
            ]"#,
        )
        .expect("parse");
        assert!(r.conforms_to("a", "b"));
        assert!(!r.conforms_to("a", "c"));
    }

    #[test]
    fn extend_replaces_by_identifier_and_keeps_first_tag_owner() {
        let mut r = StaticTypeRegistry::builtin();
        r.extend_from_json(
            r#"[
                {"identifier": "public.png", "conforms_to": ["public.image"], "extensions": ["png", "apng"], "mime_types": ["image/png", "image/apng"]},
                {"identifier": "com.example.photo", "conforms_to": ["public.jpeg"], "extensions": ["jpg", "xphoto"], "mime_types": ["image/x-photo"]}
            ]"#,
        )
        .expect("extend");
        assert_eq!(
            r.identifier_for_tag("apng", TagClass::FilenameExtension).as_deref(),
            Some("public.png")
        );
        assert_eq!(
            r.identifier_for_tag("jpg", TagClass::FilenameExtension).as_deref(),
            Some("public.jpeg")
        );
        assert!(r.conforms_to("com.example.photo", identifiers::IMAGE));
    }

    #[test]
    fn rejects_bad_tables() {
        assert!(matches!(
            StaticTypeRegistry::from_json("{not json"),
            Err(Error::TypeTable(_))
        ));
        assert!(matches!(
            StaticTypeRegistry::from_json(r#"[{"identifier": "  "}]"#),
            Err(Error::TypeTable(_))
        ));
    }

    #[test]
    fn extends_from_file() {
        let mut f = tempfile::NamedTempFile::new().expect("tempfile");
        write!(
            f,
            r#"[{{"identifier": "org.example.feed", "conforms_to": ["public.xml"], "extensions": ["rss"], "mime_types": ["application/rss+xml"]}}]"#
        )
        .expect("write");

        let mut r = StaticTypeRegistry::builtin();
        r.extend_from_file(f.path()).expect("load");
        assert_eq!(
            r.identifier_for_tag("application/rss+xml", TagClass::MimeType).as_deref(),
            Some("org.example.feed")
        );
        assert!(r.conforms_to("org.example.feed", identifiers::TEXT));

        let missing = r.extend_from_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(missing, Err(Error::TypeTable(_))));
    }
}
