//! Prefix registry consulted by the serializer.
//!
//! A reserialized part normally carries its own `xmlns:*` declarations, so
//! prefixes resolve from the tree itself. The registry covers every namespace
//! that is used without an in-scope declaration (elements added by a caller,
//! declarations lost while editing): it is seeded with the well-known HWPX
//! bindings and extended with every declaration observed while parsing the
//! package, then handed to each serialization call explicitly.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;

use super::arena::XmlDocument;
use super::namespaces::WELL_KNOWN;
use super::xname::{XML_NS, XMLNS_NS};

static HWPX_DEFAULTS: Lazy<NamespaceRegistry> = Lazy::new(|| {
    let mut registry = NamespaceRegistry::empty();
    for (prefix, uri) in WELL_KNOWN {
        registry.register(prefix, uri);
    }
    registry
});

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NamespaceRegistry {
    /// uri -> prefix; the first binding registered for a uri wins.
    by_uri: BTreeMap<String, String>,
}

impl NamespaceRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry seeded with the well-known HWPX prefix table.
    pub fn hwpx() -> Self {
        HWPX_DEFAULTS.clone()
    }

    /// Bind `prefix` to `uri` unless `uri` already has a prefix.
    ///
    /// Empty prefixes (default namespace declarations) are ignored: they cannot
    /// be used to qualify attributes and would be ambiguous across parts.
    pub fn register(&mut self, prefix: &str, uri: &str) {
        if prefix.is_empty() || uri == XML_NS || uri == XMLNS_NS {
            return;
        }
        self.by_uri
            .entry(uri.to_string())
            .or_insert_with(|| prefix.to_string());
    }

    /// Record every `xmlns:prefix` declaration found in `doc`.
    pub fn observe(&mut self, doc: &XmlDocument) {
        for id in doc.elements() {
            let Some(attrs) = doc.get(id).and_then(|data| data.attributes()) else {
                continue;
            };
            for attr in attrs {
                if let Some(prefix) = attr.declared_prefix() {
                    self.register(prefix, &attr.value);
                }
            }
        }
    }

    pub fn prefix_for(&self, uri: &str) -> Option<&str> {
        match uri {
            XML_NS => Some("xml"),
            XMLNS_NS => Some("xmlns"),
            _ => self.by_uri.get(uri).map(String::as_str),
        }
    }

    pub fn len(&self) -> usize {
        self.by_uri.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_uri.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.by_uri
            .iter()
            .map(|(uri, prefix)| (prefix.as_str(), uri.as_str()))
    }
}
