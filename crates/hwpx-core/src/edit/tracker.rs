use std::collections::BTreeSet;

use crate::package::XmlPart;

/// Paths of XML parts whose text has been changed since parsing.
///
/// Only parts in this set are reserialized on write; every other part is
/// copied from its original bytes.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ModifiedParts {
    paths: BTreeSet<String>,
}

impl ModifiedParts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if `path` was not already marked.
    pub fn mark(&mut self, path: &str) -> bool {
        if self.paths.contains(path) {
            return false;
        }
        tracing::debug!(part = %path, "part marked modified");
        self.paths.insert(path.to_string())
    }

    /// Mark `part` when any of its text differs from the parsed value and
    /// unmark it otherwise. Returns whether the part ends up marked.
    pub fn sync(&mut self, part: &XmlPart) -> bool {
        if part.text_is_original() {
            if self.unmark(&part.path) {
                tracing::debug!(part = %part.path, "part reverted to original text");
            }
            false
        } else {
            self.mark(&part.path);
            true
        }
    }

    pub fn unmark(&mut self, path: &str) -> bool {
        self.paths.remove(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains(path)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn clear(&mut self) {
        self.paths.clear();
    }
}

impl<S: AsRef<str>> FromIterator<S> for ModifiedParts {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(|s| s.as_ref().to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marking_is_idempotent() {
        let mut modified = ModifiedParts::new();
        assert!(modified.mark("Contents/section0.xml"));
        assert!(!modified.mark("Contents/section0.xml"));
        assert_eq!(modified.len(), 1);
        assert!(modified.contains("Contents/section0.xml"));
        assert!(!modified.contains("Contents/header.xml"));
    }

    #[test]
    fn sync_follows_text_state() {
        let mut part = XmlPart::parse("Contents/section0.xml", None, b"<r><t>abc</t></r>").unwrap();
        let node = part.tree.text_nodes().next().unwrap();
        let mut modified = ModifiedParts::new();

        part.tree.set_text(node, "ABC");
        assert!(modified.sync(&part));
        assert!(modified.contains("Contents/section0.xml"));

        part.tree.set_text(node, "abc");
        assert!(!modified.sync(&part));
        assert!(modified.is_empty());
    }

    #[test]
    fn collects_from_paths() {
        let modified: ModifiedParts = ["b.xml", "a.xml", "b.xml"].into_iter().collect();
        assert_eq!(modified.iter().collect::<Vec<_>>(), vec!["a.xml", "b.xml"]);
    }
}
