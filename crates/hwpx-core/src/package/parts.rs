use indextree::NodeId;

use crate::error::Result;
use crate::xml::{parser, XmlDocument};

/// A parsed XML part together with the exact bytes it was read from.
#[derive(Clone, Debug)]
pub struct XmlPart {
    pub path: String,
    pub media_type: Option<String>,
    pub tree: XmlDocument,
    original: Vec<u8>,
    /// Every text node and its value at parse time, in document order.
    original_text: Vec<(NodeId, String)>,
}

impl XmlPart {
    pub fn parse(path: &str, media_type: Option<&str>, bytes: &[u8]) -> Result<Self> {
        let tree = parser::parse_bytes(bytes)?;
        let original_text = tree
            .text_nodes()
            .map(|id| (id, tree.text(id).unwrap_or_default().to_string()))
            .collect();
        Ok(Self {
            path: path.to_string(),
            media_type: media_type.map(str::to_string),
            tree,
            original: bytes.to_vec(),
            original_text,
        })
    }

    /// Bytes the part was parsed from, untouched by later edits.
    pub fn original(&self) -> &[u8] {
        &self.original
    }

    /// `true` while every text node still holds its parse-time value.
    pub fn text_is_original(&self) -> bool {
        let mut current = self.tree.text_nodes();
        let same = self.original_text.iter().all(|(id, text)| {
            current
                .next()
                .is_some_and(|now| now == *id && self.tree.text(now) == Some(text.as_str()))
        });
        same && current.next().is_none()
    }

    /// What the writer emits for this part given its modified state.
    pub fn output(&self, modified: bool) -> PartOutput<'_> {
        if modified {
            PartOutput::Reserialize(&self.tree)
        } else {
            PartOutput::Verbatim(&self.original)
        }
    }
}

/// Output decision for one XML part.
#[derive(Clone, Copy, Debug)]
pub enum PartOutput<'a> {
    /// Original bytes, byte-for-byte.
    Verbatim(&'a [u8]),
    /// Current tree, serialized.
    Reserialize(&'a XmlDocument),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unmodified_part_is_verbatim() {
        let source = b"<?xml version='1.0'?>\n<r  a = \"1\" />";
        let part = XmlPart::parse("r.xml", None, source).unwrap();
        match part.output(false) {
            PartOutput::Verbatim(bytes) => assert_eq!(bytes, source),
            PartOutput::Reserialize(_) => panic!("expected verbatim"),
        }
        assert!(matches!(part.output(true), PartOutput::Reserialize(_)));
    }

    #[test]
    fn reverted_text_counts_as_original() {
        let mut part = XmlPart::parse("r.xml", None, b"<r><t>abc<!--c-->def</t></r>").unwrap();
        assert!(part.text_is_original());

        let first = part.tree.text_nodes().nth(1).unwrap();
        part.tree.set_text(first, "DEF");
        assert!(!part.text_is_original());

        part.tree.set_text(first, "def");
        assert!(part.text_is_original());
    }
}
