use std::collections::BTreeMap;

use indextree::NodeId;
use serde::{Deserialize, Serialize};

use super::nodes::enclosing;
use crate::xml::XmlDocument;

/// Attributes of the run and paragraph that enclose a text node.
///
/// Keys are attribute local names; namespace declarations are left out.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<BTreeMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run: Option<BTreeMap<String, String>>,
}

impl FormatContext {
    pub fn of(doc: &XmlDocument, element: NodeId) -> Self {
        let found = enclosing(doc, element);
        Self {
            paragraph: found.paragraph.map(|id| attribute_map(doc, id)),
            run: found.run.map(|id| attribute_map(doc, id)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paragraph.is_none() && self.run.is_none()
    }
}

fn attribute_map(doc: &XmlDocument, element: NodeId) -> BTreeMap<String, String> {
    doc.get(element)
        .and_then(|d| d.attributes())
        .unwrap_or_default()
        .iter()
        .filter(|a| !a.is_namespace_declaration())
        .map(|a| (a.name.local_name.clone(), a.value.clone()))
        .collect()
}
