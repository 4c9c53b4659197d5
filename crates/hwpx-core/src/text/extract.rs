use std::collections::HashMap;

use indextree::NodeId;

use super::nodes::{enclosing, phrase_id};
use crate::package::HwpxPackage;
use crate::xml::HP;

/// Concatenated `hp:t` text of every `Contents/section*.xml` part, in manifest order.
pub fn extract_text(package: &HwpxPackage) -> String {
    let t = HP::t();
    let mut out = String::new();
    for part in package.parts().iter().filter(|p| is_section(&p.path)) {
        let doc = &part.tree;
        for id in doc.elements() {
            if doc.get(id).and_then(|d| d.name()) != Some(&t) {
                continue;
            }
            for text in doc.body_text_nodes(id).filter_map(|n| doc.text(n)) {
                out.push_str(text);
            }
        }
    }
    out
}

fn is_section(path: &str) -> bool {
    path.strip_prefix("Contents/section")
        .is_some_and(|rest| rest.ends_with(".xml"))
}

/// Text nodes that share one paragraph.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Phrase {
    pub part: String,
    pub phrase_id: Option<String>,
    pub text: String,
    /// Global indices of the member text nodes.
    pub nodes: Vec<usize>,
}

/// Group text nodes by enclosing paragraph, in first-appearance order.
///
/// Nodes outside any paragraph each form their own phrase.
pub fn phrases(package: &HwpxPackage) -> Vec<Phrase> {
    let mut out: Vec<Phrase> = Vec::new();
    let mut groups: HashMap<(&str, NodeId), usize> = HashMap::new();

    for node in package.text_nodes() {
        let Some(part) = package.part(node.part) else {
            continue;
        };
        let owner = node.owner(&part.tree);
        let key = enclosing(&part.tree, owner).paragraph.map(|p| (node.part, p));

        match key.and_then(|k| groups.get(&k).copied()) {
            Some(i) => {
                out[i].text.push_str(node.text);
                out[i].nodes.push(node.index);
            }
            None => {
                if let Some(k) = key {
                    groups.insert(k, out.len());
                }
                out.push(Phrase {
                    part: node.part.to_string(),
                    phrase_id: phrase_id(&part.tree, owner).map(str::to_string),
                    text: node.text.to_string(),
                    nodes: vec![node.index],
                });
            }
        }
    }
    out
}
