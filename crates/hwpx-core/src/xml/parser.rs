use super::arena::XmlDocument;
use super::node::XmlNodeData;
use super::xname::{XAttribute, XName};
use crate::error::{HwpxError, Result};

pub fn parse(xml: &str) -> Result<XmlDocument> {
    parse_bytes(xml.as_bytes())
}

pub fn parse_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    let source = std::str::from_utf8(bytes).map_err(|e| HwpxError::XmlParse {
        message: e.to_string(),
        location: "input".to_string(),
    })?;
    let body = source.strip_prefix('\u{feff}').unwrap_or(source);
    let bom_len = source.len() - body.len();

    let doc = roxmltree::Document::parse_with_options(
        body,
        roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        },
    )
    .map_err(|e| HwpxError::XmlParse {
        message: e.to_string(),
        location: format!("line {}", e.pos().row),
    })?;

    let mut xml_doc = XmlDocument::new();

    let root = doc.root_element();
    if root.parent().is_some() {
        build_tree(root, &mut xml_doc, None);
        let range = root.range();
        xml_doc.set_surroundings(&source[..bom_len + range.start], &body[range.end..]);
    }

    Ok(xml_doc)
}

fn build_tree(node: roxmltree::Node, doc: &mut XmlDocument, parent: Option<indextree::NodeId>) {
    let node_data = match node.node_type() {
        roxmltree::NodeType::Element => {
            let name = XName::new(
                node.tag_name().namespace().unwrap_or(""),
                node.tag_name().name(),
            );

            // roxmltree reports every namespace in scope; only the ones this
            // element introduces are kept as declarations.
            let inherited: Vec<(Option<&str>, &str)> = node
                .parent_element()
                .map(|p| p.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
                .unwrap_or_default();

            let mut attributes: Vec<XAttribute> = node
                .namespaces()
                .filter(|ns| ns.name() != Some("xml"))
                .filter(|ns| !inherited.contains(&(ns.name(), ns.uri())))
                .map(|ns| XAttribute::new(XName::xmlns(ns.name().unwrap_or("")), ns.uri()))
                .collect();

            attributes.extend(node.attributes().map(|attr| {
                XAttribute::new(
                    XName::new(attr.namespace().unwrap_or(""), attr.name()),
                    attr.value(),
                )
            }));

            XmlNodeData::Element { name, attributes }
        }
        roxmltree::NodeType::Text => match node.text() {
            Some(text) => XmlNodeData::Text(text.to_string()),
            None => return,
        },
        roxmltree::NodeType::Comment => match node.text() {
            Some(text) => XmlNodeData::Comment(text.to_string()),
            None => return,
        },
        roxmltree::NodeType::PI => XmlNodeData::ProcessingInstruction {
            target: node.pi().map(|pi| pi.target.to_string()).unwrap_or_default(),
            data: node
                .pi()
                .and_then(|pi| pi.value.map(|s| s.to_string()))
                .unwrap_or_default(),
        },
        roxmltree::NodeType::Root => return,
    };

    let new_id = match parent {
        Some(parent_id) => doc.add_child(parent_id, node_data),
        None => doc.add_root(node_data),
    };

    for child in node.children() {
        build_tree(child, doc, Some(new_id));
    }
}
