use super::arena::XmlDocument;
use super::node::XmlNodeData;
use super::registry::NamespaceRegistry;
use super::xname::{XAttribute, XName, XMLNS_NS};
use crate::error::{HwpxError, Result};
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::HashMap;

pub fn serialize(doc: &XmlDocument, registry: &NamespaceRegistry) -> Result<String> {
    let bytes = serialize_bytes(doc, registry)?;
    String::from_utf8(bytes).map_err(|e| HwpxError::XmlWrite(e.to_string()))
}

/// Serialize `doc`, resolving namespace prefixes from in-scope declarations
/// first and from `registry` second.
///
/// The captured prolog/epilogue of a parsed document are written back
/// verbatim; a document built in memory gets a standalone UTF-8 declaration.
pub fn serialize_bytes(doc: &XmlDocument, registry: &NamespaceRegistry) -> Result<Vec<u8>> {
    let mut writer = Writer::new(Vec::new());

    match doc.prolog() {
        Some(prolog) => writer.get_mut().extend_from_slice(prolog.as_bytes()),
        None => writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(write_err)?,
    }

    if let Some(root_id) = doc.root() {
        let scope = Scope::new(registry);
        write_node(doc, root_id, &mut writer, &scope)?;
    }

    let mut bytes = writer.into_inner();
    if let Some(epilogue) = doc.epilogue() {
        bytes.extend_from_slice(epilogue.as_bytes());
    }
    Ok(bytes)
}

fn write_err(e: impl std::fmt::Display) -> HwpxError {
    HwpxError::XmlWrite(e.to_string())
}

/// uri -> prefix bindings visible at the current element.
type NamespaceMap = HashMap<String, String>;

struct Scope<'r> {
    registry: &'r NamespaceRegistry,
    map: NamespaceMap,
    generated: usize,
}

impl<'r> Scope<'r> {
    fn new(registry: &'r NamespaceRegistry) -> Self {
        Self {
            registry,
            map: NamespaceMap::new(),
            generated: 0,
        }
    }

    fn child(&self) -> Self {
        Self {
            registry: self.registry,
            map: self.map.clone(),
            generated: self.generated,
        }
    }

    fn declare(&mut self, attributes: &[XAttribute]) {
        for attr in attributes {
            if let Some(prefix) = attr.declared_prefix() {
                self.map.insert(attr.value.clone(), prefix.to_string());
            }
        }
    }

    /// Prefix for `namespace`; when nothing in scope binds it, a declaration is
    /// pushed onto `pending` so the output stays well-formed.
    fn resolve(
        &mut self,
        namespace: &str,
        for_attribute: bool,
        pending: &mut Vec<(String, String)>,
    ) -> String {
        if let Some(prefix) = self.map.get(namespace) {
            // The default namespace never applies to attributes.
            if !(for_attribute && prefix.is_empty()) {
                return prefix.clone();
            }
        }
        if let Some(prefix) = self.registry.prefix_for(namespace) {
            if prefix == "xml" || prefix == "xmlns" {
                return prefix.to_string();
            }
            let prefix = prefix.to_string();
            self.bind(namespace, &prefix, pending);
            return prefix;
        }
        let prefix = loop {
            let candidate = format!("ns{}", self.generated);
            self.generated += 1;
            if !self.map.values().any(|p| p == &candidate) {
                break candidate;
            }
        };
        self.bind(namespace, &prefix, pending);
        prefix
    }

    fn bind(&mut self, namespace: &str, prefix: &str, pending: &mut Vec<(String, String)>) {
        self.map.insert(namespace.to_string(), prefix.to_string());
        pending.push((format!("xmlns:{prefix}"), namespace.to_string()));
    }
}

fn qualified(prefix: &str, name: &XName) -> String {
    if prefix.is_empty() {
        name.local_name.clone()
    } else {
        format!("{}:{}", prefix, name.local_name)
    }
}

fn write_node<W: std::io::Write>(
    doc: &XmlDocument,
    node_id: indextree::NodeId,
    writer: &mut Writer<W>,
    scope: &Scope<'_>,
) -> Result<()> {
    let Some(node_data) = doc.get(node_id) else {
        return Ok(());
    };

    match node_data {
        XmlNodeData::Element { name, attributes } => {
            write_element(doc, node_id, name, attributes, writer, scope)?;
        }
        XmlNodeData::Text(text) => {
            writer
                .write_event(Event::Text(BytesText::from_escaped(partial_escape(text))))
                .map_err(write_err)?;
        }
        XmlNodeData::Comment(text) => {
            writer
                .write_event(Event::Comment(BytesText::from_escaped(text.as_str())))
                .map_err(write_err)?;
        }
        XmlNodeData::ProcessingInstruction { target, data } => {
            let pi_content = if data.is_empty() {
                target.clone()
            } else {
                format!("{} {}", target, data)
            };
            writer
                .write_event(Event::PI(BytesPI::new(&pi_content)))
                .map_err(write_err)?;
        }
    }

    Ok(())
}

fn write_element<W: std::io::Write>(
    doc: &XmlDocument,
    node_id: indextree::NodeId,
    name: &XName,
    attributes: &[XAttribute],
    writer: &mut Writer<W>,
    parent_scope: &Scope<'_>,
) -> Result<()> {
    let mut scope = parent_scope.child();
    scope.declare(attributes);
    let mut pending = Vec::new();

    let tag_name = match &name.namespace {
        Some(ns) => {
            let prefix = scope.resolve(ns, false, &mut pending);
            qualified(&prefix, name)
        }
        None => name.local_name.clone(),
    };

    let mut elem = BytesStart::new(tag_name.as_str());

    for attr in attributes {
        let attr_name = match &attr.name.namespace {
            Some(ns) if ns == XMLNS_NS => format!("xmlns:{}", attr.name.local_name),
            Some(ns) => {
                let prefix = scope.resolve(ns, true, &mut pending);
                qualified(&prefix, &attr.name)
            }
            None => attr.name.local_name.clone(),
        };
        elem.push_attribute((attr_name.as_str(), attr.value.as_str()));
    }
    for (decl, uri) in &pending {
        elem.push_attribute((decl.as_str(), uri.as_str()));
    }

    let children: Vec<_> = doc.children(node_id).collect();

    if children.is_empty() {
        writer.write_event(Event::Empty(elem)).map_err(write_err)?;
    } else {
        writer.write_event(Event::Start(elem)).map_err(write_err)?;

        for child_id in children {
            write_node(doc, child_id, writer, &scope)?;
        }

        writer
            .write_event(Event::End(BytesEnd::new(tag_name.as_str())))
            .map_err(write_err)?;
    }

    Ok(())
}
