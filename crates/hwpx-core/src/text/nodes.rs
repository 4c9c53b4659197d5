//! Ordered enumeration of text-bearing slots across content parts.
//!
//! Every element owns two slots: its leading text (the text before its first
//! child element) and its tail (the text between its end tag and the next
//! sibling). Nodes are numbered globally, part by part in manifest order,
//! elements in document order, leading text before tail. Empty slots are not
//! enumerated and do not consume an index.

use std::collections::VecDeque;

use indextree::NodeId;
use serde::{Deserialize, Serialize};

use crate::package::{HwpxPackage, XmlPart};
use crate::xml::{XmlDocument, HP};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextSlot {
    Text,
    Tail,
}

impl TextSlot {
    /// Arena text nodes making up this slot of `element`, in document order.
    pub fn nodes(self, doc: &XmlDocument, element: NodeId) -> Vec<NodeId> {
        match self {
            TextSlot::Text => doc.body_text_nodes(element).collect(),
            TextSlot::Tail => doc.tail_text_nodes(element).collect(),
        }
    }
}

/// Non-empty text runs of `element`, body runs before tail runs.
///
/// A slot interrupted by comments or processing instructions yields one run
/// per text node.
pub fn element_runs(doc: &XmlDocument, element: NodeId) -> Vec<(TextSlot, NodeId)> {
    [TextSlot::Text, TextSlot::Tail]
        .into_iter()
        .flat_map(|slot| slot.nodes(doc, element).into_iter().map(move |node| (slot, node)))
        .filter(|&(_, node)| doc.text(node).is_some_and(|t| !t.is_empty()))
        .collect()
}

/// A non-empty text run, borrowed from the package.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextNode<'a> {
    pub index: usize,
    pub part: &'a str,
    pub element: NodeId,
    pub slot: TextSlot,
    /// Arena node holding the text.
    pub node: NodeId,
    pub text: &'a str,
}

impl<'a> TextNode<'a> {
    /// Element whose content holds this text.
    pub fn owner(&self, doc: &XmlDocument) -> NodeId {
        slot_owner(doc, self.element, self.slot)
    }

    /// `id` of the nearest paragraph enclosing this text.
    pub fn phrase_id(&self, doc: &'a XmlDocument) -> Option<&'a str> {
        phrase_id(doc, self.owner(doc))
    }
}

/// A tail sits in the parent's content, so its context starts at the parent.
pub fn slot_owner(doc: &XmlDocument, element: NodeId, slot: TextSlot) -> NodeId {
    match slot {
        TextSlot::Text => element,
        TextSlot::Tail => doc.parent(element).unwrap_or(element),
    }
}

/// Lazy iterator over every [`TextNode`] of a package.
pub struct TextNodes<'a> {
    parts: std::slice::Iter<'a, XmlPart>,
    current: Option<(&'a XmlPart, Box<dyn Iterator<Item = NodeId> + 'a>)>,
    pending: VecDeque<TextNode<'a>>,
    next_index: usize,
}

impl<'a> TextNodes<'a> {
    fn new(package: &'a HwpxPackage) -> Self {
        Self {
            parts: package.parts().iter(),
            current: None,
            pending: VecDeque::new(),
            next_index: 0,
        }
    }

    fn queue(&mut self, part: &'a XmlPart, element: NodeId) {
        for (slot, node) in element_runs(&part.tree, element) {
            let Some(text) = part.tree.text(node) else {
                continue;
            };
            self.pending.push_back(TextNode {
                index: self.next_index,
                part: &part.path,
                element,
                slot,
                node,
                text,
            });
            self.next_index += 1;
        }
    }
}

impl<'a> Iterator for TextNodes<'a> {
    type Item = TextNode<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(node) = self.pending.pop_front() {
                return Some(node);
            }
            if self.current.is_none() {
                let part = self.parts.next()?;
                self.current = Some((part, Box::new(part.tree.elements())));
            }
            let (part, elements) = self.current.as_mut()?;
            let part: &'a XmlPart = *part;
            match elements.next() {
                Some(element) => self.queue(part, element),
                None => self.current = None,
            }
        }
    }
}

pub fn text_nodes(package: &HwpxPackage) -> TextNodes<'_> {
    TextNodes::new(package)
}

impl HwpxPackage {
    pub fn text_nodes(&self) -> TextNodes<'_> {
        TextNodes::new(self)
    }
}

/// Nearest run and paragraph enclosing an element (the element itself included).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Enclosing {
    pub run: Option<NodeId>,
    pub paragraph: Option<NodeId>,
}

pub fn enclosing(doc: &XmlDocument, element: NodeId) -> Enclosing {
    let paragraph = HP::p();
    let run = HP::run();
    let mut found = Enclosing::default();
    for id in doc.ancestors(element) {
        let Some(name) = doc.get(id).and_then(|d| d.name()) else {
            continue;
        };
        if *name == run && found.run.is_none() {
            found.run = Some(id);
        } else if *name == paragraph {
            found.paragraph = Some(id);
            break;
        }
    }
    found
}

/// `id` attribute of the nearest `hp:p` enclosing `element`.
pub fn phrase_id(doc: &XmlDocument, element: NodeId) -> Option<&str> {
    let paragraph = enclosing(doc, element).paragraph?;
    doc.get(paragraph)?.attribute("id")
}
