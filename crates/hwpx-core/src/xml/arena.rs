use super::node::XmlNodeData;
use indextree::{Arena, NodeId};

/// Arena-backed XML tree.
///
/// Besides the element tree the document keeps the raw text that surrounded the
/// root element in its source (XML declaration, leading comments, trailing
/// newline), so a reserialized part differs from its source only where the tree
/// changed.
#[derive(Clone, Debug)]
pub struct XmlDocument {
    arena: Arena<XmlNodeData>,
    root: Option<NodeId>,
    prolog: Option<String>,
    epilogue: Option<String>,
}

impl XmlDocument {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
            prolog: None,
            epilogue: None,
        }
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn prolog(&self) -> Option<&str> {
        self.prolog.as_deref()
    }

    pub fn epilogue(&self) -> Option<&str> {
        self.epilogue.as_deref()
    }

    pub(crate) fn set_surroundings(&mut self, prolog: &str, epilogue: &str) {
        self.prolog = Some(prolog.to_string());
        self.epilogue = Some(epilogue.to_string());
    }

    pub fn get(&self, id: NodeId) -> Option<&XmlNodeData> {
        self.arena.get(id).map(|node| node.get())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut XmlNodeData> {
        self.arena.get_mut(id).map(|node| node.get_mut())
    }

    pub fn add_root(&mut self, data: XmlNodeData) -> NodeId {
        let id = self.arena.new_node(data);
        self.root = Some(id);
        id
    }

    pub fn add_child(&mut self, parent: NodeId, data: XmlNodeData) -> NodeId {
        let child = self.arena.new_node(data);
        parent.append(child, &mut self.arena);
        child
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        parent.children(&self.arena)
    }

    /// Elements of the whole document in pre-order (document order).
    pub fn elements(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.root
            .into_iter()
            .flat_map(move |root| root.descendants(&self.arena))
            .filter(move |&id| self.get(id).is_some_and(XmlNodeData::is_element))
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.parent()
    }

    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.ancestors(&self.arena)
    }

    /// Text nodes between the start tag of `element` and its first child element.
    ///
    /// Comments and processing instructions in that stretch are skipped, so
    /// `<t>a<!--c-->b</t>` yields both `a` and `b`.
    pub fn body_text_nodes(&self, element: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.text_run(element.children(&self.arena))
    }

    /// Text nodes between the end tag of `element` and its next sibling element.
    pub fn tail_text_nodes(&self, element: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.text_run(element.following_siblings(&self.arena).skip(1))
    }

    fn text_run<'a>(
        &'a self,
        nodes: impl Iterator<Item = NodeId> + 'a,
    ) -> impl Iterator<Item = NodeId> + 'a {
        nodes
            .map(move |id| (id, self.get(id)))
            .take_while(|(_, data)| !matches!(data, Some(d) if d.is_element()))
            .filter(|(_, data)| matches!(data, Some(d) if d.is_text()))
            .map(|(id, _)| id)
    }

    /// Every text node of the document in document order.
    pub fn text_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.root
            .into_iter()
            .flat_map(move |root| root.descendants(&self.arena))
            .filter(move |&id| self.get(id).is_some_and(XmlNodeData::is_text))
    }

    pub fn text(&self, node: NodeId) -> Option<&str> {
        self.get(node)?.text_content()
    }

    /// Replace the content of a text node; returns `false` if `node` is not text.
    pub fn set_text(&mut self, node: NodeId, value: &str) -> bool {
        match self.get_mut(node).and_then(XmlNodeData::text_content_mut) {
            Some(text) => {
                value.clone_into(text);
                true
            }
            None => false,
        }
    }
}

impl Default for XmlDocument {
    fn default() -> Self {
        Self::new()
    }
}
