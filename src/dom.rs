//! A simple arena-allocated DOM, the [`TreeAdapter`] used by [`crate::parse`].
//!
//! Nodes are never freed: detaching a node only unlinks it from its parent. A [`Dom`] can hold
//! more than one tree, which is how [`crate::parse_fragment`] keeps its context element around.
use crate::serializer;
use crate::{Attribute, Namespace, QuirksMode, SourceLocation, TreeAdapter};

/// Handle to a node inside a [`Dom`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeData {
    /// The root of a full parse.
    Document {
        /// Quirks mode the doctype selected.
        quirks_mode: QuirksMode,
    },
    /// The root of a fragment parse, or the contents of a `<template>`.
    DocumentFragment,
    /// `<!DOCTYPE name "public_id" "system_id">`
    Doctype {
        /// Doctype name, usually `html`.
        name: String,
        /// Public identifier, empty if there was none.
        public_id: String,
        /// System identifier, empty if there was none.
        system_id: String,
    },
    /// An element.
    Element {
        /// Local name, case-adjusted for the namespace.
        name: String,
        /// Element namespace.
        namespace: Namespace,
        /// Attributes in source order.
        attributes: Vec<Attribute>,
        /// For HTML `<template>` elements, the fragment their contents are parsed into.
        template_content: Option<NodeId>,
    },
    /// A text node.
    Text(String),
    /// A comment.
    Comment(String),
}

/// A node and its links.
#[derive(Debug, Clone)]
pub struct Node {
    /// What the node is.
    pub data: NodeData,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    location: Option<SourceLocation>,
}

impl Node {
    fn new(data: NodeData) -> Self {
        Node {
            data,
            parent: None,
            children: Vec::new(),
            location: None,
        }
    }

    /// Parent node, `None` for roots and detached nodes.
    #[must_use]
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child nodes in order.
    #[must_use]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Where this node came from, if the parser ran with location info enabled.
    #[must_use]
    pub fn location(&self) -> Option<SourceLocation> {
        self.location
    }

    /// The local name if this is an element.
    #[must_use]
    pub fn element_name(&self) -> Option<&str> {
        match self.data {
            NodeData::Element { ref name, .. } => Some(name),
            _ => None,
        }
    }

    /// Whether this is an HTML element called `name`.
    #[must_use]
    pub fn is_html_element(&self, name: &str) -> bool {
        matches!(
            self.data,
            NodeData::Element { name: ref n, namespace: Namespace::Html, .. } if n == name
        )
    }

    /// Value of the attribute `name` (without namespace) if this is an element.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        match self.data {
            NodeData::Element { ref attributes, .. } => attributes
                .iter()
                .find(|attr| attr.namespace.is_none() && attr.name == name)
                .map(|attr| attr.value.as_str()),
            _ => None,
        }
    }
}

/// Arena of nodes.
#[derive(Debug, Clone, Default)]
pub struct Dom {
    nodes: Vec<Node>,
}

impl Dom {
    /// An empty arena.
    #[must_use]
    pub fn new() -> Self {
        Dom::default()
    }

    /// Look up a node.
    ///
    /// # Panics
    ///
    /// When `id` belongs to another `Dom`.
    #[must_use]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    /// Child nodes of `id`.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.node(id).children
    }

    /// Parent of `id`.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    /// The `<body>` element of the document rooted at `document`.
    #[must_use]
    pub fn body(&self, document: NodeId) -> Option<NodeId> {
        let html = self.find_child(document, "html")?;
        self.find_child(html, "body")
    }

    /// The `<head>` element of the document rooted at `document`.
    #[must_use]
    pub fn head(&self, document: NodeId) -> Option<NodeId> {
        let html = self.find_child(document, "html")?;
        self.find_child(html, "head")
    }

    fn find_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.children(parent)
            .iter()
            .copied()
            .find(|&child| self.node(child).is_html_element(name))
    }

    /// All elements below `root` called `name`, in tree order. Template contents are included.
    #[must_use]
    pub fn elements_by_tag_name(&self, root: NodeId, name: &str) -> Vec<NodeId> {
        let mut rv = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if id != root && node.element_name() == Some(name) {
                rv.push(id);
            }
            if let NodeData::Element {
                template_content: Some(content),
                ..
            } = node.data
            {
                stack.push(content);
            }
            stack.extend(node.children.iter().rev().copied());
        }
        rv
    }

    /// Concatenated text of all text nodes below `id`.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut rv = String::new();
        self.collect_text(id, &mut rv);
        rv
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        match self.node(id).data {
            NodeData::Text(ref text) => out.push_str(text),
            _ => {
                for &child in self.children(id) {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Dump the tree below `root` in the format of html5lib's tree construction tests.
    #[must_use]
    pub fn to_test_string(&self, root: NodeId) -> String {
        serializer::to_test_string(self, &root)
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        self.nodes.push(Node::new(data));
        NodeId(self.nodes.len() - 1)
    }

    fn append(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn position_in_parent(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&x| x == child)
    }

    fn text_mut(&mut self, id: NodeId) -> Option<&mut String> {
        match self.nodes[id.0].data {
            NodeData::Text(ref mut text) => Some(text),
            _ => None,
        }
    }
}

impl TreeAdapter for Dom {
    type Handle = NodeId;

    fn create_document(&mut self) -> NodeId {
        self.push(NodeData::Document {
            quirks_mode: QuirksMode::NoQuirks,
        })
    }

    fn create_document_fragment(&mut self) -> NodeId {
        self.push(NodeData::DocumentFragment)
    }

    fn create_element(
        &mut self,
        tag_name: &str,
        namespace: Namespace,
        attributes: Vec<Attribute>,
    ) -> NodeId {
        let template_content = if namespace == Namespace::Html && tag_name == "template" {
            Some(self.create_document_fragment())
        } else {
            None
        };
        self.push(NodeData::Element {
            name: tag_name.to_owned(),
            namespace,
            attributes,
            template_content,
        })
    }

    fn create_comment(&mut self, data: &str) -> NodeId {
        self.push(NodeData::Comment(data.to_owned()))
    }

    fn create_text(&mut self, value: &str) -> NodeId {
        self.push(NodeData::Text(value.to_owned()))
    }

    fn set_document_type(&mut self, document: &NodeId, name: &str, public_id: &str, system_id: &str) {
        let data = NodeData::Doctype {
            name: name.to_owned(),
            public_id: public_id.to_owned(),
            system_id: system_id.to_owned(),
        };
        let existing = self
            .children(*document)
            .iter()
            .copied()
            .find(|&child| matches!(self.node(child).data, NodeData::Doctype { .. }));
        match existing {
            Some(doctype) => self.nodes[doctype.0].data = data,
            None => {
                let doctype = self.push(data);
                self.append(*document, doctype);
            }
        }
    }

    fn set_quirks_mode(&mut self, document: &NodeId, mode: QuirksMode) {
        if let NodeData::Document {
            ref mut quirks_mode,
        } = self.nodes[document.0].data
        {
            *quirks_mode = mode;
        }
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) {
        self.detach_node(child);
        self.append(*parent, *child);
    }

    fn insert_before(&mut self, parent: &NodeId, child: &NodeId, reference: &NodeId) {
        self.detach_node(child);
        match self.position_in_parent(*parent, *reference) {
            Some(i) => {
                self.nodes[child.0].parent = Some(*parent);
                self.nodes[parent.0].children.insert(i, *child);
            }
            None => self.append(*parent, *child),
        }
    }

    fn detach_node(&mut self, node: &NodeId) {
        if let Some(parent) = self.nodes[node.0].parent.take() {
            if let Some(i) = self.position_in_parent(parent, *node) {
                self.nodes[parent.0].children.remove(i);
            }
        }
    }

    fn insert_text(&mut self, parent: &NodeId, text: &str) {
        if let Some(&last) = self.children(*parent).last() {
            if let Some(existing) = self.text_mut(last) {
                existing.push_str(text);
                return;
            }
        }
        let node = self.create_text(text);
        self.append(*parent, node);
    }

    fn insert_text_before(&mut self, parent: &NodeId, text: &str, reference: &NodeId) {
        let i = match self.position_in_parent(*parent, *reference) {
            Some(i) => i,
            None => return self.insert_text(parent, text),
        };
        if i > 0 {
            let prev = self.children(*parent)[i - 1];
            if let Some(existing) = self.text_mut(prev) {
                existing.push_str(text);
                return;
            }
        }
        let node = self.create_text(text);
        self.nodes[node.0].parent = Some(*parent);
        self.nodes[parent.0].children.insert(i, node);
    }

    fn adopt_attributes(&mut self, element: &NodeId, new_attributes: Vec<Attribute>) {
        if let NodeData::Element {
            ref mut attributes,
            ..
        } = self.nodes[element.0].data
        {
            for attr in new_attributes {
                if !attributes
                    .iter()
                    .any(|x| x.name == attr.name && x.namespace == attr.namespace)
                {
                    attributes.push(attr);
                }
            }
        }
    }

    fn get_template_content(&self, template: &NodeId) -> Option<NodeId> {
        match self.node(*template).data {
            NodeData::Element {
                template_content, ..
            } => template_content,
            _ => None,
        }
    }

    fn get_first_child(&self, node: &NodeId) -> Option<NodeId> {
        self.children(*node).first().copied()
    }

    fn get_child_nodes(&self, node: &NodeId) -> Vec<NodeId> {
        self.children(*node).to_vec()
    }

    fn get_parent_node(&self, node: &NodeId) -> Option<NodeId> {
        self.parent(*node)
    }

    fn get_attr_list(&self, element: &NodeId) -> &[Attribute] {
        match self.node(*element).data {
            NodeData::Element { ref attributes, .. } => attributes,
            _ => &[],
        }
    }

    fn get_tag_name(&self, element: &NodeId) -> &str {
        self.node(*element).element_name().unwrap_or("")
    }

    fn get_namespace_uri(&self, element: &NodeId) -> Namespace {
        match self.node(*element).data {
            NodeData::Element { namespace, .. } => namespace,
            _ => Namespace::Html,
        }
    }

    fn get_text_node_content(&self, node: &NodeId) -> &str {
        match self.node(*node).data {
            NodeData::Text(ref text) => text,
            _ => "",
        }
    }

    fn get_comment_node_content(&self, node: &NodeId) -> &str {
        match self.node(*node).data {
            NodeData::Comment(ref data) => data,
            _ => "",
        }
    }

    fn get_document_type_node_ids(&self, node: &NodeId) -> (&str, &str, &str) {
        match self.node(*node).data {
            NodeData::Doctype {
                ref name,
                ref public_id,
                ref system_id,
            } => (name, public_id, system_id),
            _ => ("", "", ""),
        }
    }

    fn is_text_node(&self, node: &NodeId) -> bool {
        matches!(self.node(*node).data, NodeData::Text(_))
    }

    fn is_comment_node(&self, node: &NodeId) -> bool {
        matches!(self.node(*node).data, NodeData::Comment(_))
    }

    fn is_element_node(&self, node: &NodeId) -> bool {
        matches!(self.node(*node).data, NodeData::Element { .. })
    }

    fn is_document_type_node(&self, node: &NodeId) -> bool {
        matches!(self.node(*node).data, NodeData::Doctype { .. })
    }

    fn set_node_source_location(&mut self, node: &NodeId, location: SourceLocation) {
        self.nodes[node.0].location = Some(location);
    }

    fn update_node_source_location(&mut self, node: &NodeId, end: SourceLocation) {
        match self.nodes[node.0].location {
            Some(ref mut location) => {
                location.end_offset = end.end_offset;
                location.end_line = end.end_line;
                location.end_col = end.end_col;
            }
            None => self.nodes[node.0].location = Some(end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_is_merged() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let p = dom.create_element("p", Namespace::Html, Vec::new());
        dom.append_child(&doc, &p);
        dom.insert_text(&p, "a");
        dom.insert_text(&p, "b");
        let br = dom.create_element("br", Namespace::Html, Vec::new());
        dom.append_child(&p, &br);
        dom.insert_text_before(&p, "c", &br);
        dom.insert_text(&p, "d");

        assert_eq!(dom.children(p).len(), 3);
        assert_eq!(dom.get_text_node_content(&dom.children(p)[0]), "abc");
        assert_eq!(dom.text_content(doc), "abcd");
    }

    #[test]
    fn moving_a_node_detaches_it() {
        let mut dom = Dom::new();
        let doc = dom.create_document();
        let a = dom.create_element("a", Namespace::Html, Vec::new());
        let b = dom.create_element("b", Namespace::Html, Vec::new());
        dom.append_child(&doc, &a);
        dom.append_child(&doc, &b);
        dom.append_child(&a, &b);

        assert_eq!(dom.children(doc), &[a]);
        assert_eq!(dom.parent(b), Some(a));
        dom.insert_before(&doc, &b, &a);
        assert_eq!(dom.children(doc), &[b, a]);
        assert!(dom.children(a).is_empty());
    }

    #[test]
    fn attributes_are_adopted_once() {
        let mut dom = Dom::new();
        let html = dom.create_element("html", Namespace::Html, vec![Attribute::new("a", "1")]);
        dom.adopt_attributes(
            &html,
            vec![Attribute::new("a", "2"), Attribute::new("b", "3")],
        );
        assert_eq!(
            dom.get_attr_list(&html),
            &[Attribute::new("a", "1"), Attribute::new("b", "3")]
        );
    }
}
