use std::fmt;

use crate::{Attribute, SourceLocation};

/// Namespace of an element or attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// `http://www.w3.org/1999/xhtml`
    Html,
    /// `http://www.w3.org/1998/Math/MathML`
    MathMl,
    /// `http://www.w3.org/2000/svg`
    Svg,
    /// `http://www.w3.org/1999/xlink`
    XLink,
    /// `http://www.w3.org/XML/1998/namespace`
    Xml,
    /// `http://www.w3.org/2000/xmlns/`
    Xmlns,
}

impl Namespace {
    /// The namespace URI.
    #[must_use]
    pub fn url(self) -> &'static str {
        match self {
            Namespace::Html => "http://www.w3.org/1999/xhtml",
            Namespace::MathMl => "http://www.w3.org/1998/Math/MathML",
            Namespace::Svg => "http://www.w3.org/2000/svg",
            Namespace::XLink => "http://www.w3.org/1999/xlink",
            Namespace::Xml => "http://www.w3.org/XML/1998/namespace",
            Namespace::Xmlns => "http://www.w3.org/2000/xmlns/",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url())
    }
}

/// The document's [quirks mode](https://dom.spec.whatwg.org/#concept-document-quirks), decided by
/// its doctype.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum QuirksMode {
    /// Standards mode.
    #[default]
    NoQuirks,
    /// Almost-standards mode.
    LimitedQuirks,
    /// Quirks mode.
    Quirks,
}

/// The capability interface the parser builds its output through.
///
/// The parser never assumes a concrete node representation. It only keeps `Handle`s around (on
/// the stack of open elements, in the list of active formatting elements) and asks the adapter to
/// create, move and inspect nodes. [`crate::Dom`] is the bundled implementation.
///
/// Handles must compare equal if and only if they refer to the same node.
pub trait TreeAdapter {
    /// Reference to a node.
    type Handle: Clone + PartialEq + fmt::Debug;

    /// Create the document node a full parse builds into.
    fn create_document(&mut self) -> Self::Handle;

    /// Create an empty document fragment.
    fn create_document_fragment(&mut self) -> Self::Handle;

    /// Create a detached element. `tag_name` is already case-adjusted for its namespace.
    ///
    /// Adapters that support `<template>` create the template contents fragment here, see
    /// [`TreeAdapter::get_template_content`].
    fn create_element(
        &mut self,
        tag_name: &str,
        namespace: Namespace,
        attributes: Vec<Attribute>,
    ) -> Self::Handle;

    /// Create a detached comment node.
    fn create_comment(&mut self, data: &str) -> Self::Handle;

    /// Create a detached text node.
    fn create_text(&mut self, value: &str) -> Self::Handle;

    /// Give `document` a doctype node, replacing an existing one.
    fn set_document_type(
        &mut self,
        document: &Self::Handle,
        name: &str,
        public_id: &str,
        system_id: &str,
    );

    /// Record the quirks mode the doctype put `document` into.
    fn set_quirks_mode(&mut self, document: &Self::Handle, mode: QuirksMode);

    /// Append `child` as the last child of `parent`. `child` is detached.
    fn append_child(&mut self, parent: &Self::Handle, child: &Self::Handle);

    /// Insert `child` right before `reference`, which is a child of `parent`.
    fn insert_before(&mut self, parent: &Self::Handle, child: &Self::Handle, reference: &Self::Handle);

    /// Remove `node` from its parent, if it has one.
    fn detach_node(&mut self, node: &Self::Handle);

    /// Append text to `parent`, merging it into the last child if that is a text node.
    fn insert_text(&mut self, parent: &Self::Handle, text: &str);

    /// Insert text right before `reference`, merging it into the preceding sibling if that is a
    /// text node.
    fn insert_text_before(&mut self, parent: &Self::Handle, text: &str, reference: &Self::Handle);

    /// Add every attribute from `attributes` that `element` does not have yet.
    fn adopt_attributes(&mut self, element: &Self::Handle, attributes: Vec<Attribute>);

    /// The document fragment holding the contents of a `<template>` element, or `None` if the
    /// adapter keeps template children inline.
    fn get_template_content(&self, template: &Self::Handle) -> Option<Self::Handle>;

    /// First child of `node`.
    fn get_first_child(&self, node: &Self::Handle) -> Option<Self::Handle>;

    /// All children of `node`, in order.
    fn get_child_nodes(&self, node: &Self::Handle) -> Vec<Self::Handle>;

    /// Parent of `node`.
    fn get_parent_node(&self, node: &Self::Handle) -> Option<Self::Handle>;

    /// Attributes of an element. Empty for other nodes.
    fn get_attr_list(&self, element: &Self::Handle) -> &[Attribute];

    /// Tag name of an element. Empty for other nodes.
    fn get_tag_name(&self, element: &Self::Handle) -> &str;

    /// Namespace of an element. [`Namespace::Html`] for other nodes.
    fn get_namespace_uri(&self, element: &Self::Handle) -> Namespace;

    /// Contents of a text node.
    fn get_text_node_content(&self, node: &Self::Handle) -> &str;

    /// Data of a comment node.
    fn get_comment_node_content(&self, node: &Self::Handle) -> &str;

    /// `(name, public_id, system_id)` of a doctype node.
    fn get_document_type_node_ids(&self, node: &Self::Handle) -> (&str, &str, &str);

    /// Whether `node` is a text node.
    fn is_text_node(&self, node: &Self::Handle) -> bool;

    /// Whether `node` is a comment node.
    fn is_comment_node(&self, node: &Self::Handle) -> bool;

    /// Whether `node` is an element.
    fn is_element_node(&self, node: &Self::Handle) -> bool;

    /// Whether `node` is a doctype node.
    fn is_document_type_node(&self, node: &Self::Handle) -> bool;

    /// Attach where `node` came from. Only called with
    /// [`crate::ParserOptions::location_info`] enabled.
    fn set_node_source_location(&mut self, node: &Self::Handle, location: SourceLocation) {
        let _ = (node, location);
    }

    /// Extend the location of `node` so that it ends where `end` ends, or set it to `end` if
    /// `node` has none yet. Called for elements closed by their end tag and for text that got
    /// merged into an existing text node.
    fn update_node_source_location(&mut self, node: &Self::Handle, end: SourceLocation) {
        let _ = (node, end);
    }
}
