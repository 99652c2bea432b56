//! Arena-backed document model.
//!
//! Every block decorator works on a [`Document`]: a tree of element and text
//! nodes stored in an [`indextree::Arena`] and addressed by [`NodeId`]. The
//! arena is the single owner of every node, so relocating content between
//! structural parents is a move, never a copy:
//!
//! ```text
//! row ─┬─ cell (picture)           slide ─┬─ cell.carousel-slide-image
//!      └─ cell (h2, p)      ──►           └─ cell.carousel-slide-body
//! ```
//!
//! [`Document::append`], [`Document::prepend`] and [`Document::insert_before`]
//! detach the moved node from its previous parent first. A node is therefore
//! never reachable from two parents at once.
//!
//! ## Parsing
//!
//! [`Document::parse_fragment`] runs html5ever over the input and copies the
//! `<body>` children into the arena. Comments, doctypes and processing
//! instructions are dropped, as is whitespace-only text between top-level
//! nodes. Whitespace inside elements is kept: it separates inline words.
//!
//! ## Serialization
//!
//! [`NodeRef`] implements [`maud::Render`], so any subtree can be embedded in
//! a maud template or turned into a string with [`Document::outer_html`].
//! Text and attribute values go through maud's escaper, except the text of
//! raw-text elements such as `<style>` and `<script>`, which is written as is.

use html5ever::tendril::TendrilSink;
use html5ever::{ParseOpts, parse_document};
use indextree::Arena;
use maud::{Escaper, Markup, Render};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::fmt::Write as _;
use thiserror::Error;

pub use indextree::NodeId;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Tree error: {0}")]
    Tree(#[from] indextree::NodeError),
    #[error("Node {0:?} is not an element")]
    NotAnElement(NodeId),
    #[error("Node {0:?} has been removed")]
    Removed(NodeId),
}

/// Elements serialized without a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose text children serialize verbatim.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "iframe", "noembed", "noframes", "noscript", "plaintext", "script", "style", "xmp",
];

/// Payload of one arena slot.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Fragment root; owns the top-level nodes and is never rendered itself.
    Root,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, keeping its original position when it already exists.
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match self.attrs.iter_mut().find(|(key, _)| key == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attrs.push((name.to_string(), value.to_string())),
        }
    }

    pub fn remove_attr(&mut self, name: &str) {
        self.attrs.retain(|(key, _)| key != name);
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let mut list: Vec<&str> = self.classes().collect();
        list.push(class);
        let joined = list.join(" ");
        self.set_attr("class", &joined);
    }

    pub fn remove_class(&mut self, class: &str) {
        if !self.has_class(class) {
            return;
        }
        let joined = self
            .classes()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        if joined.is_empty() {
            self.remove_attr("class");
        } else {
            self.set_attr("class", &joined);
        }
    }
}

/// A fragment of markup owned by an arena.
#[derive(Debug)]
pub struct Document {
    arena: Arena<NodeKind>,
    root: NodeId,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Create an empty document holding only the fragment root.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(NodeKind::Root);
        Self { arena, root }
    }

    /// Parse an HTML fragment into a new document.
    ///
    /// The fragment is parsed as a full document (so html5ever applies its
    /// usual error recovery) and the contents of `<body>` become the children
    /// of [`Document::root`].
    pub fn parse_fragment(html: &str) -> Result<Self, DomError> {
        let dom = parse_document(RcDom::default(), ParseOpts::default())
            .from_utf8()
            .read_from(&mut html.as_bytes())?;

        let mut doc = Self::new();
        let root = doc.root;
        if let Some(body) = find_body(&dom.document) {
            for child in body.children.borrow().iter() {
                doc.import(child, root)?;
            }
        }
        Ok(doc)
    }

    fn import(&mut self, handle: &Handle, parent: NodeId) -> Result<(), DomError> {
        match &handle.data {
            NodeData::Element { name, attrs, .. } => {
                let attrs = attrs
                    .borrow()
                    .iter()
                    .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                    .collect();
                let node = self.arena.new_node(NodeKind::Element(Element {
                    tag: name.local.to_string(),
                    attrs,
                }));
                parent.checked_append(node, &mut self.arena)?;
                for child in handle.children.borrow().iter() {
                    self.import(child, node)?;
                }
            }
            NodeData::Text { contents } => {
                let text = contents.borrow().to_string();
                // Inline spacing is content; only the gaps between top-level blocks go.
                if parent != self.root || !text.trim().is_empty() {
                    let node = self.arena.new_node(NodeKind::Text(text));
                    parent.checked_append(node, &mut self.arena)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    // ------------------------------------------------------------------
    // Node access
    // ------------------------------------------------------------------

    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.arena
            .get(id)
            .filter(|node| !node.is_removed())
            .map(|node| node.get())
    }

    pub fn is_removed(&self, id: NodeId) -> bool {
        self.arena.get(id).is_none_or(|node| node.is_removed())
    }

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match self.kind(id) {
            Some(NodeKind::Element(element)) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut Element, DomError> {
        match self.arena.get_mut(id) {
            Some(node) if !node.is_removed() => match node.get_mut() {
                NodeKind::Element(element) => Ok(element),
                _ => Err(DomError::NotAnElement(id)),
            },
            _ => Err(DomError::Removed(id)),
        }
    }

    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => Some(text),
            _ => None,
        }
    }

    pub fn tag(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|element| element.tag.as_str())
    }

    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.tag(id).is_some_and(|t| t.eq_ignore_ascii_case(tag))
    }

    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|element| element.attr(name))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.element_mut(id)?.set_attr(name, value);
        Ok(())
    }

    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id).is_some_and(|element| element.has_class(class))
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        self.element_mut(id)?.add_class(class);
        Ok(())
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<(), DomError> {
        self.element_mut(id)?.remove_class(class);
        Ok(())
    }

    /// Add `class` when `on`, remove it otherwise.
    pub fn toggle_class(&mut self, id: NodeId, class: &str, on: bool) -> Result<(), DomError> {
        let element = self.element_mut(id)?;
        if on {
            element.add_class(class);
        } else {
            element.remove_class(class);
        }
        Ok(())
    }

    /// Replace the whole class list.
    pub fn set_class_name(&mut self, id: NodeId, class_name: &str) -> Result<(), DomError> {
        self.element_mut(id)?.set_attr("class", class_name);
        Ok(())
    }

    // ------------------------------------------------------------------
    // Traversal
    // ------------------------------------------------------------------

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.arena
            .get(id)
            .filter(|node| !node.is_removed())
            .and_then(|node| node.parent())
    }

    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.children(&self.arena)
    }

    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).filter(|&child| self.element(child).is_some())
    }

    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).next()
    }

    /// All descendants in document order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        id.descendants(&self.arena).skip(1)
    }

    pub fn descendants_by_tag<'a>(
        &'a self,
        id: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.descendants(id).filter(move |&node| self.is_tag(node, tag))
    }

    pub fn descendants_by_class<'a>(
        &'a self,
        id: NodeId,
        class: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.descendants(id)
            .filter(move |&node| self.has_class(node, class))
    }

    /// Nearest node, starting with `id` itself, that satisfies `predicate`.
    pub fn closest(&self, id: NodeId, predicate: impl Fn(NodeId) -> bool) -> Option<NodeId> {
        if self.is_removed(id) {
            return None;
        }
        id.ancestors(&self.arena).find(|&node| predicate(node))
    }

    /// Whether `id` is still reachable from the fragment root.
    pub fn is_connected(&self, id: NodeId) -> bool {
        !self.is_removed(id) && id.ancestors(&self.arena).any(|node| node == self.root)
    }

    /// Concatenated text of every text node under `id`.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        if let Some(text) = self.text(id) {
            out.push_str(text);
        }
        for node in self.descendants(id) {
            if let Some(text) = self.text(node) {
                out.push_str(text);
            }
        }
        out
    }

    // ------------------------------------------------------------------
    // Construction and mutation
    // ------------------------------------------------------------------

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.arena.new_node(NodeKind::Element(Element::new(tag)))
    }

    /// Create a detached element with a class list.
    pub fn create_element_with_class(&mut self, tag: &str, class_name: &str) -> NodeId {
        let mut element = Element::new(tag);
        element.set_attr("class", class_name);
        self.arena.new_node(NodeKind::Element(element))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(NodeKind::Text(text.to_string()))
    }

    /// Move `child` to the end of `parent`'s children.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        parent.checked_append(child, &mut self.arena)?;
        Ok(())
    }

    /// Move `child` to the front of `parent`'s children.
    pub fn prepend(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        parent.checked_prepend(child, &mut self.arena)?;
        Ok(())
    }

    /// Move `node` so it becomes the previous sibling of `reference`.
    pub fn insert_before(&mut self, reference: NodeId, node: NodeId) -> Result<(), DomError> {
        reference.checked_insert_before(node, &mut self.arena)?;
        Ok(())
    }

    /// Put `replacement` where `old` was and drop `old` with its subtree.
    pub fn replace_with(&mut self, old: NodeId, replacement: NodeId) -> Result<(), DomError> {
        if self.is_removed(old) {
            return Err(DomError::Removed(old));
        }
        old.checked_insert_before(replacement, &mut self.arena)?;
        old.remove_subtree(&mut self.arena);
        Ok(())
    }

    /// Drop `id` and everything below it.
    pub fn remove(&mut self, id: NodeId) {
        if !self.is_removed(id) {
            id.remove_subtree(&mut self.arena);
        }
    }

    /// Drop every child of `id`.
    pub fn clear_children(&mut self, id: NodeId) {
        let children: Vec<NodeId> = self.children(id).collect();
        for child in children {
            child.remove_subtree(&mut self.arena);
        }
    }

    /// Replace all children of `id` with a single text node.
    pub fn set_text(&mut self, id: NodeId, text: &str) -> Result<(), DomError> {
        self.clear_children(id);
        let node = self.create_text(text);
        self.append(id, node)
    }

    // ------------------------------------------------------------------
    // Serialization
    // ------------------------------------------------------------------

    pub fn node(&self, id: NodeId) -> NodeRef<'_> {
        NodeRef { doc: self, id }
    }

    pub fn render(&self, id: NodeId) -> Markup {
        self.node(id).render()
    }

    pub fn outer_html(&self, id: NodeId) -> String {
        self.render(id).into_string()
    }

    pub fn inner_html(&self, id: NodeId) -> String {
        let mut buffer = String::new();
        for child in self.children(id) {
            self.write_node(child, &mut buffer);
        }
        buffer
    }

    fn write_node(&self, id: NodeId, buffer: &mut String) {
        match self.kind(id) {
            Some(NodeKind::Root) => {
                for child in self.children(id) {
                    self.write_node(child, buffer);
                }
            }
            Some(NodeKind::Text(text)) => {
                let raw = self
                    .parent(id)
                    .and_then(|parent| self.tag(parent))
                    .is_some_and(|tag| RAW_TEXT_ELEMENTS.contains(&tag));
                if raw {
                    buffer.push_str(text);
                } else {
                    let _ = Escaper::new(buffer).write_str(text);
                }
            }
            Some(NodeKind::Element(element)) => {
                buffer.push('<');
                buffer.push_str(&element.tag);
                for (name, value) in &element.attrs {
                    buffer.push(' ');
                    buffer.push_str(name);
                    buffer.push_str("=\"");
                    let _ = Escaper::new(buffer).write_str(value);
                    buffer.push('"');
                }
                buffer.push('>');
                if VOID_ELEMENTS.contains(&element.tag.as_str()) {
                    return;
                }
                for child in self.children(id) {
                    self.write_node(child, buffer);
                }
                buffer.push_str("</");
                buffer.push_str(&element.tag);
                buffer.push('>');
            }
            None => {}
        }
    }
}

/// Borrowed view of one subtree, renderable with maud.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl NodeRef<'_> {
    pub fn id(&self) -> NodeId {
        self.id
    }
}

impl Render for NodeRef<'_> {
    fn render_to(&self, buffer: &mut String) {
        self.doc.write_node(self.id, buffer);
    }
}

fn find_body(handle: &Handle) -> Option<Handle> {
    if let NodeData::Element { name, .. } = &handle.data {
        if &*name.local == "body" {
            return Some(handle.clone());
        }
    }
    handle.children.borrow().iter().find_map(find_body)
}
