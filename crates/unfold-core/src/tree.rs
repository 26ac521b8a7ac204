//! Arena-backed content tree.
//!
//! Nodes live in a flat `Vec` and refer to each other by [`NodeId`]. Replacing
//! a node detaches the old subtree from its parent; detached nodes stay in the
//! arena but are unreachable from the root and skipped by every traversal.

use std::fmt;

/// Elements that never have children or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Index of a node inside a [`ContentTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single `name="value"` pair on an element. Boolean attributes have no value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name, as written.
    pub name: String,
    /// Attribute value, if any.
    pub value: Option<String>,
}

impl Attribute {
    /// Create an attribute with a value.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Some(value.into()),
        }
    }

    /// Create a valueless (boolean) attribute.
    pub fn flag(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
        }
    }
}

/// An element node's tag and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Tag name, lowercased.
    pub tag: String,
    /// Attributes in source order.
    pub attributes: Vec<Attribute>,
}

impl Element {
    /// Create an element with no attributes.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_lowercase(),
            attributes: Vec::new(),
        }
    }

    /// Builder: add an attribute.
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, value));
        self
    }

    /// Whether this element has the given tag (case-insensitive).
    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Whether this is a void element (`br`, `img`, ...).
    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag.as_str())
    }

    /// Look up an attribute value by name (case-insensitive).
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .and_then(|a| a.value.as_deref())
    }

    /// Set an attribute, replacing an existing one of the same name.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .attributes
            .iter_mut()
            .find(|a| a.name.eq_ignore_ascii_case(name))
        {
            Some(existing) => existing.value = Some(value),
            None => self.attributes.push(Attribute::new(name, value)),
        }
    }

    /// The `id` attribute, if present.
    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Set the `id` attribute.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.set_attr("id", id);
    }

    fn write_open_tag(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for attr in &self.attributes {
            out.push(' ');
            out.push_str(&attr.name);
            if let Some(value) = &attr.value {
                out.push_str("=\"");
                out.push_str(&value.replace('&', "&amp;").replace('"', "&quot;"));
                out.push('"');
            }
        }
        out.push('>');
    }
}

/// What a node holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// An element with children.
    Element(Element),
    /// Raw text, kept verbatim (entities are not decoded).
    Text(String),
    /// A comment body, without the `<!--` / `-->` delimiters.
    Comment(String),
}

#[derive(Debug, Clone)]
struct Node {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// A tree of markup nodes rooted at a `div` wrapper.
#[derive(Debug, Clone)]
pub struct ContentTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Default for ContentTree {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentTree {
    /// Create an empty tree whose root is a `div`.
    pub fn new() -> Self {
        Self::with_root(Element::new("div"))
    }

    /// Create an empty tree with a custom root element.
    pub fn with_root(root: Element) -> Self {
        Self {
            nodes: vec![Node {
                kind: NodeKind::Element(root),
                parent: None,
                children: Vec::new(),
            }],
            root: NodeId(0),
        }
    }

    /// The root node.
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The kind of a node.
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0].kind
    }

    /// The element data of a node, if it is an element.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Mutable element data of a node, if it is an element.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Children of a node, in order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    /// Parent of a node, or `None` for the root and detached subtrees.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    /// Append a new node as the last child of `parent`.
    pub fn append_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        id
    }

    /// Append text under `parent`, merging with a trailing text sibling.
    pub fn append_text(&mut self, parent: NodeId, text: &str) {
        if let Some(&last) = self.nodes[parent.0].children.last() {
            if let NodeKind::Text(existing) = &mut self.nodes[last.0].kind {
                existing.push_str(text);
                return;
            }
        }
        self.append_child(parent, NodeKind::Text(text.to_string()));
    }

    /// Replace a node's kind, keeping its children (used to turn `a` into `span`).
    pub fn retag(&mut self, id: NodeId, element: Element) {
        self.nodes[id.0].kind = NodeKind::Element(element);
    }

    /// Whether a node is still reachable from the root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        let mut cursor = id;
        loop {
            if cursor == self.root {
                return true;
            }
            match self.parent(cursor) {
                Some(parent) => cursor = parent,
                None => return false,
            }
        }
    }

    /// Pre-order list of `id` and all its descendants.
    pub fn walk(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            out.push(next);
            stack.extend(self.nodes[next.0].children.iter().rev());
        }
        out
    }

    /// All attached nodes in document order.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.walk(self.root)
    }

    /// Concatenated text of a subtree.
    pub fn text_content(&self, id: NodeId) -> String {
        self.walk(id)
            .into_iter()
            .filter_map(|n| match &self.nodes[n.0].kind {
                NodeKind::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Copy the children of `source`'s node `from` under this tree's `parent`.
    pub fn graft_children(&mut self, parent: NodeId, source: &ContentTree, from: NodeId) {
        for &child in source.children(from) {
            let copy = self.append_child(parent, source.kind(child).clone());
            self.graft_children(copy, source, child);
        }
    }

    /// Replace `target` with a new element holding a copy of `content`'s root
    /// children. Returns the new element's id. The old subtree is detached.
    pub fn replace_with_element(
        &mut self,
        target: NodeId,
        element: Element,
        content: &ContentTree,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            kind: NodeKind::Element(element),
            parent: None,
            children: Vec::new(),
        });
        self.graft_children(id, content, content.root());

        match self.nodes[target.0].parent {
            Some(parent) => {
                let siblings = &mut self.nodes[parent.0].children;
                if let Some(slot) = siblings.iter_mut().find(|c| **c == target) {
                    *slot = id;
                }
                self.nodes[id.0].parent = Some(parent);
                self.nodes[target.0].parent = None;
            }
            // Replacing the root promotes the new element.
            None => self.root = id,
        }
        id
    }

    /// Serialize the children of the root.
    pub fn to_markup(&self) -> String {
        self.inner_markup(self.root)
    }

    /// Serialize the children of a node.
    pub fn inner_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in &self.nodes[id.0].children {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Serialize a node including its own tag.
    pub fn outer_markup(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.write_node(id, &mut out);
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        let node = &self.nodes[id.0];
        match &node.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::Comment(body) => {
                out.push_str("<!--");
                out.push_str(body);
                out.push_str("-->");
            }
            NodeKind::Element(el) => {
                el.write_open_tag(out);
                if el.is_void() {
                    return;
                }
                for &child in &node.children {
                    self.write_node(child, out);
                }
                out.push_str("</");
                out.push_str(&el.tag);
                out.push('>');
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> (ContentTree, NodeId) {
        let mut tree = ContentTree::new();
        let root = tree.root();
        let p = tree.append_child(root, NodeKind::Element(Element::new("p")));
        tree.append_text(p, "Hello ");
        let a = tree.append_child(
            p,
            NodeKind::Element(Element::new("a").with_attr("href", "#")),
        );
        tree.append_text(a, "there");
        (tree, a)
    }

    #[test]
    fn serializes_canonical_markup() {
        let (tree, _) = sample();
        assert_eq!(tree.to_markup(), r##"<p>Hello <a href="#">there</a></p>"##);
    }

    #[test]
    fn text_is_merged() {
        let mut tree = ContentTree::new();
        let root = tree.root();
        tree.append_text(root, "a");
        tree.append_text(root, "b");
        assert_eq!(tree.children(root).len(), 1);
        assert_eq!(tree.text_content(root), "ab");
    }

    #[test]
    fn walk_is_preorder() {
        let (tree, a) = sample();
        let order = tree.nodes();
        assert_eq!(order[0], tree.root());
        assert!(order.contains(&a));
        assert_eq!(order.len(), 5);
    }

    #[test]
    fn retag_keeps_children() {
        let (mut tree, a) = sample();
        tree.retag(a, Element::new("span").with_attr("class", "off"));
        assert_eq!(
            tree.to_markup(),
            r#"<p>Hello <span class="off">there</span></p>"#
        );
    }

    #[test]
    fn replace_detaches_old_node() {
        let (mut tree, a) = sample();
        let mut fragment = ContentTree::new();
        let froot = fragment.root();
        fragment.append_text(froot, "everyone");

        let wrapper = tree.replace_with_element(a, Element::new("span"), &fragment);

        assert!(!tree.is_attached(a));
        assert!(tree.is_attached(wrapper));
        assert_eq!(tree.to_markup(), "<p>Hello <span>everyone</span></p>");
        assert!(!tree.nodes().contains(&a));
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let mut tree = ContentTree::new();
        let root = tree.root();
        tree.append_child(root, NodeKind::Element(Element::new("br")));
        assert_eq!(tree.to_markup(), "<br>");
    }

    #[test]
    fn attribute_quotes_escaped() {
        let el = Element::new("a").with_attr("title", r#"say "hi""#);
        let mut out = String::new();
        el.write_open_tag(&mut out);
        assert_eq!(out, r#"<a title="say &quot;hi&quot;">"#);
    }

    #[test]
    fn attribute_ampersands_escaped() {
        let el = Element::new("a").with_attr("data-goto-section", "a&b");
        let mut out = String::new();
        el.write_open_tag(&mut out);
        assert_eq!(out, r#"<a data-goto-section="a&amp;b">"#);
    }

    #[test]
    fn set_attr_replaces_existing() {
        let mut el = Element::new("a").with_attr("id", "one");
        el.set_id("two");
        assert_eq!(el.id(), Some("two"));
        assert_eq!(el.attributes.len(), 1);
    }
}
