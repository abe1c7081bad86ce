//! DOM node structure consumed by the reducer.
//!
//! `Node` is a plain owned tree, modelled on the DOM `nodeType` / `nodeName`
//! vocabulary so that any parser (html5ever, CDP, a content script snapshot)
//! can produce it. Navigation towards the parent and siblings is provided by
//! [`NodeRef`], a borrowed cursor built while the tree is walked.

use indexmap::IndexMap;

use crate::utilities::{is_block, is_void};

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// Comment node (nodeType = 8)
    Comment = 8,
    /// Document node (nodeType = 9)
    Document = 9,
    /// Document fragment node (nodeType = 11)
    DocumentFragment = 11,
}

impl From<u32> for NodeType {
    fn from(value: u32) -> Self {
        match value {
            3 => NodeType::Text,
            8 => NodeType::Comment,
            9 => NodeType::Document,
            11 => NodeType::DocumentFragment,
            _ => NodeType::Element,
        }
    }
}

/// A DOM node.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Node type (1 = Element, 3 = Text, etc.)
    pub node_type: NodeType,

    /// Node name (uppercase for elements, e.g. "DIV", "#text" for text nodes)
    pub node_name: String,

    /// Character data for text and comment nodes
    pub node_value: Option<String>,

    /// Attributes in document order, keyed by lowercase name
    pub attributes: IndexMap<String, String>,

    /// Child nodes
    pub children: Vec<Node>,
}

impl Node {
    fn bare(node_type: NodeType, node_name: &str, node_value: Option<String>) -> Self {
        Self {
            node_type,
            node_name: node_name.to_string(),
            node_value,
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self::bare(NodeType::Element, &tag_name.to_uppercase(), None)
    }

    /// Create a new element node with attributes
    pub fn element_with_attrs(tag_name: &str, attrs: Vec<(&str, &str)>) -> Self {
        let mut node = Self::element(tag_name);
        for (name, value) in attrs {
            node.set_attr(name, value);
        }
        node
    }

    /// Create a new text node
    pub fn text(content: &str) -> Self {
        Self::bare(NodeType::Text, "#text", Some(content.to_string()))
    }

    /// Create a new comment node
    pub fn comment(content: &str) -> Self {
        Self::bare(NodeType::Comment, "#comment", Some(content.to_string()))
    }

    /// Create a document fragment node
    pub fn document_fragment() -> Self {
        Self::bare(NodeType::DocumentFragment, "#document-fragment", None)
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    pub fn is_comment(&self) -> bool {
        self.node_type == NodeType::Comment
    }

    /// Get the tag name (lowercase). Empty for non-element nodes.
    pub fn tag_name(&self) -> String {
        if self.is_element() {
            self.node_name.to_lowercase()
        } else {
            String::new()
        }
    }

    /// Check whether this is an element with the given (case-insensitive) tag
    pub fn is_tag(&self, tag: &str) -> bool {
        self.is_element() && self.node_name.eq_ignore_ascii_case(tag)
    }

    /// Check if this is a block-level element
    pub fn is_block(&self) -> bool {
        self.is_element() && is_block(&self.node_name)
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_lowercase())
            .map(String::as_str)
    }

    /// Check if an attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(&name.to_lowercase())
    }

    /// Set an attribute, keeping the original position when it already exists
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes
            .insert(name.to_lowercase(), value.to_string());
    }

    /// Remove an attribute, preserving the order of the remaining ones
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(&name.to_lowercase())
    }

    /// Get all child nodes
    pub fn children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter()
    }

    /// Get only element children
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children().filter(|n| n.is_element())
    }

    /// Add a child node
    pub fn add_child(&mut self, child: Node) {
        self.children.push(child);
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        match self.node_type {
            NodeType::Text => self.node_value.clone().unwrap_or_default(),
            NodeType::Comment => String::new(),
            _ => self.children().map(|child| child.text_content()).collect(),
        }
    }

    /// Reconstruct outer HTML
    pub fn outer_html(&self) -> String {
        match self.node_type {
            NodeType::Text => {
                html_escape::encode_text(self.node_value.as_deref().unwrap_or("")).into_owned()
            }
            NodeType::Comment => {
                format!("<!--{}-->", self.node_value.as_deref().unwrap_or(""))
            }
            NodeType::Element => {
                let tag = self.tag_name();
                let attrs = self.attributes_string();
                let open = if attrs.is_empty() {
                    format!("<{}>", tag)
                } else {
                    format!("<{} {}>", tag, attrs)
                };

                if is_void(&tag) {
                    open
                } else {
                    format!("{}{}</{}>", open, self.inner_html(), tag)
                }
            }
            NodeType::Document | NodeType::DocumentFragment => self.inner_html(),
        }
    }

    /// Reconstruct inner HTML
    pub fn inner_html(&self) -> String {
        self.children().map(|child| child.outer_html()).collect()
    }

    /// Get attributes as a string for HTML output
    fn attributes_string(&self) -> String {
        self.attributes
            .iter()
            .map(|(name, value)| {
                if value.is_empty() {
                    name.clone()
                } else {
                    format!(
                        "{}=\"{}\"",
                        name,
                        html_escape::encode_double_quoted_attribute(value)
                    )
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A reference to a node with its position in the tree.
///
/// Cursors are created top-down by the reducer, so every `NodeRef` can reach
/// its parent cursor and, through it, its siblings and ancestors without the
/// tree storing back-pointers.
#[derive(Debug, Clone, Copy)]
pub struct NodeRef<'a> {
    /// The node itself
    pub node: &'a Node,
    parent: Option<&'a NodeRef<'a>>,
    index: usize,
}

impl<'a> NodeRef<'a> {
    /// Create a root cursor
    pub fn new(node: &'a Node) -> Self {
        Self {
            node,
            parent: None,
            index: 0,
        }
    }

    /// Cursors over this node's children, in document order
    pub fn child_refs<'s>(&'s self) -> impl Iterator<Item = NodeRef<'s>> + 's {
        let this: &'s NodeRef<'s> = self;
        this.node
            .children
            .iter()
            .enumerate()
            .map(move |(index, node)| NodeRef {
                node,
                parent: Some(this),
                index,
            })
    }

    pub fn parent(&self) -> Option<&'a NodeRef<'a>> {
        self.parent
    }

    /// Get the parent tag name (lowercase), if the parent is an element
    pub fn parent_tag(&self) -> Option<String> {
        self.parent
            .filter(|p| p.node.is_element())
            .map(|p| p.node.tag_name())
    }

    /// Iterate over ancestor cursors, nearest first
    pub fn ancestors(&self) -> impl Iterator<Item = &'a NodeRef<'a>> {
        std::iter::successors(self.parent, |p| p.parent)
    }

    /// Check whether any ancestor has the given tag
    pub fn has_ancestor(&self, tag: &str) -> bool {
        self.ancestors().any(|a| a.node.is_tag(tag))
    }

    /// Sibling nodes of this node (including itself), or none for the root
    fn siblings(&self) -> &'a [Node] {
        self.parent.map(|p| p.node.children.as_slice()).unwrap_or(&[])
    }

    /// Previous sibling of any node type
    pub fn previous_sibling(&self) -> Option<&'a Node> {
        if self.index == 0 {
            return None;
        }
        self.siblings().get(self.index - 1)
    }

    /// Next sibling of any node type
    pub fn next_sibling(&self) -> Option<&'a Node> {
        self.siblings().get(self.index + 1)
    }

    /// Position of this node among its parent's element children
    pub fn element_index(&self) -> usize {
        self.siblings()
            .iter()
            .take(self.index)
            .filter(|n| n.is_element())
            .count()
    }

    /// Check whether this node is the last element child of its parent
    pub fn is_last_element_child(&self) -> bool {
        self.siblings()
            .iter()
            .skip(self.index + 1)
            .all(|n| !n.is_element())
    }

    /// Delegate to Node methods
    pub fn is_element(&self) -> bool {
        self.node.is_element()
    }

    pub fn is_text(&self) -> bool {
        self.node.is_text()
    }

    pub fn tag_name(&self) -> String {
        self.node.tag_name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attr(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.node.has_attr(name)
    }

    pub fn children(&self) -> impl Iterator<Item = &'a Node> {
        self.node.children.iter()
    }

    pub fn element_children(&self) -> impl Iterator<Item = &'a Node> {
        self.node.children.iter().filter(|n| n.is_element())
    }

    pub fn text_content(&self) -> String {
        self.node.text_content()
    }

    pub fn outer_html(&self) -> String {
        self.node.outer_html()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> Node {
        let mut ol = Node::element("ol");
        for item in items {
            let mut li = Node::element("li");
            li.add_child(Node::text(item));
            ol.add_child(Node::text("\n"));
            ol.add_child(li);
        }
        ol
    }

    #[test]
    fn test_create_element() {
        let node = Node::element("div");
        assert!(node.is_element());
        assert_eq!(node.tag_name(), "div");
        assert_eq!(node.node_name, "DIV");
    }

    #[test]
    fn test_create_text() {
        let node = Node::text("Hello World");
        assert!(node.is_text());
        assert_eq!(node.text_content(), "Hello World");
        assert_eq!(node.tag_name(), "");
    }

    #[test]
    fn test_attributes_keep_order_and_unique_keys() {
        let mut node = Node::element_with_attrs(
            "a",
            vec![("href", "https://example.com"), ("TITLE", "Example")],
        );
        node.set_attr("href", "https://example.org");
        assert_eq!(node.attr("href"), Some("https://example.org"));
        assert_eq!(node.attr("title"), Some("Example"));
        assert_eq!(node.attr("class"), None);
        let names: Vec<&str> = node.attributes.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["href", "title"]);

        assert_eq!(node.remove_attr("href").as_deref(), Some("https://example.org"));
        assert!(!node.has_attr("href"));
    }

    #[test]
    fn test_text_content_skips_comments() {
        let mut div = Node::element("div");
        div.add_child(Node::text("Hello "));
        div.add_child(Node::comment("hidden"));
        let mut span = Node::element("span");
        span.add_child(Node::text("World"));
        div.add_child(span);

        assert_eq!(div.text_content(), "Hello World");
    }

    #[test]
    fn test_outer_html_escapes() {
        let mut a = Node::element_with_attrs("a", vec![("href", "https://example.com/?a=1&b=\"2\"")]);
        a.add_child(Node::text("1 < 2"));

        assert_eq!(
            a.outer_html(),
            "<a href=\"https://example.com/?a=1&amp;b=&quot;2&quot;\">1 &lt; 2</a>"
        );
    }

    #[test]
    fn test_void_element_html() {
        assert_eq!(Node::element("br").outer_html(), "<br>");

        let img = Node::element_with_attrs("img", vec![("src", "test.png"), ("alt", "Test")]);
        assert_eq!(img.outer_html(), "<img src=\"test.png\" alt=\"Test\">");
    }

    #[test]
    fn test_node_ref_navigation() {
        let ol = list(&["a", "b", "c"]);
        let root = NodeRef::new(&ol);
        let items: Vec<_> = root.child_refs().filter(|c| c.is_element()).collect();

        assert_eq!(items.len(), 3);
        assert_eq!(items[1].element_index(), 1);
        assert_eq!(items[2].element_index(), 2);
        assert_eq!(items[0].parent_tag().as_deref(), Some("ol"));
        assert!(items[0].previous_sibling().is_some_and(|n| n.is_text()));
        assert!(items[2].next_sibling().is_none());
        assert!(items[2].is_last_element_child());
        assert!(!items[0].is_last_element_child());
        assert!(root.previous_sibling().is_none());
    }

    #[test]
    fn test_has_ancestor() {
        let mut table = Node::element("table");
        let mut td = Node::element("td");
        td.add_child(Node::element("code"));
        table.add_child(td);

        let root = NodeRef::new(&table);
        let td_ref = root.child_refs().next().unwrap();
        let code_ref = td_ref.child_refs().next().unwrap();
        assert!(code_ref.has_ancestor("table"));
        assert!(!code_ref.has_ancestor("pre"));
        assert_eq!(code_ref.ancestors().count(), 2);
    }
}
