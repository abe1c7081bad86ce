//! HTML parsing support.
//!
//! Parses HTML strings with scraper and copies the result into the owned
//! [`Node`] tree the reducer walks.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;

/// Parse an HTML string into a Node tree.
///
/// The input is parsed as a body fragment; the returned node is a document
/// fragment holding the parsed top-level nodes. Malformed markup is repaired
/// by the parser rather than rejected.
///
/// # Example
///
/// ```rust
/// use copyas::{parse_html, ConversionService, Dialect};
///
/// let node = parse_html("<h1>Hello <em>World</em></h1>");
///
/// let service = ConversionService::new(Dialect::Org);
/// let org = service.convert(&node).unwrap();
/// assert_eq!(org, "* Hello /World/");
/// ```
pub fn parse_html(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    let mut fragment = Node::document_fragment();
    copy_children(document.root_element(), &mut fragment);
    fragment
}

/// Convert a scraper ElementRef to our Node structure
fn scraper_to_node(element: ElementRef) -> Node {
    let tag = element.value().name();
    let attrs: Vec<(&str, &str)> = element.value().attrs().collect();

    let mut node = if attrs.is_empty() {
        Node::element(tag)
    } else {
        Node::element_with_attrs(tag, attrs)
    };

    copy_children(element, &mut node);
    node
}

fn copy_children(element: ElementRef, target: &mut Node) {
    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                target.add_child(Node::text(&text.text));
            }
            ScraperNode::Comment(comment) => {
                target.add_child(Node::comment(&comment.comment));
            }
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    target.add_child(scraper_to_node(child_element));
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::NodeType;

    #[test]
    fn test_parse_returns_fragment() {
        let node = parse_html("<p>Hello World</p>");
        assert_eq!(node.node_type, NodeType::DocumentFragment);
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].tag_name(), "p");
        assert_eq!(node.text_content(), "Hello World");
    }

    #[test]
    fn test_parse_keeps_attributes_and_comments() {
        let node = parse_html(r#"<a HREF="x" title="t">go</a><!-- note -->"#);
        let link = &node.children[0];
        assert_eq!(link.node_name, "A");
        assert_eq!(link.attr("href"), Some("x"));
        assert_eq!(link.attr("title"), Some("t"));
        assert!(node.children[1].is_comment());
    }

    #[test]
    fn test_malformed_markup_is_repaired() {
        let node = parse_html("<p>one<p>two");
        let tags: Vec<String> = node.children.iter().map(Node::tag_name).collect();
        assert_eq!(tags, vec!["p", "p"]);
    }

    #[test]
    fn test_empty_input() {
        let node = parse_html("");
        assert!(node.children.is_empty());
    }
}
