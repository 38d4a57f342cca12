//! HTML parsing support.
//!
//! Parses HTML strings with `scraper` (html5ever) and converts the result
//! into the [`Node`] tree the converter walks.

use scraper::{ElementRef, Html, Node as ScraperNode};

use crate::node::Node;

/// Parse an HTML string into a document fragment.
///
/// The fragment's children are the parsed top-level nodes. Elements, text
/// and comments are kept; doctypes and processing instructions are not.
///
/// # Example
///
/// ```rust
/// use pen_markdown::{parse_html, TurndownService};
///
/// let fragment = parse_html("<h1>Hello <em>World</em></h1>");
/// assert_eq!(fragment.children[0].tag_name(), "h1");
///
/// let service = TurndownService::new();
/// let markdown = service.turndown(&fragment).unwrap();
/// assert_eq!(markdown, "Hello _World_\n=============");
/// ```
pub fn parse_html(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    let mut fragment = Node::document_fragment();
    append_children(document.root_element(), &mut fragment);
    fragment
}

fn element_to_node(element: ElementRef<'_>) -> Node {
    let mut node = Node::element_with_attrs(element.value().name(), element.value().attrs().collect());
    append_children(element, &mut node);
    node
}

fn append_children(element: ElementRef<'_>, parent: &mut Node) {
    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => parent.add_child(Node::text(&text.text)),
            ScraperNode::Comment(comment) => parent.add_child(Node::comment(&comment.comment)),
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    parent.add_child(element_to_node(child_element));
                }
            }
            _ => {}
        }
    }
}
