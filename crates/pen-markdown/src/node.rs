//! DOM node structure walked by the converter.
//!
//! [`Node`] follows the DOM `nodeType`/`nodeName`/`nodeValue` shape so that
//! any parser (html5ever, a browser bridge, a hand-built tree) can produce it.
//! [`NodeRef`] is what rules see: a node together with its parent, its
//! position, and the facts the classifier derived for the current pass.

use indexmap::IndexMap;

use crate::classify::FlankingWhitespace;
use crate::utilities::is_void;
use crate::TurndownError;

/// Node types matching DOM nodeType values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    /// Element node (nodeType = 1)
    Element = 1,
    /// Text node (nodeType = 3)
    Text = 3,
    /// CDATA section (nodeType = 4)
    CData = 4,
    /// Processing instruction (nodeType = 7)
    ProcessingInstruction = 7,
    /// Comment node (nodeType = 8)
    Comment = 8,
    /// Document node (nodeType = 9)
    Document = 9,
    /// Doctype node (nodeType = 10)
    DocumentType = 10,
    /// Document fragment node (nodeType = 11)
    DocumentFragment = 11,
}

impl TryFrom<u32> for NodeType {
    type Error = TurndownError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(NodeType::Element),
            3 => Ok(NodeType::Text),
            4 => Ok(NodeType::CData),
            7 => Ok(NodeType::ProcessingInstruction),
            8 => Ok(NodeType::Comment),
            9 => Ok(NodeType::Document),
            10 => Ok(NodeType::DocumentType),
            11 => Ok(NodeType::DocumentFragment),
            other => Err(TurndownError::InvalidInput(format!(
                "unsupported node type {other}"
            ))),
        }
    }
}

/// A DOM node and the subtree it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node type (1 = Element, 3 = Text, etc.)
    pub node_type: NodeType,

    /// Lower-case tag name for elements, `#text`, `#comment`, ... otherwise
    pub node_name: String,

    /// Character data for text, CDATA and comment nodes
    pub node_value: Option<String>,

    /// Attributes in document order, names lower-cased
    pub attributes: IndexMap<String, String>,

    /// Child nodes
    pub children: Vec<Node>,
}

impl Node {
    fn with_kind(node_type: NodeType, node_name: &str, node_value: Option<&str>) -> Self {
        Self {
            node_type,
            node_name: node_name.to_string(),
            node_value: node_value.map(str::to_string),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Create a new element node
    pub fn element(tag_name: &str) -> Self {
        Self::with_kind(NodeType::Element, &tag_name.to_lowercase(), None)
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
        Self::with_kind(NodeType::Text, "#text", Some(content))
    }

    /// Create a CDATA section node
    pub fn cdata(content: &str) -> Self {
        Self::with_kind(NodeType::CData, "#cdata-section", Some(content))
    }

    /// Create a comment node
    pub fn comment(content: &str) -> Self {
        Self::with_kind(NodeType::Comment, "#comment", Some(content))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::with_kind(NodeType::Document, "#document", None)
    }

    /// Create a document fragment node
    pub fn document_fragment() -> Self {
        Self::with_kind(NodeType::DocumentFragment, "#document-fragment", None)
    }

    /// Append a child and return the node, for building trees inline
    pub fn with_child(mut self, child: Node) -> Self {
        self.add_child(child);
        self
    }

    /// Check if this is an element node
    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    /// Check if this node carries character data (text or CDATA)
    pub fn is_text(&self) -> bool {
        matches!(self.node_type, NodeType::Text | NodeType::CData)
    }

    /// Get the tag name (lowercase)
    pub fn tag_name(&self) -> &str {
        &self.node_name
    }

    /// Get an attribute value by name
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(name)
            .or_else(|| self.attributes.get(&name.to_lowercase()))
            .map(String::as_str)
    }

    /// Check if an attribute exists
    pub fn has_attr(&self, name: &str) -> bool {
        self.attr(name).is_some()
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

    /// Set an attribute, replacing any previous value
    pub fn set_attr(&mut self, name: &str, value: &str) {
        self.attributes
            .insert(name.to_lowercase(), value.to_string());
    }

    /// Get all text content from this node and descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self.node_type {
            NodeType::Text | NodeType::CData => {
                out.push_str(self.node_value.as_deref().unwrap_or_default())
            }
            NodeType::Comment | NodeType::ProcessingInstruction | NodeType::DocumentType => {}
            _ => self.children().for_each(|child| child.collect_text(out)),
        }
    }

    /// Check whether any descendant is a void element
    pub fn has_void_descendant(&self) -> bool {
        self.children()
            .any(|child| (child.is_element() && is_void(child.tag_name())) || child.has_void_descendant())
    }

    /// Reconstruct outer HTML (for keep rules)
    pub fn outer_html(&self) -> String {
        match self.node_type {
            NodeType::Text => escape_html_text(self.node_value.as_deref().unwrap_or_default()),
            NodeType::CData => format!(
                "<![CDATA[{}]]>",
                self.node_value.as_deref().unwrap_or_default()
            ),
            NodeType::Comment => format!(
                "<!--{}-->",
                self.node_value.as_deref().unwrap_or_default()
            ),
            NodeType::Element => {
                let tag = self.tag_name();
                let attrs = self.attributes_string();

                if is_void(tag) {
                    format!("<{tag}{attrs}>")
                } else {
                    format!("<{tag}{attrs}>{}</{tag}>", self.inner_html())
                }
            }
            _ => self.inner_html(),
        }
    }

    /// Reconstruct inner HTML
    pub fn inner_html(&self) -> String {
        self.children().map(Node::outer_html).collect()
    }

    /// Attributes rendered for a start tag, with a leading space when non-empty
    fn attributes_string(&self) -> String {
        self.attributes
            .iter()
            .map(|(name, value)| {
                if value.is_empty() {
                    format!(" {name}")
                } else {
                    format!(" {name}=\"{}\"", escape_html_attr(value))
                }
            })
            .collect()
    }
}

/// Escape HTML attribute value
fn escape_html_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_html_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// A node seen from inside a conversion pass.
///
/// Rules receive a `NodeRef` rather than a bare [`Node`] so that they can
/// look at the parent and siblings (list numbering, code-in-pre detection)
/// and at the classifier's facts without recomputing them.
#[derive(Debug, Clone)]
pub struct NodeRef<'a> {
    /// The node itself
    pub node: &'a Node,
    parent: Option<&'a Node>,
    index: usize,
    pub(crate) is_block: bool,
    pub(crate) is_code: bool,
    pub(crate) is_blank: bool,
    pub(crate) flanking: FlankingWhitespace,
}

impl<'a> NodeRef<'a> {
    /// View a node on its own, with no parent context
    pub fn new(node: &'a Node) -> Self {
        crate::classify::classify(node, None, 0, false)
    }

    /// View the child at `index` of `parent`
    ///
    /// Returns `None` when `index` is out of bounds.
    pub fn child_of(parent: &NodeRef<'a>, index: usize) -> Option<Self> {
        let node = parent.node.children.get(index)?;
        Some(crate::classify::classify(
            node,
            Some(parent.node),
            index,
            parent.is_code,
        ))
    }

    pub(crate) fn from_parts(
        node: &'a Node,
        parent: Option<&'a Node>,
        index: usize,
        is_block: bool,
        is_code: bool,
        is_blank: bool,
        flanking: FlankingWhitespace,
    ) -> Self {
        Self {
            node,
            parent,
            index,
            is_block,
            is_code,
            is_blank,
            flanking,
        }
    }

    /// Get the parent node if known
    pub fn parent(&self) -> Option<&'a Node> {
        self.parent
    }

    /// Get the parent tag name if known
    pub fn parent_tag(&self) -> Option<&'a str> {
        self.parent.map(Node::tag_name)
    }

    /// Position among the parent's children (all node kinds)
    pub fn index(&self) -> usize {
        self.index
    }

    /// The sibling immediately before this node
    pub fn previous_sibling(&self) -> Option<&'a Node> {
        let parent = self.parent?;
        self.index.checked_sub(1).and_then(|i| parent.children.get(i))
    }

    /// The sibling immediately after this node
    pub fn next_sibling(&self) -> Option<&'a Node> {
        self.parent?.children.get(self.index + 1)
    }

    /// Position among the parent's element children
    pub fn element_index(&self) -> usize {
        self.parent
            .map(|p| p.children[..self.index].iter().filter(|n| n.is_element()).count())
            .unwrap_or(0)
    }

    /// Whether this node is the parent's last element child
    pub fn is_last_element_child(&self) -> bool {
        self.parent
            .map(|p| p.children[self.index + 1..].iter().all(|n| !n.is_element()))
            .unwrap_or(false)
    }

    /// Block-level element
    pub fn is_block(&self) -> bool {
        self.is_block
    }

    /// `<code>` element or inside one
    pub fn is_code(&self) -> bool {
        self.is_code
    }

    /// Nothing but whitespace, and no void element that would render
    pub fn is_blank(&self) -> bool {
        self.is_blank
    }

    /// Void element such as `<img>` or `<br>`
    pub fn is_void(&self) -> bool {
        self.node.is_element() && is_void(self.node.tag_name())
    }

    /// Single spaces to re-attach around the rendered element
    pub fn flanking_whitespace(&self) -> &FlankingWhitespace {
        &self.flanking
    }

    /// Delegate to Node methods
    pub fn is_element(&self) -> bool {
        self.node.is_element()
    }

    pub fn is_text(&self) -> bool {
        self.node.is_text()
    }

    pub fn tag_name(&self) -> &'a str {
        self.node.tag_name()
    }

    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.node.attr(name)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.node.has_attr(name)
    }

    pub fn children(&self) -> impl Iterator<Item = &'a Node> {
        self.node.children()
    }

    pub fn element_children(&self) -> impl Iterator<Item = &'a Node> {
        self.node.element_children()
    }

    pub fn text_content(&self) -> String {
        self.node.text_content()
    }

    pub fn outer_html(&self) -> String {
        self.node.outer_html()
    }

    pub fn inner_html(&self) -> String {
        self.node.inner_html()
    }
}
