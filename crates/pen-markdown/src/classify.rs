//! Per-pass facts about a node: block, code, blank and flanking whitespace.
//!
//! These are computed when the reducer visits a node rather than stored on
//! the tree, since `is_code` depends on the ancestors seen on the way down.

use crate::node::{Node, NodeRef, NodeType};
use crate::utilities::{is_block, is_meaningful_when_blank, is_void};

/// Leading and trailing whitespace to put back around an inline element.
///
/// Each side is either empty or a single space.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlankingWhitespace {
    pub leading: &'static str,
    pub trailing: &'static str,
}

impl FlankingWhitespace {
    pub fn is_empty(&self) -> bool {
        self.leading.is_empty() && self.trailing.is_empty()
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

pub(crate) fn classify<'a>(
    node: &'a Node,
    parent: Option<&'a Node>,
    index: usize,
    parent_is_code: bool,
) -> NodeRef<'a> {
    let tag = node.tag_name();
    let block = node.is_element() && is_block(tag);
    let code = parent_is_code || (node.is_element() && tag == "code");

    NodeRef::from_parts(
        node,
        parent,
        index,
        block,
        code,
        is_blank(node),
        flanking_whitespace(node, block, parent, index),
    )
}

fn is_blank(node: &Node) -> bool {
    let tag = node.tag_name();
    !is_meaningful_when_blank(tag)
        && node.text_content().chars().all(char::is_whitespace)
        && !is_void(tag)
        && !node.has_void_descendant()
}

fn flanking_whitespace(
    node: &Node,
    block: bool,
    parent: Option<&Node>,
    index: usize,
) -> FlankingWhitespace {
    if block {
        return FlankingWhitespace::default();
    }

    let text = node.text_content();
    let has_leading = text.starts_with(is_html_space);
    let has_trailing = text.ends_with(is_html_space);

    FlankingWhitespace {
        leading: if has_leading && !is_flanked_by_whitespace(Side::Left, parent, index) {
            " "
        } else {
            ""
        },
        trailing: if has_trailing && !is_flanked_by_whitespace(Side::Right, parent, index) {
            " "
        } else {
            ""
        },
    }
}

fn is_flanked_by_whitespace(side: Side, parent: Option<&Node>, index: usize) -> bool {
    let Some(parent) = parent else {
        return false;
    };
    let sibling = match side {
        Side::Left => index.checked_sub(1).and_then(|i| parent.children.get(i)),
        Side::Right => parent.children.get(index + 1),
    };
    let Some(sibling) = sibling else {
        return false;
    };

    let edge_is_space = |text: &str| match side {
        Side::Left => text.ends_with(' '),
        Side::Right => text.starts_with(' '),
    };

    match sibling.node_type {
        NodeType::Text => edge_is_space(sibling.node_value.as_deref().unwrap_or_default()),
        NodeType::Element if !is_block(sibling.tag_name()) => edge_is_space(sibling.text_content().as_str()),
        _ => false,
    }
}

fn is_html_space(c: char) -> bool {
    matches!(c, ' ' | '\r' | '\n' | '\t')
}
