//! Whitespace normalization run on the working copy before conversion.
//!
//! Mirrors how a browser renders inline whitespace: runs of HTML whitespace
//! become one space, a space is dropped when the previous text already ends
//! with one, and spaces are trimmed where a block or `<br>` starts or ends.
//! `<pre>` subtrees are left untouched. Comments and other non-text,
//! non-element nodes are removed.
//!
//! The walk is iterative and addresses nodes by their index path from the
//! root. Removed nodes stay in place until the walk ends, so paths never
//! shift; each parent's child list is then compacted in a single pass.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::node::{Node, NodeType};
use crate::utilities::{is_block, is_void};

static HTML_SPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \r\n\t]+").expect("valid regex"));

/// Indices of removed children, keyed by the parent's path
type Removed = BTreeMap<Vec<usize>, Vec<usize>>;

/// Where the walk goes next.
struct Cursor {
    path: Vec<usize>,
    /// Arrived from the last child, so the children are done
    ascending: bool,
}

pub(crate) fn collapse_whitespace(root: &mut Node) {
    if root.children.is_empty() || is_pre(root) {
        return;
    }

    let mut removed = Removed::new();
    let mut prev_text: Option<Vec<usize>> = None;
    let mut prev_void = false;
    let mut cursor = Some(Cursor {
        path: vec![0],
        ascending: false,
    });

    while let Some(Cursor { path, ascending }) = cursor.take() {
        let strip_leading = !prev_void
            && prev_text
                .as_deref()
                .map_or(true, |p| text_at(root, p).ends_with(' '));

        let node = node_at_mut(root, &path);
        match node.node_type {
            NodeType::Text | NodeType::CData => {
                let text = {
                    let raw = node.node_value.as_deref().unwrap_or_default();
                    let collapsed = HTML_SPACE_RUN.replace_all(raw, " ");
                    match collapsed.strip_prefix(' ') {
                        Some(rest) if strip_leading => rest.to_string(),
                        _ => collapsed.to_string(),
                    }
                };

                if text.is_empty() {
                    cursor = remove(root, &mut removed, path);
                    continue;
                }

                node.node_value = Some(text);
                prev_text = Some(path.clone());
                prev_void = false;
            }
            NodeType::Element => {
                let tag = node.tag_name();
                let (breaks_line, void) = (is_block(tag) || tag == "br", is_void(tag));
                if breaks_line {
                    if let Some(p) = prev_text.take() {
                        trim_trailing_space(node_at_mut(root, &p));
                    }
                    prev_void = false;
                } else if void {
                    prev_text = None;
                    prev_void = true;
                }
            }
            _ => {
                cursor = remove(root, &mut removed, path);
                continue;
            }
        }

        cursor = advance(root, path, ascending);
    }

    if let Some(p) = prev_text {
        let node = node_at_mut(root, &p);
        trim_trailing_space(node);
        if node.node_value.as_deref().map_or(true, str::is_empty) {
            mark_removed(&mut removed, &p);
        }
    }

    compact(root, removed);
}

fn is_pre(node: &Node) -> bool {
    node.is_element() && node.tag_name() == "pre"
}

fn trim_trailing_space(node: &mut Node) {
    if let Some(value) = node.node_value.as_mut() {
        if value.ends_with(' ') {
            value.pop();
        }
    }
}

fn node_at<'a>(root: &'a Node, path: &[usize]) -> &'a Node {
    path.iter().fold(root, |node, &i| &node.children[i])
}

fn node_at_mut<'a>(root: &'a mut Node, path: &[usize]) -> &'a mut Node {
    path.iter().fold(root, |node, &i| &mut node.children[i])
}

fn text_at<'a>(root: &'a Node, path: &[usize]) -> &'a str {
    node_at(root, path).node_value.as_deref().unwrap_or_default()
}

/// Depth-first step: into the children unless they are done or preformatted,
/// otherwise to the next sibling, otherwise back up to the parent.
fn advance(root: &Node, mut path: Vec<usize>, ascending: bool) -> Option<Cursor> {
    let node = node_at(root, &path);
    if !ascending && !is_pre(node) && !node.children.is_empty() {
        path.push(0);
        return Some(Cursor {
            path,
            ascending: false,
        });
    }
    next_sibling_or_parent(root, path)
}

/// Mark the node at `path` removed and return where the walk resumes.
fn remove(root: &Node, removed: &mut Removed, path: Vec<usize>) -> Option<Cursor> {
    mark_removed(removed, &path);
    next_sibling_or_parent(root, path)
}

fn mark_removed(removed: &mut Removed, path: &[usize]) {
    if let Some((&index, parent_path)) = path.split_last() {
        removed.entry(parent_path.to_vec()).or_default().push(index);
    }
}

/// Drop every marked node.
///
/// Deeper parents sort after their ancestors, so walking the map backwards
/// compacts them before any index on their own path moves.
fn compact(root: &mut Node, removed: Removed) {
    for (parent_path, dead) in removed.into_iter().rev() {
        let mut index = 0;
        node_at_mut(root, &parent_path).children.retain(|_| {
            let keep = dead.binary_search(&index).is_err();
            index += 1;
            keep
        });
    }
}

fn next_sibling_or_parent(root: &Node, mut path: Vec<usize>) -> Option<Cursor> {
    let (&index, parent_path) = path.split_last()?;
    if index + 1 < node_at(root, parent_path).children.len() {
        if let Some(last) = path.last_mut() {
            *last += 1;
        }
        Some(Cursor {
            path,
            ascending: false,
        })
    } else {
        ascend(path)
    }
}

/// Back to the parent, or `None` once the parent is the root.
fn ascend(mut path: Vec<usize>) -> Option<Cursor> {
    path.pop();
    if path.is_empty() {
        None
    } else {
        Some(Cursor {
            path,
            ascending: true,
        })
    }
}
