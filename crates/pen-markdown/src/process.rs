//! Tree reduction: folds the converted children of a node into Markdown.

use crate::node::NodeRef;
use crate::options::TurndownOptions;
use crate::rules::{RuleContext, Rules};
use crate::utilities::{escape_markdown, leading_newlines, trailing_newlines};

/// State of one conversion.
///
/// Holds one buffer of deferred lines per rule slot, so reference-style
/// links collected while converting one document never reach another.
pub(crate) struct Pass<'r> {
    rules: &'r Rules,
    options: &'r TurndownOptions,
    deferred: Vec<Vec<String>>,
}

impl<'r> Pass<'r> {
    pub fn new(rules: &'r Rules, options: &'r TurndownOptions) -> Self {
        Self {
            rules,
            options,
            deferred: vec![Vec::new(); rules.slot_count()],
        }
    }

    /// Convert the children of `parent` and join them.
    pub fn process(&mut self, parent: &NodeRef<'_>) -> String {
        let mut output = String::new();

        for child in (0..).map_while(|index| NodeRef::child_of(parent, index)) {
            let replacement = if child.is_text() {
                let value = child.node.node_value.as_deref().unwrap_or_default();
                if child.is_code() {
                    value.to_string()
                } else {
                    escape_markdown(value)
                }
            } else if child.is_element() {
                self.replacement_for_node(&child)
            } else {
                String::new()
            };
            join(&mut output, &replacement);
        }

        output
    }

    fn replacement_for_node(&mut self, node: &NodeRef<'_>) -> String {
        let rules = self.rules;
        let resolved = rules.resolve(node, self.options);
        tracing::trace!(tag = node.tag_name(), slot = ?resolved.slot, "resolved rule");

        let content = self.process(node);
        let flanking = node.flanking_whitespace();
        let content = if flanking.is_empty() {
            content
        } else {
            content.trim().to_string()
        };

        // Fallback rules never defer, they get a throwaway buffer
        let mut scratch = Vec::new();
        let deferred = match resolved.slot {
            Some(slot) => &mut self.deferred[slot],
            None => &mut scratch,
        };
        let mut ctx = RuleContext::new(self.options, deferred);
        let replacement = resolved.rule.replace(node, &content, &mut ctx);

        format!("{}{}{}", flanking.leading, replacement, flanking.trailing)
    }

    /// Join the output of every append hook onto `output`, in rule order.
    pub fn flush(&self, mut output: String) -> String {
        self.rules.for_each_append(|slot, _, append| {
            let appended = append(self.deferred[slot].as_slice(), self.options);
            if !appended.is_empty() {
                join(&mut output, &appended);
            }
        });
        output
    }

    /// Number of lines deferred so far
    pub fn deferred_count(&self) -> usize {
        self.deferred.iter().map(Vec::len).sum()
    }
}

/// Append `replacement` to `output`, separating the two by the longer of the
/// newline runs where they meet, capped at a blank line.
pub(crate) fn join(output: &mut String, replacement: &str) {
    let trailing = trailing_newlines(output);
    let leading = leading_newlines(replacement);
    let separator = trailing.max(leading).min(2);

    output.truncate(output.len() - trailing);
    output.push_str(&"\n".repeat(separator));
    output.push_str(&replacement[leading..]);
}
