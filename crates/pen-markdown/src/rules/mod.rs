//! Rule system for HTML to Markdown conversion.
//!
//! Rules are consulted in a fixed order and the first match wins:
//!
//! 1. the blank rule, for nodes the classifier marked blank
//! 2. custom rules, most recently added first
//! 3. the built-in CommonMark rules
//! 4. keep rules (output the node's HTML), most recently added first
//! 5. remove rules (output nothing), most recently added first
//! 6. the default rule
//!
//! Resolution therefore never fails.

mod commonmark;
mod rule;

pub use commonmark::commonmark_rules;
pub use rule::{AppendFn, Filter, PredicateFn, ReplacementFn, Rule, RuleContext};

use indexmap::IndexMap;

use crate::node::NodeRef;
use crate::options::TurndownOptions;
use crate::Result;

/// A rule picked for a node, with the pass slot of its deferred lines.
///
/// Only custom and CommonMark rules have a slot: those are the rules that
/// may carry an append hook.
pub(crate) struct Resolved<'a> {
    pub rule: &'a Rule,
    pub slot: Option<usize>,
}

/// Collection of rules for conversion
pub struct Rules {
    /// Custom rules added by the user (checked first, newest last)
    custom_rules: IndexMap<String, Rule>,
    /// Built-in CommonMark rules
    commonmark_rules: Vec<Rule>,
    /// Keep rules (preserve as HTML, newest first)
    keep_rules: Vec<Rule>,
    /// Remove rules (remove entirely, newest first)
    remove_rules: Vec<Rule>,
    blank_rule: Rule,
    default_rule: Rule,
}

impl Rules {
    /// Create a new Rules instance with CommonMark rules
    pub fn new() -> Self {
        Self {
            custom_rules: IndexMap::new(),
            commonmark_rules: commonmark_rules(),
            keep_rules: Vec::new(),
            remove_rules: Vec::new(),
            blank_rule: blank_rule(),
            default_rule: default_rule(),
        }
    }

    /// Add a custom rule ahead of every existing rule.
    ///
    /// Adding a rule under a key that is already taken replaces the old rule
    /// and moves the key to the front.
    pub fn add(&mut self, key: &str, rule: Rule) -> Result<()> {
        rule.filter.validate()?;
        self.custom_rules.shift_remove(key);
        self.custom_rules.insert(key.to_string(), rule);
        Ok(())
    }

    /// Add a keep filter
    pub fn keep(&mut self, filter: Filter) -> Result<()> {
        filter.validate()?;
        self.keep_rules.insert(0, keep_rule(filter));
        Ok(())
    }

    /// Add a remove filter
    pub fn remove(&mut self, filter: Filter) -> Result<()> {
        filter.validate()?;
        self.remove_rules
            .insert(0, Rule::new(filter, |_, _, _| String::new()));
        Ok(())
    }

    /// Custom then CommonMark rules, in precedence order
    fn ordered(&self) -> impl Iterator<Item = &Rule> {
        self.custom_rules
            .values()
            .rev()
            .chain(self.commonmark_rules.iter())
    }

    /// Number of rules that own a pass slot
    pub(crate) fn slot_count(&self) -> usize {
        self.custom_rules.len() + self.commonmark_rules.len()
    }

    /// Find the appropriate rule for a node
    pub fn for_node<'a>(&'a self, node: &NodeRef<'_>, options: &TurndownOptions) -> &'a Rule {
        self.resolve(node, options).rule
    }

    pub(crate) fn resolve<'a>(&'a self, node: &NodeRef<'_>, options: &TurndownOptions) -> Resolved<'a> {
        if node.is_blank() {
            return Resolved {
                rule: &self.blank_rule,
                slot: None,
            };
        }

        if let Some((slot, rule)) = self
            .ordered()
            .enumerate()
            .find(|(_, rule)| rule.filter.matches(node, options))
        {
            return Resolved {
                rule,
                slot: Some(slot),
            };
        }

        let rule = find_rule(&self.keep_rules, node, options)
            .or_else(|| find_rule(&self.remove_rules, node, options))
            .unwrap_or(&self.default_rule);
        Resolved { rule, slot: None }
    }

    /// Visit every rule with an append hook, in precedence order, with its slot
    pub fn for_each_append<F>(&self, mut f: F)
    where
        F: FnMut(usize, &Rule, &AppendFn),
    {
        for (slot, rule) in self.ordered().enumerate() {
            if let Some(append) = &rule.append {
                f(slot, rule, append);
            }
        }
    }
}

impl Default for Rules {
    fn default() -> Self {
        Self::new()
    }
}

fn find_rule<'a>(rules: &'a [Rule], node: &NodeRef<'_>, options: &TurndownOptions) -> Option<&'a Rule> {
    rules.iter().find(|rule| rule.filter.matches(node, options))
}

fn blank_rule() -> Rule {
    Rule::new(Filter::predicate(|_, node, _| node.is_blank()), |node, _, _| {
        if node.is_block() {
            "\n\n".to_string()
        } else {
            String::new()
        }
    })
}

fn keep_rule(filter: Filter) -> Rule {
    Rule::new(filter, |node, _, _| {
        if node.is_block() {
            format!("\n\n{}\n\n", node.outer_html())
        } else {
            node.outer_html()
        }
    })
}

fn default_rule() -> Rule {
    Rule::new(Filter::predicate(|_, _, _| true), |node, content, _| {
        if node.is_block() {
            format!("\n\n{content}\n\n")
        } else {
            content.to_string()
        }
    })
}
