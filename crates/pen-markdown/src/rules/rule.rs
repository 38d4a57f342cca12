//! Rule and Filter types for HTML conversion.

use std::fmt;

use crate::node::NodeRef;
use crate::options::TurndownOptions;
use crate::{Result, TurndownError};

/// Replacement function: (node, converted content, context) -> Markdown
pub type ReplacementFn =
    Box<dyn Fn(&NodeRef<'_>, &str, &mut RuleContext<'_>) -> String + Send + Sync>;

/// End-of-pass hook: (lines deferred during the pass, options) -> Markdown
pub type AppendFn = Box<dyn Fn(&[String], &TurndownOptions) -> String + Send + Sync>;

/// Filter predicate: (lower-case tag, node, options) -> matches
pub type PredicateFn = Box<dyn Fn(&str, &NodeRef<'_>, &TurndownOptions) -> bool + Send + Sync>;

/// What a rule sees of the running conversion besides the node itself.
///
/// `defer` queues a line for the rule's [`append`](Rule::append) hook. The
/// queue lives in the conversion pass, so nothing carries over from one
/// conversion to the next.
pub struct RuleContext<'a> {
    options: &'a TurndownOptions,
    deferred: &'a mut Vec<String>,
}

impl<'a> RuleContext<'a> {
    pub(crate) fn new(options: &'a TurndownOptions, deferred: &'a mut Vec<String>) -> Self {
        Self { options, deferred }
    }

    /// The options of the running conversion
    pub fn options(&self) -> &TurndownOptions {
        self.options
    }

    /// Queue a line for this rule's end-of-pass hook
    pub fn defer(&mut self, line: impl Into<String>) {
        self.deferred.push(line.into());
    }

    /// Lines this rule has queued so far in the pass
    pub fn deferred(&self) -> &[String] {
        self.deferred.as_slice()
    }
}

/// A filter determines which elements a rule applies to
pub enum Filter {
    /// Match a single tag name
    TagName(String),
    /// Match any of multiple tag names
    TagNames(Vec<String>),
    /// Match using a predicate function
    Predicate(PredicateFn),
}

impl Filter {
    /// Create a filter for a single tag
    pub fn tag(name: &str) -> Self {
        Filter::TagName(name.to_lowercase())
    }

    /// Create a filter for multiple tags
    pub fn tags(names: &[&str]) -> Self {
        Filter::TagNames(names.iter().map(|s| s.to_lowercase()).collect())
    }

    /// Create a filter with a predicate
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str, &NodeRef<'_>, &TurndownOptions) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Reject filters that could never match a tag name.
    pub fn validate(&self) -> Result<()> {
        match self {
            Filter::TagName(name) => validate_tag_name(name),
            Filter::TagNames(names) if names.is_empty() => Err(TurndownError::InvalidFilter(
                "tag name list is empty".to_string(),
            )),
            Filter::TagNames(names) => names.iter().try_for_each(|name| validate_tag_name(name)),
            Filter::Predicate(_) => Ok(()),
        }
    }

    /// Check if this filter matches an element
    pub fn matches(&self, node: &NodeRef<'_>, options: &TurndownOptions) -> bool {
        let tag = node.tag_name();
        match self {
            Filter::TagName(t) => t.eq_ignore_ascii_case(tag),
            Filter::TagNames(tags) => tags.iter().any(|t| t.eq_ignore_ascii_case(tag)),
            Filter::Predicate(f) => f(&tag.to_lowercase(), node, options),
        }
    }
}

fn validate_tag_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':'));
    if valid {
        Ok(())
    } else {
        Err(TurndownError::InvalidFilter(format!(
            "`{name}` is not a tag name"
        )))
    }
}

impl From<&str> for Filter {
    fn from(name: &str) -> Self {
        Filter::tag(name)
    }
}

impl From<&[&str]> for Filter {
    fn from(names: &[&str]) -> Self {
        Filter::tags(names)
    }
}

impl<const N: usize> From<[&str; N]> for Filter {
    fn from(names: [&str; N]) -> Self {
        Filter::tags(&names)
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::TagName(name) => f.debug_tuple("TagName").field(name).finish(),
            Filter::TagNames(names) => f.debug_tuple("TagNames").field(names).finish(),
            Filter::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// A rule defines how to convert a matched HTML element to Markdown
pub struct Rule {
    /// Filter to determine which elements this rule applies to
    pub filter: Filter,
    /// Replacement function that generates Markdown
    pub replacement: ReplacementFn,
    /// Optional hook whose output is appended once the whole tree is converted
    pub append: Option<AppendFn>,
}

impl Rule {
    /// Create a new rule
    pub fn new<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&NodeRef<'_>, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self::with_context(
            filter,
            move |node: &NodeRef<'_>, content: &str, ctx: &mut RuleContext<'_>| {
                replacement(node, content, ctx.options())
            },
        )
    }

    /// Create a rule whose replacement can defer lines to the end of the pass
    pub fn with_context<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&NodeRef<'_>, &str, &mut RuleContext<'_>) -> String + Send + Sync + 'static,
    {
        Self {
            filter,
            replacement: Box::new(replacement),
            append: None,
        }
    }

    /// Create a rule that matches a single tag
    pub fn for_tag<F>(tag: &str, replacement: F) -> Self
    where
        F: Fn(&NodeRef<'_>, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tag(tag), replacement)
    }

    /// Create a rule that matches multiple tags
    pub fn for_tags<F>(tags: &[&str], replacement: F) -> Self
    where
        F: Fn(&NodeRef<'_>, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tags(tags), replacement)
    }

    /// Attach an end-of-pass hook that receives the lines deferred by this rule
    pub fn with_append<A>(mut self, append: A) -> Self
    where
        A: Fn(&[String], &TurndownOptions) -> String + Send + Sync + 'static,
    {
        self.append = Some(Box::new(append));
        self
    }

    /// Apply this rule's replacement
    pub fn replace(&self, node: &NodeRef<'_>, content: &str, ctx: &mut RuleContext<'_>) -> String {
        (self.replacement)(node, content, ctx)
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("filter", &self.filter)
            .field("append", &self.append.is_some())
            .finish()
    }
}
