//! TurndownService - the main entry point for HTML to Markdown conversion.

use crate::node::{Node, NodeRef, NodeType};
use crate::options::TurndownOptions;
use crate::process::Pass;
use crate::rules::{Filter, Rule, Rules};
use crate::whitespace::collapse_whitespace;
use crate::{Result, TurndownError};

/// A boxed plugin, for passing plugins of different types to
/// [`TurndownService::use_plugins`].
pub type Plugin = Box<dyn FnOnce(&mut TurndownService) -> Result<()>>;

/// The main service for converting HTML to Markdown
///
/// A service only holds configuration. Every conversion works on its own
/// copy of the tree and its own pass state, so one service can be shared
/// between threads.
pub struct TurndownService {
    options: TurndownOptions,
    rules: Rules,
}

impl TurndownService {
    /// Create a new TurndownService with default options
    pub fn new() -> Self {
        Self::with_options(TurndownOptions::default())
    }

    /// Create a TurndownService with custom options
    pub fn with_options(options: TurndownOptions) -> Self {
        Self {
            options,
            rules: Rules::new(),
        }
    }

    /// Convert a node tree to Markdown.
    ///
    /// The root must be an element, a document or a document fragment. Only
    /// its children are converted; the root's own tag is not.
    pub fn turndown(&self, root: &Node) -> Result<String> {
        match root.node_type {
            NodeType::Element | NodeType::Document | NodeType::DocumentFragment => Ok(self.run(root)),
            other => Err(TurndownError::InvalidInput(format!(
                "expected an element, document or document fragment, got {other:?} node `{}`",
                root.node_name
            ))),
        }
    }

    /// Convert an HTML string to Markdown
    #[cfg(feature = "html")]
    pub fn turndown_html(&self, html: &str) -> Result<String> {
        if html.is_empty() {
            return Ok(String::new());
        }
        Ok(self.run(&crate::html::parse_html(html)))
    }

    fn run(&self, root: &Node) -> String {
        tracing::debug!(root = %root.node_name, children = root.children.len(), "converting");

        let mut working = root.clone();
        collapse_whitespace(&mut working);

        let mut pass = Pass::new(&self.rules, &self.options);
        let output = pass.process(&NodeRef::new(&working));
        let output = pass.flush(output);
        let markdown = post_process(&output);

        tracing::debug!(
            len = markdown.len(),
            deferred = pass.deferred_count(),
            "converted"
        );
        markdown
    }

    /// Add a custom rule, ahead of every rule added before it
    pub fn add_rule(&mut self, key: &str, rule: Rule) -> Result<&mut Self> {
        self.rules.add(key, rule)?;
        Ok(self)
    }

    /// Keep elements matching the filter as HTML
    pub fn keep(&mut self, filter: impl Into<Filter>) -> Result<&mut Self> {
        self.rules.keep(filter.into())?;
        Ok(self)
    }

    /// Remove elements matching the filter
    pub fn remove(&mut self, filter: impl Into<Filter>) -> Result<&mut Self> {
        self.rules.remove(filter.into())?;
        Ok(self)
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        plugin(self)?;
        Ok(self)
    }

    /// Apply plugins in order, stopping at the first that fails
    pub fn use_plugins<I, F>(&mut self, plugins: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = F>,
        F: FnOnce(&mut Self) -> Result<()>,
    {
        for plugin in plugins {
            plugin(self)?;
        }
        Ok(self)
    }

    /// Escape markdown special characters in a string
    pub fn escape(&self, text: &str) -> String {
        crate::utilities::escape_markdown(text)
    }

    /// Get the current options
    pub fn options(&self) -> &TurndownOptions {
        &self.options
    }

    /// Get the rule registry
    pub fn rules(&self) -> &Rules {
        &self.rules
    }
}

impl Default for TurndownService {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim leading newlines and trailing whitespace.
///
/// Leading spaces are kept: they are the indentation of a code block that
/// opens the document. This matches turndown's own post-processing, which
/// only strips leading tabs and line breaks.
fn post_process(output: &str) -> String {
    output
        .trim_start_matches(|c: char| matches!(c, '\t' | '\r' | '\n'))
        .trim_end()
        .to_string()
}


#[cfg(all(test, feature = "html"))]
mod conversion_tests {
    use super::*;
    use crate::options::{CodeBlockStyle, HeadingStyle, LinkReferenceStyle, LinkStyle};
    use pretty_assertions::assert_eq;

    fn md(html: &str) -> String {
        TurndownService::new().turndown_html(html).unwrap()
    }

    fn md_with(options: TurndownOptions, html: &str) -> String {
        TurndownService::with_options(options).turndown_html(html).unwrap()
    }

    #[test]
    fn test_simple_paragraph() {
        assert_eq!(md("<p>Hello World</p>"), "Hello World");
    }

    #[test]
    fn test_paragraph_with_strong() {
        assert_eq!(md("<p>Hello <strong>world</strong></p>"), "Hello **world**");
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(md(""), "");
    }

    #[test]
    fn test_heading_setext() {
        assert_eq!(md("<h1>Title</h1>"), "Title\n=====");
        assert_eq!(md("<h2>Sub</h2>"), "Sub\n---");
        assert_eq!(md("<h3>Third</h3>"), "### Third");
    }

    #[test]
    fn test_heading_atx() {
        let options = TurndownOptions {
            heading_style: HeadingStyle::Atx,
            ..Default::default()
        };
        assert_eq!(md_with(options, "<h1>Title</h1>"), "# Title");
    }

    #[test]
    fn test_emphasis() {
        assert_eq!(md("<em>emphasized</em>"), "_emphasized_");
        assert_eq!(md("<i>also</i>"), "_also_");
    }

    #[test]
    fn test_strong() {
        assert_eq!(md("<strong>bold</strong>"), "**bold**");
        assert_eq!(md("<b>bold</b>"), "**bold**");
    }

    #[test]
    fn test_empty_emphasis_disappears() {
        assert_eq!(md("<p>a <em></em>b</p>"), "a b");
        assert_eq!(md("<p>a <strong> </strong></p>"), "a");
    }

    #[test]
    fn test_inline_link() {
        assert_eq!(
            md(r#"<a href="https://example.com">Link</a>"#),
            "[Link](https://example.com)"
        );
        assert_eq!(md(r#"<a href="/x" title="T">link</a>"#), r#"[link](/x "T")"#);
    }

    #[test]
    fn test_anchor_without_href_keeps_content() {
        assert_eq!(md("<a name=\"top\">Top</a>"), "Top");
    }

    #[test]
    fn test_reference_links_do_not_leak_between_conversions() {
        let service = TurndownService::with_options(TurndownOptions {
            link_style: LinkStyle::Referenced,
            ..Default::default()
        });

        let first = service
            .turndown_html(r#"<p><a href="/a">A</a> and <a href="/b" title="B!">B</a></p>"#)
            .unwrap();
        assert_eq!(first, "[A][1] and [B][2]\n\n[1]: /a\n[2]: /b \"B!\"");

        let second = service.turndown_html(r#"<p><a href="/c">C</a></p>"#).unwrap();
        assert_eq!(second, "[C][1]\n\n[1]: /c");
    }

    #[test]
    fn test_shortcut_reference_links() {
        let options = TurndownOptions {
            link_style: LinkStyle::Referenced,
            link_reference_style: LinkReferenceStyle::Shortcut,
            ..Default::default()
        };
        assert_eq!(
            md_with(options, r#"<a href="/docs">docs</a>"#),
            "[docs]\n\n[docs]: /docs"
        );
    }

    #[test]
    fn test_image() {
        assert_eq!(md(r#"<img src="test.png" alt="Alt">"#), "![Alt](test.png)");
        assert_eq!(md(r#"<img alt="nothing">"#), "");
    }

    #[test]
    fn test_inline_code() {
        assert_eq!(md("<code>code</code>"), "`code`");
        assert_eq!(md("<p>run <code>a_b *c*</code></p>"), "run `a_b *c*`");
    }

    #[test]
    fn test_horizontal_rule() {
        assert_eq!(md("<p>a</p><hr><p>b</p>"), "a\n\n* * *\n\nb");
    }

    #[test]
    fn test_line_break() {
        assert_eq!(md("<p>one<br>two</p>"), "one  \ntwo");
    }

    #[test]
    fn test_blockquote() {
        assert_eq!(md("<blockquote><p>a</p><p>b</p></blockquote>"), "> a\n> \n> b");
    }

    #[test]
    fn test_indented_code_block() {
        assert_eq!(md("<pre><code>function() {}</code></pre>"), "    function() {}");
    }

    #[test]
    fn test_fenced_code_block() {
        let options = TurndownOptions {
            code_block_style: CodeBlockStyle::Fenced,
            ..Default::default()
        };
        assert_eq!(
            md_with(options, r#"<pre><code class="language-js">x</code></pre>"#),
            "```js\nx\n```"
        );
    }

    #[test]
    fn test_editor_preset() {
        let html = "<h2>Notes</h2><pre><code>let a = 1;</code></pre>";
        assert_eq!(
            md_with(TurndownOptions::editor(), html),
            "## Notes\n\n```\nlet a = 1;\n```"
        );
    }

    #[test]
    fn test_unordered_list() {
        assert_eq!(md("<ul><li>One</li><li>Two</li></ul>"), "*   One\n*   Two");
    }

    #[test]
    fn test_ordered_list() {
        assert_eq!(md("<ol><li>One</li><li>Two</li></ol>"), "1.  One\n2.  Two");
        assert_eq!(
            md(r#"<ol start="3"><li>a</li><li>b</li></ol>"#),
            "3.  a\n4.  b"
        );
    }

    #[test]
    fn test_nested_list() {
        assert_eq!(
            md("<ul><li>One<ul><li>Sub</li></ul></li><li>Two</li></ul>"),
            "*   One\n    *   Sub\n*   Two"
        );
    }

    #[test]
    fn test_whitespace_collapses() {
        assert_eq!(md("<p>  Hello \n\n   World  </p>"), "Hello World");
        assert_eq!(md("<div>\n  <p>a</p>\n  <p>b</p>\n</div>"), "a\n\nb");
    }

    #[test]
    fn test_escaping() {
        assert_eq!(md("<p>*not* emphasis and 2*3</p>"), "\\*not\\* emphasis and 2*3");
        assert_eq!(md("<p># not a heading</p>"), "\\# not a heading");
        assert_eq!(md("<p>[brackets]</p>"), "\\[brackets\\]");
    }

    #[test]
    fn test_never_three_newlines() {
        let html = "<div><div><p>a</p></div><blockquote><div><p>b</p><ul><li><p>c</p></li></ul></div></blockquote><p></p><p>d</p></div>";
        let output = md(html);
        assert!(!output.contains("\n\n\n"), "{output:?}");
    }

    #[test]
    fn test_custom_rule_overrides_builtin() {
        let mut service = TurndownService::new();
        service
            .add_rule("strong", Rule::for_tags(&["strong", "b"], |_, c, _| format!("__{c}__")))
            .unwrap();
        assert_eq!(service.turndown_html("<p><b>x</b></p>").unwrap(), "__x__");
    }

    #[test]
    fn test_keep_and_remove() {
        let mut service = TurndownService::new();
        service.keep("del").unwrap().remove("script").unwrap();

        assert_eq!(
            service.turndown_html("<p>a <del>b</del></p>").unwrap(),
            "a <del>b</del>"
        );
        assert_eq!(
            service
                .turndown_html("<p>a</p><script>alert(1)</script>")
                .unwrap(),
            "a"
        );
    }

    #[test]
    fn test_plugin() {
        let mut service = TurndownService::new();
        service
            .use_plugin(|s| {
                s.add_rule(
                    "strikethrough",
                    Rule::for_tags(&["del", "s"], |_, c, _| format!("~~{c}~~")),
                )?;
                Ok(())
            })
            .unwrap();
        assert_eq!(service.turndown_html("<s>old</s>").unwrap(), "~~old~~");
    }

    #[test]
    fn test_comments_dropped() {
        assert_eq!(md("<p>a<!-- hidden -->b</p>"), "ab");
    }
}
