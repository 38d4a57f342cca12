//! CommonMark rules for HTML to Markdown conversion.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{Filter, Rule, RuleContext};
use crate::node::{Node, NodeRef};
use crate::options::{CodeBlockStyle, HeadingStyle, LinkReferenceStyle, LinkStyle, TurndownOptions};
use crate::utilities::repeat;

static LANGUAGE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"language-(\S+)").expect("valid regex"));

/// Create all CommonMark rules
pub fn commonmark_rules() -> Vec<Rule> {
    vec![
        paragraph_rule(),
        line_break_rule(),
        heading_rule(),
        blockquote_rule(),
        list_rule(),
        list_item_rule(),
        indented_code_block_rule(),
        fenced_code_block_rule(),
        horizontal_rule(),
        inline_link_rule(),
        reference_link_rule(),
        emphasis_rule(),
        strong_rule(),
        code_rule(),
        image_rule(),
    ]
}

fn paragraph_rule() -> Rule {
    Rule::for_tag("p", |_, content, _| format!("\n\n{content}\n\n"))
}

fn line_break_rule() -> Rule {
    Rule::for_tag("br", |_, _, options| format!("{}\n", options.br))
}

fn heading_rule() -> Rule {
    Rule::for_tags(&["h1", "h2", "h3", "h4", "h5", "h6"], |node, content, options| {
        let level: usize = node.tag_name()[1..].parse().unwrap_or(1);

        match options.heading_style {
            HeadingStyle::Setext if level < 3 => {
                let underline = if level == 1 { "=" } else { "-" };
                format!(
                    "\n\n{}\n{}\n\n",
                    content,
                    repeat(underline, content.chars().count())
                )
            }
            _ => format!("\n\n{} {}\n\n", repeat("#", level), content),
        }
    })
}

fn blockquote_rule() -> Rule {
    Rule::for_tag("blockquote", |_, content, _| {
        let quoted: Vec<String> = content
            .trim_matches('\n')
            .split('\n')
            .map(|line| format!("> {line}"))
            .collect();
        format!("\n\n{}\n\n", quoted.join("\n"))
    })
}

fn list_rule() -> Rule {
    Rule::for_tags(&["ul", "ol"], |node, content, _| {
        // A list closing an item continues that item
        let ends_item = node.parent_tag() == Some("li") && node.is_last_element_child();

        if ends_item {
            format!("\n{content}")
        } else {
            format!("\n\n{content}\n\n")
        }
    })
}

fn list_item_rule() -> Rule {
    Rule::for_tag("li", |node, content, options| {
        let content = content.trim_start_matches('\n');
        let content = match content.strip_suffix('\n') {
            Some(_) => format!("{}\n", content.trim_end_matches('\n')),
            None => content.to_string(),
        };
        let content = content.replace('\n', "\n    ");

        let prefix = match node.parent() {
            Some(parent) if parent.tag_name() == "ol" => {
                let index = node.element_index() as i64;
                let number = parent
                    .attr("start")
                    .and_then(|start| start.trim().parse::<i64>().ok())
                    .map(|start| start + index)
                    .unwrap_or(index + 1);
                format!("{number}.  ")
            }
            _ => format!("{}   ", options.bullet_list_marker),
        };

        let separator = if node.next_sibling().is_some() && !content.ends_with('\n') {
            "\n"
        } else {
            ""
        };

        format!("{prefix}{content}{separator}")
    })
}

/// The `<code>` child that makes a `<pre>` a code block
fn code_block_child<'a>(node: &NodeRef<'a>) -> Option<&'a Node> {
    if node.tag_name() != "pre" {
        return None;
    }
    node.children()
        .next()
        .filter(|first| first.is_element() && first.tag_name() == "code")
}

fn indented_code_block_rule() -> Rule {
    Rule::new(
        Filter::predicate(|_, node, options| {
            options.code_block_style == CodeBlockStyle::Indented
                && code_block_child(node).is_some()
        }),
        |node, _, _| {
            let code = code_block_child(node)
                .map(Node::text_content)
                .unwrap_or_default();

            format!("\n\n    {}\n\n", code.replace('\n', "\n    "))
        },
    )
}

fn fenced_code_block_rule() -> Rule {
    Rule::new(
        Filter::predicate(|_, node, options| {
            options.code_block_style == CodeBlockStyle::Fenced && code_block_child(node).is_some()
        }),
        |node, _, options| {
            let Some(code) = code_block_child(node) else {
                return String::new();
            };

            let class = code.attr("class").unwrap_or("");
            let language = LANGUAGE_CLASS
                .captures(class)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
                .unwrap_or("");

            format!(
                "\n\n{fence}{language}\n{}\n{fence}\n\n",
                code.text_content(),
                fence = options.fence,
            )
        },
    )
}

fn horizontal_rule() -> Rule {
    Rule::for_tag("hr", |_, _, options| format!("\n\n{}\n\n", options.hr))
}

/// `href` of an anchor that links somewhere
fn link_href<'a>(node: &NodeRef<'a>) -> Option<&'a str> {
    if node.tag_name() != "a" {
        return None;
    }
    node.attr("href").filter(|href| !href.is_empty())
}

/// ` "title"` when the node has a non-empty title
fn title_part(node: &NodeRef<'_>) -> String {
    node.attr("title")
        .filter(|title| !title.is_empty())
        .map(|title| format!(" \"{title}\""))
        .unwrap_or_default()
}

fn inline_link_rule() -> Rule {
    Rule::new(
        Filter::predicate(|_, node, options| {
            options.link_style == LinkStyle::Inlined && link_href(node).is_some()
        }),
        |node, content, _| {
            let href = link_href(node).unwrap_or_default();
            format!("[{content}]({href}{})", title_part(node))
        },
    )
}

fn reference_link_rule() -> Rule {
    Rule::with_context(
        Filter::predicate(|_, node, options| {
            options.link_style == LinkStyle::Referenced && link_href(node).is_some()
        }),
        |node: &NodeRef<'_>, content: &str, ctx: &mut RuleContext<'_>| {
            let href = link_href(node).unwrap_or_default();
            let title = title_part(node);

            let (replacement, reference) = match ctx.options().link_reference_style {
                LinkReferenceStyle::Collapsed => (
                    format!("[{content}][]"),
                    format!("[{content}]: {href}{title}"),
                ),
                LinkReferenceStyle::Shortcut => (
                    format!("[{content}]"),
                    format!("[{content}]: {href}{title}"),
                ),
                LinkReferenceStyle::Full => {
                    let id = ctx.deferred().len() + 1;
                    (
                        format!("[{content}][{id}]"),
                        format!("[{id}]: {href}{title}"),
                    )
                }
            };

            ctx.defer(reference);
            replacement
        },
    )
    .with_append(append_references)
}

fn append_references(references: &[String], _: &TurndownOptions) -> String {
    if references.is_empty() {
        return String::new();
    }
    format!("\n\n{}\n\n", references.join("\n"))
}

fn emphasis_rule() -> Rule {
    Rule::for_tags(&["em", "i"], |_, content, options| {
        if content.trim().is_empty() {
            return String::new();
        }
        let delimiter = &options.em_delimiter;
        format!("{delimiter}{content}{delimiter}")
    })
}

fn strong_rule() -> Rule {
    Rule::for_tags(&["strong", "b"], |_, content, options| {
        if content.trim().is_empty() {
            return String::new();
        }
        let delimiter = &options.strong_delimiter;
        format!("{delimiter}{content}{delimiter}")
    })
}

fn code_rule() -> Rule {
    Rule::new(
        Filter::predicate(|tag, node, _| {
            // A <code> that is the only child of a <pre> belongs to the code block rules
            let has_siblings = node.previous_sibling().is_some() || node.next_sibling().is_some();
            let is_code_block = node.parent_tag() == Some("pre") && !has_siblings;
            tag == "code" && !is_code_block
        }),
        |_, content, _| {
            if content.trim().is_empty() {
                return String::new();
            }

            let runs = backtick_runs(content);
            let mut delimiter = "`".to_string();
            let (mut leading, mut trailing) = ("", "");
            if !runs.is_empty() {
                if content.starts_with('`') {
                    leading = " ";
                }
                if content.ends_with('`') {
                    trailing = " ";
                }
                while runs.contains(&delimiter.len()) {
                    delimiter.push('`');
                }
            }

            format!("{delimiter}{leading}{content}{trailing}{delimiter}")
        },
    )
}

/// Lengths of every run of backticks in `s`
fn backtick_runs(s: &str) -> Vec<usize> {
    s.split(|c: char| c != '`')
        .filter(|run| !run.is_empty())
        .map(str::len)
        .collect()
}

fn image_rule() -> Rule {
    Rule::for_tag("img", |node, _, _| {
        let alt = node.attr("alt").unwrap_or("");
        let src = node.attr("src").unwrap_or("");
        if src.is_empty() {
            return String::new();
        }

        format!("![{alt}]({src}{})", title_part(node))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    /// Run a single rule against the first child of `parent`
    fn apply(rule: &Rule, parent: &Node, content: &str, options: &TurndownOptions) -> String {
        let parent_ref = NodeRef::new(parent);
        let node = NodeRef::child_of(&parent_ref, 0).unwrap();
        let mut deferred = Vec::new();
        let mut ctx = RuleContext::new(options, &mut deferred);
        assert!(rule.filter.matches(&node, options), "filter did not match");
        rule.replace(&node, content, &mut ctx)
    }

    fn wrap(node: Node) -> Node {
        Node::document_fragment().with_child(node)
    }

    #[test]
    fn test_heading_styles() {
        let h2 = wrap(Node::element("h2"));
        let setext = TurndownOptions::default();
        let atx = TurndownOptions {
            heading_style: HeadingStyle::Atx,
            ..Default::default()
        };

        assert_eq!(apply(&heading_rule(), &h2, "Über", &setext), "\n\nÜber\n----\n\n");
        assert_eq!(apply(&heading_rule(), &h2, "Sub", &atx), "\n\n## Sub\n\n");

        let h4 = wrap(Node::element("h4"));
        assert_eq!(apply(&heading_rule(), &h4, "Deep", &setext), "\n\n#### Deep\n\n");
    }

    #[test]
    fn test_blockquote_prefixes_every_line() {
        let quote = wrap(Node::element("blockquote"));
        let result = apply(&blockquote_rule(), &quote, "\n\none\n\ntwo\n\n", &TurndownOptions::default());
        assert_eq!(result, "\n\n> one\n> \n> two\n\n");
    }

    #[test]
    fn test_list_item_numbering() {
        let ol = Node::element_with_attrs("ol", vec![("start", "3")])
            .with_child(Node::element("li"))
            .with_child(Node::element("li"));
        let ol_ref = NodeRef::new(&ol);
        let options = TurndownOptions::default();
        let rule = list_item_rule();
        let mut deferred = Vec::new();
        let mut ctx = RuleContext::new(&options, &mut deferred);

        let first = NodeRef::child_of(&ol_ref, 0).unwrap();
        let second = NodeRef::child_of(&ol_ref, 1).unwrap();
        assert_eq!(rule.replace(&first, "one", &mut ctx), "3.  one\n");
        assert_eq!(rule.replace(&second, "two", &mut ctx), "4.  two");
    }

    #[test]
    fn test_list_item_indents_continuation() {
        let ul = Node::element("ul").with_child(Node::element("li"));
        let result = apply(&list_item_rule(), &ul, "\n\npara\n\nmore\n\n", &TurndownOptions::default());
        assert_eq!(result, "*   para\n    \n    more\n    ");
    }

    #[test]
    fn test_nested_list_continues_item() {
        let li = Node::element("li")
            .with_child(Node::text("a"))
            .with_child(Node::element("ul"));
        let li_ref = NodeRef::new(&li);
        let ul = NodeRef::child_of(&li_ref, 1).unwrap();
        let options = TurndownOptions::default();

        let mut deferred = Vec::new();
        let mut ctx = RuleContext::new(&options, &mut deferred);
        assert_eq!(list_rule().replace(&ul, "*   b\n", &mut ctx), "\n*   b\n");
    }

    #[test]
    fn test_fenced_code_block_language() {
        let pre = wrap(
            Node::element("pre").with_child(
                Node::element_with_attrs("code", vec![("class", "hljs language-rust")])
                    .with_child(Node::text("fn main() {}")),
            ),
        );
        let options = TurndownOptions {
            code_block_style: CodeBlockStyle::Fenced,
            ..Default::default()
        };
        assert_eq!(
            apply(&fenced_code_block_rule(), &pre, "", &options),
            "\n\n```rust\nfn main() {}\n```\n\n"
        );
    }

    #[test]
    fn test_indented_code_block() {
        let pre = wrap(
            Node::element("pre").with_child(Node::element("code").with_child(Node::text("a\nb"))),
        );
        assert_eq!(
            apply(&indented_code_block_rule(), &pre, "", &TurndownOptions::default()),
            "\n\n    a\n    b\n\n"
        );
    }

    #[test]
    fn test_code_delimiters() {
        let p = wrap(Node::element("code"));
        let options = TurndownOptions::default();
        assert_eq!(apply(&code_rule(), &p, "x", &options), "`x`");
        assert_eq!(apply(&code_rule(), &p, "a`b", &options), "``a`b``");
        assert_eq!(apply(&code_rule(), &p, "`tick`", &options), "`` `tick` ``");
        assert_eq!(apply(&code_rule(), &p, "a``b`c", &options), "```a``b`c```");
        assert_eq!(apply(&code_rule(), &p, "  ", &options), "");
    }

    #[test]
    fn test_reference_link_styles() {
        let a = wrap(
            Node::element_with_attrs("a", vec![("href", "/x"), ("title", "T")]),
        );
        let a_ref = NodeRef::new(&a);
        let node = NodeRef::child_of(&a_ref, 0).unwrap();
        let rule = reference_link_rule();

        for (style, replacement, reference) in [
            (LinkReferenceStyle::Full, "[x][1]", "[1]: /x \"T\""),
            (LinkReferenceStyle::Collapsed, "[x][]", "[x]: /x \"T\""),
            (LinkReferenceStyle::Shortcut, "[x]", "[x]: /x \"T\""),
        ] {
            let options = TurndownOptions {
                link_style: LinkStyle::Referenced,
                link_reference_style: style,
                ..Default::default()
            };
            let mut deferred = Vec::new();
            let mut ctx = RuleContext::new(&options, &mut deferred);
            assert_eq!(rule.replace(&node, "x", &mut ctx), replacement);
            assert_eq!(deferred, vec![reference.to_string()]);
        }
    }

    #[test]
    fn test_append_references() {
        let options = TurndownOptions::default();
        assert_eq!(append_references(&[], &options), "");
        assert_eq!(
            append_references(&["[1]: /a".to_string(), "[2]: /b".to_string()], &options),
            "\n\n[1]: /a\n[2]: /b\n\n"
        );
    }

    #[test]
    fn test_image() {
        let options = TurndownOptions::default();
        let img = wrap(Node::element_with_attrs("img", vec![("src", "a.png"), ("alt", "A"), ("title", "T")]));
        assert_eq!(apply(&image_rule(), &img, "", &options), "![A](a.png \"T\")");

        let no_src = wrap(Node::element_with_attrs("img", vec![("alt", "A")]));
        assert_eq!(apply(&image_rule(), &no_src, "", &options), "");
    }
}
