//! Utility functions and constants for HTML processing.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Block-level HTML elements
pub const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "audio", "blockquote", "body", "canvas",
    "center", "dd", "dir", "div", "dl", "dt", "fieldset", "figcaption",
    "figure", "footer", "form", "frameset", "h1", "h2", "h3", "h4", "h5",
    "h6", "header", "hgroup", "hr", "html", "isindex", "li", "main", "menu",
    "nav", "noframes", "noscript", "ol", "output", "p", "pre", "section",
    "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

/// Void (self-closing) HTML elements
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input",
    "keygen", "link", "meta", "param", "source", "track", "wbr",
];

/// Elements that are never blank, whatever their content
pub const MEANINGFUL_WHEN_BLANK: &[&str] = &["a", "th", "td"];

/// Check if a tag is a block-level element
pub fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Check if a tag is a void element
pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag.to_lowercase().as_str())
}

/// Check if a tag is meaningful when blank
pub fn is_meaningful_when_blank(tag: &str) -> bool {
    MEANINGFUL_WHEN_BLANK.contains(&tag.to_lowercase().as_str())
}

/// Repeat a string n times
pub fn repeat(s: &str, n: usize) -> String {
    s.repeat(n)
}

// `\w`, `\W` and `\d` below are spelled out as ASCII classes: Markdown only
// treats ASCII word characters as delimiter-run neighbours.
static BACKSLASH_ESCAPE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(\S)").expect("valid regex"));
static HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^(#{1,6} )").expect("valid regex"));
static HORIZONTAL_RULE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([-*_] *){3,}$").expect("valid regex"));
static ORDERED_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([^A-Za-z0-9_]* {0,3})([0-9]+)\. ").expect("valid regex"));
static UNORDERED_LIST: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([^\\A-Za-z0-9_]*)[*+-] ").expect("valid regex"));
static BLOCKQUOTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^([^A-Za-z0-9_]* {0,3})> ").expect("valid regex"));
static STAR_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*+[A-Za-z0-9_].*?\*+").expect("valid regex"));
static UNDERSCORE_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_+[A-Za-z0-9].*?_+").expect("valid regex"));
static BACKTICK_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`+[A-Za-z0-9_].*?`+").expect("valid regex"));
static LINK_BRACKET: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\[\]]").expect("valid regex"));

/// Escape Markdown syntax in literal text.
///
/// Only characters in a position where Markdown would read them as syntax
/// are escaped: a `*` inside `2*3` stays as it is, the ones in `*word*` do not.
/// Square brackets are always escaped.
pub fn escape_markdown(text: &str) -> String {
    let text = BACKSLASH_ESCAPE.replace_all(text, r"\\$1");
    let text = HEADING.replace_all(&text, r"\${1}");
    let text = HORIZONTAL_RULE.replace_all(&text, |caps: &Captures| {
        // Every repetition of the last captured marker gets escaped
        let marker = &caps[1];
        caps[0].replace(marker, &format!("\\{marker}"))
    });
    let text = ORDERED_LIST.replace_all(&text, r"${1}${2}\. ");
    let text = UNORDERED_LIST.replace_all(&text, |caps: &Captures| {
        escape_chars(&caps[0], &['*', '+', '-'])
    });
    let text = BLOCKQUOTE.replace_all(&text, r"${1}\> ");
    let text = STAR_SPAN.replace_all(&text, |caps: &Captures| escape_chars(&caps[0], &['*']));
    let text = UNDERSCORE_SPAN.replace_all(&text, |caps: &Captures| escape_chars(&caps[0], &['_']));
    let text = BACKTICK_SPAN.replace_all(&text, |caps: &Captures| escape_chars(&caps[0], &['`']));
    LINK_BRACKET.replace_all(&text, r"\$0").into_owned()
}

fn escape_chars(s: &str, targets: &[char]) -> String {
    let mut result = String::with_capacity(s.len() + 4);
    for c in s.chars() {
        if targets.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

/// Number of newlines at the start of `s`
pub(crate) fn leading_newlines(s: &str) -> usize {
    s.len() - s.trim_start_matches('\n').len()
}

/// Number of newlines at the end of `s`
pub(crate) fn trailing_newlines(s: &str) -> usize {
    s.len() - s.trim_end_matches('\n').len()
}
