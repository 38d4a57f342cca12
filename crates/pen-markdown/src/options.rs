//! Configuration options for a conversion.

use std::str::FromStr;

use crate::TurndownError;

/// Heading style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// Use setext-style headings (underlined with = or -)
    /// Only works for h1 and h2, falls back to ATX for h3-h6
    #[default]
    Setext,
    /// Use ATX-style headings (prefixed with #)
    Atx,
}

/// Code block style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeBlockStyle {
    /// Use indented code blocks (4 spaces)
    #[default]
    Indented,
    /// Use fenced code blocks (```)
    Fenced,
}

/// Link style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStyle {
    /// Use inline links [text](url)
    #[default]
    Inlined,
    /// Use reference links [text][ref]
    Referenced,
}

/// Reference style for referenced links
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkReferenceStyle {
    /// Full reference: [text][1]
    #[default]
    Full,
    /// Collapsed reference: [text][]
    Collapsed,
    /// Shortcut reference: [text]
    Shortcut,
}

impl FromStr for HeadingStyle {
    type Err = TurndownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "setext" => Ok(HeadingStyle::Setext),
            "atx" => Ok(HeadingStyle::Atx),
            other => Err(invalid("heading style", other)),
        }
    }
}

impl FromStr for CodeBlockStyle {
    type Err = TurndownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "indented" => Ok(CodeBlockStyle::Indented),
            "fenced" => Ok(CodeBlockStyle::Fenced),
            other => Err(invalid("code block style", other)),
        }
    }
}

impl FromStr for LinkStyle {
    type Err = TurndownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "inlined" => Ok(LinkStyle::Inlined),
            "referenced" => Ok(LinkStyle::Referenced),
            other => Err(invalid("link style", other)),
        }
    }
}

impl FromStr for LinkReferenceStyle {
    type Err = TurndownError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "full" => Ok(LinkReferenceStyle::Full),
            "collapsed" => Ok(LinkReferenceStyle::Collapsed),
            "shortcut" => Ok(LinkReferenceStyle::Shortcut),
            other => Err(invalid("link reference style", other)),
        }
    }
}

fn invalid(what: &str, value: &str) -> TurndownError {
    TurndownError::InvalidOption(format!("unknown {what} `{value}`"))
}

/// Options for a [`TurndownService`](crate::TurndownService).
///
/// Build one by overlaying the fields you care about onto the defaults:
///
/// ```rust
/// use pen_markdown::{CodeBlockStyle, TurndownOptions};
///
/// let options = TurndownOptions {
///     code_block_style: CodeBlockStyle::Fenced,
///     fence: "~~~".to_string(),
///     ..Default::default()
/// };
/// assert_eq!(options.hr, "* * *");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurndownOptions {
    /// Heading style (setext or atx)
    pub heading_style: HeadingStyle,

    /// Horizontal rule string
    pub hr: String,

    /// Bullet list marker
    pub bullet_list_marker: char,

    /// Code block style
    pub code_block_style: CodeBlockStyle,

    /// Fence string for fenced code blocks
    pub fence: String,

    /// Emphasis delimiter
    pub em_delimiter: String,

    /// Strong delimiter
    pub strong_delimiter: String,

    /// Link style
    pub link_style: LinkStyle,

    /// Reference style for referenced links
    pub link_reference_style: LinkReferenceStyle,

    /// Text written before the newline of a `<br>`
    pub br: String,
}

impl TurndownOptions {
    /// The options the editor's "export as Markdown" action uses:
    /// fenced code blocks and ATX headings.
    pub fn editor() -> Self {
        Self {
            heading_style: HeadingStyle::Atx,
            code_block_style: CodeBlockStyle::Fenced,
            ..Default::default()
        }
    }
}

impl Default for TurndownOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Setext,
            hr: "* * *".to_string(),
            bullet_list_marker: '*',
            code_block_style: CodeBlockStyle::Indented,
            fence: "```".to_string(),
            em_delimiter: "_".to_string(),
            strong_delimiter: "**".to_string(),
            link_style: LinkStyle::Inlined,
            link_reference_style: LinkReferenceStyle::Full,
            br: "  ".to_string(),
        }
    }
}
