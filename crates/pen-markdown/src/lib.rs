//! # pen-markdown
//!
//! Convert HTML to Markdown with a pluggable set of rules.
//!
//! This is the conversion engine behind the Pen editor's Markdown export,
//! modelled on [turndown](https://github.com/mixmark-io/turndown): every
//! element of the input is matched against an ordered list of rules, and the
//! matching rule turns the element's already-converted content into Markdown.
//!
//! ## Design
//!
//! The converter works on a small owned DOM ([`Node`]). Input can be:
//!
//! - **An HTML string**: parsed with `scraper` (feature `html`, on by default)
//! - **A node tree**: built by any parser or by hand, e.g. from a live editor
//!
//! Either way the tree is copied before conversion, so the caller's tree is
//! never modified.
//!
//! ## Example (Node-based)
//!
//! ```rust
//! use pen_markdown::{Node, TurndownService};
//!
//! let service = TurndownService::new();
//!
//! // The root is a container: its children are converted
//! let mut root = Node::document_fragment();
//! let mut h1 = Node::element("h1");
//! h1.add_child(Node::text("Hello World"));
//! root.add_child(h1);
//!
//! let markdown = service.turndown(&root).unwrap();
//! assert_eq!(markdown, "Hello World\n===========");
//! ```
//!
//! ## Example (HTML string)
//!
//! ```rust
//! use pen_markdown::{HeadingStyle, TurndownOptions, TurndownService};
//!
//! let service = TurndownService::with_options(TurndownOptions {
//!     heading_style: HeadingStyle::Atx,
//!     ..Default::default()
//! });
//! let markdown = service.turndown_html("<h1>Hello World</h1>").unwrap();
//! assert_eq!(markdown, "# Hello World");
//! ```

mod classify;
#[cfg(feature = "html")]
pub mod html;
pub mod node;
mod options;
mod process;
mod rules;
mod service;
mod utilities;
mod whitespace;

pub use classify::FlankingWhitespace;
#[cfg(feature = "html")]
pub use html::parse_html;
pub use node::{Node, NodeRef, NodeType};
pub use options::{CodeBlockStyle, HeadingStyle, LinkReferenceStyle, LinkStyle, TurndownOptions};
pub use rules::{AppendFn, Filter, PredicateFn, ReplacementFn, Rule, RuleContext, Rules};
pub use service::{Plugin, TurndownService};
pub use utilities::*;

/// Error type for turndown operations
#[derive(Debug, thiserror::Error)]
pub enum TurndownError {
    /// The input is not something the converter can walk.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A rule filter was registered with an unusable shape.
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// An option value could not be parsed.
    #[error("Invalid option: {0}")]
    InvalidOption(String),
}

pub type Result<T> = std::result::Result<T, TurndownError>;
