//! pen-markdown CLI - convert HTML to Markdown.
//!
//! Reads HTML from a file or stdin and writes Markdown to a file or stdout.
//! Every conversion option can be set with a flag; flags overlay the
//! defaults, or the editor preset with `--editor`.

mod error;

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use clap::Parser;
use pen_markdown::{TurndownError, TurndownOptions, TurndownService};
use tracing_subscriber::EnvFilter;

use error::CliError;

/// Convert HTML to Markdown.
#[derive(Parser)]
#[command(name = "pen-markdown", version, about)]
struct Cli {
    /// Input HTML file (default: stdin, also `-`).
    input: Option<PathBuf>,

    /// Output file (default: stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Start from the editor preset (ATX headings, fenced code blocks).
    #[arg(long)]
    editor: bool,

    /// Heading style: setext or atx.
    #[arg(long)]
    heading_style: Option<String>,

    /// Horizontal rule string.
    #[arg(long)]
    hr: Option<String>,

    /// Bullet list marker: a single character.
    #[arg(long)]
    bullet_list_marker: Option<String>,

    /// Code block style: indented or fenced.
    #[arg(long)]
    code_block_style: Option<String>,

    /// Fence for fenced code blocks.
    #[arg(long)]
    fence: Option<String>,

    /// Emphasis delimiter.
    #[arg(long)]
    em_delimiter: Option<String>,

    /// Strong delimiter.
    #[arg(long)]
    strong_delimiter: Option<String>,

    /// Link style: inlined or referenced.
    #[arg(long)]
    link_style: Option<String>,

    /// Reference style for referenced links: full, collapsed or shortcut.
    #[arg(long)]
    link_reference_style: Option<String>,

    /// Text written before the newline of a line break.
    #[arg(long)]
    br: Option<String>,

    /// Keep elements with this tag as HTML (repeatable).
    #[arg(long = "keep", value_name = "TAG")]
    keep: Vec<String>,

    /// Drop elements with this tag and their content (repeatable).
    #[arg(long = "remove", value_name = "TAG")]
    remove: Vec<String>,

    /// Enable debug logging on stderr.
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Overlay the option flags onto the defaults or the editor preset.
    fn options(&self) -> Result<TurndownOptions, TurndownError> {
        let mut options = if self.editor {
            TurndownOptions::editor()
        } else {
            TurndownOptions::default()
        };

        if let Some(style) = &self.heading_style {
            options.heading_style = style.parse()?;
        }
        if let Some(hr) = &self.hr {
            options.hr = hr.clone();
        }
        if let Some(marker) = &self.bullet_list_marker {
            options.bullet_list_marker = single_char(marker)?;
        }
        if let Some(style) = &self.code_block_style {
            options.code_block_style = style.parse()?;
        }
        if let Some(fence) = &self.fence {
            options.fence = fence.clone();
        }
        if let Some(delimiter) = &self.em_delimiter {
            options.em_delimiter = delimiter.clone();
        }
        if let Some(delimiter) = &self.strong_delimiter {
            options.strong_delimiter = delimiter.clone();
        }
        if let Some(style) = &self.link_style {
            options.link_style = style.parse()?;
        }
        if let Some(style) = &self.link_reference_style {
            options.link_reference_style = style.parse()?;
        }
        if let Some(br) = &self.br {
            options.br = br.clone();
        }

        Ok(options)
    }

    fn execute(self) -> Result<(), CliError> {
        let mut service = TurndownService::with_options(self.options()?);
        for tag in &self.keep {
            service.keep(tag.as_str())?;
        }
        for tag in &self.remove {
            service.remove(tag.as_str())?;
        }

        let html = read_input(self.input.as_deref())?;
        let markdown = service.turndown_html(&html)?;
        write_output(self.output.as_deref(), &markdown)?;
        Ok(())
    }
}

fn single_char(value: &str) -> Result<char, TurndownError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(TurndownError::InvalidOption(format!(
            "bullet list marker `{value}` must be a single character"
        ))),
    }
}

fn read_input(path: Option<&Path>) -> io::Result<String> {
    match path {
        Some(path) if path != Path::new("-") => fs::read_to_string(path),
        _ => {
            let mut html = String::new();
            io::stdin().read_to_string(&mut html)?;
            Ok(html)
        }
    }
}

fn write_output(path: Option<&Path>, markdown: &str) -> io::Result<()> {
    let mut text = markdown.to_string();
    if !text.is_empty() {
        text.push('\n');
    }

    match path {
        Some(path) => fs::write(path, text),
        None => io::stdout().write_all(text.as_bytes()),
    }
}

fn main() {
    let cli = Cli::parse();

    // --verbose enables DEBUG level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    if let Err(err) = cli.execute() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}
