//! CLI error types.

use pen_markdown::TurndownError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Turndown(#[from] TurndownError),
}
