//! CLI support for soql-lang
//!
//! Each subcommand of the `soql` binary is a plain function over an options
//! struct, so other tools can run them without going through argument
//! parsing.

mod compose;
mod format;
mod parse;

pub use compose::{ComposeOptions, execute_compose};
pub use format::{FormatCommandOptions, execute_format};
pub use parse::{ParseOptions, execute_parse};

use std::io;

use thiserror::Error;

use crate::error::{ComposeError, ParseError};

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Compose(#[from] ComposeError),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("No input provided. Use --input or pipe query JSON to stdin.")]
    NoInput,
}

impl From<ParseError> for CliError {
    fn from(e: ParseError) -> Self {
        CliError::Compose(ComposeError::Parse(e))
    }
}
