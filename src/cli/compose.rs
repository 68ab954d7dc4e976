//! Compose query JSON into SOQL text

use super::CliError;
use crate::json::query_from_str;
use crate::{ComposeConfig, compose_query};

/// Options for the compose command
#[derive(Debug, Clone, Default)]
pub struct ComposeOptions {
    /// Query AST as JSON
    pub input: Option<String>,
    /// Apply line breaks and indentation
    pub format: bool,
    /// Report composed clauses through `tracing`
    pub logging: bool,
}

pub fn execute_compose(options: &ComposeOptions) -> Result<String, CliError> {
    let json = options.input.as_ref().ok_or(CliError::NoInput)?;
    let query = query_from_str(json)?;

    let config = ComposeConfig {
        format: options.format,
        logging: options.logging,
        ..ComposeConfig::default()
    };
    Ok(compose_query(&query, &config))
}
