//! Parse SOQL text into query JSON

use super::CliError;
use crate::json::{to_json, to_json_pretty};
use crate::parse_query;

/// Options for the parse command
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// The SOQL query to parse
    pub query: String,
    /// Pretty-print the output
    pub pretty: bool,
}

pub fn execute_parse(options: &ParseOptions) -> Result<String, CliError> {
    let query = parse_query(&options.query)?;
    let json = if options.pretty {
        to_json_pretty(&query)?
    } else {
        to_json(&query)?
    };
    Ok(json)
}
