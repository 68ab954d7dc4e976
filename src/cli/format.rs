//! Pretty-print SOQL text

use super::CliError;
use crate::{FormatOptions, format_query};

/// Options for the format command
#[derive(Debug, Clone, Default)]
pub struct FormatCommandOptions {
    /// The SOQL query to format
    pub query: String,
    /// Tabs per indentation level
    pub indent: Option<usize>,
    /// Field list width before wrapping
    pub max_line_length: Option<usize>,
    /// Indent `AND`/`OR` lines of the `WHERE` clause
    pub indent_where_operators: bool,
}

impl FormatCommandOptions {
    fn format_options(&self) -> FormatOptions {
        let defaults = FormatOptions::default();
        FormatOptions {
            num_indent: self.indent.unwrap_or(defaults.num_indent),
            field_max_line_length: self
                .max_line_length
                .unwrap_or(defaults.field_max_line_length),
            where_clause_operators_indented: self.indent_where_operators,
            ..defaults
        }
    }
}

/// Parse the query and compose it again with formatting on
pub fn execute_format(options: &FormatCommandOptions) -> Result<String, CliError> {
    Ok(format_query(&options.query, options.format_options())?)
}
