//! Composer configuration.
//!
//! Both structs deserialize from camelCase JSON with every key optional:
//!
//! ```
//! use soql_lang::ComposeConfig;
//!
//! let config: ComposeConfig =
//!     serde_json::from_str(r#"{"format": true, "formatOptions": {"numIndent": 2}}"#).unwrap();
//! assert!(config.format);
//! assert!(config.auto_compose);
//! assert_eq!(config.format_options.num_indent, 2);
//! assert_eq!(config.format_options.field_max_line_length, 60);
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ComposeConfig {
    /// Apply line breaks and indentation
    pub format: bool,
    /// Presentation settings, only read when `format` is set
    pub format_options: FormatOptions,
    /// Compose as soon as a [`Composer`](crate::Composer) is built
    pub auto_compose: bool,
    /// Report every composed clause to the diagnostic logger
    pub logging: bool,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        ComposeConfig {
            format: false,
            format_options: FormatOptions::default(),
            auto_compose: true,
            logging: false,
        }
    }
}

impl ComposeConfig {
    /// Configuration for formatted output with the given options.
    pub fn formatted(format_options: FormatOptions) -> Self {
        ComposeConfig {
            format: true,
            format_options,
            ..ComposeConfig::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormatOptions {
    /// Tabs per indentation level
    pub num_indent: usize,
    /// Field list length after which the next field starts a new line
    pub field_max_line_length: usize,
    /// Put the parentheses of a field subquery on their own lines
    pub field_subquery_parens_on_own_line: bool,
    /// Indent `AND`/`OR` lines of a filter one level
    pub where_clause_operators_indented: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            num_indent: 1,
            field_max_line_length: 60,
            field_subquery_parens_on_own_line: true,
            where_clause_operators_indented: false,
        }
    }
}
