//! Presentation hooks for composed SOQL.
//!
//! The composer assembles clause content and asks a [`Formatter`] for
//! everything that is only presentation: clause keywords with their leading
//! whitespace, separators between fields, subquery wrapping and the joining
//! of filter operators and sort keys.
//!
//! [`SoqlFormatter`] is the stock implementation. Disabled, it produces
//! single-line SOQL:
//!
//! ```text
//! SELECT Id, Name FROM Account WHERE Name = 'Acme' AND Amount > 100
//! ```
//!
//! Enabled, every clause starts a line and long field lists wrap:
//!
//! ```text
//! SELECT Id, Name,
//! 	(
//! 		SELECT Id
//! 		FROM Contacts
//! 	)
//! FROM Account
//! WHERE Name = 'Acme'
//! AND Amount > 100
//! ```

use crate::config::FormatOptions;

/// One composed entry of a field list, with the presentation text the
/// formatter puts around it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldItem {
    pub text: String,
    pub is_subquery: bool,
    pub prefix: String,
    pub suffix: String,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldData {
    pub fields: Vec<FieldItem>,
}

impl FieldData {
    pub fn new(texts: Vec<String>) -> Self {
        FieldData {
            fields: texts
                .into_iter()
                .map(|text| FieldItem {
                    is_subquery: text.starts_with('('),
                    text,
                    ..FieldItem::default()
                })
                .collect(),
        }
    }

    /// The field list as written into the query.
    pub fn render(&self) -> String {
        self.fields
            .iter()
            .map(|f| format!("{}{}{}", f.prefix, f.text, f.suffix))
            .collect()
    }
}

pub trait Formatter {
    /// Sets prefix and suffix of every field.
    fn format_fields(&self, field_data: &mut FieldData);

    /// Clause keyword with its leading whitespace, e.g. `" WHERE"`.
    fn format_clause(&self, clause: &str) -> String;

    /// Wraps composed subquery text in parentheses. `depth` is the
    /// indentation level of the subquery body.
    fn format_subquery(&self, query: &str, depth: usize, in_where_clause: bool) -> String;

    /// Joins a logical operator and the filter text to its right.
    fn format_where_operator(&self, operator: &str, right: &str) -> String;

    /// Joins the composed entries of an `ORDER BY` sequence.
    fn format_order_by_sequence(&self, order_by: &[String]) -> String;
}

pub struct SoqlFormatter {
    enabled: bool,
    options: FormatOptions,
}

impl SoqlFormatter {
    pub fn new(enabled: bool, options: FormatOptions) -> Self {
        SoqlFormatter { enabled, options }
    }

    /// Single-line output.
    pub fn compact() -> Self {
        SoqlFormatter::new(false, FormatOptions::default())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn indent(&self, level: usize) -> String {
        "\t".repeat(self.options.num_indent * level)
    }

    fn line_break(&self, level: usize) -> String {
        format!("\n{}", self.indent(level))
    }
}

impl Formatter for SoqlFormatter {
    fn format_fields(&self, field_data: &mut FieldData) {
        let count = field_data.fields.len();
        // The first line already holds "SELECT "
        let mut line_len = "SELECT ".len();
        let mut break_next = false;

        for i in 0..count {
            let suffix = if i + 1 == count { "" } else { ", " };
            field_data.fields[i].suffix = suffix.to_string();

            if !self.enabled {
                continue;
            }

            let width = field_data.fields[i].text.chars().count() + suffix.len();
            let is_subquery = field_data.fields[i].is_subquery;
            let wraps = is_subquery
                || (i > 0 && (break_next || line_len + width > self.options.field_max_line_length));

            if wraps {
                if i > 0 {
                    let prev = &mut field_data.fields[i - 1];
                    prev.suffix = prev.suffix.trim_end().to_string();
                }
                field_data.fields[i].prefix = self.line_break(1);
                line_len = width;
            } else {
                line_len += width;
            }
            // Nothing follows a subquery on its closing line
            break_next = is_subquery;
        }
    }

    fn format_clause(&self, clause: &str) -> String {
        if self.enabled {
            format!("\n{}", clause)
        } else {
            format!(" {}", clause)
        }
    }

    fn format_subquery(&self, query: &str, depth: usize, in_where_clause: bool) -> String {
        if !self.enabled {
            return format!("({})", query);
        }

        let body = query.replace('\n', &self.line_break(depth));
        if self.options.field_subquery_parens_on_own_line || in_where_clause {
            format!(
                "({}{}{})",
                self.line_break(depth),
                body,
                self.line_break(depth.saturating_sub(1))
            )
        } else {
            format!("({})", body)
        }
    }

    fn format_where_operator(&self, operator: &str, right: &str) -> String {
        if !self.enabled {
            return format!(" {} {}", operator, right);
        }

        let level = usize::from(self.options.where_clause_operators_indented);
        format!("{}{} {}", self.line_break(level), operator, right)
    }

    fn format_order_by_sequence(&self, order_by: &[String]) -> String {
        let inline = order_by.join(", ");
        if self.enabled && "ORDER BY ".len() + inline.chars().count() > self.options.field_max_line_length {
            order_by.join(&format!(",{}", self.line_break(1)))
        } else {
            inline
        }
    }
}
