//! Turns a [`Query`] AST back into SOQL text.
//!
//! Clauses are always written in SOQL order, whatever was set on the AST:
//!
//! ```text
//! SELECT … FROM … WHERE … GROUP BY … HAVING … ORDER BY … LIMIT … OFFSET …
//! WITH DATA CATEGORY … WITH SECURITY_ENFORCED FOR … UPDATE …
//! ```
//!
//! A clause is written iff the AST has it. Subqueries, in the field list or
//! as semi-join filter values, are composed by the same code recursively.
//!
//! # Examples
//!
//! ```
//! use soql_lang::ast::{FieldType, Query};
//! use soql_lang::{ComposeConfig, compose_query};
//!
//! let query = Query::new(
//!     "Account",
//!     vec![
//!         FieldType::field("Id"),
//!         FieldType::subquery(Query::subquery("Contacts", vec![FieldType::field("Id")])),
//!     ],
//! );
//! assert_eq!(
//!     compose_query(&query, &ComposeConfig::default()),
//!     "SELECT Id, (SELECT Id FROM Contacts) FROM Account"
//! );
//! ```

mod clauses;
mod fields;
mod filter;

use std::time::Instant;

use crate::ast::{Query, QuerySource};
use crate::config::{ComposeConfig, FormatOptions};
use crate::error::ComposeError;
use crate::formatter::{FieldData, Formatter, SoqlFormatter};
use crate::logging::{ComposeLogger, logger_for};
use crate::parser::parse_query;

/// Composes one query with its formatter and logger.
///
/// Built with `auto_compose` (the default) the text is available right
/// away from [`Composer::query`]; otherwise call [`Composer::start`].
pub struct Composer<'q> {
    soql: &'q Query,
    formatter: Box<dyn Formatter>,
    logger: Box<dyn ComposeLogger>,
    query: String,
}

impl<'q> Composer<'q> {
    pub fn new(soql: &'q Query, config: &ComposeConfig) -> Self {
        let formatter = SoqlFormatter::new(config.format, config.format_options.clone());
        let mut composer =
            Composer::with_collaborators(soql, Box::new(formatter), logger_for(config.logging));
        if config.auto_compose {
            composer.start();
        }
        composer
    }

    /// Composer with a caller-supplied formatter and logger. Nothing is
    /// composed until [`Composer::start`].
    pub fn with_collaborators(
        soql: &'q Query,
        formatter: Box<dyn Formatter>,
        logger: Box<dyn ComposeLogger>,
    ) -> Self {
        Composer {
            soql,
            formatter,
            logger,
            query: String::new(),
        }
    }

    /// Composes the query this composer was built for.
    pub fn start(&mut self) {
        let started = Instant::now();
        self.logger.compose_started(source_name(self.soql));
        self.query = self.compose_query(self.soql);
        self.logger.compose_finished(&self.query, started.elapsed());
    }

    /// Composed text; empty before the first [`Composer::start`].
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn into_query(self) -> String {
        self.query
    }

    /// Composes `query`, recursing into its subqueries.
    pub fn compose_query(&self, query: &Query) -> String {
        let mut field_data = FieldData::new(self.compose_fields(&query.fields));
        self.formatter.format_fields(&mut field_data);

        let mut output = format!("SELECT {}", field_data.render());
        self.append_clause(&mut output, "FROM", &compose_source(query));

        if let Some(where_clause) = &query.where_clause {
            self.append_clause(&mut output, "WHERE", &self.compose_where(where_clause));
        }

        if let Some(group_by) = &query.group_by {
            self.append_clause(&mut output, "GROUP BY", &self.compose_group_by(group_by));
            if let Some(having) = &group_by.having {
                self.append_clause(&mut output, "HAVING", &self.compose_having(having));
            }
        }

        if let Some(order_by) = &query.order_by {
            self.append_clause(&mut output, "ORDER BY", &self.compose_order_by(order_by));
        }

        if let Some(limit) = query.limit {
            self.append_clause(&mut output, "LIMIT", &limit.to_string());
        }

        if let Some(offset) = query.offset {
            self.append_clause(&mut output, "OFFSET", &offset.to_string());
        }

        if let Some(data_category) = &query.with_data_category {
            self.append_clause(
                &mut output,
                "WITH DATA CATEGORY",
                &self.compose_with_data_category(data_category),
            );
        }

        if query.with_security_enforced {
            self.append_clause(&mut output, "WITH SECURITY_ENFORCED", "");
        }

        if let Some(for_clause) = query.for_clause {
            self.append_clause(&mut output, "FOR", for_clause.as_str());
        }

        if let Some(update) = query.update {
            self.append_clause(&mut output, "UPDATE", update.as_str());
        }

        output
    }

    fn append_clause(&self, output: &mut String, clause: &str, content: &str) {
        output.push_str(&self.formatter.format_clause(clause));
        if !content.is_empty() {
            output.push(' ');
            output.push_str(content);
        }
        self.logger.clause_composed(clause, output);
    }
}

/// `FROM` target: the object, or the relationship path of a subquery,
/// followed by the alias if any.
fn compose_source(query: &Query) -> String {
    let mut source = match &query.source {
        QuerySource::Object { sobject } => sobject.clone(),
        QuerySource::Relationship {
            relationship_name,
            sobject_prefix,
        } => sobject_prefix
            .iter()
            .chain(std::iter::once(relationship_name))
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join("."),
    };
    if let Some(alias) = &query.sobject_alias {
        source.push(' ');
        source.push_str(alias);
    }
    source
}

fn source_name(query: &Query) -> &str {
    match &query.source {
        QuerySource::Object { sobject } => sobject,
        QuerySource::Relationship {
            relationship_name, ..
        } => relationship_name,
    }
}

/// Composes `query` with the given configuration.
pub fn compose_query(query: &Query, config: &ComposeConfig) -> String {
    let mut composer = Composer::new(query, config);
    if !config.auto_compose {
        composer.start();
    }
    composer.into_query()
}

/// Parses `soql` and composes it again with formatting enabled.
///
/// # Examples
///
/// ```
/// use soql_lang::{FormatOptions, format_query};
///
/// let formatted = format_query(
///     "SELECT Id FROM Account WHERE Name = 'Acme' AND Amount > 100",
///     FormatOptions::default(),
/// )
/// .unwrap();
/// assert_eq!(
///     formatted,
///     "SELECT Id\nFROM Account\nWHERE Name = 'Acme'\nAND Amount > 100"
/// );
/// ```
pub fn format_query(soql: &str, format_options: FormatOptions) -> Result<String, ComposeError> {
    let query = parse_query(soql)?;
    Ok(compose_query(&query, &ComposeConfig::formatted(format_options)))
}
