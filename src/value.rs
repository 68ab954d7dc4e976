//! Literal values of filter conditions and how they are written as SOQL.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

use crate::ast::operators::keyword_enum;

keyword_enum! {
    /// Semantic kind of a filter value, deciding how it is written out.
    LiteralType {
        String => "STRING",
        Integer => "INTEGER",
        Decimal => "DECIMAL",
        IntegerWithCurrencyPrefix => "INTEGER_WITH_CURRENCY_PREFIX",
        DecimalWithCurrencyPrefix => "DECIMAL_WITH_CURRENCY_PREFIX",
        Boolean => "BOOLEAN",
        Null => "NULL",
        Date => "DATE",
        DateTime => "DATETIME",
        /// Relative date keyword such as `TODAY` or `LAST_WEEK`
        DateLiteral => "DATE_LITERAL",
        /// Relative date with a count, such as `LAST_N_DAYS:5`
        DateNLiteral => "DATE_N_LITERAL",
        /// Apex bind variable, stored without its leading `:`
        ApexBindVariable => "APEX_BIND_VARIABLE",
    }
}

impl LiteralType {
    /// Writes one value as a query-text token.
    ///
    /// Strings are single-quoted unless they already are; bind variables get
    /// their `:`; every other kind is written verbatim.
    ///
    /// # Examples
    ///
    /// ```
    /// use soql_lang::value::LiteralType;
    ///
    /// assert_eq!(LiteralType::String.render("Acme"), "'Acme'");
    /// assert_eq!(LiteralType::DateNLiteral.render("LAST_N_DAYS:5"), "LAST_N_DAYS:5");
    /// assert_eq!(LiteralType::ApexBindVariable.render("ids"), ":ids");
    /// ```
    pub fn render(self, value: &str) -> String {
        match self {
            LiteralType::String if value.starts_with('\'') => value.to_string(),
            LiteralType::String => format!("'{}'", value),
            LiteralType::ApexBindVariable if value.starts_with(':') => value.to_string(),
            LiteralType::ApexBindVariable => format!(":{}", value),
            _ => value.to_string(),
        }
    }
}

/// Value side of a `WHERE` condition.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WhereValue {
    Single(String),
    /// Value list of `IN`, `NOT IN`, `INCLUDES` and `EXCLUDES`
    List(Vec<String>),
}

impl From<&str> for WhereValue {
    fn from(value: &str) -> Self {
        WhereValue::Single(value.to_string())
    }
}

impl From<Vec<&str>> for WhereValue {
    fn from(values: Vec<&str>) -> Self {
        WhereValue::List(values.into_iter().map(str::to_string).collect())
    }
}

// JSON producers write numbers and booleans as JSON scalars; they are kept as
// their text.
impl<'de> Deserialize<'de> for WhereValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(scalar_text)
                .collect::<Result<Vec<_>, _>>()
                .map(WhereValue::List)
                .map_err(D::Error::custom),
            other => scalar_text(other)
                .map(WhereValue::Single)
                .map_err(D::Error::custom),
        }
    }
}

/// Literal type of a single value, or one per list element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LiteralTypes {
    Single(LiteralType),
    PerValue(Vec<LiteralType>),
}

impl From<LiteralType> for LiteralTypes {
    fn from(literal_type: LiteralType) -> Self {
        LiteralTypes::Single(literal_type)
    }
}

impl From<Vec<LiteralType>> for LiteralTypes {
    fn from(literal_types: Vec<LiteralType>) -> Self {
        LiteralTypes::PerValue(literal_types)
    }
}

impl LiteralTypes {
    /// Literal type of the list element at `index`.
    fn at(&self, index: usize) -> Option<LiteralType> {
        match self {
            LiteralTypes::Single(literal_type) => Some(*literal_type),
            LiteralTypes::PerValue(types) => types.get(index).copied(),
        }
    }
}

/// Writes a `WHERE` value.
///
/// Without a literal type the text is written as given. Lists become a
/// parenthesized, comma-separated group with each element rendered by its
/// own literal type.
///
/// # Examples
///
/// ```
/// use soql_lang::value::{LiteralType, LiteralTypes, WhereValue, render_where_value};
///
/// let value = WhereValue::from(vec!["A", "B"]);
/// let types = LiteralTypes::Single(LiteralType::String);
/// assert_eq!(render_where_value(&value, Some(&types)), "('A', 'B')");
/// ```
pub fn render_where_value(value: &WhereValue, literal_type: Option<&LiteralTypes>) -> String {
    let render = |index: usize, text: &str| match literal_type.and_then(|lt| lt.at(index)) {
        Some(literal_type) => literal_type.render(text),
        None => text.to_string(),
    };

    match value {
        WhereValue::Single(text) => render(0, text),
        WhereValue::List(items) => {
            let items: Vec<String> = items
                .iter()
                .enumerate()
                .map(|(i, text)| render(i, text))
                .collect();
            format!("({})", items.join(", "))
        }
    }
}

fn scalar_text(value: serde_json::Value) -> Result<String, String> {
    match value {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Bool(b) => Ok(b.to_string()),
        serde_json::Value::Null => Ok("NULL".to_string()),
        other => Err(format!("expected a scalar value, found {}", other)),
    }
}

/// Deserializes a scalar JSON value (string, number, boolean) as its text.
pub(crate) fn deserialize_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    scalar_text(serde_json::Value::deserialize(deserializer)?).map_err(D::Error::custom)
}
