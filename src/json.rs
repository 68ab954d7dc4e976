//! JSON form of the query AST.
//!
//! Queries built by other SOQL tooling arrive as camelCase JSON. This module
//! is the boundary where that JSON becomes a [`Query`], and where a query is
//! written back out.
//!
//! # Features
//!
//! - **Decoding** via [`query_from_str()`] and [`query_from_value()`]
//! - **Field type check** - a field expression with an unknown `type` tag is
//!   reported as [`ComposeError::UnsupportedFieldExpression`], also inside
//!   subqueries, function parameters and semi-join filter values
//! - **Encoding** via [`to_json()`] and [`to_json_pretty()`]
//!
//! # Examples
//!
//! ```
//! use soql_lang::{ComposeConfig, compose_query};
//! use soql_lang::json::query_from_str;
//!
//! let query = query_from_str(
//!     r#"{"fields": [{"type": "Field", "field": "Id"}], "sObject": "Account", "limit": 5}"#,
//! )
//! .unwrap();
//! assert_eq!(
//!     compose_query(&query, &ComposeConfig::default()),
//!     "SELECT Id FROM Account LIMIT 5"
//! );
//! ```

use serde_json::Value;
use tracing::debug;

use crate::ast::{FieldType, Query};
use crate::error::ComposeError;

pub fn query_from_str(json: &str) -> Result<Query, ComposeError> {
    let value: Value = serde_json::from_str(json)?;
    query_from_value(value)
}

pub fn query_from_value(value: Value) -> Result<Query, ComposeError> {
    check_field_types(&value)?;
    Ok(serde_json::from_value(value)?)
}

pub fn to_json(query: &Query) -> Result<String, ComposeError> {
    Ok(serde_json::to_string(query)?)
}

pub fn to_json_pretty(query: &Query) -> Result<String, ComposeError> {
    Ok(serde_json::to_string_pretty(query)?)
}

/// Rejects field expressions tagged with anything but a [`FieldType`] tag.
///
/// Shape errors (missing keys, wrong value types) are left to serde.
fn check_field_types(query: &Value) -> Result<(), ComposeError> {
    let fields = query.get("fields").and_then(Value::as_array);
    for field in fields.into_iter().flatten() {
        check_field(field)?;
    }

    let mut node = query.get("where");
    while let Some(current) = node {
        if let Some(value_query) = current.get("left").and_then(|left| left.get("valueQuery")) {
            check_field_types(value_query)?;
        }
        node = current.get("right");
    }
    Ok(())
}

/// Checks one field expression, then the subquery or function parameters
/// nested inside it. Literal parameters are plain strings and are skipped.
fn check_field(field: &Value) -> Result<(), ComposeError> {
    let Some(tag) = field.get("type").and_then(Value::as_str) else {
        return Ok(());
    };
    if !FieldType::TAGS.contains(&tag) {
        debug!(target: "soql::json", tag, "Unsupported field expression");
        return Err(ComposeError::UnsupportedFieldExpression {
            tag: tag.to_string(),
        });
    }
    if let Some(subquery) = field.get("subquery") {
        check_field_types(subquery)?;
    }
    let parameters = field.get("parameters").and_then(Value::as_array);
    for parameter in parameters.into_iter().flatten() {
        check_field(parameter)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_tag_in_semi_join() {
        let value = json!({
            "fields": [{"type": "Field", "field": "Id"}],
            "sObject": "Account",
            "where": {
                "left": {"field": "Name", "operator": "=", "value": "A", "literalType": "STRING"},
                "operator": "AND",
                "right": {
                    "left": {
                        "field": "Id",
                        "operator": "IN",
                        "valueQuery": {
                            "fields": [{"type": "FieldMagic", "field": "AccountId"}],
                            "sObject": "Contact"
                        }
                    }
                }
            }
        });
        match query_from_value(value) {
            Err(ComposeError::UnsupportedFieldExpression { tag }) => assert_eq!(tag, "FieldMagic"),
            other => panic!("expected unsupported field expression, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_tag_in_nested_parameter() {
        let value = json!({
            "fields": [{
                "type": "FieldFunctionExpression",
                "functionName": "FORMAT",
                "parameters": [{
                    "type": "FieldFunctionExpression",
                    "functionName": "MIN",
                    "parameters": [{"type": "FieldMagic", "field": "CloseDate"}]
                }]
            }],
            "sObject": "Opportunity"
        });
        match query_from_value(value) {
            Err(ComposeError::UnsupportedFieldExpression { tag }) => assert_eq!(tag, "FieldMagic"),
            other => panic!("expected unsupported field expression, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_type_is_a_json_error() {
        let value = json!({"fields": [{"field": "Id"}], "sObject": "Account"});
        assert!(matches!(query_from_value(value), Err(ComposeError::Json(_))));
    }
}
