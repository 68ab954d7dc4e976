use serde::{Deserialize, Serialize};

use crate::ast::{Query, TypeOfBranch};

/// One entry of a `SELECT` field list.
///
/// The JSON form carries the variant name in a `type` property, e.g.
/// `{"type": "Field", "field": "Id"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FieldType {
    /// Plain field
    ///
    /// # Example
    /// ```text
    /// Name
    /// a.Name        // with object prefix `a`
    /// ```
    Field(Field),

    /// Function call, possibly nested
    ///
    /// # Examples
    /// ```text
    /// COUNT(Id) cnt
    /// FORMAT(MIN(CloseDate))
    /// ```
    #[serde(rename = "FieldFunctionExpression")]
    FunctionExpression(FieldFunctionExpression),

    /// Field reached through one or more relationships
    ///
    /// # Example
    /// ```text
    /// Account.Owner.Name
    /// ```
    #[serde(rename = "FieldRelationship")]
    Relationship(FieldRelationship),

    /// Parenthesized child query
    ///
    /// # Example
    /// ```text
    /// (SELECT Id FROM Contacts)
    /// ```
    #[serde(rename = "FieldSubquery")]
    Subquery(FieldSubquery),

    /// Polymorphic field resolution
    ///
    /// # Example
    /// ```text
    /// TYPEOF What WHEN Account THEN Phone ELSE Name END
    /// ```
    #[serde(rename = "FieldTypeof")]
    TypeOf(FieldTypeOf),
}

impl FieldType {
    /// JSON `type` tags of every variant.
    pub const TAGS: &'static [&'static str] = &[
        "Field",
        "FieldFunctionExpression",
        "FieldRelationship",
        "FieldSubquery",
        "FieldTypeof",
    ];

    pub fn field(name: impl Into<String>) -> Self {
        FieldType::Field(Field {
            field: name.into(),
            object_prefix: None,
            alias: None,
        })
    }

    /// Relationship field from a dotted path; a path without dots is a plain field.
    pub fn path(path: &str) -> Self {
        let mut segments: Vec<String> = path.split('.').map(str::to_string).collect();
        let field = segments.pop().unwrap_or_default();
        if segments.is_empty() {
            return FieldType::field(field);
        }
        FieldType::Relationship(FieldRelationship {
            field,
            relationships: segments,
            object_prefix: None,
            alias: None,
        })
    }

    pub fn function(
        name: impl Into<String>,
        parameters: Vec<FunctionParameter>,
        alias: Option<&str>,
    ) -> Self {
        FieldType::FunctionExpression(FieldFunctionExpression::new(name, parameters, alias))
    }

    pub fn subquery(subquery: Query) -> Self {
        FieldType::Subquery(FieldSubquery { subquery })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Field {
    pub field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldFunctionExpression {
    pub function_name: String,
    #[serde(default)]
    pub parameters: Vec<FunctionParameter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_aggregate_fn: bool,
    /// Source text as written, when the expression came from a parser
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<String>,
}

impl FieldFunctionExpression {
    pub fn new(
        name: impl Into<String>,
        parameters: Vec<FunctionParameter>,
        alias: Option<&str>,
    ) -> Self {
        let function_name = name.into();
        FieldFunctionExpression {
            is_aggregate_fn: is_aggregate_function(&function_name),
            function_name,
            parameters,
            alias: alias.map(str::to_string),
            raw_value: None,
        }
    }
}

/// Argument of a function expression: verbatim text (field name, quoted
/// string, number) or a nested field expression such as another call.
///
/// In JSON a literal is a bare string and a nested expression is a tagged
/// object, e.g. `{"type": "Field", "field": "Amount"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FunctionParameter {
    Literal(String),
    Field(Box<FieldType>),
}

impl From<&str> for FunctionParameter {
    fn from(text: &str) -> Self {
        FunctionParameter::Literal(text.to_string())
    }
}

impl From<FieldType> for FunctionParameter {
    fn from(field: FieldType) -> Self {
        FunctionParameter::Field(Box::new(field))
    }
}

impl From<FieldFunctionExpression> for FunctionParameter {
    fn from(function: FieldFunctionExpression) -> Self {
        FieldType::FunctionExpression(function).into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldRelationship {
    /// Leaf field name
    pub field: String,
    /// Relationship names traversed before the leaf, in order
    pub relationships: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSubquery {
    pub subquery: Query,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldTypeOf {
    /// Polymorphic reference field
    pub field: String,
    pub conditions: Vec<TypeOfCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeOfCondition {
    #[serde(rename = "type")]
    pub kind: TypeOfBranch,
    /// Object type matched by a `WHEN` branch; absent on `ELSE`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub object_type: Option<String>,
    pub field_list: Vec<String>,
}

/// Function expression used as a filter subject, group-by key or sort key.
///
/// Unlike [`FieldFunctionExpression`] the composer prefers the raw source
/// text here and only falls back to the structured form without it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionExp {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub function_name: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_aggregate_fn: bool,
}

impl FunctionExp {
    /// Function with the given name and verbatim parameters; the raw text is
    /// derived as `name(p1, p2)`.
    pub fn call(name: &str, parameters: &[&str]) -> Self {
        let parameters: Vec<String> = parameters.iter().map(|p| p.to_string()).collect();
        FunctionExp {
            raw_value: Some(format!("{}({})", name, parameters.join(", "))),
            function_name: Some(name.to_string()),
            is_aggregate_fn: is_aggregate_function(name),
            parameters,
            alias: None,
        }
    }
}

const AGGREGATE_FUNCTIONS: &[&str] = &[
    "AVG",
    "COUNT",
    "COUNT_DISTINCT",
    "MIN",
    "MAX",
    "SUM",
    "GROUPING",
];

/// Whether `name` is one of the SOQL aggregate functions.
pub fn is_aggregate_function(name: &str) -> bool {
    AGGREGATE_FUNCTIONS
        .iter()
        .any(|agg| agg.eq_ignore_ascii_case(name))
}
