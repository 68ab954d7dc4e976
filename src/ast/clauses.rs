use serde::{Deserialize, Serialize};

use crate::ast::{
    DataCategorySelector, FunctionExp, LogicalOperator, LogicalPrefix, Nulls, Operator, Order,
    Query,
};
use crate::value::{LiteralTypes, WhereValue, deserialize_text};

fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// Filter tree of a `WHERE` clause.
///
/// The tree is a right-nested chain: each node holds one condition and,
/// optionally, the operator and the rest of the chain. Grouping lives only
/// in the paren counts of the conditions.
///
/// # Example
/// ```text
/// (Name = 'A' OR Name = 'B') AND Amount > 100
/// ```
/// is three nodes: `(Name = 'A'` OR, `Name = 'B')` AND, `Amount > 100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhereClause {
    /// Condition of this node; absent on a `NOT` node that negates the
    /// group starting in `right`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<Condition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<LogicalOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<WhereClause>>,
}

impl WhereClause {
    pub fn new(left: Condition) -> Self {
        WhereClause {
            left: Some(left),
            operator: None,
            right: None,
        }
    }

    /// Joins `right` after this node. Chains are built back to front.
    pub fn join(mut self, operator: LogicalOperator, right: WhereClause) -> Self {
        self.operator = Some(operator);
        self.right = Some(Box::new(right));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub open_paren: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub close_paren: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logical_prefix: Option<LogicalPrefix>,
    /// Field or relationship path; ignored when `function` is set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(rename = "fn", default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionExp>,
    pub operator: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<WhereValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub literal_type: Option<LiteralTypes>,
    /// Semi-join subquery used instead of `value`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_query: Option<Box<Query>>,
}

impl Condition {
    pub fn new(field: &str, operator: Operator, value: WhereValue) -> Self {
        Condition {
            open_paren: 0,
            close_paren: 0,
            logical_prefix: None,
            field: Some(field.to_string()),
            function: None,
            operator,
            value: Some(value),
            literal_type: None,
            value_query: None,
        }
    }

    pub fn with_literal_type(mut self, literal_type: impl Into<LiteralTypes>) -> Self {
        self.literal_type = Some(literal_type.into());
        self
    }

    pub fn with_parens(mut self, open: u32, close: u32) -> Self {
        self.open_paren = open;
        self.close_paren = close;
        self
    }

    /// Semi-join condition, e.g. `Id IN (SELECT AccountId FROM Contact)`.
    pub fn semi_join(field: &str, operator: Operator, query: Query) -> Self {
        Condition {
            value: None,
            value_query: Some(Box::new(query)),
            ..Condition::new(field, operator, WhereValue::Single(String::new()))
        }
    }
}

/// Filter tree of a `HAVING` clause; same shape as [`WhereClause`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HavingClause {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<HavingCondition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<LogicalOperator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<HavingClause>>,
}

impl HavingClause {
    pub fn new(left: HavingCondition) -> Self {
        HavingClause {
            left: Some(left),
            operator: None,
            right: None,
        }
    }

    pub fn join(mut self, operator: LogicalOperator, right: HavingClause) -> Self {
        self.operator = Some(operator);
        self.right = Some(Box::new(right));
        self
    }
}

/// `HAVING` condition. The value is written out exactly as stored, quotes
/// included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HavingCondition {
    #[serde(default, skip_serializing_if = "is_zero")]
    pub open_paren: u32,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub close_paren: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(rename = "fn", default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionExp>,
    pub operator: Operator,
    #[serde(deserialize_with = "deserialize_text")]
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupByClause {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<GroupByFields>,
    #[serde(rename = "fn", default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionExp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub having: Option<HavingClause>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupByFields {
    Single(String),
    Multiple(Vec<String>),
}

impl GroupByFields {
    /// Field names in order; a single field becomes a one-element list.
    pub fn names(&self) -> Vec<&str> {
        match self {
            GroupByFields::Single(name) => vec![name.as_str()],
            GroupByFields::Multiple(names) => names.iter().map(String::as_str).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderByClause {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(rename = "fn", default, skip_serializing_if = "Option::is_none")]
    pub function: Option<FunctionExp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order: Option<Order>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nulls: Option<Nulls>,
}

impl OrderByClause {
    pub fn field(name: &str) -> Self {
        OrderByClause {
            field: Some(name.to_string()),
            ..OrderByClause::default()
        }
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    pub fn with_nulls(mut self, nulls: Nulls) -> Self {
        self.nulls = Some(nulls);
        self
    }
}

/// `ORDER BY` content: one clause, or a sequence rendered through the
/// formatter's sequence hook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderByClauses {
    Single(OrderByClause),
    Multiple(Vec<OrderByClause>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WithDataCategoryClause {
    pub conditions: Vec<DataCategoryCondition>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataCategoryCondition {
    pub group_name: String,
    pub selector: DataCategorySelector,
    pub parameters: Vec<String>,
}
