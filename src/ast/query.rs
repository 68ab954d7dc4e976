use serde::{Deserialize, Serialize};

use crate::ast::{
    FieldType, ForClause, GroupByClause, OrderByClauses, UpdateClause, WhereClause,
    WithDataCategoryClause,
};

/// Complete SOQL query.
///
/// The same type describes top-level queries and subqueries; the two differ
/// only in their [`QuerySource`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Query {
    /// Selected fields, in output order
    pub fields: Vec<FieldType>,

    /// Object or relationship the query reads from
    #[serde(flatten)]
    pub source: QuerySource,

    #[serde(rename = "sObjectAlias", default, skip_serializing_if = "Option::is_none")]
    pub sobject_alias: Option<String>,

    #[serde(rename = "where", default, skip_serializing_if = "Option::is_none")]
    pub where_clause: Option<WhereClause>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_by: Option<GroupByClause>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by: Option<OrderByClauses>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub with_data_category: Option<WithDataCategoryClause>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub with_security_enforced: bool,

    #[serde(rename = "for", default, skip_serializing_if = "Option::is_none")]
    pub for_clause: Option<ForClause>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub update: Option<UpdateClause>,
}

/// Where a query reads its rows from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum QuerySource {
    /// Child relationship of a subquery, e.g. `Contacts` or `Account.Contacts`
    Relationship {
        #[serde(rename = "relationshipName")]
        relationship_name: String,
        #[serde(rename = "sObjectPrefix", default, skip_serializing_if = "Vec::is_empty")]
        sobject_prefix: Vec<String>,
    },
    /// Top-level object
    Object {
        #[serde(rename = "sObject")]
        sobject: String,
    },
}

impl Query {
    /// Top-level query over `sobject`.
    pub fn new(sobject: impl Into<String>, fields: Vec<FieldType>) -> Self {
        Query::with_source(
            QuerySource::Object {
                sobject: sobject.into(),
            },
            fields,
        )
    }

    /// Subquery over the child relationship `relationship_name`.
    pub fn subquery(relationship_name: impl Into<String>, fields: Vec<FieldType>) -> Self {
        Query::with_source(
            QuerySource::Relationship {
                relationship_name: relationship_name.into(),
                sobject_prefix: Vec::new(),
            },
            fields,
        )
    }

    pub fn with_source(source: QuerySource, fields: Vec<FieldType>) -> Self {
        Query {
            fields,
            source,
            sobject_alias: None,
            where_clause: None,
            group_by: None,
            order_by: None,
            limit: None,
            offset: None,
            with_data_category: None,
            with_security_enforced: false,
            for_clause: None,
            update: None,
        }
    }

    pub fn is_subquery(&self) -> bool {
        matches!(self.source, QuerySource::Relationship { .. })
    }
}
