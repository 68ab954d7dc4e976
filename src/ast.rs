//! # SOQL - Abstract Syntax Tree
//!
//! This module defines the AST that the composer turns back into SOQL text
//! and that the parser produces from it.
//!
//! ## Architecture Overview
//!
//! The AST module is organized into focused submodules:
//!
//! - **[tokens]** - Lexical tokens produced by the lexer
//! - **[expressions]** - Entries of the `SELECT` list (fields, functions,
//!   relationship paths, subqueries, `TYPEOF`)
//! - **[operators]** - Keyword sets (comparison and logical operators, sort
//!   direction, `FOR`/`UPDATE` tokens, data category selectors)
//! - **[clauses]** - Filter trees and the `GROUP BY`, `ORDER BY` and
//!   `WITH DATA CATEGORY` clauses
//! - **[query]** - The query itself
//!
//! ## Quick Start
//!
//! ```text
//! SELECT Id, (SELECT Id FROM Contacts) FROM Account WHERE Name = 'Acme'
//! ```
//!
//! is a [`Query`] over `Account` with two [`FieldType`]s, the second a
//! subquery whose source is the `Contacts` relationship, and a
//! [`WhereClause`] holding one condition.
//!
//! ## Core Concepts
//!
//! ### Queries and Subqueries
//!
//! Subqueries are ordinary [`Query`] values. A subquery in the field list
//! reads from a child relationship ([`QuerySource::Relationship`]); a
//! subquery used as a filter value (semi-join) reads from an object.
//!
//! ### Filter Trees
//!
//! `WHERE` and `HAVING` are right-nested chains of conditions. Parentheses
//! are not tree structure: every condition carries how many `(` precede it
//! and how many `)` follow it, and these counts are written out verbatim.
//!
//! ```text
//! (Name = 'A' OR Name = 'B') AND Amount > 100
//! ```
//!
//! ### JSON Form
//!
//! Every type serializes to the camelCase JSON shape used by SOQL tooling,
//! with field expressions tagged by `type`:
//!
//! ```text
//! {"fields": [{"type": "Field", "field": "Id"}], "sObject": "Account"}
//! ```
pub mod tokens;
pub mod expressions;
pub mod operators;
pub mod clauses;
pub mod query;

pub use tokens::Token;
pub use expressions::{
    Field, FieldFunctionExpression, FieldRelationship, FieldSubquery, FieldType, FieldTypeOf,
    FunctionExp, FunctionParameter, TypeOfCondition, is_aggregate_function,
};
pub use operators::{
    DataCategorySelector, ForClause, LogicalOperator, LogicalPrefix, Nulls, Operator, Order,
    TypeOfBranch, UpdateClause,
};
pub use clauses::{
    Condition, DataCategoryCondition, GroupByClause, GroupByFields, HavingClause,
    HavingCondition, OrderByClause, OrderByClauses, WhereClause, WithDataCategoryClause,
};
pub use query::{Query, QuerySource};
