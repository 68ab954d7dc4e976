// tests/composer_tests.rs

use std::cell::RefCell;
use std::rc::Rc;

use soql_lang::ast::{
    Condition, DataCategoryCondition, DataCategorySelector, Field, FieldFunctionExpression,
    FieldType, FieldTypeOf, ForClause, FunctionExp, GroupByClause, GroupByFields, HavingClause,
    HavingCondition, LogicalOperator, LogicalPrefix, Nulls, Operator, Order, OrderByClause,
    OrderByClauses, Query, QuerySource, TypeOfBranch, TypeOfCondition, UpdateClause, WhereClause,
    WithDataCategoryClause,
};
use soql_lang::value::LiteralType;
use soql_lang::{
    ComposeConfig, ComposeLogger, Composer, FieldData, FormatOptions, Formatter, NoopLogger,
    SoqlFormatter, compose_query,
};

fn compose(query: &Query) -> String {
    compose_query(query, &ComposeConfig::default())
}

fn compose_formatted(query: &Query) -> String {
    compose_query(query, &ComposeConfig::formatted(FormatOptions::default()))
}

fn account(fields: &[&str]) -> Query {
    Query::new("Account", fields.iter().map(|f| FieldType::path(f)).collect())
}

fn string_eq(field: &str, value: &str) -> Condition {
    Condition::new(field, Operator::Equal, value.into()).with_literal_type(LiteralType::String)
}

fn int_cmp(field: &str, operator: Operator, value: &str) -> Condition {
    Condition::new(field, operator, value.into()).with_literal_type(LiteralType::Integer)
}

fn having(function: &str, params: &[&str], operator: Operator, value: &str) -> HavingCondition {
    HavingCondition {
        open_paren: 0,
        close_paren: 0,
        field: None,
        function: Some(FunctionExp::call(function, params)),
        operator,
        value: value.to_string(),
    }
}

// ============================================================================
// Basic queries
// ============================================================================

#[test]
fn test_minimal_query() {
    assert_eq!(compose(&account(&["Id"])), "SELECT Id FROM Account");
}

#[test]
fn test_string_value_is_quoted() {
    let mut query = account(&["Id"]);
    query.where_clause = Some(WhereClause::new(string_eq("Name", "Acme")));
    assert_eq!(compose(&query), "SELECT Id FROM Account WHERE Name = 'Acme'");
}

#[test]
fn test_child_subquery() {
    let query = Query::new(
        "Account",
        vec![
            FieldType::field("Id"),
            FieldType::subquery(Query::subquery("Contacts", vec![FieldType::field("Id")])),
        ],
    );
    assert_eq!(
        compose(&query),
        "SELECT Id, (SELECT Id FROM Contacts) FROM Account"
    );
}

#[test]
fn test_paren_counts_are_written_verbatim() {
    let mut query = account(&["Id"]);
    query.where_clause = Some(WhereClause::new(
        int_cmp("Amount", Operator::GreaterThan, "100").with_parens(1, 1),
    ));
    assert_eq!(compose(&query), "SELECT Id FROM Account WHERE (Amount > 100)");
}

// ============================================================================
// Clause order and omission
// ============================================================================

#[test]
fn test_clauses_follow_fixed_order() {
    let mut query = account(&["Type"]);
    // Assigned back to front on purpose
    query.update = Some(UpdateClause::Tracking);
    query.for_clause = Some(ForClause::View);
    query.with_security_enforced = true;
    query.with_data_category = Some(WithDataCategoryClause {
        conditions: vec![DataCategoryCondition {
            group_name: "Geography__c".to_string(),
            selector: DataCategorySelector::At,
            parameters: vec!["usa__c".to_string()],
        }],
    });
    query.offset = Some(5);
    query.limit = Some(10);
    query.order_by = Some(OrderByClauses::Single(OrderByClause::field("Type")));
    query.group_by = Some(GroupByClause {
        field: Some(GroupByFields::Single("Type".to_string())),
        function: None,
        having: Some(HavingClause::new(having(
            "COUNT",
            &["Id"],
            Operator::GreaterThan,
            "1",
        ))),
    });
    query.where_clause = Some(WhereClause::new(
        Condition::new("IsDeleted", Operator::Equal, "false".into())
            .with_literal_type(LiteralType::Boolean),
    ));

    assert_eq!(
        compose(&query),
        "SELECT Type FROM Account WHERE IsDeleted = false GROUP BY Type \
         HAVING COUNT(Id) > 1 ORDER BY Type LIMIT 10 OFFSET 5 \
         WITH DATA CATEGORY Geography__c AT usa__c WITH SECURITY_ENFORCED \
         FOR VIEW UPDATE TRACKING"
    );
}

#[test]
fn test_absent_clauses_are_omitted() {
    let mut query = account(&["Id"]);
    query.order_by = Some(OrderByClauses::Single(
        OrderByClause::field("Name")
            .with_order(Order::Desc)
            .with_nulls(Nulls::Last),
    ));
    assert_eq!(
        compose(&query),
        "SELECT Id FROM Account ORDER BY Name DESC NULLS LAST"
    );
}

#[test]
fn test_zero_limit_is_written() {
    let mut query = account(&["Id"]);
    query.limit = Some(0);
    assert_eq!(compose(&query), "SELECT Id FROM Account LIMIT 0");
}

// ============================================================================
// Field expressions
// ============================================================================

#[test]
fn test_field_variants_keep_order() {
    let mut query = Query::new(
        "Contact",
        vec![
            FieldType::path("Account.Owner.Name"),
            FieldType::Field(Field {
                field: "Email".to_string(),
                object_prefix: Some("c".to_string()),
                alias: None,
            }),
            FieldType::function(
                "FORMAT",
                vec![FieldFunctionExpression::new("MIN", vec!["CloseDate".into()], None).into()],
                Some("closeDate"),
            ),
        ],
    );
    query.sobject_alias = Some("c".to_string());

    assert_eq!(
        compose(&query),
        "SELECT Account.Owner.Name, c.Email, FORMAT(MIN(CloseDate)) closeDate FROM Contact c"
    );
}

#[test]
fn test_function_parameters_are_joined_without_spaces() {
    let query = Query::new(
        "Account",
        vec![FieldType::function(
            "DISTANCE",
            vec![
                "Location__c".into(),
                FieldFunctionExpression::new("GEOLOCATION", vec!["1".into(), "2".into()], None)
                    .into(),
                "'mi'".into(),
            ],
            None,
        )],
    );
    assert_eq!(
        compose(&query),
        "SELECT DISTANCE(Location__c,GEOLOCATION(1,2),'mi') FROM Account"
    );
}

#[test]
fn test_field_expressions_as_parameters() {
    let mut amount = FieldType::field("Amount");
    if let FieldType::Field(field) = &mut amount {
        field.object_prefix = Some("o".to_string());
    }
    let query = Query::new(
        "Opportunity",
        vec![
            FieldType::function("FORMAT", vec![amount.into()], Some("amt")),
            FieldType::function("COUNT_DISTINCT", vec![FieldType::path("Account.Name").into()], None),
        ],
    );
    assert_eq!(
        compose(&query),
        "SELECT FORMAT(o.Amount) amt, COUNT_DISTINCT(Account.Name) FROM Opportunity"
    );
}

#[test]
fn test_typeof() {
    let branch = |kind, object_type: Option<&str>, fields: &[&str]| TypeOfCondition {
        kind,
        object_type: object_type.map(str::to_string),
        field_list: fields.iter().map(|f| f.to_string()).collect(),
    };
    let query = Query::new(
        "Event",
        vec![FieldType::TypeOf(FieldTypeOf {
            field: "What".to_string(),
            conditions: vec![
                branch(TypeOfBranch::When, Some("Account"), &["Phone", "NumberOfEmployees"]),
                branch(TypeOfBranch::When, Some("Opportunity"), &["Amount", "CloseDate"]),
                branch(TypeOfBranch::Else, None, &["Name", "Email"]),
            ],
        })],
    );
    assert_eq!(
        compose(&query),
        "SELECT TYPEOF What WHEN Account THEN Phone, NumberOfEmployees \
         WHEN Opportunity THEN Amount, CloseDate ELSE Name, Email END FROM Event"
    );
}

#[test]
fn test_subquery_with_clauses_and_prefix() {
    let mut contacts = Query::with_source(
        QuerySource::Relationship {
            relationship_name: "Contacts".to_string(),
            sobject_prefix: vec!["Account".to_string()],
        },
        vec![FieldType::field("Id"), FieldType::field("Name")],
    );
    contacts.where_clause = Some(WhereClause::new(string_eq("LastName", "Smith")));
    contacts.limit = Some(5);

    let query = Query::new(
        "Account",
        vec![FieldType::field("Id"), FieldType::subquery(contacts)],
    );
    assert_eq!(
        compose(&query),
        "SELECT Id, (SELECT Id, Name FROM Account.Contacts WHERE LastName = 'Smith' LIMIT 5) FROM Account"
    );
}

// ============================================================================
// WHERE
// ============================================================================

#[test]
fn test_grouped_conditions() {
    let mut query = account(&["Id"]);
    query.where_clause = Some(
        WhereClause::new(string_eq("Name", "A").with_parens(1, 0)).join(
            LogicalOperator::Or,
            WhereClause::new(string_eq("Name", "B").with_parens(0, 1)).join(
                LogicalOperator::And,
                WhereClause::new(int_cmp("Amount", Operator::GreaterThan, "100")),
            ),
        ),
    );
    assert_eq!(
        compose(&query),
        "SELECT Id FROM Account WHERE (Name = 'A' OR Name = 'B') AND Amount > 100"
    );
}

#[test]
fn test_not_prefix() {
    let mut condition = Condition::new("Name", Operator::Like, "Acme%".into())
        .with_literal_type(LiteralType::String);
    condition.logical_prefix = Some(LogicalPrefix::Not);

    let mut query = account(&["Id"]);
    query.where_clause = Some(WhereClause::new(condition));
    assert_eq!(
        compose(&query),
        "SELECT Id FROM Account WHERE NOT Name LIKE 'Acme%'"
    );
}

#[test]
fn test_negated_group() {
    let group = WhereClause::new(int_cmp("A", Operator::Equal, "1").with_parens(1, 0)).join(
        LogicalOperator::Or,
        WhereClause::new(int_cmp("B", Operator::Equal, "2").with_parens(0, 1)),
    );
    let negated = WhereClause {
        left: None,
        operator: Some(LogicalOperator::Not),
        right: Some(Box::new(group)),
    };

    let mut query = account(&["Id"]);
    query.where_clause = Some(
        WhereClause::new(
            Condition::new("IsWon", Operator::Equal, "true".into())
                .with_literal_type(LiteralType::Boolean),
        )
        .join(LogicalOperator::And, negated),
    );
    assert_eq!(
        compose(&query),
        "SELECT Id FROM Account WHERE IsWon = true AND NOT (A = 1 OR B = 2)"
    );
}

#[test]
fn test_value_rendering() {
    let mut query = account(&["Id"]);
    query.where_clause = Some(
        WhereClause::new(
            Condition::new("Industry", Operator::NotIn, vec!["Energy", "Media"].into())
                .with_literal_type(LiteralType::String),
        )
        .join(
            LogicalOperator::And,
            WhereClause::new(
                Condition::new("Id", Operator::In, "ids".into())
                    .with_literal_type(LiteralType::ApexBindVariable),
            )
            .join(
                LogicalOperator::And,
                WhereClause::new(Condition::new("CreatedDate", Operator::Equal, "TODAY".into())),
            ),
        ),
    );
    assert_eq!(
        compose(&query),
        "SELECT Id FROM Account WHERE Industry NOT IN ('Energy', 'Media') \
         AND Id IN :ids AND CreatedDate = TODAY"
    );
}

#[test]
fn test_function_subject() {
    let condition = Condition {
        field: None,
        function: Some(FunctionExp::call("CALENDAR_YEAR", &["CreatedDate"])),
        ..int_cmp("", Operator::Equal, "2020")
    };
    let mut query = Query::new("Opportunity", vec![FieldType::field("Id")]);
    query.where_clause = Some(WhereClause::new(condition));
    assert_eq!(
        compose(&query),
        "SELECT Id FROM Opportunity WHERE CALENDAR_YEAR(CreatedDate) = 2020"
    );
}

#[test]
fn test_semi_join() {
    let mut query = account(&["Id"]);
    query.where_clause = Some(WhereClause::new(Condition::semi_join(
        "Id",
        Operator::In,
        Query::new("Contact", vec![FieldType::field("AccountId")]),
    )));
    assert_eq!(
        compose(&query),
        "SELECT Id FROM Account WHERE Id IN (SELECT AccountId FROM Contact)"
    );
    assert_eq!(
        compose_formatted(&query),
        "SELECT Id\nFROM Account\nWHERE Id IN (\n\tSELECT AccountId\n\tFROM Contact\n)"
    );
}

// ============================================================================
// GROUP BY, HAVING, ORDER BY, WITH DATA CATEGORY
// ============================================================================

#[test]
fn test_group_by_fields_and_having() {
    let mut query = Query::new(
        "Lead",
        vec![FieldType::field("LeadSource"), FieldType::field("Rating")],
    );
    query.group_by = Some(GroupByClause {
        field: Some(GroupByFields::Multiple(vec![
            "LeadSource".to_string(),
            "Rating".to_string(),
        ])),
        function: None,
        having: Some(
            HavingClause::new(having("COUNT", &["Name"], Operator::GreaterThan, "100")).join(
                LogicalOperator::And,
                HavingClause::new(HavingCondition {
                    field: Some("LeadSource".to_string()),
                    function: None,
                    ..having("", &[], Operator::Equal, "'Web'")
                }),
            ),
        ),
    });
    assert_eq!(
        compose(&query),
        "SELECT LeadSource, Rating FROM Lead GROUP BY LeadSource, Rating \
         HAVING COUNT(Name) > 100 AND LeadSource = 'Web'"
    );
}

#[test]
fn test_having_values_are_written_verbatim() {
    let mut query = Query::new("Lead", vec![FieldType::field("LeadSource")]);
    query.group_by = Some(GroupByClause {
        field: Some(GroupByFields::Single("LeadSource".to_string())),
        function: None,
        having: Some(HavingClause::new(HavingCondition {
            field: Some("LeadSource".to_string()),
            function: None,
            ..having("", &[], Operator::Equal, "Web")
        })),
    });
    assert_eq!(
        compose(&query),
        "SELECT LeadSource FROM Lead GROUP BY LeadSource HAVING LeadSource = Web"
    );
}

#[test]
fn test_group_by_function() {
    let mut query = account(&["Type"]);
    query.group_by = Some(GroupByClause {
        function: Some(FunctionExp {
            function_name: Some("CUBE".to_string()),
            parameters: vec!["Type".to_string(), "BillingCountry".to_string()],
            ..FunctionExp::default()
        }),
        ..GroupByClause::default()
    });
    assert_eq!(
        compose(&query),
        "SELECT Type FROM Account GROUP BY CUBE(Type, BillingCountry)"
    );
}

#[test]
fn test_order_by_sequence_and_function() {
    let mut query = account(&["Id"]);
    query.order_by = Some(OrderByClauses::Multiple(vec![
        OrderByClause::field("Name").with_order(Order::Asc),
        OrderByClause::field("CreatedDate")
            .with_order(Order::Desc)
            .with_nulls(Nulls::Last),
        OrderByClause {
            function: Some(FunctionExp::call("COUNT", &["Id"])),
            order: Some(Order::Desc),
            ..OrderByClause::default()
        },
    ]));
    assert_eq!(
        compose(&query),
        "SELECT Id FROM Account ORDER BY Name ASC, CreatedDate DESC NULLS LAST, COUNT(Id) DESC"
    );
}

#[test]
fn test_data_category_conditions() {
    let mut query = Query::new("FAQ__kav", vec![FieldType::field("Title")]);
    query.with_data_category = Some(WithDataCategoryClause {
        conditions: vec![
            DataCategoryCondition {
                group_name: "Geography__c".to_string(),
                selector: DataCategorySelector::At,
                parameters: vec!["usa__c".to_string(), "uk__c".to_string()],
            },
            DataCategoryCondition {
                group_name: "Product__c".to_string(),
                selector: DataCategorySelector::Below,
                parameters: vec!["all__c".to_string()],
            },
        ],
    });
    assert_eq!(
        compose(&query),
        "SELECT Title FROM FAQ__kav WITH DATA CATEGORY Geography__c AT (usa__c, uk__c) \
         AND Product__c BELOW all__c"
    );
}

// ============================================================================
// Formatting
// ============================================================================

#[test]
fn test_formatted_query() {
    let mut query = Query::new(
        "Account",
        vec![
            FieldType::field("Id"),
            FieldType::field("Name"),
            FieldType::subquery(Query::subquery("Contacts", vec![FieldType::field("Id")])),
        ],
    );
    query.where_clause = Some(WhereClause::new(string_eq("Name", "Acme")).join(
        LogicalOperator::And,
        WhereClause::new(int_cmp("Amount", Operator::GreaterThan, "100")),
    ));

    assert_eq!(
        compose_formatted(&query),
        "SELECT Id, Name,\n\t(\n\t\tSELECT Id\n\t\tFROM Contacts\n\t)\nFROM Account\n\
         WHERE Name = 'Acme'\nAND Amount > 100"
    );
}

#[test]
fn test_formatting_disabled_is_single_line() {
    let query = account(&["Id", "Name"]);
    let config = ComposeConfig {
        format: false,
        format_options: FormatOptions {
            num_indent: 4,
            ..FormatOptions::default()
        },
        ..ComposeConfig::default()
    };
    assert_eq!(compose_query(&query, &config), "SELECT Id, Name FROM Account");
}

// ============================================================================
// Composer lifecycle and collaborators
// ============================================================================

#[test]
fn test_auto_compose() {
    let query = account(&["Id"]);
    let composer = Composer::new(&query, &ComposeConfig::default());
    assert_eq!(composer.query(), "SELECT Id FROM Account");
}

#[test]
fn test_deferred_compose() {
    let query = account(&["Id"]);
    let config = ComposeConfig {
        auto_compose: false,
        ..ComposeConfig::default()
    };

    let mut composer = Composer::new(&query, &config);
    assert_eq!(composer.query(), "");
    composer.start();
    assert_eq!(composer.query(), "SELECT Id FROM Account");

    assert_eq!(compose_query(&query, &config), "SELECT Id FROM Account");
}

#[derive(Clone, Default)]
struct RecordingLogger {
    entries: Rc<RefCell<Vec<(String, String)>>>,
}

impl ComposeLogger for RecordingLogger {
    fn clause_composed(&self, clause: &str, soql: &str) {
        self.entries
            .borrow_mut()
            .push((clause.to_string(), soql.to_string()));
    }
}

#[test]
fn test_logger_sees_every_clause() {
    let mut query = account(&["Id"]);
    query.where_clause = Some(WhereClause::new(string_eq("Name", "Acme")));
    query.limit = Some(1);

    let logger = RecordingLogger::default();
    let mut composer = Composer::with_collaborators(
        &query,
        Box::new(SoqlFormatter::compact()),
        Box::new(logger.clone()),
    );
    composer.start();

    let entries = logger.entries.borrow();
    let clauses: Vec<&str> = entries.iter().map(|(clause, _)| clause.as_str()).collect();
    assert_eq!(clauses, vec!["FROM", "WHERE", "LIMIT"]);
    assert_eq!(
        entries.last().map(|(_, soql)| soql.as_str()),
        Some("SELECT Id FROM Account WHERE Name = 'Acme' LIMIT 1")
    );
}

/// Puts every field on its own line and leaves the rest compact.
struct OneFieldPerLine(SoqlFormatter);

impl Formatter for OneFieldPerLine {
    fn format_fields(&self, field_data: &mut FieldData) {
        let count = field_data.fields.len();
        for (i, field) in field_data.fields.iter_mut().enumerate() {
            field.prefix = if i == 0 { String::new() } else { "\n  ".to_string() };
            field.suffix = if i + 1 == count { String::new() } else { ",".to_string() };
        }
    }

    fn format_clause(&self, clause: &str) -> String {
        self.0.format_clause(clause)
    }

    fn format_subquery(&self, query: &str, depth: usize, in_where_clause: bool) -> String {
        self.0.format_subquery(query, depth, in_where_clause)
    }

    fn format_where_operator(&self, operator: &str, right: &str) -> String {
        self.0.format_where_operator(operator, right)
    }

    fn format_order_by_sequence(&self, order_by: &[String]) -> String {
        self.0.format_order_by_sequence(order_by)
    }
}

#[test]
fn test_custom_formatter() {
    let query = account(&["Id", "Name"]);
    let mut composer = Composer::with_collaborators(
        &query,
        Box::new(OneFieldPerLine(SoqlFormatter::compact())),
        Box::new(NoopLogger),
    );
    composer.start();
    assert_eq!(composer.into_query(), "SELECT Id,\n  Name FROM Account");
}
