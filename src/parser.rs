use std::mem;
use std::sync::LazyLock;

use regex::Regex;

use crate::{
    ast::{
        Condition, DataCategoryCondition, DataCategorySelector, Field, FieldFunctionExpression,
        FieldRelationship, FieldType, FieldTypeOf, ForClause, FunctionExp, FunctionParameter,
        GroupByClause, GroupByFields, HavingClause, HavingCondition, LogicalOperator,
        LogicalPrefix, Nulls, Operator, Order, OrderByClause, OrderByClauses, Query, QuerySource,
        Token, TypeOfBranch, TypeOfCondition, UpdateClause, WhereClause, WithDataCategoryClause,
        is_aggregate_function,
    },
    error::ParseError,
    lexer::Lexer,
    value::{LiteralType, LiteralTypes, WhereValue},
};

static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("valid date pattern"));

static DATETIME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(\.\d+)?(Z|[+-]\d{2}:?\d{2})$")
        .expect("valid datetime pattern")
});

static DATE_LITERAL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^(YESTERDAY|TODAY|TOMORROW|(LAST|THIS|NEXT)_(WEEK|MONTH|QUARTER|YEAR|FISCAL_QUARTER|FISCAL_YEAR)|(LAST|NEXT)_90_DAYS)$",
    )
    .expect("valid date literal pattern")
});

static CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{3}\d+(\.\d+)?$").expect("valid currency pattern")
});

/// Words that end a field, source or sort key, and so can never be an alias.
const RESERVED: &[&str] = &[
    "SELECT", "FROM", "WHERE", "WITH", "GROUP", "HAVING", "ORDER", "BY", "LIMIT", "OFFSET",
    "FOR", "UPDATE", "USING", "AND", "OR", "NOT", "IN", "LIKE", "INCLUDES", "EXCLUDES", "ASC",
    "DESC", "NULLS", "TYPEOF", "WHEN", "THEN", "ELSE", "END",
];

fn is_reserved(word: &str) -> bool {
    RESERVED.iter().any(|kw| kw.eq_ignore_ascii_case(word))
}

/// Parses SOQL text into a [`Query`].
///
/// # Examples
///
/// ```
/// use soql_lang::parse_query;
/// use soql_lang::ast::QuerySource;
///
/// let query = parse_query("SELECT Id, Name FROM Account LIMIT 10").unwrap();
/// assert_eq!(query.fields.len(), 2);
/// assert_eq!(query.source, QuerySource::Object { sobject: "Account".to_string() });
/// assert_eq!(query.limit, Some(10));
/// ```
pub fn parse_query(soql: &str) -> Result<Query, ParseError> {
    Parser::new(Lexer::new(soql))?.parse_query()
}

pub struct Parser {
    lexer: Lexer,
    current_token: Token,
    current_start: usize,
    previous_end: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self, ParseError> {
        let current_token = lexer.next_token()?;
        let current_start = lexer.token_start();
        Ok(Parser {
            lexer,
            current_token,
            current_start,
            previous_end: 0,
        })
    }

    fn advance(&mut self) -> Result<(), ParseError> {
        self.previous_end = self.lexer.position();
        self.current_token = self.lexer.next_token()?;
        self.current_start = self.lexer.token_start();
        Ok(())
    }

    fn check(&self, token: &Token) -> bool {
        mem::discriminant(&self.current_token) == mem::discriminant(token)
    }

    fn expect(&mut self, expected: Token, description: &str) -> Result<(), ParseError> {
        if !self.check(&expected) {
            return Err(self.error(description));
        }
        self.advance()
    }

    fn error(&self, expected: &str) -> ParseError {
        match &self.current_token {
            Token::Eof => ParseError::UnexpectedEof {
                expected: expected.to_string(),
            },
            token => ParseError::UnexpectedToken {
                expected: expected.to_string(),
                found: format!("{:?}", token),
                position: self.current_start,
            },
        }
    }

    fn at_keyword(&self, keyword: &str) -> bool {
        matches!(&self.current_token, Token::Identifier(word) if word.eq_ignore_ascii_case(keyword))
    }

    /// Consumes `keyword` if it is the current token.
    fn eat_keyword(&mut self, keyword: &str) -> Result<bool, ParseError> {
        if self.at_keyword(keyword) {
            self.advance()?;
            return Ok(true);
        }
        Ok(false)
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), ParseError> {
        if !self.eat_keyword(keyword)? {
            return Err(self.error(keyword));
        }
        Ok(())
    }

    fn expect_identifier(&mut self, description: &str) -> Result<String, ParseError> {
        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::Identifier(name) => {
                self.advance()?;
                Ok(name)
            }
            token => {
                self.current_token = token;
                Err(self.error(description))
            }
        }
    }

    /// Keyword of a closed set, e.g. `ASC`/`DESC`.
    fn expect_keyword_of<K>(
        &mut self,
        description: &str,
        from_keyword: impl Fn(&str) -> Option<K>,
    ) -> Result<K, ParseError> {
        let keyword = match &self.current_token {
            Token::Identifier(word) => from_keyword(word.as_str()),
            _ => None,
        };
        match keyword {
            Some(keyword) => {
                self.advance()?;
                Ok(keyword)
            }
            None => Err(self.error(description)),
        }
    }

    /// Dotted path such as `Account.Owner.Name`, returned as its segments.
    fn parse_path(&mut self) -> Result<Vec<String>, ParseError> {
        let mut segments = vec![self.expect_identifier("field name")?];
        while self.check(&Token::Dot) {
            self.advance()?;
            segments.push(self.expect_identifier("field name after '.'")?);
        }
        Ok(segments)
    }

    fn parse_alias(&mut self) -> Result<Option<String>, ParseError> {
        match &self.current_token {
            Token::Identifier(word) if !is_reserved(word) => {
                let alias = word.clone();
                self.advance()?;
                Ok(Some(alias))
            }
            _ => Ok(None),
        }
    }

    fn parse_limit(&mut self, clause: &str) -> Result<u64, ParseError> {
        match &self.current_token {
            Token::Number(text) => {
                let limit = text.parse::<u64>().map_err(|_| ParseError::InvalidNumber {
                    text: text.clone(),
                    position: self.current_start,
                })?;
                self.advance()?;
                Ok(limit)
            }
            _ => Err(self.error(&format!("number after {}", clause))),
        }
    }
}

// Queries and field lists
impl Parser {
    /// Parse a complete query
    pub fn parse_query(&mut self) -> Result<Query, ParseError> {
        let query = self.parse_select(false)?;
        self.expect(Token::Eof, "end of query")?;
        Ok(query)
    }

    fn parse_select(&mut self, is_subquery: bool) -> Result<Query, ParseError> {
        self.expect_keyword("SELECT")?;
        let mut fields = vec![self.parse_field()?];
        while self.check(&Token::Comma) {
            self.advance()?;
            fields.push(self.parse_field()?);
        }

        self.expect_keyword("FROM")?;
        let mut path = self.parse_path()?;
        let source = match path.pop() {
            Some(relationship_name) if is_subquery => QuerySource::Relationship {
                relationship_name,
                sobject_prefix: path,
            },
            Some(last) => {
                path.push(last);
                QuerySource::Object {
                    sobject: path.join("."),
                }
            }
            None => return Err(self.error("object name")),
        };

        let mut query = Query::with_source(source, fields);
        query.sobject_alias = self.parse_alias()?;
        if let Some(alias) = &query.sobject_alias {
            move_alias_to_prefix(&mut query.fields, alias);
        }

        if self.eat_keyword("WHERE")? {
            query.where_clause = Some(self.parse_where()?);
        }
        self.parse_with_clauses(&mut query)?;

        if self.eat_keyword("GROUP")? {
            self.expect_keyword("BY")?;
            query.group_by = Some(self.parse_group_by()?);
        }
        if self.at_keyword("HAVING") {
            let position = self.current_start;
            self.advance()?;
            let having = self.parse_having()?;
            match query.group_by.as_mut() {
                Some(group_by) => group_by.having = Some(having),
                None => {
                    return Err(ParseError::Unsupported {
                        message: "HAVING without GROUP BY".to_string(),
                        position,
                    });
                }
            }
        }

        if self.eat_keyword("ORDER")? {
            self.expect_keyword("BY")?;
            query.order_by = Some(self.parse_order_by()?);
        }
        if self.eat_keyword("LIMIT")? {
            query.limit = Some(self.parse_limit("LIMIT")?);
        }
        if self.eat_keyword("OFFSET")? {
            query.offset = Some(self.parse_limit("OFFSET")?);
        }
        // Composed queries carry the WITH clauses after OFFSET
        self.parse_with_clauses(&mut query)?;

        if self.eat_keyword("FOR")? {
            query.for_clause =
                Some(self.expect_keyword_of("VIEW, UPDATE or REFERENCE", ForClause::from_keyword)?);
        }
        if self.eat_keyword("UPDATE")? {
            query.update =
                Some(self.expect_keyword_of("TRACKING or VIEWSTAT", UpdateClause::from_keyword)?);
        }

        Ok(query)
    }

    fn parse_field(&mut self) -> Result<FieldType, ParseError> {
        if self.check(&Token::LParen) {
            self.advance()?;
            let subquery = self.parse_select(true)?;
            self.expect(Token::RParen, "')' after subquery")?;
            return Ok(FieldType::subquery(subquery));
        }

        if self.at_keyword("TYPEOF") {
            self.advance()?;
            return self.parse_type_of().map(FieldType::TypeOf);
        }

        let start = self.current_start;
        let name = self.expect_identifier("field")?;
        if self.check(&Token::LParen) {
            let mut function = self.parse_function_call(name, start)?;
            function.alias = self.parse_alias()?;
            return Ok(FieldType::FunctionExpression(function));
        }

        let mut segments = vec![name];
        while self.check(&Token::Dot) {
            self.advance()?;
            segments.push(self.expect_identifier("field name after '.'")?);
        }
        let alias = self.parse_alias()?;
        let field = segments.pop().unwrap_or_default();

        Ok(if segments.is_empty() {
            FieldType::Field(Field {
                field,
                object_prefix: None,
                alias,
            })
        } else {
            FieldType::Relationship(FieldRelationship {
                field,
                relationships: segments,
                object_prefix: None,
                alias,
            })
        })
    }

    /// Function call whose name (starting at `start`) was just consumed;
    /// the current token is its `(`.
    fn parse_function_call(
        &mut self,
        function_name: String,
        start: usize,
    ) -> Result<FieldFunctionExpression, ParseError> {
        self.expect(Token::LParen, "'('")?;
        let mut parameters = vec![];
        while !self.check(&Token::RParen) {
            parameters.push(self.parse_function_parameter()?);
            if !self.check(&Token::RParen) {
                self.expect(Token::Comma, "',' or ')' in function arguments")?;
            }
        }
        self.expect(Token::RParen, "')'")?;

        let mut function = FieldFunctionExpression::new(function_name, parameters, None);
        function.raw_value = Some(self.lexer.slice(start, self.previous_end));
        Ok(function)
    }

    fn parse_function_parameter(&mut self) -> Result<FunctionParameter, ParseError> {
        let start = self.current_start;
        match self.current_token.clone() {
            Token::Identifier(name) => {
                self.advance()?;
                if self.check(&Token::LParen) {
                    return Ok(self.parse_function_call(name, start)?.into());
                }
                let mut path = name;
                while self.check(&Token::Dot) {
                    self.advance()?;
                    path.push('.');
                    path.push_str(&self.expect_identifier("field name after '.'")?);
                }
                Ok(FunctionParameter::Literal(path))
            }
            Token::String(s) => {
                self.advance()?;
                Ok(FunctionParameter::Literal(format!("'{}'", s)))
            }
            Token::Number(text) | Token::DateTime(text) => {
                self.advance()?;
                Ok(FunctionParameter::Literal(text))
            }
            _ => Err(self.error("function argument")),
        }
    }

    /// `TYPEOF` has been consumed.
    fn parse_type_of(&mut self) -> Result<FieldTypeOf, ParseError> {
        let field = self.parse_path()?.join(".");
        let mut conditions = vec![];

        while self.eat_keyword("WHEN")? {
            let object_type = self.expect_identifier("object type after WHEN")?;
            self.expect_keyword("THEN")?;
            conditions.push(TypeOfCondition {
                kind: TypeOfBranch::When,
                object_type: Some(object_type),
                field_list: self.parse_field_name_list()?,
            });
        }
        if self.eat_keyword("ELSE")? {
            conditions.push(TypeOfCondition {
                kind: TypeOfBranch::Else,
                object_type: None,
                field_list: self.parse_field_name_list()?,
            });
        }
        self.expect_keyword("END")?;

        Ok(FieldTypeOf { field, conditions })
    }

    fn parse_field_name_list(&mut self) -> Result<Vec<String>, ParseError> {
        let mut names = vec![self.parse_path()?.join(".")];
        while self.check(&Token::Comma) {
            self.advance()?;
            names.push(self.parse_path()?.join("."));
        }
        Ok(names)
    }

    fn parse_with_clauses(&mut self, query: &mut Query) -> Result<(), ParseError> {
        while self.eat_keyword("WITH")? {
            if self.eat_keyword("SECURITY_ENFORCED")? {
                query.with_security_enforced = true;
            } else if self.eat_keyword("DATA")? {
                self.expect_keyword("CATEGORY")?;
                query.with_data_category = Some(self.parse_data_category()?);
            } else {
                return Err(self.error("DATA CATEGORY or SECURITY_ENFORCED after WITH"));
            }
        }
        Ok(())
    }

    fn parse_data_category(&mut self) -> Result<WithDataCategoryClause, ParseError> {
        let mut conditions = vec![];
        loop {
            let group_name = self.expect_identifier("data category group")?;
            let selector = self.expect_keyword_of(
                "AT, ABOVE, BELOW or ABOVE_OR_BELOW",
                DataCategorySelector::from_keyword,
            )?;
            let parameters = if self.check(&Token::LParen) {
                self.advance()?;
                let mut parameters = vec![self.expect_identifier("data category")?];
                while self.check(&Token::Comma) {
                    self.advance()?;
                    parameters.push(self.expect_identifier("data category")?);
                }
                self.expect(Token::RParen, "')' after data categories")?;
                parameters
            } else {
                vec![self.expect_identifier("data category")?]
            };
            conditions.push(DataCategoryCondition {
                group_name,
                selector,
                parameters,
            });

            if !self.eat_keyword("AND")? {
                break;
            }
        }
        Ok(WithDataCategoryClause { conditions })
    }
}

/// Moves a leading `alias.` of field paths into the object prefix.
fn move_alias_to_prefix(fields: &mut [FieldType], alias: &str) {
    for field in fields.iter_mut() {
        let FieldType::Relationship(relationship) = field else {
            continue;
        };
        if !relationship
            .relationships
            .first()
            .is_some_and(|first| first.eq_ignore_ascii_case(alias))
        {
            continue;
        }

        let prefix = relationship.relationships.remove(0);
        if relationship.relationships.is_empty() {
            *field = FieldType::Field(Field {
                field: mem::take(&mut relationship.field),
                object_prefix: Some(prefix),
                alias: relationship.alias.take(),
            });
        } else {
            relationship.object_prefix = Some(prefix);
        }
    }
}

// Filters
impl Parser {
    fn parse_open_parens(&mut self) -> Result<u32, ParseError> {
        let mut count = 0;
        while self.check(&Token::LParen) {
            count += 1;
            self.advance()?;
        }
        Ok(count)
    }

    /// Consumes `)` while groups opened in this filter are still open.
    fn parse_close_parens(&mut self, depth: &mut u32) -> Result<u32, ParseError> {
        let mut count = 0;
        while *depth > 0 && self.check(&Token::RParen) {
            count += 1;
            *depth -= 1;
            self.advance()?;
        }
        Ok(count)
    }

    fn parse_logical_operator(&mut self) -> Result<Option<LogicalOperator>, ParseError> {
        if self.eat_keyword("AND")? {
            Ok(Some(LogicalOperator::And))
        } else if self.eat_keyword("OR")? {
            Ok(Some(LogicalOperator::Or))
        } else {
            Ok(None)
        }
    }

    fn parse_where(&mut self) -> Result<WhereClause, ParseError> {
        let mut links: Vec<(Option<Condition>, Option<LogicalOperator>)> = vec![];
        let mut depth = 0;

        loop {
            let open_paren = self.parse_open_parens()?;
            let mut logical_prefix = None;
            if self.at_keyword("NOT") {
                let position = self.current_start;
                self.advance()?;
                if self.check(&Token::LParen) {
                    if open_paren > 0 {
                        return Err(ParseError::Unsupported {
                            message: "negated group directly inside parentheses".to_string(),
                            position,
                        });
                    }
                    // NOT (…): a node without condition negating what follows
                    links.push((None, Some(LogicalOperator::Not)));
                    continue;
                }
                logical_prefix = Some(LogicalPrefix::Not);
            }
            depth += open_paren;

            let mut condition = self.parse_condition()?;
            condition.open_paren = open_paren;
            condition.logical_prefix = logical_prefix;
            condition.close_paren = self.parse_close_parens(&mut depth)?;

            let operator = self.parse_logical_operator()?;
            links.push((Some(condition), operator));
            if operator.is_none() {
                break;
            }
        }

        let mut links = links.into_iter().rev();
        let (left, _) = links.next().ok_or_else(|| self.error("condition"))?;
        let mut clause = WhereClause {
            left,
            operator: None,
            right: None,
        };
        for (left, operator) in links {
            clause = WhereClause {
                left,
                operator,
                right: Some(Box::new(clause)),
            };
        }
        Ok(clause)
    }

    fn parse_having(&mut self) -> Result<HavingClause, ParseError> {
        let mut links: Vec<(HavingCondition, Option<LogicalOperator>)> = vec![];
        let mut depth = 0;

        loop {
            let open_paren = self.parse_open_parens()?;
            depth += open_paren;
            let (field, function) = self.parse_subject()?;
            let operator = self.parse_operator()?;
            let value = self.parse_having_value()?;
            let close_paren = self.parse_close_parens(&mut depth)?;

            let logical = self.parse_logical_operator()?;
            links.push((
                HavingCondition {
                    open_paren,
                    close_paren,
                    field,
                    function,
                    operator,
                    value,
                },
                logical,
            ));
            if logical.is_none() {
                break;
            }
        }

        let mut links = links.into_iter().rev();
        let (left, _) = links.next().ok_or_else(|| self.error("condition"))?;
        let mut clause = HavingClause::new(left);
        for (left, operator) in links {
            clause = HavingClause {
                left: Some(left),
                operator,
                right: Some(Box::new(clause)),
            };
        }
        Ok(clause)
    }

    /// Field path or function call on the left of a condition or in a
    /// `GROUP BY`/`ORDER BY` list.
    fn parse_subject(&mut self) -> Result<(Option<String>, Option<FunctionExp>), ParseError> {
        let start = self.current_start;
        let name = self.expect_identifier("field or function")?;
        if self.check(&Token::LParen) {
            let function = self.parse_function_call(name, start)?;
            return Ok((None, Some(to_function_exp(function))));
        }

        let mut path = name;
        while self.check(&Token::Dot) {
            self.advance()?;
            path.push('.');
            path.push_str(&self.expect_identifier("field name after '.'")?);
        }
        Ok((Some(path), None))
    }

    fn parse_operator(&mut self) -> Result<Operator, ParseError> {
        if self.eat_keyword("NOT")? {
            self.expect_keyword("IN")?;
            return Ok(Operator::NotIn);
        }

        let operator = match &self.current_token {
            Token::Eq => Some(Operator::Equal),
            Token::NotEq => Some(Operator::NotEqual),
            Token::LtGt => Some(Operator::LessGreater),
            Token::Lt => Some(Operator::LessThan),
            Token::LtEq => Some(Operator::LessEqual),
            Token::Gt => Some(Operator::GreaterThan),
            Token::GtEq => Some(Operator::GreaterEqual),
            Token::Identifier(word) => Operator::from_keyword(word),
            _ => None,
        };
        match operator {
            Some(operator) => {
                self.advance()?;
                Ok(operator)
            }
            None => Err(self.error("comparison operator")),
        }
    }

    fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        let (field, function) = self.parse_subject()?;
        let operator = self.parse_operator()?;
        let mut condition = Condition {
            open_paren: 0,
            close_paren: 0,
            logical_prefix: None,
            field,
            function,
            operator,
            value: None,
            literal_type: None,
            value_query: None,
        };

        if !self.check(&Token::LParen) {
            let (value, literal_type) = self.parse_value()?;
            condition.value = Some(WhereValue::Single(value));
            condition.literal_type = Some(LiteralTypes::Single(literal_type));
            return Ok(condition);
        }

        self.advance()?;
        if self.at_keyword("SELECT") {
            condition.value_query = Some(Box::new(self.parse_select(false)?));
            self.expect(Token::RParen, "')' after subquery")?;
            return Ok(condition);
        }

        let mut values = vec![];
        let mut literal_types = vec![];
        while !self.check(&Token::RParen) {
            let (value, literal_type) = self.parse_value()?;
            values.push(value);
            literal_types.push(literal_type);
            if !self.check(&Token::RParen) {
                self.expect(Token::Comma, "',' or ')' in value list")?;
            }
        }
        self.expect(Token::RParen, "')' after value list")?;

        condition.value = Some(WhereValue::List(values));
        condition.literal_type = Some(match literal_types.first() {
            Some(first) if literal_types.iter().all(|lt| lt == first) => {
                LiteralTypes::Single(*first)
            }
            _ => LiteralTypes::PerValue(literal_types),
        });
        Ok(condition)
    }

    /// One filter value and its literal type. Strings are returned without
    /// their quotes and bind variables without their `:`.
    fn parse_value(&mut self) -> Result<(String, LiteralType), ParseError> {
        let position = self.current_start;
        let invalid = |text: String| ParseError::InvalidValue { text, position };

        match mem::replace(&mut self.current_token, Token::Eof) {
            Token::String(s) => {
                self.advance()?;
                Ok((s, LiteralType::String))
            }
            Token::Number(n) => {
                self.advance()?;
                let literal_type = if n.contains('.') {
                    LiteralType::Decimal
                } else {
                    LiteralType::Integer
                };
                Ok((n, literal_type))
            }
            Token::DateTime(d) => {
                self.advance()?;
                if DATE_RE.is_match(&d) {
                    Ok((d, LiteralType::Date))
                } else if DATETIME_RE.is_match(&d) {
                    Ok((d, LiteralType::DateTime))
                } else {
                    Err(invalid(d))
                }
            }
            Token::Colon => {
                self.advance()?;
                let name = self.expect_identifier("bind variable name")?;
                Ok((name, LiteralType::ApexBindVariable))
            }
            Token::Identifier(word) => {
                self.advance()?;
                if self.check(&Token::Colon) {
                    self.advance()?;
                    return match mem::replace(&mut self.current_token, Token::Eof) {
                        Token::Number(n) => {
                            self.advance()?;
                            Ok((format!("{}:{}", word, n), LiteralType::DateNLiteral))
                        }
                        token => {
                            self.current_token = token;
                            Err(self.error("number after ':'"))
                        }
                    };
                }

                let literal_type = if word.eq_ignore_ascii_case("true")
                    || word.eq_ignore_ascii_case("false")
                {
                    LiteralType::Boolean
                } else if word.eq_ignore_ascii_case("null") {
                    LiteralType::Null
                } else if DATE_LITERAL_RE.is_match(&word) {
                    LiteralType::DateLiteral
                } else if CURRENCY_RE.is_match(&word) {
                    if word.contains('.') {
                        LiteralType::DecimalWithCurrencyPrefix
                    } else {
                        LiteralType::IntegerWithCurrencyPrefix
                    }
                } else {
                    return Err(invalid(word));
                };
                Ok((word, literal_type))
            }
            token => {
                self.current_token = token;
                Err(self.error("value"))
            }
        }
    }

    /// `HAVING` values are kept as written, quotes included.
    fn parse_having_value(&mut self) -> Result<String, ParseError> {
        if !self.check(&Token::LParen) {
            return self.parse_having_scalar();
        }

        self.advance()?;
        let mut values = vec![];
        while !self.check(&Token::RParen) {
            values.push(self.parse_having_scalar()?);
            if !self.check(&Token::RParen) {
                self.expect(Token::Comma, "',' or ')' in value list")?;
            }
        }
        self.expect(Token::RParen, "')' after value list")?;
        Ok(format!("({})", values.join(", ")))
    }

    fn parse_having_scalar(&mut self) -> Result<String, ParseError> {
        let (value, literal_type) = self.parse_value()?;
        Ok(literal_type.render(&value))
    }
}

fn to_function_exp(function: FieldFunctionExpression) -> FunctionExp {
    let parameters = function
        .parameters
        .iter()
        .map(|param| match param {
            FunctionParameter::Literal(text) => text.clone(),
            FunctionParameter::Field(nested) => match nested.as_ref() {
                FieldType::FunctionExpression(nested) => nested
                    .raw_value
                    .clone()
                    .unwrap_or_else(|| nested.function_name.clone()),
                FieldType::Field(field) => field.field.clone(),
                FieldType::Relationship(relationship) => {
                    format!("{}.{}", relationship.relationships.join("."), relationship.field)
                }
                FieldType::Subquery(_) | FieldType::TypeOf(_) => String::new(),
            },
        })
        .collect();
    FunctionExp {
        raw_value: function.raw_value,
        is_aggregate_fn: is_aggregate_function(&function.function_name),
        function_name: Some(function.function_name),
        parameters,
        alias: None,
    }
}

// Grouping and sorting
impl Parser {
    fn parse_group_by(&mut self) -> Result<GroupByClause, ParseError> {
        let position = self.current_start;
        let mut subjects = vec![self.parse_subject()?];
        while self.check(&Token::Comma) {
            self.advance()?;
            subjects.push(self.parse_subject()?);
        }

        if let [(None, Some(function))] = subjects.as_mut_slice() {
            return Ok(GroupByClause {
                function: Some(mem::take(function)),
                ..GroupByClause::default()
            });
        }

        let mut fields = vec![];
        for subject in subjects {
            match subject {
                (Some(field), None) => fields.push(field),
                _ => {
                    return Err(ParseError::Unsupported {
                        message: "GROUP BY mixing functions with other keys".to_string(),
                        position,
                    });
                }
            }
        }
        let field = if fields.len() == 1 {
            GroupByFields::Single(fields.remove(0))
        } else {
            GroupByFields::Multiple(fields)
        };
        Ok(GroupByClause {
            field: Some(field),
            ..GroupByClause::default()
        })
    }

    fn parse_order_by(&mut self) -> Result<OrderByClauses, ParseError> {
        let mut clauses = vec![self.parse_order_by_clause()?];
        while self.check(&Token::Comma) {
            self.advance()?;
            clauses.push(self.parse_order_by_clause()?);
        }
        Ok(if clauses.len() == 1 {
            OrderByClauses::Single(clauses.remove(0))
        } else {
            OrderByClauses::Multiple(clauses)
        })
    }

    fn parse_order_by_clause(&mut self) -> Result<OrderByClause, ParseError> {
        let (field, function) = self.parse_subject()?;
        let order = match &self.current_token {
            Token::Identifier(word) => Order::from_keyword(word),
            _ => None,
        };
        if order.is_some() {
            self.advance()?;
        }
        let nulls = if self.eat_keyword("NULLS")? {
            Some(self.expect_keyword_of("FIRST or LAST", Nulls::from_keyword)?)
        } else {
            None
        };
        Ok(OrderByClause {
            field,
            function,
            order,
            nulls,
        })
    }
}
