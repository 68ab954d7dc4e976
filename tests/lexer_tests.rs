// tests/lexer_tests.rs

use soql_lang::ast::Token;
use soql_lang::error::LexError;
use soql_lang::lexer::Lexer;

fn tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut tokens = vec![];
    loop {
        let token = lexer.next_token().unwrap();
        if token == Token::Eof {
            break;
        }
        tokens.push(token);
    }
    tokens
}

fn ident(name: &str) -> Token {
    Token::Identifier(name.to_string())
}

// ============================================================================
// Punctuation
// ============================================================================

#[test]
fn test_single_char_tokens() {
    let test_cases = vec![
        ("(", Token::LParen),
        (")", Token::RParen),
        (",", Token::Comma),
        (".", Token::Dot),
        (":", Token::Colon),
        ("=", Token::Eq),
        ("<", Token::Lt),
        (">", Token::Gt),
    ];

    for (input, expected) in test_cases {
        let mut lexer = Lexer::new(input);
        assert_eq!(lexer.next_token(), Ok(expected), "input: {}", input);
        assert_eq!(lexer.next_token(), Ok(Token::Eof));
    }
}

#[test]
fn test_whitespace_is_skipped() {
    assert_eq!(
        tokens("SELECT\n\tId\r\n  FROM Account"),
        vec![ident("SELECT"), ident("Id"), ident("FROM"), ident("Account")]
    );
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_strings_keep_escapes() {
    assert_eq!(
        tokens(r"'Acme' 'O\'Brien' ''"),
        vec![
            Token::String("Acme".to_string()),
            Token::String(r"O\'Brien".to_string()),
            Token::String(String::new()),
        ]
    );
}

#[test]
fn test_numbers() {
    assert_eq!(
        tokens("100 -5 1.25 -0.5"),
        vec![
            Token::Number("100".to_string()),
            Token::Number("-5".to_string()),
            Token::Number("1.25".to_string()),
            Token::Number("-0.5".to_string()),
        ]
    );
}

#[test]
fn test_dates_and_datetimes() {
    assert_eq!(
        tokens("2020-01-31 2020-01-31T10:00:00Z 2021-06-01T08:30:00.000+02:00"),
        vec![
            Token::DateTime("2020-01-31".to_string()),
            Token::DateTime("2020-01-31T10:00:00Z".to_string()),
            Token::DateTime("2021-06-01T08:30:00.000+02:00".to_string()),
        ]
    );
}

#[test]
fn test_year_alone_is_a_number() {
    assert_eq!(tokens("2020"), vec![Token::Number("2020".to_string())]);
}

#[test]
fn test_currency_values_are_identifiers() {
    assert_eq!(
        tokens("USD5000 EUR12.50"),
        vec![ident("USD5000"), ident("EUR12.50")]
    );
}

#[test]
fn test_relationship_path_is_not_a_decimal() {
    assert_eq!(
        tokens("Account.Name"),
        vec![ident("Account"), Token::Dot, ident("Name")]
    );
}

#[test]
fn test_date_n_literal_and_bind_variable() {
    assert_eq!(
        tokens("LAST_N_DAYS:30 :accountIds"),
        vec![
            ident("LAST_N_DAYS"),
            Token::Colon,
            Token::Number("30".to_string()),
            Token::Colon,
            ident("accountIds"),
        ]
    );
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn test_token_positions() {
    let mut lexer = Lexer::new("SELECT COUNT(Id)");
    lexer.next_token().unwrap();
    lexer.next_token().unwrap();
    assert_eq!(lexer.token_start(), 7);
    assert_eq!(lexer.position(), 12);
    assert_eq!(lexer.slice(7, 16), "COUNT(Id)");
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unterminated_string() {
    let mut lexer = Lexer::new("Name = 'Acme");
    lexer.next_token().unwrap();
    lexer.next_token().unwrap();
    assert_eq!(
        lexer.next_token(),
        Err(LexError::UnterminatedString { position: 7 })
    );
}

#[test]
fn test_lone_exclamation_mark() {
    let mut lexer = Lexer::new("!");
    assert_eq!(
        lexer.next_token(),
        Err(LexError::IncompleteOperator {
            ch: '!',
            position: 0,
            suggestion: "!=",
        })
    );
}

#[test]
fn test_unexpected_character() {
    let mut lexer = Lexer::new("Id # 1");
    lexer.next_token().unwrap();
    assert_eq!(
        lexer.next_token(),
        Err(LexError::UnexpectedCharacter { ch: '#', position: 3 })
    );
}
