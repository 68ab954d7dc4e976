use thiserror::Error;

/// Errors produced while turning SOQL text into tokens.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    #[error("Unexpected character '{ch}' at position {position}")]
    UnexpectedCharacter { ch: char, position: usize },

    #[error("Unterminated string starting at position {position}")]
    UnterminatedString { position: usize },

    #[error("Unexpected '{ch}' at position {position} (did you mean '{suggestion}'?)")]
    IncompleteOperator {
        ch: char,
        position: usize,
        suggestion: &'static str,
    },
}

/// Errors produced while parsing SOQL text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("Expected {expected} at position {position}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        position: usize,
    },

    #[error("Unexpected end of query, expected {expected}")]
    UnexpectedEof { expected: String },

    #[error("Invalid number '{text}' at position {position}")]
    InvalidNumber { text: String, position: usize },

    #[error("Invalid value '{text}' at position {position}")]
    InvalidValue { text: String, position: usize },

    #[error("Unsupported syntax at position {position}: {message}")]
    Unsupported { message: String, position: usize },
}

/// Errors surfaced by the composer entry points.
#[derive(Debug, Error)]
pub enum ComposeError {
    /// A field expression whose `type` tag is none of the known variants
    #[error("Unsupported field expression type '{tag}'")]
    UnsupportedFieldExpression { tag: String },

    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    #[error("Invalid query JSON: {0}")]
    Json(#[from] serde_json::Error),
}
