pub mod ast;
pub mod cli;
pub mod composer;
pub mod config;
pub mod error;
pub mod formatter;
pub mod json;
pub mod lexer;
pub mod logging;
pub mod parser;
pub mod value;

pub use ast::{FieldType, Query, QuerySource, Token};
pub use composer::{Composer, compose_query, format_query};
pub use config::{ComposeConfig, FormatOptions};
pub use error::{ComposeError, LexError, ParseError};
pub use formatter::{FieldData, FieldItem, Formatter, SoqlFormatter};
pub use lexer::Lexer;
pub use logging::{ComposeLogger, NoopLogger, TracingLogger};
pub use parser::{Parser, parse_query};
pub use value::{LiteralType, LiteralTypes, WhereValue};
