use crate::ast::Token;
use crate::error::LexError;

pub struct Lexer {
    input: Vec<char>,
    position: usize,
    token_start: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            token_start: 0,
        }
    }

    /// Character offset just past the last token returned.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Character offset where the last token returned starts.
    pub fn token_start(&self) -> usize {
        self.token_start
    }

    /// Source text between two character offsets.
    pub fn slice(&self, start: usize, end: usize) -> String {
        let end = end.min(self.input.len());
        self.input[start.min(end)..end].iter().collect()
    }

    fn current_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_char(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn advance(&mut self) {
        self.position += 1;
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char() {
            if ch.is_whitespace() {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn read_while(&mut self, accept: impl Fn(char) -> bool) -> String {
        let mut result = String::new();
        while let Some(ch) = self.current_char() {
            if accept(ch) {
                result.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        result
    }

    fn read_identifier(&mut self) -> String {
        let mut ident = self.read_while(|c| c.is_alphanumeric() || c == '_');

        // Currency-prefixed decimal: USD5000.50
        if is_currency_prefixed(&ident)
            && self.current_char() == Some('.')
            && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            ident.push('.');
            self.advance();
            ident.push_str(&self.read_while(|c| c.is_ascii_digit()));
        }
        ident
    }

    /// Reads a single-quoted string. Escape sequences are kept as written so
    /// the value can be put back between quotes unchanged.
    fn read_string(&mut self) -> Result<String, LexError> {
        let start = self.position;
        let mut result = String::new();
        self.advance(); // Consume opening quote

        while let Some(ch) = self.current_char() {
            match ch {
                '\'' => {
                    self.advance();
                    return Ok(result);
                }
                '\\' => {
                    result.push(ch);
                    self.advance();
                    match self.current_char() {
                        Some(escaped) => {
                            result.push(escaped);
                            self.advance();
                        }
                        None => break,
                    }
                }
                _ => {
                    result.push(ch);
                    self.advance();
                }
            }
        }

        Err(LexError::UnterminatedString { position: start })
    }

    fn read_number(&mut self) -> Token {
        let mut number = String::new();
        if self.current_char() == Some('-') {
            number.push('-');
            self.advance();
        }

        let digits = self.read_while(|c| c.is_ascii_digit());
        number.push_str(&digits);

        // 2020-01-31 or 2020-01-31T10:00:00.000Z
        if digits.len() == 4
            && number.len() == 4
            && self.current_char() == Some('-')
            && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            number.push_str(&self.read_while(|c| {
                c.is_ascii_digit() || matches!(c, '-' | ':' | '.' | '+' | 'T' | 'Z')
            }));
            return Token::DateTime(number);
        }

        if self.current_char() == Some('.') && self.peek_char(1).is_some_and(|c| c.is_ascii_digit())
        {
            number.push('.');
            self.advance();
            number.push_str(&self.read_while(|c| c.is_ascii_digit()));
        }

        Token::Number(number)
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn double(&mut self, token: Token) -> Token {
        self.advance();
        self.advance();
        token
    }

    pub fn next_token(&mut self) -> Result<Token, LexError> {
        self.skip_whitespace();
        self.token_start = self.position;

        let token = match self.current_char() {
            None => Token::Eof,
            Some('(') => self.single(Token::LParen),
            Some(')') => self.single(Token::RParen),
            Some(',') => self.single(Token::Comma),
            Some('.') => self.single(Token::Dot),
            Some(':') => self.single(Token::Colon),
            Some('=') => self.single(Token::Eq),
            Some('!') => {
                if self.peek_char(1) == Some('=') {
                    self.double(Token::NotEq)
                } else {
                    return Err(LexError::IncompleteOperator {
                        ch: '!',
                        position: self.position,
                        suggestion: "!=",
                    });
                }
            }
            Some('<') => match self.peek_char(1) {
                Some('=') => self.double(Token::LtEq),
                Some('>') => self.double(Token::LtGt),
                _ => self.single(Token::Lt),
            },
            Some('>') => {
                if self.peek_char(1) == Some('=') {
                    self.double(Token::GtEq)
                } else {
                    self.single(Token::Gt)
                }
            }
            Some('\'') => Token::String(self.read_string()?),
            Some('-') if self.peek_char(1).is_some_and(|c| c.is_ascii_digit()) => {
                self.read_number()
            }
            Some(ch) if ch.is_ascii_digit() => self.read_number(),
            Some(ch) if ch.is_alphabetic() || ch == '_' => Token::Identifier(self.read_identifier()),
            Some(ch) => {
                return Err(LexError::UnexpectedCharacter {
                    ch,
                    position: self.position,
                });
            }
        };

        Ok(token)
    }
}

/// `USD5000`: three letters followed by digits.
fn is_currency_prefixed(ident: &str) -> bool {
    let mut chars = ident.chars();
    let prefix_ok = chars.by_ref().take(3).filter(|c| c.is_ascii_alphabetic()).count() == 3;
    let rest: Vec<char> = chars.collect();
    prefix_ok && !rest.is_empty() && rest.iter().all(|c| c.is_ascii_digit())
}

#[test]
fn test_operators() {
    let mut lexer = Lexer::new("= != <> < <= > >=");
    assert_eq!(lexer.next_token(), Ok(Token::Eq));
    assert_eq!(lexer.next_token(), Ok(Token::NotEq));
    assert_eq!(lexer.next_token(), Ok(Token::LtGt));
    assert_eq!(lexer.next_token(), Ok(Token::Lt));
    assert_eq!(lexer.next_token(), Ok(Token::LtEq));
    assert_eq!(lexer.next_token(), Ok(Token::Gt));
    assert_eq!(lexer.next_token(), Ok(Token::GtEq));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}

#[test]
fn test_where_condition() {
    let mut lexer = Lexer::new("WHERE (Amount > 100)");
    assert_eq!(lexer.next_token(), Ok(Token::Identifier("WHERE".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::LParen));
    assert_eq!(lexer.next_token(), Ok(Token::Identifier("Amount".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::Gt));
    assert_eq!(lexer.next_token(), Ok(Token::Number("100".to_string())));
    assert_eq!(lexer.next_token(), Ok(Token::RParen));
    assert_eq!(lexer.next_token(), Ok(Token::Eof));
}
