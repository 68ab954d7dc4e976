/// Lexical token of SOQL text.
///
/// Keywords are not tokens of their own: SOQL keywords are case-insensitive
/// and most of them are also valid field names, so the parser decides from
/// context whether an identifier is a keyword.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Name, keyword or currency-prefixed number
    ///
    /// # Examples
    /// ```text
    /// Account
    /// SELECT
    /// Custom_Field__c
    /// USD5000
    /// ```
    Identifier(String),

    /// Single-quoted string, stored without the quotes and with escape
    /// sequences left as written
    ///
    /// # Examples
    /// ```text
    /// 'Acme'
    /// 'O\'Brien'       // String("O\\'Brien")
    /// ```
    String(String),

    /// Integer or decimal number, optionally negative
    ///
    /// # Examples
    /// ```text
    /// 42
    /// -1.5
    /// ```
    Number(String),

    /// Date or datetime literal
    ///
    /// # Examples
    /// ```text
    /// 2020-01-31
    /// 2010-09-20T22:16:30.000Z
    /// ```
    DateTime(String),

    // Comparison
    /// `=`
    Eq,
    /// `!=`
    NotEq,
    /// `<>`
    LtGt,
    /// `<`
    Lt,
    /// `<=`
    LtEq,
    /// `>`
    Gt,
    /// `>=`
    GtEq,

    // Delimiters
    LParen,
    RParen,
    Comma,
    Dot,
    /// Separates an `N` date literal from its count (`LAST_N_DAYS:5`) and
    /// introduces a bind variable (`:accountIds`)
    Colon,

    /// End of input
    Eof,
}
