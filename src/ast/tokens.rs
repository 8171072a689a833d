use std::fmt;

use rust_decimal::Decimal;

/// Text of the end-of-line token.
///
/// Grammar literals name line ends with this constant, so a separator can be
/// written as `sep(&[";", EOL])`.
pub const EOL: &str = "\n";

/// The lexical class of a [`Token`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Integer literal
    ///
    /// # Examples
    /// ```text
    /// 42
    /// 0
    /// ```
    Number,

    /// String literal enclosed in double quotes
    ///
    /// # Examples
    /// ```text
    /// "hello"
    /// "line\n"
    /// ```
    String,

    /// Identifier, keyword, operator or punctuation
    ///
    /// Stone does not distinguish these lexically: `while`, `fib`, `==` and
    /// `{` are all identifier tokens. The grammar decides what they mean.
    Identifier,

    /// End of a source line
    Eol,

    /// End of input
    Eof,
}

/// A lexical token.
///
/// Tokens are immutable once produced by the lexer. Number tokens carry their
/// parsed value; string tokens carry their unescaped contents as text.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    kind: TokenKind,
    line: usize,
    text: String,
    number: Option<Decimal>,
}

impl Token {
    pub fn number(line: usize, value: Decimal) -> Self {
        Token {
            kind: TokenKind::Number,
            line,
            text: value.to_string(),
            number: Some(value),
        }
    }

    pub fn string(line: usize, text: impl Into<String>) -> Self {
        Token {
            kind: TokenKind::String,
            line,
            text: text.into(),
            number: None,
        }
    }

    pub fn identifier(line: usize, text: impl Into<String>) -> Self {
        Token {
            kind: TokenKind::Identifier,
            line,
            text: text.into(),
            number: None,
        }
    }

    pub fn eol(line: usize) -> Self {
        Token {
            kind: TokenKind::Eol,
            line,
            text: EOL.to_string(),
            number: None,
        }
    }

    pub fn eof() -> Self {
        Token {
            kind: TokenKind::Eof,
            line: 0,
            text: String::new(),
            number: None,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Numeric value of a number token.
    pub fn value(&self) -> Option<Decimal> {
        self.number
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Whether this token is the literal `text` as far as grammar literals
    /// are concerned: an identifier spelled `text`, or a line end when `text`
    /// is [`EOL`].
    pub fn is_literal(&self, text: &str) -> bool {
        match self.kind {
            TokenKind::Identifier | TokenKind::Eol => self.text == text,
            _ => false,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eol => write!(f, "\\n"),
            TokenKind::Eof => write!(f, "EOF"),
            _ => write!(f, "{}", self.text),
        }
    }
}
