use std::collections::VecDeque;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::ast::Token;

/// One token per match: group 2 is a comment, 3 a number, 4 a string
/// literal and 5 an identifier, operator or punctuation mark.
static TOKEN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"^\s*((//.*)|(\d+)|("(?:\\"|\\\\|\\n|[^"])*")|([A-Z_a-z][A-Z_a-z0-9]*|==|!=|<=|>=|&&|\|\||[[:punct:]]))?"#,
    )
    .expect("token pattern is valid")
});

/// Errors raised while scanning source text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LexError {
    /// A character that starts no token
    #[error("bad token at line {line}, column {column}")]
    BadToken { line: usize, column: usize },

    /// A digit run too large for a decimal
    #[error("number {text} at line {line} is out of range")]
    BadNumber { line: usize, text: String },
}

/// A read/peek-ahead sequence of tokens.
///
/// The parser consumes tokens through this trait only. Once input is
/// exhausted both methods keep returning an end-of-file token.
pub trait TokenStream {
    /// Removes and returns the next token.
    fn read(&mut self) -> Result<Token, LexError>;

    /// Returns the token `k` positions ahead without consuming anything.
    fn peek(&mut self, k: usize) -> Result<&Token, LexError>;
}

/// Regex-driven line scanner.
///
/// Source lines are scanned lazily, only as far as the parser looks ahead,
/// and every line contributes a trailing end-of-line token.
pub struct Lexer {
    lines: Vec<String>,
    next_line: usize,
    queue: VecDeque<Token>,
    eof: Token,
}

impl Lexer {
    pub fn new(source: &str) -> Self {
        Lexer {
            lines: source.lines().map(str::to_owned).collect(),
            next_line: 0,
            queue: VecDeque::new(),
            eof: Token::eof(),
        }
    }

    /// Scans lines until the queue holds more than `k` tokens. Returns
    /// `false` when the input runs out first.
    fn fill_queue(&mut self, k: usize) -> Result<bool, LexError> {
        while self.queue.len() <= k {
            if self.next_line >= self.lines.len() {
                return Ok(false);
            }
            self.next_line += 1;
            let tokens = scan_line(&self.lines[self.next_line - 1], self.next_line)?;
            self.queue.extend(tokens);
        }
        Ok(true)
    }
}

impl TokenStream for Lexer {
    fn read(&mut self) -> Result<Token, LexError> {
        if self.fill_queue(0)? {
            if let Some(token) = self.queue.pop_front() {
                return Ok(token);
            }
        }
        Ok(self.eof.clone())
    }

    fn peek(&mut self, k: usize) -> Result<&Token, LexError> {
        if self.fill_queue(k)? {
            if let Some(token) = self.queue.get(k) {
                return Ok(token);
            }
        }
        Ok(&self.eof)
    }
}

/// Scans one line. A line with a bad character contributes no tokens at all.
fn scan_line(line: &str, line_number: usize) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < line.len() {
        let Some(caps) = TOKEN_PATTERN.captures(&line[pos..]) else {
            break;
        };
        let matched = caps.get(0).map_or(0, |m| m.end());
        if caps.get(1).is_none() {
            if line[pos..].trim().is_empty() {
                break;
            }
            return Err(LexError::BadToken {
                line: line_number,
                column: line[..pos + matched].chars().count() + 1,
            });
        }

        if caps.get(2).is_some() {
            // comment runs to the end of the line
        } else if let Some(m) = caps.get(3) {
            let value = Decimal::from_str(m.as_str()).map_err(|_| LexError::BadNumber {
                line: line_number,
                text: m.as_str().to_string(),
            })?;
            tokens.push(Token::number(line_number, value));
        } else if let Some(m) = caps.get(4) {
            tokens.push(Token::string(line_number, unescape(m.as_str())));
        } else if let Some(m) = caps.get(5) {
            tokens.push(Token::identifier(line_number, m.as_str()));
        }
        pos += matched;
    }

    tokens.push(Token::eol(line_number));
    Ok(tokens)
}

/// Strips the quotes of a string literal and resolves `\"`, `\\` and `\n`.
/// Any other backslash is kept as written.
fn unescape(literal: &str) -> String {
    let inner = &literal[1..literal.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.peek() {
                Some('"') | Some('\\') => {
                    result.extend(chars.next());
                    continue;
                }
                Some('n') => {
                    chars.next();
                    result.push('\n');
                    continue;
                }
                _ => {}
            }
        }
        result.push(ch);
    }
    result
}
