use thiserror::Error;

use crate::ast::{ListKind, Node, Token, TokenKind};
use crate::grammar::{GrammarLevel, StoneGrammar};
use crate::lexer::{LexError, Lexer, TokenStream};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("syntax error around {}{}", near(.token), hint(.expected))]
    Unexpected {
        token: Token,
        expected: Option<String>,
    },

    /// Nesting beyond [`MAX_PARSE_DEPTH`](crate::limits::MAX_PARSE_DEPTH)
    #[error("nesting too deep at line {line}")]
    TooDeep { line: usize },

    #[error(transparent)]
    Lex(#[from] LexError),
}

fn near(token: &Token) -> String {
    if token.is_eof() {
        "the last line".to_string()
    } else {
        format!("\"{}\" at line {}", token, token.line())
    }
}

fn hint(expected: &Option<String>) -> String {
    match expected {
        Some(expected) => format!(", expected {}", expected),
        None => String::new(),
    }
}

impl ParseError {
    pub fn unexpected(token: Token, expected: Option<String>) -> Self {
        ParseError::Unexpected { token, expected }
    }

    /// The input ended in the middle of a statement.
    pub fn is_unexpected_eof(&self) -> bool {
        matches!(self, ParseError::Unexpected { token, .. } if token.is_eof())
    }

    pub fn line(&self) -> Option<usize> {
        match self {
            ParseError::Unexpected { token, .. } if !token.is_eof() => Some(token.line()),
            ParseError::Unexpected { .. } => None,
            ParseError::TooDeep { line } => Some(*line),
            ParseError::Lex(LexError::BadToken { line, .. })
            | ParseError::Lex(LexError::BadNumber { line, .. }) => Some(*line),
        }
    }
}

/// Parses Stone source one top-level statement at a time.
pub struct Parser {
    lexer: Lexer,
    grammar: StoneGrammar,
}

impl Parser {
    pub fn new(lexer: Lexer) -> Self {
        Parser::with_level(lexer, GrammarLevel::default())
    }

    pub fn with_level(lexer: Lexer, level: GrammarLevel) -> Self {
        Parser {
            lexer,
            grammar: StoneGrammar::new(level),
        }
    }

    pub fn grammar(&self) -> &StoneGrammar {
        &self.grammar
    }

    /// Whether every token has been consumed.
    pub fn at_end(&mut self) -> Result<bool, ParseError> {
        Ok(self.lexer.peek(0)?.is_eof())
    }

    /// Parses the next top-level statement. Blank lines come back as
    /// `NullStmnt`.
    pub fn parse_statement(&mut self) -> Result<Node, ParseError> {
        self.grammar.parse(&mut self.lexer)
    }

    /// Parses the remaining input, dropping empty statements.
    pub fn parse_program(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut statements = Vec::new();
        while !self.at_end()? {
            let statement = self.parse_statement()?;
            if !statement.is(ListKind::Null) {
                statements.push(statement);
            }
        }
        Ok(statements)
    }

    /// Parses a single expression that must make up the rest of the input.
    pub fn parse_expression(&mut self) -> Result<Node, ParseError> {
        let node = self.grammar.expression().parse(&mut self.lexer)?;
        loop {
            let token = self.lexer.read()?;
            match token.kind() {
                TokenKind::Eol => continue,
                TokenKind::Eof => return Ok(node),
                _ => return Err(ParseError::unexpected(token, None)),
            }
        }
    }
}

/// Parses a whole program with the full grammar.
pub fn parse(source: &str) -> Result<Vec<Node>, ParseError> {
    Parser::new(Lexer::new(source)).parse_program()
}

/// Parses a single expression with the full grammar.
pub fn parse_expression(source: &str) -> Result<Node, ParseError> {
    Parser::new(Lexer::new(source)).parse_expression()
}
