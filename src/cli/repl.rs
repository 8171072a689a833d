//! Line-fed interactive sessions

use crate::{Environment, Error, Evaluator, GrammarLevel, Lexer, Parser, Value};

/// What a [`Repl`] made of the input so far
#[derive(Debug, PartialEq)]
pub enum Feed {
    /// The input ends inside a statement; more lines are needed
    Incomplete,
    /// Values of the statements completed by the last line
    Values(Vec<Value>),
    /// The pending input failed to parse or run and was discarded
    Error(Error),
}

/// An interactive session.
///
/// Lines are buffered until they form complete statements, which then run in
/// a global scope that persists across inputs and errors.
///
/// ```
/// use stone_lang::Value;
/// use stone_lang::cli::{Feed, Repl};
///
/// let mut repl = Repl::new();
/// assert_eq!(repl.feed("def twice(n) {"), Feed::Incomplete);
/// assert_eq!(repl.feed("n * 2 }"), Feed::Values(vec![Value::from("twice")]));
/// assert_eq!(repl.feed("twice(21)"), Feed::Values(vec![Value::number(42)]));
/// ```
#[derive(Debug, Default)]
pub struct Repl {
    evaluator: Evaluator,
    pending: String,
}

impl Repl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(level: GrammarLevel) -> Self {
        Repl {
            evaluator: Evaluator::with_level(level),
            pending: String::new(),
        }
    }

    pub fn environment(&self) -> &Environment {
        self.evaluator.environment()
    }

    /// Prompt for the next line.
    pub fn prompt(&self) -> &'static str {
        if self.pending.is_empty() { "> " } else { "| " }
    }

    pub fn feed(&mut self, line: &str) -> Feed {
        self.pending.push_str(line);
        self.pending.push('\n');

        let mut parser = Parser::with_level(Lexer::new(&self.pending), self.evaluator.level());
        let statements = match parser.parse_program() {
            Ok(statements) => statements,
            Err(e) if e.is_unexpected_eof() => return Feed::Incomplete,
            Err(e) => {
                self.pending.clear();
                return Feed::Error(e.into());
            }
        };
        self.pending.clear();

        let mut values = Vec::with_capacity(statements.len());
        for statement in &statements {
            match self.evaluator.eval_node(statement) {
                Ok(value) => values.push(value),
                Err(e) => return Feed::Error(e.into()),
            }
        }
        Feed::Values(values)
    }

    /// Drops any buffered partial input.
    pub fn cancel(&mut self) {
        self.pending.clear();
    }
}
