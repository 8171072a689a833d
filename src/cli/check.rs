//! Check Stone programs for syntax errors and unresolved names

use super::CliError;
use crate::{GrammarLevel, Lexer, Parser, Reference, Symbols};

/// Result of a check operation
#[derive(Debug, PartialEq)]
pub enum CheckResult {
    /// Every name resolves
    Clean {
        /// Number of non-empty top-level statements
        statements: usize,
    },
    /// Names read before (or without) being bound
    Unresolved(Vec<Reference>),
}

/// Parses `source` without running it and resolves the names it reads.
pub fn execute_check(source: &str, level: GrammarLevel) -> Result<CheckResult, CliError> {
    let mut parser = Parser::with_level(Lexer::new(source), level);
    let statements = parser.parse_program()?;

    let mut symbols = Symbols::new();
    for statement in &statements {
        statement.lookup(&mut symbols);
    }

    let unresolved = symbols.unresolved();
    if unresolved.is_empty() {
        Ok(CheckResult::Clean {
            statements: statements.len(),
        })
    } else {
        Ok(CheckResult::Unresolved(
            unresolved.into_iter().cloned().collect(),
        ))
    }
}
