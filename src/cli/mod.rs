//! CLI support for stone-lang
//!
//! Provides programmatic access to the `stone` subcommands so they can be
//! embedded in other tools and tested without spawning a process.

mod ast;
mod check;
mod docs;
mod repl;
mod run;

pub use ast::{AstFormat, AstOptions, execute_ast};
pub use check::{CheckResult, execute_check};
pub use docs::{DocCategory, get_doc_category, get_docs_overview};
pub use repl::{Feed, Repl};
pub use run::{RunOptions, execute_run};

use std::io;

use thiserror::Error;

/// Errors that can occur during CLI operations
#[derive(Debug, Error)]
pub enum CliError {
    /// Parser error
    #[error("Parse error: {0}")]
    Parse(#[from] crate::ParseError),

    /// Evaluation error
    #[error("Evaluation error: {0}")]
    Eval(#[from] crate::EvalError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// No input provided
    #[error("No input provided. Pass a file or pipe Stone source to stdin.")]
    NoInput,

    /// Unknown `ast` output format
    #[error("Unknown format: '{0}'. Use tree, source or json.")]
    UnknownFormat(String),

    /// Unknown documentation category
    #[error("Unknown category: '{0}'\nRun 'stone docs' to see available categories.")]
    UnknownCategory(String),
}

impl From<crate::Error> for CliError {
    fn from(e: crate::Error) -> Self {
        match e {
            crate::Error::Parse(e) => CliError::Parse(e),
            crate::Error::Eval(e) => CliError::Eval(e),
        }
    }
}
