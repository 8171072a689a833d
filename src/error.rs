use thiserror::Error;

use crate::evaluator::EvalError;
use crate::parser::ParseError;

/// Any error raised while running Stone source.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Eval(#[from] EvalError),
}

impl Error {
    pub fn line(&self) -> Option<usize> {
        match self {
            Error::Parse(e) => e.line(),
            Error::Eval(e) => e.line(),
        }
    }
}
