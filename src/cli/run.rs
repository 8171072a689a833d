//! Run Stone programs

use super::CliError;
use crate::{Evaluator, GrammarLevel, output::value_to_json};

/// Options for the run command
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Stone source text
    pub source: String,
    /// Print the statement values as a JSON array
    pub json: bool,
    /// Language features to accept
    pub level: GrammarLevel,
}

/// Runs a program and renders the value of every statement, one per line,
/// or as a single JSON array.
pub fn execute_run(options: &RunOptions) -> Result<String, CliError> {
    let mut evaluator = Evaluator::with_level(options.level);
    let values = evaluator.eval_source(&options.source)?;

    if options.json {
        let array: Vec<_> = values.iter().map(value_to_json).collect();
        return Ok(serde_json::Value::Array(array).to_string());
    }

    Ok(values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join("\n"))
}
