//! Print the syntax tree of Stone programs

use super::CliError;
use crate::{
    GrammarLevel, Lexer, Parser,
    ast::source::program_to_source,
    output::node_to_json,
};

/// How `stone ast` renders trees
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AstFormat {
    /// Parenthesized tree form, one statement per line
    #[default]
    Tree,
    /// Stone source with every binary expression parenthesized
    Source,
    /// A JSON array of node objects
    Json,
}

impl AstFormat {
    /// Parse format name from string
    pub fn from_name(name: &str) -> Result<Self, CliError> {
        match name.to_lowercase().as_str() {
            "tree" | "sexp" => Ok(Self::Tree),
            "source" | "src" => Ok(Self::Source),
            "json" => Ok(Self::Json),
            _ => Err(CliError::UnknownFormat(name.to_string())),
        }
    }
}

/// Options for the ast command
#[derive(Debug, Clone, Default)]
pub struct AstOptions {
    /// Stone source text
    pub source: String,
    pub format: AstFormat,
    /// Pretty-print JSON output
    pub pretty: bool,
    /// Language features to accept
    pub level: GrammarLevel,
}

pub fn execute_ast(options: &AstOptions) -> Result<String, CliError> {
    let mut parser = Parser::with_level(Lexer::new(&options.source), options.level);
    let statements = parser.parse_program()?;

    let rendered = match options.format {
        AstFormat::Tree => statements
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>()
            .join("\n"),
        AstFormat::Source => program_to_source(&statements),
        AstFormat::Json => {
            let array = serde_json::Value::Array(statements.iter().map(node_to_json).collect());
            if options.pretty {
                format!("{:#}", array)
            } else {
                array.to_string()
            }
        }
    };
    Ok(rendered)
}
