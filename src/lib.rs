//! # Stone
//!
//! A small dynamically typed scripting language: a combinator-built
//! recursive-descent parser with precedence climbing for binary operators,
//! and a tree-walking evaluator with lexical closures.
//!
//! ```
//! use stone_lang::{Evaluator, Value};
//!
//! let source = r#"
//! def counter() {
//!     n = 0
//!     fun () { n = n + 1 }
//! }
//! c = counter()
//! c()
//! c()
//! "#;
//!
//! let values = Evaluator::new().eval_source(source).unwrap();
//! assert_eq!(values.last(), Some(&Value::number(2)));
//! ```
pub mod ast;
pub mod cli;
pub mod environment;
pub mod error;
pub mod evaluator;
pub mod grammar;
pub mod lexer;
pub mod limits;
pub mod output;
pub mod parser;
pub mod symbols;
pub mod value;

pub use ast::{BinOp, LeafKind, ListKind, Node, Token, TokenKind};
pub use environment::Environment;
pub use error::Error;
pub use evaluator::{EvalError, Evaluator, evaluate};
pub use grammar::{GrammarLevel, Rule, StoneGrammar};
pub use lexer::{LexError, Lexer, TokenStream};
pub use output::{to_json, to_json_pretty};
pub use parser::{ParseError, Parser};
pub use symbols::{Reference, Symbols};
pub use value::{Function, Value};
