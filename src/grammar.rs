//! # Grammar combinators
//!
//! A grammar is a graph of [`Rule`]s built in code rather than generated from
//! a grammar file. Each rule is a sequence of elements: sub-rules,
//! alternations, repetitions, typed tokens, literal separators and
//! precedence-climbing binary expressions. Parsing is recursive descent with
//! one token of lookahead; an alternation takes the first choice whose first
//! element matches the next token.
//!
//! ```
//! use stone_lang::ast::{LeafKind, ListKind};
//! use stone_lang::grammar::{Operators, Rule};
//! use stone_lang::lexer::Lexer;
//!
//! let factor = Rule::new().number(LeafKind::Number);
//! let expr = Rule::new().expression(&factor, Operators::stone(), ListKind::Binary);
//!
//! let tree = expr.parse(&mut Lexer::new("1 + 2 * 3")).unwrap();
//! assert_eq!(tree.to_string(), "(1 + (2 * 3))");
//! ```
//!
//! ## Submodules
//!
//! - **[rule]** - Rules, elements and build policies
//! - **[precedence]** - Operator tables and precedence climbing
//! - **[stone]** - The Stone language grammar
pub mod precedence;
pub mod rule;
pub mod stone;

pub use precedence::{Assoc, Operators, Precedence};
pub use rule::{Build, Rule};
pub use stone::{GrammarLevel, StoneGrammar};
