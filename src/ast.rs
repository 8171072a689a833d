//! # Stone - Abstract Syntax Tree
//!
//! Stone trees have only two shapes:
//!
//! - **Leaf** nodes own exactly one [`Token`]: literals, names, and tokens
//!   kept verbatim such as operators.
//! - **List** nodes own an ordered, fixed sequence of children.
//!
//! A [`LeafKind`] or [`ListKind`] refines the shape into the node types the
//! evaluator understands:
//!
//! ```text
//! x = 1 + 2 * 3
//! ```
//!
//! parses to
//!
//! ```text
//! (x = (1 + (2 * 3)))
//! ```
//!
//! a `BinaryExpr` whose right child is another `BinaryExpr`. The grammar
//! decides the kind of every node it builds, so the evaluator never inspects
//! a tree's shape to guess what it is.
//!
//! ## Submodules
//!
//! - **[tokens]** - Lexical tokens
//! - **[node]** - Tree nodes and their kinds
//! - **[operators]** - Binary operators
//! - **[source]** - Rendering trees back into Stone source
pub mod node;
pub mod operators;
pub mod source;
pub mod tokens;

pub use node::{LeafKind, ListKind, Node};
pub use operators::BinOp;
pub use tokens::{EOL, Token, TokenKind};
