//! Operator precedence climbing.

use std::collections::HashMap;

use log::trace;

use crate::ast::{LeafKind, ListKind, Node, TokenKind};
use crate::grammar::Rule;
use crate::lexer::TokenStream;
use crate::parser::ParseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
}

/// Binding strength of one binary operator. Higher values bind tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Precedence {
    pub value: u32,
    pub assoc: Assoc,
}

impl Precedence {
    pub fn new(value: u32, assoc: Assoc) -> Self {
        Precedence { value, assoc }
    }

    /// Whether an operator of precedence `next`, following an operator of
    /// this precedence, takes the operand between them.
    pub fn yields_to(self, next: Precedence) -> bool {
        next.value > self.value || (next.value == self.value && self.assoc == Assoc::Right)
    }
}

/// Table of binary operators keyed by their token text.
#[derive(Debug, Clone, Default)]
pub struct Operators {
    table: HashMap<String, Precedence>,
}

impl Operators {
    pub fn new() -> Self {
        Operators::default()
    }

    /// The Stone operators.
    ///
    /// | operators                   | value | assoc |
    /// |-----------------------------|-------|-------|
    /// | `=`                         | 1     | right |
    /// | `==` `!=` `<` `<=` `>` `>=` | 2     | left  |
    /// | `+` `-`                     | 3     | left  |
    /// | `*` `/` `%`                 | 4     | left  |
    pub fn stone() -> Self {
        let mut operators = Operators::new();
        operators.add("=", 1, Assoc::Right);
        for op in ["==", "!=", "<", "<=", ">", ">="] {
            operators.add(op, 2, Assoc::Left);
        }
        operators.add("+", 3, Assoc::Left);
        operators.add("-", 3, Assoc::Left);
        operators.add("*", 4, Assoc::Left);
        operators.add("/", 4, Assoc::Left);
        operators.add("%", 4, Assoc::Left);
        operators
    }

    pub fn add(&mut self, op: &str, value: u32, assoc: Assoc) -> &mut Self {
        self.table
            .insert(op.to_string(), Precedence::new(value, assoc));
        self
    }

    pub fn get(&self, op: &str) -> Option<Precedence> {
        self.table.get(op).copied()
    }

    pub fn contains(&self, op: &str) -> bool {
        self.table.contains_key(op)
    }
}

/// Grammar element parsing `factor { op factor }`.
#[derive(Debug)]
pub(crate) struct OperatorExpr {
    factor: Rule,
    operators: Operators,
    kind: ListKind,
}

impl OperatorExpr {
    pub(crate) fn new(factor: Rule, operators: Operators, kind: ListKind) -> Self {
        OperatorExpr {
            factor,
            operators,
            kind,
        }
    }

    pub(crate) fn matches(&self, stream: &mut dyn TokenStream) -> Result<bool, ParseError> {
        self.factor.matches(stream)
    }

    pub(crate) fn parse(&self, stream: &mut dyn TokenStream) -> Result<Node, ParseError> {
        let mut right = self.factor.parse(stream)?;
        while let Some(prec) = self.next_operator(stream)? {
            right = self.shift(stream, right, prec)?;
        }
        Ok(right)
    }

    fn shift(
        &self,
        stream: &mut dyn TokenStream,
        left: Node,
        prec: Precedence,
    ) -> Result<Node, ParseError> {
        let op = stream.read()?;
        trace!("shift {} at line {}", op, op.line());
        let op = Node::leaf(LeafKind::Token, op);
        let mut right = self.factor.parse(stream)?;
        while let Some(next) = self.next_operator(stream)? {
            if !prec.yields_to(next) {
                break;
            }
            right = self.shift(stream, right, next)?;
        }
        Ok(self.kind.build(vec![left, op, right]))
    }

    fn next_operator(&self, stream: &mut dyn TokenStream) -> Result<Option<Precedence>, ParseError> {
        let token = stream.peek(0)?;
        if token.kind() == TokenKind::Identifier {
            Ok(self.operators.get(token.text()))
        } else {
            Ok(None)
        }
    }
}
