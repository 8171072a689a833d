//! Static name resolution.
//!
//! [`Node::lookup`] walks a tree before it runs and records which names each
//! scope binds and which names it reads. At the top level a read of a name
//! that no earlier statement bound is reported. A function body runs later,
//! so the names it reads but does not bind itself are handed to the enclosing
//! scope and only reported if that scope never binds them.

use std::collections::HashSet;
use std::fmt;

use crate::ast::{BinOp, LeafKind, ListKind, Node};

/// A read of a name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    pub line: Option<usize>,
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} at line {}", self.name, line),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Names bound and read in one scope.
#[derive(Debug, Default)]
pub struct Symbols {
    bound: HashSet<String>,
    free: Vec<Reference>,
    deferred: Vec<Reference>,
}

impl Symbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn define(&mut self, name: &str) {
        self.bound.insert(name.to_string());
    }

    pub fn is_bound(&self, name: &str) -> bool {
        self.bound.contains(name)
    }

    /// Records a read of `name`.
    pub fn reference(&mut self, name: &str, line: Option<usize>) {
        if !self.is_bound(name) {
            self.free.push(Reference {
                name: name.to_string(),
                line,
            });
        }
    }

    /// Names bound in this scope, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.bound.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Reads that did not resolve: those made before the name was bound, and
    /// those from function bodies naming something this scope never binds.
    pub fn unresolved(&self) -> Vec<&Reference> {
        self.free
            .iter()
            .chain(self.deferred.iter().filter(|r| !self.is_bound(&r.name)))
            .collect()
    }

    /// Everything this scope reads but cannot answer, for its enclosing scope.
    fn into_outer(self) -> Vec<Reference> {
        let bound = self.bound;
        self.free
            .into_iter()
            .chain(self.deferred.into_iter().filter(|r| !bound.contains(&r.name)))
            .collect()
    }
}

impl Node {
    /// Records the names this tree binds and reads into `symbols`.
    pub fn lookup(&self, symbols: &mut Symbols) {
        match self {
            Node::Leaf {
                kind: LeafKind::Name,
                token,
            } => symbols.reference(token.text(), Some(token.line())),
            Node::Leaf { .. } => {}
            Node::List {
                kind: ListKind::Binary,
                ..
            } => lookup_binary(self, symbols),
            Node::List {
                kind: ListKind::Def,
                ..
            } => {
                if let Some(name) = self.child(0).and_then(Node::token) {
                    symbols.define(name.text());
                }
                lookup_function(self.child(1), self.child(2), symbols);
            }
            Node::List {
                kind: ListKind::Closure,
                ..
            } => lookup_function(self.child(0), self.child(1), symbols),
            Node::List { .. } => {
                for child in self.children() {
                    child.lookup(symbols);
                }
            }
        }
    }
}

fn lookup_binary(node: &Node, symbols: &mut Symbols) {
    let is_assign = node
        .child(1)
        .and_then(Node::token)
        .and_then(|op| BinOp::from_symbol(op.text()))
        == Some(BinOp::Assign);
    let target = node.child(0).and_then(Node::as_name);

    match (is_assign, target) {
        (true, Some(name)) => {
            if let Some(value) = node.child(2) {
                value.lookup(symbols);
            }
            symbols.define(name);
        }
        _ => {
            for child in node.children() {
                child.lookup(symbols);
            }
        }
    }
}

fn lookup_function(params: Option<&Node>, body: Option<&Node>, symbols: &mut Symbols) {
    let mut inner = Symbols::new();
    for param in params.into_iter().flat_map(Node::children) {
        if let Some(token) = param.token() {
            inner.define(token.text());
        }
    }
    if let Some(body) = body {
        body.lookup(&mut inner);
    }
    symbols.deferred.extend(inner.into_outer());
}
