use std::fmt;
use std::rc::Rc;

use crate::ast::Token;

/// Semantic kind of a leaf node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LeafKind {
    /// A token kept as-is, such as an operator or a def name
    Token,
    /// Number literal
    Number,
    /// String literal
    String,
    /// Variable or function name
    Name,
}

/// Semantic kind of a list node.
///
/// The kind fixes the arity of the node; the grammar guarantees it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListKind {
    /// Generic list produced by rules without a node kind
    List,
    /// Operand followed by one or more postfixes (`f(1)(2)`)
    Primary,
    /// `- operand`
    Negative,
    /// `left op right`, the operator kept as a token leaf
    Binary,
    /// `{ statement ... }`
    Block,
    /// `if cond block [else block]`
    If,
    /// `while cond block`
    While,
    /// Empty statement
    Null,
    /// `(a, b)` in a function definition
    ParameterList,
    /// `def name(params) block`
    Def,
    /// `(x, y)` in a call
    Arguments,
    /// `fun (params) block`
    Closure,
}

impl ListKind {
    /// Builds a node of this kind from the children a rule accumulated.
    ///
    /// A primary expression without postfixes is just its operand.
    pub fn build(self, mut children: Vec<Node>) -> Node {
        if self == ListKind::Primary && children.len() == 1 {
            if let Some(operand) = children.pop() {
                return operand;
            }
        }
        Node::List {
            kind: self,
            children: children.into_iter().map(Rc::new).collect(),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ListKind::List => "List",
            ListKind::Primary => "PrimaryExpr",
            ListKind::Negative => "NegativeExpr",
            ListKind::Binary => "BinaryExpr",
            ListKind::Block => "BlockStmnt",
            ListKind::If => "IfStmnt",
            ListKind::While => "WhileStmnt",
            ListKind::Null => "NullStmnt",
            ListKind::ParameterList => "ParameterList",
            ListKind::Def => "DefStmnt",
            ListKind::Arguments => "Arguments",
            ListKind::Closure => "Closure",
        }
    }
}

impl LeafKind {
    pub fn name(self) -> &'static str {
        match self {
            LeafKind::Token => "Leaf",
            LeafKind::Number => "NumberLiteral",
            LeafKind::String => "StringLiteral",
            LeafKind::Name => "Name",
        }
    }
}

/// A node of the abstract syntax tree.
///
/// Trees are immutable and acyclic. Children sit behind `Rc` so a function
/// value can share its parameter list and body with the tree it came from.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Leaf { kind: LeafKind, token: Token },
    List { kind: ListKind, children: Vec<Rc<Node>> },
}

impl Node {
    pub fn leaf(kind: LeafKind, token: Token) -> Self {
        Node::Leaf { kind, token }
    }

    /// Generic list of `children`, the fallback for rules with no node kind.
    pub fn list(children: Vec<Node>) -> Self {
        Node::List {
            kind: ListKind::List,
            children: children.into_iter().map(Rc::new).collect(),
        }
    }

    pub fn child(&self, i: usize) -> Option<&Node> {
        self.child_rc(i).map(Rc::as_ref)
    }

    pub fn child_rc(&self, i: usize) -> Option<&Rc<Node>> {
        match self {
            Node::Leaf { .. } => None,
            Node::List { children, .. } => children.get(i),
        }
    }

    pub fn child_count(&self) -> usize {
        match self {
            Node::Leaf { .. } => 0,
            Node::List { children, .. } => children.len(),
        }
    }

    pub fn children(&self) -> impl Iterator<Item = &Node> {
        let children: &[Rc<Node>] = match self {
            Node::Leaf { .. } => &[],
            Node::List { children, .. } => children,
        };
        children.iter().map(Rc::as_ref)
    }

    pub fn token(&self) -> Option<&Token> {
        match self {
            Node::Leaf { token, .. } => Some(token),
            Node::List { .. } => None,
        }
    }

    pub fn leaf_kind(&self) -> Option<LeafKind> {
        match self {
            Node::Leaf { kind, .. } => Some(*kind),
            Node::List { .. } => None,
        }
    }

    pub fn list_kind(&self) -> Option<ListKind> {
        match self {
            Node::Leaf { .. } => None,
            Node::List { kind, .. } => Some(*kind),
        }
    }

    pub fn is(&self, kind: ListKind) -> bool {
        self.list_kind() == Some(kind)
    }

    /// Generic list with no children; repetitions never keep these.
    pub fn is_vacuous(&self) -> bool {
        self.is(ListKind::List) && self.child_count() == 0
    }

    /// The identifier of a `Name` leaf.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Node::Leaf {
                kind: LeafKind::Name,
                token,
            } => Some(token.text()),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Node::Leaf { kind, .. } => kind.name(),
            Node::List { kind, .. } => kind.name(),
        }
    }

    /// Line of the first token under this node.
    pub fn line(&self) -> Option<usize> {
        match self {
            Node::Leaf { token, .. } if token.is_eof() => None,
            Node::Leaf { token, .. } => Some(token.line()),
            Node::List { children, .. } => children.iter().find_map(|c| c.line()),
        }
    }

    /// Human readable source location, e.g. `at line 3`.
    pub fn location(&self) -> Option<String> {
        self.line().map(|line| format!("at line {}", line))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Leaf {
                kind: LeafKind::String,
                token,
            } => write!(f, "{:?}", token.text()),
            Node::Leaf { token, .. } => write!(f, "{}", token),
            Node::List { children, .. } => {
                write!(f, "(")?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        write!(f, " ")?;
                    }
                    write!(f, "{}", child)?;
                }
                write!(f, ")")
            }
        }
    }
}
