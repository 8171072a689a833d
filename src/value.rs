use std::fmt;
use std::rc::Rc;

use rust_decimal::Decimal;

use crate::ast::Node;
use crate::environment::Environment;

/// A runtime value of the Stone language.
///
/// # Examples
///
/// ```
/// use rust_decimal::Decimal;
/// use stone_lang::Value;
///
/// let seven = Value::Number(Decimal::from(7));
/// let greeting = Value::String("hello".to_string());
///
/// assert!(seven.is_truthy());
/// assert_eq!(greeting.to_string(), "hello");
/// ```
#[derive(Debug, Clone)]
pub enum Value {
    /// Decimal number; integer literals stay exact under arithmetic
    Number(Decimal),

    /// UTF-8 string
    String(String),

    /// A function together with the scope it was defined in
    Function(Rc<Function>),

    /// Result of an empty statement
    Unit,
}

impl Value {
    pub fn number(n: impl Into<Decimal>) -> Self {
        Value::Number(n.into())
    }

    pub fn bool(b: bool) -> Self {
        Value::Number(if b { Decimal::ONE } else { Decimal::ZERO })
    }

    /// Check if the value is truthy (for conditions).
    ///
    /// Only the number zero is false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Number(n) => !n.is_zero(),
            _ => true,
        }
    }

    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Rc<Function>> {
        match self {
            Value::Function(function) => Some(function),
            _ => None,
        }
    }

    /// Returns a human-readable type name.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Function(_) => "function",
            Value::Unit => "unit",
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::Unit, Value::Unit) => true,
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "{}", n.normalize()),
            Value::String(s) => write!(f, "{}", s),
            Value::Function(function) => write!(f, "{}", function),
            Value::Unit => write!(f, "()"),
        }
    }
}

impl From<Decimal> for Value {
    fn from(n: Decimal) -> Self {
        Value::Number(n)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(Decimal::from(n))
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

/// A user-defined function or closure.
pub struct Function {
    /// `None` for closures
    pub name: Option<String>,
    /// A `ParameterList` node
    pub params: Rc<Node>,
    /// A `BlockStmnt` node
    pub body: Rc<Node>,
    /// The scope the function was defined in
    pub env: Environment,
}

impl Function {
    pub fn new(name: Option<String>, params: Rc<Node>, body: Rc<Node>, env: Environment) -> Self {
        Function {
            name,
            params,
            body,
            env,
        }
    }

    pub fn arity(&self) -> usize {
        self.params.child_count()
    }

    /// Parameter names in declaration order.
    pub fn param_names(&self) -> impl Iterator<Item = &str> {
        self.params
            .children()
            .filter_map(|param| param.token().map(|t| t.text()))
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params = self.param_names().collect::<Vec<_>>().join(", ");
        match &self.name {
            Some(name) => write!(f, "<fun {}({})>", name, params),
            None => write!(f, "<fun ({})>", params),
        }
    }
}

// The captured environment may contain this function.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("arity", &self.arity())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{LeafKind, ListKind, Token};

    #[test]
    fn test_only_zero_is_false() {
        assert!(!Value::number(0).is_truthy());
        assert!(Value::number(-1).is_truthy());
        assert!(Value::from("").is_truthy());
        assert!(Value::Unit.is_truthy());
    }

    #[test]
    fn test_number_display_is_normalized() {
        let half = Decimal::new(150, 2);
        assert_eq!(Value::Number(half).to_string(), "1.5");
        assert_eq!(Value::Number(Decimal::new(200, 2)).to_string(), "2");
    }

    #[test]
    fn test_function_display_and_equality() {
        let params = Rc::new(ListKind::ParameterList.build(vec![
            Node::leaf(LeafKind::Name, Token::identifier(1, "a")),
            Node::leaf(LeafKind::Name, Token::identifier(1, "b")),
        ]));
        let body = Rc::new(ListKind::Block.build(vec![]));
        let f = Rc::new(Function::new(
            Some("add".to_string()),
            params.clone(),
            body.clone(),
            Environment::new(),
        ));
        let g = Rc::new(Function::new(None, params.clone(), body.clone(), Environment::new()));
        let same_shape = Rc::new(Function::new(None, params, body, Environment::new()));

        assert_eq!(Value::Function(f.clone()).to_string(), "<fun add(a, b)>");
        assert_eq!(Value::Function(g.clone()).to_string(), "<fun (a, b)>");
        assert_eq!(Value::Function(f.clone()), Value::Function(f));
        assert_ne!(Value::Function(g), Value::Function(same_shape));
    }
}
