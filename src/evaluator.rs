use std::rc::Rc;
use std::str::FromStr;

use log::debug;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::{
    ast::{BinOp, LeafKind, ListKind, Node, Token},
    environment::Environment,
    error::Error,
    grammar::GrammarLevel,
    lexer::Lexer,
    limits::{DepthGuard, EVAL_DEPTH, MAX_EVAL_DEPTH},
    parser::Parser,
    value::{Function, Value},
};

/// Errors that can occur while evaluating a tree.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Reference to a name bound in no enclosing scope
    #[error("undefined name: {name}{}", at(.line))]
    UndefinedName { name: String, line: Option<usize> },

    /// Left side of `=` is not a name
    #[error("bad assignment{}", at(.line))]
    BadAssignment { line: Option<usize> },

    /// Operator applied to values it does not accept
    #[error("bad type for {op}: {found}{}", at(.line))]
    BadType {
        op: String,
        found: String,
        line: Option<usize>,
    },

    /// Operator token the evaluator does not know
    #[error("bad operator: {op}{}", at(.line))]
    BadOperator { op: String, line: Option<usize> },

    /// Call with the wrong number of arguments
    #[error("bad number of arguments: expected {expected}, got {got}{}", at(.line))]
    Arity {
        expected: usize,
        got: usize,
        line: Option<usize>,
    },

    /// Call of something other than a function
    #[error("not a function: {found}{}", at(.line))]
    NotAFunction {
        found: &'static str,
        line: Option<usize>,
    },

    /// Division or remainder by zero
    #[error("division by zero{}", at(.line))]
    DivisionByZero { line: Option<usize> },

    /// Result outside the decimal range
    #[error("arithmetic overflow{}", at(.line))]
    Overflow { line: Option<usize> },

    /// Evaluation nested beyond [`MAX_EVAL_DEPTH`](crate::limits::MAX_EVAL_DEPTH)
    #[error("recursion too deep{}", at(.line))]
    TooDeep { line: Option<usize> },

    /// A node that has no value of its own
    #[error("cannot evaluate {kind}{}", at(.line))]
    CannotEvaluate {
        kind: &'static str,
        line: Option<usize>,
    },
}

fn at(line: &Option<usize>) -> String {
    match line {
        Some(line) => format!(" at line {}", line),
        None => String::new(),
    }
}

impl EvalError {
    pub fn line(&self) -> Option<usize> {
        match self {
            EvalError::UndefinedName { line, .. }
            | EvalError::BadAssignment { line }
            | EvalError::BadType { line, .. }
            | EvalError::BadOperator { line, .. }
            | EvalError::Arity { line, .. }
            | EvalError::NotAFunction { line, .. }
            | EvalError::DivisionByZero { line }
            | EvalError::Overflow { line }
            | EvalError::TooDeep { line }
            | EvalError::CannotEvaluate { line, .. } => *line,
        }
    }
}

fn cannot_evaluate(node: &Node) -> EvalError {
    EvalError::CannotEvaluate {
        kind: node.kind_name(),
        line: node.line(),
    }
}

impl Node {
    /// Evaluates this node in `env`. See [`evaluate`].
    pub fn evaluate(&self, env: &Environment) -> Result<Value, EvalError> {
        evaluate(self, env)
    }
}

/// Evaluates `node` in `env`.
///
/// Statements have values too: a block yields its last statement, `if` the
/// branch taken (or 0), `while` its last iteration (or 0), `def` the name it
/// bound.
pub fn evaluate(node: &Node, env: &Environment) -> Result<Value, EvalError> {
    let _depth = DepthGuard::enter(&EVAL_DEPTH, MAX_EVAL_DEPTH)
        .ok_or_else(|| EvalError::TooDeep { line: node.line() })?;
    match node {
        Node::Leaf { kind, token } => eval_leaf(*kind, token, node, env),
        Node::List { kind, .. } => match kind {
            ListKind::Binary => eval_binary(node, env),
            ListKind::Negative => eval_negative(node, env),
            ListKind::Primary => eval_primary(node, env),
            ListKind::Block => eval_block(node, env),
            ListKind::If => eval_if(node, env),
            ListKind::While => eval_while(node, env),
            ListKind::Null => Ok(Value::Unit),
            ListKind::Def => eval_def(node, env),
            ListKind::Closure => eval_closure(node, env),
            ListKind::List | ListKind::ParameterList | ListKind::Arguments => {
                Err(cannot_evaluate(node))
            }
        },
    }
}

fn eval_leaf(
    kind: LeafKind,
    token: &Token,
    node: &Node,
    env: &Environment,
) -> Result<Value, EvalError> {
    match kind {
        LeafKind::Number => token
            .value()
            .map(Value::Number)
            .ok_or_else(|| cannot_evaluate(node)),
        LeafKind::String => Ok(Value::String(token.text().to_string())),
        LeafKind::Name => env.get(token.text()).ok_or_else(|| EvalError::UndefinedName {
            name: token.text().to_string(),
            line: Some(token.line()),
        }),
        LeafKind::Token => Err(cannot_evaluate(node)),
    }
}

fn operand(node: &Node, i: usize) -> Result<&Node, EvalError> {
    node.child(i).ok_or_else(|| cannot_evaluate(node))
}

fn eval_binary(node: &Node, env: &Environment) -> Result<Value, EvalError> {
    let left = operand(node, 0)?;
    let symbol = operand(node, 1)?
        .token()
        .map(|t| t.text())
        .ok_or_else(|| cannot_evaluate(node))?;
    let right = operand(node, 2)?;
    let line = node.line();

    let op = BinOp::from_symbol(symbol).ok_or_else(|| EvalError::BadOperator {
        op: symbol.to_string(),
        line,
    })?;

    if op == BinOp::Assign {
        let name = left.as_name().ok_or(EvalError::BadAssignment { line })?;
        let value = evaluate(right, env)?;
        env.put(name, value.clone());
        return Ok(value);
    }

    let left = evaluate(left, env)?;
    let right = evaluate(right, env)?;
    apply_binop(op, left, right, line)
}

fn apply_binop(
    op: BinOp,
    left: Value,
    right: Value,
    line: Option<usize>,
) -> Result<Value, EvalError> {
    match op {
        BinOp::Equal => return Ok(Value::bool(loose_eq(&left, &right))),
        BinOp::Add => {
            if !matches!((&left, &right), (Value::Number(_), Value::Number(_))) {
                return Ok(Value::String(format!("{}{}", left, right)));
            }
        }
        _ => {}
    }

    let (a, b) = match (&left, &right) {
        (Value::Number(a), Value::Number(b)) => (*a, *b),
        _ => {
            return Err(EvalError::BadType {
                op: op.symbol().to_string(),
                found: format!("{} and {}", left.type_name(), right.type_name()),
                line,
            });
        }
    };

    let overflow = EvalError::Overflow { line };
    let result = match op {
        BinOp::Add => Value::Number(a.checked_add(b).ok_or(overflow)?),
        BinOp::Subtract => Value::Number(a.checked_sub(b).ok_or(overflow)?),
        BinOp::Multiply => Value::Number(a.checked_mul(b).ok_or(overflow)?),
        BinOp::Divide => {
            if b.is_zero() {
                return Err(EvalError::DivisionByZero { line });
            }
            Value::Number(a.checked_div(b).ok_or(overflow)?)
        }
        BinOp::Modulo => {
            if b.is_zero() {
                return Err(EvalError::DivisionByZero { line });
            }
            Value::Number(a.checked_rem(b).ok_or(overflow)?)
        }
        BinOp::NotEqual => Value::bool(a != b),
        BinOp::LessThan => Value::bool(a < b),
        BinOp::GreaterThan => Value::bool(a > b),
        BinOp::LessEqual => Value::bool(a <= b),
        BinOp::GreaterEqual => Value::bool(a >= b),
        BinOp::Equal => Value::bool(a == b),
        BinOp::Assign => return Err(EvalError::BadAssignment { line }),
    };
    Ok(result)
}

/// `==` compares across types: a numeric string equals the number it spells.
fn loose_eq(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            Decimal::from_str(s.trim()).is_ok_and(|parsed| parsed == *n)
        }
        _ => left == right,
    }
}

fn eval_negative(node: &Node, env: &Environment) -> Result<Value, EvalError> {
    match evaluate(operand(node, 0)?, env)? {
        Value::Number(n) => Ok(Value::Number(-n)),
        other => Err(EvalError::BadType {
            op: "-".to_string(),
            found: other.type_name().to_string(),
            line: node.line(),
        }),
    }
}

fn eval_primary(node: &Node, env: &Environment) -> Result<Value, EvalError> {
    let mut children = node.children();
    let mut value = match children.next() {
        Some(operand) => evaluate(operand, env)?,
        None => return Err(cannot_evaluate(node)),
    };
    for postfix in children {
        if !postfix.is(ListKind::Arguments) {
            return Err(cannot_evaluate(postfix));
        }
        value = call(value, postfix, env, node.line())?;
    }
    Ok(value)
}

/// Calls `callee` with `args` evaluated in the caller's `env`. The body runs
/// in a new scope nested inside the function's defining scope.
fn call(
    callee: Value,
    args: &Node,
    env: &Environment,
    line: Option<usize>,
) -> Result<Value, EvalError> {
    let function = match callee {
        Value::Function(function) => function,
        other => {
            return Err(EvalError::NotAFunction {
                found: other.type_name(),
                line,
            });
        }
    };
    if args.child_count() != function.arity() {
        return Err(EvalError::Arity {
            expected: function.arity(),
            got: args.child_count(),
            line,
        });
    }

    let scope = Environment::nested(&function.env);
    for (param, arg) in function.param_names().zip(args.children()) {
        let value = evaluate(arg, env)?;
        scope.put_new(param, value);
    }
    debug!("calling {} in a new scope", function);
    evaluate(&function.body, &scope)
}

fn eval_block(node: &Node, env: &Environment) -> Result<Value, EvalError> {
    let mut result = Value::number(0);
    for statement in node.children() {
        if !statement.is(ListKind::Null) {
            result = evaluate(statement, env)?;
        }
    }
    Ok(result)
}

fn eval_if(node: &Node, env: &Environment) -> Result<Value, EvalError> {
    let condition = evaluate(operand(node, 0)?, env)?;
    if condition.is_truthy() {
        evaluate(operand(node, 1)?, env)
    } else {
        match node.child(2) {
            Some(otherwise) => evaluate(otherwise, env),
            None => Ok(Value::number(0)),
        }
    }
}

fn eval_while(node: &Node, env: &Environment) -> Result<Value, EvalError> {
    let condition = operand(node, 0)?;
    let body = operand(node, 1)?;
    let mut result = Value::number(0);
    while evaluate(condition, env)?.is_truthy() {
        result = evaluate(body, env)?;
    }
    Ok(result)
}

fn eval_def(node: &Node, env: &Environment) -> Result<Value, EvalError> {
    let name = operand(node, 0)?
        .token()
        .map(|t| t.text().to_string())
        .ok_or_else(|| cannot_evaluate(node))?;
    let params = node.child_rc(1).ok_or_else(|| cannot_evaluate(node))?;
    let body = node.child_rc(2).ok_or_else(|| cannot_evaluate(node))?;

    let function = Function::new(Some(name.clone()), params.clone(), body.clone(), env.clone());
    debug!("defined {}", function);
    env.put_new(&name, Value::Function(Rc::new(function)));
    Ok(Value::String(name))
}

fn eval_closure(node: &Node, env: &Environment) -> Result<Value, EvalError> {
    let params = node.child_rc(0).ok_or_else(|| cannot_evaluate(node))?;
    let body = node.child_rc(1).ok_or_else(|| cannot_evaluate(node))?;
    let function = Function::new(None, params.clone(), body.clone(), env.clone());
    Ok(Value::Function(Rc::new(function)))
}

/// Runs Stone source against a persistent global environment.
///
/// # Examples
///
/// ```
/// use stone_lang::{Evaluator, Value};
///
/// let mut evaluator = Evaluator::new();
/// let values = evaluator
///     .eval_source("def inc(n) { n + 1 }\ninc(41)")
///     .unwrap();
/// assert_eq!(values.last(), Some(&Value::number(42)));
/// ```
#[derive(Debug, Default)]
pub struct Evaluator {
    env: Environment,
    level: GrammarLevel,
}

impl Evaluator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_level(level: GrammarLevel) -> Self {
        Evaluator {
            env: Environment::new(),
            level,
        }
    }

    /// The global scope; bindings persist across calls.
    pub fn environment(&self) -> &Environment {
        &self.env
    }

    pub fn level(&self) -> GrammarLevel {
        self.level
    }

    /// Parses and evaluates `source` statement by statement and returns the
    /// value of every non-empty statement.
    ///
    /// Statements before a failing one keep their effects.
    pub fn eval_source(&mut self, source: &str) -> Result<Vec<Value>, Error> {
        let mut parser = Parser::with_level(Lexer::new(source), self.level);
        let mut values = Vec::new();
        while !parser.at_end()? {
            let statement = parser.parse_statement()?;
            if statement.is(ListKind::Null) {
                continue;
            }
            debug!("evaluating {}", statement);
            values.push(self.eval_node(&statement)?);
        }
        Ok(values)
    }

    pub fn eval_node(&mut self, node: &Node) -> Result<Value, EvalError> {
        evaluate(node, &self.env)
    }
}
