//! JSON output for Stone values and syntax trees.
//!
//! Built on `serde_json`:
//!
//! - **Values** via [`value_to_json()`]: numbers become JSON numbers (whole
//!   numbers as integers), strings stay strings, functions print as their
//!   display form and the unit value is `null`.
//! - **Trees** via [`node_to_json()`]: every node is an object with a `kind`;
//!   leaves add `text` and `line`, lists add `children`.
//!
//! # Examples
//!
//! ```
//! use stone_lang::Value;
//! use stone_lang::output::{to_json, to_json_pretty};
//!
//! let value = Value::number(42);
//!
//! assert_eq!(to_json(&value), "42");
//! assert_eq!(to_json_pretty(&value), "42");
//! ```

use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde_json::{Map, Number, json};

use crate::ast::Node;
use crate::value::Value;

pub fn value_to_json(value: &Value) -> serde_json::Value {
    match value {
        Value::Number(n) => number_to_json(*n),
        Value::String(s) => serde_json::Value::String(s.clone()),
        Value::Function(function) => serde_json::Value::String(function.to_string()),
        Value::Unit => serde_json::Value::Null,
    }
}

fn number_to_json(n: Decimal) -> serde_json::Value {
    let n = n.normalize();
    if n.scale() == 0 {
        if let Some(i) = n.to_i64() {
            return json!(i);
        }
    }
    n.to_f64()
        .and_then(Number::from_f64)
        .map(serde_json::Value::Number)
        .unwrap_or_else(|| serde_json::Value::String(n.to_string()))
}

pub fn node_to_json(node: &Node) -> serde_json::Value {
    let mut object = Map::new();
    object.insert("kind".to_string(), json!(node.kind_name()));
    match node {
        Node::Leaf { token, .. } => {
            object.insert("text".to_string(), json!(token.text()));
            object.insert("line".to_string(), json!(token.line()));
        }
        Node::List { .. } => {
            let children: Vec<_> = node.children().map(node_to_json).collect();
            object.insert("children".to_string(), serde_json::Value::Array(children));
        }
    }
    serde_json::Value::Object(object)
}

/// Converts a Value to compact JSON.
pub fn to_json(value: &Value) -> String {
    value_to_json(value).to_string()
}

/// Converts a Value to JSON with 2-space indentation.
pub fn to_json_pretty(value: &Value) -> String {
    format!("{:#}", value_to_json(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_expression;

    #[test]
    fn test_numbers() {
        assert_eq!(to_json(&Value::number(7)), "7");
        assert_eq!(to_json(&Value::Number(Decimal::new(350, 2))), "3.5");
        assert_eq!(to_json(&Value::Number(Decimal::new(400, 2))), "4");
    }

    #[test]
    fn test_strings_and_unit() {
        assert_eq!(to_json(&Value::from("a\"b")), r#""a\"b""#);
        assert_eq!(to_json(&Value::Unit), "null");
    }

    #[test]
    fn test_node_to_json() {
        let tree = parse_expression("x + 1").unwrap();
        let json = node_to_json(&tree);
        assert_eq!(json["kind"], "BinaryExpr");
        assert_eq!(json["children"][0]["kind"], "Name");
        assert_eq!(json["children"][0]["text"], "x");
        assert_eq!(json["children"][1]["kind"], "Leaf");
        assert_eq!(json["children"][2]["line"], 1);
    }
}
