//! Renders trees back into Stone source.
//!
//! Comments and layout are lost and every binary expression is fully
//! parenthesized, but re-parsing the output yields a tree that evaluates the
//! same way as the original.

use crate::ast::{LeafKind, ListKind, Node};

/// Stone source for a single node.
pub fn to_source(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node);
    out
}

/// Stone source for a sequence of top-level statements, one per line.
pub fn program_to_source<'a>(statements: impl IntoIterator<Item = &'a Node>) -> String {
    statements
        .into_iter()
        .filter(|node| !node.is(ListKind::Null))
        .map(to_source)
        .collect::<Vec<_>>()
        .join("\n")
}

fn write_node(out: &mut String, node: &Node) {
    match node {
        Node::Leaf {
            kind: LeafKind::String,
            token,
        } => write_string(out, token.text()),
        Node::Leaf { token, .. } => out.push_str(token.text()),
        Node::List { kind, .. } => match kind {
            ListKind::Binary => {
                out.push('(');
                write_separated(out, node.children(), " ");
                out.push(')');
            }
            ListKind::Negative => {
                out.push('-');
                if let Some(operand) = node.child(0) {
                    write_operand(out, operand);
                }
            }
            ListKind::Primary => {
                let mut children = node.children();
                if let Some(operand) = children.next() {
                    write_operand(out, operand);
                }
                for postfix in children {
                    write_node(out, postfix);
                }
            }
            ListKind::Arguments | ListKind::ParameterList => {
                out.push('(');
                write_separated(out, node.children(), ", ");
                out.push(')');
            }
            ListKind::Block => {
                if node.child_count() == 0 {
                    out.push_str("{}");
                } else {
                    out.push_str("{ ");
                    write_separated(
                        out,
                        node.children().filter(|c| !c.is(ListKind::Null)),
                        "; ",
                    );
                    out.push_str(" }");
                }
            }
            ListKind::If => {
                out.push_str("if ");
                write_separated(out, node.children().take(2), " ");
                if let Some(otherwise) = node.child(2) {
                    out.push_str(" else ");
                    write_node(out, otherwise);
                }
            }
            ListKind::While => {
                out.push_str("while ");
                write_separated(out, node.children(), " ");
            }
            ListKind::Def => {
                out.push_str("def ");
                let mut children = node.children();
                if let Some(name) = children.next() {
                    write_node(out, name);
                }
                if let Some(params) = children.next() {
                    write_node(out, params);
                }
                for body in children {
                    out.push(' ');
                    write_node(out, body);
                }
            }
            ListKind::Closure => {
                out.push_str("fun ");
                write_separated(out, node.children(), " ");
            }
            ListKind::Null => {}
            ListKind::List => write_separated(out, node.children(), " "),
        },
    }
}

/// Operands of `-` and of postfix calls must be primaries.
fn write_operand(out: &mut String, node: &Node) {
    let bare = match node {
        Node::Leaf { .. } => true,
        Node::List { kind, .. } => matches!(kind, ListKind::Binary | ListKind::Primary),
    };
    if bare {
        write_node(out, node);
    } else {
        out.push('(');
        write_node(out, node);
        out.push(')');
    }
}

fn write_separated<'a>(out: &mut String, nodes: impl Iterator<Item = &'a Node>, sep: &str) {
    for (i, node) in nodes.enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        write_node(out, node);
    }
}

fn write_string(out: &mut String, text: &str) {
    out.push('"');
    for ch in text.chars() {
        match ch {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}
