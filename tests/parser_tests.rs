// tests/parser_tests.rs

use stone_lang::ast::{LeafKind, ListKind, Node};
use stone_lang::grammar::GrammarLevel;
use stone_lang::lexer::Lexer;
use stone_lang::parser::{ParseError, Parser, parse, parse_expression};

fn tree(source: &str) -> String {
    parse_expression(source).unwrap().to_string()
}

fn statement(source: &str) -> Node {
    let mut statements = parse(source).unwrap();
    assert_eq!(statements.len(), 1, "expected one statement in {:?}", source);
    statements.remove(0)
}

// ============================================================================
// Precedence and associativity
// ============================================================================

#[test]
fn test_subtraction_is_left_associative() {
    assert_eq!(tree("1 - 2 - 3"), "((1 - 2) - 3)");
}

#[test]
fn test_assignment_is_right_associative() {
    assert_eq!(tree("a = b = 1"), "(a = (b = 1))");
}

#[test]
fn test_multiplication_binds_tighter() {
    assert_eq!(tree("1 + 2 * 3"), "(1 + (2 * 3))");
    assert_eq!(tree("1 * 2 + 3"), "((1 * 2) + 3)");
}

#[test]
fn test_parentheses() {
    assert_eq!(tree("(1 + 2) * 3"), "((1 + 2) * 3)");
}

#[test]
fn test_mixed_levels() {
    assert_eq!(tree("x = 1 + 2 * 3 == 7"), "(x = ((1 + (2 * 3)) == 7))");
    assert_eq!(tree("a < b == c"), "((a < b) == c)");
    assert_eq!(tree("10 % 4 / 2"), "((10 % 4) / 2)");
}

#[test]
fn test_binary_node_shape() {
    let node = parse_expression("x + 1").unwrap();
    assert!(node.is(ListKind::Binary));
    assert_eq!(node.child_count(), 3);
    assert_eq!(node.child(0).and_then(Node::as_name), Some("x"));
    assert_eq!(node.child(1).and_then(Node::leaf_kind), Some(LeafKind::Token));
    assert_eq!(node.child(2).and_then(Node::leaf_kind), Some(LeafKind::Number));
}

#[test]
fn test_negative() {
    let node = parse_expression("-x + 1").unwrap();
    assert!(node.is(ListKind::Binary));
    assert!(node.child(0).is_some_and(|n| n.is(ListKind::Negative)));
}

// ============================================================================
// Primaries and literals
// ============================================================================

#[test]
fn test_single_primary_collapses() {
    let node = parse_expression("x").unwrap();
    assert_eq!(node.as_name(), Some("x"));

    let node = parse_expression("\"hi\"").unwrap();
    assert_eq!(node.leaf_kind(), Some(LeafKind::String));
}

#[test]
fn test_call_chain() {
    let node = parse_expression("f(1)(2, 3)").unwrap();
    assert!(node.is(ListKind::Primary));
    assert_eq!(node.child_count(), 3);
    assert!(node.child(1).is_some_and(|n| n.is(ListKind::Arguments)));
    assert_eq!(node.child(2).map(Node::child_count), Some(2));
}

#[test]
fn test_call_without_arguments() {
    let node = parse_expression("f()").unwrap();
    let args = node.child(1).unwrap();
    assert!(args.is(ListKind::Arguments));
    assert_eq!(args.child_count(), 0);
}

#[test]
fn test_call_without_parentheses() {
    let node = statement("fib 10");
    assert!(node.is(ListKind::Primary));
    assert_eq!(node.to_string(), "(fib (10))");
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_empty_block_has_no_children() {
    let node = statement("while 0 {\n}");
    let block = node.child(1).unwrap();
    assert!(block.is(ListKind::Block));
    assert_eq!(block.child_count(), 0);

    let node = statement("if 1 { ; }");
    assert_eq!(node.child(1).map(Node::child_count), Some(0));
}

#[test]
fn test_multiline_block() {
    let node = statement("while i < 3 {\n  i = i + 1\n  j = i\n}");
    assert!(node.is(ListKind::While));
    assert_eq!(node.child(1).map(Node::child_count), Some(2));
}

#[test]
fn test_if_else() {
    let node = statement("if x > 1 { 1 } else { 2 }");
    assert!(node.is(ListKind::If));
    assert_eq!(node.child_count(), 3);
    assert_eq!(node.to_string(), "((x > 1) (1) (2))");
}

#[test]
fn test_if_without_else() {
    let node = statement("if x { 1 }");
    assert_eq!(node.child_count(), 2);
}

#[test]
fn test_statements_on_one_line() {
    let statements = parse("a = 5; a = a + 1; a").unwrap();
    assert_eq!(statements.len(), 3);
}

#[test]
fn test_blank_lines_are_dropped() {
    let statements = parse("\n\nx = 1\n\n// comment\ny = 2\n").unwrap();
    assert_eq!(statements.len(), 2);
}

#[test]
fn test_def() {
    let node = statement("def add(a, b) { a + b }");
    assert!(node.is(ListKind::Def));
    assert_eq!(node.child(0).and_then(Node::token).map(|t| t.text()), Some("add"));
    let params = node.child(1).unwrap();
    assert!(params.is(ListKind::ParameterList));
    assert_eq!(params.child_count(), 2);
    assert!(node.child(2).is_some_and(|n| n.is(ListKind::Block)));
}

#[test]
fn test_def_without_parameters() {
    let node = statement("def zero() { 0 }");
    let params = node.child(1).unwrap();
    assert!(params.is(ListKind::ParameterList));
    assert_eq!(params.child_count(), 0);
}

#[test]
fn test_closure() {
    let node = statement("double = fun (x) { x * 2 }");
    let closure = node.child(2).unwrap();
    assert!(closure.is(ListKind::Closure));
    assert_eq!(closure.child(0).map(Node::child_count), Some(1));
}

// ============================================================================
// Grammar levels
// ============================================================================

#[test]
fn test_basic_level_rejects_def() {
    let mut parser = Parser::with_level(Lexer::new("def f() { 1 }"), GrammarLevel::Basic);
    assert!(parser.parse_program().is_err());
}

#[test]
fn test_functions_level_rejects_closures() {
    let mut parser = Parser::with_level(Lexer::new("fun (x) { x }"), GrammarLevel::Functions);
    assert!(parser.parse_program().is_err());

    let mut parser = Parser::with_level(Lexer::new("def f(x) { x }"), GrammarLevel::Functions);
    assert_eq!(parser.parse_program().map(|s| s.len()), Ok(1));
}

#[test]
fn test_parser_reads_one_statement_at_a_time() {
    let mut parser = Parser::new(Lexer::new("x = 1\n\ny = 2"));
    assert!(parser.parse_statement().unwrap().is(ListKind::Binary));
    assert!(parser.parse_statement().unwrap().is(ListKind::Null));
    assert!(!parser.at_end().unwrap());
    assert!(parser.parse_statement().unwrap().is(ListKind::Binary));
    assert!(parser.at_end().unwrap());
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_dangling_operator() {
    let err = parse("1 +").unwrap_err();
    assert!(matches!(err, ParseError::Unexpected { .. }));
    assert!(!err.is_unexpected_eof());
    assert_eq!(err.line(), Some(1));
    assert!(err.to_string().contains("at line 1"));
}

#[test]
fn test_unclosed_block() {
    let err = parse("if x {").unwrap_err();
    assert!(err.is_unexpected_eof());
    assert!(err.to_string().contains("the last line"));
}

#[test]
fn test_expected_hint() {
    let err = parse("def f(a b) { a }").unwrap_err();
    assert_eq!(
        err.to_string(),
        "syntax error around \"b\" at line 1, expected \")\""
    );
}

#[test]
fn test_error_line() {
    let err = parse("x = 1\ny = )").unwrap_err();
    assert_eq!(err.line(), Some(2));
}

#[test]
fn test_trailing_tokens_after_expression() {
    assert!(parse_expression("1 2").is_err());
}

#[test]
fn test_lex_error_surfaces() {
    let err = parse("x = ☃").unwrap_err();
    assert!(matches!(err, ParseError::Lex(_)));
}
