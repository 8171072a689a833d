// tests/grammar_tests.rs

use stone_lang::ast::{LeafKind, ListKind, Node};
use stone_lang::grammar::{Assoc, Build, GrammarLevel, Operators, Rule, StoneGrammar};
use stone_lang::lexer::{Lexer, TokenStream};
use stone_lang::parser::ParseError;

fn parse_with(rule: &Rule, source: &str) -> Result<Node, ParseError> {
    rule.parse(&mut Lexer::new(source))
}

// ============================================================================
// Elements
// ============================================================================

#[test]
fn test_sequence_with_repetition() {
    let number = Rule::new().number(LeafKind::Number);
    let list = Rule::new()
        .ast(&number)
        .repeat(&Rule::new().sep(&[","]).ast(&number));

    let node = parse_with(&list, "1, 2, 3").unwrap();
    assert!(node.is(ListKind::List));
    assert_eq!(node.to_string(), "(1 2 3)");
}

#[test]
fn test_collapse_passes_single_child_through() {
    let rule = Rule::new().sep(&["("]).number(LeafKind::Number).sep(&[")"]);
    let node = parse_with(&rule, "(7)").unwrap();
    assert_eq!(node.leaf_kind(), Some(LeafKind::Number));
}

#[test]
fn test_token_keeps_literal() {
    let rule = Rule::new().token(&["+", "-"]).number(LeafKind::Number);
    let node = parse_with(&rule, "- 4").unwrap();
    assert_eq!(node.child(0).and_then(Node::leaf_kind), Some(LeafKind::Token));
    assert_eq!(node.to_string(), "(- 4)");
}

#[test]
fn test_identifier_skips_reserved() {
    let name = Rule::new().identifier(LeafKind::Name, &[";"]);
    let mut lexer = Lexer::new(";");
    assert!(!name.matches(&mut lexer).unwrap());
    assert!(name.matches(&mut Lexer::new("x")).unwrap());
}

#[test]
fn test_matches_does_not_consume() {
    let rule = Rule::new().number(LeafKind::Number);
    let mut lexer = Lexer::new("5");
    assert!(rule.matches(&mut lexer).unwrap());
    assert_eq!(lexer.peek(0).unwrap().text(), "5");
}

#[test]
fn test_option() {
    let sign = Rule::new().token(&["-"]);
    let rule = Rule::new().option(&sign).number(LeafKind::Number);

    assert_eq!(parse_with(&rule, "-1").unwrap().to_string(), "(- 1)");
    assert_eq!(parse_with(&rule, "1").unwrap().to_string(), "1");
}

#[test]
fn test_repeat_drops_vacuous_lists() {
    let empty_or_number = Rule::new().sep(&[";"]).option(&Rule::new().number(LeafKind::Number));
    let rule = Rule::of(ListKind::Block)
        .sep(&["{"])
        .repeat(&empty_or_number)
        .sep(&["}"]);

    let node = parse_with(&rule, "{ ; ; 3 ; }").unwrap();
    assert_eq!(node.child_count(), 1);
}

#[test]
fn test_maybe_keeps_build_policy() {
    let args = Rule::of(ListKind::Arguments)
        .number(LeafKind::Number)
        .repeat(&Rule::new().sep(&[","]).number(LeafKind::Number));
    let postfix = Rule::new().sep(&["("]).maybe(&args).sep(&[")"]);

    let empty = parse_with(&postfix, "()").unwrap();
    assert!(empty.is(ListKind::Arguments));
    assert_eq!(empty.child_count(), 0);

    let full = parse_with(&postfix, "(1, 2)").unwrap();
    assert_eq!(full.child_count(), 2);
}

#[test]
fn test_or_without_match_fails_on_next_token() {
    let rule = Rule::new().or([
        Rule::new().number(LeafKind::Number),
        Rule::new().string(LeafKind::String),
    ]);
    let err = parse_with(&rule, "x").unwrap_err();
    match err {
        ParseError::Unexpected { token, expected } => {
            assert_eq!(token.text(), "x");
            assert_eq!(expected, None);
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_empty_rule_matches_anything() {
    let rule = Rule::of(ListKind::Null);
    assert!(rule.matches(&mut Lexer::new("}")).unwrap());
    assert!(parse_with(&rule, "").unwrap().is(ListKind::Null));
}

// ============================================================================
// Precedence climbing
// ============================================================================

#[test]
fn test_custom_right_associative_operator() {
    let mut operators = Operators::new();
    operators.add("^", 5, Assoc::Right).add("+", 1, Assoc::Left);
    let factor = Rule::new().number(LeafKind::Number);
    let expr = Rule::new().expression(&factor, operators, ListKind::Binary);

    let node = parse_with(&expr, "1 + 2 ^ 3 ^ 2").unwrap();
    assert_eq!(node.to_string(), "(1 + (2 ^ (3 ^ 2)))");
}

#[test]
fn test_unknown_operator_ends_expression() {
    let factor = Rule::new().number(LeafKind::Number);
    let expr = Rule::new().expression(&factor, Operators::stone(), ListKind::Binary);
    let mut lexer = Lexer::new("1 + 2 && 3");

    let node = expr.parse(&mut lexer).unwrap();
    assert_eq!(node.to_string(), "(1 + 2)");
    assert_eq!(lexer.peek(0).unwrap().text(), "&&");
}

#[test]
fn test_recursive_rule() {
    let expr = Rule::named("expr");
    let primary = Rule::new().or([
        Rule::new().sep(&["("]).ast(&expr).sep(&[")"]),
        Rule::new().number(LeafKind::Number),
    ]);
    expr.expression(&primary, Operators::stone(), ListKind::Binary);

    let node = parse_with(&expr, "2 * (3 + (4 - 1))").unwrap();
    assert_eq!(node.to_string(), "(2 * (3 + (4 - 1)))");
    expr.reset();
}

// ============================================================================
// Late insertion
// ============================================================================

#[test]
fn test_insert_choice_into_alternation_takes_priority() {
    let rule = Rule::new().or([Rule::new().identifier(LeafKind::Name, &[])]);
    assert_eq!(parse_with(&rule, "skip").unwrap().as_name(), Some("skip"));

    rule.insert_choice(Rule::of(ListKind::Null).sep(&["skip"]));
    assert!(parse_with(&rule, "skip").unwrap().is(ListKind::Null));
    assert_eq!(parse_with(&rule, "other").unwrap().as_name(), Some("other"));
}

#[test]
fn test_insert_choice_wraps_plain_rule() {
    let negative = Rule::of(ListKind::Negative).sep(&["-"]).number(LeafKind::Number);
    let outer = Rule::new().ast(&negative);

    negative.insert_choice(Rule::new().string(LeafKind::String));
    assert_eq!(negative.build(), Build::Collapse);

    let string = parse_with(&outer, "\"s\"").unwrap();
    assert_eq!(string.leaf_kind(), Some(LeafKind::String));

    let neg = parse_with(&outer, "- 5").unwrap();
    assert!(neg.is(ListKind::Negative));
    assert_eq!(neg.child_count(), 1);
}

#[test]
fn test_insert_choice_keeps_self_reference() {
    // list : "[" { NUMBER | list } "]"
    let list = Rule::of(ListKind::Block);
    list.sep(&["["])
        .repeat(&Rule::new().or([Rule::new().number(LeafKind::Number), list.clone()]))
        .sep(&["]"]);
    list.insert_choice(Rule::new().string(LeafKind::String));

    let node = parse_with(&list, "[1 \"a\" [2]]").unwrap();
    assert!(node.is(ListKind::Block));
    assert_eq!(node.child_count(), 3);
    assert_eq!(node.child(1).and_then(Node::leaf_kind), Some(LeafKind::String));
    assert!(node.child(2).is_some_and(|n| n.is(ListKind::Block)));
    list.reset();
}

#[test]
fn test_extending_stone_program() {
    let grammar = StoneGrammar::new(GrammarLevel::Closures);
    let node = grammar.parse(&mut Lexer::new("pass")).unwrap();
    assert_eq!(node.as_name(), Some("pass"));

    grammar
        .program()
        .insert_choice(Rule::of(ListKind::Null).sep(&["pass"]));
    let node = grammar.parse(&mut Lexer::new("pass")).unwrap();
    assert!(node.is(ListKind::Null));

    let node = grammar.parse(&mut Lexer::new("x = 1")).unwrap();
    assert!(node.is(ListKind::Binary));
}

#[test]
fn test_rules_are_emptied_with_their_grammar() {
    let expr = {
        let grammar = StoneGrammar::default();
        let expr = grammar.expression().clone();
        assert!(expr.parse(&mut Lexer::new("1 + 2")).unwrap().is(ListKind::Binary));
        expr
    };
    let node = expr.parse(&mut Lexer::new("1 + 2")).unwrap();
    assert!(node.is(ListKind::List));
    assert_eq!(node.child_count(), 0);
}

#[test]
fn test_grammar_level_is_kept() {
    assert_eq!(StoneGrammar::new(GrammarLevel::Basic).level(), GrammarLevel::Basic);
    assert_eq!(StoneGrammar::default().level(), GrammarLevel::Closures);
}

#[test]
fn test_rule_display() {
    assert_eq!(Rule::named("expr").to_string(), "expr");
    assert_eq!(Rule::of(ListKind::If).to_string(), "IfStmnt");
    assert_eq!(format!("{:?}", Rule::new()), "Rule(<rule>)");
}
