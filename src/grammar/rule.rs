use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::mem;
use std::rc::Rc;

use log::trace;

use crate::ast::{LeafKind, ListKind, Node, Token, TokenKind};
use crate::grammar::precedence::{OperatorExpr, Operators};
use crate::lexer::TokenStream;
use crate::limits::{DepthGuard, MAX_PARSE_DEPTH, PARSE_DEPTH};
use crate::parser::ParseError;

/// How a rule turns the nodes its elements produced into one node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Build {
    /// A single node passes through unchanged; anything else is wrapped in a
    /// generic list.
    Collapse,
    /// Always build a node of this kind.
    Node(ListKind),
}

impl Build {
    fn make(self, mut children: Vec<Node>) -> Node {
        match self {
            Build::Node(kind) => kind.build(children),
            Build::Collapse => {
                if children.len() == 1 {
                    if let Some(only) = children.pop() {
                        return only;
                    }
                }
                Node::list(children)
            }
        }
    }
}

#[derive(Debug)]
enum TokenClass {
    Number,
    String,
    Identifier { reserved: HashSet<String> },
}

impl TokenClass {
    fn accepts(&self, token: &Token) -> bool {
        match self {
            TokenClass::Number => token.kind() == TokenKind::Number,
            TokenClass::String => token.kind() == TokenKind::String,
            TokenClass::Identifier { reserved } => {
                token.kind() == TokenKind::Identifier && !reserved.contains(token.text())
            }
        }
    }
}

/// One step of a rule.
#[derive(Debug)]
enum Element {
    /// A sub-rule
    Tree(Rule),
    /// The first alternative whose first element matches
    Or(Vec<Rule>),
    /// Zero-or-one (`once`) or zero-or-more occurrences of a rule
    Repeat { rule: Rule, once: bool },
    /// A number, string or identifier token kept as a leaf
    Token { class: TokenClass, kind: LeafKind },
    /// One of a set of literal tokens, kept as a plain leaf or skipped
    Literal { texts: Vec<String>, keep: bool },
    /// A binary expression parsed by precedence climbing
    Operators(OperatorExpr),
}

impl Element {
    fn parse(&self, stream: &mut dyn TokenStream, out: &mut Vec<Node>) -> Result<(), ParseError> {
        match self {
            Element::Tree(rule) => out.push(rule.parse(stream)?),
            Element::Or(rules) => match choose(rules, stream)? {
                Some(rule) => out.push(rule.parse(stream)?),
                None => {
                    let token = stream.peek(0)?.clone();
                    return Err(ParseError::unexpected(token, None));
                }
            },
            Element::Repeat { rule, once } => {
                while rule.matches(stream)? {
                    let node = rule.parse(stream)?;
                    if !node.is_vacuous() {
                        out.push(node);
                    }
                    if *once {
                        break;
                    }
                }
            }
            Element::Token { class, kind } => {
                let token = stream.read()?;
                if !class.accepts(&token) {
                    return Err(ParseError::unexpected(token, None));
                }
                out.push(Node::leaf(*kind, token));
            }
            Element::Literal { texts, keep } => {
                let token = stream.read()?;
                if !texts.iter().any(|text| token.is_literal(text)) {
                    let expected = texts
                        .first()
                        .map(|text| format!("\"{}\"", text.escape_default()));
                    return Err(ParseError::unexpected(token, expected));
                }
                if *keep {
                    out.push(Node::leaf(LeafKind::Token, token));
                }
            }
            Element::Operators(expr) => out.push(expr.parse(stream)?),
        }
        Ok(())
    }

    fn matches(&self, stream: &mut dyn TokenStream) -> Result<bool, ParseError> {
        match self {
            Element::Tree(rule) | Element::Repeat { rule, .. } => rule.matches(stream),
            Element::Or(rules) => Ok(choose(rules, stream)?.is_some()),
            Element::Token { class, .. } => Ok(class.accepts(stream.peek(0)?)),
            Element::Literal { texts, .. } => {
                let token = stream.peek(0)?;
                Ok(texts.iter().any(|text| token.is_literal(text)))
            }
            Element::Operators(expr) => expr.matches(stream),
        }
    }
}

fn choose<'r>(
    rules: &'r [Rule],
    stream: &mut dyn TokenStream,
) -> Result<Option<&'r Rule>, ParseError> {
    for (i, rule) in rules.iter().enumerate() {
        if rule.matches(stream)? {
            trace!("chose alternative {} ({})", i, rule);
            return Ok(Some(rule));
        }
    }
    Ok(None)
}

struct RuleDef {
    name: Option<String>,
    elements: Vec<Element>,
    build: Build,
}

/// A grammar rule: an ordered sequence of elements and a [`Build`] policy.
///
/// `Rule` is a shared handle. Cloning it yields another handle to the same
/// rule, which is how rules refer to each other, themselves included. The
/// builder methods append to the rule in place and hand back a handle, so a
/// rule can be declared before it is defined:
///
/// ```
/// use stone_lang::ast::{LeafKind, ListKind};
/// use stone_lang::grammar::{Operators, Rule};
///
/// let expr = Rule::named("expr");
/// let primary = Rule::new().or([
///     Rule::new().sep(&["("]).ast(&expr).sep(&[")"]),
///     Rule::new().number(LeafKind::Number),
/// ]);
/// expr.expression(&primary, Operators::stone(), ListKind::Binary);
/// ```
///
/// Recursive rules form `Rc` cycles; call [`Rule::reset`] on one rule of each
/// cycle to release them.
#[derive(Clone)]
pub struct Rule(Rc<RefCell<RuleDef>>);

impl Rule {
    /// An empty rule with the [`Build::Collapse`] policy.
    pub fn new() -> Self {
        Rule::with_build(Build::Collapse)
    }

    pub fn with_build(build: Build) -> Self {
        Rule(Rc::new(RefCell::new(RuleDef {
            name: None,
            elements: Vec::new(),
            build,
        })))
    }

    /// An empty rule building nodes of `kind`.
    pub fn of(kind: ListKind) -> Self {
        Rule::with_build(Build::Node(kind))
    }

    /// An empty collapsing rule with a name for diagnostics.
    pub fn named(name: &str) -> Self {
        let rule = Rule::new();
        rule.0.borrow_mut().name = Some(name.to_string());
        rule
    }

    pub fn build(&self) -> Build {
        self.0.borrow().build
    }

    /// Parses one node, consuming exactly the tokens it covers.
    pub fn parse(&self, stream: &mut dyn TokenStream) -> Result<Node, ParseError> {
        let _depth = match DepthGuard::enter(&PARSE_DEPTH, MAX_PARSE_DEPTH) {
            Some(guard) => guard,
            None => {
                let line = stream.peek(0)?.line();
                return Err(ParseError::TooDeep { line });
            }
        };
        let def = self.0.borrow();
        let mut children = Vec::new();
        for element in &def.elements {
            element.parse(stream, &mut children)?;
        }
        Ok(def.build.make(children))
    }

    /// Whether the next token can start this rule. Consumes nothing and only
    /// consults the first element.
    pub fn matches(&self, stream: &mut dyn TokenStream) -> Result<bool, ParseError> {
        match self.0.borrow().elements.first() {
            Some(element) => element.matches(stream),
            None => Ok(true),
        }
    }

    fn push(&self, element: Element) -> Rule {
        self.0.borrow_mut().elements.push(element);
        self.clone()
    }

    /// A number token, kept as a leaf of `kind`.
    pub fn number(&self, kind: LeafKind) -> Rule {
        self.push(Element::Token {
            class: TokenClass::Number,
            kind,
        })
    }

    /// A string token, kept as a leaf of `kind`.
    pub fn string(&self, kind: LeafKind) -> Rule {
        self.push(Element::Token {
            class: TokenClass::String,
            kind,
        })
    }

    /// An identifier token other than the `reserved` ones, kept as a leaf of
    /// `kind`.
    pub fn identifier(&self, kind: LeafKind, reserved: &[&str]) -> Rule {
        self.push(Element::Token {
            class: TokenClass::Identifier {
                reserved: reserved.iter().map(|r| r.to_string()).collect(),
            },
            kind,
        })
    }

    /// One of the literal `texts`, kept as a plain leaf.
    pub fn token(&self, texts: &[&str]) -> Rule {
        self.literal(texts, true)
    }

    /// One of the literal `texts`, discarded.
    pub fn sep(&self, texts: &[&str]) -> Rule {
        self.literal(texts, false)
    }

    fn literal(&self, texts: &[&str], keep: bool) -> Rule {
        self.push(Element::Literal {
            texts: texts.iter().map(|t| t.to_string()).collect(),
            keep,
        })
    }

    /// A sub-rule.
    pub fn ast(&self, rule: &Rule) -> Rule {
        self.push(Element::Tree(rule.clone()))
    }

    /// The first of `rules` that matches.
    pub fn or(&self, rules: impl IntoIterator<Item = Rule>) -> Rule {
        self.push(Element::Or(rules.into_iter().collect()))
    }

    /// `rule`, or an empty node built with `rule`'s policy when it does not
    /// match.
    pub fn maybe(&self, rule: &Rule) -> Rule {
        let empty = Rule::with_build(rule.build());
        self.push(Element::Or(vec![rule.clone(), empty]))
    }

    /// Zero or one `rule`.
    pub fn option(&self, rule: &Rule) -> Rule {
        self.push(Element::Repeat {
            rule: rule.clone(),
            once: true,
        })
    }

    /// Zero or more `rule`.
    pub fn repeat(&self, rule: &Rule) -> Rule {
        self.push(Element::Repeat {
            rule: rule.clone(),
            once: false,
        })
    }

    /// `factor { op factor }`, nested by the precedence of each operator
    /// into nodes of `kind`.
    pub fn expression(&self, factor: &Rule, operators: Operators, kind: ListKind) -> Rule {
        self.push(Element::Operators(OperatorExpr::new(
            factor.clone(),
            operators,
            kind,
        )))
    }

    /// Grafts `choice` onto this rule as a new alternative, ahead of the
    /// existing ones.
    ///
    /// If the rule starts with an alternation, `choice` joins it. Otherwise
    /// the rule becomes an alternation between `choice` and a copy of what it
    /// was before. Every rule already referring to this one sees the new
    /// alternative.
    pub fn insert_choice(&self, choice: Rule) -> Rule {
        let mut def = self.0.borrow_mut();
        if let Some(Element::Or(rules)) = def.elements.first_mut() {
            rules.insert(0, choice);
        } else {
            let previous = Rule(Rc::new(RefCell::new(RuleDef {
                name: def.name.clone(),
                elements: mem::take(&mut def.elements),
                build: def.build,
            })));
            def.build = Build::Collapse;
            def.elements.push(Element::Or(vec![choice, previous]));
        }
        drop(def);
        self.clone()
    }

    /// Drops every element and restores the collapse policy.
    pub fn reset(&self) {
        let mut def = self.0.borrow_mut();
        def.elements.clear();
        def.build = Build::Collapse;
    }
}

impl Default for Rule {
    fn default() -> Self {
        Rule::new()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let def = self.0.borrow();
        match (&def.name, def.build) {
            (Some(name), _) => write!(f, "{}", name),
            (None, Build::Node(kind)) => write!(f, "{}", kind.name()),
            (None, Build::Collapse) => write!(f, "<rule>"),
        }
    }
}

// Rules may be cyclic, so only the name is printed.
impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rule({})", self)
    }
}
