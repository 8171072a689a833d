use crate::ast::{EOL, LeafKind, ListKind, Node};
use crate::grammar::{Operators, Rule};
use crate::lexer::TokenStream;
use crate::parser::ParseError;

/// Which features of the language a [`StoneGrammar`] accepts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum GrammarLevel {
    /// Expressions, blocks, `if` and `while`
    Basic,
    /// Adds `def` and function calls
    Functions,
    /// Adds `fun` closures
    #[default]
    Closures,
}

/// The Stone grammar.
///
/// ```text
/// primary   : [ "fun" param_list block ]
///           | ( "(" expr ")" | NUMBER | IDENTIFIER | STRING ) { postfix }
/// factor    : "-" primary | primary
/// expr      : factor { OP factor }
/// block     : "{" [ statement ] { (";" | EOL) [ statement ] } "}"
/// simple    : expr [ args ]
/// statement : "if" expr block [ "else" block ] | "while" expr block | simple
/// program   : [ def | statement ] (";" | EOL)
/// param_list: "(" [ param { "," param } ] ")"
/// def       : "def" IDENTIFIER param_list block
/// args      : expr { "," expr }
/// postfix   : "(" [ args ] ")"
/// ```
///
/// The basic rules are built first; function and closure support is grafted
/// onto them afterwards with [`Rule::insert_choice`] and extra repetitions.
pub struct StoneGrammar {
    level: GrammarLevel,
    program: Rule,
    statement: Rule,
    expr: Rule,
    primary: Rule,
}

impl StoneGrammar {
    pub fn new(level: GrammarLevel) -> Self {
        let mut reserved = vec![";", "}", EOL];
        if level >= GrammarLevel::Functions {
            reserved.push(")");
        }

        let expr = Rule::named("expr");
        let primary = Rule::of(ListKind::Primary).or([
            Rule::new().sep(&["("]).ast(&expr).sep(&[")"]),
            Rule::new().number(LeafKind::Number),
            Rule::new().identifier(LeafKind::Name, &reserved),
            Rule::new().string(LeafKind::String),
        ]);
        let factor = Rule::named("factor").or([
            Rule::of(ListKind::Negative).sep(&["-"]).ast(&primary),
            primary.clone(),
        ]);
        expr.expression(&factor, Operators::stone(), ListKind::Binary);

        let statement = Rule::named("statement");
        let block = Rule::of(ListKind::Block)
            .sep(&["{"])
            .option(&statement)
            .repeat(&Rule::new().sep(&[";", EOL]).option(&statement))
            .sep(&["}"]);
        let simple = Rule::of(ListKind::Primary).ast(&expr);
        statement.or([
            Rule::of(ListKind::If)
                .sep(&["if"])
                .ast(&expr)
                .ast(&block)
                .option(&Rule::new().sep(&["else"]).ast(&block)),
            Rule::of(ListKind::While).sep(&["while"]).ast(&expr).ast(&block),
            simple.clone(),
        ]);
        let program = Rule::named("program")
            .or([statement.clone(), Rule::of(ListKind::Null)])
            .sep(&[";", EOL]);

        if level >= GrammarLevel::Functions {
            let param = Rule::named("param").identifier(LeafKind::Name, &reserved);
            let params = Rule::of(ListKind::ParameterList)
                .ast(&param)
                .repeat(&Rule::new().sep(&[","]).ast(&param));
            let param_list = Rule::named("param_list")
                .sep(&["("])
                .maybe(&params)
                .sep(&[")"]);
            let def = Rule::of(ListKind::Def)
                .sep(&["def"])
                .identifier(LeafKind::Token, &reserved)
                .ast(&param_list)
                .ast(&block);
            let args = Rule::of(ListKind::Arguments)
                .ast(&expr)
                .repeat(&Rule::new().sep(&[","]).ast(&expr));
            let postfix = Rule::named("postfix").sep(&["("]).maybe(&args).sep(&[")"]);

            primary.repeat(&postfix);
            simple.option(&args);
            program.insert_choice(def);

            if level >= GrammarLevel::Closures {
                primary.insert_choice(
                    Rule::of(ListKind::Closure)
                        .sep(&["fun"])
                        .ast(&param_list)
                        .ast(&block),
                );
            }
        }

        StoneGrammar {
            level,
            program,
            statement,
            expr,
            primary,
        }
    }

    pub fn level(&self) -> GrammarLevel {
        self.level
    }

    /// Parses one top-level statement including its terminator.
    pub fn parse(&self, stream: &mut dyn TokenStream) -> Result<Node, ParseError> {
        self.program.parse(stream)
    }

    pub fn program(&self) -> &Rule {
        &self.program
    }

    /// The statement rule. Emptied when the grammar is dropped, so clones
    /// of it must not outlive the grammar.
    pub fn statement(&self) -> &Rule {
        &self.statement
    }

    /// The expression rule. Emptied when the grammar is dropped, so clones
    /// of it must not outlive the grammar.
    pub fn expression(&self) -> &Rule {
        &self.expr
    }

    pub fn primary(&self) -> &Rule {
        &self.primary
    }
}

impl Default for StoneGrammar {
    fn default() -> Self {
        StoneGrammar::new(GrammarLevel::default())
    }
}

// Every recursive path runs through `expr` or `statement`.
impl Drop for StoneGrammar {
    fn drop(&mut self) {
        self.expr.reset();
        self.statement.reset();
    }
}
