//! Documentation content for the stone CLI

use super::CliError;

/// Available documentation categories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocCategory {
    Syntax,
    Operators,
    Functions,
    Values,
}

impl DocCategory {
    /// Parse category name from string
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "syntax" | "grammar" => Some(Self::Syntax),
            "operators" | "ops" => Some(Self::Operators),
            "functions" | "function" | "closures" | "fun" => Some(Self::Functions),
            "values" | "types" | "value" => Some(Self::Values),
            _ => None,
        }
    }
}

/// Get the docs overview (category listing)
pub fn get_docs_overview() -> &'static str {
    r#"STONE DOCUMENTATION

Stone is a small dynamically typed scripting language. A program is a sequence
of statements separated by newlines or semicolons; every statement has a value.

DOCUMENTATION CATEGORIES

  syntax            Statements, blocks, if/while and comments
  operators         Binary operators, precedence and associativity
  functions         def, calls, closures and scoping
  values            Numbers, strings, functions and truthiness

QUICK REFERENCE

  x = 1 + 2 * 3             Assignment (right-associative)
  if x > 5 { 1 } else { 0 } Conditional
  while i < 10 { i = i + 1 }
  def inc(n) { n + 1 }      Function definition
  inc(41)   inc 41          Calls
  fun (a) { a * 2 }         Closure

Run 'stone docs <category>' for detailed documentation.
"#
}

/// Get documentation for a specific category
pub fn get_doc_category(name: &str) -> Result<&'static str, CliError> {
    match DocCategory::from_name(name) {
        Some(DocCategory::Syntax) => Ok(SYNTAX_DOC),
        Some(DocCategory::Operators) => Ok(OPERATORS_DOC),
        Some(DocCategory::Functions) => Ok(FUNCTIONS_DOC),
        Some(DocCategory::Values) => Ok(VALUES_DOC),
        None => Err(CliError::UnknownCategory(name.to_string())),
    }
}

const SYNTAX_DOC: &str = r#"SYNTAX

Statements end at a newline or a semicolon. Blank lines are empty statements.
Comments start with // and run to the end of the line.

BLOCKS

  { statement; statement }
  {
      statement
      statement
  }

A block's value is the value of its last statement, or 0 if it is empty.
Blocks do not open a new scope.

CONDITIONALS

  if condition { ... }
  if condition { ... } else { ... }

The value is that of the branch taken, or 0 when no branch runs.

LOOPS

  while condition { ... }

The value is that of the last iteration, or 0 if the body never ran.
"#;

const OPERATORS_DOC: &str = r#"OPERATORS

Binary operators, loosest first:

  =                     1   right   assignment; the left side must be a name
  == != < <= > >=       2   left    comparison, yields 1 or 0
  + -                   3   left
  * / %                 4   left

Unary minus applies to a single primary: -x, -(a + b).

  1 - 2 - 3      is  ((1 - 2) - 3)
  a = b = 1      is  (a = (b = 1))
  1 + 2 * 3      is  (1 + (2 * 3))

+ concatenates when either side is not a number: "n = " + 7 is "n = 7".
== compares any two values; a string equals a number it spells.
Every other operator requires numbers.
"#;

const FUNCTIONS_DOC: &str = r#"FUNCTIONS

  def name(a, b) { body }

binds name in the current scope; the statement's value is the name.
A call evaluates its arguments in the caller's scope and runs the body in a
new scope nested inside the scope the function was defined in.

  add(1, 2)
  fib 10            a statement may call without parentheses

CLOSURES

  fun (a) { a * 2 }

is an anonymous function value. Functions capture their defining scope, so
they can read and update its variables after it has returned:

  def counter() { n = 0; fun () { n = n + 1 } }
  c = counter()
  c()               1
  c()               2

SCOPING

Assignment updates the innermost scope that already binds the name and
otherwise creates the name in the current scope. Parameters always shadow.
"#;

const VALUES_DOC: &str = r#"VALUES

  number      decimal; integer literals such as 42, results such as 7 / 2 = 3.5
  string      "text", with \" \\ and \n escapes
  function    from def or fun

Numbers carry up to 28 significant digits. Division is exact when the result
fits and is otherwise rounded, so 1 / 3 * 3 is 0.9999999999999999999999999999
rather than 1.

TRUTHINESS

if and while treat the number 0 as false and every other value as true.

ERRORS

Reading an unbound name, calling a non-function, a wrong argument count,
division by zero, arithmetic on non-numbers and recursion nested too deeply
stop the program with a message naming the line.
"#;
