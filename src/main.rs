use clap::{Parser as ClapParser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;
use stone_lang::GrammarLevel;
use stone_lang::cli::{
    self, AstFormat, AstOptions, CheckResult, CliError, Feed, Repl, RunOptions,
};

#[derive(ClapParser)]
#[command(name = "stone")]
#[command(about = "Stone - a small scripting language with closures")]
#[command(version)]
struct Cli {
    /// Language features to accept
    #[arg(long, value_enum, global = true, default_value_t = Level::Closures)]
    level: Level,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Level {
    Basic,
    Functions,
    Closures,
}

impl From<Level> for GrammarLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::Basic => GrammarLevel::Basic,
            Level::Functions => GrammarLevel::Functions,
            Level::Closures => GrammarLevel::Closures,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Run a Stone program and print the value of each statement
    Run {
        /// Source file (reads from stdin if not provided)
        file: Option<PathBuf>,

        /// Print the values as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Start an interactive session
    Repl,

    /// Print the syntax tree of a program
    Ast {
        /// Source file (reads from stdin if not provided)
        file: Option<PathBuf>,

        /// Output format: tree, source or json
        #[arg(short, long, default_value = "tree")]
        format: String,

        /// Pretty-print JSON output
        #[arg(short, long)]
        pretty: bool,
    },

    /// Check a program for syntax errors and unresolved names
    Check {
        /// Source file (reads from stdin if not provided)
        file: Option<PathBuf>,
    },

    /// Show documentation, optionally for one category
    Docs {
        /// Category name (omit to list categories)
        category: Option<String>,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    let level = GrammarLevel::from(cli.level);

    let result = match cli.command {
        Commands::Run { file, json } => run_program(file, json, level),
        Commands::Repl => run_repl(level),
        Commands::Ast {
            file,
            format,
            pretty,
        } => run_ast(file, &format, pretty, level),
        Commands::Check { file } => run_check(file, level),
        Commands::Docs { category: None } => {
            print!("{}", cli::get_docs_overview());
            Ok(())
        }
        Commands::Docs {
            category: Some(category),
        } => match cli::get_doc_category(&category) {
            Ok(content) => {
                print!("{}", content);
                Ok(())
            }
            Err(e) => Err(e),
        },
    };

    if let Err(e) = result {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}

/// Source from `file`, or from stdin when it is piped.
fn read_source(file: Option<PathBuf>) -> Result<String, CliError> {
    match file {
        Some(path) => Ok(fs::read_to_string(path)?),
        None if !atty::is(atty::Stream::Stdin) => {
            let mut buffer = String::new();
            io::stdin().read_to_string(&mut buffer)?;
            Ok(buffer)
        }
        None => Err(CliError::NoInput),
    }
}

fn run_program(file: Option<PathBuf>, json: bool, level: GrammarLevel) -> Result<(), CliError> {
    let options = RunOptions {
        source: read_source(file)?,
        json,
        level,
    };
    let output = cli::execute_run(&options)?;
    if !output.is_empty() {
        println!("{}", output);
    }
    Ok(())
}

fn run_ast(
    file: Option<PathBuf>,
    format: &str,
    pretty: bool,
    level: GrammarLevel,
) -> Result<(), CliError> {
    let options = AstOptions {
        format: AstFormat::from_name(format)?,
        source: read_source(file)?,
        pretty,
        level,
    };
    println!("{}", cli::execute_ast(&options)?);
    Ok(())
}

fn run_check(file: Option<PathBuf>, level: GrammarLevel) -> Result<(), CliError> {
    let source = read_source(file)?;
    match cli::execute_check(&source, level)? {
        CheckResult::Clean { statements } => {
            println!("ok: {} statement(s)", statements);
        }
        CheckResult::Unresolved(references) => {
            for reference in &references {
                eprintln!("unresolved name: {}", reference);
            }
            std::process::exit(1);
        }
    }
    Ok(())
}

fn run_repl(level: GrammarLevel) -> Result<(), CliError> {
    let mut repl = Repl::with_level(level);
    let interactive = atty::is(atty::Stream::Stdin);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        if interactive {
            print!("{}", repl.prompt());
            stdout.flush()?;
        }
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match repl.feed(line.trim_end_matches(['\n', '\r'])) {
            Feed::Incomplete => {}
            Feed::Values(values) => {
                for value in values {
                    println!("=> {}", value);
                }
            }
            Feed::Error(e) => eprintln!("{}", e),
        }
    }
    Ok(())
}
