use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser as ClapParser;
use clap::{Args, Subcommand};
use env_logger::Builder;
use log::{debug, info};

use streamcalc::ast_printer::{AstPrinter, RpnPrinter};
use streamcalc::error::CalcError;
use streamcalc::expr::Expr;
use streamcalc::interpreter::Interpreter;
use streamcalc::parser::Parser;
use streamcalc::scanner::Scanner;
use streamcalc::stream::{TokenStream, DEFAULT_CAPACITY};
use streamcalc::token::{Token, TokenKind};

/// Exit status for input the calculator rejects.
const EXIT_DATA_ERR: i32 = 65;

/// Deepest tree `parse --json` will hand to the (recursive) serializer.
const JSON_MAX_DEPTH: usize = 512;

#[derive(ClapParser, Debug)]
#[command(version, about = "Streaming arithmetic calculator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    commands: Commands,

    /// Enable logging to app.log
    #[arg(long, global = true)]
    log: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Tokenizes the expression, printing each token
    Tokenize {
        #[command(flatten)]
        source: SourceArgs,

        /// Print tokens as a JSON array
        #[arg(long)]
        json: bool,
    },

    /// Parses the expression and prints its AST in prefix form
    Parse {
        #[command(flatten)]
        source: SourceArgs,

        /// Print the AST as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluates the expression and prints the result
    Evaluate {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Parses the expression and prints it in reverse Polish notation
    Rpn {
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Expression text, e.g. "2 + 3 * 4"
    expression: Option<String>,

    /// Read the expression from a file instead
    #[arg(short, long, conflicts_with = "expression")]
    file: Option<PathBuf>,

    /// Tokenize on a separate thread, feeding the parser through a channel
    #[arg(long)]
    threaded: bool,

    /// Channel capacity in tokens (with --threaded)
    #[arg(long, default_value_t = DEFAULT_CAPACITY)]
    capacity: usize,
}

impl SourceArgs {
    /// Resolves the expression text, `None` when nothing was given.
    fn text(&self) -> Result<Option<String>> {
        match (&self.expression, &self.file) {
            (Some(expression), _) => Ok(Some(expression.clone())),
            (None, Some(filename)) => read_file(filename).map(Some),
            (None, None) => Ok(None),
        }
    }

    /// Token source for `text`, pulled directly or through a producer thread.
    fn tokens<'a>(&self, text: &'a str) -> Result<Box<dyn Iterator<Item = Token> + 'a>> {
        if self.threaded {
            debug!("Using threaded token stream, capacity {}", self.capacity);

            let stream = TokenStream::spawn(text, self.capacity)
                .context("Failed to start tokenizer thread")?;

            Ok(Box::new(stream))
        } else {
            Ok(Box::new(Scanner::new(text)))
        }
    }
}

/// Reads the contents of a file into a String
fn read_file(filename: &Path) -> Result<String> {
    info!("Reading file: {:?}", filename);
    let file = File::open(filename).context(format!("Failed to open file {:?}", filename))?;
    let mut reader = BufReader::new(file);
    let mut buf = Vec::new();

    let bytes = reader
        .read_to_end(&mut buf)
        .context(format!("Failed to read file {:?}", filename))?;

    info!("Read {} bytes from {:?}", bytes, filename);

    let text = String::from_utf8(buf).map_err(CalcError::from)?;

    Ok(text)
}

fn init_logger() -> Result<()> {
    // Create or open the log file
    let log_file = File::create("app.log").context("Failed to create app.log")?;

    Builder::new()
        .format(|buf, record| {
            // Strip 'streamcalc::' from module path
            let module = record
                .module_path()
                .unwrap_or("<unnamed>")
                .strip_prefix("streamcalc::")
                .unwrap_or(record.module_path().unwrap_or("<unnamed>"));
            writeln!(
                buf,
                "[{} {}:{}] - {}",
                chrono::Local::now().format("%H:%M:%S%.3f"),
                module,
                record.line().unwrap_or(0),
                record.args()
            )
        })
        .target(env_logger::Target::Pipe(Box::new(log_file)))
        .filter(None, log::LevelFilter::Debug) // Default to Debug, override with RUST_LOG
        .parse_env("RUST_LOG")
        .init();

    info!("Logger initialized, writing to app.log");
    Ok(())
}

/// Parses the source, exiting with `EXIT_DATA_ERR` on rejected input.
fn parse_or_exit(source: &SourceArgs, text: &str) -> Result<Expr> {
    let mut parser = Parser::new(source.tokens(text)?);

    match parser.parse() {
        Ok(expr) => {
            info!("Expression parsed successfully");
            Ok(expr)
        }

        Err(e) if e.is_input_error() => {
            debug!("Parse debug: {}", e);
            eprintln!("{}", e);
            std::process::exit(EXIT_DATA_ERR);
        }

        Err(e) => Err(e.into()),
    }
}

fn no_input() {
    info!("No expression provided");
    println!("No input expression was provided. Exiting...");
}

fn main() -> Result<()> {
    let args: Cli = Cli::parse();

    // Initialize logger only if --log flag is provided
    if args.log {
        init_logger()?;
    } else {
        // Initialize a minimal logger to avoid "no logger" errors
        env_logger::Builder::new()
            .filter_level(log::LevelFilter::Off)
            .init();
    }

    info!("CLI arguments: {:?}", args);

    match args.commands {
        Commands::Tokenize { source, json } => {
            info!("Running Tokenize subcommand");
            let Some(text) = source.text()? else {
                no_input();
                return Ok(());
            };

            let tokens: Vec<Token> = source.tokens(&text)?.collect();
            let failed: Option<&Token> = tokens
                .iter()
                .find(|t| matches!(t.kind, TokenKind::ERROR(_)));

            if json {
                println!("{}", serde_json::to_string_pretty(&tokens)?);
            } else {
                for token in tokens
                    .iter()
                    .filter(|t| !matches!(t.kind, TokenKind::ERROR(_)))
                {
                    println!("{}", token);
                }
            }

            if let Some(Token {
                kind: TokenKind::ERROR(c),
                position,
                ..
            }) = failed
            {
                eprintln!("{}", CalcError::lex(*position, *c));
                debug!("Tokenization failed, exiting with code {}", EXIT_DATA_ERR);
                std::process::exit(EXIT_DATA_ERR);
            }

            info!("Tokenization completed successfully");
        }

        Commands::Parse { source, json } => {
            info!("Running Parse subcommand");
            let Some(text) = source.text()? else {
                no_input();
                return Ok(());
            };

            let expr: Expr = parse_or_exit(&source, &text)?;

            if json {
                let depth = expr.depth();
                if depth > JSON_MAX_DEPTH {
                    bail!(
                        "AST depth {} exceeds the JSON output limit of {}; use the prefix form",
                        depth,
                        JSON_MAX_DEPTH
                    );
                }

                println!("{}", serde_json::to_string_pretty(&expr)?);
            } else {
                let ast_str = AstPrinter::print(&expr);
                debug!("AST: {}", ast_str);
                println!("{}", ast_str);
            }

            info!("Parse subcommand completed");
        }

        Commands::Evaluate { source } => {
            info!("Running Evaluate subcommand");
            let Some(text) = source.text()? else {
                no_input();
                return Ok(());
            };

            let expr: Expr = parse_or_exit(&source, &text)?;
            let value: f64 = Interpreter::new().interpret(&expr);

            println!("{}", value);

            info!("Evaluate subcommand completed");
        }

        Commands::Rpn { source } => {
            info!("Running Rpn subcommand");
            let Some(text) = source.text()? else {
                no_input();
                return Ok(());
            };

            let expr: Expr = parse_or_exit(&source, &text)?;
            let rpn = RpnPrinter::print(&expr);

            debug!("RPN: {}", rpn);
            println!("{}", rpn);

            info!("Rpn subcommand completed");
        }
    }

    Ok(())
}
