//! Streaming arithmetic calculator.
//!
//! ```text
//! source ──▶ Scanner ──tokens──▶ Parser ──Expr──▶ Interpreter ──▶ f64
//!                 (pulled directly, or via a TokenStream thread)
//! ```

pub mod ast_printer;
pub mod error;
pub mod expr;
pub mod interpreter;
pub mod parser;
pub mod scanner;
pub mod stream;
pub mod token;

use error::Result;
use expr::Expr;
use parser::Parser;
use scanner::Scanner;
use stream::TokenStream;

/// Parses `source` with the scanner pulled on demand.
pub fn parse_str(source: &str) -> Result<Expr> {
    Parser::new(Scanner::new(source)).parse()
}

/// Parses and evaluates `source` on the calling thread.
pub fn evaluate_str(source: &str) -> Result<f64> {
    let expr: Expr = parse_str(source)?;

    Ok(interpreter::evaluate(&expr))
}

/// Parses and evaluates `source` with tokenizing on a producer thread,
/// buffering at most `capacity` tokens.
pub fn evaluate_threaded(source: &str, capacity: usize) -> Result<f64> {
    let stream: TokenStream = TokenStream::spawn(source, capacity)?;
    let expr: Expr = Parser::new(stream).parse()?;

    Ok(interpreter::evaluate(&expr))
}
