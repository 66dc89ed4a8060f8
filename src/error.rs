//! Centralised error hierarchy for the **calculator pipeline**.
//!
//! The scanner never fails on its own: an unrecognised character becomes an
//! `ERROR` token, and the parser converts that token into [`CalcError::Lex`]
//! at the tokenizer/parser boundary. Grammar mismatches become
//! [`CalcError::Syntax`]. Evaluation cannot fail.
//!
//! The module **does not** print diagnostics itself; callers decide how to
//! report them.

use std::io;
use thiserror::Error;

use log::info;

/// Canonical error type used throughout the crate.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CalcError {
    /// Unrecognised character; tokenization stopped at it.
    #[error("[position {position}] Error: Unexpected character: '{character}'")]
    Lex {
        /// The offending character (one Unicode scalar value).
        character: char,

        /// 0‑based character offset in the source.
        position: usize,
    },

    /// The parser's lookahead did not match what the grammar required.
    #[error("[position {position}] Error: Expected {expected} but got {found}")]
    Syntax {
        /// What the grammar rule required, e.g. `')'` or `expression`.
        expected: String,

        /// Rendering of the token actually found.
        found: String,

        /// 0‑based character offset of the offending token.
        position: usize,
    },

    /// The source held no tokens at all.
    #[error("Error: Expected expression but input is empty")]
    EmptyInput,

    /// Invalid token stream configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Wrapper around `std::io::Error` (transparent).  Enables `?` on I/O ops.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// UTF‑8 decoding failure when ingesting external text.
    #[error(transparent)]
    Utf8(#[from] std::string::FromUtf8Error),
}

impl CalcError {
    /// Helper constructor for the **tokenizer boundary**.
    pub fn lex(position: usize, character: char) -> Self {
        info!(
            "Creating Lex error: position={}, character={:?}",
            position, character
        );

        CalcError::Lex {
            character,
            position,
        }
    }

    /// Helper constructor for the **parser**.
    pub fn syntax<E, F>(position: usize, expected: E, found: F) -> Self
    where
        E: Into<String>,
        F: Into<String>,
    {
        let expected: String = expected.into();
        let found: String = found.into();

        info!(
            "Creating Syntax error: position={}, expected={}, found={}",
            position, expected, found
        );

        CalcError::Syntax {
            expected,
            found,
            position,
        }
    }

    /// `true` for failures caused by the input text rather than the host.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            CalcError::Lex { .. } | CalcError::Syntax { .. } | CalcError::EmptyInput
        )
    }
}

/// Crate‑wide `Result` alias.
pub type Result<T> = std::result::Result<T, CalcError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_names_character_and_position() {
        let err = CalcError::lex(1, '.');

        assert_eq!(
            err.to_string(),
            "[position 1] Error: Unexpected character: '.'"
        );
        assert!(err.is_input_error());
    }

    #[test]
    fn syntax_error_reports_expected_and_found() {
        let err = CalcError::syntax(6, "')'", "EOF");

        assert_eq!(err.to_string(), "[position 6] Error: Expected ')' but got EOF");
    }

    #[test]
    fn config_error_is_not_an_input_error() {
        assert!(!CalcError::Config("capacity must be at least 1".into()).is_input_error());
    }
}
