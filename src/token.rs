use log::debug;
use serde::Serialize;
use std::fmt;
use std::mem;

/// The different kinds of tokens recognized by the scanner.
///
/// Only `ERROR` carries data: the character the scanner could not classify.
/// `EOF` and `ERROR` are terminal, nothing follows either of them.
#[allow(non_camel_case_types)]
#[derive(Debug, Clone, Copy, Serialize)]
pub enum TokenKind {
    /// A numeric literal; the digits live in [`Token::text`]
    NUMBER,

    /// '('
    LEFT_PAREN,

    /// ')'
    RIGHT_PAREN,

    /// '+'
    PLUS,

    /// '-'
    MINUS,

    /// '*'
    STAR,

    /// '/'
    SLASH,

    /// End‑of‑input marker
    EOF,

    /// An unrecognised character
    ERROR(char),
}

impl TokenKind {
    /// Variant name without payload, as printed by `tokenize`.
    pub const fn name(&self) -> &'static str {
        match self {
            TokenKind::NUMBER => "NUMBER",
            TokenKind::LEFT_PAREN => "LEFT_PAREN",
            TokenKind::RIGHT_PAREN => "RIGHT_PAREN",
            TokenKind::PLUS => "PLUS",
            TokenKind::MINUS => "MINUS",
            TokenKind::STAR => "STAR",
            TokenKind::SLASH => "SLASH",
            TokenKind::EOF => "EOF",
            TokenKind::ERROR(_) => "ERROR",
        }
    }

    /// How a grammar rule names this kind when it is *expected*.
    pub const fn expectation(&self) -> &'static str {
        match self {
            TokenKind::NUMBER => "number",
            TokenKind::LEFT_PAREN => "'('",
            TokenKind::RIGHT_PAREN => "')'",
            TokenKind::PLUS => "'+'",
            TokenKind::MINUS => "'-'",
            TokenKind::STAR => "'*'",
            TokenKind::SLASH => "'/'",
            TokenKind::EOF => "end of input",
            TokenKind::ERROR(_) => "error",
        }
    }

    /// `EOF` and `ERROR` close the token stream.
    pub const fn is_terminal(&self) -> bool {
        matches!(self, TokenKind::EOF | TokenKind::ERROR(_))
    }
}

impl PartialEq for TokenKind {
    /// Two kinds are equal if they share the same variant
    /// (ignoring any inner data). Uses `mem::discriminant` to compare.
    fn eq(&self, other: &Self) -> bool {
        mem::discriminant(self) == mem::discriminant(other)
    }
}

impl Eq for TokenKind {}

/// A scanned token: its kind, the text it was built from, and where it
/// started.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Token {
    /// The category of this token.
    pub kind: TokenKind,

    /// Source text for lexemes, a diagnostic for `ERROR`, empty for `EOF`.
    pub text: String,

    /// 0‑based character offset of the token's first character.
    pub position: usize,
}

impl Token {
    /// Create a new Token with the given kind, text, and position.
    pub fn new<S: Into<String>>(kind: TokenKind, text: S, position: usize) -> Self {
        let text: String = text.into();

        debug!(
            "Creating new token: kind={:?}, text={}, position={}",
            kind, text, position
        );

        Self {
            kind,
            text,
            position,
        }
    }

    /// Short rendering used in syntax error messages.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::EOF => "end of input".to_string(),
            TokenKind::ERROR(c) => format!("invalid character {:?}", c),
            TokenKind::NUMBER => format!("number '{}'", self.text),
            _ => format!("'{}'", self.text),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // ── literal column: 3 → "3.0", 3.14 → "3.14", everything else "null"
        let literal: String = match self.kind {
            TokenKind::NUMBER => match self.text.parse::<f64>() {
                Ok(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                    let mut buf: itoa::Buffer = itoa::Buffer::new();
                    format!("{}.0", buf.format(n as i64))
                }
                Ok(n) => n.to_string(),
                Err(_) => "null".to_string(),
            },
            _ => "null".to_string(),
        };

        write!(f, "{} {} {}", self.kind.name(), self.text, literal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kinds_compare_by_variant() {
        assert_eq!(TokenKind::ERROR('.'), TokenKind::ERROR('$'));
        assert_ne!(TokenKind::ERROR('.'), TokenKind::EOF);
    }

    #[test]
    fn display_adds_literal_column() {
        assert_eq!(Token::new(TokenKind::NUMBER, "42", 0).to_string(), "NUMBER 42 42.0");
        assert_eq!(Token::new(TokenKind::NUMBER, "3.25", 0).to_string(), "NUMBER 3.25 3.25");
        assert_eq!(Token::new(TokenKind::STAR, "*", 3).to_string(), "STAR * null");
        assert_eq!(Token::new(TokenKind::EOF, "", 4).to_string(), "EOF  null");
    }

    #[test]
    fn describe_names_offending_token() {
        assert_eq!(Token::new(TokenKind::EOF, "", 0).describe(), "end of input");
        assert_eq!(Token::new(TokenKind::RIGHT_PAREN, ")", 5).describe(), "')'");
        assert_eq!(Token::new(TokenKind::NUMBER, "7", 1).describe(), "number '7'");
    }
}
