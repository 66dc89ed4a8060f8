//! Module `scanner` implements a one‑pass, streaming, Unicode‑aware lexer for
//! arithmetic expressions.
//!
//! It transforms a `&str` into a sequence of owned [`Token`]s, skipping
//! whitespace and emitting exactly one terminal token at the end: `EOF` when
//! the input is exhausted, or `ERROR` at the first character it cannot
//! classify. Designed as a `FusedIterator`, it yields `None` forever after the
//! terminal token, so it can be handed straight to the parser or to a
//! producer thread.
//!
//! # Token Recognition (`scan_token`)
//!
//! - Whitespace: anything `char::is_whitespace` accepts, never emitted.
//! - Operators: `+ - * / ( )`, resolved via a perfect‑hash `OPERATORS` map.
//! - Numbers: ASCII digits with an optional fraction. The `.` is consumed
//!   **only** when a digit follows it, so `5.` scans as `NUMBER 5` followed by
//!   an `ERROR` for the lone dot.
//! - Anything else (one `char`, however many bytes) yields `ERROR`.
//!
//! Positions are character offsets, not byte offsets.
//!
//! # Example
//!
//! ```rust
//! use streamcalc::scanner::Scanner;
//!
//! for token in Scanner::new("1 + 2") {
//!     println!("{}", token);
//! }
//! ```

use crate::token::{Token, TokenKind};
use log::{debug, info};
use phf::phf_map;
use std::iter::FusedIterator;

// ─────────────────────────────────────────────────────────────────────────────
// Static operator map (compile‑time perfect hash)
// ─────────────────────────────────────────────────────────────────────────────

static OPERATORS: phf::Map<char, TokenKind> = phf_map! {
    '(' => TokenKind::LEFT_PAREN,
    ')' => TokenKind::RIGHT_PAREN,
    '+' => TokenKind::PLUS,
    '-' => TokenKind::MINUS,
    '*' => TokenKind::STAR,
    '/' => TokenKind::SLASH,
};

/// A single pass **scanner / lexer** that converts source text into a
/// sequence of [`Token`]s.
pub struct Scanner<'a> {
    src: &'a str,                // entire source expression
    start: usize,                // byte index of the first char of the current lexeme
    curr: usize,                 // byte index one past the last char examined
    start_pos: usize,            // char offset matching `start`
    pos: usize,                  // char offset matching `curr`
    pending: Option<TokenKind>,  // recognised kind waiting to be emitted
    finished: bool,              // terminal token already yielded
}

impl<'a> Scanner<'a> {
    /// Create a new lexer over `src`.
    #[inline]
    pub fn new(src: &'a str) -> Self {
        info!("Scanner created over {} bytes", src.len());

        Self {
            src,
            start: 0,
            curr: 0,
            start_pos: 0,
            pos: 0,
            pending: None,
            finished: false,
        }
    }

    // ───────────────────────────── primitive helpers ────────────────────────

    /// Are we at (or past) the end of input?
    #[inline(always)]
    fn is_at_end(&self) -> bool {
        self.curr >= self.src.len()
    }

    /// Advance one char and return it.  Higher‑level code always guards with
    /// [`is_at_end`](Self::is_at_end).
    #[inline(always)]
    fn advance(&mut self) -> Option<char> {
        let c = self.src[self.curr..].chars().next()?;
        self.curr += c.len_utf8();
        self.pos += 1;
        Some(c)
    }

    /// Peek at the current char without consuming it.
    #[inline(always)]
    fn peek(&self) -> Option<char> {
        self.src[self.curr..].chars().next()
    }

    /// Peek one char beyond [`peek`](Self::peek).
    #[inline(always)]
    fn peek_next(&self) -> Option<char> {
        self.src[self.curr..].chars().nth(1)
    }

    #[inline(always)]
    fn peek_is_digit(&self) -> bool {
        self.peek().is_some_and(|c| c.is_ascii_digit())
    }

    // ───────────────────────────── core lexing ─────────────────────────────

    /// Scan a *single* token starting at `self.curr`.  If the lexeme produces
    /// an actual token the kind is stored in `self.pending`.  Whitespace is
    /// skipped by leaving `pending = None`.
    fn scan_token(&mut self) {
        let Some(c) = self.advance() else {
            return;
        };

        if c.is_whitespace() {
            return;
        }

        if let Some(kind) = OPERATORS.get(&c) {
            self.pending = Some(*kind);
            return;
        }

        if c.is_ascii_digit() {
            self.parse_number();
            return;
        }

        self.pending = Some(TokenKind::ERROR(c));
    }

    /// Parse a numeric literal (`123`, `3.14`).  Fractions are optional and
    /// need at least one digit after the dot.
    fn parse_number(&mut self) {
        while self.peek_is_digit() {
            self.advance();
        }

        if self.peek() == Some('.') && self.peek_next().is_some_and(|c| c.is_ascii_digit()) {
            self.advance(); // consume "."

            while self.peek_is_digit() {
                self.advance();
            }
        }

        self.pending = Some(TokenKind::NUMBER);
    }
}

// ───────────────────────── Iterator implementation ─────────────────────────

impl<'a> Iterator for Scanner<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            // 1. EOF guard – emit exactly one EOF then terminate.
            if self.is_at_end() {
                self.finished = true;
                debug!("Reached end of input at position {}", self.pos);

                return Some(Token::new(TokenKind::EOF, "", self.pos));
            }

            // 2. Reset per‑token state.
            self.start = self.curr;
            self.start_pos = self.pos;
            self.pending = None;

            self.scan_token();

            // 3. If a real token was recognised, build and return it.
            if let Some(kind) = self.pending.take() {
                let token = match kind {
                    TokenKind::ERROR(c) => {
                        self.finished = true;
                        debug!("Unexpected character {:?} at position {}", c, self.start_pos);

                        Token::new(
                            kind,
                            format!("Unexpected character: {}", c),
                            self.start_pos,
                        )
                    }
                    _ => Token::new(kind, &self.src[self.start..self.curr], self.start_pos),
                };

                return Some(token);
            }
            // Otherwise it was whitespace → continue loop.
        }
    }
}

impl<'a> FusedIterator for Scanner<'a> {}
