/*!
Recursive‑descent parser for arithmetic expressions
===================================================

Grammar (EBNF, lower rules bind tighter)
-----------------------------------------

```text
program  → expr EOF ;
expr     → term   ( ( "+" | "-" ) term   )* ;      left‑associative
term     → factor ( ( "*" | "/" ) factor )* ;      left‑associative
factor   → NUMBER
         | "(" expr ")"
         | ( "+" | "-" ) factor ;                  right‑associative, any depth
```

The parser is generic over any `Iterator<Item = Token>`: a [`Scanner`] pulled
on demand, or a [`TokenStream`] fed by a producer thread. It keeps exactly one
lookahead token and pulls the next one only when a rule consumes the current
one.

### Errors

* The first token is `EOF` → [`CalcError::EmptyInput`].
* The lookahead does not fit the rule → [`CalcError::Syntax`] naming what was
  expected and what was found. The cursor does not move.
* The lookahead is an `ERROR` token → [`CalcError::Lex`] for its character,
  whatever the rule expected.
* A complete `expr` followed by anything but `EOF` is rejected: the whole
  input must be consumed.

### Complexity

Θ(n) in the number of tokens. The grammar is driven by a loop over an
explicit stack of open parenthesis levels rather than by recursion, so
neither `((((1))))` nor `----1` grows the call stack; nesting is bounded
only by memory. The resulting trees are just as deep, and every consumer of
[`Expr`] walks them iteratively too.

[`Scanner`]: crate::scanner::Scanner
[`TokenStream`]: crate::stream::TokenStream
*/

use crate::error::{CalcError, Result};
use crate::expr::{BinaryOp, Expr, UnaryOp};
use crate::token::{Token, TokenKind};

use std::mem;

use log::{debug, info};

/// Top‑level parser over a token source.
pub struct Parser<I>
where
    I: Iterator<Item = Token>,
{
    tokens: I,
    current: Token,
    consumed: usize,
}

/// Partial results of one parenthesis level.
#[derive(Default)]
struct Level {
    /// Signs waiting for the next primary, outermost first.
    signs: Vec<UnaryOp>,

    /// Left operand and operator of an unfinished `term`.
    product: Option<(Expr, BinaryOp)>,

    /// Left operand and operator of an unfinished `expr`.
    sum: Option<(Expr, BinaryOp)>,
}

impl Level {
    /// Completes a `factor` (innermost sign first) and folds it into a
    /// pending product.
    fn close_factor(&mut self, operand: Expr) -> Expr {
        let factor: Expr = self
            .signs
            .drain(..)
            .rev()
            .fold(operand, |right, operator| Expr::unary(operator, right));

        match self.product.take() {
            Some((left, operator)) => Expr::binary(left, operator, factor),
            None => factor,
        }
    }

    /// Folds a completed `term` into a pending sum.
    fn close_term(&mut self, term: Expr) -> Expr {
        match self.sum.take() {
            Some((left, operator)) => Expr::binary(left, operator, term),
            None => term,
        }
    }
}

impl<I> Parser<I>
where
    I: Iterator<Item = Token>,
{
    /// Construct a new parser and pull its first lookahead token.
    pub fn new(mut tokens: I) -> Self {
        let current = tokens
            .next()
            .unwrap_or_else(|| Token::new(TokenKind::EOF, "", 0));

        info!("Parser created, first token: {:?}", current.kind);

        Self {
            tokens,
            current,
            consumed: 0,
        }
    }

    // ───────────────────────── public API ─────────────────────────

    /// Parse one complete expression, requiring the input to end after it.
    pub fn parse(&mut self) -> Result<Expr> {
        info!("Beginning parse phase");

        if self.check(TokenKind::EOF) {
            debug!("Input is empty");

            return Err(CalcError::EmptyInput);
        }

        let expr: Expr = self.expression()?;

        if !self.check(TokenKind::EOF) {
            debug!("Trailing input after expression: {:?}", self.current);

            return Err(self.error(TokenKind::EOF.expectation()));
        }

        info!(
            "Parse finished: {} tokens consumed, tree depth {}",
            self.consumed,
            expr.depth()
        );

        Ok(expr)
    }

    // ───────────────────────── grammar rules ──────────────────────

    /// `expr`, with every `( expr )` handled by pushing the enclosing
    /// level's partial results onto `enclosing` instead of recursing.
    ///
    /// At an operand position the sign chain is collected, then either a
    /// `NUMBER` completes a primary or a `(` opens a new level. A completed
    /// operand is folded outward: signs first, then a pending `*`/`/`, then a
    /// pending `+`/`-`. The next operator decides whether to wait for another
    /// operand or to close the level with `)`.
    fn expression(&mut self) -> Result<Expr> {
        debug!("Entering expression");

        let mut level: Level = Level::default();
        let mut enclosing: Vec<Level> = Vec::new();

        'operand: loop {
            self.signs(&mut level.signs);

            let mut operand: Expr = match self.current.kind {
                TokenKind::NUMBER => self.literal()?,

                TokenKind::LEFT_PAREN => {
                    self.advance();
                    enclosing.push(mem::take(&mut level));

                    continue 'operand;
                }

                _ => return Err(self.error("expression")),
            };

            loop {
                operand = level.close_factor(operand);

                if let Some(operator) = self.product_operator() {
                    level.product = Some((operand, operator));

                    continue 'operand;
                }

                operand = level.close_term(operand);

                if let Some(operator) = self.sum_operator() {
                    level.sum = Some((operand, operator));

                    continue 'operand;
                }

                let Some(outer) = enclosing.pop() else {
                    return Ok(operand);
                };

                self.consume(TokenKind::RIGHT_PAREN)?;

                // The group is now a primary of the enclosing level.
                level = outer;
            }
        }
    }

    /// Collects a run of prefix signs, outermost first.
    fn signs(&mut self, signs: &mut Vec<UnaryOp>) {
        loop {
            match self.current.kind {
                TokenKind::PLUS => signs.push(UnaryOp::Plus),
                TokenKind::MINUS => signs.push(UnaryOp::Minus),
                _ => break,
            }

            self.advance();
        }
    }

    fn literal(&mut self) -> Result<Expr> {
        let token: Token = self.advance();
        let value: f64 = token
            .text
            .parse::<f64>()
            .map_err(|_| CalcError::syntax(token.position, "number", token.describe()))?;

        Ok(Expr::Literal(value))
    }

    fn product_operator(&mut self) -> Option<BinaryOp> {
        let operator: BinaryOp = match self.current.kind {
            TokenKind::STAR => BinaryOp::Mul,
            TokenKind::SLASH => BinaryOp::Div,
            _ => return None,
        };

        self.advance();

        Some(operator)
    }

    fn sum_operator(&mut self) -> Option<BinaryOp> {
        let operator: BinaryOp = match self.current.kind {
            TokenKind::PLUS => BinaryOp::Add,
            TokenKind::MINUS => BinaryOp::Sub,
            _ => return None,
        };

        self.advance();

        Some(operator)
    }

    // ────────────────────── utility helpers ───────────────────────

    #[inline(always)]
    fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Consume the lookahead if it is `kind`, otherwise report what was
    /// expected without moving.
    #[inline(always)]
    fn consume(&mut self, kind: TokenKind) -> Result<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }

        Err(self.error(kind.expectation()))
    }

    /// Replace the lookahead with the next token and return the old one.
    /// A closed stream reads as `EOF`.
    fn advance(&mut self) -> Token {
        let next: Token = if self.current.kind.is_terminal() {
            Token::new(TokenKind::EOF, "", self.current.position)
        } else {
            self.tokens
                .next()
                .unwrap_or_else(|| Token::new(TokenKind::EOF, "", self.current.position))
        };

        self.consumed += 1;

        std::mem::replace(&mut self.current, next)
    }

    /// Build the error for a lookahead that does not fit `expected`.
    fn error(&self, expected: &str) -> CalcError {
        match self.current.kind {
            TokenKind::ERROR(c) => CalcError::lex(self.current.position, c),
            _ => CalcError::syntax(self.current.position, expected, self.current.describe()),
        }
    }
}
