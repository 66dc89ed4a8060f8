//! Tree‑walking evaluator.
//!
//! Evaluation is pure and cannot fail: every arithmetic edge case, including
//! division by zero, is left to IEEE‑754 (`1/0 = inf`, `0/0 = NaN`).
//! Children are visited depth‑first, left before right, with an explicit
//! work stack so tree depth is bounded only by memory.

use log::debug;

use crate::expr::{BinaryOp, Expr, UnaryOp};

/// Walks a parsed [`Expr`] down to its value.
#[derive(Debug, Default, Clone, Copy)]
pub struct Interpreter;

impl Interpreter {
    pub fn new() -> Self {
        Self
    }

    /// Evaluates a whole tree and logs the result.
    pub fn interpret(&self, expr: &Expr) -> f64 {
        debug!("Evaluating tree of depth {}", expr.depth());

        let value: f64 = self.evaluate(expr);

        debug!("Evaluated to: {}", value);

        value
    }

    /// Evaluates a single node and everything below it.
    ///
    /// Post‑order walk over an explicit work list: operands are visited
    /// left before right, then the operator pops its values off `values`.
    pub fn evaluate(&self, expr: &Expr) -> f64 {
        let mut work: Vec<Step<'_>> = vec![Step::Visit(expr)];
        let mut values: Vec<f64> = Vec::new();

        while let Some(step) = work.pop() {
            match step {
                Step::Visit(Expr::Literal(value)) => values.push(*value),

                Step::Visit(Expr::Unary { operator, right }) => {
                    work.push(Step::Unary(*operator));
                    work.push(Step::Visit(right));
                }

                Step::Visit(Expr::Binary {
                    left,
                    operator,
                    right,
                }) => {
                    work.push(Step::Binary(*operator));
                    work.push(Step::Visit(right));
                    work.push(Step::Visit(left));
                }

                // Signs are additions to / subtractions from zero, so `-0` is
                // `0 - 0 = +0.0` and `+x` of a NaN stays NaN.
                Step::Unary(operator) => {
                    let right: f64 = pop(&mut values);

                    values.push(match operator {
                        UnaryOp::Plus => 0.0 + right,
                        UnaryOp::Minus => 0.0 - right,
                    });
                }

                Step::Binary(operator) => {
                    let right: f64 = pop(&mut values);
                    let left: f64 = pop(&mut values);

                    values.push(match operator {
                        BinaryOp::Add => left + right,
                        BinaryOp::Sub => left - right,
                        BinaryOp::Mul => left * right,
                        BinaryOp::Div => left / right,
                    });
                }
            }
        }

        pop(&mut values)
    }
}

/// Pending work for [`Interpreter::evaluate`].
enum Step<'e> {
    Visit(&'e Expr),
    Unary(UnaryOp),
    Binary(BinaryOp),
}

// Every operator step follows the visits that push its operands, so the
// value stack never underflows.
fn pop(values: &mut Vec<f64>) -> f64 {
    values.pop().unwrap_or(f64::NAN)
}

/// Evaluates `expr` with a fresh [`Interpreter`].
pub fn evaluate(expr: &Expr) -> f64 {
    Interpreter::new().interpret(expr)
}
