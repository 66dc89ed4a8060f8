use serde::Serialize;
use std::fmt;
use std::mem;

/// Prefix sign operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnaryOp {
    /// `+x`, evaluated as `0 + x`
    Plus,

    /// `-x`, evaluated as `0 - x`
    Minus,
}

/// Infix arithmetic operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BinaryOp {
    /// `a + b`
    Add,

    /// `a - b`
    Sub,

    /// `a * b`
    Mul,

    /// `a / b`, IEEE‑754 division (no zero check)
    Div,
}

impl UnaryOp {
    pub const fn symbol(&self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Minus => "-",
        }
    }
}

impl BinaryOp {
    pub const fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// **Abstract‑Syntax‑Tree node** for an arithmetic expression.
///
/// Every interior node owns its children outright; the tree is built
/// bottom‑up by the parser and never mutated afterwards. Parentheses leave no
/// trace: `(1 + 2)` and `1 + 2` produce the same tree.
///
/// Trees may be arbitrarily deep (`------5`, `((((1))))`), so nothing in the
/// crate walks them by recursion: [`depth`](Expr::depth), the evaluator, the
/// printers and `Drop` all use an explicit stack. The derived `Serialize` is
/// the one exception and is only safe on shallow trees.
#[derive(Debug, PartialEq, Serialize)]
pub enum Expr {
    /// Numeric literal, already converted from its decimal text.
    Literal(f64),

    /// Prefix sign applied to an operand.
    Unary {
        operator: UnaryOp,
        right: Box<Expr>,
    },

    /// Infix operator; `left` is evaluated first.
    Binary {
        left: Box<Expr>,
        operator: BinaryOp,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn unary(operator: UnaryOp, right: Expr) -> Self {
        Expr::Unary {
            operator,
            right: Box::new(right),
        }
    }

    pub fn binary(left: Expr, operator: BinaryOp, right: Expr) -> Self {
        Expr::Binary {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }
    }

    /// Longest root‑to‑leaf path, counting the root.
    pub fn depth(&self) -> usize {
        let mut deepest: usize = 0;
        let mut pending: Vec<(&Expr, usize)> = vec![(self, 1)];

        while let Some((expr, level)) = pending.pop() {
            deepest = deepest.max(level);

            match expr {
                Expr::Literal(_) => {}

                Expr::Unary { right, .. } => pending.push((right, level + 1)),

                Expr::Binary { left, right, .. } => {
                    pending.push((left, level + 1));
                    pending.push((right, level + 1));
                }
            }
        }

        deepest
    }

    /// Moves this node's children into `out`, leaving literal placeholders.
    fn detach_children(&mut self, out: &mut Vec<Expr>) {
        match self {
            Expr::Literal(_) => {}

            Expr::Unary { right, .. } => out.push(mem::replace(&mut **right, Expr::Literal(0.0))),

            Expr::Binary { left, right, .. } => {
                out.push(mem::replace(&mut **left, Expr::Literal(0.0)));
                out.push(mem::replace(&mut **right, Expr::Literal(0.0)));
            }
        }
    }
}

impl Drop for Expr {
    // Each popped node is emptied before it drops, so no drop nests.
    fn drop(&mut self) {
        let mut pending: Vec<Expr> = Vec::new();
        self.detach_children(&mut pending);

        while let Some(mut expr) = pending.pop() {
            expr.detach_children(&mut pending);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sign_chain(n: usize) -> Expr {
        (0..n).fold(Expr::Literal(1.0), |right, _| Expr::unary(UnaryOp::Minus, right))
    }

    #[test]
    fn depth_counts_longest_branch() {
        let expr = Expr::binary(
            Expr::Literal(1.0),
            BinaryOp::Add,
            Expr::unary(UnaryOp::Minus, Expr::Literal(2.0)),
        );

        assert_eq!(expr.depth(), 3);
        assert_eq!(Expr::Literal(0.0).depth(), 1);
    }

    #[test]
    fn very_deep_tree_measures_and_drops() {
        let expr = sign_chain(300_000);

        assert_eq!(expr.depth(), 300_001);
        drop(expr);
    }

    #[test]
    fn deep_left_fold_drops() {
        let expr = (0..300_000).fold(Expr::Literal(0.0), |left, _| {
            Expr::binary(left, BinaryOp::Sub, Expr::Literal(1.0))
        });

        assert_eq!(expr.depth(), 300_001);
    }
}
