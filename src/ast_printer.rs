use crate::expr::Expr;

/// Renders a number the way the `tokenize` literal column does:
/// `3.0` → `"3.0"`, `3.5` → `"3.5"`.
fn literal(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{:.1}", n)
    } else {
        n.to_string()
    }
}

/// Pending output for the printers' explicit‑stack walks.
enum Piece<'e> {
    Visit(&'e Expr),
    Text(&'static str),
}

/// Converts an expression to parenthesised prefix form:
/// `2 + 3 * 4` → `(+ 2.0 (* 3.0 4.0))`, `-5` → `(- 5.0)`.
pub struct AstPrinter;

impl AstPrinter {
    pub fn print(expr: &Expr) -> String {
        let mut out = String::new();
        let mut work: Vec<Piece<'_>> = vec![Piece::Visit(expr)];

        // Pushed in reverse: the last push is written first.
        while let Some(piece) = work.pop() {
            match piece {
                Piece::Text(text) => out.push_str(text),

                Piece::Visit(Expr::Literal(n)) => out.push_str(&literal(*n)),

                Piece::Visit(Expr::Unary { operator, right }) => {
                    work.push(Piece::Text(")"));
                    work.push(Piece::Visit(right));
                    work.push(Piece::Text(" "));
                    work.push(Piece::Text(operator.symbol()));
                    work.push(Piece::Text("("));
                }

                Piece::Visit(Expr::Binary {
                    left,
                    operator,
                    right,
                }) => {
                    work.push(Piece::Text(")"));
                    work.push(Piece::Visit(right));
                    work.push(Piece::Text(" "));
                    work.push(Piece::Visit(left));
                    work.push(Piece::Text(" "));
                    work.push(Piece::Text(operator.symbol()));
                    work.push(Piece::Text("("));
                }
            }
        }

        out
    }
}

/// Converts an expression to reverse Polish notation by post‑order walk:
/// `5 + ((1 + 2) * 4) - 3` → `5 1 2 + 4 * + 3 -`.
///
/// A sign has no postfix form of its own, so it is written out as what it
/// means: `-x` → `0 x -`, `+x` → `0 x +`.
pub struct RpnPrinter;

impl RpnPrinter {
    pub fn print(expr: &Expr) -> String {
        let mut out: Vec<String> = Vec::new();
        let mut work: Vec<Piece<'_>> = vec![Piece::Visit(expr)];

        while let Some(piece) = work.pop() {
            match piece {
                Piece::Text(text) => out.push(text.to_string()),

                Piece::Visit(Expr::Literal(n)) => out.push(n.to_string()),

                Piece::Visit(Expr::Unary { operator, right }) => {
                    work.push(Piece::Text(operator.symbol()));
                    work.push(Piece::Visit(right));
                    work.push(Piece::Text("0"));
                }

                Piece::Visit(Expr::Binary {
                    left,
                    operator,
                    right,
                }) => {
                    work.push(Piece::Text(operator.symbol()));
                    work.push(Piece::Visit(right));
                    work.push(Piece::Visit(left));
                }
            }
        }

        out.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_str;

    fn rpn(src: &str) -> String {
        RpnPrinter::print(&parse_str(src).unwrap())
    }

    #[test]
    fn prefix_form_drops_grouping() {
        let expr = parse_str("(2 + 3) * -4.5").unwrap();

        assert_eq!(AstPrinter::print(&expr), "(* (+ 2.0 3.0) (- 4.5))");
    }

    #[test]
    fn postfix_follows_precedence() {
        assert_eq!(rpn("2 + 3"), "2 3 +");
        assert_eq!(rpn("2 + 3 * 5"), "2 3 5 * +");
        assert_eq!(rpn("5 + ((1 + 2) * 4) - 3"), "5 1 2 + 4 * + 3 -");
        assert_eq!(rpn("(5 + 3) * 12 / 3"), "5 3 + 12 * 3 /");
    }

    #[test]
    fn postfix_spells_out_signs() {
        assert_eq!(rpn("--2.5"), "0 0 2.5 - -");
    }

    #[test]
    fn deep_trees_print() {
        let depth = 150_000;
        let expr = parse_str(&format!("{}7", "-".repeat(depth))).unwrap();

        let prefix = AstPrinter::print(&expr);
        assert!(prefix.starts_with("(- (- "));
        assert_eq!(prefix.matches(')').count(), depth);

        let postfix = RpnPrinter::print(&expr);
        assert!(postfix.starts_with("0 0 0"));
        assert!(postfix.ends_with("7 - - -"));
    }
}
