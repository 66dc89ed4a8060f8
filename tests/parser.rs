use streamcalc::error::CalcError;
use streamcalc::expr::{BinaryOp, Expr, UnaryOp};
use streamcalc::parse_str;
use streamcalc::parser::Parser;
use streamcalc::stream::TokenStream;

#[test]
fn product_binds_tighter_than_sum() {
    let expected = Expr::binary(
        Expr::Literal(2.0),
        BinaryOp::Add,
        Expr::binary(Expr::Literal(3.0), BinaryOp::Mul, Expr::Literal(4.0)),
    );

    assert_eq!(parse_str("2 + 3 * 4").unwrap(), expected);
}

#[test]
fn division_folds_left() {
    let expected = Expr::binary(
        Expr::binary(Expr::Literal(8.0), BinaryOp::Div, Expr::Literal(4.0)),
        BinaryOp::Div,
        Expr::Literal(2.0),
    );

    assert_eq!(parse_str("8 / 4 / 2").unwrap(), expected);
}

#[test]
fn every_sign_in_a_chain_builds_a_node() {
    for n in [1usize, 2, 3, 10, 500, 200_000] {
        let source = format!("{}5", "-".repeat(n));
        let expr = parse_str(&source).unwrap();

        assert_eq!(expr.depth(), n + 1, "chain of {} signs", n);
    }

    assert!(matches!(
        parse_str("+-9").unwrap(),
        Expr::Unary {
            operator: UnaryOp::Plus,
            ..
        }
    ));
}

#[test]
fn unclosed_paren_expects_right_paren() {
    match parse_str("(1 + 2") {
        Err(CalcError::Syntax {
            expected,
            found,
            position,
        }) => {
            assert_eq!(expected, "')'");
            assert_eq!(found, "end of input");
            assert_eq!(position, 6);
        }
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn trailing_input_is_rejected() {
    match parse_str("1 + 2)") {
        Err(CalcError::Syntax {
            expected,
            found,
            position,
        }) => {
            assert_eq!(expected, "end of input");
            assert_eq!(found, "')'");
            assert_eq!(position, 5);
        }
        other => panic!("unexpected result: {:?}", other),
    }

    assert!(matches!(parse_str("1 2"), Err(CalcError::Syntax { .. })));
}

#[test]
fn trailing_dot_is_a_lex_error() {
    assert!(matches!(
        parse_str("5."),
        Err(CalcError::Lex {
            character: '.',
            position: 1
        })
    ));
}

#[test]
fn bad_character_in_operand_position_is_a_lex_error() {
    assert!(matches!(
        parse_str("3 * (x)"),
        Err(CalcError::Lex {
            character: 'x',
            position: 5
        })
    ));
}

#[test]
fn empty_input_is_its_own_error() {
    assert!(matches!(parse_str(""), Err(CalcError::EmptyInput)));
}

#[test]
fn dangling_operator_expects_expression() {
    match parse_str("4 -") {
        Err(CalcError::Syntax { expected, .. }) => assert_eq!(expected, "expression"),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn deep_nesting_parses() {
    let depth = 150_000;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));

    assert_eq!(parse_str(&source).unwrap(), Expr::Literal(1.0));
}

#[test]
fn deep_nesting_keeps_operators_per_level() {
    // (1 - (1 - (1 - ... (1) ...)))
    let depth = 120_000;
    let source = format!("{}1{}", "(1 - ".repeat(depth), ")".repeat(depth));
    let expr = parse_str(&source).unwrap();

    assert_eq!(expr.depth(), depth + 1);
    assert!(matches!(
        expr,
        Expr::Binary {
            operator: BinaryOp::Sub,
            ..
        }
    ));
}

#[test]
fn unclosed_deep_nesting_is_a_syntax_error() {
    let depth = 150_000;
    let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth - 1));

    match parse_str(&source) {
        Err(CalcError::Syntax { expected, .. }) => assert_eq!(expected, "')'"),
        other => panic!("unexpected result: {:?}", other.map(|e| e.depth())),
    }
}

#[test]
fn threaded_stream_builds_the_same_tree() {
    let source = "-(1 + 2) * 3 / --4";
    let stream = TokenStream::spawn(source, 1).unwrap();

    assert_eq!(
        Parser::new(stream).parse().unwrap(),
        parse_str(source).unwrap()
    );
}

#[test]
fn threaded_stream_handles_deep_input() {
    let depth = 100_000;
    let source = format!("{}-{}2{}", "(".repeat(depth), "+".repeat(depth), ")".repeat(depth));
    let stream = TokenStream::spawn(source, 4).unwrap();

    assert_eq!(Parser::new(stream).parse().unwrap().depth(), depth + 2);
}

#[test]
fn threaded_stream_reports_the_same_errors() {
    let stream = TokenStream::spawn("(1 + 2", 2).unwrap();

    assert!(matches!(
        Parser::new(stream).parse(),
        Err(CalcError::Syntax { .. })
    ));
}
