use surfplot_core::{Expression, ExpressionError, MAX_DEPTH};

fn eval(text: &str, x: f64, y: f64) -> f64 {
    Expression::parse(text).expect("valid expression").eval(x, y)
}

#[test]
fn paraboloid_is_zero_at_origin() {
    assert_eq!(eval("x**2 + y**2", 0.0, 0.0), 0.0);
    assert_eq!(eval("x**2 + y**2", 3.0, 4.0), 25.0);
}

#[test]
fn trig_sum_is_one_at_origin() {
    assert_eq!(eval("sin(x) + cos(y)", 0.0, 0.0), 1.0);
}

#[test]
fn constants_and_whitelisted_functions_resolve() {
    assert!((eval("cos(pi)", 0.0, 0.0) + 1.0).abs() < 1e-12);
    assert!((eval("exp(1) - e", 0.0, 0.0)).abs() < 1e-12);
    assert_eq!(eval("sqrt(abs(x))", -16.0, 0.0), 4.0);
    assert_eq!(eval("arctan2(y, x)", 1.0, 0.0), 0.0);
    assert_eq!(eval("maximum(x, y)", 2.0, 5.0), 5.0);
}

#[test]
fn precedence_follows_python() {
    assert_eq!(eval("1 + 2 * 3", 0.0, 0.0), 7.0);
    assert_eq!(eval("(1 + 2) * 3", 0.0, 0.0), 9.0);
    assert_eq!(eval("2**3**2", 0.0, 0.0), 512.0);
    assert_eq!(eval("-2**2", 0.0, 0.0), -4.0);
    assert_eq!(eval("(-2)**2", 0.0, 0.0), 4.0);
    assert_eq!(eval("8 / 4 / 2", 0.0, 0.0), 1.0);
    assert_eq!(eval("10 - 4 - 3", 0.0, 0.0), 3.0);
    assert_eq!(eval("--x", 5.0, 0.0), 5.0);
}

#[test]
fn number_literals() {
    assert_eq!(eval(".5 + 1.", 0.0, 0.0), 1.5);
    assert_eq!(eval("1.5e2", 0.0, 0.0), 150.0);
    assert_eq!(eval("2E-1", 0.0, 0.0), 0.2);
}

#[test]
fn division_by_zero_is_not_an_error() {
    assert!(eval("1 / x", 0.0, 0.0).is_infinite());
    assert!(eval("x / x", 0.0, 0.0).is_nan());
}

#[test]
fn undefined_name_is_rejected() {
    let err = Expression::parse("x + undefined_name").unwrap_err();
    assert!(matches!(err, ExpressionError::UnknownName(ref name) if name == "undefined_name"));
}

#[test]
fn general_evaluator_features_are_rejected() {
    for text in [
        "__import__('os')",
        "np.sin(x)",
        "[x for x in y]",
        "x; y",
        "lambda: 1",
    ] {
        assert!(Expression::parse(text).is_err(), "{text} should not parse");
    }
}

#[test]
fn syntax_errors_are_structured() {
    for text in ["x +", "2x", "sin(x", "x ** * y", ")"] {
        assert!(
            matches!(Expression::parse(text), Err(ExpressionError::Syntax(_))),
            "{text} should be a syntax error"
        );
    }
}

#[test]
fn empty_text_is_rejected() {
    assert!(matches!(Expression::parse("   "), Err(ExpressionError::Empty)));
}

#[test]
fn call_shapes_are_checked() {
    assert!(matches!(
        Expression::parse("sin(x, y)"),
        Err(ExpressionError::Arity { expected: 1, found: 2, .. })
    ));
    assert!(matches!(
        Expression::parse("hypot(x)"),
        Err(ExpressionError::Arity { expected: 2, found: 1, .. })
    ));
    assert!(matches!(
        Expression::parse("x(1)"),
        Err(ExpressionError::NotCallable(_))
    ));
    assert!(matches!(
        Expression::parse("sin + 1"),
        Err(ExpressionError::NotCallable(_))
    ));
    assert!(matches!(
        Expression::parse("system(x)"),
        Err(ExpressionError::UnknownFunction(_))
    ));
}

#[test]
fn source_text_is_preserved() {
    let expr = Expression::parse("x*y").unwrap();
    assert_eq!(expr.source(), "x*y");
    assert_eq!(expr.to_string(), "x*y");
}

fn too_complex(text: &str) -> bool {
    matches!(
        Expression::parse(text),
        Err(ExpressionError::TooComplex(MAX_DEPTH))
    )
}

#[test]
fn long_formulas_are_rejected_instead_of_overflowing() {
    assert!(too_complex(&vec!["x"; 50_000].join("+")));
    assert!(too_complex(&vec!["x"; 50_000].join("*")));
    assert!(too_complex(&vec!["x"; 50_000].join("**")));
    assert!(too_complex(&format!("{}x", "-".repeat(50_000))));
    assert!(too_complex(&format!("{}x{}", "(".repeat(300), ")".repeat(300))));
    assert!(too_complex(&format!("{}x{}", "sin(".repeat(300), ")".repeat(300))));
}

#[test]
fn formulas_within_the_limit_still_compile() {
    assert_eq!(eval(&vec!["x"; 200].join(" + "), 1.0, 0.0), 200.0);
    assert_eq!(eval(&format!("{}x{}", "(".repeat(100), ")".repeat(100)), 2.0, 0.0), 2.0);
    assert_eq!(eval(&format!("{}x", "-".repeat(100)), 3.0, 0.0), 3.0);
}
