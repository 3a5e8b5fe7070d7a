//! Filter Grammar Tests
//!
//! The filter language is a closed grammar:
//! - comparisons, `and`/`or` with `and` binding tighter, parentheses
//! - column names bare or backticked, string/number/boolean literals
//! - anything else is rejected before any row is touched

use tableqa::filter::{filter_rows, parse, CompareOp, Expr, FilterError, Literal, Operand, MAX_DEPTH};
use tableqa::table::{Column, Table};

// =============================================================================
// Helper Functions
// =============================================================================

fn passengers() -> Table {
    Table::new(vec![
        Column::numeric("Pclass", [Some(1.0), Some(3.0), Some(2.0), Some(3.0)]),
        Column::text("Sex", [Some("female"), Some("male"), Some("female"), Some("male")]),
        Column::text("Home Port", [Some("S"), Some("C"), Some("S"), None]),
        Column::numeric("Fare", [Some(71.28), Some(7.25), Some(13.0), Some(8.05)]),
    ])
    .unwrap()
}

fn matching(expr: &str) -> Vec<usize> {
    filter_rows(&passengers(), Some(expr)).unwrap().rows().to_vec()
}

// =============================================================================
// Structure
// =============================================================================

#[test]
fn test_and_binds_tighter_than_or() {
    let expr = parse("a == 1 or b == 2 and c == 3").unwrap();
    match expr {
        Expr::Or(terms) => {
            assert_eq!(terms.len(), 2);
            assert!(matches!(terms[0], Expr::Compare { .. }));
            assert!(matches!(&terms[1], Expr::And(inner) if inner.len() == 2));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_chains_are_flat() {
    let expr = parse("a == 1 and b == 2 and c == 3 and d == 4").unwrap();
    assert!(matches!(&expr, Expr::And(terms) if terms.len() == 4));

    let expr = parse("a == 1 or b == 2 or (c == 3 or d == 4)").unwrap();
    match expr {
        Expr::Or(terms) => {
            assert_eq!(terms.len(), 3);
            assert!(matches!(&terms[2], Expr::Or(inner) if inner.len() == 2));
        }
        other => panic!("unexpected {:?}", other),
    }
}

#[test]
fn test_literals_and_backticks() {
    let expr = parse("`Home Port` != \"S\"").unwrap();
    assert_eq!(
        expr,
        Expr::Compare {
            left: Operand::Column("Home Port".into()),
            op: CompareOp::Ne,
            right: Operand::Literal(Literal::Text("S".into())),
        }
    );
    assert_eq!(expr.columns(), vec!["Home Port"]);

    let expr = parse("Fare >= -1.5e1").unwrap();
    assert!(matches!(
        expr,
        Expr::Compare {
            right: Operand::Literal(Literal::Number(n)),
            ..
        } if n == -15.0
    ));
}

#[test]
fn test_keywords_are_case_insensitive() {
    assert_eq!(matching("Pclass == 3 AND Sex == 'male'"), vec![1, 3]);
    assert_eq!(matching("Pclass == 1 Or Pclass == 2"), vec![0, 2]);
}

// =============================================================================
// Evaluation
// =============================================================================

#[test]
fn test_parentheses_change_grouping() {
    assert_eq!(matching("Sex == 'male' or Pclass == 1 and Fare < 10"), vec![1, 3]);
    assert_eq!(matching("(Sex == 'male' or Pclass == 1) and Fare < 10"), vec![1, 3]);
    assert_eq!(matching("(Sex == 'female' or Pclass == 3) and Fare > 10"), vec![0, 2]);
}

#[test]
fn test_missing_values_never_match_comparisons() {
    assert_eq!(matching("`Home Port` == 'S'"), vec![0, 2]);
    assert_eq!(matching("`Home Port` < 'Z'"), vec![0, 1, 2]);
}

// =============================================================================
// Rejection
// =============================================================================

#[test]
fn test_code_injection_is_rejected() {
    for expr in [
        "__import__('os').system('rm -rf /')",
        "Pclass == 1 .",
        "Pclass == 1; drop table",
        "Pclass + 1 == 2",
        "Sex in ['male']",
        "not Pclass == 1",
        "Pclass = 1",
    ] {
        assert!(parse(expr).is_err(), "accepted {:?}", expr);
    }
}

#[test]
fn test_error_kinds() {
    assert!(matches!(
        parse("Sex == 'male"),
        Err(FilterError::UnterminatedQuote { position: 7 })
    ));
    assert!(matches!(
        parse("Pclass =="),
        Err(FilterError::UnexpectedEnd { .. })
    ));
    assert!(matches!(
        parse("Pclass == 1 and"),
        Err(FilterError::UnexpectedEnd { .. })
    ));
    assert!(matches!(
        parse("Sex like 'm%'"),
        Err(FilterError::UnsupportedOperator { .. })
    ));
}

#[test]
fn test_nesting_limit() {
    let ok = format!("{}Pclass == 1{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
    assert!(parse(&ok).is_ok());

    let deep = format!(
        "{}Pclass == 1{}",
        "(".repeat(MAX_DEPTH + 1),
        ")".repeat(MAX_DEPTH + 1)
    );
    assert_eq!(parse(&deep), Err(FilterError::TooDeep(MAX_DEPTH)));
}

#[test]
fn test_long_chains_do_not_grow_the_stack() {
    let conjunction = vec!["Pclass == 3"; 100_000].join(" and ");
    assert_eq!(matching(&conjunction), vec![1, 3]);

    let disjunction = vec!["Pclass == 9"; 100_000].join(" or ") + " or Sex == 'female'";
    assert_eq!(matching(&disjunction), vec![0, 2]);
}

#[test]
fn test_unknown_column_is_reported_by_name() {
    let err = filter_rows(&passengers(), Some("Cabin == 'B5'")).unwrap_err();
    assert_eq!(err.column(), Some("Cabin"));
    assert_eq!(err.to_string(), "unknown column 'Cabin'");
}
