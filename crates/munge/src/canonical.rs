//! Recognized `if` tests and their canonical comparison
//!
//! Two test expressions are the same when their ASTs are structurally equal:
//! source ranges, spacing, redundant parentheses and quote style do not
//! matter, while every operator, name and literal value must match exactly.

use once_cell::sync::Lazy;
use ruff_python_ast::{Expr, comparable::ComparableExpr};
use ruff_python_parser::parse_expression;

/// Constant header a folded `if` is rewritten to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// `if 1:`, the branch is always taken
    AlwaysTrue,
    /// `if 0:`, the branch is dead and `mpy-cross` drops it
    AlwaysFalse,
}

impl Marker {
    pub const fn header(self) -> &'static str {
        match self {
            Self::AlwaysTrue => "if 1:",
            Self::AlwaysFalse => "if 0:",
        }
    }
}

/// A test expression the munge pass knows how to fold
#[derive(Debug)]
pub struct KnownTest {
    pub marker: Marker,
    expr: Expr,
}

const KNOWN_TEST_SOURCES: [(&str, Marker); 4] = [
    (
        r#"sys.implementation.name == "circuitpython""#,
        Marker::AlwaysTrue,
    ),
    (
        r#"not sys.implementation.name == "circuitpython""#,
        Marker::AlwaysFalse,
    ),
    (
        r#"sys.implementation.name != "circuitpython""#,
        Marker::AlwaysFalse,
    ),
    ("TYPE_CHECKING", Marker::AlwaysFalse),
];

static KNOWN_TESTS: Lazy<Vec<KnownTest>> = Lazy::new(|| {
    KNOWN_TEST_SOURCES
        .iter()
        .map(|&(source, marker)| {
            let expr = parse_expression(source)
                .unwrap_or_else(|err| panic!("invalid built-in test `{source}`: {err}"))
                .into_expr();
            KnownTest { marker, expr }
        })
        .collect()
});

/// Every test expression that gets folded, in match order
pub fn known_tests() -> &'static [KnownTest] {
    &KNOWN_TESTS
}

/// Whether `left` and `right` are the same expression up to formatting
pub fn same_expression(left: &Expr, right: &Expr) -> bool {
    ComparableExpr::from(left) == ComparableExpr::from(right)
}

/// Find the known test that `test` spells, if any
pub fn match_known_test(test: &Expr) -> Option<&'static KnownTest> {
    known_tests()
        .iter()
        .find(|known| same_expression(&known.expr, test))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Expr {
        parse_expression(source)
            .expect("Failed to parse test expression")
            .into_expr()
    }

    fn marker_for(source: &str) -> Option<Marker> {
        match_known_test(&parse(source)).map(|known| known.marker)
    }

    #[test]
    fn test_known_tests_fold_to_expected_markers() {
        assert_eq!(
            marker_for(r#"sys.implementation.name == "circuitpython""#),
            Some(Marker::AlwaysTrue)
        );
        assert_eq!(
            marker_for(r#"sys.implementation.name != "circuitpython""#),
            Some(Marker::AlwaysFalse)
        );
        assert_eq!(
            marker_for(r#"not sys.implementation.name == "circuitpython""#),
            Some(Marker::AlwaysFalse)
        );
        assert_eq!(marker_for("TYPE_CHECKING"), Some(Marker::AlwaysFalse));
    }

    #[test]
    fn test_spacing_quotes_and_parentheses_are_ignored() {
        assert_eq!(
            marker_for("sys.implementation.name=='circuitpython'"),
            Some(Marker::AlwaysTrue)
        );
        assert_eq!(
            marker_for(r#"(sys.implementation.name  ==  "circuitpython")"#),
            Some(Marker::AlwaysTrue)
        );
        assert_eq!(
            marker_for(r#"not (sys.implementation.name == "circuitpython")"#),
            Some(Marker::AlwaysFalse)
        );
    }

    #[test]
    fn test_structurally_different_tests_do_not_match() {
        assert_eq!(marker_for(r#"sys.implementation.name == "micropython""#), None);
        assert_eq!(marker_for(r#""circuitpython" == sys.implementation.name"#), None);
        assert_eq!(marker_for("typing.TYPE_CHECKING"), None);
        assert_eq!(marker_for("not TYPE_CHECKING"), None);
        assert_eq!(
            marker_for(r#"sys.implementation.name == "circuitpython" and DEBUG"#),
            None
        );
    }

    #[test]
    fn test_marker_headers() {
        assert_eq!(Marker::AlwaysTrue.header(), "if 1:");
        assert_eq!(Marker::AlwaysFalse.header(), "if 0:");
    }
}
