//! Classification of top-level statements
//!
//! Each top-level statement of a module is reduced to the one shape the
//! munge pass cares about, together with the line numbers it has to touch.
//! Statements nested inside functions, classes or other blocks are never
//! classified.

use log::trace;
use ruff_python_ast::{ExceptHandler, ExceptHandlerExceptHandler, Expr, Stmt, StmtIf, StmtTry};

use crate::{
    canonical::{Marker, match_known_test},
    source_unit::{LineSpan, SourceUnit},
};

/// Name whose assignment receives the release version
pub const VERSION_NAME: &str = "__version__";

/// Exception names a typing guard may catch and still be kept
const GUARD_EXCEPTIONS: [&str; 2] = ["ImportError", "Exception"];

/// A top-level statement, reduced to what munging needs to know about it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatementNode {
    /// `from __future__ import ...`
    FutureImport { span: LineSpan },
    /// `try:` opening with an import of `typing`
    TypingGuard {
        span: LineSpan,
        /// Span of the handler that survives, `None` when no handler qualifies
        handler: Option<LineSpan>,
    },
    /// `if` whose test is one of the recognized platform or typing checks
    Conditional { header: usize, marker: Marker },
    /// `__version__ = ...`
    VersionAssignment { line: usize },
    Other,
}

impl StatementNode {
    pub fn classify(stmt: &Stmt, unit: &SourceUnit<'_>) -> Self {
        match stmt {
            Stmt::ImportFrom(import_from)
                if import_from
                    .module
                    .as_ref()
                    .is_some_and(|module| module.as_str() == "__future__") =>
            {
                Self::FutureImport {
                    span: unit.span_of(stmt),
                }
            }
            Stmt::Try(try_stmt) => Self::classify_try(try_stmt, unit),
            Stmt::If(if_stmt) => Self::classify_if(if_stmt, unit),
            Stmt::Assign(assign) if matches!(
                assign.targets.first(),
                Some(Expr::Name(name)) if name.id.as_str() == VERSION_NAME
            ) =>
            {
                Self::VersionAssignment {
                    line: unit.span_of(stmt).start,
                }
            }
            _ => Self::Other,
        }
    }

    fn classify_try(try_stmt: &StmtTry, unit: &SourceUnit<'_>) -> Self {
        // `try/except*` is a different statement in the grammar; leave it alone
        if try_stmt.is_star || !try_stmt.body.first().is_some_and(imports_typing) {
            return Self::Other;
        }

        let handler = try_stmt
            .handlers
            .iter()
            .find(|handler| is_guard_handler(handler))
            .map(|handler| unit.span_of(handler));

        if handler.is_none() {
            trace!(
                "typing guard at line {} has no bare, ImportError or Exception handler",
                unit.span_of(try_stmt).start
            );
        }

        Self::TypingGuard {
            span: unit.span_of(try_stmt),
            handler,
        }
    }

    fn classify_if(if_stmt: &StmtIf, unit: &SourceUnit<'_>) -> Self {
        match match_known_test(&if_stmt.test) {
            Some(known) => Self::Conditional {
                header: unit.span_of(if_stmt).start,
                marker: known.marker,
            },
            None => Self::Other,
        }
    }
}

/// `import typing` (as the first alias) or `from typing import ...`
fn imports_typing(stmt: &Stmt) -> bool {
    match stmt {
        Stmt::Import(import) => import
            .names
            .first()
            .is_some_and(|alias| alias.name.as_str() == "typing"),
        Stmt::ImportFrom(import_from) => import_from
            .module
            .as_ref()
            .is_some_and(|module| module.as_str() == "typing"),
        _ => false,
    }
}

/// Bare `except:`, `except ImportError:` or `except Exception:`
fn is_guard_handler(handler: &ExceptHandler) -> bool {
    let ExceptHandler::ExceptHandler(ExceptHandlerExceptHandler { type_, .. }) = handler;
    match type_.as_deref() {
        None => true,
        Some(Expr::Name(name)) => GUARD_EXCEPTIONS.contains(&name.id.as_str()),
        Some(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use ruff_python_parser::parse_module;

    use super::*;

    fn classify_all(source: &str) -> Vec<StatementNode> {
        let module = parse_module(source)
            .expect("Failed to parse test module")
            .into_syntax();
        let unit = SourceUnit::new(source);
        module
            .body
            .iter()
            .map(|stmt| StatementNode::classify(stmt, &unit))
            .collect()
    }

    #[test]
    fn test_future_import_spans_all_lines() {
        let source = "from __future__ import (\n    annotations,\n)\nimport os\n";
        assert_eq!(
            classify_all(source),
            vec![
                StatementNode::FutureImport {
                    span: LineSpan { start: 1, end: 3 }
                },
                StatementNode::Other,
            ]
        );
    }

    #[test]
    fn test_typing_guard_picks_first_qualifying_handler() {
        let source = r"
try:
    from typing import List
except ValueError:
    pass
except ImportError:
    List = None
except Exception:
    pass
";
        assert_eq!(
            classify_all(source),
            vec![StatementNode::TypingGuard {
                span: LineSpan { start: 2, end: 9 },
                handler: Some(LineSpan { start: 6, end: 7 }),
            }]
        );
    }

    #[test]
    fn test_typing_guard_requires_typing_first() {
        let source = r"
try:
    import os
    import typing
except ImportError:
    pass
";
        assert_eq!(classify_all(source), vec![StatementNode::Other]);
    }

    #[test]
    fn test_import_typing_must_be_first_alias() {
        let source = r"
try:
    import os, typing
except ImportError:
    pass
";
        assert_eq!(classify_all(source), vec![StatementNode::Other]);
    }

    #[test]
    fn test_typing_guard_without_qualifying_handler() {
        let source = r"
try:
    import typing
except (ImportError, AttributeError):
    pass
";
        assert_eq!(
            classify_all(source),
            vec![StatementNode::TypingGuard {
                span: LineSpan { start: 2, end: 5 },
                handler: None,
            }]
        );
    }

    #[test]
    fn test_conditional_header_line() {
        let source = "import sys\nif sys.implementation.name != 'circuitpython':\n    x = 1\n";
        assert_eq!(
            classify_all(source),
            vec![
                StatementNode::Other,
                StatementNode::Conditional {
                    header: 2,
                    marker: Marker::AlwaysFalse,
                },
            ]
        );
    }

    #[test]
    fn test_version_assignment_uses_first_target() {
        let source = "__version__ = '0.0.0-auto.0'\n__repo__ = 'x'\n__version__ = v = '1'\n";
        assert_eq!(
            classify_all(source),
            vec![
                StatementNode::VersionAssignment { line: 1 },
                StatementNode::Other,
                StatementNode::VersionAssignment { line: 3 },
            ]
        );
    }

    #[test]
    fn test_annotated_version_is_not_stamped() {
        assert_eq!(
            classify_all("__version__: str = '0.0.0'\n"),
            vec![StatementNode::Other]
        );
    }
}
