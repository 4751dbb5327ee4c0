//! The munge pass
//!
//! Strips development-only constructs from a library module and stamps its
//! release version, without moving any line:
//!
//! - `from __future__ import ...` is blanked
//! - `try:` opening with `import typing` / `from typing import ...` is
//!   blanked, except for the first bare, `ImportError` or `Exception`
//!   handler, whose header becomes `if 1:`
//! - `if sys.implementation.name == "circuitpython":` becomes `if 1:`, its
//!   negations and `if TYPE_CHECKING:` become `if 0:`
//! - `__version__ = ...` gets the release version
//!
//! `mpy-cross` does constant folding and drops `if 0:` branches. Only
//! top-level statements are looked at, and the module is expected to be
//! black-formatted.

use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use ruff_python_ast::Stmt;
use ruff_python_codegen::{Generator, Stylist};
use ruff_python_parser::{ParseError, parse_module};

use crate::{
    canonical::Marker,
    replacements::{ReplacementMap, ReplacementMapBuilder},
    source_unit::SourceUnit,
    statement::{StatementNode, VERSION_NAME},
};

/// Knobs for [`munge_with_options`]
#[derive(Debug, Clone, Default)]
pub struct MungeOptions {
    /// Append the original text to every rewritten line as a `###` comment
    pub annotate: bool,
}

/// Munge `source`, stamping `version` into its `__version__` assignment
pub fn munge(source: &str, version: &str) -> Result<String, ParseError> {
    munge_with_options(source, version, &MungeOptions::default())
}

pub fn munge_with_options(
    source: &str,
    version: &str,
    options: &MungeOptions,
) -> Result<String, ParseError> {
    let parsed = parse_module(source)?;
    let unit = SourceUnit::new(source);
    let stylist = Stylist::from_tokens(parsed.tokens(), source);

    let replacements = collect_replacements(
        &parsed.syntax().body,
        &unit,
        &stylist,
        version,
        options,
    );
    debug!("Rewriting {} of {} lines", replacements.len(), unit.len());

    Ok(replacements.render(&unit))
}

/// Read and munge the module at `path`
pub fn munge_file(path: &Path, version: &str, options: &MungeOptions) -> Result<String> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    munge_with_options(&source, version, options).map_err(|err| {
        let line = SourceUnit::new(&source).line_of(err.location.start());
        anyhow::Error::new(err).context(format!(
            "Failed to parse {} at line {line}",
            path.display()
        ))
    })
}

fn collect_replacements(
    body: &[Stmt],
    unit: &SourceUnit<'_>,
    stylist: &Stylist<'_>,
    version: &str,
    options: &MungeOptions,
) -> ReplacementMap {
    let mut builder = ReplacementMapBuilder::new(unit, options.annotate);

    for stmt in body {
        match StatementNode::classify(stmt, unit) {
            StatementNode::FutureImport { span } => {
                debug!("Removing __future__ import at lines {}-{}", span.start, span.end);
                builder.blank(span);
            }
            StatementNode::TypingGuard { span, handler } => {
                debug!("Removing typing guard at lines {}-{}", span.start, span.end);
                builder.blank(span);
                if let Some(handler) = handler {
                    builder.restore(handler);
                    builder.replace(handler.start, Marker::AlwaysTrue.header());
                }
            }
            StatementNode::Conditional { header, marker } => {
                if let Stmt::If(if_stmt) = stmt {
                    debug!(
                        "Folding `if {}:` at line {header} to `{}`",
                        Generator::from(stylist).expr(&if_stmt.test),
                        marker.header()
                    );
                }
                builder.replace(header, marker.header());
            }
            StatementNode::VersionAssignment { line } => {
                builder.replace(line, &format!("{VERSION_NAME} = \"{version}\""));
            }
            StatementNode::Other => {}
        }
    }

    builder.finish()
}
