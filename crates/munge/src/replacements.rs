//! Line replacement map and rendering
//!
//! Replacements are collected per line through [`ReplacementMapBuilder`] and
//! frozen into a [`ReplacementMap`], which renders the final text. A line
//! without a replacement is emitted as is; an empty replacement leaves an
//! empty line behind so that line numbers never shift.

use rustc_hash::FxHashMap;

use crate::source_unit::{LineSpan, SourceUnit};

/// Collects line replacements for one module
#[derive(Debug)]
pub struct ReplacementMapBuilder<'unit, 'src> {
    unit: &'unit SourceUnit<'src>,
    annotate: bool,
    replacements: FxHashMap<usize, String>,
}

impl<'unit, 'src> ReplacementMapBuilder<'unit, 'src> {
    /// With `annotate` set, every replacement keeps the original line as a
    /// trailing `###` comment
    pub fn new(unit: &'unit SourceUnit<'src>, annotate: bool) -> Self {
        Self {
            unit,
            annotate,
            replacements: FxHashMap::default(),
        }
    }

    /// Replace line `line` with `new`, overriding any earlier replacement
    pub fn replace(&mut self, line: usize, new: &str) {
        let text = if self.annotate {
            let original = self.unit.line(line).unwrap_or_default();
            format!("{new:<40} ### {original}")
        } else {
            new.to_owned()
        };
        self.replacements.insert(line, text);
    }

    /// Blank every line of `span`
    pub fn blank(&mut self, span: LineSpan) {
        for line in span.lines() {
            self.replace(line, "");
        }
    }

    /// Drop any replacement inside `span`, so its lines are emitted unchanged
    pub fn restore(&mut self, span: LineSpan) {
        for line in span.lines() {
            self.replacements.remove(&line);
        }
    }

    /// Freeze the map; replacements outside the module's lines are discarded
    pub fn finish(self) -> ReplacementMap {
        let len = self.unit.len();
        let mut replacements = self.replacements;
        replacements.retain(|&line, _| (1..=len).contains(&line));
        ReplacementMap { replacements }
    }
}

/// Immutable mapping from line number to replacement text
#[derive(Debug, Default)]
pub struct ReplacementMap {
    replacements: FxHashMap<usize, String>,
}

impl ReplacementMap {
    pub fn get(&self, line: usize) -> Option<&str> {
        self.replacements.get(&line).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.replacements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    /// Render the module with replacements applied, newline terminated
    pub fn render(&self, unit: &SourceUnit<'_>) -> String {
        let mut output = String::new();
        for number in 1..=unit.len() {
            let line = self
                .get(number)
                .or_else(|| unit.line(number))
                .unwrap_or_default();
            if number > 1 {
                output.push('\n');
            }
            output.push_str(line);
        }
        output.push('\n');
        output
    }
}
