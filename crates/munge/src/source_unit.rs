//! Line-indexed view of one module's source text
//!
//! The munge pass works on whole lines: statements are located through their
//! AST ranges, converted to 1-based line numbers, and rewritten by line. This
//! module owns the line table and the offset-to-line mapping.

use ruff_source_file::LineIndex;
use ruff_text_size::{Ranged, TextSize};

/// Inclusive range of 1-based line numbers covered by a node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

impl LineSpan {
    pub const fn single(line: usize) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    /// Iterate every line number in the span
    pub fn lines(self) -> impl Iterator<Item = usize> {
        self.start..=self.end
    }
}

/// The lines of a module, addressable by 1-based line number
///
/// Trailing whitespace of the module is dropped before splitting, so a file
/// ending in blank lines has the same line count as the same file without
/// them. Splitting happens on `\n` only; a `\r` of a CRLF file stays attached
/// to its line.
#[derive(Debug)]
pub struct SourceUnit<'src> {
    lines: Vec<&'src str>,
    index: LineIndex,
}

impl<'src> SourceUnit<'src> {
    pub fn new(source: &'src str) -> Self {
        let trimmed = source.trim_end();
        let lines = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('\n').collect()
        };

        Self {
            lines,
            index: LineIndex::from_source_text(source),
        }
    }

    /// Number of lines, not counting the sentinel line 0
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Text of line `number`; `None` for the sentinel and out of range lines
    pub fn line(&self, number: usize) -> Option<&'src str> {
        number
            .checked_sub(1)
            .and_then(|index| self.lines.get(index))
            .copied()
    }

    /// 1-based line holding the byte at `offset`
    pub fn line_of(&self, offset: TextSize) -> usize {
        self.index.line_index(offset).get()
    }

    /// Lines covered by `node`, from its first character to its last
    pub fn span_of<T: Ranged>(&self, node: &T) -> LineSpan {
        let range = node.range();
        let start = self.line_of(range.start());
        // The end offset is exclusive; step back onto the node's last character
        let last = if range.is_empty() {
            range.end()
        } else {
            range.end() - TextSize::from(1)
        };

        LineSpan {
            start,
            end: self.line_of(last).max(start),
        }
    }
}
