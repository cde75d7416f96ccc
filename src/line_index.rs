//! Line/column to offset conversion.
//!
//! Parsers report 1-indexed lines; the mapping tree speaks byte offsets. The index stores
//! the offset at which every line starts (a prefix sum of line lengths including their
//! terminators), so a lookup is one table read plus the column.

use crate::range::Range;
use crate::syntax::{LineCol, SyntaxNode};

#[derive(Debug, Clone)]
pub struct LineOffsetIndex<'a> {
    source: &'a str,
    /// `line_starts[i]` is the offset of line `i + 1`.
    line_starts: Vec<usize>,
}

impl<'a> LineOffsetIndex<'a> {
    pub fn new(source: &'a str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { source, line_starts }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Absolute offset of a line/column position, clamped to the source.
    pub fn offset(&self, pos: LineCol) -> usize {
        let line = pos.line.clamp(1, self.line_starts.len());
        (self.line_starts[line - 1] + pos.column).min(self.source.len())
    }

    /// Source range covered by `node`.
    ///
    /// Text nodes are narrowed past their leading and trailing whitespace so diagnostics
    /// underline the words rather than the surrounding blank lines. All-whitespace text is
    /// left as is.
    pub fn locate<N: SyntaxNode + ?Sized>(&self, node: &N) -> Range {
        let loc = node.loc();
        let mut start = self.offset(loc.start);
        let mut end = self.offset(loc.end).max(start);

        if let Some(text) = node.text_content() {
            let trimmed = text.trim();
            if !trimmed.is_empty() {
                let leading = text.len() - text.trim_start().len();
                let trailing = text.len() - text.trim_end().len();
                if start + leading <= end.saturating_sub(trailing) {
                    start += leading;
                    end -= trailing;
                }
            }
        }

        Range::new(start, end)
    }

    /// Line/column of an offset (the reverse of [`offset`](Self::offset)).
    pub fn line_col(&self, offset: usize) -> LineCol {
        let offset = offset.min(self.source.len());
        let line = match self.line_starts.binary_search(&offset) {
            Ok(i) => i,
            Err(i) => i.saturating_sub(1),
        };
        LineCol::new(line + 1, offset - self.line_starts[line])
    }

    /// Text of a 1-indexed line without its terminator.
    pub fn line_text(&self, line: usize) -> Option<&'a str> {
        if line == 0 || line > self.line_starts.len() {
            return None;
        }
        let start = self.line_starts[line - 1];
        let end = self
            .line_starts
            .get(line)
            .copied()
            .unwrap_or(self.source.len());
        let text = &self.source[start..end];
        Some(text.trim_end_matches('\n').trim_end_matches('\r'))
    }
}
