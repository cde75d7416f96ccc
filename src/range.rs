//! Offset ranges.
//!
//! Offsets are byte offsets into either the template source or the generated code.
//! Editors speak UTF-16, so [`Range::to_utf16`] converts at the boundary.

use serde::Serialize;

/// Half-open range of byte offsets, `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "range start {start} is past its end {end}");
        Self { start, end }
    }

    /// Range covering all of `text`.
    pub fn of(text: &str) -> Self {
        Self { start: 0, end: text.len() }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True if `other` lies entirely inside this range.
    pub fn contains(&self, other: Range) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    pub fn contains_offset(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// True if the two ranges share at least one offset.
    pub fn overlaps(&self, other: Range) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Slice of `text` this range covers, clamped to the text and to char boundaries.
    pub fn slice<'t>(&self, text: &'t str) -> &'t str {
        let end = floor_char_boundary(text, self.end.min(text.len()));
        let start = floor_char_boundary(text, self.start.min(end));
        &text[start..end]
    }

    /// Convert to UTF-16 code unit offsets within `text`.
    pub fn to_utf16(&self, text: &str) -> Range {
        Range {
            start: byte_to_utf16(text, self.start),
            end: byte_to_utf16(text, self.end),
        }
    }
}

/// Convert a byte offset to a UTF-16 offset.
///
/// Offsets past the end are clamped; offsets inside a multi-byte character round down.
pub fn byte_to_utf16(source: &str, byte_offset: usize) -> usize {
    let byte_offset = floor_char_boundary(source, byte_offset.min(source.len()));
    source[..byte_offset].encode_utf16().count()
}

fn floor_char_boundary(text: &str, mut offset: usize) -> usize {
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}
