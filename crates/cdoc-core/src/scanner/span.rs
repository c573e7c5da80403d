//! Byte spans into a source buffer

use std::ops::Range;

use serde::Serialize;

/// A span representing a range in one source buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    /// Byte offset of the start of the span
    pub start: u32,
    /// Byte offset of the end of the span (exclusive)
    pub end: u32,
}

impl Span {
    /// Create a new span from start and end byte offsets
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// Create a span from `usize` offsets, or `None` if either does not fit
    /// in a `u32` or the range is inverted
    #[must_use]
    pub fn try_from_range(range: Range<usize>) -> Option<Self> {
        if range.start > range.end {
            return None;
        }
        let start = u32::try_from(range.start).ok()?;
        let end = u32::try_from(range.end).ok()?;
        Some(Self { start, end })
    }

    /// Length of the span in bytes
    #[must_use]
    pub const fn len(&self) -> u32 {
        self.end - self.start
    }

    /// Returns true if the span is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Convert to a Range<usize> for slicing
    #[must_use]
    pub const fn as_range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }
}

impl From<Span> for Range<usize> {
    fn from(span: Span) -> Self {
        span.as_range()
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_basics() {
        let span = Span::new(5, 10);
        assert_eq!(span.len(), 5);
        assert!(!span.is_empty());
        assert_eq!(span.as_range(), 5..10);
    }

    #[test]
    fn span_rejects_overflow() {
        assert_eq!(Span::try_from_range(3..7), Some(Span::new(3, 7)));
        assert_eq!(Span::try_from_range(7..3), None);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(Span::try_from_range(0..(u32::MAX as usize + 1)), None);
    }
}
