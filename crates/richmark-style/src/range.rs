//! Validated byte ranges into plain text.

use std::ops::Range;

use crate::StyleError;

/// A byte range known to be ordered, in bounds and on scalar boundaries
/// for the text it was validated against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextRange {
    start: usize,
    end: usize,
}

impl TextRange {
    /// Validate `range` against `text`.
    ///
    /// # Example
    ///
    /// ```
    /// use richmark_style::TextRange;
    ///
    /// let text = "naïve";
    /// assert!(TextRange::new(text, 0..3).is_err()); // splits 'ï'
    /// let range = TextRange::new(text, 0..4).unwrap();
    /// assert_eq!(range.to_char_range(text), 0..3);
    /// ```
    pub fn new(text: &str, range: Range<usize>) -> Result<Self, StyleError> {
        let invalid = || StyleError::InvalidRange {
            start: range.start,
            end: range.end,
            len: text.len(),
        };
        if range.start > range.end || range.end > text.len() {
            return Err(invalid());
        }
        if !text.is_char_boundary(range.start) || !text.is_char_boundary(range.end) {
            return Err(invalid());
        }
        Ok(Self {
            start: range.start,
            end: range.end,
        })
    }

    /// Clamp `range` into `text`, moving each end back to a scalar boundary.
    #[must_use]
    pub fn clamped(text: &str, range: Range<usize>) -> Self {
        let end = floor_char_boundary(text, range.end.min(text.len()));
        let start = floor_char_boundary(text, range.start.min(end));
        Self { start, end }
    }

    /// Whole-text range.
    #[must_use]
    pub fn full(text: &str) -> Self {
        Self {
            start: 0,
            end: text.len(),
        }
    }

    #[must_use]
    pub const fn start(self) -> usize {
        self.start
    }

    #[must_use]
    pub const fn end(self) -> usize {
        self.end
    }

    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.start == self.end
    }

    #[must_use]
    pub fn as_range(self) -> Range<usize> {
        self.start..self.end
    }

    /// The same range counted in unicode scalars.
    #[must_use]
    pub fn to_char_range(self, text: &str) -> Range<usize> {
        let start = text[..self.start].chars().count();
        start..start + text[self.start..self.end].chars().count()
    }

    /// The same range counted in UTF-16 code units.
    #[must_use]
    pub fn to_utf16_range(self, text: &str) -> Range<usize> {
        let start = text[..self.start].encode_utf16().count();
        start..start + text[self.start..self.end].encode_utf16().count()
    }
}

impl From<TextRange> for Range<usize> {
    fn from(value: TextRange) -> Self {
        value.as_range()
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
