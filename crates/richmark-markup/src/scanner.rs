//! Cursor-based scanner over unicode scalars.
//!
//! The scanner borrows its input and keeps a byte position plus the number of
//! scalars consumed since the last [`reset`](Scanner::reset). Every consuming
//! operation computes its proposed end position first and commits it only when
//! the operation succeeds, so a failed probe never moves the cursor.
//!
//! `scan_*` operations consume; `peek_*` operations report where a scan would
//! stop without moving.

use crate::charset::CharSet;

/// Scanner failure.
///
/// All variants are recoverable: the cursor is left where it was before the
/// failing call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScanError {
    /// The end of the input was reached before the operation could complete.
    #[error("end of input reached")]
    EndOfInput,
    /// The expected scalar or sequence is not at the current position.
    #[error("no match at current position")]
    NotFound,
    /// The caller passed an argument the scanner cannot honor.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
    /// A numeric scan found no valid number at the current position.
    #[error("invalid number at current position")]
    InvalidNumber,
}

/// Digit count for [`Scanner::scan_hex_int`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitDigits {
    /// Two hex digits.
    Bit8,
    /// Four hex digits.
    Bit16,
    /// Eight hex digits.
    Bit32,
    /// Sixteen hex digits.
    Bit64,
}

impl BitDigits {
    /// Number of hex digits expected for this width.
    #[must_use]
    pub fn digit_count(self) -> usize {
        match self {
            Self::Bit8 => 2,
            Self::Bit16 => 4,
            Self::Bit32 => 8,
            Self::Bit64 => 16,
        }
    }
}

/// A non-panicking cursor over the unicode scalars of a string.
///
/// # Example
///
/// ```
/// use richmark_markup::Scanner;
///
/// let mut scanner = Scanner::new("hello <b>");
/// assert_eq!(scanner.scan_up_to(['<', '&']), Ok("hello "));
/// assert!(scanner.match_char('<'));
/// assert_eq!(scanner.scan_until_char('>'), Ok("b"));
/// assert!(scanner.match_char('>'));
/// assert!(scanner.is_at_end());
/// ```
#[derive(Debug, Clone)]
pub struct Scanner<'a> {
    input: &'a str,
    position: usize,
    consumed: usize,
}

impl<'a> Scanner<'a> {
    /// Create a scanner positioned at the start of `input`.
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            position: 0,
            consumed: 0,
        }
    }

    /// The whole input the scanner was created with.
    #[must_use]
    pub fn input(&self) -> &'a str {
        self.input
    }

    /// Current byte offset into the input.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of scalars consumed since creation or the last reset.
    #[must_use]
    pub fn consumed(&self) -> usize {
        self.consumed
    }

    /// Returns `true` when the cursor sits at the end of the input.
    #[must_use]
    pub fn is_at_end(&self) -> bool {
        self.position == self.input.len()
    }

    /// The unconsumed part of the input. Does not move the cursor.
    #[must_use]
    pub fn remainder(&self) -> &'a str {
        &self.input[self.position..]
    }

    /// Move the cursor back to the start of the input.
    pub fn reset(&mut self) {
        self.position = 0;
        self.consumed = 0;
    }

    /// Move the cursor to the end of the input.
    pub fn seek_to_end(&mut self) {
        self.consumed += self.remainder().chars().count();
        self.position = self.input.len();
    }

    /// The scalar at the cursor, if any.
    #[must_use]
    pub fn peek_char(&self) -> Option<char> {
        self.remainder().chars().next()
    }

    /// Consume and return the scalar at the cursor.
    pub fn scan_char(&mut self) -> Result<char, ScanError> {
        let c = self.peek_char().ok_or(ScanError::EndOfInput)?;
        self.commit(self.position + c.len_utf8(), 1);
        Ok(c)
    }

    /// Consume everything up to (excluding) the first occurrence of `c`.
    ///
    /// The cursor stops just before `c`. Fails with [`ScanError::EndOfInput`]
    /// when `c` does not occur in the remainder; the cursor is not moved.
    pub fn scan_until_char(&mut self, c: char) -> Result<&'a str, ScanError> {
        let (end, scalars) = self.peek_until_char_counted(c)?;
        Ok(self.commit(end, scalars))
    }

    /// Byte offset of the next occurrence of `c`, without moving.
    pub fn peek_until_char(&self, c: char) -> Result<usize, ScanError> {
        self.peek_until_char_counted(c).map(|(end, _)| end)
    }

    /// Consume scalars while they are members of `set`.
    ///
    /// Fails with [`ScanError::NotFound`] when the scalar at the cursor is not
    /// a member, or [`ScanError::EndOfInput`] at the end of input.
    pub fn scan_until_in(&mut self, set: impl CharSet) -> Result<&'a str, ScanError> {
        let (end, scalars) = self.peek_until_in_counted(&set)?;
        Ok(self.commit(end, scalars))
    }

    /// Byte offset where [`scan_until_in`](Self::scan_until_in) would stop.
    pub fn peek_until_in(&self, set: impl CharSet) -> Result<usize, ScanError> {
        self.peek_until_in_counted(&set).map(|(end, _)| end)
    }

    /// Consume scalars until one that is a member of `set` is reached.
    ///
    /// Used to accumulate plain text up to a special character. Fails with
    /// [`ScanError::NotFound`] when the scalar at the cursor is already a
    /// member (nothing to accumulate), or [`ScanError::EndOfInput`] at the end
    /// of input.
    pub fn scan_up_to(&mut self, set: impl CharSet) -> Result<&'a str, ScanError> {
        let (end, scalars) = self.peek_up_to_counted(&set)?;
        Ok(self.commit(end, scalars))
    }

    /// Byte offset where [`scan_up_to`](Self::scan_up_to) would stop.
    pub fn peek_up_to(&self, set: impl CharSet) -> Result<usize, ScanError> {
        self.peek_up_to_counted(&set).map(|(end, _)| end)
    }

    /// Consume everything up to (excluding) the first occurrence of `needle`.
    pub fn scan_until_str(&mut self, needle: &str) -> Result<&'a str, ScanError> {
        let (end, scalars) = self.peek_until_str_counted(needle)?;
        Ok(self.commit(end, scalars))
    }

    /// Byte offset of the next occurrence of `needle`, without moving.
    pub fn peek_until_str(&self, needle: &str) -> Result<usize, ScanError> {
        self.peek_until_str_counted(needle).map(|(end, _)| end)
    }

    /// Consume scalars while `test` holds. Never fails; may return `""`.
    pub fn scan_while(&mut self, mut test: impl FnMut(char) -> bool) -> &'a str {
        let (end, scalars) = self.walk(|c| !test(c));
        self.commit(end, scalars)
    }

    /// Consume exactly `length` scalars.
    pub fn scan_length(&mut self, length: usize) -> Result<&'a str, ScanError> {
        let end = self.offset_after(length)?;
        Ok(self.commit(end, length))
    }

    /// Consume `c` if it is the scalar at the cursor.
    pub fn match_char(&mut self, c: char) -> bool {
        if self.peek_char() == Some(c) {
            self.commit(self.position + c.len_utf8(), 1);
            true
        } else {
            false
        }
    }

    /// Consume `literal` if the remainder starts with it.
    ///
    /// On mismatch the cursor is left untouched.
    pub fn match_str(&mut self, literal: &str) -> bool {
        if self.remainder().starts_with(literal) {
            self.commit(self.position + literal.len(), literal.chars().count());
            true
        } else {
            false
        }
    }

    /// Advance by `length` scalars.
    pub fn skip(&mut self, length: usize) -> Result<(), ScanError> {
        self.scan_length(length).map(|_| ())
    }

    /// Move back by `length` scalars.
    ///
    /// Fails with [`ScanError::InvalidInput`] when that would move before the
    /// start of the session, i.e. more scalars than were consumed.
    pub fn back(&mut self, length: usize) -> Result<(), ScanError> {
        if length > self.consumed {
            return Err(ScanError::InvalidInput("cannot move before the start"));
        }
        if length == 0 {
            return Ok(());
        }
        let start = self.input[..self.position]
            .char_indices()
            .rev()
            .nth(length - 1)
            .map(|(i, _)| i)
            .ok_or(ScanError::InvalidInput("cannot move before the start"))?;
        self.position = start;
        self.consumed -= length;
        Ok(())
    }

    /// Consume a run of ASCII digits and return its base-10 value.
    pub fn scan_int(&mut self) -> Result<u64, ScanError> {
        let (end, scalars) = self.walk(|c| !c.is_ascii_digit());
        if scalars == 0 {
            return Err(ScanError::InvalidNumber);
        }
        let value = self.input[self.position..end]
            .parse::<u64>()
            .map_err(|_| ScanError::InvalidNumber)?;
        self.commit(end, scalars);
        Ok(value)
    }

    /// Consume a decimal number such as `-12.5`.
    ///
    /// The cursor only moves if the accumulated run parses as a float.
    pub fn scan_float(&mut self) -> Result<f64, ScanError> {
        let (end, scalars) = self.walk(|c| !CharSet::contains("-+0123456789.", c));
        if scalars == 0 {
            return Err(ScanError::InvalidNumber);
        }
        let value = self.input[self.position..end]
            .parse::<f64>()
            .map_err(|_| ScanError::InvalidNumber)?;
        self.commit(end, scalars);
        Ok(value)
    }

    /// Consume a hex number written as `#<digits>` or `0x<digits>`.
    ///
    /// Exactly `digits.digit_count()` hex digits must follow the prefix. On failure the
    /// cursor is not moved.
    pub fn scan_hex_int(&mut self, digits: BitDigits) -> Result<u64, ScanError> {
        let rest = self.remainder();
        let prefix_len = if rest.starts_with('#') {
            1
        } else if rest.starts_with("0x") || rest.starts_with("0X") {
            2
        } else {
            return Err(ScanError::InvalidNumber);
        };
        let body = &rest[prefix_len..];
        let hex_len = digits.digit_count();
        if body.len() < hex_len || !body.is_char_boundary(hex_len) {
            return Err(ScanError::InvalidNumber);
        }
        let hex = &body[..hex_len];
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ScanError::InvalidNumber);
        }
        let value = u64::from_str_radix(hex, 16).map_err(|_| ScanError::InvalidNumber)?;
        self.commit(self.position + prefix_len + hex_len, prefix_len + hex_len);
        Ok(value)
    }

    /// Commit a proposed end offset and return the consumed slice.
    fn commit(&mut self, end: usize, scalars: usize) -> &'a str {
        let consumed = &self.input[self.position..end];
        self.position = end;
        self.consumed += scalars;
        consumed
    }

    /// Walk forward from the cursor until `stop` holds or the input ends.
    ///
    /// Returns the proposed end offset and the number of scalars walked.
    fn walk(&self, mut stop: impl FnMut(char) -> bool) -> (usize, usize) {
        let mut scalars = 0;
        for (offset, c) in self.remainder().char_indices() {
            if stop(c) {
                return (self.position + offset, scalars);
            }
            scalars += 1;
        }
        (self.input.len(), scalars)
    }

    fn offset_after(&self, length: usize) -> Result<usize, ScanError> {
        let mut chars = self.remainder().char_indices();
        let mut end = self.position;
        for _ in 0..length {
            let (offset, c) = chars.next().ok_or(ScanError::EndOfInput)?;
            end = self.position + offset + c.len_utf8();
        }
        Ok(end)
    }

    fn peek_until_char_counted(&self, target: char) -> Result<(usize, usize), ScanError> {
        let (end, scalars) = self.walk(|c| c == target);
        if end == self.input.len() {
            return Err(ScanError::EndOfInput);
        }
        Ok((end, scalars))
    }

    fn peek_until_in_counted(&self, set: &impl CharSet) -> Result<(usize, usize), ScanError> {
        let first = self.peek_char().ok_or(ScanError::EndOfInput)?;
        if !set.contains(first) {
            return Err(ScanError::NotFound);
        }
        Ok(self.walk(|c| !set.contains(c)))
    }

    fn peek_up_to_counted(&self, set: &impl CharSet) -> Result<(usize, usize), ScanError> {
        if self.is_at_end() {
            return Err(ScanError::EndOfInput);
        }
        let (end, scalars) = self.walk(|c| set.contains(c));
        if scalars == 0 {
            return Err(ScanError::NotFound);
        }
        Ok((end, scalars))
    }

    fn peek_until_str_counted(&self, needle: &str) -> Result<(usize, usize), ScanError> {
        if needle.is_empty() {
            return Err(ScanError::InvalidInput("empty search string"));
        }
        let offset = self
            .remainder()
            .find(needle)
            .ok_or(ScanError::EndOfInput)?;
        let end = self.position + offset;
        Ok((end, self.input[self.position..end].chars().count()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::charset::Alphanumeric;

    #[test]
    fn test_scan_until_char_stops_before_target() {
        let mut scanner = Scanner::new("amp;rest");
        assert_eq!(scanner.scan_until_char(';'), Ok("amp"));
        assert_eq!(scanner.peek_char(), Some(';'));
        assert_eq!(scanner.consumed(), 3);
    }

    #[test]
    fn test_scan_until_char_missing_leaves_cursor() {
        let mut scanner = Scanner::new("no terminator");
        scanner.skip(3).unwrap();
        assert_eq!(scanner.scan_until_char(';'), Err(ScanError::EndOfInput));
        assert_eq!(scanner.position(), 3);
        assert_eq!(scanner.consumed(), 3);
    }

    #[test]
    fn test_scan_until_char_at_target_returns_empty() {
        let mut scanner = Scanner::new(";x");
        assert_eq!(scanner.scan_until_char(';'), Ok(""));
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn test_scan_until_in_requires_member_at_cursor() {
        let mut scanner = Scanner::new("/b");
        assert_eq!(scanner.scan_until_in(Alphanumeric), Err(ScanError::NotFound));
        assert!(scanner.match_char('/'));
        assert_eq!(scanner.scan_until_in(Alphanumeric), Ok("b"));
        assert_eq!(scanner.scan_until_in(Alphanumeric), Err(ScanError::EndOfInput));
    }

    #[test]
    fn test_scan_up_to_accumulates_plain_text() {
        let mut scanner = Scanner::new("héllo<b>&amp;");
        assert_eq!(scanner.scan_up_to(['<', '&']), Ok("héllo"));
        assert_eq!(scanner.consumed(), 5);
        assert_eq!(scanner.scan_up_to(['<', '&']), Err(ScanError::NotFound));
        assert!(scanner.match_char('<'));
        assert_eq!(scanner.scan_up_to(['<', '&']), Ok("b>"));
    }

    #[test]
    fn test_scan_up_to_at_end() {
        let mut scanner = Scanner::new("");
        assert_eq!(scanner.scan_up_to('<'), Err(ScanError::EndOfInput));
    }

    #[test]
    fn test_peek_does_not_move() {
        let scanner = Scanner::new("abc>def");
        assert_eq!(scanner.peek_until_char('>'), Ok(3));
        assert_eq!(scanner.peek_up_to('d'), Ok(4));
        assert_eq!(scanner.peek_until_str("de"), Ok(4));
        assert_eq!(scanner.position(), 0);
        assert_eq!(scanner.consumed(), 0);
    }

    #[test]
    fn test_scan_until_str() {
        let mut scanner = Scanner::new("one--two--three");
        assert_eq!(scanner.scan_until_str("--"), Ok("one"));
        assert!(scanner.match_str("--"));
        assert_eq!(scanner.scan_until_str("--"), Ok("two"));
        assert_eq!(scanner.scan_until_str("!!"), Err(ScanError::EndOfInput));
        assert_eq!(
            scanner.scan_until_str(""),
            Err(ScanError::InvalidInput("empty search string"))
        );
    }

    #[test]
    fn test_match_str_mismatch_leaves_cursor() {
        let mut scanner = Scanner::new("</b>");
        assert!(!scanner.match_str("</i"));
        assert_eq!(scanner.position(), 0);
        assert!(scanner.match_str("</"));
        assert_eq!(scanner.remainder(), "b>");
    }

    #[test]
    fn test_skip_and_back() {
        let mut scanner = Scanner::new("añb");
        scanner.skip(2).unwrap();
        assert_eq!(scanner.remainder(), "b");
        scanner.back(1).unwrap();
        assert_eq!(scanner.remainder(), "ñb");
        assert_eq!(scanner.consumed(), 1);
        assert!(scanner.back(2).is_err());
        assert_eq!(scanner.remainder(), "ñb");
        assert_eq!(scanner.skip(5), Err(ScanError::EndOfInput));
        assert_eq!(scanner.consumed(), 1);
    }

    #[test]
    fn test_scan_while_and_length() {
        let mut scanner = Scanner::new("   word");
        assert_eq!(scanner.scan_while(char::is_whitespace), "   ");
        assert_eq!(scanner.scan_while(char::is_whitespace), "");
        assert_eq!(scanner.scan_length(2), Ok("wo"));
        assert_eq!(scanner.scan_length(3), Err(ScanError::EndOfInput));
        assert_eq!(scanner.remainder(), "rd");
    }

    #[test]
    fn test_scan_char_and_reset() {
        let mut scanner = Scanner::new("xy");
        assert_eq!(scanner.scan_char(), Ok('x'));
        assert_eq!(scanner.scan_char(), Ok('y'));
        assert_eq!(scanner.scan_char(), Err(ScanError::EndOfInput));
        scanner.reset();
        assert_eq!(scanner.remainder(), "xy");
        scanner.seek_to_end();
        assert!(scanner.is_at_end());
        assert_eq!(scanner.consumed(), 2);
    }

    #[test]
    fn test_scan_numbers() {
        let mut scanner = Scanner::new("42 -3.5 x");
        assert_eq!(scanner.scan_int(), Ok(42));
        scanner.skip(1).unwrap();
        assert_eq!(scanner.scan_float(), Ok(-3.5));
        scanner.skip(1).unwrap();
        assert_eq!(scanner.scan_int(), Err(ScanError::InvalidNumber));
        assert_eq!(scanner.scan_float(), Err(ScanError::InvalidNumber));
        assert_eq!(scanner.remainder(), "x");
    }

    #[test]
    fn test_scan_float_invalid_leaves_cursor() {
        let mut scanner = Scanner::new("1.2.3");
        assert_eq!(scanner.scan_float(), Err(ScanError::InvalidNumber));
        assert_eq!(scanner.position(), 0);
    }

    #[test]
    fn test_scan_hex_int() {
        let mut scanner = Scanner::new("#ff00aa");
        assert_eq!(scanner.scan_hex_int(BitDigits::Bit8), Ok(0xff));
        assert_eq!(scanner.remainder(), "00aa");

        let mut scanner = Scanner::new("0X1A2B");
        assert_eq!(scanner.scan_hex_int(BitDigits::Bit16), Ok(0x1a2b));
        assert!(scanner.is_at_end());

        let mut scanner = Scanner::new("#12");
        assert_eq!(
            scanner.scan_hex_int(BitDigits::Bit16),
            Err(ScanError::InvalidNumber)
        );
        assert_eq!(scanner.position(), 0);

        let mut scanner = Scanner::new("#zz");
        assert_eq!(
            scanner.scan_hex_int(BitDigits::Bit8),
            Err(ScanError::InvalidNumber)
        );
    }
}
