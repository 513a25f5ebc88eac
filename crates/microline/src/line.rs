#![forbid(unsafe_code)]

//! Fixed-capacity, cursor-addressable line buffer.
//!
//! [`LineBuffer`] holds the command line being edited in a `[u8; N]`
//! array. It never allocates and never panics on user input.
//!
//! # Invariants
//!
//! After every call:
//! - `cursor <= len <= N`
//! - every byte at index `>= len` is zero, so the live text is always
//!   followed by a terminator when `len < N`
//! - a rejected insert leaves the buffer untouched
//!
//! # Example
//! ```
//! use microline::line::LineBuffer;
//!
//! let mut line = LineBuffer::<16>::new();
//! line.insert(b"helo").unwrap();
//! line.set_cursor(3);
//! line.insert(b"l").unwrap();
//! assert_eq!(line.as_bytes(), b"hello");
//! assert_eq!(line.cursor(), 4);
//! ```

use crate::error::Error;

/// Editable command line with at most `N` bytes of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineBuffer<const N: usize> {
    buf: [u8; N],
    len: usize,
    cursor: usize,
}

impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineBuffer<N> {
    /// Create an empty line.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            buf: [0; N],
            len: 0,
            cursor: 0,
        }
    }

    /// Maximum number of bytes the line can hold.
    #[inline]
    #[must_use]
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Number of bytes of text.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the line holds no text.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Edit position, `0..=len`.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// The text of the line.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// The whole backing array, including the zeroed tail.
    ///
    /// A full line has no tail, so `raw()[len()]` exists only while
    /// `len() < N`. Use [`Self::as_bytes`] to get the text itself.
    #[inline]
    #[must_use]
    pub fn raw(&self) -> &[u8; N] {
        &self.buf
    }

    /// Insert `text` at the cursor and advance the cursor past it.
    ///
    /// # Errors
    ///
    /// Returns [`Error::LineFull`] when the result would exceed `N` bytes.
    /// The buffer is unchanged in that case.
    pub fn insert(&mut self, text: &[u8]) -> Result<(), Error> {
        if self.len + text.len() > N {
            return Err(Error::LineFull);
        }
        let at = self.cursor;
        self.buf.copy_within(at..self.len, at + text.len());
        self.buf[at..at + text.len()].copy_from_slice(text);
        self.cursor += text.len();
        self.len += text.len();
        Ok(())
    }

    /// Remove `count` bytes before the cursor.
    ///
    /// Does nothing when fewer than `count` bytes precede the cursor.
    pub fn backspace(&mut self, count: usize) {
        if self.cursor < count {
            return;
        }
        let at = self.cursor;
        self.buf.copy_within(at..self.len, at - count);
        self.cursor -= count;
        self.truncate(self.len - count);
    }

    /// Remove the byte under the cursor. Does nothing at end of line.
    pub fn delete_at_cursor(&mut self) {
        if self.cursor >= self.len {
            return;
        }
        let at = self.cursor;
        self.buf.copy_within(at + 1..self.len, at);
        self.truncate(self.len - 1);
    }

    /// Drop everything from `len` onward. The cursor is pulled back if needed.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        self.buf[len..self.len].fill(0);
        self.len = len;
        self.cursor = self.cursor.min(len);
    }

    /// Move the cursor, clamped to the end of the text.
    pub fn set_cursor(&mut self, cursor: usize) {
        self.cursor = cursor.min(self.len);
    }

    /// Replace the whole line with `text` (truncated to `N` bytes) and put
    /// the cursor at its end.
    pub fn replace<I>(&mut self, text: I)
    where
        I: IntoIterator<Item = u8>,
    {
        self.buf.fill(0);
        let mut len = 0;
        for (slot, byte) in self.buf.iter_mut().zip(text) {
            *slot = byte;
            len += 1;
        }
        self.len = len;
        self.cursor = len;
    }

    /// Clear the line.
    pub fn reset(&mut self) {
        self.buf.fill(0);
        self.len = 0;
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line<const N: usize>(text: &[u8]) -> LineBuffer<N> {
        let mut line = LineBuffer::new();
        line.insert(text).unwrap();
        line
    }

    #[test]
    fn insert_at_end_and_middle() {
        let mut l = line::<16>(b"ac");
        l.set_cursor(1);
        l.insert(b"b").unwrap();
        assert_eq!(l.as_bytes(), b"abc");
        assert_eq!(l.cursor(), 2);
        assert_eq!(l.len(), 3);
    }

    #[test]
    fn full_boundary_is_exact() {
        let mut l = LineBuffer::<10>::new();
        l.insert(b"0123456789").unwrap();
        assert_eq!(l.insert(b"x"), Err(Error::LineFull));
        assert_eq!(l.as_bytes(), b"0123456789");
        assert_eq!(l.cursor(), 10);
    }

    #[test]
    fn rejected_insert_keeps_state() {
        let mut l = line::<4>(b"abc");
        l.set_cursor(1);
        let before = l.clone();
        assert_eq!(l.insert(b"xy"), Err(Error::LineFull));
        assert_eq!(l, before);
    }

    #[test]
    fn backspace_in_middle() {
        let mut l = line::<16>(b"hello");
        l.set_cursor(3);
        l.backspace(2);
        assert_eq!(l.as_bytes(), b"hlo");
        assert_eq!(l.cursor(), 1);
        assert_eq!(l.raw()[3..], [0u8; 13]);
    }

    #[test]
    fn backspace_past_start_is_noop() {
        let mut l = line::<16>(b"hi");
        l.set_cursor(1);
        l.backspace(2);
        assert_eq!(l.as_bytes(), b"hi");
        assert_eq!(l.cursor(), 1);
    }

    #[test]
    fn delete_under_cursor() {
        let mut l = line::<16>(b"abc");
        l.set_cursor(1);
        l.delete_at_cursor();
        assert_eq!(l.as_bytes(), b"ac");
        assert_eq!(l.cursor(), 1);
        l.set_cursor(2);
        l.delete_at_cursor();
        assert_eq!(l.as_bytes(), b"ac");
    }

    #[test]
    fn delete_on_empty_line() {
        let mut l = LineBuffer::<4>::new();
        l.delete_at_cursor();
        assert!(l.is_empty());
    }

    #[test]
    fn truncate_pulls_cursor_back() {
        let mut l = line::<16>(b"abcdef");
        l.truncate(2);
        assert_eq!(l.as_bytes(), b"ab");
        assert_eq!(l.cursor(), 2);
        assert_eq!(l.raw()[2], 0);
    }

    #[test]
    fn replace_truncates_to_capacity() {
        let mut l = line::<4>(b"ab");
        l.replace(b"longer".iter().copied());
        assert_eq!(l.as_bytes(), b"long");
        assert_eq!(l.cursor(), 4);
        l.replace(b"z".iter().copied());
        assert_eq!(l.raw(), b"z\0\0\0");
    }

    #[test]
    fn reset_clears_everything() {
        let mut l = line::<8>(b"abc");
        l.reset();
        assert!(l.is_empty());
        assert_eq!(l.cursor(), 0);
        assert_eq!(l.raw(), &[0u8; 8]);
    }

    #[test]
    fn full_line_has_no_terminator_slot() {
        let mut l = LineBuffer::<4>::new();
        l.insert(b"abcd").unwrap();
        assert_eq!(l.raw().len(), 4);
        assert!(l.raw().get(l.len()).is_none());
        assert_eq!(l.as_bytes(), l.raw());
        l.backspace(1);
        assert_eq!(l.raw().get(l.len()), Some(&0));
    }
}
