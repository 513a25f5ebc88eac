#![forbid(unsafe_code)]

//! Command line tokenizer.
//!
//! Splits a line into borrowed `&str` tokens without copying or mutating
//! the line. Runs of spaces separate tokens. With quoting enabled, a token
//! that starts with `"` or `'` runs to the matching closing quote
//! (a backslash keeps the next quote literal) and may contain spaces; the
//! quotes themselves are not part of the token.

use heapless::Vec;

use crate::error::Error;

/// Tokens of one line, at most `T` of them.
pub type Tokens<'a, const T: usize> = Vec<&'a str, T>;

/// Split `line` into at most `T` tokens.
///
/// # Errors
///
/// - [`Error::TooManyTokens`] when the line holds more than `T` tokens.
/// - [`Error::Generic`] when a token is not valid UTF-8.
pub fn split<const T: usize>(line: &[u8], quoting: bool) -> Result<Tokens<'_, T>, Error> {
    let mut tokens = Tokens::new();
    let mut at = 0;

    while at < line.len() {
        let byte = line[at];
        if byte == b' ' {
            at += 1;
            continue;
        }

        let (start, end, next) = if quoting && is_quote(byte) {
            let start = at + 1;
            let end = closing_quote(line, start, byte);
            (start, end, (end + 1).min(line.len()))
        } else {
            let end = line[at..]
                .iter()
                .position(|&b| b == b' ' || (quoting && is_quote(b)))
                .map_or(line.len(), |offset| at + offset);
            (at, end, end)
        };

        let token = core::str::from_utf8(&line[start..end]).map_err(|_| Error::Generic)?;
        tokens.push(token).map_err(|_| Error::TooManyTokens)?;
        at = next;
    }

    Ok(tokens)
}

/// Whether `line` ends inside a quoted token that was never closed.
///
/// Quotes are recognized the same way [`split`] recognizes them with
/// quoting enabled.
#[must_use]
pub fn ends_in_open_quote(line: &[u8]) -> bool {
    let mut at = 0;
    while at < line.len() {
        let byte = line[at];
        if is_quote(byte) {
            let end = closing_quote(line, at + 1, byte);
            if end == line.len() {
                return true;
            }
            at = end + 1;
        } else {
            at += 1;
        }
    }
    false
}

#[inline]
fn is_quote(byte: u8) -> bool {
    byte == b'"' || byte == b'\''
}

/// Index of the quote closing a token that opened with `quote`, or the end
/// of the line when it is never closed.
fn closing_quote(line: &[u8], from: usize, quote: u8) -> usize {
    let mut at = from;
    while at < line.len() {
        match line[at] {
            b'\\' if line.get(at + 1).is_some_and(|&b| is_quote(b)) => at += 2,
            b if b == quote => return at,
            _ => at += 1,
        }
    }
    line.len()
}
