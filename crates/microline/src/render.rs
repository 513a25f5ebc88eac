#![forbid(unsafe_code)]

//! Terminal rendering of the line buffer.
//!
//! [`Terminal`] is a short-lived view over the output sink and the
//! configuration. It holds no state of its own: every method turns the
//! current line into ANSI output and forgets about it.
//!
//! The terminal cursor is assumed to track the buffer cursor. Every method
//! that draws text leaves the terminal cursor on the buffer cursor again.

use crate::ansi;
use crate::config::{Config, Features, MAX_PRINT_BUFFER};
use crate::console::Output;
use crate::echo::EchoState;
use crate::line::LineBuffer;

/// Extra columns the fallback full-redraw moves left, past the prompt.
const REWIND_SLACK: usize = 2;

/// Stateless renderer over an output sink.
pub struct Terminal<'a, O: Output + ?Sized> {
    out: &'a mut O,
    config: &'a Config<'a>,
    prompt: &'a str,
}

impl<'a, O: Output + ?Sized> Terminal<'a, O> {
    /// Borrow an output sink for rendering.
    pub fn new(out: &'a mut O, config: &'a Config<'a>, prompt: &'a str) -> Self {
        Self {
            out,
            config,
            prompt,
        }
    }

    /// Write raw bytes.
    #[inline]
    pub fn write(&mut self, bytes: &[u8]) {
        self.out.write(bytes);
    }

    /// Print the prompt, wrapped in its color when one is configured.
    pub fn prompt(&mut self) {
        if self.config.prompt_color.is_empty() {
            self.out.write(self.prompt.as_bytes());
            return;
        }
        self.out.write(self.config.prompt_color.as_bytes());
        self.out.write(self.prompt.as_bytes());
        self.out.write(ansi::COLOR_DEFAULT.as_bytes());
    }

    /// Print the end-of-line sequence.
    #[inline]
    pub fn newline(&mut self) {
        self.out.write(self.config.end_of_line.as_bytes());
    }

    /// Erase the character left of the cursor and step onto it.
    #[inline]
    pub fn erase_previous(&mut self) {
        self.out.write(ansi::ERASE_PREVIOUS);
    }

    /// Erase from the cursor to the end of the line.
    #[inline]
    pub fn clear_to_end(&mut self) {
        self.out.write(ansi::CLEAR_EOL);
    }

    /// Move the cursor horizontally by `offset` columns.
    pub fn move_cursor(&mut self, offset: isize) {
        let mut buf = [0u8; ansi::CURSOR_MOVE_MAX_LEN];
        let len = ansi::cursor_move(&mut buf, offset);
        if len > 0 {
            self.out.write(&buf[..len]);
        }
    }

    /// Redraw the line from index `pos` to its end, then restore the cursor.
    ///
    /// With `reset` the terminal cursor is first brought back to column
    /// `prompt + pos` from wherever it is; otherwise it must already be
    /// there. Masked bytes (per `echo`) print as the configured mask.
    /// Output is batched through a stack buffer of
    /// [`Config::chunk_len`] bytes.
    pub fn print_line<const N: usize>(
        &mut self,
        line: &LineBuffer<N>,
        echo: &EchoState,
        pos: usize,
        reset: bool,
    ) {
        let mut buf = [0u8; MAX_PRINT_BUFFER];
        let chunk = self.config.chunk_len();
        let mut filled = 0;

        if reset {
            if self.config.features.contains(Features::CARRIAGE_RETURN) {
                buf[filled] = b'\r';
                filled += 1;
            } else {
                let rewind = N + self.prompt.len() + REWIND_SLACK;
                filled += ansi::cursor_move(&mut buf[filled..], -to_offset(rewind));
            }
            let column = self.prompt.len() + pos;
            filled += ansi::cursor_move(&mut buf[filled..], to_offset(column));
        }

        for (index, &byte) in line.as_bytes().iter().enumerate().skip(pos) {
            if filled == chunk {
                self.out.write(&buf[..filled]);
                filled = 0;
            }
            buf[filled] = if echo.masks(index) {
                self.config.echo_mask
            } else {
                byte
            };
            filled += 1;
        }

        // Room for the erase plus the widest cursor move.
        if filled + ansi::CLEAR_EOL.len() + ansi::CURSOR_MOVE_MAX_LEN > MAX_PRINT_BUFFER {
            self.out.write(&buf[..filled]);
            filled = 0;
        }
        buf[filled..filled + ansi::CLEAR_EOL.len()].copy_from_slice(ansi::CLEAR_EOL);
        filled += ansi::CLEAR_EOL.len();
        let back = to_offset(line.cursor()) - to_offset(line.len());
        filled += ansi::cursor_move(&mut buf[filled..], back);
        self.out.write(&buf[..filled]);
    }
}

#[inline]
fn to_offset(n: usize) -> isize {
    isize::try_from(n).unwrap_or(isize::MAX)
}
