#![forbid(unsafe_code)]

//! ANSI escape sequence generation helpers.
//!
//! Pure byte generation for the handful of VT sequences the line editor
//! emits. No state, no allocation: multi-digit sequences are encoded into
//! caller-provided stack buffers.
//!
//! # Sequence Reference
//!
//! | Category | Sequence | Description |
//! |----------|----------|-------------|
//! | CSI | `ESC [ n C` | CUF (cursor forward n columns) |
//! | CSI | `ESC [ n D` | CUB (cursor back n columns) |
//! | CSI | `ESC [ K` | EL (erase to end of line) |
//! | CSI | `ESC [ 2 J` | ED (erase entire display) |
//! | CSI | `ESC [ H` | CUP (cursor home) |
//! | CSI | `ESC [ n m` | SGR (prompt color) |

/// Erase from the cursor to the end of the line: `CSI K`.
pub const CLEAR_EOL: &[u8] = b"\x1b[K";

/// Erase the entire display: `CSI 2 J`.
pub const CLEAR_SCREEN: &[u8] = b"\x1b[2J";

/// Move the cursor to the top-left corner: `CSI H`.
pub const CURSOR_HOME: &[u8] = b"\x1b[H";

/// Step back, blank the cell, step back again.
pub const ERASE_PREVIOUS: &[u8] = b"\x1b[D \x1b[D";

/// SGR reset: `CSI 0 m`.
pub const COLOR_DEFAULT: &str = "\x1b[0m";
/// SGR black foreground.
pub const COLOR_BLACK: &str = "\x1b[30m";
/// SGR red foreground.
pub const COLOR_RED: &str = "\x1b[31m";
/// SGR green foreground.
pub const COLOR_GREEN: &str = "\x1b[32m";
/// SGR yellow foreground.
pub const COLOR_YELLOW: &str = "\x1b[33m";
/// SGR blue foreground.
pub const COLOR_BLUE: &str = "\x1b[34m";
/// SGR magenta foreground.
pub const COLOR_MAGENTA: &str = "\x1b[35m";
/// SGR cyan foreground.
pub const COLOR_CYAN: &str = "\x1b[36m";
/// SGR white foreground.
pub const COLOR_WHITE: &str = "\x1b[37m";

/// Largest column count a single cursor move will encode.
pub const MAX_CURSOR_STEP: usize = 999;

/// Bytes needed for the longest cursor move (`ESC [ 9 9 9 D`).
pub const CURSOR_MOVE_MAX_LEN: usize = 6;

#[inline]
fn write_dec(buf: &mut [u8], n: usize) -> usize {
    if n >= 100 {
        buf[0] = b'0' + (n / 100) as u8;
        buf[1] = b'0' + ((n / 10) % 10) as u8;
        buf[2] = b'0' + (n % 10) as u8;
        3
    } else if n >= 10 {
        buf[0] = b'0' + (n / 10) as u8;
        buf[1] = b'0' + (n % 10) as u8;
        2
    } else {
        buf[0] = b'0' + n as u8;
        1
    }
}

/// Encode a relative horizontal cursor move into `buf`.
///
/// Positive offsets move right (`CSI n C`), negative offsets move left
/// (`CSI n D`). The magnitude is clamped to [`MAX_CURSOR_STEP`]. A zero
/// offset encodes nothing. Returns the number of bytes written.
///
/// # Panics
///
/// Panics if `buf` is shorter than [`CURSOR_MOVE_MAX_LEN`] and the move
/// needs the full length.
pub fn cursor_move(buf: &mut [u8], offset: isize) -> usize {
    if offset == 0 {
        return 0;
    }
    let final_byte = if offset < 0 { b'D' } else { b'C' };
    let steps = offset.unsigned_abs().min(MAX_CURSOR_STEP);

    buf[0] = 0x1b;
    buf[1] = b'[';
    let len = write_dec(&mut buf[2..], steps);
    buf[2 + len] = final_byte;
    2 + len + 1
}
