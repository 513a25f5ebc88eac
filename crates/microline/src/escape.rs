#![forbid(unsafe_code)]

//! Escape sequence decoder.
//!
//! Recognizes the few multi-byte ANSI sequences a line editor cares about
//! and turns them into [`EscapeAction`]s. Like the rest of the engine it is
//! a pure state machine: it never touches the line buffer or the output.
//!
//! # Recognized sequences
//!
//! The dispatcher feeds every byte after `ESC` (0x1B) until the decoder
//! reports completion:
//!
//! | Bytes after ESC | Action |
//! |-----------------|--------|
//! | `DEL` | [`EscapeAction::Delete`] |
//! | `[ A` / `[ B` | [`EscapeAction::HistoryUp`] / [`EscapeAction::HistoryDown`] |
//! | `[ C` / `[ D` | [`EscapeAction::Right`] / [`EscapeAction::Left`] |
//! | `[ 7 ~` / `[ 1 ~` | [`EscapeAction::Home`] |
//! | `[ 8 ~` / `[ 4 ~` | [`EscapeAction::End`] |
//! | `[ 3 ~` | [`EscapeAction::Delete`] |
//!
//! Anything else aborts the sequence silently.

/// Decoder state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum EscapeState {
    /// Right after ESC.
    #[default]
    Start,
    /// After ESC `[`.
    Bracket,
    /// After ESC `[ 7` or ESC `[ 1`.
    Home,
    /// After ESC `[ 8` or ESC `[ 4`.
    End,
    /// After ESC `[ 3`.
    Delete,
}

/// Editing action decoded from a complete escape sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscapeAction {
    /// Recall the previous history record.
    HistoryUp,
    /// Recall the next history record.
    HistoryDown,
    /// Move the cursor one byte right.
    Right,
    /// Move the cursor one byte left.
    Left,
    /// Move the cursor to the start of the line.
    Home,
    /// Move the cursor to the end of the line.
    End,
    /// Delete the byte under the cursor.
    Delete,
    /// Unrecognized sequence; nothing to do.
    Abort,
}

/// Result of feeding one byte to the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// The sequence needs more bytes.
    Pending,
    /// The sequence is over.
    Done(EscapeAction),
}

/// Escape sequence decoder.
///
/// ```
/// use microline::escape::{EscapeAction, EscapeDecoder, Step};
///
/// let mut decoder = EscapeDecoder::new();
/// decoder.begin();
/// assert_eq!(decoder.feed(b'['), Step::Pending);
/// assert_eq!(decoder.feed(b'A'), Step::Done(EscapeAction::HistoryUp));
/// assert!(!decoder.is_active());
/// ```
#[derive(Debug, Clone, Default)]
pub struct EscapeDecoder {
    state: EscapeState,
    active: bool,
}

impl EscapeDecoder {
    /// Create an idle decoder.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: EscapeState::Start,
            active: false,
        }
    }

    /// Whether a sequence is in progress.
    #[inline]
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Start a sequence; call when ESC is received.
    pub fn begin(&mut self) {
        self.state = EscapeState::Start;
        self.active = true;
    }

    /// Feed the next byte of the sequence.
    pub fn feed(&mut self, byte: u8) -> Step {
        let next = match (self.state, byte) {
            (EscapeState::Start, b'[') => Some(EscapeState::Bracket),
            (EscapeState::Bracket, b'7' | b'1') => Some(EscapeState::Home),
            (EscapeState::Bracket, b'8' | b'4') => Some(EscapeState::End),
            (EscapeState::Bracket, b'3') => Some(EscapeState::Delete),
            _ => None,
        };
        if let Some(state) = next {
            self.state = state;
            return Step::Pending;
        }

        let action = match (self.state, byte) {
            (EscapeState::Start, 0x7F) => EscapeAction::Delete,
            (EscapeState::Bracket, b'A') => EscapeAction::HistoryUp,
            (EscapeState::Bracket, b'B') => EscapeAction::HistoryDown,
            (EscapeState::Bracket, b'C') => EscapeAction::Right,
            (EscapeState::Bracket, b'D') => EscapeAction::Left,
            (EscapeState::Home, b'~') => EscapeAction::Home,
            (EscapeState::End, b'~') => EscapeAction::End,
            (EscapeState::Delete, b'~') => EscapeAction::Delete,
            _ => {
                crate::trace!(state = ?self.state, byte, "escape sequence aborted");
                EscapeAction::Abort
            }
        };
        self.state = EscapeState::Start;
        self.active = false;
        Step::Done(action)
    }
}
