#![forbid(unsafe_code)]

//! Construction-time configuration.
//!
//! Capacities (line length, token count, history ring size) are const
//! generic parameters of [`crate::Engine`]. Everything else lives in
//! [`Config`], which is resolved once when the engine is built. Optional
//! behavior is switched with [`Features`] rather than conditional
//! compilation, so one build can serve differently configured sessions.
//!
//! # Example
//!
//! ```
//! use microline::{Config, Features};
//!
//! let config = Config::default()
//!     .with_prompt("uart> ")
//!     .with_features(Features::default() | Features::COMPLETION | Features::ECHO_OFF);
//! assert!(config.features.contains(Features::HISTORY));
//! ```

use bitflags::bitflags;

use crate::ansi;

/// Smallest chunk the line redraw will use.
pub const MIN_PRINT_BUFFER: usize = 16;

/// Largest chunk the line redraw will use (the stack buffer size).
pub const MAX_PRINT_BUFFER: usize = 128;

bitflags! {
    /// Optional engine behaviors.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Features: u16 {
        /// Tab asks the attached completer for candidates.
        const COMPLETION       = 1 << 0;
        /// Single and double quotes group words into one token.
        const QUOTING          = 1 << 1;
        /// Echo can be masked (`set_echo`).
        const ECHO_OFF         = 1 << 2;
        /// Submitted lines are kept in the history ring.
        const HISTORY          = 1 << 3;
        /// Arrow, Home, End and Delete escape sequences are decoded.
        const ESCAPE_SEQUENCES = 1 << 4;
        /// Ctrl+C calls the attached signal handler.
        const CTRL_C           = 1 << 5;
        /// Executor hooks run around each command.
        const EXEC_HOOKS       = 1 << 6;
        /// Full redraws start with `\r` instead of a long left move.
        const CARRIAGE_RETURN  = 1 << 7;
        /// The prompt is printed when the engine is constructed.
        const PROMPT_ON_INIT   = 1 << 8;
    }
}

impl Default for Features {
    fn default() -> Self {
        Self::HISTORY | Self::ESCAPE_SEQUENCES | Self::CARRIAGE_RETURN | Self::PROMPT_ON_INIT
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config<'p> {
    /// Prompt text. Borrowed, never copied.
    pub prompt: &'p str,
    /// SGR sequence printed before the prompt. Empty disables coloring.
    pub prompt_color: &'static str,
    /// Sequence emitted for a new line.
    pub end_of_line: &'static str,
    /// Byte echoed in place of masked input.
    pub echo_mask: u8,
    /// Chunk size used when redrawing the line.
    pub print_buffer_len: usize,
    /// Enabled optional behaviors.
    pub features: Features,
}

impl Default for Config<'_> {
    fn default() -> Self {
        Self {
            prompt: "> ",
            prompt_color: ansi::COLOR_GREEN,
            end_of_line: "\r\n",
            echo_mask: b'*',
            print_buffer_len: 40,
            features: Features::default(),
        }
    }
}

impl<'p> Config<'p> {
    /// Replace the prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: &'p str) -> Self {
        self.prompt = prompt;
        self
    }

    /// Replace the prompt color (`""` for none).
    #[must_use]
    pub fn with_prompt_color(mut self, color: &'static str) -> Self {
        self.prompt_color = color;
        self
    }

    /// Replace the end-of-line sequence.
    #[must_use]
    pub fn with_end_of_line(mut self, eol: &'static str) -> Self {
        self.end_of_line = eol;
        self
    }

    /// Replace the echo mask byte.
    #[must_use]
    pub fn with_echo_mask(mut self, mask: u8) -> Self {
        self.echo_mask = mask;
        self
    }

    /// Replace the redraw chunk size.
    #[must_use]
    pub fn with_print_buffer_len(mut self, len: usize) -> Self {
        self.print_buffer_len = len;
        self
    }

    /// Replace the feature set.
    #[must_use]
    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    /// Redraw chunk size, clamped to the supported range.
    #[must_use]
    pub fn chunk_len(&self) -> usize {
        self.print_buffer_len.clamp(MIN_PRINT_BUFFER, MAX_PRINT_BUFFER)
    }

    #[inline]
    pub(crate) fn has(&self, feature: Features) -> bool {
        self.features.contains(feature)
    }
}
