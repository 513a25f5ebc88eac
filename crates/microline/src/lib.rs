#![forbid(unsafe_code)]
#![cfg_attr(not(any(feature = "std", test)), no_std)]

//! Allocation-free line editing for byte-stream terminals.
//!
//! The host feeds raw terminal input into an [`Engine`]; the engine edits
//! a fixed-size line buffer, echoes through an [`Output`], keeps a
//! byte-ring history and hands completed lines to an [`Executor`] as
//! borrowed tokens. Buffer sizes are const generics, so nothing is
//! allocated at run time and the crate works without `std`.
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Byte dispatcher and editing operations |
//! | [`line`] | Fixed-capacity line buffer |
//! | [`history`] | Byte-ring command history |
//! | [`escape`] | ANSI escape sequence decoder |
//! | [`tokens`] | Line tokenizer |
//! | [`completion`] | Completion planning |
//! | [`render`] | ANSI rendering of the line |
//! | [`console`] | Host capability traits |

pub mod ansi;
pub mod completion;
pub mod config;
pub mod console;
pub mod echo;
pub mod engine;
pub mod error;
pub mod escape;
pub mod history;
pub mod line;
pub mod logging;
pub mod render;
pub mod tokens;

pub use config::{Config, Features};
#[cfg(feature = "std")]
pub use console::IoOutput;
pub use console::{Completer, Console, Executor, NoCompleter, NoSignal, Output, SignalHandler};
pub use echo::EchoMode;
pub use engine::{DEFAULT_LINE, DEFAULT_RING, DEFAULT_TOKENS, Engine};
pub use error::Error;
pub use history::{Direction, HistoryRing};
pub use line::LineBuffer;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, trace, warn};

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

const fn parse_component(text: &str) -> u32 {
    let bytes = text.as_bytes();
    let mut value = 0u32;
    let mut i = 0;
    while i < bytes.len() {
        value = value * 10 + (bytes[i] - b'0') as u32;
        i += 1;
    }
    value
}

/// Crate version packed as `0x00MMmmpp` (major, minor, patch).
#[must_use]
pub const fn version_code() -> u32 {
    let major = parse_component(env!("CARGO_PKG_VERSION_MAJOR"));
    let minor = parse_component(env!("CARGO_PKG_VERSION_MINOR"));
    let patch = parse_component(env!("CARGO_PKG_VERSION_PATCH"));
    (major << 16) | ((minor & 0xFF) << 8) | (patch & 0xFF)
}
