#![forbid(unsafe_code)]

//! Engine status codes.

use core::fmt;

/// Failure of a public engine operation.
///
/// Every variant leaves the engine in a valid state; the caller can keep
/// feeding input after any of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Error {
    /// Generic failure (for example a submitted line that is not UTF-8).
    Generic,
    /// Invalid argument, or a key needs a capability that was never attached.
    Param,
    /// The submitted line splits into more tokens than the engine allows.
    TooManyTokens,
    /// The line buffer cannot hold the inserted text.
    LineFull,
    /// Completion produced nothing usable.
    Completion,
}

impl Error {
    /// Stable numeric status code. `0` is reserved for success.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Generic => 1,
            Self::Param => 2,
            Self::TooManyTokens => 3,
            Self::LineFull => 4,
            Self::Completion => 5,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Generic => write!(f, "generic error"),
            Self::Param => write!(f, "invalid parameter"),
            Self::TooManyTokens => write!(f, "too many tokens"),
            Self::LineFull => write!(f, "command line is full"),
            Self::Completion => write!(f, "completion failed"),
        }
    }
}

impl core::error::Error for Error {}
