#![forbid(unsafe_code)]

//! Echo masking for password-style input.

/// How typed characters are echoed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EchoMode {
    /// Echo everything.
    #[default]
    On,
    /// Mask input until the mode is changed again.
    Off,
    /// Mask input for the next non-empty line, then switch back to [`EchoMode::On`].
    Once,
}

/// Current echo mode plus the position where masking starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EchoState {
    mode: EchoMode,
    mask_from: Option<usize>,
}

impl EchoState {
    /// The active mode.
    #[inline]
    #[must_use]
    pub fn mode(&self) -> EchoMode {
        self.mode
    }

    /// Index from which bytes are masked, once recorded.
    #[inline]
    #[must_use]
    pub fn mask_from(&self) -> Option<usize> {
        self.mask_from
    }

    /// Switch mode. The mask start is recorded again on the next insert.
    pub fn set_mode(&mut self, mode: EchoMode) {
        self.mode = mode;
        self.mask_from = None;
    }

    /// Whether input is currently echoed verbatim.
    #[inline]
    #[must_use]
    pub fn is_on(&self) -> bool {
        self.mode == EchoMode::On
    }

    /// Record `cursor` as the mask start if a masked region began and no
    /// start is known yet.
    pub fn note_insert(&mut self, cursor: usize) {
        if !self.is_on() && self.mask_from.is_none() {
            self.mask_from = Some(cursor);
        }
    }

    /// Whether the byte at `index` must be shown masked.
    #[inline]
    #[must_use]
    pub fn masks(&self, index: usize) -> bool {
        !self.is_on() && self.mask_from.is_some_and(|from| index >= from)
    }

    /// Finish a submitted line of `len` bytes.
    ///
    /// [`EchoMode::Once`] reverts to [`EchoMode::On`] when something was
    /// typed in the masked region. The mask start is forgotten either way so
    /// the next line records its own.
    pub fn finish_line(&mut self, len: usize) {
        if self.mode == EchoMode::Once && self.mask_from.is_some_and(|from| from < len) {
            self.mode = EchoMode::On;
        }
        self.mask_from = None;
    }
}
