#![forbid(unsafe_code)]

//! Host capabilities and the console handle passed to them.
//!
//! The engine talks to the outside world through four small traits:
//!
//! | Trait | Called on | Required |
//! |-------|-----------|----------|
//! | [`Output`] | every byte the terminal must see | yes |
//! | [`Executor`] | Enter with a non-empty line | yes |
//! | [`Completer`] | Tab, with [`Features::COMPLETION`](crate::Features::COMPLETION) | no |
//! | [`SignalHandler`] | Ctrl+C, with [`Features::CTRL_C`](crate::Features::CTRL_C) | no |
//!
//! Callbacks that need to talk back to the terminal receive a [`Console`].
//! It exposes output and the few settings a command may legitimately
//! change (echo mode for a password prompt, the prompt text) without
//! handing out the line buffer the tokens borrow from.

use crate::ansi;
use crate::echo::{EchoMode, EchoState};

/// Terminal byte sink.
pub trait Output {
    /// Write `bytes` to the terminal and return how many were accepted.
    ///
    /// May block for transport back-pressure. Must not call back into the
    /// engine.
    fn write(&mut self, bytes: &[u8]) -> usize;
}

impl<O: Output + ?Sized> Output for &mut O {
    fn write(&mut self, bytes: &[u8]) -> usize {
        (**self).write(bytes)
    }
}

/// Runs submitted command lines.
pub trait Executor {
    /// Execute one command line split into `tokens`.
    ///
    /// The returned status is opaque to the engine; `0` conventionally
    /// means success. It is only handed to [`Executor::after_execute`].
    fn execute(&mut self, console: &mut Console<'_, '_>, tokens: &[&str]) -> i32;

    /// Hook run right before [`Executor::execute`] when
    /// [`Features::EXEC_HOOKS`](crate::Features::EXEC_HOOKS) is enabled.
    fn before_execute(&mut self, _tokens: &[&str]) {}

    /// Hook run right after [`Executor::execute`] when
    /// [`Features::EXEC_HOOKS`](crate::Features::EXEC_HOOKS) is enabled.
    fn after_execute(&mut self, _console: &mut Console<'_, '_>, _status: i32, _tokens: &[&str]) {}
}

/// Proposes completions for the token under the cursor.
pub trait Completer {
    /// Return every candidate that may replace the last token.
    ///
    /// `tokens` ends with the partial token being completed, which is empty
    /// when the cursor sits on a word boundary. An empty result means there
    /// is nothing to complete.
    fn complete<'a>(&'a mut self, tokens: &[&str]) -> &'a [&'a str];
}

/// Reacts to Ctrl+C.
pub trait SignalHandler {
    /// Called once per Ctrl+C byte. Purely advisory.
    fn interrupt(&mut self, console: &mut Console<'_, '_>);
}

/// Placeholder for an engine without a completer.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCompleter;

impl Completer for NoCompleter {
    fn complete<'a>(&'a mut self, _tokens: &[&str]) -> &'a [&'a str] {
        &[]
    }
}

/// Placeholder for an engine without a signal handler.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoSignal;

impl SignalHandler for NoSignal {
    fn interrupt(&mut self, _console: &mut Console<'_, '_>) {}
}

/// Engine-facing handle given to callbacks.
pub struct Console<'a, 'p> {
    out: &'a mut dyn Output,
    echo: &'a mut EchoState,
    prompt: &'a mut &'p str,
    end_of_line: &'static str,
    echo_enabled: bool,
}

impl core::fmt::Debug for Console<'_, '_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Console")
            .field("echo", &self.echo)
            .field("prompt", &self.prompt)
            .finish_non_exhaustive()
    }
}

impl<'a, 'p> Console<'a, 'p> {
    pub(crate) fn new(
        out: &'a mut dyn Output,
        echo: &'a mut EchoState,
        prompt: &'a mut &'p str,
        end_of_line: &'static str,
        echo_enabled: bool,
    ) -> Self {
        Self {
            out,
            echo,
            prompt,
            end_of_line,
            echo_enabled,
        }
    }

    /// Write raw bytes to the terminal.
    pub fn write(&mut self, bytes: &[u8]) -> usize {
        self.out.write(bytes)
    }

    /// Write text to the terminal.
    pub fn print(&mut self, text: &str) -> usize {
        self.out.write(text.as_bytes())
    }

    /// Write the configured end-of-line sequence.
    pub fn newline(&mut self) -> usize {
        self.out.write(self.end_of_line.as_bytes())
    }

    /// Erase the display and home the cursor.
    pub fn clear_screen(&mut self) {
        self.out.write(ansi::CLEAR_SCREEN);
        self.out.write(ansi::CURSOR_HOME);
    }

    /// Current echo mode.
    #[must_use]
    pub fn echo(&self) -> EchoMode {
        self.echo.mode()
    }

    /// Change the echo mode for the next line.
    ///
    /// Returns `false` (and changes nothing) when echo masking is not an
    /// enabled feature.
    pub fn set_echo(&mut self, mode: EchoMode) -> bool {
        if !self.echo_enabled {
            return false;
        }
        self.echo.set_mode(mode);
        true
    }

    /// Current prompt.
    #[must_use]
    pub fn prompt(&self) -> &'p str {
        *self.prompt
    }

    /// Replace the prompt. Takes effect when the prompt is next printed.
    pub fn set_prompt(&mut self, prompt: &'p str) {
        *self.prompt = prompt;
    }
}

/// [`Output`] adapter for any [`std::io::Write`].
///
/// Each write is flushed so interactive terminals see input immediately.
/// I/O errors are reported as zero bytes written.
#[cfg(feature = "std")]
#[derive(Debug)]
pub struct IoOutput<W: std::io::Write> {
    inner: W,
}

#[cfg(feature = "std")]
impl<W: std::io::Write> IoOutput<W> {
    /// Wrap a writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Borrow the wrapped writer.
    pub fn get_ref(&self) -> &W {
        &self.inner
    }

    /// Unwrap the writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

#[cfg(feature = "std")]
impl<W: std::io::Write> Output for IoOutput<W> {
    fn write(&mut self, bytes: &[u8]) -> usize {
        match self.inner.write_all(bytes).and_then(|()| self.inner.flush()) {
            Ok(()) => bytes.len(),
            Err(_) => 0,
        }
    }
}
