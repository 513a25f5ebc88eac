#![forbid(unsafe_code)]

//! The line-editing engine and its byte dispatcher.
//!
//! [`Engine`] owns the line buffer, the history ring, the escape decoder and
//! the echo state, plus the host capabilities. Input is pushed in with
//! [`Engine::process_input`], one chunk at a time; each byte runs to
//! completion (including any command it submits) before the next one is
//! looked at.
//!
//! # Dispatch
//!
//! 1. While an escape sequence is in progress, bytes go to the decoder.
//! 2. CR and LF submit the line. The second byte of a CRLF or LFCR pair is
//!    swallowed so each pair submits exactly once.
//! 3. Other control bytes map to editing keys (see the table below).
//! 4. Everything else is inserted at the cursor and echoed. A space typed
//!    on an empty line is dropped.
//!
//! | Byte | Key |
//! |------|-----|
//! | `0x01` | Ctrl+A: start of line |
//! | `0x02` | Ctrl+B: one left |
//! | `0x03` | Ctrl+C: signal handler |
//! | `0x04` | Ctrl+D: delete under cursor |
//! | `0x05` | Ctrl+E: end of line |
//! | `0x06` | Ctrl+F: one right |
//! | `0x08`, `0x7F` | Backspace |
//! | `0x09` | Tab: completion |
//! | `0x0B` | Ctrl+K: kill to end of line |
//! | `0x0E` | Ctrl+N: next history record |
//! | `0x10` | Ctrl+P: previous history record |
//! | `0x12` | Ctrl+R: redraw |
//! | `0x15` | Ctrl+U: kill to start of line |
//! | `0x1B` | ESC: escape sequence |
//!
//! # Example
//!
//! ```
//! use microline::{Config, Console, Engine, Executor, Output};
//!
//! #[derive(Default)]
//! struct Screen(Vec<u8>);
//!
//! impl Output for Screen {
//!     fn write(&mut self, bytes: &[u8]) -> usize {
//!         self.0.extend_from_slice(bytes);
//!         bytes.len()
//!     }
//! }
//!
//! #[derive(Default)]
//! struct Shell(Vec<String>);
//!
//! impl Executor for Shell {
//!     fn execute(&mut self, _console: &mut Console<'_, '_>, tokens: &[&str]) -> i32 {
//!         self.0.push(tokens.join(","));
//!         0
//!     }
//! }
//!
//! let mut engine: Engine<'_, Screen, Shell> =
//!     Engine::new(Config::default(), Screen::default(), Shell::default());
//! engine.process_input(b"led on\r\n").unwrap();
//! assert_eq!(engine.executor().0, ["led,on"]);
//! ```

use core::fmt;

use crate::completion;
use crate::config::{Config, Features};
use crate::console::{Completer, Console, Executor, NoCompleter, NoSignal, Output, SignalHandler};
use crate::echo::{EchoMode, EchoState};
use crate::error::Error;
use crate::escape::{EscapeAction, EscapeDecoder, Step};
use crate::history::{Direction, HistoryRing};
use crate::line::LineBuffer;
use crate::render::Terminal;
use crate::tokens::{self, Tokens};

/// Default maximum line length in bytes.
pub const DEFAULT_LINE: usize = 60;
/// Default maximum number of tokens per line.
pub const DEFAULT_TOKENS: usize = 8;
/// Default history ring size in bytes.
pub const DEFAULT_RING: usize = 64;

const CTRL_A: u8 = 0x01;
const CTRL_B: u8 = 0x02;
const CTRL_C: u8 = 0x03;
const CTRL_D: u8 = 0x04;
const CTRL_E: u8 = 0x05;
const CTRL_F: u8 = 0x06;
const BACKSPACE: u8 = 0x08;
const TAB: u8 = 0x09;
const LF: u8 = 0x0A;
const CTRL_K: u8 = 0x0B;
const CR: u8 = 0x0D;
const CTRL_N: u8 = 0x0E;
const CTRL_P: u8 = 0x10;
const CTRL_R: u8 = 0x12;
const CTRL_U: u8 = 0x15;
const ESC: u8 = 0x1B;
const DEL: u8 = 0x7F;

const TOO_MANY_TOKENS: &[u8] = b"ERROR: too many tokens";
const INVALID_INPUT: &[u8] = b"ERROR: invalid input";

#[inline]
fn is_control(byte: u8) -> bool {
    byte <= 0x1F || byte == DEL
}

#[inline]
fn offset(from: usize, to: usize) -> isize {
    if to >= from {
        isize::try_from(to - from).unwrap_or(isize::MAX)
    } else {
        -isize::try_from(from - to).unwrap_or(isize::MAX)
    }
}

/// Line-editing engine for one terminal session.
///
/// - `O`, `E`: required output sink and command executor.
/// - `C`, `S`: optional completer and Ctrl+C handler, attached with
///   [`Engine::with_completer`] and [`Engine::with_signal_handler`].
/// - `LINE`: maximum line length in bytes.
/// - `TOKENS`: maximum tokens per submitted line.
/// - `RING`: history ring size in bytes.
///
/// Nothing is allocated after construction. The engine is not reentrant:
/// callbacks receive a [`Console`] rather than the engine itself.
pub struct Engine<
    'p,
    O,
    E,
    C = NoCompleter,
    S = NoSignal,
    const LINE: usize = DEFAULT_LINE,
    const TOKENS: usize = DEFAULT_TOKENS,
    const RING: usize = DEFAULT_RING,
> {
    config: Config<'p>,
    prompt: &'p str,
    line: LineBuffer<LINE>,
    history: HistoryRing<RING>,
    escape: EscapeDecoder,
    echo: EchoState,
    last_newline: Option<u8>,
    output: O,
    executor: E,
    completer: Option<C>,
    signal: Option<S>,
}

impl<O, E, C, S, const LINE: usize, const TOKENS: usize, const RING: usize> fmt::Debug
    for Engine<'_, O, E, C, S, LINE, TOKENS, RING>
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("prompt", &self.prompt)
            .field("line", &self.line)
            .field("history", &self.history)
            .field("escape", &self.escape)
            .field("echo", &self.echo)
            .field("has_completer", &self.completer.is_some())
            .field("has_signal_handler", &self.signal.is_some())
            .finish_non_exhaustive()
    }
}

impl<'p, O, E, C, S, const LINE: usize, const TOKENS: usize, const RING: usize>
    Engine<'p, O, E, C, S, LINE, TOKENS, RING>
where
    O: Output,
    E: Executor,
    C: Completer,
    S: SignalHandler,
{
    /// Create an engine. Prints the prompt when
    /// [`Features::PROMPT_ON_INIT`] is set.
    pub fn new(config: Config<'p>, output: O, executor: E) -> Self {
        let mut engine = Self {
            prompt: config.prompt,
            config,
            line: LineBuffer::new(),
            history: HistoryRing::new(),
            escape: EscapeDecoder::new(),
            echo: EchoState::default(),
            last_newline: None,
            output,
            executor,
            completer: None,
            signal: None,
        };
        if engine.config.has(Features::PROMPT_ON_INIT) {
            engine.term().prompt();
        }
        engine
    }

    /// Attach a completer, used on Tab when [`Features::COMPLETION`] is set.
    pub fn with_completer<C2: Completer>(
        self,
        completer: C2,
    ) -> Engine<'p, O, E, C2, S, LINE, TOKENS, RING> {
        Engine {
            config: self.config,
            prompt: self.prompt,
            line: self.line,
            history: self.history,
            escape: self.escape,
            echo: self.echo,
            last_newline: self.last_newline,
            output: self.output,
            executor: self.executor,
            completer: Some(completer),
            signal: self.signal,
        }
    }

    /// Attach a Ctrl+C handler, used when [`Features::CTRL_C`] is set.
    pub fn with_signal_handler<S2: SignalHandler>(
        self,
        handler: S2,
    ) -> Engine<'p, O, E, C, S2, LINE, TOKENS, RING> {
        Engine {
            config: self.config,
            prompt: self.prompt,
            line: self.line,
            history: self.history,
            escape: self.escape,
            echo: self.echo,
            last_newline: self.last_newline,
            output: self.output,
            executor: self.executor,
            completer: self.completer,
            signal: Some(handler),
        }
    }

    /// The configuration the engine was built with.
    #[must_use]
    pub fn config(&self) -> &Config<'p> {
        &self.config
    }

    /// Current prompt.
    #[must_use]
    pub fn prompt(&self) -> &'p str {
        self.prompt
    }

    /// Replace the prompt. It is printed on the next prompt redraw.
    pub fn set_prompt(&mut self, prompt: &'p str) {
        self.prompt = prompt;
    }

    /// Current echo mode.
    #[must_use]
    pub fn echo(&self) -> EchoMode {
        self.echo.mode()
    }

    /// Change the echo mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Param`] when [`Features::ECHO_OFF`] is not enabled.
    pub fn set_echo(&mut self, mode: EchoMode) -> Result<(), Error> {
        if !self.config.has(Features::ECHO_OFF) {
            return Err(Error::Param);
        }
        self.echo.set_mode(mode);
        Ok(())
    }

    /// The line being edited.
    #[must_use]
    pub fn line(&self) -> &LineBuffer<LINE> {
        &self.line
    }

    /// Cursor position within the line.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.line.cursor()
    }

    /// The history ring.
    #[must_use]
    pub fn history(&self) -> &HistoryRing<RING> {
        &self.history
    }

    /// The output sink.
    #[must_use]
    pub fn output(&self) -> &O {
        &self.output
    }

    /// The output sink, mutably.
    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }

    /// The executor.
    #[must_use]
    pub fn executor(&self) -> &E {
        &self.executor
    }

    /// The executor, mutably.
    pub fn executor_mut(&mut self) -> &mut E {
        &mut self.executor
    }

    /// The attached completer, if any.
    pub fn completer_mut(&mut self) -> Option<&mut C> {
        self.completer.as_mut()
    }

    /// The attached signal handler, if any.
    pub fn signal_handler_mut(&mut self) -> Option<&mut S> {
        self.signal.as_mut()
    }

    /// Feed a chunk of terminal input.
    ///
    /// Every byte is processed even when an earlier one fails.
    ///
    /// # Errors
    ///
    /// - [`Error::Param`] for an empty chunk, or for Tab / Ctrl+C when the
    ///   feature is enabled but no capability is attached.
    /// - [`Error::LineFull`] when a typed byte did not fit.
    /// - [`Error::TooManyTokens`] when a submitted line had too many tokens.
    /// - [`Error::Completion`] when Tab found nothing to complete.
    /// - [`Error::Generic`] when a submitted line was not UTF-8.
    ///
    /// Only the first failure of the chunk is reported.
    pub fn process_input(&mut self, input: &[u8]) -> Result<(), Error> {
        if input.is_empty() {
            return Err(Error::Param);
        }
        let mut first_error = None;
        for &byte in input {
            if let Err(err) = self.process_byte(byte) {
                first_error.get_or_insert(err);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    fn process_byte(&mut self, byte: u8) -> Result<(), Error> {
        if self.escape.is_active() {
            if let Step::Done(action) = self.escape.feed(byte) {
                self.apply_escape(action);
            }
            return Ok(());
        }

        if byte == CR || byte == LF {
            let companion = if byte == CR { LF } else { CR };
            if self.last_newline == Some(companion) {
                self.last_newline = None;
                return Ok(());
            }
            self.last_newline = Some(byte);
            return self.submit();
        }
        self.last_newline = None;

        if is_control(byte) {
            self.control(byte)
        } else {
            self.insert_byte(byte)
        }
    }

    fn control(&mut self, byte: u8) -> Result<(), Error> {
        match byte {
            TAB => return self.complete(),
            CTRL_C => return self.interrupt(),
            ESC => {
                if self.config.has(Features::ESCAPE_SEQUENCES) {
                    self.escape.begin();
                }
            }
            CTRL_U => {
                let cursor = self.line.cursor();
                self.line.backspace(cursor);
                self.redraw(0, true);
            }
            CTRL_K => {
                self.term().clear_to_end();
                self.line.truncate(self.line.cursor());
            }
            CTRL_E => self.move_to(self.line.len()),
            CTRL_A => self.move_to(0),
            CTRL_F => self.step_right(),
            CTRL_B => self.step_left(),
            CTRL_P => self.recall(Direction::Up),
            CTRL_N => self.recall(Direction::Down),
            BACKSPACE | DEL => self.backspace(),
            CTRL_D => self.delete_at_cursor(),
            CTRL_R => {
                let mut term = self.term();
                term.newline();
                term.prompt();
                self.redraw(0, false);
            }
            _ => {}
        }
        Ok(())
    }

    fn apply_escape(&mut self, action: EscapeAction) {
        match action {
            EscapeAction::HistoryUp => self.recall(Direction::Up),
            EscapeAction::HistoryDown => self.recall(Direction::Down),
            EscapeAction::Right => self.step_right(),
            EscapeAction::Left => self.step_left(),
            EscapeAction::Home => self.move_to(0),
            EscapeAction::End => self.move_to(self.line.len()),
            EscapeAction::Delete => self.delete_at_cursor(),
            EscapeAction::Abort => {}
        }
    }

    fn insert_byte(&mut self, byte: u8) -> Result<(), Error> {
        if byte == b' ' && self.line.is_empty() {
            return Ok(());
        }
        let at = self.line.cursor();
        if let Err(err) = self.line.insert(&[byte]) {
            crate::debug!(len = self.line.len(), "insert rejected, line full");
            return Err(err);
        }
        self.echo.note_insert(at);

        if self.line.cursor() == self.line.len() {
            let shown = if self.echo.masks(at) {
                self.config.echo_mask
            } else {
                byte
            };
            self.output.write(&[shown]);
        } else {
            self.redraw(at, false);
        }
        Ok(())
    }

    fn backspace(&mut self) {
        if self.line.cursor() == 0 {
            return;
        }
        self.line.backspace(1);
        if self.line.cursor() == self.line.len() {
            self.term().erase_previous();
        } else {
            self.redraw(self.line.cursor(), true);
        }
    }

    fn delete_at_cursor(&mut self) {
        self.line.delete_at_cursor();
        self.redraw(self.line.cursor(), false);
    }

    fn move_to(&mut self, target: usize) {
        let cursor = self.line.cursor();
        self.term().move_cursor(offset(cursor, target));
        self.line.set_cursor(target);
    }

    fn step_right(&mut self) {
        if self.line.cursor() < self.line.len() {
            self.move_to(self.line.cursor() + 1);
        }
    }

    fn step_left(&mut self) {
        if self.line.cursor() > 0 {
            self.move_to(self.line.cursor() - 1);
        }
    }

    fn recall(&mut self, direction: Direction) {
        if !self.config.has(Features::HISTORY) || !self.echo.is_on() {
            return;
        }
        match self.history.navigate(direction) {
            Some(record) => self.line.replace(record.bytes()),
            None => self.line.reset(),
        }
        self.redraw(0, true);
    }

    fn interrupt(&mut self) -> Result<(), Error> {
        if !self.config.has(Features::CTRL_C) {
            return Ok(());
        }
        let Some(handler) = self.signal.as_mut() else {
            return Err(Error::Param);
        };
        crate::debug!("ctrl+c");
        let mut console = Console::new(
            &mut self.output,
            &mut self.echo,
            &mut self.prompt,
            self.config.end_of_line,
            self.config.has(Features::ECHO_OFF),
        );
        handler.interrupt(&mut console);
        Ok(())
    }

    fn complete(&mut self) -> Result<(), Error> {
        if !self.config.has(Features::COMPLETION) {
            return Ok(());
        }
        let Some(completer) = self.completer.as_mut() else {
            return Err(Error::Param);
        };
        if !self.echo.is_on() {
            return Ok(());
        }

        let cursor = self.line.cursor();
        let quoting = self.config.has(Features::QUOTING);
        // Tokens borrow the line, so they must be gone before it is edited.
        let (plan, candidates) = {
            let typed = &self.line.as_bytes()[..cursor];
            let mut words: Tokens<'_, TOKENS> =
                tokens::split(typed, quoting).map_err(|_| Error::Completion)?;
            let at_boundary = typed.last().is_none_or(|&b| b == b' ');
            if at_boundary && !(quoting && tokens::ends_in_open_quote(typed)) {
                words.push("").map_err(|_| Error::Completion)?;
            }
            let partial = words.last().copied().unwrap_or("");

            let candidates = completer.complete(&words);
            match completion::plan(partial, candidates) {
                Ok(plan) => (plan, candidates),
                Err(err) => {
                    crate::debug!(partial, "no completion candidates");
                    return Err(err);
                }
            }
        };
        crate::debug!(candidates = candidates.len(), insert = plan.insert, "completion");

        let mut pos = cursor;
        if plan.list {
            let mut term = Terminal::new(&mut self.output, &self.config, self.prompt);
            term.newline();
            for candidate in candidates {
                term.write(candidate.as_bytes());
                term.write(b" ");
            }
            term.newline();
            term.prompt();
            pos = 0;
        }

        let mut result = self.line.insert(plan.insert.as_bytes());
        if result.is_ok() && plan.trailing_space {
            result = self.line.insert(b" ");
        }
        self.redraw(pos, false);
        result
    }

    fn submit(&mut self) -> Result<(), Error> {
        let span = crate::debug_span!("submit", len = self.line.len());
        let _guard = span.enter();

        self.term().newline();
        let result = if self.line.is_empty() {
            Ok(())
        } else {
            self.execute_line()
        };
        self.term().prompt();
        self.line.reset();
        result
    }

    fn execute_line(&mut self) -> Result<(), Error> {
        if self.config.has(Features::HISTORY) && self.echo.is_on() {
            self.history.save(self.line.as_bytes());
        }
        self.echo.finish_line(self.line.len());

        let words: Tokens<'_, TOKENS> =
            match tokens::split(self.line.as_bytes(), self.config.has(Features::QUOTING)) {
                Ok(words) => words,
                Err(err) => {
                    crate::warn!(error = %err, "line discarded");
                    let message = if err == Error::TooManyTokens {
                        TOO_MANY_TOKENS
                    } else {
                        INVALID_INPUT
                    };
                    let mut term = Terminal::new(&mut self.output, &self.config, self.prompt);
                    term.write(message);
                    term.newline();
                    return Err(err);
                }
            };

        let hooks = self.config.has(Features::EXEC_HOOKS);
        let mut console = Console::new(
            &mut self.output,
            &mut self.echo,
            &mut self.prompt,
            self.config.end_of_line,
            self.config.has(Features::ECHO_OFF),
        );
        if hooks {
            self.executor.before_execute(&words);
        }
        let status = self.executor.execute(&mut console, &words);
        if hooks {
            self.executor.after_execute(&mut console, status, &words);
        }
        crate::debug!(tokens = words.len(), status, "line executed");
        Ok(())
    }

    fn redraw(&mut self, pos: usize, reset: bool) {
        Terminal::new(&mut self.output, &self.config, self.prompt).print_line(
            &self.line,
            &self.echo,
            pos,
            reset,
        );
    }

    fn term(&mut self) -> Terminal<'_, O> {
        Terminal::new(&mut self.output, &self.config, self.prompt)
    }
}
