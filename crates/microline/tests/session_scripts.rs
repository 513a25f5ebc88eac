//! Scripted terminal sessions driven through the public engine API.
//!
//! Each test feeds raw bytes as a terminal would and checks what the
//! executor received and what was echoed back.

use microline::{
    Completer, Config, Console, EchoMode, Engine, Error, Executor, Features, NoCompleter,
    NoSignal, Output, SignalHandler,
};

// ── Helpers ─────────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct Screen(Vec<u8>);

impl Screen {
    fn take(&mut self) -> String {
        let text = String::from_utf8_lossy(&self.0).into_owned();
        self.0.clear();
        text
    }
}

impl Output for Screen {
    fn write(&mut self, bytes: &[u8]) -> usize {
        self.0.extend_from_slice(bytes);
        bytes.len()
    }
}

#[derive(Debug, Default)]
struct Recorder {
    lines: Vec<Vec<String>>,
    hooks: Vec<String>,
}

impl Recorder {
    fn joined(&self) -> Vec<String> {
        self.lines.iter().map(|tokens| tokens.join("|")).collect()
    }
}

impl Executor for Recorder {
    fn execute(&mut self, console: &mut Console<'_, '_>, tokens: &[&str]) -> i32 {
        self.lines.push(tokens.iter().map(|t| t.to_string()).collect());
        match tokens {
            ["login"] => {
                console.set_echo(EchoMode::Once);
                console.set_prompt("password: ");
                0
            }
            ["fail", ..] => 7,
            _ => 0,
        }
    }

    fn before_execute(&mut self, tokens: &[&str]) {
        self.hooks.push(format!("before {}", tokens.len()));
    }

    fn after_execute(&mut self, console: &mut Console<'_, '_>, status: i32, _tokens: &[&str]) {
        self.hooks.push(format!("after {status}"));
        if status != 0 {
            console.print("status ");
            console.print(&status.to_string());
            console.newline();
        }
    }
}

#[derive(Debug)]
struct Words {
    vocabulary: Vec<&'static str>,
    matches: Vec<&'static str>,
    seen: Vec<Vec<String>>,
}

impl Words {
    fn new(vocabulary: &[&'static str]) -> Self {
        Self {
            vocabulary: vocabulary.to_vec(),
            matches: Vec::new(),
            seen: Vec::new(),
        }
    }
}

impl Completer for Words {
    fn complete<'a>(&'a mut self, tokens: &[&str]) -> &'a [&'a str] {
        self.seen.push(tokens.iter().map(|t| t.to_string()).collect());
        let partial = tokens.last().copied().unwrap_or("");
        self.matches = self
            .vocabulary
            .iter()
            .copied()
            .filter(|word| word.starts_with(partial))
            .collect();
        &self.matches
    }
}

#[derive(Debug, Default)]
struct Interrupts(usize);

impl SignalHandler for Interrupts {
    fn interrupt(&mut self, console: &mut Console<'_, '_>) {
        self.0 += 1;
        console.print("^C");
    }
}

type Session<C = NoCompleter, S = NoSignal> =
    Engine<'static, Screen, Recorder, C, S, 10, 4, 32>;

type Plain = Session<NoCompleter, NoSignal>;

fn config(extra: Features) -> Config<'static> {
    Config::default()
        .with_prompt_color("")
        .with_features(Features::default() | extra)
}

fn session(extra: Features) -> Session {
    let mut engine: Session = Engine::new(config(extra), Screen::default(), Recorder::default());
    engine.output_mut().take();
    engine
}

fn completing(extra: Features, vocabulary: &[&'static str]) -> Session<Words> {
    let mut engine: Session<Words> =
        Plain::new(config(Features::COMPLETION | extra), Screen::default(), Recorder::default())
            .with_completer(Words::new(vocabulary));
    engine.output_mut().take();
    engine
}

// ═════════════════════════════════════════════════════════════════════════
// Line endings
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn crlf_and_lfcr_submit_once() {
    let mut engine = session(Features::empty());
    engine.process_input(b"ls\r\n").unwrap();
    engine.process_input(b"pwd\n\r").unwrap();
    engine.process_input(b"id\r").unwrap();
    engine.process_input(b"\nwho\n").unwrap();
    assert_eq!(engine.executor().joined(), ["ls", "pwd", "id", "who"]);
}

#[test]
fn repeated_line_endings_are_separate_submissions() {
    let mut engine = session(Features::empty());
    engine.process_input(b"a\r\rb\n\n").unwrap();
    assert_eq!(engine.executor().joined(), ["a", "b"]);
    assert_eq!(engine.output_mut().take(), "a\r\n> \r\n> b\r\n> \r\n> ");
}

#[test]
fn line_ending_split_across_chunks() {
    let mut engine = session(Features::empty());
    engine.process_input(b"ls\r").unwrap();
    engine.process_input(b"\n").unwrap();
    assert_eq!(engine.executor().joined(), ["ls"]);
}

// ═════════════════════════════════════════════════════════════════════════
// History
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn duplicate_lines_are_stored_once() {
    let mut engine = session(Features::empty());
    engine.process_input(b"ls\rls\rls\r").unwrap();
    assert_eq!(engine.history().record_count(), 1);
    assert_eq!(engine.executor().lines.len(), 3);
}

#[test]
fn history_walks_back_and_forth() {
    let mut engine = session(Features::empty());
    engine.process_input(b"a\rb\rc\r").unwrap();

    let mut seen = Vec::new();
    for _ in 0..3 {
        engine.process_input(b"\x1b[A").unwrap();
        seen.push(engine.line().as_bytes().to_vec());
    }
    assert_eq!(seen, [b"c".to_vec(), b"b".to_vec(), b"a".to_vec()]);

    seen.clear();
    for _ in 0..3 {
        engine.process_input(b"\x1b[B").unwrap();
        seen.push(engine.line().as_bytes().to_vec());
    }
    assert_eq!(seen, [b"b".to_vec(), b"c".to_vec(), Vec::new()]);
}

#[test]
fn recalled_line_can_be_edited_and_resubmitted() {
    let mut engine = session(Features::empty());
    engine.process_input(b"led on\r").unwrap();
    engine.process_input(b"\x1b[A").unwrap();
    engine.process_input(&[0x7F, 0x7F]).unwrap();
    engine.process_input(b"off\r").unwrap();
    assert_eq!(engine.executor().joined(), ["led|on", "led|off"]);
    assert_eq!(engine.history().record_count(), 2);
}

#[test]
fn recall_redraws_from_line_start() {
    let mut engine = session(Features::empty());
    engine.process_input(b"ab\r").unwrap();
    engine.output_mut().take();
    engine.process_input(&[0x10]).unwrap();
    assert_eq!(engine.output_mut().take(), "\r\x1b[2Cab\x1b[K");
}

#[test]
fn history_disabled_stores_nothing() {
    let mut engine: Session = Engine::new(
        Config::default().with_features(Features::ESCAPE_SEQUENCES),
        Screen::default(),
        Recorder::default(),
    );
    engine.process_input(b"ls\r\x1b[A").unwrap();
    assert!(engine.history().is_empty());
    assert!(engine.line().is_empty());
}

// ═════════════════════════════════════════════════════════════════════════
// Buffer limits
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn full_line_rejects_extra_bytes() {
    let mut engine = session(Features::empty());
    engine.process_input(b"123456789").unwrap();
    engine.process_input(b"0").unwrap();
    assert_eq!(engine.line().len(), 10);
    engine.output_mut().take();

    assert_eq!(engine.process_input(b"x"), Err(Error::LineFull));
    assert_eq!(engine.line().as_bytes(), b"1234567890");
    assert_eq!(engine.output_mut().take(), "");

    engine.process_input(b"\r").unwrap();
    assert_eq!(engine.executor().joined(), ["1234567890"]);
}

#[test]
fn first_error_is_reported_and_chunk_continues() {
    let mut engine = session(Features::empty());
    assert_eq!(engine.process_input(b"a b c d e\rok\r"), Err(Error::TooManyTokens));
    assert_eq!(engine.executor().joined(), ["ok"]);
}

#[test]
fn too_many_tokens_prints_error() {
    let mut engine = session(Features::empty());
    engine.process_input(b"1 2 3 4 5").unwrap();
    engine.output_mut().take();
    assert_eq!(engine.process_input(b"\n"), Err(Error::TooManyTokens));
    assert_eq!(engine.output_mut().take(), "\r\nERROR: too many tokens\r\n> ");
    assert!(engine.executor().lines.is_empty());
}

#[test]
fn token_limit_is_inclusive() {
    let mut engine = session(Features::empty());
    engine.process_input(b"1 2 3 4\r").unwrap();
    assert_eq!(engine.executor().joined(), ["1|2|3|4"]);
}

// ═════════════════════════════════════════════════════════════════════════
// Tokens
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn spaces_collapse() {
    let mut engine = session(Features::empty());
    engine.process_input(b"  a   b \r").unwrap();
    assert_eq!(engine.executor().joined(), ["a|b"]);
}

#[test]
fn quoting_groups_words() {
    let mut engine = session(Features::QUOTING);
    engine.process_input(b"say \"a b\"\r").unwrap();
    assert_eq!(engine.executor().joined(), ["say|a b"]);
}

#[test]
fn quotes_are_plain_text_without_quoting() {
    let mut engine = session(Features::empty());
    engine.process_input(b"say \"a b\"\r").unwrap();
    assert_eq!(engine.executor().joined(), ["say|\"a|b\""]);
}

// ═════════════════════════════════════════════════════════════════════════
// Completion
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn single_candidate_completes_with_space() {
    let mut engine = completing(Features::empty(), &["set", "help"]);
    engine.process_input(b"se\t").unwrap();
    assert_eq!(engine.line().as_bytes(), b"set ");
    assert_eq!(engine.line().cursor(), 4);
    assert_eq!(engine.output_mut().take(), "set \x1b[K");
}

#[test]
fn several_candidates_complete_common_part_and_list() {
    let mut engine = completing(Features::empty(), &["set", "setup", "help"]);
    engine.process_input(b"se").unwrap();
    engine.output_mut().take();
    engine.process_input(b"\t").unwrap();
    assert_eq!(engine.line().as_bytes(), b"set");
    assert_eq!(engine.output_mut().take(), "\r\nset setup \r\n> set\x1b[K");
}

#[test]
fn completion_is_deterministic() {
    let mut first = completing(Features::empty(), &["set", "setup"]);
    let mut second = completing(Features::empty(), &["set", "setup"]);
    first.process_input(b"se\t").unwrap();
    second.process_input(b"se\t").unwrap();
    assert_eq!(first.line(), second.line());
    assert_eq!(first.output_mut().take(), second.output_mut().take());
}

#[test]
fn completion_at_word_boundary_passes_empty_token() {
    let mut engine = completing(Features::empty(), &["on", "off"]);
    engine.process_input(b"led \t").unwrap();
    let seen = &engine.completer_mut().unwrap().seen;
    assert_eq!(seen, &[vec!["led".to_string(), String::new()]]);
    assert_eq!(engine.line().as_bytes(), b"led o");
}

#[test]
fn completion_inside_open_quote_keeps_partial() {
    let mut engine = completing(Features::QUOTING, &["b c"]);
    engine.process_input(b"a \"b \t").unwrap();
    let seen = &engine.completer_mut().unwrap().seen;
    assert_eq!(seen, &[vec!["a".to_string(), "b ".to_string()]]);
    assert_eq!(engine.line().as_bytes(), b"a \"b c ");
}

#[test]
fn completion_after_closed_quote_starts_new_word() {
    let mut engine = completing(Features::QUOTING, &["on"]);
    engine.process_input(b"a \"b\" \t").unwrap();
    let seen = &engine.completer_mut().unwrap().seen;
    assert_eq!(seen, &[vec!["a".to_string(), "b".to_string(), String::new()]]);
    assert_eq!(engine.line().as_bytes(), b"a \"b\" on ");
}

#[test]
fn completion_on_empty_line_lists_everything() {
    let mut engine = completing(Features::empty(), &["help", "clear"]);
    engine.process_input(b"\t").unwrap();
    let seen = &engine.completer_mut().unwrap().seen;
    assert_eq!(seen, &[vec![String::new()]]);
    assert_eq!(engine.output_mut().take(), "\r\nhelp clear \r\n> \x1b[K");
    assert!(engine.line().is_empty());
}

#[test]
fn completion_uses_text_before_cursor() {
    let mut engine = completing(Features::empty(), &["set"]);
    engine.process_input(b"se x\x02\x02").unwrap();
    engine.process_input(b"\t").unwrap();
    assert_eq!(engine.line().as_bytes(), b"set  x");
    assert_eq!(engine.line().cursor(), 4);
}

#[test]
fn no_candidates_is_a_completion_error() {
    let mut engine = completing(Features::empty(), &["set"]);
    assert_eq!(engine.process_input(b"zz\t"), Err(Error::Completion));
    assert_eq!(engine.line().as_bytes(), b"zz");
}

#[test]
fn completion_overflow_is_line_full() {
    let mut engine = completing(Features::empty(), &["abcdefghij"]);
    assert_eq!(engine.process_input(b"abcdef\t"), Err(Error::LineFull));
    assert_eq!(engine.line().as_bytes(), b"abcdefghij");
}

// ═════════════════════════════════════════════════════════════════════════
// Echo
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn echo_once_masks_the_password_line() {
    let mut engine = session(Features::ECHO_OFF);
    engine.process_input(b"login\r").unwrap();
    assert_eq!(engine.echo(), EchoMode::Once);
    assert_eq!(engine.prompt(), "password: ");
    engine.output_mut().take();

    engine.process_input(b"hunter2").unwrap();
    assert_eq!(engine.output_mut().take(), "*******");
    engine.process_input(b"\r").unwrap();

    assert_eq!(engine.echo(), EchoMode::On);
    assert_eq!(engine.executor().joined(), ["login", "hunter2"]);
    let stored: Vec<Vec<u8>> = engine
        .history()
        .records()
        .map(|r| r.bytes().collect())
        .collect();
    assert_eq!(stored, [b"login".to_vec()]);
}

#[test]
fn echo_once_survives_empty_submission() {
    let mut engine = session(Features::ECHO_OFF);
    engine.set_echo(EchoMode::Once).unwrap();
    engine.process_input(b"\r").unwrap();
    assert_eq!(engine.echo(), EchoMode::Once);
}

#[test]
fn login_requires_echo_feature() {
    let mut engine = session(Features::empty());
    engine.process_input(b"login\r").unwrap();
    assert_eq!(engine.echo(), EchoMode::On);
}

#[test]
fn custom_echo_mask() {
    let mut engine: Session = Engine::new(
        config(Features::ECHO_OFF).with_echo_mask(b'#'),
        Screen::default(),
        Recorder::default(),
    );
    engine.set_echo(EchoMode::Off).unwrap();
    engine.output_mut().take();
    engine.process_input(b"ab").unwrap();
    assert_eq!(engine.output_mut().take(), "##");
}

// ═════════════════════════════════════════════════════════════════════════
// Ctrl+C and hooks
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn ctrl_c_reaches_handler_and_keeps_line() {
    let mut engine: Session<NoCompleter, Interrupts> = Plain::new(
        config(Features::CTRL_C),
        Screen::default(),
        Recorder::default(),
    )
    .with_signal_handler(Interrupts::default());
    engine.process_input(b"ab\x03\x03").unwrap();
    assert_eq!(engine.signal_handler_mut().unwrap().0, 2);
    assert_eq!(engine.line().as_bytes(), b"ab");
}

#[test]
fn ctrl_c_is_ignored_when_disabled() {
    let mut engine = session(Features::empty());
    engine.process_input(b"ab\x03").unwrap();
    assert_eq!(engine.line().as_bytes(), b"ab");
}

#[test]
fn hooks_wrap_execution() {
    let mut engine = session(Features::EXEC_HOOKS);
    engine.process_input(b"fail now\r").unwrap();
    assert_eq!(engine.executor().hooks, ["before 2", "after 7"]);
    assert!(engine.output_mut().take().ends_with("status 7\r\n> "));
}

#[test]
fn hooks_do_not_run_when_disabled() {
    let mut engine = session(Features::empty());
    engine.process_input(b"fail\r").unwrap();
    assert!(engine.executor().hooks.is_empty());
}

// ═════════════════════════════════════════════════════════════════════════
// Rendering options
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn colored_prompt_on_init() {
    let engine: Session = Engine::new(Config::default(), Screen::default(), Recorder::default());
    assert_eq!(engine.output().0, b"\x1b[32m> \x1b[0m");
}

#[test]
fn no_prompt_on_init_when_disabled() {
    let engine: Session = Engine::new(
        Config::default().with_features(Features::HISTORY),
        Screen::default(),
        Recorder::default(),
    );
    assert!(engine.output().0.is_empty());
}

#[test]
fn custom_end_of_line() {
    let mut engine: Session = Engine::new(
        config(Features::empty()).with_end_of_line("\n"),
        Screen::default(),
        Recorder::default(),
    );
    engine.output_mut().take();
    engine.process_input(b"\r").unwrap();
    assert_eq!(engine.output_mut().take(), "\n> ");
}

#[test]
fn full_redraw_without_carriage_return_rewinds() {
    let mut engine: Session = Engine::new(
        Config::default()
            .with_prompt_color("")
            .with_features(Features::HISTORY | Features::ESCAPE_SEQUENCES),
        Screen::default(),
        Recorder::default(),
    );
    engine.process_input(b"ab\x02").unwrap();
    engine.output_mut().take();
    engine.process_input(&[0x15]).unwrap();
    // 10 line bytes + 2 prompt columns + 2 slack.
    assert_eq!(engine.output_mut().take(), "\x1b[14D\x1b[2Cb\x1b[K\x1b[1D");
    assert_eq!(engine.line().as_bytes(), b"b");
}
