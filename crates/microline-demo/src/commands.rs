#![forbid(unsafe_code)]

//! The demo shell: command vocabulary, completion and Ctrl+C handling.
//!
//! | Command | Effect |
//! |---------|--------|
//! | `help` | Usage |
//! | `clear` | Clear the screen |
//! | `list` | List commands |
//! | `name [value]` | Show or set a short name |
//! | `version {microline\|demo}` | Print a version |
//! | `lisp` | Placeholder that shares a prefix with `list` |
//! | `login` | Password prompt with masked echo |
//! | `quit` | Leave the shell |

use microline::{Completer, Console, EchoMode, Executor, SignalHandler};

/// Commands offered on the first word.
pub const COMMANDS: &[&str] = &[
    "help", "clear", "list", "name", "version", "lisp", "login", "quit",
];

/// Targets of the `version` command.
pub const VERSION_TARGETS: &[&str] = &["microline", "demo"];

/// Names must be shorter than this many bytes.
pub const NAME_LEN: usize = 8;

const PASSWORD: &str = "microline";
const PASSWORD_PROMPT: &str = "password: ";

/// Command completed normally.
pub const STATUS_OK: i32 = 0;
/// Command name not recognized, or login refused.
pub const STATUS_UNKNOWN: i32 = 1;
/// Bad or missing argument.
pub const STATUS_USAGE: i32 = 2;

fn say(console: &mut Console<'_, '_>, text: &str) {
    console.print(text);
    console.newline();
}

/// Executes demo commands.
#[derive(Debug)]
pub struct Shell {
    prompt: &'static str,
    name: String,
    awaiting_password: bool,
    logged_in: bool,
    quit: bool,
}

impl Shell {
    /// Create a shell that restores `prompt` after a password prompt.
    #[must_use]
    pub fn new(prompt: &'static str) -> Self {
        Self {
            prompt,
            name: String::new(),
            awaiting_password: false,
            logged_in: false,
            quit: false,
        }
    }

    /// Whether `quit` was entered.
    #[must_use]
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Current name set with `name`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether the last login succeeded.
    #[must_use]
    pub fn logged_in(&self) -> bool {
        self.logged_in
    }

    fn help(console: &mut Console<'_, '_>) -> i32 {
        say(console, "microline demo shell");
        say(console, "Use TAB key for completion");
        say(console, "Commands:");
        say(console, "\tversion {microline | demo} - print a version");
        say(console, "\thelp  - this message");
        say(console, "\tclear - clear screen");
        say(console, "\tlist  - list all commands");
        say(console, "\tname [string] - print the name, or set it to 'string'");
        say(console, "\tlisp  - dummy command to try 'l' + TAB");
        say(console, "\tlogin - enter a password without echo");
        say(console, "\tquit  - leave the shell");
        STATUS_OK
    }

    fn list(console: &mut Console<'_, '_>) -> i32 {
        say(console, "available commands:");
        for command in COMMANDS {
            console.print("\t");
            say(console, command);
        }
        STATUS_OK
    }

    fn name_command(&mut self, console: &mut Console<'_, '_>, value: Option<&str>) -> i32 {
        match value {
            None => {
                say(console, &self.name);
                STATUS_OK
            }
            Some(value) if value.len() < NAME_LEN => {
                self.name = value.to_string();
                STATUS_OK
            }
            Some(_) => {
                say(console, "name value too long!");
                STATUS_USAGE
            }
        }
    }

    fn version(console: &mut Console<'_, '_>, target: Option<&str>) -> i32 {
        match target {
            Some("microline") => {
                console.print("microline v");
                say(console, microline::VERSION);
                STATUS_OK
            }
            Some("demo") => {
                console.print("demo v");
                say(console, env!("CARGO_PKG_VERSION"));
                STATUS_OK
            }
            Some(other) => {
                console.print(other);
                say(console, " wrong argument, see help");
                STATUS_USAGE
            }
            None => {
                say(console, "version needs 1 parameter, see help");
                STATUS_USAGE
            }
        }
    }

    fn login(&mut self, console: &mut Console<'_, '_>) -> i32 {
        if !console.set_echo(EchoMode::Once) {
            say(console, "echo masking is not available");
            return STATUS_UNKNOWN;
        }
        console.set_prompt(PASSWORD_PROMPT);
        self.awaiting_password = true;
        STATUS_OK
    }

    fn check_password(&mut self, console: &mut Console<'_, '_>, tokens: &[&str]) -> i32 {
        self.awaiting_password = false;
        console.set_prompt(self.prompt);
        self.logged_in = tokens == [PASSWORD];
        tracing::info!(granted = self.logged_in, "login attempt");
        if self.logged_in {
            say(console, "access granted");
            STATUS_OK
        } else {
            say(console, "access denied");
            STATUS_UNKNOWN
        }
    }
}

impl Executor for Shell {
    fn execute(&mut self, console: &mut Console<'_, '_>, tokens: &[&str]) -> i32 {
        if self.awaiting_password {
            return self.check_password(console, tokens);
        }
        match tokens {
            ["help", ..] => Self::help(console),
            ["clear", ..] => {
                console.clear_screen();
                STATUS_OK
            }
            ["list", ..] => Self::list(console),
            ["name"] => self.name_command(console, None),
            ["name", value, ..] => self.name_command(console, Some(*value)),
            ["version"] => Self::version(console, None),
            ["version", target, ..] => Self::version(console, Some(*target)),
            ["lisp", ..] => {
                say(console, "lisp: nothing to evaluate");
                STATUS_OK
            }
            ["login", ..] => self.login(console),
            ["quit", ..] => {
                say(console, "bye");
                self.quit = true;
                STATUS_OK
            }
            [command, ..] => {
                console.print("command: '");
                console.print(command);
                say(console, "' not found");
                STATUS_UNKNOWN
            }
            [] => STATUS_OK,
        }
    }

    fn before_execute(&mut self, tokens: &[&str]) {
        if !self.awaiting_password {
            tracing::debug!(command = tokens.first().copied().unwrap_or(""), "executing");
        }
    }

    fn after_execute(&mut self, console: &mut Console<'_, '_>, status: i32, _tokens: &[&str]) {
        if status != STATUS_OK {
            console.print("status ");
            say(console, &status.to_string());
        }
    }
}

/// Completes command names and `version` targets.
#[derive(Debug, Default)]
pub struct CommandCompleter {
    matches: Vec<&'static str>,
}

impl Completer for CommandCompleter {
    fn complete<'a>(&'a mut self, tokens: &[&str]) -> &'a [&'a str] {
        let vocabulary: &[&'static str] = match tokens {
            [_] => COMMANDS,
            ["version", _] => VERSION_TARGETS,
            _ => &[],
        };
        let partial = tokens.last().copied().unwrap_or("");
        self.matches.clear();
        self.matches
            .extend(vocabulary.iter().copied().filter(|word| word.starts_with(partial)));
        &self.matches
    }
}

/// Reports Ctrl+C.
#[derive(Debug, Default)]
pub struct Interrupt {
    count: usize,
}

impl Interrupt {
    /// How many times Ctrl+C was pressed.
    #[must_use]
    pub fn count(&self) -> usize {
        self.count
    }
}

impl SignalHandler for Interrupt {
    fn interrupt(&mut self, console: &mut Console<'_, '_>) {
        self.count += 1;
        console.newline();
        say(console, "^C is caught! (type 'quit' to leave)");
        let prompt = console.prompt();
        console.print(prompt);
    }
}
