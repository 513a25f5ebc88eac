#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo shell.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Supports environment variable overrides via `MICROLINE_DEMO_*` prefix.

use std::env;
use std::path::PathBuf;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
microline demo shell

USAGE:
    microline-demo [OPTIONS]

OPTIONS:
    --prompt=TEXT        Prompt text (default: 'microline> ')
    --log=PATH           Append log output to PATH (filtered by MICROLINE_LOG)
    --help, -h           Show this help message
    --version, -V        Show version

KEYS:
    Tab                  Complete commands and 'version' targets
    Up / Down, Ctrl+P/N  Walk the history
    Ctrl+A / Ctrl+E      Start / end of line
    Ctrl+U / Ctrl+K      Kill before / after the cursor
    Ctrl+C               Interrupt (type 'quit' to leave)

ENVIRONMENT VARIABLES:
    MICROLINE_DEMO_PROMPT     Override --prompt
    MICROLINE_DEMO_LOG        Override --log
    MICROLINE_LOG             Log filter, e.g. 'microline=trace'";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Prompt text.
    pub prompt: String,
    /// Log file, if logging is wanted.
    pub log: Option<PathBuf>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            prompt: "microline> ".into(),
            log: None,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Invocation {
    /// Start the shell.
    Run(Opts),
    /// Print usage and exit.
    Help,
    /// Print the version and exit.
    Version,
}

impl Opts {
    /// Parse command-line arguments and environment variables, exiting the
    /// process for `--help`, `--version` and invalid input.
    pub fn parse() -> Self {
        match parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Invocation::Run(opts)) => opts,
            Ok(Invocation::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Invocation::Version) => {
                println!("microline-demo {VERSION} (microline {})", microline::VERSION);
                process::exit(0);
            }
            Err(message) => {
                eprintln!("{message}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }
}

/// Parse `args` with environment lookups through `var`.
///
/// Environment variables take precedence over defaults but are overridden
/// by explicit command-line flags.
///
/// # Errors
///
/// Returns a user-facing message for unknown or malformed arguments.
pub fn parse_from<I, F>(args: I, var: F) -> Result<Invocation, String>
where
    I: IntoIterator<Item = String>,
    F: Fn(&str) -> Option<String>,
{
    let mut opts = Opts::default();

    if let Some(val) = var("MICROLINE_DEMO_PROMPT") {
        opts.prompt = val;
    }
    if let Some(val) = var("MICROLINE_DEMO_LOG")
        && !val.is_empty()
    {
        opts.log = Some(PathBuf::from(val));
    }

    for arg in args {
        match arg.as_str() {
            "--help" | "-h" => return Ok(Invocation::Help),
            "--version" | "-V" => return Ok(Invocation::Version),
            other => {
                if let Some(val) = other.strip_prefix("--prompt=") {
                    opts.prompt = val.to_string();
                } else if let Some(val) = other.strip_prefix("--log=") {
                    if val.is_empty() {
                        return Err("Invalid --log value: empty path".into());
                    }
                    opts.log = Some(PathBuf::from(val));
                } else {
                    return Err(format!("Unknown argument: {other}"));
                }
            }
        }
    }

    Ok(Invocation::Run(opts))
}
