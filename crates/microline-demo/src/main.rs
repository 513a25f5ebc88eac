#![forbid(unsafe_code)]

//! microline demo shell binary entry point.

use std::fs::OpenOptions;
use std::io::{self, Read, Stdout};
use std::path::Path;
use std::sync::Mutex;

use microline::{Config, Engine, Features, IoOutput, NoCompleter, NoSignal};
use microline_demo::cli;
use microline_demo::commands::{CommandCompleter, Interrupt, Shell};
use microline_demo::session::RawSession;
use tracing_subscriber::EnvFilter;

type BaseEngine = Engine<'static, IoOutput<Stdout>, Shell, NoCompleter, NoSignal>;

fn main() {
    let opts = cli::Opts::parse();

    if let Some(path) = opts.log.as_deref()
        && let Err(e) = init_logging(path)
    {
        eprintln!("Failed to open log file {}: {e}", path.display());
        std::process::exit(1);
    }

    if let Err(e) = run(opts.prompt) {
        eprintln!("Runtime error: {e}");
        std::process::exit(1);
    }
}

fn init_logging(path: &Path) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let filter = EnvFilter::try_from_env("MICROLINE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
    Ok(())
}

fn run(prompt: String) -> io::Result<()> {
    // Shared by the engine and the shell until exit.
    let prompt: &'static str = prompt.leak();

    let _session = RawSession::new()?;
    let config = Config::default()
        .with_prompt(prompt)
        .with_features(Features::all());
    let mut engine = BaseEngine::new(config, IoOutput::new(io::stdout()), Shell::new(prompt))
        .with_completer(CommandCompleter::default())
        .with_signal_handler(Interrupt::default());
    tracing::info!(version = microline::VERSION, "shell started");

    let mut stdin = io::stdin().lock();
    let mut buf = [0u8; 64];
    while !engine.executor().quit_requested() {
        let read = match stdin.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if let Err(e) = engine.process_input(&buf[..read]) {
            tracing::debug!(code = e.code(), error = %e, "input rejected");
        }
    }

    tracing::info!("shell stopped");
    Ok(())
}
