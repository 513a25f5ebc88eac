#![forbid(unsafe_code)]

//! Raw-mode terminal session guard.
//!
//! The engine wants every byte as it is typed, with no line discipline and
//! no local echo, so the demo puts the terminal in raw mode for its whole
//! lifetime. [`RawSession`] owns that state:
//!
//! 1. **Drop restores cooked mode**, on normal return and during unwinding.
//! 2. **Panic hook** restores the terminal before the panic message prints.
//! 3. **SIGINT / SIGTERM** (Unix) restore the terminal and exit with
//!    `128 + signal`. In raw mode Ctrl+C arrives as byte `0x03` instead, so
//!    these only fire when the signal comes from outside.

use std::io::{self, Write};
use std::sync::OnceLock;

#[cfg(unix)]
use signal_hook::consts::signal::{SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

/// Raw mode for as long as the value lives.
#[derive(Debug)]
pub struct RawSession {
    raw_enabled: bool,
    #[cfg(unix)]
    signal_guard: Option<SignalGuard>,
}

impl RawSession {
    /// Enter raw mode.
    ///
    /// # Errors
    ///
    /// Returns an error if raw mode cannot be enabled or the signal thread
    /// cannot be started.
    pub fn new() -> io::Result<Self> {
        install_panic_hook();

        crossterm::terminal::enable_raw_mode()?;
        tracing::info!("terminal raw mode enabled");

        Ok(Self {
            raw_enabled: true,
            #[cfg(unix)]
            signal_guard: Some(SignalGuard::new()?),
        })
    }

    fn cleanup(&mut self) {
        #[cfg(unix)]
        let _ = self.signal_guard.take();

        if self.raw_enabled {
            let _ = crossterm::terminal::disable_raw_mode();
            self.raw_enabled = false;
            tracing::info!("terminal raw mode disabled");
        }
        let _ = io::stdout().flush();
    }
}

impl Drop for RawSession {
    fn drop(&mut self) {
        self.cleanup();
    }
}

fn install_panic_hook() {
    static HOOK: OnceLock<()> = OnceLock::new();
    HOOK.get_or_init(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            best_effort_cleanup();
            previous(info);
        }));
    });
}

fn best_effort_cleanup() {
    let _ = crossterm::terminal::disable_raw_mode();
    let mut stdout = io::stdout();
    let _ = stdout.write_all(b"\r\n");
    let _ = stdout.flush();
}

#[cfg(unix)]
#[derive(Debug)]
struct SignalGuard {
    handle: signal_hook::iterator::Handle,
    thread: Option<std::thread::JoinHandle<()>>,
}

#[cfg(unix)]
impl SignalGuard {
    fn new() -> io::Result<Self> {
        let mut signals = Signals::new([SIGINT, SIGTERM]).map_err(io::Error::other)?;
        let handle = signals.handle();
        let thread = std::thread::spawn(move || {
            for signal in signals.forever() {
                if matches!(signal, SIGINT | SIGTERM) {
                    tracing::warn!(signal, "termination signal received, cleaning up");
                    best_effort_cleanup();
                    std::process::exit(128 + signal);
                }
            }
        });
        Ok(Self {
            handle,
            thread: Some(thread),
        })
    }
}

#[cfg(unix)]
impl Drop for SignalGuard {
    fn drop(&mut self) {
        self.handle.close();
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}
