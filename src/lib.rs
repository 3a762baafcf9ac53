//! A tiny interactive command interpreter.
//!
//! This crate provides the building blocks of a minimal shell: a run loop
//! that reads one line at a time and races each read against an
//! asynchronous exit request, a dispatcher that maps lines to builtin
//! commands or external-process invocations, and a durable, directory-local
//! command history. It is intentionally small and easy to read.
//!
//! The core pieces are [`run_loop`] and [`Dispatcher`]; the [`builtin`]
//! module holds the closed set of builtin commands, and [`exit::conduit`]
//! produces the signaling pair that lets the `exit` builtin stop the loop
//! without interrupting a blocked read mid-flight.

pub mod builtin;
mod dispatch;
mod error;
pub mod exit;
mod external;
mod history;
mod runloop;
mod state;

pub use dispatch::Dispatcher;
pub use error::ShellError;
pub use history::{DEFAULT_HISTORY_FILE, HistoryLog, HistoryPolicy};
pub use runloop::{LineSource, LoopExit, PromptSource, StreamSource, run_loop};
pub use state::ShellState;

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::{Mutex, MutexGuard, OnceLock};

    /// Tests that change the process working directory must hold this; the
    /// working directory is process-global and the test harness runs
    /// threads in parallel.
    pub fn lock_current_dir() -> MutexGuard<'static, ()> {
        static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
        MUTEX
            .get_or_init(|| Mutex::new(()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
