//! The read–dispatch–execute loop.
//!
//! Each iteration polls the exit conduit, reads one line (the only step
//! allowed to block), and hands it to the dispatcher. A dispatch error is
//! reported on the error sink and the loop continues; a read failure —
//! including end of input — is reported and terminates the loop.

use crate::dispatch::Dispatcher;
use crate::error::ShellError;
use crate::exit::ExitListener;
use crate::state::ShellState;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, BufRead, Write};
use tracing::debug;

/// A source of input lines for the run loop.
///
/// `read_line` may block until a line is available; any failure, including
/// end of input, is a [`ShellError::Read`] and terminal for the loop.
pub trait LineSource {
    fn read_line(&mut self) -> Result<String, ShellError>;
}

/// Line source over any buffered reader (a file, a pipe, an in-memory
/// buffer in tests).
pub struct StreamSource<R> {
    inner: R,
}

impl<R: BufRead> StreamSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl<R: BufRead> LineSource for StreamSource<R> {
    fn read_line(&mut self) -> Result<String, ShellError> {
        let mut line = String::new();
        match self.inner.read_line(&mut line) {
            Ok(0) => Err(ShellError::read(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "end of input stream",
            ))),
            Ok(_) => Ok(line),
            Err(source) => Err(ShellError::read(source)),
        }
    }
}

/// Interactive line source backed by rustyline: prompt, line editing, and
/// in-session history recall.
pub struct PromptSource {
    editor: DefaultEditor,
    prompt: String,
}

impl PromptSource {
    pub fn new(prompt: impl Into<String>) -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            prompt: prompt.into(),
        })
    }
}

impl LineSource for PromptSource {
    fn read_line(&mut self) -> Result<String, ShellError> {
        match self.editor.readline(&self.prompt) {
            Ok(line) => {
                let _ = self.editor.add_history_entry(line.as_str());
                Ok(line)
            }
            Err(ReadlineError::Eof) => Err(ShellError::read(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "end of input",
            ))),
            Err(ReadlineError::Interrupted) => Err(ShellError::read(io::Error::new(
                io::ErrorKind::Interrupted,
                "interrupted",
            ))),
            Err(e) => Err(ShellError::read(io::Error::new(
                io::ErrorKind::Other,
                e.to_string(),
            ))),
        }
    }
}

/// Why the run loop stopped. These are the only two ways out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// A signal arrived on the exit conduit.
    ExitRequested,
    /// The input stream failed or ended.
    ReadFailed,
}

/// Drive read → dispatch until an exit signal or a read failure.
///
/// The exit conduit is polled before every read, so a signal sent by the
/// `exit` builtin is observed at the top of the next iteration without
/// touching the input stream again. Dispatch errors go to the error sink
/// and do not stop the loop.
pub fn run_loop<S: LineSource>(
    source: &mut S,
    out: &mut dyn Write,
    err: &mut dyn Write,
    exit: &mut ExitListener,
    dispatcher: &Dispatcher,
    state: &mut ShellState,
) -> LoopExit {
    loop {
        if exit.is_requested() {
            debug!("exit requested, terminating loop");
            return LoopExit::ExitRequested;
        }

        let line = match source.read_line() {
            Ok(line) => line,
            Err(e) => {
                let _ = writeln!(err, "{e}");
                return LoopExit::ReadFailed;
            }
        };

        if let Err(e) = dispatcher.dispatch(state, &line, out, err) {
            let _ = writeln!(err, "{e}");
        }
    }
}
