//! Durable command history.
//!
//! Every dispatched command line is appended to an append-only text file,
//! one entry per line, oldest first. The file name is resolved against the
//! process working directory at the time of each call, so history is local
//! to the directory the shell is operating in rather than to the process.

use std::env as stdenv;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;

/// Default history file name, created in the current working directory.
pub const DEFAULT_HISTORY_FILE: &str = ".rush_history";

/// What the dispatcher does when a history append fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HistoryPolicy {
    /// A failed append fails the dispatched command.
    Strict,
    /// A failed append is logged and the command proceeds.
    #[default]
    Lenient,
}

/// Handle to the append-only history log.
#[derive(Debug, Clone)]
pub struct HistoryLog {
    file_name: PathBuf,
}

impl HistoryLog {
    /// Create a handle for the given file name. A relative name is resolved
    /// against the current working directory on every call; an absolute
    /// path is used as-is.
    pub fn new(file_name: impl Into<PathBuf>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    fn path(&self) -> io::Result<PathBuf> {
        if self.file_name.is_absolute() {
            Ok(self.file_name.clone())
        } else {
            Ok(stdenv::current_dir()?.join(&self.file_name))
        }
    }

    /// Append one command string to the log.
    pub fn append(&self, command: &str) -> io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path()?)?;
        writeln!(file, "{command}")
    }

    /// List every recorded command, oldest first. A log that does not
    /// exist yet lists as empty.
    pub fn list_all(&self) -> io::Result<Vec<String>> {
        match fs::read_to_string(self.path()?) {
            Ok(contents) => Ok(contents.lines().map(str::to_owned).collect()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_FILE)
    }
}
