use std::io;
use thiserror::Error;

/// Errors produced by the run loop and the command dispatcher.
///
/// Only [`ShellError::Read`] terminates the run loop; every other variant is
/// reported on the error sink and the loop keeps going.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The input stream failed or reached its end.
    #[error("read error: {source}")]
    Read {
        #[source]
        source: io::Error,
    },

    /// `cd` was given a path that does not exist or is not a directory.
    #[error("cd: {path}: {source}")]
    DirectoryChange {
        path: String,
        #[source]
        source: io::Error,
    },

    /// A recognized command that the shell intentionally does not implement.
    #[error("{name}: unsupported command")]
    Unsupported { name: String },

    /// An external program could not be located or spawned.
    #[error("{name}: failed to execute: {source}")]
    ProcessSpawn {
        name: String,
        #[source]
        source: io::Error,
    },

    /// An external program ran but finished with a non-zero status.
    #[error("{name}: exited with code {code}")]
    ProcessFailed { name: String, code: i32 },

    /// Recording a command in the history log failed (strict policy only).
    #[error("history: {source}")]
    History {
        #[source]
        source: io::Error,
    },

    /// Writing to the output or error sink failed.
    #[error("write error: {source}")]
    Output {
        #[source]
        source: io::Error,
    },
}

impl ShellError {
    pub(crate) fn read(source: io::Error) -> Self {
        ShellError::Read { source }
    }

    pub(crate) fn output(source: io::Error) -> Self {
        ShellError::Output { source }
    }
}
