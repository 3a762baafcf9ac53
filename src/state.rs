use std::collections::HashMap;
use std::env as stdenv;
use std::path::PathBuf;

/// Mutable, user-level view of the process environment shared by every
/// dispatched command.
///
/// The state contains:
/// - `vars`: a map of environment variables visible to executed commands.
/// - `current_dir`: the working directory for command execution.
///
/// `cd` mutates `current_dir` (and the process working directory with it);
/// all subsequent commands, including external spawns, observe the new
/// value. There is no rollback on error.
#[derive(Debug, Clone)]
pub struct ShellState {
    /// Key-value store of environment variables (e.g., PATH, HOME).
    pub vars: HashMap<String, String>,
    /// The current working directory for command execution.
    pub current_dir: PathBuf,
}

impl ShellState {
    /// Capture the current process state into a new `ShellState` instance.
    ///
    /// Copies variables from `std::env::vars()` and initializes
    /// `current_dir` from `std::env::current_dir()`.
    pub fn new() -> Self {
        let mut vars = HashMap::new();
        for (k, v) in stdenv::vars() {
            vars.insert(k, v);
        }
        let current_dir = stdenv::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self { vars, current_dir }
    }

    /// Get the value of an environment variable.
    ///
    /// Looks up the key in `self.vars` first, falling back to `std::env::var`.
    pub fn get_var(&self, key: &str) -> Option<String> {
        self.vars
            .get(key)
            .cloned()
            .or_else(|| stdenv::var(key).ok())
    }

    /// Set or override an environment variable in `self.vars`.
    pub fn set_var(&mut self, key: impl Into<String>, val: impl Into<String>) {
        self.vars.insert(key.into(), val.into());
    }
}

impl Default for ShellState {
    fn default() -> Self {
        Self::new()
    }
}
