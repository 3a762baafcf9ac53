use crate::error::ShellError;
use crate::exit::ExitRequester;
use crate::history::HistoryLog;
use crate::state::ShellState;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

/// A command implemented directly by the shell.
///
/// Builtins execute in-process against the shared [`ShellState`] and the
/// dispatcher's output sink. They receive already-split argument tokens;
/// errors are returned to the caller, never printed by the builtin itself.
pub trait Builtin {
    /// Canonical name of the command, e.g. "echo" or "cd".
    fn name(&self) -> &'static str;

    /// Execute the command with the given argument tokens.
    fn run(
        &self,
        args: &[&str],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<(), ShellError>;
}

/// Write the arguments to the output sink, separated by single spaces,
/// followed by a newline.
pub struct Echo;

impl Builtin for Echo {
    fn name(&self) -> &'static str {
        "echo"
    }

    fn run(
        &self,
        args: &[&str],
        _state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<(), ShellError> {
        writeln!(out, "{}", args.join(" ")).map_err(ShellError::output)
    }
}

/// Request termination of the run loop.
///
/// Sends one signal on the exit conduit and returns; the run loop, not
/// this builtin, actually stops iterating.
pub struct Exit {
    requester: ExitRequester,
}

impl Exit {
    pub fn new(requester: ExitRequester) -> Self {
        Self { requester }
    }
}

impl Builtin for Exit {
    fn name(&self) -> &'static str {
        "exit"
    }

    fn run(
        &self,
        _args: &[&str],
        _state: &mut ShellState,
        _out: &mut dyn Write,
    ) -> Result<(), ShellError> {
        self.requester.request();
        Ok(())
    }
}

/// Change the working directory, for this process and for every command
/// dispatched afterwards. With no argument, changes to `$HOME`.
pub struct ChangeDir;

impl Builtin for ChangeDir {
    fn name(&self) -> &'static str {
        "cd"
    }

    fn run(
        &self,
        args: &[&str],
        state: &mut ShellState,
        _out: &mut dyn Write,
    ) -> Result<(), ShellError> {
        let target = match args.first() {
            Some(path) if !path.is_empty() => PathBuf::from(path),
            _ => match state.get_var("HOME") {
                Some(home) => PathBuf::from(home),
                None => {
                    return Err(ShellError::DirectoryChange {
                        path: "~".to_string(),
                        source: std::io::Error::new(
                            std::io::ErrorKind::NotFound,
                            "no target and HOME not set",
                        ),
                    });
                }
            },
        };

        let requested = if target.is_absolute() {
            target
        } else {
            state.current_dir.join(target)
        };

        let change = |path: &PathBuf| -> std::io::Result<PathBuf> {
            let canonical = fs::canonicalize(path)?;
            env::set_current_dir(&canonical)?;
            Ok(canonical)
        };

        match change(&requested) {
            Ok(canonical) => {
                state.current_dir = canonical;
                Ok(())
            }
            Err(source) => Err(ShellError::DirectoryChange {
                path: requested.display().to_string(),
                source,
            }),
        }
    }
}

/// Print the current working directory.
pub struct Pwd;

impl Builtin for Pwd {
    fn name(&self) -> &'static str {
        "pwd"
    }

    fn run(
        &self,
        _args: &[&str],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<(), ShellError> {
        writeln!(out, "{}", state.current_dir.display()).map_err(ShellError::output)
    }
}

/// Print the environment variables, one `KEY=VALUE` per line.
pub struct EnvList;

impl Builtin for EnvList {
    fn name(&self) -> &'static str {
        "env"
    }

    fn run(
        &self,
        _args: &[&str],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<(), ShellError> {
        let mut keys: Vec<&String> = state.vars.keys().collect();
        keys.sort();
        for key in keys {
            writeln!(out, "{}={}", key, state.vars[key]).map_err(ShellError::output)?;
        }
        Ok(())
    }
}

/// Print every previously recorded command, oldest first.
pub struct History {
    log: HistoryLog,
}

impl History {
    pub fn new(log: HistoryLog) -> Self {
        Self { log }
    }
}

impl Builtin for History {
    fn name(&self) -> &'static str {
        "history"
    }

    fn run(
        &self,
        _args: &[&str],
        _state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<(), ShellError> {
        let entries = self
            .log
            .list_all()
            .map_err(|source| ShellError::History { source })?;
        for entry in entries {
            writeln!(out, "{entry}").map_err(ShellError::output)?;
        }
        Ok(())
    }
}

/// A command the shell recognizes but intentionally does not implement
/// (`help`, `source`). Always errors, never writes output.
pub struct Unsupported {
    name: &'static str,
}

impl Unsupported {
    pub fn new(name: &'static str) -> Self {
        Self { name }
    }
}

impl Builtin for Unsupported {
    fn name(&self) -> &'static str {
        self.name
    }

    fn run(
        &self,
        _args: &[&str],
        _state: &mut ShellState,
        _out: &mut dyn Write,
    ) -> Result<(), ShellError> {
        Err(ShellError::Unsupported {
            name: self.name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exit::conduit;
    use crate::testing::lock_current_dir;
    use std::collections::HashMap;
    use std::env as stdenv;

    fn test_state() -> ShellState {
        ShellState {
            vars: HashMap::new(),
            current_dir: stdenv::current_dir().unwrap(),
        }
    }

    #[test]
    fn test_echo_joins_args_with_newline() {
        let mut out = Vec::new();
        Echo.run(&["hello", "world"], &mut test_state(), &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hello world\n");
    }

    #[test]
    fn test_echo_without_args_prints_empty_line() {
        let mut out = Vec::new();
        Echo.run(&[], &mut test_state(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "\n");
    }

    #[test]
    fn test_exit_sends_exactly_one_signal() {
        let (requester, mut listener) = conduit();
        let mut out = Vec::new();
        Exit::new(requester)
            .run(&[], &mut test_state(), &mut out)
            .unwrap();
        assert!(out.is_empty());
        assert!(listener.is_requested());
    }

    #[test]
    fn test_pwd_prints_state_dir() {
        let mut state = test_state();
        let mut out = Vec::new();
        Pwd.run(&[], &mut state, &mut out).unwrap();
        let expected = format!("{}\n", state.current_dir.display());
        assert_eq!(String::from_utf8(out).unwrap(), expected);
    }

    #[test]
    fn test_env_lists_vars_one_per_line() {
        let mut state = test_state();
        state.set_var("AAA", "1");
        state.set_var("BBB", "2");
        let mut out = Vec::new();
        EnvList.run(&[], &mut state, &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "AAA=1\nBBB=2\n");
    }

    #[test]
    fn test_history_lists_recorded_commands_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let log = HistoryLog::new(dir.path().join("history"));
        log.append("echo one").unwrap();
        log.append("pwd").unwrap();

        let mut out = Vec::new();
        History::new(log)
            .run(&[], &mut test_state(), &mut out)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "echo one\npwd\n");
    }

    #[test]
    fn test_unsupported_errors_without_output() {
        for name in ["help", "source"] {
            let mut out = Vec::new();
            let err = Unsupported::new(name)
                .run(&["anything"], &mut test_state(), &mut out)
                .unwrap_err();
            assert!(matches!(err, ShellError::Unsupported { .. }));
            assert!(out.is_empty());
        }
    }

    #[test]
    fn test_cd_to_parent_then_pwd_reflects_change() {
        let _lock = lock_current_dir();
        let orig = stdenv::current_dir().unwrap();
        let mut state = test_state();

        let mut out = Vec::new();
        ChangeDir.run(&[".."], &mut state, &mut out).unwrap();
        assert!(out.is_empty());

        let mut out = Vec::new();
        Pwd.run(&[], &mut state, &mut out).unwrap();
        let expected = format!("{}\n", fs::canonicalize(orig.join("..")).unwrap().display());
        assert_eq!(String::from_utf8(out).unwrap(), expected);

        stdenv::set_current_dir(orig).unwrap();
    }

    #[test]
    fn test_cd_nonexistent_path_errors_and_keeps_state() {
        let _lock = lock_current_dir();
        let orig = stdenv::current_dir().unwrap();
        let mut state = test_state();

        let name = format!("nonexistent_dir_for_cd_test_{}", std::process::id());
        let err = ChangeDir
            .run(&[name.as_str()], &mut state, &mut Vec::new())
            .unwrap_err();

        assert!(matches!(err, ShellError::DirectoryChange { .. }));
        assert_eq!(state.current_dir, orig);
        assert_eq!(stdenv::current_dir().unwrap(), orig);
    }

    #[test]
    fn test_cd_to_home_when_no_target() {
        let _lock = lock_current_dir();
        let dir = tempfile::tempdir().unwrap();
        let home = fs::canonicalize(dir.path()).unwrap();
        let orig = stdenv::current_dir().unwrap();

        let mut state = test_state();
        state.set_var("HOME", home.display().to_string());

        ChangeDir.run(&[], &mut state, &mut Vec::new()).unwrap();
        assert_eq!(state.current_dir, home);

        stdenv::set_current_dir(orig).unwrap();
    }
}
