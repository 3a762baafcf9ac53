//! External-process invocation.
//!
//! Anything that is not a builtin is resolved against PATH and spawned as
//! a child process with the shell's working directory and variables. The
//! child's stdout and stderr are captured and copied to the shell's sinks
//! once the child completes, so a command's output never interleaves with
//! the next line read.

use crate::error::ShellError;
use crate::state::ShellState;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus, Stdio};

/// Spawn `name` with `args`, wait for completion, and copy its output to
/// the sinks.
///
/// Failure to locate or start the program yields
/// [`ShellError::ProcessSpawn`]; a non-zero exit yields
/// [`ShellError::ProcessFailed`] with the child's status code.
pub fn run(
    name: &str,
    args: &[&str],
    state: &ShellState,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<(), ShellError> {
    let program = resolve_program(state, Path::new(name)).ok_or_else(|| {
        ShellError::ProcessSpawn {
            name: name.to_string(),
            source: io::Error::new(io::ErrorKind::NotFound, "command not found"),
        }
    })?;

    let output = Command::new(&program)
        .args(args)
        .envs(&state.vars)
        .current_dir(&state.current_dir)
        .stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|source| ShellError::ProcessSpawn {
            name: name.to_string(),
            source,
        })?;

    out.write_all(&output.stdout).map_err(ShellError::output)?;
    err.write_all(&output.stderr).map_err(ShellError::output)?;

    if output.status.success() {
        Ok(())
    } else {
        Err(ShellError::ProcessFailed {
            name: name.to_string(),
            code: status_code(output.status),
        })
    }
}

#[cfg(unix)]
fn status_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    match status.code() {
        Some(code) => code,
        None => match ExitStatusExt::signal(&status) {
            Some(signal) => 128 + signal,
            None => -1,
        },
    }
}

#[cfg(not(unix))]
fn status_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

/// Resolve a program path the way a typical shell would.
///
/// - Absolute path: returned if it exists.
/// - A path with separators (e.g. `bin/tool`, `./tool`): resolved against
///   the shell's working directory and returned if it exists.
/// - A bare name: searched for in each directory of the state's PATH, first
///   match wins.
fn resolve_program(state: &ShellState, path: &Path) -> Option<PathBuf> {
    if path.is_absolute() {
        return path.exists().then(|| path.to_path_buf());
    }

    if path.components().count() > 1 {
        let candidate = state.current_dir.join(path);
        return candidate.exists().then_some(candidate);
    }

    let search_paths = state.get_var("PATH")?;
    for dir in std::env::split_paths(&search_paths) {
        let candidate = dir.join(path);
        if candidate.exists() {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ShellState;

    #[test]
    #[cfg(unix)]
    fn test_resolve_absolute_existing() {
        let state = ShellState::new();
        let found = resolve_program(&state, Path::new("/bin/sh")).unwrap();
        assert_eq!(found, PathBuf::from("/bin/sh"));
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_absolute_nonexisting() {
        let state = ShellState::new();
        assert!(resolve_program(&state, Path::new("/bin/nonexisting")).is_none());
    }

    #[test]
    #[cfg(unix)]
    fn test_resolve_bare_name_via_path() {
        let mut state = ShellState::new();
        state.set_var("PATH", "/bin:/usr/bin");
        let found = resolve_program(&state, Path::new("sh")).unwrap();
        assert!(found.ends_with("sh"));
    }

    #[test]
    fn test_resolve_unknown_name_is_none() {
        let mut state = ShellState::new();
        state.set_var("PATH", "/bin:/usr/bin");
        assert!(resolve_program(&state, Path::new("some-nonexistent-command-xyz")).is_none());
    }

    #[test]
    #[cfg(unix)]
    fn test_run_copies_child_stdout_to_sink() {
        let state = ShellState::new();
        let mut out = Vec::new();
        let mut err = Vec::new();
        run("sh", &["-c", "printf hi"], &state, &mut out, &mut err).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "hi");
        assert!(err.is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_run_copies_child_stderr_to_error_sink() {
        let state = ShellState::new();
        let mut out = Vec::new();
        let mut err = Vec::new();
        run("sh", &["-c", "printf oops >&2"], &state, &mut out, &mut err).unwrap();
        assert!(out.is_empty());
        assert_eq!(String::from_utf8(err).unwrap(), "oops");
    }

    #[test]
    #[cfg(unix)]
    fn test_run_nonzero_exit_reports_code() {
        let state = ShellState::new();
        let result = run(
            "sh",
            &["-c", "exit 3"],
            &state,
            &mut Vec::new(),
            &mut Vec::new(),
        );
        match result {
            Err(ShellError::ProcessFailed { code, .. }) => assert_eq!(code, 3),
            other => panic!("expected ProcessFailed, got {other:?}"),
        }
    }

    #[test]
    fn test_run_unknown_command_is_spawn_error() {
        let state = ShellState::new();
        let result = run(
            "some-nonexistent-command-xyz",
            &[],
            &state,
            &mut Vec::new(),
            &mut Vec::new(),
        );
        assert!(matches!(result, Err(ShellError::ProcessSpawn { .. })));
    }
}
