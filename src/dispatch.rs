use crate::builtin::{self, Builtin};
use crate::error::ShellError;
use crate::exit::ExitRequester;
use crate::external;
use crate::history::{HistoryLog, HistoryPolicy};
use crate::state::ShellState;
use std::io::Write;
use tracing::{debug, warn};

/// The command dispatcher: interprets one input line and produces its
/// effect.
///
/// A line is split on whitespace; the first token names the command and
/// the rest are its arguments. Names matching the builtin table (exact,
/// case-sensitive) execute in-process; anything else is an external
/// invocation. Every non-empty line is recorded in the history log,
/// whether or not the command then succeeds.
pub struct Dispatcher {
    builtins: Vec<Box<dyn Builtin>>,
    history: HistoryLog,
    policy: HistoryPolicy,
}

impl Dispatcher {
    /// Build a dispatcher with the full builtin table wired to the given
    /// exit conduit and history log.
    pub fn new(exit: ExitRequester, history: HistoryLog, policy: HistoryPolicy) -> Self {
        let builtins: Vec<Box<dyn Builtin>> = vec![
            Box::new(builtin::Echo),
            Box::new(builtin::Exit::new(exit)),
            Box::new(builtin::ChangeDir),
            Box::new(builtin::Pwd),
            Box::new(builtin::EnvList),
            Box::new(builtin::History::new(history.clone())),
            Box::new(builtin::Unsupported::new("help")),
            Box::new(builtin::Unsupported::new("source")),
        ];
        Self {
            builtins,
            history,
            policy,
        }
    }

    /// Interpret one input line.
    ///
    /// Empty and whitespace-only lines are silently skipped. Errors are
    /// returned to the caller for reporting; no command's failure affects
    /// any other command.
    pub fn dispatch(
        &self,
        state: &mut ShellState,
        line: &str,
        out: &mut dyn Write,
        err: &mut dyn Write,
    ) -> Result<(), ShellError> {
        let mut tokens = line.split_whitespace();
        let Some(name) = tokens.next() else {
            return Ok(());
        };
        let args: Vec<&str> = tokens.collect();

        if let Err(source) = self.history.append(line.trim()) {
            match self.policy {
                HistoryPolicy::Strict => return Err(ShellError::History { source }),
                HistoryPolicy::Lenient => {
                    warn!(error = %source, "failed to record command in history");
                }
            }
        }

        debug!(command = name, argc = args.len(), "dispatching");

        for builtin in &self.builtins {
            if builtin.name() == name {
                return builtin.run(&args, state, out);
            }
        }
        external::run(name, &args, state, out, err)
    }
}
