use argh::FromArgs;
use rush::{
    DEFAULT_HISTORY_FILE, Dispatcher, HistoryLog, HistoryPolicy, PromptSource, ShellState, exit,
    run_loop,
};
use std::io;
use tracing_subscriber::EnvFilter;

#[derive(FromArgs)]
/// An interactive command interpreter.
struct Options {
    /// history file name, resolved in the current working directory
    #[argh(option, default = "String::from(DEFAULT_HISTORY_FILE)")]
    history_file: String,

    /// fail a command when its history entry cannot be recorded
    #[argh(switch)]
    strict_history: bool,

    /// prompt shown before each line
    #[argh(option, default = "String::from(\"$ \")")]
    prompt: String,
}

fn main() -> anyhow::Result<()> {
    let options: Options = argh::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let policy = if options.strict_history {
        HistoryPolicy::Strict
    } else {
        HistoryPolicy::Lenient
    };

    let (requester, mut listener) = exit::conduit();
    let dispatcher = Dispatcher::new(requester, HistoryLog::new(options.history_file), policy);
    let mut state = ShellState::new();
    let mut source = PromptSource::new(options.prompt)?;

    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    run_loop(
        &mut source,
        &mut stdout,
        &mut stderr,
        &mut listener,
        &dispatcher,
        &mut state,
    );

    Ok(())
}
