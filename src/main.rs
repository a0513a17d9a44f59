use anyhow::Result;
use clap::Parser;

use linewatch::cli::Cli;
use linewatch::driver::{Driver, Registry};
use linewatch::output::Console;
use linewatch::trigger::{MatchTrigger, ShellCommandSink};
use linewatch::watcher::DirectoryWatcher;

fn main() {
    // Usage errors exit 1, matching every other failure path, and respect
    // --nostderr even though parsing failed. Help and version output keep
    // clap's success exit.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if err.use_stderr() {
                if !std::env::args().any(|arg| arg == "--nostderr") {
                    let _ = err.print();
                }
                std::process::exit(1);
            }
            let _ = err.print();
            std::process::exit(0);
        }
    };

    setup_logging();

    let console = Console::new(cli.nostdout, cli.nostderr);

    if let Err(err) = run(cli, console) {
        console.error(err);
        std::process::exit(1);
    }
}

fn run(cli: Cli, console: Console) -> Result<()> {
    let mut watcher = DirectoryWatcher::new()?;

    let mut registry = Registry::new();
    for path in &cli.files {
        registry.track(path, &mut watcher)?;
    }

    tracing::info!(
        pattern = %cli.pattern,
        files = registry.len(),
        "starting linewatch"
    );

    let sink = ShellCommandSink::new(&cli.command);
    let trigger = MatchTrigger::new(&cli.pattern, console, sink);

    let mut driver = Driver::new(registry, watcher, trigger, console, cli.poll_interval());

    // Loops forever; only a fatal tail error (file shrank) returns.
    driver.run()
}

fn setup_logging() {
    use tracing_subscriber::EnvFilter;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}
