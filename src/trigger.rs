//! Substring matching and command dispatch for matched lines.

use std::process::Command;

use thiserror::Error;

use crate::output::Console;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Command failed")]
    Launch(#[source] std::io::Error),
}

/// Destination for matched lines.
///
/// The shell sink below runs one process per line; implementations that
/// batch, queue, or dispatch asynchronously can slot in without touching the
/// tailing loop.
pub trait LineSink {
    fn dispatch(&mut self, line: &str) -> Result<(), DispatchError>;
}

/// Runs `<command> "<line>"` through the shell, synchronously.
pub struct ShellCommandSink {
    command: String,
}

impl ShellCommandSink {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl LineSink for ShellCommandSink {
    fn dispatch(&mut self, line: &str) -> Result<(), DispatchError> {
        let cmdline = format!("{} {}", self.command, quote_arg(line));
        tracing::debug!(command = %cmdline, "dispatching matched line");

        // The child's exit status is deliberately not inspected; only a
        // failure to launch counts as a dispatch failure.
        Command::new("sh")
            .arg("-c")
            .arg(&cmdline)
            .status()
            .map(|_| ())
            .map_err(DispatchError::Launch)
    }
}

/// Wrap `line` in double quotes, escaping embedded `"` and `\` so a
/// POSIX-shell unquoting pass reproduces the line exactly.
pub fn quote_arg(line: &str) -> String {
    let mut quoted = String::with_capacity(line.len() + 2);
    quoted.push('"');
    for c in line.chars() {
        if c == '"' || c == '\\' {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}

/// Decides whether a line matches and, if so, echoes it and hands it to the
/// sink. Dispatch failures are reported and swallowed; tailing continues.
pub struct MatchTrigger<S> {
    pattern: String,
    console: Console,
    sink: S,
}

impl<S: LineSink> MatchTrigger<S> {
    pub fn new(pattern: impl Into<String>, console: Console, sink: S) -> Self {
        Self {
            pattern: pattern.into(),
            console,
            sink,
        }
    }

    #[cfg(test)]
    pub(crate) fn sink(&self) -> &S {
        &self.sink
    }

    pub fn on_line(&mut self, line: &str) {
        if !line.contains(&self.pattern) {
            return;
        }

        self.console.info(line);

        if let Err(err) = self.sink.dispatch(line) {
            tracing::warn!(error = %err, "command dispatch failed");
            self.console.error(err);
        }
    }
}
