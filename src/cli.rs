use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "linewatch")]
#[command(version)]
#[command(about = "Tail files for a substring and run a command on every matching line")]
#[command(long_about = "linewatch polls one or more growing text files, scans newly appended \
lines for a plain substring, and invokes an external command with each matching line as a \
quoted argument. Files recreated or rotated in place are re-read from the beginning.")]
pub struct Cli {
    /// Suppress matched-line echo and informational messages on stdout
    #[arg(long)]
    pub nostdout: bool,

    /// Suppress error messages on stderr
    #[arg(long)]
    pub nostderr: bool,

    /// Substring to search for in newly appended lines (case-sensitive)
    #[arg(value_name = "STRING")]
    pub pattern: String,

    /// Poll interval in seconds
    #[arg(value_name = "TIMEOUT")]
    pub timeout: u64,

    /// Command to run for each matching line; the line is appended as one
    /// quoted argument
    #[arg(value_name = "COMMAND")]
    pub command: String,

    /// Files to tail (at least one)
    #[arg(value_name = "FILE", required = true, num_args = 1..)]
    pub files: Vec<PathBuf>,
}

impl Cli {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }
}
