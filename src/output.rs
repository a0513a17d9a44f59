//! Suppressible output channels.
//!
//! Matched lines and informational notices go to stdout, errors to stderr.
//! `--nostdout` / `--nostderr` silence the respective channel without
//! affecting command dispatch.

use std::fmt::Display;

#[derive(Debug, Clone, Copy)]
pub struct Console {
    nostdout: bool,
    nostderr: bool,
}

impl Console {
    pub fn new(nostdout: bool, nostderr: bool) -> Self {
        Self { nostdout, nostderr }
    }

    /// Matched-line echo and informational notices.
    pub fn info(&self, msg: impl Display) {
        if !self.nostdout {
            println!("{}", msg);
        }
    }

    /// Error reporting; never fatal by itself.
    pub fn error(&self, msg: impl Display) {
        if !self.nostderr {
            eprintln!("Error: {}", msg);
        }
    }
}
