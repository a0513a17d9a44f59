//! The polling loop that ties tailing, matching, and reconciliation together.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;

use crate::output::Console;
use crate::reconcile::apply_events;
use crate::tail::{ReadOutcome, TailError, TrackedFile};
use crate::trigger::{LineSink, MatchTrigger};
use crate::watcher::DirectoryWatcher;

/// Process-lifetime owner of all tail state, keyed by the path given on the
/// command line. Entries are created once at startup and never removed.
#[derive(Default)]
pub struct Registry {
    files: HashMap<PathBuf, TrackedFile>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a path to track, registering its containing directory with the
    /// watcher. Adding the same path twice keeps the existing state.
    pub fn track(&mut self, path: impl Into<PathBuf>, watcher: &mut DirectoryWatcher) -> Result<()> {
        let path = path.into();
        if self.files.contains_key(&path) {
            return Ok(());
        }

        let file = TrackedFile::new(&path);
        watcher.watch_dir(&file.parent_dir())?;
        self.files.insert(path, file);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files_mut(&mut self) -> impl Iterator<Item = &mut TrackedFile> {
        self.files.values_mut()
    }
}

/// Runs polling cycles forever, stopping only on a fatal tail error.
pub struct Driver<S> {
    registry: Registry,
    watcher: DirectoryWatcher,
    trigger: MatchTrigger<S>,
    console: Console,
    interval: Duration,
}

impl<S: LineSink> Driver<S> {
    pub fn new(
        registry: Registry,
        watcher: DirectoryWatcher,
        trigger: MatchTrigger<S>,
        console: Console,
        interval: Duration,
    ) -> Self {
        Self {
            registry,
            watcher,
            trigger,
            console,
            interval,
        }
    }

    /// One full cycle: drain and reconcile pending directory events, then
    /// scan every tracked file. Does not sleep. A `TailError::Shrunk` from
    /// any file aborts the cycle and propagates.
    ///
    /// Reconciliation runs first so that a rotation noticed between cycles
    /// resets the offset before the size check would mistake the new file
    /// for a truncation.
    pub fn run_cycle(&mut self) -> Result<()> {
        let events = self.watcher.drain();
        if !events.is_empty() {
            apply_events(&events, self.registry.files_mut(), &self.console);
        }

        for file in self.registry.files_mut() {
            match file.read_new_lines() {
                Ok(ReadOutcome::Missing) => {
                    self.console.info(format!(
                        "File {} not found, skipping",
                        file.path().display()
                    ));
                }
                Ok(ReadOutcome::Lines(lines)) => {
                    for line in &lines {
                        self.trigger.on_line(line);
                    }
                }
                Err(err @ TailError::Shrunk { .. }) => return Err(err.into()),
                // Other read failures are confined to this file and cycle;
                // the offset stays put and the read is retried next poll.
                Err(err) => {
                    tracing::warn!(path = %file.path().display(), error = %err, "read failed");
                    self.console.error(err);
                }
            }
        }

        Ok(())
    }

    /// Loop until a fatal error. Never returns `Ok` in normal operation.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(files = self.registry.len(), interval = ?self.interval, "tail loop started");
        loop {
            self.run_cycle()?;
            std::thread::sleep(self.interval);
        }
    }
}
