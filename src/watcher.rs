use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};

use anyhow::{Context, Result};
use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

/// Directory-level notification channel.
///
/// One watch is registered per distinct directory containing a tracked file,
/// non-recursively. Pending events are drained once per polling cycle without
/// blocking.
pub struct DirectoryWatcher {
    watcher: RecommendedWatcher,
    event_rx: Receiver<notify::Result<Event>>,
    watched: HashSet<PathBuf>,
}

impl DirectoryWatcher {
    pub fn new() -> Result<Self> {
        let (tx, event_rx) = mpsc::channel::<notify::Result<Event>>();

        let watcher =
            notify::recommended_watcher(tx).context("Failed to create file system watcher")?;

        Ok(Self {
            watcher,
            event_rx,
            watched: HashSet::new(),
        })
    }

    /// Register `dir` for notifications. Registering the same directory
    /// again is a no-op, however many tracked files it contains.
    pub fn watch_dir(&mut self, dir: &Path) -> Result<()> {
        if self.watched.contains(dir) {
            return Ok(());
        }

        self.watcher
            .watch(dir, RecursiveMode::NonRecursive)
            .with_context(|| format!("Failed to watch directory {}", dir.display()))?;
        tracing::debug!(dir = %dir.display(), "watching directory");

        self.watched.insert(dir.to_path_buf());
        Ok(())
    }

    /// Collect every event currently pending on the channel. Returns
    /// immediately with an empty batch when nothing is queued.
    pub fn drain(&self) -> Vec<Event> {
        let mut events = Vec::new();
        loop {
            match self.event_rx.try_recv() {
                Ok(Ok(event)) => events.push(event),
                Ok(Err(err)) => {
                    tracing::warn!(error = %err, "file watcher error");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        events
    }
}
