//! Per-file tail state: byte offset, carried partial line, and the
//! "read whatever was appended since last time" operation.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::splitter::split_lines;

#[derive(Debug, Error)]
pub enum TailError {
    /// The file's observed size dropped below the recorded offset. Content
    /// was truncated or overwritten in place; resetting silently could mask
    /// data loss, so the whole run stops instead.
    #[error("File {} shrunk, giving up", path.display())]
    Shrunk { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result of a single poll of one tracked file.
#[derive(Debug)]
pub enum ReadOutcome {
    /// The file could not be stat-ed this cycle. Soft condition, retried on
    /// the next poll with state untouched.
    Missing,
    /// Newly completed lines, possibly empty if the file did not grow.
    Lines(Vec<String>),
}

/// Tail state for one watched path, created once at startup and kept for the
/// process lifetime.
#[derive(Debug)]
pub struct TrackedFile {
    path: PathBuf,
    offset: u64,
    fragment: String,
}

impl TrackedFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            offset: 0,
            fragment: String::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Directory whose notifications cover this file.
    pub fn parent_dir(&self) -> PathBuf {
        match self.path.parent() {
            Some(dir) if dir.as_os_str().is_empty() => PathBuf::from("."),
            Some(dir) => dir.to_path_buf(),
            None => PathBuf::from("."),
        }
    }

    /// Filename component used to correlate directory notifications.
    pub fn basename(&self) -> Option<&std::ffi::OsStr> {
        self.path.file_name()
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Restart from the beginning of the file, dropping any partial line.
    /// Applied when a notification says the name was recreated or moved.
    pub fn reset(&mut self) {
        self.offset = 0;
        self.fragment.clear();
    }

    /// Read everything appended since the last poll and return the completed
    /// lines. Advances `offset` to the size observed *before* the read, so
    /// growth racing with the read is picked up next cycle.
    pub fn read_new_lines(&mut self) -> Result<ReadOutcome, TailError> {
        let size = match std::fs::metadata(&self.path) {
            Ok(meta) => meta.len(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ReadOutcome::Missing);
            }
            Err(source) => {
                tracing::warn!(path = %self.path.display(), error = %source, "stat failed");
                return Ok(ReadOutcome::Missing);
            }
        };

        if size < self.offset {
            return Err(TailError::Shrunk {
                path: self.path.clone(),
            });
        }

        if size == self.offset {
            return Ok(ReadOutcome::Lines(Vec::new()));
        }

        let chunk = self.read_range(self.offset, size).map_err(|source| TailError::Io {
            path: self.path.clone(),
            source,
        })?;

        let lines = split_lines(&mut self.fragment, &chunk);
        self.offset = size;

        Ok(ReadOutcome::Lines(lines))
    }

    fn read_range(&self, from: u64, to: u64) -> std::io::Result<String> {
        let mut file = File::open(&self.path)?;
        file.seek(SeekFrom::Start(from))?;

        // A short read means the file was truncated mid-read; the next
        // cycle's size check turns that into the fatal shrink path.
        let mut buf = Vec::with_capacity((to - from) as usize);
        file.take(to - from).read_to_end(&mut buf)?;

        // Log files are not guaranteed to be valid UTF-8; decode lossily
        // rather than dropping the read.
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
