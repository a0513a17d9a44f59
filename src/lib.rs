pub mod cli;
pub mod driver;
pub mod output;
pub mod reconcile;
pub mod splitter;
pub mod tail;
pub mod trigger;
pub mod watcher;

pub use driver::{Driver, Registry};
pub use output::Console;
pub use tail::{ReadOutcome, TailError, TrackedFile};
pub use trigger::{LineSink, MatchTrigger, ShellCommandSink};
pub use watcher::DirectoryWatcher;
