//! Maps directory notifications back onto tracked files.
//!
//! Notifications carry a name and an event kind, not a stable file handle,
//! so rotation (unlink+recreate, move-into-place) is indistinguishable from
//! any other identity change of that name. Every create/remove/move event
//! whose filename matches a tracked file's basename resets that file to
//! offset 0; reading on with a stale offset could return garbage from a
//! different underlying file.

use notify::event::ModifyKind;
use notify::{Event, EventKind};

use crate::output::Console;
use crate::tail::TrackedFile;

fn resets_tail(kind: &EventKind) -> bool {
    matches!(
        kind,
        EventKind::Create(_) | EventKind::Remove(_) | EventKind::Modify(ModifyKind::Name(_))
    )
}

/// Apply a drained batch of events to the tracked files, resetting every
/// file whose basename matches an affected path. Returns how many resets
/// were applied.
pub fn apply_events<'a>(
    events: &[Event],
    files: impl IntoIterator<Item = &'a mut TrackedFile>,
    console: &Console,
) -> usize {
    let mut names = Vec::new();
    for event in events {
        if !resets_tail(&event.kind) {
            continue;
        }
        for path in &event.paths {
            if let Some(name) = path.file_name() {
                names.push(name.to_os_string());
            }
        }
    }

    if names.is_empty() {
        return 0;
    }

    let mut resets = 0;
    for file in files {
        let matched = file
            .basename()
            .is_some_and(|base| names.iter().any(|n| n.as_os_str() == base));
        if matched {
            console.info(format!(
                "File {} disappeared, resetting offset",
                file.path().display()
            ));
            tracing::info!(path = %file.path().display(), "resetting tail after directory event");
            file.reset();
            resets += 1;
        }
    }
    resets
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{CreateKind, ModifyKind, RemoveKind, RenameMode};
    use std::path::PathBuf;

    fn quiet() -> Console {
        Console::new(true, true)
    }

    fn event(kind: EventKind, path: &str) -> Event {
        let mut ev = Event::new(kind);
        ev.paths.push(PathBuf::from(path));
        ev
    }

    fn tracked_at(path: &str, offset_bytes: &str) -> (tempfile::TempDir, TrackedFile) {
        // Build a TrackedFile with a nonzero offset by actually reading.
        let dir = tempfile::TempDir::new().unwrap();
        let full = dir.path().join(path);
        std::fs::write(&full, offset_bytes).unwrap();
        let mut file = TrackedFile::new(&full);
        file.read_new_lines().unwrap();
        (dir, file)
    }

    #[test]
    fn create_event_resets_matching_basename() {
        let (_dir, mut file) = tracked_at("app.log", "data\n");
        assert!(file.offset() > 0);

        let events = [event(EventKind::Create(CreateKind::File), "/other/dir/app.log")];
        let resets = apply_events(&events, [&mut file], &quiet());

        assert_eq!(resets, 1);
        assert_eq!(file.offset(), 0);
    }

    #[test]
    fn remove_and_rename_events_reset() {
        let (_d1, mut a) = tracked_at("a.log", "aaaa\n");
        let (_d2, mut b) = tracked_at("b.log", "bbbb\n");

        let events = [
            event(EventKind::Remove(RemoveKind::File), "/x/a.log"),
            event(
                EventKind::Modify(ModifyKind::Name(RenameMode::From)),
                "/x/b.log",
            ),
        ];
        let resets = apply_events(&events, [&mut a, &mut b], &quiet());

        assert_eq!(resets, 2);
        assert_eq!(a.offset(), 0);
        assert_eq!(b.offset(), 0);
    }

    #[test]
    fn unrelated_basename_is_untouched() {
        let (_dir, mut file) = tracked_at("app.log", "data\n");
        let before = file.offset();

        let events = [event(EventKind::Remove(RemoveKind::File), "/x/other.log")];
        assert_eq!(apply_events(&events, [&mut file], &quiet()), 0);
        assert_eq!(file.offset(), before);
    }

    #[test]
    fn data_modify_events_do_not_reset() {
        let (_dir, mut file) = tracked_at("app.log", "data\n");
        let before = file.offset();

        let events = [event(
            EventKind::Modify(ModifyKind::Data(notify::event::DataChange::Content)),
            "/x/app.log",
        )];
        assert_eq!(apply_events(&events, [&mut file], &quiet()), 0);
        assert_eq!(file.offset(), before);
    }

    #[test]
    fn empty_batch_is_a_noop() {
        let (_dir, mut file) = tracked_at("app.log", "data\n");
        assert_eq!(apply_events(&[], [&mut file], &quiet()), 0);
        assert!(file.offset() > 0);
    }
}
