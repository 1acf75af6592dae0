use std::ffi::OsStr;
use std::path::Path;
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use anyhow::{Context, Result};
use notify::event::ModifyKind;
use notify::{Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

/// Files SQLite writes next to the database while committing.
const SIDECAR_SUFFIXES: [&str; 2] = ["-wal", "-journal"];

/// Watches the directory holding `input` and returns a receiver of change
/// events. The watcher must be kept alive for events to be received.
pub fn watch_input(input: &Path) -> Result<(RecommendedWatcher, Receiver<()>)> {
    let input_name = input
        .file_name()
        .with_context(|| format!("{} does not name a file", input.display()))?
        .to_os_string();
    let (tx, rx) = mpsc::channel();

    let mut watcher = notify::recommended_watcher(move |res: Result<Event, notify::Error>| {
        if let Ok(event) = res {
            if is_input_change(&event, &input_name) {
                // Receiver may be gone during shutdown.
                let _ = tx.send(());
            }
        }
    })
    .context("failed to create file watcher")?;

    // Editors and SQLite both write through temp files next to the input.
    let watch_path = match input.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    watcher
        .watch(watch_path, RecursiveMode::NonRecursive)
        .with_context(|| format!("failed to watch {}", watch_path.display()))?;

    Ok((watcher, rx))
}

/// Content changes to the input or its SQLite sidecars. Reads and metadata
/// updates, including the ones a render causes, are not changes.
fn is_input_change(event: &Event, input_name: &OsStr) -> bool {
    let writes = match event.kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(ModifyKind::Metadata(_)) => false,
        EventKind::Modify(_) => true,
        _ => false,
    };
    writes && event.paths.iter().any(|path| names_input(path, input_name))
}

fn names_input(path: &Path, input_name: &OsStr) -> bool {
    let Some(name) = path.file_name() else {
        return false;
    };
    if name == input_name {
        return true;
    }
    let (Some(name), Some(input)) = (name.to_str(), input_name.to_str()) else {
        return false;
    };
    name.strip_prefix(input)
        .is_some_and(|suffix| SIDECAR_SUFFIXES.contains(&suffix))
}

/// Blocks until a change arrives, then waits for `settle` to pass without
/// further events so one save triggers one render. False once the watcher
/// is gone.
pub fn wait_for_change(rx: &Receiver<()>, settle: Duration) -> bool {
    if rx.recv().is_err() {
        return false;
    }
    while rx.recv_timeout(settle).is_ok() {}
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use notify::event::{AccessKind, AccessMode, CreateKind, DataChange, MetadataKind, RemoveKind};

    use crate::source::{JsonFile, RecordSource};

    fn event(kind: EventKind, path: &str) -> Event {
        Event::new(kind).add_path(PathBuf::from(path))
    }

    fn drain(rx: &Receiver<()>) {
        while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}
    }

    #[test]
    fn writes_to_input_are_changes() {
        let name = OsStr::new("roadmap.db");
        let modify = EventKind::Modify(ModifyKind::Data(DataChange::Content));
        assert!(is_input_change(&event(modify, "/w/roadmap.db"), name));
        assert!(is_input_change(&event(modify, "/w/roadmap.db-wal"), name));
        assert!(is_input_change(
            &event(EventKind::Create(CreateKind::File), "/w/roadmap.db-journal"),
            name
        ));
        assert!(is_input_change(
            &event(EventKind::Remove(RemoveKind::File), "/w/roadmap.db"),
            name
        ));
    }

    #[test]
    fn reads_and_other_files_are_not_changes() {
        let name = OsStr::new("roadmap.db");
        let open = EventKind::Access(AccessKind::Open(AccessMode::Read));
        let close = EventKind::Access(AccessKind::Close(AccessMode::Read));
        let attrs = EventKind::Modify(ModifyKind::Metadata(MetadataKind::AccessTime));
        let modify = EventKind::Modify(ModifyKind::Data(DataChange::Content));
        assert!(!is_input_change(&event(open, "/w/roadmap.db"), name));
        assert!(!is_input_change(&event(close, "/w/roadmap.db"), name));
        assert!(!is_input_change(&event(attrs, "/w/roadmap.db"), name));
        assert!(!is_input_change(&event(modify, "/w/notes.txt"), name));
        assert!(!is_input_change(&event(modify, "/w/roadmap.db-shm-old"), name));
        assert!(!is_input_change(&event(modify, "/w/old-roadmap.db"), name));
    }

    #[test]
    fn write_triggers_change() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("roadmap.json");
        std::fs::write(&input, "{}").unwrap();

        let (_watcher, rx) = watch_input(&input).unwrap();
        std::fs::write(&input, r#"{"tasks": []}"#).unwrap();
        assert!(rx.recv_timeout(Duration::from_secs(5)).is_ok());
    }

    #[test]
    fn reading_the_input_stays_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("roadmap.json");
        std::fs::write(&input, r#"{"tasks": [{"task": "a", "title": "A"}]}"#).unwrap();

        let (_watcher, rx) = watch_input(&input).unwrap();
        drain(&rx);

        let source = JsonFile::new(&input);
        assert_eq!(source.task_rows(None).unwrap().len(), 1);
        assert!(source.branch_rows().unwrap().is_empty());
        assert!(rx.recv_timeout(Duration::from_millis(500)).is_err());
    }

    #[test]
    fn unrelated_file_stays_quiet() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("roadmap.json");
        std::fs::write(&input, "{}").unwrap();

        let (_watcher, rx) = watch_input(&input).unwrap();
        drain(&rx);

        std::fs::write(dir.path().join("notes.txt"), "hello").unwrap();
        assert!(rx.recv_timeout(Duration::from_millis(500)).is_err());
    }

    #[test]
    fn closed_channel_stops_waiting() {
        let (tx, rx) = mpsc::channel::<()>();
        drop(tx);
        assert!(!wait_for_change(&rx, Duration::from_millis(10)));
    }
}
