use std::path::{Path, PathBuf};
use std::sync::mpsc;

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};

use crate::io::store::{CONFIG_FILE, Collection};

/// What changed on disk since the last poll
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// A collection file was written, created or removed
    Collection(Collection),
    /// aisle.toml changed
    Config,
}

/// Map a path inside the data directory to the event it should raise.
/// Lock files, temp files and anything outside `data_dir` raise nothing.
fn classify(data_dir: &Path, path: &Path) -> Option<StoreEvent> {
    if path.parent() != Some(data_dir) {
        return None;
    }
    let name = path.file_name()?.to_str()?;
    if name.starts_with('.') {
        return None;
    }
    if name == CONFIG_FILE {
        return Some(StoreEvent::Config);
    }
    Collection::from_file_name(name).map(StoreEvent::Collection)
}

/// Subscription to snapshot changes under the `aisle/` directory.
///
/// The TUI calls [`SnapshotWatcher::poll`] once per tick and reloads whatever
/// collections it reports.
pub struct SnapshotWatcher {
    _watcher: RecommendedWatcher,
    rx: mpsc::Receiver<Vec<PathBuf>>,
    data_dir: PathBuf,
}

impl SnapshotWatcher {
    pub fn start(data_dir: &Path) -> Result<Self, notify::Error> {
        let (tx, rx) = mpsc::channel();

        let mut watcher = RecommendedWatcher::new(
            move |result: Result<Event, notify::Error>| {
                let event = match result {
                    Ok(e) => e,
                    Err(e) => {
                        tracing::warn!(error = %e, "watch error");
                        return;
                    }
                };
                match event.kind {
                    EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) => {}
                    _ => return,
                }
                if !event.paths.is_empty() {
                    let _ = tx.send(event.paths);
                }
            },
            Config::default(),
        )?;

        watcher.watch(data_dir, RecursiveMode::NonRecursive)?;
        // notify reports canonical paths on some platforms
        let data_dir = data_dir.canonicalize().unwrap_or_else(|_| data_dir.to_path_buf());
        Ok(SnapshotWatcher {
            _watcher: watcher,
            rx,
            data_dir,
        })
    }

    /// Drain pending notifications. Each event appears at most once, in
    /// the order first seen.
    pub fn poll(&self) -> Vec<StoreEvent> {
        let mut events: Vec<StoreEvent> = Vec::new();
        while let Ok(paths) = self.rx.try_recv() {
            for path in paths {
                let path = path.canonicalize().unwrap_or(path);
                if let Some(evt) = classify(&self.data_dir, &path)
                    && !events.contains(&evt)
                {
                    events.push(evt);
                }
            }
        }
        if !events.is_empty() {
            tracing::debug!(?events, "store changed on disk");
        }
        events
    }
}
