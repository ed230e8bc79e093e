use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tempfile::NamedTempFile;

use crate::io::lock::{FileLock, LockError};
use crate::model::activity::Message;
use crate::model::config::AisleConfig;
use crate::model::item::{Contact, Record, TodoItem};
use crate::ops::ordering::{OrderChange, reorder_indices};
use crate::ops::reorder::Reorder;

/// Name of the data directory under the project root
pub const DATA_DIR: &str = "aisle";
pub const CONFIG_FILE: &str = "aisle.toml";

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not an aisle project: no aisle/ directory found")]
    NotAProject,
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("could not parse aisle.toml: {0}")]
    ConfigParseError(#[from] toml::de::Error),
    #[error("could not edit aisle.toml: {0}")]
    ConfigEditError(String),
    #[error(transparent)]
    Lock(#[from] LockError),
    #[error("io error: {0}")]
    IoError(#[from] io::Error),
}

/// A stored collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Contacts,
    Todos,
    Messages,
}

impl Collection {
    pub fn file_name(self) -> &'static str {
        match self {
            Collection::Contacts => "contacts.json",
            Collection::Todos => "todos.json",
            Collection::Messages => "messages.json",
        }
    }

    pub fn from_file_name(name: &str) -> Option<Collection> {
        [Collection::Contacts, Collection::Todos, Collection::Messages]
            .into_iter()
            .find(|c| c.file_name() == name)
    }
}

/// A record type that lives in its own collection file and carries a
/// persisted manual order.
pub trait Stored: Record + DeserializeOwned + Serialize {
    const COLLECTION: Collection;

    fn stored_order_index(&self) -> Option<i64>;
    fn set_order_index(&mut self, index: i64);
}

impl Stored for Contact {
    const COLLECTION: Collection = Collection::Contacts;

    fn stored_order_index(&self) -> Option<i64> {
        self.order_index
    }

    fn set_order_index(&mut self, index: i64) {
        self.order_index = Some(index);
    }
}

impl Stored for TodoItem {
    const COLLECTION: Collection = Collection::Todos;

    fn stored_order_index(&self) -> Option<i64> {
        self.order_index
    }

    fn set_order_index(&mut self, index: i64) {
        self.order_index = Some(index);
    }
}

/// Discover the project root by walking up from `start`, looking for an
/// `aisle/` directory with a config file.
pub fn discover_root(start: &Path) -> Result<PathBuf, StoreError> {
    let mut current = start.to_path_buf();
    loop {
        let data_dir = current.join(DATA_DIR);
        if data_dir.is_dir() && data_dir.join(CONFIG_FILE).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(StoreError::NotAProject);
        }
    }
}

/// Write `content` to `path` via a temp file in the same directory
pub fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// The file-backed document store for one project
#[derive(Debug, Clone)]
pub struct Store {
    pub root: PathBuf,
    pub data_dir: PathBuf,
    pub config: AisleConfig,
}

impl Store {
    /// Open the store rooted at `root` and load its config.
    pub fn open(root: &Path) -> Result<Store, StoreError> {
        let data_dir = root.join(DATA_DIR);
        if !data_dir.is_dir() {
            return Err(StoreError::NotAProject);
        }
        let config_path = data_dir.join(CONFIG_FILE);
        let config_text = fs::read_to_string(&config_path).map_err(|e| StoreError::ReadError {
            path: config_path.clone(),
            source: e,
        })?;
        let mut config: AisleConfig = toml::from_str(&config_text)?;
        if !config.groups.is_valid() {
            tracing::warn!(
                groups = ?config.groups,
                "group thresholds are not increasing; using defaults"
            );
            config.groups = Default::default();
        }
        tracing::debug!(root = %root.display(), "opened store");
        Ok(Store {
            root: root.to_path_buf(),
            data_dir,
            config,
        })
    }

    /// Discover from `start` and open
    pub fn discover(start: &Path) -> Result<Store, StoreError> {
        let root = discover_root(start)?;
        Store::open(&root)
    }

    pub fn path_of(&self, collection: Collection) -> PathBuf {
        self.data_dir.join(collection.file_name())
    }

    /// Read a collection file. A missing file is an empty collection.
    fn read_json<T: DeserializeOwned>(&self, collection: Collection) -> Result<Vec<T>, StoreError> {
        let path = self.path_of(collection);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let text = fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
            path: path.clone(),
            source: e,
        })?;
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&text).map_err(|e| StoreError::ParseError { path, source: e })
    }

    /// Full snapshot of a reorderable collection. Records without an
    /// ordering index get their position in the file.
    pub fn snapshot<T: Stored>(&self) -> Result<Vec<T>, StoreError> {
        let mut items: Vec<T> = self.read_json(T::COLLECTION)?;
        for (pos, item) in items.iter_mut().enumerate() {
            if item.stored_order_index().is_none() {
                item.set_order_index(pos as i64);
            }
        }
        tracing::debug!(
            collection = T::COLLECTION.file_name(),
            count = items.len(),
            "loaded snapshot"
        );
        Ok(items)
    }

    pub fn contacts(&self) -> Result<Vec<Contact>, StoreError> {
        self.snapshot()
    }

    pub fn todos(&self) -> Result<Vec<TodoItem>, StoreError> {
        self.snapshot()
    }

    pub fn messages(&self) -> Result<Vec<Message>, StoreError> {
        self.read_json(Collection::Messages)
    }

    /// Persist ordering-index changes. Only the `orderIndex` field of the
    /// changed records is touched; every other field (including ones this
    /// crate does not model) is written back as it was read.
    pub fn write_order(&self, collection: Collection, changes: &[OrderChange]) -> Result<(), StoreError> {
        if changes.is_empty() {
            return Ok(());
        }
        let _lock = FileLock::acquire_default(&self.data_dir)?;
        self.write_order_locked(collection, changes)
    }

    /// Apply a completed drop. The snapshot is re-read and the new indices
    /// computed while holding the lock, so a write that landed since the
    /// gesture started is renumbered too. Returns the changes written.
    pub fn apply_reorder<T: Stored>(&self, reorder: &Reorder) -> Result<Vec<OrderChange>, StoreError> {
        let _lock = FileLock::acquire_default(&self.data_dir)?;
        let items: Vec<T> = self.snapshot()?;
        let changes = reorder_indices(&items, reorder);
        if !changes.is_empty() {
            self.write_order_locked(T::COLLECTION, &changes)?;
        }
        Ok(changes)
    }

    fn write_order_locked(&self, collection: Collection, changes: &[OrderChange]) -> Result<(), StoreError> {
        let path = self.path_of(collection);
        let mut docs: Vec<serde_json::Value> = self.read_json(collection)?;
        let mut applied = 0;
        for doc in docs.iter_mut() {
            let Some(id) = doc.get("id").and_then(|v| v.as_str()) else {
                continue;
            };
            let Some(change) = changes.iter().find(|c| c.id == id) else {
                continue;
            };
            if let Some(obj) = doc.as_object_mut() {
                obj.insert("orderIndex".to_string(), serde_json::Value::from(change.to));
                applied += 1;
            }
        }
        if applied < changes.len() {
            tracing::warn!(
                expected = changes.len(),
                applied,
                "some reordered records vanished before the write"
            );
        }

        let mut content = serde_json::to_string_pretty(&docs).map_err(|e| StoreError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        content.push('\n');
        atomic_write(&path, content.as_bytes()).map_err(|e| StoreError::WriteError {
            path: path.clone(),
            source: e,
        })?;
        tracing::info!(
            collection = collection.file_name(),
            changed = applied,
            "wrote ordering indices"
        );
        Ok(())
    }
}
