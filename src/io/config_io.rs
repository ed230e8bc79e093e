use std::path::Path;

use crate::io::store::{CONFIG_FILE, StoreError, atomic_write};
use crate::model::config::AisleConfig;
use crate::ops::sort::SortKey;

/// A list screen with its own persisted default sort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Contacts,
    Todos,
}

impl Screen {
    fn sort_key_field(self) -> &'static str {
        match self {
            Screen::Contacts => "contacts_sort",
            Screen::Todos => "todos_sort",
        }
    }
}

/// Read aisle.toml as both the parsed config and a `toml_edit` document, so
/// edits can be written back without disturbing comments or layout.
pub fn read_config_doc(data_dir: &Path) -> Result<(AisleConfig, toml_edit::DocumentMut), StoreError> {
    let path = data_dir.join(CONFIG_FILE);
    let text = std::fs::read_to_string(&path).map_err(|e| StoreError::ReadError {
        path: path.clone(),
        source: e,
    })?;
    let config: AisleConfig = toml::from_str(&text)?;
    let doc = text
        .parse::<toml_edit::DocumentMut>()
        .map_err(|e| StoreError::ConfigEditError(e.to_string()))?;
    Ok((config, doc))
}

pub fn write_config(data_dir: &Path, doc: &toml_edit::DocumentMut) -> Result<(), StoreError> {
    let path = data_dir.join(CONFIG_FILE);
    atomic_write(&path, doc.to_string().as_bytes()).map_err(|e| StoreError::WriteError {
        path,
        source: e,
    })
}

/// Set the default sort for a screen under `[view]`
pub fn set_default_sort(doc: &mut toml_edit::DocumentMut, screen: Screen, key: SortKey) {
    if !doc.contains_key("view") {
        doc["view"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["view"][screen.sort_key_field()] = toml_edit::value(key.as_str());
}

/// Set whether completed to-dos are listed by default
pub fn set_show_completed(doc: &mut toml_edit::DocumentMut, show: bool) {
    if !doc.contains_key("view") {
        doc["view"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["view"]["show_completed"] = toml_edit::value(show);
}
