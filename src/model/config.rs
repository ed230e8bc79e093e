use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::model::item::SearchField;
use crate::ops::sort::SortKey;

/// Configuration from aisle.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AisleConfig {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub groups: GroupThresholds,
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub ui: UiConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_todo_search")]
    pub todos: SearchSettings,
    #[serde(default = "default_contact_search")]
    pub contacts: SearchSettings,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            todos: default_todo_search(),
            contacts: default_contact_search(),
        }
    }
}

/// Which fields a collection searches, and how forgiving the match is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchSettings {
    pub fields: Vec<SearchField>,
    /// Maximum per-token error in `[0, 1]`; 0 = exact substrings only
    pub threshold: f64,
}

/// Default: see src/cli/handlers/init.rs
fn default_todo_search() -> SearchSettings {
    SearchSettings {
        fields: vec![SearchField::Name, SearchField::Note, SearchField::Category],
        threshold: 0.3,
    }
}

/// Default: see src/cli/handlers/init.rs
fn default_contact_search() -> SearchSettings {
    SearchSettings {
        fields: vec![SearchField::Name],
        threshold: 0.4,
    }
}

/// Day cutoffs for the deadline buckets. "Today" (0) and "Tomorrow" (1) are
/// fixed; each value here is the last day (inclusive) of its bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupThresholds {
    #[serde(default = "default_this_week")]
    pub this_week: i64,
    #[serde(default = "default_next_week")]
    pub next_week: i64,
    #[serde(default = "default_this_month")]
    pub this_month: i64,
    #[serde(default = "default_next_month")]
    pub next_month: i64,
}

impl Default for GroupThresholds {
    fn default() -> Self {
        GroupThresholds {
            this_week: default_this_week(),
            next_week: default_next_week(),
            this_month: default_this_month(),
            next_month: default_next_month(),
        }
    }
}

impl GroupThresholds {
    /// Cutoffs must be strictly increasing and start after "Tomorrow"
    pub fn is_valid(&self) -> bool {
        1 < self.this_week
            && self.this_week < self.next_week
            && self.next_week < self.this_month
            && self.this_month < self.next_month
    }
}

fn default_this_week() -> i64 {
    7
}

fn default_next_week() -> i64 {
    14
}

fn default_this_month() -> i64 {
    30
}

fn default_next_month() -> i64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewConfig {
    #[serde(default = "default_todo_sort")]
    pub todos_sort: SortKey,
    #[serde(default)]
    pub contacts_sort: SortKey,
    /// Show completed to-dos by default
    #[serde(default)]
    pub show_completed: bool,
}

impl Default for ViewConfig {
    fn default() -> Self {
        ViewConfig {
            todos_sort: default_todo_sort(),
            contacts_sort: SortKey::default(),
            show_completed: false,
        }
    }
}

fn default_todo_sort() -> SortKey {
    SortKey::Deadline
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UiConfig {
    #[serde(default)]
    pub colors: HashMap<String, String>,
    /// Per-category pill colors
    #[serde(default)]
    pub category_colors: HashMap<String, String>,
}
