use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::model::activity::ActivityMap;
use crate::model::item::Record;

/// How a list is ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    #[default]
    NameAsc,
    NameDesc,
    /// Most recent activity first; items without activity last
    RecentDesc,
    /// Earliest deadline first; undecided last
    Deadline,
    /// Newest first; unknown creation time last
    CreatedDesc,
    Category,
    /// Persisted drag order
    Manual,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::NameAsc,
        SortKey::NameDesc,
        SortKey::RecentDesc,
        SortKey::Deadline,
        SortKey::CreatedDesc,
        SortKey::Category,
        SortKey::Manual,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::NameAsc => "name-asc",
            SortKey::NameDesc => "name-desc",
            SortKey::RecentDesc => "recent-desc",
            SortKey::Deadline => "deadline",
            SortKey::CreatedDesc => "created-desc",
            SortKey::Category => "category",
            SortKey::Manual => "manual",
        }
    }

    /// Human label for filter chips
    pub fn label(self) -> &'static str {
        match self {
            SortKey::NameAsc => "Name (A-Z)",
            SortKey::NameDesc => "Name (Z-A)",
            SortKey::RecentDesc => "Most recent",
            SortKey::Deadline => "Deadline",
            SortKey::CreatedDesc => "Newest",
            SortKey::Category => "Category",
            SortKey::Manual => "Manual",
        }
    }

    /// Next key in `ALL`, wrapping around
    pub fn next(self) -> SortKey {
        let pos = SortKey::ALL.iter().position(|k| *k == self).unwrap_or(0);
        SortKey::ALL[(pos + 1) % SortKey::ALL.len()]
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key '{0}' (expected one of: name-asc, name-desc, recent-desc, deadline, created-desc, category, manual)")]
pub struct ParseSortKeyError(pub String);

impl FromStr for SortKey {
    type Err = ParseSortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s.trim())
            .ok_or_else(|| ParseSortKeyError(s.to_string()))
    }
}

/// Primary collation key: decomposed, accents dropped, lowercased.
/// "Émile" sorts with the E's, not after "Z".
fn collation_key(s: &str) -> String {
    s.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Accent- and case-insensitive name comparison. Accents, then case, then
/// raw text break ties so distinct spellings never compare equal.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// The shared tie-break: name ascending, then id
fn tie_break<T: Record>(a: &T, b: &T) -> Ordering {
    compare_names(a.name(), b.name()).then_with(|| a.id().cmp(b.id()))
}

/// `Some` before `None`; among `Some`, `cmp` decides
fn present_first(
    a: Option<NaiveDateTime>,
    b: Option<NaiveDateTime>,
    cmp: impl Fn(NaiveDateTime, NaiveDateTime) -> Ordering,
) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => cmp(x, y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Compare two items under `key`, including the tie-break
pub fn compare<T: Record>(a: &T, b: &T, key: SortKey, activity: &ActivityMap) -> Ordering {
    let primary = match key {
        SortKey::NameAsc => Ordering::Equal,
        SortKey::NameDesc => compare_names(b.name(), a.name()),
        SortKey::RecentDesc => present_first(
            activity.get(a.id()).copied(),
            activity.get(b.id()).copied(),
            |x, y| y.cmp(&x),
        ),
        SortKey::Deadline => present_first(a.deadline(), b.deadline(), |x, y| x.cmp(&y)),
        SortKey::CreatedDesc => present_first(a.created_at(), b.created_at(), |x, y| y.cmp(&x)),
        SortKey::Category => compare_names(a.category(), b.category()),
        SortKey::Manual => a.order_index().cmp(&b.order_index()),
    };
    primary.then_with(|| tie_break(a, b))
}

/// Return a newly ordered copy of `items`; the input is untouched.
/// `activity` is only consulted for `RecentDesc`.
pub fn sort_items<'a, T: Record>(items: &[&'a T], key: SortKey, activity: &ActivityMap) -> Vec<&'a T> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| compare(*a, *b, key, activity));
    sorted
}
