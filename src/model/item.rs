use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

/// A field the fuzzy matcher can search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchField {
    Name,
    Note,
    Category,
}

/// Read-only accessors the view pipeline needs from a record.
///
/// Contacts and to-dos share one pipeline; each screen only differs in which
/// of these accessors return something.
pub trait Record {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn category(&self) -> &str;
    /// Manual (drag) ordering position
    fn order_index(&self) -> i64;

    fn note(&self) -> Option<&str> {
        None
    }

    /// `None` means "undecided"
    fn deadline(&self) -> Option<NaiveDateTime> {
        None
    }

    fn created_at(&self) -> Option<NaiveDateTime> {
        None
    }

    fn is_completed(&self) -> bool {
        false
    }

    /// Text for a searchable field, if the record has one
    fn field(&self, field: SearchField) -> Option<&str> {
        match field {
            SearchField::Name => Some(self.name()),
            SearchField::Note => self.note(),
            SearchField::Category => Some(self.category()),
        }
    }
}

/// An address-book entry (vendor, family member, ...)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_color: Option<String>,
    /// Missing on disk means "position in the file"; filled in on load
    #[serde(default)]
    pub order_index: Option<i64>,
}

impl Contact {
    pub fn new(id: &str, name: &str, category: &str) -> Self {
        Contact {
            id: id.to_string(),
            name: name.to_string(),
            category: category.to_string(),
            email: None,
            phone: None,
            website: None,
            avatar_color: None,
            order_index: None,
        }
    }
}

impl Record for Contact {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn order_index(&self) -> i64 {
        self.order_index.unwrap_or(i64::MAX)
    }
}

/// A to-do list entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default)]
    pub category: String,
    /// Unparseable values load as `None` ("No date yet")
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub deadline: Option<NaiveDateTime>,
    #[serde(default, deserialize_with = "deserialize_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub is_completed: bool,
    #[serde(default)]
    pub order_index: Option<i64>,
}

impl TodoItem {
    pub fn new(id: &str, name: &str, category: &str) -> Self {
        TodoItem {
            id: id.to_string(),
            name: name.to_string(),
            note: None,
            category: category.to_string(),
            deadline: None,
            created_at: None,
            is_completed: false,
            order_index: None,
        }
    }
}

impl Record for TodoItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn category(&self) -> &str {
        &self.category
    }

    fn order_index(&self) -> i64 {
        self.order_index.unwrap_or(i64::MAX)
    }

    fn note(&self) -> Option<&str> {
        self.note.as_deref()
    }

    fn deadline(&self) -> Option<NaiveDateTime> {
        self.deadline
    }

    fn created_at(&self) -> Option<NaiveDateTime> {
        self.created_at
    }

    fn is_completed(&self) -> bool {
        self.is_completed
    }
}

// ---------------------------------------------------------------------------
// Timestamps
// ---------------------------------------------------------------------------

/// Parse a stored timestamp into local wall-clock time.
///
/// Accepts `YYYY-MM-DD` (midnight), `YYYY-MM-DDTHH:MM[:SS]` (already local)
/// and RFC 3339 with an offset (converted to local time).
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Local).naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Seconds since the Unix epoch, as local wall-clock time
pub fn from_epoch_seconds(secs: i64) -> Option<NaiveDateTime> {
    DateTime::from_timestamp(secs, 0).map(|dt| dt.with_timezone(&Local).naive_local())
}

fn timestamp_from_value(value: &serde_json::Value) -> Option<NaiveDateTime> {
    match value {
        serde_json::Value::String(s) => parse_timestamp(s),
        serde_json::Value::Number(n) => n.as_i64().and_then(from_epoch_seconds),
        // Document-store timestamp objects: `{ "seconds": .., "nanoseconds": .. }`
        serde_json::Value::Object(map) => map
            .get("seconds")
            .and_then(|s| s.as_i64())
            .and_then(from_epoch_seconds),
        _ => None,
    }
}

/// Deserialize an optional timestamp, mapping anything malformed to `None`.
pub(crate) fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<Option<NaiveDateTime>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(v) => {
            let parsed = timestamp_from_value(&v);
            if parsed.is_none() {
                tracing::warn!(value = %v, "ignoring malformed timestamp");
            }
            parsed
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn parse_date_only_is_midnight() {
        assert_eq!(parse_timestamp("2026-06-20"), Some(dt("2026-06-20 00:00")));
    }

    #[test]
    fn parse_local_datetime() {
        assert_eq!(
            parse_timestamp("2026-06-20T14:30:00"),
            Some(dt("2026-06-20 14:30"))
        );
        assert_eq!(parse_timestamp("2026-06-20T14:30"), Some(dt("2026-06-20 14:30")));
    }

    #[test]
    fn parse_garbage_is_none() {
        assert_eq!(parse_timestamp(""), None);
        assert_eq!(parse_timestamp("next tuesday"), None);
        assert_eq!(parse_timestamp("2026-13-45"), None);
    }

    #[test]
    fn malformed_deadline_loads_as_undecided() {
        let json = r#"[
            {"id": "a", "name": "Book venue", "category": "Venue", "deadline": "soon"},
            {"id": "b", "name": "Cake tasting", "category": "Baker", "deadline": 42.5},
            {"id": "c", "name": "Send invites", "category": "Stationery", "deadline": "2026-11-01"},
            {"id": "d", "name": "Pick DJ", "category": "DJ", "deadline": null}
        ]"#;
        let items: Vec<TodoItem> = serde_json::from_str(json).unwrap();
        assert_eq!(items[0].deadline, None);
        assert_eq!(items[1].deadline, None);
        assert_eq!(items[2].deadline, Some(dt("2026-11-01 00:00")));
        assert_eq!(items[3].deadline, None);
    }

    #[test]
    fn document_timestamp_object_is_accepted() {
        let json = r#"{"id": "a", "name": "x", "createdAt": {"seconds": 0, "nanoseconds": 0}}"#;
        let item: TodoItem = serde_json::from_str(json).unwrap();
        assert_eq!(item.created_at, from_epoch_seconds(0));
    }

    #[test]
    fn contact_has_no_note_or_deadline() {
        let c = Contact::new("c1", "Ana Florals", "Florist");
        assert_eq!(c.field(SearchField::Name), Some("Ana Florals"));
        assert_eq!(c.field(SearchField::Category), Some("Florist"));
        assert_eq!(c.field(SearchField::Note), None);
        assert_eq!(c.deadline(), None);
    }

    #[test]
    fn missing_order_index_sorts_last() {
        let mut c = Contact::new("c1", "Ana", "Florist");
        assert_eq!(c.order_index(), i64::MAX);
        c.order_index = Some(3);
        assert_eq!(c.order_index(), 3);
    }
}
