use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;

use crate::model::activity::ActivityMap;
use crate::model::item::{Contact, TodoItem};
use crate::ops::group::{Bucket, GroupedView};
use crate::ops::ordering::OrderChange;
use crate::ops::reorder::Reorder;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TodoJson {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    pub is_completed: bool,
    pub order_index: Option<i64>,
}

#[derive(Serialize)]
pub struct ContactJson {
    pub id: String,
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_activity: Option<String>,
    pub order_index: Option<i64>,
}

#[derive(Serialize)]
pub struct GroupJson {
    pub group: Bucket,
    pub todos: Vec<TodoJson>,
}

#[derive(Serialize)]
pub struct ReorderJson<'a> {
    #[serde(flatten)]
    pub reorder: &'a Reorder,
    pub changes: &'a [OrderChange],
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

/// Date only when the time is midnight, minutes otherwise
pub fn format_timestamp(ts: NaiveDateTime) -> String {
    if ts.hour() == 0 && ts.minute() == 0 && ts.second() == 0 {
        ts.format("%Y-%m-%d").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M").to_string()
    }
}

pub fn todo_to_json(todo: &TodoItem) -> TodoJson {
    TodoJson {
        id: todo.id.clone(),
        name: todo.name.clone(),
        category: todo.category.clone(),
        note: todo.note.clone(),
        deadline: todo.deadline.map(format_timestamp),
        created_at: todo.created_at.map(format_timestamp),
        is_completed: todo.is_completed,
        order_index: todo.order_index,
    }
}

pub fn contact_to_json(contact: &Contact, activity: &ActivityMap) -> ContactJson {
    ContactJson {
        id: contact.id.clone(),
        name: contact.name.clone(),
        category: contact.category.clone(),
        email: contact.email.clone(),
        phone: contact.phone.clone(),
        website: contact.website.clone(),
        last_activity: activity.get(&contact.id).copied().map(format_timestamp),
        order_index: contact.order_index,
    }
}

pub fn grouped_to_json(grouped: &GroupedView<'_, TodoItem>) -> Vec<GroupJson> {
    grouped
        .iter()
        .map(|(bucket, todos)| GroupJson {
            group: *bucket,
            todos: todos.iter().map(|t| todo_to_json(t)).collect(),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// `[x] t1 Book venue (Venue) due 2026-11-01`
pub fn format_todo_line(todo: &TodoItem) -> String {
    let check = if todo.is_completed { 'x' } else { ' ' };
    let category = if todo.category.is_empty() {
        String::new()
    } else {
        format!(" ({})", todo.category)
    };
    let due = todo
        .deadline
        .map(|d| format!(" due {}", format_timestamp(d)))
        .unwrap_or_default();
    format!("[{}] {} {}{}{}", check, todo.id, todo.name, category, due)
}

/// `c1 Ana Florals (Florist) <ana@example.com> last 2026-10-16 09:30`
pub fn format_contact_line(contact: &Contact, activity: &ActivityMap) -> String {
    let mut line = format!("{} {}", contact.id, contact.name);
    if !contact.category.is_empty() {
        line.push_str(&format!(" ({})", contact.category));
    }
    if let Some(email) = &contact.email {
        line.push_str(&format!(" <{}>", email));
    }
    if let Some(ts) = activity.get(&contact.id) {
        line.push_str(&format!(" last {}", format_timestamp(*ts)));
    }
    line
}

pub fn format_group_header(bucket: Bucket, count: usize) -> String {
    format!("== {} ({}) ==", bucket, count)
}

/// Grouped to-do listing; groups separated by a blank line
pub fn format_grouped(grouped: &GroupedView<'_, TodoItem>) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, (bucket, todos)) in grouped.iter().enumerate() {
        if i > 0 {
            lines.push(String::new());
        }
        lines.push(format_group_header(*bucket, todos.len()));
        lines.extend(todos.iter().map(|t| format_todo_line(t)));
    }
    lines
}

pub fn format_order_change(change: &OrderChange) -> String {
    format!("{}: {} -> {}", change.id, change.from, change.to)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::config::GroupThresholds;
    use crate::model::item::parse_timestamp;
    use crate::ops::group::group_items;
    use insta::assert_snapshot;

    fn todos() -> Vec<TodoItem> {
        let mut items = vec![
            TodoItem::new("t1", "Book venue", "Venue"),
            TodoItem::new("t2", "Cake tasting", "Baker"),
            TodoItem::new("t3", "Pick songs", ""),
        ];
        items[0].deadline = parse_timestamp("2026-10-17");
        items[1].deadline = parse_timestamp("2026-10-18T15:30:00");
        items[2].is_completed = true;
        items
    }

    #[test]
    fn todo_lines() {
        let items = todos();
        let text: Vec<String> = items.iter().map(format_todo_line).collect();
        assert_snapshot!(text.join("\n"), @r"
        [ ] t1 Book venue (Venue) due 2026-10-17
        [ ] t2 Cake tasting (Baker) due 2026-10-18 15:30
        [x] t3 Pick songs
        ");
    }

    #[test]
    fn grouped_listing() {
        let items = todos();
        let refs: Vec<&TodoItem> = items.iter().collect();
        let now = parse_timestamp("2026-10-17T08:00:00").unwrap();
        let grouped = group_items(&refs, now, &GroupThresholds::default());
        assert_snapshot!(format_grouped(&grouped).join("\n"), @r"
        == Today (1) ==
        [ ] t1 Book venue (Venue) due 2026-10-17

        == Tomorrow (1) ==
        [ ] t2 Cake tasting (Baker) due 2026-10-18 15:30

        == No date yet (1) ==
        [x] t3 Pick songs
        ");
    }

    #[test]
    fn contact_line_with_activity() {
        let mut c = Contact::new("c1", "Ana Florals", "Florist");
        c.email = Some("ana@example.com".into());
        let mut activity = ActivityMap::new();
        activity.insert("c1".into(), parse_timestamp("2026-10-16T09:30:00").unwrap());
        assert_eq!(
            format_contact_line(&c, &activity),
            "c1 Ana Florals (Florist) <ana@example.com> last 2026-10-16 09:30"
        );
        assert_eq!(
            format_contact_line(&c, &ActivityMap::new()),
            "c1 Ana Florals (Florist) <ana@example.com>"
        );
    }

    #[test]
    fn group_json_uses_labels() {
        let items = todos();
        let refs: Vec<&TodoItem> = items.iter().collect();
        let now = parse_timestamp("2026-10-17T08:00:00").unwrap();
        let grouped = group_items(&refs, now, &GroupThresholds::default());
        let json = serde_json::to_value(grouped_to_json(&grouped)).unwrap();
        assert_eq!(json[0]["group"], "Today");
        assert_eq!(json[2]["group"], "No date yet");
        assert_eq!(json[2]["todos"][0]["is_completed"], true);
        assert!(json[2]["todos"][0].get("deadline").is_none());
    }
}
