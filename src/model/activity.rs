use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Latest activity timestamp per record id
pub type ActivityMap = HashMap<String, NaiveDateTime>;

/// A message exchanged with a contact. Only the contact and timestamp are
/// used for ordering; the rest rides along for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    #[serde(default)]
    pub id: String,
    pub contact_id: String,
    #[serde(default, deserialize_with = "crate::model::item::deserialize_timestamp")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
}

/// Build the "last message" map: newest message timestamp per contact.
/// Messages without a usable timestamp are skipped.
pub fn last_activity(messages: &[Message]) -> ActivityMap {
    let mut latest = ActivityMap::new();
    for msg in messages {
        let Some(at) = msg.created_at else {
            continue;
        };
        latest
            .entry(msg.contact_id.clone())
            .and_modify(|cur| {
                if *cur < at {
                    *cur = at;
                }
            })
            .or_insert(at);
    }
    latest
}
