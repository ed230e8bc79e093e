use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDateTime;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::model::config::GroupThresholds;
use crate::model::item::Record;
use crate::ops::sort::compare_names;

/// Deadline-proximity bucket, in display order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Bucket {
    Overdue,
    Today,
    Tomorrow,
    #[serde(rename = "This Week")]
    ThisWeek,
    #[serde(rename = "Next Week")]
    NextWeek,
    #[serde(rename = "This Month")]
    ThisMonth,
    #[serde(rename = "Next Month")]
    NextMonth,
    Later,
    #[serde(rename = "No date yet")]
    NoDateYet,
}

impl Bucket {
    pub const DISPLAY_ORDER: [Bucket; 9] = [
        Bucket::Overdue,
        Bucket::Today,
        Bucket::Tomorrow,
        Bucket::ThisWeek,
        Bucket::NextWeek,
        Bucket::ThisMonth,
        Bucket::NextMonth,
        Bucket::Later,
        Bucket::NoDateYet,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Bucket::Overdue => "Overdue",
            Bucket::Today => "Today",
            Bucket::Tomorrow => "Tomorrow",
            Bucket::ThisWeek => "This Week",
            Bucket::NextWeek => "Next Week",
            Bucket::ThisMonth => "This Month",
            Bucket::NextMonth => "Next Month",
            Bucket::Later => "Later",
            Bucket::NoDateYet => "No date yet",
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Buckets in display order, each with its items. Empty buckets are absent.
pub type GroupedView<'a, T> = IndexMap<Bucket, Vec<&'a T>>;

/// Whole calendar days from `now`'s date to `deadline`'s date. Times of day
/// are ignored, so 23:59 today and 00:01 tomorrow are one day apart.
pub fn day_difference(deadline: NaiveDateTime, now: NaiveDateTime) -> i64 {
    (deadline.date() - now.date()).num_days()
}

pub fn bucket_for(deadline: Option<NaiveDateTime>, now: NaiveDateTime, t: &GroupThresholds) -> Bucket {
    let Some(deadline) = deadline else {
        return Bucket::NoDateYet;
    };
    match day_difference(deadline, now) {
        d if d < 0 => Bucket::Overdue,
        0 => Bucket::Today,
        1 => Bucket::Tomorrow,
        d if d <= t.this_week => Bucket::ThisWeek,
        d if d <= t.next_week => Bucket::NextWeek,
        d if d <= t.this_month => Bucket::ThisMonth,
        d if d <= t.next_month => Bucket::NextMonth,
        _ => Bucket::Later,
    }
}

/// Deadline ascending, undecided last; equal deadlines by name, then id
fn by_deadline<T: Record>(a: &T, b: &T) -> Ordering {
    let primary = match (a.deadline(), b.deadline()) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    primary
        .then_with(|| compare_names(a.name(), b.name()))
        .then_with(|| a.id().cmp(b.id()))
}

/// Partition `items` into deadline buckets relative to `now`.
///
/// Every item lands in exactly one bucket. Within a bucket items are ordered
/// by deadline, equal deadlines by name ascending whatever the list sort.
pub fn group_items<'a, T: Record>(
    items: &[&'a T],
    now: NaiveDateTime,
    thresholds: &GroupThresholds,
) -> GroupedView<'a, T> {
    let mut buckets: IndexMap<Bucket, Vec<&'a T>> = IndexMap::new();
    for item in items {
        buckets
            .entry(bucket_for(item.deadline(), now, thresholds))
            .or_default()
            .push(*item);
    }

    let mut grouped = GroupedView::with_capacity(buckets.len());
    for bucket in Bucket::DISPLAY_ORDER {
        if let Some(mut members) = buckets.swap_remove(&bucket) {
            members.sort_by(|a, b| by_deadline(*a, *b));
            grouped.insert(bucket, members);
        }
    }
    grouped
}
