use std::collections::BTreeSet;

use crate::model::item::Record;

/// Keep items whose category is in `active`. An empty set means "no filter",
/// not "nothing matches".
pub fn filter_categories<'a, T: Record>(items: &[&'a T], active: &BTreeSet<String>) -> Vec<&'a T> {
    if active.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .copied()
        .filter(|item| active.contains(item.category()))
        .collect()
}

/// Drop completed items unless `show_completed` is set
pub fn filter_completed<'a, T: Record>(items: &[&'a T], show_completed: bool) -> Vec<&'a T> {
    if show_completed {
        return items.to_vec();
    }
    items
        .iter()
        .copied()
        .filter(|item| !item.is_completed())
        .collect()
}
