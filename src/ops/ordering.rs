use serde::Serialize;

use crate::model::item::Record;
use crate::ops::reorder::{Reorder, Side};

/// A single ordering-index write
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderChange {
    pub id: String,
    pub from: i64,
    pub to: i64,
}

/// Current manual order: ordering index ascending, file position breaking
/// ties.
pub fn manual_order<T: Record>(items: &[T]) -> Vec<&T> {
    let mut ordered: Vec<(usize, &T)> = items.iter().enumerate().collect();
    ordered.sort_by_key(|(pos, item)| (item.order_index(), *pos));
    ordered.into_iter().map(|(_, item)| item).collect()
}

/// Compute the ordering-index writes for a completed drag.
///
/// The dragged item moves next to the target and the whole list is
/// renumbered densely from 0. Only items whose index actually changes are
/// returned, so the store rewrites the smallest possible set. Returns nothing
/// if either id is missing or the item is dropped onto itself.
pub fn reorder_indices<T: Record>(items: &[T], reorder: &Reorder) -> Vec<OrderChange> {
    if reorder.source == reorder.target {
        return Vec::new();
    }
    let mut ordered = manual_order(items);

    let Some(from) = ordered.iter().position(|t| t.id() == reorder.source) else {
        return Vec::new();
    };
    if !ordered.iter().any(|t| t.id() == reorder.target) {
        return Vec::new();
    }

    let moved = ordered.remove(from);
    let Some(target) = ordered.iter().position(|t| t.id() == reorder.target) else {
        return Vec::new();
    };
    let insert_at = match reorder.side {
        Side::Before => target,
        Side::After => target + 1,
    };
    ordered.insert(insert_at, moved);

    ordered
        .iter()
        .enumerate()
        .filter_map(|(pos, item)| {
            let to = pos as i64;
            (item.order_index() != to).then(|| OrderChange {
                id: item.id().to_string(),
                from: item.order_index(),
                to,
            })
        })
        .collect()
}
