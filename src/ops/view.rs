use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDateTime;

use crate::model::activity::ActivityMap;
use crate::model::config::{GroupThresholds, SearchSettings};
use crate::model::item::Record;
use crate::ops::filter::{filter_categories, filter_completed};
use crate::ops::group::{Bucket, GroupedView, group_items};
use crate::ops::matcher::FuzzyIndex;
use crate::ops::reorder::{DragState, PointerPosition, Reorder};
use crate::ops::sort::{SortKey, sort_items};

/// Everything the user has dialled into a list screen. Replaced wholesale on
/// every action; never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewState {
    pub search: String,
    /// Empty = no category filter
    pub categories: BTreeSet<String>,
    pub sort: SortKey,
    pub show_completed: bool,
    /// Explicit open/closed choices; groups not listed are open
    pub open_groups: BTreeMap<Bucket, bool>,
    pub drag: DragState,
}

/// A user interaction on a list screen
#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    SetSearch(String),
    ToggleCategory(String),
    ClearCategory(String),
    ClearCategories,
    SetSort(SortKey),
    /// Back to the default chip-less sort (name A-Z)
    ResetSort,
    ToggleCompleted,
    ToggleGroup(Bucket),
    DragStart(String),
    DragOver {
        target: String,
        pointer: PointerPosition,
    },
    DragLeave(String),
    DragEnd,
}

impl ViewState {
    pub fn with_sort(sort: SortKey) -> Self {
        ViewState {
            sort,
            ..Default::default()
        }
    }

    /// Apply one action and return the next state
    pub fn apply(&self, action: ViewAction) -> ViewState {
        let mut next = self.clone();
        match action {
            ViewAction::SetSearch(text) => next.search = text,
            ViewAction::ToggleCategory(cat) => {
                if !next.categories.remove(&cat) {
                    next.categories.insert(cat);
                }
            }
            ViewAction::ClearCategory(cat) => {
                next.categories.remove(&cat);
            }
            ViewAction::ClearCategories => next.categories.clear(),
            ViewAction::SetSort(key) => next.sort = key,
            ViewAction::ResetSort => next.sort = SortKey::default(),
            ViewAction::ToggleCompleted => next.show_completed = !next.show_completed,
            ViewAction::ToggleGroup(bucket) => {
                let open = self.is_group_open(bucket);
                next.open_groups.insert(bucket, !open);
            }
            ViewAction::DragStart(id) => next.drag = self.drag.start(&id),
            ViewAction::DragOver { target, pointer } => next.drag = self.drag.over(&target, pointer),
            ViewAction::DragLeave(target) => next.drag = self.drag.leave(&target),
            ViewAction::DragEnd => next.drag = self.drag.end(),
        }
        next
    }

    /// Drop the dragged item. `items` is the caller's current snapshot; a
    /// source or target that has disappeared from it cancels the gesture.
    pub fn drop_on<T: Record>(&self, items: &[T]) -> (ViewState, Option<Reorder>) {
        let (drag, outcome) = self
            .drag
            .drop_with(|id| items.iter().any(|item| item.id() == id));
        let next = ViewState {
            drag,
            ..self.clone()
        };
        (next, outcome)
    }

    pub fn is_group_open(&self, bucket: Bucket) -> bool {
        self.open_groups.get(&bucket).copied().unwrap_or(true)
    }

    /// True when category filters or sort differ from a fresh state. The
    /// search text has its own box and is not a chip.
    pub fn has_chips(&self) -> bool {
        !self.categories.is_empty() || self.sort != SortKey::default()
    }
}

/// Inputs to a derivation that come from outside the view state
#[derive(Debug, Clone, Copy)]
pub struct DeriveContext<'c> {
    pub now: NaiveDateTime,
    pub activity: &'c ActivityMap,
    pub thresholds: &'c GroupThresholds,
}

/// The view-derivation pipeline for one collection snapshot.
///
/// Building it indexes the snapshot for search; derivations are then cheap
/// pure functions of the view state. Rebuild on every new snapshot.
pub struct Pipeline<'a, T> {
    index: FuzzyIndex<'a, T>,
}

impl<'a, T: Record> Pipeline<'a, T> {
    pub fn new(items: &'a [T], search: &SearchSettings) -> Self {
        Pipeline {
            index: FuzzyIndex::from_settings(items, search),
        }
    }

    pub fn items(&self) -> &'a [T] {
        self.index.items()
    }

    /// search → filter → sort
    pub fn list(&self, state: &ViewState, activity: &ActivityMap) -> Vec<&'a T> {
        let matched: Vec<&'a T> = self.index.search(&state.search).collect();
        let visible = filter_completed(&matched, state.show_completed);
        let filtered = filter_categories(&visible, &state.categories);
        sort_items(&filtered, state.sort, activity)
    }

    /// search → filter → sort → group
    pub fn grouped(&self, state: &ViewState, ctx: DeriveContext<'_>) -> GroupedView<'a, T> {
        let sorted = self.list(state, ctx.activity);
        group_items(&sorted, ctx.now, ctx.thresholds)
    }
}
