//! Drag-and-drop interaction state.
//!
//! The controller only tracks which item is being dragged, which item it
//! hovers, and on which side of it the drop would land. It never writes
//! anything: a completed gesture yields a [`Reorder`] triple and the caller
//! decides how to persist it (see `ops::ordering`).

use serde::Serialize;

/// Where the dragged item lands relative to the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Before,
    After,
}

impl Side {
    /// Above the target's vertical midpoint is `Before`; the midpoint itself
    /// and below is `After`.
    pub fn from_pointer(pointer: PointerPosition) -> Side {
        if pointer.y - pointer.target_top < pointer.target_height / 2.0 {
            Side::Before
        } else {
            Side::After
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Side::Before => "before",
            Side::After => "after",
        }
    }
}

/// Pointer position over a target, in the host's coordinate space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub y: f64,
    pub target_top: f64,
    pub target_height: f64,
}

/// The outcome of a completed drag gesture
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reorder {
    pub source: String,
    pub target: String,
    pub side: Side,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        source: String,
    },
    Hovering {
        source: String,
        target: String,
        side: Side,
    },
}

impl DragState {
    /// Begin dragging `source`. Starting a new drag discards any gesture in
    /// progress.
    pub fn start(&self, source: &str) -> DragState {
        DragState::Dragging {
            source: source.to_string(),
        }
    }

    /// Pointer moved over `target`. Ignored when idle or when the target is
    /// the dragged item itself.
    pub fn over(&self, target: &str, pointer: PointerPosition) -> DragState {
        let Some(source) = self.source() else {
            return self.clone();
        };
        if source == target {
            return self.clone();
        }
        DragState::Hovering {
            source: source.to_string(),
            target: target.to_string(),
            side: Side::from_pointer(pointer),
        }
    }

    /// Pointer left `target` without dropping. Only clears the hover if
    /// `target` is the one currently hovered.
    pub fn leave(&self, target: &str) -> DragState {
        match self {
            DragState::Hovering {
                source,
                target: hovered,
                ..
            } if hovered == target => DragState::Dragging {
                source: source.clone(),
            },
            _ => self.clone(),
        }
    }

    /// Finish the gesture. Always returns to `Idle`; the triple is only
    /// produced when hovering and both items still exist in the caller's
    /// current collection.
    pub fn drop_with(&self, exists: impl Fn(&str) -> bool) -> (DragState, Option<Reorder>) {
        let outcome = match self {
            DragState::Hovering {
                source,
                target,
                side,
            } if exists(source.as_str()) && exists(target.as_str()) => Some(Reorder {
                source: source.clone(),
                target: target.clone(),
                side: *side,
            }),
            _ => None,
        };
        (DragState::Idle, outcome)
    }

    /// Drag cancelled or ended outside any target
    pub fn end(&self) -> DragState {
        DragState::Idle
    }

    pub fn source(&self) -> Option<&str> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { source } | DragState::Hovering { source, .. } => {
                Some(source.as_str())
            }
        }
    }

    /// Current drop indicator: hovered item and side
    pub fn indicator(&self) -> Option<(&str, Side)> {
        match self {
            DragState::Hovering { target, side, .. } => Some((target.as_str(), *side)),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }
}
