use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::ops::reorder::PointerPosition;
use crate::ops::view::ViewAction;
use crate::tui::app::{App, Half, ITEM_HEIGHT, Row};

use super::*;

/// Index into `app.rows()` under a screen row
fn row_index_at(app: &App, screen_row: u16) -> Option<usize> {
    let offset = screen_row.checked_sub(app.list_top)? as usize;
    Some(offset + app.scroll)
}

pub(super) fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => press(app, mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => hover(app, mouse.row),
        MouseEventKind::Up(MouseButton::Left) => {
            if !app.view().drag.is_idle() {
                app.finish_drag();
            }
        }
        MouseEventKind::ScrollDown => step_cursor(app, 1),
        MouseEventKind::ScrollUp => step_cursor(app, -1),
        _ => {}
    }
}

/// Click: a header toggles its group, an item is selected and picked up
fn press(app: &mut App, screen_row: u16) {
    app.status = None;
    let Some(idx) = row_index_at(app, screen_row) else {
        return;
    };
    let (cursor, action) = {
        let rows = app.rows();
        match rows.get(idx) {
            Some(Row::Header { bucket, .. }) => (idx, ViewAction::ToggleGroup(*bucket)),
            Some(row) => {
                let Some(id) = row.item_id() else {
                    return;
                };
                let upper = if row.half() == Some(Half::Lower) { idx - 1 } else { idx };
                (upper, ViewAction::DragStart(id.to_string()))
            }
            None => return,
        }
    };
    app.cursor = cursor;
    app.dispatch(action);
}

/// Drag motion: hover the item under the pointer, or leave the hovered one
fn hover(app: &mut App, screen_row: u16) {
    if app.view().drag.is_idle() {
        return;
    }
    let under = row_index_at(app, screen_row).and_then(|idx| {
        let rows = app.rows();
        let row = rows.get(idx)?;
        let id = row.item_id()?.to_string();
        let top = match row.half()? {
            Half::Upper => screen_row,
            Half::Lower => screen_row.saturating_sub(1),
        };
        Some((id, top))
    });

    let action = match under {
        Some((target, top)) => ViewAction::DragOver {
            target,
            pointer: PointerPosition {
                // centre of the terminal cell
                y: f64::from(screen_row) + 0.5,
                target_top: f64::from(top),
                target_height: f64::from(ITEM_HEIGHT),
            },
        },
        None => match app.view().drag.indicator() {
            Some((hovered, _)) => ViewAction::DragLeave(hovered.to_string()),
            None => return,
        },
    };
    app.dispatch(action);
}
