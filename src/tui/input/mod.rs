mod mouse;
mod navigate;
mod search;

use crossterm::event::{KeyCode, KeyEvent, MouseEvent};

use super::app::{App, Mode};
use crate::ops::reorder::{PointerPosition, Side};
use crate::ops::view::ViewAction;

use mouse::handle_mouse_event;
use navigate::handle_navigate;
use search::handle_search;

/// Handle a key event in the current mode
pub fn handle_key(app: &mut App, key: KeyEvent) {
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
    }
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    handle_mouse_event(app, mouse);
}

/// Move the cursor to the next selectable row in `dir` (+1 / -1)
fn step_cursor(app: &mut App, dir: isize) {
    let rows = app.rows();
    let mut c = app.cursor as isize;
    loop {
        c += dir;
        if c < 0 || c as usize >= rows.len() {
            return;
        }
        if rows[c as usize].is_selectable() {
            break;
        }
    }
    app.cursor = c as usize;
}

/// Drive a whole drag gesture from the keyboard: pick up `source`, hover
/// the chosen half of `target`, release.
fn keyboard_drop(app: &mut App, source: &str, target: &str, side: Side) {
    let pointer = PointerPosition {
        y: match side {
            Side::Before => 0.5,
            Side::After => 1.5,
        },
        target_top: 0.0,
        target_height: f64::from(super::app::ITEM_HEIGHT),
    };
    app.dispatch(ViewAction::DragStart(source.to_string()));
    app.dispatch(ViewAction::DragOver {
        target: target.to_string(),
        pointer,
    });
    app.finish_drag();
    if let Some(row) = app.row_of(source) {
        app.cursor = row;
    }
}

/// The category the `f` key selects next: the first one when none or
/// several are selected, otherwise the following one, then none.
fn next_category(options: &[String], current: &std::collections::BTreeSet<String>) -> Option<String> {
    if current.len() != 1 {
        return options.first().cloned();
    }
    let selected = current.iter().next()?;
    match options.iter().position(|o| o == selected) {
        Some(pos) => options.get(pos + 1).cloned(),
        None => options.first().cloned(),
    }
}
