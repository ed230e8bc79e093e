use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::ops::reorder::Side;
use crate::ops::sort::SortKey;
use crate::ops::view::ViewAction;
use crate::tui::app::{App, Half, Mode, Row, Tab};

use super::*;

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) {
    app.status = None;
    match (key.modifiers, key.code) {
        (_, KeyCode::Char('q')) => app.should_quit = true,
        (m, KeyCode::Char('c')) if m.contains(KeyModifiers::CONTROL) => app.should_quit = true,

        (_, KeyCode::Tab) | (_, KeyCode::BackTab) => app.switch_tab(),
        (_, KeyCode::Char('/')) => app.mode = Mode::Search,
        (_, KeyCode::Esc) => {
            if app.view().drag.is_idle() {
                app.dispatch(ViewAction::SetSearch(String::new()));
            } else {
                app.dispatch(ViewAction::DragEnd);
            }
        }

        // Cursor
        (_, KeyCode::Char('j')) | (_, KeyCode::Down) => step_cursor(app, 1),
        (_, KeyCode::Char('k')) | (_, KeyCode::Up) => step_cursor(app, -1),
        (_, KeyCode::Char('g')) | (_, KeyCode::Home) => app.cursor = 0,
        (_, KeyCode::Char('G')) | (_, KeyCode::End) => {
            app.cursor = usize::MAX;
            app.clamp_cursor();
        }
        (_, KeyCode::Enter) | (_, KeyCode::Char(' ')) => toggle_group_at_cursor(app),

        // Chips
        (_, KeyCode::Char('s')) => {
            let next = app.view().sort.next();
            app.dispatch(ViewAction::SetSort(next));
        }
        (_, KeyCode::Char('f')) => {
            let options = app.categories();
            let next = next_category(&options, &app.view().categories);
            app.dispatch(ViewAction::ClearCategories);
            if let Some(cat) = next {
                app.dispatch(ViewAction::ToggleCategory(cat));
            }
        }
        (_, KeyCode::Char('F')) => {
            app.dispatch(ViewAction::ClearCategories);
            app.dispatch(ViewAction::ResetSort);
        }
        (_, KeyCode::Char('h')) if app.tab == Tab::Todos => {
            app.dispatch(ViewAction::ToggleCompleted);
        }

        // Move the selected item one place
        (_, KeyCode::Char('K')) => move_selected(app, -1),
        (_, KeyCode::Char('J')) => move_selected(app, 1),
        _ => {}
    }
    app.clamp_cursor();
}

fn toggle_group_at_cursor(app: &mut App) {
    let bucket = match app.rows().get(app.cursor) {
        Some(Row::Header { bucket, .. }) => *bucket,
        _ => return,
    };
    app.dispatch(ViewAction::ToggleGroup(bucket));
}

/// Drop the selected item before the previous item (`dir` = -1) or after
/// the next one (`dir` = 1), as listed on screen. Only offered where the
/// screen shows the manual order; grouped to-dos are reordered by dragging.
fn move_selected(app: &mut App, dir: isize) {
    if app.tab == Tab::Todos {
        app.status = Some("to-dos are grouped by deadline; drag with the mouse to reorder".into());
        return;
    }
    if app.view().sort != SortKey::Manual {
        app.status = Some("switch to manual sort (s) to move items".into());
        return;
    }
    let (source, target) = {
        let rows = app.rows();
        let items: Vec<&str> = rows
            .iter()
            .filter(|r| r.half() == Some(Half::Upper))
            .filter_map(|r| r.item_id())
            .collect();
        let Some(current) = rows.get(app.cursor).and_then(|r| r.item_id()) else {
            return;
        };
        let Some(pos) = items.iter().position(|id| *id == current) else {
            return;
        };
        let Some(target) = pos.checked_add_signed(dir).and_then(|t| items.get(t)) else {
            return;
        };
        (current.to_string(), target.to_string())
    };
    let side = if dir < 0 { Side::Before } else { Side::After };
    keyboard_drop(app, &source, &target, side);
}
