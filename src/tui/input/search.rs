use crossterm::event::{KeyCode, KeyEvent};

use crate::ops::view::ViewAction;
use crate::tui::app::{App, Mode};
use crate::util::unicode::pop_grapheme;

/// The list filters live while typing; Enter keeps the query, Esc drops it.
pub(super) fn handle_search(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            app.dispatch(ViewAction::SetSearch(String::new()));
            app.mode = Mode::Navigate;
        }
        KeyCode::Enter => app.mode = Mode::Navigate,
        KeyCode::Backspace => {
            let shorter = pop_grapheme(&app.view().search).to_string();
            app.dispatch(ViewAction::SetSearch(shorter));
        }
        KeyCode::Char(c) => {
            let mut query = app.view().search.clone();
            query.push(c);
            app.dispatch(ViewAction::SetSearch(query));
        }
        _ => {}
    }
    app.cursor = 0;
    app.clamp_cursor();
}
