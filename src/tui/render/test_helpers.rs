use ratatui::Terminal;
use ratatui::backend::TestBackend;

use crate::tui::app::App;

/// Render the whole screen into an in-memory buffer and return plain text
/// (no styles). Trailing spaces and trailing blank lines are trimmed.
pub fn render_app(app: &mut App, w: u16, h: u16) -> String {
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal.draw(|frame| super::render(frame, app)).unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::app::{Mode, test_support::app};

    #[test]
    fn status_row_shows_search_prompt() {
        let mut app = app();
        app.mode = Mode::Search;
        app.dispatch(crate::ops::view::ViewAction::SetSearch("cake".into()));
        let out = render_app(&mut app, 60, 8);
        let last = out.lines().last().unwrap_or_default();
        assert!(last.starts_with("/cake\u{258C}"));
        assert!(last.ends_with("Enter keep  Esc clear"));
    }

    #[test]
    fn status_message_replaces_hint_text() {
        let mut app = app();
        app.status = Some("moved t1 before t3".into());
        let out = render_app(&mut app, 40, 6);
        assert!(out.lines().last().unwrap_or_default().starts_with("moved t1 before t3"));
    }

    #[test]
    fn tab_bar_counts_and_chips() {
        let mut app = app();
        app.dispatch(crate::ops::view::ViewAction::ToggleCategory("Venue".into()));
        app.dispatch(crate::ops::view::ViewAction::ToggleCompleted);
        let out = render_app(&mut app, 80, 6);
        let mut lines = out.lines();
        assert_eq!(lines.next(), Some(" To-dos 4   Contacts 3"));
        assert_eq!(
            lines.next(),
            Some(" sort: Deadline  \u{2022} Venue  \u{2022} completed shown  F clear")
        );
    }
}
