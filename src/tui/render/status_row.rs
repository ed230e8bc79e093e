use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode, Tab};
use crate::util::unicode::display_width;

const NAVIGATE_HINT: &str = "/ search  s sort  f filter  J/K move  Tab switch  q quit";
const TODO_HINT: &str = "/ search  s sort  f filter  h done  drag move  Tab switch  q quit";
const SEARCH_HINT: &str = "Enter keep  Esc clear";

/// Bottom line: the search prompt, the last status message, or key hints
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;
    let dim = Style::default().fg(app.theme.dim).bg(bg);

    let (mut spans, hint) = match app.mode {
        Mode::Search => (
            vec![
                Span::styled(
                    format!("/{}", app.view().search),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
            ],
            SEARCH_HINT,
        ),
        Mode::Navigate => {
            let mut spans = Vec::new();
            if let Some(msg) = &app.status {
                let color = if msg.starts_with("error") || msg.starts_with("reload") {
                    app.theme.red
                } else {
                    app.theme.green
                };
                spans.push(Span::styled(msg.clone(), Style::default().fg(color).bg(bg)));
            } else if !app.view().search.is_empty() {
                spans.push(Span::styled(format!("/{}", app.view().search), dim));
            }
            let hint = if app.tab == Tab::Todos { TODO_HINT } else { NAVIGATE_HINT };
            (spans, hint)
        }
    };

    let used: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    if used + display_width(hint) + 1 < width {
        let pad = width - used - display_width(hint);
        spans.push(Span::styled(" ".repeat(pad), Style::default().bg(bg)));
        spans.push(Span::styled(hint, dim));
    }

    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        area,
    );
}
