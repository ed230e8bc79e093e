use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Tab};

/// Tabs on the first line, active view chips on the second
pub fn render_tab_bar(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let mut tabs: Vec<Span> = Vec::new();
    for tab in [Tab::Todos, Tab::Contacts] {
        let count = match tab {
            Tab::Todos => app.todos.iter().filter(|t| !t.is_completed).count(),
            Tab::Contacts => app.contacts.len(),
        };
        let label = format!(" {} {} ", tab.label(), count);
        let style = if tab == app.tab {
            Style::default()
                .fg(app.theme.background)
                .bg(app.theme.highlight)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim).bg(bg)
        };
        tabs.push(Span::styled(label, style));
        tabs.push(Span::styled(" ", Style::default().bg(bg)));
    }

    let lines = vec![Line::from(tabs), chips_line(app)];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

fn chips_line(app: &App) -> Line<'static> {
    let view = app.view();
    let dim = Style::default().fg(app.theme.dim);
    let chip = Style::default().fg(app.theme.text_bright);

    let mut spans = vec![
        Span::styled(" sort: ", dim),
        Span::styled(view.sort.label().to_string(), chip),
    ];
    for cat in &view.categories {
        spans.push(Span::styled("  \u{2022} ", dim));
        spans.push(Span::styled(
            cat.clone(),
            Style::default().fg(app.theme.category_color(cat)),
        ));
    }
    if app.tab == Tab::Todos && view.show_completed {
        spans.push(Span::styled("  \u{2022} ", dim));
        spans.push(Span::styled("completed shown", chip));
    }
    if view.has_chips() {
        spans.push(Span::styled("  F clear", dim));
    }
    Line::from(spans)
}
