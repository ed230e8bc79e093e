use chrono::NaiveDateTime;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::cli::output::format_timestamp;
use crate::model::item::{Contact, TodoItem};
use crate::ops::reorder::Side;
use crate::tui::app::{App, Half, Row, Tab};
use crate::tui::theme::Theme;
use crate::util::unicode::{display_width, truncate_to_width};

/// Left gutter: drag handle or drop indicator
const GUTTER: usize = 2;

/// Per-row drag decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    None,
    /// The item being dragged
    Source,
    /// Drop lands on this side of this row's item
    Drop(Side),
}

fn marker_for(app: &App, row: &Row<'_>) -> Marker {
    let Some(id) = row.item_id() else {
        return Marker::None;
    };
    let drag = &app.view().drag;
    if let Some((target, side)) = drag.indicator()
        && target == id
    {
        let on_this_half = matches!(
            (side, row.half()),
            (Side::Before, Some(Half::Upper)) | (Side::After, Some(Half::Lower))
        );
        return if on_this_half { Marker::Drop(side) } else { Marker::None };
    }
    if drag.source() == Some(id) {
        return Marker::Source;
    }
    Marker::None
}

fn gutter_span(marker: Marker, theme: &Theme) -> Span<'static> {
    match marker {
        Marker::None => Span::raw("  "),
        Marker::Source => Span::styled("\u{2261} ", Style::default().fg(theme.dim)),
        Marker::Drop(Side::Before) => Span::styled(
            "\u{25B2} ",
            Style::default().fg(theme.drop_marker).add_modifier(Modifier::BOLD),
        ),
        Marker::Drop(Side::After) => Span::styled(
            "\u{25BC} ",
            Style::default().fg(theme.drop_marker).add_modifier(Modifier::BOLD),
        ),
    }
}

fn todo_line(todo: &TodoItem, half: Half, now: NaiveDateTime, theme: &Theme, width: usize) -> Vec<Span<'static>> {
    match half {
        Half::Upper => {
            let check = if todo.is_completed { "[x] " } else { "[ ] " };
            let name_style = if todo.is_completed {
                Style::default().fg(theme.dim).add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(theme.text_bright)
            };
            vec![
                Span::styled(check, Style::default().fg(theme.text)),
                Span::styled(truncate_to_width(&todo.name, width.saturating_sub(4)), name_style),
            ]
        }
        Half::Lower => {
            let mut spans = vec![Span::raw("    ")];
            let mut used = 4;
            if !todo.category.is_empty() {
                used += display_width(&todo.category);
                spans.push(Span::styled(
                    todo.category.clone(),
                    Style::default().fg(theme.category_color(&todo.category)),
                ));
            }
            if let Some(deadline) = todo.deadline {
                let due = format!("  due {}", format_timestamp(deadline));
                used += display_width(&due);
                let color = if deadline < now && !todo.is_completed {
                    theme.red
                } else {
                    theme.text
                };
                spans.push(Span::styled(due, Style::default().fg(color)));
            }
            if let Some(note) = todo.note.as_deref().filter(|n| !n.is_empty()) {
                let room = width.saturating_sub(used + 2);
                if room > 1 {
                    let first_line = note.lines().next().unwrap_or_default();
                    spans.push(Span::styled(
                        format!("  {}", truncate_to_width(first_line, room)),
                        Style::default().fg(theme.dim),
                    ));
                }
            }
            spans
        }
    }
}

fn contact_line(contact: &Contact, half: Half, app: &App, width: usize) -> Vec<Span<'static>> {
    let theme = &app.theme;
    match half {
        Half::Upper => vec![Span::styled(
            truncate_to_width(&contact.name, width),
            Style::default().fg(theme.text_bright),
        )],
        Half::Lower => {
            let mut spans = vec![Span::raw("  ")];
            if !contact.category.is_empty() {
                spans.push(Span::styled(
                    contact.category.clone(),
                    Style::default().fg(theme.category_color(&contact.category)),
                ));
            }
            let details: Vec<String> = [contact.email.clone(), contact.phone.clone()]
                .into_iter()
                .flatten()
                .chain(
                    app.activity
                        .get(&contact.id)
                        .map(|ts| format!("last {}", format_timestamp(*ts))),
                )
                .collect();
            if !details.is_empty() {
                let room = width.saturating_sub(display_width(&contact.category) + 4);
                spans.push(Span::styled(
                    format!("  {}", truncate_to_width(&details.join(" \u{00B7} "), room)),
                    Style::default().fg(theme.dim),
                ));
            }
            spans
        }
    }
}

fn empty_message(app: &App) -> &'static str {
    let (total, noun) = match app.tab {
        Tab::Todos => (app.todos.len(), "to-dos"),
        Tab::Contacts => (app.contacts.len(), "contacts"),
    };
    match (total, noun) {
        (0, "to-dos") => "No to-dos yet",
        (0, _) => "No contacts yet",
        (_, "to-dos") => "No to-dos match",
        _ => "No contacts match",
    }
}

/// Keep the cursor's item (both of its lines) on screen
fn adjust_scroll(app: &mut App, height: usize, total: usize) {
    if height == 0 {
        return;
    }
    let last_needed = (app.cursor + 1).min(total.saturating_sub(1));
    if app.cursor < app.scroll {
        app.scroll = app.cursor;
    } else if last_needed >= app.scroll + height {
        app.scroll = last_needed + 1 - height;
    }
    app.scroll = app.scroll.min(total.saturating_sub(height));
}

pub fn render_list_view(frame: &mut Frame, app: &mut App, area: Rect) {
    app.list_top = area.y;
    let width = area.width as usize;
    let body_width = width.saturating_sub(GUTTER);
    let now = app.now();
    let bg = app.theme.background;

    let lines: Vec<Line<'static>> = {
        let rows = app.rows();
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                let selected = i == app.cursor
                    || (row.half() == Some(Half::Lower) && i == app.cursor + 1);
                let mut spans = Vec::new();
                match row {
                    Row::Header { bucket, count, open } => {
                        let arrow = if *open { "\u{25BE}" } else { "\u{25B8}" };
                        spans.push(Span::styled(
                            format!("{} {} ({})", arrow, bucket.label(), count),
                            Style::default()
                                .fg(app.theme.bucket_color(*bucket))
                                .add_modifier(Modifier::BOLD),
                        ));
                    }
                    Row::Todo(todo, half) => {
                        spans.push(gutter_span(marker_for(app, row), &app.theme));
                        spans.extend(todo_line(todo, *half, now, &app.theme, body_width));
                    }
                    Row::Contact(contact, half) => {
                        spans.push(gutter_span(marker_for(app, row), &app.theme));
                        spans.extend(contact_line(contact, *half, app, body_width));
                    }
                }
                let line = Line::from(spans);
                if selected {
                    line.style(Style::default().bg(app.theme.selection_bg))
                } else {
                    line
                }
            })
            .collect()
    };

    if lines.is_empty() {
        let msg = Line::from(Span::styled(
            format!("  {}", empty_message(app)),
            Style::default().fg(app.theme.dim),
        ));
        frame.render_widget(Paragraph::new(msg).style(Style::default().bg(bg)), area);
        return;
    }

    let height = area.height as usize;
    adjust_scroll(app, height, lines.len());
    let visible: Vec<Line> = lines.into_iter().skip(app.scroll).take(height).collect();
    frame.render_widget(Paragraph::new(visible).style(Style::default().bg(bg)), area);
}

#[cfg(test)]
mod tests {
    use super::super::test_helpers::render_app;
    use crate::ops::reorder::PointerPosition;
    use crate::ops::view::ViewAction;
    use crate::tui::app::test_support::app;
    use insta::assert_snapshot;

    #[test]
    fn grouped_todos() {
        let mut app = app();
        let out = render_app(&mut app, 50, 14);
        assert_snapshot!(out, @r"
         To-dos 4   Contacts 3
         sort: Deadline  F clear
        ▾ Overdue (1)
          [ ] Book venue
              Venue  due 2026-10-10
        ▾ Today (1)
          [ ] Cake tasting
              Baker  due 2026-10-17
        ▾ This Week (1)
          [ ] Order favors
              Favors  due 2026-10-20
        ▾ No date yet (1)
          [ ] Send invites
        ");
    }

    #[test]
    fn drop_indicator_follows_pointer() {
        let mut app = app();
        app.dispatch(ViewAction::DragStart("t1".into()));
        app.dispatch(ViewAction::DragOver {
            target: "t3".into(),
            pointer: PointerPosition {
                y: 1.5,
                target_top: 0.0,
                target_height: 2.0,
            },
        });
        let out = render_app(&mut app, 50, 14);
        assert!(out.contains("\u{2261} [ ] Book venue"));
        assert!(out.contains("\u{25BC}     Favors  due 2026-10-20"));
        assert!(!out.contains('\u{25B2}'));
    }

    #[test]
    fn collapsed_group_hides_items() {
        let mut app = app();
        app.dispatch(ViewAction::ToggleGroup(crate::ops::group::Bucket::Overdue));
        let out = render_app(&mut app, 50, 14);
        assert!(out.contains("\u{25B8} Overdue (1)"));
        assert!(!out.contains("Book venue"));
    }

    #[test]
    fn contacts_tab_lists_names() {
        let mut app = app();
        app.switch_tab();
        let out = render_app(&mut app, 50, 10);
        assert!(out.contains("  Ana Florals"));
        assert!(out.contains("Florist"));
        assert!(!out.contains("No contacts"));
    }

    #[test]
    fn no_matches_message() {
        let mut app = app();
        app.dispatch(ViewAction::SetSearch("zzzzzz".into()));
        let out = render_app(&mut app, 50, 10);
        assert!(out.contains("No to-dos match"));
    }

    #[test]
    fn scroll_keeps_cursor_visible() {
        let mut app = app();
        app.cursor = 10; // t4 upper
        render_app(&mut app, 50, 8);
        // 8 rows - 2 tab bar - 1 status = 5 list rows; t4 needs rows 10 and 11
        assert_eq!(app.scroll, 7);
    }
}
