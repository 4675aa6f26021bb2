use chrono::Utc;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Task;
use crate::tui::app::{App, Mode};
use crate::util::time::relative_time;

/// Render the task list: the new-task input row (Insert mode), the pending
/// section with its empty-state placeholder, then the completed section whose
/// header only appears when there is something in it.
pub fn render_list(frame: &mut Frame, app: &App, area: Rect) {
    let now = Utc::now();
    let pending: Vec<&Task> = app.tasks.iter().filter(|t| !t.completed).collect();
    let completed: Vec<&Task> = app.tasks.iter().filter(|t| t.completed).collect();

    // (is_cursor_row, line) so the scroll window can follow the cursor
    let mut rows: Vec<(bool, Line)> = Vec::new();

    if app.mode == Mode::Insert {
        rows.push((false, input_row(app)));
    }

    if pending.is_empty() {
        rows.push((
            false,
            Line::from(Span::styled(
                " ✓ No pending tasks. Time to relax!",
                Style::default().fg(app.theme.dim).bg(app.theme.background),
            )),
        ));
    } else {
        for (i, task) in pending.iter().enumerate() {
            let is_cursor = app.cursor == i;
            rows.push((is_cursor, task_row(app, task, is_cursor, now)));
        }
    }

    if !completed.is_empty() {
        rows.push((false, Line::from("")));
        rows.push((
            false,
            Line::from(Span::styled(
                format!(" ── Done ({}) ──", completed.len()),
                Style::default().fg(app.theme.dim).bg(app.theme.background),
            )),
        ));
        for (i, task) in completed.iter().enumerate() {
            let is_cursor = app.cursor == pending.len() + i;
            rows.push((is_cursor, task_row(app, task, is_cursor, now)));
        }
    }

    // Scroll so the cursor row stays visible
    let height = area.height as usize;
    let cursor_row = rows.iter().position(|(c, _)| *c).unwrap_or(0);
    let scroll = cursor_row.saturating_sub(height.saturating_sub(1));

    let lines: Vec<Line> = rows
        .into_iter()
        .skip(scroll)
        .take(height)
        .map(|(_, line)| line)
        .collect();

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, area);
}

/// The "> ..." row where a new task is typed
fn input_row(app: &App) -> Line<'static> {
    let bg = app.theme.background;
    let (before, after) = app.input.split_at(app.input_cursor);
    Line::from(vec![
        Span::styled(" > ", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(
            before.to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
        Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(
            after.to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ),
    ])
}

fn task_row(app: &App, task: &Task, is_cursor: bool, now: chrono::DateTime<Utc>) -> Line<'static> {
    let bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };

    let mut spans: Vec<Span> = Vec::new();

    let checkbox = if task.completed { " [x] " } else { " [ ] " };
    let checkbox_fg = if task.completed {
        app.theme.green
    } else {
        app.theme.dim
    };
    spans.push(Span::styled(
        checkbox,
        Style::default().fg(checkbox_fg).bg(bg),
    ));

    // Inline edit replaces the text with the edit buffer plus a cursor glyph
    if let Some(edit) = app.edit.as_ref().filter(|e| e.id == task.id) {
        let (before, after) = edit.buffer.split_at(edit.cursor);
        spans.push(Span::styled(
            before.to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
        spans.push(Span::styled(
            "\u{258C}",
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
        spans.push(Span::styled(
            after.to_string(),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
        return Line::from(spans);
    }

    let text_style = if task.completed {
        Style::default()
            .fg(app.theme.dim)
            .bg(bg)
            .add_modifier(Modifier::CROSSED_OUT)
    } else if is_cursor {
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(app.theme.text).bg(bg)
    };
    spans.push(Span::styled(task.text.clone(), text_style));

    spans.push(Span::styled(
        format!("  {}", relative_time(task.created_at, now)),
        Style::default().fg(app.theme.dim).bg(bg),
    ));

    Line::from(spans)
}
