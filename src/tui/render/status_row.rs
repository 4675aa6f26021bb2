use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::{App, Mode};

/// Render the status row (bottom of screen): failure notices, confirm
/// prompts, and key hints for the current mode.
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    // Failure notices take priority over key hints in every mode except the
    // confirm prompt, so a failed add/edit is visible while its buffer is
    // still open.
    let line = match (&app.mode, &app.status_message) {
        (Mode::Confirm, _) => Line::from(Span::styled(
            " Delete this task? y/n",
            Style::default().fg(app.theme.red).bg(bg),
        )),
        (_, Some(message)) => Line::from(Span::styled(
            format!(" {}", message),
            Style::default().fg(app.theme.red).bg(bg),
        )),
        (Mode::Insert, None) => hint_line(app, " Enter add  Esc cancel"),
        (Mode::Edit, None) => hint_line(app, " Enter save  Esc cancel"),
        (Mode::Navigate, None) => {
            hint_line(app, " a add  e edit  space toggle  d delete  r reload  q quit")
        }
    };

    let mut spans = line.spans;
    let content_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
    if content_width < width {
        spans.push(Span::styled(
            " ".repeat(width - content_width),
            Style::default().bg(bg),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(bg));
    frame.render_widget(paragraph, area);
}

fn hint_line<'a>(app: &App, hint: &'a str) -> Line<'a> {
    Line::from(Span::styled(
        hint,
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    ))
}
