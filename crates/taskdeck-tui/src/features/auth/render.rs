//! Auth feature view.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use super::state::{AuthMode, AuthState};
use crate::common::mask;

const FORM_WIDTH: u16 = 56;
const LABEL_WIDTH: usize = 10;

/// Renders the centered login/register form and places the cursor.
pub fn render_auth(frame: &mut Frame, auth: &AuthState, spinner: &str, area: Rect) {
    let fields = auth.mode.fields();
    let height = u16::try_from(fields.len()).unwrap_or(3) + 8;
    let popup = centered(area, FORM_WIDTH, height);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(format!(" {} ", auth.mode.title()))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    let inner = block.inner(popup);
    frame.render_widget(block, popup);

    let mut lines = Vec::new();
    if let Some(notice) = &auth.notice {
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Green),
        )));
    } else {
        lines.push(Line::from(""));
    }

    let focused = auth.focused_field();
    for field in fields {
        let value = auth.field(*field);
        let shown = if field.is_secret() {
            mask(value)
        } else {
            value.to_string()
        };
        let label_style = if *field == focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{:<LABEL_WIDTH$}", field.label()), label_style),
            Span::raw(shown),
        ]));
    }

    lines.push(Line::from(""));
    if auth.loading {
        lines.push(Line::from(Span::styled(
            format!("{spinner} Loading..."),
            Style::default().fg(Color::Yellow),
        )));
    } else if let Some(error) = &auth.error {
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
    } else {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        hints(auth.mode),
        Style::default().fg(Color::DarkGray),
    )));

    let body = inner;
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Left), body);

    if !auth.loading {
        let row = fields.iter().position(|f| *f == focused).unwrap_or(0);
        let value = auth.field(focused);
        let column = if focused.is_secret() {
            u16::try_from(auth.cursor.position()).unwrap_or(u16::MAX)
        } else {
            auth.cursor.column(value)
        };
        let x = body.x + LABEL_WIDTH as u16 + column;
        let y = body.y + 1 + u16::try_from(row).unwrap_or(0);
        if x < body.right() && y < body.bottom() {
            frame.set_cursor_position((x, y));
        }
    }
}

fn hints(mode: AuthMode) -> &'static str {
    match mode {
        AuthMode::Login => "Enter login · Tab next field · Ctrl+R register · Ctrl+C quit",
        AuthMode::Register => "Enter register · Tab next field · Esc back to login",
    }
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
