//! Dashboard feature view.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use taskdeck_core::task::{Task, TaskPriority, TaskStatus};

use super::state::{DashboardState, DraftField, Focus};
use crate::common::truncate_with_ellipsis;

const LABEL_WIDTH: u16 = 13;
const TITLE_COLUMN: usize = 32;

pub fn render_dashboard(frame: &mut Frame, state: &DashboardState, spinner: &str, area: Rect) {
    let [header, form, filters, list, status, footer] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(7),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(area);

    render_header(frame, state, header);
    render_form(frame, state, form);
    render_filters(frame, state, filters);
    render_list(frame, state, list);
    render_status(frame, state, spinner, status);
    frame.render_widget(
        Paragraph::new(Span::styled(
            footer_hint(state.focus),
            Style::default().fg(Color::DarkGray),
        )),
        footer,
    );
}

fn render_header(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let total = state.model.tasks().len();
    let shown = state.visible().len();
    let count = if state.model.filter.is_active() {
        format!("{shown} of {total} tasks")
    } else {
        format!("{total} tasks")
    };
    let line = Line::from(vec![
        Span::styled(
            "Task Dashboard",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(count, Style::default().fg(Color::Gray)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_form(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let (editing, form) = state.shown_form();
    let title = match editing {
        Some(id) => format!(" Edit Task #{id} "),
        None => " New Task ".to_string(),
    };
    let form_focused = matches!(state.focus, Focus::Create(_) | Focus::Edit(_));
    let border = if form_focused { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
        .title(title);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let focused_field = match state.focus {
        Focus::Create(field) | Focus::Edit(field) => Some(field),
        Focus::List | Focus::Search => None,
    };

    let lines: Vec<Line> = DraftField::ALL
        .iter()
        .map(|field| {
            let value = match field {
                DraftField::Status => format!("◀ {} ▶", form.status),
                DraftField::Priority => format!("◀ {} ▶", form.priority),
                DraftField::Due if form.due.is_empty() && focused_field != Some(*field) => {
                    "YYYY-MM-DD".to_string()
                }
                _ => field.text(form).unwrap_or_default().to_string(),
            };
            let placeholder = *field == DraftField::Due && form.due.is_empty();
            let label_style = if focused_field == Some(*field) {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            let value_style = if placeholder {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<width$}", field.label(), width = LABEL_WIDTH as usize),
                    label_style,
                ),
                Span::styled(value, value_style),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);

    if let Some(field) = focused_field
        && let Some(text) = field.text(form)
        && let Some(row) = DraftField::ALL.iter().position(|f| *f == field)
    {
        place_cursor(
            frame,
            inner,
            LABEL_WIDTH + state.cursor.column(text),
            u16::try_from(row).unwrap_or(0),
        );
    }
}

fn render_filters(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let filter = &state.model.filter;
    let search_style = if state.focus == Focus::Search {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let prefix = format!(
        "Status: {}  Priority: {}  Search: ",
        filter.status_label(),
        filter.priority_label()
    );
    let prefix_width = u16::try_from(unicode_width::UnicodeWidthStr::width(prefix.as_str()))
        .unwrap_or(u16::MAX);
    let line = Line::from(vec![
        Span::styled(prefix, Style::default().fg(Color::Gray)),
        Span::styled(filter.search.clone(), search_style),
    ]);
    frame.render_widget(Paragraph::new(line), area);

    if state.focus == Focus::Search {
        place_cursor(
            frame,
            area,
            prefix_width.saturating_add(state.cursor.column(&filter.search)),
            0,
        );
    }
}

fn render_list(frame: &mut Frame, state: &DashboardState, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if state.focus == Focus::List {
            Color::Cyan
        } else {
            Color::DarkGray
        }))
        .title(" Tasks ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let visible = state.visible();
    if visible.is_empty() {
        let text = if state.model.is_loading() {
            "Loading..."
        } else {
            "No tasks found."
        };
        frame.render_widget(
            Paragraph::new(Span::styled(text, Style::default().fg(Color::DarkGray))),
            inner,
        );
        return;
    }

    let height = usize::from(inner.height).max(1);
    let offset = state.selected.saturating_sub(height - 1);
    let editing_id = state.model.editing().map(|e| e.id);

    let lines: Vec<Line> = visible
        .iter()
        .enumerate()
        .skip(offset)
        .take(height)
        .map(|(idx, task)| {
            task_line(
                task,
                idx == state.selected,
                Some(task.id) == editing_id,
                usize::from(inner.width),
            )
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn task_line(task: &Task, selected: bool, editing: bool, width: usize) -> Line<'static> {
    let marker = if editing {
        "✎ "
    } else if selected {
        "▸ "
    } else {
        "  "
    };
    let title = truncate_with_ellipsis(&task.title, TITLE_COLUMN);
    let mut spans = vec![
        Span::raw(marker),
        Span::styled(
            format!("{title:<TITLE_COLUMN$}"),
            if selected {
                Style::default().add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            },
        ),
        Span::styled(
            format!(" {:<12}", task.status.label()),
            Style::default().fg(status_color(task.status)),
        ),
        Span::styled(
            format!("{:<7}", task.priority.label()),
            Style::default().fg(priority_color(task.priority)),
        ),
        Span::styled(
            format!(" Due: {:<11}", task.due_label()),
            Style::default().fg(Color::Gray),
        ),
    ];

    let used = 2 + TITLE_COLUMN + 13 + 7 + 17;
    if !task.description.is_empty() && width > used + 3 {
        let description = truncate_with_ellipsis(&task.description, width - used - 1);
        spans.push(Span::styled(
            format!(" {description}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let line = Line::from(spans);
    if selected {
        line.style(Style::default().bg(Color::Rgb(40, 40, 50)))
    } else {
        line
    }
}

fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::Pending => Color::Yellow,
        TaskStatus::InProgress => Color::Blue,
        TaskStatus::Completed => Color::Green,
    }
}

fn priority_color(priority: TaskPriority) -> Color {
    match priority {
        TaskPriority::Low => Color::Gray,
        TaskPriority::Medium => Color::White,
        TaskPriority::High => Color::Red,
    }
}

fn render_status(frame: &mut Frame, state: &DashboardState, spinner: &str, area: Rect) {
    let line = if state.model.is_loading() {
        Line::from(Span::styled(
            format!("{spinner} Loading... (Esc to cancel)"),
            Style::default().fg(Color::Yellow),
        ))
    } else if let Some(error) = state.model.error() {
        Line::from(Span::styled(
            error.to_string(),
            Style::default().fg(Color::Red),
        ))
    } else if let Some(notice) = &state.notice {
        Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Green),
        ))
    } else {
        Line::from("")
    };
    frame.render_widget(Paragraph::new(line), area);
}

fn footer_hint(focus: Focus) -> &'static str {
    match focus {
        Focus::List => {
            "↑↓ select · e edit · d delete · n new · / search · s status · p priority · r refresh · L logout · q quit"
        }
        Focus::Create(_) => "Enter create · Tab next field · ←→ change choice · Esc back",
        Focus::Edit(_) => "Enter save · Tab next field · ←→ change choice · Esc cancel edit",
        Focus::Search => "Type to search · Enter/Esc back to list",
    }
}

fn place_cursor(frame: &mut Frame, area: Rect, column: u16, row: u16) {
    let x = area.x.saturating_add(column);
    let y = area.y.saturating_add(row);
    if x < area.right() && y < area.bottom() {
        frame.set_cursor_position((x, y));
    }
}
