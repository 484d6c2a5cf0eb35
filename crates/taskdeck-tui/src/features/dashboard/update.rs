//! Dashboard feature reducer.
//!
//! Key handling only touches local state and returns a [`DashboardAction`];
//! the app reducer turns actions into requests because it owns the token and
//! the request lanes.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use taskdeck_core::dashboard::EditStart;
use taskdeck_core::task::TaskId;

use super::state::{DashboardState, DraftField, Focus};
use crate::events::DashboardUiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardAction {
    None,
    Refresh,
    Create,
    Update,
    Delete(TaskId),
    CancelRequest,
    Logout,
    Quit,
}

/// Effect of a request result on the rest of the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultOutcome {
    Applied,
    SessionExpired,
}

pub fn handle_key(state: &mut DashboardState, key: KeyEvent) -> DashboardAction {
    state.notice = None;
    if key.code == KeyCode::Esc && state.model.is_loading() {
        return DashboardAction::CancelRequest;
    }

    match state.focus {
        Focus::List => handle_list_key(state, key),
        Focus::Search => {
            handle_search_key(state, key);
            DashboardAction::None
        }
        Focus::Create(field) | Focus::Edit(field) => handle_form_key(state, field, key),
    }
}

fn handle_list_key(state: &mut DashboardState, key: KeyEvent) -> DashboardAction {
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => state.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => state.select_next(),
        KeyCode::Enter | KeyCode::Char('e') => {
            if let Some(id) = state.selected_id()
                && state.model.begin_edit(id) == EditStart::Started
            {
                state.set_focus(Focus::Edit(DraftField::Title));
            }
        }
        KeyCode::Delete | KeyCode::Char('d') => {
            if let Some(id) = state.selected_id() {
                return DashboardAction::Delete(id);
            }
        }
        KeyCode::Char('n' | 'a') => state.set_focus(Focus::Create(DraftField::Title)),
        KeyCode::Char('/') => state.set_focus(Focus::Search),
        KeyCode::Char('s') => {
            state.model.filter.cycle_status();
            state.clamp_selection();
        }
        KeyCode::Char('p') => {
            state.model.filter.cycle_priority();
            state.clamp_selection();
        }
        KeyCode::Char('r') => return DashboardAction::Refresh,
        KeyCode::Char('L') => return DashboardAction::Logout,
        KeyCode::Char('q') => return DashboardAction::Quit,
        KeyCode::Esc => {
            if state.model.editing().is_some() {
                state.model.cancel_edit();
            } else {
                state.model.clear_error();
            }
        }
        _ => {}
    }
    DashboardAction::None
}

fn handle_search_key(state: &mut DashboardState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Down | KeyCode::Tab => {
            state.set_focus(Focus::List);
        }
        _ => {
            edit_text(state, key);
            state.clamp_selection();
        }
    }
}

fn handle_form_key(state: &mut DashboardState, field: DraftField, key: KeyEvent) -> DashboardAction {
    let editing = matches!(state.focus, Focus::Edit(_));
    let refocus = |field| {
        if editing {
            Focus::Edit(field)
        } else {
            Focus::Create(field)
        }
    };

    match key.code {
        KeyCode::Esc => {
            if editing {
                state.model.cancel_edit();
            }
            state.set_focus(Focus::List);
        }
        KeyCode::Enter => {
            return if editing {
                DashboardAction::Update
            } else {
                DashboardAction::Create
            };
        }
        KeyCode::Tab | KeyCode::Down => state.set_focus(refocus(field.next())),
        KeyCode::BackTab | KeyCode::Up => state.set_focus(refocus(field.prev())),
        // The submitted form is reset or closed when the request settles.
        _ if state.model.is_loading() => {}
        KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') if !field.is_text() => {
            let forward = key.code != KeyCode::Left;
            if let Some(form) = state.focused_form_mut() {
                match (field, forward) {
                    (DraftField::Status, true) => form.status = form.status.next(),
                    (DraftField::Status, false) => form.status = form.status.prev(),
                    (DraftField::Priority, true) => form.priority = form.priority.next(),
                    (DraftField::Priority, false) => form.priority = form.priority.prev(),
                    _ => {}
                }
            }
        }
        _ => edit_text(state, key),
    }
    DashboardAction::None
}

fn edit_text(state: &mut DashboardState, key: KeyEvent) {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return;
    }
    let Some((text, cursor)) = state.focused_text_mut() else {
        return;
    };
    match key.code {
        KeyCode::Char(ch) => cursor.insert(text, ch),
        KeyCode::Backspace => cursor.backspace(text),
        KeyCode::Delete => cursor.delete(text),
        KeyCode::Left => cursor.left(),
        KeyCode::Right => cursor.right(text),
        KeyCode::Home => cursor.home(),
        KeyCode::End => cursor.end(text),
        _ => {}
    }
}

pub fn handle_paste(state: &mut DashboardState, pasted: &str) {
    if state.model.is_loading() && matches!(state.focus, Focus::Create(_) | Focus::Edit(_)) {
        return;
    }
    if let Some((text, cursor)) = state.focused_text_mut() {
        cursor.insert_str(text, pasted);
    }
    if state.focus == Focus::Search {
        state.clamp_selection();
    }
}

pub fn handle_result(state: &mut DashboardState, event: DashboardUiEvent) -> ResultOutcome {
    let failure = match event {
        DashboardUiEvent::Fetched(Ok(tasks)) => {
            state.model.apply_fetched(tasks);
            None
        }
        DashboardUiEvent::Created(Ok(task)) => {
            state.model.apply_created(task);
            if matches!(state.focus, Focus::Create(_)) {
                state.set_focus(Focus::Create(DraftField::Title));
            }
            None
        }
        DashboardUiEvent::Updated(Ok(task)) => {
            state.model.apply_updated(task);
            if matches!(state.focus, Focus::Edit(_)) {
                state.set_focus(Focus::List);
            }
            None
        }
        DashboardUiEvent::Deleted { id, result: Ok(()) } => {
            state.model.apply_deleted(id);
            if matches!(state.focus, Focus::Edit(_)) && state.model.editing().is_none() {
                state.set_focus(Focus::List);
            }
            None
        }
        DashboardUiEvent::Fetched(Err(error))
        | DashboardUiEvent::Created(Err(error))
        | DashboardUiEvent::Updated(Err(error))
        | DashboardUiEvent::Deleted {
            result: Err(error), ..
        } => Some(error),
    };
    state.clamp_selection();

    match failure {
        None => ResultOutcome::Applied,
        Some(error) if error.is_session_expired() => ResultOutcome::SessionExpired,
        Some(error) => {
            tracing::warn!(error = %error, "dashboard request failed");
            state.model.fail(&error);
            ResultOutcome::Applied
        }
    }
}
