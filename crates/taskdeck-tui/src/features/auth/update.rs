//! Auth feature reducer.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::state::{AuthMode, AuthState, LoginForm, RegisterForm};
use crate::events::AuthUiEvent;

pub const LOGGED_IN_NOTICE: &str = "Login successful!";
pub const REGISTERED_NOTICE: &str = "Registration successful! Please login.";

/// What the app reducer should do after an auth key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthAction {
    None,
    Submit,
    /// Esc while a request is in flight.
    CancelRequest,
}

/// Effect of an auth result on the rest of the app.
#[derive(Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    Stay,
    LoggedIn { token: String },
}

pub fn handle_key(auth: &mut AuthState, key: KeyEvent) -> AuthAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

    match key.code {
        KeyCode::Esc if auth.loading => AuthAction::CancelRequest,
        KeyCode::Esc if auth.mode == AuthMode::Register => {
            auth.switch_mode(AuthMode::Login);
            AuthAction::None
        }
        KeyCode::Char('r') if ctrl && auth.mode == AuthMode::Login => {
            auth.switch_mode(AuthMode::Register);
            auth.notice = None;
            AuthAction::None
        }
        KeyCode::Enter => {
            if auth.loading {
                AuthAction::None
            } else {
                AuthAction::Submit
            }
        }
        KeyCode::Tab | KeyCode::Down => {
            auth.focus_next();
            AuthAction::None
        }
        KeyCode::BackTab | KeyCode::Up => {
            auth.focus_prev();
            AuthAction::None
        }
        _ => {
            edit_focused(auth, key);
            AuthAction::None
        }
    }
}

fn edit_focused(auth: &mut AuthState, key: KeyEvent) {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return;
    }
    let (text, cursor) = auth.focused_text_mut();
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

pub fn handle_paste(auth: &mut AuthState, pasted: &str) {
    let (text, cursor) = auth.focused_text_mut();
    cursor.insert_str(text, pasted);
}

pub fn handle_result(auth: &mut AuthState, event: AuthUiEvent) -> AuthOutcome {
    auth.loading = false;
    match event {
        AuthUiEvent::LoggedIn { token } => {
            auth.login = LoginForm::default();
            auth.error = None;
            auth.notice = None;
            auth.focus = 0;
            AuthOutcome::LoggedIn { token }
        }
        AuthUiEvent::Registered => {
            auth.register = RegisterForm::default();
            auth.switch_mode(AuthMode::Login);
            auth.notice = Some(REGISTERED_NOTICE.to_string());
            AuthOutcome::Stay
        }
        AuthUiEvent::LoginFailed { error } | AuthUiEvent::RegisterFailed { error } => {
            auth.error = Some(error.user_message());
            AuthOutcome::Stay
        }
    }
}
