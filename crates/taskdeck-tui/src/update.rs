//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use taskdeck_core::dashboard::CreateCheck;

use crate::common::{RequestId, RequestKind};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::auth::{self, AuthAction, AuthMode, AuthOutcome};
use crate::features::dashboard::{self, DashboardAction, DashboardState, ResultOutcome};
use crate::state::{AppState, Screen};

/// Initial navigation: straight to the dashboard when a token is stored.
pub fn start(app: &mut AppState) -> Vec<UiEffect> {
    if app.token.is_some() {
        enter_dashboard(app)
    } else {
        app.screen = Screen::Auth;
        vec![]
    }
}

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::RequestStarted { kind, started } => {
            if app.requests.state_mut(kind).on_started(&started) {
                vec![]
            } else {
                // Cancelled or superseded before the runtime reported it.
                vec![UiEffect::CancelRequest {
                    token: Some(started.cancel),
                }]
            }
        }
        UiEvent::RequestCompleted { kind, completed } => {
            if app.requests.state_mut(kind).finish_if_active(completed.id) {
                update(app, *completed.result)
            } else {
                tracing::debug!(?kind, id = completed.id.0, "dropping stale completion");
                vec![]
            }
        }
        UiEvent::Auth(event) => match auth::handle_result(&mut app.auth, event) {
            AuthOutcome::Stay => vec![],
            AuthOutcome::LoggedIn { token } => {
                app.token = Some(token.clone());
                let mut effects = vec![UiEffect::StoreToken { token }];
                effects.extend(enter_dashboard(app));
                app.dashboard.notice = Some(auth::LOGGED_IN_NOTICE.to_string());
                effects
            }
        },
        UiEvent::Dashboard(event) => match dashboard::handle_result(&mut app.dashboard, event) {
            ResultOutcome::Applied => vec![],
            ResultOutcome::SessionExpired => end_session(app),
        },
        UiEvent::TokenPersistFailed { error } => {
            let message = format!("Failed to save session: {error}");
            match app.screen {
                Screen::Auth => app.auth.error = Some(message),
                Screen::Dashboard => app.dashboard.model.set_error(message),
            }
            vec![]
        }
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => handle_key(app, key),
        Event::Paste(text) => {
            match app.screen {
                Screen::Auth => auth::handle_paste(&mut app.auth, &text),
                Screen::Dashboard => dashboard::handle_paste(&mut app.dashboard, &text),
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c' | 'q')) {
        return quit(app);
    }

    match app.screen {
        Screen::Auth => match auth::handle_key(&mut app.auth, key) {
            AuthAction::None => vec![],
            AuthAction::Submit => submit_auth(app),
            AuthAction::CancelRequest => {
                app.auth.loading = false;
                vec![UiEffect::CancelRequest {
                    token: app.requests.auth.take_cancel(),
                }]
            }
        },
        Screen::Dashboard => match dashboard::handle_key(&mut app.dashboard, key) {
            DashboardAction::None => vec![],
            DashboardAction::Refresh => start_dashboard_request(app, |request, token| {
                UiEffect::FetchTasks { request, token }
            }),
            DashboardAction::Create => create_task(app),
            DashboardAction::Update => update_task(app),
            DashboardAction::Delete(id) => start_dashboard_request(app, |request, token| {
                UiEffect::DeleteTask { request, token, id }
            }),
            DashboardAction::CancelRequest => {
                app.dashboard.model.end_request();
                vec![UiEffect::CancelRequest {
                    token: app.requests.dashboard.take_cancel(),
                }]
            }
            DashboardAction::Logout => {
                tracing::info!("logging out");
                end_session(app)
            }
            DashboardAction::Quit => quit(app),
        },
    }
}

fn quit(app: &mut AppState) -> Vec<UiEffect> {
    vec![
        UiEffect::CancelRequest {
            token: app.requests.auth.take_cancel(),
        },
        UiEffect::CancelRequest {
            token: app.requests.dashboard.take_cancel(),
        },
        UiEffect::Quit,
    ]
}

fn submit_auth(app: &mut AppState) -> Vec<UiEffect> {
    if app.auth.loading {
        return vec![];
    }
    let mode = app.auth.mode;
    let request = match mode {
        AuthMode::Login => app.auth.credentials().map(|credentials| {
            let request = claim(app, RequestKind::Auth);
            UiEffect::Login {
                request,
                credentials,
            }
        }),
        AuthMode::Register => app.auth.registration().map(|registration| {
            let request = claim(app, RequestKind::Auth);
            UiEffect::Register {
                request,
                registration,
            }
        }),
    };

    match request {
        Ok(effect) => {
            app.auth.loading = true;
            app.auth.error = None;
            app.auth.notice = None;
            vec![effect]
        }
        Err(message) => {
            app.auth.error = Some(message);
            vec![]
        }
    }
}

fn claim(app: &mut AppState, kind: RequestKind) -> RequestId {
    let id = app.request_seq.next_id();
    app.requests.state_mut(kind).begin(id);
    id
}

/// Mounts the dashboard: session guard, then the initial fetch.
fn enter_dashboard(app: &mut AppState) -> Vec<UiEffect> {
    app.screen = Screen::Dashboard;
    app.dashboard = DashboardState::default();
    start_dashboard_request(app, |request, token| UiEffect::FetchTasks { request, token })
}

/// Starts a dashboard request unless one is already in flight.
fn start_dashboard_request(
    app: &mut AppState,
    build: impl FnOnce(RequestId, String) -> UiEffect,
) -> Vec<UiEffect> {
    let Some(token) = app.token.clone() else {
        app.dashboard.model.missing_token();
        return vec![];
    };
    if !app.dashboard.model.begin_request() {
        tracing::debug!("dashboard request refused: another one is in flight");
        return vec![];
    }
    let request = claim(app, RequestKind::Dashboard);
    vec![build(request, token)]
}

fn create_task(app: &mut AppState) -> Vec<UiEffect> {
    if app.dashboard.model.is_loading() {
        return vec![];
    }
    match app.dashboard.model.prepare_create(app.today) {
        CreateCheck::Skip => vec![],
        CreateCheck::Invalid(message) => {
            app.dashboard.model.set_error(message);
            vec![]
        }
        CreateCheck::Ready(draft) => start_dashboard_request(app, |request, token| {
            UiEffect::CreateTask {
                request,
                token,
                draft,
            }
        }),
    }
}

fn update_task(app: &mut AppState) -> Vec<UiEffect> {
    if app.dashboard.model.is_loading() {
        return vec![];
    }
    match app.dashboard.model.prepare_update() {
        Ok((id, draft)) => start_dashboard_request(app, |request, token| UiEffect::UpdateTask {
            request,
            token,
            id,
            draft,
        }),
        Err(message) => {
            app.dashboard.model.set_error(message);
            vec![]
        }
    }
}

/// Logout and session expiry: forget the token, drop cached tasks, go to login.
fn end_session(app: &mut AppState) -> Vec<UiEffect> {
    app.token = None;
    let cancel = app.requests.dashboard.take_cancel();
    app.dashboard = DashboardState::default();
    app.screen = Screen::Auth;
    app.auth.switch_mode(AuthMode::Login);
    app.auth.loading = false;
    vec![UiEffect::CancelRequest { token: cancel }, UiEffect::ClearToken]
}
