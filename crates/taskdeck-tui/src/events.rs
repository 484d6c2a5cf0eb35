//! UI event types.
//!
//! All external inputs (terminal, async API results) are converted to
//! `UiEvent` before being processed by the reducer.
//!
//! ## Request Lifecycle
//!
//! - The reducer claims a `RequestId` when it emits a request effect
//! - The runtime emits `UiEvent::RequestStarted` with the cancellation token
//! - The runtime emits `UiEvent::RequestCompleted` wrapping the result event
//! - The reducer drops a completion whose id is no longer active

use crossterm::event::Event as CrosstermEvent;
use taskdeck_core::api::ApiError;
use taskdeck_core::task::{Task, TaskId};

use crate::common::{RequestCompleted, RequestKind, RequestStarted};

/// Results of login and registration requests.
#[derive(Debug)]
pub enum AuthUiEvent {
    LoggedIn { token: String },
    LoginFailed { error: ApiError },
    Registered,
    RegisterFailed { error: ApiError },
}

/// Results of task collection requests.
#[derive(Debug)]
pub enum DashboardUiEvent {
    Fetched(Result<Vec<Task>, ApiError>),
    Created(Result<Task, ApiError>),
    Updated(Result<Task, ApiError>),
    Deleted { id: TaskId, result: Result<(), ApiError> },
}

#[derive(Debug)]
pub enum UiEvent {
    /// Periodic tick (spinner animation).
    Tick,
    Terminal(CrosstermEvent),
    Auth(AuthUiEvent),
    Dashboard(DashboardUiEvent),
    RequestStarted {
        kind: RequestKind,
        started: RequestStarted,
    },
    RequestCompleted {
        kind: RequestKind,
        completed: RequestCompleted<Box<UiEvent>>,
    },
    /// Writing the token to disk failed; the in-memory session still holds it.
    TokenPersistFailed { error: String },
}
