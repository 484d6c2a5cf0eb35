//! UI effect types.
//!
//! Effects are commands returned by the reducer that the runtime executes.
//! They represent I/O only; the reducer never touches the network or disk.
//!
//! Request effects carry the `RequestId` the reducer claimed for them.
//! Cancellation is initiated from the reducer via `UiEffect::CancelRequest`.

use taskdeck_core::api::{Credentials, Registration};
use taskdeck_core::task::{TaskDraft, TaskId};
use tokio_util::sync::CancellationToken;

use crate::common::RequestId;

#[derive(Debug)]
pub enum UiEffect {
    Quit,

    Login {
        request: RequestId,
        credentials: Credentials,
    },
    Register {
        request: RequestId,
        registration: Registration,
    },

    FetchTasks {
        request: RequestId,
        token: String,
    },
    CreateTask {
        request: RequestId,
        token: String,
        draft: TaskDraft,
    },
    UpdateTask {
        request: RequestId,
        token: String,
        id: TaskId,
        draft: TaskDraft,
    },
    DeleteTask {
        request: RequestId,
        token: String,
        id: TaskId,
    },

    /// Persist the session token.
    StoreToken { token: String },
    /// Remove the persisted session token.
    ClearToken,

    /// Fire a request's cancellation token.
    CancelRequest { token: Option<CancellationToken> },
}
