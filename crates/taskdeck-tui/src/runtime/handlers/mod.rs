//! Effect handlers for the TUI runtime.
//!
//! Handlers are pure async functions that return `UiEvent`. They perform the
//! HTTP call and never touch state; the runtime spawns them and forwards the
//! result to the inbox.

pub mod auth;
pub mod tasks;

use std::future::Future;

use taskdeck_core::api::ApiError;
use tokio_util::sync::CancellationToken;

pub use auth::*;
pub use tasks::*;

/// Races `work` against cancellation.
async fn until_cancelled<T>(
    cancel: &CancellationToken,
    work: impl Future<Output = Result<T, ApiError>>,
) -> Result<T, ApiError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(ApiError::Cancelled),
        result = work => result,
    }
}

#[cfg(test)]
mod tests;
