use taskdeck_core::api::{ApiClient, Credentials, Registration};
use tokio_util::sync::CancellationToken;

use super::until_cancelled;
use crate::events::{AuthUiEvent, UiEvent};

pub async fn login(api: ApiClient, credentials: Credentials, cancel: CancellationToken) -> UiEvent {
    let event = match until_cancelled(&cancel, api.login(&credentials)).await {
        Ok(token) => AuthUiEvent::LoggedIn { token },
        Err(error) => AuthUiEvent::LoginFailed { error },
    };
    UiEvent::Auth(event)
}

pub async fn register(
    api: ApiClient,
    registration: Registration,
    cancel: CancellationToken,
) -> UiEvent {
    let event = match until_cancelled(&cancel, api.register(&registration)).await {
        Ok(()) => AuthUiEvent::Registered,
        Err(error) => AuthUiEvent::RegisterFailed { error },
    };
    UiEvent::Auth(event)
}
