use taskdeck_core::api::ApiClient;
use taskdeck_core::task::{TaskDraft, TaskId};
use tokio_util::sync::CancellationToken;

use super::until_cancelled;
use crate::events::{DashboardUiEvent, UiEvent};

pub async fn fetch_tasks(api: ApiClient, token: String, cancel: CancellationToken) -> UiEvent {
    let result = until_cancelled(&cancel, async {
        api.authorized(Some(&token))?.list_tasks().await
    })
    .await;
    UiEvent::Dashboard(DashboardUiEvent::Fetched(result))
}

pub async fn create_task(
    api: ApiClient,
    token: String,
    draft: TaskDraft,
    cancel: CancellationToken,
) -> UiEvent {
    let result = until_cancelled(&cancel, async {
        api.authorized(Some(&token))?.create_task(&draft).await
    })
    .await;
    UiEvent::Dashboard(DashboardUiEvent::Created(result))
}

pub async fn update_task(
    api: ApiClient,
    token: String,
    id: TaskId,
    draft: TaskDraft,
    cancel: CancellationToken,
) -> UiEvent {
    let result = until_cancelled(&cancel, async {
        api.authorized(Some(&token))?.update_task(id, &draft).await
    })
    .await;
    UiEvent::Dashboard(DashboardUiEvent::Updated(result))
}

pub async fn delete_task(
    api: ApiClient,
    token: String,
    id: TaskId,
    cancel: CancellationToken,
) -> UiEvent {
    let result = until_cancelled(&cancel, async {
        api.authorized(Some(&token))?.delete_task(id).await
    })
    .await;
    UiEvent::Dashboard(DashboardUiEvent::Deleted { id, result })
}
