use std::time::Duration;

use taskdeck_core::api::{ApiClient, ApiError, Credentials};
use taskdeck_core::task::TaskId;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;
use crate::events::{AuthUiEvent, DashboardUiEvent, UiEvent};

async fn api_for(server: &MockServer) -> ApiClient {
    ApiClient::new(&server.uri(), None).unwrap()
}

#[tokio::test]
async fn test_fetch_tasks_reports_parsed_list() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .and(header("authorization", "Bearer tok"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"[{"id": 1, "title": "X", "status": "Pending", "priority": "Low"}]"#,
        ))
        .mount(&server)
        .await;

    let event = fetch_tasks(api_for(&server).await, "tok".into(), CancellationToken::new()).await;
    let UiEvent::Dashboard(DashboardUiEvent::Fetched(Ok(tasks))) = event else {
        panic!("unexpected event: {event:?}");
    };
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id, TaskId(1));
}

#[tokio::test]
async fn test_cancelled_request_reports_cancelled() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();
    let event = delete_task(api_for(&server).await, "tok".into(), TaskId(3), cancel).await;
    let UiEvent::Dashboard(DashboardUiEvent::Deleted { id, result }) = event else {
        panic!("unexpected event: {event:?}");
    };
    assert_eq!(id, TaskId(3));
    assert_eq!(result, Err(ApiError::Cancelled));
}

#[tokio::test]
async fn test_login_handler_maps_missing_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"user": "a"}"#))
        .mount(&server)
        .await;

    let credentials = Credentials {
        username: "a".into(),
        password: "b".into(),
    };
    let event = login(api_for(&server).await, credentials, CancellationToken::new()).await;
    let UiEvent::Auth(AuthUiEvent::LoginFailed { error }) = event else {
        panic!("unexpected event: {event:?}");
    };
    assert_eq!(error, ApiError::TokenNotFound);
}

#[tokio::test]
async fn test_unauthorized_create_is_session_expiry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/tasks/"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let draft = taskdeck_core::task::TaskDraft {
        title: "t".into(),
        ..Default::default()
    };
    let event = create_task(
        api_for(&server).await,
        "old".into(),
        draft,
        CancellationToken::new(),
    )
    .await;
    let UiEvent::Dashboard(DashboardUiEvent::Created(Err(error))) = event else {
        panic!("unexpected event: {event:?}");
    };
    assert!(error.is_session_expired());
}
