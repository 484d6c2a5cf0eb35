//! Task collection endpoints.

use reqwest::Method;

use super::{ApiAction, ApiError, AuthorizedClient, TASKS_PATH, decode};
use crate::task::{Task, TaskDraft, TaskId};

fn task_path(id: TaskId) -> String {
    format!("{TASKS_PATH}{id}/")
}

impl AuthorizedClient<'_> {
    /// Fetches every task of the authenticated user, in server order.
    ///
    /// # Errors
    /// [`ApiError::Unauthorized`] on 401, a status error otherwise.
    pub async fn list_tasks(&self) -> Result<Vec<Task>, ApiError> {
        let response = self
            .send_empty(ApiAction::FetchTasks, Method::GET, TASKS_PATH)
            .await?;
        decode(ApiAction::FetchTasks, response).await
    }

    /// Creates a task and returns the server's record (with its id).
    ///
    /// # Errors
    /// [`ApiError::Unauthorized`] on 401, a status error otherwise.
    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        let response = self
            .send_json(ApiAction::CreateTask, Method::POST, TASKS_PATH, draft)
            .await?;
        decode(ApiAction::CreateTask, response).await
    }

    /// Replaces a task with the full draft and returns the updated record.
    ///
    /// # Errors
    /// [`ApiError::Unauthorized`] on 401, a status error otherwise.
    pub async fn update_task(&self, id: TaskId, draft: &TaskDraft) -> Result<Task, ApiError> {
        let response = self
            .send_json(ApiAction::UpdateTask, Method::PUT, &task_path(id), draft)
            .await?;
        decode(ApiAction::UpdateTask, response).await
    }

    /// Deletes a task. The response body is ignored.
    ///
    /// # Errors
    /// [`ApiError::Unauthorized`] on 401, a status error otherwise.
    pub async fn delete_task(&self, id: TaskId) -> Result<(), ApiError> {
        self.send_empty(ApiAction::DeleteTask, Method::DELETE, &task_path(id))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::api::ApiClient;
    use crate::task::{TaskPriority, TaskStatus};

    use super::*;

    async fn server_and_client() -> (MockServer, ApiClient) {
        let server = MockServer::start().await;
        let api = ApiClient::new(&server.uri(), None).unwrap();
        (server, api)
    }

    #[tokio::test]
    async fn test_list_sends_bearer_and_parses_tasks() {
        let (server, api) = server_and_client().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks/"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"id": 1, "title": "X", "status": "Pending", "priority": "Low"},
                {"id": 2, "title": "Y", "description": "d", "status": "Completed", "priority": "High"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let tasks = api.authorized(Some("tok")).unwrap().list_tasks().await.unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, TaskId(1));
        assert_eq!(tasks[1].status, TaskStatus::Completed);
    }

    #[tokio::test]
    async fn test_unauthorized_maps_for_every_action() {
        let (server, api) = server_and_client().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "expired"})))
            .mount(&server)
            .await;

        let client = api.authorized(Some("old")).unwrap();
        let draft = TaskDraft {
            title: "t".into(),
            ..Default::default()
        };
        assert_eq!(client.list_tasks().await.unwrap_err(), ApiError::Unauthorized);
        assert_eq!(client.create_task(&draft).await.unwrap_err(), ApiError::Unauthorized);
        assert_eq!(
            client.update_task(TaskId(5), &draft).await.unwrap_err(),
            ApiError::Unauthorized
        );
        assert_eq!(
            client.delete_task(TaskId(7)).await.unwrap_err(),
            ApiError::Unauthorized
        );
    }

    #[tokio::test]
    async fn test_list_failure_uses_fixed_message() {
        let (server, api) = server_and_client().await;
        Mock::given(method("GET"))
            .and(path("/api/tasks/"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({"detail": "boom"})))
            .mount(&server)
            .await;

        let err = api.authorized(Some("tok")).unwrap().list_tasks().await.unwrap_err();
        assert_eq!(err.user_message(), "Failed to fetch tasks");
    }

    #[tokio::test]
    async fn test_create_posts_json_draft() {
        let (server, api) = server_and_client().await;
        Mock::given(method("POST"))
            .and(path("/api/tasks/"))
            .and(header("authorization", "Bearer tok"))
            .and(header("content-type", "application/json"))
            .and(body_json(json!({
                "title": "New",
                "description": "",
                "due_date": null,
                "status": "Pending",
                "priority": "Medium"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": 42, "title": "New", "description": "", "due_date": null,
                "status": "Pending", "priority": "Medium"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let draft = TaskDraft {
            title: "New".into(),
            ..Default::default()
        };
        let created = api
            .authorized(Some("tok"))
            .unwrap()
            .create_task(&draft)
            .await
            .unwrap();
        assert_eq!(created.id, TaskId(42));
    }

    #[tokio::test]
    async fn test_update_puts_to_task_path() {
        let (server, api) = server_and_client().await;
        Mock::given(method("PUT"))
            .and(path("/api/tasks/5/"))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 5, "title": "Edited", "status": "Completed", "priority": "High"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let draft = TaskDraft {
            title: "Edited".into(),
            status: TaskStatus::Completed,
            priority: TaskPriority::High,
            ..Default::default()
        };
        let updated = api
            .authorized(Some("tok"))
            .unwrap()
            .update_task(TaskId(5), &draft)
            .await
            .unwrap();
        assert_eq!(updated.title, "Edited");
    }

    #[tokio::test]
    async fn test_delete_accepts_no_content() {
        let (server, api) = server_and_client().await;
        Mock::given(method("DELETE"))
            .and(path("/api/tasks/7/"))
            .and(header("authorization", "Bearer tok"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        api.authorized(Some("tok"))
            .unwrap()
            .delete_task(TaskId(7))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_failure_message() {
        let (server, api) = server_and_client().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let err = api
            .authorized(Some("tok"))
            .unwrap()
            .delete_task(TaskId(7))
            .await
            .unwrap_err();
        assert_eq!(err.user_message(), "Failed to delete task");
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let (server, api) = server_and_client().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = api.authorized(Some("tok")).unwrap().list_tasks().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode { action: ApiAction::FetchTasks, .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported_verbatim() {
        let api = ApiClient::new("http://127.0.0.1:9", None).unwrap();
        let err = api.authorized(Some("tok")).unwrap().list_tasks().await.unwrap_err();
        let ApiError::Transport(message) = err else {
            panic!("expected transport error, got {err:?}");
        };
        assert!(!message.is_empty());
    }
}
