use std::fmt;

use serde_json::Value;

/// The API call an error belongs to; selects the user-facing failure text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiAction {
    Login,
    Register,
    FetchTasks,
    CreateTask,
    UpdateTask,
    DeleteTask,
}

impl ApiAction {
    /// Fixed message shown when the server answers with a non-2xx status.
    pub fn failure_message(self) -> &'static str {
        match self {
            ApiAction::Login => "Failed to login",
            ApiAction::Register => "Failed to register",
            ApiAction::FetchTasks => "Failed to fetch tasks",
            ApiAction::CreateTask => "Failed to create task",
            ApiAction::UpdateTask => "Failed to update task",
            ApiAction::DeleteTask => "Failed to delete task",
        }
    }

    /// Login and register show the server's `detail`; task calls never do.
    fn surfaces_detail(self) -> bool {
        matches!(self, ApiAction::Login | ApiAction::Register)
    }
}

/// Errors from the task API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No token in the session; nothing was sent.
    MissingToken,
    /// The server rejected the token (HTTP 401 on an authenticated call).
    Unauthorized,
    /// The request never produced a response.
    Transport(String),
    /// Non-2xx response other than an authenticated 401.
    Status {
        action: ApiAction,
        status: u16,
        detail: Option<String>,
    },
    /// Login succeeded but no token field was present.
    TokenNotFound,
    /// A 2xx body could not be decoded.
    Decode { action: ApiAction, message: String },
    /// The request was cancelled before it settled.
    Cancelled,
}

impl ApiError {
    pub const MISSING_TOKEN_MESSAGE: &'static str = "Access token not found. Please login.";
    pub const SESSION_EXPIRED_MESSAGE: &'static str = "Session expired. Please login again.";

    /// Builds a status error, pulling `detail` out of a JSON error body.
    pub fn status(action: ApiAction, status: u16, body: &str) -> Self {
        ApiError::Status {
            action,
            status,
            detail: extract_detail(body),
        }
    }

    /// True for errors that must end the session (clear token, go to login).
    pub fn is_session_expired(&self) -> bool {
        matches!(self, ApiError::Unauthorized)
    }

    /// Text shown to the user for this error.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::MissingToken => Self::MISSING_TOKEN_MESSAGE.to_string(),
            ApiError::Unauthorized => Self::SESSION_EXPIRED_MESSAGE.to_string(),
            ApiError::Transport(message) => message.clone(),
            ApiError::Status { action, detail, .. } => match detail {
                Some(detail) if action.surfaces_detail() => detail.clone(),
                _ => action.failure_message().to_string(),
            },
            ApiError::TokenNotFound => "Token not found in response.".to_string(),
            ApiError::Decode { .. } => "Failed to parse server response".to_string(),
            ApiError::Cancelled => "Request cancelled".to_string(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.user_message())
    }
}

impl std::error::Error for ApiError {}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        ApiError::Transport(err.to_string())
    }
}

/// Reads a non-empty string `detail` from a JSON error body.
fn extract_detail(body: &str) -> Option<String> {
    let json: Value = serde_json::from_str(body).ok()?;
    json.get("detail")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_surfaces_server_detail() {
        let err = ApiError::status(
            ApiAction::Login,
            400,
            r#"{"detail": "No active account found"}"#,
        );
        assert_eq!(err.user_message(), "No active account found");
    }

    #[test]
    fn test_login_defaults_when_body_is_not_json() {
        let err = ApiError::status(ApiAction::Login, 500, "<html>oops</html>");
        assert_eq!(err.user_message(), "Failed to login");
    }

    #[test]
    fn test_register_defaults_without_detail() {
        let err = ApiError::status(
            ApiAction::Register,
            400,
            r#"{"username": ["already taken"]}"#,
        );
        assert_eq!(err.user_message(), "Failed to register");
    }

    #[test]
    fn test_task_actions_hide_server_detail() {
        let err = ApiError::status(ApiAction::DeleteTask, 404, r#"{"detail": "Not found."}"#);
        assert_eq!(err.user_message(), "Failed to delete task");
        assert_eq!(err.to_string(), "Failed to delete task");
    }

    #[test]
    fn test_only_unauthorized_expires_session() {
        assert!(ApiError::Unauthorized.is_session_expired());
        assert!(!ApiError::MissingToken.is_session_expired());
        assert!(!ApiError::status(ApiAction::Login, 401, "").is_session_expired());
    }
}
