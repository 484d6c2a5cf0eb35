//! Login and registration.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use super::{ApiAction, ApiClient, ApiError, LOGIN_PATH, REGISTER_PATH};

/// Keys that may carry the token in a login response, in priority order.
const TOKEN_KEYS: [&str; 3] = ["token", "access", "access_token"];

/// Login request body.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Registration request body.
#[derive(Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Picks the token from a login response: first non-empty string among
/// `token`, `access`, `access_token`.
pub fn extract_token(body: &Value) -> Option<String> {
    TOKEN_KEYS.iter().find_map(|key| {
        body.get(*key)
            .and_then(Value::as_str)
            .filter(|v| !v.is_empty())
            .map(ToString::to_string)
    })
}

impl ApiClient {
    /// Posts credentials and returns the bearer token.
    ///
    /// # Errors
    /// - [`ApiError::Status`] with the server `detail` on a non-2xx answer
    /// - [`ApiError::TokenNotFound`] when the body has no usable token field
    /// - [`ApiError::Transport`] / [`ApiError::Decode`] for network or body failures
    pub async fn login(&self, credentials: &Credentials) -> Result<String, ApiError> {
        tracing::info!(username = %credentials.username, "logging in");
        let response = self
            .post_public(ApiAction::Login, LOGIN_PATH, credentials)
            .await?;
        let body: Value = super::decode(ApiAction::Login, response).await?;
        extract_token(&body).ok_or(ApiError::TokenNotFound)
    }

    /// Creates an account. Does not authenticate.
    ///
    /// # Errors
    /// Same pattern as [`ApiClient::login`], without the token check.
    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        tracing::info!(username = %registration.username, "registering account");
        self.post_public(ApiAction::Register, REGISTER_PATH, registration)
            .await?;
        Ok(())
    }
}
