//! HTTP client for the task API.
//!
//! - `auth`: login and registration (no bearer token)
//! - `tasks`: task collection CRUD through [`AuthorizedClient`]
//! - `error`: [`ApiError`] taxonomy and user-facing messages
//!
//! Every authenticated request goes through [`AuthorizedClient`], which adds
//! `Authorization: Bearer <token>` and maps HTTP 401 to
//! [`ApiError::Unauthorized`] regardless of the action.

pub mod auth;
pub mod error;
pub mod tasks;

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

pub use self::auth::{Credentials, Registration, extract_token};
pub use self::error::{ApiAction, ApiError};
use crate::config::Config;

/// Collection endpoint for tasks.
pub const TASKS_PATH: &str = "api/tasks/";
/// Login endpoint.
pub const LOGIN_PATH: &str = "api/auth/login/";
/// Registration endpoint.
pub const REGISTER_PATH: &str = "api/auth/register/";

/// Unauthenticated client bound to one API base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Creates a client for `base_url` with an optional request timeout.
    ///
    /// # Errors
    /// Returns an error if the URL is invalid or the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut normalized = base_url.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base =
            Url::parse(&normalized).with_context(|| format!("Invalid API base URL '{base_url}'"))?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self { http, base })
    }

    /// Creates a client from the effective config (env override included).
    ///
    /// # Errors
    /// Returns an error if the configured URL is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(&config.effective_api_base_url(), config.request_timeout())
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    /// Returns a client that authenticates with `token`.
    ///
    /// # Errors
    /// Returns [`ApiError::MissingToken`] when there is no token; no request is made.
    pub fn authorized<'a>(&'a self, token: Option<&'a str>) -> Result<AuthorizedClient<'a>, ApiError> {
        match token {
            Some(token) if !token.is_empty() => Ok(AuthorizedClient { api: self, token }),
            _ => Err(ApiError::MissingToken),
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path)
            .map_err(|err| ApiError::Transport(format!("Invalid request URL '{path}': {err}")))
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        tracing::debug!(%method, %url, "api request");
        Ok(self.http.request(method, url))
    }

    /// Sends an unauthenticated JSON POST and returns the response if it is 2xx.
    async fn post_public<B: Serialize + ?Sized>(
        &self,
        action: ApiAction,
        path: &str,
        body: &B,
    ) -> Result<Response, ApiError> {
        let response = self.request(Method::POST, path)?.json(body).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(?action, status = status.as_u16(), "request rejected");
        Err(ApiError::status(action, status.as_u16(), &body))
    }
}

/// Client that carries the bearer token on every request.
#[derive(Clone, Copy)]
pub struct AuthorizedClient<'a> {
    api: &'a ApiClient,
    token: &'a str,
}

impl std::fmt::Debug for AuthorizedClient<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizedClient")
            .field("base", &self.api.base.as_str())
            .finish_non_exhaustive()
    }
}

impl AuthorizedClient<'_> {
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        Ok(self.api.request(method, path)?.bearer_auth(self.token))
    }

    /// Sends the request; 401 becomes `Unauthorized`, other non-2xx a status error.
    async fn execute(&self, action: ApiAction, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED {
            tracing::info!(?action, "server rejected session token");
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(?action, status = status.as_u16(), "request rejected");
            return Err(ApiError::status(action, status.as_u16(), &body));
        }

        Ok(response)
    }

    async fn send_empty(&self, action: ApiAction, method: Method, path: &str) -> Result<Response, ApiError> {
        let request = self.request(method, path)?;
        self.execute(action, request).await
    }

    /// JSON body requests; `.json()` also sets `Content-Type: application/json`.
    async fn send_json<B: Serialize + ?Sized>(
        &self,
        action: ApiAction,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<Response, ApiError> {
        let request = self.request(method, path)?.json(body);
        self.execute(action, request).await
    }
}

async fn decode<T: DeserializeOwned>(action: ApiAction, response: Response) -> Result<T, ApiError> {
    response.json::<T>().await.map_err(|err| {
        tracing::warn!(?action, error = %err, "failed to decode response");
        ApiError::Decode {
            action,
            message: err.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let api = ApiClient::new("https://example.com/backend", None).unwrap();
        assert_eq!(
            api.endpoint(TASKS_PATH).unwrap().as_str(),
            "https://example.com/backend/api/tasks/"
        );
    }

    #[test]
    fn test_endpoint_on_bare_host() {
        let api = ApiClient::new("http://localhost:8000/", None).unwrap();
        assert_eq!(
            api.endpoint(LOGIN_PATH).unwrap().as_str(),
            "http://localhost:8000/api/auth/login/"
        );
    }

    #[test]
    fn test_invalid_base_url_is_rejected() {
        assert!(ApiClient::new("not a url", None).is_err());
    }

    #[test]
    fn test_authorized_requires_token() {
        let api = ApiClient::new("http://localhost:8000", None).unwrap();
        assert_eq!(api.authorized(None).unwrap_err(), ApiError::MissingToken);
        assert_eq!(api.authorized(Some("")).unwrap_err(), ApiError::MissingToken);
        assert!(api.authorized(Some("tok")).is_ok());
    }
}
