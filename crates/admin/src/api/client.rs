//! Jatim Bissa REST backend client.
//!
//! One endpoint per resource: `{base}/{resource}` for the collection and
//! `{base}/{resource}/{id}` for a record. Every authenticated call carries the
//! session's bearer token.

use std::future::Future;

use reqwest::{Client, Method, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};
use url::Url;

use super::error::ApiError;
use crate::config::ApiConfig;

/// Login endpoint, relative to the base URL.
const LOGIN_PATH: &str = "auth/login";

/// Record operations the list controller needs from the backend.
///
/// The dashboard talks to [`AuthedClient`]; tests plug in an in-memory
/// implementation.
pub trait EntityBackend: Send + Sync {
    /// Raw collection body for `resource`, before normalization.
    fn fetch_collection(&self, resource: &str)
    -> impl Future<Output = Result<Value, ApiError>> + Send;

    /// Create a record.
    fn create(
        &self,
        resource: &str,
        payload: &Value,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Update record `id`.
    fn update(
        &self,
        resource: &str,
        id: i64,
        payload: &Value,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;

    /// Delete record `id`.
    fn delete(&self, resource: &str, id: i64) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Credentials posted to the login endpoint.
#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

/// Body returned by a successful login.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: LoginUser,
}

/// Account fields returned at login.
#[derive(Clone, Deserialize)]
pub struct LoginUser {
    #[serde(default)]
    pub token: Option<SecretString>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    /// Only sent for job seekers.
    #[serde(default, alias = "is_profile_complete", alias = "profile_completed")]
    pub has_completed_profile: Option<bool>,
}

impl std::fmt::Debug for LoginUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginUser")
            .field("token", &"[REDACTED]")
            .field("role", &self.role)
            .field("id", &self.id)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// Unauthenticated client; shared by every request through `AppState`.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: Url,
}

impl ApiClient {
    /// Build a client with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Network` if the HTTP client cannot be built.
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("jatim-bissa-admin/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// A client that authenticates as the session holding `token`.
    #[must_use]
    pub fn with_token(&self, token: SecretString) -> AuthedClient {
        AuthedClient {
            api: self.clone(),
            token,
        }
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        self.base_url
            .join(path)
            .map_err(|e| ApiError::Network(format!("invalid endpoint {path:?}: {e}")))
    }

    /// Exchange credentials for a session token.
    ///
    /// # Errors
    ///
    /// Returns the classified backend error; bad credentials usually surface
    /// as `Unauthorized` or `Validation`.
    #[instrument(skip(self, password))]
    pub async fn login(
        &self,
        email: &str,
        password: &SecretString,
    ) -> Result<LoginResponse, ApiError> {
        let request = self
            .client
            .post(self.endpoint(LOGIN_PATH)?)
            .json(&LoginRequest {
                email,
                password: password.expose_secret(),
            });

        let body = send(request).await?;
        serde_json::from_value(body).map_err(|e| {
            warn!(error = %e, "Login response missing user");
            ApiError::UnexpectedShape(Some(e.to_string()))
        })
    }
}

/// Client bound to one session's bearer token.
#[derive(Clone)]
pub struct AuthedClient {
    api: ApiClient,
    token: SecretString,
}

impl std::fmt::Debug for AuthedClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthedClient")
            .field("base_url", &self.api.base_url.as_str())
            .field("token", &"[REDACTED]")
            .finish()
    }
}

impl AuthedClient {
    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let url = self.api.endpoint(path)?;
        Ok(self
            .api
            .client
            .request(method, url)
            .bearer_auth(self.token.expose_secret()))
    }
}

impl EntityBackend for AuthedClient {
    #[instrument(skip(self))]
    async fn fetch_collection(&self, resource: &str) -> Result<Value, ApiError> {
        let body = send(self.request(Method::GET, resource)?).await?;
        debug!(resource, "Fetched collection");
        Ok(body)
    }

    #[instrument(skip(self, payload))]
    async fn create(&self, resource: &str, payload: &Value) -> Result<(), ApiError> {
        send(self.request(Method::POST, resource)?.json(payload)).await?;
        debug!(resource, "Created record");
        Ok(())
    }

    #[instrument(skip(self, payload))]
    async fn update(&self, resource: &str, id: i64, payload: &Value) -> Result<(), ApiError> {
        let path = format!("{resource}/{id}");
        send(self.request(Method::PUT, &path)?.json(payload)).await?;
        debug!(resource, id, "Updated record");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, resource: &str, id: i64) -> Result<(), ApiError> {
        let path = format!("{resource}/{id}");
        send(self.request(Method::DELETE, &path)?).await?;
        debug!(resource, id, "Deleted record");
        Ok(())
    }
}

/// Send a request and return its JSON body (`Null` for empty bodies).
async fn send(request: RequestBuilder) -> Result<Value, ApiError> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::from_transport(&e))?;

    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::from_transport(&e))?;

    if !status.is_success() {
        let error = ApiError::from_response(status, &text);
        warn!(status = status.as_u16(), error = %error, "Backend request failed");
        return Err(error);
    }

    if text.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&text).map_err(|e| {
        warn!(status = status.as_u16(), error = %e, "Backend returned non-JSON body");
        ApiError::UnexpectedShape(None)
    })
}
