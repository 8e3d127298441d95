//! Integration tests for the Jatim Bissa admin dashboard.
//!
//! Each test spawns two servers on ephemeral ports: a fake REST backend that
//! records every request it receives, and the dashboard router pointed at it.
//! Tests then drive the dashboard over HTTP with redirects disabled, so guard
//! decisions show up as `Location` headers.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p jatim-bissa-integration-tests
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use jatim_bissa_admin::{AppState, DashboardConfig};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// Bearer token the fake backend accepts.
pub const LIVE_TOKEN: &str = "tok-live";
/// Bearer token the fake backend answers with 401.
pub const EXPIRED_TOKEN: &str = "tok-expired";
/// Password every fixture account signs in with.
pub const PASSWORD: &str = "rahasia123";
/// Fixture account with the `admin` role.
pub const ADMIN_EMAIL: &str = "admin@jatimbissa.id";
/// Fixture account with the `superadmin` role.
pub const SUPERADMIN_EMAIL: &str = "super@jatimbissa.id";

// =============================================================================
// Fake backend
// =============================================================================

/// One request the fake backend received, relative to `/api/`.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub path: String,
    pub authorization: Option<String>,
    pub body: Value,
}

/// In-process stand-in for the REST backend.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeBackend {
    /// Every request received so far.
    #[must_use]
    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().expect("request log poisoned").clone()
    }

    /// Requests with the given method and path.
    #[must_use]
    pub fn requests_to(&self, method: &Method, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == *method && r.path == path)
            .collect()
    }

    fn record(&self, request: Recorded) {
        self.requests
            .lock()
            .expect("request log poisoned")
            .push(request);
    }

    fn router(self) -> Router {
        Router::new().fallback(handle).with_state(self)
    }
}

async fn handle(
    State(backend): State<FakeBackend>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().trim_start_matches("/api/").to_string();
    let authorization = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = serde_json::from_slice(&body).unwrap_or(Value::Null);

    backend.record(Recorded {
        method: method.clone(),
        path: path.clone(),
        authorization: authorization.clone(),
        body: body.clone(),
    });

    if method == Method::POST && path == "auth/login" {
        return login(&body);
    }

    if authorization.as_deref() != Some(format!("Bearer {LIVE_TOKEN}").as_str()) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Unauthenticated."})),
        )
            .into_response();
    }

    if method == Method::GET {
        return match collection(&path) {
            Some(body) => Json(body).into_response(),
            None => (StatusCode::NOT_FOUND, Json(json!({"message": "Not found"}))).into_response(),
        };
    }

    Json(json!({"success": true, "message": "OK"})).into_response()
}

fn login(body: &Value) -> Response {
    let email = body.get("email").and_then(Value::as_str).unwrap_or_default();
    let password = body.get("password").and_then(Value::as_str).unwrap_or_default();

    let role = match email {
        ADMIN_EMAIL => "admin",
        SUPERADMIN_EMAIL => "superadmin",
        _ => "",
    };
    if role.is_empty() || password != PASSWORD {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"message": "Invalid credentials"})),
        )
            .into_response();
    }

    Json(json!({
        "user": {"id": 1, "name": "Sari", "email": email, "role": role, "token": LIVE_TOKEN}
    }))
    .into_response()
}

/// Fixture collections, in each of the wrapper shapes the backend uses.
fn collection(resource: &str) -> Option<Value> {
    let body = match resource {
        "admins" => json!([
            {"id": 1, "name": "Sari", "email": ADMIN_EMAIL, "role": "admin",
             "created_at": "2024-10-01 08:00:00"},
            {"id": 2, "name": "Budi", "email": SUPERADMIN_EMAIL, "role": "superadmin",
             "created_at": "2024-09-01 08:00:00"}
        ]),
        "companies" => json!({"data": [
            {"id": 10, "company_name": "PT Inklusi Nusantara", "email": "hr@inklusi.co.id",
             "status": "active", "province": {"id": 35, "name": "Jawa Timur"},
             "regency": {"id": 3578, "name": "Kota Surabaya"},
             "created_at": "2024-11-02 09:30:00"}
        ]}),
        "users" => json!({"success": true, "data": [
            {"id": 77, "full_name": "Andi Wijaya", "email": "andi@mail.com",
             "phone": "628123456789", "disability_type": "Tunarungu", "status": "active",
             "created_at": "2024-11-20 14:05:00"},
            {"id": 78, "full_name": "Rina Lestari", "email": "rina@mail.com",
             "disability_type": "Tunanetra", "status": "inactive",
             "created_at": "2024-11-21 10:00:00"}
        ]}),
        "jobs" => json!({"data": []}),
        "applications" => json!([
            {"id": 500, "status": "pending", "created_at": "2024-12-01 10:00:00",
             "user": {"name": "Andi Wijaya"}, "job": {"title": "Operator Data"}}
        ]),
        _ => return None,
    };
    Some(body)
}

// =============================================================================
// Dashboard under test
// =============================================================================

/// A running dashboard wired to a [`FakeBackend`].
pub struct TestApp {
    pub address: SocketAddr,
    pub backend: FakeBackend,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the fake backend and the dashboard.
    ///
    /// # Panics
    ///
    /// Panics if either server cannot bind or the dashboard fails to build.
    pub async fn spawn() -> Self {
        let backend = FakeBackend::default();
        let backend_address = serve(backend.clone().router()).await;

        let config = DashboardConfig::for_api(&format!("http://{backend_address}/api"))
            .expect("valid backend url");
        let state = AppState::new(config).expect("dashboard state");
        let address = serve(jatim_bissa_admin::router(state)).await;

        let client = reqwest::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .expect("http client");

        Self {
            address,
            backend,
            client,
        }
    }

    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.address)
    }

    /// `GET` with an optional `Cookie` header.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn get(&self, path: &str, cookies: Option<&str>) -> reqwest::Response {
        let mut request = self.client.get(self.url(path));
        if let Some(cookies) = cookies {
            request = request.header(header::COOKIE, cookies);
        }
        request.send().await.expect("request sent")
    }

    /// Form `POST` with an optional `Cookie` header.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be sent.
    pub async fn post_form(
        &self,
        path: &str,
        cookies: Option<&str>,
        form: &[(&str, &str)],
    ) -> reqwest::Response {
        let mut request = self.client.post(self.url(path)).form(form);
        if let Some(cookies) = cookies {
            request = request.header(header::COOKIE, cookies);
        }
        request.send().await.expect("request sent")
    }
}

async fn serve(app: Router) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let address = listener.local_addr().expect("local address");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    address
}

/// `Cookie` header for a signed-in session.
#[must_use]
pub fn session_cookie(role: &str, token: &str) -> String {
    format!("isLogin=true; token={token}; role={role}")
}

/// The `Location` header of a redirect.
#[must_use]
pub fn location(response: &reqwest::Response) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

/// Every `Set-Cookie` header on a response.
#[must_use]
pub fn set_cookies(response: &reqwest::Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_owned)
        .collect()
}
