//! Sign-in, sign-out and the pages around them.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use axum_extra::extract::cookie::CookieJar;
use secrecy::SecretString;
use serde::Deserialize;
use tracing::{info, instrument, warn};

use super::{Layout, render};
use crate::config::DashboardConfig;
use crate::error::AppError;
use crate::middleware::{CookieSession, CurrentSession, SessionProvider};
use crate::services::{AuthError, AuthService, paths};
use crate::state::AppState;

/// Query flag set when a backend 401 ended the session.
const EXPIRED_QUERY: &str = "expired=1";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(paths::LOGIN, get(login_page).post(login))
        .route(paths::REGISTER, get(register_page))
        .route(paths::FORGOT_PASSWORD, get(forgot_password_page))
        .route("/logout", post(logout))
        .route(paths::UNAUTHORIZED, get(unauthorized_page))
}

/// Clear the session cookies and send the admin back to the login page.
///
/// Used whenever the backend answers 401 to the session's token.
pub(crate) fn session_expired(jar: CookieJar, config: &DashboardConfig) -> Response {
    let mut cookies = CookieSession::from_config(jar, config);
    cookies.clear();
    info!("Backend rejected session token, signing out");
    (
        cookies.into_jar(),
        Redirect::to(&format!("{}?{EXPIRED_QUERY}", paths::LOGIN)),
    )
        .into_response()
}

// =============================================================================
// Login
// =============================================================================

#[derive(Template)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub layout: Layout,
    pub email: String,
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginQuery {
    #[serde(default)]
    pub expired: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    pub password: SecretString,
}

/// Login page. `?expired=1` explains why the admin was signed out.
#[instrument(skip_all)]
pub async fn login_page(Query(query): Query<LoginQuery>) -> Result<Response, AppError> {
    let notice = query
        .expired
        .is_some()
        .then(|| "Your session has expired. Please sign in again.".to_string());

    let template = LoginTemplate {
        layout: Layout::public("Sign in"),
        email: String::new(),
        error: None,
        notice,
    };
    Ok(render(&template)?.into_response())
}

/// Sign in through the backend and persist the session in cookies.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    match AuthService::new(state.api()).login(&form.email, &form.password).await {
        Ok(session) => {
            let mut cookies = CookieSession::from_config(jar, state.config());
            cookies.write(&session);
            Ok((cookies.into_jar(), Redirect::to(paths::DASHBOARD)).into_response())
        }
        Err(e) => {
            if matches!(e, AuthError::Api(_) | AuthError::MissingToken) {
                warn!(error = %e, "Sign-in failed");
            }
            let status = match e {
                AuthError::Api(_) | AuthError::MissingToken => StatusCode::BAD_GATEWAY,
                _ => StatusCode::UNPROCESSABLE_ENTITY,
            };
            let template = LoginTemplate {
                layout: Layout::public("Sign in"),
                email: form.email.trim().to_string(),
                error: Some(e.user_message()),
                notice: None,
            };
            Ok((status, render(&template)?).into_response())
        }
    }
}

/// Clear the session cookies.
#[instrument(skip_all)]
pub async fn logout(State(state): State<AppState>, jar: CookieJar) -> Response {
    let mut cookies = CookieSession::from_config(jar, state.config());
    cookies.clear();
    (cookies.into_jar(), Redirect::to(paths::LOGIN)).into_response()
}

// =============================================================================
// Notice pages
// =============================================================================

#[derive(Template)]
#[template(path = "auth/notice.html")]
pub struct NoticeTemplate {
    pub layout: Layout,
    pub heading: &'static str,
    pub message: &'static str,
}

/// Admin accounts are created by a superadmin, not by self-registration.
pub async fn register_page() -> Result<Response, AppError> {
    let template = NoticeTemplate {
        layout: Layout::public("Register"),
        heading: "Admin accounts are invite-only",
        message: "Ask a superadmin to create an account for you from the Admins page.",
    };
    Ok(render(&template)?.into_response())
}

pub async fn forgot_password_page() -> Result<Response, AppError> {
    let template = NoticeTemplate {
        layout: Layout::public("Forgot password"),
        heading: "Reset your password",
        message: "Contact a superadmin to have your password reset.",
    };
    Ok(render(&template)?.into_response())
}

#[derive(Template)]
#[template(path = "auth/unauthorized.html")]
pub struct UnauthorizedTemplate {
    pub layout: Layout,
}

/// Permission denied. Rendered for anyone; the guard sends admins here.
pub async fn unauthorized_page(
    State(state): State<AppState>,
    CurrentSession(session): CurrentSession,
) -> Result<Response, AppError> {
    let layout = if session.is_authenticated() {
        Layout::signed_in("Access denied", &session, state.guard(), paths::UNAUTHORIZED)
    } else {
        Layout::public("Access denied")
    };
    let template = UnauthorizedTemplate { layout };
    Ok((StatusCode::FORBIDDEN, render(&template)?).into_response())
}
