//! Route guard middleware and session extractors.
//!
//! [`route_guard`] runs before every guarded page and turns the guard's
//! decision into a redirect. Handlers behind it use [`RequireSession`] to get
//! the session and its bearer token.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use secrecy::SecretString;
use tracing::{Span, debug};

use crate::middleware::session::{CookieSession, SessionProvider};
use crate::models::Session;
use crate::services::{GuardDecision, paths};
use crate::state::AppState;

/// Evaluate the route guard for the request path.
///
/// Paths outside the guard's matcher pass straight through.
pub async fn route_guard(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().path().to_owned();
    let guard = state.guard();
    if !guard.applies_to(&path) {
        return next.run(request).await;
    }

    let session = CookieSession::from_config(jar, state.config()).read();
    if let Some(role) = session.role() {
        Span::current().record("role", role.as_str());
    }

    match guard.evaluate(&path, &session) {
        GuardDecision::Allow => next.run(request).await,
        GuardDecision::Redirect { to, reason } => {
            debug!(%path, %to, reason = reason.as_str(), "Route guard redirect");
            Redirect::to(&to).into_response()
        }
    }
}

/// Extractor that requires a signed-in session with a bearer token.
///
/// The route guard already redirects anonymous visitors; this is the
/// handler-side check that also hands out the token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireSession { session, token }: RequireSession) -> impl IntoResponse {
///     format!("role: {:?}", session.role())
/// }
/// ```
pub struct RequireSession {
    pub session: Session,
    pub token: SecretString,
}

/// Returned when a handler needs a session and there is none.
pub struct SessionRejection;

impl IntoResponse for SessionRejection {
    fn into_response(self) -> Response {
        Redirect::to(paths::LOGIN).into_response()
    }
}

impl<S> FromRequestParts<S> for RequireSession
where
    S: Send + Sync,
{
    type Rejection = SessionRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let session = CookieSession::new(jar, false, 0).read();

        if !session.is_authenticated() {
            return Err(SessionRejection);
        }
        let token = session.token().cloned().ok_or(SessionRejection)?;

        Ok(Self { session, token })
    }
}

/// Extractor for pages that render for anyone, such as the unauthorized
/// page; yields an anonymous session when nobody is signed in.
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        Ok(Self(CookieSession::new(jar, false, 0).read()))
    }
}
