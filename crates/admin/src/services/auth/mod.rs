//! Dashboard sign-in.
//!
//! Credentials are checked by the REST backend; this service validates the
//! form, calls `auth/login` and turns the response into a [`Session`].

mod error;

pub use error::AuthError;

use jatim_bissa_core::{Email, Role};
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, ApiError, LoginUser};
use crate::models::Session;

/// Sign-in service over the shared backend client.
pub struct AuthService<'a> {
    api: &'a ApiClient,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(api: &'a ApiClient) -> Self {
        Self { api }
    }

    /// Sign in with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidEmail` or `AuthError::MissingPassword`
    /// before any network call, `AuthError::InvalidCredentials` when the
    /// backend rejects the pair, and `AuthError::MissingToken` when the
    /// response has no token.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<Session, AuthError> {
        let email = Email::parse(email)?;
        if password.expose_secret().is_empty() {
            return Err(AuthError::MissingPassword);
        }

        let response = self
            .api
            .login(email.as_str(), password)
            .await
            .map_err(|e| match e {
                ApiError::Unauthorized | ApiError::Validation(_) | ApiError::NotFound => {
                    AuthError::InvalidCredentials
                }
                other => AuthError::Api(other),
            })?;

        let session = session_from(response.user)?;
        info!(role = ?session.role(), "Admin signed in");
        Ok(session)
    }
}

/// Session for a successful login response.
///
/// An unknown role is kept as no role; the route guard then denies every
/// guarded page.
fn session_from(user: LoginUser) -> Result<Session, AuthError> {
    let token = user
        .token
        .filter(|t| !t.expose_secret().trim().is_empty())
        .ok_or(AuthError::MissingToken)?;

    let role = user.role.as_deref().and_then(|r| match r.parse::<Role>() {
        Ok(role) => Some(role),
        Err(e) => {
            warn!(error = %e, "Login returned an unknown role");
            None
        }
    });

    Ok(Session::authenticated(
        token,
        role,
        user.has_completed_profile,
    ))
}
