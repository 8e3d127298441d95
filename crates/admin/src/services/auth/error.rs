//! Sign-in error types.

use thiserror::Error;

use crate::api::ApiError;

/// Errors that can occur while signing in.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email failed the format check; nothing was sent.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] jatim_bissa_core::EmailError),

    /// Password left blank; nothing was sent.
    #[error("password is required")]
    MissingPassword,

    /// Backend rejected the credentials.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Backend accepted the credentials but sent no token.
    #[error("login response carried no token")]
    MissingToken,

    /// Transport or unexpected backend failure.
    #[error("backend error: {0}")]
    Api(#[from] ApiError),
}

impl AuthError {
    /// Message shown above the login form.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidEmail(_) => "Enter a valid email address.".to_string(),
            Self::MissingPassword => "Enter your password.".to_string(),
            Self::InvalidCredentials => "Incorrect email or password.".to_string(),
            Self::MissingToken => {
                "Sign-in did not complete. Please try again or contact support.".to_string()
            }
            Self::Api(e) => e.user_message(),
        }
    }
}
