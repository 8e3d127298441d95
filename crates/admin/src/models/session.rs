//! Session state read from the dashboard's cookies.
//!
//! The backend issues a bearer token and a role at login. The dashboard keeps
//! both in cookies, next to two boolean sentinels: `isLogin` (the session is
//! live) and `userProfile` (the job seeker finished their profile).

use jatim_bissa_core::Role;
use secrecy::{ExposeSecret, SecretString};

/// Cookie names used to persist the session.
pub mod keys {
    /// Opaque bearer credential issued by the backend.
    pub const TOKEN: &str = "token";
    /// Role claim (`superadmin`, `admin`, `user`).
    pub const ROLE: &str = "role";
    /// `"true"` while the session is live.
    pub const IS_LOGIN: &str = "isLogin";
    /// `"true"` / `"false"`; gates the resume-builder redirects.
    pub const USER_PROFILE: &str = "userProfile";

    /// Every cookie owned by the session, for clearing.
    pub const ALL: [&str; 4] = [TOKEN, ROLE, IS_LOGIN, USER_PROFILE];
}

/// The sentinel value the `isLogin` and `userProfile` cookies use for "yes".
pub const TRUE_SENTINEL: &str = "true";

/// Authentication state for one request.
///
/// Only [`Session::anonymous`] and [`Session::authenticated`] build values, so
/// an unauthenticated session never carries a token or a role.
#[derive(Debug, Clone)]
pub struct Session {
    token: Option<SecretString>,
    role: Option<Role>,
    is_authenticated: bool,
    has_completed_profile: Option<bool>,
}

impl Session {
    /// A visitor without a session.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            token: None,
            role: None,
            is_authenticated: false,
            has_completed_profile: None,
        }
    }

    /// A live session. An empty token is stored as absent.
    #[must_use]
    pub fn authenticated(
        token: SecretString,
        role: Option<Role>,
        has_completed_profile: Option<bool>,
    ) -> Self {
        let token = (!token.expose_secret().trim().is_empty()).then_some(token);
        Self {
            token,
            role,
            is_authenticated: true,
            has_completed_profile,
        }
    }

    /// Build a session from raw cookie values.
    ///
    /// Fail-closed: anything but the exact `"true"` sentinel in `isLogin`
    /// yields an anonymous session, an unknown role string yields no role,
    /// and a `userProfile` value other than `"true"`/`"false"` is unknown.
    #[must_use]
    pub fn from_cookie_values(
        is_login: Option<&str>,
        token: Option<&str>,
        role: Option<&str>,
        user_profile: Option<&str>,
    ) -> Self {
        if is_login != Some(TRUE_SENTINEL) {
            return Self::anonymous();
        }

        let token = SecretString::from(token.unwrap_or_default().trim());
        let role = role.and_then(|r| r.parse::<Role>().ok());
        let has_completed_profile = match user_profile {
            Some(TRUE_SENTINEL) => Some(true),
            Some("false") => Some(false),
            _ => None,
        };

        Self::authenticated(token, role, has_completed_profile)
    }

    #[must_use]
    pub const fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    #[must_use]
    pub const fn role(&self) -> Option<Role> {
        self.role
    }

    #[must_use]
    pub const fn token(&self) -> Option<&SecretString> {
        self.token.as_ref()
    }

    /// Whether a non-empty bearer token is present.
    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// `None` when the profile state is unknown.
    #[must_use]
    pub const fn has_completed_profile(&self) -> Option<bool> {
        self.has_completed_profile
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::anonymous()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_cookies_are_anonymous() {
        let session = Session::from_cookie_values(None, None, None, None);
        assert!(!session.is_authenticated());
        assert!(session.role().is_none());
        assert!(!session.has_token());
    }

    #[test]
    fn test_malformed_is_login_is_anonymous() {
        for value in ["", "TRUE", "1", "yes", "true ", "false"] {
            let session =
                Session::from_cookie_values(Some(value), Some("tok"), Some("admin"), None);
            assert!(!session.is_authenticated(), "isLogin={value:?}");
            assert!(session.role().is_none());
            assert!(session.token().is_none());
        }
    }

    #[test]
    fn test_live_session() {
        let session = Session::from_cookie_values(
            Some("true"),
            Some("abc123"),
            Some("superadmin"),
            Some("true"),
        );
        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(Role::SuperAdmin));
        assert_eq!(session.token().unwrap().expose_secret(), "abc123");
        assert_eq!(session.has_completed_profile(), Some(true));
    }

    #[test]
    fn test_unknown_role_and_profile_values() {
        let session =
            Session::from_cookie_values(Some("true"), Some("abc"), Some("root"), Some("maybe"));
        assert!(session.is_authenticated());
        assert!(session.role().is_none());
        assert!(session.has_completed_profile().is_none());
    }

    #[test]
    fn test_blank_token_is_absent() {
        let session = Session::from_cookie_values(Some("true"), Some("   "), Some("admin"), None);
        assert!(session.is_authenticated());
        assert!(!session.has_token());
    }

    #[test]
    fn test_debug_redacts_token() {
        let session = Session::authenticated(SecretString::from("s3cr3t-token"), None, None);
        let debug = format!("{session:?}");
        assert!(!debug.contains("s3cr3t-token"));
    }
}
