//! Cookie-backed session storage.
//!
//! Handlers never touch cookies directly; they go through a
//! [`SessionProvider`]. [`CookieSession`] persists to the browser's cookie
//! jar, [`MemorySession`] keeps the session in memory for tests and tools.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use secrecy::ExposeSecret;

use crate::config::DashboardConfig;
use crate::models::{Session, session_keys};
use crate::models::session::TRUE_SENTINEL;

/// Read, write and clear the current session.
pub trait SessionProvider {
    /// The current session. Missing or malformed values read as anonymous.
    fn read(&self) -> Session;

    /// Persist `session`. Anonymous sessions are persisted by clearing.
    fn write(&mut self, session: &Session);

    /// Remove every trace of the session.
    fn clear(&mut self);
}

/// Session stored in the `token`, `role`, `isLogin` and `userProfile`
/// cookies.
#[derive(Debug, Clone)]
pub struct CookieSession {
    jar: CookieJar,
    secure: bool,
    ttl_hours: i64,
}

impl CookieSession {
    #[must_use]
    pub const fn new(jar: CookieJar, secure: bool, ttl_hours: i64) -> Self {
        Self {
            jar,
            secure,
            ttl_hours,
        }
    }

    /// Cookie settings taken from the dashboard configuration.
    #[must_use]
    pub fn from_config(jar: CookieJar, config: &DashboardConfig) -> Self {
        Self::new(jar, config.secure_cookies(), config.session_ttl_hours)
    }

    /// The jar with every pending change, to return from a handler.
    #[must_use]
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }

    fn value(&self, name: &str) -> Option<&str> {
        self.jar.get(name).map(Cookie::value)
    }

    fn set(&mut self, name: &'static str, value: String) {
        let cookie = Cookie::build((name, value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::hours(self.ttl_hours));
        self.jar = std::mem::take(&mut self.jar).add(cookie);
    }

    fn unset(&mut self, name: &'static str) {
        self.jar = std::mem::take(&mut self.jar).remove(Cookie::build(name).path("/"));
    }
}

impl SessionProvider for CookieSession {
    fn read(&self) -> Session {
        Session::from_cookie_values(
            self.value(session_keys::IS_LOGIN),
            self.value(session_keys::TOKEN),
            self.value(session_keys::ROLE),
            self.value(session_keys::USER_PROFILE),
        )
    }

    fn write(&mut self, session: &Session) {
        let Some(token) = session.token().filter(|_| session.is_authenticated()) else {
            self.clear();
            return;
        };

        self.set(session_keys::TOKEN, token.expose_secret().to_owned());
        self.set(session_keys::IS_LOGIN, TRUE_SENTINEL.to_owned());

        match session.role() {
            Some(role) => self.set(session_keys::ROLE, role.as_str().to_owned()),
            None => self.unset(session_keys::ROLE),
        }
        match session.has_completed_profile() {
            Some(done) => self.set(session_keys::USER_PROFILE, done.to_string()),
            None => self.unset(session_keys::USER_PROFILE),
        }
    }

    fn clear(&mut self) {
        for name in session_keys::ALL {
            self.unset(name);
        }
    }
}

/// In-memory session, for tests and command-line tools.
#[derive(Debug, Clone, Default)]
pub struct MemorySession {
    session: Session,
}

impl MemorySession {
    #[must_use]
    pub const fn new(session: Session) -> Self {
        Self { session }
    }
}

impl SessionProvider for MemorySession {
    fn read(&self) -> Session {
        self.session.clone()
    }

    fn write(&mut self, session: &Session) {
        self.session = if session.is_authenticated() && session.has_token() {
            session.clone()
        } else {
            Session::anonymous()
        };
    }

    fn clear(&mut self) {
        self.session = Session::anonymous();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use jatim_bissa_core::Role;
    use secrecy::SecretString;

    use super::*;

    fn live_session() -> Session {
        Session::authenticated(
            SecretString::from("tok-abc"),
            Some(Role::Admin),
            Some(false),
        )
    }

    #[test]
    fn test_cookie_session_round_trip() {
        let mut store = CookieSession::new(CookieJar::new(), false, 24);
        store.write(&live_session());

        let jar = store.clone().into_jar();
        assert_eq!(jar.get("token").unwrap().value(), "tok-abc");
        assert_eq!(jar.get("role").unwrap().value(), "admin");
        assert_eq!(jar.get("isLogin").unwrap().value(), "true");
        assert_eq!(jar.get("userProfile").unwrap().value(), "false");

        let session = store.read();
        assert!(session.is_authenticated());
        assert_eq!(session.role(), Some(Role::Admin));
        assert_eq!(session.has_completed_profile(), Some(false));
    }

    #[test]
    fn test_cookie_attributes() {
        let mut store = CookieSession::new(CookieJar::new(), true, 12);
        store.write(&live_session());
        let jar = store.into_jar();
        let cookie = jar.get("token").unwrap();
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(time::Duration::hours(12)));
    }

    #[test]
    fn test_cookie_session_clear() {
        let mut store = CookieSession::new(CookieJar::new(), false, 24);
        store.write(&live_session());
        store.clear();
        assert!(!store.read().is_authenticated());
        let jar = store.into_jar();
        assert!(jar.get("token").is_none());
        assert!(jar.get("isLogin").is_none());
    }

    #[test]
    fn test_writing_tokenless_session_clears() {
        let mut store = CookieSession::new(CookieJar::new(), false, 24);
        store.write(&live_session());
        store.write(&Session::authenticated(SecretString::from(""), None, None));
        assert!(!store.read().is_authenticated());
    }

    #[test]
    fn test_memory_session() {
        let mut store = MemorySession::default();
        assert!(!store.read().is_authenticated());

        store.write(&live_session());
        assert_eq!(store.read().role(), Some(Role::Admin));

        store.clear();
        assert!(!store.read().is_authenticated());
    }
}
