//! Account roles issued by the backend at login.

use serde::{Deserialize, Serialize};

/// Error returned when a role string is not one the dashboard knows.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown role: {0:?}")]
pub struct RoleError(pub String);

/// Role claim carried by an authenticated session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Manages everything, including other admins.
    SuperAdmin,
    /// Manages companies, job seekers, vacancies and applications.
    Admin,
    /// A job seeker; only reaches their own profile and resume pages.
    User,
}

impl Role {
    pub const ALL: [Self; 3] = [Self::SuperAdmin, Self::Admin, Self::User];

    /// Wire value, as stored in the `role` cookie.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SuperAdmin => "superadmin",
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RoleError;

    /// Case-insensitive; accepts `super_admin` and `super-admin` spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "superadmin" | "super_admin" | "super-admin" => Ok(Self::SuperAdmin),
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(RoleError(s.to_owned())),
        }
    }
}
