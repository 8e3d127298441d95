//! Route policy debugging.
//!
//! # Usage
//!
//! ```bash
//! # What happens when an admin opens the admins page?
//! jb-cli guard --path /management-admin --role admin --token t
//!
//! # An anonymous visitor
//! jb-cli guard --path /dashboard
//! ```

use jatim_bissa_admin::models::Session;
use jatim_bissa_admin::services::{GuardDecision, RouteGuard};
use jatim_bissa_core::{Role, RoleError};
use secrecy::SecretString;

/// Synthetic session described on the command line.
#[derive(Debug, Default)]
pub struct SessionArgs {
    pub role: Option<String>,
    pub token: Option<String>,
    pub profile_complete: Option<bool>,
}

impl SessionArgs {
    /// Signed in when a role or a token is given, anonymous otherwise.
    ///
    /// # Errors
    ///
    /// Returns `RoleError` for an unknown role name.
    pub fn session(&self) -> Result<Session, RoleError> {
        if self.role.is_none() && self.token.is_none() {
            return Ok(Session::anonymous());
        }
        let role = self.role.as_deref().map(str::parse::<Role>).transpose()?;
        let token = SecretString::from(self.token.clone().unwrap_or_default());
        Ok(Session::authenticated(token, role, self.profile_complete))
    }
}

/// Human-readable decision for `path` under the standard policy.
///
/// # Errors
///
/// Returns `RoleError` for an unknown role name.
pub fn evaluate(path: &str, args: &SessionArgs) -> Result<String, RoleError> {
    let session = args.session()?;
    let guard = RouteGuard::default();
    if !guard.applies_to(path) {
        return Ok(format!("{path}: not guarded"));
    }

    Ok(match guard.evaluate(path, &session) {
        GuardDecision::Allow => format!("{path}: allow"),
        GuardDecision::Redirect { to, reason } => {
            format!("{path}: redirect to {to} ({})", reason.as_str())
        }
    })
}

/// Print the decision.
///
/// # Errors
///
/// Returns `RoleError` for an unknown role name.
#[allow(clippy::print_stdout)]
pub fn run(path: &str, args: &SessionArgs) -> Result<(), RoleError> {
    println!("{}", evaluate(path, args)?);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn signed_in(role: &str) -> SessionArgs {
        SessionArgs {
            role: Some(role.into()),
            token: Some("t".into()),
            profile_complete: None,
        }
    }

    #[test]
    fn test_admin_is_kept_out_of_admin_management() {
        let out = evaluate("/management-admin", &signed_in("admin")).unwrap();
        assert!(out.starts_with("/management-admin: redirect to /unauthorized"));
    }

    #[test]
    fn test_superadmin_is_allowed() {
        assert_eq!(
            evaluate("/management-admin/3", &signed_in("superadmin")).unwrap(),
            "/management-admin/3: allow"
        );
    }

    #[test]
    fn test_anonymous_goes_to_login() {
        let out = evaluate("/dashboard", &SessionArgs::default()).unwrap();
        assert!(out.contains("redirect to /admin/login"));
    }

    #[test]
    fn test_role_without_token_goes_to_login() {
        let args = SessionArgs {
            role: Some("admin".into()),
            ..SessionArgs::default()
        };
        let out = evaluate("/dashboard", &args).unwrap();
        assert!(out.ends_with("(missing_token)"));
    }

    #[test]
    fn test_unguarded_path() {
        assert_eq!(
            evaluate("/health", &SessionArgs::default()).unwrap(),
            "/health: not guarded"
        );
    }

    #[test]
    fn test_unknown_role_is_an_error() {
        assert!(evaluate("/dashboard", &signed_in("owner")).is_err());
    }
}
