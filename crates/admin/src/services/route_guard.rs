//! Route authorization policy.
//!
//! [`RouteGuard::evaluate`] is a pure function of the request path and the
//! [`Session`]: no I/O, no clock, no randomness. The axum middleware in
//! [`crate::middleware::auth`] only reads cookies and turns the decision into
//! a response.
//!
//! Rules, first match wins:
//!
//! 1. Signed in and on a public-only auth page: go to the landing page.
//! 2. Not signed in and not on a public-only page: go to login.
//! 3. Signed in but the token is missing: go to login.
//! 4. Signed in and the role may not reach the path: go to unauthorized.
//!    Roles without a policy entry (or no role at all) reach nothing.
//! 5. Profile redirects between the resume intake and output pages.
//! 6. Allow.

use std::collections::HashMap;

use jatim_bissa_core::Role;

use crate::models::Session;

/// Well-known dashboard paths.
pub mod paths {
    pub const LOGIN: &str = "/admin/login";
    pub const REGISTER: &str = "/admin/register";
    pub const FORGOT_PASSWORD: &str = "/admin/forgot-password";
    pub const DASHBOARD: &str = "/dashboard";
    pub const UNAUTHORIZED: &str = "/unauthorized";
    pub const PROFILE: &str = "/profile";
    pub const RESUME_INTAKE: &str = "/resume-builder";
    pub const RESUME_OUTPUT: &str = "/resume-builder/result";
    pub const MANAGEMENT_ADMIN: &str = "/management-admin";
    pub const MANAGEMENT_COMPANY: &str = "/management-company";
    pub const MANAGEMENT_USER: &str = "/management-user";
    pub const MANAGEMENT_JOB: &str = "/management-job";
    pub const MANAGEMENT_APPLICATION: &str = "/management-application";
}

/// Why the guard redirected a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    AlreadySignedIn,
    SignInRequired,
    MissingToken,
    Forbidden,
    ProfileIncomplete,
    ProfileComplete,
}

impl RedirectReason {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlreadySignedIn => "already_signed_in",
            Self::SignInRequired => "sign_in_required",
            Self::MissingToken => "missing_token",
            Self::Forbidden => "forbidden",
            Self::ProfileIncomplete => "profile_incomplete",
            Self::ProfileComplete => "profile_complete",
        }
    }
}

/// Outcome of evaluating one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect {
        to: String,
        reason: RedirectReason,
    },
}

impl GuardDecision {
    fn redirect(to: &str, reason: RedirectReason) -> Self {
        Self::Redirect {
            to: to.to_owned(),
            reason,
        }
    }

    #[must_use]
    pub const fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Static mapping from role to the path prefixes it may reach.
#[derive(Debug, Clone, Default)]
pub struct RouteAccessPolicy {
    allowed: HashMap<Role, Vec<String>>,
}

impl RouteAccessPolicy {
    /// An empty policy that denies every role.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant `role` the given prefixes. An empty list leaves the role
    /// unmapped, so every role in the policy has at least one prefix.
    #[must_use]
    pub fn allow<I, P>(mut self, role: Role, prefixes: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        let prefixes: Vec<String> = prefixes
            .into_iter()
            .map(|p| normalize_path(&p.into()).to_owned())
            .collect();
        if !prefixes.is_empty() {
            self.allowed.entry(role).or_default().extend(prefixes);
        }
        self
    }

    /// The dashboard's policy: superadmins manage everything, admins
    /// everything but other admins, job seekers only their own pages.
    #[must_use]
    pub fn standard() -> Self {
        let shared = [
            paths::DASHBOARD,
            paths::PROFILE,
            paths::MANAGEMENT_COMPANY,
            paths::MANAGEMENT_USER,
            paths::MANAGEMENT_JOB,
            paths::MANAGEMENT_APPLICATION,
        ];

        Self::new()
            .allow(Role::SuperAdmin, shared)
            .allow(Role::SuperAdmin, [paths::MANAGEMENT_ADMIN])
            .allow(Role::Admin, shared)
            .allow(
                Role::User,
                [paths::DASHBOARD, paths::PROFILE, paths::RESUME_INTAKE],
            )
    }

    /// Whether `role` has an entry at all.
    #[must_use]
    pub fn has_entry(&self, role: Role) -> bool {
        self.allowed.contains_key(&role)
    }

    /// Whether `role` may reach `path`. Unmapped roles may reach nothing.
    #[must_use]
    pub fn permits(&self, role: Role, path: &str) -> bool {
        let path = normalize_path(path);
        self.allowed
            .get(&role)
            .is_some_and(|prefixes| prefixes.iter().any(|p| has_path_prefix(path, p)))
    }

    /// Prefixes granted to `role`, in insertion order.
    #[must_use]
    pub fn prefixes(&self, role: Role) -> &[String] {
        self.allowed.get(&role).map_or(&[], Vec::as_slice)
    }
}

/// The route guard: policy plus the paths the rules refer to.
#[derive(Debug, Clone)]
pub struct RouteGuard {
    policy: RouteAccessPolicy,
    /// Only paths under one of these prefixes are evaluated.
    matched_prefixes: Vec<String>,
    /// Pages only visitors without a session should see.
    public_only: Vec<String>,
    login: String,
    landing: String,
    unauthorized: String,
    resume_intake: String,
    resume_output: String,
}

impl Default for RouteGuard {
    fn default() -> Self {
        Self::new(RouteAccessPolicy::standard())
    }
}

impl RouteGuard {
    /// A guard with the dashboard's standard paths and the given policy.
    #[must_use]
    pub fn new(policy: RouteAccessPolicy) -> Self {
        let public_only = [paths::LOGIN, paths::REGISTER, paths::FORGOT_PASSWORD];
        let matched = [
            paths::DASHBOARD,
            paths::PROFILE,
            paths::RESUME_INTAKE,
            paths::MANAGEMENT_ADMIN,
            paths::MANAGEMENT_COMPANY,
            paths::MANAGEMENT_USER,
            paths::MANAGEMENT_JOB,
            paths::MANAGEMENT_APPLICATION,
        ];

        Self {
            policy,
            matched_prefixes: matched
                .iter()
                .chain(public_only.iter())
                .map(|p| (*p).to_owned())
                .collect(),
            public_only: public_only.iter().map(|p| (*p).to_owned()).collect(),
            login: paths::LOGIN.to_owned(),
            landing: paths::DASHBOARD.to_owned(),
            unauthorized: paths::UNAUTHORIZED.to_owned(),
            resume_intake: paths::RESUME_INTAKE.to_owned(),
            resume_output: paths::RESUME_OUTPUT.to_owned(),
        }
    }

    #[must_use]
    pub const fn policy(&self) -> &RouteAccessPolicy {
        &self.policy
    }

    /// Whether the guard runs for `path` at all (the route matcher).
    #[must_use]
    pub fn applies_to(&self, path: &str) -> bool {
        let path = normalize_path(path);
        self.matched_prefixes
            .iter()
            .any(|prefix| has_path_prefix(path, prefix))
    }

    fn is_public_only(&self, path: &str) -> bool {
        self.public_only.iter().any(|p| p == path)
    }

    /// Decide what happens to a request for `path`.
    #[must_use]
    pub fn evaluate(&self, path: &str, session: &Session) -> GuardDecision {
        let path = normalize_path(path);
        let public_only = self.is_public_only(path);

        if session.is_authenticated() && public_only {
            return GuardDecision::redirect(&self.landing, RedirectReason::AlreadySignedIn);
        }

        if !session.is_authenticated() {
            if public_only {
                return GuardDecision::Allow;
            }
            return GuardDecision::redirect(&self.login, RedirectReason::SignInRequired);
        }

        if !session.has_token() {
            return GuardDecision::redirect(&self.login, RedirectReason::MissingToken);
        }

        let permitted = session
            .role()
            .is_some_and(|role| self.policy.permits(role, path));
        if !permitted {
            return GuardDecision::redirect(&self.unauthorized, RedirectReason::Forbidden);
        }

        let profile_complete = session.has_completed_profile() == Some(true);
        if !profile_complete && has_path_prefix(path, &self.resume_output) {
            return GuardDecision::redirect(&self.resume_intake, RedirectReason::ProfileIncomplete);
        }
        if profile_complete && path == self.resume_intake {
            return GuardDecision::redirect(&self.resume_output, RedirectReason::ProfileComplete);
        }

        GuardDecision::Allow
    }
}

/// Strip trailing slashes, keeping `/` itself.
fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() { "/" } else { trimmed }
}

/// Segment-aware prefix match: `/a` matches `/a` and `/a/b`, not `/ab`.
fn has_path_prefix(path: &str, prefix: &str) -> bool {
    if prefix == "/" {
        return true;
    }
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;
    use crate::middleware::{MemorySession, SessionProvider};

    fn signed_in(role: Option<Role>) -> Session {
        Session::authenticated(SecretString::from("tok-123"), role, None)
    }

    fn redirect_target(decision: &GuardDecision) -> Option<&str> {
        match decision {
            GuardDecision::Allow => None,
            GuardDecision::Redirect { to, .. } => Some(to),
        }
    }

    #[test]
    fn test_admin_cannot_manage_admins() {
        let guard = RouteGuard::default();
        let decision = guard.evaluate("/management-admin", &signed_in(Some(Role::Admin)));
        assert_eq!(
            decision,
            GuardDecision::Redirect {
                to: "/unauthorized".to_owned(),
                reason: RedirectReason::Forbidden,
            }
        );
    }

    #[test]
    fn test_superadmin_manages_admins() {
        let guard = RouteGuard::default();
        let decision = guard.evaluate("/management-admin", &signed_in(Some(Role::SuperAdmin)));
        assert!(decision.is_allow());
        assert!(
            guard
                .evaluate("/management-admin/12/edit", &signed_in(Some(Role::SuperAdmin)))
                .is_allow()
        );
    }

    #[test]
    fn test_missing_is_login_redirects_to_login() {
        let guard = RouteGuard::default();
        let session = Session::from_cookie_values(None, Some("tok"), Some("admin"), None);
        let decision = guard.evaluate("/dashboard", &session);
        assert_eq!(redirect_target(&decision), Some("/admin/login"));
    }

    #[test]
    fn test_anonymous_may_see_public_pages() {
        let guard = RouteGuard::default();
        for path in [paths::LOGIN, paths::REGISTER, paths::FORGOT_PASSWORD] {
            assert!(guard.evaluate(path, &Session::anonymous()).is_allow(), "{path}");
        }
    }

    #[test]
    fn test_signed_in_users_leave_public_pages() {
        let guard = RouteGuard::default();
        let decision = guard.evaluate("/admin/login/", &signed_in(Some(Role::Admin)));
        assert_eq!(
            decision,
            GuardDecision::Redirect {
                to: "/dashboard".to_owned(),
                reason: RedirectReason::AlreadySignedIn,
            }
        );
    }

    #[test]
    fn test_public_page_rule_precedes_token_check() {
        let guard = RouteGuard::default();
        let session = Session::from_cookie_values(Some("true"), None, Some("admin"), None);
        let decision = guard.evaluate(paths::LOGIN, &session);
        assert_eq!(redirect_target(&decision), Some("/dashboard"));
    }

    #[test]
    fn test_signed_in_without_token_goes_to_login() {
        let guard = RouteGuard::default();
        let session = Session::from_cookie_values(Some("true"), Some(""), Some("superadmin"), None);
        let decision = guard.evaluate("/dashboard", &session);
        assert_eq!(
            decision,
            GuardDecision::Redirect {
                to: "/admin/login".to_owned(),
                reason: RedirectReason::MissingToken,
            }
        );
    }

    #[test]
    fn test_unknown_role_fails_closed() {
        let guard = RouteGuard::default();
        let session = Session::from_cookie_values(Some("true"), Some("tok"), Some("root"), None);
        let decision = guard.evaluate("/dashboard", &session);
        assert_eq!(redirect_target(&decision), Some("/unauthorized"));
    }

    #[test]
    fn test_unmapped_role_fails_closed() {
        let guard = RouteGuard::new(RouteAccessPolicy::new().allow(Role::SuperAdmin, ["/"]));
        assert!(!guard.policy().has_entry(Role::Admin));
        let decision = guard.evaluate("/dashboard", &signed_in(Some(Role::Admin)));
        assert_eq!(redirect_target(&decision), Some("/unauthorized"));
    }

    #[test]
    fn test_empty_grant_leaves_role_unmapped() {
        let policy = RouteAccessPolicy::new().allow(Role::Admin, Vec::<String>::new());
        assert!(!policy.has_entry(Role::Admin));
        assert!(policy.prefixes(Role::Admin).is_empty());
    }

    #[test]
    fn test_prefix_match_is_segment_aware() {
        let policy = RouteAccessPolicy::standard();
        assert!(policy.permits(Role::Admin, "/management-company"));
        assert!(policy.permits(Role::Admin, "/management-company/4/delete"));
        assert!(!policy.permits(Role::Admin, "/management-companyx"));
        assert!(!policy.permits(Role::Admin, "/management-admin"));
    }

    #[test]
    fn test_job_seeker_profile_redirects() {
        let guard = RouteGuard::default();
        let incomplete = Session::authenticated(
            SecretString::from("tok"),
            Some(Role::User),
            Some(false),
        );
        let complete =
            Session::authenticated(SecretString::from("tok"), Some(Role::User), Some(true));

        assert_eq!(
            guard.evaluate("/resume-builder/result", &incomplete),
            GuardDecision::Redirect {
                to: "/resume-builder".to_owned(),
                reason: RedirectReason::ProfileIncomplete,
            }
        );
        assert!(guard.evaluate("/resume-builder", &incomplete).is_allow());

        assert_eq!(
            guard.evaluate("/resume-builder", &complete),
            GuardDecision::Redirect {
                to: "/resume-builder/result".to_owned(),
                reason: RedirectReason::ProfileComplete,
            }
        );
        assert!(guard.evaluate("/resume-builder/result", &complete).is_allow());
        assert!(guard.evaluate("/resume-builder/step-2", &complete).is_allow());
    }

    #[test]
    fn test_unknown_profile_state_counts_as_incomplete() {
        let guard = RouteGuard::default();
        let decision = guard.evaluate("/resume-builder/result", &signed_in(Some(Role::User)));
        assert_eq!(redirect_target(&decision), Some("/resume-builder"));
    }

    #[test]
    fn test_job_seekers_cannot_reach_management() {
        let guard = RouteGuard::default();
        let decision = guard.evaluate("/management-job", &signed_in(Some(Role::User)));
        assert_eq!(redirect_target(&decision), Some("/unauthorized"));
    }

    #[test]
    fn test_route_matcher() {
        let guard = RouteGuard::default();
        assert!(guard.applies_to("/dashboard"));
        assert!(guard.applies_to("/management-user/3"));
        assert!(guard.applies_to("/admin/login"));
        assert!(!guard.applies_to("/health"));
        assert!(!guard.applies_to("/unauthorized"));
        assert!(!guard.applies_to("/static/app.css"));
        assert!(!guard.applies_to("/"));
    }

    #[test]
    fn test_evaluation_is_deterministic() {
        let guard = RouteGuard::default();
        let sessions = [
            Session::anonymous(),
            signed_in(None),
            signed_in(Some(Role::Admin)),
            signed_in(Some(Role::SuperAdmin)),
            signed_in(Some(Role::User)),
        ];
        let paths = [
            "/dashboard",
            "/management-admin",
            "/admin/login",
            "/resume-builder",
            "/resume-builder/result",
            "/profile",
        ];
        for session in &sessions {
            for path in paths {
                assert_eq!(guard.evaluate(path, session), guard.evaluate(path, session));
            }
        }
    }

    #[test]
    fn test_decisions_follow_the_session_store() {
        let guard = RouteGuard::default();
        let mut store = MemorySession::default();
        let target = |store: &MemorySession| {
            redirect_target(&guard.evaluate(paths::MANAGEMENT_COMPANY, &store.read()))
                .map(str::to_owned)
        };

        assert_eq!(target(&store).as_deref(), Some(paths::LOGIN));

        store.write(&signed_in(Some(Role::Admin)));
        assert_eq!(target(&store), None);

        // A token-less session is never persisted as signed in.
        store.write(&Session::authenticated(SecretString::from(" "), Some(Role::Admin), None));
        assert_eq!(target(&store).as_deref(), Some(paths::LOGIN));

        store.write(&signed_in(Some(Role::Admin)));
        store.clear();
        assert_eq!(target(&store).as_deref(), Some(paths::LOGIN));
    }
}
