//! Business logic services for the dashboard.
//!
//! # Services
//!
//! - `auth` - Sign-in through the REST backend
//! - `route_guard` - Role and session based page access

pub mod auth;
pub mod route_guard;

pub use auth::{AuthError, AuthService};
pub use route_guard::{GuardDecision, RedirectReason, RouteAccessPolicy, RouteGuard, paths};
