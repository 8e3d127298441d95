//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                           - Health check
//!
//! # Auth (public-only pages redirect signed-in admins to /dashboard)
//! GET  /admin/login                      - Login page
//! POST /admin/login                      - Sign in through the backend
//! GET  /admin/register                   - Registration notice
//! GET  /admin/forgot-password            - Password reset notice
//! POST /logout                           - Clear session cookies
//! GET  /unauthorized                     - Permission denied
//!
//! # Dashboard
//! GET  /                                 - Redirect to /dashboard
//! GET  /dashboard                        - Collection counts, recent applications
//!
//! # Management (one set per entity)
//! GET  /management-{entity}              - List (?q=&status=&sort=&page=)
//! POST /management-{entity}              - Create
//! GET  /management-{entity}/new          - List with the create modal
//! GET  /management-{entity}/{id}/edit    - List with the edit modal
//! POST /management-{entity}/{id}         - Update
//! GET  /management-{entity}/{id}/delete  - List with the delete confirmation
//! POST /management-{entity}/{id}/delete  - Delete
//! ```

use askama::Template;
use axum::{
    Router,
    response::{Html, Redirect},
    routing::get,
};
use jatim_bissa_core::Role;

use crate::entities::{Admins, Applications, Companies, Entity, JobSeekers, Jobs};
use crate::error::AppError;
use crate::models::Session;
use crate::services::{RouteGuard, paths};
use crate::state::AppState;

pub mod auth;
pub mod dashboard;
pub mod management;

/// Build the dashboard's routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/", get(|| async { Redirect::to(paths::DASHBOARD) }))
        .merge(auth::routes())
        .route(paths::DASHBOARD, get(dashboard::index))
        .merge(management::routes::<Admins>())
        .merge(management::routes::<Companies>())
        .merge(management::routes::<JobSeekers>())
        .merge(management::routes::<Jobs>())
        .merge(management::routes::<Applications>())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check the backend.
async fn health() -> &'static str {
    "ok"
}

/// Render a template, reporting failures through [`AppError`].
pub(crate) fn render(template: &impl Template) -> Result<Html<String>, AppError> {
    Ok(Html(template.render()?))
}

/// Sidebar link.
#[derive(Debug, Clone)]
pub struct NavLink {
    pub href: &'static str,
    pub label: &'static str,
    pub active: bool,
}

/// Data every page shares with `base.html`.
#[derive(Debug, Clone)]
pub struct Layout {
    pub title: String,
    pub signed_in: bool,
    pub role_label: String,
    pub nav: Vec<NavLink>,
}

const NAV: [(&str, &str); 6] = [
    (paths::DASHBOARD, "Dashboard"),
    (Admins::PATH, Admins::TITLE),
    (Companies::PATH, Companies::TITLE),
    (JobSeekers::PATH, JobSeekers::TITLE),
    (Jobs::PATH, Jobs::TITLE),
    (Applications::PATH, Applications::TITLE),
];

impl Layout {
    /// Layout for pages outside the signed-in area.
    #[must_use]
    pub fn public(title: &str) -> Self {
        Self {
            title: title.to_string(),
            signed_in: false,
            role_label: String::new(),
            nav: Vec::new(),
        }
    }

    /// Layout whose sidebar lists only the pages `session`'s role may open.
    #[must_use]
    pub fn signed_in(title: &str, session: &Session, guard: &RouteGuard, current: &str) -> Self {
        let nav = session.role().map_or_else(Vec::new, |role| {
            NAV.iter()
                .filter(|(href, _)| guard.policy().permits(role, href))
                .map(|&(href, label)| NavLink {
                    href,
                    label,
                    active: current == href,
                })
                .collect()
        });

        Self {
            title: title.to_string(),
            signed_in: session.is_authenticated(),
            role_label: session.role().map_or("", role_label).to_string(),
            nav,
        }
    }
}

const fn role_label(role: Role) -> &'static str {
    match role {
        Role::SuperAdmin => "Super Admin",
        Role::Admin => "Admin",
        Role::User => "User",
    }
}
