//! Dashboard route handler.

use askama::Template;
use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::instrument;

use super::auth::session_expired;
use super::{Layout, render};
use crate::api::{AuthedClient, EntityBackend};
use crate::components::TableRow;
use crate::entities::{Admins, Applications, Companies, Entity, JobSeekers, Jobs};
use crate::error::AppError;
use crate::listing::{FilterState, ListController, SortKey};
use crate::middleware::RequireSession;
use crate::services::paths;
use crate::state::AppState;

/// How many applications the "recent" table shows.
const RECENT_APPLICATIONS: usize = 5;

/// Count card for one collection.
#[derive(Debug, Clone)]
pub struct StatCard {
    pub label: &'static str,
    pub href: &'static str,
    /// Record count, or `-` when the collection failed to load.
    pub value: String,
    pub error: Option<String>,
}

impl StatCard {
    fn of<E: Entity, B: EntityBackend>(controller: &ListController<E, B>) -> Self {
        let error = controller.error().map(ToString::to_string);
        Self {
            label: E::TITLE,
            href: E::PATH,
            value: if error.is_some() {
                "-".to_string()
            } else {
                controller.items().len().to_string()
            },
            error,
        }
    }
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: Layout,
    pub cards: Vec<StatCard>,
    /// Whether the role may open the applications page at all.
    pub show_recent: bool,
    pub recent_columns: &'static [&'static str],
    pub recent_applications: Vec<TableRow>,
    pub recent_error: Option<String>,
}

/// Which collections the session's role may open.
#[allow(clippy::struct_excessive_bools)]
struct Shown {
    admins: bool,
    companies: bool,
    job_seekers: bool,
    jobs: bool,
    applications: bool,
}

async fn load_if<E: Entity>(permitted: bool, controller: &mut ListController<E, AuthedClient>) {
    if permitted {
        controller.load().await;
    }
}

fn controller<E: Entity>(backend: &AuthedClient) -> ListController<E, AuthedClient> {
    ListController::new(backend.clone(), FilterState::new())
}

/// Dashboard page handler.
///
/// Loads every collection the role may open, concurrently. Collections
/// outside the role's policy are neither fetched nor shown.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    auth: RequireSession,
    jar: CookieJar,
) -> Result<Response, AppError> {
    let backend = state.api().with_token(auth.token.clone());
    let permits = |path: &str| {
        auth.session
            .role()
            .is_some_and(|role| state.guard().policy().permits(role, path))
    };
    let show = Shown {
        admins: permits(Admins::PATH),
        companies: permits(Companies::PATH),
        job_seekers: permits(JobSeekers::PATH),
        jobs: permits(Jobs::PATH),
        applications: permits(Applications::PATH),
    };

    let mut admins = controller::<Admins>(&backend);
    let mut companies = controller::<Companies>(&backend);
    let mut job_seekers = controller::<JobSeekers>(&backend);
    let mut jobs = controller::<Jobs>(&backend);
    let mut applications = controller::<Applications>(&backend);

    tokio::join!(
        load_if(show.admins, &mut admins),
        load_if(show.companies, &mut companies),
        load_if(show.job_seekers, &mut job_seekers),
        load_if(show.jobs, &mut jobs),
        load_if(show.applications, &mut applications),
    );

    let expired = [
        admins.session_expired(),
        companies.session_expired(),
        job_seekers.session_expired(),
        jobs.session_expired(),
        applications.session_expired(),
    ];
    if expired.contains(&true) {
        return Ok(session_expired(jar, state.config()));
    }

    let cards = [
        show.admins.then(|| StatCard::of(&admins)),
        show.companies.then(|| StatCard::of(&companies)),
        show.job_seekers.then(|| StatCard::of(&job_seekers)),
        show.jobs.then(|| StatCard::of(&jobs)),
        show.applications.then(|| StatCard::of(&applications)),
    ]
    .into_iter()
    .flatten()
    .collect();

    applications.set_sort(SortKey::Newest);
    let recent_applications = if show.applications {
        applications
            .visible()
            .items
            .into_iter()
            .take(RECENT_APPLICATIONS)
            .map(TableRow::of::<Applications>)
            .collect()
    } else {
        Vec::new()
    };

    let template = DashboardTemplate {
        layout: Layout::signed_in("Dashboard", &auth.session, state.guard(), paths::DASHBOARD),
        cards,
        show_recent: show.applications,
        recent_columns: Applications::COLUMNS,
        recent_applications,
        recent_error: applications.error().map(ToString::to_string),
    };
    Ok(render(&template)?.into_response())
}
