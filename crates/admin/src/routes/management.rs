//! Management pages, generic over [`Entity`].
//!
//! Every handler builds a fresh [`ListController`] for the request, loads the
//! collection, applies the action and renders the page. Mutations render the
//! refetched list directly instead of redirecting, so the success notice or
//! the open modal with its error survive.

use askama::Template;
use axum::{
    Form, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::cookie::CookieJar;
use tracing::{info, instrument};

use super::auth::session_expired;
use super::{Layout, render};
use crate::api::AuthedClient;
use crate::components::DataTable;
use crate::entities::Entity;
use crate::error::AppError;
use crate::listing::{FilterState, FormDraft, FormMode, ListController, ListQuery};
use crate::middleware::RequireSession;
use crate::state::AppState;

/// Routes for one entity's page.
pub fn routes<E: Entity>() -> Router<AppState> {
    Router::new()
        .route(E::PATH, get(index::<E>).post(create::<E>))
        .route(&format!("{}/new", E::PATH), get(new::<E>))
        .route(&format!("{}/{{id}}", E::PATH), axum::routing::post(update::<E>))
        .route(&format!("{}/{{id}}/edit", E::PATH), get(edit::<E>))
        .route(
            &format!("{}/{{id}}/delete", E::PATH),
            get(confirm_delete::<E>).post(delete::<E>),
        )
}

#[derive(Template)]
#[template(path = "management/index.html")]
pub struct ManagementTemplate {
    pub layout: Layout,
    pub table: DataTable,
}

type Controller<E> = ListController<E, AuthedClient>;

/// Controller for this request with the collection loaded.
async fn loaded<E: Entity>(
    state: &AppState,
    auth: &RequireSession,
    query: &ListQuery,
) -> Controller<E> {
    let backend = state.api().with_token(auth.token.clone());
    let mut controller = ListController::new(backend, FilterState::from_query(query));
    controller.load().await;
    controller
}

/// Render the page, or sign out if the backend rejected the token.
fn respond<E: Entity>(
    state: &AppState,
    auth: &RequireSession,
    jar: CookieJar,
    controller: &Controller<E>,
    status: StatusCode,
) -> Result<Response, AppError> {
    if controller.session_expired() {
        return Ok(session_expired(jar, state.config()));
    }

    let template = ManagementTemplate {
        layout: Layout::signed_in(E::TITLE, &auth.session, state.guard(), E::PATH),
        table: DataTable::from_controller(controller),
    };
    Ok((status, render(&template)?).into_response())
}

/// List page.
#[instrument(skip_all, fields(resource = E::RESOURCE))]
pub async fn index<E: Entity>(
    State(state): State<AppState>,
    auth: RequireSession,
    jar: CookieJar,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let controller = loaded::<E>(&state, &auth, &query).await;
    respond(&state, &auth, jar, &controller, StatusCode::OK)
}

/// List with the create modal open.
#[instrument(skip_all, fields(resource = E::RESOURCE))]
pub async fn new<E: Entity>(
    State(state): State<AppState>,
    auth: RequireSession,
    jar: CookieJar,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    if !E::CAN_CREATE {
        return Err(AppError::NotFound(format!("{} cannot be created here", E::TITLE)));
    }
    let mut controller = loaded::<E>(&state, &auth, &query).await;
    controller.open_form(FormMode::Create);
    respond(&state, &auth, jar, &controller, StatusCode::OK)
}

/// List with the edit modal open.
#[instrument(skip_all, fields(resource = E::RESOURCE))]
pub async fn edit<E: Entity>(
    State(state): State<AppState>,
    auth: RequireSession,
    jar: CookieJar,
    Path(id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let mut controller = loaded::<E>(&state, &auth, &query).await;
    if controller.error().is_none() && !controller.open_form(FormMode::Edit(id)) {
        return Err(AppError::NotFound(format!("{} {id}", E::NOUN)));
    }
    respond(&state, &auth, jar, &controller, StatusCode::OK)
}

/// Create a record, then render the refetched list.
#[instrument(skip_all, fields(resource = E::RESOURCE))]
pub async fn create<E: Entity>(
    State(state): State<AppState>,
    auth: RequireSession,
    jar: CookieJar,
    Query(query): Query<ListQuery>,
    Form(draft): Form<FormDraft>,
) -> Result<Response, AppError> {
    if !E::CAN_CREATE {
        return Err(AppError::BadRequest(format!("{} cannot be created here", E::TITLE)));
    }
    let mut controller = loaded::<E>(&state, &auth, &query).await;
    controller.open_form(FormMode::Create);
    let status = submit(&mut controller, draft).await;
    respond(&state, &auth, jar, &controller, status)
}

/// Update a record, then render the refetched list.
#[instrument(skip_all, fields(resource = E::RESOURCE))]
pub async fn update<E: Entity>(
    State(state): State<AppState>,
    auth: RequireSession,
    jar: CookieJar,
    Path(id): Path<i64>,
    Query(query): Query<ListQuery>,
    Form(draft): Form<FormDraft>,
) -> Result<Response, AppError> {
    let mut controller = loaded::<E>(&state, &auth, &query).await;
    if controller.error().is_some() {
        return respond(&state, &auth, jar, &controller, StatusCode::BAD_GATEWAY);
    }
    if !controller.open_form(FormMode::Edit(id)) {
        return Err(AppError::NotFound(format!("{} {id}", E::NOUN)));
    }
    let status = submit(&mut controller, draft).await;
    respond(&state, &auth, jar, &controller, status)
}

async fn submit<E: Entity>(controller: &mut Controller<E>, draft: FormDraft) -> StatusCode {
    if controller.submit(draft).await {
        info!(resource = E::RESOURCE, "Record saved");
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    }
}

/// List with the delete confirmation open.
#[instrument(skip_all, fields(resource = E::RESOURCE))]
pub async fn confirm_delete<E: Entity>(
    State(state): State<AppState>,
    auth: RequireSession,
    jar: CookieJar,
    Path(id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let mut controller = loaded::<E>(&state, &auth, &query).await;
    if controller.error().is_none() && !controller.request_delete(id) {
        return Err(AppError::NotFound(format!("{} {id}", E::NOUN)));
    }
    respond(&state, &auth, jar, &controller, StatusCode::OK)
}

/// Delete a confirmed record, then render the refetched list.
#[instrument(skip_all, fields(resource = E::RESOURCE))]
pub async fn delete<E: Entity>(
    State(state): State<AppState>,
    auth: RequireSession,
    jar: CookieJar,
    Path(id): Path<i64>,
    Query(query): Query<ListQuery>,
) -> Result<Response, AppError> {
    let mut controller = loaded::<E>(&state, &auth, &query).await;
    if controller.error().is_some() {
        return respond(&state, &auth, jar, &controller, StatusCode::BAD_GATEWAY);
    }
    if !controller.request_delete(id) {
        return Err(AppError::NotFound(format!("{} {id}", E::NOUN)));
    }
    let status = if controller.confirm_delete().await {
        info!(resource = E::RESOURCE, id, "Record deleted");
        StatusCode::OK
    } else {
        StatusCode::UNPROCESSABLE_ENTITY
    };
    respond(&state, &auth, jar, &controller, status)
}
