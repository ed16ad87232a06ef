/// Project service endpoints
///
/// # Endpoints
///
/// - `POST /v1/projects` - Create a project
/// - `GET /v1/projects` - List the caller's projects (admin: `?user_id=`)
/// - `GET /v1/projects/member` - List projects shared via team membership
/// - `GET /v1/projects/team/:team_id` - List a controlled team's projects
/// - `GET /v1/projects/:id` - Fetch one project
/// - `PUT /v1/projects/:id` - Partial update
/// - `DELETE /v1/projects/:id` - Delete, cascading to tasks and comments
///
/// Denied reads and writes surface as 404, never 403; the service collapses
/// them so existence does not leak.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use taskhive_core::access::Principal;
use taskhive_core::models::project::{CreateProject, Project, UpdateProject};
use taskhive_core::services::ProjectService;

use crate::{app::AppState, error::ApiResult, routes::ListParams};

/// Create project
///
/// An optional `team_id` must name a team the caller owns; a project
/// without a team is personal.
///
/// # Errors
///
/// - 409 Conflict: the caller already has a project with this title
/// - 422 Unprocessable Entity: out-of-bounds fields or a foreign team
pub async fn create_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(data): Json<CreateProject>,
) -> ApiResult<(StatusCode, Json<Project>)> {
    let project = ProjectService::new(state.db.clone())
        .create(&principal, data)
        .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

/// List projects owned by the caller
///
/// Platform administrators list on behalf of a user and must pass
/// `?user_id=`; for everyone else the parameter is ignored.
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = ProjectService::new(state.db.clone())
        .list(&principal, params.user_id, params.order(), params.page())
        .await?;

    Ok(Json(projects))
}

/// List projects shared with the caller through team membership
pub async fn list_member_projects(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = ProjectService::new(state.db.clone())
        .list_shared(&principal, params.order(), params.page())
        .await?;

    Ok(Json(projects))
}

/// List the projects attached to a team the caller controls
pub async fn list_team_projects(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(team_id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Project>>> {
    let projects = ProjectService::new(state.db.clone())
        .list_by_team(&principal, team_id, params.order(), params.page())
        .await?;

    Ok(Json(projects))
}

/// Fetch one project
pub async fn get_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Project>> {
    let project = ProjectService::new(state.db.clone())
        .get_by_id(&principal, id)
        .await?;

    Ok(Json(project))
}

/// Partially update a project
///
/// Absent fields stay unchanged; an explicit `null` clears `description`
/// or detaches the team.
pub async fn update_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateProject>,
) -> ApiResult<Json<Project>> {
    let project = ProjectService::new(state.db.clone())
        .update(&principal, id, data)
        .await?;

    Ok(Json(project))
}

/// Delete a project and everything under it
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    ProjectService::new(state.db.clone())
        .delete(&principal, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
