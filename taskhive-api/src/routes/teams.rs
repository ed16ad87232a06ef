/// Team service endpoints
///
/// # Endpoints
///
/// - `POST /v1/teams` - Create a team
/// - `GET /v1/teams` - List the caller's teams (admin: `?user_id=`)
/// - `GET /v1/teams/all` - List every team (platform administrators only)
/// - `GET /v1/teams/name/:title` - Look a team up by title
/// - `GET /v1/teams/:id` - Fetch one team
/// - `PUT /v1/teams/:id` - Rename a team
/// - `DELETE /v1/teams/:id` - Delete, cascading to members and projects
///
/// `/all` is the one place denial surfaces as 403 rather than 404: the
/// existence of the collection is no secret, and an admin-role caller
/// without the superuser flag is told so explicitly.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use taskhive_core::access::Principal;
use taskhive_core::models::team::{CreateTeam, Team, UpdateTeam};
use taskhive_core::services::TeamService;

use crate::{app::AppState, error::ApiResult, routes::ListParams};

/// Create team
///
/// # Errors
///
/// - 409 Conflict: the caller already has a team with this title
/// - 422 Unprocessable Entity: title out of bounds
pub async fn create_team(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(data): Json<CreateTeam>,
) -> ApiResult<(StatusCode, Json<Team>)> {
    let team = TeamService::new(state.db.clone())
        .create(&principal, data)
        .await?;

    Ok((StatusCode::CREATED, Json(team)))
}

/// List teams owned by the caller
pub async fn list_teams(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Team>>> {
    let teams = TeamService::new(state.db.clone())
        .list(&principal, params.user_id, params.order(), params.page())
        .await?;

    Ok(Json(teams))
}

/// List every team in the system
///
/// # Errors
///
/// - 403 Forbidden: the caller is not a platform administrator (both the
///   admin role and the superuser flag are required)
pub async fn list_all_teams(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Team>>> {
    let teams = TeamService::new(state.db.clone())
        .list_all(&principal, params.order(), params.page())
        .await?;

    Ok(Json(teams))
}

/// Look a team up by title within an owner scope
pub async fn find_team_by_title(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(title): Path<String>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Team>> {
    let team = TeamService::new(state.db.clone())
        .find_by_title(&principal, params.user_id, &title)
        .await?;

    Ok(Json(team))
}

/// Fetch one team
pub async fn get_team(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Team>> {
    let team = TeamService::new(state.db.clone())
        .get_by_id(&principal, id)
        .await?;

    Ok(Json(team))
}

/// Rename a team
pub async fn update_team(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateTeam>,
) -> ApiResult<Json<Team>> {
    let team = TeamService::new(state.db.clone())
        .update(&principal, id, data)
        .await?;

    Ok(Json(team))
}

/// Delete a team, its memberships, and its projects
pub async fn delete_team(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    TeamService::new(state.db.clone())
        .delete(&principal, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
