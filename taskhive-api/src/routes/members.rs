/// Team membership endpoints
///
/// # Endpoints
///
/// - `POST /v1/members` - Add a user to a controlled team
/// - `GET /v1/members/:id` - Fetch one membership row
/// - `DELETE /v1/members/:id` - Remove a member from a team
/// - `GET /v1/teams/:id/members` - List a controlled team's members
/// - `GET /v1/teams/:id/members/count` - Count a controlled team's members
///
/// Removal deletes one membership row, never the user behind it.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Serialize;
use uuid::Uuid;

use taskhive_core::access::Principal;
use taskhive_core::models::member::{AddTeamMember, TeamMember};
use taskhive_core::services::{TeamMemberService, TeamService};

use crate::{app::AppState, error::ApiResult, routes::ListParams};

/// Member count response
#[derive(Debug, Serialize)]
pub struct MemberCountResponse {
    /// Team the count is for
    pub team_id: Uuid,

    /// Number of membership rows
    pub count: i64,
}

/// Add a user to a team
///
/// Only the team's owner (or a platform administrator) may do this.
///
/// # Errors
///
/// - 404 Not Found: the team is not accessible to the caller
/// - 409 Conflict: the user is already a member
/// - 422 Unprocessable Entity: the user does not exist
pub async fn add_member(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(data): Json<AddTeamMember>,
) -> ApiResult<(StatusCode, Json<TeamMember>)> {
    let member = TeamMemberService::new(state.db.clone())
        .add(&principal, data)
        .await?;

    Ok((StatusCode::CREATED, Json(member)))
}

/// Fetch one membership row
pub async fn get_member(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TeamMember>> {
    let member = TeamMemberService::new(state.db.clone())
        .get_by_id(&principal, id)
        .await?;

    Ok(Json(member))
}

/// Remove a member from a team
pub async fn remove_member(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    TeamMemberService::new(state.db.clone())
        .remove(&principal, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the members of a controlled team
pub async fn list_team_members(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(team_id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<TeamMember>>> {
    let members = TeamMemberService::new(state.db.clone())
        .list_by_team(&principal, team_id, params.order(), params.page())
        .await?;

    Ok(Json(members))
}

/// Count the members of a controlled team
pub async fn count_team_members(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(team_id): Path<Uuid>,
) -> ApiResult<Json<MemberCountResponse>> {
    let count = TeamService::new(state.db.clone())
        .member_count(&principal, team_id)
        .await?;

    Ok(Json(MemberCountResponse { team_id, count }))
}
