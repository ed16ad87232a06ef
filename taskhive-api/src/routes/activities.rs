/// Activity trail endpoints
///
/// # Endpoints
///
/// - `GET /v1/projects/:id/activities` - Records related to a project
/// - `GET /v1/projects/:id/activities/:activity_id` - One record, scoped
/// - `GET /v1/tasks/:id/activities` - Records related to a task
/// - `GET /v1/teams/:id/activities` - Records related to a team
/// - `GET /v1/activities/user` - Records by one actor (admin: `?user_id=`)
///
/// The trail is read-only over HTTP; records are appended by the mutating
/// services and never edited or deleted by callers. Each listing is gated
/// by the access rule of the resource it is scoped to.
///
/// Listings accept `activity_type` and `entity` filters on top of the
/// usual `order`/`limit`/`offset`.

use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use uuid::Uuid;

use taskhive_core::access::Principal;
use taskhive_core::models::activity::{ActivityFilter, ActivityLog, ActivityType, EntityKind};
use taskhive_core::query::{Order, Page, PageParams};
use taskhive_core::services::ActivityService;

use crate::{app::AppState, error::ApiResult};

/// Query parameters for activity listings
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ActivityParams {
    /// Keep only records with this activity type
    pub activity_type: Option<ActivityType>,

    /// Keep only records about this kind of entity
    pub entity: Option<EntityKind>,

    /// Sort direction on creation time
    pub order: Option<Order>,

    /// Requested page size
    pub limit: Option<i64>,

    /// Requested offset
    pub offset: Option<i64>,

    /// Actor override for platform administrators (`/activities/user`)
    pub user_id: Option<Uuid>,
}

impl ActivityParams {
    fn filter(&self) -> ActivityFilter {
        ActivityFilter {
            activity_type: self.activity_type,
            entity: self.entity,
        }
    }

    fn order(&self) -> Order {
        self.order.unwrap_or_default()
    }

    fn page(&self) -> Page {
        PageParams {
            order: self.order,
            limit: self.limit,
            offset: self.offset,
        }
        .page()
    }
}

/// List the records related to a readable project
pub async fn list_project_activities(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(project_id): Path<Uuid>,
    Query(params): Query<ActivityParams>,
) -> ApiResult<Json<Vec<ActivityLog>>> {
    let records = ActivityService::new(state.db.clone())
        .list_by_project(
            &principal,
            project_id,
            params.filter(),
            params.order(),
            params.page(),
        )
        .await?;

    Ok(Json(records))
}

/// Fetch one record from a readable project's trail
pub async fn get_project_activity(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path((project_id, activity_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<ActivityLog>> {
    let record = ActivityService::new(state.db.clone())
        .get_in_project(&principal, project_id, activity_id)
        .await?;

    Ok(Json(record))
}

/// List the records related to a readable task
pub async fn list_task_activities(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(task_id): Path<Uuid>,
    Query(params): Query<ActivityParams>,
) -> ApiResult<Json<Vec<ActivityLog>>> {
    let records = ActivityService::new(state.db.clone())
        .list_by_task(
            &principal,
            task_id,
            params.filter(),
            params.order(),
            params.page(),
        )
        .await?;

    Ok(Json(records))
}

/// List the records related to a controlled team
pub async fn list_team_activities(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(team_id): Path<Uuid>,
    Query(params): Query<ActivityParams>,
) -> ApiResult<Json<Vec<ActivityLog>>> {
    let records = ActivityService::new(state.db.clone())
        .list_by_team(
            &principal,
            team_id,
            params.filter(),
            params.order(),
            params.page(),
        )
        .await?;

    Ok(Json(records))
}

/// List the records produced by one acting user
///
/// Callers list their own history; `?user_id=` naming someone else
/// requires a platform administrator and otherwise yields a 403.
pub async fn list_user_activities(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<ActivityParams>,
) -> ApiResult<Json<Vec<ActivityLog>>> {
    let records = ActivityService::new(state.db.clone())
        .list_by_actor(
            &principal,
            params.user_id,
            params.filter(),
            params.order(),
            params.page(),
        )
        .await?;

    Ok(Json(records))
}
