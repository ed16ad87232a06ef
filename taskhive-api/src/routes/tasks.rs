/// Task service endpoints
///
/// # Endpoints
///
/// - `POST /v1/tasks` - Create a task in an accessible project
/// - `GET /v1/tasks/filter` - Filtered listing over the caller's tasks
/// - `GET /v1/tasks/:id` - Fetch one task
/// - `PUT /v1/tasks/:id` - Partial update (creator or assignee)
/// - `DELETE /v1/tasks/:id` - Delete (creator only)
/// - `GET /v1/projects/:id/tasks` - The caller's tasks in a project
/// - `GET /v1/projects/:id/tasks/all` - Every task in a readable project
///
/// The owning project and the creator are fixed at creation; the update
/// payload cannot move a task.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use taskhive_core::access::Principal;
use taskhive_core::models::task::{
    CreateTask, Task, TaskFilter, TaskPriority, TaskStatus, UpdateTask,
};
use taskhive_core::query::{Order, Page, PageParams};
use taskhive_core::services::TaskService;

use crate::{app::AppState, error::ApiResult, routes::ListParams};

/// Query parameters for the filtered task listing.
///
/// `project_id` scopes the query; the remaining filters are ANDed together
/// and absent ones match everything.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct TaskFilterParams {
    /// Project to search in (required)
    pub project_id: Uuid,

    /// Keep only tasks with this status
    pub status: Option<TaskStatus>,

    /// Keep only tasks with this priority
    pub priority: Option<TaskPriority>,

    /// Keep only tasks due on this date
    pub due_date: Option<NaiveDate>,

    /// Keep only tasks assigned to this user
    pub assigned_id: Option<Uuid>,

    /// Sort direction on creation time
    pub order: Option<Order>,

    /// Requested page size
    pub limit: Option<i64>,

    /// Requested offset
    pub offset: Option<i64>,
}

impl TaskFilterParams {
    fn filter(&self) -> TaskFilter {
        TaskFilter {
            status: self.status,
            priority: self.priority,
            due_date: self.due_date,
            assigned_id: self.assigned_id,
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

/// Create task
///
/// Requires read access to `project_id`. An optional `assigned_id` must
/// name an existing active user; team membership is not required of the
/// assignee.
///
/// # Errors
///
/// - 404 Not Found: the project is not accessible
/// - 409 Conflict: the caller already has a task with this title
/// - 422 Unprocessable Entity: out-of-bounds fields or unusable assignee
pub async fn create_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(data): Json<CreateTask>,
) -> ApiResult<(StatusCode, Json<Task>)> {
    let task = TaskService::new(state.db.clone())
        .create(&principal, data)
        .await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// Filtered listing over the caller's tasks in a project
pub async fn filter_tasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(params): Query<TaskFilterParams>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = TaskService::new(state.db.clone())
        .filter_by_project(
            &principal,
            params.project_id,
            params.filter(),
            params.order(),
            params.page(),
        )
        .await?;

    Ok(Json(tasks))
}

/// Fetch one task (creator or assignee)
pub async fn get_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<Task>> {
    let task = TaskService::new(state.db.clone())
        .get_by_id(&principal, id)
        .await?;

    Ok(Json(task))
}

/// Partially update a task
pub async fn update_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateTask>,
) -> ApiResult<Json<Task>> {
    let task = TaskService::new(state.db.clone())
        .update(&principal, id, data)
        .await?;

    Ok(Json(task))
}

/// Delete a task and its comments
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    TaskService::new(state.db.clone())
        .delete(&principal, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the caller's tasks within a project
///
/// Row-filtered: only tasks the caller created or is assigned to appear,
/// even when the project itself is readable through a team.
pub async fn list_project_tasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(project_id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = TaskService::new(state.db.clone())
        .list_by_project(&principal, project_id, params.order(), params.page())
        .await?;

    Ok(Json(tasks))
}

/// List every task within a readable project
///
/// The team-scoped board view: members of the project's team see all
/// tasks, not just their own rows.
pub async fn list_all_project_tasks(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(project_id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<Task>>> {
    let tasks = TaskService::new(state.db.clone())
        .list_all_by_project(&principal, project_id, params.order(), params.page())
        .await?;

    Ok(Json(tasks))
}
