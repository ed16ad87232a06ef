/// Comment service endpoints
///
/// # Endpoints
///
/// - `POST /v1/comments` - Comment on a readable task
/// - `GET /v1/comments/:id` - Fetch one comment (author only)
/// - `PUT /v1/comments/:id` - Edit a comment (author only)
/// - `DELETE /v1/comments/:id` - Delete a comment (author only)
/// - `GET /v1/tasks/:id/comments` - List a task's comment thread
///
/// After creation a comment is private to its author; even platform
/// administrators get a 404 for someone else's comment.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use taskhive_core::access::Principal;
use taskhive_core::models::comment::{CreateComment, TaskComment, UpdateComment};
use taskhive_core::services::CommentService;

use crate::{app::AppState, error::ApiResult, routes::ListParams};

/// Create comment
///
/// # Errors
///
/// - 404 Not Found: the task is not accessible to the caller
/// - 422 Unprocessable Entity: body out of bounds
pub async fn create_comment(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(data): Json<CreateComment>,
) -> ApiResult<(StatusCode, Json<TaskComment>)> {
    let comment = CommentService::new(state.db.clone())
        .create(&principal, data)
        .await?;

    Ok((StatusCode::CREATED, Json(comment)))
}

/// Fetch one comment
pub async fn get_comment(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<TaskComment>> {
    let comment = CommentService::new(state.db.clone())
        .get_by_id(&principal, id)
        .await?;

    Ok(Json(comment))
}

/// Edit a comment
pub async fn update_comment(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(data): Json<UpdateComment>,
) -> ApiResult<Json<TaskComment>> {
    let comment = CommentService::new(state.db.clone())
        .update(&principal, id, data)
        .await?;

    Ok(Json(comment))
}

/// Delete a comment
pub async fn delete_comment(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    CommentService::new(state.db.clone())
        .delete(&principal, id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

/// List the comments on a readable task
///
/// Follows the task's own read rule, so the creator and the assignee see
/// the whole thread.
pub async fn list_task_comments(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(task_id): Path<Uuid>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<TaskComment>>> {
    let comments = CommentService::new(state.db.clone())
        .list_by_task(&principal, task_id, params.order(), params.page())
        .await?;

    Ok(Json(comments))
}
