/// Task comment model and database operations
///
/// Comments hang off tasks and belong to their author. Only the author can
/// see or change a comment through the service layer; there is no
/// administrator override.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE task_comments (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     task_id UUID NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     body VARCHAR(320) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::query::{Order, Page};

/// One comment on a task
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TaskComment {
    /// Unique comment ID
    pub id: Uuid,

    /// Task the comment is on
    pub task_id: Uuid,

    /// Authoring user
    pub user_id: Uuid,

    /// Comment text
    pub body: String,

    /// When the comment was created
    pub created_at: DateTime<Utc>,

    /// When the comment was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new comment
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComment {
    /// Task to comment on
    pub task_id: Uuid,

    /// Comment text (1-320 characters)
    #[validate(length(min = 1, max = 320, message = "body must be 1-320 characters"))]
    pub body: String,
}

/// Input for updating a comment.
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateComment {
    /// New comment text
    #[validate(length(min = 1, max = 320, message = "body must be 1-320 characters"))]
    pub body: Option<String>,
}

const COMMENT_COLUMNS: &str = "id, task_id, user_id, body, created_at, updated_at";

impl TaskComment {
    /// Creates a new comment authored by `author_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the task does not exist (foreign key violation)
    /// or the database is unavailable.
    pub async fn create(
        pool: &PgPool,
        author_id: Uuid,
        data: &CreateComment,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO task_comments (task_id, user_id, body)
            VALUES ($1, $2, $3)
            RETURNING {COMMENT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, TaskComment>(&sql)
            .bind(data.task_id)
            .bind(author_id)
            .bind(&data.body)
            .fetch_one(pool)
            .await
    }

    /// Finds a comment by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {COMMENT_COLUMNS} FROM task_comments WHERE id = $1");

        sqlx::query_as::<_, TaskComment>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists the comments on one task.
    pub async fn list_by_task(
        pool: &PgPool,
        task_id: Uuid,
        order: Order,
        page: Page,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {COMMENT_COLUMNS} FROM task_comments WHERE task_id = $1 \
             ORDER BY created_at {} LIMIT $2 OFFSET $3",
            order.as_sql()
        );

        sqlx::query_as::<_, TaskComment>(&sql)
            .bind(task_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Updates a comment, leaving absent fields unchanged.
    ///
    /// Returns the updated comment, or `None` when it does not exist.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: &UpdateComment,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE task_comments
            SET body = COALESCE($2, body), updated_at = NOW()
            WHERE id = $1
            RETURNING {COMMENT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, TaskComment>(&sql)
            .bind(id)
            .bind(data.body.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Deletes a comment.
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM task_comments WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_comment_validation() {
        let valid = CreateComment {
            task_id: Uuid::new_v4(),
            body: "Looks good to me.".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty = CreateComment {
            task_id: Uuid::new_v4(),
            body: String::new(),
        };
        assert!(empty.validate().is_err());

        let too_long = CreateComment {
            task_id: Uuid::new_v4(),
            body: "b".repeat(321),
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_update_comment_absent_body_is_valid() {
        assert!(UpdateComment::default().validate().is_ok());
    }

    // Integration tests for database operations are in tests/service_tests.rs
}
