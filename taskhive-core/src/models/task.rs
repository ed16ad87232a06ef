/// Task model and database operations
///
/// Tasks are the unit of work inside a project. Each task has a creator and
/// optionally an assignee, and those two users are the only ones who can see
/// it. There is no administrator override on tasks and no visibility through
/// project or team ownership; every read path filters rows down to the
/// requesting user.
///
/// # Schema
///
/// ```sql
/// CREATE TYPE task_status AS ENUM ('todo', 'in_progress', 'done');
/// CREATE TYPE task_priority AS ENUM ('low', 'medium', 'high');
///
/// CREATE TABLE tasks (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(20) NOT NULL,
///     description VARCHAR(320),
///     status task_status NOT NULL DEFAULT 'todo',
///     priority task_priority NOT NULL DEFAULT 'low',
///     due_date DATE NOT NULL,
///     project_id UUID NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     assigned_id UUID REFERENCES users(id) ON DELETE SET NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT uq_user_task_title UNIQUE (user_id, title)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhive_core::models::task::{Task, CreateTask, TaskStatus, TaskPriority};
/// use taskhive_core::db::pool::{create_pool, DatabaseConfig};
/// use chrono::NaiveDate;
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let creator_id = Uuid::new_v4();
/// let task = Task::create(&pool, creator_id, &CreateTask {
///     title: "ship it".to_string(),
///     description: None,
///     status: TaskStatus::Todo,
///     priority: TaskPriority::High,
///     due_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
///     project_id: Uuid::new_v4(),
///     assigned_id: None,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::models::double_option;
use crate::query::{Order, Page};

/// Task workflow status
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "task_status", rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet
    #[default]
    Todo,

    /// Being worked on
    InProgress,

    /// Finished
    Done,
}

impl TaskStatus {
    /// Gets the status as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

/// Task priority
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "task_priority", rename_all = "snake_case")]
pub enum TaskPriority {
    /// Default priority
    #[default]
    Low,

    Medium,

    High,
}

impl TaskPriority {
    /// Gets the priority as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

/// Task model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Task {
    /// Unique task ID
    pub id: Uuid,

    /// Task title, unique per creator
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Workflow status
    pub status: TaskStatus,

    /// Priority
    pub priority: TaskPriority,

    /// Date the task is due
    pub due_date: NaiveDate,

    /// Project the task belongs to
    pub project_id: Uuid,

    /// Creating user
    pub user_id: Uuid,

    /// Assigned user, if any (nulled when that user is deleted)
    pub assigned_id: Option<Uuid>,

    /// When the task was created
    pub created_at: DateTime<Utc>,

    /// When the task was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new task
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTask {
    /// Task title (1-20 characters)
    #[validate(length(min = 1, max = 20, message = "title must be 1-20 characters"))]
    pub title: String,

    /// Optional description (at most 320 characters)
    #[validate(length(min = 1, max = 320, message = "description must be 1-320 characters"))]
    pub description: Option<String>,

    /// Initial status (defaults to todo)
    #[serde(default)]
    pub status: TaskStatus,

    /// Initial priority (defaults to low)
    #[serde(default)]
    pub priority: TaskPriority,

    /// Date the task is due
    pub due_date: NaiveDate,

    /// Project the task belongs to
    pub project_id: Uuid,

    /// User to assign the task to
    pub assigned_id: Option<Uuid>,
}

/// Input for updating a task.
///
/// Absent fields are left unchanged. `description` and `assigned_id`
/// distinguish absent from null: send an explicit `null` to clear them.
/// The owning project and the creator are fixed at creation and cannot be
/// changed here.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTask {
    /// New title
    #[validate(length(min = 1, max = 20, message = "title must be 1-20 characters"))]
    pub title: Option<String>,

    /// New description; use `Some(None)` to clear
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    /// New status
    pub status: Option<TaskStatus>,

    /// New priority
    pub priority: Option<TaskPriority>,

    /// New due date
    pub due_date: Option<NaiveDate>,

    /// New assignee; use `Some(None)` to unassign
    #[serde(default, deserialize_with = "double_option")]
    pub assigned_id: Option<Option<Uuid>>,
}

/// Optional filters for task listings.
///
/// Filters are ANDed together; an absent filter matches everything.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct TaskFilter {
    /// Keep only tasks with this status
    pub status: Option<TaskStatus>,

    /// Keep only tasks with this priority
    pub priority: Option<TaskPriority>,

    /// Keep only tasks due on this date
    pub due_date: Option<NaiveDate>,

    /// Keep only tasks assigned to this user
    pub assigned_id: Option<Uuid>,
}

const TASK_COLUMNS: &str = "id, title, description, status, priority, due_date, \
     project_id, user_id, assigned_id, created_at, updated_at";

impl Task {
    /// Creates a new task with `creator_id` as its creator.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `creator_id` - Creating user
    /// * `data` - Task creation data
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The creator already has a task with this title (unique constraint violation)
    /// - The project or assignee does not exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(
        pool: &PgPool,
        creator_id: Uuid,
        data: &CreateTask,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO tasks
                (title, description, status, priority, due_date,
                 project_id, user_id, assigned_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {TASK_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Task>(&sql)
            .bind(&data.title)
            .bind(data.description.as_deref())
            .bind(data.status)
            .bind(data.priority)
            .bind(data.due_date)
            .bind(data.project_id)
            .bind(creator_id)
            .bind(data.assigned_id)
            .fetch_one(pool)
            .await
    }

    /// Finds a task by ID, returning `None` when it does not exist.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {TASK_COLUMNS} FROM tasks WHERE id = $1");

        sqlx::query_as::<_, Task>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists every task within a project, regardless of creator.
    ///
    /// Callers gate this on project read access; it backs the team-scoped
    /// listing, where membership in the project's team widens visibility to
    /// the whole board.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: Uuid,
        order: Order,
        page: Page,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks WHERE project_id = $1 \
             ORDER BY created_at {} LIMIT $2 OFFSET $3",
            order.as_sql()
        );

        sqlx::query_as::<_, Task>(&sql)
            .bind(project_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Lists the tasks a user can see within a project.
    ///
    /// A task is visible when the user created it or is assigned to it;
    /// the project scope never widens this.
    pub async fn list_for_user_in_project(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
        order: Order,
        page: Page,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE project_id = $1 AND (user_id = $2 OR assigned_id = $2) \
             ORDER BY created_at {} LIMIT $3 OFFSET $4",
            order.as_sql()
        );

        sqlx::query_as::<_, Task>(&sql)
            .bind(project_id)
            .bind(user_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Lists visible tasks matching the optional filters.
    ///
    /// Same visibility rule as [`Task::list_for_user_in_project`], narrowed
    /// further by status, priority, due date, and assignment presence.
    pub async fn filter_for_user_in_project(
        pool: &PgPool,
        project_id: Uuid,
        user_id: Uuid,
        filter: TaskFilter,
        order: Order,
        page: Page,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut sql = format!(
            "SELECT {TASK_COLUMNS} FROM tasks \
             WHERE project_id = $1 AND (user_id = $2 OR assigned_id = $2)"
        );
        let mut bind_count = 2;

        if filter.status.is_some() {
            bind_count += 1;
            sql.push_str(&format!(" AND status = ${bind_count}"));
        }
        if filter.priority.is_some() {
            bind_count += 1;
            sql.push_str(&format!(" AND priority = ${bind_count}"));
        }
        if filter.due_date.is_some() {
            bind_count += 1;
            sql.push_str(&format!(" AND due_date = ${bind_count}"));
        }
        if filter.assigned_id.is_some() {
            bind_count += 1;
            sql.push_str(&format!(" AND assigned_id = ${bind_count}"));
        }

        bind_count += 1;
        sql.push_str(&format!(
            " ORDER BY created_at {} LIMIT ${bind_count}",
            order.as_sql()
        ));
        bind_count += 1;
        sql.push_str(&format!(" OFFSET ${bind_count}"));

        let mut query = sqlx::query_as::<_, Task>(&sql)
            .bind(project_id)
            .bind(user_id);

        if let Some(status) = filter.status {
            query = query.bind(status);
        }
        if let Some(priority) = filter.priority {
            query = query.bind(priority);
        }
        if let Some(due_date) = filter.due_date {
            query = query.bind(due_date);
        }
        if let Some(assigned_id) = filter.assigned_id {
            query = query.bind(assigned_id);
        }

        query
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Updates a task, leaving absent fields unchanged.
    ///
    /// `description` and `assigned_id` are cleared when the patch carries an
    /// explicit null. Returns the updated task, or `None` when it does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the new title collides with another task of the
    /// same creator, the new assignee does not exist, or the database is
    /// unavailable.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: &UpdateTask,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut sql = String::from("UPDATE tasks SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            sql.push_str(&format!(", title = ${bind_count}"));
        }
        if data.description.is_some() {
            bind_count += 1;
            sql.push_str(&format!(", description = ${bind_count}"));
        }
        if data.status.is_some() {
            bind_count += 1;
            sql.push_str(&format!(", status = ${bind_count}"));
        }
        if data.priority.is_some() {
            bind_count += 1;
            sql.push_str(&format!(", priority = ${bind_count}"));
        }
        if data.due_date.is_some() {
            bind_count += 1;
            sql.push_str(&format!(", due_date = ${bind_count}"));
        }
        if data.assigned_id.is_some() {
            bind_count += 1;
            sql.push_str(&format!(", assigned_id = ${bind_count}"));
        }

        sql.push_str(&format!(" WHERE id = $1 RETURNING {TASK_COLUMNS}"));

        let mut query = sqlx::query_as::<_, Task>(&sql).bind(id);

        if let Some(title) = &data.title {
            query = query.bind(title);
        }
        if let Some(description) = &data.description {
            query = query.bind(description.as_deref());
        }
        if let Some(status) = data.status {
            query = query.bind(status);
        }
        if let Some(priority) = data.priority {
            query = query.bind(priority);
        }
        if let Some(due_date) = data.due_date {
            query = query.bind(due_date);
        }
        if let Some(assigned_id) = &data.assigned_id {
            query = query.bind(*assigned_id);
        }

        query.fetch_optional(pool).await
    }

    /// Deletes a task.
    ///
    /// Returns true if a row was deleted. Comments and activity records
    /// referencing the task go with it through the foreign-key cascades.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
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
    fn test_status_and_priority_as_str() {
        assert_eq!(TaskStatus::Todo.as_str(), "todo");
        assert_eq!(TaskStatus::InProgress.as_str(), "in_progress");
        assert_eq!(TaskStatus::Done.as_str(), "done");
        assert_eq!(TaskPriority::Low.as_str(), "low");
        assert_eq!(TaskPriority::Medium.as_str(), "medium");
        assert_eq!(TaskPriority::High.as_str(), "high");
    }

    #[test]
    fn test_status_and_priority_defaults() {
        assert_eq!(TaskStatus::default(), TaskStatus::Todo);
        assert_eq!(TaskPriority::default(), TaskPriority::Low);
    }

    #[test]
    fn test_create_task_defaults_apply() {
        let project_id = Uuid::new_v4();
        let json = format!(
            r#"{{"title":"ship it","due_date":"2026-09-01","project_id":"{project_id}"}}"#
        );

        let data: CreateTask = serde_json::from_str(&json).unwrap();
        assert_eq!(data.status, TaskStatus::Todo);
        assert_eq!(data.priority, TaskPriority::Low);
        assert_eq!(data.assigned_id, None);
    }

    #[test]
    fn test_create_task_validation() {
        let valid = CreateTask {
            title: "ship it".to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: TaskPriority::High,
            due_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            project_id: Uuid::new_v4(),
            assigned_id: None,
        };
        assert!(valid.validate().is_ok());

        let bad = CreateTask {
            title: "a".repeat(21),
            ..valid
        };
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_update_task_patch_deserialization() {
        let patch: UpdateTask =
            serde_json::from_str(r#"{"status":"done","assigned_id":null}"#).unwrap();
        assert_eq!(patch.status, Some(TaskStatus::Done));
        assert_eq!(patch.assigned_id, Some(None));
        assert_eq!(patch.title, None);
        assert_eq!(patch.description, None);
    }

    #[test]
    fn test_task_filter_deserialization() {
        let assignee = Uuid::new_v4();
        let json = format!(r#"{{"status":"in_progress","assigned_id":"{assignee}"}}"#);
        let filter: TaskFilter = serde_json::from_str(&json).unwrap();
        assert_eq!(filter.status, Some(TaskStatus::InProgress));
        assert_eq!(filter.assigned_id, Some(assignee));
        assert_eq!(filter.priority, None);
    }

    // Integration tests for database operations are in tests/service_tests.rs
}
