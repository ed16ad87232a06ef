/// Project model and database operations
///
/// A project is owned by exactly one user and may optionally be attached to
/// a team. Attachment shares the project read-only with the team's members;
/// write access stays with the owner. Project titles are unique per owner.
///
/// Deleting a project cascades to its tasks, their comments, and every
/// activity record that references it.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE projects (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(20) NOT NULL,
///     description VARCHAR(320),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     team_id UUID REFERENCES teams(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT uq_user_project_title UNIQUE (user_id, title)
/// );
/// ```
///
/// # Example
///
/// ```no_run
/// use taskhive_core::models::project::{Project, CreateProject};
/// use taskhive_core::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let owner_id = Uuid::new_v4();
/// let project = Project::create(&pool, owner_id, &CreateProject {
///     title: "website".to_string(),
///     description: Some("Marketing site rebuild".to_string()),
///     team_id: None,
/// }).await?;
/// # Ok(())
/// # }
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::models::double_option;
use crate::query::{Order, Page};

/// Project model
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Project {
    /// Unique project ID
    pub id: Uuid,

    /// Project title, unique per owner
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Owning user
    pub user_id: Uuid,

    /// Team the project is shared with, if any
    pub team_id: Option<Uuid>,

    /// When the project was created
    pub created_at: DateTime<Utc>,

    /// When the project was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new project
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    /// Project title (1-20 characters)
    #[validate(length(min = 1, max = 20, message = "title must be 1-20 characters"))]
    pub title: String,

    /// Optional description (at most 320 characters)
    #[validate(length(min = 1, max = 320, message = "description must be 1-320 characters"))]
    pub description: Option<String>,

    /// Team to share the project with
    pub team_id: Option<Uuid>,
}

/// Input for updating a project.
///
/// Absent fields are left unchanged. `description` and `team_id` distinguish
/// absent from null: send an explicit `null` to clear them.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateProject {
    /// New title
    #[validate(length(min = 1, max = 20, message = "title must be 1-20 characters"))]
    pub title: Option<String>,

    /// New description; use `Some(None)` to clear
    #[serde(default, deserialize_with = "double_option")]
    pub description: Option<Option<String>>,

    /// New team attachment; use `Some(None)` to detach
    #[serde(default, deserialize_with = "double_option")]
    pub team_id: Option<Option<Uuid>>,
}

const PROJECT_COLUMNS: &str = "id, title, description, user_id, team_id, created_at, updated_at";

impl Project {
    /// Creates a new project owned by `owner_id`.
    ///
    /// # Arguments
    ///
    /// * `pool` - Database connection pool
    /// * `owner_id` - Owning user
    /// * `data` - Project creation data
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The owner already has a project with this title (unique constraint violation)
    /// - The referenced team does not exist (foreign key violation)
    /// - Database connection fails
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        data: &CreateProject,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO projects (title, description, user_id, team_id)
            VALUES ($1, $2, $3, $4)
            RETURNING {PROJECT_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Project>(&sql)
            .bind(&data.title)
            .bind(data.description.as_deref())
            .bind(owner_id)
            .bind(data.team_id)
            .fetch_one(pool)
            .await
    }

    /// Finds a project by ID, returning `None` when it does not exist.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1");

        sqlx::query_as::<_, Project>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Lists projects owned by one user.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: Uuid,
        order: Order,
        page: Page,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE user_id = $1 \
             ORDER BY created_at {} LIMIT $2 OFFSET $3",
            order.as_sql()
        );

        sqlx::query_as::<_, Project>(&sql)
            .bind(owner_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Lists projects attached to one team.
    pub async fn list_by_team(
        pool: &PgPool,
        team_id: Uuid,
        order: Order,
        page: Page,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE team_id = $1 \
             ORDER BY created_at {} LIMIT $2 OFFSET $3",
            order.as_sql()
        );

        sqlx::query_as::<_, Project>(&sql)
            .bind(team_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Lists projects visible to a user through team membership.
    ///
    /// Covers shared projects only; a user's own projects come from
    /// [`Project::list_by_owner`].
    pub async fn list_for_member(
        pool: &PgPool,
        user_id: Uuid,
        order: Order,
        page: Page,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            r#"
            SELECT p.id, p.title, p.description, p.user_id, p.team_id,
                   p.created_at, p.updated_at
            FROM projects p
            JOIN team_members tm ON tm.team_id = p.team_id
            WHERE tm.user_id = $1
            ORDER BY p.created_at {}
            LIMIT $2 OFFSET $3
            "#,
            order.as_sql()
        );

        sqlx::query_as::<_, Project>(&sql)
            .bind(user_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Updates a project, leaving absent fields unchanged.
    ///
    /// `description` and `team_id` are cleared when the patch carries an
    /// explicit null. Returns the updated project, or `None` when it does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the new title collides with another project of
    /// the same owner, the new team does not exist, or the database is
    /// unavailable.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: &UpdateProject,
    ) -> Result<Option<Self>, sqlx::Error> {
        let mut sql = String::from("UPDATE projects SET updated_at = NOW()");
        let mut bind_count = 1;

        if data.title.is_some() {
            bind_count += 1;
            sql.push_str(&format!(", title = ${bind_count}"));
        }
        if data.description.is_some() {
            bind_count += 1;
            sql.push_str(&format!(", description = ${bind_count}"));
        }
        if data.team_id.is_some() {
            bind_count += 1;
            sql.push_str(&format!(", team_id = ${bind_count}"));
        }

        sql.push_str(&format!(" WHERE id = $1 RETURNING {PROJECT_COLUMNS}"));

        let mut query = sqlx::query_as::<_, Project>(&sql).bind(id);

        if let Some(title) = &data.title {
            query = query.bind(title);
        }
        if let Some(description) = &data.description {
            query = query.bind(description.as_deref());
        }
        if let Some(team_id) = &data.team_id {
            query = query.bind(*team_id);
        }

        query.fetch_optional(pool).await
    }

    /// Deletes a project.
    ///
    /// Returns true if a row was deleted. Tasks, comments, and activity
    /// records referencing the project go with it through the foreign-key
    /// cascades.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
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
    fn test_create_project_validation() {
        let valid = CreateProject {
            title: "website".to_string(),
            description: Some("Marketing site rebuild".to_string()),
            team_id: None,
        };
        assert!(valid.validate().is_ok());

        let bad_title = CreateProject {
            title: "a".repeat(21),
            description: None,
            team_id: None,
        };
        assert!(bad_title.validate().is_err());

        let bad_description = CreateProject {
            title: "website".to_string(),
            description: Some("d".repeat(321)),
            team_id: None,
        };
        assert!(bad_description.validate().is_err());
    }

    #[test]
    fn test_update_project_patch_deserialization() {
        let patch: UpdateProject = serde_json::from_str(r#"{"title":"renamed"}"#).unwrap();
        assert_eq!(patch.title.as_deref(), Some("renamed"));
        assert_eq!(patch.description, None);
        assert_eq!(patch.team_id, None);

        let patch: UpdateProject =
            serde_json::from_str(r#"{"description":null,"team_id":null}"#).unwrap();
        assert_eq!(patch.description, Some(None));
        assert_eq!(patch.team_id, Some(None));
    }

    #[test]
    fn test_update_project_title_is_checked() {
        let patch = UpdateProject {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(patch.validate().is_err());
    }

    // Integration tests for database operations are in tests/service_tests.rs
}
