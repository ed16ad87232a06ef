/// Team model and database operations
///
/// A team is a named grouping owned by exactly one user. Team titles are
/// unique per owner, not globally, so two users can each have a team called
/// "backend". Deleting a team cascades to its memberships, its projects, and
/// through those to tasks and comments.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE teams (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     title VARCHAR(20) NOT NULL,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT uq_user_team_title UNIQUE (user_id, title)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::query::{Order, Page};

/// Team model representing a user-owned grouping
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Team {
    /// Unique team ID
    pub id: Uuid,

    /// Team title, unique per owner
    pub title: String,

    /// Owning user
    pub user_id: Uuid,

    /// When the team was created
    pub created_at: DateTime<Utc>,

    /// When the team was last updated
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a new team
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateTeam {
    /// Team title (1-20 characters)
    #[validate(length(min = 1, max = 20, message = "title must be 1-20 characters"))]
    pub title: String,
}

/// Input for updating a team.
///
/// Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateTeam {
    /// New title
    #[validate(length(min = 1, max = 20, message = "title must be 1-20 characters"))]
    pub title: Option<String>,
}

const TEAM_COLUMNS: &str = "id, title, user_id, created_at, updated_at";

impl Team {
    /// Creates a new team owned by `owner_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the owner already has a team with this title
    /// (unique constraint violation) or the database is unavailable.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use taskhive_core::models::team::{Team, CreateTeam};
    /// # use sqlx::PgPool;
    /// # use uuid::Uuid;
    /// # async fn example(pool: PgPool, owner_id: Uuid) -> Result<(), sqlx::Error> {
    /// let team = Team::create(&pool, owner_id, &CreateTeam {
    ///     title: "backend".to_string(),
    /// }).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn create(
        pool: &PgPool,
        owner_id: Uuid,
        data: &CreateTeam,
    ) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO teams (title, user_id)
            VALUES ($1, $2)
            RETURNING {TEAM_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Team>(&sql)
            .bind(&data.title)
            .bind(owner_id)
            .fetch_one(pool)
            .await
    }

    /// Finds a team by ID, returning `None` when it does not exist.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1");

        sqlx::query_as::<_, Team>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Finds a team by title within one owner's namespace.
    pub async fn find_by_title(
        pool: &PgPool,
        owner_id: Uuid,
        title: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE user_id = $1 AND title = $2"
        );

        sqlx::query_as::<_, Team>(&sql)
            .bind(owner_id)
            .bind(title)
            .fetch_optional(pool)
            .await
    }

    /// Lists teams owned by one user.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: Uuid,
        order: Order,
        page: Page,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE user_id = $1 \
             ORDER BY created_at {} LIMIT $2 OFFSET $3",
            order.as_sql()
        );

        sqlx::query_as::<_, Team>(&sql)
            .bind(owner_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Lists every team in the system. Callers gate this behind the
    /// platform-administrator check.
    pub async fn list_all(pool: &PgPool, order: Order, page: Page) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {TEAM_COLUMNS} FROM teams ORDER BY created_at {} LIMIT $1 OFFSET $2",
            order.as_sql()
        );

        sqlx::query_as::<_, Team>(&sql)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Updates a team, leaving absent fields unchanged.
    ///
    /// Returns the updated team, or `None` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the new title collides with another team of the
    /// same owner, or the database is unavailable.
    pub async fn update(
        pool: &PgPool,
        id: Uuid,
        data: &UpdateTeam,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            r#"
            UPDATE teams
            SET title = COALESCE($2, title), updated_at = NOW()
            WHERE id = $1
            RETURNING {TEAM_COLUMNS}
            "#
        );

        sqlx::query_as::<_, Team>(&sql)
            .bind(id)
            .bind(data.title.as_deref())
            .fetch_optional(pool)
            .await
    }

    /// Deletes a team.
    ///
    /// Returns true if a row was deleted. Memberships, projects, and their
    /// tasks and comments go with it through the foreign-key cascades.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM teams WHERE id = $1")
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
    fn test_create_team_validation() {
        let valid = CreateTeam {
            title: "backend".to_string(),
        };
        assert!(valid.validate().is_ok());

        let empty = CreateTeam {
            title: String::new(),
        };
        assert!(empty.validate().is_err());

        let too_long = CreateTeam {
            title: "a".repeat(21),
        };
        assert!(too_long.validate().is_err());
    }

    #[test]
    fn test_update_team_absent_title_is_valid() {
        let patch = UpdateTeam::default();
        assert!(patch.title.is_none());
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn test_update_team_present_title_is_checked() {
        let patch = UpdateTeam {
            title: Some("a".repeat(21)),
        };
        assert!(patch.validate().is_err());
    }

    // Integration tests for database operations are in tests/service_tests.rs
}
