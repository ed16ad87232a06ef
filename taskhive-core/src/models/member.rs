/// Team membership model and database operations
///
/// A row relates one user to one team. The pair is unique, so adding the
/// same user twice is a conflict. Membership grants read access to the
/// team's projects; it never grants write access.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE team_members (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     team_id UUID NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     CONSTRAINT uq_team_member UNIQUE (team_id, user_id)
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::query::{Order, Page};

/// One user's membership in one team
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct TeamMember {
    /// Unique membership ID
    pub id: Uuid,

    /// Team the user belongs to
    pub team_id: Uuid,

    /// Member user
    pub user_id: Uuid,

    /// When the membership was created
    pub created_at: DateTime<Utc>,
}

/// Input for adding a user to a team
#[derive(Debug, Clone, Deserialize)]
pub struct AddTeamMember {
    /// Team to add the user to
    pub team_id: Uuid,

    /// User to add
    pub user_id: Uuid,
}

const MEMBER_COLUMNS: &str = "id, team_id, user_id, created_at";

impl TeamMember {
    /// Adds a user to a team.
    ///
    /// # Errors
    ///
    /// Returns an error if the user is already a member (unique constraint
    /// violation), the team or user does not exist (foreign key violation),
    /// or the database is unavailable.
    pub async fn create(pool: &PgPool, data: &AddTeamMember) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO team_members (team_id, user_id)
            VALUES ($1, $2)
            RETURNING {MEMBER_COLUMNS}
            "#
        );

        sqlx::query_as::<_, TeamMember>(&sql)
            .bind(data.team_id)
            .bind(data.user_id)
            .fetch_one(pool)
            .await
    }

    /// Finds a membership by ID.
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!("SELECT {MEMBER_COLUMNS} FROM team_members WHERE id = $1");

        sqlx::query_as::<_, TeamMember>(&sql)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Checks whether a user belongs to a team.
    pub async fn is_member(
        pool: &PgPool,
        team_id: Uuid,
        user_id: Uuid,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM team_members
                WHERE team_id = $1 AND user_id = $2
            )
            "#,
        )
        .bind(team_id)
        .bind(user_id)
        .fetch_one(pool)
        .await
    }

    /// Lists the members of a team.
    pub async fn list_by_team(
        pool: &PgPool,
        team_id: Uuid,
        order: Order,
        page: Page,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {MEMBER_COLUMNS} FROM team_members WHERE team_id = $1 \
             ORDER BY created_at {} LIMIT $2 OFFSET $3",
            order.as_sql()
        );

        sqlx::query_as::<_, TeamMember>(&sql)
            .bind(team_id)
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Counts the members of a team.
    pub async fn count_by_team(pool: &PgPool, team_id: Uuid) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM team_members WHERE team_id = $1")
            .bind(team_id)
            .fetch_one(pool)
            .await
    }

    /// Removes a membership.
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM team_members WHERE id = $1")
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
    fn test_add_team_member_deserializes() {
        let team_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let json = format!(r#"{{"team_id":"{team_id}","user_id":"{user_id}"}}"#);

        let data: AddTeamMember = serde_json::from_str(&json).unwrap();
        assert_eq!(data.team_id, team_id);
        assert_eq!(data.user_id, user_id);
    }

    // Integration tests for database operations are in tests/service_tests.rs
}
