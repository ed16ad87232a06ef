/// ActivityLog model and audit-trail queries
///
/// Every successful mutation in the system appends exactly one row to
/// `activity_logs`. Rows are immutable: nothing in the application updates or
/// deletes them, and they only disappear when a referenced parent entity is
/// deleted and the foreign key cascades.
///
/// The `entity_id` column is deliberately a bare UUID rather than a foreign
/// key: it names the entity a record is about, including entities that no
/// longer exist (a delete record outlives the row it describes). The typed
/// reference columns (`project_id`, `task_id`, `team_id`, `comment_id`) carry
/// the surviving parents of the event and cascade with them.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE activity_logs (
///     id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
///     user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     activity_type activity_type NOT NULL,
///     entity entity_kind NOT NULL,
///     entity_id UUID NOT NULL,
///     project_id UUID REFERENCES projects(id) ON DELETE CASCADE,
///     task_id UUID REFERENCES tasks(id) ON DELETE CASCADE,
///     team_id UUID REFERENCES teams(id) ON DELETE CASCADE,
///     comment_id UUID REFERENCES task_comments(id) ON DELETE CASCADE,
///     description VARCHAR(320) NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::query::{Order, Page};

/// What happened to the entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "activity_type", rename_all = "snake_case")]
pub enum ActivityType {
    Create,
    Update,
    Delete,
    Comment,
}

impl ActivityType {
    /// Gets the activity type as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityType::Create => "create",
            ActivityType::Update => "update",
            ActivityType::Delete => "delete",
            ActivityType::Comment => "comment",
        }
    }
}

/// Which kind of entity a record (or an error) is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "entity_kind", rename_all = "snake_case")]
pub enum EntityKind {
    Project,
    Task,
    Team,
    TeamMember,
    Comment,
    User,
    /// Audit records themselves; never written to the log, only reported on
    Activity,
}

impl EntityKind {
    /// Gets the entity kind as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Project => "project",
            EntityKind::Task => "task",
            EntityKind::Team => "team",
            EntityKind::TeamMember => "team_member",
            EntityKind::Comment => "comment",
            EntityKind::User => "user",
            EntityKind::Activity => "activity",
        }
    }

    /// Human-readable label used in error and audit messages.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Project => "Project",
            EntityKind::Task => "Task",
            EntityKind::Team => "Team",
            EntityKind::TeamMember => "Team member",
            EntityKind::Comment => "Comment",
            EntityKind::User => "User",
            EntityKind::Activity => "Activity",
        }
    }
}

/// One immutable audit record.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ActivityLog {
    /// Unique record ID
    pub id: Uuid,

    /// Acting user (the principal that performed the mutation)
    pub user_id: Uuid,

    /// What happened
    pub activity_type: ActivityType,

    /// Kind of the entity the record is about
    pub entity: EntityKind,

    /// Id of that entity; plain UUID, survives the entity's deletion
    pub entity_id: Uuid,

    /// Related project, when one survives the event
    pub project_id: Option<Uuid>,

    /// Related task, when one survives the event
    pub task_id: Option<Uuid>,

    /// Related team, when one survives the event
    pub team_id: Option<Uuid>,

    /// Related comment, when one survives the event
    pub comment_id: Option<Uuid>,

    /// Short human-readable summary, e.g. "Project <id> has been created."
    pub description: String,

    /// When the record was appended
    pub created_at: DateTime<Utc>,
}

/// Insert input for one audit record. Built by the audit recorder.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub user_id: Uuid,
    pub activity_type: ActivityType,
    pub entity: EntityKind,
    pub entity_id: Uuid,
    pub project_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
    pub description: String,
}

/// Optional filters for activity listings.
///
/// Filters are ANDed onto the listing scope; an absent filter matches
/// everything.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ActivityFilter {
    /// Keep only records with this activity type
    pub activity_type: Option<ActivityType>,

    /// Keep only records about this kind of entity
    pub entity: Option<EntityKind>,
}

/// Which part of the entity graph a listing covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivityScope {
    /// Records related to one project
    Project(Uuid),

    /// Records related to one task
    Task(Uuid),

    /// Records related to one team
    Team(Uuid),

    /// Records produced by one acting user
    Actor(Uuid),
}

impl ActivityScope {
    fn column(&self) -> &'static str {
        match self {
            ActivityScope::Project(_) => "project_id",
            ActivityScope::Task(_) => "task_id",
            ActivityScope::Team(_) => "team_id",
            ActivityScope::Actor(_) => "user_id",
        }
    }

    fn id(&self) -> Uuid {
        match self {
            ActivityScope::Project(id)
            | ActivityScope::Task(id)
            | ActivityScope::Team(id)
            | ActivityScope::Actor(id) => *id,
        }
    }
}

const ACTIVITY_COLUMNS: &str = "id, user_id, activity_type, entity, entity_id, \
     project_id, task_id, team_id, comment_id, description, created_at";

impl ActivityLog {
    /// Appends one audit record.
    ///
    /// This is the only write path for `activity_logs`; services go through
    /// [`crate::audit::AuditRecorder`] rather than calling this directly.
    ///
    /// # Errors
    ///
    /// Returns an error if a referenced parent row is gone (foreign key
    /// violation) or the database is unavailable.
    pub async fn insert(pool: &PgPool, data: &NewActivity) -> Result<Self, sqlx::Error> {
        let sql = format!(
            r#"
            INSERT INTO activity_logs
                (user_id, activity_type, entity, entity_id,
                 project_id, task_id, team_id, comment_id, description)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {ACTIVITY_COLUMNS}
            "#
        );

        sqlx::query_as::<_, ActivityLog>(&sql)
            .bind(data.user_id)
            .bind(data.activity_type)
            .bind(data.entity)
            .bind(data.entity_id)
            .bind(data.project_id)
            .bind(data.task_id)
            .bind(data.team_id)
            .bind(data.comment_id)
            .bind(&data.description)
            .fetch_one(pool)
            .await
    }

    /// Lists records within one scope, narrowed by the optional filters.
    pub async fn list_scoped(
        pool: &PgPool,
        scope: ActivityScope,
        filter: ActivityFilter,
        order: Order,
        page: Page,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let mut sql = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activity_logs WHERE {} = $1",
            scope.column()
        );
        let mut bind_count = 1;

        if filter.activity_type.is_some() {
            bind_count += 1;
            sql.push_str(&format!(" AND activity_type = ${bind_count}"));
        }
        if filter.entity.is_some() {
            bind_count += 1;
            sql.push_str(&format!(" AND entity = ${bind_count}"));
        }

        bind_count += 1;
        sql.push_str(&format!(
            " ORDER BY created_at {} LIMIT ${bind_count}",
            order.as_sql()
        ));
        bind_count += 1;
        sql.push_str(&format!(" OFFSET ${bind_count}"));

        let mut query = sqlx::query_as::<_, ActivityLog>(&sql).bind(scope.id());
        if let Some(activity_type) = filter.activity_type {
            query = query.bind(activity_type);
        }
        if let Some(entity) = filter.entity {
            query = query.bind(entity);
        }

        query
            .bind(page.limit())
            .bind(page.offset())
            .fetch_all(pool)
            .await
    }

    /// Fetches one record, scoped to a project.
    ///
    /// Returns `None` when the record does not exist or belongs to a
    /// different project.
    pub async fn find_in_project(
        pool: &PgPool,
        id: Uuid,
        project_id: Uuid,
    ) -> Result<Option<Self>, sqlx::Error> {
        let sql = format!(
            "SELECT {ACTIVITY_COLUMNS} FROM activity_logs WHERE id = $1 AND project_id = $2"
        );

        sqlx::query_as::<_, ActivityLog>(&sql)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Counts records about one entity id.
    pub async fn count_for_entity(
        pool: &PgPool,
        entity: EntityKind,
        entity_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM activity_logs WHERE entity = $1 AND entity_id = $2",
        )
        .bind(entity)
        .bind(entity_id)
        .fetch_one(pool)
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activity_type_as_str() {
        assert_eq!(ActivityType::Create.as_str(), "create");
        assert_eq!(ActivityType::Update.as_str(), "update");
        assert_eq!(ActivityType::Delete.as_str(), "delete");
        assert_eq!(ActivityType::Comment.as_str(), "comment");
    }

    #[test]
    fn test_entity_kind_as_str() {
        assert_eq!(EntityKind::Project.as_str(), "project");
        assert_eq!(EntityKind::TeamMember.as_str(), "team_member");
        assert_eq!(EntityKind::User.as_str(), "user");
    }

    #[test]
    fn test_entity_kind_label() {
        assert_eq!(EntityKind::Project.label(), "Project");
        assert_eq!(EntityKind::TeamMember.label(), "Team member");
    }

    #[test]
    fn test_enum_serde_round_trip() {
        let json = serde_json::to_string(&ActivityType::Comment).unwrap();
        assert_eq!(json, "\"comment\"");
        let parsed: ActivityType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, ActivityType::Comment);

        let json = serde_json::to_string(&EntityKind::TeamMember).unwrap();
        assert_eq!(json, "\"team_member\"");
        let parsed: EntityKind = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, EntityKind::TeamMember);
    }

    #[test]
    fn test_filter_defaults_to_no_constraints() {
        let filter = ActivityFilter::default();
        assert!(filter.activity_type.is_none());
        assert!(filter.entity.is_none());
    }

    #[test]
    fn test_scope_picks_the_right_column() {
        let id = Uuid::new_v4();
        assert_eq!(ActivityScope::Project(id).column(), "project_id");
        assert_eq!(ActivityScope::Task(id).column(), "task_id");
        assert_eq!(ActivityScope::Team(id).column(), "team_id");
        assert_eq!(ActivityScope::Actor(id).column(), "user_id");
        assert_eq!(ActivityScope::Team(id).id(), id);
    }
}
