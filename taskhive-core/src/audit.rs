/// Audit recording for service mutations
///
/// Services append one activity record per successful mutation, strictly
/// after the mutation itself has committed. The mutation is the source of
/// truth: when the append fails, [`AuditRecorder::record_after_commit`]
/// reports the failure through the log and returns `None`, and the caller
/// still sees its mutation succeed. Callers that must surface the failure
/// use [`AuditRecorder::record`] instead.

use sqlx::PgPool;
use uuid::Uuid;

use crate::access::Principal;
use crate::error::Error;
use crate::models::activity::{ActivityLog, ActivityType, EntityKind, NewActivity};

/// The surviving parents of an audited event.
///
/// Leave a field `None` when the event has no such parent, or when the
/// parent is the deleted entity itself: a delete record must not reference
/// the row that is gone.
#[derive(Debug, Clone, Copy, Default)]
pub struct RelatedIds {
    pub project_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
    pub comment_id: Option<Uuid>,
}

/// Builds the standard description line for an audit record.
pub fn describe(activity_type: ActivityType, entity: EntityKind, entity_id: Uuid) -> String {
    let verb = match (entity, activity_type) {
        (EntityKind::TeamMember, ActivityType::Create) => "added",
        (EntityKind::TeamMember, ActivityType::Delete) => "removed",
        (EntityKind::Comment, ActivityType::Comment | ActivityType::Create) => "added",
        (_, ActivityType::Create | ActivityType::Comment) => "created",
        (_, ActivityType::Update) => "updated",
        (_, ActivityType::Delete) => "deleted",
    };
    format!("{} {} has been {}.", entity.label(), entity_id, verb)
}

/// Appends audit records to the activity trail.
#[derive(Debug, Clone)]
pub struct AuditRecorder {
    pool: PgPool,
}

impl AuditRecorder {
    /// Creates a recorder writing through the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Appends one audit record, surfacing failure to the caller.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Audit`] when the append fails.
    pub async fn record(
        &self,
        actor: &Principal,
        activity_type: ActivityType,
        entity: EntityKind,
        entity_id: Uuid,
        related: RelatedIds,
    ) -> Result<ActivityLog, Error> {
        let activity = NewActivity {
            user_id: actor.user_id,
            activity_type,
            entity,
            entity_id,
            project_id: related.project_id,
            task_id: related.task_id,
            team_id: related.team_id,
            comment_id: related.comment_id,
            description: describe(activity_type, entity, entity_id),
        };

        ActivityLog::insert(&self.pool, &activity)
            .await
            .map_err(Error::Audit)
    }

    /// Appends one audit record for a mutation that already committed.
    ///
    /// The mutation must not be rolled back at this point, so a failed
    /// append is logged and swallowed; the caller gets `None` and its
    /// mutation stands.
    pub async fn record_after_commit(
        &self,
        actor: &Principal,
        activity_type: ActivityType,
        entity: EntityKind,
        entity_id: Uuid,
        related: RelatedIds,
    ) -> Option<ActivityLog> {
        match self
            .record(actor, activity_type, entity, entity_id, related)
            .await
        {
            Ok(activity) => Some(activity),
            Err(err) => {
                tracing::error!(
                    error = %err,
                    actor = %actor.user_id,
                    activity_type = activity_type.as_str(),
                    entity = entity.as_str(),
                    entity_id = %entity_id,
                    "Audit append failed after mutation commit"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_standard_verbs() {
        let id = Uuid::new_v4();
        assert_eq!(
            describe(ActivityType::Create, EntityKind::Project, id),
            format!("Project {id} has been created.")
        );
        assert_eq!(
            describe(ActivityType::Update, EntityKind::Task, id),
            format!("Task {id} has been updated.")
        );
        assert_eq!(
            describe(ActivityType::Delete, EntityKind::Team, id),
            format!("Team {id} has been deleted.")
        );
    }

    #[test]
    fn test_describe_membership_verbs() {
        let id = Uuid::new_v4();
        assert_eq!(
            describe(ActivityType::Create, EntityKind::TeamMember, id),
            format!("Team member {id} has been added.")
        );
        assert_eq!(
            describe(ActivityType::Delete, EntityKind::TeamMember, id),
            format!("Team member {id} has been removed.")
        );
    }

    #[test]
    fn test_describe_comment_verbs() {
        let id = Uuid::new_v4();
        assert_eq!(
            describe(ActivityType::Comment, EntityKind::Comment, id),
            format!("Comment {id} has been added.")
        );
        assert_eq!(
            describe(ActivityType::Update, EntityKind::Comment, id),
            format!("Comment {id} has been updated.")
        );
        assert_eq!(
            describe(ActivityType::Delete, EntityKind::Comment, id),
            format!("Comment {id} has been deleted.")
        );
    }
}
