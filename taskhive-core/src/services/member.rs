/// Team membership operations
///
/// Membership rows link users into teams and are managed by whoever
/// controls the team. Each row has its own id, which is what removal
/// takes: removing a member deletes one membership row, never the user
/// behind it.

use sqlx::PgPool;
use uuid::Uuid;

use crate::access::{self, Principal};
use crate::audit::{AuditRecorder, RelatedIds};
use crate::error::Error;
use crate::models::activity::{ActivityType, EntityKind};
use crate::models::member::{AddTeamMember, TeamMember};
use crate::models::user::User;
use crate::query::{Order, Page};

/// Team membership service.
#[derive(Debug, Clone)]
pub struct TeamMemberService {
    pool: PgPool,
    audit: AuditRecorder,
}

impl TeamMemberService {
    /// Creates a service working through the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            audit: AuditRecorder::new(pool.clone()),
            pool,
        }
    }

    /// Adds a user to a team the principal controls.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the team is not accessible,
    /// [`Error::Conflict`] when the user is already a member, and
    /// [`Error::Validation`] when the user does not exist or is
    /// deactivated.
    pub async fn add(
        &self,
        principal: &Principal,
        data: AddTeamMember,
    ) -> Result<TeamMember, Error> {
        access::authorize_team(&self.pool, principal, data.team_id).await?;

        if !User::exists(&self.pool, data.user_id).await? {
            return Err(Error::Validation(
                "the user does not exist or is inactive".to_string(),
            ));
        }

        let member = TeamMember::create(&self.pool, &data).await?;

        tracing::info!(
            member_id = %member.id,
            team_id = %member.team_id,
            user_id = %principal.user_id,
            "Team member added"
        );

        self.audit
            .record_after_commit(
                principal,
                ActivityType::Create,
                EntityKind::TeamMember,
                member.id,
                RelatedIds {
                    team_id: Some(member.team_id),
                    ..Default::default()
                },
            )
            .await;

        Ok(member)
    }

    /// Fetches a membership row through a team the principal controls.
    pub async fn get_by_id(
        &self,
        principal: &Principal,
        member_id: Uuid,
    ) -> Result<TeamMember, Error> {
        access::authorize_member(&self.pool, principal, member_id).await
    }

    /// Lists the members of a team the principal controls.
    pub async fn list_by_team(
        &self,
        principal: &Principal,
        team_id: Uuid,
        order: Order,
        page: Page,
    ) -> Result<Vec<TeamMember>, Error> {
        access::authorize_team(&self.pool, principal, team_id).await?;

        Ok(TeamMember::list_by_team(&self.pool, team_id, order, page).await?)
    }

    /// Removes a membership row through a team the principal controls.
    pub async fn remove(&self, principal: &Principal, member_id: Uuid) -> Result<(), Error> {
        let member = access::authorize_member(&self.pool, principal, member_id).await?;

        if !TeamMember::delete(&self.pool, member_id).await? {
            return Err(Error::NotFound(EntityKind::TeamMember));
        }

        tracing::info!(
            member_id = %member_id,
            team_id = %member.team_id,
            user_id = %principal.user_id,
            "Team member removed"
        );

        // The team survives the removal and stays referenced.
        self.audit
            .record_after_commit(
                principal,
                ActivityType::Delete,
                EntityKind::TeamMember,
                member_id,
                RelatedIds {
                    team_id: Some(member.team_id),
                    ..Default::default()
                },
            )
            .await;

        Ok(())
    }
}

// Integration tests covering membership management and its audit records
// are in tests/service_tests.rs.
