/// Team operations
///
/// A team is a named group of users owned by whoever created it. Owners
/// and platform administrators control a team; membership alone grants
/// nothing here, only read access to the projects attached to the team.
/// Deleting a team cascades to those projects and to its memberships.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::access::{self, Principal};
use crate::audit::{AuditRecorder, RelatedIds};
use crate::error::Error;
use crate::models::activity::{ActivityType, EntityKind};
use crate::models::member::TeamMember;
use crate::models::team::{CreateTeam, Team, UpdateTeam};
use crate::query::{Order, Page};

/// Team service.
#[derive(Debug, Clone)]
pub struct TeamService {
    pool: PgPool,
    audit: AuditRecorder,
}

impl TeamService {
    /// Creates a service working through the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            audit: AuditRecorder::new(pool.clone()),
            pool,
        }
    }

    /// Creates a team owned by the principal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the title is out of bounds and
    /// [`Error::Conflict`] when the principal already has a team with
    /// this title.
    pub async fn create(&self, principal: &Principal, data: CreateTeam) -> Result<Team, Error> {
        data.validate()?;

        let team = Team::create(&self.pool, principal.user_id, &data).await?;

        tracing::info!(
            team_id = %team.id,
            user_id = %principal.user_id,
            "Team created"
        );

        self.audit
            .record_after_commit(
                principal,
                ActivityType::Create,
                EntityKind::Team,
                team.id,
                RelatedIds {
                    team_id: Some(team.id),
                    ..Default::default()
                },
            )
            .await;

        Ok(team)
    }

    /// Fetches a team the principal controls.
    pub async fn get_by_id(&self, principal: &Principal, team_id: Uuid) -> Result<Team, Error> {
        access::authorize_team(&self.pool, principal, team_id).await
    }

    /// Looks a team up by title within one owner's resources.
    ///
    /// Ordinary principals search their own teams; platform
    /// administrators must name the owner to search.
    pub async fn find_by_title(
        &self,
        principal: &Principal,
        owner: Option<Uuid>,
        title: &str,
    ) -> Result<Team, Error> {
        let owner_id = access::resolve_owner_scope(principal, owner)?;

        Team::find_by_title(&self.pool, owner_id, title)
            .await?
            .ok_or(Error::NotFound(EntityKind::Team))
    }

    /// Lists one owner's teams.
    pub async fn list(
        &self,
        principal: &Principal,
        owner: Option<Uuid>,
        order: Order,
        page: Page,
    ) -> Result<Vec<Team>, Error> {
        let owner_id = access::resolve_owner_scope(principal, owner)?;

        Ok(Team::list_by_owner(&self.pool, owner_id, order, page).await?)
    }

    /// Lists every team in the system. Platform administrators only.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Forbidden`] for everyone else.
    pub async fn list_all(
        &self,
        principal: &Principal,
        order: Order,
        page: Page,
    ) -> Result<Vec<Team>, Error> {
        access::require_platform_admin(principal)?;

        Ok(Team::list_all(&self.pool, order, page).await?)
    }

    /// Counts the members of a team the principal controls.
    pub async fn member_count(&self, principal: &Principal, team_id: Uuid) -> Result<i64, Error> {
        access::authorize_team(&self.pool, principal, team_id).await?;

        Ok(TeamMember::count_by_team(&self.pool, team_id).await?)
    }

    /// Renames a team the principal controls.
    pub async fn update(
        &self,
        principal: &Principal,
        team_id: Uuid,
        data: UpdateTeam,
    ) -> Result<Team, Error> {
        data.validate()?;

        access::authorize_team(&self.pool, principal, team_id).await?;

        let updated = Team::update(&self.pool, team_id, &data)
            .await?
            .ok_or(Error::NotFound(EntityKind::Team))?;

        tracing::info!(
            team_id = %updated.id,
            user_id = %principal.user_id,
            "Team updated"
        );

        self.audit
            .record_after_commit(
                principal,
                ActivityType::Update,
                EntityKind::Team,
                updated.id,
                RelatedIds {
                    team_id: Some(updated.id),
                    ..Default::default()
                },
            )
            .await;

        Ok(updated)
    }

    /// Deletes a team the principal controls, with its memberships and
    /// attached projects.
    pub async fn delete(&self, principal: &Principal, team_id: Uuid) -> Result<(), Error> {
        access::authorize_team(&self.pool, principal, team_id).await?;

        if !Team::delete(&self.pool, team_id).await? {
            return Err(Error::NotFound(EntityKind::Team));
        }

        tracing::info!(
            team_id = %team_id,
            user_id = %principal.user_id,
            "Team deleted"
        );

        // Nothing the deleted team owned survives to be referenced.
        self.audit
            .record_after_commit(
                principal,
                ActivityType::Delete,
                EntityKind::Team,
                team_id,
                RelatedIds::default(),
            )
            .await;

        Ok(())
    }
}

// Integration tests covering ownership, the administrator-only listing,
// and cascade behavior are in tests/service_tests.rs.
