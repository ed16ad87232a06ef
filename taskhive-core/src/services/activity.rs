/// Activity trail queries
///
/// The activity log is read-only from here: records are appended by the
/// mutating services and never edited or deleted afterwards. Each listing
/// is gated by the access rule of the resource it is scoped to, so the
/// trail never reveals more than the resources themselves would.

use sqlx::PgPool;
use uuid::Uuid;

use crate::access::{self, Action, Principal};
use crate::error::Error;
use crate::models::activity::{ActivityFilter, ActivityLog, ActivityScope, EntityKind};
use crate::query::{Order, Page};

/// Activity trail service.
#[derive(Debug, Clone)]
pub struct ActivityService {
    pool: PgPool,
}

impl ActivityService {
    /// Creates a service working through the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lists the records related to a project the principal can read.
    pub async fn list_by_project(
        &self,
        principal: &Principal,
        project_id: Uuid,
        filter: ActivityFilter,
        order: Order,
        page: Page,
    ) -> Result<Vec<ActivityLog>, Error> {
        access::authorize_project(&self.pool, principal, project_id, Action::Read).await?;

        Ok(
            ActivityLog::list_scoped(
                &self.pool,
                ActivityScope::Project(project_id),
                filter,
                order,
                page,
            )
            .await?,
        )
    }

    /// Lists the records related to a task the principal can read.
    pub async fn list_by_task(
        &self,
        principal: &Principal,
        task_id: Uuid,
        filter: ActivityFilter,
        order: Order,
        page: Page,
    ) -> Result<Vec<ActivityLog>, Error> {
        access::authorize_task(&self.pool, principal, task_id, Action::Read).await?;

        Ok(
            ActivityLog::list_scoped(&self.pool, ActivityScope::Task(task_id), filter, order, page)
                .await?,
        )
    }

    /// Lists the records related to a team the principal controls.
    pub async fn list_by_team(
        &self,
        principal: &Principal,
        team_id: Uuid,
        filter: ActivityFilter,
        order: Order,
        page: Page,
    ) -> Result<Vec<ActivityLog>, Error> {
        access::authorize_team(&self.pool, principal, team_id).await?;

        Ok(
            ActivityLog::list_scoped(&self.pool, ActivityScope::Team(team_id), filter, order, page)
                .await?,
        )
    }

    /// Lists the records produced by one acting user.
    ///
    /// Principals list their own history; naming another user requires a
    /// platform administrator.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Forbidden`] when an ordinary principal names
    /// someone else.
    pub async fn list_by_actor(
        &self,
        principal: &Principal,
        actor: Option<Uuid>,
        filter: ActivityFilter,
        order: Order,
        page: Page,
    ) -> Result<Vec<ActivityLog>, Error> {
        let actor_id = match actor {
            Some(id) if id != principal.user_id => {
                access::require_platform_admin(principal)?;
                id
            }
            _ => principal.user_id,
        };

        Ok(
            ActivityLog::list_scoped(&self.pool, ActivityScope::Actor(actor_id), filter, order, page)
                .await?,
        )
    }

    /// Fetches one record from the trail of a project the principal can
    /// read.
    pub async fn get_in_project(
        &self,
        principal: &Principal,
        project_id: Uuid,
        activity_id: Uuid,
    ) -> Result<ActivityLog, Error> {
        access::authorize_project(&self.pool, principal, project_id, Action::Read).await?;

        ActivityLog::find_in_project(&self.pool, activity_id, project_id)
            .await?
            .ok_or(Error::NotFound(EntityKind::Activity))
    }
}

// Integration tests covering scope gating and filter behavior are in
// tests/service_tests.rs.
