/// Project operations
///
/// Projects are the unit of ownership for tasks. Every operation here runs
/// as a [`Principal`]: the owner and platform administrators have full
/// control, members of the project's team may read. A project may be
/// attached to a team only when that team belongs to the project's owner,
/// so sharing never crosses ownership lines.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::access::{self, Action, Principal};
use crate::audit::{AuditRecorder, RelatedIds};
use crate::error::Error;
use crate::models::activity::{ActivityType, EntityKind};
use crate::models::project::{CreateProject, Project, UpdateProject};
use crate::models::team::Team;
use crate::query::{Order, Page};
use crate::services::check_patch_text;

/// Project service.
#[derive(Debug, Clone)]
pub struct ProjectService {
    pool: PgPool,
    audit: AuditRecorder,
}

impl ProjectService {
    /// Creates a service working through the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            audit: AuditRecorder::new(pool.clone()),
            pool,
        }
    }

    /// Creates a project owned by the principal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] when the input is out of bounds or
    /// `team_id` does not name a team the principal owns, and
    /// [`Error::Conflict`] when the principal already has a project with
    /// this title.
    pub async fn create(
        &self,
        principal: &Principal,
        data: CreateProject,
    ) -> Result<Project, Error> {
        data.validate()?;

        if let Some(team_id) = data.team_id {
            self.require_owned_team(team_id, principal.user_id).await?;
        }

        let project = Project::create(&self.pool, principal.user_id, &data).await?;

        tracing::info!(
            project_id = %project.id,
            user_id = %principal.user_id,
            "Project created"
        );

        self.audit
            .record_after_commit(
                principal,
                ActivityType::Create,
                EntityKind::Project,
                project.id,
                RelatedIds {
                    project_id: Some(project.id),
                    team_id: project.team_id,
                    ..Default::default()
                },
            )
            .await;

        Ok(project)
    }

    /// Fetches a project the principal may read.
    pub async fn get_by_id(&self, principal: &Principal, project_id: Uuid) -> Result<Project, Error> {
        access::authorize_project(&self.pool, principal, project_id, Action::Read).await
    }

    /// Lists one owner's projects.
    pub async fn list(
        &self,
        principal: &Principal,
        owner: Option<Uuid>,
        order: Order,
        page: Page,
    ) -> Result<Vec<Project>, Error> {
        let owner_id = access::resolve_owner_scope(principal, owner)?;

        Ok(Project::list_by_owner(&self.pool, owner_id, order, page).await?)
    }

    /// Lists the projects attached to a team the principal controls.
    pub async fn list_by_team(
        &self,
        principal: &Principal,
        team_id: Uuid,
        order: Order,
        page: Page,
    ) -> Result<Vec<Project>, Error> {
        access::authorize_team(&self.pool, principal, team_id).await?;

        Ok(Project::list_by_team(&self.pool, team_id, order, page).await?)
    }

    /// Lists the projects shared with the principal through team
    /// membership.
    pub async fn list_shared(
        &self,
        principal: &Principal,
        order: Order,
        page: Page,
    ) -> Result<Vec<Project>, Error> {
        Ok(Project::list_for_member(&self.pool, principal.user_id, order, page).await?)
    }

    /// Applies a partial update to a project the principal may write.
    ///
    /// An attached team may be swapped or cleared; a new team must belong
    /// to the project's owner, which for administrator updates is not the
    /// acting principal.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the project is missing or the
    /// principal may not update it, [`Error::Validation`] for
    /// out-of-bounds fields or a team the owner does not own, and
    /// [`Error::Conflict`] when the new title is already taken.
    pub async fn update(
        &self,
        principal: &Principal,
        project_id: Uuid,
        data: UpdateProject,
    ) -> Result<Project, Error> {
        data.validate()?;
        check_patch_text("description", &data.description, 320)?;

        let project =
            access::authorize_project(&self.pool, principal, project_id, Action::Update).await?;

        if let Some(Some(team_id)) = data.team_id {
            self.require_owned_team(team_id, project.user_id).await?;
        }

        let updated = Project::update(&self.pool, project_id, &data)
            .await?
            .ok_or(Error::NotFound(EntityKind::Project))?;

        tracing::info!(
            project_id = %updated.id,
            user_id = %principal.user_id,
            "Project updated"
        );

        self.audit
            .record_after_commit(
                principal,
                ActivityType::Update,
                EntityKind::Project,
                updated.id,
                RelatedIds {
                    project_id: Some(updated.id),
                    team_id: updated.team_id,
                    ..Default::default()
                },
            )
            .await;

        Ok(updated)
    }

    /// Deletes a project the principal may delete, with its tasks and
    /// comments.
    pub async fn delete(&self, principal: &Principal, project_id: Uuid) -> Result<(), Error> {
        let project =
            access::authorize_project(&self.pool, principal, project_id, Action::Delete).await?;

        if !Project::delete(&self.pool, project_id).await? {
            return Err(Error::NotFound(EntityKind::Project));
        }

        tracing::info!(
            project_id = %project_id,
            user_id = %principal.user_id,
            "Project deleted"
        );

        // The deleted project must not be referenced; its team survives.
        self.audit
            .record_after_commit(
                principal,
                ActivityType::Delete,
                EntityKind::Project,
                project_id,
                RelatedIds {
                    team_id: project.team_id,
                    ..Default::default()
                },
            )
            .await;

        Ok(())
    }

    /// Checks that `team_id` names a team belonging to `owner_id`.
    async fn require_owned_team(&self, team_id: Uuid, owner_id: Uuid) -> Result<(), Error> {
        let owned = Team::find_by_id(&self.pool, team_id)
            .await?
            .map_or(false, |team| team.user_id == owner_id);

        if owned {
            Ok(())
        } else {
            Err(Error::Validation(
                "the team must exist and belong to the project owner".to_string(),
            ))
        }
    }
}

// Integration tests covering authorization, team attachment, and audit
// records are in tests/service_tests.rs.
