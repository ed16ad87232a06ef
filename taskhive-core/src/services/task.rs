/// Task operations
///
/// Tasks live inside projects but carry their own, stricter access rule:
/// only the creator and the assignee ever see one, and only the creator
/// may delete it. Platform administrators get no override here. Listings
/// are first gated on the enclosing project, then row-filtered down to
/// the tasks the principal created or is assigned to, so a reachable
/// project with no visible tasks yields an empty page rather than a
/// denial. The one exception is the team-scoped listing, which shows a
/// readable project's whole board.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::access::{self, Action, Principal};
use crate::audit::{AuditRecorder, RelatedIds};
use crate::error::Error;
use crate::models::activity::{ActivityType, EntityKind};
use crate::models::task::{CreateTask, Task, TaskFilter, UpdateTask};
use crate::models::user::User;
use crate::query::{Order, Page};
use crate::services::check_patch_text;

/// Task service.
#[derive(Debug, Clone)]
pub struct TaskService {
    pool: PgPool,
    audit: AuditRecorder,
}

impl TaskService {
    /// Creates a service working through the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            audit: AuditRecorder::new(pool.clone()),
            pool,
        }
    }

    /// Creates a task in a project the principal can read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the project is not accessible,
    /// [`Error::Validation`] when the input is out of bounds or the
    /// assignee does not resolve to an active user, and
    /// [`Error::Conflict`] when the principal already has a task with
    /// this title.
    pub async fn create(&self, principal: &Principal, data: CreateTask) -> Result<Task, Error> {
        data.validate()?;

        access::authorize_project(&self.pool, principal, data.project_id, Action::Read).await?;

        if let Some(assigned_id) = data.assigned_id {
            self.require_active_user(assigned_id).await?;
        }

        let task = Task::create(&self.pool, principal.user_id, &data).await?;

        tracing::info!(
            task_id = %task.id,
            project_id = %task.project_id,
            user_id = %principal.user_id,
            "Task created"
        );

        self.audit
            .record_after_commit(
                principal,
                ActivityType::Create,
                EntityKind::Task,
                task.id,
                RelatedIds {
                    project_id: Some(task.project_id),
                    task_id: Some(task.id),
                    ..Default::default()
                },
            )
            .await;

        Ok(task)
    }

    /// Fetches a task the principal created or is assigned to.
    pub async fn get_by_id(&self, principal: &Principal, task_id: Uuid) -> Result<Task, Error> {
        access::authorize_task(&self.pool, principal, task_id, Action::Read).await
    }

    /// Lists the principal's tasks within a project.
    pub async fn list_by_project(
        &self,
        principal: &Principal,
        project_id: Uuid,
        order: Order,
        page: Page,
    ) -> Result<Vec<Task>, Error> {
        access::authorize_project(&self.pool, principal, project_id, Action::Read).await?;

        Ok(
            Task::list_for_user_in_project(&self.pool, project_id, principal.user_id, order, page)
                .await?,
        )
    }

    /// Lists every task in a project the principal can read.
    ///
    /// This is the team-scoped view: the project gate already admits team
    /// members, and here their visibility widens to the whole board rather
    /// than being row-filtered down to their own tasks.
    pub async fn list_all_by_project(
        &self,
        principal: &Principal,
        project_id: Uuid,
        order: Order,
        page: Page,
    ) -> Result<Vec<Task>, Error> {
        access::authorize_project(&self.pool, principal, project_id, Action::Read).await?;

        Ok(Task::list_by_project(&self.pool, project_id, order, page).await?)
    }

    /// Lists the principal's tasks within a project, narrowed by `filter`.
    pub async fn filter_by_project(
        &self,
        principal: &Principal,
        project_id: Uuid,
        filter: TaskFilter,
        order: Order,
        page: Page,
    ) -> Result<Vec<Task>, Error> {
        access::authorize_project(&self.pool, principal, project_id, Action::Read).await?;

        Ok(Task::filter_for_user_in_project(
            &self.pool,
            project_id,
            principal.user_id,
            filter,
            order,
            page,
        )
        .await?)
    }

    /// Applies a partial update to a task the principal may write.
    ///
    /// Both the creator and the assignee may update; reassignment must
    /// name an active user.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the task is missing or the
    /// principal is neither creator nor assignee, [`Error::Validation`]
    /// for out-of-bounds fields or an unusable assignee, and
    /// [`Error::Conflict`] when the new title collides.
    pub async fn update(
        &self,
        principal: &Principal,
        task_id: Uuid,
        data: UpdateTask,
    ) -> Result<Task, Error> {
        data.validate()?;
        check_patch_text("description", &data.description, 320)?;

        access::authorize_task(&self.pool, principal, task_id, Action::Update).await?;

        if let Some(Some(assigned_id)) = data.assigned_id {
            self.require_active_user(assigned_id).await?;
        }

        let updated = Task::update(&self.pool, task_id, &data)
            .await?
            .ok_or(Error::NotFound(EntityKind::Task))?;

        tracing::info!(
            task_id = %updated.id,
            project_id = %updated.project_id,
            user_id = %principal.user_id,
            "Task updated"
        );

        self.audit
            .record_after_commit(
                principal,
                ActivityType::Update,
                EntityKind::Task,
                updated.id,
                RelatedIds {
                    project_id: Some(updated.project_id),
                    task_id: Some(updated.id),
                    ..Default::default()
                },
            )
            .await;

        Ok(updated)
    }

    /// Deletes a task. Only the creator may do this.
    pub async fn delete(&self, principal: &Principal, task_id: Uuid) -> Result<(), Error> {
        let task = access::authorize_task(&self.pool, principal, task_id, Action::Delete).await?;

        if !Task::delete(&self.pool, task_id).await? {
            return Err(Error::NotFound(EntityKind::Task));
        }

        tracing::info!(
            task_id = %task_id,
            project_id = %task.project_id,
            user_id = %principal.user_id,
            "Task deleted"
        );

        // The deleted task must not be referenced; its project survives.
        self.audit
            .record_after_commit(
                principal,
                ActivityType::Delete,
                EntityKind::Task,
                task_id,
                RelatedIds {
                    project_id: Some(task.project_id),
                    ..Default::default()
                },
            )
            .await;

        Ok(())
    }

    /// Checks that `user_id` names an active user.
    async fn require_active_user(&self, user_id: Uuid) -> Result<(), Error> {
        if User::exists(&self.pool, user_id).await? {
            Ok(())
        } else {
            Err(Error::Validation(
                "the assigned user does not exist or is inactive".to_string(),
            ))
        }
    }
}

// Integration tests covering the creator/assignee rules and audit records
// are in tests/service_tests.rs.
