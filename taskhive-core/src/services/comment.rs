/// Comment operations
///
/// Comments hang off tasks. Writing one requires read access to the task;
/// after that the comment is private to its author, and even platform
/// administrators cannot touch it. Listing a task's comments follows the
/// task's own read rule, so the creator and the assignee see the whole
/// thread.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::access::{self, Action, Principal};
use crate::audit::{AuditRecorder, RelatedIds};
use crate::error::Error;
use crate::models::activity::{ActivityType, EntityKind};
use crate::models::comment::{CreateComment, TaskComment, UpdateComment};
use crate::models::task::Task;
use crate::query::{Order, Page};

/// Comment service.
#[derive(Debug, Clone)]
pub struct CommentService {
    pool: PgPool,
    audit: AuditRecorder,
}

impl CommentService {
    /// Creates a service working through the given pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            audit: AuditRecorder::new(pool.clone()),
            pool,
        }
    }

    /// Adds a comment to a task the principal can read.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] when the task is not accessible and
    /// [`Error::Validation`] when the body is out of bounds.
    pub async fn create(
        &self,
        principal: &Principal,
        data: CreateComment,
    ) -> Result<TaskComment, Error> {
        data.validate()?;

        let task =
            access::authorize_task(&self.pool, principal, data.task_id, Action::Read).await?;

        let comment = TaskComment::create(&self.pool, principal.user_id, &data).await?;

        tracing::info!(
            comment_id = %comment.id,
            task_id = %comment.task_id,
            user_id = %principal.user_id,
            "Comment added"
        );

        self.audit
            .record_after_commit(
                principal,
                ActivityType::Comment,
                EntityKind::Comment,
                comment.id,
                RelatedIds {
                    project_id: Some(task.project_id),
                    task_id: Some(comment.task_id),
                    comment_id: Some(comment.id),
                    ..Default::default()
                },
            )
            .await;

        Ok(comment)
    }

    /// Fetches a comment the principal authored.
    pub async fn get_by_id(
        &self,
        principal: &Principal,
        comment_id: Uuid,
    ) -> Result<TaskComment, Error> {
        access::authorize_comment(&self.pool, principal, comment_id).await
    }

    /// Lists the comments on a task the principal can read.
    pub async fn list_by_task(
        &self,
        principal: &Principal,
        task_id: Uuid,
        order: Order,
        page: Page,
    ) -> Result<Vec<TaskComment>, Error> {
        access::authorize_task(&self.pool, principal, task_id, Action::Read).await?;

        Ok(TaskComment::list_by_task(&self.pool, task_id, order, page).await?)
    }

    /// Edits a comment the principal authored.
    pub async fn update(
        &self,
        principal: &Principal,
        comment_id: Uuid,
        data: UpdateComment,
    ) -> Result<TaskComment, Error> {
        data.validate()?;

        let comment = access::authorize_comment(&self.pool, principal, comment_id).await?;
        let project_id = self.project_of(comment.task_id).await?;

        let updated = TaskComment::update(&self.pool, comment_id, &data)
            .await?
            .ok_or(Error::NotFound(EntityKind::Comment))?;

        tracing::info!(
            comment_id = %updated.id,
            task_id = %updated.task_id,
            user_id = %principal.user_id,
            "Comment updated"
        );

        self.audit
            .record_after_commit(
                principal,
                ActivityType::Update,
                EntityKind::Comment,
                updated.id,
                RelatedIds {
                    project_id,
                    task_id: Some(updated.task_id),
                    comment_id: Some(updated.id),
                    ..Default::default()
                },
            )
            .await;

        Ok(updated)
    }

    /// Deletes a comment the principal authored.
    pub async fn delete(&self, principal: &Principal, comment_id: Uuid) -> Result<(), Error> {
        let comment = access::authorize_comment(&self.pool, principal, comment_id).await?;
        let project_id = self.project_of(comment.task_id).await?;

        if !TaskComment::delete(&self.pool, comment_id).await? {
            return Err(Error::NotFound(EntityKind::Comment));
        }

        tracing::info!(
            comment_id = %comment_id,
            task_id = %comment.task_id,
            user_id = %principal.user_id,
            "Comment deleted"
        );

        // The deleted comment must not be referenced; its task survives.
        self.audit
            .record_after_commit(
                principal,
                ActivityType::Delete,
                EntityKind::Comment,
                comment_id,
                RelatedIds {
                    project_id,
                    task_id: Some(comment.task_id),
                    ..Default::default()
                },
            )
            .await;

        Ok(())
    }

    /// Resolves the project a task belongs to, for audit references.
    async fn project_of(&self, task_id: Uuid) -> Result<Option<Uuid>, Error> {
        Ok(Task::find_by_id(&self.pool, task_id)
            .await?
            .map(|task| task.project_id))
    }
}

// Integration tests covering the author-only rule and audit records are in
// tests/service_tests.rs.
