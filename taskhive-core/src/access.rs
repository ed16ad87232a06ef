/// Access decisions for every resource kind
///
/// All authorization in the crate funnels through this module. Services call
/// one of the `authorize_*` functions before touching a resource; each
/// fetches the row, applies the decision rules, and collapses both "missing"
/// and "denied" into [`Error::NotFound`] so a caller cannot probe for the
/// existence of resources it may not see.
///
/// # Decision rules
///
/// - **Project**: the owner and platform administrators may do everything.
///   Members of the project's team may read, never write.
/// - **Task**: the creator may do everything; the assignee may read and
///   update but not delete. Nobody else, including platform administrators,
///   sees a task.
/// - **Team** and **team member**: the team owner and platform
///   administrators only, for every action.
/// - **Comment**: the author only.
///
/// A platform administrator is a user carrying both the admin role and the
/// superuser flag; either alone grants nothing.
///
/// Ownership is checked before the team-membership fallback, so the
/// membership probe only runs for non-owners asking to read.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::Error;
use crate::models::activity::EntityKind;
use crate::models::comment::TaskComment;
use crate::models::member::TeamMember;
use crate::models::project::Project;
use crate::models::task::Task;
use crate::models::team::Team;
use crate::models::user::{User, UserRole};

/// The authenticated identity a request acts as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Acting user
    pub user_id: Uuid,

    /// Platform role
    pub role: UserRole,

    /// Superuser flag
    pub is_superuser: bool,
}

impl Principal {
    /// Checks whether this principal is a platform administrator.
    ///
    /// Requires both the admin role and the superuser flag.
    pub fn is_platform_admin(&self) -> bool {
        self.is_superuser && self.role == UserRole::Admin
    }
}

impl From<&User> for Principal {
    fn from(user: &User) -> Self {
        Principal {
            user_id: user.id,
            role: user.role,
            is_superuser: user.is_superuser,
        }
    }
}

/// What the principal wants to do with a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Update,
    Delete,
}

/// Decides project access from already-fetched state.
///
/// `is_team_member` is the result of the membership probe for the project's
/// team; pass false when the project has no team or the probe was skipped.
pub fn project_permits(
    principal: &Principal,
    owner_id: Uuid,
    is_team_member: bool,
    action: Action,
) -> bool {
    if principal.user_id == owner_id || principal.is_platform_admin() {
        return true;
    }
    match action {
        Action::Read => is_team_member,
        Action::Update | Action::Delete => false,
    }
}

/// Decides task access from already-fetched state.
///
/// The creator may do everything; the assignee may read and update. There
/// is no administrator override for tasks.
pub fn task_permits(
    principal: &Principal,
    creator_id: Uuid,
    assigned_id: Option<Uuid>,
    action: Action,
) -> bool {
    if principal.user_id == creator_id {
        return true;
    }
    if assigned_id == Some(principal.user_id) {
        return matches!(action, Action::Read | Action::Update);
    }
    false
}

/// Decides team and team-member access: the owner and platform
/// administrators, for every action.
pub fn team_permits(principal: &Principal, owner_id: Uuid) -> bool {
    principal.user_id == owner_id || principal.is_platform_admin()
}

/// Decides comment access: the author only.
pub fn comment_permits(principal: &Principal, author_id: Uuid) -> bool {
    principal.user_id == author_id
}

/// Fetches a project and authorizes `action` on it.
///
/// The membership probe runs only when a non-owner asks to read a project
/// that is attached to a team.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the project does not exist or the
/// principal may not perform `action` on it, [`Error::Store`] when the
/// database fails.
pub async fn authorize_project(
    pool: &PgPool,
    principal: &Principal,
    project_id: Uuid,
    action: Action,
) -> Result<Project, Error> {
    let project = Project::find_by_id(pool, project_id)
        .await?
        .ok_or(Error::NotFound(EntityKind::Project))?;

    if project.user_id == principal.user_id || principal.is_platform_admin() {
        return Ok(project);
    }

    if action == Action::Read {
        if let Some(team_id) = project.team_id {
            if TeamMember::is_member(pool, team_id, principal.user_id).await? {
                return Ok(project);
            }
        }
    }

    Err(Error::NotFound(EntityKind::Project))
}

/// Fetches a task and authorizes `action` on it.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the task does not exist or the
/// principal is neither its creator nor, for read and update, its assignee.
pub async fn authorize_task(
    pool: &PgPool,
    principal: &Principal,
    task_id: Uuid,
    action: Action,
) -> Result<Task, Error> {
    let task = Task::find_by_id(pool, task_id)
        .await?
        .ok_or(Error::NotFound(EntityKind::Task))?;

    if task_permits(principal, task.user_id, task.assigned_id, action) {
        Ok(task)
    } else {
        Err(Error::NotFound(EntityKind::Task))
    }
}

/// Fetches a team and authorizes access to it.
///
/// Teams have a single rule for every action, so no [`Action`] is taken.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the team does not exist or the
/// principal neither owns it nor is a platform administrator.
pub async fn authorize_team(
    pool: &PgPool,
    principal: &Principal,
    team_id: Uuid,
) -> Result<Team, Error> {
    let team = Team::find_by_id(pool, team_id)
        .await?
        .ok_or(Error::NotFound(EntityKind::Team))?;

    if team_permits(principal, team.user_id) {
        Ok(team)
    } else {
        Err(Error::NotFound(EntityKind::Team))
    }
}

/// Fetches a membership row and authorizes access through its team.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the membership (or its team) does not
/// exist or the principal does not control the team.
pub async fn authorize_member(
    pool: &PgPool,
    principal: &Principal,
    member_id: Uuid,
) -> Result<TeamMember, Error> {
    let member = TeamMember::find_by_id(pool, member_id)
        .await?
        .ok_or(Error::NotFound(EntityKind::TeamMember))?;

    let team = Team::find_by_id(pool, member.team_id)
        .await?
        .ok_or(Error::NotFound(EntityKind::TeamMember))?;

    if team_permits(principal, team.user_id) {
        Ok(member)
    } else {
        Err(Error::NotFound(EntityKind::TeamMember))
    }
}

/// Fetches a comment and authorizes access to it.
///
/// # Errors
///
/// Returns [`Error::NotFound`] when the comment does not exist or the
/// principal is not its author.
pub async fn authorize_comment(
    pool: &PgPool,
    principal: &Principal,
    comment_id: Uuid,
) -> Result<TaskComment, Error> {
    let comment = TaskComment::find_by_id(pool, comment_id)
        .await?
        .ok_or(Error::NotFound(EntityKind::Comment))?;

    if comment_permits(principal, comment.user_id) {
        Ok(comment)
    } else {
        Err(Error::NotFound(EntityKind::Comment))
    }
}

/// Requires the principal to be a platform administrator.
///
/// Used to gate system-wide listings, where denial is reported as
/// [`Error::Forbidden`] rather than a collapsed not-found: the existence of
/// the collection is no secret.
pub fn require_platform_admin(principal: &Principal) -> Result<(), Error> {
    if principal.is_platform_admin() {
        Ok(())
    } else {
        Err(Error::Forbidden(
            "administrator access is required for this operation".to_string(),
        ))
    }
}

/// Resolves which user's resources an owner-scoped listing covers.
///
/// Ordinary principals always get their own scope; a `requested` id from
/// them is ignored. Platform administrators query on behalf of a user and
/// must name one.
///
/// # Errors
///
/// Returns [`Error::Validation`] when a platform administrator omits the
/// user id.
pub fn resolve_owner_scope(
    principal: &Principal,
    requested: Option<Uuid>,
) -> Result<Uuid, Error> {
    if principal.is_platform_admin() {
        requested.ok_or_else(|| {
            Error::Validation(
                "administrator queries must name the user whose resources to list".to_string(),
            )
        })
    } else {
        Ok(principal.user_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member_principal() -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            role: UserRole::Member,
            is_superuser: false,
        }
    }

    fn platform_admin() -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            role: UserRole::Admin,
            is_superuser: true,
        }
    }

    #[test]
    fn test_platform_admin_requires_both_flags() {
        assert!(platform_admin().is_platform_admin());

        let role_only = Principal {
            user_id: Uuid::new_v4(),
            role: UserRole::Admin,
            is_superuser: false,
        };
        assert!(!role_only.is_platform_admin());

        let flag_only = Principal {
            user_id: Uuid::new_v4(),
            role: UserRole::Member,
            is_superuser: true,
        };
        assert!(!flag_only.is_platform_admin());
    }

    #[test]
    fn test_project_owner_has_full_access() {
        let principal = member_principal();
        for action in [Action::Read, Action::Update, Action::Delete] {
            assert!(project_permits(&principal, principal.user_id, false, action));
        }
    }

    #[test]
    fn test_project_admin_override() {
        let admin = platform_admin();
        let owner = Uuid::new_v4();
        for action in [Action::Read, Action::Update, Action::Delete] {
            assert!(project_permits(&admin, owner, false, action));
        }
    }

    #[test]
    fn test_project_member_is_read_only() {
        let principal = member_principal();
        let owner = Uuid::new_v4();
        assert!(project_permits(&principal, owner, true, Action::Read));
        assert!(!project_permits(&principal, owner, true, Action::Update));
        assert!(!project_permits(&principal, owner, true, Action::Delete));
    }

    #[test]
    fn test_project_stranger_sees_nothing() {
        let principal = member_principal();
        let owner = Uuid::new_v4();
        for action in [Action::Read, Action::Update, Action::Delete] {
            assert!(!project_permits(&principal, owner, false, action));
        }
    }

    #[test]
    fn test_project_partial_admin_flags_grant_nothing() {
        let role_only = Principal {
            user_id: Uuid::new_v4(),
            role: UserRole::Admin,
            is_superuser: false,
        };
        let owner = Uuid::new_v4();
        assert!(!project_permits(&role_only, owner, false, Action::Update));

        let flag_only = Principal {
            user_id: Uuid::new_v4(),
            role: UserRole::Member,
            is_superuser: true,
        };
        assert!(!project_permits(&flag_only, owner, false, Action::Update));
    }

    #[test]
    fn test_task_creator_has_full_access() {
        let principal = member_principal();
        for action in [Action::Read, Action::Update, Action::Delete] {
            assert!(task_permits(&principal, principal.user_id, None, action));
        }
    }

    #[test]
    fn test_task_assignee_cannot_delete() {
        let principal = member_principal();
        let creator = Uuid::new_v4();
        let assigned = Some(principal.user_id);
        assert!(task_permits(&principal, creator, assigned, Action::Read));
        assert!(task_permits(&principal, creator, assigned, Action::Update));
        assert!(!task_permits(&principal, creator, assigned, Action::Delete));
    }

    #[test]
    fn test_task_has_no_admin_override() {
        let admin = platform_admin();
        let creator = Uuid::new_v4();
        for action in [Action::Read, Action::Update, Action::Delete] {
            assert!(!task_permits(&admin, creator, None, action));
        }
    }

    #[test]
    fn test_task_stranger_sees_nothing() {
        let principal = member_principal();
        let creator = Uuid::new_v4();
        let assigned = Some(Uuid::new_v4());
        for action in [Action::Read, Action::Update, Action::Delete] {
            assert!(!task_permits(&principal, creator, assigned, action));
        }
    }

    #[test]
    fn test_team_owner_and_admin_only() {
        let owner = member_principal();
        assert!(team_permits(&owner, owner.user_id));

        let admin = platform_admin();
        assert!(team_permits(&admin, Uuid::new_v4()));

        let stranger = member_principal();
        assert!(!team_permits(&stranger, Uuid::new_v4()));
    }

    #[test]
    fn test_comment_author_only() {
        let author = member_principal();
        assert!(comment_permits(&author, author.user_id));

        let admin = platform_admin();
        assert!(!comment_permits(&admin, Uuid::new_v4()));
    }

    #[test]
    fn test_require_platform_admin() {
        assert!(require_platform_admin(&platform_admin()).is_ok());

        let err = require_platform_admin(&member_principal()).unwrap_err();
        assert!(matches!(err, Error::Forbidden(_)));
    }

    #[test]
    fn test_resolve_owner_scope_for_ordinary_principal() {
        let principal = member_principal();
        let scope = resolve_owner_scope(&principal, None).unwrap();
        assert_eq!(scope, principal.user_id);

        // A requested id from a non-administrator is ignored.
        let other = Uuid::new_v4();
        let scope = resolve_owner_scope(&principal, Some(other)).unwrap();
        assert_eq!(scope, principal.user_id);
    }

    #[test]
    fn test_resolve_owner_scope_for_admin() {
        let admin = platform_admin();
        let target = Uuid::new_v4();
        assert_eq!(resolve_owner_scope(&admin, Some(target)).unwrap(), target);

        let err = resolve_owner_scope(&admin, None).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }
}
