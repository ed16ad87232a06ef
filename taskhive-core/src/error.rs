/// Error types for services and access decisions
///
/// Outcomes are collapsed deliberately: when a caller may not see a resource,
/// services return [`Error::NotFound`] whether the row is missing or access
/// was denied, so existence does not leak through the error. Only
/// administrator-gated listings return [`Error::Forbidden`], where the
/// collection itself is no secret.
///
/// Database errors from mutations are classified on conversion: unique
/// violations become [`Error::Conflict`] and foreign-key violations become
/// [`Error::Validation`], keyed off the constraint name. Everything else is
/// passed through as [`Error::Store`].

use thiserror::Error;

use crate::models::activity::EntityKind;

/// Unified error type for all service operations.
#[derive(Debug, Error)]
pub enum Error {
    /// The resource does not exist, or the caller may not see it
    #[error("{} not found", .0.label())]
    NotFound(EntityKind),

    /// The caller is authenticated but not allowed to do this
    #[error("{0}")]
    Forbidden(String),

    /// The mutation collides with existing state, e.g. a duplicate title
    #[error("{0}")]
    Conflict(String),

    /// The input is malformed or references something unusable
    #[error("{0}")]
    Validation(String),

    /// The underlying store failed
    #[error("database error: {0}")]
    Store(sqlx::Error),

    /// The mutation succeeded but its audit record could not be appended
    #[error("audit append failed: {0}")]
    Audit(sqlx::Error),
}

impl Error {
    /// Stable machine-readable tag, used in HTTP responses and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Error::NotFound(_) => "not_found",
            Error::Forbidden(_) => "forbidden",
            Error::Conflict(_) => "conflict",
            Error::Validation(_) => "validation",
            Error::Store(_) => "store",
            Error::Audit(_) => "audit",
        }
    }
}

/// Maps a unique-constraint name to a user-facing conflict message.
fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_user_team_title" => "a team with this title already exists".to_string(),
        "uq_user_project_title" => "a project with this title already exists".to_string(),
        "uq_user_task_title" => "a task with this title already exists".to_string(),
        "uq_team_member" => "this user is already a member of the team".to_string(),
        other => format!("duplicate value violates {other}"),
    }
}

/// Maps a foreign-key-constraint name to a user-facing validation message.
fn reference_message(constraint: &str) -> String {
    match constraint {
        "projects_team_id_fkey" => "the referenced team does not exist".to_string(),
        "tasks_project_id_fkey" => "the referenced project does not exist".to_string(),
        "tasks_assigned_id_fkey" => "the assigned user does not exist".to_string(),
        "task_comments_task_id_fkey" => "the referenced task does not exist".to_string(),
        "team_members_team_id_fkey" => "the referenced team does not exist".to_string(),
        "team_members_user_id_fkey" => "the referenced user does not exist".to_string(),
        other => format!("invalid reference violates {other}"),
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                let constraint = db_err.constraint().unwrap_or_default();
                return Error::Conflict(conflict_message(constraint));
            }
            if db_err.is_foreign_key_violation() {
                let constraint = db_err.constraint().unwrap_or_default();
                return Error::Validation(reference_message(constraint));
            }
        }
        Error::Store(err)
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errs: validator::ValidationErrors) -> Self {
        Error::Validation(errs.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message_uses_entity_label() {
        let err = Error::NotFound(EntityKind::Project);
        assert_eq!(err.to_string(), "Project not found");

        let err = Error::NotFound(EntityKind::TeamMember);
        assert_eq!(err.to_string(), "Team member not found");
    }

    #[test]
    fn test_error_kinds_are_stable() {
        assert_eq!(Error::NotFound(EntityKind::Task).kind(), "not_found");
        assert_eq!(Error::Forbidden("no".into()).kind(), "forbidden");
        assert_eq!(Error::Conflict("dup".into()).kind(), "conflict");
        assert_eq!(Error::Validation("bad".into()).kind(), "validation");
        assert_eq!(Error::Store(sqlx::Error::PoolClosed).kind(), "store");
        assert_eq!(Error::Audit(sqlx::Error::PoolClosed).kind(), "audit");
    }

    #[test]
    fn test_known_conflict_constraints() {
        assert_eq!(
            conflict_message("uq_user_project_title"),
            "a project with this title already exists"
        );
        assert_eq!(
            conflict_message("uq_team_member"),
            "this user is already a member of the team"
        );
    }

    #[test]
    fn test_unknown_conflict_constraint_keeps_name() {
        assert_eq!(
            conflict_message("uq_something_else"),
            "duplicate value violates uq_something_else"
        );
    }

    #[test]
    fn test_known_reference_constraints() {
        assert_eq!(
            reference_message("tasks_assigned_id_fkey"),
            "the assigned user does not exist"
        );
        assert_eq!(
            reference_message("projects_team_id_fkey"),
            "the referenced team does not exist"
        );
    }

    #[test]
    fn test_plain_db_error_stays_store() {
        let err: Error = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, Error::Store(_)));
    }

    #[test]
    fn test_validation_errors_convert() {
        use validator::Validate;

        #[derive(Validate)]
        struct Input {
            #[validate(length(min = 1, max = 4))]
            title: String,
        }

        let input = Input {
            title: "too long for the field".to_string(),
        };
        let err: Error = input.validate().unwrap_err().into();
        assert_eq!(err.kind(), "validation");
    }
}
