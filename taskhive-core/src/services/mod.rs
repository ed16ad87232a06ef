/// Service layer: authorization, validation, mutation, audit
///
/// Every operation the crate exposes goes through a service. Services run
/// the same sequence for each mutation: authorize the principal, validate
/// the input, apply the change, then append an audit record through
/// [`crate::audit::AuditRecorder`]. Reads stop after the authorization
/// step.
///
/// Services never roll a committed mutation back because its audit append
/// failed; see the audit module for how that failure is reported.

use crate::error::Error;

pub mod activity;
pub mod comment;
pub mod member;
pub mod project;
pub mod task;
pub mod team;

pub use activity::ActivityService;
pub use comment::CommentService;
pub use member::TeamMemberService;
pub use project::ProjectService;
pub use task::TaskService;
pub use team::TeamService;

/// Validates the text of a clear-able patch field.
///
/// `None` leaves the field alone and `Some(None)` clears it; both pass.
/// `Some(Some(text))` must stay within `1..=max` characters.
pub(crate) fn check_patch_text(
    field: &'static str,
    patch: &Option<Option<String>>,
    max: usize,
) -> Result<(), Error> {
    if let Some(Some(text)) = patch {
        if text.is_empty() || text.chars().count() > max {
            return Err(Error::Validation(format!(
                "{field} must be between 1 and {max} characters"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_patch_text_accepts_absent_and_clear() {
        assert!(check_patch_text("description", &None, 320).is_ok());
        assert!(check_patch_text("description", &Some(None), 320).is_ok());
    }

    #[test]
    fn test_check_patch_text_bounds() {
        let ok = Some(Some("within bounds".to_string()));
        assert!(check_patch_text("description", &ok, 320).is_ok());

        let empty = Some(Some(String::new()));
        assert!(check_patch_text("description", &empty, 320).is_err());

        let long = Some(Some("x".repeat(321)));
        let err = check_patch_text("description", &long, 320).unwrap_err();
        assert!(err.to_string().contains("description"));
    }
}
