/// Database models
///
/// This module contains all database models and their CRUD operations.
/// Models speak raw `sqlx::Error`; classification into domain errors happens
/// one layer up, in the services.
///
/// # Models
///
/// - `user`: User accounts and platform roles
/// - `team`: User-owned team groupings
/// - `member`: Team memberships
/// - `project`: Projects, optionally shared with a team
/// - `task`: Tasks within a project
/// - `comment`: Comments on tasks
/// - `activity`: The append-only audit trail
///
/// # Example
///
/// ```no_run
/// use taskhive_core::models::team::{Team, CreateTeam};
/// use taskhive_core::db::pool::{create_pool, DatabaseConfig};
/// use uuid::Uuid;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
///
/// let team = Team::create(&pool, Uuid::new_v4(), &CreateTeam {
///     title: "backend".to_string(),
/// }).await?;
/// # Ok(())
/// # }
/// ```

use serde::{Deserialize, Deserializer};

pub mod activity;
pub mod comment;
pub mod member;
pub mod project;
pub mod task;
pub mod team;
pub mod user;

/// Deserializes a patch field that distinguishes "absent" from "null".
///
/// A missing field stays `None` (leave unchanged), an explicit `null` becomes
/// `Some(None)` (clear the column), and a value becomes `Some(Some(value))`.
/// Use together with `#[serde(default)]`.
pub(crate) fn double_option<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(de).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "double_option")]
        team_id: Option<Option<Uuid>>,
    }

    #[test]
    fn test_double_option_missing_field() {
        let patch: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(patch.team_id, None);
    }

    #[test]
    fn test_double_option_explicit_null() {
        let patch: Patch = serde_json::from_str(r#"{"team_id":null}"#).unwrap();
        assert_eq!(patch.team_id, Some(None));
    }

    #[test]
    fn test_double_option_value() {
        let id = Uuid::new_v4();
        let json = format!(r#"{{"team_id":"{id}"}}"#);
        let patch: Patch = serde_json::from_str(&json).unwrap();
        assert_eq!(patch.team_id, Some(Some(id)));
    }
}
