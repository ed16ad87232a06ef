/// API route handlers
///
/// This module contains all route handlers organized by resource:
///
/// - `health`: Health check endpoint
/// - `projects`: Project service endpoints
/// - `tasks`: Task service endpoints
/// - `comments`: Comment service endpoints
/// - `teams`: Team service endpoints
/// - `members`: Team membership endpoints
/// - `activities`: Activity trail endpoints
///
/// Handlers are thin: deserialize, call the service as the request's
/// principal, map the result. Out-of-range paging is clamped by the core's
/// query layer, not rejected here.

use serde::Deserialize;
use uuid::Uuid;

use taskhive_core::query::{Order, Page, PageParams};

pub mod activities;
pub mod comments;
pub mod health;
pub mod members;
pub mod projects;
pub mod tasks;
pub mod teams;

/// Common query parameters for list endpoints.
///
/// `user_id` is the owner override honored only for platform
/// administrators; the services ignore it for everyone else or reject it
/// where an explicit target is mandatory.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ListParams {
    /// Sort direction on creation time, oldest first when absent
    pub order: Option<Order>,

    /// Requested page size, clamped to 1..=100
    pub limit: Option<i64>,

    /// Requested offset, clamped to 0..
    pub offset: Option<i64>,

    /// Owner override for platform administrators
    pub user_id: Option<Uuid>,
}

impl ListParams {
    /// Resolves the sort direction
    pub fn order(&self) -> Order {
        self.order.unwrap_or_default()
    }

    /// Resolves and clamps the page bounds
    pub fn page(&self) -> Page {
        PageParams {
            order: self.order,
            limit: self.limit,
            offset: self.offset,
        }
        .page()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_defaults() {
        let params = ListParams::default();
        assert_eq!(params.order(), Order::Asc);
        assert_eq!(params.page(), Page::default());
        assert!(params.user_id.is_none());
    }

    #[test]
    fn test_list_params_clamp() {
        let params = ListParams {
            order: Some(Order::Desc),
            limit: Some(0),
            offset: Some(-5),
            user_id: None,
        };
        assert_eq!(params.order(), Order::Desc);
        assert_eq!(params.page().limit(), 1);
        assert_eq!(params.page().offset(), 0);
    }
}
