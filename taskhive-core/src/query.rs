/// Shared listing parameters
///
/// Every listing operation in the crate accepts a sort [`Order`] and a
/// clamped [`Page`]. Out-of-range values are normalized rather than
/// rejected: a limit above the maximum is clamped down, a non-positive
/// limit is clamped up to 1, and a negative offset becomes 0.

use serde::{Deserialize, Serialize};

/// Default page size when the caller does not ask for one
pub const DEFAULT_LIMIT: i64 = 20;

/// Hard ceiling on page size
pub const MAX_LIMIT: i64 = 100;

/// Sort direction for `created_at` orderings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Oldest first
    #[default]
    Asc,

    /// Newest first
    Desc,
}

impl Order {
    /// SQL keyword for this direction
    pub fn as_sql(&self) -> &'static str {
        match self {
            Order::Asc => "ASC",
            Order::Desc => "DESC",
        }
    }
}

/// A normalized limit/offset pair.
///
/// Construct through [`Page::new`] so the bounds always hold; the fields are
/// private for that reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    limit: i64,
    offset: i64,
}

impl Page {
    /// Builds a page, clamping the inputs into range.
    ///
    /// The limit is clamped to `1..=100` and the offset to `0..`.
    pub fn new(limit: i64, offset: i64) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            offset: offset.max(0),
        }
    }

    /// Maximum number of rows to return
    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Number of rows to skip
    pub fn offset(&self) -> i64 {
        self.offset
    }
}

impl Default for Page {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
            offset: 0,
        }
    }
}

/// Raw listing parameters as they arrive from a caller.
///
/// All fields are optional; [`PageParams::order`] and [`PageParams::page`]
/// resolve them to normalized values.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParams {
    /// Sort direction, oldest first when absent
    pub order: Option<Order>,

    /// Requested page size
    pub limit: Option<i64>,

    /// Requested offset
    pub offset: Option<i64>,
}

impl PageParams {
    /// Resolves the sort direction
    pub fn order(&self) -> Order {
        self.order.unwrap_or_default()
    }

    /// Resolves and clamps the page bounds
    pub fn page(&self) -> Page {
        match (self.limit, self.offset) {
            (None, None) => Page::default(),
            (limit, offset) => Page::new(
                limit.unwrap_or(DEFAULT_LIMIT),
                offset.unwrap_or(0),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_defaults_to_asc() {
        assert_eq!(Order::default(), Order::Asc);
    }

    #[test]
    fn test_order_as_sql() {
        assert_eq!(Order::Asc.as_sql(), "ASC");
        assert_eq!(Order::Desc.as_sql(), "DESC");
    }

    #[test]
    fn test_order_deserializes_lowercase() {
        let order: Order = serde_json::from_str("\"desc\"").unwrap();
        assert_eq!(order, Order::Desc);
        let order: Order = serde_json::from_str("\"asc\"").unwrap();
        assert_eq!(order, Order::Asc);
    }

    #[test]
    fn test_page_default() {
        let page = Page::default();
        assert_eq!(page.limit(), DEFAULT_LIMIT);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_clamps_limit_above_max() {
        let page = Page::new(5000, 0);
        assert_eq!(page.limit(), MAX_LIMIT);
    }

    #[test]
    fn test_page_clamps_limit_below_one() {
        assert_eq!(Page::new(0, 0).limit(), 1);
        assert_eq!(Page::new(-7, 0).limit(), 1);
    }

    #[test]
    fn test_page_clamps_negative_offset() {
        let page = Page::new(10, -3);
        assert_eq!(page.offset(), 0);
    }

    #[test]
    fn test_page_keeps_in_range_values() {
        let page = Page::new(42, 84);
        assert_eq!(page.limit(), 42);
        assert_eq!(page.offset(), 84);
    }

    #[test]
    fn test_params_resolve_defaults() {
        let params = PageParams::default();
        assert_eq!(params.order(), Order::Asc);
        assert_eq!(params.page(), Page::default());
    }

    #[test]
    fn test_params_clamp_partial_input() {
        let params = PageParams {
            order: Some(Order::Desc),
            limit: Some(500),
            offset: None,
        };
        assert_eq!(params.order(), Order::Desc);
        assert_eq!(params.page().limit(), MAX_LIMIT);
        assert_eq!(params.page().offset(), 0);
    }
}
