//! # TaskHive Core Library
//!
//! This crate contains the domain model, authorization rules, and audit
//! trail behind the TaskHive API server.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `access`: Principals and resource access decisions
//! - `services`: Authorized operations over the models
//! - `audit`: Activity trail recording
//! - `query`: Ordering and pagination primitives
//! - `db`: Connection pool and migrations
//! - `error`: Common error types

pub mod access;
pub mod audit;
pub mod db;
pub mod error;
pub mod models;
pub mod query;
pub mod services;

/// Current version of the TaskHive core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
