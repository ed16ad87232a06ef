//! # TaskHive API Server Library
//!
//! Thin HTTP surface over `taskhive-core`: handlers map 1:1 to service
//! operations and never carry business rules of their own.
//!
//! ## Modules
//!
//! - `app`: Application state and router builder
//! - `auth`: Bearer-token validation and the principal middleware
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod auth;
pub mod config;
pub mod error;
pub mod routes;
