//! # VisaPass Shared Library
//!
//! This crate contains the data model, persistence layer and authorization
//! primitives shared by the VisaPass API server and its clients.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures (users, countries, applications)
//! - `db`: Connection pooling and migrations
//! - `auth`: Identity tokens, the request principal and the status gate

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the VisaPass shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
