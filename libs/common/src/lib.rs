//! Shared infrastructure for the studio API
//!
//! This crate provides the PostgreSQL connection pool, configuration,
//! and error types used by the API service.

pub mod database;
pub mod error;
