//! Repository layer for accepted lines.
//!
//! # Responsibility
//! - Define the storage contract the ingest and publish services rely on.
//! - Keep SQL details out of the services.
//!
//! # Invariants
//! - Repository writes enforce `LineRecord::validate()` before persistence.
//! - Duplicate inserts are reported, never raised as errors.

pub mod line_repo;

pub use line_repo::{LineRepository, RepoError, RepoResult, SqliteLineRepository};
