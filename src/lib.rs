//! # Films REST API
//!
//! Backend for a film/review catalogue. Films own zero or more reviews;
//! deleting a film cascades to its reviews. The crate exposes the resource
//! API over HTTP via axum and keeps all entity state in the storage backend,
//! never in process memory.
//!
//! ## Architecture
//!
//! - [`db`]: repository traits, storage backends, and persistence models
//! - [`http`]: axum-based HTTP server, validation, and response mapping
//!
//! Storage backends are selected by feature flag: `local-repo` provides an
//! in-memory repository for tests and local development, `postgres-repo` a
//! Diesel/Postgres repository for production.

// Allow large error types - RepositoryError carries rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;

#[cfg(feature = "http-server")]
pub mod http;
