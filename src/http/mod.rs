//! HTTP server module for the films backend.
//!
//! Provides an axum-based REST API over the repository layer. Each request
//! is a short linear pipeline: validate the route parameters and payload
//! shape, confirm the parent film exists on nested routes, run a single
//! repository operation, then map rows into wire documents.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod validation;

pub use router::create_router;
pub use state::AppState;
