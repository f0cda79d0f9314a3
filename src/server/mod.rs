//! HTTP server module
//!
//! Axum application exposing the login flow and job-board operations.

pub mod app;
pub mod handlers;

pub use app::{create_app, AppState};
