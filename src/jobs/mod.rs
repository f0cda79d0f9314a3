//! Job listing and greeting client
//!
//! Authenticated calls made after a successful login: fetching the
//! recommended job feed and sending a greeting to a job's poster.

pub mod client;
pub mod filters;

pub use client::JobsClient;
pub use filters::{experience_code, job_type_code, salary_code};
