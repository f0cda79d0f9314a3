//! Type definitions for the session provider
//!
//! This module contains the main data structures used for the login state
//! machine, the job-board client, and HTTP request/response shaping.

pub mod jobs;
pub mod response;
pub mod state;
pub mod wire;

pub use jobs::{GreetingReceipt, JobFilters, JobListPage, JobListing};
pub use response::{ErrorResponse, GreetingRequest, LoginStartResponse, PingResponse};
pub use state::{LoginState, LoginStep};
