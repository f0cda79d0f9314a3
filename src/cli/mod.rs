//! Command-line interface logic
//!
//! Shared logic for the server binary; the one-shot login binary drives
//! the session machinery directly.

pub mod server;

pub use server::{ServerArgs, parse_and_bind_address, run_server_mode};
