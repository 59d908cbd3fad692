//! markpack core library
//!
//! Shared pieces of the `markpack` binary:
//! - Exit codes for CLI operations
//! - Logging setup
//! - Payload rendering
//!
//! The binary entry point is in `main.rs`.

pub mod exit_codes;
pub mod logging;
pub mod output;
