//! Common utilities shared by the ferry crates.
//!
//! This crate provides the shared error type and path helpers used when
//! assembling the set of files a driver distributes to its agents.

pub mod error;
pub mod paths;

pub use error::{CommonError, ErrorCategory, Result};
pub use paths::{normalize, relativize, relativize_to_cwd};
