//! Distributed flow submission
//!
//! This module provides the driver side of the Driver-Agent model: the
//! option builder a program uses to describe its flow, and the runner that
//! serves the flow's files to agents.

pub mod driver;
pub mod option;

pub use driver::*;
pub use option::*;
