//! GraphSON CLI Library
//!
//! Command implementations, exposed for programmatic use and testing.

pub mod commands;
pub mod logging;

pub use commands::*;
