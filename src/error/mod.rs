//! Error handling module
//!
//! Defines the error taxonomy with exit codes and the reporter that turns any
//! failure into a single logged report

pub mod report;
pub mod types;

pub use report::*;
pub use types::*;
