//! Command-line interface module
//!
//! Handles argument parsing and turns parsed arguments into an invocation

pub mod args;
pub mod commands;

pub use args::*;
