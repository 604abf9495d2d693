//! Operations module
//!
//! Initialization tasks, command dispatch and the process lifecycle

pub mod init;
pub mod invoke;
pub mod lifecycle;

pub use init::*;
pub use invoke::*;
pub use lifecycle::*;
