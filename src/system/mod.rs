//! System abstraction for environment and filesystem operations
//!
//! This module provides a unified trait for all external system interactions,
//! allowing for easy testing with mock implementations. File access is async
//! so resolvers yield to the scheduler instead of blocking it.

use async_trait::async_trait;
use std::env::VarError;
use std::io;
use std::path::{Path, PathBuf};

pub mod mock;
pub mod real;

pub use mock::MockSystem;
pub use real::RealSystem;

/// Unified trait for system operations (environment + filesystem)
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::env`, `dirs` and `tokio::fs`
/// - `MockSystem`: Test implementation using in-memory storage
#[async_trait]
pub trait System: Send + Sync {
    // ==================== Environment Operations ====================

    /// Get an environment variable
    fn env_var(&self, key: &str) -> Result<String, VarError>;

    /// Get the current user's home directory
    fn home_dir(&self) -> Option<PathBuf>;

    /// Get the current working directory
    fn current_dir(&self) -> io::Result<PathBuf>;

    // ==================== Filesystem Operations ====================

    /// Check if a path exists
    async fn exists(&self, path: &Path) -> io::Result<bool>;

    /// Read entire file contents as a string
    async fn read_to_string(&self, path: &Path) -> io::Result<String>;
}
