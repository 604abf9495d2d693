//! Mock system implementation for testing

use super::System;
use async_trait::async_trait;
use std::collections::HashMap;
use std::env::VarError;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// In-memory implementation of System trait for testing
///
/// Files, environment and directories are fixed when the mock is built.
/// Every filesystem access is recorded so tests can assert which files were
/// touched, and reads of individual paths can be slowed down to force a
/// particular completion order between concurrent tasks.
///
/// # Example
/// ```
/// use shipit::system::{MockSystem, System};
/// use std::path::Path;
///
/// let system = MockSystem::new()
///     .with_env("SHIPIT_LOG", "debug")
///     .with_home_dir("/home/user")
///     .with_file("/home/user/.shipit/credentials", b"userId: u1\nsecretKey: s1\n");
///
/// assert_eq!(system.env_var("SHIPIT_LOG").unwrap(), "debug");
/// assert_eq!(system.home_dir().unwrap(), Path::new("/home/user"));
/// ```
#[derive(Clone)]
pub struct MockSystem {
    env_vars: HashMap<String, String>,
    home_dir: Option<PathBuf>,
    current_dir: PathBuf,
    files: HashMap<PathBuf, Vec<u8>>,
    read_delays: HashMap<PathBuf, Duration>,
    accessed: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockSystem {
    /// Create a new `MockSystem` with default state
    #[must_use]
    #[inline]
    pub fn new() -> Self {
        Self {
            env_vars: HashMap::new(),
            home_dir: None,
            current_dir: PathBuf::from("/"),
            files: HashMap::new(),
            read_delays: HashMap::new(),
            accessed: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Set an environment variable (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env_vars.insert(key.to_owned(), value.to_owned());
        self
    }

    /// Set the home directory (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_home_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.home_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Set the current working directory (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_current_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.current_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Add a file with contents (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_file<P: AsRef<Path>>(mut self, path: P, contents: &[u8]) -> Self {
        self.files.insert(path.as_ref().to_path_buf(), contents.to_vec());
        self
    }

    /// Delay every read of `path` by `delay` (builder pattern)
    #[must_use]
    #[inline]
    pub fn with_read_delay<P: AsRef<Path>>(mut self, path: P, delay: Duration) -> Self {
        self.read_delays.insert(path.as_ref().to_path_buf(), delay);
        self
    }

    /// Paths touched through `exists` or `read_to_string`, in access order
    #[must_use]
    pub fn accessed(&self) -> Vec<PathBuf> {
        self.accessed
            .lock()
            .map(|paths| paths.clone())
            .unwrap_or_default()
    }

    fn record(&self, path: &Path) -> io::Result<()> {
        self.accessed
            .lock()
            .map_err(|e| io::Error::other(e.to_string()))?
            .push(path.to_path_buf());
        Ok(())
    }
}

impl Default for MockSystem {
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl System for MockSystem {
    #[inline]
    fn env_var(&self, key: &str) -> Result<String, VarError> {
        self.env_vars.get(key).cloned().ok_or(VarError::NotPresent)
    }

    #[inline]
    fn home_dir(&self) -> Option<PathBuf> {
        self.home_dir.clone()
    }

    #[inline]
    fn current_dir(&self) -> io::Result<PathBuf> {
        Ok(self.current_dir.clone())
    }

    async fn exists(&self, path: &Path) -> io::Result<bool> {
        self.record(path)?;
        tokio::task::yield_now().await;
        Ok(self.files.contains_key(path))
    }

    async fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.record(path)?;
        if let Some(delay) = self.read_delays.get(path) {
            tokio::time::sleep(*delay).await;
        }

        let bytes = self.files.get(path).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("File not found: {}", path.display()),
            )
        })?;

        String::from_utf8(bytes.clone())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, format!("Invalid UTF-8: {e}")))
    }
}
