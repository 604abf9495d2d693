//! Initialization tasks run before a command
//!
//! A command declares which pieces of context it needs. The declared tasks
//! run concurrently and the first failure wins.

use crate::config::context::GlobalFlags;
use crate::config::credentials::{Credentials, resolve_credentials};
use crate::config::project::{ProjectConfig, resolve_project_config};
use crate::system::System;
use anyhow::Result;
use std::fmt;
use tracing::debug;

/// What a command needs resolved before it can run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirements {
    pub credentials: bool,
    pub project_config: bool,
}

impl Requirements {
    /// No initialization at all
    pub const NONE: Self = Self {
        credentials: false,
        project_config: false,
    };

    /// Credentials only
    pub const CREDENTIALS: Self = Self {
        credentials: true,
        project_config: false,
    };

    /// Credentials and project configuration
    pub const PROJECT: Self = Self {
        credentials: true,
        project_config: true,
    };
}

impl Default for Requirements {
    fn default() -> Self {
        Self::CREDENTIALS
    }
}

/// A single initialization task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitTask {
    Credentials,
    ProjectConfig,
}

impl InitTask {
    /// Name of the task, matching the context field it populates
    #[must_use]
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Credentials => "credentials",
            Self::ProjectConfig => "projectConfig",
        }
    }
}

impl fmt::Display for InitTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of tasks to run for one invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InitTaskSpec {
    credentials: bool,
    project_config: bool,
}

impl InitTaskSpec {
    /// Decide which tasks run
    ///
    /// The credentials task is skipped when both the user id and the secret
    /// key were given on the command line.
    #[must_use]
    pub fn new(requirements: Requirements, flags: &GlobalFlags) -> Self {
        Self {
            credentials: requirements.credentials && flags.explicit_credentials().is_none(),
            project_config: requirements.project_config,
        }
    }

    /// Declared tasks
    #[must_use]
    pub fn tasks(&self) -> Vec<InitTask> {
        let mut tasks = Vec::with_capacity(2);
        if self.credentials {
            tasks.push(InitTask::Credentials);
        }
        if self.project_config {
            tasks.push(InitTask::ProjectConfig);
        }
        tasks
    }

    /// Whether any task is declared
    #[must_use]
    #[inline]
    pub const fn is_empty(&self) -> bool {
        !self.credentials && !self.project_config
    }
}

/// Resolved values, keyed by task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitResults {
    pub credentials: Option<Credentials>,
    pub project_config: Option<ProjectConfig>,
}

/// Run the declared tasks concurrently
///
/// Fails fast: the first error observed is returned and the other task is
/// dropped, whatever its outcome would have been.
///
/// # Errors
///
/// Returns the first error raised by any declared task
pub async fn run_init_tasks(
    spec: &InitTaskSpec,
    system: &dyn System,
    app_id_override: Option<&str>,
) -> Result<InitResults> {
    if spec.is_empty() {
        debug!("No initialization tasks declared");
        return Ok(InitResults::default());
    }

    debug!(tasks = ?spec.tasks(), "Running initialization tasks");

    let credentials = async {
        if spec.credentials {
            resolve_credentials(system).await.map(Some)
        } else {
            Ok(None)
        }
    };
    let project_config = async {
        if spec.project_config {
            resolve_project_config(system, app_id_override)
                .await
                .map(Some)
        } else {
            Ok(None)
        }
    };

    let (credentials, project_config) = tokio::try_join!(credentials, project_config)?;

    Ok(InitResults {
        credentials,
        project_config,
    })
}
