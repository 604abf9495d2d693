//! Execution context handed to command implementations
//!
//! A `Context` is created fresh for each invocation from the parsed
//! arguments, enriched once with the results of the initialization tasks,
//! and then moved into the command implementation.

use crate::config::credentials::Credentials;
use crate::config::project::ProjectConfig;
use crate::operations::init::InitResults;
use tracing::debug;

/// Flags accepted by every command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalFlags {
    pub debug: bool,
    pub dev: bool,
    pub offline: bool,
    pub port: Option<u16>,
    pub user_id: Option<String>,
    pub secret_key: Option<String>,
    /// Explicit app id; wins over the one stored in the manifest
    pub app_id: Option<String>,
}

impl GlobalFlags {
    /// Credentials given on the command line, when both parts are present and not blank
    #[must_use]
    pub fn explicit_credentials(&self) -> Option<Credentials> {
        match (self.user_id.as_deref(), self.secret_key.as_deref()) {
            (Some(user_id), Some(secret_key))
                if !user_id.trim().is_empty() && !secret_key.trim().is_empty() =>
            {
                Some(Credentials {
                    user_id: user_id.to_owned(),
                    secret_key: secret_key.to_owned(),
                })
            }
            _ => None,
        }
    }
}

/// Flags specific to one command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CommandFlags {
    #[default]
    Login,
    CreateApp {
        github_repo: Option<String>,
        github_branch: Option<String>,
    },
    BindApp,
    Serve {
        open: bool,
        release: bool,
        simulator: bool,
    },
    Deploy {
        unattended: bool,
        version_name: Option<String>,
        message: Option<String>,
        force: bool,
    },
}

/// Everything a command implementation gets to work with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Context {
    pub global: GlobalFlags,
    pub flags: CommandFlags,
    pub credentials: Option<Credentials>,
    pub project_config: Option<ProjectConfig>,
}

impl Context {
    /// Create a context from parsed flags
    ///
    /// Credentials passed explicitly on the command line are populated right
    /// away; the credentials file is not consulted for them.
    #[must_use]
    pub fn new(global: GlobalFlags, flags: CommandFlags) -> Self {
        let credentials = global.explicit_credentials();
        Self {
            global,
            flags,
            credentials,
            project_config: None,
        }
    }

    /// Merge the results of the initialization tasks
    ///
    /// Each resolved value is assigned to the field of the same name, so the
    /// result does not depend on which task finished first.
    pub fn merge(&mut self, results: InitResults) {
        if let Some(credentials) = results.credentials {
            debug!(user_id = %credentials.user_id, "Merging credentials into context");
            self.credentials = Some(credentials);
        }
        if let Some(project_config) = results.project_config {
            debug!(app_id = %project_config.app_id, "Merging project configuration into context");
            self.project_config = Some(project_config);
        }
    }
}
