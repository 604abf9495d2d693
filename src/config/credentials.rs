//! Cached user credentials
//!
//! The login flow stores the user's credentials under the home directory.
//! This module only ever reads that file.

use crate::error::CliError;
use crate::system::System;
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::path::PathBuf;
use tracing::debug;

/// Directory under the home directory holding shipit's per-user state
pub const STATE_DIR: &str = ".shipit";

/// Name of the credentials file inside [`STATE_DIR`]
pub const CREDENTIALS_FILE: &str = "credentials";

/// Resolved user credentials
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    pub user_id: String,
    pub secret_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("user_id", &self.user_id)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

/// Shape of the credentials file; both fields are checked after parsing
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CredentialsFile {
    #[serde(default)]
    user_id: Option<String>,
    #[serde(default)]
    secret_key: Option<String>,
}

/// Location of the credentials file for the current user
///
/// # Errors
///
/// Returns a configuration error if the home directory cannot be determined
pub fn credentials_path(system: &dyn System) -> Result<PathBuf> {
    let home = system.home_dir().ok_or_else(|| {
        CliError::configuration("Could not determine home directory to locate credentials")
    })?;
    Ok(home.join(STATE_DIR).join(CREDENTIALS_FILE))
}

/// Load the cached credentials
///
/// The file is parsed as YAML, which also accepts the JSON the login flow
/// writes.
///
/// # Errors
///
/// Returns an error if:
/// - The credentials file does not exist (configuration error)
/// - The file is empty, not UTF-8, or cannot be parsed (format error)
/// - `userId` or `secretKey` is missing or empty (configuration error)
pub async fn resolve_credentials(system: &dyn System) -> Result<Credentials> {
    let path = credentials_path(system)?;
    debug!(path = %path.display(), "Resolving credentials");

    let exists = system
        .exists(&path)
        .await
        .with_context(|| format!("Failed to check credentials file: {}", path.display()))?;
    if !exists {
        return Err(CliError::configuration(format!(
            "No credentials file found at {}; run `shipit login` first",
            path.display()
        ))
        .into());
    }

    let unparseable = || {
        CliError::format(format!(
            "Could not parse credentials file {}; re-run `shipit login`",
            path.display()
        ))
    };

    let content = match system.read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            debug!(error = %e, "Credentials file is not valid UTF-8");
            return Err(unparseable().into());
        }
        Err(e) => {
            return Err(anyhow::Error::new(e).context(format!(
                "Failed to read credentials file: {}",
                path.display()
            )));
        }
    };

    // An empty or truncated write by the login flow is unparseable, not incomplete.
    if content.trim().is_empty() {
        return Err(unparseable().into());
    }

    let file: CredentialsFile = serde_yaml::from_str(&content).map_err(|e| {
        debug!(error = %e, "Credentials file did not parse");
        unparseable()
    })?;

    match (non_empty(file.user_id), non_empty(file.secret_key)) {
        (Some(user_id), Some(secret_key)) => Ok(Credentials {
            user_id,
            secret_key,
        }),
        _ => Err(CliError::configuration(format!(
            "Missing information in credentials file {}; re-run `shipit login`",
            path.display()
        ))
        .into()),
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secret() {
        let credentials = Credentials {
            user_id: "u-1".to_owned(),
            secret_key: "hunter2".to_owned(),
        };
        let printed = format!("{credentials:?}");

        assert!(printed.contains("u-1"));
        assert!(!printed.contains("hunter2"));
    }

    #[test]
    fn blank_values_count_as_missing() {
        assert_eq!(non_empty(Some("  ".to_owned())), None);
        assert_eq!(non_empty(None), None);
        assert_eq!(non_empty(Some("x".to_owned())), Some("x".to_owned()));
    }
}
