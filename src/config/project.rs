//! Project configuration from the `package.json` manifest
//!
//! The manifest carries a dedicated `shipit` section written by `bind-app`.
//! The resolved configuration is that section, overlaid with the manifest's
//! standard `version` and `scripts` fields and an optional explicit app id.

use crate::error::CliError;
use crate::system::System;
use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::io;
use tracing::debug;

/// File name of the project manifest
pub const MANIFEST_FILE: &str = "package.json";

/// Key of the deployment configuration section inside the manifest
pub const SECTION_KEY: &str = "shipit";

/// Resolved project configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    pub app_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(default)]
    pub scripts: BTreeMap<String, String>,
}

/// The parts of `package.json` this module reads
#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(default)]
    version: Option<Value>,
    #[serde(default)]
    scripts: BTreeMap<String, Value>,
    #[serde(default, rename = "shipit")]
    section: Option<Section>,
}

/// The `shipit` section; stale `appVersion`/`scripts` entries are ignored
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Section {
    #[serde(default)]
    app_id: Option<String>,
}

/// Load the project configuration for the current working directory
///
/// An explicit `app_id_override` always wins over the manifest's value.
///
/// # Errors
///
/// Returns an error if:
/// - There is no `package.json` in the working directory (configuration error)
/// - The manifest is not UTF-8 or not valid JSON of the expected shape (format error)
/// - The manifest has no `shipit` section (configuration error)
/// - No app id is available from the section or the override (validation error)
pub async fn resolve_project_config(
    system: &dyn System,
    app_id_override: Option<&str>,
) -> Result<ProjectConfig> {
    let dir = system
        .current_dir()
        .context("Failed to determine the current working directory")?;
    let path = dir.join(MANIFEST_FILE);
    debug!(path = %path.display(), "Resolving project configuration");

    let exists = system
        .exists(&path)
        .await
        .with_context(|| format!("Failed to check manifest: {}", path.display()))?;
    if !exists {
        return Err(CliError::configuration(format!(
            "No {MANIFEST_FILE} found in {}; run `npm init` to create one",
            dir.display()
        ))
        .into());
    }

    let content = match system.read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            return Err(CliError::format(format!(
                "Invalid {MANIFEST_FILE} format in {}: {e}",
                dir.display()
            ))
            .into());
        }
        Err(e) => {
            return Err(anyhow::Error::new(e)
                .context(format!("Failed to read manifest: {}", path.display())));
        }
    };

    let manifest: Manifest = serde_json::from_str(&content).map_err(|e| {
        CliError::format(format!("Invalid {MANIFEST_FILE} format in {}: {e}", dir.display()))
    })?;

    let section = manifest.section.ok_or_else(|| {
        CliError::configuration(format!(
            "No {SECTION_KEY} configuration in {MANIFEST_FILE}; run `shipit bind-app` to bind this project"
        ))
    })?;

    let app_id = app_id_override
        .filter(|id| !id.trim().is_empty())
        .map(str::to_owned)
        .or_else(|| section.app_id.filter(|id| !id.trim().is_empty()))
        .ok_or_else(|| {
            CliError::validation(format!(
                "Missing appId: set {SECTION_KEY}.appId in {MANIFEST_FILE} or pass --appId"
            ))
        })?;

    Ok(ProjectConfig {
        app_id,
        app_version: manifest.version.and_then(verbatim),
        scripts: manifest
            .scripts
            .into_iter()
            .filter_map(|(name, script)| verbatim(script).map(|script| (name, script)))
            .collect(),
    })
}

/// Copy a manifest value as text; strings stay unquoted and `null` is dropped
fn verbatim(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn verbatim_keeps_strings_and_renders_other_values() {
        assert_eq!(verbatim(json!("1.2.0")), Some("1.2.0".to_owned()));
        assert_eq!(verbatim(json!(2)), Some("2".to_owned()));
        assert_eq!(verbatim(json!(true)), Some("true".to_owned()));
        assert_eq!(verbatim(Value::Null), None);
    }
}
