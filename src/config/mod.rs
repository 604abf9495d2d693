//! Configuration management module
//!
//! Holds the runtime settings object, the per-invocation `Context`, and the
//! resolvers that load credentials and project configuration from disk

pub mod context;
pub mod credentials;
pub mod project;

use crate::system::System;
use context::GlobalFlags;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Target platform environment used by command implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Development,
}

impl Environment {
    /// Short name of the environment
    #[must_use]
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Environment variable holding a log filter for shipit alone
pub const LOG_ENV: &str = "SHIPIT_LOG";

/// Process-wide settings, built once at startup and passed by reference
///
/// Set once at dispatch time and never reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Settings {
    /// Verbose internal logging
    pub debug: bool,

    /// Platform environment targeted by command implementations
    pub environment: Environment,
}

impl Settings {
    /// Derive the settings from the global command-line flags
    #[must_use]
    #[inline]
    pub const fn from_flags(flags: &GlobalFlags) -> Self {
        Self {
            debug: flags.debug,
            environment: if flags.dev {
                Environment::Development
            } else {
                Environment::Production
            },
        }
    }

    /// Default log filter directive for these settings
    #[must_use]
    #[inline]
    pub const fn log_level(&self) -> &'static str {
        if self.debug { "debug" } else { "info" }
    }

    /// Log filter directive, preferring `SHIPIT_LOG`, then `RUST_LOG`
    ///
    /// Blank variables are skipped; without either the directive follows
    /// [`Settings::log_level`].
    #[must_use]
    pub fn log_directive(&self, system: &dyn System) -> String {
        [LOG_ENV, "RUST_LOG"]
            .into_iter()
            .filter_map(|key| system.env_var(key).ok())
            .find(|directive| !directive.trim().is_empty())
            .unwrap_or_else(|| self.log_level().to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::system::MockSystem;

    #[test]
    fn log_directive_follows_debug_flag_by_default() {
        let system = MockSystem::new();
        let debug = Settings {
            debug: true,
            ..Settings::default()
        };

        assert_eq!(Settings::default().log_directive(&system), "info");
        assert_eq!(debug.log_directive(&system), "debug");
    }

    #[test]
    fn shipit_log_wins_over_rust_log() {
        let system = MockSystem::new()
            .with_env("RUST_LOG", "warn")
            .with_env(LOG_ENV, "shipit=trace");

        assert_eq!(Settings::default().log_directive(&system), "shipit=trace");
    }

    #[test]
    fn blank_shipit_log_falls_back_to_rust_log() {
        let system = MockSystem::new()
            .with_env(LOG_ENV, " ")
            .with_env("RUST_LOG", "warn");

        assert_eq!(Settings::default().log_directive(&system), "warn");
    }
}
