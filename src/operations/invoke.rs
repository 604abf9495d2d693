//! Command dispatch
//!
//! Looks up the implementation for a command, resolves the context it
//! needs, and runs it.

use crate::config::Settings;
use crate::config::context::{CommandFlags, Context, GlobalFlags};
use crate::error::{CliError, report::captured_backtrace};
use crate::operations::init::{InitTaskSpec, Requirements, run_init_tasks};
use crate::operations::lifecycle::Completion;
use crate::system::System;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Implementation of a command
///
/// Implementations receive the fully resolved context and report back how
/// they finished. Long-running commands return [`Completion::KeepAlive`]
/// with a cleanup hook.
#[async_trait]
pub trait CommandHandler: Send + Sync {
    /// Run the command
    async fn execute(&self, context: Context, settings: &Settings) -> Result<Completion>;
}

/// A parsed request to run one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Name the handler is registered under
    pub handler: String,
    pub requirements: Requirements,
    pub global: GlobalFlags,
    pub flags: CommandFlags,
}

/// Command name to implementation
#[derive(Clone, Default)]
pub struct CommandRegistry {
    handlers: BTreeMap<String, Arc<dyn CommandHandler>>,
}

impl CommandRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an implementation under `name`, replacing any previous one
    pub fn register<S, H>(&mut self, name: S, handler: H) -> &mut Self
    where
        S: Into<String>,
        H: CommandHandler + 'static,
    {
        self.handlers.insert(name.into(), Arc::new(handler));
        self
    }

    /// Registered command names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.handlers.keys().map(String::as_str).collect()
    }

    /// Find the implementation for `name`
    ///
    /// # Errors
    ///
    /// Returns a usage error if no implementation is registered under `name`
    pub fn lookup(&self, name: &str) -> Result<Arc<dyn CommandHandler>> {
        self.handlers.get(name).cloned().ok_or_else(|| {
            CliError::usage(format!(
                "Unknown command: {name} (available: {})",
                self.names().join(", ")
            ))
            .into()
        })
    }
}

/// Resolve the context for an invocation and run its command
///
/// The command is looked up before any initialization work, so an unknown
/// command never touches the filesystem.
///
/// # Errors
///
/// Returns an error if:
/// - No implementation is registered for the command (usage error)
/// - An initialization task fails
/// - The command implementation fails (command error)
pub async fn invoke(
    registry: &CommandRegistry,
    invocation: Invocation,
    settings: &Settings,
    system: &dyn System,
) -> Result<Completion> {
    let handler = registry.lookup(&invocation.handler)?;

    let spec = InitTaskSpec::new(invocation.requirements, &invocation.global);
    let results = run_init_tasks(&spec, system, invocation.global.app_id.as_deref()).await?;

    let mut context = Context::new(invocation.global, invocation.flags);
    context.merge(results);

    debug!(
        command = %invocation.handler,
        environment = %settings.environment,
        "Dispatching command"
    );
    let completion = handler
        .execute(context, settings)
        .await
        .map_err(into_command_error)?;

    if matches!(completion, Completion::Finished) {
        info!(command = %invocation.handler, "Command completed");
    }
    Ok(completion)
}

/// Failures from command implementations are reported as command errors
fn into_command_error(err: anyhow::Error) -> anyhow::Error {
    if err.chain().any(|cause| cause.is::<CliError>()) {
        return err;
    }

    let message = format!("{err:#}");
    match captured_backtrace(&err) {
        Some(trace) => CliError::command_with_trace(message, trace).into(),
        None => CliError::command(message).into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use anyhow::anyhow;

    #[test]
    fn foreign_errors_become_command_errors() {
        let err = into_command_error(anyhow!("bundle upload failed"));
        let cli_error = err.downcast_ref::<CliError>().unwrap();

        assert_eq!(cli_error.kind(), ErrorKind::Command);
        assert!(cli_error.to_string().contains("bundle upload failed"));
    }

    #[test]
    fn cli_errors_pass_through() {
        let err = into_command_error(CliError::validation("bad version name").into());
        let cli_error = err.downcast_ref::<CliError>().unwrap();

        assert_eq!(cli_error.kind(), ErrorKind::Validation);
    }

    #[test]
    fn lookup_of_unknown_command_is_a_usage_error() {
        let registry = CommandRegistry::new();
        let err = registry.lookup("frobnicate").err().unwrap();
        let cli_error = err.downcast_ref::<CliError>().unwrap();

        assert_eq!(cli_error.kind(), ErrorKind::Usage);
        assert!(cli_error.to_string().contains("frobnicate"));
    }
}
