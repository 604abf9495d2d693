//! Built-in command implementations
//!
//! The platform-facing behavior of each command lives outside this crate.
//! These implementations report what they were asked to do so the binary
//! is usable end to end; embedders register their own through
//! [`CommandRegistry::register`].

use crate::config::Settings;
use crate::config::context::{CommandFlags, Context};
use crate::error::CliError;
use crate::operations::invoke::{CommandHandler, CommandRegistry};
use crate::operations::lifecycle::{CleanupHandle, Completion};
use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

/// Port used by `serve` when none is given
pub const DEFAULT_PORT: u16 = 8080;

/// Registry with the built-in implementation of every command
#[must_use]
pub fn builtin_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();
    registry
        .register("login", Login)
        .register("create-app", CreateApp)
        .register("bind-app", BindApp)
        .register("serve", Serve)
        .register("deploy", Deploy);
    registry
}

fn user_id(context: &Context) -> &str {
    context
        .credentials
        .as_ref()
        .map_or("<anonymous>", |c| c.user_id.as_str())
}

fn app_id(context: &Context) -> Result<&str> {
    context
        .project_config
        .as_ref()
        .map(|p| p.app_id.as_str())
        .ok_or_else(|| CliError::command("No project configuration was resolved").into())
}

/// `login`
pub struct Login;

#[async_trait]
impl CommandHandler for Login {
    async fn execute(&self, _context: Context, settings: &Settings) -> Result<Completion> {
        info!(environment = %settings.environment, "Logging in to the platform");
        Ok(Completion::Finished)
    }
}

/// `create-app`
pub struct CreateApp;

#[async_trait]
impl CommandHandler for CreateApp {
    async fn execute(&self, context: Context, settings: &Settings) -> Result<Completion> {
        let CommandFlags::CreateApp {
            ref github_repo,
            ref github_branch,
        } = context.flags
        else {
            return Err(CliError::command("create-app invoked with foreign flags").into());
        };

        info!(
            user = user_id(&context),
            environment = %settings.environment,
            github_repo = github_repo.as_deref().unwrap_or("-"),
            github_branch = github_branch.as_deref().unwrap_or("-"),
            "Creating app"
        );
        Ok(Completion::Finished)
    }
}

/// `bind-app`
pub struct BindApp;

#[async_trait]
impl CommandHandler for BindApp {
    async fn execute(&self, context: Context, settings: &Settings) -> Result<Completion> {
        info!(
            user = user_id(&context),
            environment = %settings.environment,
            "Binding project to app"
        );
        Ok(Completion::Finished)
    }
}

/// `serve` and `sim`
///
/// Keeps the process alive until interrupted.
pub struct Serve;

#[async_trait]
impl CommandHandler for Serve {
    async fn execute(&self, context: Context, settings: &Settings) -> Result<Completion> {
        let CommandFlags::Serve {
            open,
            release,
            simulator,
        } = context.flags
        else {
            return Err(CliError::command("serve invoked with foreign flags").into());
        };

        let app_id = app_id(&context)?.to_owned();
        let port = context.global.port.unwrap_or(DEFAULT_PORT);
        info!(
            app_id = %app_id,
            port,
            open,
            release,
            simulator,
            offline = context.global.offline,
            environment = %settings.environment,
            "Serving app locally"
        );

        Ok(Completion::KeepAlive(CleanupHandle::new(move || {
            info!(app_id = %app_id, port, "Local server stopped");
        })))
    }
}

/// `deploy`
pub struct Deploy;

#[async_trait]
impl CommandHandler for Deploy {
    async fn execute(&self, context: Context, settings: &Settings) -> Result<Completion> {
        let CommandFlags::Deploy {
            unattended,
            ref version_name,
            ref message,
            force,
        } = context.flags
        else {
            return Err(CliError::command("deploy invoked with foreign flags").into());
        };

        let app_id = app_id(&context)?;
        let version = version_name.as_deref().or_else(|| {
            context
                .project_config
                .as_ref()
                .and_then(|p| p.app_version.as_deref())
        });
        info!(
            app_id,
            user = user_id(&context),
            version = version.unwrap_or("-"),
            message = message.as_deref().unwrap_or("-"),
            unattended,
            force,
            environment = %settings.environment,
            "Deploying app"
        );
        Ok(Completion::Finished)
    }
}
