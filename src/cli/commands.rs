//! Mapping from parsed arguments to an invocation

use crate::cli::{Args, Command, GlobalArgs};
use crate::config::context::{CommandFlags, GlobalFlags};
use crate::operations::init::Requirements;
use crate::operations::invoke::Invocation;

impl Command {
    /// Name the command's implementation is registered under
    ///
    /// `sim` shares the `serve` implementation.
    #[must_use]
    pub const fn handler_name(&self) -> &'static str {
        match *self {
            Self::Login => "login",
            Self::CreateApp { .. } => "create-app",
            Self::BindApp => "bind-app",
            Self::Serve { .. } | Self::Sim => "serve",
            Self::Deploy { .. } => "deploy",
        }
    }

    /// What has to be resolved before the command runs
    #[must_use]
    pub const fn requirements(&self) -> Requirements {
        match *self {
            Self::Login => Requirements::NONE,
            Self::CreateApp { .. } | Self::BindApp => Requirements::CREDENTIALS,
            Self::Serve { .. } | Self::Sim | Self::Deploy { .. } => Requirements::PROJECT,
        }
    }
}

impl From<GlobalArgs> for GlobalFlags {
    fn from(args: GlobalArgs) -> Self {
        Self {
            debug: args.debug,
            dev: args.dev,
            offline: args.offline,
            port: args.port,
            user_id: args.user_id,
            secret_key: args.secret_key,
            app_id: None,
        }
    }
}

impl From<Args> for Invocation {
    fn from(args: Args) -> Self {
        let handler = args.command.handler_name().to_owned();
        let requirements = args.command.requirements();
        let mut global = GlobalFlags::from(args.global);

        let flags = match args.command {
            Command::Login => CommandFlags::Login,
            Command::CreateApp {
                github_repo,
                github_branch,
            } => CommandFlags::CreateApp {
                github_repo,
                github_branch,
            },
            Command::BindApp => CommandFlags::BindApp,
            Command::Serve { open, release } => CommandFlags::Serve {
                open,
                release,
                simulator: false,
            },
            Command::Sim => CommandFlags::Serve {
                open: false,
                release: false,
                simulator: true,
            },
            Command::Deploy {
                unattended,
                version_name,
                message,
                force,
                app_id,
            } => {
                global.app_id = app_id;
                CommandFlags::Deploy {
                    unattended,
                    version_name,
                    message,
                    force,
                }
            }
        };

        Self {
            handler,
            requirements,
            global,
            flags,
        }
    }
}
