use clap::{Parser, Subcommand};

/// Command-line arguments for shipit
#[derive(Parser, Debug, Clone)]
#[command(name = "shipit")]
#[command(about = "A command-line client for building, serving and deploying apps")]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags accepted by every command
#[derive(clap::Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// User id, instead of the one stored by `login`
    #[arg(
        short = 'u',
        long = "userId",
        value_name = "ID",
        global = true,
        env = "SHIPIT_USER_ID"
    )]
    pub user_id: Option<String>,

    /// Secret key, instead of the one stored by `login`
    #[arg(
        short = 'k',
        long = "secretKey",
        value_name = "KEY",
        global = true,
        env = "SHIPIT_SECRET_KEY",
        hide_env_values = true
    )]
    pub secret_key: Option<String>,

    /// Port for local servers
    #[arg(short, long, value_name = "PORT", global = true)]
    pub port: Option<u16>,

    /// Target the development environment of the platform
    #[arg(long, global = true)]
    pub dev: bool,

    /// Work without contacting the platform where possible
    #[arg(long, global = true)]
    pub offline: bool,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Log in and store credentials for later commands
    Login,

    /// Create a new app on the platform
    CreateApp {
        /// GitHub repository to create the app from
        #[arg(long = "github-repo", value_name = "OWNER/NAME")]
        github_repo: Option<String>,

        /// Branch of the GitHub repository
        #[arg(long = "github-branch", value_name = "NAME")]
        github_branch: Option<String>,
    },

    /// Bind the project in the current directory to an app
    BindApp,

    /// Serve the app locally
    Serve {
        /// Open the served app in a browser
        #[arg(short, long)]
        open: bool,

        /// Serve a release build
        #[arg(long)]
        release: bool,
    },

    /// Serve the app in simulator mode
    Sim,

    /// Deploy the app to the platform
    Deploy {
        /// Do not prompt for confirmation
        #[arg(short = 'x', long)]
        unattended: bool,

        /// Version name of the deployment
        #[arg(long = "version-name", value_name = "NAME")]
        version_name: Option<String>,

        /// Deployment message
        #[arg(short, long, value_name = "TEXT")]
        message: Option<String>,

        /// Deploy even if the version already exists
        #[arg(short, long)]
        force: bool,

        /// App id, instead of the one in package.json
        #[arg(long = "appId", value_name = "ID")]
        app_id: Option<String>,
    },
}
