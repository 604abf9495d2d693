//! # `shipit`
//!
//! Command-line client for building, serving and deploying apps.
//!
//! ## Usage
//!
//! ```sh
//! shipit login
//! shipit serve --port 3000 --open
//! shipit deploy -m "Fix checkout flow" --version-name 1.4.0
//! ```
//!
//! Credentials are read from `~/.shipit/credentials`, or taken from
//! `--userId`/`--secretKey`. Project settings come from the `shipit` section
//! of `package.json`.

use clap::Parser as _;
use clap::error::ErrorKind as ClapErrorKind;
use shipit::cli::Args;
use shipit::config::Settings;
use shipit::config::context::GlobalFlags;
use shipit::error::{CliError, report};
use shipit::handlers::builtin_registry;
use shipit::operations::invoke::Invocation;
use shipit::operations::lifecycle::shutdown_signal;
use shipit::system::RealSystem;
use tracing_subscriber::{EnvFilter, fmt};

fn init_tracing(settings: &Settings, system: &RealSystem) {
    let filter = EnvFilter::try_new(settings.log_directive(system))
        .unwrap_or_else(|_| EnvFilter::new(settings.log_level()));

    fmt().with_target(false).with_env_filter(filter).init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let system = RealSystem::new();
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if matches!(
            err.kind(),
            ClapErrorKind::InvalidSubcommand | ClapErrorKind::UnknownArgument
        ) =>
        {
            init_tracing(&Settings::default(), &system);
            let rendered = err.to_string();
            let message = rendered
                .lines()
                .next()
                .unwrap_or_default()
                .trim_start_matches("error: ");
            let report = report(&anyhow::Error::new(CliError::usage(message)));
            std::process::exit(report.exit_code());
        }
        Err(err) => err.exit(),
    };

    let settings = Settings::from_flags(&GlobalFlags::from(args.global.clone()));
    init_tracing(&settings, &system);

    let invocation = Invocation::from(args);
    let registry = builtin_registry();

    let termination = shipit::run(invocation, &settings, &system, &registry, shutdown_signal()).await;
    std::process::exit(termination.exit_code);
}
