//! `shipit` - command-line client for building, serving and deploying apps
//!
//! This library holds the command lifecycle: it resolves the credentials and
//! project configuration a command needs, runs the command implementation,
//! and decides when the process ends.

pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod operations;
pub mod system;

use config::Settings;
use operations::invoke::{CommandRegistry, Invocation, invoke};
use operations::lifecycle::{Termination, finalize};
use std::future::Future;
use system::System;

/// Run one invocation to its end
///
/// Every failure is reported through the error reporter; the returned
/// termination carries the exit code. `shutdown` is awaited only if the
/// command asks to keep the process alive.
pub async fn run<S>(
    invocation: Invocation,
    settings: &Settings,
    system: &dyn System,
    registry: &CommandRegistry,
    shutdown: S,
) -> Termination
where
    S: Future<Output = ()>,
{
    let outcome = invoke(registry, invocation, settings, system).await;
    finalize(outcome, shutdown).await
}
