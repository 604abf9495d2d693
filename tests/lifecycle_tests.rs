//! Process lifecycle tests

use anyhow::Result;
use async_trait::async_trait;
use shipit::config::Settings;
use shipit::config::context::{CommandFlags, Context, GlobalFlags};
use shipit::error::{CliError, ErrorKind};
use shipit::operations::init::Requirements;
use shipit::operations::invoke::{CommandHandler, CommandRegistry, Invocation};
use shipit::operations::lifecycle::{
    CleanupHandle, Completion, LifecycleState, finalize,
};
use shipit::system::MockSystem;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::sync::oneshot;

/// Handler that keeps the process alive and counts cleanups
struct LocalServer {
    cleanups: Arc<AtomicUsize>,
}

#[async_trait]
impl CommandHandler for LocalServer {
    async fn execute(&self, _context: Context, _settings: &Settings) -> Result<Completion> {
        let cleanups = Arc::clone(&self.cleanups);
        Ok(Completion::KeepAlive(CleanupHandle::new(move || {
            cleanups.fetch_add(1, Ordering::SeqCst);
        })))
    }
}

struct Crashing;

#[async_trait]
impl CommandHandler for Crashing {
    async fn execute(&self, _context: Context, _settings: &Settings) -> Result<Completion> {
        Err(CliError::command_with_trace(
            "bundler crashed",
            "    at bundle (src/bundle.rs:88)\n    at deploy (src/deploy.rs:12)",
        )
        .into())
    }
}

fn bare_invocation(handler: &str) -> Invocation {
    Invocation {
        handler: handler.to_owned(),
        requirements: Requirements::NONE,
        global: GlobalFlags::default(),
        flags: CommandFlags::Login,
    }
}

#[tokio::test]
async fn test_keep_alive_waits_for_interrupt_then_cleans_up_once() {
    let cleanups = Arc::new(AtomicUsize::new(0));
    let mut registry = CommandRegistry::new();
    registry.register(
        "serve",
        LocalServer {
            cleanups: Arc::clone(&cleanups),
        },
    );

    let (interrupt, interrupted) = oneshot::channel::<()>();
    let running = tokio::spawn(async move {
        let system = MockSystem::new();
        shipit::run(
            bare_invocation("serve"),
            &Settings::default(),
            &system,
            &registry,
            async {
                let _ = interrupted.await;
            },
        )
        .await
    });

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!running.is_finished());
    assert_eq!(cleanups.load(Ordering::SeqCst), 0);

    interrupt.send(()).unwrap();
    let termination = running.await.unwrap();

    assert_eq!(cleanups.load(Ordering::SeqCst), 1);
    assert_eq!(termination.state(), LifecycleState::Interrupted);
    assert_eq!(termination.exit_code, 0);
    assert_eq!(
        termination.lifecycle.history(),
        &[
            LifecycleState::Invoking,
            LifecycleState::KeptAlive,
            LifecycleState::Interrupted
        ]
    );
}

#[tokio::test]
async fn test_finished_command_terminates_without_waiting() {
    let termination = finalize(Ok(Completion::Finished), std::future::pending()).await;

    assert_eq!(termination.state(), LifecycleState::Terminating);
    assert_eq!(termination.exit_code, 0);
    assert!(termination.report.is_none());
}

#[tokio::test]
async fn test_failure_report_includes_trace() {
    let mut registry = CommandRegistry::new();
    registry.register("deploy", Crashing);
    let system = MockSystem::new();

    let termination = shipit::run(
        bare_invocation("deploy"),
        &Settings::default(),
        &system,
        &registry,
        std::future::pending(),
    )
    .await;

    assert_eq!(termination.state(), LifecycleState::Terminating);
    assert_eq!(termination.exit_code, ErrorKind::Command.exit_code());

    let report = termination.report.unwrap();
    assert_eq!(report.kind, ErrorKind::Command);
    let rendered = report.render();
    assert!(rendered.contains("bundler crashed"));
    assert!(rendered.contains("at bundle (src/bundle.rs:88)"));
}

#[tokio::test]
async fn test_unknown_command_terminates_with_usage_error() {
    let registry = CommandRegistry::new();
    let system = MockSystem::new();

    let termination = shipit::run(
        bare_invocation("frobnicate"),
        &Settings::default(),
        &system,
        &registry,
        std::future::pending(),
    )
    .await;

    assert_eq!(termination.exit_code, ErrorKind::Usage.exit_code());
    assert_eq!(
        termination.lifecycle.history(),
        &[
            LifecycleState::Invoking,
            LifecycleState::Failed,
            LifecycleState::Terminating
        ]
    );
    assert!(system.accessed().is_empty());
}

#[tokio::test]
async fn test_abandoned_keep_alive_cleans_up_on_teardown() {
    let cleanups = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&cleanups);
    let completion = Completion::KeepAlive(CleanupHandle::new(move || {
        counter.fetch_add(1, Ordering::SeqCst);
    }));

    let running = tokio::spawn(finalize(Ok(completion), std::future::pending()));
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(cleanups.load(Ordering::SeqCst), 0);

    running.abort();
    assert!(running.await.unwrap_err().is_cancelled());
    assert_eq!(cleanups.load(Ordering::SeqCst), 1);
}
