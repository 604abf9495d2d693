//! Process lifecycle after a command has been dispatched
//!
//! A command either finishes, fails, or asks to keep the process alive. In
//! the last case nothing else is scheduled until an external interrupt
//! arrives, at which point the command's cleanup hook runs once.

use crate::error::{ErrorReport, report};
use anyhow::Result;
use std::fmt;
use std::future::Future;
use tracing::{debug, info, warn};

/// One-shot teardown hook returned by a long-running command
///
/// The hook runs at most once: either through [`CleanupHandle::invoke`] or,
/// if that never happens, when the handle is dropped.
pub struct CleanupHandle {
    hook: Option<Box<dyn FnOnce() + Send>>,
}

impl CleanupHandle {
    /// Wrap a cleanup function
    pub fn new<F>(hook: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            hook: Some(Box::new(hook)),
        }
    }

    /// Run the hook now
    pub fn invoke(mut self) {
        self.run_once();
    }

    fn run_once(&mut self) {
        if let Some(hook) = self.hook.take() {
            hook();
        }
    }
}

impl Drop for CleanupHandle {
    fn drop(&mut self) {
        self.run_once();
    }
}

impl fmt::Debug for CleanupHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanupHandle")
            .field("pending", &self.hook.is_some())
            .finish()
    }
}

/// How a command implementation finished
#[derive(Debug)]
pub enum Completion {
    /// Done; the process may exit
    Finished,
    /// Keep the process alive until interrupted, then run the cleanup
    KeepAlive(CleanupHandle),
}

/// States of the process lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Invoking,
    Failed,
    CompletedImmediate,
    KeptAlive,
    Terminating,
    Interrupted,
}

impl LifecycleState {
    /// Whether the lifecycle may move from `self` to `next`
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Invoking, Self::Failed)
                | (Self::Invoking, Self::CompletedImmediate)
                | (Self::Invoking, Self::KeptAlive)
                | (Self::Failed, Self::Terminating)
                | (Self::CompletedImmediate, Self::Terminating)
                | (Self::KeptAlive, Self::Interrupted)
        )
    }
}

/// Tracks the lifecycle state and the path taken to reach it
#[derive(Debug, Clone)]
pub struct Lifecycle {
    history: Vec<LifecycleState>,
}

impl Lifecycle {
    /// Start in `Invoking`
    #[must_use]
    pub fn new() -> Self {
        Self {
            history: vec![LifecycleState::Invoking],
        }
    }

    /// Current state
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.history
            .last()
            .copied()
            .unwrap_or(LifecycleState::Invoking)
    }

    /// States visited so far, oldest first
    #[must_use]
    pub fn history(&self) -> &[LifecycleState] {
        &self.history
    }

    fn advance(&mut self, next: LifecycleState) {
        let current = self.state();
        if !current.can_transition_to(next) {
            warn!(from = ?current, to = ?next, "Unexpected lifecycle transition");
        }
        debug!(from = ?current, to = ?next, "Lifecycle transition");
        self.history.push(next);
    }
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Final outcome of an invocation
#[derive(Debug, Clone)]
pub struct Termination {
    pub lifecycle: Lifecycle,
    pub exit_code: i32,
    pub report: Option<ErrorReport>,
}

impl Termination {
    /// Terminal state reached
    #[must_use]
    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }
}

/// Drive the lifecycle to a terminal state
///
/// `shutdown` is only awaited when the command asked to be kept alive; it
/// should complete when the process is told to stop.
pub async fn finalize<S>(outcome: Result<Completion>, shutdown: S) -> Termination
where
    S: Future<Output = ()>,
{
    let mut lifecycle = Lifecycle::new();

    match outcome {
        Err(err) => {
            lifecycle.advance(LifecycleState::Failed);
            let report = report(&err);
            lifecycle.advance(LifecycleState::Terminating);
            Termination {
                lifecycle,
                exit_code: report.exit_code(),
                report: Some(report),
            }
        }
        Ok(Completion::Finished) => {
            lifecycle.advance(LifecycleState::CompletedImmediate);
            lifecycle.advance(LifecycleState::Terminating);
            Termination {
                lifecycle,
                exit_code: 0,
                report: None,
            }
        }
        Ok(Completion::KeepAlive(cleanup)) => {
            lifecycle.advance(LifecycleState::KeptAlive);
            info!("Running until interrupted (press Ctrl-C to stop)");
            shutdown.await;

            lifecycle.advance(LifecycleState::Interrupted);
            debug!("Interrupt received, running cleanup");
            cleanup.invoke();
            Termination {
                lifecycle,
                exit_code: 0,
                report: None,
            }
        }
    }
}

/// Resolves when the process receives Ctrl-C, or SIGTERM on unix
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_handle() -> (CleanupHandle, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let handle = CleanupHandle::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        (handle, calls)
    }

    #[test]
    fn invoke_runs_hook_once() {
        let (handle, calls) = counting_handle();
        handle.invoke();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn dropping_an_unused_handle_runs_hook() {
        let (handle, calls) = counting_handle();
        drop(handle);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn transitions_follow_the_state_machine() {
        use LifecycleState::*;

        assert!(Invoking.can_transition_to(KeptAlive));
        assert!(KeptAlive.can_transition_to(Interrupted));
        assert!(Failed.can_transition_to(Terminating));
        assert!(!KeptAlive.can_transition_to(Terminating));
        assert!(!CompletedImmediate.can_transition_to(Interrupted));
        assert!(!Terminating.can_transition_to(Invoking));
    }
}
