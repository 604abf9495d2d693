//! Normalization and reporting of failures
//!
//! Every failure, whichever stage produced it, ends up here as a single
//! `ErrorReport` and is logged once before the process terminates.

use super::types::{CliError, ErrorKind};
use std::backtrace::BacktraceStatus;
use std::fmt;
use tracing::error;

/// A failure normalized into one shape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    pub kind: ErrorKind,
    pub message: String,
    pub trace: Option<String>,
}

impl ErrorReport {
    /// Normalize an error of any origin
    ///
    /// A `CliError` anywhere in the chain decides the kind and may supply a
    /// trace. Other errors are reported as unexpected, with the captured
    /// backtrace when there is one.
    #[must_use]
    pub fn from_error(err: &anyhow::Error) -> Self {
        let message = format!("{err:#}");

        match err.chain().find_map(|cause| cause.downcast_ref::<CliError>()) {
            Some(cli_error) => Self {
                kind: cli_error.kind(),
                message,
                trace: cli_error.trace().map(str::to_owned),
            },
            None => Self {
                kind: ErrorKind::Unexpected,
                message,
                trace: captured_backtrace(err),
            },
        }
    }

    /// Exit code for the reported failure
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        self.kind.exit_code()
    }

    /// Human-readable text: the message, followed by the trace when present
    #[must_use]
    pub fn render(&self) -> String {
        match self.trace.as_deref() {
            Some(trace) if !trace.trim().is_empty() => format!("{}\n{}", self.message, trace),
            _ => self.message.clone(),
        }
    }
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

/// Backtrace text captured by `anyhow`, if backtraces are enabled
pub(crate) fn captured_backtrace(err: &anyhow::Error) -> Option<String> {
    let backtrace = err.backtrace();
    if backtrace.status() == BacktraceStatus::Captured {
        Some(backtrace.to_string())
    } else {
        None
    }
}

/// Normalize and log a failure
///
/// Emits exactly one `error!` event. The caller terminates afterwards.
pub fn report(err: &anyhow::Error) -> ErrorReport {
    let report = ErrorReport::from_error(err);
    error!("{}", report.render());
    report
}
