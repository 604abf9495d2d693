//! Custom error types with exit codes

use thiserror::Error;

/// Main error type for shipit operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum CliError {
    /// Configuration Error - required file missing, or required field missing from a valid file
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Format Error - file present but not parseable
    #[error("Format error: {message}")]
    Format { message: String },

    /// Validation Error - a resolvable value fails a precondition
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Command Error - raised by a command implementation
    #[error("Command error: {message}")]
    Command {
        message: String,
        trace: Option<String>,
    },

    /// Usage Error - unrecognized command
    #[error("Usage error: {message}")]
    Usage { message: String },
}

/// Flat classification of a reported failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Format,
    Validation,
    Command,
    Usage,
    /// Anything that did not originate as a `CliError`
    Unexpected,
}

impl ErrorKind {
    /// Exit code the process terminates with for this kind of failure
    #[must_use]
    #[inline]
    pub const fn exit_code(self) -> i32 {
        match self {
            Self::Configuration | Self::Unexpected => 1,
            Self::Format => 2,
            Self::Validation => 3,
            Self::Command => 4,
            Self::Usage => 5,
        }
    }
}

impl CliError {
    /// Get the kind of this error
    #[must_use]
    #[inline]
    pub const fn kind(&self) -> ErrorKind {
        match *self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Format { .. } => ErrorKind::Format,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::Command { .. } => ErrorKind::Command,
            Self::Usage { .. } => ErrorKind::Usage,
        }
    }

    /// Trace text attached by a command implementation, if any
    #[must_use]
    #[inline]
    pub fn trace(&self) -> Option<&str> {
        match *self {
            Self::Command { ref trace, .. } => trace.as_deref(),
            _ => None,
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a format error
    #[inline]
    pub fn format<S: Into<String>>(message: S) -> Self {
        Self::Format {
            message: message.into(),
        }
    }

    /// Create a validation error
    #[inline]
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a command error
    #[inline]
    pub fn command<S: Into<String>>(message: S) -> Self {
        Self::Command {
            message: message.into(),
            trace: None,
        }
    }

    /// Create a command error carrying the trace of where it was raised
    #[inline]
    pub fn command_with_trace<S: Into<String>, T: Into<String>>(message: S, trace: T) -> Self {
        Self::Command {
            message: message.into(),
            trace: Some(trace.into()),
        }
    }

    /// Create a usage error
    #[inline]
    pub fn usage<S: Into<String>>(message: S) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }
}
