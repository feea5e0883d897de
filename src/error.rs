//! Error types for gemlink.
//!
//! All errors are strongly typed using thiserror. This enables pattern
//! matching on specific error conditions and keeps the failure-isolation
//! policy of the workers explicit: work units return these values instead of
//! panicking, and the worker loop decides what to do with them.

use thiserror::Error;

use crate::ids::ReportId;

/// Errors resolving an incoming report against the subscription registry.
///
/// Both variants are per-block failures: the resolver reports them and moves
/// on to the next report block in the same message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolutionError {
    /// The report id was never subscribed (or the registry was cleared).
    #[error("no subscription for report {report_id}")]
    UnknownReport {
        report_id: ReportId,
    },

    /// The report carries a different number of values than the subscription
    /// declared. The resolver never truncates or pads.
    #[error("report {report_id} carries {actual} values, subscription expects {expected}")]
    ArityMismatch {
        report_id: ReportId,
        expected: usize,
        actual: usize,
    },
}

/// Worker lifecycle errors.
#[derive(Debug, Error)]
pub enum WorkerError {
    /// `start()` was called while the worker's thread is still alive.
    #[error("worker '{name}' is already running")]
    AlreadyRunning {
        name: String,
    },

    /// The OS refused to spawn the worker thread.
    #[error("failed to spawn worker '{name}': {message}")]
    SpawnFailed {
        name: String,
        message: String,
    },

    /// The worker thread panicked; observed when `stop()` joins it.
    #[error("worker '{name}' panicked")]
    Panicked {
        name: String,
    },
}

/// Errors producing a typed view of a decoded message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MessageError {
    /// The message is not the stream/function the view decodes.
    #[error("expected S{expected_stream}F{expected_function}, got S{stream}F{function}")]
    UnexpectedFunction {
        expected_stream: u8,
        expected_function: u8,
        stream: u8,
        function: u8,
    },

    /// The message body does not have the expected item structure.
    #[error("malformed S{stream}F{function} body: {context}")]
    Malformed {
        stream: u8,
        function: u8,
        context: String,
    },
}

/// Top-level error type for gemlink.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum GemError {
    #[error("resolution error: {0}")]
    Resolution(#[from] ResolutionError),

    #[error("worker error: {0}")]
    Worker(#[from] WorkerError),

    #[error("message error: {0}")]
    Message(#[from] MessageError),

    /// A collaborator (report linkage, message sender) failed.
    #[error("link error: {message}")]
    Link {
        message: String,
    },

    #[error("internal error: {message}")]
    Internal {
        message: String,
    },
}

impl GemError {
    /// Creates a link-collaborator error.
    #[must_use]
    pub fn link(message: impl Into<String>) -> Self {
        Self::Link {
            message: message.into(),
        }
    }

    /// Creates an internal error.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Returns true if this is a resolution error.
    #[must_use]
    pub const fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution(_))
    }

    /// Returns true if this is a worker lifecycle error.
    #[must_use]
    pub const fn is_worker(&self) -> bool {
        matches!(self, Self::Worker(_))
    }

    /// Returns true if this is a message decode error.
    #[must_use]
    pub const fn is_message(&self) -> bool {
        matches!(self, Self::Message(_))
    }
}

/// Result type alias for gemlink operations.
pub type GemResult<T> = Result<T, GemError>;
