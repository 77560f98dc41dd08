//! Error types shared by the console, the line queue and the scheduler.

use thiserror::Error;

/// Errors reported by console operations.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// `start` was called while a schedule is already running.
    #[error("update schedule is already running")]
    AlreadyRunning,

    /// `stop` was called while no schedule is running.
    #[error("update schedule is not running")]
    NotRunning,

    /// `start` was called before a callback was configured.
    #[error("no update callback has been configured")]
    NotConfigured,

    /// A periodic or delayed callback returned an error or panicked.
    #[error("update callback failed: {0:#}")]
    CallbackFailure(anyhow::Error),

    /// The background thread could not be spawned.
    #[error("failed to spawn update thread: {0}")]
    Spawn(#[from] std::io::Error),

    /// The display surface has not been attached yet.
    #[error("display surface is not available; call `run` first")]
    SurfaceUnavailable,

    /// No line was committed before the read deadline.
    #[error("timed out waiting for an input line")]
    Timeout,

    /// The line queue was closed while waiting.
    #[error("line read was cancelled")]
    Cancelled,
}

/// Result alias used across the crate.
pub type Result<T, E = ConsoleError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callback_failure_message_includes_cause() {
        let err = ConsoleError::CallbackFailure(anyhow::anyhow!("disk full"));
        assert_eq!(err.to_string(), "update callback failed: disk full");
    }

    #[test]
    fn test_surface_unavailable_message() {
        let err = ConsoleError::SurfaceUnavailable;
        assert!(err.to_string().contains("run"));
    }
}
