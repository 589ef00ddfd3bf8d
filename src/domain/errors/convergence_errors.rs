use std::time::Duration;

use crate::domain::errors::StorageError;

/// Outcome of a single convergence probe against an eventually consistent
/// endpoint.
#[derive(Debug)]
pub enum ProbeError {
    /// The write is not yet observable; the poller should retry.
    NotYetVisible,

    /// A real API failure; the poller must stop immediately.
    Permanent(StorageError),
}

/// Errors surfaced by the convergence poller
#[derive(Debug)]
pub enum ConvergenceError {
    /// The endpoint did not converge within the configured elapsed-time budget
    TimedOut { waited: Duration },

    /// A probe failed with a non-retryable error
    Permanent(StorageError),
}

impl std::fmt::Display for ConvergenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvergenceError::TimedOut { waited } => {
                write!(
                    f,
                    "Endpoint did not converge within deadline (waited {:?})",
                    waited
                )
            }
            ConvergenceError::Permanent(err) => {
                write!(f, "Convergence probe failed: {}", err)
            }
        }
    }
}

impl std::error::Error for ConvergenceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConvergenceError::TimedOut { .. } => None,
            ConvergenceError::Permanent(err) => Some(err),
        }
    }
}
