use thiserror::Error;

use crate::events::TaskId;

/// Errors surfaced by simulation operations.
///
/// The first three are part of the fault model and may be observed (and
/// recovered from) by workload code; the rest indicate that the engine
/// itself can no longer continue and always halt the run as fatal.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// A send was attempted while a network outage window is open.
    #[error("network outage")]
    NetworkOutage,
    /// The fault model decided this send reports a failure to its caller.
    #[error("network error")]
    NetworkFailure,
    /// Raised by workload code; the engine carries it without interpreting it.
    #[error("{0}")]
    Workload(String),
    /// A resume event named a continuation the scheduler does not know.
    #[error("no continuation registered for task {0}")]
    UnknownTask(TaskId),
    /// Engine bookkeeping reached a state it cannot recover from.
    #[error("invalid simulation state: {0}")]
    InvalidState(String),
    /// The simulation world was dropped while an operation was pending.
    #[error("simulation has been shut down")]
    Shutdown,
}

impl SimError {
    /// True for errors that indicate a broken engine rather than an injected
    /// or workload-level fault. Fatal errors halt the run with reason
    /// `fatal`; everything else halts with reason `halt`.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SimError::UnknownTask(_) | SimError::InvalidState(_) | SimError::Shutdown
        )
    }
}

/// A type alias for `Result<T, SimError>`.
pub type SimResult<T> = Result<T, SimError>;
