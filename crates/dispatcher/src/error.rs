//! Dispatcher error types

use thiserror::Error;

/// Dispatcher-specific errors
///
/// Codec failures never show up here; they are per-message outcomes.
#[derive(Debug, Error)]
pub enum DispatcherError {
    /// `start` called on a dispatcher that already left `Idle`
    #[error("dispatcher already started (state {state})")]
    AlreadyStarted { state: String },

    /// A zero tick period cannot drive the timer
    #[error("dispatch interval must be greater than zero")]
    ZeroInterval,

    /// `run` called before `start`
    #[error("dispatcher not started")]
    NotStarted,

    /// The message batch could not be built
    #[error("bootstrap failed: {0}")]
    Bootstrap(#[from] contracts::ContractError),

    /// The background dispatch task panicked or was aborted
    #[error("dispatch task failed: {message}")]
    TaskFailed { message: String },
}

impl DispatcherError {
    pub fn task_failed(message: impl Into<String>) -> Self {
        Self::TaskFailed {
            message: message.into(),
        }
    }
}
