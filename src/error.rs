//! Typed error kinds a caller needs to match on, as opposed to the
//! `anyhow::Error` used at call sites that merely need to propagate and
//! display a failure.

use thiserror::Error;

/// Lifecycle state a [`crate::core::CoreHandle`] was in when a
/// [`LifecycleState`]-violating call was attempted.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("operation `{attempted}` is not legal in state `{current:?}`")]
    WrongState {
        attempted: &'static str,
        current: crate::core::LifecycleState,
    },

    #[error("core ABI violation: {0}")]
    AbiViolation(String),

    #[error("content error: {0}")]
    Content(String),

    #[error("failed to load core: {0}")]
    CoreLoad(String),

    #[error("core reported a fatal condition: {0}")]
    Fatal(String),
}

impl SessionError {
    pub fn wrong_state(attempted: &'static str, current: crate::core::LifecycleState) -> Self {
        Self::WrongState { attempted, current }
    }
}
