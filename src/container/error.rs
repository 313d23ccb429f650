// ABOUTME: Lifecycle error types with SNAFU pattern.
// ABOUTME: Wraps configure, hook and wait failures with the container name and a log hint.

use snafu::Snafu;
use std::path::Path;

use super::hooks::HookError;
use super::state::State;
use crate::configuration::ConfigurationError;
use crate::probe::WaitError;

/// Underlying cause of a failed start or stop.
#[derive(Debug, thiserror::Error)]
pub enum LifecycleFailure {
    #[error(transparent)]
    Configure(#[from] ConfigurationError),

    #[error(transparent)]
    Hook(#[from] HookError),

    #[error(transparent)]
    Wait(#[from] WaitError),
}

/// Error raised by [`LocalContainer`](super::LocalContainer) transitions.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ContainerError {
    /// Verification rejected the configuration; the state is unchanged.
    #[snafu(display("invalid configuration for the {container} container: {reason}"))]
    Configuration { container: String, reason: String },

    #[snafu(display("cannot {action} the {container} container while it is {state}"))]
    InvalidState {
        container: String,
        action: &'static str,
        state: State,
    },

    #[snafu(display("Failed to start the {container} container.{hint}"))]
    StartFailed {
        container: String,
        hint: String,
        source: LifecycleFailure,
    },

    #[snafu(display("Failed to stop the {container} container.{hint}"))]
    StopFailed {
        container: String,
        hint: String,
        source: LifecycleFailure,
    },
}

/// Error kind for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerErrorKind {
    /// Verification failed before any transition.
    Configuration,
    /// The requested transition is not allowed from the current state.
    InvalidState,
    /// The container did not come up or go down in time.
    Timeout,
    /// Configuring or running a vendor hook failed.
    Failed,
}

impl ContainerError {
    /// Returns the error kind for programmatic handling.
    pub fn kind(&self) -> ContainerErrorKind {
        match self {
            ContainerError::Configuration { .. } => ContainerErrorKind::Configuration,
            ContainerError::InvalidState { .. } => ContainerErrorKind::InvalidState,
            ContainerError::StartFailed { source, .. } | ContainerError::StopFailed { source, .. } => {
                match source {
                    LifecycleFailure::Wait(e) if e.is_timeout() => ContainerErrorKind::Timeout,
                    _ => ContainerErrorKind::Failed,
                }
            }
        }
    }

    pub fn is_timeout(&self) -> bool {
        self.kind() == ContainerErrorKind::Timeout
    }
}

/// Suffix pointing at the container log file, or empty when there is none.
pub(crate) fn log_hint(output: Option<&Path>) -> String {
    match output {
        Some(path) => format!(
            " Check the [{}] file containing the container logs for more details.",
            path.display()
        ),
        None => String::new(),
    }
}
