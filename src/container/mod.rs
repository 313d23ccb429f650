// ABOUTME: Local container lifecycle: states, capabilities, hooks and the state machine.
// ABOUTME: Re-exports the public surface used by commands and library callers.

mod capability;
mod error;
mod hooks;
mod lifecycle;
mod process;
mod state;

pub use capability::ContainerCapability;
pub use error::{ContainerError, ContainerErrorKind, LifecycleFailure};
pub use hooks::{HookError, LaunchContext, LifecycleHooks, OutputSettings};
pub use lifecycle::{DEFAULT_STOP_GRACE, DEFAULT_TIMEOUT, LocalContainer};
pub use process::{CommandSpec, ProcessHooks, expand_placeholders};
pub use state::State;
