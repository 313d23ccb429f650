// ABOUTME: Validated domain types shared across the crate.
// ABOUTME: Container identifiers and normalized web context paths.

mod container_id;
mod web_context;

pub use container_id::{ContainerId, ContainerIdError};
pub use web_context::{ROOT_CONTEXT_NAME, WebContext};
