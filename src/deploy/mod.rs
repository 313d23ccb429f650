// ABOUTME: Deployment of artifacts into local containers.
// ABOUTME: Exports the deployable model, the copying deployer and its context registry.

mod deployable;
mod deployer;
mod ear;
mod error;
mod registry;

pub use deployable::{Deployable, DeployableType, Ear, Module, War};
pub use deployer::{CopyPlan, CopyingDeployer};
pub use error::{DeployError, DescriptorError};
pub use registry::DeployedRegistry;
