// ABOUTME: Container configuration contract and the well-known property keys.
// ABOUTME: A configuration owns a home directory, a property map and an auto-deploy list.

mod standalone;

pub use standalone::{CPC_CONTEXT, CPC_MARKER, StandaloneConfiguration};

use std::path::{Path, PathBuf};

use crate::deploy::{DeployError, Deployable};
use crate::fs::FsError;
use crate::registry::ContainerDescriptor;

/// Port the container serves HTTP on.
pub const SERVLET_PORT: &str = "cargo.servlet.port";
/// Port of the container's RMI/admin listener.
pub const RMI_PORT: &str = "cargo.rmi.port";
/// Host the container binds to.
pub const HOSTNAME: &str = "cargo.hostname";

pub const DEFAULT_SERVLET_PORT: &str = "8080";
pub const DEFAULT_RMI_PORT: &str = "1099";
pub const DEFAULT_HOSTNAME: &str = "localhost";

#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    Fs(#[from] FsError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error("failed to build the ping component: {0}")]
    PingComponent(#[from] zip::result::ZipError),

    #[error("failed to build the ping component: {0}")]
    PingComponentIo(#[from] std::io::Error),

    #[error("invalid configuration home [{0}]")]
    InvalidHome(PathBuf),
}

/// What a local container needs from its configuration.
pub trait LocalConfiguration: Send + Sync {
    /// Directory holding the container's configuration and deployables.
    fn home(&self) -> &Path;

    fn property(&self, key: &str) -> Option<&str>;

    /// Deployables installed by [`configure`](Self::configure), in order.
    fn deployables(&self) -> &[Deployable];

    /// Materialize the configuration on disk for `container`.
    fn configure(&self, container: &ContainerDescriptor) -> Result<(), ConfigurationError>;
}

pub fn servlet_port(config: &dyn LocalConfiguration) -> &str {
    config.property(SERVLET_PORT).unwrap_or(DEFAULT_SERVLET_PORT)
}

pub fn rmi_port(config: &dyn LocalConfiguration) -> &str {
    config.property(RMI_PORT).unwrap_or(DEFAULT_RMI_PORT)
}

pub fn hostname(config: &dyn LocalConfiguration) -> &str {
    config.property(HOSTNAME).unwrap_or(DEFAULT_HOSTNAME)
}

/// URL of the ping component installed by the configuration.
pub fn cpc_url(config: &dyn LocalConfiguration) -> String {
    format!(
        "http://{}:{}/{}/index.html",
        hostname(config),
        servlet_port(config),
        CPC_CONTEXT
    )
}
