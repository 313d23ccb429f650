// ABOUTME: Vendor-specific start/stop strategy plugged into the lifecycle.
// ABOUTME: Hooks get the container descriptor, its configuration and output settings.

use async_trait::async_trait;
use std::path::PathBuf;

use crate::configuration::LocalConfiguration;
use crate::registry::ContainerDescriptor;

/// Where the container's stdout/stderr go.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputSettings {
    pub path: Option<PathBuf>,
    /// Append to the output file instead of truncating it.
    pub append: bool,
}

/// Everything a hook may look at while launching or stopping a container.
pub struct LaunchContext<'a> {
    pub descriptor: &'a ContainerDescriptor,
    pub configuration: &'a dyn LocalConfiguration,
    pub output: &'a OutputSettings,
}

#[derive(Debug, thiserror::Error)]
pub enum HookError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Exit {
        program: String,
        status: std::process::ExitStatus,
    },

    #[error("cannot open output file {path}: {source}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to kill the container process: {0}")]
    Kill(#[source] std::io::Error),

    #[error("no stop command configured and no process started by this session")]
    NoStopCommand,

    #[error("{0}")]
    Other(String),
}

/// Vendor start/stop strategy.
#[async_trait]
pub trait LifecycleHooks: Send + Sync {
    /// Check the configuration before any transition. Defaults to accepting it.
    fn verify(&self, _context: &LaunchContext<'_>) -> Result<(), String> {
        Ok(())
    }

    /// Launch the container. Must return once the launch is underway.
    async fn start(&self, context: &LaunchContext<'_>) -> Result<(), HookError>;

    /// Ask the container to shut down.
    async fn stop(&self, context: &LaunchContext<'_>) -> Result<(), HookError>;
}
