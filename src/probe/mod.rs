// ABOUTME: Readiness and shutdown detection for local containers.
// ABOUTME: Polls the ping component over HTTP on start and TCP ports on stop.

mod ports;
mod url;

pub use ports::{ESCALATED_CONNECT_TIMEOUT, PortWaiter, parse_ports};
pub use url::UrlMonitor;

use async_trait::async_trait;
use std::time::Duration;

/// Interval between two polls of a port or URL.
pub const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Errors from waiting on a container.
#[derive(Debug, thiserror::Error)]
pub enum WaitError {
    /// A port kept accepting connections past the deadline.
    #[error("server port {port} did not shutdown within the timeout period [{timeout:?}]")]
    PortStillOpen { port: u16, timeout: Duration },

    /// The URL never answered successfully before the deadline.
    #[error("[{url}] did not answer within the timeout period [{timeout:?}]")]
    NotAlive { url: String, timeout: Duration },

    #[error("invalid probe URL [{url}]: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl WaitError {
    /// Whether the wait gave up because its deadline passed.
    pub fn is_timeout(&self) -> bool {
        matches!(
            self,
            WaitError::PortStillOpen { .. } | WaitError::NotAlive { .. }
        )
    }
}

/// Waits until a deployed component answers.
#[async_trait]
pub trait LivenessProbe: Send + Sync {
    async fn wait_until_alive(&self, url: &str, timeout: Duration) -> Result<(), WaitError>;
}

/// Waits until the container's ports stop accepting connections.
#[async_trait]
pub trait ShutdownWaiter: Send + Sync {
    /// Invalid or out-of-range port strings are skipped.
    async fn wait_for_shutdown(&self, ports: &[&str], timeout: Duration) -> Result<(), WaitError>;
}
