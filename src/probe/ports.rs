// ABOUTME: Port shutdown detection by repeatedly connecting until the port refuses.
// ABOUTME: Skips unparseable ports and fails with the offending port once the deadline passes.

use async_trait::async_trait;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::Instant;

use super::{POLL_INTERVAL, ShutdownWaiter, WaitError};

/// Connect timeout used once a port has been seen closed.
///
/// The first attempt relies on the OS default; a closed port answering fast
/// shows that short timeouts are safe for the remaining ports.
pub const ESCALATED_CONNECT_TIMEOUT: Duration = Duration::from_millis(250);

/// Parse port strings, dropping anything that is not a number in 1–65535.
pub fn parse_ports(ports: &[&str]) -> Vec<u16> {
    ports
        .iter()
        .filter_map(|p| match p.trim().parse::<u16>() {
            Ok(0) | Err(_) => {
                tracing::warn!("Skipping invalid port [{}]", p);
                None
            }
            Ok(port) => Some(port),
        })
        .collect()
}

/// Polls TCP ports on a host until each one stops accepting connections.
#[derive(Debug, Clone)]
pub struct PortWaiter {
    host: String,
    poll_interval: Duration,
    escalated_connect_timeout: Duration,
}

impl Default for PortWaiter {
    fn default() -> Self {
        Self::new("localhost")
    }
}

impl PortWaiter {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            poll_interval: POLL_INTERVAL,
            escalated_connect_timeout: ESCALATED_CONNECT_TIMEOUT,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_escalated_connect_timeout(mut self, timeout: Duration) -> Self {
        self.escalated_connect_timeout = timeout;
        self
    }

    /// Wait for every valid port in `ports` to close, sharing one deadline.
    ///
    /// # Errors
    ///
    /// Returns [`WaitError::PortStillOpen`] naming the first port still
    /// accepting connections when the deadline passes.
    pub async fn wait_for_port_shutdown(
        &self,
        ports: &[&str],
        timeout: Duration,
    ) -> Result<(), WaitError> {
        let deadline = Instant::now() + timeout;
        let mut connect_timeout = None;

        for port in parse_ports(ports) {
            self.wait_for_port(port, connect_timeout, deadline, timeout)
                .await?;
            connect_timeout = Some(self.escalated_connect_timeout);
        }
        Ok(())
    }

    async fn wait_for_port(
        &self,
        port: u16,
        connect_timeout: Option<Duration>,
        deadline: Instant,
        timeout: Duration,
    ) -> Result<(), WaitError> {
        loop {
            if !self.accepts_connection(port, connect_timeout).await {
                tracing::debug!("Port {} on {} is closed", port, self.host);
                return Ok(());
            }
            if Instant::now() > deadline {
                return Err(WaitError::PortStillOpen { port, timeout });
            }
            tracing::debug!("Port {} still open, retrying", port);
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn accepts_connection(&self, port: u16, connect_timeout: Option<Duration>) -> bool {
        let connect = TcpStream::connect((self.host.as_str(), port));
        let result = match connect_timeout {
            Some(limit) => match tokio::time::timeout(limit, connect).await {
                Ok(result) => result,
                Err(_elapsed) => return false,
            },
            None => connect.await,
        };
        // The stream is dropped here, closing the probe connection.
        result.is_ok()
    }
}

#[async_trait]
impl ShutdownWaiter for PortWaiter {
    async fn wait_for_shutdown(&self, ports: &[&str], timeout: Duration) -> Result<(), WaitError> {
        self.wait_for_port_shutdown(ports, timeout).await
    }
}
