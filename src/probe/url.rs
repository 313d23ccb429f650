// ABOUTME: HTTP liveness probe that polls a URL until it answers with a non-error status and expected content.
// ABOUTME: Uses a plain hyper HTTP/1 connection per attempt.

use async_trait::async_trait;
use bytes::Bytes;
use http_body_util::{BodyExt, Empty};
use hyper::{StatusCode, Uri};
use hyper_util::rt::TokioIo;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::time::Instant;

use super::{LivenessProbe, POLL_INTERVAL, WaitError};

type PingError = Box<dyn std::error::Error + Send + Sync>;

/// Polls an `http://` URL until it answers with a status below 400.
///
/// With expected content set, the body must also contain that text, so an
/// unrelated server on the same port is not mistaken for the container.
#[derive(Debug, Clone)]
pub struct UrlMonitor {
    poll_interval: Duration,
    request_timeout: Duration,
    expected_content: Option<String>,
}

impl Default for UrlMonitor {
    fn default() -> Self {
        Self {
            poll_interval: POLL_INTERVAL,
            request_timeout: Duration::from_secs(5),
            expected_content: None,
        }
    }
}

impl UrlMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_expected_content(mut self, content: impl Into<String>) -> Self {
        self.expected_content = Some(content.into());
        self
    }

    /// Ping `url` once.
    ///
    /// Returns `Ok(false)` when the server is unreachable, answers with an
    /// error status or lacks the expected content; only a malformed URL is an
    /// error.
    pub async fn ping(&self, url: &str) -> Result<bool, WaitError> {
        let uri = parse_http_uri(url)?;
        Ok(self.ping_uri(&uri).await)
    }

    async fn ping_uri(&self, uri: &Uri) -> bool {
        match tokio::time::timeout(self.request_timeout, fetch(uri)).await {
            Ok(Ok((status, body))) => {
                tracing::debug!("Ping [{}] answered {}", uri, status);
                status.as_u16() < 400 && self.has_expected_content(uri, &body)
            }
            Ok(Err(e)) => {
                tracing::debug!("Ping [{}] failed: {}", uri, e);
                false
            }
            Err(_elapsed) => {
                tracing::debug!("Ping [{}] timed out", uri);
                false
            }
        }
    }
}

impl UrlMonitor {
    fn has_expected_content(&self, uri: &Uri, body: &[u8]) -> bool {
        let Some(expected) = &self.expected_content else {
            return true;
        };
        let found = String::from_utf8_lossy(body).contains(expected.as_str());
        if !found {
            tracing::debug!("Ping [{}] answered without [{}]", uri, expected);
        }
        found
    }
}

#[async_trait]
impl LivenessProbe for UrlMonitor {
    async fn wait_until_alive(&self, url: &str, timeout: Duration) -> Result<(), WaitError> {
        let uri = parse_http_uri(url)?;
        let deadline = Instant::now() + timeout;

        loop {
            if self.ping_uri(&uri).await {
                return Ok(());
            }
            let now = Instant::now();
            if now >= deadline {
                return Err(WaitError::NotAlive {
                    url: url.to_string(),
                    timeout,
                });
            }
            tokio::time::sleep(self.poll_interval.min(deadline - now)).await;
        }
    }
}

fn parse_http_uri(url: &str) -> Result<Uri, WaitError> {
    let invalid = |reason: &str| WaitError::InvalidUrl {
        url: url.to_string(),
        reason: reason.to_string(),
    };
    let uri: Uri = url.parse().map_err(|_| invalid("not a valid URI"))?;
    if uri.scheme_str() != Some("http") {
        return Err(invalid("only http:// URLs are supported"));
    }
    if uri.host().is_none() {
        return Err(invalid("missing host"));
    }
    Ok(uri)
}

async fn fetch(uri: &Uri) -> Result<(StatusCode, Bytes), PingError> {
    let host = uri.host().ok_or("missing host")?;
    let port = uri.port_u16().unwrap_or(80);
    let stream = TcpStream::connect((host, port)).await?;
    let io = TokioIo::new(stream);

    let (mut sender, conn) = hyper::client::conn::http1::handshake(io).await?;
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            tracing::debug!("ping connection error: {}", e);
        }
    });

    let path = uri.path_and_query().map(|p| p.as_str()).unwrap_or("/");
    let authority = uri.authority().map(|a| a.as_str()).unwrap_or(host);
    let req = hyper::Request::builder()
        .method("GET")
        .uri(path)
        .header(hyper::header::HOST, authority)
        .body(Empty::<Bytes>::new())?;

    let resp = sender.send_request(req).await?;
    let status = resp.status();
    let body = resp.into_body().collect().await?.to_bytes();
    Ok((status, body))
}
