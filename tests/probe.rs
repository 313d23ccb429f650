// ABOUTME: Integration tests for the port waiter and the HTTP liveness probe.
// ABOUTME: Uses real loopback listeners and a minimal HTTP responder.

mod support;

use cargolift::configuration::CPC_MARKER;
use cargolift::probe::*;
use std::time::{Duration, Instant};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// A port that nothing listens on.
async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

fn waiter() -> PortWaiter {
    PortWaiter::new("127.0.0.1").with_poll_interval(Duration::from_millis(20))
}

mod ports {
    use super::*;

    #[tokio::test]
    async fn closed_ports_return_immediately() {
        support::init_tracing();
        let port = closed_port().await.to_string();
        let start = Instant::now();

        waiter()
            .wait_for_port_shutdown(
                &[port.as_str(), "not-a-number", "999999"],
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        assert!(start.elapsed() < Duration::from_secs(2));
    }

    #[tokio::test]
    async fn open_port_times_out_naming_the_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let accept = tokio::spawn(async move {
            loop {
                if listener.accept().await.is_err() {
                    break;
                }
            }
        });

        let err = waiter()
            .wait_for_port_shutdown(&[port.to_string().as_str()], Duration::from_millis(200))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert!(matches!(err, WaitError::PortStillOpen { port: p, .. } if p == port));
        assert!(err.to_string().contains(&port.to_string()));
        accept.abort();
    }

    #[tokio::test]
    async fn port_closing_during_wait_is_detected() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let server = tokio::spawn(async move {
            let deadline = Instant::now() + Duration::from_millis(150);
            while Instant::now() < deadline {
                let _ = tokio::time::timeout(Duration::from_millis(20), listener.accept()).await;
            }
            // Listener dropped here, closing the port.
        });

        waiter()
            .wait_for_port_shutdown(&[port.to_string().as_str()], Duration::from_secs(5))
            .await
            .unwrap();
        server.await.unwrap();
    }

    #[tokio::test]
    async fn no_valid_ports_means_nothing_to_wait_for() {
        waiter()
            .wait_for_shutdown(&["", "abc", "0"], Duration::ZERO)
            .await
            .unwrap();
    }
}

mod liveness {
    use super::*;

    /// Serve `status` and `body` to every request until the task is aborted.
    async fn http_server(
        status: &'static str,
        body: &'static str,
    ) -> (u16, tokio::task::JoinHandle<()>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        let handle = tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    while let Ok(n) = stream.read(&mut buf).await {
                        if n == 0 {
                            return;
                        }
                        request.extend_from_slice(&buf[..n]);
                        if request.windows(4).any(|w| w == b"\r\n\r\n") {
                            break;
                        }
                    }
                    let response = format!(
                        "HTTP/1.1 {status}\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{body}",
                        body.len()
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });
        (port, handle)
    }

    fn monitor() -> UrlMonitor {
        UrlMonitor::new()
            .with_poll_interval(Duration::from_millis(20))
            .with_request_timeout(Duration::from_millis(500))
    }

    #[tokio::test]
    async fn healthy_server_is_alive() {
        support::init_tracing();
        let (port, server) = http_server("200 OK", "ok").await;
        let url = format!("http://127.0.0.1:{port}/cargocpc/index.html");

        assert!(monitor().ping(&url).await.unwrap());
        monitor()
            .wait_until_alive(&url, Duration::from_secs(5))
            .await
            .unwrap();
        server.abort();
    }

    #[tokio::test]
    async fn error_status_is_not_alive() {
        let (port, server) = http_server("404 Not Found", "ok").await;
        let url = format!("http://127.0.0.1:{port}/cargocpc/index.html");

        assert!(!monitor().ping(&url).await.unwrap());
        let err = monitor()
            .wait_until_alive(&url, Duration::from_millis(150))
            .await
            .unwrap_err();
        assert!(matches!(err, WaitError::NotAlive { .. }));
        server.abort();
    }

    #[tokio::test]
    async fn unrelated_server_without_marker_is_not_alive() {
        let (port, server) = http_server("200 OK", "<html>Welcome to nginx!</html>").await;
        let url = format!("http://127.0.0.1:{port}/cargocpc/index.html");
        let monitor = monitor().with_expected_content(CPC_MARKER);

        assert!(!monitor.ping(&url).await.unwrap());
        let err = monitor
            .wait_until_alive(&url, Duration::from_millis(150))
            .await
            .unwrap_err();
        assert!(err.is_timeout());
        server.abort();
    }

    #[tokio::test]
    async fn ping_component_page_is_alive() {
        let (port, server) = http_server(
            "200 OK",
            "<html><body>Cargo Ping Component used to verify if the container is started.</body></html>",
        )
        .await;
        let url = format!("http://127.0.0.1:{port}/cargocpc/index.html");

        assert!(monitor().with_expected_content(CPC_MARKER).ping(&url).await.unwrap());
        server.abort();
    }

    #[tokio::test]
    async fn closed_port_times_out_naming_the_url() {
        let port = closed_port().await;
        let url = format!("http://127.0.0.1:{port}/cargocpc/index.html");

        let err = monitor()
            .wait_until_alive(&url, Duration::from_millis(100))
            .await
            .unwrap_err();

        assert!(err.is_timeout());
        assert!(err.to_string().contains(&url));
    }

    #[tokio::test]
    async fn malformed_url_fails_fast() {
        let err = monitor()
            .wait_until_alive("not a url", Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(matches!(err, WaitError::InvalidUrl { .. }));
        assert!(!err.is_timeout());
    }
}
