//! Shared utilities for integration testing.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use prefetch_proxy::config::ProxyConfig;
use prefetch_proxy::{HttpServer, Shutdown};

/// One canned origin response.
#[derive(Clone)]
pub struct OriginReply {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
    /// Pause before any response bytes are written.
    pub delay: Duration,
    /// Write the body in two parts with a pause in between, forcing the
    /// proxy to observe a chunk boundary at this byte offset.
    pub split_at: Option<usize>,
}

impl OriginReply {
    pub fn new(status: u16, content_type: &str, body: &[u8]) -> Self {
        Self {
            status,
            content_type: content_type.to_string(),
            body: body.to_vec(),
            delay: Duration::ZERO,
            split_at: None,
        }
    }

    pub fn html(body: &str) -> Self {
        Self::new(200, "text/html; charset=utf-8", body.as_bytes())
    }

    #[allow(dead_code)]
    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    #[allow(dead_code)]
    pub fn split_at(mut self, offset: usize) -> Self {
        self.split_at = Some(offset);
        self
    }
}

/// A mock origin recording the paths it was asked for.
pub struct MockOrigin {
    pub addr: SocketAddr,
    hits: Arc<Mutex<Vec<String>>>,
}

impl MockOrigin {
    /// Request paths seen so far, in arrival order.
    pub fn hits(&self) -> Vec<String> {
        self.hits.lock().unwrap().clone()
    }
}

/// Start a mock origin; `reply_for` maps a request path to a reply.
pub async fn start_origin<F>(reply_for: F) -> MockOrigin
where
    F: Fn(&str) -> OriginReply + Send + Sync + 'static,
{
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let hits = Arc::new(Mutex::new(Vec::new()));
    let recorded = hits.clone();
    let reply_for = Arc::new(reply_for);

    tokio::spawn(async move {
        loop {
            let Ok((mut socket, _)) = listener.accept().await else {
                break;
            };
            let recorded = recorded.clone();
            let reply_for = reply_for.clone();
            tokio::spawn(async move {
                let mut head = Vec::new();
                let mut buf = [0u8; 1024];
                // Read until the end of the request head; these requests
                // carry no body.
                while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                    match socket.read(&mut buf).await {
                        Ok(0) | Err(_) => return,
                        Ok(n) => head.extend_from_slice(&buf[..n]),
                    }
                }
                let head = String::from_utf8_lossy(&head);
                let path = head
                    .lines()
                    .next()
                    .and_then(|line| line.split_whitespace().nth(1))
                    .unwrap_or("/")
                    .to_string();
                recorded.lock().unwrap().push(path.clone());

                let reply = reply_for(&path);
                if !reply.delay.is_zero() {
                    tokio::time::sleep(reply.delay).await;
                }

                let status_text = match reply.status {
                    200 => "200 OK",
                    404 => "404 Not Found",
                    500 => "500 Internal Server Error",
                    _ => "200 OK",
                };
                let head = format!(
                    "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                    status_text,
                    reply.content_type,
                    reply.body.len()
                );
                let _ = socket.write_all(head.as_bytes()).await;
                match reply.split_at {
                    Some(offset) if offset < reply.body.len() => {
                        let _ = socket.write_all(&reply.body[..offset]).await;
                        let _ = socket.flush().await;
                        tokio::time::sleep(Duration::from_millis(100)).await;
                        let _ = socket.write_all(&reply.body[offset..]).await;
                    }
                    _ => {
                        let _ = socket.write_all(&reply.body).await;
                    }
                }
                let _ = socket.flush().await;
                let _ = socket.shutdown().await;
            });
        }
    });

    MockOrigin { addr, hits }
}

/// Start the proxy in front of `origin_addr` on an ephemeral port.
///
/// The returned join handle resolves only after shutdown has been
/// triggered *and* all background cache warming has settled.
pub async fn start_proxy(
    origin_addr: SocketAddr,
) -> (SocketAddr, Shutdown, JoinHandle<Result<(), std::io::Error>>) {
    let mut config = ProxyConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.origin.scheme = "http".to_string();
    config.origin.host = origin_addr.to_string();

    let listener = TcpListener::bind(&config.listener.bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config).unwrap();
    let receiver = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, receiver).await });

    (addr, shutdown, handle)
}
