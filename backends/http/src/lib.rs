#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `nodewire-http` — reqwest Transport Backend
//!
//! Concrete implementation of [`transport::Transport`] over
//! [`reqwest::Client`]. It moves bytes and nothing else: no status
//! classification, no JSON parsing, no timeouts. Those belong to the
//! client's executor, which races this backend against its own timer and
//! cancellation token and simply drops the future to abort.
//!
//! ## Example
//! ```no_run
//! use nodewire_http::ReqwestTransport;
//! use transport::{HttpRequest, Method, Transport};
//!
//! # tokio::runtime::Runtime::new().unwrap().block_on(async {
//! let transport = ReqwestTransport::new();
//! let response = transport
//!     .send(HttpRequest::new(Method::Get, "http://127.0.0.1:8500/v1/healthz"))
//!     .await
//!     .unwrap();
//! println!("{} {}", response.status, response.body);
//! # });
//! ```

use async_trait::async_trait;
use transport::{HttpRequest, HttpResponse, Method, Transport, TransportError};

/// [`Transport`] backed by a shared [`reqwest::Client`].
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Creates a transport with a default client.
    pub fn new() -> Self { Self::default() }

    /// Wraps an existing client, e.g. one configured with a proxy or custom TLS roots.
    pub fn with_client(client: reqwest::Client) -> Self { Self { client } }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        logging::trace("HTTP", &format!("→ {} {}", request.method, request.url));

        let mut req = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            req = req.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            req = req.body(body);
        }

        let resp = req.send().await.map_err(|e| {
            tracing::debug!("HTTP Transport - Request failed: {}", e);
            TransportError::Connect(e.to_string())
        })?;
        let status = resp.status().as_u16();

        let body = resp.text().await.map_err(|e| {
            tracing::debug!("HTTP Transport - Failed to read body: {}", e);
            TransportError::Body(e.to_string())
        })?;

        logging::trace("HTTP", &format!("← {} ({} bytes)", status, body.len()));
        Ok(HttpResponse { status, body })
    }

    fn name(&self) -> &str { "reqwest" }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use transport::get_random_free_port;

    use super::*;

    #[tokio::test]
    async fn test_send_connection_refused() {
        let port = get_random_free_port().expect("free port");
        let transport = ReqwestTransport::new();
        let result = transport
            .send(HttpRequest::new(Method::Get, format!("http://127.0.0.1:{}/v1/healthz", port)))
            .await;

        match result {
            Err(TransportError::Connect(msg)) => assert!(!msg.is_empty()),
            other => panic!("expected a connect error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_send_returns_status_and_body() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.expect("accept");
            let mut buf = vec![0u8; 4096];
            let n = socket.read(&mut buf).await.expect("read");
            let request = String::from_utf8_lossy(&buf[..n]).to_string();

            let body = r#"{"error":"insufficient balance"}"#;
            let response = format!(
                "HTTP/1.1 400 Bad Request\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.expect("write");
            request
        });

        let transport = ReqwestTransport::new();
        let resp = transport
            .send(
                HttpRequest::new(Method::Post, format!("http://{}/v1/bolt11/pay", addr))
                    .header("X-Request-Tag", "abc")
                    .body("{}"),
            )
            .await
            .expect("a 400 is still a response");

        assert_eq!(resp.status, 400);
        assert_eq!(resp.body, r#"{"error":"insufficient balance"}"#);

        let seen = server.await.expect("server task").to_ascii_lowercase();
        assert!(seen.starts_with("post /v1/bolt11/pay"));
        assert!(seen.contains("x-request-tag: abc"));
    }

    #[test]
    fn test_name() {
        assert_eq!(ReqwestTransport::new().name(), "reqwest");
    }
}
