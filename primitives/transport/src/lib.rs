#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `nodewire-transport` — The HTTP Seam
//!
//! This crate defines the **single point of I/O** for Nodewire.
//!
//! The client never opens a socket itself. It builds an [`HttpRequest`],
//! hands it to a [`Transport`], and receives an [`HttpResponse`] carrying
//! the status code and the raw body text. Everything above this seam
//! (header merging, number-safe decoding, status classification, timeouts)
//! is transport-agnostic, which is what lets tests substitute an in-memory
//! stub for the real network.
//!
//! ## Core Concepts
//!
//! ### `Transport` Trait
//! One asynchronous operation, [`Transport::send`]. A non-2xx status is a
//! perfectly good response at this layer; only failures to complete the
//! exchange at all are reported as [`TransportError`].
//!
//! Callers abort a request by dropping the future returned by `send`.
//! Implementations must not keep I/O running past that point.
//!
//! ### `DynTransport`
//! A type-erased (`Arc<dyn Transport>`) handle so the client can be built
//! over any backend without generic parameters.
//!
//! ## Example
//! ```no_run
//! use transport::{DynTransport, HttpRequest, Method, TransportError};
//!
//! async fn demo(transport: DynTransport) -> Result<(), TransportError> {
//!     let request = HttpRequest::new(Method::Get, "http://127.0.0.1:8500/v1/healthz");
//!     let response = transport.send(request).await?;
//!     println!("{} {}", response.status, response.body);
//!     Ok(())
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;

/// Type alias for structured error handling in transport operations.
pub type Result<T> = std::result::Result<T, TransportError>;

/// Failure to complete an HTTP exchange.
///
/// HTTP status codes are never errors here; a `500` is returned as an
/// ordinary [`HttpResponse`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The connection could not be established or was dropped mid-request.
    #[error("{0}")]
    Connect(String),

    /// The response arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Any other error not covered by the specific variants above.
    #[error("{0}")]
    Other(String),
}

/// HTTP verb. The node API only uses two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

impl Method {
    /// Upper-case wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// A fully-resolved request, ready to go on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Verb.
    pub method: Method,
    /// Absolute URL.
    pub url: String,
    /// Header names are lower-case.
    pub headers: BTreeMap<String, String>,
    /// Serialized JSON body, if any.
    pub body: Option<String>,
}

impl HttpRequest {
    /// Creates a request with no headers and no body.
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self { method, url: url.into(), headers: BTreeMap::new(), body: None }
    }

    /// Sets a header, lower-casing its name.
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Attaches a body.
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// What came back: a status and the raw body text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Body text, possibly empty.
    pub body: String,
}

impl HttpResponse {
    /// Convenience constructor.
    pub fn new(status: u16, body: impl Into<String>) -> Self { Self { status, body: body.into() } }
}

/// A backend that can perform one HTTP exchange.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs `request` and returns the response, whatever its status.
    ///
    /// Dropping the returned future must abort the exchange.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Short descriptor of the backend, used in logs.
    fn name(&self) -> &str;
}

/// Type alias for a shared, dynamically dispatched transport instance.
///
/// ```
/// use transport::DynTransport;
///
/// fn describe(t: &DynTransport) -> String {
///     format!("using {}", t.name())
/// }
/// ```
pub type DynTransport = Arc<dyn Transport>;

/// Gets a random free port assigned by the OS.
///
/// This function binds to `127.0.0.1:0`, which causes the OS to assign
/// an available port. The listener is then dropped and the port number
/// is returned. Handy for pointing a client at an address where nothing
/// is listening.
///
/// ```
/// use transport::get_random_free_port;
///
/// let port = get_random_free_port()?;
/// assert!(port > 0);
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn get_random_free_port() -> std::io::Result<u16> {
    let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
