#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! # `nodewire-client` — Typed Node Client
//!
//! An async client for a Lightning node's JSON-over-HTTP control API.
//!
//! ## Layers
//!
//! - [`Executor`]: turns `(method, path, body)` into a response. It rejects
//!   request integers outside the safe-double range before any I/O, races
//!   the transport against an optional timeout and [`CancellationToken`],
//!   and classifies the status code. Nothing is ever retried.
//! - [`NodeClient`]: one method per endpoint, each a fixed verb, path and
//!   body shape fed to the executor, with the decoded body narrowed into
//!   the matching [`api::http`] type.
//! - [`EventLoop`]: the deliver/acknowledge protocol over the two event
//!   endpoints.
//!
//! ## Example
//! ```no_run
//! use std::time::Duration;
//!
//! use client::{NodeClient, RequestOptions};
//!
//! # async fn demo() -> client::Result<()> {
//! let node = NodeClient::new("http://127.0.0.1:8500/api/v1")?;
//! let opts = RequestOptions::new().with_timeout(Duration::from_secs(5));
//!
//! let balances = node.balances(&opts).await?;
//! println!("lightning: {} sats", balances.total_lightning_balance_sats);
//!
//! if let Some(p) = node.payment("00ff", &opts).await? {
//!     println!("{} {:?}", p.id, p.amount_msat);
//! }
//! # Ok(())
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

pub use tokio_util::sync::CancellationToken;
use transport::DynTransport;

mod endpoints;
mod error;
pub mod events;
mod executor;
mod options;

pub use error::{Error, ErrorBody, HttpError, Result};
pub use events::{EventLoop, EventState};
pub use executor::Executor;
pub use options::{NotFound, RequestOptions};

/// `user-agent` sent unless overridden.
pub const DEFAULT_USER_AGENT: &str = concat!("nodewire/", env!("CARGO_PKG_VERSION"));

/// Construction parameters for [`NodeClient`].
#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    /// API root, e.g. `http://127.0.0.1:8500/api/v1`.
    pub base_url: String,
    /// Headers added to every call, below per-call overrides.
    pub default_headers: BTreeMap<String, String>,
    /// Overrides [`DEFAULT_USER_AGENT`].
    pub user_agent: Option<String>,
}

impl ClientConfig {
    /// Config with just a base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), ..Self::default() }
    }
}

/// Client for the node's HTTP API.
///
/// Configuration is fixed at construction; clones share the transport and
/// may be used concurrently.
#[derive(Clone)]
pub struct NodeClient {
    executor: Executor,
}

impl NodeClient {
    /// Client over the default reqwest transport.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::from_config(ClientConfig::new(base_url), None)
    }

    /// Client over an explicit transport.
    pub fn with_transport(base_url: impl Into<String>, transport: DynTransport) -> Result<Self> {
        Self::from_config(ClientConfig::new(base_url), Some(transport))
    }

    /// Client from a full config. Without a transport, the reqwest backend is used.
    pub fn from_config(config: ClientConfig, transport: Option<DynTransport>) -> Result<Self> {
        let base_url = config.base_url.trim();
        if base_url.is_empty() {
            return Err(Error::InvalidArgument("base URL is required".to_string()));
        }
        let base_url = base_url.strip_suffix('/').unwrap_or(base_url).to_string();

        let mut headers = BTreeMap::new();
        headers.insert(
            "user-agent".to_string(),
            config.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        );
        headers.extend(config.default_headers);

        let transport =
            transport.unwrap_or_else(|| Arc::new(nodewire_http::ReqwestTransport::new()));
        Ok(Self { executor: Executor::new(base_url, headers, transport) })
    }

    /// The underlying executor, for calls this client has no method for.
    pub fn executor(&self) -> &Executor { &self.executor }

    /// The API root in use.
    pub fn base_url(&self) -> &str { self.executor.base_url() }

    /// Starts an event loop borrowing this client.
    pub fn event_loop(&self) -> EventLoop<'_> { EventLoop::new(self) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trimmed() {
        let node = NodeClient::new("http://127.0.0.1:8500/api/v1/").expect("valid");
        assert_eq!(node.base_url(), "http://127.0.0.1:8500/api/v1");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        assert!(matches!(NodeClient::new(""), Err(Error::InvalidArgument(_))));
        assert!(matches!(NodeClient::new("   "), Err(Error::InvalidArgument(_))));
    }
}
