// SPDX-License-Identifier: CC0-1.0

//! Nodewire umbrella crate.
//!
//! Re-exports the pieces an application needs to talk to a node:
//! [`NodeClient`] and its options, the wire DTOs in [`api`], the lossless
//! integer codec in [`numeric`] and the [`transport`] seam for plugging in
//! another HTTP backend.
//!
//! ```no_run
//! use nodewire::{NodeClient, RequestOptions};
//!
//! # async fn demo() -> nodewire::client::Result<()> {
//! let node = NodeClient::new(nodewire::api::api_root("http://127.0.0.1:8500"))?;
//! let status = node.status(&RequestOptions::new()).await?;
//! println!("height {}", status.best_block_height);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]
#![doc(test(attr(warn(unused))))]

pub use {api, client, numeric, transport};

pub use client::{CancellationToken, Error, EventLoop, NodeClient, RequestOptions};

/// Miscellaneous metadata about the Nodewire workspace.
pub mod meta {
    /// Version string for the umbrella crate, as reported by Cargo.
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    /// API version segment the client targets.
    pub const API_VERSION: &str = api::API_VERSION;
}
