#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Request and response types for the node's HTTP control API.
//!
//! Response amounts are [`numeric::Int`] so that values beyond the
//! safe-double-integer range survive decoding; request amounts are plain
//! `u64` and are range-checked when the request is encoded.

pub mod http;

/// API version segment of every endpoint path.
pub const API_VERSION: &str = "v1";

/// Crate version of `nodewire-api`.
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Appends the versioned API prefix to a node's base URL.
///
/// ```
/// assert_eq!(api::api_root("http://127.0.0.1:8500/"), "http://127.0.0.1:8500/api/v1");
/// ```
pub fn api_root(node_url: &str) -> String {
    format!("{}/api/{}", node_url.trim_end_matches('/'), API_VERSION)
}
