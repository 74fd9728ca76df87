#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![deny(clippy::unwrap_used)]

//! Logging setup for Nodewire binaries.
//!
//! Library crates only emit `tracing` events; a binary calls [`init`] once
//! to route them to stderr, keeping stdout free for command output.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive, e.g. `client=debug`.
pub const LOG_ENV: &str = "NODEWIRE_LOG";

/// Filter applied when [`LOG_ENV`] is unset and no verbosity was requested.
pub const DEFAULT_FILTER: &str = "warn";

/// Fallback filter for a `-v` count: none, then `info`, `debug`, `trace`.
pub fn verbosity(count: u8) -> Option<&'static str> {
    match count {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Builds the filter: `NODEWIRE_LOG` wins, then `fallback`, then [`DEFAULT_FILTER`].
pub fn filter(fallback: Option<&str>) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        EnvFilter::try_new(fallback.unwrap_or(DEFAULT_FILTER))
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    })
}

/// Installs the global fmt subscriber writing to stderr.
///
/// Safe to call more than once; later calls are ignored.
pub fn init(fallback: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(fallback))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Emits a trace-level event tagged with `module`.
pub fn trace(module: &str, msg: &str) {
    tracing::trace!(module = module, "{}", msg);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_falls_back() {
        let f = filter(Some("client=debug"));
        assert!(f.to_string().contains("client=debug") || std::env::var(LOG_ENV).is_ok());
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(verbosity(0), None);
        assert_eq!(verbosity(1), Some("info"));
        assert_eq!(verbosity(2), Some("debug"));
        assert_eq!(verbosity(9), Some("trace"));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        init(None);
        init(Some("debug"));
        trace("test", "still alive");
    }
}
