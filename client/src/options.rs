//! Per-call request options.

use std::collections::BTreeMap;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Knobs for a single call. Cheap to clone; nothing here outlives the call.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Aborts the call once elapsed. `None` or zero disables the timer.
    pub timeout: Option<Duration>,
    /// Header overrides, applied last. Names are lower-cased on insert.
    pub headers: BTreeMap<String, String>,
    /// External cancellation handle.
    pub cancel: Option<CancellationToken>,
}

impl RequestOptions {
    /// No timeout, no extra headers, not cancellable.
    pub fn new() -> Self { Self::default() }

    /// Sets the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a header override.
    pub fn with_header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers.insert(name.as_ref().to_ascii_lowercase(), value.into());
        self
    }

    /// Attaches a cancellation token.
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// The timeout, if one is armed.
    pub(crate) fn effective_timeout(&self) -> Option<Duration> {
        self.timeout.filter(|d| !d.is_zero())
    }
}

/// What a `404 Not Found` means for a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NotFound {
    /// An ordinary HTTP error.
    #[default]
    Error,
    /// The resource does not exist; the call yields `None`.
    Absent,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let token = CancellationToken::new();
        let opts = RequestOptions::new()
            .with_timeout(Duration::from_millis(50))
            .with_header("X-Api-Key", "k")
            .with_cancel(token.clone());

        assert_eq!(opts.effective_timeout(), Some(Duration::from_millis(50)));
        assert_eq!(opts.headers.get("x-api-key").map(String::as_str), Some("k"));
        token.cancel();
        assert!(opts.cancel.as_ref().is_some_and(CancellationToken::is_cancelled));
    }

    #[test]
    fn test_zero_timeout_disarmed() {
        let opts = RequestOptions::new().with_timeout(Duration::ZERO);
        assert_eq!(opts.effective_timeout(), None);
        assert_eq!(RequestOptions::new().effective_timeout(), None);
    }
}
