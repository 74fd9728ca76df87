//! Client error taxonomy.

use std::fmt;

use numeric::{EncodingRangeError, Value};
use transport::TransportError;

/// Type alias for results of client operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything a client call can fail with.
///
/// No variant is ever retried by the client; recovery is the caller's call.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An outgoing integer would lose precision on the wire. Raised before any I/O.
    #[error(transparent)]
    EncodingRange(#[from] EncodingRangeError),

    /// The request body could not be serialized at all. Raised before any I/O.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The node answered with a failing status, or could not be reached.
    #[error(transparent)]
    Http(#[from] HttpError),

    /// The call was cancelled by the caller's token or by its own timeout.
    ///
    /// Both causes surface identically; a caller that needs to tell them
    /// apart can check its own token afterwards.
    #[error("Request aborted")]
    Cancelled,

    /// A successful body did not have the endpoint's declared shape.
    #[error("unexpected response shape from {path}: {reason}")]
    Shape {
        /// Endpoint path.
        path: String,
        /// What did not match.
        reason: String,
    },

    /// Caller input rejected before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The event loop was asked for a new event while one was still unacknowledged.
    #[error("protocol violation: {0}")]
    ProtocolViolation(String),

    /// A caller-supplied event handler failed; the event was left unacknowledged.
    #[error("event handler failed: {0}")]
    Handler(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// HTTP status, for errors that reached the HTTP layer.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Http(e) => e.status,
            _ => None,
        }
    }

    /// `true` for [`Error::Cancelled`].
    pub fn is_cancelled(&self) -> bool { matches!(self, Error::Cancelled) }

    /// Wraps a handler failure for [`crate::EventLoop::watch`].
    pub fn handler(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Error::Handler(err.into())
    }
}

/// Failure reported by, or on the way to, the node.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpError {
    /// Node-supplied `error` text, or `HTTP <status>`, or the network cause.
    pub message: String,
    /// Present only if a status line was received.
    pub status: Option<u16>,
    /// What came back, as decoded as possible.
    pub body: ErrorBody,
}

impl fmt::Display for HttpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(&self.message) }
}

impl std::error::Error for HttpError {}

impl From<TransportError> for HttpError {
    fn from(err: TransportError) -> Self {
        let cause = err.to_string();
        HttpError { message: cause.clone(), status: None, body: ErrorBody::Text(cause) }
    }
}

/// Body attached to an [`HttpError`].
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ErrorBody {
    /// Decoded JSON.
    Json(Value),
    /// Text that was not JSON, or a network failure description.
    Text(String),
    /// Nothing at all.
    #[default]
    Empty,
}

impl ErrorBody {
    /// The decoded JSON body, if there was one.
    pub fn json(&self) -> Option<&Value> {
        match self {
            ErrorBody::Json(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorBody::Json(v) => write!(f, "{}", v),
            ErrorBody::Text(t) => f.write_str(t),
            ErrorBody::Empty => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_has_no_status() {
        let err: HttpError = TransportError::Connect("connection refused".into()).into();
        assert_eq!(err.status, None);
        assert_eq!(err.message, "connection refused");
        assert_eq!(err.body, ErrorBody::Text("connection refused".into()));
    }

    #[test]
    fn test_cancelled_message() {
        assert_eq!(Error::Cancelled.to_string(), "Request aborted");
        assert!(Error::Cancelled.is_cancelled());
        assert_eq!(Error::Cancelled.status(), None);
    }

    #[test]
    fn test_http_error_display_is_message() {
        let err = Error::from(HttpError {
            message: "insufficient balance".into(),
            status: Some(400),
            body: ErrorBody::Empty,
        });
        assert_eq!(err.to_string(), "insufficient balance");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn test_handler_error_keeps_its_source() {
        use std::error::Error as _;

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "stdout closed");
        let err = Error::handler(io);
        assert_eq!(err.to_string(), "event handler failed: stdout closed");
        assert!(err.source().is_some());
        assert!(!err.is_cancelled());
    }
}
