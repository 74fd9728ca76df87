//! The single place where a call meets the network.
//!
//! Every endpoint reduces to `(method, path, body)` and goes through
//! [`Executor::execute`], which owns encoding, header merging, the
//! timeout/cancellation race and status classification.

use std::collections::BTreeMap;
use std::future;

use numeric::{EncodeError, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;
use transport::{DynTransport, HttpRequest, HttpResponse, Method};

use crate::error::{Error, ErrorBody, HttpError, Result};
use crate::options::{NotFound, RequestOptions};

/// Placeholder body type for calls without a body.
pub(crate) const NO_BODY: Option<&()> = None;

/// Immutable call context: where to send, what to send with, and how.
#[derive(Clone)]
pub struct Executor {
    base_url: String,
    default_headers: BTreeMap<String, String>,
    transport: DynTransport,
}

impl Executor {
    /// `base_url` must already be trimmed of its trailing `/`.
    pub(crate) fn new(
        base_url: String,
        default_headers: BTreeMap<String, String>,
        transport: DynTransport,
    ) -> Self {
        let default_headers =
            default_headers.into_iter().map(|(k, v)| (k.to_ascii_lowercase(), v)).collect();
        Self { base_url, default_headers, transport }
    }

    /// Base URL every path is appended to.
    pub fn base_url(&self) -> &str { &self.base_url }

    /// Performs one call.
    ///
    /// The body, if any, is range-checked before anything else happens; an
    /// already-cancelled token also fails before any I/O. A `2xx`/`3xx` reply
    /// with an undecodable or empty body yields an empty object. With
    /// [`NotFound::Absent`], a `404` yields `Ok(None)`.
    pub async fn execute<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: &RequestOptions,
        not_found: NotFound,
    ) -> Result<Option<Value>> {
        if options.cancel.as_ref().is_some_and(|t| t.is_cancelled()) {
            tracing::debug!(%method, path, "request cancelled before it was sent");
            return Err(Error::Cancelled);
        }

        let wire = match body {
            Some(body) => Some(numeric::to_wire(body).map_err(|e| match e {
                EncodeError::Range(e) => Error::EncodingRange(e),
                EncodeError::Serialization(msg) => Error::Serialization(msg),
            })?),
            None => None,
        };

        let url = format!("{}{}", self.base_url, path);
        let mut request = HttpRequest::new(method, url).header("content-type", "application/json");
        for (name, value) in self.default_headers.iter().chain(options.headers.iter()) {
            request = request.header(name, value.clone());
        }
        if let Some(wire) = wire {
            tracing::trace!(body = %wire, "request body");
            request = request.body(wire);
        }

        tracing::debug!(
            %method,
            url = %request.url,
            transport = self.transport.name(),
            "sending request"
        );
        let response = self.race(request, options).await?;
        tracing::trace!(status = response.status, body = %response.body, "response");

        classify(response, not_found)
    }

    /// Runs the transport against the timer and the caller's token. Whichever
    /// loses is dropped here, which aborts the I/O and releases the timer.
    async fn race(&self, request: HttpRequest, options: &RequestOptions) -> Result<HttpResponse> {
        let method = request.method;
        let url = request.url.clone();

        let send = self.transport.send(request);
        let timer = async {
            match options.effective_timeout() {
                Some(d) => tokio::time::sleep(d).await,
                None => future::pending().await,
            }
        };
        let cancelled = async {
            match &options.cancel {
                Some(token) => token.cancelled().await,
                None => future::pending().await,
            }
        };

        tokio::select! {
            result = send => result.map_err(|e| {
                tracing::debug!(%method, %url, "request failed: {}", e);
                Error::Http(HttpError::from(e))
            }),
            _ = timer => {
                tracing::debug!(%method, %url, "request timed out");
                Err(Error::Cancelled)
            }
            _ = cancelled => {
                tracing::debug!(%method, %url, "request cancelled");
                Err(Error::Cancelled)
            }
        }
    }
}

/// Maps a response onto the call's outcome.
pub(crate) fn classify(response: HttpResponse, not_found: NotFound) -> Result<Option<Value>> {
    let decoded = numeric::decode(&response.body);

    if (200..=399).contains(&response.status) {
        return Ok(Some(decoded.unwrap_or_else(Value::empty_object)));
    }
    if response.status == 404 && not_found == NotFound::Absent {
        return Ok(None);
    }

    let message = decoded
        .as_ref()
        .and_then(|v| v.get("error"))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", response.status));
    let body = match decoded {
        Some(v) => ErrorBody::Json(v),
        None if response.body.is_empty() => ErrorBody::Empty,
        None => ErrorBody::Text(response.body),
    };
    Err(Error::Http(HttpError { message, status: Some(response.status), body }))
}

/// Narrows a decoded body into an endpoint's response type.
pub(crate) fn narrow<T: DeserializeOwned>(path: &str, value: Value) -> Result<T> {
    numeric::from_value(value)
        .map_err(|e| Error::Shape { path: path.to_string(), reason: e.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_success_without_body() {
        let out = classify(HttpResponse::new(204, ""), NotFound::Error).expect("success");
        assert_eq!(out, Some(Value::empty_object()));

        let out = classify(HttpResponse::new(302, "not json"), NotFound::Error).expect("success");
        assert_eq!(out, Some(Value::empty_object()));
    }

    #[test]
    fn test_classify_404() {
        assert_eq!(classify(HttpResponse::new(404, ""), NotFound::Absent).expect("absent"), None);

        let err = classify(HttpResponse::new(404, ""), NotFound::Error).expect_err("error");
        match err {
            Error::Http(e) => {
                assert_eq!(e.status, Some(404));
                assert_eq!(e.message, "HTTP 404");
                assert_eq!(e.body, ErrorBody::Empty);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_classify_error_message() {
        let err = classify(
            HttpResponse::new(400, r#"{"error":"insufficient balance"}"#),
            NotFound::Absent,
        )
        .expect_err("400");
        match err {
            Error::Http(e) => {
                assert_eq!(e.message, "insufficient balance");
                assert!(e.body.json().is_some());
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_classify_text_body() {
        let err =
            classify(HttpResponse::new(502, "bad gateway"), NotFound::Error).expect_err("502");
        match err {
            Error::Http(e) => {
                assert_eq!(e.message, "HTTP 502");
                assert_eq!(e.body, ErrorBody::Text("bad gateway".into()));
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_classify_empty_error_field_falls_back() {
        let resp = HttpResponse::new(500, r#"{"error":""}"#);
        let err = classify(resp, NotFound::Error).expect_err("500");
        assert_eq!(err.to_string(), "HTTP 500");
    }

    #[test]
    fn test_narrow_reports_path() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Needs {
            field: String,
        }
        let err = narrow::<Needs>("/status", Value::empty_object()).expect_err("missing field");
        match err {
            Error::Shape { path, reason } => {
                assert_eq!(path, "/status");
                assert!(reason.contains("field"));
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
