//! In-memory transports for driving the client without a node.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use client::NodeClient;
use transport::{HttpRequest, HttpResponse, Transport, TransportError};

type Responder = dyn Fn(&HttpRequest) -> Result<HttpResponse, TransportError> + Send + Sync;

/// Answers every request through a closure and records what it saw.
pub struct StubTransport {
    responder: Box<Responder>,
    requests: Mutex<Vec<HttpRequest>>,
    calls: AtomicUsize,
}

impl StubTransport {
    pub fn new(
        responder: impl Fn(&HttpRequest) -> Result<HttpResponse, TransportError>
            + Send
            + Sync
            + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        })
    }

    /// Always answers `status` with `body`.
    pub fn fixed(status: u16, body: &'static str) -> Arc<Self> {
        Self::new(move |_| Ok(HttpResponse::new(status, body)))
    }

    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock").clone()
    }

    pub fn last(&self) -> HttpRequest {
        self.requests().pop().expect("at least one request")
    }
}

#[async_trait::async_trait]
impl Transport for StubTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let out = (self.responder)(&request);
        self.requests.lock().expect("requests lock").push(request);
        out
    }

    fn name(&self) -> &str { "stub" }
}

/// Sets a flag when dropped.
struct DropFlag(Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) { self.0.store(true, Ordering::SeqCst); }
}

/// Never answers. Records whether the in-flight future was dropped.
pub struct PendingTransport {
    pub calls: AtomicUsize,
    pub dropped: Arc<AtomicBool>,
}

impl PendingTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self { calls: AtomicUsize::new(0), dropped: Arc::new(AtomicBool::new(false)) })
    }

    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

    pub fn was_dropped(&self) -> bool { self.dropped.load(Ordering::SeqCst) }
}

#[async_trait::async_trait]
impl Transport for PendingTransport {
    async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _flag = DropFlag(self.dropped.clone());
        std::future::pending::<Result<HttpResponse, TransportError>>().await
    }

    fn name(&self) -> &str { "pending" }
}

pub const BASE: &str = "http://node.test/api/v1";

pub fn client_over(transport: Arc<impl Transport + 'static>) -> NodeClient {
    NodeClient::with_transport(BASE, transport).expect("valid base url")
}
