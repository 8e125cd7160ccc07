//! Test doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::http::{Request, Response, StatusCode};
use crate::transport::{Transport, TransportError};

/// A transport that replays queued responses and records every request.
///
/// When the queue is empty it answers `404 not found`.
#[derive(Default)]
pub(crate) struct StubTransport {
    responses: Mutex<VecDeque<Response>>,
    requests: Mutex<Vec<Request>>,
    calls: AtomicUsize,
}

impl StubTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, response: Response) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub(crate) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn last_request(&self) -> Option<Request> {
        self.requests.lock().unwrap().last().cloned()
    }
}

impl Transport for StubTransport {
    fn send(&self, request: &Request) -> Result<Response, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().unwrap().push(request.clone());
        let response = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Response::new(StatusCode::NOT_FOUND).body("not found"));
        Ok(response.method(request.method().clone()))
    }
}
