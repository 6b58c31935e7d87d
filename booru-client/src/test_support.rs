use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::error::ApiError;
use crate::request::PreparedRequest;
use crate::transport::{RawResponse, ResponseHead, SendError, Transport};

/// Records every request and answers with queued responses, `200 []` once the queue is empty.
/// Clones share their state, so a test keeps one clone to inspect what the client sent.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    requests: Arc<Mutex<Vec<PreparedRequest>>>,
    responses: Arc<Mutex<VecDeque<Result<RawResponse, SendError>>>>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self::default()
    }

    /// Queues a response. Its URL is filled with the request's.
    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.responses
            .lock()
            .unwrap()
            .push_back(Ok(RawResponse::new(status, "", body)));
        self
    }

    pub fn fail_with(&self, error: ApiError) -> &Self {
        self.responses.lock().unwrap().push_back(Err(error.into()));
        self
    }

    /// Queues a failure that happens after the server answered with `status`.
    pub fn fail_after(&self, status: u16, error: ApiError) -> &Self {
        let head = ResponseHead {
            status,
            ..Default::default()
        };
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(SendError::answered(error, head)));
        self
    }

    pub fn requests(&self) -> Vec<PreparedRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> PreparedRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Transport for RecordingTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, SendError> {
        let url = request.url.to_string();
        self.requests.lock().unwrap().push(request);

        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(mut raw)) => {
                if raw.url.is_empty() {
                    raw.url = url;
                }
                Ok(raw)
            }
            Some(Err(mut failure)) => {
                if let Some(head) = failure.head.as_mut().filter(|h| h.url.is_empty()) {
                    head.url = url;
                }
                Err(failure)
            }
            None => Ok(RawResponse::new(200, url, "[]")),
        }
    }
}
