//! In-memory transport for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Request, StatusCode, header};

use super::{HttpClient, HttpResponse};

#[derive(Debug, snafu::Snafu)]
#[snafu(display("mock transport error"))]
pub(crate) struct MockError {
    pub retryable: bool,
}

impl crate::Error for MockError {
    fn is_retryable(&self) -> bool {
        self.retryable
    }
}

#[derive(Debug, Clone)]
pub(crate) struct MockResponse {
    status: StatusCode,
    reason: Option<String>,
    headers: HeaderMap,
    body: Result<Bytes, bool>,
}

impl MockResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap(),
            reason: None,
            headers: HeaderMap::new(),
            body: Ok(Bytes::new()),
        }
    }

    pub fn hal(status: u16, body: &str) -> Self {
        Self::new(status)
            .header(header::CONTENT_TYPE, "application/hal+json")
            .text_body(body)
    }

    pub fn redirect(status: u16, location: &str) -> Self {
        Self::new(status).header(header::LOCATION, location)
    }

    pub fn header(mut self, name: header::HeaderName, value: &str) -> Self {
        self.headers
            .insert(name, HeaderValue::from_str(value).unwrap());
        self
    }

    pub fn header_bytes(mut self, name: header::HeaderName, value: &'static [u8]) -> Self {
        self.headers
            .insert(name, HeaderValue::from_bytes(value).unwrap());
        self
    }

    pub fn reason(mut self, reason: &str) -> Self {
        self.reason = Some(reason.to_string());
        self
    }

    pub fn text_body(mut self, body: &str) -> Self {
        self.body = Ok(Bytes::from(body.to_string()));
        self
    }

    pub fn raw_body(mut self, body: &'static [u8]) -> Self {
        self.body = Ok(Bytes::from_static(body));
        self
    }

    /// Makes reading the body fail.
    pub fn broken_body(mut self) -> Self {
        self.body = Err(false);
        self
    }
}

impl HttpResponse for MockResponse {
    type Error = MockError;

    fn status(&self) -> StatusCode {
        self.status
    }

    fn reason_phrase(&self) -> Option<String> {
        self.reason
            .clone()
            .or_else(|| self.status.canonical_reason().map(str::to_owned))
    }

    fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    async fn body(self) -> Result<Bytes, Self::Error> {
        self.body.map_err(|retryable| MockError { retryable })
    }
}

/// Replays queued responses in order and records every request it sees.
#[derive(Debug, Clone, Default)]
pub(crate) struct ScriptedClient {
    responses: Arc<Mutex<VecDeque<Result<MockResponse, MockError>>>>,
    requests: Arc<Mutex<Vec<Request<Bytes>>>>,
}

impl ScriptedClient {
    pub fn new(responses: impl IntoIterator<Item = MockResponse>) -> Self {
        let client = Self::default();
        for response in responses {
            client.push(response);
        }
        client
    }

    pub fn push(&self, response: MockResponse) {
        self.responses.lock().unwrap().push_back(Ok(response));
    }

    pub fn push_error(&self, retryable: bool) {
        self.responses
            .lock()
            .unwrap()
            .push_back(Err(MockError { retryable }));
    }

    pub fn requests(&self) -> Vec<(http::Method, String, HeaderMap, Bytes)> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .map(|r| {
                (
                    r.method().clone(),
                    r.uri().to_string(),
                    r.headers().clone(),
                    r.body().clone(),
                )
            })
            .collect()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl HttpClient for ScriptedClient {
    type Error = MockError;
    type Response = MockResponse;

    async fn execute(&self, request: Request<Bytes>) -> Result<Self::Response, Self::Error> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted response left")
    }
}
