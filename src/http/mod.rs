//! HTTP client and response abstractions.
//!
//! The client never talks to sockets itself. Users provide an [`HttpClient`]
//! (e.g. backed by `reqwest`, `hyper`, or a WASM-compatible client) and the
//! HAL pipeline operates against these traits.

#[cfg(all(not(target_arch = "wasm32"), feature = "http-client-reqwest-0_13"))]
#[cfg_attr(docsrs, doc(cfg(feature = "http-client-reqwest-0_13")))]
pub mod reqwest_0_13;
#[cfg(test)]
pub(crate) mod testing;

use bytes::Bytes;
use http::{HeaderMap, Request, StatusCode};

use crate::platform::{MaybeSend, MaybeSendSync};

/// Defines the common interface for HTTP requests.
pub trait HttpClient: MaybeSendSync {
    /// The error type returned by the client for a failed request.
    type Error: crate::Error;

    /// The associated response type returned by this HTTP client.
    type Response: HttpResponse;

    /// Executes an HTTP request and returns an owned response.
    ///
    /// The request URI is always absolute by the time it reaches the
    /// transport, and the body is already serialized.
    fn execute(
        &self,
        request: Request<Bytes>,
    ) -> impl Future<Output = Result<Self::Response, Self::Error>> + MaybeSend;
}

/// Defines the common interface for HTTP responses.
pub trait HttpResponse: MaybeSendSync {
    /// The error type when getting the response body.
    type Error: crate::Error;

    /// Returns the HTTP status code of the response.
    fn status(&self) -> StatusCode;

    /// Returns the human-readable status text.
    ///
    /// Transports that do not keep the status line fall back to the
    /// canonical reason for the status code.
    fn reason_phrase(&self) -> Option<String> {
        self.status().canonical_reason().map(str::to_owned)
    }

    /// Returns the response's HTTP headers.
    fn headers(&self) -> &HeaderMap;

    /// Consumes the response and asynchronously returns its body as `bytes::Bytes`.
    fn body(self) -> impl Future<Output = Result<Bytes, Self::Error>> + MaybeSend;
}
