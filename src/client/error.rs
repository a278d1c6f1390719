use http::StatusCode;
use snafu::prelude::*;

use crate::{interpret::ResponseError, request_uri::ResolveUriError, resource::RootResource};

/// Errors that can occur when making a request through a
/// [`HalClient`](crate::HalClient).
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum HalClientError<HttpReqErr: crate::Error, HttpRespErr: crate::Error, ParseErr: crate::Error>
{
    /// The request could not be assembled.
    #[snafu(display("Failed to build HTTP request"))]
    BuildRequest {
        /// The underlying error.
        source: BuildRequestError,
    },
    /// An error occurred when making the HTTP request.
    #[snafu(display("Failed to make HTTP request"))]
    Request {
        /// The transport error.
        source: HttpReqErr,
    },
    /// The response could not be turned into a resource.
    #[snafu(transparent)]
    Response {
        /// The interpreter's error.
        source: ResponseError<HttpRespErr, ParseErr>,
    },
    /// A redirect pointed somewhere that could not be resolved.
    #[snafu(display("Failed to resolve redirect target"))]
    RedirectTarget {
        /// The underlying error.
        source: ResolveUriError,
    },
    /// The redirect limit was reached.
    #[snafu(display("Gave up after {max_redirects} redirects; next location was {location}"))]
    TooManyRedirects {
        /// The configured limit.
        max_redirects: usize,
        /// The redirect that was not followed.
        location: String,
    },
    /// The client was closed before the request was made.
    #[snafu(display("The HAL client has been closed"))]
    Closed,
}

impl<HttpReqErr: crate::Error, HttpRespErr: crate::Error, ParseErr: crate::Error>
    HalClientError<HttpReqErr, HttpRespErr, ParseErr>
{
    /// Returns the interpreter's error, if the failure came from the response.
    pub fn response_error(&self) -> Option<&ResponseError<HttpRespErr, ParseErr>> {
        match self {
            Self::Response { source } => Some(source),
            _ => None,
        }
    }

    /// Returns the status code of an unsuccessful response.
    pub fn status(&self) -> Option<StatusCode> {
        match self.response_error()? {
            ResponseError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the reason phrase of an unsuccessful response.
    pub fn reason(&self) -> Option<&str> {
        match self.response_error()? {
            ResponseError::Status { reason, .. } => reason.as_deref(),
            _ => None,
        }
    }

    /// Returns the HAL body the server attached to an unsuccessful response.
    pub fn resource(&self) -> Option<&RootResource> {
        match self.response_error()? {
            ResponseError::Status { resource, .. } => resource.as_ref(),
            _ => None,
        }
    }

    /// Consumes the error, returning the attached HAL body, if any.
    pub fn into_resource(self) -> Option<RootResource> {
        match self {
            Self::Response {
                source: ResponseError::Status { resource, .. },
            } => resource,
            _ => None,
        }
    }

    /// Returns `true` if a successful response was refused because of its
    /// content type.
    pub fn is_unsupported(&self) -> bool {
        self.response_error()
            .is_some_and(ResponseError::is_unsupported)
    }

    /// Returns `true` if the parser rejected a response body.
    pub fn is_parse_error(&self) -> bool {
        matches!(self.response_error(), Some(ResponseError::Parse { .. }))
    }
}

impl<HttpReqErr: crate::Error, HttpRespErr: crate::Error, ParseErr: crate::Error> crate::Error
    for HalClientError<HttpReqErr, HttpRespErr, ParseErr>
{
    fn is_retryable(&self) -> bool {
        match self {
            Self::Request { source } => source.is_retryable(),
            Self::Response { source } => source.is_retryable(),
            Self::BuildRequest { .. }
            | Self::RedirectTarget { .. }
            | Self::TooManyRedirects { .. }
            | Self::Closed => false,
        }
    }
}

/// Errors from assembling a request before it reaches the transport.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum BuildRequestError {
    /// The target could not be turned into an absolute URI.
    #[snafu(display("Failed to resolve request URI"))]
    ResolveUri {
        /// The underlying error.
        source: ResolveUriError,
    },
    /// The payload could not be serialized as JSON.
    #[snafu(display("Failed to serialize request body as JSON"))]
    SerializeBody {
        /// The underlying error.
        source: serde_json::Error,
    },
}

impl crate::Error for BuildRequestError {
    fn is_retryable(&self) -> bool {
        false
    }
}
