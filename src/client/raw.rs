use bytes::Bytes;
use http::{Method, Request};
use serde::Serialize;
use snafu::prelude::*;

use super::{
    ClientError, HalClient, build_json_request, build_request,
    error::{BuildRequestSnafu, RequestSnafu},
    prepare,
};
use crate::{IntoRequestUri, http::HttpClient, parser::HalParser};

/// The uninterpreted request path of a [`HalClient`].
///
/// Requests still get the configured base address and default headers, but
/// responses come back exactly as the transport produced them: no redirect
/// following, no content-type checks, no parsing.
#[derive(Debug)]
pub struct RawClient<'a, C: HttpClient, P: HalParser> {
    client: &'a HalClient<C, P>,
}

impl<'a, C: HttpClient, P: HalParser> RawClient<'a, C, P> {
    pub(super) fn new(client: &'a HalClient<C, P>) -> Self {
        Self { client }
    }

    /// Sends a GET request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the transport fails.
    pub async fn get(&self, uri: impl IntoRequestUri) -> Result<C::Response, ClientError<C, P>> {
        let request = build_request(Method::GET, uri, Bytes::new(), &self.client.config())
            .context(BuildRequestSnafu)?;
        self.execute(request).await
    }

    /// Sends `data` as JSON with a POST request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the transport fails.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        uri: impl IntoRequestUri,
        data: &T,
    ) -> Result<C::Response, ClientError<C, P>> {
        let request = build_json_request(Method::POST, uri, data, &self.client.config())
            .context(BuildRequestSnafu)?;
        self.execute(request).await
    }

    /// Sends `data` as JSON with a PUT request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the transport fails.
    pub async fn put_json<T: Serialize + ?Sized>(
        &self,
        uri: impl IntoRequestUri,
        data: &T,
    ) -> Result<C::Response, ClientError<C, P>> {
        let request = build_json_request(Method::PUT, uri, data, &self.client.config())
            .context(BuildRequestSnafu)?;
        self.execute(request).await
    }

    /// Sends a DELETE request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the transport fails.
    pub async fn delete(&self, uri: impl IntoRequestUri) -> Result<C::Response, ClientError<C, P>> {
        let request = build_request(Method::DELETE, uri, Bytes::new(), &self.client.config())
            .context(BuildRequestSnafu)?;
        self.execute(request).await
    }

    /// Sends an arbitrary request.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be built or the transport fails.
    pub async fn send(&self, request: Request<Bytes>) -> Result<C::Response, ClientError<C, P>> {
        let request = prepare(request, &self.client.config()).context(BuildRequestSnafu)?;
        self.execute(request).await
    }

    async fn execute(&self, request: Request<Bytes>) -> Result<C::Response, ClientError<C, P>> {
        let transport = self.client.transport()?;

        tracing::debug!(method = %request.method(), uri = %request.uri(), "sending raw request");
        transport.execute(request).await.context(RequestSnafu)
    }
}
