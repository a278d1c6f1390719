//! The HAL client: issues requests and interprets their responses.
//!
//! [`HalClient`] owns the transport. Every verb method builds a request,
//! applies the configured base address and default headers, sends it, and
//! hands the response to [`interpret`](crate::interpret::interpret).
//! Redirects (302, 303, 307) are followed with a GET, up to
//! [`HalClientConfig::max_redirects`] times. [`HalClient::raw`] skips the
//! interpretation step entirely.

mod error;
mod raw;

use std::sync::{Arc, PoisonError, RwLock};

use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method, Request, header::CONTENT_TYPE};
use serde::Serialize;
use snafu::prelude::*;

use crate::{
    HalClientConfig, IntoRequestUri,
    http::{HttpClient, HttpResponse},
    interpret::{Interpretation, interpret},
    parser::{HalParser, JsonHalParser},
    request_uri::resolve,
    resource::RootResource,
};

pub use error::{BuildRequestError, HalClientError};
pub use raw::RawClient;

use error::{
    BuildRequestSnafu, ClosedSnafu, RedirectTargetSnafu, RequestSnafu, ResolveUriSnafu,
    SerializeBodySnafu, TooManyRedirectsSnafu,
};

/// The error type of a [`HalClient`] using transport `C` and parser `P`.
pub type ClientError<C, P> = HalClientError<
    <C as HttpClient>::Error,
    <<C as HttpClient>::Response as HttpResponse>::Error,
    <P as HalParser>::Error,
>;

/// A client for HAL JSON APIs.
///
/// Concurrent calls on one client are independent; they share only the
/// configuration and the cached root resource, both of which are read or
/// replaced whole.
#[derive(Debug)]
pub struct HalClient<C: HttpClient, P: HalParser = JsonHalParser> {
    transport: Option<C>,
    parser: P,
    config: RwLock<HalClientConfig>,
    cached_root: RwLock<Option<Arc<RootResource>>>,
}

impl<C: HttpClient> HalClient<C> {
    /// Creates a client with the default parser and configuration.
    ///
    /// The transport must hand 302, 303 and 307 responses back unfollowed;
    /// otherwise redirects bypass the interpreter and
    /// [`HalClientConfig::max_redirects`]. For reqwest, see
    /// `http::reqwest_0_13::client_builder`.
    pub fn new(transport: C) -> Self {
        Self::with_config(transport, HalClientConfig::default())
    }

    /// Creates a client with the default parser.
    ///
    /// See [`HalClient::new`] for what the transport must do with redirects.
    pub fn with_config(transport: C, config: HalClientConfig) -> Self {
        Self::with_parser(transport, JsonHalParser, config)
    }
}

impl<C: HttpClient, P: HalParser> HalClient<C, P> {
    /// Creates a client with a custom parser.
    pub fn with_parser(transport: C, parser: P, config: HalClientConfig) -> Self {
        Self {
            transport: Some(transport),
            parser,
            config: RwLock::new(config),
            cached_root: RwLock::new(None),
        }
    }

    /// Returns a snapshot of the current configuration.
    pub fn config(&self) -> HalClientConfig {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Changes the configuration for requests that start after this call.
    ///
    /// Requests already in flight keep the configuration they started with.
    pub fn update_config(&self, update: impl FnOnce(&mut HalClientConfig)) {
        update(&mut self.config.write().unwrap_or_else(PoisonError::into_inner));
    }

    /// Returns the cached root resource, if one has been stored.
    pub fn cached_root_resource(&self) -> Option<Arc<RootResource>> {
        self.cached_root
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Stores a root resource for later use, replacing any previous one.
    pub fn set_cached_root_resource(&self, resource: impl Into<Arc<RootResource>>) {
        *self.cached_root.write().unwrap_or_else(PoisonError::into_inner) = Some(resource.into());
    }

    /// Removes and returns the cached root resource.
    pub fn take_cached_root_resource(&self) -> Option<Arc<RootResource>> {
        self.cached_root
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }

    /// Returns the uninterpreted request path.
    pub fn raw(&self) -> RawClient<'_, C, P> {
        RawClient::new(self)
    }

    /// Releases the transport. Further requests fail with
    /// [`HalClientError::Closed`]. Calling this more than once has no effect.
    pub fn close(&mut self) {
        if self.transport.take().is_some() {
            tracing::debug!("HAL client transport released");
        }
    }

    /// Returns `true` once [`HalClient::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    /// Fetches a resource.
    ///
    /// # Errors
    ///
    /// See [`HalClientError`].
    pub async fn get(&self, uri: impl IntoRequestUri) -> Result<RootResource, ClientError<C, P>> {
        let request = build_request(Method::GET, uri, Bytes::new(), &self.config())
            .context(BuildRequestSnafu)?;
        self.send(request).await
    }

    /// Posts `data` as JSON and interprets the response.
    ///
    /// # Errors
    ///
    /// See [`HalClientError`].
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        uri: impl IntoRequestUri,
        data: &T,
    ) -> Result<RootResource, ClientError<C, P>> {
        let request = build_json_request(Method::POST, uri, data, &self.config())
            .context(BuildRequestSnafu)?;
        self.send(request).await
    }

    /// Puts `data` as JSON and interprets the response.
    ///
    /// # Errors
    ///
    /// See [`HalClientError`].
    pub async fn put<T: Serialize + ?Sized>(
        &self,
        uri: impl IntoRequestUri,
        data: &T,
    ) -> Result<RootResource, ClientError<C, P>> {
        let request = build_json_request(Method::PUT, uri, data, &self.config())
            .context(BuildRequestSnafu)?;
        self.send(request).await
    }

    /// Deletes a resource.
    ///
    /// # Errors
    ///
    /// See [`HalClientError`].
    pub async fn delete(
        &self,
        uri: impl IntoRequestUri,
    ) -> Result<RootResource, ClientError<C, P>> {
        let request = build_request(Method::DELETE, uri, Bytes::new(), &self.config())
            .context(BuildRequestSnafu)?;
        self.send(request).await
    }

    /// Sends an arbitrary request and interprets the response.
    ///
    /// Headers set on `request` take precedence over the configured
    /// defaults. Redirects are followed with a plain GET carrying only the
    /// default headers.
    ///
    /// # Errors
    ///
    /// See [`HalClientError`].
    pub async fn send(&self, request: Request<Bytes>) -> Result<RootResource, ClientError<C, P>> {
        let transport = self.transport()?;
        let config = self.config();
        let mut request = prepare(request, &config).context(BuildRequestSnafu)?;
        let mut redirects = 0;

        loop {
            let uri = request.uri().clone();
            tracing::debug!(method = %request.method(), %uri, "sending HAL request");

            let response = transport.execute(request).await.context(RequestSnafu)?;

            let location = match interpret(response, &self.parser).await? {
                Interpretation::Resource(resource) => return Ok(resource),
                Interpretation::Redirect { location, .. } => location,
            };

            if redirects == config.max_redirects {
                tracing::warn!(
                    max_redirects = config.max_redirects,
                    %location,
                    "redirect limit reached"
                );
                return TooManyRedirectsSnafu {
                    max_redirects: config.max_redirects,
                    location,
                }
                .fail();
            }
            redirects += 1;

            let target = resolve(Some(&uri), &location).context(RedirectTargetSnafu)?;
            request = build_request(Method::GET, target, Bytes::new(), &config)
                .context(BuildRequestSnafu)?;
        }
    }

    fn transport(&self) -> Result<&C, ClientError<C, P>> {
        self.transport.as_ref().context(ClosedSnafu)
    }
}

/// Builds a request with an already-serialized body, ready for the transport.
fn build_request(
    method: Method,
    uri: impl IntoRequestUri,
    body: Bytes,
    config: &HalClientConfig,
) -> Result<Request<Bytes>, BuildRequestError> {
    let uri = uri
        .into_request_uri(config.base_address.as_ref())
        .context(ResolveUriSnafu)?;

    let (mut parts, ()) = Request::new(()).into_parts();
    parts.method = method;
    parts.uri = uri;
    apply_default_headers(&mut parts.headers, &config.default_headers);

    Ok(Request::from_parts(parts, body))
}

fn build_json_request<T: Serialize + ?Sized>(
    method: Method,
    uri: impl IntoRequestUri,
    data: &T,
    config: &HalClientConfig,
) -> Result<Request<Bytes>, BuildRequestError> {
    let body = serde_json::to_vec(data).context(SerializeBodySnafu)?;
    let mut request = build_request(method, uri, body.into(), config)?;
    request
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(request)
}

/// Resolves the URI of a caller-built request against the base address and
/// fills in default headers it does not set itself.
fn prepare(
    request: Request<Bytes>,
    config: &HalClientConfig,
) -> Result<Request<Bytes>, BuildRequestError> {
    let (mut parts, body) = request.into_parts();

    parts.uri = parts
        .uri
        .into_request_uri(config.base_address.as_ref())
        .context(ResolveUriSnafu)?;
    apply_default_headers(&mut parts.headers, &config.default_headers);

    Ok(Request::from_parts(parts, body))
}

fn apply_default_headers(headers: &mut HeaderMap, defaults: &HeaderMap) {
    for name in defaults.keys() {
        if headers.contains_key(name) {
            continue;
        }
        for value in defaults.get_all(name) {
            headers.append(name.clone(), value.clone());
        }
    }
}
