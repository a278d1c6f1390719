//! Client configuration.

use http::{HeaderMap, HeaderName, HeaderValue, Uri, header::ACCEPT};

use bon::Builder;

use crate::{IntoRequestUri, ResolveUriError, interpret::APPLICATION_HAL_JSON};

/// The number of redirects followed before a request is abandoned.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Configuration for a [`HalClient`](crate::HalClient).
///
/// Built once and passed to the client at construction. The client keeps
/// its own copy; [`HalClient::update_config`](crate::HalClient::update_config)
/// replaces values for requests that start afterwards.
#[derive(Debug, Clone, Builder)]
#[builder(state_mod(name = "builder"))]
pub struct HalClientConfig {
    /// Relative request URIs are resolved against this address.
    #[builder(setters(name = "base_address_uri"))]
    pub base_address: Option<Uri>,

    /// Headers sent with every request, unless the request sets them itself.
    ///
    /// Defaults to `Accept: application/hal+json`.
    #[builder(default = hal_default_headers())]
    pub default_headers: HeaderMap,

    /// The most redirects followed within one call.
    #[builder(default = DEFAULT_MAX_REDIRECTS)]
    pub max_redirects: usize,
}

impl Default for HalClientConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl HalClientConfig {
    /// Replaces a default header.
    pub fn set_default_header(&mut self, name: HeaderName, value: HeaderValue) -> &mut Self {
        self.default_headers.insert(name, value);
        self
    }

    /// Removes a default header.
    pub fn remove_default_header(&mut self, name: &HeaderName) -> &mut Self {
        self.default_headers.remove(name);
        self
    }
}

impl<S: builder::State> HalClientConfigBuilder<S> {
    /// Sets the base address.
    ///
    /// Accepts any type that implements [`IntoRequestUri`], including
    /// `&str`, [`String`], [`Url`](url::Url) and [`Uri`].
    ///
    /// # Errors
    ///
    /// Returns an error if the address is not an absolute URI.
    pub fn base_address<U: IntoRequestUri>(
        self,
        address: U,
    ) -> Result<HalClientConfigBuilder<builder::SetBaseAddress<S>>, ResolveUriError>
    where
        S::BaseAddress: builder::IsUnset,
    {
        Ok(self.base_address_uri(address.into_request_uri(None)?))
    }
}

fn hal_default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(APPLICATION_HAL_JSON));
    headers
}
