//! Conversions into request URIs, and resolution of relative references.
//!
//! The client accepts any [`IntoRequestUri`] wherever it takes a target.
//! Targets may be relative; they are resolved against the configured base
//! address, and `Location` headers against the URI of the request that
//! produced them.

use http::{Uri, uri::InvalidUri};
use snafu::prelude::*;
use url::Url;

/// Conversion trait for types that can name a request target.
///
/// Absolute values are used as they are. Relative references (`"orders"`,
/// `"/orders?page=2"`) are resolved against `base`.
pub trait IntoRequestUri {
    /// Resolves this value into an absolute request URI.
    ///
    /// # Errors
    ///
    /// Returns an error if the value is relative and there is no usable
    /// `base`, or if the result is not a valid URI.
    fn into_request_uri(self, base: Option<&Uri>) -> Result<Uri, ResolveUriError>;
}

impl IntoRequestUri for Uri {
    fn into_request_uri(self, base: Option<&Uri>) -> Result<Uri, ResolveUriError> {
        if self.scheme().is_some() {
            return Ok(self);
        }
        resolve(base, &self.to_string())
    }
}

impl IntoRequestUri for &Uri {
    fn into_request_uri(self, base: Option<&Uri>) -> Result<Uri, ResolveUriError> {
        self.clone().into_request_uri(base)
    }
}

impl IntoRequestUri for Url {
    fn into_request_uri(self, _base: Option<&Uri>) -> Result<Uri, ResolveUriError> {
        self.as_str().parse().context(ConvertSnafu)
    }
}

impl IntoRequestUri for &Url {
    fn into_request_uri(self, _base: Option<&Uri>) -> Result<Uri, ResolveUriError> {
        self.as_str().parse().context(ConvertSnafu)
    }
}

impl IntoRequestUri for &str {
    fn into_request_uri(self, base: Option<&Uri>) -> Result<Uri, ResolveUriError> {
        resolve(base, self)
    }
}

impl IntoRequestUri for String {
    fn into_request_uri(self, base: Option<&Uri>) -> Result<Uri, ResolveUriError> {
        resolve(base, &self)
    }
}

impl IntoRequestUri for &String {
    fn into_request_uri(self, base: Option<&Uri>) -> Result<Uri, ResolveUriError> {
        resolve(base, self)
    }
}

/// Errors from resolving a relative URI reference.
#[derive(Debug, Snafu)]
pub enum ResolveUriError {
    /// The reference was relative, but there was nothing to resolve it against.
    #[snafu(display("Relative URI '{uri}' requires a base address"))]
    NoBaseAddress {
        /// The relative reference.
        uri: String,
    },
    /// The base URI could not be used for resolution.
    #[snafu(display("Base URI '{base}' is not an absolute URL"))]
    InvalidBase {
        /// The base URI.
        base: String,
        /// The underlying error.
        source: url::ParseError,
    },
    /// The reference could not be joined onto the base URI.
    #[snafu(display("Failed to resolve '{reference}' against '{base}'"))]
    Join {
        /// The base URI.
        base: String,
        /// The relative reference.
        reference: String,
        /// The underlying error.
        source: url::ParseError,
    },
    /// The joined URL was not representable as an `http::Uri`.
    #[snafu(display("Resolved URL is not a valid URI"))]
    Convert {
        /// The underlying error.
        source: InvalidUri,
    },
}

impl crate::Error for ResolveUriError {
    fn is_retryable(&self) -> bool {
        false
    }
}

/// Resolves `reference` against `base`, returning it unchanged if it is
/// already absolute.
pub(crate) fn resolve(base: Option<&Uri>, reference: &str) -> Result<Uri, ResolveUriError> {
    if let Ok(absolute) = Url::parse(reference) {
        return absolute.as_str().parse().context(ConvertSnafu);
    }

    let base = base.context(NoBaseAddressSnafu { uri: reference })?;
    let base_str = base.to_string();
    let base_url = Url::parse(&base_str).context(InvalidBaseSnafu { base: &base_str })?;

    base_url
        .join(reference)
        .context(JoinSnafu {
            base: base_str,
            reference,
        })?
        .as_str()
        .parse()
        .context(ConvertSnafu)
}
