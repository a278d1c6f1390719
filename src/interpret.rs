//! Response interpretation.
//!
//! Decides, from status, headers and body alone, whether a response is a
//! redirect to follow, a HAL resource, an empty success, or a failure.

use http::{HeaderMap, StatusCode, header};
use snafu::prelude::*;

use crate::{
    http::HttpResponse,
    parser::HalParser,
    resource::RootResource,
};

/// The HAL JSON media type.
pub const APPLICATION_HAL_JSON: &str = "application/hal+json";

/// The outcome of interpreting one response.
#[derive(Debug, Clone, PartialEq)]
pub enum Interpretation {
    /// A final resource.
    Resource(RootResource),
    /// The server pointed elsewhere; the target should be fetched with GET.
    Redirect {
        /// The redirect status code.
        status: StatusCode,
        /// The `Location` header, possibly relative.
        location: String,
    },
}

/// Returns `true` for the statuses that are followed with a GET.
pub fn is_followed_redirect(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::FOUND | StatusCode::SEE_OTHER | StatusCode::TEMPORARY_REDIRECT
    )
}

/// Extracts the media type from the `Content-Type` header, without
/// parameters. An empty header counts as absent.
pub fn media_type(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::CONTENT_TYPE)?;
    let value = String::from_utf8_lossy(value.as_bytes());
    let media_type = value.split(';').next().unwrap_or_default().trim();

    (!media_type.is_empty()).then(|| media_type.to_owned())
}

/// Returns `true` if `media_type` is `application/hal+json`, ignoring case.
pub fn is_hal_media_type(media_type: &str) -> bool {
    media_type.eq_ignore_ascii_case(APPLICATION_HAL_JSON)
}

/// Interprets a completed response.
///
/// The body is read at most once, and only when it is going to be parsed.
///
/// # Errors
///
/// Returns [`ResponseError`] for unsupported content, unsuccessful statuses,
/// unreadable or unparseable bodies, and redirects without a usable
/// `Location`.
pub async fn interpret<R: HttpResponse, P: HalParser>(
    response: R,
    parser: &P,
) -> Result<Interpretation, ResponseError<R::Error, P::Error>> {
    let status = response.status();

    if is_followed_redirect(status) {
        let location = response
            .headers()
            .get(header::LOCATION)
            .context(MissingLocationSnafu { status })?;
        let location = location
            .to_str()
            .context(InvalidLocationSnafu {
                location: String::from_utf8_lossy(location.as_bytes()),
            })?
            .to_owned();

        tracing::debug!(%status, location = %location, "following redirect");
        return Ok(Interpretation::Redirect { status, location });
    }

    let media_type = media_type(response.headers());
    let is_hal = media_type.as_deref().is_some_and(is_hal_media_type);

    if status.is_success() {
        if status == StatusCode::NO_CONTENT {
            return Ok(Interpretation::Resource(RootResource::empty()));
        }

        let Some(media_type) = media_type else {
            tracing::warn!(%status, "response is missing the Content-Type header");
            return MissingContentTypeSnafu { status }.fail();
        };

        if !is_hal {
            tracing::warn!(%status, media_type = %media_type, "unsupported Content-Type");
            return UnsupportedContentTypeSnafu { status, media_type }.fail();
        }

        return parse_body(response, parser)
            .await
            .map(Interpretation::Resource);
    }

    let reason = response.reason_phrase();

    if !is_hal {
        return StatusSnafu {
            status,
            reason,
            resource: None::<RootResource>,
        }
        .fail();
    }

    let resource = parse_body(response, parser).await?;

    StatusSnafu {
        status,
        reason,
        resource: Some(resource),
    }
    .fail()
}

async fn parse_body<R: HttpResponse, P: HalParser>(
    response: R,
    parser: &P,
) -> Result<RootResource, ResponseError<R::Error, P::Error>> {
    let body = response.body().await.context(ResponseBodyReadSnafu)?;
    let text = std::str::from_utf8(&body).context(NonUtf8BodySnafu)?;
    let resource = parser.parse(text).context(ParseSnafu)?;

    tracing::trace!(
        links = resource.links().count(),
        embedded = resource.embedded().count(),
        properties = resource.properties().len(),
        "parsed HAL resource"
    );

    Ok(resource.into())
}

/// Errors that can occur when interpreting a response.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ResponseError<HttpRespErr: crate::Error, ParseErr: crate::Error> {
    /// The response body could not be read.
    #[snafu(display("Failed to read response body"))]
    ResponseBodyRead {
        /// The underlying transport error.
        source: HttpRespErr,
    },
    /// A successful response did not declare its content type.
    #[snafu(display("The response is missing the 'Content-Type' header (status {status})"))]
    MissingContentType {
        /// The status code of the response.
        status: StatusCode,
    },
    /// A successful response declared a content type other than HAL JSON.
    #[snafu(display(
        "The response contains an unsupported 'Content-Type' header value: {media_type}"
    ))]
    UnsupportedContentType {
        /// The status code of the response.
        status: StatusCode,
        /// The declared media type.
        media_type: String,
    },
    /// The server answered with an unsuccessful status.
    #[snafu(display(
        "HTTP request failed with status {status}{}",
        reason.as_ref().map(|r| format!(" ({r})")).unwrap_or_default()
    ))]
    Status {
        /// The status code.
        status: StatusCode,
        /// The reason phrase.
        reason: Option<String>,
        /// The HAL body of the error response, when there was one.
        resource: Option<RootResource>,
    },
    /// The body was not UTF-8 text.
    #[snafu(display("Response body is not valid UTF-8"))]
    NonUtf8Body {
        /// The underlying error.
        source: std::str::Utf8Error,
    },
    /// The parser rejected the body.
    #[snafu(display("Failed to parse HAL response body"))]
    Parse {
        /// The parser's error.
        source: ParseErr,
    },
    /// A redirect came without a `Location` header.
    #[snafu(display("Redirect response ({status}) has no 'Location' header"))]
    MissingLocation {
        /// The redirect status code.
        status: StatusCode,
    },
    /// The `Location` header was not readable as text.
    #[snafu(display("Redirect 'Location' header is not valid text: {location}"))]
    InvalidLocation {
        /// The header value, lossily decoded.
        location: String,
        /// The underlying error.
        source: header::ToStrError,
    },
}

impl<HttpRespErr: crate::Error, ParseErr: crate::Error> ResponseError<HttpRespErr, ParseErr> {
    /// Returns `true` for the errors raised when a successful response had
    /// no content type, or one other than HAL JSON.
    pub fn is_unsupported(&self) -> bool {
        matches!(
            self,
            Self::MissingContentType { .. } | Self::UnsupportedContentType { .. }
        )
    }
}

impl<HttpRespErr: crate::Error, ParseErr: crate::Error> crate::Error
    for ResponseError<HttpRespErr, ParseErr>
{
    fn is_retryable(&self) -> bool {
        match self {
            Self::ResponseBodyRead { source } => source.is_retryable(),
            Self::Status { status, .. } => status.is_server_error(),
            Self::Parse { source } => source.is_retryable(),
            Self::MissingContentType { .. }
            | Self::UnsupportedContentType { .. }
            | Self::NonUtf8Body { .. }
            | Self::MissingLocation { .. }
            | Self::InvalidLocation { .. } => false,
        }
    }
}
