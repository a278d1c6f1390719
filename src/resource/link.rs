use bon::Builder;
use serde::{Deserialize, Serialize};

/// A HAL link object.
///
/// Only `href` is required. The remaining attributes are the optional ones
/// defined by the HAL draft; unknown attributes are ignored when parsing.
#[derive(Debug, Clone, PartialEq, Eq, Builder, Serialize, Deserialize)]
pub struct Link {
    /// The target URI, or a URI template when [`Link::templated`] is set.
    #[builder(into)]
    pub href: String,
    /// Whether `href` is a URI template.
    #[builder(default)]
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub templated: bool,
    /// A hint for the media type expected when dereferencing the target.
    #[builder(into)]
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// Present when the link is to be deprecated; points at more information.
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deprecation: Option<String>,
    /// A secondary key for selecting among links sharing a relation.
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// A profile URI describing the target resource.
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// A human-readable label.
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// The language of the target resource.
    #[builder(into)]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hreflang: Option<String>,
}

impl Link {
    /// Creates a plain, non-templated link to `href`.
    pub fn new(href: impl Into<String>) -> Self {
        Self::builder().href(href).build()
    }
}
