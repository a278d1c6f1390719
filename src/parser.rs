//! The HAL parser seam.
//!
//! The client hands response bodies to a [`HalParser`] and never looks at
//! the JSON itself. [`JsonHalParser`] is the default implementation, built
//! on `serde_json`.

use serde::Deserialize as _;
use serde_json::Value;
use snafu::prelude::*;

use crate::{platform::MaybeSendSync, resource::Resource};

/// Turns HAL JSON text into a [`Resource`].
pub trait HalParser: MaybeSendSync {
    /// The error returned for malformed documents.
    type Error: crate::Error;

    /// Parses a HAL document.
    ///
    /// # Errors
    ///
    /// Returns an error if `json` is not a well-formed HAL document.
    fn parse(&self, json: &str) -> Result<Resource, Self::Error>;
}

/// The default parser.
///
/// The document must be a JSON object. `_links` relations hold a link
/// object or an array of them, `_embedded` relations hold a resource or an
/// array of resources, and every other member becomes a state property.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonHalParser;

impl HalParser for JsonHalParser {
    type Error = JsonHalParseError;

    fn parse(&self, json: &str) -> Result<Resource, Self::Error> {
        let value: Value = serde_json::from_str(json).context(SyntaxSnafu)?;

        ensure!(
            value.is_object(),
            NotAnObjectSnafu {
                found: json_type_name(&value)
            }
        );

        Resource::deserialize(value).context(StructureSnafu)
    }
}

/// Errors from [`JsonHalParser`].
#[derive(Debug, Snafu)]
pub enum JsonHalParseError {
    /// The text was not valid JSON.
    #[snafu(display("Response body is not valid JSON"))]
    Syntax {
        /// The underlying error.
        source: serde_json::Error,
    },
    /// The document was valid JSON, but not an object.
    #[snafu(display("HAL document must be a JSON object, found {found}"))]
    NotAnObject {
        /// The JSON type that was found instead.
        found: &'static str,
    },
    /// `_links` or `_embedded` did not have the shape HAL requires.
    #[snafu(display("Malformed HAL document"))]
    Structure {
        /// The underlying error.
        source: serde_json::Error,
    },
}

impl crate::Error for JsonHalParseError {
    fn is_retryable(&self) -> bool {
        false
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_hal_document() {
        let source = r#"
            {
              "_links": {
                "self": { "href": "/orders" },
                "next": { "href": "/orders?page=2" },
                "find": { "href": "/orders{?id}", "templated": true },
                "curies": [{ "name": "ea", "href": "http://example.com/docs/rels/{rel}", "templated": true }]
              },
              "currentlyProcessing": 14,
              "shippedToday": 20,
              "_embedded": {
                "ea:order": [
                  {
                    "_links": { "self": { "href": "/orders/123" } },
                    "total": 30.00,
                    "currency": "USD",
                    "status": "shipped"
                  },
                  {
                    "_links": { "self": { "href": "/orders/124" } },
                    "total": 20.00,
                    "currency": "USD",
                    "status": "processing"
                  }
                ]
              }
            }
        "#;

        let resource = JsonHalParser.parse(source).unwrap();

        assert_eq!(resource.self_link().unwrap().href, "/orders");
        assert!(resource.link("find").unwrap().templated);
        assert_eq!(
            resource.links_for("curies")[0].name.as_deref(),
            Some("ea")
        );
        assert_eq!(resource.property("shippedToday"), Some(&json!(20)));
        assert!(resource.property("_links").is_none());
        assert!(resource.property("_embedded").is_none());

        let orders = resource.embedded_for("ea:order");
        assert_eq!(orders.len(), 2);
        assert_eq!(orders[1].self_link().unwrap().href, "/orders/124");
        assert_eq!(orders[1].property("status"), Some(&json!("processing")));
    }

    #[test]
    fn test_plain_json_object_is_all_state() {
        let resource = JsonHalParser.parse(r#"{"message":"not found"}"#).unwrap();
        assert_eq!(resource.links().count(), 0);
        assert_eq!(resource.property("message"), Some(&json!("not found")));
    }

    #[test]
    fn test_single_form_survives_serialization() {
        let source = json!({
            "_links": { "self": { "href": "/a" }, "item": [{ "href": "/a/1" }] },
            "_embedded": { "owner": { "name": "n" } },
            "count": 1
        });

        let resource = JsonHalParser.parse(&source.to_string()).unwrap();
        assert_eq!(serde_json::to_value(&resource).unwrap(), source);
    }

    #[test]
    fn test_invalid_json() {
        let err = JsonHalParser.parse("{not json").unwrap_err();
        assert!(matches!(err, JsonHalParseError::Syntax { .. }));
    }

    #[test]
    fn test_non_object_document() {
        let err = JsonHalParser.parse("[1, 2]").unwrap_err();
        assert!(matches!(err, JsonHalParseError::NotAnObject { found: "an array" }));
    }

    #[test]
    fn test_link_without_href() {
        let err = JsonHalParser
            .parse(r#"{"_links": {"self": {"title": "no href"}}}"#)
            .unwrap_err();
        assert!(matches!(err, JsonHalParseError::Structure { .. }));
    }

    #[test]
    fn test_links_must_be_an_object() {
        let err = JsonHalParser.parse(r#"{"_links": "/self"}"#).unwrap_err();
        assert!(matches!(err, JsonHalParseError::Structure { .. }));
    }

    #[test]
    fn test_link_relation_of_strings_is_rejected() {
        for links in [r#"["/a"]"#, r#"["/a", true]"#, r#"[["/a"]]"#, r#""/a""#] {
            let source = format!(r#"{{"_links": {{"self": {links}}}}}"#);
            let err = JsonHalParser.parse(&source).unwrap_err();
            assert!(
                matches!(err, JsonHalParseError::Structure { .. }),
                "{source} gave {err:?}"
            );
        }
    }

    #[test]
    fn test_embedded_relation_of_arrays_is_rejected() {
        let err = JsonHalParser
            .parse(r#"{"_embedded": {"item": [[{"id": 1}]]}}"#)
            .unwrap_err();
        assert!(matches!(err, JsonHalParseError::Structure { .. }));
    }

    #[test]
    fn test_empty_link_array_is_kept() {
        let resource = JsonHalParser.parse(r#"{"_links": {"item": []}}"#).unwrap();
        assert!(resource.links_for("item").is_empty());
        assert!(resource.link("item").is_none());
    }
}
