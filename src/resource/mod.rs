//! The resource model: parsed HAL documents and the empty sentinel.
//!
//! A [`Resource`] holds three collections: links keyed by relation,
//! embedded resources keyed by relation, and every other JSON member as a
//! state property. [`RootResource`] is what the client hands back for a
//! response; it is either a parsed document or the empty resource produced
//! for `204 No Content`.

mod link;

use std::collections::{BTreeMap, btree_map::Entry};
use std::fmt;
use std::marker::PhantomData;
use std::ops::Deref;

use serde::de::{
    DeserializeOwned, MapAccess, SeqAccess, Visitor, value::MapAccessDeserializer,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

pub use link::Link;

/// One or more values sharing a link relation.
///
/// HAL allows a relation to hold either a single object or an array. The
/// form is kept so that a resource serializes back the way it was received.
/// Only JSON objects are accepted as values, in either form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OneOrMany<T> {
    /// A single object.
    One(T),
    /// An array of objects, possibly empty.
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    /// Returns the values as a slice, regardless of form.
    pub fn as_slice(&self) -> &[T] {
        match self {
            Self::One(value) => std::slice::from_ref(value),
            Self::Many(values) => values,
        }
    }

    /// Returns the first value, if any.
    pub fn first(&self) -> Option<&T> {
        self.as_slice().first()
    }

    fn push(&mut self, value: T) {
        let values = match std::mem::replace(self, Self::Many(Vec::new())) {
            Self::One(first) => vec![first, value],
            Self::Many(mut values) => {
                values.push(value);
                values
            }
        };
        *self = Self::Many(values);
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for OneOrMany<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct OneOrManyVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for OneOrManyVisitor<T> {
            type Value = OneOrMany<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object or an array of objects")
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                T::deserialize(MapAccessDeserializer::new(map)).map(OneOrMany::One)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(ObjectOnly(value)) = seq.next_element()? {
                    values.push(value);
                }
                Ok(OneOrMany::Many(values))
            }
        }

        deserializer.deserialize_any(OneOrManyVisitor(PhantomData))
    }
}

/// Deserializes `T` from a JSON object and nothing else. Derived struct
/// impls would also take the positional array form.
struct ObjectOnly<T>(T);

impl<'de, T: Deserialize<'de>> Deserialize<'de> for ObjectOnly<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ObjectOnlyVisitor<T>(PhantomData<T>);

        impl<'de, T: Deserialize<'de>> Visitor<'de> for ObjectOnlyVisitor<T> {
            type Value = ObjectOnly<T>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object")
            }

            fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
                T::deserialize(MapAccessDeserializer::new(map)).map(ObjectOnly)
            }
        }

        deserializer.deserialize_map(ObjectOnlyVisitor(PhantomData))
    }
}

/// A HAL resource.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    #[serde(rename = "_links", default, skip_serializing_if = "BTreeMap::is_empty")]
    links: BTreeMap<String, OneOrMany<Link>>,
    #[serde(
        rename = "_embedded",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    embedded: BTreeMap<String, OneOrMany<Resource>>,
    #[serde(flatten)]
    state: Map<String, Value>,
}

impl Resource {
    /// Creates a resource with no links, embedded resources or properties.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a link under `rel`. A second link for the same relation turns
    /// the relation into an array.
    #[must_use]
    pub fn with_link(mut self, rel: impl Into<String>, link: Link) -> Self {
        match self.links.entry(rel.into()) {
            Entry::Occupied(mut entry) => entry.get_mut().push(link),
            Entry::Vacant(entry) => {
                entry.insert(OneOrMany::One(link));
            }
        }
        self
    }

    /// Adds an embedded resource under `rel`.
    #[must_use]
    pub fn with_embedded(mut self, rel: impl Into<String>, resource: Resource) -> Self {
        match self.embedded.entry(rel.into()) {
            Entry::Occupied(mut entry) => {
                entry.get_mut().push(resource);
            }
            Entry::Vacant(entry) => {
                entry.insert(OneOrMany::One(resource));
            }
        }
        self
    }

    /// Sets a state property.
    #[must_use]
    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.state.insert(key.into(), value.into());
        self
    }

    /// Returns every link relation with its links.
    pub fn links(&self) -> impl Iterator<Item = (&str, &[Link])> {
        self.links
            .iter()
            .map(|(rel, links)| (rel.as_str(), links.as_slice()))
    }

    /// Returns the links for `rel`, or an empty slice.
    pub fn links_for(&self, rel: &str) -> &[Link] {
        self.links
            .get(rel)
            .map(OneOrMany::as_slice)
            .unwrap_or_default()
    }

    /// Returns the first link for `rel`.
    pub fn link(&self, rel: &str) -> Option<&Link> {
        self.links.get(rel).and_then(OneOrMany::first)
    }

    /// Returns the `self` link.
    pub fn self_link(&self) -> Option<&Link> {
        self.link("self")
    }

    /// Returns every embedded relation with its resources.
    pub fn embedded(&self) -> impl Iterator<Item = (&str, &[Resource])> {
        self.embedded
            .iter()
            .map(|(rel, resources)| (rel.as_str(), resources.as_slice()))
    }

    /// Returns the embedded resources for `rel`, or an empty slice.
    pub fn embedded_for(&self, rel: &str) -> &[Resource] {
        self.embedded
            .get(rel)
            .map(OneOrMany::as_slice)
            .unwrap_or_default()
    }

    /// Returns the state properties.
    pub fn properties(&self) -> &Map<String, Value> {
        &self.state
    }

    /// Returns a single state property.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.state.get(key)
    }

    /// Deserializes a state property into `T`.
    ///
    /// Returns `None` if the property is absent.
    pub fn property_as<T: DeserializeOwned>(
        &self,
        key: &str,
    ) -> Option<Result<T, serde_json::Error>> {
        self.state.get(key).cloned().map(serde_json::from_value)
    }

    /// Deserializes all state properties into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if the properties do not match `T`.
    pub fn state_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.state.clone()))
    }

    /// Returns `true` if there are no links, embedded resources or properties.
    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.embedded.is_empty() && self.state.is_empty()
    }
}

/// The resource produced for a single interpreted response.
///
/// Dereferences to [`Resource`]. Built once by the client and handed over;
/// nothing inside the client keeps a reference to it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RootResource(Resource);

impl RootResource {
    /// The resource returned for responses without content.
    #[must_use]
    pub fn empty() -> Self {
        Self(Resource::new())
    }

    /// Consumes the root and returns the underlying [`Resource`].
    #[must_use]
    pub fn into_resource(self) -> Resource {
        self.0
    }
}

impl From<Resource> for RootResource {
    fn from(resource: Resource) -> Self {
        Self(resource)
    }
}

impl Deref for RootResource {
    type Target = Resource;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_empty_root_has_nothing() {
        let root = RootResource::empty();
        assert!(root.is_empty());
        assert_eq!(root.links().count(), 0);
        assert_eq!(root.embedded().count(), 0);
        assert!(root.properties().is_empty());
        assert_eq!(serde_json::to_value(&root).unwrap(), json!({}));
    }

    #[test]
    fn test_repeated_relation_becomes_array() {
        let resource = Resource::new()
            .with_link("item", Link::new("/orders/1"))
            .with_link("item", Link::new("/orders/2"))
            .with_link("self", Link::new("/orders"));

        assert_eq!(resource.links_for("item").len(), 2);
        assert_eq!(resource.self_link().unwrap().href, "/orders");
        assert_eq!(
            serde_json::to_value(&resource).unwrap(),
            json!({
                "_links": {
                    "item": [{ "href": "/orders/1" }, { "href": "/orders/2" }],
                    "self": { "href": "/orders" }
                }
            })
        );
    }

    #[test]
    fn test_missing_relations_are_empty() {
        let resource = Resource::new().with_property("total", 3);
        assert!(resource.link("next").is_none());
        assert!(resource.links_for("next").is_empty());
        assert!(resource.embedded_for("orders").is_empty());
        assert!(!resource.is_empty());
    }

    #[test]
    fn test_typed_state() {
        #[derive(Deserialize)]
        struct Order {
            total: f64,
            currency: String,
        }

        let resource = Resource::new()
            .with_property("total", 30.0)
            .with_property("currency", "EUR")
            .with_embedded("customer", Resource::new().with_property("id", 7));

        let order: Order = resource.state_as().unwrap();
        assert!((order.total - 30.0).abs() < f64::EPSILON);
        assert_eq!(order.currency, "EUR");
        assert_eq!(resource.property_as::<String>("currency").unwrap().unwrap(), "EUR");
        assert!(resource.property_as::<u32>("currency").unwrap().is_err());
        assert!(resource.property_as::<u32>("missing").is_none());
        assert_eq!(
            resource.embedded_for("customer")[0].property("id"),
            Some(&json!(7))
        );
    }
}
