//! Link declarations for resources and relationships

use crate::casing::KeyTransform;
use crate::error::{JsonApiError, JsonApiResult};
use crate::selector::{ComputeFn, Selector};
use indexmap::IndexMap;
use serde_json::{Map, Value};
use std::fmt;

/// Links declared on an association
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi::{LinkSpec, Selector};
/// use serde_json::json;
///
/// // The object already carries a ready-made mapping
/// let spec = LinkSpec::method("author_links");
///
/// // One selector per link relation
/// let spec = LinkSpec::map([
///     ("related", Selector::key("author_url")),
///     ("self", Selector::compute(|post| json!(format!("/posts/{}/relationships/author", post["id"])))),
/// ]);
/// ```
#[derive(Clone)]
pub enum LinkSpec {
	/// Member of the object holding a mapping of relation name to URL
	Method(String),
	/// Relation name to selector
	Map(IndexMap<String, Selector>),
}

impl LinkSpec {
	/// Links read from a member of the object
	pub fn method(name: impl Into<String>) -> Self {
		Self::Method(name.into())
	}

	/// Links resolved one selector per relation
	pub fn map<I, K>(links: I) -> Self
	where
		I: IntoIterator<Item = (K, Selector)>,
		K: Into<String>,
	{
		Self::Map(links.into_iter().map(|(k, v)| (k.into(), v)).collect())
	}

	/// Resolve the links for `object`, casing relation names with `transform`
	///
	/// # Errors
	///
	/// Returns [`JsonApiError::InvalidLinkSpec`] when a [`LinkSpec::Method`]
	/// member does not hold an object.
	pub fn resolve(&self, object: &Value, transform: &KeyTransform) -> JsonApiResult<Value> {
		let links = match self {
			LinkSpec::Method(name) => match Selector::key(name.as_str()).fetch(object) {
				Value::Object(links) => links
					.into_iter()
					.map(|(rel, url)| (transform.apply(&rel), url))
					.collect(),
				other => {
					return Err(JsonApiError::InvalidLinkSpec(format!(
						"member '{}' returned {}, expected an object",
						name, other
					)));
				}
			},
			LinkSpec::Map(links) => links
				.iter()
				.map(|(rel, selector)| (transform.apply(rel), selector.fetch(object)))
				.collect::<Map<String, Value>>(),
		};
		Ok(Value::Object(links))
	}
}

impl TryFrom<Value> for LinkSpec {
	type Error = JsonApiError;

	/// Parse a link declaration from configuration
	///
	/// A string names a member holding the links. An object maps each relation
	/// to the name of the member holding its URL.
	fn try_from(value: Value) -> Result<Self, Self::Error> {
		match value {
			Value::String(name) => Ok(Self::Method(name)),
			Value::Object(links) => links
				.into_iter()
				.map(|(rel, member)| match member {
					Value::String(member) => Ok((rel, Selector::Key(member))),
					other => Err(JsonApiError::InvalidLinkSpec(format!(
						"link '{}' must name a member, got {}",
						rel, other
					))),
				})
				.collect::<JsonApiResult<IndexMap<_, _>>>()
				.map(Self::Map),
			other => Err(JsonApiError::InvalidLinkSpec(other.to_string())),
		}
	}
}

impl fmt::Debug for LinkSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LinkSpec::Method(name) => f.debug_tuple("Method").field(name).finish(),
			LinkSpec::Map(links) => f.debug_tuple("Map").field(links).finish(),
		}
	}
}

/// Resource links cased for one serialization call
///
/// Built fresh from the declared template at the start of every call so the
/// shared declaration is never modified.
pub(crate) struct InstanceLinks {
	links: Vec<(String, ComputeFn)>,
}

impl InstanceLinks {
	pub(crate) fn new(template: &IndexMap<String, ComputeFn>, transform: &KeyTransform) -> Self {
		Self {
			links: template
				.iter()
				.map(|(rel, link)| (transform.apply(rel), link.clone()))
				.collect(),
		}
	}

	/// Links for `object`, or `None` when no link is declared
	pub(crate) fn resolve(&self, object: &Value) -> Option<Map<String, Value>> {
		if self.links.is_empty() {
			return None;
		}
		Some(
			self.links
				.iter()
				.map(|(rel, link)| (rel.clone(), link(object)))
				.collect(),
		)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::casing::KeyCase;
	use rstest::{fixture, rstest};
	use serde_json::json;
	use std::sync::Arc;

	#[fixture]
	fn post() -> Value {
		json!({
			"id": 7,
			"author_url": "/users/3",
			"author_links": {"related_author": "/users/3", "self": "/posts/7/relationships/author"}
		})
	}

	#[rstest]
	fn test_method_spec_reads_mapping(post: Value) {
		let links = LinkSpec::method("author_links")
			.resolve(&post, &KeyTransform::identity())
			.unwrap();
		assert_eq!(
			links,
			json!({"related_author": "/users/3", "self": "/posts/7/relationships/author"})
		);
	}

	#[rstest]
	fn test_method_spec_cases_relation_names(post: Value) {
		let links = LinkSpec::method("author_links")
			.resolve(&post, &KeyTransform::case(KeyCase::LowerCamel))
			.unwrap();
		assert!(links.get("relatedAuthor").is_some());
	}

	#[rstest]
	fn test_method_spec_requires_object(post: Value) {
		let err = LinkSpec::method("author_url")
			.resolve(&post, &KeyTransform::identity())
			.unwrap_err();
		assert!(matches!(err, JsonApiError::InvalidLinkSpec(_)));
	}

	#[rstest]
	fn test_map_spec(post: Value) {
		let spec = LinkSpec::map([
			("related", Selector::key("author_url")),
			(
				"self",
				Selector::compute(|post| json!(format!("/posts/{}", post["id"]))),
			),
		]);
		let links = spec.resolve(&post, &KeyTransform::identity()).unwrap();
		assert_eq!(links, json!({"related": "/users/3", "self": "/posts/7"}));
	}

	#[rstest]
	fn test_try_from_string() {
		let spec = LinkSpec::try_from(json!("author_links")).unwrap();
		assert!(matches!(spec, LinkSpec::Method(ref name) if name == "author_links"));
	}

	#[rstest]
	fn test_try_from_object(post: Value) {
		let spec = LinkSpec::try_from(json!({"related": "author_url"})).unwrap();
		let links = spec.resolve(&post, &KeyTransform::identity()).unwrap();
		assert_eq!(links, json!({"related": "/users/3"}));
	}

	#[rstest]
	#[case(json!(42))]
	#[case(json!(["author_url"]))]
	#[case(json!({"related": 1}))]
	#[case(json!(null))]
	fn test_try_from_invalid(#[case] value: Value) {
		let err = LinkSpec::try_from(value).unwrap_err();
		assert!(matches!(err, JsonApiError::InvalidLinkSpec(_)));
	}

	#[rstest]
	fn test_instance_links_do_not_touch_template(post: Value) {
		let mut template: IndexMap<String, ComputeFn> = IndexMap::new();
		template.insert(
			"self_link".to_string(),
			Arc::new(|obj: &Value| json!(format!("/posts/{}", obj["id"]))),
		);

		let links = InstanceLinks::new(&template, &KeyTransform::case(KeyCase::LowerCamel));
		let resolved = links.resolve(&post).unwrap();

		assert_eq!(resolved.get("selfLink"), Some(&json!("/posts/7")));
		assert!(template.contains_key("self_link"));
	}

	#[rstest]
	fn test_instance_links_empty() {
		let links = InstanceLinks::new(&IndexMap::new(), &KeyTransform::identity());
		assert!(links.resolve(&json!({})).is_none());
	}
}
