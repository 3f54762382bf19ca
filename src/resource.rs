//! Resource objects

use crate::descriptor::ResourceDescriptor;
use crate::error::JsonApiResult;
use crate::identifier::Identifier;
use crate::links::InstanceLinks;
use crate::pipeline::Pipeline;
use crate::relationships::Relationship;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One serialized resource object
///
/// Members are emitted in the order `type`, `id`, `attributes`,
/// `relationships`, `meta`, `links`; absent members are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedResource {
	/// Resource type
	#[serde(rename = "type")]
	pub resource_type: String,
	/// Resource id
	pub id: String,
	/// Plain attributes
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub attributes: Option<Map<String, Value>>,
	/// Relationships by (cased) key
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub relationships: Option<IndexMap<String, Relationship>>,
	/// Resource-level meta
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<Value>,
	/// Resource-level links
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub links: Option<Map<String, Value>>,
}

impl SerializedResource {
	/// Identifier of this resource
	///
	/// Reused as-is when this resource is referenced again, so its type is
	/// never cased twice.
	pub fn identifier(&self) -> Identifier {
		Identifier::new(self.resource_type.as_str(), self.id.as_str())
	}
}

impl From<Identifier> for SerializedResource {
	fn from(identifier: Identifier) -> Self {
		Self {
			resource_type: identifier.resource_type,
			id: identifier.id,
			attributes: None,
			relationships: None,
			meta: None,
			links: None,
		}
	}
}

/// Object wrapped together with an identifier resolved earlier
///
/// Serializing it emits the identifier as given. Its type has already been
/// through key casing and is not cased again.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedObject {
	/// Identifier emitted for the object
	pub identifier: Identifier,
	/// Object read by attribute and relationship selectors
	pub object: Value,
}

impl ResolvedObject {
	/// Wrap `object` with its identifier
	pub fn new(identifier: Identifier, object: Value) -> Self {
		Self { identifier, object }
	}

	/// Wrap a resource serialized earlier
	///
	/// The object holds the resource's `id` and its attributes under their
	/// emitted keys.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_jsonapi::{Identifier, ResolvedObject, SerializedResource};
	/// use serde_json::json;
	///
	/// let mut resource = SerializedResource::from(Identifier::new("blogPosts", "4"));
	/// resource.attributes = json!({"title": "Hi"}).as_object().cloned();
	///
	/// let resolved = ResolvedObject::from_resource(&resource);
	/// assert_eq!(resolved.identifier, Identifier::new("blogPosts", "4"));
	/// assert_eq!(resolved.object, json!({"title": "Hi", "id": "4"}));
	/// ```
	pub fn from_resource(resource: &SerializedResource) -> Self {
		let mut object = resource.attributes.clone().unwrap_or_default();
		object.insert("id".to_string(), Value::String(resource.id.clone()));
		Self::new(resource.identifier(), Value::Object(object))
	}
}

/// Primary data of a document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PrimaryData {
	/// Resources serialized from a collection, in input order
	Collection(Vec<SerializedResource>),
	/// Resource serialized from a single object
	Single(Box<SerializedResource>),
}

impl PrimaryData {
	/// Whether the data was serialized from a collection
	pub fn is_collection(&self) -> bool {
		matches!(self, PrimaryData::Collection(_))
	}

	/// Serialized resources, in order
	pub fn resources(&self) -> Vec<&SerializedResource> {
		match self {
			PrimaryData::Collection(resources) => resources.iter().collect(),
			PrimaryData::Single(resource) => vec![resource.as_ref()],
		}
	}
}

impl Pipeline<'_> {
	/// Serialize one object into a resource object
	pub(crate) fn assemble(
		&self,
		object: &Value,
		resource: &ResourceDescriptor,
		links: &InstanceLinks,
	) -> JsonApiResult<SerializedResource> {
		let identifier = self.resolver.resolve(object, resource)?;
		self.assemble_resolved(identifier, object, resource, links)
	}

	/// Serialize one object under an identifier that is already resolved
	pub(crate) fn assemble_resolved(
		&self,
		identifier: Identifier,
		object: &Value,
		resource: &ResourceDescriptor,
		links: &InstanceLinks,
	) -> JsonApiResult<SerializedResource> {
		let Identifier { resource_type, id } = identifier;

		let attributes = if resource.has_attributes() {
			Some(self.project_attributes(object, resource)?)
		} else {
			None
		};
		let relationships = if resource.has_relationships() {
			Some(self.build_relationships(object, resource)?)
		} else {
			None
		};

		Ok(SerializedResource {
			resource_type,
			id,
			attributes,
			relationships,
			meta: resource.meta_builder().map(|meta| meta(object)),
			links: links.resolve(object),
		})
	}

	/// Serialize an object, or each element of an array in order
	///
	/// The first failing element aborts the whole collection.
	pub(crate) fn assemble_data(
		&self,
		data: &Value,
		resource: &ResourceDescriptor,
		links: &InstanceLinks,
	) -> JsonApiResult<PrimaryData> {
		match data {
			Value::Array(objects) => objects
				.iter()
				.map(|object| self.assemble(object, resource, links))
				.collect::<JsonApiResult<Vec<_>>>()
				.map(PrimaryData::Collection),
			object => self
				.assemble(object, resource, links)
				.map(|resource| PrimaryData::Single(Box::new(resource))),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::casing::{KeyCase, KeyTransform};
	use crate::condition::{Condition, MethodRegistry};
	use crate::descriptor::Association;
	use crate::error::JsonApiError;
	use crate::options::{Context, SerializeOptions};
	use rstest::rstest;
	use serde_json::json;

	fn assemble_with(
		resource: &ResourceDescriptor,
		data: &Value,
		transform: &KeyTransform,
	) -> JsonApiResult<PrimaryData> {
		let methods = MethodRegistry::new();
		let options = SerializeOptions::new();
		let pipeline = Pipeline::new(transform, &methods, None, Context::new(&options));
		let links = InstanceLinks::new(resource.link_template(), transform);
		pipeline.assemble_data(data, resource, &links)
	}

	#[rstest]
	fn test_member_order() {
		let resource = ResourceDescriptor::new("users")
			.attribute("name")
			.has_many(Association::new("posts"))
			.meta(|user| json!({"rank": user["rank"]}))
			.link("self", |user| json!(format!("/users/{}", user["id"])));
		let data = assemble_with(
			&resource,
			&json!({"id": 1, "name": "Jane", "posts": [], "rank": 3}),
			&KeyTransform::identity(),
		)
		.unwrap();

		let value = serde_json::to_value(&data).unwrap();
		let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
		assert_eq!(keys, ["type", "id", "attributes", "relationships", "meta", "links"]);
		assert_eq!(value["meta"], json!({"rank": 3}));
		assert_eq!(value["links"], json!({"self": "/users/1"}));
	}

	#[rstest]
	fn test_identifier_only_resource() {
		let resource = ResourceDescriptor::new("users");
		let data = assemble_with(&resource, &json!({"id": 1}), &KeyTransform::identity()).unwrap();
		assert_eq!(
			serde_json::to_value(&data).unwrap(),
			json!({"type": "users", "id": "1"})
		);
	}

	#[rstest]
	fn test_declared_sections_present_when_every_field_skipped() {
		let resource = ResourceDescriptor::new("users")
			.attribute_if("email", "email", Condition::nullary(|| false))
			.has_many(Association::new("posts").condition(Condition::nullary(|| false)));
		let data = assemble_with(&resource, &json!({"id": 1}), &KeyTransform::identity()).unwrap();
		assert_eq!(
			serde_json::to_value(&data).unwrap(),
			json!({"type": "users", "id": "1", "attributes": {}, "relationships": {}})
		);
	}

	#[rstest]
	fn test_collection_preserves_order() {
		let resource = ResourceDescriptor::new("users").attribute("name");
		let data = assemble_with(
			&resource,
			&json!([{"id": 3, "name": "C"}, {"id": 1, "name": "A"}, {"id": 3, "name": "C"}]),
			&KeyTransform::identity(),
		)
		.unwrap();

		assert!(data.is_collection());
		let ids: Vec<_> = data.resources().iter().map(|r| r.id.as_str()).collect();
		assert_eq!(ids, ["3", "1", "3"]);
	}

	#[rstest]
	fn test_empty_collection() {
		let resource = ResourceDescriptor::new("users");
		let data = assemble_with(&resource, &json!([]), &KeyTransform::identity()).unwrap();
		assert_eq!(data, PrimaryData::Collection(vec![]));
	}

	#[rstest]
	fn test_failing_element_aborts_collection() {
		let resource = ResourceDescriptor::new("users").attribute("name");
		let err = assemble_with(
			&resource,
			&json!([{"id": 1, "name": "A"}, {"name": "no id"}]),
			&KeyTransform::identity(),
		)
		.unwrap_err();
		assert!(matches!(err, JsonApiError::MissingIdentifier { .. }));
	}

	#[rstest]
	fn test_link_names_cased() {
		let resource = ResourceDescriptor::new("users").link("self_link", |_| json!("/users/1"));
		let data = assemble_with(
			&resource,
			&json!({"id": 1}),
			&KeyTransform::case(KeyCase::LowerCamel),
		)
		.unwrap();
		assert_eq!(data.resources()[0].links, json!({"selfLink": "/users/1"}).as_object().cloned());
	}

	#[rstest]
	fn test_resolved_type_not_cased_again() {
		let transform = KeyTransform::case(KeyCase::Dash);
		let methods = MethodRegistry::new();
		let options = SerializeOptions::new();
		let pipeline = Pipeline::new(&transform, &methods, None, Context::new(&options));
		let resource = ResourceDescriptor::new("blog_posts").attribute("post_title");
		let links = InstanceLinks::new(resource.link_template(), &transform);

		let assembled = pipeline
			.assemble_resolved(
				Identifier::new("blogPosts", "4"),
				&json!({"id": 9, "post_title": "Hi"}),
				&resource,
				&links,
			)
			.unwrap();

		assert_eq!(assembled.identifier(), Identifier::new("blogPosts", "4"));
		assert_eq!(assembled.attributes, json!({"post-title": "Hi"}).as_object().cloned());
	}

	#[rstest]
	fn test_identifier_from_serialized_resource() {
		let resource = SerializedResource::from(Identifier::new("blog-posts", "4"));
		assert_eq!(resource.identifier(), Identifier::new("blog-posts", "4"));
		assert_eq!(
			serde_json::to_value(&resource).unwrap(),
			json!({"type": "blog-posts", "id": "4"})
		);
	}
}
