//! Resource identifier resolution

use crate::casing::KeyTransform;
use crate::descriptor::ResourceDescriptor;
use crate::error::{JsonApiError, JsonApiResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `{type, id}` pair identifying one resource
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Identifier {
	/// Resource type
	#[serde(rename = "type")]
	pub resource_type: String,
	/// Resource id
	pub id: String,
}

impl Identifier {
	/// Create an identifier
	pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
		Self {
			resource_type: resource_type.into(),
			id: id.into(),
		}
	}
}

/// Render an id value as a JSON:API id string
///
/// Strings are kept, numbers and booleans are stringified. Anything else, and
/// the empty string, is not a usable id.
pub(crate) fn id_string(value: &Value) -> Option<String> {
	match value {
		Value::String(id) if !id.is_empty() => Some(id.clone()),
		Value::Number(id) => Some(id.to_string()),
		Value::Bool(id) => Some(id.to_string()),
		_ => None,
	}
}

/// Derives identifiers from objects
#[derive(Debug, Clone, Copy)]
pub struct IdentifierResolver<'a> {
	transform: &'a KeyTransform,
}

impl<'a> IdentifierResolver<'a> {
	/// Resolver casing types with `transform`
	pub fn new(transform: &'a KeyTransform) -> Self {
		Self { transform }
	}

	/// Resolve the identifier of `object` as declared by `resource`
	///
	/// # Errors
	///
	/// Returns [`JsonApiError::MissingIdentifier`] when the object has no
	/// usable id, or when the resolved type is empty.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_jsonapi::{IdentifierResolver, KeyTransform, ResourceDescriptor};
	/// use serde_json::json;
	///
	/// let transform = KeyTransform::identity();
	/// let resolver = IdentifierResolver::new(&transform);
	///
	/// let users = ResourceDescriptor::new("users");
	/// let identifier = resolver.resolve(&json!({"id": 1}), &users).unwrap();
	/// assert_eq!(identifier.resource_type, "users");
	/// assert_eq!(identifier.id, "1");
	///
	/// let by_slug = ResourceDescriptor::new("users").set_id("slug");
	/// let identifier = resolver.resolve(&json!({"id": 1, "slug": "jane"}), &by_slug).unwrap();
	/// assert_eq!(identifier.id, "jane");
	/// ```
	pub fn resolve(&self, object: &Value, resource: &ResourceDescriptor) -> JsonApiResult<Identifier> {
		Ok(Identifier {
			resource_type: self.resolve_type(object, resource)?,
			id: self.resolve_id(object, resource)?,
		})
	}

	/// Resolve only the type of `object`
	pub fn resolve_type(&self, object: &Value, resource: &ResourceDescriptor) -> JsonApiResult<String> {
		let resource_type = match resource.type_spec() {
			Some(type_spec) => type_spec.resolve(object),
			None => resource.key().to_string(),
		};
		if resource_type.is_empty() {
			return Err(JsonApiError::missing_identifier(resource.key(), "type"));
		}
		Ok(self.transform.apply(&resource_type))
	}

	/// Resolve only the id of `object`
	pub fn resolve_id(&self, object: &Value, resource: &ResourceDescriptor) -> JsonApiResult<String> {
		let value = match resource.id_selector() {
			Some(selector) => selector.fetch(object),
			None => object.get("id").cloned().unwrap_or(Value::Null),
		};
		id_string(&value).ok_or_else(|| JsonApiError::missing_identifier(resource.key(), "id"))
	}
}
