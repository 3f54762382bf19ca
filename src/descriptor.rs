//! Resource declarations
//!
//! A [`ResourceDescriptor`] is built once per resource and only read while
//! serializing. Deriving a resource from another one copies the parent's
//! configuration; the two never share mutable state.

use crate::condition::Condition;
use crate::links::LinkSpec;
use crate::selector::{ComputeFn, Selector};
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Member names always emitted through the identifier, never as attributes
pub const RESERVED_KEYS: [&str; 2] = ["id", "type"];

/// Explicit `type` of a resource
#[derive(Clone)]
pub enum TypeSpec {
	/// Fixed type string
	Static(String),
	/// Type computed from the object
	Computed(Arc<dyn Fn(&Value) -> String + Send + Sync>),
}

impl TypeSpec {
	/// Type computed from the object
	pub fn computed<F>(compute: F) -> Self
	where
		F: Fn(&Value) -> String + Send + Sync + 'static,
	{
		Self::Computed(Arc::new(compute))
	}

	pub(crate) fn resolve(&self, object: &Value) -> String {
		match self {
			TypeSpec::Static(name) => name.clone(),
			TypeSpec::Computed(compute) => compute(object),
		}
	}
}

impl From<&str> for TypeSpec {
	fn from(name: &str) -> Self {
		Self::Static(name.to_string())
	}
}

impl From<String> for TypeSpec {
	fn from(name: String) -> Self {
		Self::Static(name)
	}
}

impl fmt::Debug for TypeSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			TypeSpec::Static(name) => f.debug_tuple("Static").field(name).finish(),
			TypeSpec::Computed(_) => f.write_str("Computed(..)"),
		}
	}
}

/// Target resource of an association
#[derive(Debug, Clone)]
pub enum ResourceRef {
	/// Descriptor given directly
	Direct(Arc<ResourceDescriptor>),
	/// Descriptor looked up in a [`ResourceRegistry`] when serializing
	Named(String),
}

/// A declared relationship to other resources
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi::{Association, Condition, ResourceDescriptor};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let posts = Arc::new(ResourceDescriptor::new("posts").attribute("title"));
///
/// let association = Association::new("articles")
///     .key("posts")
///     .resource(posts)
///     .meta(|user| json!({"count": user["articles"].as_array().map_or(0, Vec::len)}))
///     .condition(Condition::object(|user| user["active"] == json!(true)));
///
/// assert_eq!(association.name(), "articles");
/// assert_eq!(association.output_key(), "posts");
/// ```
#[derive(Clone)]
pub struct Association {
	name: String,
	key: Option<String>,
	selector: Selector,
	resource: Option<ResourceRef>,
	nesting: Option<String>,
	meta: Option<ComputeFn>,
	links: Option<LinkSpec>,
	condition: Condition,
}

impl Association {
	/// Association named `name`, reading the member of the same name
	pub fn new(name: impl Into<String>) -> Self {
		let name = name.into();
		Self {
			selector: Selector::key(name.as_str()),
			name,
			key: None,
			resource: None,
			nesting: None,
			meta: None,
			links: None,
			condition: Condition::Always,
		}
	}

	/// Output key, when it differs from the association name
	pub fn key(mut self, key: impl Into<String>) -> Self {
		self.key = Some(key.into());
		self
	}

	/// Selector producing the related object(s)
	pub fn selector(mut self, selector: impl Into<Selector>) -> Self {
		self.selector = selector.into();
		self
	}

	/// Serialize related objects with `resource`
	pub fn resource(mut self, resource: Arc<ResourceDescriptor>) -> Self {
		self.resource = Some(ResourceRef::Direct(resource));
		self
	}

	/// Serialize related objects with the registered resource `name`
	pub fn resource_named(mut self, name: impl Into<String>) -> Self {
		self.resource = Some(ResourceRef::Named(name.into()));
		self
	}

	/// Namespace searched first when resolving a named resource
	pub fn nesting(mut self, nesting: impl Into<String>) -> Self {
		self.nesting = Some(nesting.into());
		self
	}

	/// Relationship-level meta computed from the owning object
	pub fn meta<F>(mut self, meta: F) -> Self
	where
		F: Fn(&Value) -> Value + Send + Sync + 'static,
	{
		self.meta = Some(Arc::new(meta));
		self
	}

	/// Relationship-level links
	pub fn links(mut self, links: LinkSpec) -> Self {
		self.links = Some(links);
		self
	}

	/// Emit the relationship only when `condition` holds
	pub fn condition(mut self, condition: Condition) -> Self {
		self.condition = condition;
		self
	}

	/// Association name, used to match include requests
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Key of the relationship before casing
	pub fn output_key(&self) -> &str {
		self.key.as_deref().unwrap_or(&self.name)
	}

	/// Fetch the related value(s) from the owning object
	pub fn fetch(&self, object: &Value) -> Value {
		self.selector.fetch(object)
	}

	pub(crate) fn resource_ref(&self) -> Option<&ResourceRef> {
		self.resource.as_ref()
	}

	pub(crate) fn nesting_path(&self) -> Option<&str> {
		self.nesting.as_deref()
	}

	pub(crate) fn meta_builder(&self) -> Option<&ComputeFn> {
		self.meta.as_ref()
	}

	pub(crate) fn link_spec(&self) -> Option<&LinkSpec> {
		self.links.as_ref()
	}

	pub(crate) fn take_condition(&mut self) -> Condition {
		std::mem::take(&mut self.condition)
	}

	/// Type used for related items that carry no type of their own
	pub fn default_type(&self) -> &str {
		self.name.strip_suffix('s').unwrap_or(&self.name)
	}
}

impl fmt::Debug for Association {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Association")
			.field("name", &self.name)
			.field("key", &self.key)
			.field("selector", &self.selector)
			.field("resource", &self.resource)
			.field("nesting", &self.nesting)
			.field("meta", &self.meta.as_ref().map(|_| ".."))
			.field("links", &self.links)
			.field("condition", &self.condition)
			.finish()
	}
}

/// Field wrapped by a condition
#[derive(Debug, Clone)]
pub enum Field {
	/// Plain attribute
	Attribute(Selector),
	/// Relationship
	Association(Association),
}

/// Declared field of a resource
#[derive(Debug, Clone)]
pub enum FieldSpec {
	/// Plain attribute emitted under `attributes`
	Attribute(Selector),
	/// Relationship emitted under `relationships`
	Association(Association),
	/// Attribute or relationship emitted only when the condition holds
	Conditional(Field, Condition),
}

/// A field with its condition unwrapped
#[derive(Debug, Clone, Copy)]
pub(crate) enum FieldKind<'a> {
	Attribute(&'a Selector),
	Association(&'a Association),
}

static ALWAYS: Condition = Condition::Always;

impl FieldSpec {
	pub(crate) fn resolve(&self) -> (FieldKind<'_>, &Condition) {
		match self {
			FieldSpec::Attribute(selector) => (FieldKind::Attribute(selector), &ALWAYS),
			FieldSpec::Association(association) => (FieldKind::Association(association), &ALWAYS),
			FieldSpec::Conditional(Field::Attribute(selector), condition) => {
				(FieldKind::Attribute(selector), condition)
			}
			FieldSpec::Conditional(Field::Association(association), condition) => {
				(FieldKind::Association(association), condition)
			}
		}
	}

	/// Whether this field is a plain attribute
	pub fn is_attribute(&self) -> bool {
		matches!(self.resolve().0, FieldKind::Attribute(_))
	}

	/// Whether this field is a relationship
	pub fn is_association(&self) -> bool {
		matches!(self.resolve().0, FieldKind::Association(_))
	}
}

/// Per-resource configuration
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi::{Association, ResourceDescriptor};
/// use serde_json::json;
/// use std::sync::Arc;
///
/// let posts = Arc::new(ResourceDescriptor::new("posts").attributes(["title"]));
///
/// let users = ResourceDescriptor::new("users")
///     .attributes(["name", "email"])
///     .has_many(Association::new("posts").resource(posts))
///     .link("self", |user| json!(format!("/users/{}", user["id"])));
///
/// assert_eq!(users.field_names(), ["name", "email", "posts"]);
/// ```
#[derive(Clone)]
pub struct ResourceDescriptor {
	key: String,
	id: Option<Selector>,
	type_spec: Option<TypeSpec>,
	meta: Option<ComputeFn>,
	links: IndexMap<String, ComputeFn>,
	fields: IndexMap<String, FieldSpec>,
}

impl ResourceDescriptor {
	/// Resource whose inferred type is `key`
	pub fn new(key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			id: None,
			type_spec: None,
			meta: None,
			links: IndexMap::new(),
			fields: IndexMap::new(),
		}
	}

	/// Copy of this resource under a new key
	///
	/// The copy owns its configuration, so declarations added to it are not
	/// seen by `self`.
	pub fn inherit(&self, key: impl Into<String>) -> Self {
		Self {
			key: key.into(),
			..self.clone()
		}
	}

	/// Resolve `id` with `selector` instead of the `id` member
	pub fn set_id(mut self, selector: impl Into<Selector>) -> Self {
		self.id = Some(selector.into());
		self
	}

	/// Use an explicit type instead of the resource key
	pub fn set_type(mut self, type_spec: impl Into<TypeSpec>) -> Self {
		self.type_spec = Some(type_spec.into());
		self
	}

	/// Resource-level meta computed from the object
	pub fn meta<F>(mut self, meta: F) -> Self
	where
		F: Fn(&Value) -> Value + Send + Sync + 'static,
	{
		self.meta = Some(Arc::new(meta));
		self
	}

	/// Resource-level link computed from the object
	pub fn link<F>(mut self, name: impl Into<String>, link: F) -> Self
	where
		F: Fn(&Value) -> Value + Send + Sync + 'static,
	{
		self.links.insert(name.into(), Arc::new(link));
		self
	}

	/// Declare a field
	///
	/// Re-declaring a key replaces the previous field in place.
	pub fn field(mut self, key: impl Into<String>, spec: FieldSpec) -> Self {
		self.fields.insert(key.into(), spec);
		self
	}

	/// Attribute reading the member of the same name
	pub fn attribute(self, name: impl Into<String>) -> Self {
		let name = name.into();
		let selector = Selector::key(name.as_str());
		self.field(name, FieldSpec::Attribute(selector))
	}

	/// Several attributes reading members of the same name
	pub fn attributes<I, S>(self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		names
			.into_iter()
			.fold(self, |resource, name| resource.attribute(name))
	}

	/// Attribute resolved with `selector`
	pub fn attribute_with(self, name: impl Into<String>, selector: impl Into<Selector>) -> Self {
		self.field(name, FieldSpec::Attribute(selector.into()))
	}

	/// Attribute emitted only when `condition` holds
	pub fn attribute_if(
		self,
		name: impl Into<String>,
		selector: impl Into<Selector>,
		condition: Condition,
	) -> Self {
		self.field(
			name,
			FieldSpec::Conditional(Field::Attribute(selector.into()), condition),
		)
	}

	/// Declare a relationship
	///
	/// An association carrying a condition is stored as a conditional field.
	pub fn association(self, mut association: Association) -> Self {
		let key = association.output_key().to_string();
		let condition = association.take_condition();
		let spec = if condition.is_always() {
			FieldSpec::Association(association)
		} else {
			FieldSpec::Conditional(Field::Association(association), condition)
		};
		self.field(key, spec)
	}

	/// Alias of [`association`](Self::association) for to-one relationships
	pub fn has_one(self, association: Association) -> Self {
		self.association(association)
	}

	/// Alias of [`association`](Self::association) for to-many relationships
	pub fn has_many(self, association: Association) -> Self {
		self.association(association)
	}

	/// Alias of [`association`](Self::association)
	pub fn one(self, association: Association) -> Self {
		self.association(association)
	}

	/// Alias of [`association`](Self::association)
	pub fn many(self, association: Association) -> Self {
		self.association(association)
	}

	/// Base key used to infer the type
	pub fn key(&self) -> &str {
		&self.key
	}

	/// Declared field keys, in declaration order
	pub fn field_names(&self) -> Vec<&str> {
		self.fields.keys().map(String::as_str).collect()
	}

	/// Declared fields, in declaration order
	pub fn fields(&self) -> &IndexMap<String, FieldSpec> {
		&self.fields
	}

	/// Whether at least one plain attribute other than `id`/`type` is declared
	pub fn has_attributes(&self) -> bool {
		self.fields
			.iter()
			.any(|(key, spec)| spec.is_attribute() && !RESERVED_KEYS.contains(&key.as_str()))
	}

	/// Whether at least one relationship is declared
	pub fn has_relationships(&self) -> bool {
		self.fields.values().any(FieldSpec::is_association)
	}

	/// Find the association declared under `key`
	///
	/// Matches the field key before casing, which is the output key for a
	/// renamed association.
	pub fn find_association(&self, key: &str) -> Option<&Association> {
		match self.fields.get(key)?.resolve().0 {
			FieldKind::Association(association) => Some(association),
			FieldKind::Attribute(_) => None,
		}
	}

	pub(crate) fn id_selector(&self) -> Option<&Selector> {
		self.id.as_ref()
	}

	pub(crate) fn type_spec(&self) -> Option<&TypeSpec> {
		self.type_spec.as_ref()
	}

	pub(crate) fn meta_builder(&self) -> Option<&ComputeFn> {
		self.meta.as_ref()
	}

	pub(crate) fn link_template(&self) -> &IndexMap<String, ComputeFn> {
		&self.links
	}
}

impl fmt::Debug for ResourceDescriptor {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ResourceDescriptor")
			.field("key", &self.key)
			.field("id", &self.id)
			.field("type_spec", &self.type_spec)
			.field("meta", &self.meta.as_ref().map(|_| ".."))
			.field("links", &self.links.keys().collect::<Vec<_>>())
			.field("fields", &self.fields)
			.finish()
	}
}

/// Resources addressable by name
///
/// Lets resources refer to each other, including in cycles, without holding
/// each other's descriptors directly.
#[derive(Debug, Clone, Default)]
pub struct ResourceRegistry {
	resources: IndexMap<String, Arc<ResourceDescriptor>>,
}

impl ResourceRegistry {
	/// Create an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Register `resource` under `name`
	///
	/// Names may be namespaced, e.g. `"blog::Post"`.
	pub fn register(&mut self, name: impl Into<String>, resource: Arc<ResourceDescriptor>) {
		self.resources.insert(name.into(), resource);
	}

	/// Get the resource registered under `name`
	pub fn get(&self, name: &str) -> Option<&Arc<ResourceDescriptor>> {
		self.resources.get(name)
	}

	/// Look up `name`, trying `nesting::name` first
	pub fn lookup(&self, nesting: Option<&str>, name: &str) -> Option<&Arc<ResourceDescriptor>> {
		nesting
			.and_then(|nesting| self.get(&format!("{}::{}", nesting, name)))
			.or_else(|| self.get(name))
	}

	/// Number of registered resources
	pub fn len(&self) -> usize {
		self.resources.len()
	}

	/// Whether no resource is registered
	pub fn is_empty(&self) -> bool {
		self.resources.is_empty()
	}
}
