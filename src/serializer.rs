//! JSON:API serializer

use crate::casing::KeyTransform;
use crate::condition::MethodRegistry;
use crate::descriptor::{ResourceDescriptor, ResourceRegistry};
use crate::document::Document;
use crate::error::JsonApiResult;
use crate::identifier::Identifier;
use crate::links::InstanceLinks;
use crate::options::{Context, SerializeOptions};
use crate::pipeline::Pipeline;
use crate::relationships::Relationship;
use crate::resource::{PrimaryData, ResolvedObject, SerializedResource};
use crate::settings::JsonApiSettings;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Serializer trait
pub trait Serializer {
	type Input;
	type Output;

	fn serialize(&self, input: &Self::Input) -> JsonApiResult<Self::Output>;
}

/// Builds JSON:API documents for one resource
///
/// The serializer only reads its configuration, so a single instance can be
/// shared across threads. Selectors, conditions and builders run on the
/// calling thread and block it for their duration.
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi::{JsonApiSerializer, ResourceDescriptor, SerializeOptions};
/// use serde_json::json;
///
/// let serializer = JsonApiSerializer::new(ResourceDescriptor::new("users").attribute("name"));
///
/// let document = serializer
///     .serialize_with(&json!({"id": 1, "name": "Jane"}), &SerializeOptions::new())
///     .unwrap();
///
/// assert_eq!(
///     document.to_value().unwrap(),
///     json!({"data": {"type": "users", "id": "1", "attributes": {"name": "Jane"}}})
/// );
/// ```
#[derive(Debug, Clone)]
pub struct JsonApiSerializer {
	resource: Arc<ResourceDescriptor>,
	transform: KeyTransform,
	methods: MethodRegistry,
	registry: Option<Arc<ResourceRegistry>>,
}

impl JsonApiSerializer {
	/// Serializer for `resource` with key inference disabled
	pub fn new(resource: impl Into<Arc<ResourceDescriptor>>) -> Self {
		Self {
			resource: resource.into(),
			transform: KeyTransform::identity(),
			methods: MethodRegistry::new(),
			registry: None,
		}
	}

	/// Apply settings
	pub fn with_settings(mut self, settings: &JsonApiSettings) -> Self {
		self.transform = settings.key_transform();
		self
	}

	/// Case keys and inferred types with `transform`
	pub fn with_key_transform(mut self, transform: KeyTransform) -> Self {
		self.transform = transform;
		self
	}

	/// Register a named condition
	pub fn with_method<F>(mut self, name: impl Into<String>, predicate: F) -> Self
	where
		F: Fn(&Context<'_>) -> bool + Send + Sync + 'static,
	{
		self.methods.register(name, predicate);
		self
	}

	/// Resolve named association targets in `registry`
	pub fn with_registry(mut self, registry: Arc<ResourceRegistry>) -> Self {
		self.registry = Some(registry);
		self
	}

	/// The serialized resource's declaration
	pub fn resource(&self) -> &ResourceDescriptor {
		&self.resource
	}

	fn pipeline<'a>(&'a self, options: &'a SerializeOptions) -> Pipeline<'a> {
		Pipeline::new(
			&self.transform,
			&self.methods,
			self.registry.as_deref(),
			Context::new(options),
		)
	}

	fn links(&self) -> InstanceLinks {
		InstanceLinks::new(self.resource.link_template(), &self.transform)
	}

	/// Build the full document for an object or an array of objects
	///
	/// `included` is only computed when the parameters request includes.
	/// `meta` and `links` come from `options` and are omitted when unset.
	///
	/// # Errors
	///
	/// Any failure aborts the whole document.
	pub fn serialize_with(&self, data: &Value, options: &SerializeOptions) -> JsonApiResult<Document> {
		tracing::debug!(
			resource = self.resource.key(),
			collection = data.is_array(),
			include = ?options.params.include(),
			"serializing JSON:API document"
		);

		let primary = self
			.pipeline(options)
			.assemble_data(data, &self.resource, &self.links())?;
		self.document(primary, data, options)
	}

	/// Build the document for an object whose identifier is already resolved
	///
	/// The identifier is emitted as given, so its type is not cased again.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_jsonapi::{
	///     Identifier, JsonApiSerializer, KeyCase, KeyTransform, ResolvedObject, ResourceDescriptor,
	///     SerializeOptions,
	/// };
	/// use serde_json::json;
	///
	/// let serializer = JsonApiSerializer::new(ResourceDescriptor::new("blog_posts"))
	///     .with_key_transform(KeyTransform::case(KeyCase::LowerCamel));
	/// let resolved = ResolvedObject::new(Identifier::new("BlogPosts", "4"), json!({}));
	///
	/// let document = serializer.serialize_resolved(&resolved, &SerializeOptions::new()).unwrap();
	/// assert_eq!(document.to_value().unwrap(), json!({"data": {"type": "BlogPosts", "id": "4"}}));
	/// ```
	pub fn serialize_resolved(
		&self,
		resolved: &ResolvedObject,
		options: &SerializeOptions,
	) -> JsonApiResult<Document> {
		tracing::debug!(
			resource = self.resource.key(),
			resource_type = %resolved.identifier.resource_type,
			"serializing resolved JSON:API resource"
		);

		let resource = self.pipeline(options).assemble_resolved(
			resolved.identifier.clone(),
			&resolved.object,
			&self.resource,
			&self.links(),
		)?;
		self.document(PrimaryData::Single(Box::new(resource)), &resolved.object, options)
	}

	/// Build the document for a collection of already resolved objects
	pub fn serialize_resolved_collection(
		&self,
		resolved: &[ResolvedObject],
		options: &SerializeOptions,
	) -> JsonApiResult<Document> {
		tracing::debug!(
			resource = self.resource.key(),
			count = resolved.len(),
			"serializing resolved JSON:API collection"
		);

		let pipeline = self.pipeline(options);
		let links = self.links();
		let resources = resolved
			.iter()
			.map(|item| {
				pipeline.assemble_resolved(item.identifier.clone(), &item.object, &self.resource, &links)
			})
			.collect::<JsonApiResult<Vec<_>>>()?;
		let owners = Value::Array(resolved.iter().map(|item| item.object.clone()).collect());
		self.document(PrimaryData::Collection(resources), &owners, options)
	}

	fn document(&self, primary: PrimaryData, owners: &Value, options: &SerializeOptions) -> JsonApiResult<Document> {
		let included = if options.params.has_include() {
			Some(
				self.pipeline(options)
					.collect_included(options.params.include(), owners, &self.resource)?,
			)
		} else {
			None
		};
		let links = options.links.as_ref().map(|links| {
			links
				.iter()
				.map(|(rel, url)| (self.transform.apply(rel), url.clone()))
				.collect::<Map<String, Value>>()
		});

		Ok(Document::new(primary)
			.with_meta(options.meta.clone())
			.with_included(included)
			.with_links(links))
	}

	/// Build the full document for any serializable value
	pub fn serialize_object<T>(&self, data: &T, options: &SerializeOptions) -> JsonApiResult<Document>
	where
		T: Serialize + ?Sized,
	{
		let data = serde_json::to_value(data)?;
		self.serialize_with(&data, options)
	}

	/// Only the primary data, without the document envelope
	pub fn serialize_data(&self, data: &Value, options: &SerializeOptions) -> JsonApiResult<PrimaryData> {
		self.pipeline(options)
			.assemble_data(data, &self.resource, &self.links())
	}

	/// Identifier of `object`
	pub fn identifier(&self, object: &Value) -> JsonApiResult<Identifier> {
		let options = SerializeOptions::new();
		self.pipeline(&options).resolver.resolve(object, &self.resource)
	}

	/// The `attributes` member for `object`
	pub fn attributes(&self, object: &Value, options: &SerializeOptions) -> JsonApiResult<Map<String, Value>> {
		self.pipeline(options).project_attributes(object, &self.resource)
	}

	/// The `relationships` member for `object`
	pub fn relationships(
		&self,
		object: &Value,
		options: &SerializeOptions,
	) -> JsonApiResult<IndexMap<String, Relationship>> {
		self.pipeline(options).build_relationships(object, &self.resource)
	}

	/// Resources side-loaded for `names`
	pub fn included(
		&self,
		names: &[String],
		data: &Value,
		options: &SerializeOptions,
	) -> JsonApiResult<Vec<SerializedResource>> {
		self.pipeline(options)
			.collect_included(names, data, &self.resource)
	}
}

impl Serializer for JsonApiSerializer {
	type Input = Value;
	type Output = Document;

	fn serialize(&self, input: &Self::Input) -> JsonApiResult<Self::Output> {
		self.serialize_with(input, &SerializeOptions::new())
	}
}
