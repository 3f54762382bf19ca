//! Per-call serialization state shared by the document components

use crate::casing::KeyTransform;
use crate::condition::MethodRegistry;
use crate::descriptor::{Association, ResourceDescriptor, ResourceRef, ResourceRegistry};
use crate::error::{JsonApiError, JsonApiResult};
use crate::identifier::IdentifierResolver;
use crate::options::Context;
use std::sync::Arc;

/// Borrowed view of a serializer for the duration of one call
///
/// Holds nothing that outlives the call, so concurrent calls against the same
/// serializer never observe each other.
pub(crate) struct Pipeline<'a> {
	pub(crate) transform: &'a KeyTransform,
	pub(crate) methods: &'a MethodRegistry,
	pub(crate) registry: Option<&'a ResourceRegistry>,
	pub(crate) context: Context<'a>,
	pub(crate) resolver: IdentifierResolver<'a>,
}

impl<'a> Pipeline<'a> {
	pub(crate) fn new(
		transform: &'a KeyTransform,
		methods: &'a MethodRegistry,
		registry: Option<&'a ResourceRegistry>,
		context: Context<'a>,
	) -> Self {
		Self {
			transform,
			methods,
			registry,
			context,
			resolver: IdentifierResolver::new(transform),
		}
	}

	/// Descriptor used to serialize the association's related objects
	pub(crate) fn target(
		&self,
		association: &Association,
	) -> JsonApiResult<Option<Arc<ResourceDescriptor>>> {
		match association.resource_ref() {
			None => Ok(None),
			Some(ResourceRef::Direct(resource)) => Ok(Some(Arc::clone(resource))),
			Some(ResourceRef::Named(name)) => self
				.registry
				.and_then(|registry| registry.lookup(association.nesting_path(), name))
				.cloned()
				.map(Some)
				.ok_or_else(|| JsonApiError::UnknownResource(name.clone())),
		}
	}
}
