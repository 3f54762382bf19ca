//! Relationship objects and resource linkage

use crate::condition::{Condition, Evaluation};
use crate::descriptor::{Association, FieldKind, ResourceDescriptor};
use crate::error::{JsonApiError, JsonApiResult};
use crate::identifier::{Identifier, id_string};
use crate::pipeline::Pipeline;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Resource linkage of a relationship
///
/// Only ever carries identifiers. A `None` entry is an explicit `null`:
/// the relationship is present but the related object could not be found.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Linkage {
	/// To-many linkage, in the order of the related collection
	Many(Vec<Option<Identifier>>),
	/// To-one linkage
	One(Option<Identifier>),
}

/// Relationship object under `relationships`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
	/// Resource linkage
	pub data: Linkage,
	/// Relationship-level meta
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<Value>,
	/// Relationship-level links
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub links: Option<Value>,
}

impl Pipeline<'_> {
	/// Build the `relationships` member for `object`
	///
	/// Relationships whose condition fails are left out entirely.
	pub(crate) fn build_relationships(
		&self,
		object: &Value,
		resource: &ResourceDescriptor,
	) -> JsonApiResult<IndexMap<String, Relationship>> {
		let mut relationships = IndexMap::new();

		for spec in resource.fields().values() {
			let (FieldKind::Association(association), condition) = spec.resolve() else {
				continue;
			};
			if let Some(relationship) = self.relationship(object, association, condition)? {
				relationships.insert(self.transform.apply(association.output_key()), relationship);
			}
		}

		Ok(relationships)
	}

	fn relationship(
		&self,
		object: &Value,
		association: &Association,
		condition: &Condition,
	) -> JsonApiResult<Option<Relationship>> {
		let evaluation =
			self.methods
				.evaluate(condition, object, || association.fetch(object), &self.context)?;
		let related = match evaluation {
			Evaluation::Excluded => {
				tracing::trace!(association = association.name(), "condition unmet, skipping relationship");
				return Ok(None);
			}
			Evaluation::Included(Some(related)) => related,
			Evaluation::Included(None) => association.fetch(object),
		};

		let data = self.linkage(&related, association)?;
		let meta = association.meta_builder().map(|meta| meta(object));
		let links = association
			.link_spec()
			.map(|links| links.resolve(object, self.transform))
			.transpose()?;

		Ok(Some(Relationship { data, meta, links }))
	}

	/// Linkage for a fetched related value
	///
	/// An array yields to-many linkage in the same order; anything else is
	/// treated as a single related object.
	pub(crate) fn linkage(&self, related: &Value, association: &Association) -> JsonApiResult<Linkage> {
		let target = self.target(association)?;
		let target = target.as_deref();
		match related {
			Value::Array(items) => items
				.iter()
				.map(|item| self.linkage_entry(item, association, target))
				.collect::<JsonApiResult<Vec<_>>>()
				.map(Linkage::Many),
			item => self.linkage_entry(item, association, target).map(Linkage::One),
		}
	}

	/// Identifier of one related item, `None` for `null`
	///
	/// With a target resource the identifier is resolved through it. Otherwise
	/// the item's own `type` and `id` are kept, the type defaulting to the
	/// association name in singular form. An empty type is an error.
	pub(crate) fn linkage_entry(
		&self,
		item: &Value,
		association: &Association,
		target: Option<&ResourceDescriptor>,
	) -> JsonApiResult<Option<Identifier>> {
		if item.is_null() {
			return Ok(None);
		}
		if let Some(resource) = target {
			return self.resolver.resolve(item, resource).map(Some);
		}

		let resource_type = match item.get("type").and_then(Value::as_str) {
			Some(own) if !own.is_empty() => own.to_string(),
			_ => self.transform.apply(association.default_type()),
		};
		if resource_type.is_empty() {
			return Err(JsonApiError::missing_identifier(association.name(), "type"));
		}
		let id = item
			.get("id")
			.and_then(id_string)
			.ok_or_else(|| JsonApiError::missing_identifier(association.name(), "id"))?;

		Ok(Some(Identifier { resource_type, id }))
	}
}
