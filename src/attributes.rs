//! Projection of plain attributes

use crate::condition::Evaluation;
use crate::descriptor::{FieldKind, RESERVED_KEYS, ResourceDescriptor};
use crate::error::JsonApiResult;
use crate::pipeline::Pipeline;
use serde_json::{Map, Value};

impl Pipeline<'_> {
	/// Build the `attributes` member for `object`
	///
	/// `id` and `type` are skipped, and a field whose condition fails is left
	/// out rather than set to `null`.
	pub(crate) fn project_attributes(
		&self,
		object: &Value,
		resource: &ResourceDescriptor,
	) -> JsonApiResult<Map<String, Value>> {
		let mut attributes = Map::new();

		for (key, spec) in resource.fields() {
			let (FieldKind::Attribute(selector), condition) = spec.resolve() else {
				continue;
			};
			if RESERVED_KEYS.contains(&key.as_str()) {
				continue;
			}

			let evaluation =
				self.methods
					.evaluate(condition, object, || selector.fetch(object), &self.context)?;
			match evaluation {
				Evaluation::Excluded => {
					tracing::trace!(resource = resource.key(), attribute = %key, "condition unmet, skipping attribute");
				}
				Evaluation::Included(fetched) => {
					let value = fetched.unwrap_or_else(|| selector.fetch(object));
					attributes.insert(self.transform.apply(key), value);
				}
			}
		}

		Ok(attributes)
	}
}
