//! Side-loaded resources for the top-level `included` member

use crate::descriptor::{Association, ResourceDescriptor};
use crate::error::JsonApiResult;
use crate::links::InstanceLinks;
use crate::pipeline::Pipeline;
use crate::resource::SerializedResource;
use serde_json::Value;

impl Pipeline<'_> {
	/// Serialize the related resources requested by `names`
	///
	/// Names are matched against the declared field keys, before casing, in
	/// request order. Unknown names are skipped. Related collections are flattened one level and
	/// nothing is deduplicated.
	pub(crate) fn collect_included(
		&self,
		names: &[String],
		data: &Value,
		resource: &ResourceDescriptor,
	) -> JsonApiResult<Vec<SerializedResource>> {
		let owners: Vec<&Value> = match data {
			Value::Array(objects) => objects.iter().collect(),
			object => vec![object],
		};
		let mut included = Vec::new();

		for name in names {
			let Some(association) = resource.find_association(name) else {
				tracing::debug!(resource = resource.key(), include = %name, "include does not match any association, skipping");
				continue;
			};

			for owner in &owners {
				match association.fetch(owner) {
					Value::Array(items) => {
						for item in &items {
							included.extend(self.included_entry(item, association)?);
						}
					}
					item => included.extend(self.included_entry(&item, association)?),
				}
			}
		}

		Ok(included)
	}

	/// Fully serialized related item, `None` for `null`
	///
	/// Without a target resource the item contributes its identifier only.
	fn included_entry(
		&self,
		item: &Value,
		association: &Association,
	) -> JsonApiResult<Option<SerializedResource>> {
		if item.is_null() {
			return Ok(None);
		}
		match self.target(association)? {
			Some(target) => {
				let links = InstanceLinks::new(target.link_template(), self.transform);
				self.assemble(item, &target, &links).map(Some)
			}
			None => Ok(self
				.linkage_entry(item, association, None)?
				.map(SerializedResource::from)),
		}
	}
}
