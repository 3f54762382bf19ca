//! Top-level JSON:API documents

use crate::error::JsonApiResult;
use crate::resource::{PrimaryData, SerializedResource};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON:API document
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi::{Document, Identifier, PrimaryData, SerializedResource};
/// use serde_json::json;
///
/// let data = PrimaryData::Single(Box::new(SerializedResource::from(Identifier::new("users", "1"))));
/// let document = Document::new(data).with_meta(Some(json!({"total": 1})));
///
/// assert_eq!(
///     document.to_value().unwrap(),
///     json!({"data": {"type": "users", "id": "1"}, "meta": {"total": 1}})
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
	/// Primary data
	pub data: PrimaryData,
	/// Top-level meta
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub meta: Option<Value>,
	/// Side-loaded resources
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub included: Option<Vec<SerializedResource>>,
	/// Top-level links
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub links: Option<Map<String, Value>>,
}

impl Document {
	/// Document holding only primary data
	pub fn new(data: PrimaryData) -> Self {
		Self {
			data,
			meta: None,
			included: None,
			links: None,
		}
	}

	/// Set top-level meta; `None` leaves the member out
	pub fn with_meta(mut self, meta: Option<Value>) -> Self {
		self.meta = meta;
		self
	}

	/// Set side-loaded resources; `None` leaves the member out
	pub fn with_included(mut self, included: Option<Vec<SerializedResource>>) -> Self {
		self.included = included;
		self
	}

	/// Set top-level links; `None` leaves the member out
	pub fn with_links(mut self, links: Option<Map<String, Value>>) -> Self {
		self.links = links;
		self
	}

	/// Render as a JSON value
	pub fn to_value(&self) -> JsonApiResult<Value> {
		Ok(serde_json::to_value(self)?)
	}

	/// Render as JSON text
	pub fn to_json(&self) -> JsonApiResult<String> {
		Ok(serde_json::to_string(self)?)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::identifier::Identifier;
	use rstest::{fixture, rstest};
	use serde_json::json;

	#[fixture]
	fn data() -> PrimaryData {
		PrimaryData::Collection(vec![SerializedResource::from(Identifier::new("users", "1"))])
	}

	#[rstest]
	fn test_member_order(data: PrimaryData) {
		let mut links = Map::new();
		links.insert("self".to_string(), json!("/users"));
		let document = Document::new(data)
			.with_links(Some(links))
			.with_included(Some(vec![]))
			.with_meta(Some(json!({"total": 1})));

		let value = document.to_value().unwrap();
		let keys: Vec<_> = value.as_object().unwrap().keys().cloned().collect();
		assert_eq!(keys, ["data", "meta", "included", "links"]);
	}

	#[rstest]
	fn test_absent_members_omitted(data: PrimaryData) {
		let document = Document::new(data);
		assert_eq!(
			document.to_json().unwrap(),
			r#"{"data":[{"type":"users","id":"1"}]}"#
		);
	}

	#[rstest]
	fn test_deserialize_round_trip(data: PrimaryData) {
		let document = Document::new(data).with_meta(Some(json!({"total": 1})));
		let parsed: Document = serde_json::from_str(&document.to_json().unwrap()).unwrap();
		assert_eq!(parsed, document);
	}
}
