//! Property tests for the JSON:API serializer
//!
//! **Test Coverage:**
//! 1. Identifier resolution honours `set_id` and falls back to `id`
//! 2. Rejected zero/one-argument conditions never fetch the related value
//! 3. Serialization is idempotent
//! 4. Relationship linkage only carries `type` and `id`
//! 5. `included` is present exactly when includes were requested
//! 6. A shared serializer is safe to use from several threads
//! 7. Derived resources never leak declarations into their parent

use proptest::prelude::*;
use reinhardt_jsonapi::{
	Association, Condition, JsonApiSerializer, Params, ResourceDescriptor, Selector,
	SerializeOptions, Serializer,
};
use rstest::*;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

fn blog_serializer() -> JsonApiSerializer {
	let comments = Arc::new(ResourceDescriptor::new("comments").attributes(["body", "secret"]));
	JsonApiSerializer::new(
		ResourceDescriptor::new("posts")
			.attributes(["title", "body"])
			.has_many(Association::new("comments").resource(comments))
			.has_one(Association::new("author"))
			.meta(|post| json!({"words": post["body"].as_str().map_or(0, |b| b.split_whitespace().count())})),
	)
}

fn post(id: u64) -> Value {
	json!({
		"id": id,
		"title": format!("Post {}", id),
		"body": "one two three",
		"author": {"id": 7, "type": "people", "name": "Ann", "email": "ann@example.com"},
		"comments": [
			{"id": id * 10, "body": "first", "secret": "x"},
			{"id": id * 10 + 1, "body": "second", "secret": "y"}
		]
	})
}

// ========================================================================
// Identifier resolution
// ========================================================================

#[rstest]
#[case(json!({"id": 5, "slug": "five"}), "five")]
#[case(json!({"id": 5, "slug": 55}), "55")]
fn test_id_override_reads_selector(#[case] object: Value, #[case] expected: &str) {
	let serializer = JsonApiSerializer::new(ResourceDescriptor::new("pages").set_id("slug"));
	assert_eq!(serializer.identifier(&object).unwrap().id, expected);
}

proptest! {
	#[test]
	fn prop_id_falls_back_to_id_member(id in any::<u64>()) {
		let serializer = JsonApiSerializer::new(ResourceDescriptor::new("pages"));
		let identifier = serializer.identifier(&json!({"id": id})).unwrap();
		prop_assert_eq!(identifier.id, id.to_string());
		prop_assert_eq!(identifier.resource_type, "pages");
	}

	#[test]
	fn prop_collection_order_and_length(ids in proptest::collection::vec(any::<u32>(), 0..20)) {
		let serializer = JsonApiSerializer::new(ResourceDescriptor::new("items").attribute("n"));
		let objects: Vec<Value> = ids.iter().map(|id| json!({"id": id, "n": id})).collect();

		let document = serializer.serialize(&Value::Array(objects)).unwrap();

		prop_assert!(document.data.is_collection());
		let resources = document.data.resources();
		prop_assert_eq!(resources.len(), ids.len());
		for (resource, id) in resources.iter().zip(&ids) {
			prop_assert_eq!(&resource.id, &id.to_string());
		}
	}
}

// ========================================================================
// Conditions and fetching
// ========================================================================

#[rstest]
#[case(Condition::nullary(|| false))]
#[case(Condition::object(|post| post["published"] == json!(true)))]
fn test_rejected_condition_never_fetches(#[case] condition: Condition) {
	let fetches = Arc::new(AtomicUsize::new(0));
	let counter = Arc::clone(&fetches);
	let serializer = JsonApiSerializer::new(
		ResourceDescriptor::new("posts").has_many(
			Association::new("comments")
				.selector(Selector::compute(move |post| {
					counter.fetch_add(1, Ordering::SeqCst);
					post["comments"].clone()
				}))
				.condition(condition),
		),
	);

	let document = serializer.serialize(&json!([post(1), post(2)])).unwrap();

	assert_eq!(fetches.load(Ordering::SeqCst), 0);
	for resource in document.data.resources() {
		assert!(resource.relationships.as_ref().unwrap().is_empty());
	}
}

// ========================================================================
// Output shape
// ========================================================================

#[rstest]
fn test_serialization_is_idempotent() {
	let serializer = blog_serializer();
	let options = SerializeOptions::new().with_params(Params::new().with_include(["comments"]));

	let first = serializer.serialize_with(&post(1), &options).unwrap();
	let second = serializer.serialize_with(&post(1), &options).unwrap();

	assert_eq!(first, second);
	assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
}

#[rstest]
fn test_linkage_is_identifier_only() {
	let value = blog_serializer().serialize(&post(1)).unwrap().to_value().unwrap();

	for relationship in value["data"]["relationships"].as_object().unwrap().values() {
		let entries = match &relationship["data"] {
			Value::Array(entries) => entries.clone(),
			entry => vec![entry.clone()],
		};
		for entry in entries {
			let mut keys: Vec<_> = entry.as_object().unwrap().keys().cloned().collect();
			keys.sort();
			assert_eq!(keys, ["id", "type"]);
		}
	}
	assert_eq!(
		value["data"]["relationships"]["author"]["data"],
		json!({"type": "people", "id": "7"})
	);
}

#[rstest]
#[case(json!({}), false)]
#[case(json!({"include": ""}), false)]
#[case(json!({"include": []}), false)]
#[case(json!({"include": "comments"}), true)]
#[case(json!({"include": ["unknown"]}), true)]
fn test_included_present_iff_requested(#[case] params: Value, #[case] expected: bool) {
	let options = SerializeOptions::new().with_params(Params::from_value(params));
	let value = blog_serializer()
		.serialize_with(&post(1), &options)
		.unwrap()
		.to_value()
		.unwrap();
	assert_eq!(value.get("included").is_some(), expected);
}

#[rstest]
fn test_top_level_meta_and_links_only_when_given() {
	let value = blog_serializer().serialize(&post(1)).unwrap().to_value().unwrap();
	assert!(value.get("meta").is_none());
	assert!(value.get("links").is_none());
	assert_eq!(value["data"]["meta"], json!({"words": 3}));
}

// ========================================================================
// Sharing
// ========================================================================

#[rstest]
fn test_shared_serializer_across_threads() {
	let serializer = Arc::new(blog_serializer());
	let expected = serializer.serialize(&post(3)).unwrap();

	thread::scope(|scope| {
		let handles: Vec<_> = (0..4)
			.map(|_| {
				let serializer = Arc::clone(&serializer);
				scope.spawn(move || serializer.serialize(&post(3)).unwrap())
			})
			.collect();
		for handle in handles {
			assert_eq!(handle.join().unwrap(), expected);
		}
	});
}

#[rstest]
fn test_derived_resource_is_independent() {
	let parent = ResourceDescriptor::new("users").attribute("name");
	let child = parent.inherit("admins").attribute("permissions");
	let object = json!({"id": 1, "name": "Jane", "permissions": ["all"]});

	let parent_value = JsonApiSerializer::new(parent).serialize(&object).unwrap().to_value().unwrap();
	let child_value = JsonApiSerializer::new(child).serialize(&object).unwrap().to_value().unwrap();

	assert_eq!(parent_value["data"]["attributes"], json!({"name": "Jane"}));
	assert_eq!(
		child_value["data"],
		json!({"type": "admins", "id": "1", "attributes": {"name": "Jane", "permissions": ["all"]}})
	);
}
