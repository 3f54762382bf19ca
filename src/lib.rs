//! # Reinhardt JSON:API
//!
//! Serializes objects into [JSON:API](https://jsonapi.org) documents.
//!
//! A resource is declared once as a [`ResourceDescriptor`]: which members are
//! plain attributes, which are relationships, how its `type` and `id` are
//! resolved, and which meta and links it carries. A [`JsonApiSerializer`] then
//! turns an object, or an array of objects, into a [`Document`] with `data`,
//! optional `meta`, `links` and, when requested through the `include`
//! parameter, side-loaded `included` resources.
//!
//! ## Features
//!
//! - **Identifier resolution**: `type` from the resource key or an override,
//!   `id` from the `id` member or a selector
//! - **Conditional fields**: conditions over nothing, the object, the object
//!   and the fetched value, or a named predicate of the serializer
//! - **Identifier-only linkage**: relationships never embed attribute payloads
//! - **Included resources**: related objects serialized with their own
//!   resource declaration and flattened into `included`
//! - **Key inference**: one [`KeyTransform`] cases attribute keys, relationship
//!   keys, link names and inferred types
//!
//! ## Examples
//!
//! ```rust
//! use reinhardt_jsonapi::{
//!     Association, JsonApiSerializer, Params, ResourceDescriptor, SerializeOptions,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! let posts = Arc::new(ResourceDescriptor::new("posts").attribute("title"));
//! let users = ResourceDescriptor::new("users")
//!     .attribute("name")
//!     .has_many(Association::new("posts").resource(posts));
//!
//! let serializer = JsonApiSerializer::new(users);
//! let user = json!({"id": 1, "name": "Jane", "posts": [{"id": 10, "title": "Hello"}]});
//!
//! let options = SerializeOptions::new().with_params(Params::new().with_include(["posts"]));
//! let document = serializer.serialize_with(&user, &options).unwrap();
//!
//! assert_eq!(
//!     document.to_value().unwrap(),
//!     json!({
//!         "data": {
//!             "type": "users",
//!             "id": "1",
//!             "attributes": {"name": "Jane"},
//!             "relationships": {"posts": {"data": [{"type": "posts", "id": "10"}]}}
//!         },
//!         "included": [
//!             {"type": "posts", "id": "10", "attributes": {"title": "Hello"}}
//!         ]
//!     })
//! );
//! ```

mod attributes;
pub mod casing;
pub mod condition;
pub mod descriptor;
pub mod document;
pub mod error;
pub mod identifier;
mod included;
pub mod links;
pub mod options;
mod pipeline;
pub mod relationships;
pub mod resource;
pub mod selector;
pub mod serializer;
pub mod settings;

pub use casing::{KeyCase, KeyTransform};
pub use condition::{Condition, Evaluation, MethodRegistry};
pub use descriptor::{
	Association, Field, FieldSpec, RESERVED_KEYS, ResourceDescriptor, ResourceRef,
	ResourceRegistry, TypeSpec,
};
pub use document::Document;
pub use error::{JsonApiError, JsonApiResult};
pub use identifier::{Identifier, IdentifierResolver};
pub use links::LinkSpec;
pub use options::{Context, Params, SerializeOptions};
pub use relationships::{Linkage, Relationship};
pub use resource::{PrimaryData, ResolvedObject, SerializedResource};
pub use selector::Selector;
pub use serializer::{JsonApiSerializer, Serializer};
pub use settings::JsonApiSettings;
