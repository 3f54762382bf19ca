//! Conditions deciding whether a declared field is emitted
//!
//! The shape of a condition is chosen when the field is declared, so
//! evaluation is a plain match over [`Condition`].

use crate::error::{JsonApiError, JsonApiResult};
use crate::options::Context;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Predicate taking no arguments
pub type NullaryPredicate = Arc<dyn Fn() -> bool + Send + Sync>;
/// Predicate over the serialized object
pub type ObjectPredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;
/// Predicate over the serialized object and the field's fetched value
pub type RelatedPredicate = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;
/// Named predicate evaluated against the serializer instance
pub type MethodPredicate = Arc<dyn Fn(&Context<'_>) -> bool + Send + Sync>;

/// Inclusion condition of a field
#[derive(Clone, Default)]
pub enum Condition {
	/// Always emitted
	#[default]
	Always,
	/// Predicate with no arguments
	Nullary(NullaryPredicate),
	/// Predicate receiving the object
	Object(ObjectPredicate),
	/// Predicate receiving the object and the fetched field value
	///
	/// The field value is fetched before the predicate runs.
	WithRelated(RelatedPredicate),
	/// Predicate registered on the serializer under this name
	Method(String),
}

impl Condition {
	/// Condition from a predicate with no arguments
	pub fn nullary<F>(predicate: F) -> Self
	where
		F: Fn() -> bool + Send + Sync + 'static,
	{
		Self::Nullary(Arc::new(predicate))
	}

	/// Condition from a predicate over the object
	pub fn object<F>(predicate: F) -> Self
	where
		F: Fn(&Value) -> bool + Send + Sync + 'static,
	{
		Self::Object(Arc::new(predicate))
	}

	/// Condition from a predicate over the object and the fetched field value
	pub fn with_related<F>(predicate: F) -> Self
	where
		F: Fn(&Value, &Value) -> bool + Send + Sync + 'static,
	{
		Self::WithRelated(Arc::new(predicate))
	}

	/// Condition calling a named predicate of the serializer
	pub fn method(name: impl Into<String>) -> Self {
		Self::Method(name.into())
	}

	/// Whether this is the unconditional variant
	pub fn is_always(&self) -> bool {
		matches!(self, Condition::Always)
	}
}

impl fmt::Debug for Condition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Condition::Always => f.write_str("Always"),
			Condition::Nullary(_) => f.write_str("Nullary(..)"),
			Condition::Object(_) => f.write_str("Object(..)"),
			Condition::WithRelated(_) => f.write_str("WithRelated(..)"),
			Condition::Method(name) => f.debug_tuple("Method").field(name).finish(),
		}
	}
}

/// Outcome of evaluating a condition
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
	/// The field is omitted
	Excluded,
	/// The field is emitted.
	///
	/// Carries the field value when evaluation already had to fetch it.
	Included(Option<Value>),
}

impl Evaluation {
	/// Whether the field is emitted
	pub fn is_included(&self) -> bool {
		matches!(self, Evaluation::Included(_))
	}
}

/// Named predicates available to [`Condition::Method`]
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi::MethodRegistry;
///
/// let mut registry = MethodRegistry::new();
/// registry.register("is_admin", |ctx| ctx.params.get("admin").is_some());
/// assert!(registry.contains("is_admin"));
/// ```
#[derive(Clone, Default)]
pub struct MethodRegistry {
	methods: HashMap<String, MethodPredicate>,
}

impl MethodRegistry {
	/// Create an empty registry
	pub fn new() -> Self {
		Self::default()
	}

	/// Register a named predicate, replacing any previous one with the same name
	pub fn register<F>(&mut self, name: impl Into<String>, predicate: F)
	where
		F: Fn(&Context<'_>) -> bool + Send + Sync + 'static,
	{
		self.methods.insert(name.into(), Arc::new(predicate));
	}

	/// Check if a predicate is registered
	pub fn contains(&self, name: &str) -> bool {
		self.methods.contains_key(name)
	}

	/// Get a registered predicate
	pub fn get(&self, name: &str) -> Option<&MethodPredicate> {
		self.methods.get(name)
	}

	/// Names of all registered predicates
	pub fn names(&self) -> Vec<&str> {
		self.methods.keys().map(String::as_str).collect()
	}

	/// Evaluate `condition` for `object`
	///
	/// `related` fetches the field value. It is only called for
	/// [`Condition::WithRelated`], so predicates that reject an object never
	/// trigger the fetch.
	///
	/// # Errors
	///
	/// Returns [`JsonApiError::InvalidCondition`] for a [`Condition::Method`]
	/// whose name is not registered.
	pub fn evaluate<F>(
		&self,
		condition: &Condition,
		object: &Value,
		related: F,
		context: &Context<'_>,
	) -> JsonApiResult<Evaluation>
	where
		F: FnOnce() -> Value,
	{
		let included = match condition {
			Condition::Always => true,
			Condition::Nullary(predicate) => predicate(),
			Condition::Object(predicate) => predicate(object),
			Condition::WithRelated(predicate) => {
				let value = related();
				return Ok(if predicate(object, &value) {
					Evaluation::Included(Some(value))
				} else {
					Evaluation::Excluded
				});
			}
			Condition::Method(name) => {
				let predicate = self.get(name).ok_or_else(|| {
					JsonApiError::InvalidCondition(format!(
						"no method named '{}' is registered on the serializer",
						name
					))
				})?;
				predicate(context)
			}
		};

		Ok(if included {
			Evaluation::Included(None)
		} else {
			Evaluation::Excluded
		})
	}
}

impl fmt::Debug for MethodRegistry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut names = self.names();
		names.sort_unstable();
		f.debug_struct("MethodRegistry")
			.field("methods", &names)
			.finish()
	}
}
