//! Field value selectors

use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Computation producing a value from an object
pub type ComputeFn = Arc<dyn Fn(&Value) -> Value + Send + Sync>;

/// Resolves a field value from an object
///
/// # Examples
///
/// ```
/// use reinhardt_jsonapi::Selector;
/// use serde_json::json;
///
/// let user = json!({"first": "Jane", "last": "Doe"});
///
/// assert_eq!(Selector::key("first").fetch(&user), json!("Jane"));
/// assert_eq!(Selector::key("missing").fetch(&user), json!(null));
///
/// let full_name = Selector::compute(|user| {
///     json!(format!("{} {}", user["first"].as_str().unwrap_or(""), user["last"].as_str().unwrap_or("")))
/// });
/// assert_eq!(full_name.fetch(&user), json!("Jane Doe"));
/// ```
#[derive(Clone)]
pub enum Selector {
	/// Read a member of the object
	Key(String),
	/// Run a computation over the object
	Compute(ComputeFn),
}

impl Selector {
	/// Selector reading the member `name`
	pub fn key(name: impl Into<String>) -> Self {
		Self::Key(name.into())
	}

	/// Selector running `compute`
	pub fn compute<F>(compute: F) -> Self
	where
		F: Fn(&Value) -> Value + Send + Sync + 'static,
	{
		Self::Compute(Arc::new(compute))
	}

	/// Fetch the value this selector points at
	///
	/// A missing member, or a member read on a non-object, yields `null`.
	pub fn fetch(&self, object: &Value) -> Value {
		match self {
			Selector::Key(name) => object.get(name).cloned().unwrap_or(Value::Null),
			Selector::Compute(compute) => compute(object),
		}
	}
}

impl fmt::Debug for Selector {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Selector::Key(name) => f.debug_tuple("Key").field(name).finish(),
			Selector::Compute(_) => f.write_str("Compute(..)"),
		}
	}
}

impl From<&str> for Selector {
	fn from(name: &str) -> Self {
		Self::key(name)
	}
}

impl From<String> for Selector {
	fn from(name: String) -> Self {
		Self::Key(name)
	}
}
