//! Key casing applied to output keys and inferred type strings

use convert_case::{Case, Casing};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Built-in naming conventions for output keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCase {
	/// `FirstName`
	Camel,
	/// `firstName`
	LowerCamel,
	/// `first-name`
	Dash,
	/// `first_name`
	Snake,
}

impl KeyCase {
	/// Convert a key to this naming convention
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_jsonapi::KeyCase;
	///
	/// assert_eq!(KeyCase::LowerCamel.apply("first_name"), "firstName");
	/// assert_eq!(KeyCase::Dash.apply("first_name"), "first-name");
	/// ```
	pub fn apply(self, key: &str) -> String {
		let case = match self {
			KeyCase::Camel => Case::Pascal,
			KeyCase::LowerCamel => Case::Camel,
			KeyCase::Dash => Case::Kebab,
			KeyCase::Snake => Case::Snake,
		};
		key.to_case(case)
	}
}

/// Pluggable `transformKey` function
///
/// The identity transform leaves keys untouched, which is what a serializer
/// uses when inference is disabled.
#[derive(Clone)]
pub struct KeyTransform {
	transform: Option<Arc<dyn Fn(&str) -> String + Send + Sync>>,
}

impl KeyTransform {
	/// Transform that returns keys unchanged
	pub fn identity() -> Self {
		Self { transform: None }
	}

	/// Transform using one of the built-in conventions
	pub fn case(case: KeyCase) -> Self {
		Self::custom(move |key| case.apply(key))
	}

	/// Transform using a caller-supplied function
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_jsonapi::KeyTransform;
	///
	/// let upper = KeyTransform::custom(|key| key.to_uppercase());
	/// assert_eq!(upper.apply("posts"), "POSTS");
	/// ```
	pub fn custom<F>(transform: F) -> Self
	where
		F: Fn(&str) -> String + Send + Sync + 'static,
	{
		Self {
			transform: Some(Arc::new(transform)),
		}
	}

	/// Whether this transform changes keys at all
	pub fn is_enabled(&self) -> bool {
		self.transform.is_some()
	}

	/// Apply the transform to a key
	pub fn apply(&self, key: &str) -> String {
		match &self.transform {
			Some(transform) => transform(key),
			None => key.to_string(),
		}
	}
}

impl Default for KeyTransform {
	fn default() -> Self {
		Self::identity()
	}
}

impl From<Option<KeyCase>> for KeyTransform {
	fn from(case: Option<KeyCase>) -> Self {
		case.map_or_else(Self::identity, Self::case)
	}
}

impl fmt::Debug for KeyTransform {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("KeyTransform")
			.field("enabled", &self.is_enabled())
			.finish()
	}
}
