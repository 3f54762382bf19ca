//! Serializer settings
//!
//! Settings can be declared in a project's TOML configuration under a
//! `[jsonapi]` table, or supplied as a JSON value:
//!
//! ```toml
//! [jsonapi]
//! key_transform = "lower_camel"
//! ```

use crate::casing::{KeyCase, KeyTransform};
use crate::error::JsonApiResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Settings shared by every serializer built from them
#[non_exhaustive]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonApiSettings {
	/// Naming convention for output keys and inferred types.
	///
	/// `None` disables key inference entirely.
	pub key_transform: Option<KeyCase>,
}

#[derive(Deserialize)]
struct SettingsFile {
	#[serde(default)]
	jsonapi: JsonApiSettings,
}

impl JsonApiSettings {
	/// Create settings with inference disabled
	pub fn new() -> Self {
		Self::default()
	}

	/// Enable key inference with the given convention
	pub fn with_key_transform(mut self, case: KeyCase) -> Self {
		self.key_transform = Some(case);
		self
	}

	/// Parse the `[jsonapi]` table of a TOML document
	///
	/// A document without the table yields default settings.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_jsonapi::{JsonApiSettings, KeyCase};
	///
	/// let settings = JsonApiSettings::from_toml_str("[jsonapi]\nkey_transform = \"dash\"\n").unwrap();
	/// assert_eq!(settings.key_transform, Some(KeyCase::Dash));
	/// ```
	pub fn from_toml_str(source: &str) -> JsonApiResult<Self> {
		let file: SettingsFile = toml::from_str(source)?;
		Ok(file.jsonapi)
	}

	/// Parse settings from a JSON value
	pub fn from_value(value: Value) -> JsonApiResult<Self> {
		Ok(serde_json::from_value(value)?)
	}

	/// Build the key transform these settings describe
	pub fn key_transform(&self) -> KeyTransform {
		KeyTransform::from(self.key_transform)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::JsonApiError;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	fn test_default_disables_inference() {
		let settings = JsonApiSettings::default();
		assert_eq!(settings.key_transform, None);
		assert!(!settings.key_transform().is_enabled());
	}

	#[rstest]
	fn test_from_toml_str() {
		let settings = JsonApiSettings::from_toml_str(
			r#"
			[jsonapi]
			key_transform = "lower_camel"
			"#,
		)
		.unwrap();
		assert_eq!(settings.key_transform, Some(KeyCase::LowerCamel));
		assert_eq!(settings.key_transform().apply("blog_posts"), "blogPosts");
	}

	#[rstest]
	fn test_from_toml_str_without_table() {
		let settings = JsonApiSettings::from_toml_str("[database]\nurl = \"sqlite::memory:\"\n").unwrap();
		assert_eq!(settings, JsonApiSettings::default());
	}

	#[rstest]
	fn test_from_toml_str_rejects_unknown_case() {
		let err = JsonApiSettings::from_toml_str("[jsonapi]\nkey_transform = \"shouting\"\n")
			.unwrap_err();
		assert!(matches!(err, JsonApiError::Settings(_)));
	}

	#[rstest]
	fn test_from_value() {
		let settings = JsonApiSettings::from_value(json!({"key_transform": "camel"})).unwrap();
		assert_eq!(settings, JsonApiSettings::new().with_key_transform(KeyCase::Camel));
	}
}
