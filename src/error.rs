//! Error types for JSON:API serialization

/// Errors raised while building a JSON:API document.
///
/// Every variant is raised synchronously where the failure happens and aborts
/// the whole document: a failing element of a collection never yields a
/// partial `data` array.
#[derive(Debug, thiserror::Error)]
pub enum JsonApiError {
	/// The object has no usable identity and no override was configured
	#[error("Resource '{resource}' has no usable '{member}' for object")]
	MissingIdentifier {
		/// Key of the resource being serialized
		resource: String,
		/// Identifier member that could not be resolved (`id` or `type`)
		member: &'static str,
	},

	/// A condition could not be evaluated
	#[error("Invalid condition: {0}")]
	InvalidCondition(String),

	/// A link declaration has an unsupported shape
	#[error("Unknown link format: {0}")]
	InvalidLinkSpec(String),

	/// An association refers to a resource name that is not registered
	#[error("Resource '{0}' is not registered")]
	UnknownResource(String),

	/// Conversion of a typed object into a JSON value failed
	#[error("Serialization error: {0}")]
	Serialization(#[from] serde_json::Error),

	/// Settings could not be parsed
	#[error("Invalid JSON:API settings: {0}")]
	Settings(#[from] toml::de::Error),
}

impl JsonApiError {
	/// Create a missing identifier error
	pub fn missing_identifier(resource: impl Into<String>, member: &'static str) -> Self {
		Self::MissingIdentifier {
			resource: resource.into(),
			member,
		}
	}
}

/// Result type for JSON:API serialization
pub type JsonApiResult<T> = Result<T, JsonApiError>;
