//! Per-call serialization options

use serde_json::{Map, Value};

/// Request parameters for one serialization call
///
/// Only `include` is interpreted by the serializer. Other entries are kept so
/// that named conditions can inspect them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
	include: Vec<String>,
	extra: Map<String, Value>,
}

impl Params {
	/// Create empty parameters
	pub fn new() -> Self {
		Self::default()
	}

	/// Request side-loading of the named associations
	///
	/// Empty names are ignored.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_jsonapi::Params;
	///
	/// let params = Params::new().with_include(["posts", "comments"]);
	/// assert_eq!(params.include(), ["posts", "comments"]);
	/// ```
	pub fn with_include<I, S>(mut self, names: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		self.include = names
			.into_iter()
			.map(Into::into)
			.filter(|name: &String| !name.is_empty())
			.collect();
		self
	}

	/// Add a free-form parameter
	pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
		self.extra.insert(key.into(), value);
		self
	}

	/// Parse parameters from a JSON object
	///
	/// `include` may be a comma separated string or an array of strings.
	/// Non-object input yields empty parameters.
	///
	/// # Examples
	///
	/// ```
	/// use reinhardt_jsonapi::Params;
	/// use serde_json::json;
	///
	/// let params = Params::from_value(json!({"include": "author, comments", "page": 2}));
	/// assert_eq!(params.include(), ["author", "comments"]);
	/// assert_eq!(params.get("page"), Some(&json!(2)));
	/// ```
	pub fn from_value(value: Value) -> Self {
		let Value::Object(mut map) = value else {
			return Self::default();
		};

		let include = match map.remove("include") {
			Some(Value::String(names)) => names
				.split(',')
				.map(str::trim)
				.filter(|name| !name.is_empty())
				.map(str::to_string)
				.collect(),
			Some(Value::Array(names)) => names
				.iter()
				.filter_map(Value::as_str)
				.map(str::to_string)
				.collect(),
			_ => Vec::new(),
		};

		Self {
			include,
			extra: map,
		}
	}

	/// Requested include names, in caller order
	pub fn include(&self) -> &[String] {
		&self.include
	}

	/// Whether the call requested any included resources
	pub fn has_include(&self) -> bool {
		!self.include.is_empty()
	}

	/// Get a free-form parameter
	pub fn get(&self, key: &str) -> Option<&Value> {
		self.extra.get(key)
	}
}

/// Options for one serialization call
#[derive(Debug, Clone, Default)]
pub struct SerializeOptions {
	/// Request parameters
	pub params: Params,
	/// Top-level `meta` for the document
	pub meta: Option<Value>,
	/// Top-level `links` for the document
	pub links: Option<Map<String, Value>>,
	/// Scoping hint handed unchanged to nested serialization
	pub within: Option<Value>,
}

impl SerializeOptions {
	/// Create default options
	pub fn new() -> Self {
		Self::default()
	}

	/// Set request parameters
	pub fn with_params(mut self, params: Params) -> Self {
		self.params = params;
		self
	}

	/// Set top-level meta
	pub fn with_meta(mut self, meta: Value) -> Self {
		self.meta = Some(meta);
		self
	}

	/// Set top-level links
	pub fn with_links(mut self, links: Map<String, Value>) -> Self {
		self.links = Some(links);
		self
	}

	/// Set the scoping hint
	pub fn with_within(mut self, within: Value) -> Self {
		self.within = Some(within);
		self
	}
}

/// View of the serializer instance handed to named conditions
#[derive(Debug, Clone, Copy)]
pub struct Context<'a> {
	/// Parameters of the current call
	pub params: &'a Params,
	/// Scoping hint of the current call
	pub within: Option<&'a Value>,
}

impl<'a> Context<'a> {
	pub(crate) fn new(options: &'a SerializeOptions) -> Self {
		Self {
			params: &options.params,
			within: options.within.as_ref(),
		}
	}
}
