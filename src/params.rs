//! Request parameters handed over by the validation layer.
//!
//! The engine performs no field-level validation; it only encodes what it is given, as a
//! form body for `PUT`/`DELETE` and as a query string for `GET`.

// self
use crate::{_prelude::*, error::ConfigError};

/// Ordered `name → value` map of already-validated request parameters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Params(BTreeMap<String, String>);
impl Params {
	/// Creates an empty parameter map.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds or replaces a parameter, returning the map for chaining.
	pub fn with(mut self, name: impl Into<String>, value: impl Display) -> Self {
		self.insert(name, value);

		self
	}

	/// Adds or replaces a parameter.
	pub fn insert(&mut self, name: impl Into<String>, value: impl Display) -> Option<String> {
		self.0.insert(name.into(), value.to_string())
	}

	/// Looks up a parameter.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0.get(name).map(String::as_str)
	}

	/// Whether no parameters are present.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Number of parameters.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Iterates over `(name, value)` pairs in name order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
		self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
	}

	/// Encodes the parameters as `application/x-www-form-urlencoded`. An empty map encodes to
	/// an empty string.
	pub fn to_form(&self) -> Result<String, ConfigError> {
		serde_urlencoded::to_string(&self.0)
			.map_err(|source| ConfigError::ParamsEncoding { source })
	}

	/// Appends the parameters to `url`'s query string. Leaves `url` untouched when empty.
	pub fn append_query(&self, url: &mut Url) {
		if self.is_empty() {
			return;
		}

		url.query_pairs_mut().extend_pairs(self.iter());
	}
}
impl<K, V> FromIterator<(K, V)> for Params
where
	K: Into<String>,
	V: Display,
{
	fn from_iter<I>(iter: I) -> Self
	where
		I: IntoIterator<Item = (K, V)>,
	{
		let mut params = Self::new();

		for (name, value) in iter {
			params.insert(name, value);
		}

		params
	}
}
impl From<BTreeMap<String, String>> for Params {
	fn from(map: BTreeMap<String, String>) -> Self {
		Self(map)
	}
}
