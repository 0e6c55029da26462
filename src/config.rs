//! Immutable engine configuration: credentials plus the API base URL.
//!
//! Values are validated once by [`EngineConfigBuilder::build`]; the resulting
//! [`EngineConfig`] never changes for the lifetime of an engine.

// self
use crate::{_prelude::*, auth::Secret, error::ConfigError};

/// Public demo environment of the concierge API. Never applied implicitly.
pub const DEMO_API_URL: &str = "https://demo.sevenrooms.com/api-ext/2_4";

/// Concierge credentials issued by the API operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Credentials {
	/// Client identifier sent to `/auth`.
	pub client_id: String,
	/// Client secret sent to `/auth`.
	pub client_secret: Secret,
	/// Concierge identifier scoping every data request.
	pub concierge_id: String,
}

/// Validated configuration consumed by [`RequestEngine`](crate::engine::RequestEngine).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
	/// Credentials used for authentication and request scoping.
	pub credentials: Credentials,
	base_url: Url,
}
impl EngineConfig {
	/// Creates a new builder.
	pub fn builder() -> EngineConfigBuilder {
		EngineConfigBuilder::default()
	}

	/// Base URL without a trailing slash.
	pub fn base_url(&self) -> &str {
		self.base_url.as_str().trim_end_matches('/')
	}

	/// Joins `segments` onto the base URL, percent-encoding each one.
	pub fn endpoint<I, S>(&self, segments: I) -> Result<Url, ConfigError>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut url = self.base_url.clone();

		url.path_segments_mut()
			.map_err(|_| ConfigError::BaseUrlCannotBeABase)?
			.pop_if_empty()
			.extend(segments);

		Ok(url)
	}
}

/// Builder for [`EngineConfig`] values.
#[derive(Debug, Default)]
pub struct EngineConfigBuilder {
	/// Client identifier.
	pub client_id: Option<String>,
	/// Client secret.
	pub client_secret: Option<Secret>,
	/// Concierge identifier.
	pub concierge_id: Option<String>,
	/// API base URL, e.g. [`DEMO_API_URL`].
	pub base_url: Option<String>,
}
impl EngineConfigBuilder {
	/// Sets the client identifier.
	pub fn client_id(mut self, value: impl Into<String>) -> Self {
		self.client_id = Some(value.into());

		self
	}

	/// Sets the client secret.
	pub fn client_secret(mut self, value: impl Into<String>) -> Self {
		self.client_secret = Some(Secret::new(value));

		self
	}

	/// Sets the concierge identifier.
	pub fn concierge_id(mut self, value: impl Into<String>) -> Self {
		self.concierge_id = Some(value.into());

		self
	}

	/// Sets the API base URL.
	pub fn base_url(mut self, value: impl Into<String>) -> Self {
		self.base_url = Some(value.into());

		self
	}

	/// Consumes the builder and validates the resulting configuration.
	pub fn build(self) -> Result<EngineConfig, ConfigError> {
		let client_id = require("client ID", self.client_id)?;
		let client_secret =
			self.client_secret.ok_or(ConfigError::MissingField { field: "client secret" })?;

		if client_secret.is_blank() {
			return Err(ConfigError::EmptyField { field: "client secret" });
		}

		let concierge_id = require("concierge ID", self.concierge_id)?;
		let base_url = parse_base_url(&require("API URL", self.base_url)?)?;

		Ok(EngineConfig {
			credentials: Credentials { client_id, client_secret, concierge_id },
			base_url,
		})
	}
}

fn require(field: &'static str, value: Option<String>) -> Result<String, ConfigError> {
	let value = value.ok_or(ConfigError::MissingField { field })?;

	if value.trim().is_empty() {
		return Err(ConfigError::EmptyField { field });
	}

	Ok(value)
}

fn parse_base_url(raw: &str) -> Result<Url, ConfigError> {
	let url = Url::parse(raw.trim().trim_end_matches('/'))
		.map_err(|source| ConfigError::InvalidBaseUrl { source })?;

	if !matches!(url.scheme(), "http" | "https") {
		return Err(ConfigError::UnsupportedScheme { scheme: url.scheme().to_owned() });
	}
	if url.cannot_be_a_base() {
		return Err(ConfigError::BaseUrlCannotBeABase);
	}

	Ok(url)
}
