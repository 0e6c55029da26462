//! Request engine for the concierge reservation API.
//!
//! [`RequestEngine`] owns the validated configuration, the transport, and the shared
//! [`TokenStore`]. Every public operation is described as a [`PendingOperation`] whose request
//! builder can be invoked twice: once with the cached token and, when the API answers `401`,
//! once more after a single re-authentication.

pub mod batch;
pub mod reservations;
pub mod response;

mod replay;

pub use batch::*;
pub use replay::PendingOperation;
pub use response::Payload;
pub(crate) use response::{Envelope, error_message};

// self
use crate::{
	_prelude::*, config::EngineConfig, error::ConfigError, http::ApiTransport, store::TokenStore,
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

#[cfg(feature = "reqwest")]
/// Engine specialized for the crate's default reqwest transport.
pub type ReqwestEngine = RequestEngine<ReqwestTransport>;

/// Logical API operations, used for span and metric labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
	/// `POST /auth`.
	Authenticate,
	/// Create (book) a reservation.
	Create,
	/// Update an existing reservation.
	Update,
	/// Cancel a reservation.
	Cancel,
	/// Fetch one reservation.
	Get,
	/// List reservations.
	List,
	/// Submit a reservation request.
	Request,
	/// Query venue availability.
	Availability,
}
impl Operation {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::Authenticate => "authenticate",
			Self::Create => "create",
			Self::Update => "update",
			Self::Cancel => "cancel",
			Self::Get => "get",
			Self::List => "list",
			Self::Request => "request",
			Self::Availability => "availability",
		}
	}
}
impl Display for Operation {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Issues authenticated API calls and replays a call once after a token rejection.
///
/// Cloning is cheap; clones share the transport and the token cache, so a token acquired or
/// replaced through one clone is observed by all of them.
pub struct RequestEngine<T>
where
	T: ?Sized + ApiTransport,
{
	config: Arc<EngineConfig>,
	transport: Arc<T>,
	tokens: Arc<TokenStore<T>>,
}
impl<T> RequestEngine<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates an engine that sends every request through `transport`.
	pub fn with_transport(
		config: EngineConfig,
		transport: impl Into<Arc<T>>,
	) -> Result<Self, ConfigError> {
		let transport = transport.into();
		let tokens = TokenStore::new(&config, transport.clone())?;

		Ok(Self { config: Arc::new(config), transport, tokens: Arc::new(tokens) })
	}

	/// Configuration the engine was built with.
	pub fn config(&self) -> &EngineConfig {
		&self.config
	}

	/// Shared token cache.
	pub fn token_store(&self) -> &TokenStore<T> {
		&self.tokens
	}
}
#[cfg(feature = "reqwest")]
impl RequestEngine<ReqwestTransport> {
	/// Creates an engine backed by a default reqwest client.
	///
	/// Use [`RequestEngine::with_transport`] with
	/// [`ReqwestTransport::with_client`](crate::http::ReqwestTransport::with_client) to
	/// customize timeouts, proxies, or TLS.
	pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
		Self::with_transport(config, ReqwestTransport::new()?)
	}
}
impl<T> Clone for RequestEngine<T>
where
	T: ?Sized + ApiTransport,
{
	fn clone(&self) -> Self {
		Self {
			config: self.config.clone(),
			transport: self.transport.clone(),
			tokens: self.tokens.clone(),
		}
	}
}
impl<T> Debug for RequestEngine<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RequestEngine")
			.field("base_url", &self.config.base_url())
			.field("concierge_id", &self.config.credentials.concierge_id)
			.field("tokens", &self.tokens)
			.finish()
	}
}
