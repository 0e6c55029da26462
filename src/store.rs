//! Single-token cache that owns the `/auth` exchange.
//!
//! [`TokenStore`] keeps at most one live [`Token`]. The first caller (or the first caller after
//! an invalidation) performs the authentication exchange while holding the cache lock, so
//! concurrent callers piggy-back on the same exchange instead of stampeding `/auth`.
//! [`TokenStore::refresh`] swaps a rejected token for a fresh one under a single lock
//! acquisition, which keeps invalidate-then-reacquire atomic for every observer.

// self
use crate::{
	_prelude::*,
	auth::{Secret, Token},
	config::{Credentials, EngineConfig},
	engine::{Envelope, Operation, error_message},
	error::{ApiErrorKind, AuthenticationError, ConfigError, TransportError},
	http::{ApiRequest, ApiResponse, ApiTransport, Method},
	obs::{self, OperationSpan, Outcome},
};

/// Owner of the single live bearer token.
pub struct TokenStore<T>
where
	T: ?Sized + ApiTransport,
{
	transport: Arc<T>,
	credentials: Credentials,
	auth_endpoint: Url,
	cache: AsyncMutex<Option<Token>>,
}
impl<T> TokenStore<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates an empty store that authenticates against `{base_url}/auth`.
	pub fn new(config: &EngineConfig, transport: impl Into<Arc<T>>) -> Result<Self, ConfigError> {
		Ok(Self {
			transport: transport.into(),
			credentials: config.credentials.clone(),
			auth_endpoint: config.endpoint(["auth"])?,
			cache: AsyncMutex::new(None),
		})
	}

	/// Returns the cached token, authenticating first when none is cached.
	pub async fn current_token(&self) -> Result<Token> {
		let mut cache = self.cache.lock().await;

		if let Some(token) = cache.as_ref() {
			return Ok(token.clone());
		}

		let token = self.authenticate().await?;

		*cache = Some(token.clone());

		Ok(token)
	}

	/// Returns the cached token without authenticating.
	pub async fn peek(&self) -> Option<Token> {
		self.cache.lock().await.clone()
	}

	/// Drops the cached token. Idempotent.
	pub async fn invalidate(&self) {
		self.cache.lock().await.take();
	}

	/// Replaces `stale` with a freshly authenticated token.
	///
	/// When another caller already replaced `stale`, the newer token is returned without a
	/// second exchange. On failure the cache is left empty.
	pub async fn refresh(&self, stale: &Token) -> Result<Token> {
		let mut cache = self.cache.lock().await;

		if let Some(current) = cache.as_ref().filter(|current| *current != stale) {
			return Ok(current.clone());
		}

		cache.take();

		let token = self.authenticate().await?;

		*cache = Some(token.clone());

		Ok(token)
	}

	async fn authenticate(&self) -> Result<Token> {
		const OPERATION: Operation = Operation::Authenticate;

		let span = OperationSpan::new(OPERATION, "authenticate");

		obs::record_outcome(OPERATION, Outcome::Attempt);

		let result = span
			.instrument(async {
				let credentials = [
					("client_id", self.credentials.client_id.as_str()),
					("client_secret", self.credentials.client_secret.expose()),
				];
				let form = serde_urlencoded::to_string(credentials.as_slice())
					.map_err(|source| ConfigError::ParamsEncoding { source })?;
				let request = ApiRequest::new(Method::Post, self.auth_endpoint.clone())
					.with_header("Accept", "application/json")
					.with_form_body(form);
				let response =
					self.transport.send(request).await.map_err(TransportError::network)?;
				let token = decode_grant(&response, OffsetDateTime::now_utc())?;

				obs::debug_event(OPERATION, "Bearer token acquired.");

				Ok(token)
			})
			.await;

		match &result {
			Ok(_) => obs::record_outcome(OPERATION, Outcome::Success),
			Err(_) => obs::record_outcome(OPERATION, Outcome::Failure),
		}

		result
	}
}
impl<T> Debug for TokenStore<T>
where
	T: ?Sized + ApiTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenStore")
			.field("client_id", &self.credentials.client_id)
			.field("auth_endpoint", &self.auth_endpoint.as_str())
			.finish()
	}
}

#[derive(Debug, Default, Deserialize)]
struct Grant {
	#[serde(default)]
	token: Option<String>,
	#[serde(default)]
	token_expiration_datetime: Option<String>,
}

fn decode_grant(
	response: &ApiResponse,
	obtained_at: OffsetDateTime,
) -> Result<Token, AuthenticationError> {
	if !response.is_success() {
		let kind = ApiErrorKind::from_status(response.status);

		return Err(AuthenticationError::Rejected {
			status: response.status,
			message: error_message(kind, &response.body),
		});
	}

	let mut track = serde_path_to_error::Track::new();
	let de = &mut serde_json::Deserializer::from_slice(&response.body);
	let grant = Envelope::<Grant>::deserialize(serde_path_to_error::Deserializer::new(
		&mut *de,
		&mut track,
	))
	.and_then(|grant| de.end().map(|()| grant))
	.map_err(|e| AuthenticationError::MalformedResponse {
		source: serde_path_to_error::Error::new(track.path(), e),
	})?
	.into_inner();
	let value = grant
		.token
		.filter(|token| !token.trim().is_empty())
		.ok_or(AuthenticationError::MissingToken)?;

	Ok(Token::new(Secret::new(value), obtained_at)
		.with_expiration(grant.token_expiration_datetime.as_deref()))
}
