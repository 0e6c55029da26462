//! One-shot replay after a token rejection.
//!
//! An operation is attempted with the cached token. A `401` triggers exactly one
//! [`TokenStore::refresh`](crate::store::TokenStore::refresh) and exactly one replay; a second
//! `401` surfaces as an unauthorized [`ApiError`](crate::error::ApiError). Any other outcome of
//! either attempt is returned as-is.

// self
use crate::{
	_prelude::*,
	auth::Token,
	engine::{
		Operation, Payload, RequestEngine,
		response::{self, Classified},
	},
	error::TransportError,
	http::{ApiRequest, ApiTransport},
	obs::{self, OperationSpan, Outcome},
};

/// An operation whose request can be rebuilt for a replay.
///
/// The builder runs once per attempt, so a replayed request carries the same method, path,
/// and parameters as the original one with only the token swapped.
pub struct PendingOperation<F> {
	operation: Operation,
	build: F,
}
impl<F> PendingOperation<F>
where
	F: Fn() -> Result<ApiRequest>,
{
	/// Wraps a request builder for `operation`.
	pub fn new(operation: Operation, build: F) -> Self {
		Self { operation, build }
	}

	/// Operation label.
	pub fn operation(&self) -> Operation {
		self.operation
	}

	/// Builds a fresh, unauthenticated request.
	pub fn prepare(&self) -> Result<ApiRequest> {
		(self.build)()
	}
}
impl<F> Debug for PendingOperation<F> {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("PendingOperation").field("operation", &self.operation).finish()
	}
}

impl<T> RequestEngine<T>
where
	T: ?Sized + ApiTransport,
{
	/// Runs `pending`, replaying it once when the cached token is rejected.
	pub async fn execute<F>(&self, pending: PendingOperation<F>) -> Result<Payload>
	where
		F: Fn() -> Result<ApiRequest> + Send + Sync,
	{
		let operation = pending.operation();
		let span = OperationSpan::new(operation, "execute");

		obs::record_outcome(operation, Outcome::Attempt);

		let result = span
			.instrument(async {
				let token = self.tokens.current_token().await?;
				let rejected = match self.attempt(&pending, &token).await? {
					Classified::Success(payload) => return Ok(payload),
					Classified::Unauthorized(rejected) => rejected,
				};

				obs::warn_event(operation, rejected.status, "Token rejected; replaying once.");
				obs::record_outcome(operation, Outcome::Reauthenticated);

				let fresh = self.tokens.refresh(&token).await?;

				match self.attempt(&pending, &fresh).await? {
					Classified::Success(payload) => Ok(payload),
					Classified::Unauthorized(rejected) => {
						obs::warn_event(operation, rejected.status, "Replay rejected as well.");

						Err(rejected.into())
					},
				}
			})
			.await;

		match &result {
			Ok(_) => obs::record_outcome(operation, Outcome::Success),
			Err(_) => obs::record_outcome(operation, Outcome::Failure),
		}

		result
	}

	async fn attempt<F>(&self, pending: &PendingOperation<F>, token: &Token) -> Result<Classified>
	where
		F: Fn() -> Result<ApiRequest> + Send + Sync,
	{
		let request = pending
			.prepare()?
			.with_header("X-Concierge-Id", self.config.credentials.concierge_id.as_str())
			.with_header("Authorization", token.secret().expose())
			.with_header("Accept", "application/json");
		let response = self.transport.send(request).await.map_err(TransportError::network)?;

		obs::debug_event(pending.operation(), "Response received.");

		response::classify(&response)
	}
}
