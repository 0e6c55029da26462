//! Shared fixtures for the integration suites.

#![allow(dead_code)]

// std
use std::{
	collections::VecDeque,
	error::Error as StdError,
	fmt::{Display, Formatter, Result as FmtResult},
	sync::Arc,
	time::Duration as StdDuration,
};
// crates.io
use parking_lot::Mutex;
// self
use sevenrooms_client::{
	config::EngineConfig,
	engine::RequestEngine,
	http::{ApiRequest, ApiResponse, ApiTransport, TransportFuture},
};

pub const CLIENT_ID: &str = "concierge-client";
pub const CLIENT_SECRET: &str = "concierge-secret";
pub const CONCIERGE_ID: &str = "concierge-42";
pub const BASE_URL: &str = "https://api.example.com/api-ext/2_4";

type Responder = Box<dyn Fn(&ApiRequest) -> ApiResponse + Send + Sync>;

#[derive(Debug)]
pub enum ScriptError {
	Exhausted,
	ConnectionReset,
}
impl Display for ScriptError {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match self {
			Self::Exhausted => write!(f, "Scripted transport has no response left."),
			Self::ConnectionReset => write!(f, "Connection reset by peer."),
		}
	}
}
impl StdError for ScriptError {}

/// In-process transport that answers `/auth` and data calls from separate scripts.
///
/// Auth calls pop the auth script and fall back to issuing `token-{n}` once it is empty.
/// Data calls use the responder when one is set, otherwise they pop the data script; a
/// `None` entry simulates a network failure.
#[derive(Default)]
pub struct ScriptedTransport {
	auth: Mutex<VecDeque<ApiResponse>>,
	data: Mutex<VecDeque<Option<ApiResponse>>>,
	responder: Option<Responder>,
	auth_delay: Option<StdDuration>,
	requests: Mutex<Vec<ApiRequest>>,
}
impl ScriptedTransport {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn auth(self, response: ApiResponse) -> Self {
		self.auth.lock().push_back(response);

		self
	}

	pub fn data(self, response: ApiResponse) -> Self {
		self.data.lock().push_back(Some(response));

		self
	}

	pub fn network_failure(self) -> Self {
		self.data.lock().push_back(None);

		self
	}

	pub fn respond_with(
		mut self,
		responder: impl Fn(&ApiRequest) -> ApiResponse + Send + Sync + 'static,
	) -> Self {
		self.responder = Some(Box::new(responder));

		self
	}

	pub fn auth_delay(mut self, delay: StdDuration) -> Self {
		self.auth_delay = Some(delay);

		self
	}

	pub fn requests(&self) -> Vec<ApiRequest> {
		self.requests.lock().clone()
	}

	pub fn data_requests(&self) -> Vec<ApiRequest> {
		self.requests().into_iter().filter(|request| !is_auth(request)).collect()
	}

	pub fn auth_calls(&self) -> usize {
		self.requests.lock().iter().filter(|request| is_auth(request)).count()
	}

	pub fn data_calls(&self) -> usize {
		self.requests.lock().iter().filter(|request| !is_auth(request)).count()
	}
}
impl ApiTransport for ScriptedTransport {
	type TransportError = ScriptError;

	fn send(&self, request: ApiRequest) -> TransportFuture<'_, Self::TransportError> {
		Box::pin(async move {
			let auth = is_auth(&request);
			let delay = if auth { self.auth_delay } else { None };
			let outcome = if auth {
				let issued = self.auth_calls() + 1;
				let scripted = self.auth.lock().pop_front();

				Ok(scripted.unwrap_or_else(|| token(&format!("token-{issued}"))))
			} else if let Some(responder) = &self.responder {
				Ok(responder(&request))
			} else {
				match self.data.lock().pop_front() {
					Some(Some(response)) => Ok(response),
					Some(None) => Err(ScriptError::ConnectionReset),
					None => Err(ScriptError::Exhausted),
				}
			};

			self.requests.lock().push(request);

			if let Some(delay) = delay {
				tokio::time::sleep(delay).await;
			}

			outcome
		})
	}
}

fn is_auth(request: &ApiRequest) -> bool {
	request.url.path().ends_with("/auth")
}

pub fn config() -> EngineConfig {
	config_for(BASE_URL)
}

pub fn config_for(base_url: &str) -> EngineConfig {
	EngineConfig::builder()
		.client_id(CLIENT_ID)
		.client_secret(CLIENT_SECRET)
		.concierge_id(CONCIERGE_ID)
		.base_url(base_url)
		.build()
		.expect("Test configuration should build.")
}

pub fn engine(
	transport: ScriptedTransport,
) -> (RequestEngine<ScriptedTransport>, Arc<ScriptedTransport>) {
	let transport = Arc::new(transport);
	let engine = RequestEngine::with_transport(config(), transport.clone())
		.expect("Engine should build over the scripted transport.");

	(engine, transport)
}

pub fn token(value: &str) -> ApiResponse {
	ApiResponse::new(
		200,
		format!(
			r#"{{"data":{{"token":"{value}","token_expiration_datetime":"2030-01-01 00:00:00"}}}}"#
		),
	)
}

pub fn json(status: u16, body: &str) -> ApiResponse {
	ApiResponse::new(status, body).with_header("Content-Type", "application/json")
}
