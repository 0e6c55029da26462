//! Client-level error types shared across configuration, authentication, and request dispatch.

// self
use crate::{_prelude::*, auth::IdentifierError};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical client error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem; never retried.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The authentication exchange failed; never retried.
	#[error(transparent)]
	Authentication(#[from] AuthenticationError),
	/// The API answered with a non-success status.
	#[error(transparent)]
	Api(#[from] ApiError),
	/// The API answered with a success status but an unusable body.
	#[error(transparent)]
	Protocol(#[from] ProtocolError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// A venue or reservation identifier was blank; never retried.
	#[error(transparent)]
	Identifier(#[from] IdentifierError),
}
impl Error {
	/// Returns the wrapped [`ApiError`], if this is an API failure.
	pub fn as_api(&self) -> Option<&ApiError> {
		match self {
			Self::Api(e) => Some(e),
			_ => None,
		}
	}
}

/// Configuration and validation failures raised while constructing the client.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// A required field was never supplied.
	#[error("The {field} is required.")]
	MissingField {
		/// Field label.
		field: &'static str,
	},
	/// A required field was supplied but blank.
	#[error("The {field} cannot be empty.")]
	EmptyField {
		/// Field label.
		field: &'static str,
	},
	/// The base URL cannot be parsed.
	#[error("Base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// The base URL uses a scheme other than `http` or `https`.
	#[error("Base URL must use http or https, got `{scheme}`.")]
	UnsupportedScheme {
		/// Offending scheme.
		scheme: String,
	},
	/// The base URL cannot carry path segments (e.g. `mailto:`).
	#[error("Base URL cannot carry path segments.")]
	BaseUrlCannotBeABase,
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// Request parameters could not be form-encoded.
	#[error("Request parameters could not be encoded.")]
	ParamsEncoding {
		/// Underlying encoder failure.
		#[source]
		source: serde_urlencoded::ser::Error,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures of the `/auth` exchange.
#[derive(Debug, ThisError)]
pub enum AuthenticationError {
	/// The auth endpoint answered with a non-success status.
	#[error("Authentication was rejected with HTTP {status}: {message}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Remote or default message.
		message: String,
	},
	/// The auth endpoint answered successfully but without a usable token.
	#[error("Authentication response did not contain a token.")]
	MissingToken,
	/// The auth endpoint answered successfully with a body that is not the expected JSON.
	#[error("Authentication response is malformed.")]
	MalformedResponse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Classification of non-success API statuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
	/// HTTP 400.
	BadRequest,
	/// HTTP 401 that survived the replay.
	Unauthorized,
	/// HTTP 403.
	Forbidden,
	/// HTTP 404.
	NotFound,
	/// HTTP 405.
	MethodNotAllowed,
	/// HTTP 422.
	Validation,
	/// HTTP 429.
	RateLimited,
	/// HTTP 5xx.
	Server,
	/// Any other non-success status.
	Unexpected,
}
impl ApiErrorKind {
	/// Maps a non-success status code onto its kind.
	pub const fn from_status(status: u16) -> Self {
		match status {
			400 => Self::BadRequest,
			401 => Self::Unauthorized,
			403 => Self::Forbidden,
			404 => Self::NotFound,
			405 => Self::MethodNotAllowed,
			422 => Self::Validation,
			429 => Self::RateLimited,
			500..=599 => Self::Server,
			_ => Self::Unexpected,
		}
	}

	/// Returns a stable label suitable for logs and metrics.
	pub const fn as_str(self) -> &'static str {
		match self {
			Self::BadRequest => "bad_request",
			Self::Unauthorized => "unauthorized",
			Self::Forbidden => "forbidden",
			Self::NotFound => "not_found",
			Self::MethodNotAllowed => "method_not_allowed",
			Self::Validation => "validation",
			Self::RateLimited => "rate_limited",
			Self::Server => "server",
			Self::Unexpected => "unexpected",
		}
	}

	/// Message used when the response body carries none.
	pub const fn default_message(self) -> &'static str {
		match self {
			Self::BadRequest => "Bad request",
			Self::Unauthorized => "Unauthorized: Invalid credentials",
			Self::Forbidden => "Forbidden",
			Self::NotFound => "Resource not found",
			Self::MethodNotAllowed => "Method not allowed",
			Self::Validation => "Validation error",
			Self::RateLimited => "Rate limit exceeded",
			Self::Server => "Server error",
			Self::Unexpected => "Unexpected error",
		}
	}
}
impl Display for ApiErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Non-success response surfaced to the caller.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("API request failed with HTTP {status} ({kind}): {message}.")]
pub struct ApiError {
	/// Classified kind.
	pub kind: ApiErrorKind,
	/// HTTP status code.
	pub status: u16,
	/// Message extracted from `msg`/`message`, the raw body, or the kind default.
	pub message: String,
	/// Retry-After hint, only populated for rate-limited responses.
	pub retry_after: Option<Duration>,
}
impl ApiError {
	/// Creates an error, deriving the kind from the status.
	pub fn new(status: u16, message: impl Into<String>) -> Self {
		Self {
			kind: ApiErrorKind::from_status(status),
			status,
			message: message.into(),
			retry_after: None,
		}
	}

	/// Attaches a Retry-After hint.
	pub fn with_retry_after(mut self, retry_after: Option<Duration>) -> Self {
		self.retry_after = retry_after;

		self
	}

	/// Whether the caller can fix the request (400/422).
	pub fn is_caller_fixable(&self) -> bool {
		matches!(self.kind, ApiErrorKind::BadRequest | ApiErrorKind::Validation)
	}

	/// Whether the failure is infrastructural and may succeed later (429/5xx).
	pub fn is_retryable(&self) -> bool {
		matches!(self.kind, ApiErrorKind::RateLimited | ApiErrorKind::Server)
	}
}

/// Success responses whose body cannot be used.
#[derive(Debug, ThisError)]
pub enum ProtocolError {
	/// The body is not JSON.
	#[error("Response with HTTP {status} carried a malformed JSON body.")]
	MalformedBody {
		/// HTTP status code.
		status: u16,
		/// JSON syntax failure.
		#[source]
		source: serde_json::Error,
	},
	/// The payload does not match the requested type.
	#[error("Response payload does not match the requested type.")]
	Decode {
		/// Structured decoding failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
