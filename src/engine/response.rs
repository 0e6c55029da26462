//! Response classification and payload decoding.
//!
//! A `2xx` response becomes a [`Payload`]; a `401` is handed back to the replay logic; any
//! other status becomes an [`ApiError`] whose message comes from the body's `msg` or `message`
//! field, a preview of a non-JSON body, or the kind's default text, in that order.

// crates.io
use serde::de::DeserializeOwned;
use serde_json::Map;
// self
use crate::{
	_prelude::*,
	error::{ApiError, ApiErrorKind, ProtocolError},
	http::ApiResponse,
};

const MESSAGE_PREVIEW_CHARS: usize = 256;

/// Decoded body of a successful response.
#[derive(Clone, Debug, PartialEq)]
pub enum Payload {
	/// The body was an object with a `data` member. Sibling members are kept as metadata.
	Enveloped {
		/// Contents of `data`.
		data: Value,
		/// Every other top-level member (`status`, `code`, ...).
		meta: Map<String, Value>,
	},
	/// Any other JSON body, or `null` for an empty body.
	Flat(Value),
}
impl Payload {
	/// Decodes a success body. Empty or whitespace-only bodies become `Flat(null)`.
	pub(crate) fn from_body(status: u16, body: &[u8]) -> Result<Self, ProtocolError> {
		if body.iter().all(u8::is_ascii_whitespace) {
			return Ok(Self::Flat(Value::Null));
		}

		let value = serde_json::from_slice::<Value>(body)
			.map_err(|source| ProtocolError::MalformedBody { status, source })?;

		Ok(value.into())
	}

	/// The business payload: `data` when enveloped, the whole body otherwise.
	pub fn data(&self) -> &Value {
		match self {
			Self::Enveloped { data, .. } => data,
			Self::Flat(value) => value,
		}
	}

	/// Consumes the payload and returns [`Payload::data`].
	pub fn into_data(self) -> Value {
		match self {
			Self::Enveloped { data, .. } => data,
			Self::Flat(value) => value,
		}
	}

	/// Envelope metadata, when present.
	pub fn meta(&self) -> Option<&Map<String, Value>> {
		match self {
			Self::Enveloped { meta, .. } => Some(meta),
			Self::Flat(_) => None,
		}
	}

	/// Whether the body used the `data` envelope.
	pub fn is_enveloped(&self) -> bool {
		matches!(self, Self::Enveloped { .. })
	}

	/// Deserializes [`Payload::data`] into `D`, reporting the failing JSON path.
	pub fn decode<D>(&self) -> Result<D, ProtocolError>
	where
		D: DeserializeOwned,
	{
		serde_path_to_error::deserialize(self.data())
			.map_err(|source| ProtocolError::Decode { source })
	}
}
impl From<Value> for Payload {
	fn from(value: Value) -> Self {
		match value {
			Value::Object(mut map) => match map.remove("data") {
				Some(data) => Self::Enveloped { data, meta: map },
				None => Self::Flat(Value::Object(map)),
			},
			other => Self::Flat(other),
		}
	}
}

/// Either `{"data": T, ...}` or a bare `T`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Envelope<T> {
	Wrapped { data: T },
	Bare(T),
}
impl<T> Envelope<T> {
	pub(crate) fn into_inner(self) -> T {
		match self {
			Self::Wrapped { data } | Self::Bare(data) => data,
		}
	}
}

/// Result of classifying a response that the caller may still replay.
#[derive(Debug)]
pub(crate) enum Classified {
	Success(Payload),
	Unauthorized(ApiError),
}

/// Classifies `response`; every non-success status other than `401` is an error.
pub(crate) fn classify(response: &ApiResponse) -> Result<Classified> {
	if response.is_success() {
		return Ok(Classified::Success(Payload::from_body(response.status, &response.body)?));
	}

	let kind = ApiErrorKind::from_status(response.status);
	let error = ApiError::new(response.status, error_message(kind, &response.body));

	match kind {
		ApiErrorKind::Unauthorized => Ok(Classified::Unauthorized(error)),
		ApiErrorKind::RateLimited => Err(error.with_retry_after(response.retry_after()).into()),
		_ => Err(error.into()),
	}
}

/// Picks the most specific human-readable message available for an error body.
pub(crate) fn error_message(kind: ApiErrorKind, body: &[u8]) -> String {
	if let Ok(value) = serde_json::from_slice::<Value>(body) {
		if let Some(message) = ["msg", "message"]
			.into_iter()
			.filter_map(|key| value.get(key).and_then(Value::as_str))
			.find(|message| !message.trim().is_empty())
		{
			return message.to_owned();
		}
		if value.is_object() {
			return kind.default_message().to_owned();
		}
	}

	let text = String::from_utf8_lossy(body);
	let text = text.trim();

	if text.is_empty() {
		kind.default_message().to_owned()
	} else {
		text.chars().take(MESSAGE_PREVIEW_CHARS).collect()
	}
}
