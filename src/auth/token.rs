//! Bearer token issued by the `/auth` endpoint.

// crates.io
use time::{PrimitiveDateTime, format_description::well_known::Rfc3339, macros::format_description};
// self
use crate::{_prelude::*, auth::Secret};

/// Bearer token cached by [`TokenStore`](crate::store::TokenStore).
///
/// The API gives no usable TTL contract, so the token is treated as valid until a request
/// using it is rejected with `401`. [`Token::expires_at`] is informational only.
#[derive(Clone, PartialEq, Eq)]
pub struct Token {
	value: Secret,
	obtained_at: OffsetDateTime,
	expires_at: Option<OffsetDateTime>,
}
impl Token {
	pub(crate) fn new(value: Secret, obtained_at: OffsetDateTime) -> Self {
		Self { value, obtained_at, expires_at: None }
	}

	/// Records the `token_expiration_datetime` hint, ignoring values that do not parse.
	pub(crate) fn with_expiration(mut self, raw: Option<&str>) -> Self {
		self.expires_at = raw.and_then(parse_expiration);

		self
	}

	/// Header value; never leaves the crate.
	pub(crate) fn secret(&self) -> &Secret {
		&self.value
	}

	/// Instant the token was obtained.
	pub fn obtained_at(&self) -> OffsetDateTime {
		self.obtained_at
	}

	/// Expiry reported by the auth endpoint, if any.
	pub fn expires_at(&self) -> Option<OffsetDateTime> {
		self.expires_at
	}

	/// Whether the reported expiry has passed at `instant`. Tokens without a reported expiry
	/// never expire locally.
	pub fn is_expired_at(&self, instant: OffsetDateTime) -> bool {
		self.expires_at.is_some_and(|expires_at| instant >= expires_at)
	}
}
impl Debug for Token {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Token")
			.field("value", &"<redacted>")
			.field("obtained_at", &self.obtained_at)
			.field("expires_at", &self.expires_at)
			.finish()
	}
}

fn parse_expiration(raw: &str) -> Option<OffsetDateTime> {
	let raw = raw.trim();

	if let Ok(instant) = OffsetDateTime::parse(raw, &Rfc3339) {
		return Some(instant);
	}

	// Naive timestamps are reported in UTC.
	let iso = format_description!(
		"[year]-[month]-[day]T[hour]:[minute]:[second][optional [.[subsecond]]]"
	);
	let spaced = format_description!(
		"[year]-[month]-[day] [hour]:[minute]:[second][optional [.[subsecond]]]"
	);

	PrimitiveDateTime::parse(raw, &iso)
		.or_else(|_| PrimitiveDateTime::parse(raw, &spaced))
		.ok()
		.map(PrimitiveDateTime::assume_utc)
}
