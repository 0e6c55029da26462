//! Identifiers addressed in request paths.
//!
//! Each identifier becomes one path segment, percent-encoded by
//! [`EngineConfig::endpoint`](crate::config::EngineConfig::endpoint). The only local rule is
//! that it is not blank.

// self
use crate::_prelude::*;

macro_rules! def_id {
	($name:ident, $doc:literal, $kind:literal) => {
		#[doc = $doc]
		#[derive(Clone, PartialEq, Eq, Hash)]
		pub struct $name(String);
		impl $name {
			/// Wraps `value`, rejecting blank input.
			pub fn new(value: impl Into<String>) -> Result<Self, IdentifierError> {
				let value = value.into();

				if value.trim().is_empty() {
					return Err(IdentifierError { kind: $kind });
				}

				Ok(Self(value))
			}
		}
		impl AsRef<str> for $name {
			fn as_ref(&self) -> &str {
				&self.0
			}
		}
		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				write!(f, concat!($kind, "({})"), self.0)
			}
		}
		impl Display for $name {
			fn fmt(&self, f: &mut Formatter) -> FmtResult {
				f.write_str(&self.0)
			}
		}
	};
}

/// A blank venue or reservation identifier.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("{kind} identifier cannot be empty.")]
pub struct IdentifierError {
	/// Which identifier was blank.
	pub kind: &'static str,
}

def_id! { VenueId, "Identifier of a venue that accepts bookings.", "Venue" }
def_id! { ReservationId, "Identifier of an existing reservation.", "Reservation" }
