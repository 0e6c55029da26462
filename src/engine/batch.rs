//! Sequential batch helpers.
//!
//! Items run one after another through the regular operations, so each item gets its own
//! replay budget. API rejections are collected per item; any other failure (configuration,
//! authentication, transport, protocol) aborts the remaining items.

// self
use crate::{
	_prelude::*,
	auth::{ReservationId, VenueId},
	engine::{Payload, RequestEngine},
	error::ApiError,
	http::ApiTransport,
	params::Params,
};

/// Per-item results of a batch, in input order.
pub type BatchResults = Vec<Result<Payload, ApiError>>;

impl<T> RequestEngine<T>
where
	T: ?Sized + ApiTransport,
{
	/// Creates one reservation per `(venue, params)` item.
	pub async fn create_batch<I>(&self, items: I) -> Result<BatchResults>
	where
		I: IntoIterator<Item = (VenueId, Params)>,
	{
		let mut results = Vec::new();

		for (venue_id, params) in items {
			results.push(per_item(self.create(&venue_id, &params).await)?);
		}

		Ok(results)
	}

	/// Updates one reservation per `(reservation, params)` item.
	pub async fn update_batch<I>(&self, items: I) -> Result<BatchResults>
	where
		I: IntoIterator<Item = (ReservationId, Params)>,
	{
		let mut results = Vec::new();

		for (reservation_id, params) in items {
			results.push(per_item(self.update(&reservation_id, &params).await)?);
		}

		Ok(results)
	}

	/// Cancels one reservation per item.
	pub async fn cancel_batch<I>(&self, items: I) -> Result<BatchResults>
	where
		I: IntoIterator<Item = (ReservationId, Option<Params>)>,
	{
		let mut results = Vec::new();

		for (reservation_id, params) in items {
			results.push(per_item(self.cancel(&reservation_id, params.as_ref()).await)?);
		}

		Ok(results)
	}

	/// Fetches each reservation.
	pub async fn get_batch<I>(&self, reservation_ids: I) -> Result<BatchResults>
	where
		I: IntoIterator<Item = ReservationId>,
	{
		let mut results = Vec::new();

		for reservation_id in reservation_ids {
			results.push(per_item(self.get(&reservation_id).await)?);
		}

		Ok(results)
	}
}

fn per_item(result: Result<Payload>) -> Result<Result<Payload, ApiError>> {
	match result {
		Ok(payload) => Ok(Ok(payload)),
		Err(Error::Api(e)) => Ok(Err(e)),
		Err(e) => Err(e),
	}
}
