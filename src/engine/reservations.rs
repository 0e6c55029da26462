//! Reservation operations exposed by [`RequestEngine`].
//!
//! All paths are scoped to the configured concierge. Writes (`PUT`/`DELETE`) send their
//! parameters as a form body; reads (`GET`) send them as a query string.

// self
use crate::{
	_prelude::*,
	auth::{ReservationId, VenueId},
	engine::{Operation, Payload, PendingOperation, RequestEngine},
	http::{ApiRequest, ApiTransport, Method},
	params::Params,
};

impl<T> RequestEngine<T>
where
	T: ?Sized + ApiTransport,
{
	/// Books a reservation at `venue_id` (`PUT …/venues/{venue_id}/book`).
	pub async fn create(&self, venue_id: &VenueId, params: &Params) -> Result<Payload> {
		self.execute(PendingOperation::new(Operation::Create, || {
			form_request(Method::Put, self.venue_url(venue_id, "book")?, Some(params))
		}))
		.await
	}

	/// Submits a reservation request at `venue_id` (`PUT …/venues/{venue_id}/request`).
	pub async fn request(&self, venue_id: &VenueId, params: &Params) -> Result<Payload> {
		self.execute(PendingOperation::new(Operation::Request, || {
			form_request(Method::Put, self.venue_url(venue_id, "request")?, Some(params))
		}))
		.await
	}

	/// Queries availability at `venue_id` (`GET …/venues/{venue_id}/availability`).
	pub async fn availability(&self, venue_id: &VenueId, params: &Params) -> Result<Payload> {
		self.execute(PendingOperation::new(Operation::Availability, || {
			Ok(query_request(self.venue_url(venue_id, "availability")?, Some(params)))
		}))
		.await
	}

	/// Updates a reservation (`PUT …/reservations/{reservation_id}`).
	pub async fn update(&self, reservation_id: &ReservationId, params: &Params) -> Result<Payload> {
		self.execute(PendingOperation::new(Operation::Update, || {
			form_request(Method::Put, self.reservation_url(reservation_id)?, Some(params))
		}))
		.await
	}

	/// Cancels a reservation (`DELETE …/reservations/{reservation_id}`).
	///
	/// Without parameters the request still carries an empty form body.
	pub async fn cancel(
		&self,
		reservation_id: &ReservationId,
		params: Option<&Params>,
	) -> Result<Payload> {
		self.execute(PendingOperation::new(Operation::Cancel, || {
			form_request(Method::Delete, self.reservation_url(reservation_id)?, params)
		}))
		.await
	}

	/// Fetches one reservation (`GET …/reservations/{reservation_id}`).
	pub async fn get(&self, reservation_id: &ReservationId) -> Result<Payload> {
		self.execute(PendingOperation::new(Operation::Get, || {
			Ok(query_request(self.reservation_url(reservation_id)?, None))
		}))
		.await
	}

	/// Lists reservations (`GET …/reservations`), filtered by `params` when given.
	pub async fn list(&self, params: Option<&Params>) -> Result<Payload> {
		self.execute(PendingOperation::new(Operation::List, || {
			Ok(query_request(self.concierge_url(["reservations"])?, params))
		}))
		.await
	}

	fn concierge_url<'a, I>(&'a self, tail: I) -> Result<Url>
	where
		I: IntoIterator<Item = &'a str>,
	{
		let concierge_id = self.config.credentials.concierge_id.as_str();

		Ok(self.config.endpoint(["concierge", concierge_id].into_iter().chain(tail))?)
	}

	fn venue_url(&self, venue_id: &VenueId, action: &str) -> Result<Url> {
		self.concierge_url(["venues", venue_id.as_ref(), action])
	}

	fn reservation_url(&self, reservation_id: &ReservationId) -> Result<Url> {
		self.concierge_url(["reservations", reservation_id.as_ref()])
	}
}

fn form_request(method: Method, url: Url, params: Option<&Params>) -> Result<ApiRequest> {
	let body = match params {
		Some(params) => params.to_form()?,
		None => String::new(),
	};

	Ok(ApiRequest::new(method, url).with_form_body(body))
}

fn query_request(mut url: Url, params: Option<&Params>) -> ApiRequest {
	if let Some(params) = params {
		params.append_query(&mut url);
	}

	ApiRequest::new(Method::Get, url)
}
