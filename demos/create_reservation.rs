//! Books a reservation through the default reqwest engine against a mock concierge API. The
//! cached token is revoked server-side before the booking, so the create call is rejected once,
//! re-authenticates, and succeeds on the replay.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
// self
use sevenrooms_client::{
	auth::VenueId,
	config::EngineConfig,
	engine::{Payload, ReqwestEngine},
	params::Params,
};

const PREFIX: &str = "/api-ext/2_4";

async fn mock_auth<'a>(server: &'a MockServer, token: &str) -> httpmock::Mock<'a> {
	let body = format!(
		r#"{{"data":{{"token":"{token}","token_expiration_datetime":"2030-01-01 00:00:00"}}}}"#
	);

	server
		.mock_async(|when, then| {
			when.method(POST).path(format!("{PREFIX}/auth"));
			then.status(200).header("content-type", "application/json").body(body);
		})
		.await
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let mut first_auth = mock_auth(&server, "stale-token").await;
	let listing = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(format!("{PREFIX}/concierge/demo-concierge/reservations"))
				.header("authorization", "stale-token");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"data":{"results":[]}}"#);
		})
		.await;
	let engine = ReqwestEngine::new(
		EngineConfig::builder()
			.client_id("demo-client")
			.client_secret("demo-secret")
			.concierge_id("demo-concierge")
			.base_url(format!("http://{}{PREFIX}", server.address()))
			.build()?,
	)?;

	engine.list(None).await?;

	println!("Cached token after the first call: {:?}.", engine.token_store().peek().await);

	// The API revokes the cached token and issues a new one on the next exchange.
	first_auth.delete_async().await;

	let second_auth = mock_auth(&server, "fresh-token").await;
	let rejected = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path(format!("{PREFIX}/concierge/demo-concierge/venues/v1/book"))
				.header("authorization", "stale-token");
			then.status(401)
				.header("content-type", "application/json")
				.body(r#"{"msg":"Token expired"}"#);
		})
		.await;
	let accepted = server
		.mock_async(|when, then| {
			when.method(PUT)
				.path(format!("{PREFIX}/concierge/demo-concierge/venues/v1/book"))
				.header("authorization", "fresh-token");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"status":200,"data":{"id":"12345","status":"confirmed"}}"#);
		})
		.await;
	let venue = VenueId::new("v1")?;
	let params = Params::new()
		.with("date", "2024-05-16")
		.with("time", "19:00")
		.with("party_size", 2)
		.with("first_name", "Test")
		.with("last_name", "User")
		.with("email", "test@example.com")
		.with("phone", "+14155550100");
	let payload: Payload = engine.create(&venue, &params).await?;

	println!("Reservation {} is {}.", payload.data()["id"], payload.data()["status"]);

	listing.assert_async().await;
	second_auth.assert_async().await;
	rejected.assert_async().await;
	accepted.assert_async().await;

	Ok(())
}
