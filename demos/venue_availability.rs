//! Queries venue availability and lists reservations with the default reqwest engine against a
//! mock concierge API, decoding the payload into caller-defined types.

// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde::Deserialize;
// self
use sevenrooms_client::{auth::VenueId, config::EngineConfig, engine::ReqwestEngine, params::Params};

const PREFIX: &str = "/api-ext/2_4";

#[derive(Debug, Deserialize)]
struct Availability {
	availability: Vec<Slot>,
}

#[derive(Debug, Deserialize)]
struct Slot {
	time: String,
	#[serde(default)]
	shift: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let auth_mock = server
		.mock_async(|when, then| {
			when.method(POST).path(format!("{PREFIX}/auth"));
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"data":{"token":"demo-token"}}"#);
		})
		.await;
	let availability_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(format!("{PREFIX}/concierge/demo-concierge/venues/v1/availability"))
				.query_param("date", "2024-05-16")
				.query_param("party_size", "4");
			then.status(200).header("content-type", "application/json").body(
				r#"{"data":{"availability":[{"time":"17:30","shift":"DINNER"},{"time":"20:15"}]}}"#,
			);
		})
		.await;
	let list_mock = server
		.mock_async(|when, then| {
			when.method(GET)
				.path(format!("{PREFIX}/concierge/demo-concierge/reservations"))
				.query_param("venue_id", "v1");
			then.status(200)
				.header("content-type", "application/json")
				.body(r#"{"data":{"results":[{"id":"12345","status":"confirmed"}]}}"#);
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
	let venue = VenueId::new("v1")?;
	let availability = engine
		.availability(&venue, &Params::new().with("date", "2024-05-16").with("party_size", 4))
		.await?
		.decode::<Availability>()?;

	for slot in &availability.availability {
		println!("Open slot at {} ({}).", slot.time, slot.shift.as_deref().unwrap_or("any shift"));
	}

	let reservations = engine.list(Some(&Params::new().with("venue_id", &venue))).await?;

	println!("Existing reservations: {}.", reservations.data()["results"]);

	auth_mock.assert_async().await;
	availability_mock.assert_async().await;
	list_mock.assert_async().await;

	Ok(())
}
