mod common;

// std
use std::time::Duration as StdDuration;
// crates.io
use serde_json::json;
// self
use common::*;
use sevenrooms_client::{
	auth::{ReservationId, VenueId},
	error::{ApiErrorKind, AuthenticationError, Error, ProtocolError},
	http::Method,
	params::Params,
};

fn venue(value: &str) -> VenueId {
	VenueId::new(value).expect("Venue identifier fixture should be valid.")
}

fn reservation(value: &str) -> ReservationId {
	ReservationId::new(value).expect("Reservation identifier fixture should be valid.")
}

#[tokio::test]
async fn fresh_engine_authenticates_once_and_reuses_the_token() {
	let (engine, transport) = engine(
		ScriptedTransport::new()
			.data(json(200, r#"{"data":{"id":"r1"}}"#))
			.data(json(200, r#"{"data":{"id":"r2"}}"#)),
	);
	let first = engine.get(&reservation("r1")).await.expect("First get should succeed.");
	let second = engine.get(&reservation("r2")).await.expect("Second get should succeed.");

	assert_eq!(first.data()["id"], "r1");
	assert_eq!(second.data()["id"], "r2");
	assert_eq!(transport.auth_calls(), 1);
	assert_eq!(transport.data_calls(), 2);

	let requests = transport.requests();
	let auth = &requests[0];

	assert_eq!(auth.method, Method::Post);
	assert_eq!(auth.url.as_str(), format!("{BASE_URL}/auth"));
	assert_eq!(auth.header("authorization"), None);
	assert_eq!(auth.header("x-concierge-id"), None);
	assert_eq!(
		auth.body.as_deref(),
		Some("client_id=concierge-client&client_secret=concierge-secret")
	);

	let get = &requests[1];

	assert_eq!(get.method, Method::Get);
	assert_eq!(get.url.path(), "/api-ext/2_4/concierge/concierge-42/reservations/r1");
	assert_eq!(get.header("Authorization"), Some("token-1"));
	assert_eq!(get.header("X-Concierge-Id"), Some(CONCIERGE_ID));
	assert_eq!(get.header("Accept"), Some("application/json"));
	assert_eq!(get.body, None);
}

#[tokio::test]
async fn single_rejection_reauthenticates_and_replays_identically() {
	let (engine, transport) = engine(
		ScriptedTransport::new()
			.data(json(401, r#"{"msg":"Token expired"}"#))
			.data(json(200, r#"{"data":{"id":"12345","status":"confirmed"}}"#)),
	);
	let params = Params::new().with("party_size", 2).with("date", "2024-05-16");
	let payload =
		engine.create(&venue("v1"), &params).await.expect("Replayed create should succeed.");

	assert!(payload.is_enveloped());
	assert_eq!(payload.data(), &json!({ "id": "12345", "status": "confirmed" }));
	assert_eq!(transport.auth_calls(), 2);
	assert_eq!(transport.data_calls(), 2);

	let data = transport.data_requests();

	assert_eq!(data[0].method, Method::Put);
	assert_eq!(data[0].url.path(), "/api-ext/2_4/concierge/concierge-42/venues/v1/book");
	assert_eq!(data[0].method, data[1].method);
	assert_eq!(data[0].url, data[1].url);
	assert_eq!(data[0].body, data[1].body);
	assert_eq!(data[0].body.as_deref(), Some("date=2024-05-16&party_size=2"));
	assert_eq!(data[0].header("Authorization"), Some("token-1"));
	assert_eq!(data[1].header("Authorization"), Some("token-2"));

	engine.get(&reservation("12345")).await.expect_err("Script is exhausted.");

	assert_eq!(transport.auth_calls(), 2, "the refreshed token should stay cached");
	assert_eq!(transport.data_requests()[2].header("Authorization"), Some("token-2"));
}

#[tokio::test]
async fn repeated_rejection_surfaces_unauthorized_without_a_third_attempt() {
	let (engine, transport) = engine(
		ScriptedTransport::new()
			.data(json(401, ""))
			.data(json(401, r#"{"message":"Invalid token"}"#))
			.data(json(200, r#"{"data":{}}"#)),
	);
	let err = engine
		.update(&reservation("r1"), &Params::new().with("party_size", 4))
		.await
		.expect_err("Second rejection should fail the call.");

	match err {
		Error::Api(e) => {
			assert_eq!(e.kind, ApiErrorKind::Unauthorized);
			assert_eq!(e.status, 401);
			assert_eq!(e.message, "Invalid token");
		},
		other => panic!("Unexpected error: {other:?}."),
	}

	assert_eq!(transport.auth_calls(), 2);
	assert_eq!(transport.data_calls(), 2);
}

#[tokio::test]
async fn not_found_is_returned_without_retry() {
	let (engine, transport) =
		engine(ScriptedTransport::new().data(json(404, r#"{"message":"Resource not found"}"#)));
	let err = engine.get(&reservation("123")).await.expect_err("404 should fail the call.");
	let api = err.as_api().expect("404 should surface as an API error.");

	assert_eq!(api.kind, ApiErrorKind::NotFound);
	assert_eq!(api.status, 404);
	assert_eq!(api.message, "Resource not found");
	assert_eq!(transport.auth_calls(), 1);
	assert_eq!(transport.data_calls(), 1);
}

#[tokio::test]
async fn rate_limit_carries_retry_after() {
	let (engine, _) = engine(
		ScriptedTransport::new()
			.data(json(429, r#"{"msg":"Slow down"}"#).with_header("Retry-After", "30")),
	);
	let err = engine.list(None).await.expect_err("429 should fail the call.");
	let api = err.as_api().expect("429 should surface as an API error.");

	assert_eq!(api.kind, ApiErrorKind::RateLimited);
	assert!(api.is_retryable());
	assert_eq!(api.retry_after.map(|delay| delay.whole_seconds()), Some(30));
}

#[tokio::test]
async fn cancel_without_params_sends_an_empty_form_body() {
	let (engine, transport) = engine(ScriptedTransport::new().data(json(200, "")));
	let payload =
		engine.cancel(&reservation("r1"), None).await.expect("Cancel should succeed.");

	assert_eq!(payload.data(), &serde_json::Value::Null);

	let cancel = &transport.data_requests()[0];

	assert_eq!(cancel.method, Method::Delete);
	assert_eq!(cancel.body.as_deref(), Some(""));
	assert_eq!(cancel.header("content-type"), Some("application/x-www-form-urlencoded"));
}

#[tokio::test]
async fn reads_send_parameters_as_a_query_string() {
	let (engine, transport) = engine(
		ScriptedTransport::new()
			.data(json(200, r#"{"data":{"availability":[]}}"#))
			.data(json(200, r#"{"data":{"results":[]}}"#)),
	);
	let availability = Params::new().with("date", "2024-05-16").with("party_size", 2);

	engine
		.availability(&venue("v1"), &availability)
		.await
		.expect("Availability should succeed.");
	engine
		.list(Some(&Params::new().with("venue_id", "v1")))
		.await
		.expect("List should succeed.");

	let data = transport.data_requests();

	assert_eq!(data[0].url.path(), "/api-ext/2_4/concierge/concierge-42/venues/v1/availability");
	assert_eq!(data[0].url.query(), Some("date=2024-05-16&party_size=2"));
	assert_eq!(data[0].header("content-type"), None);
	assert_eq!(data[1].url.path(), "/api-ext/2_4/concierge/concierge-42/reservations");
	assert_eq!(data[1].url.query(), Some("venue_id=v1"));
}

#[tokio::test]
async fn request_uses_its_own_path() {
	let (engine, transport) =
		engine(ScriptedTransport::new().data(json(200, r#"{"data":{"id":"w1"}}"#)));

	engine
		.request(&venue("v1"), &Params::new().with("party_size", 6))
		.await
		.expect("Reservation request should succeed.");

	let request = &transport.data_requests()[0];

	assert_eq!(request.method, Method::Put);
	assert_eq!(request.url.path(), "/api-ext/2_4/concierge/concierge-42/venues/v1/request");
	assert_eq!(request.body.as_deref(), Some("party_size=6"));
}

#[tokio::test]
async fn authentication_failures_never_reach_data_endpoints() {
	let cases = [
		json(401, r#"{"msg":"Invalid client credentials"}"#),
		json(200, r#"{"data":{"token_expiration_datetime":"2030-01-01 00:00:00"}}"#),
		json(200, "<html>maintenance</html>"),
	];

	for (index, response) in cases.into_iter().enumerate() {
		let (engine, transport) = engine(ScriptedTransport::new().auth(response));
		let err = engine.get(&reservation("r1")).await.expect_err("Auth failure should fail.");

		match (index, err) {
			(0, Error::Authentication(AuthenticationError::Rejected { status, message })) => {
				assert_eq!(status, 401);
				assert_eq!(message, "Invalid client credentials");
			},
			(1, Error::Authentication(AuthenticationError::MissingToken)) => {},
			(2, Error::Authentication(AuthenticationError::MalformedResponse { .. })) => {},
			(index, other) => panic!("Case {index} produced {other:?}."),
		}

		assert_eq!(transport.data_calls(), 0);
		assert!(engine.token_store().peek().await.is_none());
	}
}

#[tokio::test]
async fn failed_reauthentication_leaves_the_cache_empty() {
	let (engine, transport) = engine(
		ScriptedTransport::new()
			.auth(token("token-1"))
			.auth(json(500, ""))
			.data(json(401, "")),
	);
	let err = engine.get(&reservation("r1")).await.expect_err("Reauth failure should fail.");

	assert!(matches!(
		err,
		Error::Authentication(AuthenticationError::Rejected { status: 500, ref message })
			if message == "Server error"
	));
	assert_eq!(transport.auth_calls(), 2);
	assert_eq!(transport.data_calls(), 1);
	assert!(engine.token_store().peek().await.is_none());
}

#[tokio::test]
async fn transport_and_protocol_failures_are_not_replayed() {
	let (engine, transport) = engine(
		ScriptedTransport::new().network_failure().data(json(200, "<html>not json</html>")),
	);
	let network = engine.get(&reservation("r1")).await.expect_err("Network failure.");

	assert!(matches!(network, Error::Transport(_)));

	let protocol = engine.get(&reservation("r1")).await.expect_err("Malformed body.");

	assert!(matches!(protocol, Error::Protocol(ProtocolError::MalformedBody { status: 200, .. })));
	assert_eq!(transport.auth_calls(), 1);
	assert_eq!(transport.data_calls(), 2);
}

#[tokio::test]
async fn invalidated_token_is_reacquired_on_next_call() {
	let (engine, transport) = engine(
		ScriptedTransport::new()
			.data(json(200, r#"{"data":{}}"#))
			.data(json(200, r#"{"data":{}}"#)),
	);

	engine.list(None).await.expect("First list should succeed.");
	engine.token_store().invalidate().await;
	engine.token_store().invalidate().await;
	engine.list(None).await.expect("Second list should succeed.");

	assert_eq!(transport.auth_calls(), 2);
	assert_eq!(transport.data_requests()[1].header("Authorization"), Some("token-2"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_calls_share_one_authentication() {
	let (engine, transport) = engine(
		ScriptedTransport::new()
			.auth_delay(StdDuration::from_millis(25))
			.respond_with(|_| json(200, r#"{"data":[]}"#)),
	);
	let tasks = (0..8)
		.map(|_| {
			let engine = engine.clone();

			tokio::spawn(async move { engine.list(None).await })
		})
		.collect::<Vec<_>>();

	for task in tasks {
		task.await.expect("Task should join.").expect("Concurrent list should succeed.");
	}

	assert_eq!(transport.auth_calls(), 1);
	assert_eq!(transport.data_calls(), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_rejections_share_one_reauthentication() {
	let (engine, transport) = engine(ScriptedTransport::new().respond_with(|request| {
		if request.header("Authorization") == Some("token-1") {
			json(401, "")
		} else {
			json(200, r#"{"data":{"ok":true}}"#)
		}
	}));

	engine.token_store().current_token().await.expect("Priming should succeed.");

	let tasks = (0..6)
		.map(|i| {
			let engine = engine.clone();

			tokio::spawn(async move { engine.get(&reservation(&format!("r{i}"))).await })
		})
		.collect::<Vec<_>>();

	for task in tasks {
		let payload = task.await.expect("Task should join.").expect("Replay should succeed.");

		assert_eq!(payload.data()["ok"], true);
	}

	assert_eq!(transport.auth_calls(), 2);
}

#[tokio::test]
async fn batches_collect_api_errors_per_item() {
	let (engine, transport) = engine(
		ScriptedTransport::new()
			.data(json(200, r#"{"data":{"id":"a"}}"#))
			.data(json(404, r#"{"msg":"gone"}"#))
			.data(json(422, r#"{"msg":"bad"}"#)),
	);
	let results = engine
		.get_batch([reservation("a"), reservation("b"), reservation("c")])
		.await
		.expect("Batch should complete.");

	assert_eq!(results.len(), 3);
	assert_eq!(results[0].as_ref().map(|p| p.data()["id"].clone()), Ok(json!("a")));
	assert_eq!(results[1].as_ref().map_err(|e| e.kind), Err(ApiErrorKind::NotFound));
	assert_eq!(results[2].as_ref().map_err(|e| e.message.as_str()), Err("bad"));
	assert_eq!(transport.data_calls(), 3);
}

#[tokio::test]
async fn batch_items_each_get_a_replay() {
	let (engine, transport) = engine(
		ScriptedTransport::new()
			.data(json(401, ""))
			.data(json(200, r#"{"data":{"cancelled":true}}"#))
			.data(json(200, r#"{"data":{"cancelled":true}}"#)),
	);
	let results = engine
		.cancel_batch([
			(reservation("a"), None),
			(reservation("b"), Some(Params::new().with("reason", "guest request"))),
		])
		.await
		.expect("Batch should complete.");

	assert!(results.iter().all(Result::is_ok));
	assert_eq!(transport.auth_calls(), 2);
	assert_eq!(transport.data_requests()[2].body.as_deref(), Some("reason=guest+request"));
}

#[tokio::test]
async fn batch_aborts_on_authentication_failure() {
	let (engine, transport) = engine(ScriptedTransport::new().auth(json(403, "")));
	let err = engine
		.create_batch([(venue("v1"), Params::new()), (venue("v2"), Params::new())])
		.await
		.expect_err("Auth failure should abort the batch.");

	assert!(matches!(
		err,
		Error::Authentication(AuthenticationError::Rejected { status: 403, .. })
	));
	assert_eq!(transport.data_calls(), 0);
}

#[tokio::test]
async fn engine_debug_output_hides_credentials_and_tokens() {
	let (engine, _) = engine(ScriptedTransport::new().data(json(200, "{}")));
	let token = engine.token_store().current_token().await.expect("Token should be issued.");
	let rendered = format!("{engine:?} {token:?}");

	assert!(rendered.contains(CONCIERGE_ID));
	assert!(!rendered.contains(CLIENT_SECRET));
	assert!(!rendered.contains("token-1"));
}
