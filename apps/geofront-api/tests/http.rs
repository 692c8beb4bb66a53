use std::sync::Arc;

use axum::{
	Router,
	body::{self, Body},
	http::{Request, StatusCode},
};
use serde_json::Value;
use tower::util::ServiceExt;

use geofront_api::{routes, state::AppState};
use geofront_backend::ClusterHealth;
use geofront_testkit::{
	SearchReply, SpyBackend,
	fixtures::{self, PlaceFixture},
};

fn app(backend: &Arc<SpyBackend>) -> Router {
	let config = geofront_testkit::test_config("http://127.0.0.1:9200");

	routes::router(AppState::with_backend(config, backend.clone()))
}

async fn get(app: Router, uri: &str, accept_language: Option<&str>) -> (StatusCode, Value) {
	let mut request = Request::builder().uri(uri);

	if let Some(accept_language) = accept_language {
		request = request.header("Accept-Language", accept_language);
	}

	let response = app
		.oneshot(request.body(Body::empty()).expect("Failed to build request."))
		.await
		.expect("Failed to call the router.");
	let status = response.status();
	let body = body::to_bytes(response.into_body(), usize::MAX)
		.await
		.expect("Failed to read response body.");
	let json: Value = serde_json::from_slice(&body).expect("Failed to parse response.");

	(status, json)
}

fn feature_names(json: &Value) -> Vec<String> {
	json["features"]
		.as_array()
		.map(|features| {
			features
				.iter()
				.filter_map(|feature| feature["properties"]["name"].as_str())
				.map(str::to_string)
				.collect()
		})
		.unwrap_or_default()
}

fn districts(count: usize) -> Vec<geofront_backend::place::ElasticPlace> {
	(0..count)
		.map(|index| {
			PlaceFixture::new(&index.to_string())
				.name("default", &format!("Berlin {index}"))
				.name("de", &format!("Berlin-{index}"))
				.build()
		})
		.collect()
}

#[tokio::test]
async fn search_returns_a_feature_collection() {
	let backend = Arc::new(SpyBackend::new().with_hits(districts(8)));
	let (status, json) = get(app(&backend), "/api?q=Berlin&lang=de&limit=5", None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json["type"], "FeatureCollection");
	assert_eq!(feature_names(&json), vec![
		"Berlin-0", "Berlin-1", "Berlin-2", "Berlin-3", "Berlin-4"
	]);
	assert_eq!(json["features"][0]["geometry"]["coordinates"], serde_json::json!([13.4, 52.5]));
	assert!(json.get("debug").is_none());
}

#[tokio::test]
async fn trailing_slash_routes_are_served() {
	let backend = Arc::new(SpyBackend::new().with_hits(vec![fixtures::city("1", "Berlin")]));
	let (status, json) = get(app(&backend), "/api/?q=Berlin", None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(feature_names(&json), vec!["Berlin"]);
}

#[tokio::test]
async fn accept_language_picks_localized_names() {
	let place = PlaceFixture::new("1").name("default", "München").name("en", "Munich").build();
	let backend = Arc::new(SpyBackend::new().with_hits(vec![place]));
	let (_, json) = get(app(&backend), "/api?q=Munich", Some("en-US,en;q=0.9")).await;

	assert_eq!(feature_names(&json), vec!["Munich"]);
}

#[tokio::test]
async fn percent_encoded_query_text_is_decoded() {
	let backend = Arc::new(SpyBackend::new());
	let (status, _) = get(app(&backend), "/api?q=Friedrichstra%C3%9Fe", None).await;
	let bodies = backend.bodies();
	let must = &bodies[0].query["function_score"]["query"]["bool"]["must"][0];

	assert_eq!(status, StatusCode::OK);
	assert_eq!(must["multi_match"]["query"], "Friedrichstraße");
}

#[tokio::test]
async fn unknown_parameter_is_a_client_error() {
	let backend = Arc::new(SpyBackend::new());
	let uri = "/reverse?lat=52.5&lon=13.4&radius=1&foo=1";
	let (status, json) = get(app(&backend), uri, None).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(
		json["message"],
		"Unknown query parameter 'foo'. Allowed parameters are: lang, lon, lat, radius, \
		 query_string_filter, distance_sort, limit, layer, osm_tag, debug"
	);
	assert_eq!(backend.search_calls(), 0);
}

#[tokio::test]
async fn missing_query_text_is_a_client_error() {
	let backend = Arc::new(SpyBackend::new());
	let (status, json) = get(app(&backend), "/api", None).await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(json, serde_json::json!({ "message": "Missing search term 'q': /?q=berlin" }));
}

#[tokio::test]
async fn backend_failure_is_a_generic_server_error() {
	let backend = Arc::new(SpyBackend::new().with_reply(SearchReply::Fail));
	let (status, json) = get(app(&backend), "/api?q=Berlin", None).await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(json, serde_json::json!({ "message": "Search backend failed." }));
}

#[tokio::test]
async fn reverse_without_hits_is_an_empty_collection() {
	let backend = Arc::new(SpyBackend::new());
	let (status, json) = get(app(&backend), "/reverse?lon=13.4&lat=52.5&radius=0.2", None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(json, serde_json::json!({ "type": "FeatureCollection", "features": [] }));
	assert_eq!(backend.search_calls(), 1);
}

#[tokio::test]
async fn lookup_finds_documents_by_id() {
	let backend = Arc::new(SpyBackend::new().with_document(fixtures::city("42", "Roma")));
	let (status, found) = get(app(&backend), "/lookup?place_id=42", None).await;
	let (_, missing) = get(app(&backend), "/lookup/?place_id=7", None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(feature_names(&found), vec!["Roma"]);
	assert_eq!(missing["features"], serde_json::json!([]));
}

#[tokio::test]
async fn health_maps_cluster_status() {
	let green = Arc::new(SpyBackend::new());
	let yellow = Arc::new(SpyBackend::new().with_health(Some(ClusterHealth::Yellow)));
	let down = Arc::new(SpyBackend::new().with_health(None));

	assert_eq!(
		get(app(&green), "/health", None).await,
		(StatusCode::OK, serde_json::json!({ "status": "green" }))
	);
	assert_eq!(
		get(app(&yellow), "/health", None).await,
		(StatusCode::SERVICE_UNAVAILABLE, serde_json::json!({ "status": "yellow" }))
	);

	let (status, json) = get(app(&down), "/health", None).await;

	assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
	assert!(json["message"].is_string());
}

#[tokio::test]
#[ignore = "Requires a live photon index. Set GEOFRONT_ES_URL to run."]
async fn live_backend_answers_a_search() {
	let Some(url) = geofront_testkit::env_es_url() else {
		return;
	};
	let state = AppState::new(geofront_testkit::test_config(&url))
		.expect("Failed to initialize app state.");
	let response = routes::router(state)
		.oneshot(
			Request::builder()
				.uri("/api?q=berlin&limit=3")
				.body(Body::empty())
				.expect("Failed to build request."),
		)
		.await
		.expect("Failed to call the router.");

	assert_eq!(response.status(), StatusCode::OK);
}
