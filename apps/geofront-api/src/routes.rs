use axum::{
	Json, Router,
	extract::{Query, State},
	http::{HeaderMap, StatusCode, header::ACCEPT_LANGUAGE},
	response::{IntoResponse, Response},
	routing::get,
};
use serde::Serialize;

use geofront_backend::ClusterHealth;
use geofront_service::{Error as ServiceError, FeatureCollection, QueryParams};

use crate::state::AppState;

const BACKEND_FAILED: &str = "Search backend failed.";

type Pairs = Query<Vec<(String, String)>>;

pub fn router(state: AppState) -> Router {
	Router::new()
		.route("/api", get(search))
		.route("/api/", get(search))
		.route("/reverse", get(reverse))
		.route("/reverse/", get(reverse))
		.route("/lookup", get(lookup))
		.route("/lookup/", get(lookup))
		.route("/health", get(health))
		.with_state(state)
}

async fn search(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(pairs): Pairs,
) -> Result<Json<FeatureCollection>, ApiError> {
	let params = QueryParams::new(pairs);
	let collection = state.service.search(&params, accept_language(&headers)).await?;

	Ok(Json(collection))
}

async fn reverse(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(pairs): Pairs,
) -> Result<Json<FeatureCollection>, ApiError> {
	let params = QueryParams::new(pairs);
	let collection = state.service.reverse(&params, accept_language(&headers)).await?;

	Ok(Json(collection))
}

async fn lookup(
	State(state): State<AppState>,
	headers: HeaderMap,
	Query(pairs): Pairs,
) -> Result<Json<FeatureCollection>, ApiError> {
	let params = QueryParams::new(pairs);
	let collection = state.service.lookup(&params, accept_language(&headers)).await?;

	Ok(Json(collection))
}

#[derive(Debug, Serialize)]
struct HealthBody {
	status: &'static str,
}

async fn health(State(state): State<AppState>) -> Response {
	match state.service.health().await {
		Ok(status) => {
			let code = match status {
				ClusterHealth::Green => StatusCode::OK,
				ClusterHealth::Yellow | ClusterHealth::Red => StatusCode::SERVICE_UNAVAILABLE,
			};

			(code, Json(HealthBody { status: status.as_str() })).into_response()
		},
		Err(_) =>
			ApiError::new(StatusCode::SERVICE_UNAVAILABLE, "Search backend is unreachable.")
				.into_response(),
	}
}

fn accept_language(headers: &HeaderMap) -> Option<&str> {
	headers.get(ACCEPT_LANGUAGE).and_then(|value| value.to_str().ok())
}

#[derive(Debug, Serialize)]
struct ErrorBody {
	message: String,
}

#[derive(Debug)]
pub struct ApiError {
	status: StatusCode,
	message: String,
}
impl ApiError {
	fn new(status: StatusCode, message: impl Into<String>) -> Self {
		Self { status, message: message.into() }
	}
}

impl From<ServiceError> for ApiError {
	fn from(err: ServiceError) -> Self {
		match err {
			ServiceError::InvalidRequest { message } => Self::new(StatusCode::BAD_REQUEST, message),
			// Details are logged where the backend call fails.
			ServiceError::Backend { .. } =>
				Self::new(StatusCode::INTERNAL_SERVER_ERROR, BACKEND_FAILED),
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		(self.status, Json(ErrorBody { message: self.message })).into_response()
	}
}
