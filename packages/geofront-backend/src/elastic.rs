use std::time::Duration;

use reqwest::{
	Client, StatusCode, Url,
	header::{AUTHORIZATION, HeaderMap, HeaderValue},
};
use serde_json::Value;

use geofront_domain::place::PlaceRecord;

use crate::{
	BoxFuture, ClusterHealth, Error, Result, SearchBackend, SearchBody,
	place::{self, ElasticPlace},
};

/// Elasticsearch-compatible HTTP backend for one place index.
pub struct ElasticClient {
	client: Client,
	url: String,
	index: String,
}
impl ElasticClient {
	pub fn new(cfg: &geofront_config::Backend) -> Result<Self> {
		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(auth_headers(cfg.api_key.as_deref())?)
			.build()?;

		Ok(Self { client, url: cfg.url.clone(), index: cfg.index.clone() })
	}

	pub async fn search_places(&self, body: &SearchBody) -> Result<Vec<ElasticPlace>> {
		let url = self.endpoint(&[self.index.as_str(), "_search"])?;
		let res = self.client.post(url).json(&body.to_value()).send().await?;

		if !res.status().is_success() {
			return Err(Error::Status { operation: "search", status: res.status().as_u16() });
		}

		let json: Value = res.json().await?;
		let places = place::parse_search_response(json)?;

		tracing::debug!(
			index = %self.index,
			size = body.size,
			hits = places.len(),
			"Backend search finished."
		);

		Ok(places)
	}

	pub async fn get_place(&self, id: &str) -> Result<Option<ElasticPlace>> {
		let res = self.client.get(self.endpoint(&[self.index.as_str(), "_doc", id])?).send().await?;

		// A missing document answers 404 with `found: false`.
		if res.status() == StatusCode::NOT_FOUND {
			return Ok(None);
		}
		if !res.status().is_success() {
			return Err(Error::Status { operation: "get", status: res.status().as_u16() });
		}

		place::parse_get_response(res.json().await?)
	}

	/// Appends `segments` to the base URL, each escaped as one path segment.
	fn endpoint(&self, segments: &[&str]) -> Result<Url> {
		let invalid = || Error::InvalidUrl { url: self.url.clone() };
		let mut url = Url::parse(&self.url).map_err(|_| invalid())?;

		url.path_segments_mut().map_err(|_| invalid())?.pop_if_empty().extend(segments);

		Ok(url)
	}

	pub async fn cluster_health(&self) -> Result<ClusterHealth> {
		let url = self.endpoint(&["_cluster", "health"])?;
		let json: Value = self.client.get(url).send().await?.error_for_status()?.json().await?;
		let status = json.get("status").and_then(Value::as_str).ok_or_else(|| {
			Error::InvalidResponse {
				message: "Cluster health response is missing status.".to_string(),
			}
		})?;

		ClusterHealth::parse(status).ok_or_else(|| Error::InvalidResponse {
			message: format!("Unknown cluster health status '{status}'."),
		})
	}
}
impl SearchBackend for ElasticClient {
	fn search<'a>(&'a self, body: &'a SearchBody) -> BoxFuture<'a, Result<Vec<PlaceRecord>>> {
		Box::pin(async move {
			let places = self.search_places(body).await?;

			Ok(places.into_iter().map(|place| Box::new(place) as PlaceRecord).collect())
		})
	}

	fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Option<PlaceRecord>>> {
		Box::pin(async move {
			Ok(self.get_place(id).await?.map(|place| Box::new(place) as PlaceRecord))
		})
	}

	fn health(&self) -> BoxFuture<'_, Result<ClusterHealth>> {
		Box::pin(self.cluster_health())
	}
}

pub fn auth_headers(api_key: Option<&str>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(api_key) = api_key {
		let mut value = HeaderValue::from_str(&format!("ApiKey {api_key}"))?;

		value.set_sensitive(true);
		headers.insert(AUTHORIZATION, value);
	}

	Ok(headers)
}
