use geofront_backend::SearchBody;
use geofront_domain::place::PlaceRecord;

use crate::{
	GeofrontService, Result, backend_error, dedupe,
	geojson::FeatureCollection,
	query::{SearchQuery, Strictness},
	request::{QueryParams, SearchRequest},
};

/// Hits of one forward search together with the query variant that produced them.
pub struct SearchOutcome {
	pub results: Vec<PlaceRecord>,
	pub strictness: Strictness,
	pub query: SearchQuery,
}

/// Number of hits requested from the backend for `limit` results. Over-fetching leaves room
/// for street de-duplication.
pub fn fetch_size(limit: usize) -> usize {
	if limit > 1 { ((limit as f64) * 1.5).round().max(1.0) as usize } else { 1 }
}

impl GeofrontService {
	pub async fn search(
		&self,
		params: &QueryParams,
		accept_language: Option<&str>,
	) -> Result<FeatureCollection> {
		let request = SearchRequest::from_params(params, accept_language, &self.cfg.languages)?;

		tracing::debug!(
			query = %request.query,
			language = %request.language,
			limit = request.limit,
			"Search request normalized."
		);

		let outcome = self.execute_search(&request).await?;
		let debug = request.debug.then(|| outcome.query.debug_string());
		let results = dedupe::finalize(outcome.results, &request.language, request.limit);

		Ok(FeatureCollection::from_results(&results, &request.language, request.debug)
			.with_debug(debug))
	}

	/// Runs the strict query and, when it finds nothing, the lenient one. Never more than two
	/// backend calls.
	pub async fn execute_search(&self, request: &SearchRequest) -> Result<SearchOutcome> {
		let size = fetch_size(request.limit);
		let supported = &self.cfg.languages.supported;
		let strict = SearchQuery::build(request, Strictness::Strict, supported);
		let results = self.dispatch(&strict, size).await?;

		if !results.is_empty() {
			return Ok(SearchOutcome { results, strictness: Strictness::Strict, query: strict });
		}

		tracing::info!(query = %request.query, "No strict hits. Retrying with the lenient query.");

		let lenient = SearchQuery::build(request, Strictness::Lenient, supported);
		let results = self.dispatch(&lenient, size).await?;

		Ok(SearchOutcome { results, strictness: Strictness::Lenient, query: lenient })
	}

	async fn dispatch(&self, query: &SearchQuery, size: usize) -> Result<Vec<PlaceRecord>> {
		let timeout = self.backend_timeout();
		let body = SearchBody { query: query.to_value(), size, sort: None, timeout };
		let results =
			self.backend.search(&body).await.map_err(|err| backend_error("search", err))?;

		tracing::debug!(
			strictness = query.strictness().as_str(),
			size,
			hits = results.len(),
			"Search query dispatched."
		);

		Ok(results)
	}
}
