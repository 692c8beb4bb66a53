use geofront_backend::SearchBody;
use geofront_domain::place::PlaceRecord;

use crate::{
	GeofrontService, Result, backend_error,
	geojson::FeatureCollection,
	query::ReverseQuery,
	request::{QueryParams, ReverseRequest},
};

pub struct ReverseOutcome {
	pub results: Vec<PlaceRecord>,
	pub query: ReverseQuery,
}

impl GeofrontService {
	pub async fn reverse(
		&self,
		params: &QueryParams,
		accept_language: Option<&str>,
	) -> Result<FeatureCollection> {
		let request = ReverseRequest::from_params(params, accept_language, &self.cfg.languages)?;
		let outcome = self.execute_reverse(&request).await?;
		let debug = request.debug.then(|| outcome.query.debug_string());
		let mut results = outcome.results;

		results.truncate(request.limit);

		Ok(FeatureCollection::from_results(&results, &request.language, false).with_debug(debug))
	}

	/// A single backend call. A radius search has no lenient variant.
	pub async fn execute_reverse(&self, request: &ReverseRequest) -> Result<ReverseOutcome> {
		let query = ReverseQuery::build(request);
		let body = SearchBody {
			query: query.to_value(),
			size: request.limit,
			sort: query.sort(),
			timeout: self.backend_timeout(),
		};
		let results =
			self.backend.search(&body).await.map_err(|err| backend_error("reverse", err))?;

		tracing::debug!(
			radius_km = request.radius_km,
			hits = results.len(),
			"Reverse query dispatched."
		);

		Ok(ReverseOutcome { results, query })
	}
}
