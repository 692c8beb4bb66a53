use crate::{
	GeofrontService, Result, backend_error,
	geojson::FeatureCollection,
	request::{LookupRequest, QueryParams},
};

impl GeofrontService {
	/// An unknown id renders as an empty collection.
	pub async fn lookup(
		&self,
		params: &QueryParams,
		accept_language: Option<&str>,
	) -> Result<FeatureCollection> {
		let request = LookupRequest::from_params(params, accept_language, &self.cfg.languages)?;
		let found = self
			.backend
			.get(&request.place_id)
			.await
			.map_err(|err| backend_error("lookup", err))?;
		let results: Vec<_> = found.into_iter().collect();

		if results.is_empty() {
			tracing::debug!(place_id = %request.place_id, "Lookup found no place.");
		}

		Ok(FeatureCollection::from_results(&results, &request.language, false))
	}
}
