use std::sync::Arc;

use geofront_backend::{SearchBackend, elastic::ElasticClient};
use geofront_config::Config;
use geofront_service::GeofrontService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<GeofrontService>,
}
impl AppState {
	pub fn new(config: Config) -> color_eyre::Result<Self> {
		let backend = ElasticClient::new(&config.backend)?;

		Ok(Self::with_backend(config, Arc::new(backend)))
	}

	pub fn with_backend(config: Config, backend: Arc<dyn SearchBackend>) -> Self {
		Self { service: Arc::new(GeofrontService::new(config, backend)) }
	}
}
