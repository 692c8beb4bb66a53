pub mod dedupe;
pub mod geojson;
pub mod query;
pub mod request;

mod error;
mod lookup;
mod reverse;
mod search;

pub use error::{Error, Result};
pub use geojson::FeatureCollection;
pub use query::{ReverseQuery, SearchQuery, Strictness};
pub use request::{LookupRequest, QueryParams, ReverseRequest, SearchRequest};
pub use reverse::ReverseOutcome;
pub use search::{SearchOutcome, fetch_size};

use std::{sync::Arc, time::Duration};

use geofront_backend::{ClusterHealth, SearchBackend};
use geofront_config::Config;

/// The geocoding pipeline over one backend. Holds no per-request state.
pub struct GeofrontService {
	pub cfg: Config,
	pub backend: Arc<dyn SearchBackend>,
}
impl GeofrontService {
	pub fn new(cfg: Config, backend: Arc<dyn SearchBackend>) -> Self {
		Self { cfg, backend }
	}

	pub async fn health(&self) -> Result<ClusterHealth> {
		self.backend.health().await.map_err(|err| backend_error("health", err))
	}

	fn backend_timeout(&self) -> Duration {
		Duration::from_millis(self.cfg.backend.timeout_ms)
	}
}

pub(crate) fn backend_error(operation: &'static str, err: geofront_backend::Error) -> Error {
	tracing::error!(operation, error = %err, "Backend call failed.");

	Error::from(err)
}
