pub mod fixtures;

use std::{
	collections::VecDeque,
	env,
	sync::{
		Mutex,
		atomic::{AtomicUsize, Ordering},
	},
};

use ahash::AHashMap;

use geofront_backend::{
	BoxFuture, ClusterHealth, Error, Result, SearchBackend, SearchBody, place::ElasticPlace,
};
use geofront_config::{Backend, Config, Languages, Service};
use geofront_domain::place::{PlaceRecord, PlaceResult};

/// Scripted answer for one search call.
#[derive(Debug, Clone)]
pub enum SearchReply {
	Hits(Vec<ElasticPlace>),
	Fail,
}

/// In-memory [`SearchBackend`] that answers search calls from a script and records every
/// body it receives. Calls past the end of the script return no hits.
#[derive(Default)]
pub struct SpyBackend {
	replies: Mutex<VecDeque<SearchReply>>,
	documents: AHashMap<String, ElasticPlace>,
	health: Option<ClusterHealth>,
	bodies: Mutex<Vec<SearchBody>>,
	search_calls: AtomicUsize,
	get_calls: AtomicUsize,
}
impl SpyBackend {
	pub fn new() -> Self {
		Self { health: Some(ClusterHealth::Green), ..Default::default() }
	}

	pub fn with_reply(self, reply: SearchReply) -> Self {
		self.replies.lock().unwrap_or_else(|err| err.into_inner()).push_back(reply);

		self
	}

	pub fn with_hits(self, hits: Vec<ElasticPlace>) -> Self {
		self.with_reply(SearchReply::Hits(hits))
	}

	pub fn with_document(mut self, place: ElasticPlace) -> Self {
		self.documents.insert(place.id().to_string(), place);

		self
	}

	/// `None` makes health checks fail as if the backend were unreachable.
	pub fn with_health(mut self, health: Option<ClusterHealth>) -> Self {
		self.health = health;

		self
	}

	pub fn search_calls(&self) -> usize {
		self.search_calls.load(Ordering::SeqCst)
	}

	pub fn get_calls(&self) -> usize {
		self.get_calls.load(Ordering::SeqCst)
	}

	pub fn bodies(&self) -> Vec<SearchBody> {
		self.bodies.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}
}
impl SearchBackend for SpyBackend {
	fn search<'a>(&'a self, body: &'a SearchBody) -> BoxFuture<'a, Result<Vec<PlaceRecord>>> {
		self.search_calls.fetch_add(1, Ordering::SeqCst);
		self.bodies.lock().unwrap_or_else(|err| err.into_inner()).push(body.clone());

		let reply = self.replies.lock().unwrap_or_else(|err| err.into_inner()).pop_front();

		Box::pin(async move {
			match reply {
				Some(SearchReply::Hits(hits)) =>
					Ok(hits.into_iter().map(|place| Box::new(place) as PlaceRecord).collect()),
				Some(SearchReply::Fail) => Err(Error::Status { operation: "search", status: 500 }),
				None => Ok(Vec::new()),
			}
		})
	}

	fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Option<PlaceRecord>>> {
		self.get_calls.fetch_add(1, Ordering::SeqCst);

		let found = self.documents.get(id).cloned();

		Box::pin(async move { Ok(found.map(|place| Box::new(place) as PlaceRecord)) })
	}

	fn health(&self) -> BoxFuture<'_, Result<ClusterHealth>> {
		let health = self.health;

		Box::pin(async move {
			health.ok_or(Error::Status { operation: "health", status: 503 })
		})
	}
}

/// Backend URL of a live Elasticsearch place index, for `#[ignore]`d tests.
pub fn env_es_url() -> Option<String> {
	env::var("GEOFRONT_ES_URL").ok()
}

pub fn test_config(backend_url: &str) -> Config {
	Config {
		service: Service { http_bind: "127.0.0.1:0".to_string(), log_level: "info".to_string() },
		backend: Backend {
			url: backend_url.to_string(),
			index: "photon".to_string(),
			api_key: None,
			timeout_ms: 7_000,
		},
		languages: Languages::default(),
	}
}
