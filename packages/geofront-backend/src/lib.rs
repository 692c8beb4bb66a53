pub mod elastic;
pub mod place;

mod error;

pub use error::Error;

use std::{fmt, future::Future, pin::Pin, time::Duration};

use serde_json::Value;

use geofront_domain::place::PlaceRecord;

pub type Result<T, E = Error> = std::result::Result<T, E>;

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One backend search call: a rendered query tree plus paging and sort.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchBody {
	pub query: Value,
	pub size: usize,
	pub sort: Option<Value>,
	pub timeout: Duration,
}
impl SearchBody {
	pub fn to_value(&self) -> Value {
		let mut body = serde_json::json!({
			"query": self.query,
			"size": self.size,
			"timeout": format!("{}ms", self.timeout.as_millis()),
		});

		if let (Some(sort), Some(map)) = (&self.sort, body.as_object_mut()) {
			map.insert("sort".to_string(), sort.clone());
		}

		body
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterHealth {
	Green,
	Yellow,
	Red,
}
impl ClusterHealth {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Green => "green",
			Self::Yellow => "yellow",
			Self::Red => "red",
		}
	}

	pub fn parse(raw: &str) -> Option<Self> {
		match raw {
			"green" => Some(Self::Green),
			"yellow" => Some(Self::Yellow),
			"red" => Some(Self::Red),
			_ => None,
		}
	}
}
impl fmt::Display for ClusterHealth {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// The document store the pipeline queries. Hits come back in backend rank order.
pub trait SearchBackend
where
	Self: Send + Sync,
{
	fn search<'a>(&'a self, body: &'a SearchBody) -> BoxFuture<'a, Result<Vec<PlaceRecord>>>;

	fn get<'a>(&'a self, id: &'a str) -> BoxFuture<'a, Result<Option<PlaceRecord>>>;

	fn health(&self) -> BoxFuture<'_, Result<ClusterHealth>>;
}
