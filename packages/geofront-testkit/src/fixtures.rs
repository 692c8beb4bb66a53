//! Place documents shaped like the photon index.

use serde_json::{Map, Value};

use geofront_backend::place::ElasticPlace;
use geofront_domain::place::LocalizedField;

pub struct PlaceFixture {
	id: String,
	source: Map<String, Value>,
}
impl PlaceFixture {
	pub fn new(id: &str) -> Self {
		Self { id: id.to_string(), source: Map::new() }.coordinate(13.4, 52.5)
	}

	pub fn localized(mut self, field: LocalizedField, language: &str, value: &str) -> Self {
		let entry = self
			.source
			.entry(field.as_str())
			.or_insert_with(|| Value::Object(Map::new()));

		if let Value::Object(map) = entry {
			map.insert(language.to_string(), Value::from(value));
		}

		self
	}

	pub fn name(self, language: &str, value: &str) -> Self {
		self.localized(LocalizedField::Name, language, value)
	}

	pub fn classification(self, key: &str, value: &str) -> Self {
		self.field("osm_key", key).field("osm_value", value)
	}

	pub fn object_type(self, object_type: &str) -> Self {
		self.field("type", object_type)
	}

	pub fn coordinate(self, lon: f64, lat: f64) -> Self {
		self.field("coordinate", serde_json::json!({ "lon": lon, "lat": lat }))
	}

	pub fn without_coordinate(mut self) -> Self {
		self.source.remove("coordinate");

		self
	}

	pub fn osm(self, osm_type: &str, osm_id: i64) -> Self {
		self.field("osm_type", osm_type).field("osm_id", osm_id)
	}

	pub fn field(mut self, key: &str, value: impl Into<Value>) -> Self {
		self.source.insert(key.to_string(), value.into());

		self
	}

	pub fn build(self) -> ElasticPlace {
		ElasticPlace::new(self.id, self.source)
	}
}

pub fn city(id: &str, name: &str) -> ElasticPlace {
	PlaceFixture::new(id)
		.name("default", name)
		.classification("place", "city")
		.object_type("city")
		.build()
}

/// A `highway=residential` street inside `locality`.
pub fn street(id: &str, name: &str, locality: &str) -> ElasticPlace {
	PlaceFixture::new(id)
		.name("default", name)
		.localized(LocalizedField::Locality, "default", locality)
		.classification("highway", "residential")
		.object_type("street")
		.build()
}
