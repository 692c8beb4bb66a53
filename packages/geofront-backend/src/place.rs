use serde::Deserialize;
use serde_json::{Map, Value};

use geofront_config::DEFAULT_LANGUAGE_ALIAS;
use geofront_domain::{
	geo::Coordinate,
	place::{Classification, LocalizedField, PlaceResult},
};

use crate::{Error, Result};

/// A place document as stored in the Elasticsearch index.
#[derive(Debug, Clone, PartialEq)]
pub struct ElasticPlace {
	id: String,
	score: Option<f64>,
	source: Map<String, Value>,
}
impl ElasticPlace {
	pub fn new(id: impl Into<String>, source: Map<String, Value>) -> Self {
		Self { id: id.into(), score: None, source }
	}

	pub fn with_score(mut self, score: Option<f64>) -> Self {
		self.score = score;

		self
	}

	pub fn score(&self) -> Option<f64> {
		self.score
	}

	pub fn source(&self) -> &Map<String, Value> {
		&self.source
	}

	fn str_field(&self, key: &str) -> Option<&str> {
		self.source.get(key).and_then(Value::as_str)
	}

	fn int_field(&self, key: &str) -> Option<i64> {
		match self.source.get(key)? {
			Value::Number(number) => number.as_i64(),
			Value::String(raw) => raw.parse().ok(),
			_ => None,
		}
	}
}
impl PlaceResult for ElasticPlace {
	fn id(&self) -> &str {
		&self.id
	}

	fn localized(&self, field: LocalizedField, language: &str) -> Option<&str> {
		let map = self.source.get(field.as_str())?.as_object()?;

		map.get(language)
			.and_then(Value::as_str)
			.or_else(|| map.get(DEFAULT_LANGUAGE_ALIAS).and_then(Value::as_str))
	}

	fn coordinate(&self) -> Option<Coordinate> {
		let coordinate = self.source.get("coordinate")?;
		let lon = coordinate.get("lon").and_then(Value::as_f64)?;
		let lat = coordinate.get("lat").and_then(Value::as_f64)?;

		Some(Coordinate::new(lon, lat))
	}

	fn classification(&self) -> Option<Classification<'_>> {
		let key = self.str_field("osm_key")?;
		let value = self.str_field("osm_value")?;

		Some(Classification { key, value })
	}

	fn object_type(&self) -> Option<&str> {
		self.str_field("type")
	}

	fn postcode(&self) -> Option<&str> {
		self.str_field("postcode")
	}

	fn housenumber(&self) -> Option<&str> {
		self.str_field("housenumber")
	}

	fn country_code(&self) -> Option<&str> {
		self.str_field("countrycode")
	}

	fn osm_id(&self) -> Option<i64> {
		self.int_field("osm_id")
	}

	fn osm_type(&self) -> Option<&str> {
		self.str_field("osm_type")
	}

	fn importance(&self) -> Option<f64> {
		self.source.get("importance").and_then(Value::as_f64)
	}

	fn parent_place_id(&self) -> Option<i64> {
		self.int_field("parent_place_id")
	}

	fn rank_address(&self) -> Option<i64> {
		self.int_field("rank_address")
	}

	fn extent(&self) -> Option<[f64; 4]> {
		// Stored as an envelope: [[min_lon, max_lat], [max_lon, min_lat]].
		let corners = self.source.get("extent")?.get("coordinates")?.as_array()?;
		let [top_left, bottom_right] = corners.as_slice() else {
			return None;
		};
		let corner = |value: &Value, index: usize| value.get(index).and_then(Value::as_f64);

		Some([
			corner(top_left, 0)?,
			corner(top_left, 1)?,
			corner(bottom_right, 0)?,
			corner(bottom_right, 1)?,
		])
	}
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
	#[serde(default)]
	timed_out: bool,
	hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
	#[serde(default)]
	hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
	#[serde(rename = "_id")]
	id: String,
	#[serde(rename = "_score")]
	score: Option<f64>,
	#[serde(rename = "_source", default)]
	source: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct GetResponse {
	#[serde(rename = "_id")]
	id: String,
	found: bool,
	#[serde(rename = "_source")]
	source: Option<Map<String, Value>>,
}

pub fn parse_search_response(json: Value) -> Result<Vec<ElasticPlace>> {
	let response: SearchResponse = serde_json::from_value(json)?;

	// A timed-out search may carry partial hits, which are never returned.
	if response.timed_out {
		return Err(Error::TimedOut { operation: "search" });
	}

	Ok(response
		.hits
		.hits
		.into_iter()
		.map(|hit| ElasticPlace::new(hit.id, hit.source).with_score(hit.score))
		.collect())
}

pub fn parse_get_response(json: Value) -> Result<Option<ElasticPlace>> {
	let response: GetResponse = serde_json::from_value(json)?;

	if !response.found {
		return Ok(None);
	}

	let source = response.source.ok_or_else(|| Error::InvalidResponse {
		message: format!("Document {} was found without a _source.", response.id),
	})?;

	Ok(Some(ElasticPlace::new(response.id, source)))
}

#[cfg(test)]
mod tests {
	use super::*;

	fn berlin() -> ElasticPlace {
		let source = serde_json::json!({
			"osm_id": 240109189,
			"osm_type": "N",
			"osm_key": "place",
			"osm_value": "city",
			"type": "city",
			"importance": 0.82,
			"parent_place_id": "0",
			"coordinate": { "lat": 52.5170365, "lon": 13.3888599 },
			"extent": { "type": "envelope", "coordinates": [[13.08, 52.67], [13.76, 52.33]] },
			"name": { "default": "Berlin", "ru": "Берлин" },
			"country": { "default": "Deutschland", "en": "Germany" },
			"countrycode": "DE"
		});

		ElasticPlace::new("1", source.as_object().cloned().unwrap_or_default())
	}

	#[test]
	fn localized_fields_fall_back_to_default() {
		let place = berlin();

		assert_eq!(place.localized(LocalizedField::Name, "ru"), Some("Берлин"));
		assert_eq!(place.localized(LocalizedField::Name, "de"), Some("Berlin"));
		assert_eq!(place.localized(LocalizedField::Country, "en"), Some("Germany"));
		assert_eq!(place.localized(LocalizedField::Country, "fr"), Some("Deutschland"));
		assert_eq!(place.localized(LocalizedField::Street, "en"), None);
	}

	#[test]
	fn typed_accessors_read_the_document() {
		let place = berlin();

		assert_eq!(place.coordinate(), Some(Coordinate::new(13.3888599, 52.5170365)));
		assert_eq!(place.classification(), Some(Classification { key: "place", value: "city" }));
		assert_eq!(place.osm_id(), Some(240109189));
		assert_eq!(place.parent_place_id(), Some(0));
		assert_eq!(place.rank_address(), None);
		assert_eq!(place.extent(), Some([13.08, 52.67, 13.76, 52.33]));
		assert!(!place.is_street());
	}

	#[test]
	fn search_response_keeps_rank_order() {
		let json = serde_json::json!({
			"timed_out": false,
			"hits": { "hits": [
				{ "_id": "b", "_score": 3.0, "_source": { "osm_key": "highway" } },
				{ "_id": "a", "_score": 1.0, "_source": {} }
			] }
		});
		let places = parse_search_response(json).expect("parse failed");
		let ids: Vec<_> = places.iter().map(|place| place.id().to_string()).collect();

		assert_eq!(ids, vec!["b", "a"]);
		assert_eq!(places[0].score(), Some(3.0));
	}

	#[test]
	fn timed_out_search_is_an_error() {
		let json = serde_json::json!({ "timed_out": true, "hits": { "hits": [] } });

		assert!(matches!(parse_search_response(json), Err(Error::TimedOut { .. })));
	}

	#[test]
	fn missing_document_is_none() {
		let json = serde_json::json!({ "_id": "42", "found": false });

		assert_eq!(parse_get_response(json).expect("parse failed"), None);
	}
}
