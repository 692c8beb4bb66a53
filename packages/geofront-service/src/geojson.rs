//! GeoJSON rendering of result lists.

use serde::Serialize;

use geofront_domain::place::{LocalizedField, PlaceRecord, PlaceResult};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureCollection {
	#[serde(rename = "type")]
	pub kind: &'static str,
	pub features: Vec<Feature>,
	/// Rendered backend query, present only for debug requests.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub debug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Feature {
	#[serde(rename = "type")]
	pub kind: &'static str,
	pub geometry: Geometry,
	pub properties: Properties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Geometry {
	#[serde(rename = "type")]
	pub kind: &'static str,
	/// `[lon, lat]`.
	pub coordinates: [f64; 2],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Properties {
	#[serde(skip_serializing_if = "Option::is_none")]
	pub osm_type: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub osm_id: Option<i64>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub osm_key: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub osm_value: Option<String>,
	#[serde(rename = "type", skip_serializing_if = "Option::is_none")]
	pub object_type: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub postcode: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub housenumber: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub countrycode: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub street: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub locality: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub district: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub city: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub county: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub state: Option<String>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub country: Option<String>,
	/// `[min_lon, max_lat, max_lon, min_lat]`.
	#[serde(skip_serializing_if = "Option::is_none")]
	pub extent: Option<[f64; 4]>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub importance: Option<f64>,
}

impl FeatureCollection {
	/// Renders `results` in order, with localized fields in `language`.
	pub fn from_results(results: &[PlaceRecord], language: &str, with_importance: bool) -> Self {
		let features = results
			.iter()
			.filter_map(|place| Feature::from_place(&**place, language, with_importance))
			.collect();

		Self { kind: "FeatureCollection", features, debug: None }
	}

	/// Attaches the rendered query of a debug request.
	pub fn with_debug(mut self, debug: Option<String>) -> Self {
		self.debug = debug;

		self
	}

	pub fn empty() -> Self {
		Self { kind: "FeatureCollection", features: Vec::new(), debug: None }
	}
}

impl Feature {
	/// `None` for a place without a coordinate.
	pub fn from_place(
		place: &dyn PlaceResult,
		language: &str,
		with_importance: bool,
	) -> Option<Self> {
		let Some(coordinate) = place.coordinate() else {
			tracing::warn!(place_id = place.id(), "Skipping result without a coordinate.");

			return None;
		};
		let classification = place.classification();
		let localized = |field| place.localized(field, language).map(str::to_string);
		let properties = Properties {
			osm_type: place.osm_type().map(str::to_string),
			osm_id: place.osm_id(),
			osm_key: classification.map(|class| class.key.to_string()),
			osm_value: classification.map(|class| class.value.to_string()),
			object_type: place.object_type().map(str::to_string),
			postcode: place.postcode().map(str::to_string),
			housenumber: place.housenumber().map(str::to_string),
			countrycode: place.country_code().map(str::to_string),
			name: localized(LocalizedField::Name),
			street: localized(LocalizedField::Street),
			locality: localized(LocalizedField::Locality),
			district: localized(LocalizedField::District),
			city: localized(LocalizedField::City),
			county: localized(LocalizedField::County),
			state: localized(LocalizedField::State),
			country: localized(LocalizedField::Country),
			extent: place.extent(),
			importance: if with_importance { place.importance() } else { None },
		};

		Some(Self {
			kind: "Feature",
			geometry: Geometry { kind: "Point", coordinates: [coordinate.lon, coordinate.lat] },
			properties,
		})
	}
}

#[cfg(test)]
mod tests {
	use geofront_testkit::fixtures::PlaceFixture;

	use super::*;

	fn record(fixture: PlaceFixture) -> PlaceRecord {
		Box::new(fixture.build())
	}

	#[test]
	fn empty_list_renders_an_empty_collection() {
		let rendered = serde_json::to_value(FeatureCollection::from_results(&[], "en", false))
			.expect("serializable");

		assert_eq!(rendered, serde_json::json!({ "type": "FeatureCollection", "features": [] }));
		assert_eq!(FeatureCollection::empty(), FeatureCollection::from_results(&[], "de", false));
	}

	#[test]
	fn feature_carries_localized_properties() {
		let place = PlaceFixture::new("1")
			.name("default", "Berlin")
			.name("de", "Berlin")
			.name("fr", "Berlin (ville)")
			.localized(LocalizedField::Country, "default", "Deutschland")
			.localized(LocalizedField::Country, "fr", "Allemagne")
			.classification("place", "city")
			.object_type("city")
			.osm("R", 62422)
			.field("countrycode", "DE")
			.field("importance", 0.8);
		let rendered = serde_json::to_value(FeatureCollection::from_results(
			&[record(place)],
			"fr",
			false,
		))
		.expect("serializable");

		assert_eq!(
			rendered["features"][0],
			serde_json::json!({
				"type": "Feature",
				"geometry": { "type": "Point", "coordinates": [13.4, 52.5] },
				"properties": {
					"osm_type": "R",
					"osm_id": 62422,
					"osm_key": "place",
					"osm_value": "city",
					"type": "city",
					"countrycode": "DE",
					"name": "Berlin (ville)",
					"country": "Allemagne"
				}
			})
		);
	}

	#[test]
	fn debug_adds_query_and_importance() {
		let place = PlaceFixture::new("1").name("default", "Berlin").field("importance", 0.8);
		let collection = FeatureCollection::from_results(&[record(place)], "en", true)
			.with_debug(Some("{}".to_string()));
		let rendered = serde_json::to_value(&collection).expect("serializable");

		assert_eq!(rendered["debug"], "{}");
		assert_eq!(rendered["features"][0]["properties"]["importance"], 0.8);
	}

	#[test]
	fn places_without_coordinate_are_skipped() {
		let results = [
			record(PlaceFixture::new("1").name("default", "Nowhere").without_coordinate()),
			record(PlaceFixture::new("2").name("default", "Somewhere")),
		];
		let collection = FeatureCollection::from_results(&results, "en", false);

		assert_eq!(collection.features.len(), 1);
		assert_eq!(collection.features[0].properties.name.as_deref(), Some("Somewhere"));
	}
}
