use std::collections::HashMap;

use geofront_domain::{
	geo::Coordinate,
	place::{Classification, LocalizedField, PlaceResult},
};

#[derive(Default)]
struct StubPlace {
	names: HashMap<(LocalizedField, &'static str), &'static str>,
	osm_key: Option<&'static str>,
	object_type: Option<&'static str>,
}
impl StubPlace {
	fn with(mut self, field: LocalizedField, language: &'static str, value: &'static str) -> Self {
		self.names.insert((field, language), value);

		self
	}
}
impl PlaceResult for StubPlace {
	fn id(&self) -> &str {
		"stub"
	}

	fn localized(&self, field: LocalizedField, language: &str) -> Option<&str> {
		self.names
			.iter()
			.find(|((f, l), _)| *f == field && *l == language)
			.or_else(|| self.names.iter().find(|((f, l), _)| *f == field && *l == "default"))
			.map(|(_, value)| *value)
	}

	fn coordinate(&self) -> Option<Coordinate> {
		None
	}

	fn classification(&self) -> Option<Classification<'_>> {
		self.osm_key.map(|key| Classification { key, value: "residential" })
	}

	fn object_type(&self) -> Option<&str> {
		self.object_type
	}

	fn postcode(&self) -> Option<&str> {
		None
	}

	fn housenumber(&self) -> Option<&str> {
		None
	}

	fn country_code(&self) -> Option<&str> {
		None
	}

	fn osm_id(&self) -> Option<i64> {
		None
	}

	fn osm_type(&self) -> Option<&str> {
		None
	}

	fn importance(&self) -> Option<f64> {
		None
	}

	fn parent_place_id(&self) -> Option<i64> {
		None
	}

	fn rank_address(&self) -> Option<i64> {
		None
	}

	fn extent(&self) -> Option<[f64; 4]> {
		None
	}
}

#[test]
fn street_detection_uses_classification_or_object_type() {
	let highway = StubPlace { osm_key: Some("highway"), ..Default::default() };
	let typed = StubPlace { object_type: Some("street"), ..Default::default() };
	let shop =
		StubPlace { osm_key: Some("shop"), object_type: Some("house"), ..Default::default() };

	assert!(highway.is_street());
	assert!(typed.is_street());
	assert!(!shop.is_street());
}

#[test]
fn enclosing_area_prefers_locality_then_district_then_city() {
	let place = StubPlace::default()
		.with(LocalizedField::City, "default", "Berlin")
		.with(LocalizedField::District, "de", "Mitte");

	assert_eq!(place.enclosing_area("de"), Some("Mitte"));
	assert_eq!(place.enclosing_area("en"), Some("Berlin"));

	let place = place.with(LocalizedField::Locality, "default", "Moabit");

	assert_eq!(place.enclosing_area("en"), Some("Moabit"));
}
