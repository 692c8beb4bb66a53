use std::collections::HashSet;

use geofront_domain::place::{LocalizedField, PlaceRecord};

/// Drops street-level results that repeat the name and enclosing area of an earlier street.
///
/// Results lacking a name or an enclosing area are always kept. Order is preserved.
pub fn remove_street_duplicates(results: Vec<PlaceRecord>, language: &str) -> Vec<PlaceRecord> {
	let before = results.len();
	let mut seen = HashSet::new();
	let kept: Vec<PlaceRecord> = results
		.into_iter()
		.filter(|place| {
			if !place.is_street() {
				return true;
			}

			let name = place.localized(LocalizedField::Name, language);

			match (name, place.enclosing_area(language)) {
				(Some(name), Some(area)) => seen.insert((name.to_string(), area.to_string())),
				_ => true,
			}
		})
		.collect();

	if kept.len() < before {
		tracing::debug!(dropped = before - kept.len(), "Removed duplicate street results.");
	}

	kept
}

/// Street de-duplication followed by truncation to `limit`.
pub fn finalize(results: Vec<PlaceRecord>, language: &str, limit: usize) -> Vec<PlaceRecord> {
	let mut results = remove_street_duplicates(results, language);

	results.truncate(limit);

	results
}

#[cfg(test)]
mod tests {
	use geofront_testkit::fixtures::{self, PlaceFixture};

	use super::*;

	fn records(places: Vec<geofront_backend::place::ElasticPlace>) -> Vec<PlaceRecord> {
		places.into_iter().map(|place| Box::new(place) as PlaceRecord).collect()
	}

	fn ids(results: &[PlaceRecord]) -> Vec<&str> {
		results.iter().map(|place| place.id()).collect()
	}

	#[test]
	fn same_street_in_same_locality_collapses_to_first() {
		let results = records(vec![
			fixtures::street("1", "Hauptstraße", "Mitte"),
			fixtures::city("2", "Berlin"),
			fixtures::street("3", "Hauptstraße", "Mitte"),
			fixtures::street("4", "Hauptstraße", "Wedding"),
		]);

		assert_eq!(ids(&remove_street_duplicates(results, "de")), vec!["1", "2", "4"]);
	}

	#[test]
	fn localized_name_is_compared_in_the_request_language() {
		let results = records(vec![
			PlaceFixture::new("1")
				.name("default", "Main Street")
				.name("de", "Hauptstraße")
				.localized(LocalizedField::City, "default", "Berlin")
				.classification("highway", "primary")
				.build(),
			PlaceFixture::new("2")
				.name("default", "Hauptstraße")
				.localized(LocalizedField::City, "default", "Berlin")
				.object_type("street")
				.build(),
		]);

		assert_eq!(ids(&remove_street_duplicates(results, "de")), vec!["1"]);
	}

	#[test]
	fn streets_without_area_are_kept() {
		let unplaced = || {
			PlaceFixture::new("x").name("default", "Ring").classification("highway", "primary")
		};
		let results = records(vec![unplaced().build(), unplaced().build()]);

		assert_eq!(remove_street_duplicates(results, "en").len(), 2);
	}

	#[test]
	fn finalize_truncates_after_dedupe() {
		let results = records(vec![
			fixtures::street("1", "Ring", "Mitte"),
			fixtures::street("2", "Ring", "Mitte"),
			fixtures::city("3", "Berlin"),
			fixtures::city("4", "Bern"),
		]);

		assert_eq!(ids(&finalize(results, "en", 2)), vec!["1", "3"]);
	}
}
