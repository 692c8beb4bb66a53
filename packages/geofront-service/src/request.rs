//! Normalization of raw query-string parameters into typed requests.
//!
//! Text and location parameters fail hard with a client error. Tuning parameters (`limit`,
//! `zoom`) silently fall back to their defaults and are clamped into range.

use std::collections::BTreeSet;

use geofront_config::Languages;
use geofront_domain::{
	geo::{BoundingBox, Coordinate},
	language,
	layer::Layer,
	tag_filter::TagFilter,
};

use crate::{Error, Result};

pub const SEARCH_PARAMETERS: [&str; 11] = [
	"q",
	"lang",
	"limit",
	"osm_tag",
	"layer",
	"location_bias_scale",
	"lon",
	"lat",
	"zoom",
	"bbox",
	"debug",
];
pub const REVERSE_PARAMETERS: [&str; 10] = [
	"lang",
	"lon",
	"lat",
	"radius",
	"query_string_filter",
	"distance_sort",
	"limit",
	"layer",
	"osm_tag",
	"debug",
];
pub const LOOKUP_PARAMETERS: [&str; 2] = ["place_id", "lang"];

pub const MAX_LIMIT: usize = 50;
pub const DEFAULT_SEARCH_LIMIT: usize = 15;
pub const DEFAULT_REVERSE_LIMIT: usize = 1;
pub const DEFAULT_ZOOM: u8 = 14;
pub const MAX_ZOOM: u8 = 18;
pub const MAX_RADIUS_KM: f64 = 5_000.0;

// Clamped to 1.0 like any other value above the range.
const DEFAULT_BIAS_SCALE: f64 = 1.6;

const MISSING_QUERY: &str = "Missing search term 'q': /?q=berlin";
const MISSING_LOCATION: &str = "Missing search term 'lat' and/or 'lon': /?lat=51.5&lon=8.0";
const INVALID_LOCATION: &str = "Invalid parameters 'lat' and 'lon': expected decimal degrees \
	within [-90, 90] and [-180, 180].";

/// Query-string pairs in request order. A name may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams(Vec<(String, String)>);
impl QueryParams {
	pub fn new(pairs: Vec<(String, String)>) -> Self {
		Self(pairs)
	}

	/// First value of `name`, trimmed. Blank values count as absent.
	pub fn get(&self, name: &str) -> Option<&str> {
		self.0
			.iter()
			.find(|(key, _)| key == name)
			.map(|(_, value)| value.trim())
			.filter(|value| !value.is_empty())
	}

	pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> {
		self.0.iter().filter(move |(key, _)| key == name).map(|(_, value)| value.as_str())
	}

	pub fn contains(&self, name: &str) -> bool {
		self.0.iter().any(|(key, _)| key == name)
	}

	fn ensure_known(&self, allowed: &[&str]) -> Result<()> {
		match self.0.iter().find(|(key, _)| !allowed.contains(&key.as_str())) {
			Some((name, _)) => Err(Error::invalid(format!(
				"Unknown query parameter '{name}'. Allowed parameters are: {}",
				allowed.join(", ")
			))),
			None => Ok(()),
		}
	}
}
impl<K, V> FromIterator<(K, V)> for QueryParams
where
	K: Into<String>,
	V: Into<String>,
{
	fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
		Self(iter.into_iter().map(|(key, value)| (key.into(), value.into())).collect())
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct SearchRequest {
	pub query: String,
	pub language: String,
	pub limit: usize,
	pub location_bias: Option<Coordinate>,
	/// Weight of importance against proximity, in [0, 1].
	pub bias_scale: f64,
	pub zoom: u8,
	pub bbox: Option<BoundingBox>,
	/// Set by the presence of `debug`, whatever its value.
	pub debug: bool,
	pub layers: BTreeSet<Layer>,
	pub tag_filters: Vec<TagFilter>,
}
impl SearchRequest {
	pub fn from_params(
		params: &QueryParams,
		accept_language: Option<&str>,
		languages: &Languages,
	) -> Result<Self> {
		params.ensure_known(&SEARCH_PARAMETERS)?;

		let query = params.get("q").ok_or_else(|| Error::invalid(MISSING_QUERY))?.to_string();
		let location_bias = match (params.get("lon"), params.get("lat")) {
			(None, None) => None,
			(Some(lon), Some(lat)) => Some(parse_coordinate(lon, lat)?),
			_ => return Err(Error::invalid(INVALID_LOCATION)),
		};
		let bias_scale = parse_bias_scale(params.get("location_bias_scale"))?;
		let bbox = params.get("bbox").map(parse_bbox).transpose()?;

		Ok(Self {
			query,
			language: language::resolve(params.get("lang"), accept_language, languages),
			limit: parse_limit(params.get("limit"), DEFAULT_SEARCH_LIMIT),
			location_bias,
			bias_scale,
			zoom: parse_zoom(params.get("zoom")),
			bbox,
			debug: params.contains("debug"),
			layers: parse_layers(params)?,
			tag_filters: parse_tag_filters(params)?,
		})
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReverseRequest {
	pub location: Coordinate,
	pub language: String,
	/// Search radius in kilometres, in (0, 5000].
	pub radius_km: f64,
	pub limit: usize,
	pub query_string_filter: Option<String>,
	pub distance_sort: bool,
	pub layers: BTreeSet<Layer>,
	/// Set by the presence of `debug`, whatever its value.
	pub debug: bool,
	pub tag_filters: Vec<TagFilter>,
}
impl ReverseRequest {
	pub fn from_params(
		params: &QueryParams,
		accept_language: Option<&str>,
		languages: &Languages,
	) -> Result<Self> {
		params.ensure_known(&REVERSE_PARAMETERS)?;

		let location = match (params.get("lon"), params.get("lat")) {
			(Some(lon), Some(lat)) => parse_coordinate(lon, lat)?,
			_ => return Err(Error::invalid(MISSING_LOCATION)),
		};
		let radius_km = parse_radius(params.get("radius"))?;
		let distance_sort = match params.get("distance_sort") {
			None | Some("true") => true,
			Some("false") => false,
			Some(_) => {
				return Err(Error::invalid(
					"Invalid parameter 'distance_sort': must be 'true' or 'false'.",
				));
			},
		};

		Ok(Self {
			location,
			language: language::resolve(params.get("lang"), accept_language, languages),
			radius_km,
			limit: parse_limit(params.get("limit"), DEFAULT_REVERSE_LIMIT),
			query_string_filter: params.get("query_string_filter").map(str::to_string),
			distance_sort,
			layers: parse_layers(params)?,
			debug: params.contains("debug"),
			tag_filters: parse_tag_filters(params)?,
		})
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
	pub place_id: String,
	pub language: String,
}
impl LookupRequest {
	pub fn from_params(
		params: &QueryParams,
		accept_language: Option<&str>,
		languages: &Languages,
	) -> Result<Self> {
		params.ensure_known(&LOOKUP_PARAMETERS)?;

		let place_id = params
			.get("place_id")
			.ok_or_else(|| Error::invalid("Missing parameter 'place_id': /lookup?place_id=123"))?;

		Ok(Self {
			place_id: place_id.to_string(),
			language: language::resolve(params.get("lang"), accept_language, languages),
		})
	}
}

fn parse_limit(raw: Option<&str>, default: usize) -> usize {
	let limit = raw.and_then(|raw| raw.parse::<i64>().ok()).unwrap_or(default as i64);

	limit.clamp(1, MAX_LIMIT as i64) as usize
}

fn parse_zoom(raw: Option<&str>) -> u8 {
	let zoom = raw.and_then(|raw| raw.parse::<i64>().ok()).unwrap_or(i64::from(DEFAULT_ZOOM));

	zoom.clamp(0, i64::from(MAX_ZOOM)) as u8
}

fn parse_bias_scale(raw: Option<&str>) -> Result<f64> {
	let scale = match raw {
		None => DEFAULT_BIAS_SCALE,
		Some(raw) => parse_finite(raw).ok_or_else(|| {
			Error::invalid("Invalid parameter 'location_bias_scale': must be a number.")
		})?,
	};

	Ok(scale.clamp(0.0, 1.0))
}

fn parse_radius(raw: Option<&str>) -> Result<f64> {
	let raw = raw.ok_or_else(|| {
		Error::invalid("Missing parameter 'radius': /reverse?lat=51.5&lon=8.0&radius=1")
	})?;
	let radius = parse_finite(raw).filter(|radius| *radius > 0.0).ok_or_else(|| {
		Error::invalid("Invalid parameter 'radius': must be a positive number of kilometres.")
	})?;

	Ok(radius.min(MAX_RADIUS_KM))
}

fn parse_coordinate(lon: &str, lat: &str) -> Result<Coordinate> {
	let coordinate = match (parse_finite(lon), parse_finite(lat)) {
		(Some(lon), Some(lat)) => Coordinate::new(lon, lat),
		_ => return Err(Error::invalid(INVALID_LOCATION)),
	};

	if !coordinate.is_valid() {
		return Err(Error::invalid(INVALID_LOCATION));
	}

	Ok(coordinate)
}

/// Parses `minLon,minLat,maxLon,maxLat`. Swapped corners are put back in order.
fn parse_bbox(raw: &str) -> Result<BoundingBox> {
	let invalid = || {
		Error::invalid(format!(
			"Invalid parameter 'bbox={raw}': expected 'minLon,minLat,maxLon,maxLat' in decimal \
			 degrees."
		))
	};
	let values = raw.split(',').map(|part| parse_finite(part.trim())).collect::<Option<Vec<_>>>();
	let Some([lon_a, lat_a, lon_b, lat_b]) = values.as_deref() else {
		return Err(invalid());
	};
	let bbox = BoundingBox {
		min_lon: lon_a.min(*lon_b),
		min_lat: lat_a.min(*lat_b),
		max_lon: lon_a.max(*lon_b),
		max_lat: lat_a.max(*lat_b),
	};

	if !bbox.top_left().is_valid() || !bbox.bottom_right().is_valid() {
		return Err(invalid());
	}

	Ok(bbox)
}

fn parse_layers(params: &QueryParams) -> Result<BTreeSet<Layer>> {
	params
		.get_all("layer")
		.map(|raw| raw.parse::<Layer>().map_err(|err| Error::invalid(err.to_string())))
		.collect()
}

fn parse_tag_filters(params: &QueryParams) -> Result<Vec<TagFilter>> {
	params
		.get_all("osm_tag")
		.map(|raw| raw.parse::<TagFilter>().map_err(|err| Error::invalid(err.to_string())))
		.collect()
}

fn parse_finite(raw: &str) -> Option<f64> {
	raw.parse::<f64>().ok().filter(|value| value.is_finite())
}
