//! Typed Elasticsearch query trees for forward and reverse search.
//!
//! Rendering goes through `serde_json` maps, whose keys are sorted, so a query renders to the
//! same JSON text every time.

use std::collections::BTreeSet;

use serde_json::{Map, Value};

use geofront_config::DEFAULT_LANGUAGE_ALIAS;
use geofront_domain::{
	geo::{BoundingBox, Coordinate},
	layer::Layer,
	tag_filter::{TagFilter, TagFilterKind},
};

use crate::request::{MAX_ZOOM, ReverseRequest, SearchRequest};

const NGRAM_ANALYZER: &str = "search_ngram";
const RAW_ANALYZER: &str = "search_raw";
const PREFIX_LENGTH: u32 = 2;
const OTHER_LANGUAGE_BOOST: f64 = 0.6;
const NAME_RAW_BOOST: f64 = 200.0;
const COLLECTOR_RAW_BOOST: f64 = 100.0;
const IMPORTANCE_SCRIPT: &str = "1 + doc['importance'].value * 100";
const CLASSIFICATION_WEIGHT: f64 = 0.1;
const COORDINATE_DECAY: f64 = 0.8;
const MIN_IMPORTANCE_SCALE: f64 = 0.000_000_1;

/// Which text-match variant a search query uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strictness {
	/// Every query term must match across the collector fields.
	Strict,
	/// Fuzzy match, any term may match.
	Lenient,
}
impl Strictness {
	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Strict => "strict",
			Self::Lenient => "lenient",
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum Query {
	Bool(BoolQuery),
	Term { field: String, value: String },
	Terms { field: String, values: Vec<String> },
	Exists { field: String },
	Match(MatchQuery),
	MultiMatch(MultiMatchQuery),
	QueryString { query: String },
	MatchAll,
	GeoDistance { field: String, center: Coordinate, distance_km: f64 },
	GeoBoundingBox { field: String, bbox: BoundingBox },
	FunctionScore(Box<FunctionScoreQuery>),
}
impl Query {
	pub fn term(field: impl Into<String>, value: impl Into<String>) -> Self {
		Self::Term { field: field.into(), value: value.into() }
	}

	pub fn exists(field: impl Into<String>) -> Self {
		Self::Exists { field: field.into() }
	}

	pub fn to_value(&self) -> Value {
		match self {
			Self::Bool(query) => query.to_value(),
			Self::Term { field, value } =>
				single("term", single(field, Value::from(value.as_str()))),
			Self::Terms { field, values } =>
				single("terms", single(field, Value::from(values.clone()))),
			Self::Exists { field } =>
				single("exists", single("field", Value::from(field.as_str()))),
			Self::Match(query) => query.to_value(),
			Self::MultiMatch(query) => query.to_value(),
			Self::QueryString { query } =>
				single("query_string", single("query", Value::from(query.as_str()))),
			Self::MatchAll => single("match_all", Value::Object(Map::new())),
			Self::GeoDistance { field, center, distance_km } => {
				let mut body = Map::new();

				body.insert("distance".to_string(), Value::from(kilometres(*distance_km)));
				body.insert(field.clone(), point(center));

				single("geo_distance", Value::Object(body))
			},
			Self::GeoBoundingBox { field, bbox } => single(
				"geo_bounding_box",
				single(
					field,
					serde_json::json!({
						"top_left": point(&bbox.top_left()),
						"bottom_right": point(&bbox.bottom_right()),
					}),
				),
			),
			Self::FunctionScore(query) => query.to_value(),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoolQuery {
	pub must: Vec<Query>,
	pub should: Vec<Query>,
	pub must_not: Vec<Query>,
	pub filter: Vec<Query>,
	pub minimum_should_match: Option<u32>,
}
impl BoolQuery {
	fn to_value(&self) -> Value {
		let mut body = Map::new();

		for (name, clauses) in [
			("must", &self.must),
			("should", &self.should),
			("must_not", &self.must_not),
			("filter", &self.filter),
		] {
			if !clauses.is_empty() {
				body.insert(name.to_string(), clauses.iter().map(Query::to_value).collect());
			}
		}
		if let Some(minimum) = self.minimum_should_match {
			body.insert("minimum_should_match".to_string(), Value::from(minimum));
		}

		single("bool", Value::Object(body))
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatchQuery {
	pub field: String,
	pub query: String,
	pub analyzer: Option<&'static str>,
	pub boost: Option<f64>,
	pub fuzziness: Option<u32>,
	pub prefix_length: Option<u32>,
	pub minimum_should_match: Option<String>,
}
impl MatchQuery {
	pub fn new(field: impl Into<String>, query: impl Into<String>) -> Self {
		Self {
			field: field.into(),
			query: query.into(),
			analyzer: None,
			boost: None,
			fuzziness: None,
			prefix_length: None,
			minimum_should_match: None,
		}
	}

	fn to_value(&self) -> Value {
		let mut body = Map::new();

		body.insert("query".to_string(), Value::from(self.query.as_str()));

		if let Some(analyzer) = self.analyzer {
			body.insert("analyzer".to_string(), Value::from(analyzer));
		}
		if let Some(boost) = self.boost {
			body.insert("boost".to_string(), Value::from(boost));
		}
		if let Some(fuzziness) = self.fuzziness {
			body.insert("fuzziness".to_string(), Value::from(fuzziness));
		}
		if let Some(prefix_length) = self.prefix_length {
			body.insert("prefix_length".to_string(), Value::from(prefix_length));
		}
		if let Some(minimum) = &self.minimum_should_match {
			body.insert("minimum_should_match".to_string(), Value::from(minimum.as_str()));
		}

		single("match", single(&self.field, Value::Object(body)))
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiMatchQuery {
	pub query: String,
	/// Field names with their boosts.
	pub fields: Vec<(String, f64)>,
	pub kind: &'static str,
	pub analyzer: &'static str,
	pub prefix_length: u32,
	pub minimum_should_match: String,
}
impl MultiMatchQuery {
	fn to_value(&self) -> Value {
		let fields: Vec<Value> = self
			.fields
			.iter()
			.map(|(field, boost)| Value::from(format!("{field}^{boost:.1}")))
			.collect();

		single(
			"multi_match",
			serde_json::json!({
				"query": self.query,
				"fields": fields,
				"type": self.kind,
				"analyzer": self.analyzer,
				"prefix_length": self.prefix_length,
				"minimum_should_match": self.minimum_should_match,
			}),
		)
	}
}

#[derive(Debug, Clone, PartialEq)]
pub enum ScoreFunction {
	Script { source: &'static str },
	Weight { filter: Query, weight: f64 },
	ExpDecay { field: String, origin: Coordinate, scale_km: f64, offset_km: f64, decay: f64 },
	LinearDecay { field: String, origin: f64, scale: f64 },
}
impl ScoreFunction {
	fn to_value(&self) -> Value {
		match self {
			Self::Script { source } =>
				serde_json::json!({ "script_score": { "script": { "source": source } } }),
			Self::Weight { filter, weight } =>
				serde_json::json!({ "filter": filter.to_value(), "weight": weight }),
			Self::ExpDecay { field, origin, scale_km, offset_km, decay } => single(
				"exp",
				single(
					field,
					serde_json::json!({
						"origin": point(origin),
						"scale": kilometres(*scale_km),
						"offset": kilometres(*offset_km),
						"decay": decay,
					}),
				),
			),
			Self::LinearDecay { field, origin, scale } => single(
				"linear",
				single(field, serde_json::json!({ "origin": origin, "scale": scale })),
			),
		}
	}
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionScoreQuery {
	pub query: Query,
	pub functions: Vec<ScoreFunction>,
	pub score_mode: &'static str,
	pub boost_mode: &'static str,
}
impl FunctionScoreQuery {
	fn to_value(&self) -> Value {
		let functions: Vec<Value> = self.functions.iter().map(ScoreFunction::to_value).collect();

		single(
			"function_score",
			serde_json::json!({
				"query": self.query.to_value(),
				"functions": functions,
				"score_mode": self.score_mode,
				"boost_mode": self.boost_mode,
			}),
		)
	}
}

/// Forward search query for one strictness variant.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
	query: Query,
	strictness: Strictness,
}
impl SearchQuery {
	pub fn build(request: &SearchRequest, strictness: Strictness, supported: &[String]) -> Self {
		let language = request.language.as_str();
		let text = request.query.as_str();
		let mut filter = vec![housenumber_guard(text, language)];

		if let Some(bbox) = request.bbox {
			filter.push(Query::GeoBoundingBox { field: "coordinate".to_string(), bbox });
		}

		filter.extend(layer_filter_query(&request.layers));
		filter.extend(tag_filter_query(&request.tag_filters));

		let matched = Query::Bool(BoolQuery {
			must: vec![text_match(text, language, strictness, supported)],
			should: vec![
				raw_match(localized_field("name", language, "raw"), text, NAME_RAW_BOOST),
				raw_match(localized_field("collector", language, "raw"), text, COLLECTOR_RAW_BOOST),
			],
			filter,
			..Default::default()
		});
		let mut query = Query::FunctionScore(Box::new(FunctionScoreQuery {
			query: matched,
			functions: vec![
				ScoreFunction::Script { source: IMPORTANCE_SCRIPT },
				ScoreFunction::Weight {
					filter: Query::Match(MatchQuery::new("classification", text)),
					weight: CLASSIFICATION_WEIGHT,
				},
			],
			score_mode: "sum",
			boost_mode: "multiply",
		}));

		if let Some(origin) = request.location_bias {
			query = with_location_bias(query, origin, request.zoom, request.bias_scale);
		}

		Self { query, strictness }
	}

	pub fn strictness(&self) -> Strictness {
		self.strictness
	}

	pub fn query(&self) -> &Query {
		&self.query
	}

	pub fn to_value(&self) -> Value {
		self.query.to_value()
	}

	pub fn debug_string(&self) -> String {
		self.to_value().to_string()
	}
}

/// Reverse search query around a center point.
#[derive(Debug, Clone, PartialEq)]
pub struct ReverseQuery {
	query: Query,
	sort_origin: Option<Coordinate>,
}
impl ReverseQuery {
	pub fn build(request: &ReverseRequest) -> Self {
		let must = match &request.query_string_filter {
			Some(filter) => Query::QueryString { query: filter.clone() },
			None => Query::MatchAll,
		};
		let mut filter = vec![Query::GeoDistance {
			field: "coordinate".to_string(),
			center: request.location,
			distance_km: request.radius_km,
		}];

		filter.extend(layer_filter_query(&request.layers));
		filter.extend(tag_filter_query(&request.tag_filters));

		Self {
			query: Query::Bool(BoolQuery { must: vec![must], filter, ..Default::default() }),
			sort_origin: request.distance_sort.then_some(request.location),
		}
	}

	pub fn query(&self) -> &Query {
		&self.query
	}

	pub fn to_value(&self) -> Value {
		self.query.to_value()
	}

	/// Ascending distance from the center, when distance sorting is on.
	pub fn sort(&self) -> Option<Value> {
		self.sort_origin.map(|origin| {
			serde_json::json!([{
				"_geo_distance": { "coordinate": point(&origin), "order": "asc", "unit": "km" }
			}])
		})
	}

	pub fn debug_string(&self) -> String {
		self.to_value().to_string()
	}
}

/// Combines tag filters into `any(includes) AND NOT any(excludes)`. `None` when there are no
/// filters.
pub fn tag_filter_query(filters: &[TagFilter]) -> Option<Query> {
	let mut includes = Vec::new();
	let mut excludes = Vec::new();

	for filter in filters {
		let key = filter.key().map(|key| Query::term("osm_key", key));
		let value = filter.value().map(|value| Query::term("osm_value", value));

		match filter.kind() {
			TagFilterKind::Include => includes.extend(both(key, value)),
			TagFilterKind::Exclude => excludes.extend(both(key, value)),
			TagFilterKind::ExcludeValue => includes.push(Query::Bool(BoolQuery {
				must: key.into_iter().collect(),
				must_not: value.into_iter().collect(),
				..Default::default()
			})),
		}
	}

	if includes.is_empty() && excludes.is_empty() {
		return None;
	}

	let minimum_should_match = (!includes.is_empty()).then_some(1);

	Some(Query::Bool(BoolQuery {
		should: includes,
		must_not: excludes,
		minimum_should_match,
		..Default::default()
	}))
}

/// `terms type [...]` over the requested layers. `None` when no layer is requested.
pub fn layer_filter_query(layers: &BTreeSet<Layer>) -> Option<Query> {
	if layers.is_empty() {
		return None;
	}

	Some(Query::Terms {
		field: "type".to_string(),
		values: layers.iter().map(|layer| layer.as_str().to_string()).collect(),
	})
}

fn both(key: Option<Query>, value: Option<Query>) -> Option<Query> {
	match (key, value) {
		(Some(key), Some(value)) =>
			Some(Query::Bool(BoolQuery { must: vec![key, value], ..Default::default() })),
		(key, value) => key.or(value),
	}
}

fn text_match(text: &str, language: &str, strictness: Strictness, supported: &[String]) -> Query {
	match strictness {
		Strictness::Strict => {
			let mut fields = vec![(format!("collector.{DEFAULT_LANGUAGE_ALIAS}"), 1.0)];

			fields.extend(supported.iter().map(|candidate| {
				let boost = if candidate == language { 1.0 } else { OTHER_LANGUAGE_BOOST };

				(format!("collector.{candidate}.ngrams"), boost)
			}));

			Query::MultiMatch(MultiMatchQuery {
				query: text.to_string(),
				fields,
				kind: "cross_fields",
				analyzer: NGRAM_ANALYZER,
				prefix_length: PREFIX_LENGTH,
				minimum_should_match: "100%".to_string(),
			})
		},
		Strictness::Lenient => {
			let mut fields = vec![format!("collector.{DEFAULT_LANGUAGE_ALIAS}")];

			if language != DEFAULT_LANGUAGE_ALIAS {
				fields.push(format!("collector.{language}.ngrams"));
			}

			let should = fields
				.into_iter()
				.map(|field| {
					Query::Match(MatchQuery {
						analyzer: Some(NGRAM_ANALYZER),
						fuzziness: Some(1),
						prefix_length: Some(PREFIX_LENGTH),
						minimum_should_match: Some("-1".to_string()),
						..MatchQuery::new(field, text)
					})
				})
				.collect();

			Query::Bool(BoolQuery { should, minimum_should_match: Some(1), ..Default::default() })
		},
	}
}

fn raw_match(field: String, text: &str, boost: f64) -> Query {
	Query::Match(MatchQuery {
		analyzer: Some(RAW_ANALYZER),
		boost: Some(boost),
		..MatchQuery::new(field, text)
	})
}

/// A place with a house number but no name in `language` only matches when its house number
/// is part of the query text.
fn housenumber_guard(text: &str, language: &str) -> Query {
	Query::Bool(BoolQuery {
		should: vec![
			Query::Bool(BoolQuery {
				must_not: vec![Query::exists("housenumber")],
				..Default::default()
			}),
			Query::Match(MatchQuery {
				analyzer: Some("standard"),
				..MatchQuery::new("housenumber", text)
			}),
			Query::exists(localized_field("name", language, "raw")),
		],
		minimum_should_match: Some(1),
		..Default::default()
	})
}

fn with_location_bias(query: Query, origin: Coordinate, zoom: u8, bias_scale: f64) -> Query {
	let radius_km = 2_f64.powi(i32::from(MAX_ZOOM.saturating_sub(zoom))) * 0.25;

	Query::FunctionScore(Box::new(FunctionScoreQuery {
		query,
		functions: vec![
			ScoreFunction::ExpDecay {
				field: "coordinate".to_string(),
				origin,
				scale_km: radius_km,
				offset_km: radius_km / 10.0,
				decay: COORDINATE_DECAY,
			},
			ScoreFunction::LinearDecay {
				field: "importance".to_string(),
				origin: 1.0,
				scale: bias_scale.max(MIN_IMPORTANCE_SCALE),
			},
		],
		score_mode: "max",
		boost_mode: "multiply",
	}))
}

fn localized_field(prefix: &str, language: &str, suffix: &str) -> String {
	format!("{prefix}.{language}.{suffix}")
}

fn point(coordinate: &Coordinate) -> Value {
	serde_json::json!({ "lat": coordinate.lat, "lon": coordinate.lon })
}

fn kilometres(distance: f64) -> String {
	format!("{distance}km")
}

fn single(key: &str, value: Value) -> Value {
	let mut map = Map::new();

	map.insert(key.to_string(), value);

	Value::Object(map)
}
