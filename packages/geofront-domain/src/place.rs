use crate::geo::Coordinate;

/// Localized attributes of a place. Each is stored per language with a language-neutral
/// `default` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocalizedField {
	Name,
	Street,
	Locality,
	District,
	City,
	County,
	State,
	Country,
}
impl LocalizedField {
	/// Address chain from the most to the least specific part. `Name` is not included.
	pub const ADDRESS_CHAIN: [Self; 7] = [
		Self::Street,
		Self::Locality,
		Self::District,
		Self::City,
		Self::County,
		Self::State,
		Self::Country,
	];

	pub fn as_str(&self) -> &'static str {
		match self {
			Self::Name => "name",
			Self::Street => "street",
			Self::Locality => "locality",
			Self::District => "district",
			Self::City => "city",
			Self::County => "county",
			Self::State => "state",
			Self::Country => "country",
		}
	}
}

/// OSM-style classification, e.g. `highway=residential`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
	pub key: &'a str,
	pub value: &'a str,
}

/// Read-only view of one matched place, independent of the backend document shape.
pub trait PlaceResult
where
	Self: Send + Sync,
{
	fn id(&self) -> &str;

	/// Value in `language`, falling back to the language-neutral entry.
	fn localized(&self, field: LocalizedField, language: &str) -> Option<&str>;

	fn coordinate(&self) -> Option<Coordinate>;

	fn classification(&self) -> Option<Classification<'_>>;

	/// Layer name of the place (`street`, `city`, ...).
	fn object_type(&self) -> Option<&str>;

	fn postcode(&self) -> Option<&str>;

	fn housenumber(&self) -> Option<&str>;

	fn country_code(&self) -> Option<&str>;

	fn osm_id(&self) -> Option<i64>;

	fn osm_type(&self) -> Option<&str>;

	fn importance(&self) -> Option<f64>;

	fn parent_place_id(&self) -> Option<i64>;

	fn rank_address(&self) -> Option<i64>;

	/// `[min_lon, max_lat, max_lon, min_lat]`.
	fn extent(&self) -> Option<[f64; 4]>;

	fn is_street(&self) -> bool {
		self.classification().map(|class| class.key == "highway").unwrap_or(false)
			|| self.object_type() == Some("street")
	}

	/// Closest enclosing area in the address chain above street level.
	fn enclosing_area(&self, language: &str) -> Option<&str> {
		[LocalizedField::Locality, LocalizedField::District, LocalizedField::City]
			.into_iter()
			.find_map(|field| self.localized(field, language))
	}
}

pub type PlaceRecord = Box<dyn PlaceResult>;
