use std::{fmt, str::FromStr};

/// Coarse result category, stored as the `type` field of an indexed place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Layer {
	House,
	Street,
	Locality,
	District,
	City,
	County,
	State,
	Country,
}
impl Layer {
	pub const ALL: [Self; 8] = [
		Self::House,
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
			Self::House => "house",
			Self::Street => "street",
			Self::Locality => "locality",
			Self::District => "district",
			Self::City => "city",
			Self::County => "county",
			Self::State => "state",
			Self::Country => "country",
		}
	}

	pub fn allowed_names() -> String {
		Self::ALL.iter().map(Self::as_str).collect::<Vec<_>>().join(", ")
	}
}
impl fmt::Display for Layer {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}
impl FromStr for Layer {
	type Err = UnknownLayer;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		Self::ALL
			.into_iter()
			.find(|layer| layer.as_str() == raw.trim())
			.ok_or_else(|| UnknownLayer(raw.to_string()))
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid layer '{0}'. Allowed layers are: {allowed}", allowed = Layer::allowed_names())]
pub struct UnknownLayer(pub String);
