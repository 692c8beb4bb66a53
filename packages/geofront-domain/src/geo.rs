#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
	pub lon: f64,
	pub lat: f64,
}
impl Coordinate {
	pub fn new(lon: f64, lat: f64) -> Self {
		Self { lon, lat }
	}

	pub fn is_valid(&self) -> bool {
		(-180.0..=180.0).contains(&self.lon) && (-90.0..=90.0).contains(&self.lat)
	}
}

/// Axis-aligned box in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
	pub min_lon: f64,
	pub min_lat: f64,
	pub max_lon: f64,
	pub max_lat: f64,
}
impl BoundingBox {
	pub fn top_left(&self) -> Coordinate {
		Coordinate::new(self.min_lon, self.max_lat)
	}

	pub fn bottom_right(&self) -> Coordinate {
		Coordinate::new(self.max_lon, self.min_lat)
	}
}
