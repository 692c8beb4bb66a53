pub mod geo;
pub mod language;
pub mod layer;
pub mod place;
pub mod tag_filter;
