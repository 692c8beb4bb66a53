use std::cmp::Ordering;

use geofront_config::Languages;

/// Picks the language a request is answered in.
///
/// An explicit `lang` hint wins when it names a supported language. Without a hint the
/// `Accept-Language` header is consulted. Anything else degrades to the configured default,
/// so this never fails.
pub fn resolve(hint: Option<&str>, accept_language: Option<&str>, languages: &Languages) -> String {
	match hint.map(str::trim).filter(|hint| !hint.is_empty()) {
		Some(hint) if languages.is_supported(hint) => hint.to_string(),
		Some(_) => languages.default.clone(),
		None => accept_language
			.and_then(|header| best_accepted(header, languages))
			.unwrap_or_else(|| languages.default.clone()),
	}
}

fn best_accepted(header: &str, languages: &Languages) -> Option<String> {
	let mut ranges: Vec<(String, f32)> = header.split(',').filter_map(parse_range).collect();

	// Stable sort keeps header order among equal weights.
	ranges.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

	ranges
		.into_iter()
		.filter(|(_, weight)| *weight > 0.0)
		.map(|(primary, _)| primary)
		.find(|primary| languages.is_supported(primary))
}

fn parse_range(raw: &str) -> Option<(String, f32)> {
	let mut parts = raw.split(';');
	let tag = parts.next()?.trim();

	if tag.is_empty() || tag == "*" {
		return None;
	}

	let mut weight = 1.0;

	for param in parts {
		if let Some(value) = param.trim().strip_prefix("q=") {
			weight = value.trim().parse().ok()?;
		}
	}

	let primary = tag.split(['-', '_']).next()?.to_ascii_lowercase();

	Some((primary, weight))
}
