//! Grammar for `osm_tag` filter expressions.
//!
//! | expression | kind |
//! |---|---|
//! | `key`, `:value`, `key:value` | [`TagFilterKind::Include`] |
//! | `!key`, `!:value`, `:!value`, `!key:value`, `!key:!value` | [`TagFilterKind::Exclude`] |
//! | `key:!value` | [`TagFilterKind::ExcludeValue`] |

use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagFilterKind {
	Include,
	Exclude,
	/// Key must be present with any value but the given one.
	ExcludeValue,
}

/// A parsed tag filter. At least one of `key`/`value` is set, and
/// [`TagFilterKind::ExcludeValue`] always carries both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagFilter {
	kind: TagFilterKind,
	key: Option<String>,
	value: Option<String>,
}
impl TagFilter {
	pub fn include(key: Option<&str>, value: Option<&str>) -> Option<Self> {
		Self::new(TagFilterKind::Include, key, value)
	}

	pub fn exclude(key: Option<&str>, value: Option<&str>) -> Option<Self> {
		Self::new(TagFilterKind::Exclude, key, value)
	}

	pub fn exclude_value(key: &str, value: &str) -> Option<Self> {
		Self::new(TagFilterKind::ExcludeValue, Some(key), Some(value))
	}

	fn new(kind: TagFilterKind, key: Option<&str>, value: Option<&str>) -> Option<Self> {
		let key = key.map(str::trim).filter(|key| !key.is_empty()).map(str::to_string);
		let value = value.map(str::trim).filter(|value| !value.is_empty()).map(str::to_string);

		match (kind, &key, &value) {
			(_, None, None) => None,
			(TagFilterKind::ExcludeValue, Some(_), Some(_)) => Some(Self { kind, key, value }),
			(TagFilterKind::ExcludeValue, _, _) => None,
			_ => Some(Self { kind, key, value }),
		}
	}

	pub fn kind(&self) -> TagFilterKind {
		self.kind
	}

	pub fn key(&self) -> Option<&str> {
		self.key.as_deref()
	}

	pub fn value(&self) -> Option<&str> {
		self.value.as_deref()
	}
}
impl FromStr for TagFilter {
	type Err = TagFilterSyntaxError;

	fn from_str(raw: &str) -> Result<Self, Self::Err> {
		let err = || TagFilterSyntaxError(raw.to_string());
		let mut parts = raw.split(':');
		let head = parts.next().ok_or_else(err)?.trim();
		let tail = parts.next().map(str::trim);

		if parts.next().is_some() {
			return Err(err());
		}

		let (negate_key, key) = split_negation(head);
		let filter = match tail {
			None => {
				if negate_key {
					Self::exclude(Some(key), None)
				} else {
					Self::include(Some(key), None)
				}
			},
			Some(tail) => {
				let (negate_value, value) = split_negation(tail);
				let key = Some(key).filter(|key| !key.is_empty());

				match (negate_key, negate_value, key) {
					(false, false, key) => Self::include(key, Some(value)),
					(false, true, Some(key)) => Self::exclude_value(key, value),
					(_, _, key) => Self::exclude(key, Some(value)),
				}
			},
		};

		filter.ok_or_else(err)
	}
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid parameter 'osm_tag={0}': bad syntax for tag filter.")]
pub struct TagFilterSyntaxError(pub String);

fn split_negation(raw: &str) -> (bool, &str) {
	match raw.strip_prefix('!') {
		Some(rest) => (true, rest.trim()),
		None => (false, raw),
	}
}
