mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Backend, Config, DEFAULT_LANGUAGE_ALIAS, Languages, Service};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::validation("service.http_bind", "must be non-empty."));
	}
	if cfg.backend.url.trim().is_empty() {
		return Err(Error::validation("backend.url", "must be non-empty."));
	}
	if !cfg.backend.url.starts_with("http://") && !cfg.backend.url.starts_with("https://") {
		return Err(Error::validation("backend.url", "must start with http:// or https://."));
	}
	if cfg.backend.index.trim().is_empty() {
		return Err(Error::validation("backend.index", "must be non-empty."));
	}
	if cfg.backend.timeout_ms == 0 {
		return Err(Error::validation("backend.timeout_ms", "must be greater than zero."));
	}
	if cfg.languages.supported.is_empty() {
		return Err(Error::validation("languages.supported", "must be non-empty."));
	}
	if cfg.languages.supported.iter().any(|language| language.trim().is_empty()) {
		return Err(Error::validation("languages.supported", "must not contain blank entries."));
	}
	if cfg.languages.default != DEFAULT_LANGUAGE_ALIAS
		&& !cfg.languages.is_supported(&cfg.languages.default)
	{
		return Err(Error::validation(
			"languages.default",
			format!(
				"must be one of {} or '{DEFAULT_LANGUAGE_ALIAS}'.",
				cfg.languages.supported.join(", ")
			),
		));
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	if cfg.backend.api_key.as_deref().map(|key| key.trim().is_empty()).unwrap_or(false) {
		cfg.backend.api_key = None;
	}

	cfg.backend.url = cfg.backend.url.trim().trim_end_matches('/').to_string();

	for language in &mut cfg.languages.supported {
		*language = language.trim().to_ascii_lowercase();
	}

	cfg.languages.default = cfg.languages.default.trim().to_ascii_lowercase();
}
