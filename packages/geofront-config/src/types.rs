use serde::Deserialize;

/// Name entry used by the index for the language-neutral variant of a localized field.
pub const DEFAULT_LANGUAGE_ALIAS: &str = "default";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub backend: Backend,
	#[serde(default)]
	pub languages: Languages,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	#[serde(default = "default_log_level")]
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Backend {
	pub url: String,
	#[serde(default = "default_index")]
	pub index: String,
	/// Sent as `Authorization: ApiKey <key>` when set.
	pub api_key: Option<String>,
	/// Applied both as the backend-side search timeout and as the HTTP client timeout.
	#[serde(default = "default_timeout_ms")]
	pub timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Languages {
	pub supported: Vec<String>,
	/// Either one of `supported` or the language-neutral alias `default`.
	pub default: String,
}
impl Languages {
	pub fn is_supported(&self, language: &str) -> bool {
		self.supported.iter().any(|supported| supported == language)
	}
}
impl Default for Languages {
	fn default() -> Self {
		Self {
			supported: ["en", "de", "fr", "it"].into_iter().map(str::to_string).collect(),
			default: DEFAULT_LANGUAGE_ALIAS.to_string(),
		}
	}
}

fn default_log_level() -> String {
	"info".to_string()
}

fn default_index() -> String {
	"photon".to_string()
}

fn default_timeout_ms() -> u64 {
	7_000
}
