#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error(transparent)]
	Reqwest(#[from] reqwest::Error),
	#[error(transparent)]
	SerdeJson(#[from] serde_json::Error),
	#[error(transparent)]
	InvalidHeaderValue(#[from] reqwest::header::InvalidHeaderValue),
	#[error("Backend returned status {status} for {operation}.")]
	Status { operation: &'static str, status: u16 },
	#[error("Backend timed out during {operation}.")]
	TimedOut { operation: &'static str },
	#[error("Backend url {url} cannot be used as a base url.")]
	InvalidUrl { url: String },
	#[error("{message}")]
	InvalidResponse { message: String },
}
