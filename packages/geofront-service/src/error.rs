pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// Malformed, unknown or missing request parameter. The message is returned to the caller
	/// verbatim.
	#[error("{message}")]
	InvalidRequest { message: String },
	#[error("Backend error: {message}")]
	Backend { message: String },
}
impl Error {
	pub(crate) fn invalid(message: impl Into<String>) -> Self {
		Self::InvalidRequest { message: message.into() }
	}

	pub fn is_client_error(&self) -> bool {
		matches!(self, Self::InvalidRequest { .. })
	}
}

impl From<geofront_backend::Error> for Error {
	fn from(err: geofront_backend::Error) -> Self {
		Self::Backend { message: err.to_string() }
	}
}
