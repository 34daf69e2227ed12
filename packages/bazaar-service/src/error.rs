pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// `fields` names the request fields at fault, when known.
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String, fields: Vec<String> },
	#[error("Not found: {message}")]
	NotFound { message: String },
	#[error("Storage error: {message}")]
	Storage { message: String },
}
impl Error {
	pub(crate) fn invalid_fields(fields: &[&str], message: impl Into<String>) -> Self {
		Self::InvalidRequest {
			message: message.into(),
			fields: fields.iter().map(|field| (*field).to_string()).collect(),
		}
	}
}

impl From<bazaar_storage::Error> for Error {
	fn from(err: bazaar_storage::Error) -> Self {
		match err {
			bazaar_storage::Error::Sqlx(inner) => Self::Storage { message: inner.to_string() },
			bazaar_storage::Error::InvalidArgument(message) =>
				Self::InvalidRequest { message, fields: Vec::new() },
			bazaar_storage::Error::NotFound(message) => Self::NotFound { message },
		}
	}
}
