//! Client-level error types shared by the token store, transport, and facade.

// self
use crate::{_prelude::*, obs::Operation};

/// Client-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type SharedError = Arc<dyn StdError + Send + Sync>;

const DETAIL_PREVIEW_LIMIT: usize = 256;

/// Canonical error returned by every facade operation.
///
/// The enum is `Clone` so one failed token refresh can be handed unchanged to every caller
/// that was waiting on it.
#[derive(Clone, Debug, ThisError)]
pub enum Error {
	/// The token endpoint call failed (network error or non-2xx response).
	#[error("{message}")]
	Authentication {
		/// Human-readable summary.
		message: String,
		/// Upstream HTTP status code, when a response was received.
		status: Option<u16>,
		/// Low-level cause kept for diagnostics.
		#[source]
		source: Option<TransportError>,
	},
	/// A business endpoint call failed after retries were exhausted or on a fatal status.
	#[error("{message}")]
	Api {
		/// Human-readable summary.
		message: String,
		/// Upstream HTTP status code, when a response was received.
		status: Option<u16>,
		/// Low-level cause kept for diagnostics.
		#[source]
		source: Option<TransportError>,
	},
}
impl Error {
	/// Wraps a token endpoint failure.
	pub fn authentication(cause: TransportError) -> Self {
		Self::Authentication {
			message: format!("Authentication failed: {}", cause.detail()),
			status: cause.status(),
			source: Some(cause),
		}
	}

	/// Builds an authentication error that has no transport-level cause.
	pub fn authentication_message(message: impl Into<String>) -> Self {
		Self::Authentication { message: message.into(), status: None, source: None }
	}

	/// Wraps a business endpoint failure for the given operation.
	pub fn api(operation: Operation, cause: TransportError) -> Self {
		Self::Api {
			message: format!("Failed to {}: {}", operation.description(), cause.detail()),
			status: cause.status(),
			source: Some(cause),
		}
	}

	/// Returns the upstream HTTP status code, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Authentication { status, .. } | Self::Api { status, .. } => *status,
		}
	}

	/// Returns the human-readable message.
	pub fn message(&self) -> &str {
		match self {
			Self::Authentication { message, .. } | Self::Api { message, .. } => message,
		}
	}

	/// Returns the attached low-level cause.
	pub fn cause(&self) -> Option<&TransportError> {
		match self {
			Self::Authentication { source, .. } | Self::Api { source, .. } => source.as_ref(),
		}
	}

	/// Returns `true` for token endpoint failures.
	pub fn is_authentication(&self) -> bool {
		matches!(self, Self::Authentication { .. })
	}

	/// Returns `true` for business endpoint failures.
	pub fn is_api(&self) -> bool {
		matches!(self, Self::Api { .. })
	}
}

/// Low-level failure produced while executing or decoding one HTTP exchange.
#[derive(Clone, Debug, ThisError)]
pub enum TransportError {
	/// No response was received (connection refused, reset, DNS failure).
	#[error("Network error occurred while calling the Keez API.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: SharedError,
	},
	/// The per-call timeout elapsed before a response arrived.
	#[error("Request to the Keez API timed out.")]
	Timeout {
		/// Transport-specific timeout error, when the transport provides one.
		#[source]
		source: Option<SharedError>,
	},
	/// A response was received with a non-success status code.
	#[error("Keez API responded with HTTP {status}.")]
	Status {
		/// HTTP status code.
		status: u16,
		/// Response body decoded lossily as UTF-8.
		body: String,
	},
	/// The request could not be built or dispatched by the transport.
	#[error("Request could not be constructed: {message}.")]
	InvalidRequest {
		/// Description of what was invalid.
		message: String,
	},
	/// A successful response carried a body that does not match the expected shape.
	#[error("Response body could not be decoded.")]
	Decode {
		/// Structured parsing failure including the failing JSON path.
		#[source]
		source: Arc<serde_path_to_error::Error<serde_json::Error>>,
		/// HTTP status code of the decoded response.
		status: Option<u16>,
	},
	/// The token endpoint answered with an OAuth error document.
	#[error("Token endpoint returned an OAuth error: {error}.")]
	OAuth {
		/// HTTP status code of the error response, when known.
		status: Option<u16>,
		/// OAuth `error` code.
		error: String,
		/// OAuth `error_description`, if supplied.
		description: Option<String>,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Network { source: Arc::new(src) }
	}

	/// Wraps a transport-specific timeout error.
	pub fn timeout(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::Timeout { source: Some(Arc::new(src)) }
	}

	/// Builds an [`TransportError::InvalidRequest`] from any displayable value.
	pub fn invalid_request(message: impl Display) -> Self {
		Self::InvalidRequest { message: message.to_string() }
	}

	/// Returns the HTTP status code attached to the failure, if a response was received.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			Self::Decode { status, .. } | Self::OAuth { status, .. } => *status,
			_ => None,
		}
	}

	/// Returns `true` when re-issuing the identical request may succeed.
	///
	/// Failures without a response (network, timeout) and the status codes in
	/// [`RETRYABLE_STATUS_CODES`](crate::http::retry::RETRYABLE_STATUS_CODES) qualify.
	pub fn is_retryable(&self) -> bool {
		match self {
			Self::Network { .. } | Self::Timeout { .. } => true,
			Self::Status { status, .. } => crate::http::retry::is_retryable_status(*status),
			_ => false,
		}
	}

	/// Short description used in facade error messages.
	///
	/// Prefers the upstream `Message` field of a JSON error body, then the raw body, then the
	/// error's own display string.
	pub fn detail(&self) -> String {
		match self {
			Self::Status { body, .. } if !body.trim().is_empty() => upstream_message(body)
				.unwrap_or_else(|| truncate_preview(body.trim().to_owned())),
			Self::OAuth { error, description: Some(description), .. } =>
				format!("{error}: {description}"),
			Self::Decode { source, .. } => format!("{self} ({source})"),
			_ => self.to_string(),
		}
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() {
			Self::timeout(e)
		} else if e.is_builder() {
			Self::invalid_request(e)
		} else {
			Self::network(e)
		}
	}
}

/// Construction-time failures raised while validating [`ClientConfig`](crate::config::ClientConfig)
/// or building the HTTP transport.
#[derive(Clone, Debug, ThisError)]
pub enum ConfigError {
	/// An identifier failed validation.
	#[error(transparent)]
	Identifier(#[from] crate::auth::IdentifierError),
	/// The shared secret was empty.
	#[error("Client secret cannot be empty.")]
	EmptySecret,
	/// A host domain cannot serve as a base URL.
	#[error("The {mode} domain must be an absolute HTTP(S) base URL: {url}.")]
	InvalidDomain {
		/// Host mode label whose domain failed validation.
		mode: &'static str,
		/// Offending URL.
		url: String,
	},
	/// A timeout or delay was configured as zero.
	#[error("The {setting} setting must be greater than zero.")]
	ZeroDuration {
		/// Setting that failed validation.
		setting: &'static str,
	},
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: SharedError,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + StdError) -> Self {
		Self::HttpClientBuild { source: Arc::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

fn upstream_message(body: &str) -> Option<String> {
	let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
	let message = value.get("Message").or_else(|| value.get("message"))?.as_str()?;

	Some(message.to_owned())
}

fn truncate_preview(body: String) -> String {
	if body.chars().count() <= DETAIL_PREVIEW_LIMIT {
		return body;
	}

	let mut buf = body.chars().take(DETAIL_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	buf
}
