//! Crate-level error types shared across the store, transport, renewal, and bootstrap layers.

// self
use crate::_prelude::*;

/// Crate-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// JSON decoding failure annotated with the path of the offending field.
pub type DecodeError = serde_path_to_error::Error<serde_json::Error>;

/// Canonical error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Storage-layer failure.
	#[error("{0}")]
	Storage(
		#[from]
		#[source]
		crate::store::StoreError,
	),
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// Transport failure (DNS, TCP, TLS).
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// Session renewal failed.
	#[error(transparent)]
	Renewal(#[from] RenewalError),

	/// Backend answered with a non-2xx status.
	#[error("Backend endpoint `{endpoint}` responded with HTTP {status}.")]
	Backend {
		/// Endpoint label (e.g., `course-enrollment/courses`).
		endpoint: &'static str,
		/// HTTP status code.
		status: u16,
		/// Backend-supplied message preview, when the payload carried one.
		message: Option<String>,
	},
	/// Backend answered 2xx with a payload that does not match the expected shape.
	#[error("Backend endpoint `{endpoint}` returned malformed JSON.")]
	Decode {
		/// Endpoint label.
		endpoint: &'static str,
		/// Structured parsing failure.
		#[source]
		source: DecodeError,
	},
}

/// Configuration and validation failures.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// The backend base URL environment variable is not set.
	#[error("Environment variable `{var}` is not set.")]
	MissingBaseUrl {
		/// Name of the variable that was consulted.
		var: &'static str,
	},
	/// Backend base URL cannot be parsed.
	#[error("Backend base URL is invalid.")]
	InvalidBaseUrl {
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// Backend base URL uses a scheme other than HTTP(S).
	#[error("Backend base URL must use http or https: {url}.")]
	UnsupportedScheme {
		/// URL that failed validation.
		url: String,
	},
	/// Backend base URL cannot carry relative endpoint paths (e.g., `mailto:`).
	#[error("Backend base URL cannot be used as a base: {url}.")]
	CannotBeABase {
		/// URL that failed validation.
		url: String,
	},
	/// Redirect targets must be absolute application paths.
	#[error("Redirect target `{path}` must start with `/`.")]
	InvalidRedirectPath {
		/// Offending path.
		path: String,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error occurred while calling the backend.")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// Request timed out before the backend answered.
	#[error("Request to the backend timed out.")]
	Timeout,
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
#[cfg(feature = "reqwest")]
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout } else { Self::network(e) }
	}
}

/// Coarse category of a [`RenewalError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenewalErrorKind {
	/// Credential is expired, revoked, or unknown to the backend.
	InvalidCredential,
	/// Backend failed for reasons unrelated to the credential.
	Upstream,
	/// Request never produced an HTTP response.
	Network,
	/// Response arrived but could not be interpreted.
	MalformedResponse,
}
impl RenewalErrorKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RenewalErrorKind::InvalidCredential => "invalid_credential",
			RenewalErrorKind::Upstream => "upstream",
			RenewalErrorKind::Network => "network",
			RenewalErrorKind::MalformedResponse => "malformed_response",
		}
	}
}
impl Display for RenewalErrorKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Failure returned by the session renewal exchange. Renewal is never retried.
#[derive(Debug, ThisError)]
pub enum RenewalError {
	/// Backend refused the renewal credential.
	#[error("Backend rejected the renewal credential with HTTP {status}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Backend-supplied message preview.
		message: Option<String>,
	},
	/// Backend failed with a status that says nothing about the credential.
	#[error("Backend could not renew the session (HTTP {status}).")]
	Upstream {
		/// HTTP status code.
		status: u16,
		/// Backend-supplied message preview.
		message: Option<String>,
		/// Retry-After hint from upstream, if supplied.
		retry_after: Option<Duration>,
	},
	/// Transport failure before any HTTP status was observed.
	#[error(transparent)]
	Transport(#[from] TransportError),
	/// 2xx response body is not valid renewal JSON.
	#[error("Renewal response is malformed.")]
	MalformedResponse {
		/// HTTP status code.
		status: u16,
		/// Structured parsing failure.
		#[source]
		source: DecodeError,
	},
	/// 2xx response omitted a mandatory field.
	#[error("Renewal response is missing `{field}`.")]
	MissingField {
		/// Wire name of the missing field.
		field: &'static str,
	},
}
impl RenewalError {
	/// Returns the HTTP status observed for this failure, if any.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Rejected { status, .. }
			| Self::Upstream { status, .. }
			| Self::MalformedResponse { status, .. } => Some(*status),
			Self::Transport(_) | Self::MissingField { .. } => None,
		}
	}

	/// Returns the coarse failure category.
	pub fn kind(&self) -> RenewalErrorKind {
		match self {
			Self::Rejected { .. } => RenewalErrorKind::InvalidCredential,
			Self::Upstream { .. } => RenewalErrorKind::Upstream,
			Self::Transport(_) => RenewalErrorKind::Network,
			Self::MalformedResponse { .. } | Self::MissingField { .. } =>
				RenewalErrorKind::MalformedResponse,
		}
	}
}
