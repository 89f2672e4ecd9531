//! Validated backend location.

// std
use std::env;
// self
use crate::{_prelude::*, error::ConfigError};

/// Environment variable consulted by [`BackendDescriptor::from_env`].
pub const BACKEND_URL_ENV: &str = "LMS_BACKEND_URL";

/// Base URL every backend endpoint is resolved against.
///
/// The URL always ends with `/`, so `auth/refresh` resolves below the configured path
/// rather than replacing its last segment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendDescriptor {
	base_url: Url,
}
impl BackendDescriptor {
	/// Validates `base_url` and normalizes its trailing slash.
	pub fn new(mut base_url: Url) -> Result<Self, ConfigError> {
		if !matches!(base_url.scheme(), "http" | "https") {
			return Err(ConfigError::UnsupportedScheme { url: base_url.to_string() });
		}
		if base_url.cannot_be_a_base() {
			return Err(ConfigError::CannotBeABase { url: base_url.to_string() });
		}
		if !base_url.path().ends_with('/') {
			let path = format!("{}/", base_url.path());

			base_url.set_path(&path);
		}

		base_url.set_query(None);
		base_url.set_fragment(None);

		Ok(Self { base_url })
	}

	/// Parses and validates a base URL string.
	pub fn parse(raw: &str) -> Result<Self, ConfigError> {
		let url = Url::parse(raw.trim()).map_err(|source| ConfigError::InvalidBaseUrl { source })?;

		Self::new(url)
	}

	/// Reads the base URL from [`BACKEND_URL_ENV`].
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_env_var(BACKEND_URL_ENV)
	}

	/// Reads the base URL from the named environment variable.
	pub fn from_env_var(var: &'static str) -> Result<Self, ConfigError> {
		let raw = env::var(var)
			.ok()
			.filter(|value| !value.trim().is_empty())
			.ok_or(ConfigError::MissingBaseUrl { var })?;

		Self::parse(&raw)
	}

	/// Normalized base URL.
	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// Resolves an endpoint below the base URL; each segment is percent-encoded.
	pub fn endpoint<I, S>(&self, segments: I) -> Url
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let mut url = self.base_url.clone();

		// `new` rejects cannot-be-a-base URLs, so the segment view is always available.
		if let Ok(mut path) = url.path_segments_mut() {
			path.pop_if_empty().extend(segments);
		}

		url
	}
}
