//! Transport primitives for backend calls.
//!
//! [`BackendTransport`] is the crate's only dependency on an HTTP stack. The bootstrap hands
//! it fully-formed [`BackendRequest`]s and interprets the returned [`BackendResponse`]
//! itself, so a browser `fetch` bridge, a test double, or the bundled
//! [`ReqwestTransport`] can all be plugged in without touching the session logic.

// std
#[cfg(feature = "reqwest")] use std::ops::Deref;
// crates.io
#[cfg(feature = "reqwest")]
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, RETRY_AFTER};
#[cfg(feature = "reqwest")] use time::format_description::well_known::Rfc2822;
// self
use crate::{_prelude::*, auth::CredentialSecret, error::TransportError};

/// Boxed future returned by [`BackendTransport::send`].
pub type TransportFuture<'a> =
	Pin<Box<dyn Future<Output = Result<BackendResponse, TransportError>> + 'a + Send>>;

/// HTTP transport able to execute a single JSON request.
///
/// Implementations must not retry and must not follow redirects; every non-network outcome,
/// including 4xx/5xx, is returned as a [`BackendResponse`].
pub trait BackendTransport
where
	Self: 'static + Send + Sync,
{
	/// Sends `request` and resolves once the full response body is available.
	fn send(&self, request: BackendRequest) -> TransportFuture<'_>;
}

/// HTTP method subset used by the backend API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
	/// `GET`.
	Get,
	/// `POST`.
	Post,
}
impl Method {
	/// Upper-case method name.
	pub const fn as_str(self) -> &'static str {
		match self {
			Method::Get => "GET",
			Method::Post => "POST",
		}
	}
}

/// Request handed to a [`BackendTransport`].
#[derive(Clone, Debug)]
pub struct BackendRequest {
	/// HTTP method.
	pub method: Method,
	/// Absolute endpoint URL.
	pub url: Url,
	/// JSON body, if any.
	pub body: Option<Vec<u8>>,
	/// Access credential sent as a bearer token, if any.
	pub bearer: Option<CredentialSecret>,
}
impl BackendRequest {
	/// Creates a `GET` request.
	pub fn get(url: Url) -> Self {
		Self { method: Method::Get, url, body: None, bearer: None }
	}

	/// Creates a `POST` request carrying `body` serialized as JSON.
	pub fn post_json<T>(url: Url, body: &T) -> Result<Self, serde_json::Error>
	where
		T: ?Sized + Serialize,
	{
		Ok(Self { method: Method::Post, url, body: Some(serde_json::to_vec(body)?), bearer: None })
	}

	/// Attaches a bearer credential.
	pub fn with_bearer(mut self, bearer: Option<&CredentialSecret>) -> Self {
		self.bearer = bearer.cloned();

		self
	}
}

/// Metadata captured from a backend response for downstream error mapping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ResponseMetadata {
	/// Retry-After hint expressed as a relative duration.
	pub retry_after: Option<Duration>,
}

/// Response returned by a [`BackendTransport`].
#[derive(Clone, Debug)]
pub struct BackendResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw response body.
	pub body: Vec<u8>,
	/// Additional response metadata.
	pub metadata: ResponseMetadata,
}
impl BackendResponse {
	/// Creates a response with empty metadata.
	pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
		Self { status, body: body.into(), metadata: ResponseMetadata::default() }
	}

	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
/// Backend calls should not follow redirects; configure any custom [`ReqwestClient`]
/// accordingly before wrapping it.
#[cfg(feature = "reqwest")]
#[derive(Clone, Default)]
pub struct ReqwestTransport(pub ReqwestClient);
#[cfg(feature = "reqwest")]
impl ReqwestTransport {
	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self(client)
	}

	async fn execute(
		client: ReqwestClient,
		request: BackendRequest,
	) -> Result<BackendResponse, TransportError> {
		let method = match request.method {
			Method::Get => reqwest::Method::GET,
			Method::Post => reqwest::Method::POST,
		};
		let mut builder = client.request(method, request.url);

		if let Some(body) = request.body {
			builder = builder.header(CONTENT_TYPE, "application/json").body(body);
		}
		if let Some(bearer) = request.bearer.as_ref() {
			builder = builder.header(AUTHORIZATION, format!("Bearer {}", bearer.expose()));
		}

		let response = builder.send().await?;
		let status = response.status().as_u16();
		let retry_after = parse_retry_after(response.headers());
		let body = response.bytes().await?.to_vec();

		Ok(BackendResponse { status, body, metadata: ResponseMetadata { retry_after } })
	}
}
#[cfg(feature = "reqwest")]
impl AsRef<ReqwestClient> for ReqwestTransport {
	fn as_ref(&self) -> &ReqwestClient {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Deref for ReqwestTransport {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}
#[cfg(feature = "reqwest")]
impl Debug for ReqwestTransport {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("ReqwestTransport(..)")
	}
}
#[cfg(feature = "reqwest")]
impl BackendTransport for ReqwestTransport {
	fn send(&self, request: BackendRequest) -> TransportFuture<'_> {
		let client = self.0.clone();

		Box::pin(Self::execute(client, request))
	}
}

#[cfg(feature = "reqwest")]
fn parse_retry_after(headers: &HeaderMap) -> Option<Duration> {
	let value = headers.get(RETRY_AFTER)?;
	let raw = value.to_str().ok()?.trim();

	if let Ok(secs) = raw.parse::<u64>() {
		return Some(Duration::seconds(i64::try_from(secs).unwrap_or(i64::MAX)));
	}
	if let Ok(moment) = OffsetDateTime::parse(raw, &Rfc2822) {
		let delta = moment - OffsetDateTime::now_utc();

		if delta.is_positive() {
			return Some(delta);
		}
	}

	None
}

#[cfg(all(test, feature = "reqwest"))]
mod tests {
	// crates.io
	use httpmock::prelude::*;
	use reqwest::header::HeaderValue;
	// self
	use super::*;

	#[test]
	fn retry_after_accepts_seconds_and_ignores_garbage() {
		let mut headers = HeaderMap::new();

		headers.insert(RETRY_AFTER, HeaderValue::from_static("120"));

		assert_eq!(parse_retry_after(&headers), Some(Duration::seconds(120)));

		headers.insert(RETRY_AFTER, HeaderValue::from_static("soon"));

		assert_eq!(parse_retry_after(&headers), None);
		assert_eq!(parse_retry_after(&HeaderMap::new()), None);
	}

	#[tokio::test]
	async fn reqwest_transport_sends_json_and_bearer() {
		let server = MockServer::start_async().await;
		let mock = server
			.mock_async(|when, then| {
				when.method(POST)
					.path("/echo")
					.header("content-type", "application/json")
					.header("authorization", "Bearer access-1")
					.json_body(serde_json::json!({ "hello": "world" }));
				then.status(418).header("retry-after", "7").body("teapot");
			})
			.await;
		let url = Url::parse(&server.url("/echo")).expect("Mock URL should parse.");
		let request = BackendRequest::post_json(url, &serde_json::json!({ "hello": "world" }))
			.expect("Body should serialize.")
			.with_bearer(Some(&CredentialSecret::new("access-1")));
		let response = ReqwestTransport::default()
			.send(request)
			.await
			.expect("Non-2xx responses must not be transport errors.");

		mock.assert_async().await;

		assert_eq!(response.status, 418);
		assert!(!response.is_success());
		assert_eq!(response.body, b"teapot");
		assert_eq!(response.metadata.retry_after, Some(Duration::seconds(7)));
	}
}
