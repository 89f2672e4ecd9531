//! Typed calls against the LMS REST backend.
//!
//! [`BackendClient`] pairs a [`BackendDescriptor`] with a [`BackendTransport`] and owns the
//! status classification for every endpoint the session bootstrap consumes. Callers see
//! typed payloads or crate errors; raw HTTP never leaks past this module.

pub mod descriptor;
pub mod wire;

pub use descriptor::*;
pub use wire::{CourseSummary, Enrollment, RefreshResponse};

// self
use crate::{
	_prelude::*,
	auth::{CredentialSecret, DeviceId, UserId},
	backend::wire::{EnrollmentListing, ErrorPayload, LogoutRequest, RefreshRequest},
	error::{DecodeError, RenewalError, TransportError},
	http::{BackendRequest, BackendResponse, BackendTransport},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Backend client specialized for the crate's default reqwest transport.
#[cfg(feature = "reqwest")]
pub type ReqwestBackendClient = BackendClient<ReqwestTransport>;

/// Typed client for the backend endpoints used by the session bootstrap.
pub struct BackendClient<T>
where
	T: ?Sized + BackendTransport,
{
	descriptor: BackendDescriptor,
	transport: Arc<T>,
}
impl<T> BackendClient<T>
where
	T: ?Sized + BackendTransport,
{
	const ENDPOINT_ENROLLMENTS: &'static str = "course-enrollment/courses";
	const ENDPOINT_LOGOUT: &'static str = "auth/logout";

	/// Creates a client that reuses the caller-provided transport.
	pub fn with_transport(descriptor: BackendDescriptor, transport: impl Into<Arc<T>>) -> Self {
		Self { descriptor, transport: transport.into() }
	}

	/// Descriptor the client resolves endpoints against.
	pub fn descriptor(&self) -> &BackendDescriptor {
		&self.descriptor
	}

	/// `POST auth/refresh`: exchanges a renewal credential for a session payload.
	///
	/// Statuses that say the credential itself is bad (400, 401, 403, 404, 410) map to
	/// [`RenewalError::Rejected`]; every other non-2xx status maps to
	/// [`RenewalError::Upstream`]. Nothing is retried.
	pub async fn refresh(
		&self,
		credential: &CredentialSecret,
	) -> Result<RefreshResponse, RenewalError> {
		let url = self.descriptor.endpoint(["auth", "refresh"]);
		let request =
			BackendRequest::post_json(url, &RefreshRequest { refresh_token: credential.expose() })
				.map_err(|e| RenewalError::Transport(TransportError::network(e)))?;
		let response = self.transport.send(request).await?;

		if !response.is_success() {
			return Err(classify_refresh_failure(response));
		}

		decode(&response.body)
			.map_err(|source| RenewalError::MalformedResponse { status: response.status, source })
	}

	/// `GET course-enrollment/courses/{userId}`: returns the first enrollment in backend order.
	///
	/// The backend's first entry is authoritative, so later entries are neither decoded nor
	/// validated.
	pub async fn first_enrollment(
		&self,
		user: &UserId,
		access: Option<&CredentialSecret>,
	) -> Result<Option<Enrollment>> {
		let url = self.descriptor.endpoint(["course-enrollment", "courses", user.as_ref()]);
		let response = self.transport.send(BackendRequest::get(url).with_bearer(access)).await?;

		ensure_success(Self::ENDPOINT_ENROLLMENTS, &response)?;

		decode::<EnrollmentListing>(&response.body)
			.map(|listing| listing.first)
			.map_err(|source| Error::Decode { endpoint: Self::ENDPOINT_ENROLLMENTS, source })
	}

	/// `POST auth/logout`: revokes the device's renewal credential server-side.
	pub async fn logout(&self, device: &DeviceId, access: Option<&CredentialSecret>) -> Result<()> {
		let url = self.descriptor.endpoint(["auth", "logout"]);
		let request = BackendRequest::post_json(url, &LogoutRequest { device_id: device })
			.map_err(TransportError::network)?
			.with_bearer(access);
		let response = self.transport.send(request).await?;

		ensure_success(Self::ENDPOINT_LOGOUT, &response)
	}
}
#[cfg(feature = "reqwest")]
impl BackendClient<ReqwestTransport> {
	/// Creates a client that provisions its own reqwest transport.
	pub fn new(descriptor: BackendDescriptor) -> Self {
		Self::with_transport(descriptor, ReqwestTransport::default())
	}
}
impl<T> Clone for BackendClient<T>
where
	T: ?Sized + BackendTransport,
{
	fn clone(&self) -> Self {
		Self { descriptor: self.descriptor.clone(), transport: self.transport.clone() }
	}
}
impl<T> Debug for BackendClient<T>
where
	T: ?Sized + BackendTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("BackendClient").field("base_url", &self.descriptor.base_url().as_str()).finish()
	}
}

fn classify_refresh_failure(response: BackendResponse) -> RenewalError {
	let status = response.status;
	let message = ErrorPayload::preview(&response.body);

	match status {
		400 | 401 | 403 | 404 | 410 => RenewalError::Rejected { status, message },
		_ => RenewalError::Upstream { status, message, retry_after: response.metadata.retry_after },
	}
}

fn ensure_success(endpoint: &'static str, response: &BackendResponse) -> Result<()> {
	if response.is_success() {
		return Ok(());
	}

	Err(Error::Backend {
		endpoint,
		status: response.status,
		message: ErrorPayload::preview(&response.body),
	})
}

fn decode<D>(body: &[u8]) -> Result<D, DecodeError>
where
	D: for<'de> Deserialize<'de>,
{
	let mut deserializer = serde_json::Deserializer::from_slice(body);

	serde_path_to_error::deserialize(&mut deserializer)
}
