//! Renewal credential exchange and backend sign-out.
//!
//! [`RenewalClient::renew`] performs the single round-trip that gates every bootstrap
//! cycle. It never retries and never touches storage; clearing or rotating the stored
//! credential is the orchestrator's job.

// self
use crate::{
	_prelude::*,
	auth::{CredentialSecret, DeviceId, UserProfile},
	backend::{BackendClient, RefreshResponse},
	error::RenewalError,
	http::BackendTransport,
	obs::{self, StageKind, StageOutcome, StageSpan},
	session::Session,
};

/// Result of a successful renewal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Renewal {
	/// Short-lived access credential.
	pub access_credential: CredentialSecret,
	/// Authenticated user.
	pub profile: UserProfile,
	/// Renewal credential to persist; rotated when the backend issued a new one.
	pub credential: CredentialSecret,
}
impl Renewal {
	/// Returns `true` when the backend issued a credential different from `presented`.
	pub fn rotated(&self, presented: &CredentialSecret) -> bool {
		self.credential != *presented
	}

	/// Builds the authenticated session carried by this renewal.
	pub fn session(&self) -> Session {
		Session::authenticated(self.access_credential.clone(), self.profile.clone())
	}
}

/// Exchanges renewal credentials for sessions.
pub struct RenewalClient<T>
where
	T: ?Sized + BackendTransport,
{
	backend: BackendClient<T>,
}
impl<T> RenewalClient<T>
where
	T: ?Sized + BackendTransport,
{
	/// Creates a renewal client over `backend`.
	pub fn new(backend: BackendClient<T>) -> Self {
		Self { backend }
	}

	/// Exchanges `credential` for an access credential, profile, and (possibly rotated)
	/// renewal credential.
	///
	/// Callers must not invoke this with an empty credential. A response without
	/// `refreshToken` keeps `credential`; one without `accessToken` or `user` fails with
	/// [`RenewalError::MissingField`].
	pub async fn renew(&self, credential: &CredentialSecret) -> Result<Renewal, RenewalError> {
		const KIND: StageKind = StageKind::Renewal;

		let span = StageSpan::new(KIND, "renew");

		obs::record_stage_outcome(KIND, StageOutcome::Attempt);

		let result = span
			.instrument(async move {
				let response = self.backend.refresh(credential).await?;

				interpret(response, credential)
			})
			.await;

		match &result {
			Ok(renewal) => {
				obs::renewal_succeeded(
					&credential.fingerprint(),
					&renewal.credential.fingerprint(),
				);
				obs::record_stage_outcome(KIND, StageOutcome::Success);
			},
			Err(e) => {
				obs::renewal_failed(e.kind(), e.status());
				obs::record_stage_outcome(KIND, StageOutcome::Failure);
			},
		}

		result
	}

	/// Revokes `device`'s renewal credential on the backend.
	pub async fn sign_out(
		&self,
		device: &DeviceId,
		access: Option<&CredentialSecret>,
	) -> Result<()> {
		const KIND: StageKind = StageKind::SignOut;

		let span = StageSpan::new(KIND, "sign_out");

		obs::record_stage_outcome(KIND, StageOutcome::Attempt);

		let result = span.instrument(self.backend.logout(device, access)).await;

		obs::record_stage_outcome(
			KIND,
			if result.is_ok() { StageOutcome::Success } else { StageOutcome::Failure },
		);

		result
	}
}
impl<T> Debug for RenewalClient<T>
where
	T: ?Sized + BackendTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("RenewalClient").field("backend", &self.backend).finish()
	}
}

fn interpret(
	response: RefreshResponse,
	presented: &CredentialSecret,
) -> Result<Renewal, RenewalError> {
	let access_credential = response
		.access_token
		.and_then(CredentialSecret::non_empty)
		.ok_or(RenewalError::MissingField { field: "accessToken" })?;
	let profile = response.user.ok_or(RenewalError::MissingField { field: "user" })?;
	// Only a missing or empty value means "not rotated"; anything else is stored verbatim.
	let credential = response
		.refresh_token
		.filter(|rotated| !rotated.is_empty())
		.map(CredentialSecret::new)
		.unwrap_or_else(|| presented.clone());

	Ok(Renewal { access_credential, profile, credential })
}
