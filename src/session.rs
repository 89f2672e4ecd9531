//! In-memory session state and the renewal exchange that populates it.

pub mod context;
pub mod renewal;

pub use context::*;
pub use renewal::*;

// self
use crate::{
	_prelude::*,
	auth::{CredentialSecret, Role, UserProfile},
};

/// Authentication state held for the lifetime of one application run.
///
/// A session is authenticated exactly when it holds an access credential; the profile only
/// travels alongside it. Sessions are never persisted, the stored renewal credential is
/// their durable proxy.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Session {
	access_credential: Option<CredentialSecret>,
	profile: Option<UserProfile>,
}
impl Session {
	/// Signed-out session.
	pub fn empty() -> Self {
		Self::default()
	}

	/// Session backed by a freshly issued access credential.
	pub fn authenticated(access_credential: CredentialSecret, profile: UserProfile) -> Self {
		Self { access_credential: Some(access_credential), profile: Some(profile) }
	}

	/// Returns `true` when an access credential is held.
	pub fn is_authenticated(&self) -> bool {
		self.access_credential.is_some()
	}

	/// Access credential for authenticated backend calls.
	pub fn access_credential(&self) -> Option<&CredentialSecret> {
		self.access_credential.as_ref()
	}

	/// Profile of the signed-in user.
	pub fn profile(&self) -> Option<&UserProfile> {
		self.profile.as_ref()
	}

	/// Role of the signed-in user.
	pub fn role(&self) -> Option<&Role> {
		self.profile.as_ref().map(|profile| &profile.role)
	}
}
