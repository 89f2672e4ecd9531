//! Authenticated user profile returned by the renewal endpoint.

// self
use crate::{
	_prelude::*,
	auth::{Role, UserId},
};

/// Profile of the signed-in user.
///
/// Only `id`, `role`, and `username` are required; every other field the backend sends is
/// either captured as an optional extra or ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
	/// Backend user identifier (`id`, or `_id` on older payloads).
	#[serde(alias = "_id")]
	pub id: UserId,
	/// Role used for access decisions.
	pub role: Role,
	/// Public handle.
	pub username: String,
	/// Contact email, when included.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub email: Option<String>,
	/// Display name, when included.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,
}
impl UserProfile {
	/// Creates a profile with the required fields.
	pub fn new(id: UserId, role: impl Into<Role>, username: impl Into<String>) -> Self {
		Self { id, role: role.into(), username: username.into(), email: None, name: None }
	}

	/// Returns `true` when the profile's role matches any of `required`, ignoring case.
	pub fn has_role(&self, required: &[Role]) -> bool {
		required.iter().any(|role| role.matches(&self.role))
	}

	/// Returns `true` for `ADMIN` profiles.
	pub fn is_admin(&self) -> bool {
		self.has_role(&[Role::Admin])
	}

	/// Returns `true` for `TEACHER` profiles.
	pub fn is_teacher(&self) -> bool {
		self.has_role(&[Role::Teacher])
	}

	/// Returns `true` for `STUDENT` profiles.
	pub fn is_student(&self) -> bool {
		self.has_role(&[Role::Student])
	}
}
