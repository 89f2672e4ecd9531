//! Access decisions for classified routes.

// self
use crate::{_prelude::*, auth::RoleSet, error::ConfigError, route::RouteClass, session::Session};

const SIGNIN_PATH: &str = "/Signin";
const DASHBOARD_PATH: &str = "/Dashboard";

/// Outcome of gating one navigation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
	/// Whether the page may render.
	pub allow: bool,
	/// Where to navigate instead; set exactly when `allow` is `false`.
	pub redirect_to: Option<String>,
}
impl AccessDecision {
	/// Lets the page render.
	pub fn allow() -> Self {
		Self { allow: true, redirect_to: None }
	}

	/// Sends the user to `path` instead.
	pub fn redirect(path: impl Into<String>) -> Self {
		Self { allow: false, redirect_to: Some(path.into()) }
	}
}

/// Decides access with the default redirect targets.
///
/// `required_roles` only applies to [`RouteClass::AdminCreate`]; role comparison ignores
/// case and a role outside the set, including an unknown one, is denied.
pub fn decide(class: RouteClass, session: &Session, required_roles: &RoleSet) -> AccessDecision {
	gate(class, session, required_roles, SIGNIN_PATH, DASHBOARD_PATH)
}

/// Redirect targets and role requirements applied by the gate.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessPolicy {
	signin_path: String,
	dashboard_path: String,
	staff_roles: RoleSet,
}
impl AccessPolicy {
	/// Overrides where signed-out users are sent.
	pub fn with_signin_path(mut self, path: impl Into<String>) -> Result<Self, ConfigError> {
		self.signin_path = validate_path(path.into())?;

		Ok(self)
	}

	/// Overrides where signed-in users lacking a role are sent.
	pub fn with_dashboard_path(mut self, path: impl Into<String>) -> Result<Self, ConfigError> {
		self.dashboard_path = validate_path(path.into())?;

		Ok(self)
	}

	/// Overrides the roles allowed on authoring routes.
	pub fn with_staff_roles(mut self, roles: RoleSet) -> Self {
		self.staff_roles = roles;

		self
	}

	/// Sign-in redirect target.
	pub fn signin_path(&self) -> &str {
		&self.signin_path
	}

	/// Missing-role redirect target.
	pub fn dashboard_path(&self) -> &str {
		&self.dashboard_path
	}

	/// Roles allowed on authoring routes.
	pub fn staff_roles(&self) -> &RoleSet {
		&self.staff_roles
	}

	/// Decides access for `class` under this policy.
	pub fn decide(&self, class: RouteClass, session: &Session) -> AccessDecision {
		gate(class, session, &self.staff_roles, &self.signin_path, &self.dashboard_path)
	}
}
impl Default for AccessPolicy {
	fn default() -> Self {
		Self {
			signin_path: SIGNIN_PATH.into(),
			dashboard_path: DASHBOARD_PATH.into(),
			staff_roles: RoleSet::staff(),
		}
	}
}

fn gate(
	class: RouteClass,
	session: &Session,
	required_roles: &RoleSet,
	signin_path: &str,
	dashboard_path: &str,
) -> AccessDecision {
	if !class.requires_authentication() {
		return AccessDecision::allow();
	}
	if !session.is_authenticated() {
		return AccessDecision::redirect(signin_path);
	}
	if class == RouteClass::AdminCreate && !required_roles.matches(session.role()) {
		return AccessDecision::redirect(dashboard_path);
	}

	AccessDecision::allow()
}

fn validate_path(path: String) -> Result<String, ConfigError> {
	if path.starts_with('/') { Ok(path) } else { Err(ConfigError::InvalidRedirectPath { path }) }
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::{CredentialSecret, Role, UserId, UserProfile};

	fn session_with_role(role: &str) -> Session {
		let profile =
			UserProfile::new(UserId::new("u1").expect("User fixture should be valid."), role, "user");

		Session::authenticated(CredentialSecret::new("access-1"), profile)
	}

	#[test]
	fn open_classes_always_allow() {
		for class in [RouteClass::Public, RouteClass::Unclassified] {
			assert_eq!(decide(class, &Session::empty(), &RoleSet::staff()), AccessDecision::allow());
		}
	}

	#[test]
	fn signed_out_users_go_to_signin() {
		for class in [RouteClass::Dashboard, RouteClass::Profile, RouteClass::AdminCreate] {
			assert_eq!(
				decide(class, &Session::empty(), &RoleSet::staff()),
				AccessDecision::redirect("/Signin")
			);
		}
	}

	#[test]
	fn authoring_routes_check_roles_case_insensitively() {
		let staff = RoleSet::staff();

		assert_eq!(
			decide(RouteClass::AdminCreate, &session_with_role("student"), &staff),
			AccessDecision::redirect("/Dashboard")
		);

		for role in ["TEACHER", "teacher", "Admin", "super_admin"] {
			assert_eq!(
				decide(RouteClass::AdminCreate, &session_with_role(role), &staff),
				AccessDecision::allow(),
				"{role}"
			);
		}

		assert_eq!(
			decide(RouteClass::AdminCreate, &session_with_role("OWNER"), &staff),
			AccessDecision::redirect("/Dashboard")
		);
		assert_eq!(
			decide(RouteClass::Dashboard, &session_with_role("student"), &staff),
			AccessDecision::allow()
		);
	}

	#[test]
	fn policy_overrides_targets_and_roles() {
		let policy = AccessPolicy::default()
			.with_signin_path("/Login")
			.expect("Absolute path should be accepted.")
			.with_dashboard_path("/Home")
			.expect("Absolute path should be accepted.")
			.with_staff_roles(RoleSet::new([Role::SuperAdmin]));

		assert_eq!(
			policy.decide(RouteClass::Profile, &Session::empty()),
			AccessDecision::redirect("/Login")
		);
		assert_eq!(
			policy.decide(RouteClass::AdminCreate, &session_with_role("TEACHER")),
			AccessDecision::redirect("/Home")
		);
		assert!(matches!(
			AccessPolicy::default().with_signin_path("Signin"),
			Err(ConfigError::InvalidRedirectPath { .. })
		));
	}
}
