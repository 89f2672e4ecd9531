//! LMS roles and case-insensitive role matching.
//!
//! The backend stores roles upper-case (`SUPER_ADMIN`), while parts of the client compare
//! lower-cased strings. [`Role`] parses either spelling into one canonical variant so every
//! comparison in the crate is case-insensitive by construction. Unknown spellings are kept
//! verbatim in [`Role::Other`] and never match a built-in role.

// self
use crate::_prelude::*;

/// Role carried by a user profile.
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
	/// Enrolled learner.
	Student,
	/// Course author and class owner.
	Teacher,
	/// Administrator.
	Admin,
	/// Administrator with tenant-wide rights.
	SuperAdmin,
	/// Unrecognized role string, preserved as received.
	Other(String),
}
impl Role {
	/// Canonical upper-case label as stored by the backend.
	pub fn as_str(&self) -> &str {
		match self {
			Role::Student => "STUDENT",
			Role::Teacher => "TEACHER",
			Role::Admin => "ADMIN",
			Role::SuperAdmin => "SUPER_ADMIN",
			Role::Other(raw) => raw.as_str(),
		}
	}

	/// Parses a role label, ignoring ASCII case and surrounding whitespace.
	pub fn parse(raw: &str) -> Self {
		let trimmed = raw.trim();

		[Role::Student, Role::Teacher, Role::Admin, Role::SuperAdmin]
			.into_iter()
			.find(|role| role.as_str().eq_ignore_ascii_case(trimmed))
			.unwrap_or_else(|| Role::Other(trimmed.to_owned()))
	}

	/// Case-insensitive equality; two unknown roles match when their labels do.
	pub fn matches(&self, other: &Role) -> bool {
		self.as_str().eq_ignore_ascii_case(other.as_str())
	}

	/// Returns `true` for roles allowed to author content (`ADMIN`, `SUPER_ADMIN`, `TEACHER`).
	pub fn is_staff(&self) -> bool {
		matches!(self, Role::Teacher | Role::Admin | Role::SuperAdmin)
	}
}
impl From<String> for Role {
	fn from(value: String) -> Self {
		Self::parse(&value)
	}
}
impl From<&str> for Role {
	fn from(value: &str) -> Self {
		Self::parse(value)
	}
}
impl From<Role> for String {
	fn from(value: Role) -> Self {
		match value {
			Role::Other(raw) => raw,
			known => known.as_str().to_owned(),
		}
	}
}
impl FromStr for Role {
	type Err = std::convert::Infallible;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self::parse(s))
	}
}
impl Debug for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "Role({})", self.as_str())
	}
}
impl Display for Role {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Set of roles that satisfy a requirement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RoleSet(Vec<Role>);
impl RoleSet {
	/// Builds a set from any iterator of role-like values, dropping duplicates.
	pub fn new<I, R>(roles: I) -> Self
	where
		I: IntoIterator<Item = R>,
		R: Into<Role>,
	{
		let mut set = Vec::new();

		for role in roles.into_iter().map(Into::into) {
			if !set.iter().any(|existing: &Role| existing.matches(&role)) {
				set.push(role);
			}
		}

		Self(set)
	}

	/// Roles allowed to reach content-authoring routes.
	pub fn staff() -> Self {
		Self(vec![Role::Admin, Role::SuperAdmin, Role::Teacher])
	}

	/// Returns `true` when no role is required.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Returns `true` when `role` is a member, ignoring case.
	pub fn contains(&self, role: &Role) -> bool {
		self.0.iter().any(|candidate| candidate.matches(role))
	}

	/// Returns `true` when the (optional) role satisfies this set. A missing role never does.
	pub fn matches(&self, role: Option<&Role>) -> bool {
		role.is_some_and(|role| self.contains(role))
	}

	/// Iterates over the member roles.
	pub fn iter(&self) -> impl Iterator<Item = &Role> {
		self.0.iter()
	}
}
impl<R> FromIterator<R> for RoleSet
where
	R: Into<Role>,
{
	fn from_iter<I: IntoIterator<Item = R>>(iter: I) -> Self {
		Self::new(iter)
	}
}
