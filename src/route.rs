//! Table-driven route classification.
//!
//! Every navigation path lands in exactly one [`RouteClass`]. Rules are grouped per class and
//! the groups are checked in table order, so a path matching several groups takes the first.
//! Matching is case-sensitive and ignores any query string or fragment.

// self
use crate::_prelude::*;

/// Layout/access category of a navigation path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteClass {
	/// Landing, auth, enrollment-request, and admin-console pages.
	Public,
	/// Course-scoped dashboard pages.
	Dashboard,
	/// Content authoring pages restricted to staff roles.
	AdminCreate,
	/// The signed-in user's profile pages.
	Profile,
	/// Any other path; rendered without a gate.
	Unclassified,
}
impl RouteClass {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			RouteClass::Public => "public",
			RouteClass::Dashboard => "dashboard",
			RouteClass::AdminCreate => "admin_create",
			RouteClass::Profile => "profile",
			RouteClass::Unclassified => "unclassified",
		}
	}

	/// Returns `true` when the route's content depends on the active course.
	pub const fn is_course_sensitive(self) -> bool {
		matches!(self, RouteClass::Dashboard)
	}

	/// Returns `true` when the gate requires a signed-in session.
	pub const fn requires_authentication(self) -> bool {
		matches!(self, RouteClass::Dashboard | RouteClass::Profile | RouteClass::AdminCreate)
	}

	/// Shell the view layer wraps the page in.
	pub const fn layout(self) -> Layout {
		match self {
			RouteClass::Public => Layout::Landing,
			RouteClass::Dashboard | RouteClass::AdminCreate => Layout::Dashboard,
			RouteClass::Profile | RouteClass::Unclassified => Layout::Bare,
		}
	}
}
impl Display for RouteClass {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Page shell hint derived from a [`RouteClass`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layout {
	/// Header and footer.
	Landing,
	/// Sidebar application shell.
	Dashboard,
	/// No surrounding chrome.
	Bare,
}

#[derive(Clone, Copy, Debug)]
enum Rule {
	Exact(&'static str),
	Prefix(&'static str),
}
impl Rule {
	fn matches(self, path: &str) -> bool {
		match self {
			Rule::Exact(expected) => path == expected,
			Rule::Prefix(prefix) => path.starts_with(prefix),
		}
	}
}

const RULES: &[(RouteClass, &[Rule])] = &[
	(
		RouteClass::Public,
		&[
			Rule::Exact("/"),
			Rule::Exact("/Signin"),
			Rule::Exact("/Signup"),
			Rule::Exact("/Request-enroll"),
			Rule::Prefix("/Admin"),
		],
	),
	(RouteClass::Profile, &[Rule::Prefix("/Profile")]),
	(RouteClass::AdminCreate, &[Rule::Prefix("/Create"), Rule::Prefix("/Update")]),
	(
		RouteClass::Dashboard,
		&[
			Rule::Exact("/Dashboard"),
			Rule::Exact("/Courses"),
			Rule::Exact("/Classes"),
			Rule::Exact("/Notes"),
			Rule::Exact("/Assignments"),
			Rule::Exact("/Attachments"),
			Rule::Prefix("/Classes/"),
		],
	),
];

/// Classifies a navigation path.
pub fn classify(path: &str) -> RouteClass {
	let path = strip_query(path);

	RULES
		.iter()
		.find(|(_, rules)| rules.iter().any(|rule| rule.matches(path)))
		.map_or(RouteClass::Unclassified, |(class, _)| *class)
}

fn strip_query(path: &str) -> &str {
	path.find(['?', '#']).map_or(path, |end| &path[..end])
}
