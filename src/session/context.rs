//! Single-writer session context with cheap read handles.
//!
//! The orchestrator owns the only [`SessionContext`]; views, gates, and page code receive
//! [`SessionReader`] clones that observe the latest committed state without being able to
//! change it.

// self
use crate::{_prelude::*, course::CourseSelection, session::Session};

type SharedState = Arc<RwLock<SessionState>>;

/// Snapshot of everything the session bootstrap exposes to readers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
	/// Authentication state.
	pub session: Session,
	/// Active course, if one was resolved or selected.
	pub course: Option<CourseSelection>,
}

/// Writable session context. Mutators are crate-private so only the orchestrator writes.
#[derive(Debug, Default)]
pub struct SessionContext {
	state: SharedState,
}
impl SessionContext {
	/// Creates an empty, signed-out context.
	pub fn new() -> Self {
		Self::default()
	}

	/// Returns a read-only handle sharing this context's state.
	pub fn reader(&self) -> SessionReader {
		SessionReader { state: self.state.clone() }
	}

	/// Returns a copy of the committed state.
	pub fn snapshot(&self) -> SessionState {
		self.state.read().clone()
	}

	/// Current course selection.
	pub fn course(&self) -> Option<CourseSelection> {
		self.state.read().course.clone()
	}

	/// Commits a session and course together so readers never see them out of sync.
	pub(crate) fn commit(&self, session: Session, course: Option<CourseSelection>) {
		*self.state.write() = SessionState { session, course };
	}

	pub(crate) fn set_course(&self, course: Option<CourseSelection>) {
		self.state.write().course = course;
	}

	/// Drops the session and the course selection.
	pub(crate) fn clear(&self) {
		self.commit(Session::empty(), None);
	}
}

/// Cloneable read-only view of a [`SessionContext`].
#[derive(Clone, Debug)]
pub struct SessionReader {
	state: SharedState,
}
impl SessionReader {
	/// Returns a copy of the committed state.
	pub fn snapshot(&self) -> SessionState {
		self.state.read().clone()
	}

	/// Current session.
	pub fn session(&self) -> Session {
		self.state.read().session.clone()
	}

	/// Current course selection.
	pub fn course(&self) -> Option<CourseSelection> {
		self.state.read().course.clone()
	}

	/// Returns `true` when the committed session holds an access credential.
	pub fn is_authenticated(&self) -> bool {
		self.state.read().session.is_authenticated()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::auth::{CourseId, CredentialSecret, UserId, UserProfile};

	#[test]
	fn readers_observe_commits() {
		let context = SessionContext::new();
		let reader = context.reader();

		assert!(!reader.is_authenticated());
		assert_eq!(reader.course(), None);

		let profile =
			UserProfile::new(UserId::new("u1").expect("User fixture should be valid."), "STUDENT", "s");
		let course = CourseSelection::new(CourseId::new("c1").expect("Course fixture should be valid."));

		context.commit(
			Session::authenticated(CredentialSecret::new("access-1"), profile),
			Some(course.clone()),
		);

		assert!(reader.is_authenticated());
		assert_eq!(reader.course(), Some(course));
		assert_eq!(reader.snapshot(), context.snapshot());

		context.set_course(None);

		assert_eq!(reader.course(), None);
		assert!(reader.is_authenticated());

		context.clear();

		assert_eq!(reader.snapshot(), SessionState::default());
	}
}
