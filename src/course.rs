//! Active course resolution for course-sensitive routes.
//!
//! [`CourseResolver::resolve`] walks three sources in strict priority order and stops at the
//! first hit:
//!
//! 1. the selection already held in memory for this session,
//! 2. the `courseId` persisted by an earlier run,
//! 3. the first enrollment the backend lists for the signed-in user.
//!
//! Only the third source writes to storage. A failed or empty lookup leaves the session
//! without a course; pages render their "no course selected" state instead of erroring.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::CourseId,
	backend::BackendClient,
	http::BackendTransport,
	obs::{self, StageKind, StageOutcome, StageSpan},
	route::RouteClass,
	session::Session,
	store::{CredentialStore, StoreKey},
};

/// Currently active course.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSelection {
	/// Selected course.
	pub course_id: CourseId,
}
impl CourseSelection {
	/// Wraps a course identifier.
	pub fn new(course_id: CourseId) -> Self {
		Self { course_id }
	}

	/// Parses a persisted identifier; blank or invalid values yield `None`.
	pub fn from_persisted(raw: &str) -> Option<Self> {
		CourseId::new(raw.trim()).ok().map(Self::new)
	}
}

/// Resolves the active course and persists backend-derived defaults.
pub struct CourseResolver<T>
where
	T: ?Sized + BackendTransport,
{
	store: CredentialStore,
	backend: BackendClient<T>,
	lookups: AtomicU64,
}
impl<T> CourseResolver<T>
where
	T: ?Sized + BackendTransport,
{
	/// Creates a resolver that persists into `store` and lists enrollments via `backend`.
	pub fn new(store: CredentialStore, backend: BackendClient<T>) -> Self {
		Self { store, backend, lookups: AtomicU64::new(0) }
	}

	/// Number of enrollment listings issued so far.
	pub fn backend_lookups(&self) -> u64 {
		self.lookups.load(Ordering::Relaxed)
	}

	/// Decides which course is active for `class`.
	///
	/// Routes outside the course-sensitive class get `prior` back untouched, so public
	/// navigation never costs a backend call. Re-running with `prior` set is a no-op.
	pub async fn resolve(
		&self,
		class: RouteClass,
		session: &Session,
		prior: Option<CourseSelection>,
		persisted: Option<&str>,
	) -> Option<CourseSelection> {
		self.resolve_while(class, session, prior, persisted, || true).await
	}

	/// Same as [`resolve`](Self::resolve), but a backend-derived course is only persisted while
	/// `is_current` holds once the listing returns.
	pub(crate) async fn resolve_while<F>(
		&self,
		class: RouteClass,
		session: &Session,
		prior: Option<CourseSelection>,
		persisted: Option<&str>,
		is_current: F,
	) -> Option<CourseSelection>
	where
		F: Fn() -> bool,
	{
		const KIND: StageKind = StageKind::CourseResolution;

		if !class.is_course_sensitive() || prior.is_some() {
			obs::record_stage_outcome(KIND, StageOutcome::Skipped);

			return prior;
		}
		if let Some(selection) = persisted.and_then(CourseSelection::from_persisted) {
			obs::record_stage_outcome(KIND, StageOutcome::Skipped);

			return Some(selection);
		}

		let span = StageSpan::new(KIND, "resolve");

		span.instrument(self.resolve_from_enrollments(session, is_current)).await
	}

	async fn resolve_from_enrollments<F>(
		&self,
		session: &Session,
		is_current: F,
	) -> Option<CourseSelection>
	where
		F: Fn() -> bool,
	{
		const KIND: StageKind = StageKind::CourseResolution;

		let Some(profile) = session.profile() else {
			obs::course_unresolved(&"session has no profile");
			obs::record_stage_outcome(KIND, StageOutcome::Skipped);

			return None;
		};

		obs::record_stage_outcome(KIND, StageOutcome::Attempt);
		self.lookups.fetch_add(1, Ordering::Relaxed);

		let first =
			match self.backend.first_enrollment(&profile.id, session.access_credential()).await {
				Ok(first) => first,
				Err(e) => {
					obs::course_unresolved(&e);
					obs::record_stage_outcome(KIND, StageOutcome::Failure);

					return None;
				},
			};
		let Some(course) = first.and_then(|enrollment| enrollment.course) else {
			obs::course_unresolved(&"no enrolled course");
			obs::record_stage_outcome(KIND, StageOutcome::Failure);

			return None;
		};
		let selection = CourseSelection::new(course.id);

		if !is_current() {
			obs::record_stage_outcome(KIND, StageOutcome::Skipped);

			return Some(selection);
		}

		self.store.set(StoreKey::CourseId, selection.course_id.as_ref()).await;
		obs::record_stage_outcome(KIND, StageOutcome::Success);

		Some(selection)
	}
}
impl<T> Debug for CourseResolver<T>
where
	T: ?Sized + BackendTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CourseResolver")
			.field("store", &self.store)
			.field("backend", &self.backend)
			.field("lookups", &self.backend_lookups())
			.finish()
	}
}
