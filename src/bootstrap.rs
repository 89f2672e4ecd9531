//! Navigation-driven session bootstrap.
//!
//! [`Orchestrator::navigate`] runs one cycle of the state machine for a path:
//!
//! ```text
//! Init -> Loading -> [Renewing] -> [ResolvingCourse] -> Gating -> Ready
//! ```
//!
//! `Renewing` only runs when a renewal credential is stored and `ResolvingCourse` only runs
//! for authenticated sessions. Every failure degrades to a signed-out `Ready`; nothing here
//! returns an error to the view layer.
//!
//! Each cycle takes a generation number. A rotated renewal credential is always stored,
//! because the backend has already consumed the old one, but only the newest generation may
//! persist a course default, commit the session, publish status, or redirect. Renewals are
//! serialized so a cycle never presents a credential that an overlapping cycle already
//! rotated. [`Orchestrator::sign_out`] supersedes every cycle in flight and settles the status
//! itself.

mod metrics;
mod state;

pub use metrics::BootstrapMetrics;
pub use state::*;

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::{CourseId, CredentialSecret, DeviceId},
	backend::BackendClient,
	course::{CourseResolver, CourseSelection},
	gate::{AccessDecision, AccessPolicy},
	http::BackendTransport,
	obs::{self, StageKind, StageOutcome, StageSpan},
	route::{self, RouteClass},
	session::{RenewalClient, Session, SessionContext, SessionReader},
	store::{CredentialStore, StoreKey},
};
#[cfg(feature = "reqwest")] use crate::http::ReqwestTransport;

/// Orchestrator specialized for the crate's default reqwest transport.
#[cfg(feature = "reqwest")]
pub type ReqwestOrchestrator = Orchestrator<ReqwestTransport>;

/// Drives the bootstrap state machine on every navigation.
pub struct Orchestrator<T>
where
	T: ?Sized + BackendTransport,
{
	store: CredentialStore,
	renewal: RenewalClient<T>,
	courses: CourseResolver<T>,
	policy: AccessPolicy,
	context: SessionContext,
	navigator: Arc<dyn Navigator>,
	generation: AtomicU64,
	renewal_guard: AsyncMutex<()>,
	status: RwLock<BootstrapStatus>,
	metrics: Arc<BootstrapMetrics>,
}
impl<T> Orchestrator<T>
where
	T: ?Sized + BackendTransport,
{
	/// Creates an orchestrator with the default [`AccessPolicy`].
	pub fn new(
		store: CredentialStore,
		backend: BackendClient<T>,
		navigator: Arc<dyn Navigator>,
	) -> Self {
		Self {
			renewal: RenewalClient::new(backend.clone()),
			courses: CourseResolver::new(store.clone(), backend),
			store,
			policy: AccessPolicy::default(),
			context: SessionContext::new(),
			navigator,
			generation: AtomicU64::new(0),
			renewal_guard: AsyncMutex::new(()),
			status: RwLock::new(BootstrapStatus::default()),
			metrics: Default::default(),
		}
	}

	/// Replaces the access policy.
	pub fn with_policy(mut self, policy: AccessPolicy) -> Self {
		self.policy = policy;

		self
	}

	/// Read-only handle on the committed session and course.
	pub fn session(&self) -> SessionReader {
		self.context.reader()
	}

	/// Status of the newest cycle.
	pub fn status(&self) -> BootstrapStatus {
		self.status.read().clone()
	}

	/// Cycle counters.
	pub fn metrics(&self) -> Arc<BootstrapMetrics> {
		self.metrics.clone()
	}

	/// Course resolver, exposed for its lookup counter.
	pub fn course_resolver(&self) -> &CourseResolver<T> {
		&self.courses
	}

	/// Access policy in effect.
	pub fn policy(&self) -> &AccessPolicy {
		&self.policy
	}

	/// Runs one bootstrap cycle for `path`.
	///
	/// Starting a cycle supersedes every cycle still in flight; those return
	/// [`BootstrapOutcome::Superseded`] without touching the session, the status, or the
	/// navigator.
	pub async fn navigate(&self, path: &str) -> BootstrapOutcome {
		const KIND: StageKind = StageKind::Bootstrap;

		let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
		let class = route::classify(path);
		let span = StageSpan::new(KIND, "navigate");

		obs::record_stage_outcome(KIND, StageOutcome::Attempt);
		self.metrics.record_cycle();
		self.publish(generation, |status| {
			*status = BootstrapStatus::loading(generation, path, class)
		});

		let outcome = span.instrument(self.run_cycle(generation, path, class)).await;

		match &outcome {
			BootstrapOutcome::Ready(_) => obs::record_stage_outcome(KIND, StageOutcome::Success),
			BootstrapOutcome::Superseded { generation, latest } => {
				obs::superseded(*generation, *latest);
				obs::record_stage_outcome(KIND, StageOutcome::Skipped);
				self.metrics.record_superseded();
			},
		}

		outcome
	}

	/// Makes a user-picked course the active one and persists it.
	///
	/// The in-memory selection changes even when no storage tier accepts the write.
	pub async fn select_course(&self, course_id: CourseId) -> CourseSelection {
		let selection = CourseSelection::new(course_id);

		self.store.set(StoreKey::CourseId, selection.course_id.as_ref()).await;
		self.context.set_course(Some(selection.clone()));

		selection
	}

	/// Signs the user out.
	///
	/// Cycles still in flight are superseded and the in-memory session and course are dropped
	/// up front; the status settles on a signed-out `Ready` for the last path, redirecting when
	/// that path now requires a sign-in. The backend is only called when a renewal credential
	/// is stored, and the stored credential is only removed once the backend confirms.
	pub async fn sign_out(&self, device: &DeviceId) -> Result<()> {
		let _singleflight = self.renewal_guard.lock().await;
		let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
		let access = self.context.snapshot().session.access_credential().cloned();

		self.context.clear();
		self.settle_signed_out(generation);

		if self.stored_credential().await.is_none() {
			obs::record_stage_outcome(StageKind::SignOut, StageOutcome::Skipped);

			return Ok(());
		}

		self.renewal.sign_out(device, access.as_ref()).await?;
		self.store.remove(StoreKey::RefreshToken).await;

		Ok(())
	}

	async fn run_cycle(&self, generation: u64, path: &str, class: RouteClass) -> BootstrapOutcome {
		let (session, renewal) = {
			let _singleflight = self.renewal_guard.lock().await;

			if let Some(superseded) = self.superseded(generation) {
				return superseded;
			}

			self.renew_stored(generation).await
		};

		if let Some(superseded) = self.superseded(generation) {
			return superseded;
		}

		let course = if session.is_authenticated() {
			self.publish(generation, |status| status.phase = BootstrapPhase::ResolvingCourse);

			let prior = self.context.course();
			let persisted = self.store.get(StoreKey::CourseId).await;

			self.courses
				.resolve_while(class, &session, prior, persisted.as_deref(), || {
					self.is_current(generation)
				})
				.await
		} else {
			None
		};

		self.publish(generation, |status| status.phase = BootstrapPhase::Gating);

		let decision = self.policy.decide(class, &session);
		let report = BootstrapReport {
			generation,
			path: path.to_owned(),
			route_class: class,
			decision: decision.clone(),
			authenticated: session.is_authenticated(),
			course: course.clone(),
			renewal,
		};
		let Some(ready) = self.commit(generation, session, course, &decision) else {
			return self.superseded_now(generation);
		};

		if let Some(to) = decision.redirect_to.as_deref() {
			obs::redirect(path, class, to);
			self.metrics.record_redirect();
			self.navigator.redirect(to);
		}

		self.navigator.phase_changed(&ready);

		BootstrapOutcome::Ready(report)
	}

	async fn renew_stored(&self, generation: u64) -> (Session, RenewalOutcome) {
		let Some(credential) = self.stored_credential().await else {
			obs::record_stage_outcome(StageKind::Renewal, StageOutcome::Skipped);
			self.metrics.record_renewal_skipped();

			return (Session::empty(), RenewalOutcome::Skipped);
		};

		self.publish(generation, |status| status.phase = BootstrapPhase::Renewing);

		match self.renewal.renew(&credential).await {
			Ok(renewal) => {
				self.store.set(StoreKey::RefreshToken, renewal.credential.expose()).await;
				self.metrics.record_renewal_success();

				(renewal.session(), RenewalOutcome::Renewed)
			},
			Err(e) => {
				self.store.clear().await;
				self.metrics.record_renewal_failure();

				(Session::empty(), RenewalOutcome::Failed(e.kind()))
			},
		}
	}

	async fn stored_credential(&self) -> Option<CredentialSecret> {
		self.store.get(StoreKey::RefreshToken).await.and_then(CredentialSecret::non_empty)
	}

	fn is_current(&self, generation: u64) -> bool {
		self.generation.load(Ordering::SeqCst) == generation
	}

	fn superseded(&self, generation: u64) -> Option<BootstrapOutcome> {
		(!self.is_current(generation)).then(|| self.superseded_now(generation))
	}

	fn superseded_now(&self, generation: u64) -> BootstrapOutcome {
		BootstrapOutcome::Superseded { generation, latest: self.generation.load(Ordering::SeqCst) }
	}

	/// Applies `update` to the status when `generation` is still the newest cycle.
	fn publish(&self, generation: u64, update: impl FnOnce(&mut BootstrapStatus)) {
		let snapshot = {
			let mut status = self.status.write();

			if !self.is_current(generation) {
				return;
			}

			update(&mut *status);

			status.clone()
		};

		self.navigator.phase_changed(&snapshot);
	}

	/// Publishes a signed-out `Ready` status for the last known path.
	fn settle_signed_out(&self, generation: u64) {
		let settled = {
			let mut status = self.status.write();

			if !self.is_current(generation) {
				return;
			}

			status.generation = generation;
			status.phase = BootstrapPhase::Ready;
			status.is_loading = false;
			status.decision =
				status.route_class.map(|class| self.policy.decide(class, &Session::empty()));

			status.clone()
		};

		if let (Some(path), Some(class), Some(to)) = (
			settled.path.as_deref(),
			settled.route_class,
			settled.decision.as_ref().and_then(|decision| decision.redirect_to.as_deref()),
		) {
			obs::redirect(path, class, to);
			self.metrics.record_redirect();
			self.navigator.redirect(to);
		}

		self.navigator.phase_changed(&settled);
	}

	/// Commits the cycle's results atomically with the generation check.
	fn commit(
		&self,
		generation: u64,
		session: Session,
		course: Option<CourseSelection>,
		decision: &AccessDecision,
	) -> Option<BootstrapStatus> {
		let mut status = self.status.write();

		if !self.is_current(generation) {
			return None;
		}

		self.context.commit(session, course);

		status.phase = BootstrapPhase::Ready;
		status.is_loading = false;
		status.decision = Some(decision.clone());

		Some(status.clone())
	}
}
#[cfg(feature = "reqwest")]
impl Orchestrator<ReqwestTransport> {
	/// Creates an orchestrator that provisions its own reqwest transport.
	pub fn from_descriptor(
		store: CredentialStore,
		descriptor: crate::backend::BackendDescriptor,
		navigator: Arc<dyn Navigator>,
	) -> Self {
		Self::new(store, BackendClient::new(descriptor), navigator)
	}
}
impl<T> Debug for Orchestrator<T>
where
	T: ?Sized + BackendTransport,
{
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("Orchestrator")
			.field("store", &self.store)
			.field("policy", &self.policy)
			.field("generation", &self.generation.load(Ordering::Relaxed))
			.field("status", &*self.status.read())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::{
		backend::BackendDescriptor,
		http::{BackendRequest, BackendResponse, TransportFuture},
		store::{KeyValueStore, MemoryStore},
	};

	#[derive(Default)]
	struct Recorder {
		redirects: Mutex<Vec<String>>,
		phases: Mutex<Vec<BootstrapPhase>>,
	}
	impl Navigator for Recorder {
		fn redirect(&self, path: &str) {
			self.redirects.lock().push(path.to_owned());
		}

		fn phase_changed(&self, status: &BootstrapStatus) {
			self.phases.lock().push(status.phase);
		}
	}

	struct Refreshing;
	impl BackendTransport for Refreshing {
		fn send(&self, request: BackendRequest) -> TransportFuture<'_> {
			let response = if request.url.path().ends_with("auth/refresh") {
				BackendResponse::new(
					200,
					r#"{"accessToken":"at","refreshToken":"rt-2","user":{"id":"u1","role":"STUDENT","username":"s"}}"#,
				)
			} else {
				BackendResponse::new(200, r#"[{"course":{"id":"c1"}}]"#)
			};

			Box::pin(async move { Ok(response) })
		}
	}

	fn orchestrator(memory: &MemoryStore) -> (Orchestrator<Refreshing>, Arc<Recorder>) {
		let recorder = Arc::new(Recorder::default());
		let descriptor =
			BackendDescriptor::parse("https://lms.example.com/").expect("URL should be valid.");
		let orchestrator = Orchestrator::new(
			CredentialStore::new(Arc::new(memory.clone())),
			BackendClient::with_transport(descriptor, Refreshing),
			recorder.clone(),
		);

		(orchestrator, recorder)
	}

	#[tokio::test]
	async fn phases_follow_the_state_machine() {
		let memory = MemoryStore::default();

		memory.write("refreshToken", "rt-1").await.expect("Seeding should succeed.");

		let (orchestrator, recorder) = orchestrator(&memory);

		assert_eq!(orchestrator.status(), BootstrapStatus::default());

		let outcome = orchestrator.navigate("/Dashboard").await;
		let report = outcome.report().expect("Cycle should complete.");

		assert_eq!(report.renewal, RenewalOutcome::Renewed);
		assert_eq!(
			*recorder.phases.lock(),
			vec![
				BootstrapPhase::Loading,
				BootstrapPhase::Renewing,
				BootstrapPhase::ResolvingCourse,
				BootstrapPhase::Gating,
				BootstrapPhase::Ready,
			]
		);
		assert!(!orchestrator.status().is_loading);
		assert_eq!(memory.peek("refreshToken"), Some("rt-2".into()));
	}

	#[tokio::test]
	async fn signed_out_cycle_skips_renewal_phases() {
		let memory = MemoryStore::default();
		let (orchestrator, recorder) = orchestrator(&memory);
		let outcome = orchestrator.navigate("/Profile").await;

		assert_eq!(outcome.report().map(|report| report.renewal), Some(RenewalOutcome::Skipped));
		assert_eq!(
			*recorder.phases.lock(),
			vec![BootstrapPhase::Loading, BootstrapPhase::Gating, BootstrapPhase::Ready]
		);
		assert_eq!(*recorder.redirects.lock(), vec!["/Signin".to_owned()]);
		assert_eq!(orchestrator.metrics().redirects(), 1);
		assert_eq!(orchestrator.metrics().renewals_skipped(), 1);
	}

	#[tokio::test]
	async fn select_course_overrides_resolution() {
		let memory = MemoryStore::default();

		memory.write("refreshToken", "rt-1").await.expect("Seeding should succeed.");

		let (orchestrator, _) = orchestrator(&memory);
		let picked = orchestrator
			.select_course(CourseId::new("c9").expect("Course fixture should be valid."))
			.await;

		assert_eq!(memory.peek("courseId"), Some("c9".into()));

		let outcome = orchestrator.navigate("/Notes").await;

		assert_eq!(outcome.report().and_then(|report| report.course.clone()), Some(picked));
		assert_eq!(orchestrator.course_resolver().backend_lookups(), 0);
	}

	#[tokio::test]
	async fn sign_out_settles_a_signed_out_ready_status() {
		let memory = MemoryStore::default();

		memory.write("refreshToken", "rt-1").await.expect("Seeding should succeed.");

		let (orchestrator, recorder) = orchestrator(&memory);
		let device = DeviceId::new("device-1").expect("Device fixture should be valid.");

		orchestrator.navigate("/Dashboard").await.report().expect("Cycle should complete.");
		orchestrator.sign_out(&device).await.expect("Sign-out should succeed.");

		let status = orchestrator.status();

		assert_eq!(status.generation, 2);
		assert_eq!(status.phase, BootstrapPhase::Ready);
		assert!(!status.is_loading);
		assert_eq!(status.path.as_deref(), Some("/Dashboard"));
		assert_eq!(status.decision, Some(AccessDecision::redirect("/Signin")));
		assert_eq!(*recorder.redirects.lock(), vec!["/Signin".to_owned()]);
		assert_eq!(recorder.phases.lock().last(), Some(&BootstrapPhase::Ready));
		assert_eq!(memory.peek("refreshToken"), None);
		assert!(!orchestrator.session().is_authenticated());
	}

	#[tokio::test]
	async fn sign_out_before_any_navigation_stays_quiet() {
		let memory = MemoryStore::default();
		let (orchestrator, recorder) = orchestrator(&memory);
		let device = DeviceId::new("device-1").expect("Device fixture should be valid.");

		orchestrator.sign_out(&device).await.expect("Nothing to revoke is not an error.");

		let status = orchestrator.status();

		assert_eq!(status.phase, BootstrapPhase::Ready);
		assert!(!status.is_loading);
		assert_eq!(status.decision, None);
		assert!(recorder.redirects.lock().is_empty());
	}
}
