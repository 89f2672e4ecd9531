//! Observable state of the bootstrap state machine.

// self
use crate::{
	_prelude::*,
	course::CourseSelection,
	error::RenewalErrorKind,
	gate::AccessDecision,
	route::RouteClass,
};

/// Phase of the most recent navigation cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BootstrapPhase {
	/// No navigation has started yet.
	Init,
	/// A cycle started; the view must only show a loading indicator.
	Loading,
	/// The stored renewal credential is being exchanged.
	Renewing,
	/// The active course is being resolved.
	ResolvingCourse,
	/// The access gate is evaluating the route.
	Gating,
	/// The cycle finished; the view may render.
	Ready,
}
impl BootstrapPhase {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			BootstrapPhase::Init => "init",
			BootstrapPhase::Loading => "loading",
			BootstrapPhase::Renewing => "renewing",
			BootstrapPhase::ResolvingCourse => "resolving_course",
			BootstrapPhase::Gating => "gating",
			BootstrapPhase::Ready => "ready",
		}
	}
}
impl Display for BootstrapPhase {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// What the view layer needs to know about the latest navigation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootstrapStatus {
	/// Generation of the cycle this status belongs to; `0` before the first navigation.
	pub generation: u64,
	/// Current phase.
	pub phase: BootstrapPhase,
	/// `true` until the cycle reaches [`BootstrapPhase::Ready`].
	pub is_loading: bool,
	/// Path being bootstrapped.
	pub path: Option<String>,
	/// Class of `path`.
	pub route_class: Option<RouteClass>,
	/// Gate decision, once made.
	pub decision: Option<AccessDecision>,
}
impl BootstrapStatus {
	pub(crate) fn loading(generation: u64, path: &str, class: RouteClass) -> Self {
		Self {
			generation,
			phase: BootstrapPhase::Loading,
			is_loading: true,
			path: Some(path.to_owned()),
			route_class: Some(class),
			decision: None,
		}
	}
}
impl Default for BootstrapStatus {
	fn default() -> Self {
		Self {
			generation: 0,
			phase: BootstrapPhase::Init,
			is_loading: true,
			path: None,
			route_class: None,
			decision: None,
		}
	}
}

/// How the renewal step of a cycle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenewalOutcome {
	/// No renewal credential was stored; no network call was made.
	Skipped,
	/// The credential was exchanged for a session.
	Renewed,
	/// The exchange failed and stored credentials were cleared.
	Failed(RenewalErrorKind),
}

/// Summary of a cycle that reached [`BootstrapPhase::Ready`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BootstrapReport {
	/// Cycle generation.
	pub generation: u64,
	/// Bootstrapped path.
	pub path: String,
	/// Class of `path`.
	pub route_class: RouteClass,
	/// Gate decision.
	pub decision: AccessDecision,
	/// Whether the committed session is authenticated.
	pub authenticated: bool,
	/// Committed course selection.
	pub course: Option<CourseSelection>,
	/// Renewal step result.
	pub renewal: RenewalOutcome,
}

/// Result of [`Orchestrator::navigate`](crate::bootstrap::Orchestrator::navigate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BootstrapOutcome {
	/// The cycle committed its results.
	Ready(BootstrapReport),
	/// A newer navigation started; this cycle's results were discarded.
	Superseded {
		/// Generation of the discarded cycle.
		generation: u64,
		/// Newest generation at the time of discard.
		latest: u64,
	},
}
impl BootstrapOutcome {
	/// Report of a committed cycle.
	pub fn report(&self) -> Option<&BootstrapReport> {
		match self {
			BootstrapOutcome::Ready(report) => Some(report),
			BootstrapOutcome::Superseded { .. } => None,
		}
	}

	/// Returns `true` when the cycle was discarded.
	pub fn is_superseded(&self) -> bool {
		matches!(self, BootstrapOutcome::Superseded { .. })
	}
}

/// Side-effect sink for the view layer.
pub trait Navigator
where
	Self: Send + Sync,
{
	/// Navigates to `path` after the gate denied access.
	fn redirect(&self, path: &str);

	/// Observes every phase transition of the current cycle.
	fn phase_changed(&self, status: &BootstrapStatus) {
		let _ = status;
	}
}

/// Navigator that drops every redirect, for headless use.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopNavigator;
impl Navigator for NoopNavigator {
	fn redirect(&self, _: &str) {}
}
