//! Optional observability helpers for the session bootstrap.
//!
//! # Feature Flags
//!
//! - Enable `tracing` to emit structured spans named `lms_session.stage` with the `stage` and
//!   `call_site` fields, plus events for storage fallbacks, renewal failures, redirects, and
//!   superseded cycles.
//! - Enable `metrics` to increment the `lms_session_stage_total` counter for every
//!   attempt/success/failure/skip, labeled by `stage` + `outcome`.

mod counters;
mod span;

pub use counters::*;
pub use span::*;

// self
use crate::_prelude::*;

/// Bootstrap stages observed by the crate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageKind {
	/// One full navigation cycle.
	Bootstrap,
	/// Renewal credential exchange.
	Renewal,
	/// Course context resolution.
	CourseResolution,
	/// Explicit sign-out.
	SignOut,
}
impl StageKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageKind::Bootstrap => "bootstrap",
			StageKind::Renewal => "renewal",
			StageKind::CourseResolution => "course_resolution",
			StageKind::SignOut => "sign_out",
		}
	}
}
impl Display for StageKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each stage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StageOutcome {
	/// Entry to a stage.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure (degraded, never fatal).
	Failure,
	/// Stage did not need to run.
	Skipped,
}
impl StageOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StageOutcome::Attempt => "attempt",
			StageOutcome::Success => "success",
			StageOutcome::Failure => "failure",
			StageOutcome::Skipped => "skipped",
		}
	}
}
impl Display for StageOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
