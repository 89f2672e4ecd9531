// self
use crate::{
	_prelude::*,
	error::RenewalErrorKind,
	obs::StageKind,
	route::RouteClass,
	store::{StoreError, StoreKey, StoreTier},
};

/// Type alias that resolves to an instrumented future when tracing is enabled.
#[cfg(feature = "tracing")]
pub type InstrumentedStage<F> = tracing::instrument::Instrumented<F>;
/// Passthrough future type when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub type InstrumentedStage<F> = F;

/// A span builder used by bootstrap stages.
#[derive(Clone, Debug)]
pub struct StageSpan {
	#[cfg(feature = "tracing")]
	span: tracing::Span,
}
impl StageSpan {
	/// Creates a new span tagged with the provided stage + call site.
	pub fn new(kind: StageKind, call_site: &'static str) -> Self {
		#[cfg(feature = "tracing")]
		{
			let span = tracing::info_span!("lms_session.stage", stage = kind.as_str(), call_site);

			Self { span }
		}
		#[cfg(not(feature = "tracing"))]
		{
			let _ = (kind, call_site);

			Self {}
		}
	}

	/// Instruments an async block without holding a guard across `.await` points.
	pub fn instrument<Fut>(&self, fut: Fut) -> InstrumentedStage<Fut>
	where
		Fut: Future,
	{
		#[cfg(feature = "tracing")]
		{
			use tracing::Instrument;

			fut.instrument(self.span.clone())
		}
		#[cfg(not(feature = "tracing"))]
		{
			fut
		}
	}
}

/// Logs a swallowed storage failure.
pub fn store_fallback(op: &'static str, key: StoreKey, tier: StoreTier, error: &StoreError) {
	#[cfg(feature = "tracing")]
	tracing::warn!(op, key = key.as_str(), tier = tier.as_str(), %error, "storage access failed");
	#[cfg(not(feature = "tracing"))]
	let _ = (op, key, tier, error);
}

/// Logs a failed renewal; the session degrades to signed-out.
pub fn renewal_failed(kind: RenewalErrorKind, status: Option<u16>) {
	#[cfg(feature = "tracing")]
	tracing::warn!(kind = kind.as_str(), status, "session renewal failed, clearing credentials");
	#[cfg(not(feature = "tracing"))]
	let _ = (kind, status);
}

/// Logs a successful renewal by credential fingerprint.
pub fn renewal_succeeded(previous: &str, rotated: &str) {
	#[cfg(feature = "tracing")]
	tracing::debug!(previous, rotated, rotated_changed = previous != rotated, "session renewed");
	#[cfg(not(feature = "tracing"))]
	let _ = (previous, rotated);
}

/// Logs a course listing that produced no usable selection.
pub fn course_unresolved(reason: &dyn Display) {
	#[cfg(feature = "tracing")]
	tracing::info!(%reason, "no course could be resolved for the session");
	#[cfg(not(feature = "tracing"))]
	let _ = reason;
}

/// Logs a gate redirect.
pub fn redirect(path: &str, class: RouteClass, to: &str) {
	#[cfg(feature = "tracing")]
	tracing::info!(path, class = class.as_str(), to, "access denied, redirecting");
	#[cfg(not(feature = "tracing"))]
	let _ = (path, class, to);
}

/// Logs a cycle whose results were discarded because a newer navigation started.
pub fn superseded(generation: u64, latest: u64) {
	#[cfg(feature = "tracing")]
	tracing::debug!(generation, latest, "bootstrap cycle superseded");
	#[cfg(not(feature = "tracing"))]
	let _ = (generation, latest);
}
