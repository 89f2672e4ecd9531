// std
use std::sync::atomic::{AtomicU64, Ordering};

/// Thread-safe counters for bootstrap cycles.
#[derive(Debug, Default)]
pub struct BootstrapMetrics {
	cycles: AtomicU64,
	renewals_succeeded: AtomicU64,
	renewals_failed: AtomicU64,
	renewals_skipped: AtomicU64,
	superseded: AtomicU64,
	redirects: AtomicU64,
}
impl BootstrapMetrics {
	/// Returns the number of navigation cycles started.
	pub fn cycles(&self) -> u64 {
		self.cycles.load(Ordering::Relaxed)
	}

	/// Returns the number of successful renewal exchanges.
	pub fn renewals_succeeded(&self) -> u64 {
		self.renewals_succeeded.load(Ordering::Relaxed)
	}

	/// Returns the number of failed renewal exchanges.
	pub fn renewals_failed(&self) -> u64 {
		self.renewals_failed.load(Ordering::Relaxed)
	}

	/// Returns the number of cycles that found no stored credential.
	pub fn renewals_skipped(&self) -> u64 {
		self.renewals_skipped.load(Ordering::Relaxed)
	}

	/// Returns the number of cycles discarded in favor of a newer navigation.
	pub fn superseded(&self) -> u64 {
		self.superseded.load(Ordering::Relaxed)
	}

	/// Returns the number of redirects issued by the gate.
	pub fn redirects(&self) -> u64 {
		self.redirects.load(Ordering::Relaxed)
	}

	pub(crate) fn record_cycle(&self) {
		self.cycles.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_renewal_success(&self) {
		self.renewals_succeeded.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_renewal_failure(&self) {
		self.renewals_failed.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_renewal_skipped(&self) {
		self.renewals_skipped.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_superseded(&self) {
		self.superseded.fetch_add(1, Ordering::Relaxed);
	}

	pub(crate) fn record_redirect(&self) {
		self.redirects.fetch_add(1, Ordering::Relaxed);
	}
}
