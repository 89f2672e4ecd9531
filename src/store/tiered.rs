//! Two-tier credential store that never fails its callers.
//!
//! Reads go to the primary backend first and fall back to the secondary one when the primary
//! errors or has nothing under the key, so a value that was written through the fallback
//! path stays visible. Writes try the primary and then the secondary; removals hit both.
//! Every backend failure is logged and swallowed here.

// self
use crate::{
	_prelude::*,
	obs,
	store::{KeyValueStore, StoreKey},
};

/// Backend tier that served or failed an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreTier {
	/// Preferred backend.
	Primary,
	/// Fallback backend.
	Secondary,
}
impl StoreTier {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			StoreTier::Primary => "primary",
			StoreTier::Secondary => "secondary",
		}
	}
}

/// Persistence for the renewal credential and the last selected course.
#[derive(Clone)]
pub struct CredentialStore {
	primary: Arc<dyn KeyValueStore>,
	secondary: Option<Arc<dyn KeyValueStore>>,
}
impl CredentialStore {
	/// Creates a store with a single backend.
	pub fn new(primary: Arc<dyn KeyValueStore>) -> Self {
		Self { primary, secondary: None }
	}

	/// Attaches a fallback backend.
	pub fn with_secondary(mut self, secondary: Arc<dyn KeyValueStore>) -> Self {
		self.secondary = Some(secondary);

		self
	}

	/// Reads `key`; returns `None` when neither tier yields a value.
	pub async fn get(&self, key: StoreKey) -> Option<String> {
		match self.primary.read(key.as_str()).await {
			Ok(Some(value)) => return Some(value),
			Ok(None) => {},
			Err(e) => obs::store_fallback("get", key, StoreTier::Primary, &e),
		}

		let secondary = self.secondary.as_ref()?;

		match secondary.read(key.as_str()).await {
			Ok(value) => value,
			Err(e) => {
				obs::store_fallback("get", key, StoreTier::Secondary, &e);

				None
			},
		}
	}

	/// Writes `key`; returns whether any tier accepted the value.
	pub async fn set(&self, key: StoreKey, value: &str) -> bool {
		match self.primary.write(key.as_str(), value).await {
			Ok(()) => return true,
			Err(e) => obs::store_fallback("set", key, StoreTier::Primary, &e),
		}

		let Some(secondary) = self.secondary.as_ref() else {
			return false;
		};

		match secondary.write(key.as_str(), value).await {
			Ok(()) => true,
			Err(e) => {
				obs::store_fallback("set", key, StoreTier::Secondary, &e);

				false
			},
		}
	}

	/// Removes `key` from both tiers, best effort.
	pub async fn remove(&self, key: StoreKey) {
		if let Err(e) = self.primary.delete(key.as_str()).await {
			obs::store_fallback("remove", key, StoreTier::Primary, &e);
		}
		if let Some(secondary) = self.secondary.as_ref() {
			if let Err(e) = secondary.delete(key.as_str()).await {
				obs::store_fallback("remove", key, StoreTier::Secondary, &e);
			}
		}
	}

	/// Removes every key the session bootstrap owns.
	pub async fn clear(&self) {
		for key in StoreKey::ALL {
			self.remove(key).await;
		}
	}
}
impl Debug for CredentialStore {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("CredentialStore")
			.field("secondary_set", &self.secondary.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;
	use crate::store::MemoryStore;

	fn tiered(primary: MemoryStore, secondary: MemoryStore) -> CredentialStore {
		CredentialStore::new(Arc::new(primary)).with_secondary(Arc::new(secondary))
	}

	#[tokio::test]
	async fn writes_prefer_primary() {
		let primary = MemoryStore::default();
		let secondary = MemoryStore::default();
		let store = tiered(primary.clone(), secondary.clone());

		assert!(store.set(StoreKey::CourseId, "c1").await);
		assert_eq!(primary.peek("courseId"), Some("c1".into()));
		assert!(secondary.is_empty());
		assert_eq!(store.get(StoreKey::CourseId).await, Some("c1".into()));
	}

	#[tokio::test]
	async fn quota_failure_falls_back_and_stays_readable() {
		let primary = MemoryStore::with_quota(4);
		let secondary = MemoryStore::default();
		let store = tiered(primary.clone(), secondary.clone());

		assert!(store.set(StoreKey::RefreshToken, "rt-long-value").await);
		assert!(primary.is_empty());
		assert_eq!(secondary.peek("refreshToken"), Some("rt-long-value".into()));
		assert_eq!(store.get(StoreKey::RefreshToken).await, Some("rt-long-value".into()));
	}

	#[tokio::test]
	async fn both_tiers_failing_degrades_to_noop() {
		let store = tiered(MemoryStore::disabled(), MemoryStore::disabled());

		assert!(!store.set(StoreKey::CourseId, "c1").await);
		assert_eq!(store.get(StoreKey::CourseId).await, None);

		store.remove(StoreKey::CourseId).await;
	}

	#[tokio::test]
	async fn single_tier_reports_failed_write() {
		let store = CredentialStore::new(Arc::new(MemoryStore::disabled()));

		assert!(!store.set(StoreKey::CourseId, "c1").await);
		assert_eq!(store.get(StoreKey::CourseId).await, None);
	}

	#[tokio::test]
	async fn clear_removes_keys_from_both_tiers() {
		let primary = MemoryStore::default();
		let secondary = MemoryStore::default();

		primary.write("refreshToken", "rt-a").await.expect("Seeding primary should succeed.");
		secondary.write("courseId", "c1").await.expect("Seeding secondary should succeed.");
		secondary.write("theme", "dark").await.expect("Seeding secondary should succeed.");

		let store = tiered(primary.clone(), secondary.clone());

		store.clear().await;

		assert!(primary.is_empty());
		assert_eq!(secondary.peek("courseId"), None);
		assert_eq!(secondary.peek("theme"), Some("dark".into()), "Foreign keys must survive.");
	}
}
