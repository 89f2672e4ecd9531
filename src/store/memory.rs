//! Thread-safe in-memory [`KeyValueStore`] with optional quota and disabled modes.

// self
use crate::{
	_prelude::*,
	store::{KeyValueStore, StoreError, StoreFuture},
};

type StoreMap = Arc<RwLock<HashMap<String, String>>>;

/// In-process key-value backend.
///
/// Besides serving as a scratch store for tests and demos, it reproduces the two failure
/// modes a browser storage area shows in the wild: an exhausted quota
/// ([`with_quota`](Self::with_quota)) and storage that refuses every access
/// ([`disabled`](Self::disabled)).
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
	map: StoreMap,
	quota: Option<usize>,
	disabled: bool,
}
impl MemoryStore {
	/// Creates a store whose keys plus values may not exceed `bytes`.
	pub fn with_quota(bytes: usize) -> Self {
		Self { quota: Some(bytes), ..Default::default() }
	}

	/// Creates a store that fails every operation with [`StoreError::Unavailable`].
	pub fn disabled() -> Self {
		Self { disabled: true, ..Default::default() }
	}

	/// Returns a snapshot of the stored value, bypassing the disabled flag.
	pub fn peek(&self, key: &str) -> Option<String> {
		self.map.read().get(key).cloned()
	}

	/// Number of stored entries.
	pub fn len(&self) -> usize {
		self.map.read().len()
	}

	/// Returns `true` when nothing is stored.
	pub fn is_empty(&self) -> bool {
		self.map.read().is_empty()
	}

	fn ensure_enabled(&self) -> Result<(), StoreError> {
		if self.disabled {
			Err(StoreError::Unavailable { message: "memory store is disabled".into() })
		} else {
			Ok(())
		}
	}

	fn write_now(&self, key: &str, value: &str) -> Result<(), StoreError> {
		self.ensure_enabled()?;

		let mut guard = self.map.write();

		if let Some(limit) = self.quota {
			let others: usize = guard
				.iter()
				.filter(|(existing, _)| existing.as_str() != key)
				.map(|(k, v)| k.len() + v.len())
				.sum();

			if others + key.len() + value.len() > limit {
				return Err(StoreError::QuotaExceeded { key: key.to_owned(), limit });
			}
		}

		guard.insert(key.to_owned(), value.to_owned());

		Ok(())
	}
}
impl KeyValueStore for MemoryStore {
	fn read<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>> {
		Box::pin(async move {
			self.ensure_enabled()?;

			Ok(self.map.read().get(key).cloned())
		})
	}

	fn write<'a>(&'a self, key: &'a str, value: &'a str) -> StoreFuture<'a, ()> {
		Box::pin(async move { self.write_now(key, value) })
	}

	fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()> {
		Box::pin(async move {
			self.ensure_enabled()?;
			self.map.write().remove(key);

			Ok(())
		})
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[tokio::test]
	async fn write_read_delete_round_trip() {
		let store = MemoryStore::default();

		store.write("refreshToken", "rt-1").await.expect("Write should succeed.");

		assert_eq!(
			store.read("refreshToken").await.expect("Read should succeed."),
			Some("rt-1".into())
		);

		store.delete("refreshToken").await.expect("Delete should succeed.");
		store.delete("refreshToken").await.expect("Deleting a missing key should succeed.");

		assert!(store.is_empty());
	}

	#[tokio::test]
	async fn quota_counts_replaced_values_once() {
		let store = MemoryStore::with_quota(20);

		store.write("courseId", "c1").await.expect("Small write should fit.");
		store.write("courseId", "c2").await.expect("Replacing a value should fit.");

		let err = store
			.write("refreshToken", "much-too-long")
			.await
			.expect_err("Write beyond the quota should fail.");

		assert_eq!(err, StoreError::QuotaExceeded { key: "refreshToken".into(), limit: 20 });
		assert_eq!(store.peek("courseId"), Some("c2".into()));
	}

	#[tokio::test]
	async fn disabled_store_rejects_everything() {
		let store = MemoryStore::disabled();

		assert!(matches!(store.read("courseId").await, Err(StoreError::Unavailable { .. })));
		assert!(matches!(store.write("courseId", "c1").await, Err(StoreError::Unavailable { .. })));
		assert!(matches!(store.delete("courseId").await, Err(StoreError::Unavailable { .. })));
	}
}
