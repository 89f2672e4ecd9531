//! Key-value persistence contracts, built-in backends, and the two-tier credential store.

pub mod file;
pub mod memory;
pub mod tiered;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use tiered::{CredentialStore, StoreTier};

// self
use crate::_prelude::*;

/// Boxed future returned by [`KeyValueStore`] operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + 'a + Send>>;

/// Durable string key-value backend (browser local storage, a JSON file, a keychain, ...).
///
/// Implementations report every access failure as [`StoreError`]; swallowing failures is the
/// job of [`CredentialStore`], not of the backends.
pub trait KeyValueStore
where
	Self: Send + Sync,
{
	/// Reads the value stored under `key`, if any.
	fn read<'a>(&'a self, key: &'a str) -> StoreFuture<'a, Option<String>>;

	/// Writes or replaces the value stored under `key`.
	fn write<'a>(&'a self, key: &'a str, value: &'a str) -> StoreFuture<'a, ()>;

	/// Deletes `key`; deleting a missing key succeeds.
	fn delete<'a>(&'a self, key: &'a str) -> StoreFuture<'a, ()>;
}

/// Keys persisted by the session bootstrap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StoreKey {
	/// Long-lived renewal credential.
	RefreshToken,
	/// Last resolved or selected course identifier.
	CourseId,
}
impl StoreKey {
	/// Every key owned by the session bootstrap.
	pub const ALL: [StoreKey; 2] = [StoreKey::RefreshToken, StoreKey::CourseId];

	/// Storage key string, identical to the one the web client uses.
	pub const fn as_str(self) -> &'static str {
		match self {
			StoreKey::RefreshToken => "refreshToken",
			StoreKey::CourseId => "courseId",
		}
	}
}
impl Display for StoreKey {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Error type produced by [`KeyValueStore`] implementations.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ThisError)]
pub enum StoreError {
	/// Serialization failures surfaced by the backend.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// Backend-level failure for the storage engine.
	#[error("Backend failure: {message}.")]
	Backend {
		/// Human-readable error payload.
		message: String,
	},
	/// Write rejected because the backend's size budget is exhausted.
	#[error("Storage quota of {limit} bytes exceeded while writing `{key}`.")]
	QuotaExceeded {
		/// Key being written.
		key: String,
		/// Configured budget in bytes.
		limit: usize,
	},
	/// Storage is disabled (private browsing, policy, missing permissions).
	#[error("Storage is unavailable: {message}.")]
	Unavailable {
		/// Human-readable error payload.
		message: String,
	},
}
